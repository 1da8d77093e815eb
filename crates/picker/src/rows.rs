//! Ordered list of picker rows.
//!
//! Row order is the display order and is user-controlled. All operations
//! referencing an unknown row id leave the list untouched and report it via
//! their return value.

use product_picker_core::{Discount, IdGenerator, RowEntry, RowId};
use tracing::debug;

use crate::selection::SelectionEntry;

/// What happens to a row's discount when its product is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscountPolicy {
    /// Keep the row's current discount.
    #[default]
    Retain,
    /// Reset to the disabled default.
    Reset,
}

/// The picker's row list, owning its id generator.
#[derive(Debug, Clone)]
pub struct ProductRowList<G> {
    rows: Vec<RowEntry>,
    ids: G,
}

impl<G: IdGenerator> ProductRowList<G> {
    /// A list holding a single blank row.
    pub fn new(ids: G) -> Self {
        let mut list = Self::empty(ids);
        list.append_empty_row();
        list
    }

    /// A list with no rows at all.
    pub const fn empty(ids: G) -> Self {
        Self {
            rows: Vec::new(),
            ids,
        }
    }

    /// A blank row with a fresh id. Not inserted into the list.
    pub fn create_empty_row(&mut self) -> RowEntry {
        RowEntry::placeholder(self.ids.next_row_id())
    }

    /// Push a blank row to the end, returning its id.
    pub fn append_empty_row(&mut self) -> RowId {
        let row = self.create_empty_row();
        let id = row.id.clone();
        self.rows.push(row);
        id
    }

    /// Move row `from` to the index currently held by row `to`.
    ///
    /// Intermediate rows shift by one. Returns `false` without changes when
    /// either id is unknown or both are equal.
    pub fn reorder(&mut self, from: &RowId, to: &RowId) -> bool {
        if from == to {
            return false;
        }
        let (Some(old_index), Some(new_index)) = (self.position(from), self.position(to)) else {
            debug!(%from, %to, "reorder references unknown row");
            return false;
        };
        let row = self.rows.remove(old_index);
        self.rows.insert(new_index, row);
        true
    }

    /// Replace the product shown in `row_id`, keeping its id.
    pub fn replace_at(
        &mut self,
        row_id: &RowId,
        entry: SelectionEntry,
        policy: DiscountPolicy,
    ) -> bool {
        let Some(row) = self.get_mut(row_id) else {
            return false;
        };
        row.product_id = entry.product_id;
        row.title = entry.title;
        row.image = entry.image;
        row.variants = entry.variants;
        if policy == DiscountPolicy::Reset {
            row.discount = Discount::disabled();
        }
        true
    }

    /// Turn `row_id` back into a blank placeholder with a disabled discount.
    pub fn clear_at(&mut self, row_id: &RowId) -> bool {
        let Some(row) = self.get_mut(row_id) else {
            return false;
        };
        *row = RowEntry::placeholder(row.id.clone());
        true
    }

    /// Splice a committed selection into the list at `row_id`.
    ///
    /// An empty selection clears the row. Otherwise the first entry replaces
    /// the row in place (discount retained) and every further entry becomes a
    /// new row right after it, in order, with a disabled discount.
    pub fn splice_selection(&mut self, row_id: &RowId, selections: Vec<SelectionEntry>) -> bool {
        let Some(index) = self.position(row_id) else {
            debug!(%row_id, "commit targets unknown row");
            return false;
        };

        let mut selections = selections.into_iter();
        let Some(first) = selections.next() else {
            return self.clear_at(row_id);
        };
        self.replace_at(row_id, first, DiscountPolicy::Retain);

        for (offset, entry) in selections.enumerate() {
            let row = RowEntry {
                id: self.ids.next_row_id(),
                product_id: entry.product_id,
                title: entry.title,
                image: entry.image,
                variants: entry.variants,
                discount: Discount::disabled(),
            };
            self.rows.insert(index + 1 + offset, row);
        }
        true
    }

    /// Replace the discount of exactly the row matching `row_id`.
    pub fn set_discount(&mut self, row_id: &RowId, discount: Discount) -> bool {
        let Some(row) = self.get_mut(row_id) else {
            return false;
        };
        row.discount = discount;
        true
    }
}

impl<G> ProductRowList<G> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn get(&self, row_id: &RowId) -> Option<&RowEntry> {
        self.rows.iter().find(|r| &r.id == row_id)
    }

    fn get_mut(&mut self, row_id: &RowId) -> Option<&mut RowEntry> {
        self.rows.iter_mut().find(|r| &r.id == row_id)
    }

    /// Display index of `row_id`.
    #[must_use]
    pub fn position(&self, row_id: &RowId) -> Option<usize> {
        self.rows.iter().position(|r| &r.id == row_id)
    }

    /// Row at a display index.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&RowEntry> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RowEntry> {
        self.rows.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[RowEntry] {
        &self.rows
    }
}

impl<'a, G> IntoIterator for &'a ProductRowList<G> {
    type Item = &'a RowEntry;
    type IntoIter = std::slice::Iter<'a, RowEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashSet;

    use product_picker_core::{DiscountKind, ProductId, SequentialIds, Variant, VariantId};

    use super::*;

    fn entry(id: i64, title: &str) -> SelectionEntry {
        SelectionEntry {
            product_id: Some(ProductId::new(id)),
            title: title.to_string(),
            image: None,
            variants: vec![Variant {
                id: VariantId::new(id * 10),
                title: "Default".to_string(),
                price: None,
                inventory_quantity: None,
            }],
        }
    }

    fn ids(list: &ProductRowList<SequentialIds>) -> Vec<&str> {
        list.iter().map(|r| r.id.as_str()).collect()
    }

    fn list_of(n: usize) -> ProductRowList<SequentialIds> {
        let mut list = ProductRowList::new(SequentialIds::new());
        for _ in 1..n {
            list.append_empty_row();
        }
        list
    }

    fn active(value: &str) -> Discount {
        Discount {
            enabled: true,
            value: value.to_string(),
            kind: DiscountKind::Flat,
        }
    }

    #[test]
    fn test_new_list_has_one_blank_row() {
        let list = ProductRowList::new(SequentialIds::new());
        assert_eq!(list.len(), 1);
        assert!(!list.as_slice()[0].is_selected());
    }

    #[test]
    fn test_append_rows_have_distinct_ids() {
        let list = list_of(3);
        let unique: HashSet<&str> = ids(&list).into_iter().collect();
        assert_eq!(unique.len(), 3);
        assert!(list.iter().all(|r| !r.is_selected()));
    }

    #[test]
    fn test_reorder_forward_and_backward() {
        let mut list = list_of(4);
        assert!(list.reorder(&RowId::from("row-1"), &RowId::from("row-3")));
        assert_eq!(ids(&list), vec!["row-2", "row-3", "row-1", "row-4"]);

        assert!(list.reorder(&RowId::from("row-4"), &RowId::from("row-2")));
        assert_eq!(ids(&list), vec!["row-4", "row-2", "row-3", "row-1"]);
    }

    #[test]
    fn test_reorder_is_pure_permutation() {
        let mut list = list_of(4);
        list.splice_selection(&RowId::from("row-2"), vec![entry(1, "Mug")]);
        list.set_discount(&RowId::from("row-2"), active("5"));
        let mut before: Vec<RowEntry> = list.as_slice().to_vec();

        assert!(list.reorder(&RowId::from("row-2"), &RowId::from("row-4")));

        let mut after: Vec<RowEntry> = list.as_slice().to_vec();
        before.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        after.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        assert_eq!(before, after);
    }

    #[test]
    fn test_reorder_noop_cases() {
        let mut list = list_of(3);
        assert!(!list.reorder(&RowId::from("row-1"), &RowId::from("row-1")));
        assert!(!list.reorder(&RowId::from("row-1"), &RowId::from("row-9")));
        assert!(!list.reorder(&RowId::from("gone"), &RowId::from("row-2")));
        assert_eq!(ids(&list), vec!["row-1", "row-2", "row-3"]);
    }

    #[test]
    fn test_replace_at_preserves_id_and_discount() {
        let mut list = list_of(1);
        let row = RowId::from("row-1");
        list.set_discount(&row, active("3"));

        assert!(list.replace_at(&row, entry(7, "Lamp"), DiscountPolicy::Retain));
        let replaced = list.get(&row).unwrap();
        assert_eq!(replaced.title, "Lamp");
        assert_eq!(replaced.discount, active("3"));

        assert!(list.replace_at(&row, entry(8, "Desk"), DiscountPolicy::Reset));
        assert_eq!(list.get(&row).unwrap().discount, Discount::disabled());
    }

    #[test]
    fn test_splice_multi_selection() {
        let mut list = list_of(3);
        let target = RowId::from("row-2");
        list.set_discount(&target, active("15"));

        assert!(list.splice_selection(&target, vec![entry(1, "A"), entry(2, "B"), entry(3, "C")]));

        assert_eq!(
            ids(&list),
            vec!["row-1", "row-2", "row-4", "row-5", "row-3"]
        );
        let titles: Vec<&str> = list.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["", "A", "B", "C", ""]);
        assert_eq!(list.as_slice()[1].discount, active("15"));
        assert_eq!(list.as_slice()[2].discount, Discount::disabled());
        assert_eq!(list.as_slice()[3].discount, Discount::disabled());
    }

    #[test]
    fn test_splice_empty_selection_resets_row() {
        let mut list = list_of(1);
        let row = RowId::from("row-1");
        list.splice_selection(&row, vec![entry(1, "A")]);
        list.set_discount(&row, active("9"));

        assert!(list.splice_selection(&row, Vec::new()));
        assert_eq!(list.get(&row).unwrap(), &RowEntry::placeholder(row.clone()));
    }

    #[test]
    fn test_splice_unknown_row_is_noop() {
        let mut list = list_of(2);
        let before = list.as_slice().to_vec();
        assert!(!list.splice_selection(&RowId::from("missing"), vec![entry(1, "A")]));
        assert_eq!(list.as_slice(), before.as_slice());
    }

    #[test]
    fn test_set_discount_touches_only_target() {
        let mut list = list_of(3);
        assert!(list.set_discount(&RowId::from("row-2"), active("1")));
        assert!(!list.set_discount(&RowId::from("row-9"), active("1")));

        let enabled: Vec<bool> = list.iter().map(|r| r.discount.enabled).collect();
        assert_eq!(enabled, vec![false, true, false]);
    }
}
