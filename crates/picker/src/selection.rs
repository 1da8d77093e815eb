//! Products and variants checked in the picker modal.
//!
//! The set keeps insertion order: the first entry replaces the edited row on
//! commit and the rest are inserted after it in this order.

use product_picker_core::{Product, ProductId, ProductImage, RowEntry, Variant, VariantId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SelectionIdentity;

/// A product together with the subset of its variants currently checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEntry {
    /// Absent only when pre-selected from a row that never had one.
    pub product_id: Option<ProductId>,
    pub title: String,
    pub image: Option<ProductImage>,
    pub variants: Vec<Variant>,
}

impl SelectionEntry {
    /// Entry carrying every variant of `product`.
    #[must_use]
    pub fn whole(product: &Product) -> Self {
        Self::with_variants(product, product.variants.clone())
    }

    /// Entry carrying only `variants`.
    #[must_use]
    pub fn with_variants(product: &Product, variants: Vec<Variant>) -> Self {
        Self {
            product_id: Some(product.id),
            title: product.title.clone(),
            image: product.image.clone(),
            variants,
        }
    }

    /// Entry describing the product already chosen for `row`.
    #[must_use]
    pub fn from_row(row: &RowEntry) -> Self {
        Self {
            product_id: row.product_id,
            title: row.title.clone(),
            image: row.image.clone(),
            variants: row.variants.clone(),
        }
    }

    fn has_variant(&self, id: VariantId) -> bool {
        self.variants.iter().any(|v| v.id == id)
    }
}

/// Selection aggregator for one modal session.
#[derive(Debug, Clone)]
pub struct SelectionSet {
    identity: SelectionIdentity,
    entries: Vec<SelectionEntry>,
}

impl SelectionSet {
    /// An empty selection.
    #[must_use]
    pub const fn new(identity: SelectionIdentity) -> Self {
        Self {
            identity,
            entries: Vec::new(),
        }
    }

    /// Seed the selection with the product already chosen for `row`.
    ///
    /// Placeholder rows leave the selection empty.
    #[must_use]
    pub fn preselected(identity: SelectionIdentity, row: &RowEntry) -> Self {
        let mut set = Self::new(identity);
        if row.is_selected() {
            set.entries.push(SelectionEntry::from_row(row));
        }
        set
    }

    fn matches(&self, entry: &SelectionEntry, product: &Product) -> bool {
        match (self.identity, entry.product_id) {
            (SelectionIdentity::ProductId, Some(id)) => id == product.id,
            // Entries pre-selected from rows without a backend id fall back to title.
            (SelectionIdentity::ProductId, None) | (SelectionIdentity::Title, _) => {
                entry.title == product.title
            }
        }
    }

    fn position(&self, product: &Product) -> Option<usize> {
        self.entries.iter().position(|e| self.matches(e, product))
    }

    /// Select the whole product, or deselect it if any entry exists.
    ///
    /// Returns whether the product is selected afterwards.
    pub fn toggle_product(&mut self, product: &Product) -> bool {
        if let Some(index) = self.position(product) {
            self.entries.remove(index);
            debug!(product = %product.title, "product deselected");
            false
        } else {
            self.entries.push(SelectionEntry::whole(product));
            debug!(product = %product.title, variants = product.variants.len(), "product selected");
            true
        }
    }

    /// Toggle one variant of `product`.
    ///
    /// Removing the last checked variant drops the product entry. Returns
    /// whether the variant is selected afterwards.
    pub fn toggle_variant(&mut self, product: &Product, variant: &Variant) -> bool {
        let Some(index) = self.position(product) else {
            self.entries
                .push(SelectionEntry::with_variants(product, vec![variant.clone()]));
            return true;
        };
        let Some(entry) = self.entries.get_mut(index) else {
            return false;
        };

        if entry.has_variant(variant.id) {
            entry.variants.retain(|v| v.id != variant.id);
            if entry.variants.is_empty() {
                self.entries.remove(index);
                debug!(product = %product.title, "last variant removed, product deselected");
            }
            false
        } else {
            entry.variants.push(variant.clone());
            true
        }
    }

    /// Whether an entry exists for `product`, however many variants it holds.
    #[must_use]
    pub fn is_product_selected(&self, product: &Product) -> bool {
        self.position(product).is_some()
    }

    /// Whether `variant` is checked under `product`'s entry.
    #[must_use]
    pub fn is_variant_selected(&self, product: &Product, variant: VariantId) -> bool {
        self.entries
            .iter()
            .find(|e| self.matches(e, product))
            .is_some_and(|e| e.has_variant(variant))
    }

    /// Number of selected products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    /// Consume the set, yielding entries in selection order.
    #[must_use]
    pub fn into_entries(self) -> Vec<SelectionEntry> {
        self.entries
    }
}
