//! Picker controller: the single owner of the row list and the modal.
//!
//! # Flow
//!
//! 1. [`PickerController::open_picker`] targets a row and issues the initial
//!    (empty-term) search
//! 2. Keystrokes go through [`PickerController::type_search`]; once the quiet
//!    period elapses [`PickerController::poll_search`] issues the search
//! 3. Scrolling issues next-page requests via [`PickerController::scroll`]
//! 4. Toggles accumulate in the session's selection
//! 5. [`PickerController::commit`] splices the selection into the row list and
//!    closes the modal; [`PickerController::close_picker`] cancels
//!
//! Requests can be driven two ways: hand them to the port yourself and feed
//! the outcome to [`PickerController::apply_page`], or let
//! [`PickerController::fetch_page`] / [`PickerController::flush_search`] await
//! the port directly.

use std::collections::HashMap;
use std::time::Instant;

use product_picker_core::{
    Discount, IdGenerator, Product, ProductId, RowEntry, RowId, Variant, VariantId,
};
use tracing::{debug, info, instrument};

use crate::config::PickerSettings;
use crate::discount::{DiscountAction, DiscountEditor};
use crate::rows::ProductRowList;
use crate::search::{
    PageOutcome, PageRequest, ProductSearchPort, ScrollViewport, SearchError, SearchResultCache,
};
use crate::selection::SelectionSet;
use crate::session::ModalSession;

/// Orchestrates rows, discounts, search, and selection.
#[derive(Debug)]
pub struct PickerController<P, G> {
    port: P,
    settings: PickerSettings,
    rows: ProductRowList<G>,
    cache: SearchResultCache,
    session: Option<ModalSession>,
    /// Per-variant editors; never written back to the row list.
    variant_discounts: HashMap<(RowId, VariantId), DiscountEditor>,
}

impl<P: ProductSearchPort, G: IdGenerator> PickerController<P, G> {
    /// A controller whose list starts with one blank row.
    pub fn new(port: P, ids: G, settings: PickerSettings) -> Self {
        Self {
            port,
            settings,
            rows: ProductRowList::new(ids),
            cache: SearchResultCache::new(settings.page_limit),
            session: None,
            variant_discounts: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn rows(&self) -> &ProductRowList<G> {
        &self.rows
    }

    /// The injected search port.
    #[must_use]
    pub const fn port(&self) -> &P {
        &self.port
    }

    #[must_use]
    pub const fn settings(&self) -> &PickerSettings {
        &self.settings
    }

    // =========================================================================
    // Row list
    // =========================================================================

    /// "Add Product": append a blank row.
    pub fn add_row(&mut self) -> RowId {
        let id = self.rows.append_empty_row();
        debug!(row = %id, "row added");
        id
    }

    /// Drag-and-drop move of `from` onto `to`.
    pub fn reorder(&mut self, from: &RowId, to: &RowId) -> bool {
        self.rows.reorder(from, to)
    }

    // =========================================================================
    // Discounts
    // =========================================================================

    /// Editor seeded from the row's current discount.
    ///
    /// `None` for unknown rows and for placeholder rows, which have no
    /// discount controls.
    #[must_use]
    pub fn discount_editor(&self, row_id: &RowId) -> Option<DiscountEditor> {
        self.rows
            .get(row_id)
            .filter(|row| row.is_selected())
            .map(|row| DiscountEditor::from_discount(&row.discount))
    }

    /// Run a discount transition on a row and write the emitted discount
    /// straight into the row list.
    pub fn update_discount(&mut self, row_id: &RowId, action: DiscountAction) -> Option<Discount> {
        let mut editor = self.discount_editor(row_id)?;
        let discount = editor.apply(action)?;
        self.on_discount_change(row_id, discount.clone());
        Some(discount)
    }

    fn on_discount_change(&mut self, row_id: &RowId, discount: Discount) {
        debug!(
            row = %row_id,
            enabled = discount.enabled,
            value = %discount.value,
            kind = %discount.kind,
            "discount changed"
        );
        self.rows.set_discount(row_id, discount);
    }

    /// Editor for one variant line of a row, if one has been used.
    #[must_use]
    pub fn variant_discount(&self, row_id: &RowId, variant: VariantId) -> Option<&DiscountEditor> {
        self.variant_discounts.get(&(row_id.clone(), variant))
    }

    /// Run a discount transition on a variant line. Not propagated to the
    /// row list.
    pub fn update_variant_discount(
        &mut self,
        row_id: &RowId,
        variant: VariantId,
        action: DiscountAction,
    ) -> Option<Discount> {
        let row = self.rows.get(row_id).filter(|row| row.is_selected())?;
        if !row.variants.iter().any(|v| v.id == variant) {
            return None;
        }
        self.variant_discounts
            .entry((row_id.clone(), variant))
            .or_default()
            .apply(action)
    }

    // =========================================================================
    // Modal
    // =========================================================================

    /// Open the picker modal for `row_id` and issue the initial search.
    ///
    /// A row that already shows a product starts with that product selected.
    /// Any modal already open is discarded first. Returns `None` for an
    /// unknown row.
    pub fn open_picker(&mut self, row_id: &RowId) -> Option<PageRequest> {
        let row = self.rows.get(row_id)?;
        let selection = SelectionSet::preselected(self.settings.identity, row);
        if self.session.is_some() {
            self.close_picker();
        }
        debug!(row = %row_id, preselected = selection.len(), "picker opened");
        self.session = Some(ModalSession::new(
            row_id.clone(),
            selection,
            self.settings.debounce,
        ));
        Some(self.cache.begin_search(""))
    }

    #[must_use]
    pub const fn session(&self) -> Option<&ModalSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_picker_open(&self) -> bool {
        self.session.is_some()
    }

    /// The row the open modal will commit into.
    #[must_use]
    pub fn editing_row(&self) -> Option<&RowEntry> {
        self.session
            .as_ref()
            .and_then(|session| self.rows.get(session.row_id()))
    }

    /// Current search results in display order.
    #[must_use]
    pub fn results(&self) -> &[Product] {
        self.cache.results()
    }

    #[must_use]
    pub const fn search_cache(&self) -> &SearchResultCache {
        &self.cache
    }

    /// Record the search box contents at `now`.
    pub fn type_search(&mut self, term: impl Into<String>, now: Instant) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.record_input(term.into(), now);
        true
    }

    /// Issue the debounced search if its quiet period has elapsed.
    ///
    /// Nothing is issued when the settled term equals the term already shown.
    pub fn poll_search(&mut self, now: Instant) -> Option<PageRequest> {
        let term = self.session.as_mut()?.take_settled_input(now)?;
        if term == self.cache.term() {
            debug!(term = %term, "settled term unchanged, no search issued");
            return None;
        }
        Some(self.cache.begin_search(term))
    }

    /// Report the result list's scroll position.
    pub fn scroll(&mut self, viewport: ScrollViewport) -> Option<PageRequest> {
        if self.session.is_none() {
            return None;
        }
        self.cache.on_scroll(viewport, self.settings.scroll_threshold)
    }

    /// Hand back the outcome of a previously issued request.
    pub fn apply_page(
        &mut self,
        request: &PageRequest,
        outcome: Result<Vec<Product>, SearchError>,
    ) -> PageOutcome {
        self.cache.apply(request, outcome)
    }

    /// Await `request` on the search port and apply its outcome.
    #[instrument(skip(self, request), fields(seq = request.seq, term = %request.query.term, page = request.query.page))]
    pub async fn fetch_page(&mut self, request: PageRequest) -> PageOutcome {
        let outcome = self.port.search(&request.query).await;
        self.apply_page(&request, outcome)
    }

    /// Wait out the debounce window, then issue and fetch the settled search.
    ///
    /// Returns `None` if nothing was pending or the term did not change.
    pub async fn flush_search(&mut self) -> Option<PageOutcome> {
        let deadline = self.session.as_ref()?.search_deadline()?;
        tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        let request = self.poll_search(Instant::now())?;
        Some(self.fetch_page(request).await)
    }

    /// Toggle a whole search result. `None` when no modal is open.
    pub fn toggle_product(&mut self, product: &Product) -> Option<bool> {
        Some(self.session.as_mut()?.selection_mut().toggle_product(product))
    }

    /// Toggle one variant of a search result. `None` when no modal is open.
    pub fn toggle_variant(&mut self, product: &Product, variant: &Variant) -> Option<bool> {
        Some(
            self.session
                .as_mut()?
                .selection_mut()
                .toggle_variant(product, variant),
        )
    }

    /// Confirm the modal: splice the selection into the edited row.
    ///
    /// Returns `false` when no modal is open or its row no longer exists; the
    /// modal is closed either way.
    pub fn commit(&mut self) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        self.cache.reset();

        let row_id = session.row_id().clone();
        let previous = self.rows.get(&row_id).map(product_key);
        let entries = session.into_selection().into_entries();
        let count = entries.len();
        let spliced = self.rows.splice_selection(&row_id, entries);
        if spliced {
            self.prune_variant_discounts(&row_id, previous);
            info!(row = %row_id, products = count, rows = self.rows.len(), "selection committed");
        }
        spliced
    }

    /// Drop the row's variant editors unless the row still shows the same
    /// product and still lists the variant.
    fn prune_variant_discounts(
        &mut self,
        row_id: &RowId,
        previous: Option<(Option<ProductId>, String)>,
    ) {
        let kept: Vec<VariantId> = match self.rows.get(row_id) {
            Some(row) if Some(product_key(row)) == previous => {
                row.variants.iter().map(|v| v.id).collect()
            }
            _ => Vec::new(),
        };
        self.variant_discounts
            .retain(|(row, variant), _| row != row_id || kept.contains(variant));
    }

    /// Cancel the modal, discarding the selection and resetting search state.
    pub fn close_picker(&mut self) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        self.cache.reset();
        debug!(row = %session.row_id(), "picker closed");
        true
    }
}

fn product_key(row: &RowEntry) -> (Option<ProductId>, String) {
    (row.product_id, row.title.clone())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::time::Duration;

    use product_picker_core::{DiscountKind, SequentialIds};

    use super::*;
    use crate::search::InMemoryCatalog;

    fn product(id: i64, title: &str, variants: &[i64]) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            image: None,
            variants: variants
                .iter()
                .map(|v| Variant {
                    id: VariantId::new(*v),
                    title: format!("Variant {v}"),
                    price: Some("20".to_string()),
                    inventory_quantity: Some(5),
                })
                .collect(),
        }
    }

    fn controller(products: Vec<Product>) -> PickerController<InMemoryCatalog, SequentialIds> {
        PickerController::new(
            InMemoryCatalog::new(products),
            SequentialIds::new(),
            PickerSettings::default(),
        )
    }

    fn row(id: &str) -> RowId {
        RowId::from(id)
    }

    #[tokio::test]
    async fn test_open_issues_empty_search() {
        let mut picker = controller(vec![product(1, "Mug", &[10])]);
        let request = picker.open_picker(&row("row-1")).unwrap();
        assert_eq!(request.query.term, "");
        assert_eq!(request.query.page, 1);

        let outcome = picker.fetch_page(request).await;
        assert_eq!(outcome, PageOutcome::Replaced { count: 1 });
        assert_eq!(picker.results().len(), 1);
        assert!(picker.editing_row().is_some());
    }

    #[test]
    fn test_open_unknown_row() {
        let mut picker = controller(Vec::new());
        assert!(picker.open_picker(&row("row-9")).is_none());
        assert!(!picker.is_picker_open());
    }

    #[tokio::test]
    async fn test_commit_single_product() {
        let mug = product(1, "Mug", &[10, 11]);
        let mut picker = controller(vec![mug.clone()]);
        let request = picker.open_picker(&row("row-1")).unwrap();
        picker.fetch_page(request).await;

        assert_eq!(picker.toggle_product(&mug), Some(true));
        assert!(picker.commit());

        let committed = picker.rows().get(&row("row-1")).unwrap();
        assert_eq!(committed.title, "Mug");
        assert_eq!(committed.product_id, Some(ProductId::new(1)));
        assert_eq!(committed.variants.len(), 2);
        assert!(!picker.is_picker_open());
        assert!(picker.results().is_empty());
    }

    #[test]
    fn test_cancel_discards_selection() {
        let mug = product(1, "Mug", &[10]);
        let mut picker = controller(vec![mug.clone()]);
        picker.open_picker(&row("row-1"));
        picker.toggle_product(&mug);

        assert!(picker.close_picker());
        assert!(!picker.rows().get(&row("row-1")).unwrap().is_selected());
        assert!(picker.toggle_product(&mug).is_none());
        assert!(!picker.commit());
    }

    #[test]
    fn test_reopen_preselects_committed_product() {
        let mug = product(1, "Mug", &[10, 11]);
        let mut picker = controller(vec![mug.clone()]);
        picker.open_picker(&row("row-1"));
        picker.toggle_variant(&mug, &mug.variants[1]);
        picker.commit();

        picker.open_picker(&row("row-1"));
        let selection = picker.session().unwrap().selection();
        assert!(selection.is_product_selected(&mug));
        assert!(selection.is_variant_selected(&mug, VariantId::new(11)));
        assert!(!selection.is_variant_selected(&mug, VariantId::new(10)));
    }

    #[test]
    fn test_discount_requires_selected_row() {
        let mut picker = controller(Vec::new());
        assert!(picker.discount_editor(&row("row-1")).is_none());
        assert!(picker.update_discount(&row("row-1"), DiscountAction::Add).is_none());
        assert!(picker.update_discount(&row("row-7"), DiscountAction::Add).is_none());
    }

    #[test]
    fn test_discount_updates_row_synchronously() {
        let mug = product(1, "Mug", &[10]);
        let mut picker = controller(vec![mug.clone()]);
        picker.open_picker(&row("row-1"));
        picker.toggle_product(&mug);
        picker.commit();

        let target = row("row-1");
        picker.update_discount(&target, DiscountAction::Add);
        picker.update_discount(&target, DiscountAction::SetValue("15".to_string()));
        assert_eq!(picker.rows().get(&target).unwrap().discount.value, "15");

        picker.update_discount(&target, DiscountAction::SetKind(DiscountKind::Flat));
        let removed = picker.update_discount(&target, DiscountAction::Remove).unwrap();
        assert_eq!(
            removed,
            Discount {
                enabled: false,
                value: String::new(),
                kind: DiscountKind::Flat,
            }
        );
        assert_eq!(picker.rows().get(&target).unwrap().discount, removed);
    }

    #[test]
    fn test_variant_discounts_are_detached() {
        let mug = product(1, "Mug", &[10, 11]);
        let mut picker = controller(vec![mug.clone()]);
        picker.open_picker(&row("row-1"));
        picker.toggle_product(&mug);
        picker.commit();

        let target = row("row-1");
        let emitted = picker
            .update_variant_discount(&target, VariantId::new(10), DiscountAction::Add)
            .unwrap();
        assert!(emitted.enabled);
        assert!(picker.variant_discount(&target, VariantId::new(10)).unwrap().is_active());
        assert!(!picker.rows().get(&target).unwrap().discount.enabled);
        assert!(
            picker
                .update_variant_discount(&target, VariantId::new(99), DiscountAction::Add)
                .is_none()
        );

        // Recommitting the same product keeps its variant editors.
        picker.update_variant_discount(
            &target,
            VariantId::new(10),
            DiscountAction::SetValue("3".to_string()),
        );
        picker.open_picker(&target);
        assert!(picker.commit());
        let kept = picker.variant_discount(&target, VariantId::new(10)).unwrap();
        assert_eq!(kept.value(), "3");

        // Unchecking a variant drops only that variant's editor.
        picker.update_variant_discount(&target, VariantId::new(11), DiscountAction::Add);
        picker.open_picker(&target);
        picker.toggle_variant(&mug, &mug.variants[1]);
        assert!(picker.commit());
        assert!(picker.variant_discount(&target, VariantId::new(10)).is_some());
        assert!(picker.variant_discount(&target, VariantId::new(11)).is_none());

        // Replacing the row's product drops its variant editors.
        let lamp = product(2, "Lamp", &[10]);
        picker.open_picker(&target);
        picker.toggle_product(&mug);
        picker.toggle_product(&lamp);
        assert!(picker.commit());
        assert!(picker.variant_discount(&target, VariantId::new(10)).is_none());
    }

    #[test]
    fn test_debounced_typing_issues_one_search() {
        let mut picker = controller(Vec::new());
        picker.open_picker(&row("row-1"));
        let start = Instant::now();

        picker.type_search("a", start);
        picker.type_search("ab", start + Duration::from_millis(100));
        picker.type_search("abc", start + Duration::from_millis(200));

        assert!(picker.poll_search(start + Duration::from_millis(450)).is_none());
        let request = picker
            .poll_search(start + Duration::from_millis(500))
            .unwrap();
        assert_eq!(request.query.term, "abc");
        assert!(picker.poll_search(start + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn test_settled_term_equal_to_current_issues_nothing() {
        let mut picker = controller(Vec::new());
        picker.open_picker(&row("row-1"));
        let start = Instant::now();

        picker.type_search("m", start);
        picker.type_search("", start + Duration::from_millis(50));
        assert!(picker.poll_search(start + Duration::from_millis(400)).is_none());
        assert_eq!(picker.session().unwrap().input(), "");
    }

    #[tokio::test]
    async fn test_flush_search_fetches_settled_term() {
        let mut picker = controller(vec![product(1, "Mug", &[]), product(2, "Lamp", &[])]);
        let request = picker.open_picker(&row("row-1")).unwrap();
        picker.fetch_page(request).await;
        assert_eq!(picker.results().len(), 2);

        picker.type_search("lamp", Instant::now());
        let outcome = picker.flush_search().await;
        assert_eq!(outcome, Some(PageOutcome::Replaced { count: 1 }));
        assert_eq!(picker.results()[0].title, "Lamp");
        assert!(picker.flush_search().await.is_none());
    }

    #[tokio::test]
    async fn test_response_after_close_is_stale() {
        let mut picker = controller(vec![product(1, "Mug", &[])]);
        let request = picker.open_picker(&row("row-1")).unwrap();
        picker.close_picker();

        assert_eq!(picker.fetch_page(request).await, PageOutcome::Stale);
        assert!(picker.results().is_empty());
    }

    #[test]
    fn test_scroll_requires_open_modal() {
        let mut picker = controller(Vec::new());
        let viewport = ScrollViewport {
            scroll_top: 100.0,
            client_height: 100.0,
            scroll_height: 200.0,
        };
        assert!(picker.scroll(viewport).is_none());
    }
}
