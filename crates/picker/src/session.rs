//! Transient state of one open picker modal.

use std::time::{Duration, Instant};

use product_picker_core::RowId;

use crate::search::Debouncer;
use crate::selection::SelectionSet;

/// Everything the modal owns while open. Dropped on commit or cancel.
#[derive(Debug, Clone)]
pub struct ModalSession {
    row_id: RowId,
    input: String,
    debouncer: Debouncer<String>,
    selection: SelectionSet,
}

impl ModalSession {
    pub(crate) const fn new(row_id: RowId, selection: SelectionSet, debounce: Duration) -> Self {
        Self {
            row_id,
            input: String::new(),
            debouncer: Debouncer::new(debounce),
            selection,
        }
    }

    /// Row the modal was opened for.
    #[must_use]
    pub const fn row_id(&self) -> &RowId {
        &self.row_id
    }

    /// Raw contents of the search box.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub(crate) fn selection_mut(&mut self) -> &mut SelectionSet {
        &mut self.selection
    }

    /// When the pending keystroke will trigger a search.
    #[must_use]
    pub fn search_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub(crate) fn record_input(&mut self, term: String, now: Instant) {
        self.input.clone_from(&term);
        self.debouncer.push(term, now);
    }

    pub(crate) fn take_settled_input(&mut self, now: Instant) -> Option<String> {
        self.debouncer.poll(now)
    }

    pub(crate) fn into_selection(self) -> SelectionSet {
        self.selection
    }
}
