//! Discount editor state machine.
//!
//! Each row (and each variant line) owns a [`DiscountEditor`]. Every
//! transition returns the [`Discount`] it emits so the owner can forward it
//! synchronously; events that are not valid in the current state are ignored
//! and emit nothing.
//!
//! ```text
//!            add                 set_value / set_kind
//!   Hidden ───────▶ Active ◀──────────────────────────┐
//!     ▲               │ └────────────────────────────┘
//!     └───────────────┘
//!           remove
//! ```

use product_picker_core::{Discount, DiscountKind};
use tracing::debug;

/// Whether the discount controls are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountState {
    /// No discount UI, `enabled = false`.
    Hidden,
    /// Value and type controls shown, `enabled = true`.
    Active,
}

/// An input event for a [`DiscountEditor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscountAction {
    /// "Add Discount" pressed.
    Add,
    /// Value field edited. Stored verbatim.
    SetValue(String),
    /// Type selector changed.
    SetKind(DiscountKind),
    /// Remove ("×") pressed.
    Remove,
}

/// Discount sub-state for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountEditor {
    state: DiscountState,
    value: String,
    kind: DiscountKind,
}

impl Default for DiscountEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscountEditor {
    /// A hidden editor with an empty value and the `percent` type.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: DiscountState::Hidden,
            value: String::new(),
            kind: DiscountKind::Percent,
        }
    }

    /// Seed an editor from a row's current discount.
    ///
    /// The editor starts `Active` iff the discount is enabled.
    #[must_use]
    pub fn from_discount(discount: &Discount) -> Self {
        let state = if discount.enabled {
            DiscountState::Active
        } else {
            DiscountState::Hidden
        };
        Self {
            state,
            value: discount.value.clone(),
            kind: discount.kind,
        }
    }

    #[must_use]
    pub const fn state(&self) -> DiscountState {
        self.state
    }

    /// Whether the value/type controls are visible.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, DiscountState::Active)
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub const fn kind(&self) -> DiscountKind {
        self.kind
    }

    /// `Hidden → Active`: clears the value and resets the type to `percent`.
    pub fn add(&mut self) -> Option<Discount> {
        if self.is_active() {
            return None;
        }
        self.state = DiscountState::Active;
        self.value.clear();
        self.kind = DiscountKind::Percent;
        Some(self.emit())
    }

    /// `Active → Active`: stores `value` verbatim.
    pub fn set_value(&mut self, value: impl Into<String>) -> Option<Discount> {
        if !self.is_active() {
            return None;
        }
        self.value = value.into();
        Some(self.emit())
    }

    /// `Active → Active`: changes the type, keeping the value.
    pub fn set_kind(&mut self, kind: DiscountKind) -> Option<Discount> {
        if !self.is_active() {
            return None;
        }
        self.kind = kind;
        Some(self.emit())
    }

    /// `Active → Hidden`: clears the value but keeps the type.
    pub fn remove(&mut self) -> Option<Discount> {
        if !self.is_active() {
            return None;
        }
        self.state = DiscountState::Hidden;
        self.value.clear();
        Some(self.emit())
    }

    /// Dispatch an action to the matching transition.
    pub fn apply(&mut self, action: DiscountAction) -> Option<Discount> {
        let emitted = match action {
            DiscountAction::Add => self.add(),
            DiscountAction::SetValue(value) => self.set_value(value),
            DiscountAction::SetKind(kind) => self.set_kind(kind),
            DiscountAction::Remove => self.remove(),
        };
        if emitted.is_none() {
            debug!(state = ?self.state, "discount action ignored in current state");
        }
        emitted
    }

    /// Current sub-state as a [`Discount`].
    #[must_use]
    pub fn to_discount(&self) -> Discount {
        self.emit()
    }

    fn emit(&self) -> Discount {
        Discount {
            enabled: self.is_active(),
            value: self.value.clone(),
            kind: self.kind,
        }
    }
}
