//! One line of the product picker.

use serde::{Deserialize, Serialize};

use super::discount::Discount;
use super::id::{ProductId, RowId};
use super::product::{ProductImage, Variant};

/// A row in the picker list.
///
/// An empty `title` marks an unselected placeholder row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowEntry {
    pub id: RowId,
    /// Backend product chosen for this row, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    pub title: String,
    #[serde(default)]
    pub image: Option<ProductImage>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    /// Missing discounts deserialize as disabled.
    #[serde(default)]
    pub discount: Discount,
}

impl RowEntry {
    /// A blank placeholder row with a disabled discount.
    #[must_use]
    pub fn placeholder(id: RowId) -> Self {
        Self {
            id,
            product_id: None,
            title: String::new(),
            image: None,
            variants: Vec::new(),
            discount: Discount::disabled(),
        }
    }

    /// Whether a product has been chosen for this row.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        !self.title.is_empty()
    }

    /// Whether the row has variants to show.
    #[must_use]
    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }
}
