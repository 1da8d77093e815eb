//! Per-row discount attached to a picked product.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    /// Percentage off ("% Off").
    #[default]
    Percent,
    /// Fixed amount off ("flat Off").
    Flat,
}

impl DiscountKind {
    /// Wire name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percent => "percent",
            Self::Flat => "flat",
        }
    }
}

impl fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown discount kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid discount type: {0} (expected `percent` or `flat`)")]
pub struct ParseDiscountKindError(String);

impl FromStr for DiscountKind {
    type Err = ParseDiscountKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "percent" | "%" => Ok(Self::Percent),
            "flat" => Ok(Self::Flat),
            other => Err(ParseDiscountKindError(other.to_string())),
        }
    }
}

/// Discount sub-state of a row.
///
/// `value` is the raw text the merchant typed; it is never validated here.
/// `value` and `kind` are kept while the discount is disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Discount {
    pub enabled: bool,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: DiscountKind,
}

impl Discount {
    /// The disabled default: `{enabled: false, value: "", type: percent}`.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Parse `value` as a decimal amount.
    #[must_use]
    pub fn amount(&self) -> Option<Decimal> {
        self.value.trim().parse().ok()
    }

    /// Price after applying this discount, clamped at zero.
    ///
    /// Returns `None` when the discount is disabled, its value does not
    /// parse, or the arithmetic overflows.
    #[must_use]
    pub fn apply(&self, price: Decimal) -> Option<Decimal> {
        if !self.enabled {
            return None;
        }
        let amount = self.amount()?;
        let discounted = match self.kind {
            DiscountKind::Percent => Decimal::ONE_HUNDRED
                .checked_sub(amount)
                .and_then(|rest| price.checked_mul(rest))
                .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))?,
            DiscountKind::Flat => price.checked_sub(amount)?,
        };
        Some(discounted.max(Decimal::ZERO))
    }
}
