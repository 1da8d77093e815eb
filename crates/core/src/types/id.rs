//! Newtype IDs for type-safe entity references.
//!
//! Backend identifiers use the `define_id!` macro so product and variant IDs
//! cannot be mixed up. Row identifiers are local to a picker list and are
//! handed out by an [`IdGenerator`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>` and `Into<i64>` implementations
///
/// # Example
///
/// ```rust
/// # use product_picker_core::define_id;
/// define_id!(ProductId);
/// define_id!(VariantId);
///
/// let product_id = ProductId::new(1);
/// let variant_id = VariantId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = variant_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Backend-assigned identifiers
define_id!(ProductId);
define_id!(VariantId);

/// Locally assigned identifier of a picker row.
///
/// Unrelated to backend product identity. Unique for the lifetime of the
/// list it belongs to and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    /// Create a row ID from any string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Source of fresh row identifiers.
///
/// Injected into the row list so tests can use a deterministic sequence.
pub trait IdGenerator {
    /// Produce an identifier that has never been returned before.
    fn next_row_id(&mut self) -> RowId;
}

/// Monotonic counter producing `row-1`, `row-2`, ...
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Create a counter starting at `row-1`.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }
}

impl IdGenerator for SequentialIds {
    fn next_row_id(&mut self) -> RowId {
        self.next += 1;
        RowId(format!("row-{}", self.next))
    }
}

/// Random UUID v4 row identifiers, prefixed with `row-`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_row_id(&mut self) -> RowId {
        RowId(format!("row-{}", uuid::Uuid::new_v4().simple()))
    }
}
