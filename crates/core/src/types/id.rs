//! Newtype IDs for type-safe entity references.
//!
//! Shopify REST resources are keyed by unsigned 64-bit integers. Use the
//! `define_id!` macro to create wrappers that prevent accidentally mixing IDs
//! from different entity types.

use std::str::FromStr;

use thiserror::Error;

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `u64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_u64()`
/// - `From<u64>` and `Into<u64>` implementations
///
/// # Example
///
/// ```rust
/// # use prazo_core::define_id;
/// define_id!(ShipmentId);
/// define_id!(ParcelId);
///
/// let shipment = ShipmentId::new(1);
/// let parcel = ParcelId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: ShipmentId = parcel;
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
        pub struct $name(u64);

        impl $name {
            /// Create a new ID from a u64 value.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the underlying u64 value.
            #[must_use]
            pub const fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(OrderId);
define_id!(CustomerId);
define_id!(FulfillmentId);
define_id!(LineItemId);

/// Prefix of Shopify global IDs for orders.
const ORDER_GID_PREFIX: &str = "gid://shopify/Order/";

/// Rejection reasons for a caller-supplied order identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderIdError {
    #[error("order id is empty")]
    Empty,
    #[error("order id must be numeric, got {0:?}")]
    NotNumeric(String),
    #[error("order id out of range: {0}")]
    OutOfRange(String),
}

impl FromStr for OrderId {
    type Err = OrderIdError;

    /// Parse a caller-supplied order id.
    ///
    /// Accepts a bare numeric id (`"5551234567"`) or an order global id
    /// (`"gid://shopify/Order/5551234567"`).
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(OrderIdError::Empty);
        }

        let digits = trimmed.strip_prefix(ORDER_GID_PREFIX).unwrap_or(trimmed);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OrderIdError::NotNumeric(trimmed.to_string()));
        }

        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|_| OrderIdError::OutOfRange(trimmed.to_string()))
    }
}
