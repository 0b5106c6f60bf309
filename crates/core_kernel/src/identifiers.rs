//! Strongly-typed identifiers for domain entities
//!
//! Persisted records are keyed by database-assigned sequential integers.
//! Wrapping them in newtypes keeps a bill key from being mixed up with any
//! other integer (a sequence number, a count, a prefix).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! define_numeric_id {
    ($name:ident, $entity:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps an existing key
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the underlying key
            pub const fn value(&self) -> i64 {
                self.0
            }

            /// Returns the entity name used in error messages
            pub fn entity() -> &'static str {
                $entity
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

// Billing domain identifiers
define_numeric_id!(BillId, "Bill");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_id_display() {
        assert_eq!(BillId::new(42).to_string(), "42");
    }

    #[test]
    fn test_bill_id_ordering_follows_key() {
        assert!(BillId::new(1) < BillId::new(2));
    }
}
