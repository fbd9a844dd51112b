//! Strongly-typed identifiers
//!
//! Newtype wrappers around UUIDs keep template, entry and ledger identities
//! from being mixed up. Template identity is what binds an account number to
//! the chart it may join, so two templates with the same layout still carry
//! different ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new time-ordered identifier
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wraps an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Display prefix, e.g. `TPL`
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid_str = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(Uuid::parse_str(uuid_str)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

define_id!(TemplateId, "TPL");
define_id!(JournalEntryId, "JNL");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_id_display() {
        let id = TemplateId::new();
        assert!(id.to_string().starts_with("TPL-"));
    }

    #[test]
    fn test_entry_ids_are_time_ordered() {
        let first = JournalEntryId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = JournalEntryId::new();
        assert!(first < second);
    }
}
