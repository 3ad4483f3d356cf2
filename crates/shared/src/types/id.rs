//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `ContactId` where a
//! `WalletId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(CompanyId, "Unique identifier for a company (tenant).");
typed_id!(ApiKeyId, "Unique identifier for an API key.");
typed_id!(ContactId, "Unique identifier for a contact (rider or driver).");
typed_id!(WalletId, "Unique identifier for a wallet.");
typed_id!(LedgerEntryId, "Unique identifier for a wallet ledger entry.");
typed_id!(DocumentId, "Unique identifier for an accounting document.");
typed_id!(RideId, "Unique identifier for a ride record.");
typed_id!(SubscriptionId, "Unique identifier for a subscription.");
typed_id!(AccountId, "Unique identifier for a chart-of-accounts entry.");
typed_id!(JournalId, "Unique identifier for a journal.");
typed_id!(ProductId, "Unique identifier for a product.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_ids_are_distinct_types() {
        // Compile-time property: this only builds because the types differ.
        fn takes_wallet(_: WalletId) {}
        takes_wallet(WalletId::new());
    }

    #[test]
    fn test_id_roundtrip_via_str() {
        let id = ContactId::new();
        let parsed = ContactId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_v7_ids_are_time_ordered() {
        let a = LedgerEntryId::new();
        let b = LedgerEntryId::new();
        assert!(a.into_inner() <= b.into_inner());
    }
}
