//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a member (the owner of a point account).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(Uuid);

/// Identifier of a delivered message (used for de-duplication by consumers).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

macro_rules! impl_uuid_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::from_str(s)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(uuid))
            }
        }
    };
}

impl_uuid_newtype!(MemberId, "MemberId");
impl_uuid_newtype!(EventId, "EventId");

/// Business serial number of an order ("order sn").
///
/// Order serial numbers are issued by the order module, so they are opaque
/// strings here. The only rule enforced is that they are not blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderSn(String);

impl OrderSn {
    pub fn new(sn: impl Into<String>) -> Result<Self, DomainError> {
        let sn = sn.into();
        if sn.trim().is_empty() {
            return Err(DomainError::invalid_id("OrderSn: must not be blank"));
        }
        Ok(Self(sn))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for OrderSn {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for OrderSn {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OrderSn> for String {
    fn from(value: OrderSn) -> Self {
        value.0
    }
}

impl FromStr for OrderSn {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_id_round_trips_through_display_and_parse() {
        let id = MemberId::new();
        let parsed: MemberId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn member_id_parse_failure_names_the_type() {
        let err = "not-a-uuid".parse::<MemberId>().unwrap_err();
        match err {
            DomainError::InvalidId(msg) if msg.starts_with("MemberId") => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_order_sn_is_rejected() {
        assert!(OrderSn::new("   ").is_err());
        assert!(serde_json::from_str::<OrderSn>("\"\"").is_err());
    }

    #[test]
    fn order_sn_serializes_as_plain_string() {
        let sn = OrderSn::new("O202407030001").unwrap();
        assert_eq!(serde_json::to_string(&sn).unwrap(), "\"O202407030001\"");
    }
}
