//! Snowflake identifier newtypes.
//!
//! Identifiers are persisted as decimal strings so a state file written by
//! older versions of the bot loads unchanged. Plain JSON numbers are accepted
//! on input as well.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

struct SnowflakeVisitor(&'static str);

impl Visitor<'_> for SnowflakeVisitor {
    type Value = u64;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "a {} as a decimal string or integer", self.0)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<u64, E> {
        Ok(value)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<u64, E> {
        u64::try_from(value).map_err(|_| E::custom(format!("negative {}: {}", self.0, value)))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<u64, E> {
        value
            .trim()
            .parse()
            .map_err(|_| E::custom(format!("invalid {}: {:?}", self.0, value)))
    }
}

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            derive_more::Display,
            derive_more::From,
        )]
        #[display("{}", _0)]
        pub struct $name(u64);

        impl $name {
            #[doc = concat!("Wrap a raw ", $label, ".")]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            #[doc = concat!("The raw ", $label, " value.")]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer
                    .deserialize_any(SnowflakeVisitor($label))
                    .map(Self)
            }
        }
    };
}

snowflake_id!(
    /// Identifier of a server (guild).
    ServerId,
    "server id"
);
snowflake_id!(
    /// Identifier of a channel.
    ChannelId,
    "channel id"
);
snowflake_id!(
    /// Identifier of a message.
    MessageId,
    "message id"
);
snowflake_id!(
    /// Identifier of a user.
    UserId,
    "user id"
);
snowflake_id!(
    /// Identifier of a role.
    RoleId,
    "role id"
);
