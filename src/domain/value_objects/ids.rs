//! Strongly-typed identifiers for encounter entities, plus id generation
//!
//! Identifiers are strings because persisted snapshots carry whatever ids the
//! previous session generated (timestamps, timestamp + random suffix, ...).

use rand::Rng;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh, collision-resistant id
            pub fn new() -> Self {
                Self(generate_unique_id())
            }

            pub fn from_string(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
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

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }
    };
}

define_id!(CharacterId);
define_id!(BossId);
define_id!(GroupId);
define_id!(AttackId);
define_id!(TemplateId);

const BASE36_DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Current time in milliseconds since the Unix epoch
pub fn current_timestamp_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Stringified current timestamp
pub fn generate_id() -> String {
    current_timestamp_millis().to_string()
}

/// Stringified current timestamp shifted by `offset_ms`
///
/// Used to give entries created in the same millisecond distinct ids.
pub fn generate_id_with_offset(offset_ms: i64) -> String {
    (current_timestamp_millis() + offset_ms).to_string()
}

/// `<timestamp>-<random base36 fragment>`, safe for same-millisecond calls
pub fn generate_unique_id() -> String {
    let mut rng = rand::thread_rng();
    let fragment: String = (0..9)
        .map(|_| BASE36_DIGITS[rng.gen_range(0..BASE36_DIGITS.len())] as char)
        .collect();
    format!("{}-{}", current_timestamp_millis(), fragment)
}
