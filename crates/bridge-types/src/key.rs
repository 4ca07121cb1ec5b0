//! Key validation.
//!
//! Keys are `&str`, so a missing key cannot be expressed at all. What
//! remains to check is the content of the key, which depends on the
//! configured [`KeyPolicy`]:
//!
//! - `Strict` (default): the key must be non-empty
//! - `Lenient`: any string is accepted, including the empty string

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, BridgeResult};

/// How strictly container keys are validated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPolicy {
    /// Reject empty keys with [`BridgeError::InvalidArgument`].
    #[default]
    Strict,
    /// Accept every key.
    Lenient,
}

impl KeyPolicy {
    /// Validate a key, returning `Ok(())` if the policy accepts it.
    ///
    /// # Examples
    ///
    /// ```
    /// use bridge_types::KeyPolicy;
    ///
    /// assert!(KeyPolicy::Strict.validate("name").is_ok());
    /// assert!(KeyPolicy::Strict.validate("").is_err());
    /// assert!(KeyPolicy::Lenient.validate("").is_ok());
    /// ```
    pub fn validate(&self, key: &str) -> BridgeResult<()> {
        match self {
            Self::Strict if key.is_empty() => Err(BridgeError::InvalidArgument(
                "key must not be empty".into(),
            )),
            _ => Ok(()),
        }
    }
}
