//! Request credentials and response types for the removal endpoint.

use std::fmt;

use serde::{Deserialize, Deserializer};

/// Browser session values copied from a logged-in help-site session.
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub session_id: String,
    pub steam_login: String,
    pub steam_login_secure: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("session_id", &"<redacted>")
            .field("steam_login", &"<redacted>")
            .field("steam_login_secure", &"<redacted>")
            .finish()
    }
}

/// The endpoint's `success` field.
///
/// The endpoint answers `true` on success but may answer a numeric code
/// (15 has been seen) on failure, so the field is never read as a plain
/// boolean. Only [`SuccessFlag::True`] means the package was removed.
#[derive(Debug, Clone, PartialEq)]
pub enum SuccessFlag {
    True,
    False,
    Code(i64),
    Other(String),
}

impl SuccessFlag {
    pub fn is_success(&self) -> bool {
        match self {
            SuccessFlag::True => true,
            SuccessFlag::False | SuccessFlag::Code(_) | SuccessFlag::Other(_) => false,
        }
    }
}

impl fmt::Display for SuccessFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuccessFlag::True => write!(f, "true"),
            SuccessFlag::False => write!(f, "false"),
            SuccessFlag::Code(code) => write!(f, "{code}"),
            SuccessFlag::Other(raw) => write!(f, "{raw}"),
        }
    }
}

impl<'de> Deserialize<'de> for SuccessFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::Bool(true) => SuccessFlag::True,
            serde_json::Value::Bool(false) => SuccessFlag::False,
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(code) => SuccessFlag::Code(code),
                None => SuccessFlag::Other(n.to_string()),
            },
            other => SuccessFlag::Other(other.to_string()),
        })
    }
}

/// Removal response body (internal). Other fields are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct RemovalResponse {
    #[serde(default)]
    pub success: Option<SuccessFlag>,
}
