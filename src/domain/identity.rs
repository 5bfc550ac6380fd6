//! External identifier of a MySQL account, always `name@host`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::services::user_service::UserError;

/// Canonical handle for a live account.
///
/// Derived only from `(name, host)`; credentials and auth plugin never take part.
///
/// # Examples
///
/// ```rust
/// use mysql_user_controller::domain::EntityIdentifier;
///
/// let id: EntityIdentifier = "alice@10.0.0.1".parse().unwrap();
/// assert_eq!(id.name(), "alice");
/// assert_eq!(id.host(), "10.0.0.1");
/// assert_eq!(id.to_string(), "alice@10.0.0.1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityIdentifier {
    name: String,
    host: String,
}

impl EntityIdentifier {
    #[must_use]
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
        }
    }

    #[must_use]
    pub fn encode(name: &str, host: &str) -> String {
        format!("{name}@{host}")
    }

    /// Splits on the first `@` only; everything after it belongs to the host.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Format`] when the input has no `@`.
    pub fn decode(id: &str) -> Result<(String, String), UserError> {
        match id.split_once('@') {
            Some((name, host)) => Ok((name.to_string(), host.to_string())),
            None => Err(UserError::Format(format!(
                "Error parsing id, unable to import: {id}. Must be in format USER@HOST."
            ))),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }
}

impl fmt::Display for EntityIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Self::encode(&self.name, &self.host))
    }
}

impl FromStr for EntityIdentifier {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, host) = Self::decode(s)?;
        Ok(Self { name, host })
    }
}

impl TryFrom<String> for EntityIdentifier {
    type Error = UserError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntityIdentifier> for String {
    fn from(id: EntityIdentifier) -> Self {
        id.to_string()
    }
}
