//! Desired state of a single MySQL account.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::mysql::DEFAULT_HOST;
use crate::domain::EntityIdentifier;
use crate::services::user_service::UserError;

/// External authentication mechanisms an account can be delegated to.
///
/// An account with a plugin never carries a stored password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthPlugin {
    #[serde(rename = "AWSAuthenticationPlugin")]
    AwsAuthentication,
    #[serde(rename = "mysql_no_login")]
    NoLogin,
}

impl AuthPlugin {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AwsAuthentication => "AWSAuthenticationPlugin",
            Self::NoLogin => "mysql_no_login",
        }
    }

    /// Trailing `IDENTIFIED WITH` clause for `CREATE USER`.
    #[must_use]
    pub const fn identified_with(&self) -> &'static str {
        match self {
            Self::AwsAuthentication => " IDENTIFIED WITH AWSAuthenticationPlugin as 'RDS'",
            Self::NoLogin => " IDENTIFIED WITH mysql_no_login",
        }
    }
}

impl fmt::Display for AuthPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthPlugin {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AWSAuthenticationPlugin" => Ok(Self::AwsAuthentication),
            "mysql_no_login" => Ok(Self::NoLogin),
            other => Err(UserError::Validation(format!(
                "Unsupported auth plugin '{other}', expected AWSAuthenticationPlugin or mysql_no_login"
            ))),
        }
    }
}

/// Where the password for a statement comes from, resolved once per operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Plaintext(String),
    /// Deprecated `password` attribute.
    Legacy(String),
    None,
}

impl Credential {
    /// Secret to embed; an absent credential yields an empty password.
    #[must_use]
    pub fn secret(&self) -> &str {
        match self {
            Self::Plaintext(secret) | Self::Legacy(secret) => secret,
            Self::None => "",
        }
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSpec {
    pub name: String,
    pub host: String,
    pub plaintext_password: Option<String>,
    pub legacy_password: Option<String>,
    pub auth_plugin: Option<AuthPlugin>,
}

impl UserSpec {
    /// A spec for `name` on the default host with no credential.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: DEFAULT_HOST.to_string(),
            plaintext_password: None,
            legacy_password: None,
            auth_plugin: None,
        }
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn with_plaintext_password(mut self, password: impl Into<String>) -> Self {
        self.plaintext_password = Some(password.into());
        self
    }

    #[must_use]
    pub fn with_legacy_password(mut self, password: impl Into<String>) -> Self {
        self.legacy_password = Some(password.into());
        self
    }

    #[must_use]
    pub fn with_auth_plugin(mut self, plugin: AuthPlugin) -> Self {
        self.auth_plugin = Some(plugin);
        self
    }

    #[must_use]
    pub fn identifier(&self) -> EntityIdentifier {
        EntityIdentifier::new(self.name.clone(), self.host.clone())
    }

    /// Credential for account creation: plaintext wins over the legacy field.
    #[must_use]
    pub fn credential(&self) -> Credential {
        match (&self.plaintext_password, &self.legacy_password) {
            (Some(pw), _) if !pw.is_empty() => Credential::Plaintext(pw.clone()),
            (_, Some(pw)) => Credential::Legacy(pw.clone()),
            (Some(pw), None) => Credential::Plaintext(pw.clone()),
            (None, None) => Credential::None,
        }
    }

    /// Checks field combinations that must never reach the server.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Validation`] for an empty user name, or for IAM
    /// authentication bound to `localhost`.
    pub fn validate(&self) -> Result<(), UserError> {
        if self.name.is_empty() {
            return Err(UserError::Validation(
                "User name must not be empty".to_string(),
            ));
        }

        if self.auth_plugin == Some(AuthPlugin::AwsAuthentication) && self.host == DEFAULT_HOST {
            return Err(UserError::Validation(
                "cannot use IAM auth against localhost".to_string(),
            ));
        }

        Ok(())
    }
}
