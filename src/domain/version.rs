//! Server version parsing and the password dialect gate.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Unrecognised server version: {0}")]
pub struct ParseVersionError(String);

/// `major.minor.patch` of a running server, ordered numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServerVersion {
    major: u32,
    minor: u32,
    patch: u32,
}

/// `ALTER USER ... IDENTIFIED BY` replaced `SET PASSWORD` in this release.
pub const ALTER_USER_MIN_VERSION: ServerVersion = ServerVersion::new(5, 7, 6);

impl ServerVersion {
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for ServerVersion {
    type Err = ParseVersionError;

    /// Accepts vendor suffixes such as `5.7.44-log` or `8.0.36-0ubuntu0.22.04.1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"^\s*(\d+)\.(\d+)(?:\.(\d+))?").expect("Invalid regex")
        });

        let caps = re.captures(s).ok_or_else(|| ParseVersionError(s.to_string()))?;
        let part = |idx: usize| -> Result<u32, ParseVersionError> {
            caps.get(idx).map_or(Ok(0), |m| {
                m.as_str()
                    .parse()
                    .map_err(|_| ParseVersionError(s.to_string()))
            })
        };

        Ok(Self::new(part(1)?, part(2)?, part(3)?))
    }
}

/// SQL form used to rotate a stored password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordDialect {
    /// `SET PASSWORD FOR ... = PASSWORD(...)`
    Legacy,
    /// `ALTER USER ... IDENTIFIED BY ...`
    Modern,
}

#[must_use]
pub fn select_password_dialect(server_version: &ServerVersion) -> PasswordDialect {
    if *server_version < ALTER_USER_MIN_VERSION {
        PasswordDialect::Legacy
    } else {
        PasswordDialect::Modern
    }
}
