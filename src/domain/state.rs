//! Per-invocation resource record: desired spec, change flags and identifier.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{AuthPlugin, EntityIdentifier, UserSpec};

/// Lowercase hex SHA-256 of a secret, stored in place of the secret itself.
#[must_use]
pub fn hash_sum(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Which attributes differ from the last persisted state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub name: bool,
    pub host: bool,
    pub plaintext_password: bool,
    pub legacy_password: bool,
    pub auth_plugin: bool,
}

impl ChangeSet {
    /// Compares a desired spec with persisted state; secrets are compared by digest.
    #[must_use]
    pub fn between(prior: &PersistedUser, desired: &UserSpec) -> Self {
        Self {
            name: prior.user != desired.name,
            host: prior.host != desired.host,
            plaintext_password: prior.plaintext_password
                != desired.plaintext_password.as_deref().map(hash_sum),
            legacy_password: prior.password != desired.legacy_password.as_deref().map(hash_sum),
            auth_plugin: prior.auth_plugin != desired.auth_plugin,
        }
    }

    /// Name, host and auth plugin cannot change in place.
    #[must_use]
    pub const fn requires_replacement(&self) -> bool {
        self.name || self.host || self.auth_plugin
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.name
            || self.host
            || self.plaintext_password
            || self.legacy_password
            || self.auth_plugin)
    }
}

/// State as written back to the desired-state store. Secrets appear only as digests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedUser {
    pub id: Option<EntityIdentifier>,
    pub user: String,
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plaintext_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_plugin: Option<AuthPlugin>,
}

impl From<&PersistedUser> for UserSpec {
    /// Digests cannot be reversed, so no secrets are restored.
    fn from(state: &PersistedUser) -> Self {
        Self {
            name: state.user.clone(),
            host: state.host.clone(),
            plaintext_password: None,
            legacy_password: None,
            auth_plugin: state.auth_plugin,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserResource {
    pub spec: UserSpec,
    pub changes: ChangeSet,
    id: Option<EntityIdentifier>,
}

impl UserResource {
    /// A resource that does not exist yet.
    #[must_use]
    pub fn new(spec: UserSpec) -> Self {
        Self {
            spec,
            changes: ChangeSet::default(),
            id: None,
        }
    }

    /// A resource previously recorded under `id`.
    #[must_use]
    pub fn existing(spec: UserSpec, id: EntityIdentifier) -> Self {
        Self {
            spec,
            changes: ChangeSet::default(),
            id: Some(id),
        }
    }

    #[must_use]
    pub fn with_changes(mut self, changes: ChangeSet) -> Self {
        self.changes = changes;
        self
    }

    #[must_use]
    pub const fn id(&self) -> Option<&EntityIdentifier> {
        self.id.as_ref()
    }

    pub fn set_id(&mut self, id: EntityIdentifier) {
        self.id = Some(id);
    }

    /// Signals that the account no longer exists.
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    #[must_use]
    pub fn persisted(&self) -> PersistedUser {
        PersistedUser {
            id: self.id.clone(),
            user: self.spec.name.clone(),
            host: self.spec.host.clone(),
            plaintext_password: self.spec.plaintext_password.as_deref().map(hash_sum),
            password: self.spec.legacy_password.as_deref().map(hash_sum),
            auth_plugin: self.spec.auth_plugin,
        }
    }
}
