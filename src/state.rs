//! File-backed desired-state store: one JSON document per account.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::debug;

use crate::domain::{EntityIdentifier, PersistedUser};

pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &EntityIdentifier) -> PathBuf {
        let file = format!("{}.json", urlencoding::encode(&key.to_string()));
        self.dir.join(file)
    }

    pub fn load(&self, key: &EntityIdentifier) -> Result<Option<PersistedUser>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;
        let state = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", path.display()))?;

        Ok(Some(state))
    }

    /// Writes under the `user@host` key regardless of the recorded identifier.
    pub fn save(&self, state: &PersistedUser) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create state dir: {}", self.dir.display()))?;

        let path = self.path_for(&EntityIdentifier::new(&state.user, &state.host));
        let content = serde_json::to_string_pretty(state)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write state file: {}", path.display()))?;

        debug!("State saved to: {}", path.display());
        Ok(())
    }

    pub fn remove(&self, key: &EntityIdentifier) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove state file: {}", path.display()))?;
        }
        Ok(())
    }
}
