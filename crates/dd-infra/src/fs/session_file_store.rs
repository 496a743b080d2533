use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use dd_core::identity::Identity;
use dd_core::ports::{SessionStoreError, SessionStorePort};

/// Stores the logged-in identity as a JSON file.
///
/// Writes go to a sibling `.tmp` file first and are renamed into place, so a
/// crash mid-write leaves either the old session or the new one.
pub struct JsonSessionStore {
    path: PathBuf,
}

impl JsonSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl SessionStorePort for JsonSessionStore {
    fn load(&self) -> Result<Option<Identity>, SessionStoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(SessionStoreError::Store(err.to_string())),
        };

        let identity: Identity = serde_json::from_str(&content)
            .map_err(|err| SessionStoreError::Corrupt(err.to_string()))?;
        debug!(path = %self.path.display(), user_id = %identity.id, "session loaded");
        Ok(Some(identity))
    }

    fn save(&self, identity: &Identity) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| SessionStoreError::Store(err.to_string()))?;
        }

        let json = serde_json::to_string_pretty(identity)
            .map_err(|err| SessionStoreError::Store(err.to_string()))?;
        let tmp = self.tmp_path();
        std::fs::write(&tmp, json).map_err(|err| SessionStoreError::Store(err.to_string()))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|err| SessionStoreError::Store(err.to_string()))?;

        debug!(path = %self.path.display(), user_id = %identity.id, "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "session cleared");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(SessionStoreError::Store(err.to_string())),
        }
    }
}
