//! JSON file credential store
//!
//! The file holds a single object: `{"username": "...", "password": "..."}`.

use super::{CredentialStore, Credentials};
use crate::CredentialError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Credential store backed by a JSON file
#[derive(Debug, Clone)]
pub struct JsonCredentialStore {
    path: PathBuf,
}

impl JsonCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for JsonCredentialStore {
    fn load(&self) -> Result<Option<Credentials>, CredentialError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("Credentials file {} not found", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let credentials: Credentials = serde_json::from_str(&content)?;
        if credentials.is_complete() {
            Ok(Some(credentials))
        } else {
            Ok(None)
        }
    }

    fn save(&self, credentials: &Credentials) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string(credentials)?;
        std::fs::write(&self.path, content)?;
        restrict_permissions(&self.path)?;

        tracing::info!("Credentials saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
