//! API credential storage
//!
//! A single string kept in a file, with an environment variable as a
//! read-only fallback. Read at startup, written when the user submits one.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from reading or saving a credential
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Credential must not be empty")]
    Empty,

    #[error("Failed to access credential file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A non-empty API key
///
/// `Debug` and `Display` redact the value so it never reaches the logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Trim and validate a submitted key
    pub fn new(value: impl AsRef<str>) -> Result<Self, CredentialError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CredentialError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

/// File-backed credential store
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
    env_var: Option<String>,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!(?path, "CredentialStore::new: called");
        Self { path, env_var: None }
    }

    /// Also consult `env_var` when the file is absent
    pub fn with_env_fallback(mut self, env_var: impl Into<String>) -> Self {
        self.env_var = Some(env_var.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored credential, if any
    ///
    /// The file wins over the environment; blank values count as absent.
    pub fn load(&self) -> Result<Option<Credential>, CredentialError> {
        debug!(path = ?self.path, "CredentialStore::load: called");
        if self.path.exists() {
            let content = fs::read_to_string(&self.path).map_err(|source| CredentialError::Io {
                path: self.path.clone(),
                source,
            })?;
            match Credential::new(&content) {
                Ok(credential) => {
                    debug!("CredentialStore::load: loaded from file");
                    return Ok(Some(credential));
                }
                Err(_) => warn!(path = ?self.path, "Credential file is empty, ignoring"),
            }
        }

        if let Some(var) = &self.env_var
            && let Ok(value) = std::env::var(var)
            && let Ok(credential) = Credential::new(value)
        {
            debug!(%var, "CredentialStore::load: loaded from environment");
            return Ok(Some(credential));
        }

        debug!("CredentialStore::load: no credential");
        Ok(None)
    }

    /// Persist a credential, creating parent directories as needed
    pub fn save(&self, credential: &Credential) -> Result<(), CredentialError> {
        debug!(path = ?self.path, "CredentialStore::save: called");
        let io_err = |source: std::io::Error| CredentialError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path).map_err(io_err)?;

        // The mode above only applies to new files
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600)).map_err(io_err)?;
        }
        file.write_all(credential.expose().as_bytes()).map_err(io_err)?;

        info!(path = %self.path.display(), "Credential saved");
        Ok(())
    }
}
