//! Persisted instance setting.
//!
//! The only setting is the instance base URL, stored as a single
//! `instance=<url>` line. Storage sits behind [`ConfigStore`] so the
//! resolver can be exercised without touching the working directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::AppError;

pub const DEFAULT_CONFIG_FILE: &str = "cobalt.ini";

const INSTANCE_KEY: &str = "instance";

/// Read-one / write-one storage for the instance setting.
pub trait ConfigStore {
    /// Where the setting lives, for messages.
    fn location(&self) -> &Path;

    /// Returns `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<String>, AppError>;

    /// Replaces whatever was stored before.
    fn save(&self, instance: &str) -> Result<(), AppError>;
}

/// Single-line key-value file, `cobalt.ini` in the working directory by default
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE)
    }
}

impl ConfigStore for FileConfigStore {
    fn location(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Option<String>, AppError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        let first_line = contents.lines().next().unwrap_or_default();
        parse_instance_line(first_line)
            .map(Some)
            .map_err(|reason| AppError::ConfigInvalid {
                path: self.path.clone(),
                reason,
            })
    }

    fn save(&self, instance: &str) -> Result<(), AppError> {
        fs::write(&self.path, format!("{INSTANCE_KEY}={instance}")).map_err(|e| {
            AppError::ConfigWriteFailed {
                path: self.path.clone(),
                source: e,
            }
        })
    }
}

/// Splits on the first `=` and returns the trimmed value.
fn parse_instance_line(line: &str) -> Result<String, String> {
    let (_, value) = line
        .split_once('=')
        .ok_or_else(|| format!("expected `{INSTANCE_KEY}=<url>`, found {line:?}"))?;

    let value = value.trim();
    if value.is_empty() {
        return Err("instance value is empty".to_string());
    }

    Ok(value.to_string())
}

/// Prefixes `http://` unless the instance already names its scheme.
pub fn normalize_instance(instance: &str) -> String {
    if instance.starts_with("https://") || instance.starts_with("http://") {
        instance.to_string()
    } else {
        format!("http://{instance}")
    }
}

/// Picks the instance for this run and returns it normalized.
///
/// A flag value is persisted first; failing to persist it is reported and
/// the run carries on with the in-memory value. Without a flag the stored
/// value is used, and a missing store is fatal.
pub fn resolve_instance(flag: Option<&str>, store: &dyn ConfigStore) -> Result<String, AppError> {
    let instance = match flag {
        Some(instance) => {
            if let Err(e) = store.save(instance) {
                debug!(error = ?e, "instance not persisted");
                println!("{e}");
            } else {
                debug!(path = %store.location().display(), "instance persisted");
            }
            instance.to_string()
        }
        None => store
            .load()?
            .ok_or_else(|| AppError::ConfigMissing(store.location().to_path_buf()))?,
    };

    Ok(normalize_instance(&instance))
}

#[cfg(test)]
pub mod memory {
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};

    use super::ConfigStore;
    use crate::domain::AppError;

    /// In-memory store; `read_only` makes every save fail.
    #[derive(Debug, Default)]
    pub struct MemoryConfigStore {
        pub value: RefCell<Option<String>>,
        pub read_only: bool,
        path: PathBuf,
    }

    impl MemoryConfigStore {
        pub fn with_value(value: &str) -> Self {
            Self {
                value: RefCell::new(Some(value.to_string())),
                ..Default::default()
            }
        }

        pub fn read_only() -> Self {
            Self {
                read_only: true,
                ..Default::default()
            }
        }
    }

    impl ConfigStore for MemoryConfigStore {
        fn location(&self) -> &Path {
            &self.path
        }

        fn load(&self) -> Result<Option<String>, AppError> {
            Ok(self.value.borrow().clone())
        }

        fn save(&self, instance: &str) -> Result<(), AppError> {
            if self.read_only {
                return Err(AppError::ConfigWriteFailed {
                    path: self.path.clone(),
                    source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                });
            }
            *self.value.borrow_mut() = Some(instance.to_string());
            Ok(())
        }
    }
}
