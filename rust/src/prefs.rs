//! Application preferences: key-length defaults and the recent-files list.
//! The store is handed to whoever needs it; nothing here is global. Changes
//! stay in memory until `persist` is called.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

pub const PREFS_ENV: &str = "FWKNOP_RC_PREFS";
pub const RECENT_FILES_KEY: &str = "recent.files";
pub const MAX_RECENT_FILES: usize = 10;

const DEFAULTS: [(&str, &str); 4] = [
    ("key.rijndael.length", "16"),
    ("key.hmac.length", "16"),
    ("key.base64.rijndael.length", "32"),
    ("key.base64.hmac.length", "64"),
];

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("preferences file {} unusable: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("preferences file {} is not valid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot locate a home directory for preferences")]
    NoHomeDir,
}

/// Durable string key-value store for application preferences.
pub trait Preferences {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn persist(&mut self) -> Result<(), PrefsError>;

    /// Most recent first.
    fn recent_files(&self) -> Vec<PathBuf> {
        self.get(RECENT_FILES_KEY)
            .map(|joined| {
                joined
                    .lines()
                    .filter(|line| !line.is_empty())
                    .map(PathBuf::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Moves `path` to the front of the recent list, dropping duplicates and
    /// anything past [`MAX_RECENT_FILES`].
    fn push_recent_file(&mut self, path: &Path) {
        let mut files = self.recent_files();
        files.retain(|existing| existing != path);
        files.insert(0, path.to_path_buf());
        files.truncate(MAX_RECENT_FILES);
        let joined = files
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("\n");
        self.set(RECENT_FILES_KEY, joined);
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PrefsFile {
    #[serde(default)]
    values: BTreeMap<String, String>,
}

/// JSON-file backed preferences.
#[derive(Debug)]
pub struct JsonPreferences {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonPreferences {
    /// `$FWKNOP_RC_PREFS`, or `~/.fwknop-rc/preferences.json`.
    pub fn default_path() -> Result<PathBuf, PrefsError> {
        if let Some(path) = std::env::var_os(PREFS_ENV) {
            return Ok(PathBuf::from(path));
        }
        dirs::home_dir()
            .map(|home| home.join(".fwknop-rc").join("preferences.json"))
            .ok_or(PrefsError::NoHomeDir)
    }

    /// Reads the store at `path`. A missing file yields the defaults; keys
    /// absent from an existing file are filled from the defaults as well.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let path = path.into();
        let mut values: BTreeMap<String, String> = DEFAULTS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        match fs::read_to_string(&path) {
            Ok(raw) => {
                let file: PrefsFile = serde_json::from_str(&raw).map_err(|source| {
                    PrefsError::Json {
                        path: path.clone(),
                        source,
                    }
                })?;
                values.extend(file.values);
                tracing::debug!(path = %path.display(), "preferences loaded");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no preferences file, using defaults");
            }
            Err(source) => return Err(PrefsError::Io { path, source }),
        }

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Preferences for JsonPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn persist(&mut self) -> Result<(), PrefsError> {
        let io_err = |source| PrefsError::Io {
            path: self.path.clone(),
            source,
        };
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(io_err)?;

        let body = serde_json::to_vec_pretty(&PrefsFile {
            values: self.values.clone(),
        })
        .map_err(|source| PrefsError::Json {
            path: self.path.clone(),
            source,
        })?;

        let mut staged = NamedTempFile::new_in(&dir).map_err(io_err)?;
        staged.write_all(&body).map_err(io_err)?;
        staged.as_file().sync_all().map_err(io_err)?;
        staged.persist(&self.path).map_err(|e| io_err(e.error))?;
        tracing::info!(path = %self.path.display(), "preferences saved");
        Ok(())
    }
}

/// Preferences that live only as long as the value; `persist` is a no-op.
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferences {
    values: BTreeMap<String, String>,
}

impl MemoryPreferences {
    pub fn with_defaults() -> Self {
        Self {
            values: DEFAULTS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Preferences for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn persist(&mut self) -> Result<(), PrefsError> {
        Ok(())
    }
}
