//! File handle for the configuration being edited. It starts unbound, gets a
//! path from the first load or save-as, and from then on `save` rewrites that
//! path. Writes are staged in a sibling temp file and renamed into place.
//! Stanzas for other servers found on load are written back after `[default]`.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{codec, RcFileError};
use crate::config::ConfigMap;

#[derive(Debug, Default)]
pub struct RcFileStore {
    path: Option<PathBuf>,
    config: ConfigMap,
    other_stanzas: String,
}

impl RcFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and parses `path`, then binds to it. On error nothing changes.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&ConfigMap, RcFileError> {
        let path = absolutize(path.as_ref()).map_err(|source| RcFileError::Parse {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        let text = fs::read_to_string(&path).map_err(|source| RcFileError::Parse {
            path: path.clone(),
            source,
        })?;
        let document = codec::parse_document(&text);
        let kept_bytes = document.other_stanzas.len();
        tracing::info!(
            path = %path.display(),
            settings = document.config.len(),
            kept_bytes,
            "rc file loaded"
        );

        self.path = Some(path);
        self.config = document.config;
        self.other_stanzas = document.other_stanzas;
        Ok(&self.config)
    }

    /// Overwrites the bound file with `config`.
    pub fn save(&mut self, config: ConfigMap) -> Result<(), RcFileError> {
        let path = self.path.clone().ok_or(RcFileError::Unbound)?;
        write_atomic(&path, &codec::serialize(&config, &self.other_stanzas))?;
        tracing::info!(path = %path.display(), settings = config.len(), "rc file saved");
        self.config = config;
        Ok(())
    }

    /// Writes `config` to `path` and binds to it once the write succeeded.
    /// Stanzas carried from the last load go along to the new file.
    pub fn save_as(&mut self, config: ConfigMap, path: impl AsRef<Path>) -> Result<(), RcFileError> {
        let path = absolutize(path.as_ref()).map_err(|source| RcFileError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        write_atomic(&path, &codec::serialize(&config, &self.other_stanzas))?;
        tracing::info!(path = %path.display(), settings = config.len(), "rc file saved as");
        self.path = Some(path);
        self.config = config;
        Ok(())
    }

    pub fn exists(&self) -> bool {
        self.path.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn config(&self) -> &ConfigMap {
        &self.config
    }

    /// Raw text of the non-default stanzas of the bound file.
    pub fn other_stanzas(&self) -> &str {
        &self.other_stanzas
    }

    /// Forgets the bound file and clears the in-memory configuration.
    pub fn reset(&mut self) {
        self.path = None;
        self.config = ConfigMap::new();
        self.other_stanzas.clear();
    }
}

fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// The temp file is created owner-only (0600 on Unix), which is also what
/// fwknop expects of an rc file.
fn write_atomic(path: &Path, contents: &str) -> Result<(), RcFileError> {
    let io_err = |source| RcFileError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut staged = NamedTempFile::new_in(dir).map_err(io_err)?;
    staged.write_all(contents.as_bytes()).map_err(io_err)?;
    staged.as_file().sync_all().map_err(io_err)?;
    staged.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
