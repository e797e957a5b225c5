//! Editing session: the single owner of the rc file handle, the key-length
//! context and the preferences store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ConfigMap;
use crate::keys::{KeyError, KeyLength, KeySettings};
use crate::mapper::{remote_view, ConfigMapper, ViewValue};
use crate::prefs::{Preferences, PrefsError};
use crate::rcfile::{RcFileError, RcFileStore};
use crate::registry::{RemoteKey, SettingKey};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    RcFile(#[from] RcFileError),
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error(transparent)]
    Prefs(#[from] PrefsError),
    #[error("configuration has no file yet; choose one with save-as")]
    NeedsSaveAs,
}

pub struct Session<P: Preferences> {
    store: RcFileStore,
    keys: KeySettings,
    mapper: ConfigMapper,
    prefs: P,
}

impl<P: Preferences> Session<P> {
    pub fn open(prefs: P) -> Self {
        Self {
            store: RcFileStore::new(),
            keys: KeySettings::from_preferences(&prefs),
            mapper: ConfigMapper::new(),
            prefs,
        }
    }

    /// Loads `path` and records it as the most recent file.
    pub fn load_rc_file(&mut self, path: impl AsRef<Path>) -> Result<&ConfigMap, SessionError> {
        self.store.load(path)?;
        self.remember_current_file();
        Ok(self.store.config())
    }

    /// Saves the view to the bound file. An unbound session asks for a path.
    pub fn save<I, T>(&mut self, view: I) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = (SettingKey, T)>,
        T: ViewValue,
    {
        if !self.store.exists() {
            return Err(SessionError::NeedsSaveAs);
        }
        let config = self.mapper.to_config(view);
        self.store.save(config)?;
        Ok(())
    }

    pub fn save_as<I, T>(&mut self, view: I, path: impl AsRef<Path>) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = (SettingKey, T)>,
        T: ViewValue,
    {
        let config = self.mapper.to_config(view);
        self.store.save_as(config, path)?;
        self.remember_current_file();
        Ok(())
    }

    pub fn new_config(&mut self) {
        self.store.reset();
    }

    pub fn config(&self) -> &ConfigMap {
        self.store.config()
    }

    pub fn rc_file(&self) -> Option<&Path> {
        self.store.path()
    }

    pub fn has_rc_file(&self) -> bool {
        self.store.exists()
    }

    pub fn recent_files(&self) -> Vec<PathBuf> {
        self.prefs.recent_files()
    }

    pub fn key_settings(&self) -> &KeySettings {
        &self.keys
    }

    pub fn key_settings_mut(&mut self) -> &mut KeySettings {
        &mut self.keys
    }

    pub fn generate_key(&self, length: KeyLength) -> Result<String, SessionError> {
        Ok(self.keys.generate(length)?)
    }

    pub fn save_key_settings(&mut self) -> Result<(), SessionError> {
        self.keys.save(&mut self.prefs)?;
        Ok(())
    }

    pub fn remote_view(&self) -> BTreeMap<RemoteKey, String> {
        remote_view(self.store.config())
    }

    pub fn preferences(&self) -> &P {
        &self.prefs
    }

    fn remember_current_file(&mut self) {
        let Some(path) = self.store.path().map(Path::to_path_buf) else {
            return;
        };
        self.prefs.push_recent_file(&path);
        if let Err(err) = self.prefs.persist() {
            tracing::warn!(error = %err, "could not record recent file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Session, SessionError};
    use crate::keys::KeyLength;
    use crate::prefs::{MemoryPreferences, Preferences};
    use crate::registry::SettingKey;
    use tempfile::tempdir;

    #[test]
    fn save_without_file_asks_for_save_as() {
        let mut session = Session::open(MemoryPreferences::with_defaults());
        let err = session.save([(SettingKey::SpaServer, "192.0.2.1")]).unwrap_err();
        assert!(matches!(err, SessionError::NeedsSaveAs));
    }

    #[test]
    fn save_as_then_load_tracks_recent_files() {
        let dir = tempdir().expect("temp dir");
        let first = dir.path().join("first.rc");
        let second = dir.path().join("second.rc");

        let mut session = Session::open(MemoryPreferences::with_defaults());
        session
            .save_as([(SettingKey::SpaServer, "192.0.2.1")], &first)
            .expect("save as");
        session
            .save_as([(SettingKey::SpaServer, "192.0.2.2")], &second)
            .expect("save as");
        session.load_rc_file(&first).expect("load");

        assert_eq!(session.rc_file(), Some(first.as_path()));
        assert_eq!(session.recent_files(), vec![first.clone(), second.clone()]);
        assert_eq!(session.config().get(SettingKey::SpaServer), Some("192.0.2.1"));
    }

    #[test]
    fn new_config_unbinds() {
        let dir = tempdir().expect("temp dir");
        let mut session = Session::open(MemoryPreferences::with_defaults());
        session
            .save_as([(SettingKey::Key, "abc")], dir.path().join("rc"))
            .unwrap();
        session.new_config();
        assert!(!session.has_rc_file());
        assert!(session.config().is_empty());
    }

    #[test]
    fn key_lengths_flow_back_to_preferences() {
        let mut session = Session::open(MemoryPreferences::with_defaults());
        session.key_settings_mut().set(KeyLength::Hmac, "24");
        assert_eq!(session.generate_key(KeyLength::Hmac).unwrap().len(), 24);

        session.save_key_settings().unwrap();
        assert_eq!(session.preferences().get("key.hmac.length").as_deref(), Some("24"));
    }
}
