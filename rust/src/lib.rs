//! Configuration schema, persistence and key material for fwknop SPA clients.
//! The crate owns the `.fwknoprc` settings catalog, decides which edited
//! values are worth keeping, reads and writes rc files, and generates the
//! Rijndael and HMAC keys that go into them. Windows, dialogs and GPG or SSH
//! plumbing stay with the caller.

pub mod config;
pub mod keys;
pub mod mapper;
pub mod prefs;
pub mod rcfile;
pub mod registry;
pub mod session;
pub mod validator;

pub use config::ConfigMap;
pub use registry::{RemoteKey, SettingKey, ValueType};
pub use session::{Session, SessionError};
