//! `.fwknoprc` persistence: the line codec and the file handle that remembers
//! where the current configuration lives.

use std::path::PathBuf;

use thiserror::Error;

pub mod codec;
pub mod store;

pub use store::RcFileStore;

#[derive(Debug, Error)]
pub enum RcFileError {
    #[error("cannot read rc file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write rc file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no rc file chosen yet; save as a new file first")]
    Unbound,
}
