//! Steam library inputs: the visibility config and the license report.
//!
//! Both inputs are read once per run and turned into read-only indices:
//! [`LibraryState`] (hidden vs. visible titles) and [`PackageIndex`]
//! (which packages grant which titles).

pub mod ids;
pub mod library;
pub mod licenses;
pub mod vdf;

// Re-export primary types.
pub use ids::{AppId, PackageId};
pub use library::LibraryState;
pub use licenses::{PACKAGE_BLACKLIST, PackageIndex, is_blacklisted};

use std::path::{Path, PathBuf};

/// Errors for Steam input loading.
#[derive(Debug, thiserror::Error)]
pub enum SteamError {
    #[error("input not found: {}", .path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed library config: {0}")]
    MalformedConfig(String),

    #[error("VDF parse error at line {line}: {message}")]
    Vdf { line: usize, message: String },
}

/// Reads a whole input file, mapping any I/O failure to `InputNotFound`.
pub(crate) fn read_input(path: &Path) -> Result<String, SteamError> {
    std::fs::read_to_string(path).map_err(|source| SteamError::InputNotFound {
        path: path.to_path_buf(),
        source,
    })
}
