//! Fatal error types for a conversion run

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a conversion run
///
/// Unresolved playlist entries are not errors; they are reported as
/// [`MissingEntry`](crate::playlist::MissingEntry) values instead.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The library tree could not be read
    #[error("cannot read library at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source playlist could not be read
    #[error("cannot read playlist {}: {source}", .path.display())]
    ReadPlaylist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The converted playlist could not be written
    #[error("cannot write playlist {}: {source}", .path.display())]
    WritePlaylist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The library directory is not inside the device mount point
    #[error("library {} is not inside device {}", .library.display(), .device.display())]
    OutsideDevice { library: PathBuf, device: PathBuf },

    /// A resolved track does not live under the device mount point
    #[error("{} is not on device {}", .path.display(), .device.display())]
    NotOnDevice { path: PathBuf, device: PathBuf },
}

impl ConvertError {
    /// Wrap a walkdir failure, keeping the offending path when known
    pub fn from_walk(root: &std::path::Path, err: walkdir::Error) -> Self {
        let path = err
            .path()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| root.to_path_buf());
        let source = err
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
        Self::Filesystem { path, source }
    }
}
