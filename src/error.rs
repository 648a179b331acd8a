/// Error types for the gallery
///
/// `ManifestLoadError` travels inside UI messages, so it is `Clone` and
/// keeps only rendered reasons. `GalleryError` covers the manifest rebuild
/// tool and opening video players.
use std::path::PathBuf;
use thiserror::Error;

/// The single failure mode of the gallery view: the manifest could not be loaded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestLoadError {
    /// The manifest file does not exist under the gallery root
    #[error("{} was not found", path.display())]
    NotFound { path: PathBuf },

    /// The manifest exists but could not be read
    #[error("could not read {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },

    /// The manifest is not a JSON object of category -> filename arrays
    #[error("{} is not a valid gallery manifest: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },
}

impl ManifestLoadError {
    pub(crate) fn from_io(path: PathBuf, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            ManifestLoadError::NotFound { path }
        } else {
            ManifestLoadError::Read {
                path,
                reason: err.to_string(),
            }
        }
    }
}

/// Errors raised while rebuilding the manifest or opening a video
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("cannot play {}: {reason}", path.display())]
    Video { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, GalleryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_missing_file_maps_to_not_found() {
        let err = ManifestLoadError::from_io(
            PathBuf::from("media_manifest.json"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(
            err,
            ManifestLoadError::NotFound {
                path: PathBuf::from("media_manifest.json")
            }
        );
    }

    #[test]
    fn test_other_io_errors_keep_reason() {
        let err = ManifestLoadError::from_io(
            PathBuf::from("m.json"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ManifestLoadError::Read { .. }));
        assert!(err.to_string().contains("denied"));
    }
}
