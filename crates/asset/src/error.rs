//! Error taxonomy for asset loading.

use std::path::PathBuf;

use thiserror::Error;

pub type AssetResult<T> = Result<T, AssetError>;

#[derive(Debug, Error)]
pub enum AssetError {
    /// The file could not be opened or read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line did not match the expected shape. `line` is 1-based.
    #[error("malformed OBJ line {line}: {message}")]
    Format { line: usize, message: String },

    /// The import library produced a scene this loader cannot represent.
    #[error("unsupported scene: {0}")]
    UnsupportedScene(String),

    /// The import library rejected the file.
    #[error("scene import failed: {0}")]
    Import(String),

    /// Image decoding failed. `origin` is the file path or `<memory>`.
    #[error("failed to decode texture {origin}: {source}")]
    Texture {
        origin: String,
        #[source]
        source: image::ImageError,
    },

    /// The background import task did not complete.
    #[error("background load failed: {0}")]
    Background(String),
}

impl AssetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            line,
            message: message.into(),
        }
    }

    /// `true` for errors caused by the content of the file rather than access to it.
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}
