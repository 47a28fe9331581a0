//! Central error types for cuImage.
//!
//! Most of the crate signals failure by absence (image helpers return `None`,
//! preference reads fall back to defaults). The typed error below covers the
//! paths that do propagate: persistence, hotkey registration and startup
//! configuration.

use thiserror::Error;

/// Main error type for cuImage operations.
#[derive(Error, Debug)]
pub enum CuImageError {
    /// Preference file or log file I/O failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image decoding failed
    #[error("Image error: {0}")]
    Image(String),

    /// Image encoding failed
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Global hotkey registration failed
    #[error("Hotkey error: {0}")]
    Hotkey(String),

    /// Clipboard could not be read
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Startup configuration is missing or broken
    #[error("Configuration error: {0}")]
    Config(String),

    /// Handing an image to the upload host failed
    #[error("Upload error: {0}")]
    Upload(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for CuImageError {
    fn from(err: image::ImageError) -> Self {
        CuImageError::Image(err.to_string())
    }
}

impl From<String> for CuImageError {
    fn from(msg: String) -> Self {
        CuImageError::Other(msg)
    }
}

impl From<&str> for CuImageError {
    fn from(msg: &str) -> Self {
        CuImageError::Other(msg.to_string())
    }
}

/// Prefix an error with a lazily built description of what was being done.
pub trait ResultExt<T> {
    fn with_context<F: FnOnce() -> String>(self, f: F) -> CuImageResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn with_context<F: FnOnce() -> String>(self, f: F) -> CuImageResult<T> {
        self.map_err(|e| CuImageError::Other(format!("{}: {}", f(), e)))
    }
}

/// Turn a `None` into an error with a lazily built message.
pub trait OptionExt<T> {
    fn with_context<F: FnOnce() -> String>(self, f: F) -> CuImageResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn with_context<F: FnOnce() -> String>(self, f: F) -> CuImageResult<T> {
        self.ok_or_else(|| CuImageError::Other(f()))
    }
}

/// Type alias for Results using CuImageError.
pub type CuImageResult<T> = Result<T, CuImageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CuImageError::Config("transformer missing".to_string());
        assert_eq!(err.to_string(), "Configuration error: transformer missing");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CuImageError = io_err.into();
        assert!(matches!(err, CuImageError::Storage(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CuImageError = json_err.into();
        assert!(matches!(err, CuImageError::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_from_string() {
        let err: CuImageError = "test error".into();
        assert!(matches!(err, CuImageError::Other(_)));
    }

    #[test]
    fn test_hotkey_and_upload_errors() {
        let hotkey = CuImageError::Hotkey("already registered".to_string());
        assert!(hotkey.to_string().contains("Hotkey"));

        let upload = CuImageError::Upload("host rejected".to_string());
        assert!(upload.to_string().contains("Upload"));

        let clipboard = CuImageError::Clipboard("no image".to_string());
        assert!(clipboard.to_string().contains("Clipboard"));
    }

    #[test]
    fn test_result_with_context() {
        let result: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
        let msg = result
            .with_context(|| format!("Failed to open log file {:?}", "cuimage.log"))
            .unwrap_err()
            .to_string();

        assert!(msg.starts_with("Failed to open log file"));
        assert!(msg.ends_with("denied"));
    }

    #[test]
    fn test_with_context_is_lazy_on_success() {
        let value: Option<u8> = Some(3);
        let result = value.with_context(|| panic!("message built for a present value"));
        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn test_option_with_context() {
        let missing: Option<Vec<u8>> = None;
        let err = missing
            .with_context(|| "failed to compress 0x0 image".to_string())
            .unwrap_err();

        assert!(matches!(err, CuImageError::Other(_)));
        assert_eq!(err.to_string(), "failed to compress 0x0 image");
    }
}
