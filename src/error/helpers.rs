use super::{ErrorCode, GeoTallyError};
use std::path::Path;

/// Extension trait for convenient error conversion
pub trait ErrorExt<T> {
    /// Convert to an I/O error, keeping the original as source
    fn to_io_error(self, message: impl Into<String>) -> Result<T, GeoTallyError>;
}

impl<T, E> ErrorExt<T> for Result<T, E>
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    fn to_io_error(self, message: impl Into<String>) -> Result<T, GeoTallyError> {
        self.map_err(|e| GeoTallyError::io(message).with_source(e))
    }
}

/// Helper functions for common error scenarios
pub mod common {
    use super::*;

    /// An input file (grid, language map, config) does not exist
    pub fn input_not_found(path: impl AsRef<Path>) -> GeoTallyError {
        let path = path.as_ref();
        GeoTallyError::config_with_code(
            ErrorCode::CONFIG_NOT_FOUND,
            format!("Input file not found: {}", path.display()),
        )
        .with_path(path)
    }

    /// An input definition file holds invalid JSON
    pub fn invalid_json(path: impl AsRef<Path>, err: serde_json::Error) -> GeoTallyError {
        let path = path.as_ref();
        GeoTallyError::config_with_code(
            ErrorCode::CONFIG_INVALID_JSON,
            format!("Invalid JSON in {}", path.display()),
        )
        .with_path(path)
        .with_source(err)
    }

    /// Reading an input file failed
    pub fn read_failed(path: impl AsRef<Path>, err: std::io::Error) -> GeoTallyError {
        let path = path.as_ref();
        GeoTallyError::io_with_code(
            ErrorCode::IO_READ_FAILED,
            format!("Failed to read {}", path.display()),
            Some(path.to_path_buf()),
        )
        .with_source(err)
    }

    /// Writing a report file failed
    pub fn write_failed(
        path: impl AsRef<Path>,
        err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> GeoTallyError {
        let path = path.as_ref();
        GeoTallyError::io_with_code(
            ErrorCode::IO_WRITE_FAILED,
            format!("Failed to write {}", path.display()),
            Some(path.to_path_buf()),
        )
        .with_source(err)
    }
}
