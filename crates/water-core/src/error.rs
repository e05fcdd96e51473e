use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the water monitor.
#[derive(Error, Debug)]
pub enum WaterError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A selection date was not in `YYYY-MM-DD` form.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A timezone name is not a recognised IANA identifier.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// The records path does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// No `.json` / `.jsonl` record files were found under the given directory.
    #[error("No record files found in {0}")]
    NoDataFiles(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the water crates.
pub type Result<T> = std::result::Result<T, WaterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = WaterError::FileRead {
            path: PathBuf::from("/some/res_evt.jsonl"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/res_evt.jsonl"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_invalid_date() {
        let err = WaterError::InvalidDate("2024-13-45".to_string());
        assert_eq!(err.to_string(), "Invalid date: 2024-13-45");
    }

    #[test]
    fn test_error_display_invalid_timezone() {
        let err = WaterError::InvalidTimezone("Mars/Olympus".to_string());
        assert_eq!(err.to_string(), "Invalid timezone: Mars/Olympus");
    }

    #[test]
    fn test_error_display_data_path_not_found() {
        let err = WaterError::DataPathNotFound(PathBuf::from("/missing/dir"));
        assert_eq!(err.to_string(), "Data path not found: /missing/dir");
    }

    #[test]
    fn test_error_display_no_data_files() {
        let err = WaterError::NoDataFiles(PathBuf::from("/empty/dir"));
        assert_eq!(err.to_string(), "No record files found in /empty/dir");
    }

    #[test]
    fn test_error_display_config() {
        let err = WaterError::Config("unknown output format".to_string());
        assert_eq!(err.to_string(), "Configuration error: unknown output format");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: WaterError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: WaterError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
