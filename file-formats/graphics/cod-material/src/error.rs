//! Error handling for material parsing

use std::io;
use thiserror::Error;

/// Errors that can occur when reading material files
#[derive(Debug, Error)]
pub enum MaterialError {
    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A string pointer lies outside the file
    #[error("{field} offset {offset} is outside the file ({file_size} bytes)")]
    InvalidOffset {
        /// Which pointer was bad
        field: &'static str,
        /// The offending offset
        offset: u32,
        /// Total file size
        file_size: u64,
    },
}

/// Type alias for Results from material operations
pub type Result<T> = std::result::Result<T, MaterialError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = MaterialError::InvalidOffset {
            field: "techset",
            offset: 900,
            file_size: 120,
        };
        assert_eq!(
            error.to_string(),
            "techset offset 900 is outside the file (120 bytes)"
        );
    }
}
