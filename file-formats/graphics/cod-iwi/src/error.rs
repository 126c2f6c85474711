use std::io;
use thiserror::Error;

/// Errors produced while expanding DXT-compressed blocks
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The compressed buffer holds fewer bytes than the block grid needs
    #[error(
        "Compressed data too short for {width}x{height}: {required} bytes required, found {actual}"
    )]
    TruncatedInput {
        /// Image width in pixels
        width: usize,
        /// Image height in pixels
        height: usize,
        /// Bytes needed for the full block grid
        required: usize,
        /// Bytes actually supplied
        actual: usize,
    },
}

/// Errors that can occur when reading IWi files
#[derive(Debug, Error)]
pub enum IwiError {
    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid magic value in the file header
    #[error("Invalid magic value: expected '{expected}', found '{found}'")]
    InvalidMagic {
        /// The expected magic value
        expected: String,
        /// The actual magic value found
        found: String,
    },

    /// Unsupported IWi version byte
    #[error("Unsupported IWi version: {0:#04x}")]
    UnsupportedVersion(u8),

    /// Texture format without a decode path
    #[error("Unsupported texture format: {0:#04x}")]
    UnsupportedFormat(u8),

    /// None of the mipmap offsets describes a non-empty level
    #[error("Texture data length is 0")]
    EmptyTexture,

    /// Selected mipmap extends beyond the end of the file
    #[error("Mipmap at offset {offset} with size {size} exceeds file size {file_size}")]
    OutOfBounds {
        /// Start of the mipmap
        offset: u64,
        /// Declared size of the mipmap
        size: u64,
        /// Total file size
        file_size: u64,
    },

    /// Block decompression failed
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Type alias for Results from IWi operations
pub type Result<T> = std::result::Result<T, IwiError>;
