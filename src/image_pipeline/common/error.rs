use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Cannot read photo: {0}")]
    InputReadError(String),

    #[error("Cannot write map or sample: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode source image: {0}")]
    DecodeError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Image of {0}x{1} pixels is not accepted")]
    InvalidDimensions(usize, usize),

    #[error("Unsupported source layout: {0}")]
    UnsupportedFormat(String),

    #[error("Pixel ({x}, {y}) has value {value}, which is neither mask sentinel")]
    NotBinary { x: usize, y: usize, value: u8 },

    #[error("Foreground and background sentinels must differ (both are {0})")]
    InvalidSentinels(u8),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("I/O failure: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MapError>;
