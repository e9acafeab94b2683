// src/common/response/error.rs

/// Error splitting an inbound frame into header and payload.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ResponseParseError {
    /// Input buffer was empty.
    #[error("empty notification")]
    EmptyInput,
    /// Frame is shorter than the two header bytes.
    #[error("notification too short: {len} bytes")]
    TooShort { len: usize },
}

/// Error decoding a payload through a data signal or config record.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// Payload ends before the bytes the layout requires.
    #[error("payload too short: needed {needed}, got {got}")]
    PayloadTooShort { needed: usize, got: usize },
    /// Fixed-size record given a blob of the wrong length.
    #[error("length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },
    /// Channel width is not one the interpreter can read.
    #[error("unsupported channel width: {0} bytes")]
    UnsupportedWidth(u8),
    /// More channels per sample than a sample can hold.
    #[error("too many channels: {0}")]
    TooManyChannels(u8),
}
