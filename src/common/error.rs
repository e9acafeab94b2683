// src/common/error.rs

use super::header::{ModuleId, RegisterHeader};
use super::response::{DecodeError, ResponseParseError};

/// Errors surfaced by board operations.
///
/// `E` is the transport's error type. Operations that never touch the
/// transport use the default `E = ()`.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error<E = ()>
where
    E: core::fmt::Debug,
{
    /// Underlying error from the transport implementation.
    #[error("Transport error: {0:?}")]
    Transport(E),

    /// The transport's outbound queue is full. Nothing was sent; the caller
    /// may retry once the queue drains.
    #[error("Transport busy")]
    WouldBlock,

    /// The module is not reported present, or has not been initialized.
    #[error("Module {0} is not present on this board")]
    ModuleNotPresent(ModuleId),

    /// The module is present but the driver does not support this variant
    /// (or this operation on this variant).
    #[error("Module {module} implementation {implementation} is not supported")]
    UnsupportedImplementation { module: ModuleId, implementation: u8 },

    /// No data signal is registered under the header.
    #[error("No data signal registered for {0}")]
    SignalNotFound(RegisterHeader),

    /// A config blob does not match the record size.
    #[error("Config length mismatch: needed {needed}, got {got}")]
    ConfigLength { needed: usize, got: usize },

    /// Inbound frame could not be split into header and payload.
    #[error("Invalid notification: {0}")]
    Notification(#[from] ResponseParseError),

    /// Payload did not match the layout of the signal decoding it.
    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// Stored state checksum does not match its contents.
    #[error("Checksum mismatch: expected {expected:#06x}, calculated {calculated:#06x}")]
    ChecksumMismatch { expected: u16, calculated: u16 },

    /// Command does not fit in a single BLE write.
    #[error("Command too long: {len} bytes")]
    CommandTooLong { len: usize },
}
