// src/common/response/mod.rs

mod error;
pub mod parse;

pub use error::{DecodeError, ResponseParseError};
pub use parse::parse_notification;

use crate::common::header::RegisterHeader;

/// An inbound frame split at the header, borrowed from the receive buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Notification<'a> {
    /// Module, register and direction of the frame.
    pub header: RegisterHeader,
    /// Everything after the two header bytes.
    pub payload: &'a [u8],
}
