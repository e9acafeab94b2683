// src/common/response/parse.rs

use super::{Notification, ResponseParseError};
use crate::common::header::RegisterHeader;

/// Number of header bytes at the start of every frame.
pub const HEADER_LEN: usize = 2;

/// Splits a raw notification into its register header and payload.
///
/// The payload borrows from `bytes` and starts at offset 2. A frame holding
/// only a header yields an empty payload.
pub fn parse_notification(bytes: &[u8]) -> Result<Notification<'_>, ResponseParseError> {
    match bytes {
        [] => Err(ResponseParseError::EmptyInput),
        [module, register, payload @ ..] => Ok(Notification {
            header: RegisterHeader::from_wire(*module, *register),
            payload,
        }),
        _ => Err(ResponseParseError::TooShort { len: bytes.len() }),
    }
}
