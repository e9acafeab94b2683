// src/signal/decode.rs

use alloc::vec::Vec;

use super::{SignalSpec, MAX_CHANNELS};
use crate::common::DecodeError;

/// Raw integer values of one sample, one per channel.
pub type RawSample = heapless::Vec<i64, MAX_CHANNELS>;

/// Reads one little-endian integer of `width` bytes at the start of `bytes`.
///
/// Widths of 1 to 4 bytes are supported. Signed values are sign-extended.
pub fn read_channel(bytes: &[u8], width: u8, signed: bool) -> Result<i64, DecodeError> {
    let len = usize::from(width);
    if !(1..=4).contains(&len) {
        return Err(DecodeError::UnsupportedWidth(width));
    }
    let chunk = bytes.get(..len).ok_or(DecodeError::PayloadTooShort {
        needed: len,
        got: bytes.len(),
    })?;

    let unsigned = chunk
        .iter()
        .rev()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));

    if signed {
        let shift = 64 - 8 * len as u32;
        Ok(((unsigned << shift) as i64) >> shift)
    } else {
        Ok(unsigned as i64)
    }
}

/// Decodes every sample `spec` describes, advancing one sample width per
/// repetition.
pub(super) fn decode_samples(spec: &SignalSpec, payload: &[u8]) -> Result<Vec<RawSample>, DecodeError> {
    if usize::from(spec.channel_count) > MAX_CHANNELS {
        return Err(DecodeError::TooManyChannels(spec.channel_count));
    }
    let needed = spec.required_len();
    if payload.len() < needed {
        return Err(DecodeError::PayloadTooShort {
            needed,
            got: payload.len(),
        });
    }

    let signed = spec.interpreter.is_signed();
    let unit = usize::from(spec.unit_byte_length);
    let stride = spec.sample_len();
    let start = usize::from(spec.byte_offset);

    let mut samples = Vec::with_capacity(usize::from(spec.repeat_count));
    for repeat in 0..usize::from(spec.repeat_count) {
        let base = start + repeat * stride;
        let mut sample = RawSample::new();
        for channel in 0..usize::from(spec.channel_count) {
            let at = base + channel * unit;
            let value = read_channel(&payload[at..], spec.unit_byte_length, signed)?;
            // Capacity was checked against MAX_CHANNELS above.
            let _ = sample.push(value);
        }
        samples.push(sample);
    }
    Ok(samples)
}
