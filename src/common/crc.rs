// src/common/crc.rs

use crc::{Algorithm, Crc};

/// CRC-16/ARC, used to seal persisted board state.
/// Polynomial: 0x8005, reflected in and out, init and final XOR 0x0000.
/// Check Value: 0xBB3D (for "123456789").
pub const STATE_CRC: Algorithm<u16> = crc::CRC_16_ARC;

const CRC_COMPUTER: Crc<u16> = Crc::<u16>::new(&STATE_CRC);

/// Length of the checksum trailer appended to a state blob.
pub const CRC_LEN: usize = 2;

#[inline]
pub fn calculate_crc16(data: &[u8]) -> u16 {
    CRC_COMPUTER.checksum(data)
}

/// Encodes a CRC as two bytes, LSB first.
#[inline]
pub fn encode_crc(crc_value: u16) -> [u8; CRC_LEN] {
    crc_value.to_le_bytes()
}

/// Splits `blob` into body and trailer and checks the trailer.
///
/// Returns the body on success, or `(expected, calculated)` on mismatch.
/// A blob shorter than the trailer is treated as a mismatch against zero.
pub fn verify_crc(blob: &[u8]) -> Result<&[u8], (u16, u16)> {
    if blob.len() < CRC_LEN {
        return Err((0, calculate_crc16(&[])));
    }
    let (body, trailer) = blob.split_at(blob.len() - CRC_LEN);
    let expected = u16::from_le_bytes([trailer[0], trailer[1]]);
    let calculated = calculate_crc16(body);
    if expected == calculated {
        Ok(body)
    } else {
        Err((expected, calculated))
    }
}
