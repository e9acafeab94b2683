// src/common/types.rs

// --- Decoding rules ---

/// How the raw bytes of one channel are read.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Interpreter {
    /// Little-endian unsigned integer (e.g. LTR329 illuminance in milli-lux).
    Uint32,
    /// Little-endian signed 16-bit X/Y/Z rotation from a Bosch gyro.
    BoschRotation,
    /// One axis of `BoschRotation`.
    BoschRotationSingleAxis,
}

impl Interpreter {
    /// Whether raw channel values are two's-complement.
    pub fn is_signed(&self) -> bool {
        match self {
            Interpreter::Uint32 => false,
            Interpreter::BoschRotation | Interpreter::BoschRotationSingleAxis => true,
        }
    }

    /// The interpreter used by a single-channel view of this signal.
    pub fn single_channel(&self) -> Self {
        match self {
            Interpreter::Uint32 => Interpreter::Uint32,
            Interpreter::BoschRotation | Interpreter::BoschRotationSingleAxis => {
                Interpreter::BoschRotationSingleAxis
            }
        }
    }
}

// --- Scaling rules ---

/// Post-decode scaling into physical units.
///
/// The scale factor of a non-identity converter may depend on live module
/// configuration, so it is resolved by the board at decode time.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Converter {
    /// Raw value is already the physical value.
    Identity,
    /// Raw counts divided by the gyro's LSB-per-dps for the current range.
    BoschRotation,
}

impl Converter {
    #[inline]
    pub fn is_identity(&self) -> bool {
        matches!(self, Converter::Identity)
    }
}
