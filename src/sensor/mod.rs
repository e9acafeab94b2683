// src/sensor/mod.rs

// Module drivers. Each owns a bit-exact config record, builds its data
// signals and registers its response handlers on the board.

pub mod ambient_light;
pub mod gyro;

pub use ambient_light::{AmbientLight, Ltr329Config};
pub use gyro::{Gyro, GyroBoschConfig, GyroVariant};

use core::fmt::Write;

use crate::board::Board;
use crate::common::{Converter, DecodeError, ModuleId, Transport};
use crate::signal::SignalSpec;

/// Symbolic signal name used to label data without raw register numbers.
pub type SignalName = heapless::String<32>;

/// A fixed-layout module config record stored as its wire bytes.
pub trait ConfigRecord: Sized + Copy {
    const MODULE: ModuleId;
    const LEN: usize;

    /// The record exactly as it goes on the wire.
    fn as_bytes(&self) -> &[u8];

    /// Builds a record from exactly `LEN` bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError>;

    fn into_entry(self) -> ModuleConfig;
    fn from_entry(entry: &ModuleConfig) -> Option<&Self>;
    fn from_entry_mut(entry: &mut ModuleConfig) -> Option<&mut Self>;
}

/// Config record of one module, as held by the board.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ModuleConfig {
    AmbientLight(Ltr329Config),
    Gyro(GyroBoschConfig),
}

impl ModuleConfig {
    pub fn module(&self) -> ModuleId {
        match self {
            ModuleConfig::AmbientLight(_) => Ltr329Config::MODULE,
            ModuleConfig::Gyro(_) => GyroBoschConfig::MODULE,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ModuleConfig::AmbientLight(c) => c.as_bytes(),
            ModuleConfig::Gyro(c) => c.as_bytes(),
        }
    }

    /// Builds the record for `module` from a persisted blob. Returns `None`
    /// for a module no driver knows.
    pub fn from_bytes(module: ModuleId, bytes: &[u8]) -> Option<Result<Self, DecodeError>> {
        match module {
            ModuleId::AMBIENT_LIGHT => Some(Ltr329Config::from_bytes(bytes).map(Self::AmbientLight)),
            ModuleId::GYRO => Some(GyroBoschConfig::from_bytes(bytes).map(Self::Gyro)),
            _ => None,
        }
    }
}

/// Checks a blob against a record length.
pub(crate) fn exact_len(bytes: &[u8], len: usize) -> Result<(), DecodeError> {
    if bytes.len() == len {
        Ok(())
    } else {
        Err(DecodeError::LengthMismatch {
            expected: len,
            got: bytes.len(),
        })
    }
}

/// Reads `width` bits of `byte` starting at bit `shift`.
#[inline]
pub(crate) const fn get_bits(byte: u8, shift: u8, width: u8) -> u8 {
    (byte >> shift) & ((1 << width) - 1)
}

/// Writes the low `width` bits of `value` into `byte` at bit `shift`.
#[inline]
pub(crate) fn set_bits(byte: &mut u8, shift: u8, width: u8, value: u8) {
    let mask = ((1u8 << width) - 1) << shift;
    *byte = (*byte & !mask) | ((value << shift) & mask);
}

/// Runs every driver's initialization against the board's capabilities.
pub(crate) fn init_modules<T: Transport>(board: &mut Board<T>) {
    ambient_light::init(board);
    gyro::init(board);
}

/// Current scale factor of a converter, read from live module config.
pub(crate) fn converter_scale<T: Transport>(board: &Board<T>, converter: Converter) -> f32 {
    match converter {
        Converter::Identity => 1.0,
        Converter::BoschRotation => board
            .config::<GyroBoschConfig>()
            .map(GyroBoschConfig::data_scale)
            .unwrap_or(1.0),
    }
}

/// Stable name for a signal, delegated to the driver owning its module.
/// `channel` is the component index when `spec` is a component view.
pub fn signal_name(spec: &SignalSpec, channel: Option<u8>) -> Option<SignalName> {
    let base = match spec.header.module() {
        ModuleId::AMBIENT_LIGHT => ambient_light::signal_base_name(spec.header.register()),
        ModuleId::GYRO => gyro::signal_base_name(spec.header.register()),
        _ => None,
    }?;

    let mut name = SignalName::new();
    name.push_str(base).ok()?;
    if let Some(index) = channel {
        if spec.channel_count == 1 && is_multi_channel(spec) {
            write!(name, "[{}]", index).ok()?;
        }
    }
    Some(name)
}

// Single-channel leaves only carry an index when their register produces
// multi-channel samples.
fn is_multi_channel(spec: &SignalSpec) -> bool {
    match spec.header.module() {
        ModuleId::GYRO => gyro::is_multi_channel_register(spec.header.register()),
        _ => false,
    }
}
