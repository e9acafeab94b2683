//! Bosch gyroscope (BMI160 and BMI270).
//!
//! Both chips share one config record and register map:
//!
//! | byte | bits | field            |
//! |------|------|------------------|
//! | 0    | 0-3  | output data rate |
//! | 0    | 4-5  | bandwidth        |
//! | 1    | 0-2  | range            |
//! | 2    | all  | data interrupt   |
//!
//! Only the first two bytes go out with `write_config`; the interrupt byte
//! is driven by the rotation sampling commands.

use alloc::boxed::Box;
use log::{debug, warn};

use super::{exact_len, get_bits, set_bits, ConfigRecord, ModuleConfig};
use crate::board::{self, Board, ReadFamily, ReadStatus};
use crate::common::{
    Command, Converter, DecodeError, Error, Interpreter, ModuleId, RegisterHeader, Transport,
};
use crate::signal::{SignalHandle, SignalSpec};

pub const POWER_MODE: u8 = 1;
pub const DATA_INTERRUPT_ENABLE: u8 = 2;
pub const CONFIG: u8 = 3;
pub const DATA: u8 = 5;
pub const PACKED_GYRO_DATA: u8 = 7;
/// BMI270 only.
pub const OFFSET: u8 = 8;

/// Samples carried by one packed notification.
pub const PACKED_SAMPLES: u8 = 3;

/// Firmware revision from which BMI160 boards stream packed data.
const PACKED_DATA_REVISION: u8 = 1;

/// LSB per degree/s for each range code.
const FSR_SCALE: [f32; 5] = [16.4, 32.8, 65.6, 131.2, 262.4];

/// Chip implementing the gyro module.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GyroVariant {
    Bmi160,
    Bmi270,
}

impl GyroVariant {
    /// Variant for a capability-table implementation id.
    pub const fn from_implementation(implementation: u8) -> Option<Self> {
        match implementation {
            0 => Some(GyroVariant::Bmi160),
            1 => Some(GyroVariant::Bmi270),
            _ => None,
        }
    }

    pub const fn implementation(self) -> u8 {
        match self {
            GyroVariant::Bmi160 => 0,
            GyroVariant::Bmi270 => 1,
        }
    }

    /// Register holding the axis offsets, if the chip has one.
    pub const fn offset_register(self) -> Option<u8> {
        match self {
            GyroVariant::Bmi160 => None,
            GyroVariant::Bmi270 => Some(OFFSET),
        }
    }

    fn streams_packed(self, revision: u8) -> bool {
        match self {
            GyroVariant::Bmi160 => revision >= PACKED_DATA_REVISION,
            GyroVariant::Bmi270 => true,
        }
    }
}

/// Output data rate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Odr {
    Hz25 = 6,
    Hz50 = 7,
    Hz100 = 8,
    Hz200 = 9,
    Hz400 = 10,
    Hz800 = 11,
    Hz1600 = 12,
    Hz3200 = 13,
}

impl Odr {
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            6 => Some(Odr::Hz25),
            7 => Some(Odr::Hz50),
            8 => Some(Odr::Hz100),
            9 => Some(Odr::Hz200),
            10 => Some(Odr::Hz400),
            11 => Some(Odr::Hz800),
            12 => Some(Odr::Hz1600),
            13 => Some(Odr::Hz3200),
            _ => None,
        }
    }

    pub fn hz(self) -> f32 {
        match self {
            Odr::Hz25 => 25.0,
            Odr::Hz50 => 50.0,
            Odr::Hz100 => 100.0,
            Odr::Hz200 => 200.0,
            Odr::Hz400 => 400.0,
            Odr::Hz800 => 800.0,
            Odr::Hz1600 => 1600.0,
            Odr::Hz3200 => 3200.0,
        }
    }

    /// Closest supported rate to `hz`.
    pub fn approximate(hz: f32) -> Self {
        if hz > 2400.0 {
            Odr::Hz3200
        } else if hz > 1200.0 {
            Odr::Hz1600
        } else if hz > 600.0 {
            Odr::Hz800
        } else if hz > 300.0 {
            Odr::Hz400
        } else if hz > 150.0 {
            Odr::Hz200
        } else if hz > 75.0 {
            Odr::Hz100
        } else if hz > 37.0 {
            Odr::Hz50
        } else {
            Odr::Hz25
        }
    }
}

/// Full-scale range in degrees per second.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Range {
    Dps2000 = 0,
    Dps1000 = 1,
    Dps500 = 2,
    Dps250 = 3,
    Dps125 = 4,
}

impl Range {
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Range::Dps2000),
            1 => Some(Range::Dps1000),
            2 => Some(Range::Dps500),
            3 => Some(Range::Dps250),
            4 => Some(Range::Dps125),
            _ => None,
        }
    }

    pub const fn dps(self) -> u16 {
        match self {
            Range::Dps2000 => 2000,
            Range::Dps1000 => 1000,
            Range::Dps500 => 500,
            Range::Dps250 => 250,
            Range::Dps125 => 125,
        }
    }

    /// Raw counts per degree/s.
    pub fn scale(self) -> f32 {
        FSR_SCALE[self as usize]
    }

    /// Closest supported range to `dps`.
    pub fn approximate(dps: f32) -> Self {
        if dps > 1500.0 {
            Range::Dps2000
        } else if dps > 750.0 {
            Range::Dps1000
        } else if dps > 375.0 {
            Range::Dps500
        } else if dps > 180.0 {
            Range::Dps250
        } else {
            Range::Dps125
        }
    }
}

/// Bosch gyro config record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GyroBoschConfig([u8; 3]);

impl Default for GyroBoschConfig {
    fn default() -> Self {
        let mut config = GyroBoschConfig([0; 3]);
        config.set_odr(Odr::Hz100);
        config.set_bandwidth(2);
        config.set_range(Range::Dps2000);
        config
    }
}

impl GyroBoschConfig {
    pub const fn odr(&self) -> Option<Odr> {
        Odr::from_code(get_bits(self.0[0], 0, 4))
    }

    pub fn set_odr(&mut self, odr: Odr) {
        set_bits(&mut self.0[0], 0, 4, odr as u8);
    }

    pub const fn bandwidth(&self) -> u8 {
        get_bits(self.0[0], 4, 2)
    }

    pub fn set_bandwidth(&mut self, bandwidth: u8) {
        set_bits(&mut self.0[0], 4, 2, bandwidth);
    }

    pub const fn range(&self) -> Option<Range> {
        Range::from_code(get_bits(self.0[1], 0, 3))
    }

    pub fn set_range(&mut self, range: Range) {
        set_bits(&mut self.0[1], 0, 3, range as u8);
    }

    pub const fn interrupt_enable(&self) -> u8 {
        self.0[2]
    }

    pub fn set_interrupt_enable(&mut self, value: u8) {
        self.0[2] = value;
    }

    /// Divisor turning raw counts into degrees/s under the current range.
    /// An unrecognized range scales as 250 dps.
    pub fn data_scale(&self) -> f32 {
        self.range().unwrap_or(Range::Dps250).scale()
    }
}

impl ConfigRecord for GyroBoschConfig {
    const MODULE: ModuleId = ModuleId::GYRO;
    const LEN: usize = 3;

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        exact_len(bytes, Self::LEN)?;
        Ok(GyroBoschConfig([bytes[0], bytes[1], bytes[2]]))
    }

    fn into_entry(self) -> ModuleConfig {
        ModuleConfig::Gyro(self)
    }

    fn from_entry(entry: &ModuleConfig) -> Option<&Self> {
        match entry {
            ModuleConfig::Gyro(config) => Some(config),
            _ => None,
        }
    }

    fn from_entry_mut(entry: &mut ModuleConfig) -> Option<&mut Self> {
        match entry {
            ModuleConfig::Gyro(config) => Some(config),
            _ => None,
        }
    }
}

pub(crate) const fn rotation_spec(register: u8) -> SignalSpec {
    SignalSpec::new(
        RegisterHeader::new(ModuleId::GYRO, register),
        Interpreter::BoschRotation,
        Converter::BoschRotation,
        3,
        2,
    )
}

pub(crate) fn signal_base_name(register: u8) -> Option<&'static str> {
    match register {
        DATA | PACKED_GYRO_DATA => Some("angular-velocity"),
        _ => None,
    }
}

pub(crate) fn is_multi_channel_register(register: u8) -> bool {
    matches!(register, DATA | PACKED_GYRO_DATA)
}

pub(crate) fn init<T: Transport>(board: &mut Board<T>) {
    let module = GyroBoschConfig::MODULE;
    let info = board.capabilities();
    if !info.is_present(module) {
        board.remove_module(module);
        return;
    }
    let implementation = info.implementation(module);
    let revision = info.revision(module);
    let Some(variant) = GyroVariant::from_implementation(implementation) else {
        debug!("gyro implementation {} not supported, skipping init", implementation);
        board.remove_module(module);
        return;
    };

    board.insert_config_if_absent(GyroBoschConfig::default());

    let rotation = rotation_spec(DATA);
    let signals = board.signals_mut();
    signals.get_or_create(rotation);
    signals.decompose(rotation.header);
    board.register_response(rotation.header, board::publish_data::<T>);

    let packed = rotation_spec(PACKED_GYRO_DATA).packed(PACKED_SAMPLES);
    if variant.streams_packed(revision) {
        board.signals_mut().get_or_create(packed);
        board.register_response(packed.header, board::publish_data::<T>);
    } else {
        board.remove_signal(packed.header);
    }

    board.register_response(RegisterHeader::read(module, CONFIG), on_config_response::<T>);
    board.register_response(
        RegisterHeader::read(module, DATA_INTERRUPT_ENABLE),
        on_interrupt_response::<T>,
    );
}

// First half of a config read: refresh odr/bandwidth/range, then fetch the
// interrupt state before telling the caller.
fn on_config_response<T: Transport>(board: &mut Board<T>, _header: RegisterHeader, payload: &[u8]) {
    let Some(bytes) = payload.get(..2) else {
        board.resolve_read(ReadFamily::GyroConfig, ReadStatus::Error);
        return;
    };
    if let Some(config) = board.config_mut::<GyroBoschConfig>() {
        config.0[..2].copy_from_slice(bytes);
    }

    let Some(callback) = board.take_pending(ReadFamily::GyroConfig) else {
        debug!("gyro config response with no pending read");
        return;
    };
    let command = Command::read(GyroBoschConfig::MODULE, DATA_INTERRUPT_ENABLE);
    if let Err(e) = board.request_read(ReadFamily::GyroConfig, command, callback) {
        warn!("gyro interrupt read failed: {:?}", e);
    }
}

fn on_interrupt_response<T: Transport>(board: &mut Board<T>, _header: RegisterHeader, payload: &[u8]) {
    let status = match payload.first() {
        Some(&value) => {
            if let Some(config) = board.config_mut::<GyroBoschConfig>() {
                config.set_interrupt_enable(value);
            }
            ReadStatus::Ok
        }
        None => ReadStatus::Error,
    };
    board.resolve_read(ReadFamily::GyroConfig, status);
}

impl<T: Transport> Board<T> {
    /// Driver for the gyro, if the board has a supported one.
    pub fn gyro(&mut self) -> Result<Gyro<'_, T>, Error<T::Error>> {
        let module = GyroBoschConfig::MODULE;
        if self.config::<GyroBoschConfig>().is_none() {
            return Err(Error::ModuleNotPresent(module));
        }
        let implementation = self.capabilities().implementation(module);
        let variant = GyroVariant::from_implementation(implementation)
            .ok_or(Error::UnsupportedImplementation { module, implementation })?;
        Ok(Gyro { board: self, variant })
    }
}

/// Typed access to the Bosch gyro on one board.
///
/// Setters change the in-memory record only; call [`write_config`] to send
/// it to the sensor.
///
/// [`write_config`]: Gyro::write_config
pub struct Gyro<'a, T: Transport> {
    board: &'a mut Board<T>,
    variant: GyroVariant,
}

impl<'a, T: Transport> Gyro<'a, T> {
    pub fn variant(&self) -> GyroVariant {
        self.variant
    }

    /// Copy of the current config record.
    pub fn config(&self) -> GyroBoschConfig {
        self.board.config::<GyroBoschConfig>().copied().unwrap_or_default()
    }

    fn modify(&mut self, f: impl FnOnce(&mut GyroBoschConfig)) {
        if let Some(config) = self.board.config_mut::<GyroBoschConfig>() {
            f(config);
        }
    }

    fn send_write(&mut self, register: u8, payload: &[u8]) -> Result<(), Error<T::Error>> {
        let command = Command::write(GyroBoschConfig::MODULE, register, payload)
            .map_err(|e| Error::CommandTooLong { len: e.len })?;
        self.board.send(&command)
    }

    pub fn set_odr(&mut self, odr: Odr) {
        self.modify(|c| c.set_odr(odr));
    }

    /// Picks the supported rate closest to `hz` and returns it.
    pub fn set_odr_approximate(&mut self, hz: f32) -> Odr {
        let odr = Odr::approximate(hz);
        self.set_odr(odr);
        odr
    }

    /// Output data rate in Hz; 25 if the stored code is not recognized.
    pub fn odr(&self) -> f32 {
        self.config().odr().map_or(25.0, Odr::hz)
    }

    pub fn set_range(&mut self, range: Range) {
        self.modify(|c| c.set_range(range));
    }

    /// Picks the supported range closest to `dps` and returns it.
    pub fn set_range_approximate(&mut self, dps: f32) -> Range {
        let range = Range::approximate(dps);
        self.set_range(range);
        range
    }

    /// Range in degrees/s; 250 if the stored code is not recognized.
    pub fn range(&self) -> u16 {
        self.config().range().map_or(250, Range::dps)
    }

    /// Sends rate, bandwidth and range to the sensor.
    pub fn write_config(&mut self) -> Result<(), Error<T::Error>> {
        let config = self.config();
        self.send_write(CONFIG, &config.as_bytes()[..2])
    }

    /// Requests the sensor's config, then its interrupt state. `callback`
    /// runs once, after both have been refreshed.
    pub fn read_config(
        &mut self,
        callback: impl FnOnce(&mut Board<T>, ReadStatus) + 'static,
    ) -> Result<(), Error<T::Error>> {
        self.board.request_read(
            ReadFamily::GyroConfig,
            Command::read(GyroBoschConfig::MODULE, CONFIG),
            Box::new(callback),
        )
    }

    /// Powers the gyro up. Leaves [`is_active`](Gyro::is_active) alone; that
    /// follows [`enable_rotation_sampling`](Gyro::enable_rotation_sampling).
    pub fn start(&mut self) -> Result<(), Error<T::Error>> {
        self.send_write(POWER_MODE, &[1])
    }

    /// Powers the gyro down. Does not change [`is_active`](Gyro::is_active).
    pub fn stop(&mut self) -> Result<(), Error<T::Error>> {
        self.send_write(POWER_MODE, &[0])
    }

    pub fn enable_rotation_sampling(&mut self) -> Result<(), Error<T::Error>> {
        self.modify(|c| c.set_interrupt_enable(1));
        self.send_write(DATA_INTERRUPT_ENABLE, &[0x01, 0x00])
    }

    pub fn disable_rotation_sampling(&mut self) -> Result<(), Error<T::Error>> {
        self.modify(|c| c.set_interrupt_enable(0));
        self.send_write(DATA_INTERRUPT_ENABLE, &[0x00, 0x01])
    }

    /// Whether rotation sampling was last enabled.
    pub fn is_active(&self) -> bool {
        self.config().interrupt_enable() != 0
    }

    /// Writes per-axis offsets. BMI270 only.
    pub fn set_offsets(&mut self, x: u8, y: u8, z: u8) -> Result<(), Error<T::Error>> {
        match self.variant.offset_register() {
            Some(register) => self.send_write(register, &[x, y, z]),
            None => Err(Error::UnsupportedImplementation {
                module: GyroBoschConfig::MODULE,
                implementation: self.variant.implementation(),
            }),
        }
    }

    fn signal(&self, register: u8) -> Result<SignalHandle, Error<T::Error>> {
        let header = RegisterHeader::new(GyroBoschConfig::MODULE, register);
        if self.board.signals().contains(header) {
            Ok(SignalHandle::new(header))
        } else {
            Err(Error::SignalNotFound(header))
        }
    }

    /// X/Y/Z angular velocity in degrees/s. Its components are the single
    /// axes.
    pub fn rotation_data_signal(&self) -> Result<SignalHandle, Error<T::Error>> {
        self.signal(DATA)
    }

    /// Angular velocity delivered several samples per notification.
    pub fn packed_rotation_data_signal(&self) -> Result<SignalHandle, Error<T::Error>> {
        self.signal(PACKED_GYRO_DATA)
    }

    pub fn high_freq_rotation_data_signal(&self) -> Result<SignalHandle, Error<T::Error>> {
        self.packed_rotation_data_signal()
    }
}
