//! LTR329 ambient light sensor.
//!
//! The config record mirrors the chip's control and measurement-rate
//! registers bit for bit:
//!
//! | byte | bits | field            |
//! |------|------|------------------|
//! | 0    | 0-1  | power control    |
//! | 0    | 2-4  | gain             |
//! | 1    | 0-2  | measurement rate |
//! | 1    | 3-5  | integration time |

use alloc::boxed::Box;

use super::{exact_len, get_bits, set_bits, ConfigRecord, ModuleConfig};
use crate::board::{self, Board, ReadFamily, ReadStatus};
use crate::common::{
    Command, Converter, DecodeError, Error, Interpreter, ModuleId, RegisterHeader, Transport,
};
use crate::signal::{SignalHandle, SignalSpec};

pub const ENABLE: u8 = 1;
pub const CONFIG: u8 = 2;
pub const OUTPUT: u8 = 3;

/// Analog gain applied to the photodiode reading.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Gain {
    X1 = 0,
    X2 = 1,
    X4 = 2,
    X8 = 3,
    X48 = 4,
    X96 = 5,
}

impl Gain {
    /// Value stored in the gain field. The chip skips codes 4 and 5.
    pub const fn register_code(self) -> u8 {
        match self {
            Gain::X48 | Gain::X96 => self as u8 + 2,
            _ => self as u8,
        }
    }

    pub const fn from_register_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Gain::X1),
            1 => Some(Gain::X2),
            2 => Some(Gain::X4),
            3 => Some(Gain::X8),
            6 => Some(Gain::X48),
            7 => Some(Gain::X96),
            _ => None,
        }
    }

    pub const fn multiplier(self) -> u8 {
        match self {
            Gain::X1 => 1,
            Gain::X2 => 2,
            Gain::X4 => 4,
            Gain::X8 => 8,
            Gain::X48 => 48,
            Gain::X96 => 96,
        }
    }

    /// Closest supported gain to `gain`.
    pub fn approximate(gain: f32) -> Self {
        if gain < 1.5 {
            Gain::X1
        } else if gain < 3.0 {
            Gain::X2
        } else if gain < 6.0 {
            Gain::X4
        } else if gain < 20.0 {
            Gain::X8
        } else if gain < 75.0 {
            Gain::X48
        } else {
            Gain::X96
        }
    }
}

/// Time the sensor integrates light for one measurement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum IntegrationTime {
    Ms100 = 0,
    Ms50 = 1,
    Ms200 = 2,
    Ms400 = 3,
    Ms150 = 4,
    Ms250 = 5,
    Ms300 = 6,
    Ms350 = 7,
}

impl IntegrationTime {
    pub const fn from_code(code: u8) -> Self {
        match code & 0x07 {
            0 => IntegrationTime::Ms100,
            1 => IntegrationTime::Ms50,
            2 => IntegrationTime::Ms200,
            3 => IntegrationTime::Ms400,
            4 => IntegrationTime::Ms150,
            5 => IntegrationTime::Ms250,
            6 => IntegrationTime::Ms300,
            _ => IntegrationTime::Ms350,
        }
    }

    pub const fn millis(self) -> u16 {
        match self {
            IntegrationTime::Ms50 => 50,
            IntegrationTime::Ms100 => 100,
            IntegrationTime::Ms150 => 150,
            IntegrationTime::Ms200 => 200,
            IntegrationTime::Ms250 => 250,
            IntegrationTime::Ms300 => 300,
            IntegrationTime::Ms350 => 350,
            IntegrationTime::Ms400 => 400,
        }
    }
}

/// Interval between measurements.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MeasurementRate {
    Ms50 = 0,
    Ms100 = 1,
    Ms200 = 2,
    Ms500 = 3,
    Ms1000 = 4,
    Ms2000 = 5,
}

impl MeasurementRate {
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(MeasurementRate::Ms50),
            1 => Some(MeasurementRate::Ms100),
            2 => Some(MeasurementRate::Ms200),
            3 => Some(MeasurementRate::Ms500),
            4 => Some(MeasurementRate::Ms1000),
            5 => Some(MeasurementRate::Ms2000),
            _ => None,
        }
    }

    /// Measurements per second.
    pub fn hz(self) -> f32 {
        match self {
            MeasurementRate::Ms50 => 20.0,
            MeasurementRate::Ms100 => 10.0,
            MeasurementRate::Ms200 => 5.0,
            MeasurementRate::Ms500 => 2.0,
            MeasurementRate::Ms1000 => 1.0,
            MeasurementRate::Ms2000 => 0.5,
        }
    }

    /// Closest supported rate to `hz`.
    pub fn approximate(hz: f32) -> Self {
        if hz < 0.75 {
            MeasurementRate::Ms2000
        } else if hz < 1.5 {
            MeasurementRate::Ms1000
        } else if hz < 3.0 {
            MeasurementRate::Ms500
        } else if hz < 8.0 {
            MeasurementRate::Ms200
        } else if hz < 15.0 {
            MeasurementRate::Ms100
        } else {
            MeasurementRate::Ms50
        }
    }
}

/// LTR329 config record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Ltr329Config([u8; 2]);

impl Default for Ltr329Config {
    fn default() -> Self {
        let mut config = Ltr329Config([0; 2]);
        config.set_measurement_rate(MeasurementRate::Ms2000);
        config
    }
}

impl Ltr329Config {
    pub const fn power_control(&self) -> u8 {
        get_bits(self.0[0], 0, 2)
    }

    pub fn set_power_control(&mut self, value: u8) {
        set_bits(&mut self.0[0], 0, 2, value);
    }

    /// `None` if the stored code names no gain.
    pub const fn gain(&self) -> Option<Gain> {
        Gain::from_register_code(get_bits(self.0[0], 2, 3))
    }

    pub fn set_gain(&mut self, gain: Gain) {
        set_bits(&mut self.0[0], 2, 3, gain.register_code());
    }

    pub const fn measurement_rate(&self) -> Option<MeasurementRate> {
        MeasurementRate::from_code(get_bits(self.0[1], 0, 3))
    }

    pub fn set_measurement_rate(&mut self, rate: MeasurementRate) {
        set_bits(&mut self.0[1], 0, 3, rate as u8);
    }

    pub const fn integration_time(&self) -> IntegrationTime {
        IntegrationTime::from_code(get_bits(self.0[1], 3, 3))
    }

    pub fn set_integration_time(&mut self, time: IntegrationTime) {
        set_bits(&mut self.0[1], 3, 3, time as u8);
    }
}

impl ConfigRecord for Ltr329Config {
    const MODULE: ModuleId = ModuleId::AMBIENT_LIGHT;
    const LEN: usize = 2;

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        exact_len(bytes, Self::LEN)?;
        Ok(Ltr329Config([bytes[0], bytes[1]]))
    }

    fn into_entry(self) -> ModuleConfig {
        ModuleConfig::AmbientLight(self)
    }

    fn from_entry(entry: &ModuleConfig) -> Option<&Self> {
        match entry {
            ModuleConfig::AmbientLight(config) => Some(config),
            _ => None,
        }
    }

    fn from_entry_mut(entry: &mut ModuleConfig) -> Option<&mut Self> {
        match entry {
            ModuleConfig::AmbientLight(config) => Some(config),
            _ => None,
        }
    }
}

const fn illuminance_spec() -> SignalSpec {
    SignalSpec::new(
        RegisterHeader::new(ModuleId::AMBIENT_LIGHT, OUTPUT),
        Interpreter::Uint32,
        Converter::Identity,
        1,
        4,
    )
}

pub(crate) fn signal_base_name(register: u8) -> Option<&'static str> {
    match register {
        OUTPUT => Some("illuminance"),
        _ => None,
    }
}

pub(crate) fn init<T: Transport>(board: &mut Board<T>) {
    let module = Ltr329Config::MODULE;
    if !board.capabilities().is_present(module) {
        board.remove_module(module);
        return;
    }

    board.insert_config_if_absent(Ltr329Config::default());
    board.signals_mut().get_or_create(illuminance_spec());
    board.register_response(RegisterHeader::new(module, OUTPUT), board::publish_data::<T>);
    board.register_response(RegisterHeader::read(module, CONFIG), on_config_response::<T>);
}

fn on_config_response<T: Transport>(board: &mut Board<T>, _header: RegisterHeader, payload: &[u8]) {
    let status = match payload.get(..Ltr329Config::LEN) {
        Some(bytes) => {
            if let Some(config) = board.config_mut::<Ltr329Config>() {
                config.0.copy_from_slice(bytes);
            }
            ReadStatus::Ok
        }
        None => ReadStatus::Error,
    };
    board.resolve_read(ReadFamily::AmbientLightConfig, status);
}

impl<T: Transport> Board<T> {
    /// Driver for the ambient light sensor, if the board has one.
    pub fn ambient_light(&mut self) -> Result<AmbientLight<'_, T>, Error<T::Error>> {
        if self.config::<Ltr329Config>().is_none() {
            return Err(Error::ModuleNotPresent(Ltr329Config::MODULE));
        }
        Ok(AmbientLight { board: self })
    }
}

/// Typed access to the LTR329 on one board.
///
/// Setters change the in-memory record only; call [`write_config`] to send
/// it to the sensor.
///
/// [`write_config`]: AmbientLight::write_config
pub struct AmbientLight<'a, T: Transport> {
    board: &'a mut Board<T>,
}

impl<'a, T: Transport> AmbientLight<'a, T> {
    /// Copy of the current config record.
    pub fn config(&self) -> Ltr329Config {
        self.board.config::<Ltr329Config>().copied().unwrap_or_default()
    }

    fn modify(&mut self, f: impl FnOnce(&mut Ltr329Config)) {
        if let Some(config) = self.board.config_mut::<Ltr329Config>() {
            f(config);
        }
    }

    pub fn set_gain(&mut self, gain: Gain) {
        self.modify(|c| c.set_gain(gain));
    }

    /// Picks the supported gain closest to `gain` and returns it.
    pub fn set_gain_approximate(&mut self, gain: f32) -> Gain {
        let gain = Gain::approximate(gain);
        self.set_gain(gain);
        gain
    }

    /// Gain multiplier; 1 if the stored code is not recognized.
    pub fn gain(&self) -> u8 {
        self.config().gain().map_or(1, Gain::multiplier)
    }

    pub fn set_integration_time(&mut self, time: IntegrationTime) {
        self.modify(|c| c.set_integration_time(time));
    }

    pub fn integration_time(&self) -> IntegrationTime {
        self.config().integration_time()
    }

    pub fn set_measurement_rate(&mut self, rate: MeasurementRate) {
        self.modify(|c| c.set_measurement_rate(rate));
    }

    /// Picks the supported rate closest to `hz` and returns it.
    pub fn set_measurement_rate_approximate(&mut self, hz: f32) -> MeasurementRate {
        let rate = MeasurementRate::approximate(hz);
        self.set_measurement_rate(rate);
        rate
    }

    /// Measurement rate in Hz; 1.0 if the stored code is not recognized.
    pub fn measurement_rate(&self) -> f32 {
        self.config().measurement_rate().map_or(1.0, MeasurementRate::hz)
    }

    /// Sends the current record to the sensor.
    pub fn write_config(&mut self) -> Result<(), Error<T::Error>> {
        let config = self.config();
        let command = Command::write(Ltr329Config::MODULE, CONFIG, config.as_bytes())
            .map_err(|e| Error::CommandTooLong { len: e.len })?;
        self.board.send(&command)
    }

    /// Requests the sensor's config. `callback` runs once the record has
    /// been refreshed from the response.
    pub fn read_config(
        &mut self,
        callback: impl FnOnce(&mut Board<T>, ReadStatus) + 'static,
    ) -> Result<(), Error<T::Error>> {
        self.board.request_read(
            ReadFamily::AmbientLightConfig,
            Command::read(Ltr329Config::MODULE, CONFIG),
            Box::new(callback),
        )
    }

    pub fn start(&mut self) -> Result<(), Error<T::Error>> {
        self.set_enabled(true)
    }

    pub fn stop(&mut self) -> Result<(), Error<T::Error>> {
        self.set_enabled(false)
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), Error<T::Error>> {
        let value = u8::from(enabled);
        self.modify(|c| c.set_power_control(value));
        let command = Command::write(Ltr329Config::MODULE, ENABLE, &[value])
            .map_err(|e| Error::CommandTooLong { len: e.len })?;
        self.board.send(&command)
    }

    /// Whether the sensor was last told to start.
    pub fn is_active(&self) -> bool {
        self.config().power_control() & 1 == 1
    }

    /// Illuminance in lux, one unsigned 32-bit value per measurement.
    pub fn illuminance_data_signal(&self) -> Result<SignalHandle, Error<T::Error>> {
        let header = illuminance_spec().header;
        if self.board.signals().contains(header) {
            Ok(SignalHandle::new(header))
        } else {
            Err(Error::SignalNotFound(header))
        }
    }
}
