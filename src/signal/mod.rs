//! Data signals: how a notification payload decomposes into typed,
//! scaled channels.
//!
//! A [`DataSignal`] is either a single-channel leaf or a composite whose
//! components are single-channel views into the same payload. Components
//! are synthesized on first request and never rebuilt.

mod decode;
mod registry;

pub use decode::{read_channel, RawSample};
pub use registry::{SignalRegistry, SubscriptionId};

use alloc::vec::Vec;
use core::slice;

use crate::common::{Converter, DecodeError, Interpreter, RegisterHeader};

/// Most channels a single sample can carry.
pub const MAX_CHANNELS: usize = 4;

/// Physical-unit values of one sample.
pub type PhysicalSample = heapless::Vec<f32, MAX_CHANNELS>;

/// Layout and interpretation of one slice of a notification payload.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SignalSpec {
    /// Register the payload arrives on.
    pub header: RegisterHeader,
    pub interpreter: Interpreter,
    pub converter: Converter,
    /// Independent values per sample (1 for a single axis, 3 for X/Y/Z).
    pub channel_count: u8,
    /// Byte width of one channel's raw value.
    pub unit_byte_length: u8,
    /// Samples packed into one notification.
    pub repeat_count: u8,
    /// Start of this signal's bytes within the payload.
    pub byte_offset: u8,
}

impl SignalSpec {
    /// A non-packed signal starting at offset 0.
    pub const fn new(
        header: RegisterHeader,
        interpreter: Interpreter,
        converter: Converter,
        channel_count: u8,
        unit_byte_length: u8,
    ) -> Self {
        SignalSpec {
            header,
            interpreter,
            converter,
            channel_count,
            unit_byte_length,
            repeat_count: 1,
            byte_offset: 0,
        }
    }

    /// Same layout with `repeat_count` samples per notification.
    pub const fn packed(self, repeat_count: u8) -> Self {
        SignalSpec { repeat_count, ..self }
    }

    pub const fn at_offset(self, byte_offset: u8) -> Self {
        SignalSpec { byte_offset, ..self }
    }

    /// Bytes covered by one sample.
    pub fn sample_len(&self) -> usize {
        usize::from(self.channel_count) * usize::from(self.unit_byte_length)
    }

    /// Bytes a payload must hold for a full decode.
    pub fn required_len(&self) -> usize {
        usize::from(self.byte_offset) + self.sample_len() * usize::from(self.repeat_count)
    }

    pub fn is_packed(&self) -> bool {
        self.repeat_count > 1
    }

    /// Decodes `repeat_count` raw samples from `payload`.
    pub fn decode(&self, payload: &[u8]) -> Result<Vec<RawSample>, DecodeError> {
        decode::decode_samples(self, payload)
    }

    /// Scales a raw sample into physical units.
    ///
    /// `scale` is ignored for the identity converter; otherwise each raw
    /// value is divided by it.
    pub fn to_physical(&self, raw: &RawSample, scale: f32) -> PhysicalSample {
        raw.iter()
            .map(|&v| {
                if self.converter.is_identity() {
                    v as f32
                } else {
                    v as f32 / scale
                }
            })
            .collect()
    }

    /// Single-channel view of channel `index`, or `None` if its offset does
    /// not fit a `u8`.
    fn component(&self, index: u8) -> Option<SignalSpec> {
        let byte_offset = index
            .checked_mul(self.unit_byte_length)
            .and_then(|relative| self.byte_offset.checked_add(relative))?;
        Some(SignalSpec {
            header: self.header,
            interpreter: self.interpreter.single_channel(),
            converter: self.converter,
            channel_count: 1,
            unit_byte_length: self.unit_byte_length,
            repeat_count: 1,
            byte_offset,
        })
    }
}

/// A registered signal.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSignal {
    /// Single-channel signal; it is its own sole component.
    Leaf(SignalSpec),
    /// Multi-channel signal. `components` stays empty until first decomposed.
    Composite {
        spec: SignalSpec,
        components: Vec<SignalSpec>,
    },
}

impl DataSignal {
    pub fn new(spec: SignalSpec) -> Self {
        if spec.channel_count > 1 {
            DataSignal::Composite {
                spec,
                components: Vec::new(),
            }
        } else {
            DataSignal::Leaf(spec)
        }
    }

    pub fn spec(&self) -> &SignalSpec {
        match self {
            DataSignal::Leaf(spec) => spec,
            DataSignal::Composite { spec, .. } => spec,
        }
    }

    pub fn header(&self) -> RegisterHeader {
        self.spec().header
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, DataSignal::Composite { .. })
    }

    /// Components without synthesizing them. Empty for a composite that was
    /// never decomposed.
    pub fn components(&self) -> &[SignalSpec] {
        match self {
            DataSignal::Leaf(spec) => slice::from_ref(spec),
            DataSignal::Composite { components, .. } => components,
        }
    }

    /// Components, synthesizing one view per channel on first call.
    ///
    /// A composite whose channels run past the largest addressable offset
    /// stays without components.
    pub fn decompose(&mut self) -> &[SignalSpec] {
        match self {
            DataSignal::Leaf(spec) => slice::from_ref(spec),
            DataSignal::Composite { spec, components } => {
                if components.is_empty() {
                    let views: Option<Vec<SignalSpec>> =
                        (0..spec.channel_count).map(|i| spec.component(i)).collect();
                    *components = views.unwrap_or_default();
                }
                components
            }
        }
    }
}

/// Names a signal, or one component of it, for subscription.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SignalHandle {
    header: RegisterHeader,
    component: Option<u8>,
}

impl SignalHandle {
    pub const fn new(header: RegisterHeader) -> Self {
        SignalHandle { header, component: None }
    }

    pub const fn header(&self) -> RegisterHeader {
        self.header
    }

    pub const fn component_index(&self) -> Option<u8> {
        self.component
    }

    /// Handle for component `index` of this signal.
    pub const fn component(&self, index: u8) -> Self {
        SignalHandle {
            header: self.header,
            component: Some(index),
        }
    }
}

/// One decoded sample delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct DataValue {
    pub header: RegisterHeader,
    /// `Some(i)` when delivered to a subscriber of component `i`.
    pub channel: Option<u8>,
    pub raw: RawSample,
    /// `raw` in physical units.
    pub value: PhysicalSample,
}
