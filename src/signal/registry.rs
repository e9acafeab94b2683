// src/signal/registry.rs

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use super::{DataSignal, DataValue, PhysicalSample, RawSample, SignalHandle, SignalSpec};
use crate::common::{Converter, DecodeError, ModuleId, RegisterHeader};

/// Identifies a subscription for later removal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u32);

type DataCallback = Box<dyn FnMut(&DataValue)>;

struct Subscriber {
    id: SubscriptionId,
    handle: SignalHandle,
    callback: DataCallback,
}

/// Board-owned store of data signals keyed by register header, plus the
/// callbacks subscribed to them.
#[derive(Default)]
pub struct SignalRegistry {
    signals: BTreeMap<RegisterHeader, DataSignal>,
    subscribers: Vec<Subscriber>,
    next_id: u32,
}

impl SignalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the signal registered under `spec.header`, registering a new
    /// one built from `spec` if there is none. An existing signal is never
    /// replaced.
    pub fn get_or_create(&mut self, spec: SignalSpec) -> &mut DataSignal {
        self.signals
            .entry(spec.header)
            .or_insert_with(|| DataSignal::new(spec))
    }

    pub fn get(&self, header: RegisterHeader) -> Option<&DataSignal> {
        self.signals.get(&header)
    }

    pub fn contains(&self, header: RegisterHeader) -> bool {
        self.signals.contains_key(&header)
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Unregisters the signal under `header` and drops its subscriptions.
    pub fn remove(&mut self, header: RegisterHeader) -> Option<DataSignal> {
        self.subscribers.retain(|s| s.handle.header() != header);
        self.signals.remove(&header)
    }

    /// Unregisters every signal of `module` and drops their subscriptions.
    pub fn remove_module(&mut self, module: ModuleId) {
        self.subscribers.retain(|s| s.handle.header().module() != module);
        self.signals.retain(|header, _| header.module() != module);
    }

    /// Components of the signal under `header`, synthesized on first call.
    pub fn decompose(&mut self, header: RegisterHeader) -> Option<&[SignalSpec]> {
        self.signals.get_mut(&header).map(|s| &*s.decompose())
    }

    /// The layout a handle refers to, if it names a registered signal or an
    /// already-synthesized component.
    pub fn resolve(&self, handle: SignalHandle) -> Option<SignalSpec> {
        let signal = self.signals.get(&handle.header())?;
        match handle.component_index() {
            None => Some(*signal.spec()),
            Some(i) => signal.components().get(usize::from(i)).copied(),
        }
    }

    /// Registers `callback` for every sample published on `handle`.
    ///
    /// Returns `None` if the handle does not resolve.
    pub fn subscribe(
        &mut self,
        handle: SignalHandle,
        callback: impl FnMut(&DataValue) + 'static,
    ) -> Option<SubscriptionId> {
        self.resolve(handle)?;
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.subscribers.push(Subscriber {
            id,
            handle,
            callback: Box::new(callback),
        });
        Some(id)
    }

    /// Removes a subscription. Returns whether it existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Decodes `payload` through the signal under `header` and hands every
    /// sample to its subscribers, and each channel to subscribers of the
    /// matching component.
    ///
    /// `scale` resolves a converter to its current scale factor. Returns the
    /// number of samples published, or `Ok(0)` if no signal is registered.
    pub fn publish(
        &mut self,
        header: RegisterHeader,
        payload: &[u8],
        scale: impl Fn(Converter) -> f32,
    ) -> Result<usize, DecodeError> {
        let Some(signal) = self.signals.get(&header) else {
            return Ok(0);
        };
        let spec = *signal.spec();
        let samples = spec.decode(payload)?;
        let factor = scale(spec.converter);

        for raw in &samples {
            let value = spec.to_physical(raw, factor);
            for subscriber in self.subscribers.iter_mut() {
                if subscriber.handle.header() != header {
                    continue;
                }
                match subscriber.handle.component_index() {
                    None => (subscriber.callback)(&DataValue {
                        header,
                        channel: None,
                        raw: raw.clone(),
                        value: value.clone(),
                    }),
                    Some(i) => {
                        let index = usize::from(i);
                        if let (Some(&r), Some(&v)) = (raw.get(index), value.get(index)) {
                            (subscriber.callback)(&DataValue {
                                header,
                                channel: Some(i),
                                raw: RawSample::from_slice(&[r]).unwrap_or_default(),
                                value: PhysicalSample::from_slice(&[v]).unwrap_or_default(),
                            });
                        }
                    }
                }
            }
        }
        Ok(samples.len())
    }
}
