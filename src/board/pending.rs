// src/board/pending.rs

use alloc::boxed::Box;
use alloc::collections::BTreeMap;

use crate::common::ModuleId;

/// Group of read requests sharing one outstanding-request slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReadFamily {
    AmbientLightConfig,
    GyroConfig,
}

impl ReadFamily {
    pub const ALL: [ReadFamily; 2] = [ReadFamily::AmbientLightConfig, ReadFamily::GyroConfig];

    /// Module whose responses resolve this family.
    pub const fn module(self) -> ModuleId {
        match self {
            ReadFamily::AmbientLightConfig => ModuleId::AMBIENT_LIGHT,
            ReadFamily::GyroConfig => ModuleId::GYRO,
        }
    }
}

/// Outcome reported to a read-completion callback.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReadStatus {
    Ok,
    /// The response could not be applied, or the request was never sent.
    Error,
}

/// Completion callback of a read. Context travels in the closure's captures.
pub type ReadCallback<B> = Box<dyn FnOnce(&mut B, ReadStatus)>;

/// One outstanding read per family. Storing over a filled slot drops the
/// previous callback without calling it.
pub struct PendingReads<B> {
    slots: BTreeMap<ReadFamily, ReadCallback<B>>,
}

impl<B> Default for PendingReads<B> {
    fn default() -> Self {
        PendingReads {
            slots: BTreeMap::new(),
        }
    }
}

impl<B> PendingReads<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills the slot of `family`. Returns `true` if an earlier callback was
    /// superseded.
    pub fn store(&mut self, family: ReadFamily, callback: ReadCallback<B>) -> bool {
        self.slots.insert(family, callback).is_some()
    }

    /// Empties the slot of `family`, handing back its callback.
    pub fn take(&mut self, family: ReadFamily) -> Option<ReadCallback<B>> {
        self.slots.remove(&family)
    }

    pub fn is_pending(&self, family: ReadFamily) -> bool {
        self.slots.contains_key(&family)
    }

    /// Drops the callback of `family` without calling it.
    pub fn clear(&mut self, family: ReadFamily) {
        self.slots.remove(&family);
    }
}
