// src/board/info.rs

use alloc::collections::BTreeMap;

use crate::common::{CapabilityProvider, ModuleId};

/// Discovery data for one module.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ModuleInfo {
    pub present: bool,
    /// Chip variant id.
    pub implementation: u8,
    /// Module firmware revision.
    pub revision: u8,
}

impl ModuleInfo {
    /// A present module.
    pub const fn new(implementation: u8, revision: u8) -> Self {
        ModuleInfo {
            present: true,
            implementation,
            revision,
        }
    }
}

/// Capability table of a board. Modules not listed are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardInfo {
    modules: BTreeMap<ModuleId, ModuleInfo>,
}

impl BoardInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, module: ModuleId, info: ModuleInfo) -> Self {
        self.insert(module, info);
        self
    }

    pub fn insert(&mut self, module: ModuleId, info: ModuleInfo) {
        self.modules.insert(module, info);
    }

    pub fn get(&self, module: ModuleId) -> Option<&ModuleInfo> {
        self.modules.get(&module)
    }
}

impl CapabilityProvider for BoardInfo {
    fn is_present(&self, module: ModuleId) -> bool {
        self.get(module).is_some_and(|m| m.present)
    }

    fn implementation(&self, module: ModuleId) -> u8 {
        self.get(module).map_or(0, |m| m.implementation)
    }

    fn revision(&self, module: ModuleId) -> u8 {
        self.get(module).map_or(0, |m| m.revision)
    }
}
