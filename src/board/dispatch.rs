// src/board/dispatch.rs

use alloc::collections::BTreeMap;

use crate::common::{ModuleId, RegisterHeader};

/// Handler run when a notification for its header arrives. `C` is the
/// context the handler mutates (the board).
pub type ResponseHandler<C> = fn(&mut C, RegisterHeader, &[u8]);

/// Maps each register header to at most one response handler.
pub struct ResponseTable<C> {
    handlers: BTreeMap<RegisterHeader, ResponseHandler<C>>,
}

impl<C> Default for ResponseTable<C> {
    fn default() -> Self {
        ResponseTable {
            handlers: BTreeMap::new(),
        }
    }
}

impl<C> ResponseTable<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `handler` with `header`, returning the handler it replaced.
    pub fn register(
        &mut self,
        header: RegisterHeader,
        handler: ResponseHandler<C>,
    ) -> Option<ResponseHandler<C>> {
        self.handlers.insert(header, handler)
    }

    pub fn unregister(&mut self, header: RegisterHeader) -> Option<ResponseHandler<C>> {
        self.handlers.remove(&header)
    }

    /// Drops every handler registered for a register of `module`.
    pub fn unregister_module(&mut self, module: ModuleId) {
        self.handlers.retain(|header, _| header.module() != module);
    }

    pub fn get(&self, header: RegisterHeader) -> Option<ResponseHandler<C>> {
        self.handlers.get(&header).copied()
    }

    pub fn contains(&self, header: RegisterHeader) -> bool {
        self.handlers.contains_key(&header)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
