//! The per-board owner of everything the engine tracks: module config
//! records, the response dispatch table, pending reads and the data signal
//! registry.
//!
//! All state lives on one [`Board`] and is mutated from a single context.
//! Commands go out through the [`Transport`]; inbound frames come back in
//! through [`Board::on_notification`].

mod dispatch;
mod info;
mod pending;
mod persist;

pub use dispatch::{ResponseHandler, ResponseTable};
pub use info::{BoardInfo, ModuleInfo};
pub use pending::{PendingReads, ReadCallback, ReadFamily, ReadStatus};

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use log::{debug, trace, warn};

use crate::common::{
    parse_notification, CapabilityProvider, Command, Error, ModuleId, RegisterHeader,
    ResponseParseError, Transport,
};
use crate::sensor::{self, ConfigRecord, ModuleConfig, SignalName};
use crate::signal::{DataValue, SignalHandle, SignalRegistry, SignalSpec, SubscriptionId};

/// One connected sensor board.
pub struct Board<T: Transport> {
    transport: T,
    info: Box<dyn CapabilityProvider>,
    configs: BTreeMap<ModuleId, ModuleConfig>,
    responses: ResponseTable<Board<T>>,
    signals: SignalRegistry,
    pending: PendingReads<Board<T>>,
}

impl<T: Transport> Board<T> {
    /// An empty board. Call [`initialize`](Board::initialize) to set up the
    /// modules `info` reports.
    pub fn new(transport: T, info: impl CapabilityProvider + 'static) -> Self {
        Board {
            transport,
            info: Box::new(info),
            configs: BTreeMap::new(),
            responses: ResponseTable::new(),
            signals: SignalRegistry::new(),
            pending: PendingReads::new(),
        }
    }

    /// Runs every module driver's setup. Safe to repeat: existing config
    /// records and signals are kept, response handlers are re-registered.
    /// Modules and features the capabilities no longer report are removed
    /// along with their signals, subscriptions and handlers.
    pub fn initialize(&mut self) {
        sensor::init_modules(self);
    }

    pub fn capabilities(&self) -> &dyn CapabilityProvider {
        &*self.info
    }

    /// Swaps the capability table. Takes effect on the next `initialize`.
    pub fn set_capabilities(&mut self, info: impl CapabilityProvider + 'static) {
        self.info = Box::new(info);
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consumes the board, returning the transport.
    pub fn release(self) -> T {
        self.transport
    }

    /// Hands one command frame to the transport. Returns at once; a full
    /// outbound queue surfaces as [`Error::WouldBlock`].
    pub fn send(&mut self, command: &Command) -> Result<(), Error<T::Error>> {
        trace!("send {}", command);
        let frame = command.to_bytes();
        match self.transport.send(&frame) {
            Ok(()) => Ok(()),
            Err(nb::Error::WouldBlock) => {
                debug!("transport busy, dropping {}", command);
                Err(Error::WouldBlock)
            }
            Err(nb::Error::Other(e)) => Err(Error::Transport(e)),
        }
    }

    /// Entry point for every inbound frame. Returns whether a handler ran.
    pub fn on_notification(&mut self, frame: &[u8]) -> Result<bool, ResponseParseError> {
        let notification = parse_notification(frame)?;
        Ok(self.dispatch(notification.header, notification.payload))
    }

    /// Runs the handler registered for `header`. Unknown headers are dropped.
    pub fn dispatch(&mut self, header: RegisterHeader, payload: &[u8]) -> bool {
        match self.responses.get(header) {
            Some(handler) => {
                trace!("dispatch {} ({} bytes)", header, payload.len());
                handler(self, header, payload);
                true
            }
            None => {
                debug!("no handler for {}, dropping {} bytes", header, payload.len());
                false
            }
        }
    }

    /// Associates a response handler with `header`, replacing any earlier one.
    pub fn register_response(&mut self, header: RegisterHeader, handler: ResponseHandler<Self>) {
        if self.responses.register(header, handler).is_some() {
            trace!("replaced handler for {}", header);
        }
    }

    pub fn unregister_response(&mut self, header: RegisterHeader) -> bool {
        self.responses.unregister(header).is_some()
    }

    pub fn has_response_handler(&self, header: RegisterHeader) -> bool {
        self.responses.contains(header)
    }

    /// Stores `callback` as the pending read of `family` and sends `command`.
    ///
    /// An earlier callback still waiting in the slot is dropped uncalled. If
    /// the command cannot be sent the callback runs with
    /// [`ReadStatus::Error`] before the error is returned.
    pub fn request_read(
        &mut self,
        family: ReadFamily,
        command: Command,
        callback: ReadCallback<Self>,
    ) -> Result<(), Error<T::Error>> {
        if self.pending.store(family, callback) {
            debug!("{:?} read superseded", family);
        }
        if let Err(e) = self.send(&command) {
            if let Some(callback) = self.pending.take(family) {
                callback(self, ReadStatus::Error);
            }
            return Err(e);
        }
        Ok(())
    }

    /// Clears the pending read of `family` and runs its callback, if any.
    pub fn resolve_read(&mut self, family: ReadFamily, status: ReadStatus) {
        match self.pending.take(family) {
            Some(callback) => callback(self, status),
            None => debug!("{:?} response with no pending read", family),
        }
    }

    pub(crate) fn take_pending(&mut self, family: ReadFamily) -> Option<ReadCallback<Self>> {
        self.pending.take(family)
    }

    pub fn is_read_pending(&self, family: ReadFamily) -> bool {
        self.pending.is_pending(family)
    }

    /// The module's config record, if it has been initialized.
    pub fn config<C: ConfigRecord>(&self) -> Option<&C> {
        self.configs.get(&C::MODULE).and_then(C::from_entry)
    }

    pub fn config_mut<C: ConfigRecord>(&mut self) -> Option<&mut C> {
        self.configs.get_mut(&C::MODULE).and_then(C::from_entry_mut)
    }

    pub(crate) fn insert_config_if_absent<C: ConfigRecord>(&mut self, config: C) {
        self.configs
            .entry(C::MODULE)
            .or_insert_with(|| config.into_entry());
    }

    /// Forgets everything initialization set up for `module`.
    pub(crate) fn remove_module(&mut self, module: ModuleId) {
        if self.configs.remove(&module).is_some() {
            debug!("module {} no longer reported, removing", module);
        }
        self.responses.unregister_module(module);
        self.signals.remove_module(module);
        self.tear_down(module);
    }

    /// Drops one data signal and its response handler.
    pub(crate) fn remove_signal(&mut self, header: RegisterHeader) {
        if self.signals.remove(header).is_some() {
            debug!("removing signal {}", header);
        }
        self.responses.unregister(header);
    }

    pub fn signals(&self) -> &SignalRegistry {
        &self.signals
    }

    pub(crate) fn signals_mut(&mut self) -> &mut SignalRegistry {
        &mut self.signals
    }

    /// Single-channel components of the signal `handle` refers to,
    /// synthesized on first call.
    pub fn decompose(&mut self, handle: SignalHandle) -> Result<&[SignalSpec], Error> {
        let header = handle.header();
        self.signals.decompose(header).ok_or(Error::SignalNotFound(header))
    }

    /// Calls `callback` with every sample published on `handle`. A component
    /// handle decomposes its signal first.
    pub fn subscribe(
        &mut self,
        handle: SignalHandle,
        callback: impl FnMut(&DataValue) + 'static,
    ) -> Result<SubscriptionId, Error> {
        if handle.component_index().is_some() {
            self.signals.decompose(handle.header());
        }
        self.signals
            .subscribe(handle, callback)
            .ok_or(Error::SignalNotFound(handle.header()))
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.signals.unsubscribe(id)
    }

    /// Symbolic name of the signal or component `handle` refers to.
    pub fn signal_name(&self, handle: SignalHandle) -> Option<SignalName> {
        let spec = self.signals.resolve(handle)?;
        sensor::signal_name(&spec, handle.component_index())
    }

    /// Forgets the pending reads of `module` without calling them.
    pub fn tear_down(&mut self, module: ModuleId) {
        for family in ReadFamily::ALL {
            if family.module() == module {
                self.pending.clear(family);
            }
        }
    }
}

/// Response handler for data registers: decodes the payload through the
/// signal registered under `header` and publishes it.
pub(crate) fn publish_data<T: Transport>(board: &mut Board<T>, header: RegisterHeader, payload: &[u8]) {
    let Some(spec) = board.signals.get(header).map(|s| *s.spec()) else {
        return;
    };
    let factor = sensor::converter_scale(board, spec.converter);
    if let Err(e) = board.signals.publish(header, payload, |_| factor) {
        warn!("dropping {} notification: {}", header, e);
    }
}
