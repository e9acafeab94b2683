// src/common/hal_traits.rs

use super::header::ModuleId;
use core::fmt::Debug;

/// Outbound half of the link to the peripheral.
///
/// Inbound frames are not pulled through this trait; whoever owns the
/// receive side hands them to `Board::on_notification`.
pub trait Transport {
    /// Associated error type for transmission failures.
    type Error: Debug;

    /// Attempts to queue one complete command frame for transmission.
    ///
    /// Returns `Ok(())` once the frame is accepted, `Err(nb::Error::WouldBlock)`
    /// if the outbound queue is momentarily full, or
    /// `Err(nb::Error::Other(Self::Error))` on failure. Acceptance does not
    /// imply delivery. The board never retries a `WouldBlock`; it reports it
    /// to the caller as `Error::WouldBlock`.
    fn send(&mut self, frame: &[u8]) -> nb::Result<(), Self::Error>;
}

/// Board discovery metadata consumed by module drivers.
pub trait CapabilityProvider {
    /// Whether the module was reported present during discovery.
    fn is_present(&self, module: ModuleId) -> bool;

    /// Which chip variant implements the module.
    fn implementation(&self, module: ModuleId) -> u8;

    /// Firmware revision of the module.
    fn revision(&self, module: ModuleId) -> u8;
}
