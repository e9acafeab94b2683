// src/lib.rs

#![cfg_attr(not(any(feature = "std", test)), no_std)]

extern crate alloc;

pub mod board;
pub mod common;
pub mod sensor;
pub mod signal;

// Re-export key types for convenience
pub use board::{Board, ReadStatus};
pub use common::{Error, ModuleId, RegisterHeader};
pub use signal::{DataSignal, DataValue, SignalHandle};
