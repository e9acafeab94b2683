// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod command;
pub mod crc;
pub mod error;
pub mod hal_traits;
pub mod header;
pub mod response;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From header.rs
pub use header::{ModuleId, RegisterHeader, READ_FLAG};

// From command.rs
pub use command::{Command, CommandTooLong, MAX_COMMAND_LEN, MAX_PAYLOAD_LEN};

// From crc.rs
pub use crc::{calculate_crc16, encode_crc, verify_crc};

// From error.rs
pub use error::Error;

// From hal_traits.rs
pub use hal_traits::{CapabilityProvider, Transport};

// From response/mod.rs
pub use response::{parse_notification, DecodeError, Notification, ResponseParseError};

// From types.rs
pub use types::{Converter, Interpreter};
