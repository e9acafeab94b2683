//! Register command framing.
//!
//! Every command is `[module_id, register_id (| READ_FLAG), payload...]`.

use arrayvec::ArrayVec;
use core::fmt;

use super::header::{ModuleId, RegisterHeader};

/// Largest frame the peripheral accepts in a single write.
pub const MAX_COMMAND_LEN: usize = 20;
/// Room left for payload after the two header bytes.
pub const MAX_PAYLOAD_LEN: usize = MAX_COMMAND_LEN - 2;

/// Error building a command whose payload does not fit in one write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CommandTooLong {
    pub len: usize,
}

/// A register command ready to hand to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    header: RegisterHeader,
    payload: ArrayVec<u8, MAX_PAYLOAD_LEN>,
}

impl Command {
    /// Write `payload` to `register` of `module`.
    pub fn write(
        module: ModuleId,
        register: u8,
        payload: &[u8],
    ) -> Result<Self, CommandTooLong> {
        let payload = ArrayVec::try_from(payload).map_err(|_| CommandTooLong {
            len: payload.len() + 2,
        })?;
        Ok(Command {
            header: RegisterHeader::new(module, register),
            payload,
        })
    }

    /// Read request for `register` of `module`; carries no payload.
    pub fn read(module: ModuleId, register: u8) -> Self {
        Command {
            header: RegisterHeader::read(module, register),
            payload: ArrayVec::new(),
        }
    }

    pub fn header(&self) -> RegisterHeader {
        self.header
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Serializes the full frame.
    pub fn to_bytes(&self) -> ArrayVec<u8, MAX_COMMAND_LEN> {
        let mut bytes = ArrayVec::new();
        // Capacity holds header plus the largest payload.
        bytes.extend(self.header.to_wire());
        bytes.extend(self.payload.iter().copied());
        bytes
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.to_bytes().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
