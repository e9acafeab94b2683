// src/common/header.rs

use core::fmt;

/// Bit OR'd into the register byte of a command to request a read.
pub const READ_FLAG: u8 = 0x80;

/// Identifies one logical module (sensor or board subsystem) on the peripheral.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct ModuleId(u8);

impl ModuleId {
    pub const GYRO: ModuleId = ModuleId(0x13);
    pub const AMBIENT_LIGHT: ModuleId = ModuleId(0x14);

    #[inline]
    pub const fn new(id: u8) -> Self {
        ModuleId(id)
    }

    #[inline]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }
}

impl From<u8> for ModuleId {
    fn from(value: u8) -> Self {
        ModuleId(value)
    }
}

impl From<ModuleId> for u8 {
    fn from(value: ModuleId) -> Self {
        value.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// A (module, register, direction) triple, used as the dispatch key for
/// notifications and as the identity of a data signal.
///
/// `register` never carries the read flag; direction lives in `is_read`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct RegisterHeader {
    module: ModuleId,
    register: u8,
    is_read: bool,
}

impl RegisterHeader {
    /// Header for a register in the write (or unsolicited notification) direction.
    #[inline]
    pub const fn new(module: ModuleId, register: u8) -> Self {
        RegisterHeader {
            module,
            register: register & !READ_FLAG,
            is_read: false,
        }
    }

    /// Header for the read-response direction of a register.
    #[inline]
    pub const fn read(module: ModuleId, register: u8) -> Self {
        RegisterHeader {
            module,
            register: register & !READ_FLAG,
            is_read: true,
        }
    }

    /// Splits the two header bytes of a wire frame.
    #[inline]
    pub const fn from_wire(module: u8, register: u8) -> Self {
        RegisterHeader {
            module: ModuleId(module),
            register: register & !READ_FLAG,
            is_read: register & READ_FLAG != 0,
        }
    }

    #[inline]
    pub const fn module(&self) -> ModuleId {
        self.module
    }

    #[inline]
    pub const fn register(&self) -> u8 {
        self.register
    }

    #[inline]
    pub const fn is_read(&self) -> bool {
        self.is_read
    }

    /// Same module and register in the read direction.
    #[inline]
    pub const fn as_read(&self) -> Self {
        RegisterHeader::read(self.module, self.register)
    }

    /// The two leading bytes of a frame carrying this header.
    #[inline]
    pub const fn to_wire(&self) -> [u8; 2] {
        let register = if self.is_read {
            self.register | READ_FLAG
        } else {
            self.register
        };
        [self.module.0, register]
    }
}

impl fmt::Display for RegisterHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [module, register] = self.to_wire();
        write!(f, "[{:#04x}, {:#04x}]", module, register)
    }
}
