// src/board/persist.rs

//! Raw config record persistence.
//!
//! A state blob is a sequence of `[module_id, len, record...]` entries in
//! module-id order, sealed with a little-endian CRC-16/ARC of everything
//! before it.

use alloc::vec::Vec;
use log::debug;

use super::Board;
use crate::common::{calculate_crc16, encode_crc, verify_crc, DecodeError, Error, ModuleId, Transport};
use crate::sensor::ModuleConfig;

// Record length errors are reported as config errors, not payload errors.
fn record_error(e: DecodeError) -> Error {
    match e {
        DecodeError::LengthMismatch { expected, got } => Error::ConfigLength { needed: expected, got },
        other => Error::Decode(other),
    }
}

impl<T: Transport> Board<T> {
    /// Raw bytes of the module's config record.
    pub fn serialize_config(&self, module: ModuleId) -> Result<Vec<u8>, Error> {
        self.configs
            .get(&module)
            .map(|config| config.as_bytes().to_vec())
            .ok_or(Error::ModuleNotPresent(module))
    }

    /// Overwrites the module's config record with `bytes`. A blob of the
    /// wrong length leaves the record untouched.
    pub fn deserialize_config(&mut self, module: ModuleId, bytes: &[u8]) -> Result<(), Error> {
        let slot = self
            .configs
            .get_mut(&module)
            .ok_or(Error::ModuleNotPresent(module))?;
        let config = ModuleConfig::from_bytes(module, bytes)
            .ok_or(Error::ModuleNotPresent(module))?
            .map_err(record_error)?;
        *slot = config;
        Ok(())
    }

    /// Every initialized module's record in one checksummed blob.
    pub fn serialize_state(&self) -> Vec<u8> {
        let mut blob = Vec::new();
        for (module, config) in &self.configs {
            let bytes = config.as_bytes();
            blob.push(module.as_u8());
            // Records are a few bytes long.
            blob.push(bytes.len() as u8);
            blob.extend_from_slice(bytes);
        }
        let crc = calculate_crc16(&blob);
        blob.extend_from_slice(&encode_crc(crc));
        blob
    }

    /// Restores records from a [`serialize_state`](Board::serialize_state)
    /// blob. Entries for modules this board has not initialized are
    /// skipped. Nothing is applied unless every entry is valid.
    pub fn deserialize_state(&mut self, blob: &[u8]) -> Result<(), Error> {
        let body = verify_crc(blob)
            .map_err(|(expected, calculated)| Error::ChecksumMismatch { expected, calculated })?;

        let mut restored = Vec::new();
        let mut rest = body;
        while let [id, len, tail @ ..] = rest {
            let len = usize::from(*len);
            let record = tail.get(..len).ok_or(DecodeError::PayloadTooShort {
                needed: len,
                got: tail.len(),
            })?;
            rest = &tail[len..];

            let module = ModuleId::new(*id);
            if !self.configs.contains_key(&module) {
                debug!("skipping state for module {}", module);
                continue;
            }
            match ModuleConfig::from_bytes(module, record) {
                Some(config) => restored.push(config.map_err(record_error)?),
                None => debug!("skipping state for module {}", module),
            }
        }
        if !rest.is_empty() {
            return Err(DecodeError::PayloadTooShort { needed: 2, got: rest.len() }.into());
        }

        for config in restored {
            self.configs.insert(config.module(), config);
        }
        Ok(())
    }
}
