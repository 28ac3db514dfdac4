//! # Flat Memory
//!
//! The FS8 sees a single flat byte store of configurable size (64 KiB by
//! default). A contiguous high sub-range is the video framebuffer; it is read
//! and written through exactly the same byte interface as any other address,
//! so a renderer keeps itself in sync by re-reading memory.
//!
//! Unlike a real bus, every access is range-checked: touching an address at or
//! beyond the configured size is an [`CoreError::AddressOutOfRange`] fault.

use std::ops::Range;

use tracing::debug;

use crate::{CoreError, MachineConfig};

/// Bounds-checked flat memory with a video window.
///
/// # Examples
///
/// ```
/// use libfs8::Memory;
///
/// let mut mem = Memory::new();
/// mem.write_word(0x2000, 0xBEEF).unwrap();
///
/// assert_eq!(mem.read_byte(0x2000).unwrap(), 0xEF); // low octet first
/// assert_eq!(mem.read_byte(0x2001).unwrap(), 0xBE);
/// assert_eq!(mem.read_word(0x2000).unwrap(), 0xBEEF);
/// ```
#[derive(Debug, Clone)]
pub struct Memory {
    data: Vec<u8>,
    video: Range<usize>,
}

impl Memory {
    /// Creates 64 KiB of zeroed memory with the default video window.
    pub fn new() -> Self {
        Self::build(&MachineConfig::default())
    }

    /// Creates memory laid out according to `config`.
    pub fn with_config(config: &MachineConfig) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &MachineConfig) -> Self {
        let video_base = config.video_base as usize;
        Self {
            data: vec![0; config.memory_size],
            video: video_base..video_base + config.video_len,
        }
    }

    /// Number of addressable bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    fn check(&self, address: u32) -> Result<usize, CoreError> {
        let index = address as usize;
        if index < self.data.len() {
            Ok(index)
        } else {
            Err(CoreError::AddressOutOfRange {
                address,
                size: self.data.len(),
            })
        }
    }

    /// Reads one byte.
    pub fn read_byte(&self, address: u16) -> Result<u8, CoreError> {
        let index = self.check(address as u32)?;
        Ok(self.data[index])
    }

    /// Writes one byte.
    pub fn write_byte(&mut self, address: u16, value: u8) -> Result<(), CoreError> {
        let index = self.check(address as u32)?;
        self.data[index] = value;
        Ok(())
    }

    /// Reads a little-endian word from `address` and `address + 1`.
    ///
    /// The second octet does not wrap: a word read at the last byte of memory
    /// is out of range.
    pub fn read_word(&self, address: u16) -> Result<u16, CoreError> {
        let low = self.check(address as u32)?;
        let high = self.check(address as u32 + 1)?;
        Ok(u16::from_le_bytes([self.data[low], self.data[high]]))
    }

    /// Writes a little-endian word. Both octets are checked before either is
    /// written.
    pub fn write_word(&mut self, address: u16, value: u16) -> Result<(), CoreError> {
        let low = self.check(address as u32)?;
        let high = self.check(address as u32 + 1)?;
        let [lo, hi] = value.to_le_bytes();
        self.data[low] = lo;
        self.data[high] = hi;
        Ok(())
    }

    /// Copies `program` into memory starting at `origin`.
    ///
    /// Fails with [`CoreError::ProgramTooLarge`] without writing anything if
    /// the program would run past the end of memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use libfs8::{CoreError, Memory};
    ///
    /// let mut mem = Memory::new();
    /// mem.load_program(&[0x10, 0x2A, 0x01], 0x0100).unwrap();
    /// assert_eq!(mem.read_byte(0x0101).unwrap(), 0x2A);
    ///
    /// let err = mem.load_program(&[0; 4], 0xFFFE).unwrap_err();
    /// assert!(matches!(err, CoreError::ProgramTooLarge { .. }));
    /// ```
    pub fn load_program(&mut self, program: &[u8], origin: u16) -> Result<(), CoreError> {
        let start = origin as usize;
        let end = start + program.len();
        if end > self.data.len() {
            return Err(CoreError::ProgramTooLarge {
                origin,
                length: program.len(),
                size: self.data.len(),
            });
        }

        self.data[start..end].copy_from_slice(program);
        debug!(origin, length = program.len(), "program loaded");
        Ok(())
    }

    /// Zeroes the whole store.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Address range occupied by the video framebuffer.
    pub fn video_range(&self) -> Range<usize> {
        self.video.clone()
    }

    /// Read-only view of the video framebuffer, for a renderer to resync from.
    pub fn video_memory(&self) -> &[u8] {
        &self.data[self.video.clone()]
    }

    /// Read-only view of all memory.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
