//! # Machine and Clock Configuration
//!
//! Plain value types describing how a machine is laid out and how its clock
//! runs. Both serialize with serde so a frontend can persist them next to
//! its own settings.

use serde::{Deserialize, Serialize};

use crate::{ClockMode, CoreError};

/// Largest memory the 16-bit address bus can reach.
pub const MAX_MEMORY_SIZE: usize = 0x1_0000;

/// Default architectural boot address loaded into PC on reset.
pub const DEFAULT_BOOT_ADDRESS: u16 = 0x0100;

/// Default start of the memory-mapped video framebuffer.
pub const DEFAULT_VIDEO_BASE: u16 = 0xC000;

/// Default size of the video framebuffer (8 KiB).
pub const DEFAULT_VIDEO_LEN: usize = 0x2000;

/// Layout of an FS8 machine.
///
/// # Examples
///
/// ```
/// use libfs8::MachineConfig;
///
/// let config = MachineConfig::default();
/// assert_eq!(config.memory_size, 0x10000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Number of addressable bytes, 1..=65536.
    pub memory_size: usize,

    /// First address of the video framebuffer.
    pub video_base: u16,

    /// Length of the video framebuffer in bytes.
    pub video_len: usize,

    /// PC value after construction and `reset`.
    pub boot_address: u16,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            memory_size: MAX_MEMORY_SIZE,
            video_base: DEFAULT_VIDEO_BASE,
            video_len: DEFAULT_VIDEO_LEN,
            boot_address: DEFAULT_BOOT_ADDRESS,
        }
    }
}

impl MachineConfig {
    /// Checks that the memory size is addressable and the video window fits.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.memory_size == 0 || self.memory_size > MAX_MEMORY_SIZE {
            return Err(CoreError::InvalidConfig(format!(
                "memory size {} must be between 1 and {}",
                self.memory_size, MAX_MEMORY_SIZE
            )));
        }

        let video_end = self.video_base as usize + self.video_len;
        if video_end > self.memory_size {
            return Err(CoreError::InvalidConfig(format!(
                "video window 0x{:04X}..0x{:05X} exceeds memory of {} bytes",
                self.video_base, video_end, self.memory_size
            )));
        }

        Ok(())
    }

    /// Initial stack pointer: the last addressable byte.
    pub fn stack_top(&self) -> u16 {
        (self.memory_size - 1) as u16
    }
}

/// Largest Fast-mode batch. A batch holds the core lock and ignores stop
/// requests until it ends, so this bounds how long `stop()` can block.
pub const MAX_BATCH_LIMIT: u64 = 1 << 20;

/// Clock manager settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Mode used when none is given explicitly.
    pub mode: ClockMode,

    /// Target frequency in Hz for the paced modes.
    pub target_hz: u32,

    /// Upper bound on cycles executed per lock acquisition in Fast mode,
    /// 1..=[`MAX_BATCH_LIMIT`].
    pub batch_limit: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            mode: ClockMode::Stepped,
            target_hz: 1_000_000,
            batch_limit: 4096,
        }
    }
}

impl ClockConfig {
    /// Rejects a batch limit outside 1..=[`MAX_BATCH_LIMIT`].
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.batch_limit == 0 || self.batch_limit > MAX_BATCH_LIMIT {
            return Err(CoreError::InvalidConfig(format!(
                "batch limit {} must be between 1 and {} cycles",
                self.batch_limit, MAX_BATCH_LIMIT
            )));
        }
        Ok(())
    }
}
