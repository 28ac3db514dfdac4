//! # FS8 Processor Emulator Core
//!
//! An emulator for the FS8, a small 8-bit processor with a 64 KiB flat address
//! space, six byte registers, two 16-bit register pairs and two index pointers.
//!
//! The crate is split into the pieces of the execution engine:
//!
//! - [`Memory`] - bounds-checked flat store with a memory-mapped video window
//! - [`StatusRegister`] - packed Zero/Carry/Overflow/Negative flags
//! - [`alu`] - 8-bit and 16-bit arithmetic/logic primitives
//! - [`Core`] - register file plus the fetch-decode-execute dispatcher
//! - [`ClockManager`] - runs a core stepped, unthrottled, or paced to a frequency
//!
//! ## Quick Start
//!
//! ```rust
//! use libfs8::{Core, Memory, Reg8, Reg16};
//!
//! let mut memory = Memory::new();
//! // LD A,#50 ; LD B,#25 ; ADD A,B ; HALT
//! memory.load_program(&[0x10, 50, 0x11, 25, 0x30, 0x01, 0x01], 0x0000).unwrap();
//!
//! let mut core = Core::new(memory);
//! core.set_register16(Reg16::Pc, 0x0000);
//! core.start();
//! core.run_until_halt(100).unwrap();
//!
//! assert_eq!(core.get_register(Reg8::A), 75);
//! assert!(!core.is_running());
//! ```

pub mod addressing;
pub mod alu;
pub mod clock;
pub mod config;
pub mod cpu;
pub mod instruction;
pub mod memory;
pub mod opcodes;
pub mod registers;
pub mod status;

// Internal instruction implementations (not part of public API)
mod instructions;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export public API
pub use addressing::{IndexMode, IndexPointer};
pub use alu::Width;
pub use clock::{ClockManager, ClockMode};
pub use config::{ClockConfig, MachineConfig};
pub use cpu::{Core, RegisterSnapshot, SyscallHandler};
pub use instruction::{Condition, Instruction};
pub use memory::Memory;
pub use opcodes::{OpcodeMetadata, OPCODE_TABLE};
pub use registers::{Reg16, Reg8, Registers};
pub use status::StatusRegister;

/// Errors raised by the execution engine.
///
/// None of these are retried internally: a fault stops the interpretation
/// step that caused it and is handed straight back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A byte or word access fell outside `[0, size)`.
    #[error("address 0x{address:04X} is outside memory of {size} bytes")]
    AddressOutOfRange { address: u32, size: usize },

    /// `load_program` would run past the end of memory. Nothing was written.
    #[error("program of {length} bytes at origin 0x{origin:04X} does not fit in {size} bytes")]
    ProgramTooLarge {
        origin: u16,
        length: usize,
        size: usize,
    },

    /// The opcode octet has no entry in the opcode table.
    #[error("unknown instruction 0x{opcode:02X} at 0x{address:04X}")]
    UnknownInstruction { opcode: u8, address: u16 },

    /// A register name or operand selector did not name a register.
    #[error("invalid register identifier `{0}`")]
    InvalidRegister(String),

    /// Machine or clock configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// `start` or `step` was called while a background loop is active.
    #[error("clock is already running")]
    ClockAlreadyRunning,

    /// A paced clock mode was started without a usable target frequency.
    #[error("clock mode {0:?} needs a non-zero target frequency")]
    MissingTargetFrequency(ClockMode),
}
