//! # Stack Instructions
//!
//! The stack grows downward from the top of memory. SP points at the next
//! free octet: a byte push writes at SP then decrements it, a word push
//! writes the little-endian value at `SP-1..=SP` then subtracts two.
//!
//! - PUSH r / POP r: 8-bit
//! - PUSH DA/DB / POP DA/DB: 16-bit
//!
//! None of these affect flags.

use crate::{Core, CoreError, Reg16, Reg8};

/// Executes `PUSH r` (opcodes 0x70-0x75).
pub(crate) fn execute_push8(core: &mut Core, reg: Reg8) -> Result<(), CoreError> {
    let value = core.registers.get8(reg);
    core.push8(value)
}

/// Executes `PUSH DA` / `PUSH DB` (opcodes 0x76, 0x77).
pub(crate) fn execute_push16(core: &mut Core, reg: Reg16) -> Result<(), CoreError> {
    let value = core.registers.get16(reg);
    core.push16(value)
}

/// Executes `POP r` (opcodes 0x78-0x7D).
pub(crate) fn execute_pop8(core: &mut Core, reg: Reg8) -> Result<(), CoreError> {
    let value = core.pop8()?;
    core.registers.set8(reg, value);
    Ok(())
}

/// Executes `POP DA` / `POP DB` (opcodes 0x7E, 0x7F).
pub(crate) fn execute_pop16(core: &mut Core, reg: Reg16) -> Result<(), CoreError> {
    let value = core.pop16()?;
    core.registers.set16(reg, value);
    Ok(())
}
