//! # Load and Store Instructions
//!
//! This module implements load and store operations:
//! - LD r,#n / LD r,[nn]: 8-bit immediate and absolute loads
//! - LD DA/DB/IDX/IDY,#nn / [nn]: 16-bit immediate and absolute loads
//! - ST r,[nn] / ST DA/DB/IDX/IDY,[nn]: absolute stores
//!
//! Loads set Zero from the loaded value. Stores leave flags alone.
//! 16-bit memory operands are little-endian.

use crate::{Core, CoreError, Reg16, Reg8};

/// Executes `LD r,#n` (opcodes 0x10-0x15).
///
/// # Flag Behavior
///
/// - Zero (Z): Set if the loaded value is 0
/// - Other flags: Not affected
pub(crate) fn execute_load_imm8(core: &mut Core, reg: Reg8, value: u8) -> Result<(), CoreError> {
    core.set_register(reg, value);
    Ok(())
}

/// Executes `LD r,[nn]` (opcodes 0x16-0x1B).
pub(crate) fn execute_load_abs8(core: &mut Core, reg: Reg8, address: u16) -> Result<(), CoreError> {
    let value = core.memory.read_byte(address)?;
    core.set_register(reg, value);
    Ok(())
}

/// Executes `LD rr,#nn` (opcodes 0x1C-0x1F).
pub(crate) fn execute_load_imm16(core: &mut Core, reg: Reg16, value: u16) -> Result<(), CoreError> {
    core.set_register16(reg, value);
    Ok(())
}

/// Executes `LD rr,[nn]` (opcodes 0x20-0x23).
pub(crate) fn execute_load_abs16(
    core: &mut Core,
    reg: Reg16,
    address: u16,
) -> Result<(), CoreError> {
    let value = core.memory.read_word(address)?;
    core.set_register16(reg, value);
    Ok(())
}

/// Executes `ST r,[nn]` (opcodes 0x24-0x29).
pub(crate) fn execute_store_abs8(core: &mut Core, reg: Reg8, address: u16) -> Result<(), CoreError> {
    let value = core.registers.get8(reg);
    core.memory.write_byte(address, value)
}

/// Executes `ST rr,[nn]` (opcodes 0x2A-0x2D).
pub(crate) fn execute_store_abs16(
    core: &mut Core,
    reg: Reg16,
    address: u16,
) -> Result<(), CoreError> {
    let value = core.registers.get16(reg);
    core.memory.write_word(address, value)
}
