//! # Increment and Decrement Instructions
//!
//! This module implements:
//! - INC r / DEC r: 8-bit, full arithmetic flags
//! - INC DA/DB / DEC DA/DB: 16-bit, full arithmetic flags
//! - INC/DEC IDX/IDY and ADD IDX/IDY,#nn: pointer arithmetic, wraps, no flags

use crate::alu::{self, Width};
use crate::{Core, CoreError, IndexPointer, Reg16, Reg8};

/// Executes `INC r` (opcodes 0x40-0x45).
pub(crate) fn execute_inc8(core: &mut Core, reg: Reg8) -> Result<(), CoreError> {
    let value = core.registers.get8(reg) as u16;
    let result = alu::increment(&mut core.status, Width::Byte, value);
    core.registers.set8(reg, result as u8);
    Ok(())
}

/// Executes `DEC r` (opcodes 0x48-0x4D).
pub(crate) fn execute_dec8(core: &mut Core, reg: Reg8) -> Result<(), CoreError> {
    let value = core.registers.get8(reg) as u16;
    let result = alu::decrement(&mut core.status, Width::Byte, value);
    core.registers.set8(reg, result as u8);
    Ok(())
}

/// Executes `INC DA` / `INC DB` (opcodes 0x38, 0x39).
pub(crate) fn execute_inc16(core: &mut Core, reg: Reg16) -> Result<(), CoreError> {
    let value = core.registers.get16(reg);
    let result = alu::increment(&mut core.status, Width::Word, value);
    core.registers.set16(reg, result);
    Ok(())
}

/// Executes `DEC DA` / `DEC DB` (opcodes 0x3A, 0x3B).
pub(crate) fn execute_dec16(core: &mut Core, reg: Reg16) -> Result<(), CoreError> {
    let value = core.registers.get16(reg);
    let result = alu::decrement(&mut core.status, Width::Word, value);
    core.registers.set16(reg, result);
    Ok(())
}

fn update_pointer(core: &mut Core, pointer: IndexPointer, f: impl FnOnce(u16) -> u16) {
    let reg = pointer.register();
    let value = core.registers.get16(reg);
    core.registers.set16(reg, f(value));
}

/// Executes `INC IDX` / `INC IDY` (opcodes 0x98, 0x99).
pub(crate) fn execute_inc_pointer(core: &mut Core, pointer: IndexPointer) -> Result<(), CoreError> {
    update_pointer(core, pointer, |p| p.wrapping_add(1));
    Ok(())
}

/// Executes `DEC IDX` / `DEC IDY` (opcodes 0x9A, 0x9B).
pub(crate) fn execute_dec_pointer(core: &mut Core, pointer: IndexPointer) -> Result<(), CoreError> {
    update_pointer(core, pointer, |p| p.wrapping_sub(1));
    Ok(())
}

/// Executes `ADD IDX,#nn` / `ADD IDY,#nn` (opcodes 0x9C, 0x9D).
pub(crate) fn execute_add_pointer(
    core: &mut Core,
    pointer: IndexPointer,
    value: u16,
) -> Result<(), CoreError> {
    update_pointer(core, pointer, |p| p.wrapping_add(value));
    Ok(())
}
