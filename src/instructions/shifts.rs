//! # Shift Instructions
//!
//! - SHL: Shift Left, bit 7 into Carry
//! - SHR: Logical Shift Right, bit 0 into Carry
//!
//! Both set Zero and Negative from the result and leave Overflow alone.

use crate::alu;
use crate::{Core, CoreError, Reg8};

/// Executes `SHL r` (opcode 0x57).
pub(crate) fn execute_shl(core: &mut Core, reg: Reg8) -> Result<(), CoreError> {
    let value = core.registers.get8(reg);
    let result = alu::shift_left(&mut core.status, value);
    core.registers.set8(reg, result);
    Ok(())
}

/// Executes `SHR r` (opcode 0x58).
pub(crate) fn execute_shr(core: &mut Core, reg: Reg8) -> Result<(), CoreError> {
    let value = core.registers.get8(reg);
    let result = alu::shift_right(&mut core.status, value);
    core.registers.set8(reg, result);
    Ok(())
}
