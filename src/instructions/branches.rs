//! # Jump Instructions
//!
//! This module implements absolute and relative jumps:
//! - JMP, JZ, JNZ, JC, JNC, JN, JNN: absolute 16-bit target
//! - JR, JRZ, JRNZ, JRC: signed 8-bit offset
//!
//! A relative target is the address after the offset operand plus the
//! offset, wrapping at 16 bits. An untaken jump falls through to the next
//! instruction. No flags are affected.

use crate::{Condition, Core, CoreError};

/// Executes an absolute jump (opcodes 0x60-0x66).
pub(crate) fn execute_jump(
    core: &mut Core,
    condition: Condition,
    target: u16,
) -> Result<(), CoreError> {
    if condition.holds(&core.status) {
        core.registers.set_pc(target);
    }
    Ok(())
}

/// Executes a relative jump (opcodes 0x69-0x6C).
///
/// PC already points past the offset octet when this runs.
pub(crate) fn execute_jump_relative(
    core: &mut Core,
    condition: Condition,
    offset: i8,
) -> Result<(), CoreError> {
    if condition.holds(&core.status) {
        let pc = core.registers.pc();
        core.registers.set_pc(pc.wrapping_add_signed(offset as i16));
    }
    Ok(())
}
