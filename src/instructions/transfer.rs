//! # Register Transfer Instructions
//!
//! - MOV dst,src: copy a byte register, updates Zero
//! - SWAP a,b: exchange two byte registers
//! - MOV16 / SWAP16: the 16-bit forms over DA, DB, IDX, IDY
//! - MOV IDX,IDY / MOV IDY,IDX / SWAP IDX,IDY
//!
//! Only the 8-bit MOV touches flags.

use crate::{Core, CoreError, IndexPointer, Reg16, Reg8};

/// Executes `MOV dst,src` (opcode 0x90).
///
/// # Flag Behavior
///
/// - Zero (Z): Set if the copied value is 0
/// - Other flags: Not affected
pub(crate) fn execute_move8(core: &mut Core, dst: Reg8, src: Reg8) -> Result<(), CoreError> {
    let value = core.registers.get8(src);
    core.set_register(dst, value);
    Ok(())
}

/// Executes `SWAP a,b` (opcode 0x91).
pub(crate) fn execute_swap8(core: &mut Core, a: Reg8, b: Reg8) -> Result<(), CoreError> {
    let va = core.registers.get8(a);
    let vb = core.registers.get8(b);
    core.registers.set8(a, vb);
    core.registers.set8(b, va);
    Ok(())
}

/// Executes `MOV16 dst,src` (opcode 0x92).
pub(crate) fn execute_move16(core: &mut Core, dst: Reg16, src: Reg16) -> Result<(), CoreError> {
    let value = core.registers.get16(src);
    core.registers.set16(dst, value);
    Ok(())
}

/// Executes `SWAP16 a,b` (opcode 0x93).
pub(crate) fn execute_swap16(core: &mut Core, a: Reg16, b: Reg16) -> Result<(), CoreError> {
    let va = core.registers.get16(a);
    let vb = core.registers.get16(b);
    core.registers.set16(a, vb);
    core.registers.set16(b, va);
    Ok(())
}

/// Executes `MOV IDX,IDY` / `MOV IDY,IDX` (opcodes 0x94, 0x95).
pub(crate) fn execute_move_pointer(core: &mut Core, dst: IndexPointer) -> Result<(), CoreError> {
    let value = core.registers.get16(dst.other().register());
    core.registers.set16(dst.register(), value);
    Ok(())
}

/// Executes `SWAP IDX,IDY` (opcode 0x96).
pub(crate) fn execute_swap_pointers(core: &mut Core) -> Result<(), CoreError> {
    execute_swap16(core, Reg16::Idx, Reg16::Idy)
}
