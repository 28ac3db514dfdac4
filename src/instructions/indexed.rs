//! # Indexed Load and Store Instructions
//!
//! Loads and stores through IDX or IDY (opcodes 0x80-0x8F). The opcode
//! bits select the pointer (bit 0), direction (bit 1) and mode (bits 2-3);
//! see [`crate::IndexMode`] for the addressing rules.
//!
//! A faulting access leaves the pointer unchanged.

use crate::{Core, CoreError, IndexMode, IndexPointer, Reg8};

fn effective_address(core: &Core, pointer: IndexPointer, mode: IndexMode) -> (u16, u16) {
    let base = core.registers.get16(pointer.register());
    (mode.effective_address(base), mode.next_pointer(base))
}

/// Executes an indexed load.
///
/// # Flag Behavior
///
/// - Zero (Z): Set if the loaded value is 0
/// - Other flags: Not affected
pub(crate) fn execute_load_indexed(
    core: &mut Core,
    dst: Reg8,
    pointer: IndexPointer,
    mode: IndexMode,
) -> Result<(), CoreError> {
    let (address, next) = effective_address(core, pointer, mode);
    let value = core.memory.read_byte(address)?;
    core.set_register(dst, value);
    core.registers.set16(pointer.register(), next);
    Ok(())
}

/// Executes an indexed store. No flags are affected.
pub(crate) fn execute_store_indexed(
    core: &mut Core,
    src: Reg8,
    pointer: IndexPointer,
    mode: IndexMode,
) -> Result<(), CoreError> {
    let (address, next) = effective_address(core, pointer, mode);
    let value = core.registers.get8(src);
    core.memory.write_byte(address, value)?;
    core.registers.set16(pointer.register(), next);
    Ok(())
}
