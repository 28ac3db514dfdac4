//! # Control Instructions
//!
//! This module implements:
//! - NOP: No Operation
//! - HALT: stop the core
//! - SYS n: call the installed syscall handler
//! - CALL nn: push the return address, jump
//! - RET: pop the return address

use tracing::debug;

use crate::{Core, CoreError};

/// Executes `NOP` (opcode 0x00).
pub(crate) fn execute_nop(_core: &mut Core) -> Result<(), CoreError> {
    Ok(())
}

/// Executes `HALT` (opcode 0x01).
///
/// Clears the running flag. Registers, flags and memory are untouched.
pub(crate) fn execute_halt(core: &mut Core) -> Result<(), CoreError> {
    core.running = false;
    debug!(pc = core.registers.pc(), "HALT");
    Ok(())
}

/// Executes `SYS n` (opcode 0x02).
///
/// Without an installed handler this behaves like NOP.
pub(crate) fn execute_sys(core: &mut Core, number: u8) -> Result<(), CoreError> {
    match core.syscall.as_mut() {
        Some(handler) => handler(number, &mut core.registers, &mut core.memory),
        None => {
            debug!(number, "SYS with no handler installed");
            Ok(())
        }
    }
}

/// Executes `CALL nn` (opcode 0x67).
///
/// Pushes the address of the next instruction as a 16-bit value, then jumps.
pub(crate) fn execute_call(core: &mut Core, target: u16) -> Result<(), CoreError> {
    let return_address = core.registers.pc();
    core.push16(return_address)?;
    core.registers.set_pc(target);
    Ok(())
}

/// Executes `RET` (opcode 0x68).
pub(crate) fn execute_ret(core: &mut Core) -> Result<(), CoreError> {
    let return_address = core.pop16()?;
    core.registers.set_pc(return_address);
    Ok(())
}
