//! # ALU Instructions
//!
//! This module implements the register-level arithmetic, compare and logic
//! operations on top of the pure primitives in [`crate::alu`]:
//! - ADD, SUB, CMP (8-bit register pair)
//! - ADD16, SUB16, CMP16 (16-bit register pair)
//! - ADD A,#n / SUB A,#n
//! - CMP r,#n / CMP DA,#nn / CMP DB,#nn
//! - AND, OR, XOR (register pair and immediate), NOT
//!
//! # Flag Behavior
//!
//! - Arithmetic and compare: Z, C, V and N from the full-width result
//! - Logic: Z and N from the result, C cleared, V not affected
//! - NOT: Z and N from the result, C and V not affected

use crate::alu::{self, Width};
use crate::{Core, CoreError, Reg16, Reg8};

/// Bitwise operation selector shared by register and immediate forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogicOp {
    And,
    Or,
    Xor,
}

fn arithmetic8(
    core: &mut Core,
    op: fn(&mut crate::StatusRegister, Width, u16, u16) -> u16,
    dst: Reg8,
    src: u8,
) {
    let lhs = core.registers.get8(dst) as u16;
    let result = op(&mut core.status, Width::Byte, lhs, src as u16);
    core.registers.set8(dst, result as u8);
}

fn arithmetic16(
    core: &mut Core,
    op: fn(&mut crate::StatusRegister, Width, u16, u16) -> u16,
    dst: Reg16,
    src: u16,
) {
    let lhs = core.registers.get16(dst);
    let result = op(&mut core.status, Width::Word, lhs, src);
    core.registers.set16(dst, result);
}

/// Executes `ADD dst,src` (opcode 0x30).
pub(crate) fn execute_add8(core: &mut Core, dst: Reg8, src: Reg8) -> Result<(), CoreError> {
    let value = core.registers.get8(src);
    arithmetic8(core, alu::add, dst, value);
    Ok(())
}

/// Executes `SUB dst,src` (opcode 0x31).
pub(crate) fn execute_sub8(core: &mut Core, dst: Reg8, src: Reg8) -> Result<(), CoreError> {
    let value = core.registers.get8(src);
    arithmetic8(core, alu::subtract, dst, value);
    Ok(())
}

/// Executes `CMP a,b` (opcode 0x32). Flags of `a - b`; registers unchanged.
pub(crate) fn execute_cmp8(core: &mut Core, a: Reg8, b: Reg8) -> Result<(), CoreError> {
    let lhs = core.registers.get8(a) as u16;
    let rhs = core.registers.get8(b) as u16;
    alu::compare(&mut core.status, Width::Byte, lhs, rhs);
    Ok(())
}

/// Executes `ADD16 dst,src` (opcode 0x33).
pub(crate) fn execute_add16(core: &mut Core, dst: Reg16, src: Reg16) -> Result<(), CoreError> {
    let value = core.registers.get16(src);
    arithmetic16(core, alu::add, dst, value);
    Ok(())
}

/// Executes `SUB16 dst,src` (opcode 0x34).
pub(crate) fn execute_sub16(core: &mut Core, dst: Reg16, src: Reg16) -> Result<(), CoreError> {
    let value = core.registers.get16(src);
    arithmetic16(core, alu::subtract, dst, value);
    Ok(())
}

/// Executes `CMP16 a,b` (opcode 0x35).
pub(crate) fn execute_cmp16(core: &mut Core, a: Reg16, b: Reg16) -> Result<(), CoreError> {
    let lhs = core.registers.get16(a);
    let rhs = core.registers.get16(b);
    alu::compare(&mut core.status, Width::Word, lhs, rhs);
    Ok(())
}

/// Executes `ADD A,#n` (opcode 0x36).
pub(crate) fn execute_add_imm8(core: &mut Core, dst: Reg8, value: u8) -> Result<(), CoreError> {
    arithmetic8(core, alu::add, dst, value);
    Ok(())
}

/// Executes `SUB A,#n` (opcode 0x37).
pub(crate) fn execute_sub_imm8(core: &mut Core, dst: Reg8, value: u8) -> Result<(), CoreError> {
    arithmetic8(core, alu::subtract, dst, value);
    Ok(())
}

/// Executes `CMP r,#n` (opcodes 0xA0-0xA5).
pub(crate) fn execute_cmp_imm8(core: &mut Core, reg: Reg8, value: u8) -> Result<(), CoreError> {
    let lhs = core.registers.get8(reg) as u16;
    alu::compare(&mut core.status, Width::Byte, lhs, value as u16);
    Ok(())
}

/// Executes `CMP DA,#nn` / `CMP DB,#nn` (opcodes 0xA6, 0xA7).
///
/// Zero is set only when the whole 16-bit register equals the immediate.
pub(crate) fn execute_cmp_imm16(core: &mut Core, reg: Reg16, value: u16) -> Result<(), CoreError> {
    let lhs = core.registers.get16(reg);
    alu::compare(&mut core.status, Width::Word, lhs, value);
    Ok(())
}

fn apply_logic(core: &mut Core, op: LogicOp, dst: Reg8, value: u8) {
    let lhs = core.registers.get8(dst) as u16;
    let result = match op {
        LogicOp::And => alu::and(&mut core.status, Width::Byte, lhs, value as u16),
        LogicOp::Or => alu::or(&mut core.status, Width::Byte, lhs, value as u16),
        LogicOp::Xor => alu::xor(&mut core.status, Width::Byte, lhs, value as u16),
    };
    core.registers.set8(dst, result as u8);
}

/// Executes `AND`/`OR`/`XOR dst,src` (opcodes 0x50-0x52).
pub(crate) fn execute_logic(
    core: &mut Core,
    op: LogicOp,
    dst: Reg8,
    src: Reg8,
) -> Result<(), CoreError> {
    let value = core.registers.get8(src);
    apply_logic(core, op, dst, value);
    Ok(())
}

/// Executes `AND`/`OR`/`XOR A,#n` (opcodes 0x53-0x55).
pub(crate) fn execute_logic_imm(
    core: &mut Core,
    op: LogicOp,
    dst: Reg8,
    value: u8,
) -> Result<(), CoreError> {
    apply_logic(core, op, dst, value);
    Ok(())
}

/// Executes `NOT r` (opcode 0x56).
pub(crate) fn execute_not(core: &mut Core, reg: Reg8) -> Result<(), CoreError> {
    let value = core.registers.get8(reg) as u16;
    let result = alu::not(&mut core.status, Width::Byte, value);
    core.registers.set8(reg, result as u8);
    Ok(())
}
