//! # FS8 Instruction Implementations
//!
//! This module contains the implementations of all FS8 instructions, organized by category.
//! Each instruction is a standalone function that takes a mutable reference to the core
//! and the operands already decoded into an [`Instruction`].
//!
//! PC has already been advanced past the whole instruction when these run, and cycles are
//! charged by the core afterwards, so only control flow instructions touch PC.
//!
//! ## Categories
//!
//! - **alu**: Arithmetic, compare and logic operations (ADD, SUB, CMP, AND, OR, XOR, NOT)
//! - **branches**: Absolute and relative jumps (JMP, JZ, JNZ, JC, JNC, JN, JNN, JR, JRZ, JRNZ, JRC)
//! - **control**: NOP, HALT, SYS, CALL, RET
//! - **inc_dec**: Register and index pointer increment, decrement and ADD IDX/IDY
//! - **indexed**: Loads and stores through IDX/IDY
//! - **load_store**: Immediate and absolute loads, absolute stores
//! - **shifts**: SHL, SHR
//! - **stack**: PUSH, POP
//! - **transfer**: MOV, SWAP

pub mod alu;
pub mod branches;
pub mod control;
pub mod inc_dec;
pub mod indexed;
pub mod load_store;
pub mod shifts;
pub mod stack;
pub mod transfer;

use crate::{Core, CoreError, Instruction};

use self::alu::LogicOp;

/// Runs a decoded instruction against the core.
pub(crate) fn execute(core: &mut Core, instruction: Instruction) -> Result<(), CoreError> {
    use Instruction::*;

    match instruction {
        Nop => control::execute_nop(core),
        Halt => control::execute_halt(core),
        Sys(n) => control::execute_sys(core, n),
        Call(target) => control::execute_call(core, target),
        Ret => control::execute_ret(core),

        LoadImm8(reg, value) => load_store::execute_load_imm8(core, reg, value),
        LoadAbs8(reg, address) => load_store::execute_load_abs8(core, reg, address),
        LoadImm16(reg, value) => load_store::execute_load_imm16(core, reg, value),
        LoadAbs16(reg, address) => load_store::execute_load_abs16(core, reg, address),
        StoreAbs8(reg, address) => load_store::execute_store_abs8(core, reg, address),
        StoreAbs16(reg, address) => load_store::execute_store_abs16(core, reg, address),

        Add8 { dst, src } => alu::execute_add8(core, dst, src),
        Sub8 { dst, src } => alu::execute_sub8(core, dst, src),
        Cmp8 { a, b } => alu::execute_cmp8(core, a, b),
        Add16 { dst, src } => alu::execute_add16(core, dst, src),
        Sub16 { dst, src } => alu::execute_sub16(core, dst, src),
        Cmp16 { a, b } => alu::execute_cmp16(core, a, b),
        AddImm8(reg, value) => alu::execute_add_imm8(core, reg, value),
        SubImm8(reg, value) => alu::execute_sub_imm8(core, reg, value),
        CmpImm8(reg, value) => alu::execute_cmp_imm8(core, reg, value),
        CmpImm16(reg, value) => alu::execute_cmp_imm16(core, reg, value),
        And { dst, src } => alu::execute_logic(core, LogicOp::And, dst, src),
        Or { dst, src } => alu::execute_logic(core, LogicOp::Or, dst, src),
        Xor { dst, src } => alu::execute_logic(core, LogicOp::Xor, dst, src),
        AndImm(reg, value) => alu::execute_logic_imm(core, LogicOp::And, reg, value),
        OrImm(reg, value) => alu::execute_logic_imm(core, LogicOp::Or, reg, value),
        XorImm(reg, value) => alu::execute_logic_imm(core, LogicOp::Xor, reg, value),
        Not(reg) => alu::execute_not(core, reg),

        Inc8(reg) => inc_dec::execute_inc8(core, reg),
        Dec8(reg) => inc_dec::execute_dec8(core, reg),
        Inc16(reg) => inc_dec::execute_inc16(core, reg),
        Dec16(reg) => inc_dec::execute_dec16(core, reg),
        IncPointer(pointer) => inc_dec::execute_inc_pointer(core, pointer),
        DecPointer(pointer) => inc_dec::execute_dec_pointer(core, pointer),
        AddPointer(pointer, value) => inc_dec::execute_add_pointer(core, pointer, value),

        ShiftLeft(reg) => shifts::execute_shl(core, reg),
        ShiftRight(reg) => shifts::execute_shr(core, reg),

        Jump(condition, target) => branches::execute_jump(core, condition, target),
        JumpRelative(condition, offset) => branches::execute_jump_relative(core, condition, offset),

        Push8(reg) => stack::execute_push8(core, reg),
        Push16(reg) => stack::execute_push16(core, reg),
        Pop8(reg) => stack::execute_pop8(core, reg),
        Pop16(reg) => stack::execute_pop16(core, reg),

        LoadIndexed { dst, pointer, mode } => indexed::execute_load_indexed(core, dst, pointer, mode),
        StoreIndexed { src, pointer, mode } => {
            indexed::execute_store_indexed(core, src, pointer, mode)
        }

        Move8 { dst, src } => transfer::execute_move8(core, dst, src),
        Swap8(a, b) => transfer::execute_swap8(core, a, b),
        Move16 { dst, src } => transfer::execute_move16(core, dst, src),
        Swap16(a, b) => transfer::execute_swap16(core, a, b),
        MovePointer { dst } => transfer::execute_move_pointer(core, dst),
        SwapPointers => transfer::execute_swap_pointers(core),
    }
}

