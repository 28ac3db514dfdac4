//! # Arithmetic Logic Unit
//!
//! Stateless 8-bit and 16-bit primitives. Each takes the operand values by
//! copy, returns the new destination value masked to the operation width, and
//! drives the [`StatusRegister`] from the unmasked mathematical result.
//!
//! The dispatcher reads both registers, calls the ALU, then stores the
//! returned value into the destination register.

use serde::{Deserialize, Serialize};

use crate::StatusRegister;

/// Operation width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Width {
    /// 8-bit operation (bit 7 is the sign bit).
    Byte,
    /// 16-bit operation (bit 15 is the sign bit).
    Word,
}

impl Width {
    /// All-ones value of this width.
    pub const fn mask(self) -> u32 {
        match self {
            Width::Byte => 0xFF,
            Width::Word => 0xFFFF,
        }
    }

    /// The highest bit of this width.
    pub const fn sign_bit(self) -> u32 {
        match self {
            Width::Byte => 0x80,
            Width::Word => 0x8000,
        }
    }
}

fn operands(width: Width, dst: u16, src: u16) -> (u32, u32) {
    (dst as u32 & width.mask(), src as u32 & width.mask())
}

/// `dst + src`. Carry on unsigned overflow, Overflow on signed overflow.
///
/// # Examples
///
/// ```
/// use libfs8::{alu, StatusRegister, Width};
///
/// let mut status = StatusRegister::new();
/// let result = alu::add(&mut status, Width::Byte, 0xF0, 0x20);
/// assert_eq!(result, 0x10);
/// assert!(status.carry());
/// ```
pub fn add(status: &mut StatusRegister, width: Width, dst: u16, src: u16) -> u16 {
    let (dst, src) = operands(width, dst, src);
    let raw = dst + src;
    let result = raw & width.mask();

    status.update_from_arithmetic(raw as i32, width);
    status.set_overflow((dst ^ result) & (src ^ result) & width.sign_bit() != 0);

    result as u16
}

/// `dst - src`. Carry when a borrow occurred (`dst < src`).
pub fn subtract(status: &mut StatusRegister, width: Width, dst: u16, src: u16) -> u16 {
    let (dst, src) = operands(width, dst, src);
    let raw = dst as i32 - src as i32;
    let result = (raw as u32) & width.mask();

    status.update_from_arithmetic(raw, width);
    status.set_overflow((dst ^ src) & (dst ^ result) & width.sign_bit() != 0);

    result as u16
}

/// Flags of `a - b` without producing a value.
///
/// The 16-bit form derives Zero and Negative from the full 16-bit
/// difference, so `compare(0x0100, 0x0000)` is not zero.
pub fn compare(status: &mut StatusRegister, width: Width, a: u16, b: u16) {
    subtract(status, width, a, b);
}

fn logic_flags(status: &mut StatusRegister, width: Width, result: u32) {
    status.update_zero(result, width);
    status.update_negative(result, width);
    status.set_carry(false);
}

/// Bitwise AND. Carry is cleared.
pub fn and(status: &mut StatusRegister, width: Width, dst: u16, src: u16) -> u16 {
    let (dst, src) = operands(width, dst, src);
    let result = dst & src;
    logic_flags(status, width, result);
    result as u16
}

/// Bitwise OR. Carry is cleared.
pub fn or(status: &mut StatusRegister, width: Width, dst: u16, src: u16) -> u16 {
    let (dst, src) = operands(width, dst, src);
    let result = dst | src;
    logic_flags(status, width, result);
    result as u16
}

/// Bitwise XOR. Carry is cleared.
pub fn xor(status: &mut StatusRegister, width: Width, dst: u16, src: u16) -> u16 {
    let (dst, src) = operands(width, dst, src);
    let result = dst ^ src;
    logic_flags(status, width, result);
    result as u16
}

/// Bitwise complement within the width. Carry is left alone.
pub fn not(status: &mut StatusRegister, width: Width, dst: u16) -> u16 {
    let result = !(dst as u32) & width.mask();
    status.update_zero(result, width);
    status.update_negative(result, width);
    result as u16
}

/// 8-bit shift left; bit 7 goes to Carry.
pub fn shift_left(status: &mut StatusRegister, dst: u8) -> u8 {
    let result = dst << 1;
    status.set_carry(dst & 0x80 != 0);
    status.update_zero(result as u32, Width::Byte);
    status.update_negative(result as u32, Width::Byte);
    result
}

/// 8-bit logical shift right; bit 0 goes to Carry.
pub fn shift_right(status: &mut StatusRegister, dst: u8) -> u8 {
    let result = dst >> 1;
    status.set_carry(dst & 0x01 != 0);
    status.update_zero(result as u32, Width::Byte);
    status.update_negative(result as u32, Width::Byte);
    result
}

/// Adds one, wrapping at the width boundary.
pub fn increment(status: &mut StatusRegister, width: Width, dst: u16) -> u16 {
    add(status, width, dst, 1)
}

/// Subtracts one, wrapping at the width boundary.
pub fn decrement(status: &mut StatusRegister, width: Width, dst: u16) -> u16 {
    subtract(status, width, dst, 1)
}
