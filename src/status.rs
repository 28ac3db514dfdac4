//! # Status Register
//!
//! Four result flags packed into a single byte:
//!
//! | Bit | Flag     |
//! |-----|----------|
//! | 0   | Zero     |
//! | 1   | Carry    |
//! | 2   | Overflow |
//! | 3   | Negative |
//!
//! Zero and Negative are always derived from the result masked to the
//! operation width, so a 16-bit result of `0x0100` is neither zero nor
//! negative even though its low byte is `0x00`.

use bitflags::bitflags;

use crate::alu::Width;

bitflags! {
    /// Raw flag bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags: u8 {
        const ZERO = 0x01;
        const CARRY = 0x02;
        const OVERFLOW = 0x04;
        const NEGATIVE = 0x08;
    }
}

/// The FS8 flag register.
///
/// # Examples
///
/// ```
/// use libfs8::{StatusRegister, Width};
///
/// let mut status = StatusRegister::new();
/// // 0x0100 - 0x0000 as a 16-bit operation
/// status.update_from_arithmetic(0x0100, Width::Word);
/// assert!(!status.zero());
/// assert!(!status.carry());
/// assert!(!status.negative());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRegister {
    flags: Flags,
}

impl Default for StatusRegister {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusRegister {
    /// All flags clear.
    pub fn new() -> Self {
        Self {
            flags: Flags::empty(),
        }
    }

    /// Unpacks a status byte. Unused high bits are dropped.
    pub fn from_bits(bits: u8) -> Self {
        Self {
            flags: Flags::from_bits_truncate(bits),
        }
    }

    /// Packed status byte.
    pub fn bits(&self) -> u8 {
        self.flags.bits()
    }

    /// Clears every flag.
    pub fn clear(&mut self) {
        self.flags = Flags::empty();
    }

    /// Returns the Zero flag.
    pub fn zero(&self) -> bool {
        self.flags.contains(Flags::ZERO)
    }

    /// Returns the Carry flag.
    pub fn carry(&self) -> bool {
        self.flags.contains(Flags::CARRY)
    }

    /// Returns the Overflow flag.
    pub fn overflow(&self) -> bool {
        self.flags.contains(Flags::OVERFLOW)
    }

    /// Returns the Negative flag.
    pub fn negative(&self) -> bool {
        self.flags.contains(Flags::NEGATIVE)
    }

    /// Sets Zero iff `result` masked to `width` is zero.
    pub fn update_zero(&mut self, result: u32, width: Width) {
        self.flags.set(Flags::ZERO, result & width.mask() == 0);
    }

    /// Sets Negative from the top bit of `result` at `width`.
    pub fn update_negative(&mut self, result: u32, width: Width) {
        self.flags
            .set(Flags::NEGATIVE, result & width.sign_bit() != 0);
    }

    /// Sets or clears the Zero flag.
    pub fn set_zero(&mut self, value: bool) {
        self.flags.set(Flags::ZERO, value);
    }

    /// Sets or clears the Carry flag.
    pub fn set_carry(&mut self, value: bool) {
        self.flags.set(Flags::CARRY, value);
    }

    /// Sets or clears the Overflow flag.
    pub fn set_overflow(&mut self, value: bool) {
        self.flags.set(Flags::OVERFLOW, value);
    }

    /// Sets or clears the Negative flag.
    pub fn set_negative(&mut self, value: bool) {
        self.flags.set(Flags::NEGATIVE, value);
    }

    /// Derives Zero, Carry and Negative from an unclamped arithmetic result.
    ///
    /// `raw` is the mathematical result before masking: a sum may exceed the
    /// width mask (carry) and a difference may be negative (borrow). Zero and
    /// Negative look at all bits of the width, never a truncated low byte.
    pub fn update_from_arithmetic(&mut self, raw: i32, width: Width) {
        let masked = (raw as u32) & width.mask();
        self.update_zero(masked, width);
        self.update_negative(masked, width);
        self.set_carry(raw < 0 || raw > width.mask() as i32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packing() {
        let mut status = StatusRegister::new();
        status.set_zero(true);
        status.set_negative(true);
        assert_eq!(status.bits(), 0b1001);
        assert_eq!(StatusRegister::from_bits(0xF6).bits(), 0x06);
    }

    #[test]
    fn test_zero_uses_full_word() {
        let mut status = StatusRegister::new();
        status.update_zero(0x0100, Width::Word);
        assert!(!status.zero());
        status.update_zero(0x0100, Width::Byte);
        assert!(status.zero());
    }

    #[test]
    fn test_negative_bit_per_width() {
        let mut status = StatusRegister::new();
        status.update_negative(0x0080, Width::Byte);
        assert!(status.negative());
        status.update_negative(0x0080, Width::Word);
        assert!(!status.negative());
        status.update_negative(0x8000, Width::Word);
        assert!(status.negative());
    }

    #[test]
    fn test_borrow_sets_carry() {
        let mut status = StatusRegister::new();
        status.update_from_arithmetic(3 - 5, Width::Byte);
        assert!(status.carry());
        assert!(status.negative()); // 0xFE
        assert!(!status.zero());
    }

    #[test]
    fn test_overflowing_sum_is_zero_and_carry() {
        let mut status = StatusRegister::new();
        status.update_from_arithmetic(0xFF + 0x01, Width::Byte);
        assert!(status.zero());
        assert!(status.carry());
        assert!(!status.negative());
    }

    #[test]
    fn test_overflow_flag_is_independent() {
        let mut status = StatusRegister::new();
        status.set_overflow(true);
        status.update_from_arithmetic(1, Width::Byte);
        assert!(status.overflow());
    }
}
