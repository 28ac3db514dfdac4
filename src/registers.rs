//! # Register File
//!
//! Register identifiers are closed enums. Names coming from a debugger or a
//! frontend are parsed once with [`FromStr`]; register selectors inside
//! instruction operands are parsed once at decode time with the
//! `from_code` constructors. Either path rejects unknown identifiers with
//! [`CoreError::InvalidRegister`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// The six independent 8-bit registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reg8 {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Reg8 {
    /// All byte registers in encoding order.
    pub const ALL: [Reg8; 6] = [Reg8::A, Reg8::B, Reg8::C, Reg8::D, Reg8::E, Reg8::F];

    /// Register selected by an operand nibble (A=0 .. F=5).
    pub fn from_code(code: u8) -> Result<Self, CoreError> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| CoreError::InvalidRegister(format!("byte register code {}", code)))
    }

    /// Operand nibble for this register.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Assembler name of the register.
    pub fn name(self) -> &'static str {
        match self {
            Reg8::A => "A",
            Reg8::B => "B",
            Reg8::C => "C",
            Reg8::D => "D",
            Reg8::E => "E",
            Reg8::F => "F",
        }
    }
}

impl FromStr for Reg8 {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|reg| reg.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::InvalidRegister(s.to_string()))
    }
}

impl fmt::Display for Reg8 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The 16-bit registers: two data pairs, two index pointers, PC and SP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reg16 {
    Da,
    Db,
    Idx,
    Idy,
    Pc,
    Sp,
}

impl Reg16 {
    /// All word registers.
    pub const ALL: [Reg16; 6] = [
        Reg16::Da,
        Reg16::Db,
        Reg16::Idx,
        Reg16::Idy,
        Reg16::Pc,
        Reg16::Sp,
    ];

    /// Register selected by an operand nibble in 16-bit register-register
    /// instructions (DA=0, DB=1, IDX=2, IDY=3). PC and SP are not selectable.
    pub fn from_code(code: u8) -> Result<Self, CoreError> {
        match code {
            0 => Ok(Reg16::Da),
            1 => Ok(Reg16::Db),
            2 => Ok(Reg16::Idx),
            3 => Ok(Reg16::Idy),
            _ => Err(CoreError::InvalidRegister(format!(
                "word register code {}",
                code
            ))),
        }
    }

    /// Operand nibble for this register, if it has one.
    pub fn code(self) -> Option<u8> {
        match self {
            Reg16::Da => Some(0),
            Reg16::Db => Some(1),
            Reg16::Idx => Some(2),
            Reg16::Idy => Some(3),
            Reg16::Pc | Reg16::Sp => None,
        }
    }

    /// Assembler name of the register.
    pub fn name(self) -> &'static str {
        match self {
            Reg16::Da => "DA",
            Reg16::Db => "DB",
            Reg16::Idx => "IDX",
            Reg16::Idy => "IDY",
            Reg16::Pc => "PC",
            Reg16::Sp => "SP",
        }
    }

    /// Whether writes through the register accessors update the Zero flag.
    pub(crate) fn is_data(self) -> bool {
        !matches!(self, Reg16::Pc | Reg16::Sp)
    }
}

impl FromStr for Reg16 {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|reg| reg.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::InvalidRegister(s.to_string()))
    }
}

impl fmt::Display for Reg16 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw register storage.
///
/// Reads and writes here have no flag side effects; the flag-updating
/// accessors live on [`crate::Core`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Registers {
    bytes: [u8; 6],
    da: u16,
    db: u16,
    idx: u16,
    idy: u16,
    pc: u16,
    sp: u16,
}

impl Registers {
    /// Zeroed registers with the given PC and SP.
    pub fn new(pc: u16, sp: u16) -> Self {
        Self {
            pc,
            sp,
            ..Self::default()
        }
    }

    /// Returns a byte register value.
    pub fn get8(&self, reg: Reg8) -> u8 {
        self.bytes[reg as usize]
    }

    /// Writes a byte register.
    pub fn set8(&mut self, reg: Reg8, value: u8) {
        self.bytes[reg as usize] = value;
    }

    /// Returns a word register value.
    pub fn get16(&self, reg: Reg16) -> u16 {
        match reg {
            Reg16::Da => self.da,
            Reg16::Db => self.db,
            Reg16::Idx => self.idx,
            Reg16::Idy => self.idy,
            Reg16::Pc => self.pc,
            Reg16::Sp => self.sp,
        }
    }

    /// Writes a word register.
    pub fn set16(&mut self, reg: Reg16, value: u16) {
        match reg {
            Reg16::Da => self.da = value,
            Reg16::Db => self.db = value,
            Reg16::Idx => self.idx = value,
            Reg16::Idy => self.idy = value,
            Reg16::Pc => self.pc = value,
            Reg16::Sp => self.sp = value,
        }
    }

    /// Returns the program counter value.
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Returns the stack pointer value.
    pub fn sp(&self) -> u16 {
        self.sp
    }

    pub(crate) fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    pub(crate) fn set_sp(&mut self, value: u16) {
        self.sp = value;
    }
}
