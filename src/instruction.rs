//! # Instruction Decoding
//!
//! Turns an opcode octet plus its operand octets into a typed
//! [`Instruction`]. Register selectors are parsed here, once, so execution
//! never re-dispatches on raw register codes.

use std::fmt;

use crate::{CoreError, IndexMode, IndexPointer, Reg16, Reg8, StatusRegister};

/// Branch condition shared by absolute and relative jumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Always,
    Zero,
    NotZero,
    Carry,
    NotCarry,
    Negative,
    NotNegative,
}

impl Condition {
    /// Whether the branch is taken for the given flags.
    pub fn holds(self, status: &StatusRegister) -> bool {
        match self {
            Condition::Always => true,
            Condition::Zero => status.zero(),
            Condition::NotZero => !status.zero(),
            Condition::Carry => status.carry(),
            Condition::NotCarry => !status.carry(),
            Condition::Negative => status.negative(),
            Condition::NotNegative => !status.negative(),
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Condition::Always => "",
            Condition::Zero => "Z",
            Condition::NotZero => "NZ",
            Condition::Carry => "C",
            Condition::NotCarry => "NC",
            Condition::Negative => "N",
            Condition::NotNegative => "NN",
        }
    }
}

/// A decoded FS8 instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Nop,
    Halt,
    Sys(u8),

    LoadImm8(Reg8, u8),
    LoadAbs8(Reg8, u16),
    LoadImm16(Reg16, u16),
    LoadAbs16(Reg16, u16),
    StoreAbs8(Reg8, u16),
    StoreAbs16(Reg16, u16),

    Add8 { dst: Reg8, src: Reg8 },
    Sub8 { dst: Reg8, src: Reg8 },
    Cmp8 { a: Reg8, b: Reg8 },
    Add16 { dst: Reg16, src: Reg16 },
    Sub16 { dst: Reg16, src: Reg16 },
    Cmp16 { a: Reg16, b: Reg16 },
    AddImm8(Reg8, u8),
    SubImm8(Reg8, u8),
    Inc8(Reg8),
    Dec8(Reg8),
    Inc16(Reg16),
    Dec16(Reg16),

    And { dst: Reg8, src: Reg8 },
    Or { dst: Reg8, src: Reg8 },
    Xor { dst: Reg8, src: Reg8 },
    AndImm(Reg8, u8),
    OrImm(Reg8, u8),
    XorImm(Reg8, u8),
    Not(Reg8),
    ShiftLeft(Reg8),
    ShiftRight(Reg8),

    Jump(Condition, u16),
    JumpRelative(Condition, i8),
    Call(u16),
    Ret,

    Push8(Reg8),
    Push16(Reg16),
    Pop8(Reg8),
    Pop16(Reg16),

    LoadIndexed {
        dst: Reg8,
        pointer: IndexPointer,
        mode: IndexMode,
    },
    StoreIndexed {
        src: Reg8,
        pointer: IndexPointer,
        mode: IndexMode,
    },

    Move8 { dst: Reg8, src: Reg8 },
    Swap8(Reg8, Reg8),
    Move16 { dst: Reg16, src: Reg16 },
    Swap16(Reg16, Reg16),
    /// Copy the other index pointer into `dst`.
    MovePointer { dst: IndexPointer },
    SwapPointers,
    IncPointer(IndexPointer),
    DecPointer(IndexPointer),
    AddPointer(IndexPointer, u16),

    CmpImm8(Reg8, u8),
    CmpImm16(Reg16, u16),
}

/// Source of operand octets during decode.
///
/// The core implements this by reading at PC and advancing it; a byte slice
/// implements it for decoding outside a running machine.
pub trait OperandFetch {
    fn fetch_byte(&mut self) -> Result<u8, CoreError>;

    /// Little-endian word: low octet first.
    fn fetch_word(&mut self) -> Result<u16, CoreError> {
        let low = self.fetch_byte()?;
        let high = self.fetch_byte()?;
        Ok(u16::from_le_bytes([low, high]))
    }
}

struct SliceFetch<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl OperandFetch for SliceFetch<'_> {
    fn fetch_byte(&mut self) -> Result<u8, CoreError> {
        let byte = self
            .bytes
            .get(self.position)
            .copied()
            .ok_or(CoreError::AddressOutOfRange {
                address: self.position as u32,
                size: self.bytes.len(),
            })?;
        self.position += 1;
        Ok(byte)
    }
}

fn register_pair8<F: OperandFetch>(fetch: &mut F) -> Result<(Reg8, Reg8), CoreError> {
    let selector = fetch.fetch_byte()?;
    Ok((Reg8::from_code(selector >> 4)?, Reg8::from_code(selector & 0x0F)?))
}

fn register_pair16<F: OperandFetch>(fetch: &mut F) -> Result<(Reg16, Reg16), CoreError> {
    let selector = fetch.fetch_byte()?;
    Ok((
        Reg16::from_code(selector >> 4)?,
        Reg16::from_code(selector & 0x0F)?,
    ))
}

fn register8<F: OperandFetch>(fetch: &mut F) -> Result<Reg8, CoreError> {
    Reg8::from_code(fetch.fetch_byte()?)
}

/// Byte register encoded in the low three bits of a per-register opcode.
fn row_register(opcode: u8) -> Result<Reg8, CoreError> {
    Reg8::from_code(opcode & 0x07)
}

fn indexed<F: OperandFetch>(
    opcode: u8,
    fetch: &mut F,
) -> Result<Instruction, CoreError> {
    let pointer = if opcode & 0x01 == 0 {
        IndexPointer::Idx
    } else {
        IndexPointer::Idy
    };
    let store = opcode & 0x02 != 0;
    let reg = register8(fetch)?;
    let mode = match opcode & 0x0C {
        0x00 => IndexMode::Direct,
        0x04 => IndexMode::Displacement(fetch.fetch_byte()? as i8),
        0x08 => IndexMode::PostIncrement,
        _ => IndexMode::PostDecrement,
    };

    Ok(if store {
        Instruction::StoreIndexed {
            src: reg,
            pointer,
            mode,
        }
    } else {
        Instruction::LoadIndexed {
            dst: reg,
            pointer,
            mode,
        }
    })
}

const WORD_TARGETS: [Reg16; 4] = [Reg16::Da, Reg16::Db, Reg16::Idx, Reg16::Idy];

impl Instruction {
    /// Decodes the instruction for `opcode`, pulling operand octets from
    /// `fetch`. `address` is where the opcode was read, for error reports.
    pub fn decode<F: OperandFetch>(
        opcode: u8,
        address: u16,
        fetch: &mut F,
    ) -> Result<Instruction, CoreError> {
        use Instruction::*;

        let instruction = match opcode {
            0x00 => Nop,
            0x01 => Halt,
            0x02 => Sys(fetch.fetch_byte()?),

            0x10..=0x15 => LoadImm8(Reg8::from_code(opcode - 0x10)?, fetch.fetch_byte()?),
            0x16..=0x1B => LoadAbs8(Reg8::from_code(opcode - 0x16)?, fetch.fetch_word()?),
            0x1C..=0x1F => LoadImm16(WORD_TARGETS[(opcode - 0x1C) as usize], fetch.fetch_word()?),
            0x20..=0x23 => LoadAbs16(WORD_TARGETS[(opcode - 0x20) as usize], fetch.fetch_word()?),
            0x24..=0x29 => StoreAbs8(Reg8::from_code(opcode - 0x24)?, fetch.fetch_word()?),
            0x2A..=0x2D => StoreAbs16(WORD_TARGETS[(opcode - 0x2A) as usize], fetch.fetch_word()?),

            0x30 => {
                let (dst, src) = register_pair8(fetch)?;
                Add8 { dst, src }
            }
            0x31 => {
                let (dst, src) = register_pair8(fetch)?;
                Sub8 { dst, src }
            }
            0x32 => {
                let (a, b) = register_pair8(fetch)?;
                Cmp8 { a, b }
            }
            0x33 => {
                let (dst, src) = register_pair16(fetch)?;
                Add16 { dst, src }
            }
            0x34 => {
                let (dst, src) = register_pair16(fetch)?;
                Sub16 { dst, src }
            }
            0x35 => {
                let (a, b) = register_pair16(fetch)?;
                Cmp16 { a, b }
            }
            0x36 => AddImm8(Reg8::A, fetch.fetch_byte()?),
            0x37 => SubImm8(Reg8::A, fetch.fetch_byte()?),
            0x38 => Inc16(Reg16::Da),
            0x39 => Inc16(Reg16::Db),
            0x3A => Dec16(Reg16::Da),
            0x3B => Dec16(Reg16::Db),
            0x40..=0x45 => Inc8(row_register(opcode)?),
            0x48..=0x4D => Dec8(row_register(opcode)?),

            0x50 => {
                let (dst, src) = register_pair8(fetch)?;
                And { dst, src }
            }
            0x51 => {
                let (dst, src) = register_pair8(fetch)?;
                Or { dst, src }
            }
            0x52 => {
                let (dst, src) = register_pair8(fetch)?;
                Xor { dst, src }
            }
            0x53 => AndImm(Reg8::A, fetch.fetch_byte()?),
            0x54 => OrImm(Reg8::A, fetch.fetch_byte()?),
            0x55 => XorImm(Reg8::A, fetch.fetch_byte()?),
            0x56 => Not(register8(fetch)?),
            0x57 => ShiftLeft(register8(fetch)?),
            0x58 => ShiftRight(register8(fetch)?),

            0x60 => Jump(Condition::Always, fetch.fetch_word()?),
            0x61 => Jump(Condition::Zero, fetch.fetch_word()?),
            0x62 => Jump(Condition::NotZero, fetch.fetch_word()?),
            0x63 => Jump(Condition::Carry, fetch.fetch_word()?),
            0x64 => Jump(Condition::NotCarry, fetch.fetch_word()?),
            0x65 => Jump(Condition::Negative, fetch.fetch_word()?),
            0x66 => Jump(Condition::NotNegative, fetch.fetch_word()?),
            0x67 => Call(fetch.fetch_word()?),
            0x68 => Ret,
            0x69 => JumpRelative(Condition::Always, fetch.fetch_byte()? as i8),
            0x6A => JumpRelative(Condition::Zero, fetch.fetch_byte()? as i8),
            0x6B => JumpRelative(Condition::NotZero, fetch.fetch_byte()? as i8),
            0x6C => JumpRelative(Condition::Carry, fetch.fetch_byte()? as i8),

            0x70..=0x75 => Push8(row_register(opcode)?),
            0x76 => Push16(Reg16::Da),
            0x77 => Push16(Reg16::Db),
            0x78..=0x7D => Pop8(Reg8::from_code(opcode - 0x78)?),
            0x7E => Pop16(Reg16::Da),
            0x7F => Pop16(Reg16::Db),

            0x80..=0x8F => indexed(opcode, fetch)?,

            0x90 => {
                let (dst, src) = register_pair8(fetch)?;
                Move8 { dst, src }
            }
            0x91 => {
                let (a, b) = register_pair8(fetch)?;
                Swap8(a, b)
            }
            0x92 => {
                let (dst, src) = register_pair16(fetch)?;
                Move16 { dst, src }
            }
            0x93 => {
                let (a, b) = register_pair16(fetch)?;
                Swap16(a, b)
            }
            0x94 => MovePointer {
                dst: IndexPointer::Idx,
            },
            0x95 => MovePointer {
                dst: IndexPointer::Idy,
            },
            0x96 => SwapPointers,
            0x98 => IncPointer(IndexPointer::Idx),
            0x99 => IncPointer(IndexPointer::Idy),
            0x9A => DecPointer(IndexPointer::Idx),
            0x9B => DecPointer(IndexPointer::Idy),
            0x9C => AddPointer(IndexPointer::Idx, fetch.fetch_word()?),
            0x9D => AddPointer(IndexPointer::Idy, fetch.fetch_word()?),

            0xA0..=0xA5 => CmpImm8(Reg8::from_code(opcode - 0xA0)?, fetch.fetch_byte()?),
            0xA6 => CmpImm16(Reg16::Da, fetch.fetch_word()?),
            0xA7 => CmpImm16(Reg16::Db, fetch.fetch_word()?),

            _ => return Err(CoreError::UnknownInstruction { opcode, address }),
        };

        Ok(instruction)
    }

    /// Decodes one instruction from the start of `bytes`, returning it with
    /// the number of octets consumed.
    ///
    /// # Examples
    ///
    /// ```
    /// use libfs8::{Instruction, Reg16};
    ///
    /// let (inst, size) = Instruction::decode_bytes(&[0xA6, 0x34, 0x12]).unwrap();
    /// assert_eq!(inst, Instruction::CmpImm16(Reg16::Da, 0x1234));
    /// assert_eq!(size, 3);
    /// assert_eq!(inst.to_string(), "CMP DA,#$1234");
    /// ```
    pub fn decode_bytes(bytes: &[u8]) -> Result<(Instruction, usize), CoreError> {
        let mut fetch = SliceFetch { bytes, position: 0 };
        let opcode = fetch.fetch_byte()?;
        let instruction = Instruction::decode(opcode, 0, &mut fetch)?;
        Ok((instruction, fetch.position))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Instruction::*;

        match *self {
            Nop => write!(f, "NOP"),
            Halt => write!(f, "HALT"),
            Sys(n) => write!(f, "SYS #${:02X}", n),

            LoadImm8(r, v) => write!(f, "LD {},#${:02X}", r, v),
            LoadAbs8(r, a) => write!(f, "LD {},${:04X}", r, a),
            LoadImm16(r, v) => write!(f, "LD {},#${:04X}", r, v),
            LoadAbs16(r, a) => write!(f, "LD {},${:04X}", r, a),
            StoreAbs8(r, a) => write!(f, "ST {},${:04X}", r, a),
            StoreAbs16(r, a) => write!(f, "ST {},${:04X}", r, a),

            Add8 { dst, src } => write!(f, "ADD {},{}", dst, src),
            Sub8 { dst, src } => write!(f, "SUB {},{}", dst, src),
            Cmp8 { a, b } => write!(f, "CMP {},{}", a, b),
            Add16 { dst, src } => write!(f, "ADD {},{}", dst, src),
            Sub16 { dst, src } => write!(f, "SUB {},{}", dst, src),
            Cmp16 { a, b } => write!(f, "CMP {},{}", a, b),
            AddImm8(r, v) => write!(f, "ADD {},#${:02X}", r, v),
            SubImm8(r, v) => write!(f, "SUB {},#${:02X}", r, v),
            Inc8(r) => write!(f, "INC {}", r),
            Dec8(r) => write!(f, "DEC {}", r),
            Inc16(r) => write!(f, "INC {}", r),
            Dec16(r) => write!(f, "DEC {}", r),

            And { dst, src } => write!(f, "AND {},{}", dst, src),
            Or { dst, src } => write!(f, "OR {},{}", dst, src),
            Xor { dst, src } => write!(f, "XOR {},{}", dst, src),
            AndImm(r, v) => write!(f, "AND {},#${:02X}", r, v),
            OrImm(r, v) => write!(f, "OR {},#${:02X}", r, v),
            XorImm(r, v) => write!(f, "XOR {},#${:02X}", r, v),
            Not(r) => write!(f, "NOT {}", r),
            ShiftLeft(r) => write!(f, "SHL {}", r),
            ShiftRight(r) => write!(f, "SHR {}", r),

            Jump(cond, target) => match cond {
                Condition::Always => write!(f, "JMP ${:04X}", target),
                _ => write!(f, "J{} ${:04X}", cond.suffix(), target),
            },
            JumpRelative(cond, offset) => write!(f, "JR{} {}", cond.suffix(), offset),
            Call(target) => write!(f, "CALL ${:04X}", target),
            Ret => write!(f, "RET"),

            Push8(r) => write!(f, "PUSH {}", r),
            Push16(r) => write!(f, "PUSH {}", r),
            Pop8(r) => write!(f, "POP {}", r),
            Pop16(r) => write!(f, "POP {}", r),

            LoadIndexed { dst, pointer, mode } => write!(f, "LD {},{}", dst, mode.format(pointer)),
            StoreIndexed { src, pointer, mode } => write!(f, "ST {},{}", src, mode.format(pointer)),

            Move8 { dst, src } => write!(f, "MOV {},{}", dst, src),
            Swap8(a, b) => write!(f, "SWAP {},{}", a, b),
            Move16 { dst, src } => write!(f, "MOV {},{}", dst, src),
            Swap16(a, b) => write!(f, "SWAP {},{}", a, b),
            MovePointer { dst } => write!(f, "MOV {},{}", dst, dst.other()),
            SwapPointers => write!(f, "SWAP IDX,IDY"),
            IncPointer(p) => write!(f, "INC {}", p),
            DecPointer(p) => write!(f, "DEC {}", p),
            AddPointer(p, v) => write!(f, "ADD {},#${:04X}", p, v),

            CmpImm8(r, v) => write!(f, "CMP {},#${:02X}", r, v),
            CmpImm16(r, v) => write!(f, "CMP {},#${:04X}", r, v),
        }
    }
}
