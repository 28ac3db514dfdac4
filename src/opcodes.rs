//! # Opcode Metadata Table
//!
//! The 256-entry table that is the single source of truth for every FS8
//! opcode: mnemonic, operand layout, size and base cycle cost. Opcodes with
//! no entry are marked `defined: false` and fault with
//! [`crate::CoreError::UnknownInstruction`] when fetched.
//!
//! ## Map
//!
//! | Range   | Family                                           |
//! |---------|--------------------------------------------------|
//! | `00-02` | NOP, HALT, SYS                                   |
//! | `10-23` | 8-bit and 16-bit loads (immediate and absolute)  |
//! | `24-2D` | absolute stores                                  |
//! | `30-4D` | add, subtract, compare, increment, decrement     |
//! | `50-58` | AND, OR, XOR, NOT, shifts                        |
//! | `60-6C` | absolute and relative jumps, CALL, RET           |
//! | `70-7F` | push and pop                                     |
//! | `80-8F` | indexed loads and stores                         |
//! | `90-9D` | moves, swaps, index pointer arithmetic           |
//! | `A0-A7` | compare immediate                                |

/// How the octets after an opcode are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandLayout {
    /// No operand octets.
    Implied,
    /// One immediate octet.
    Immediate8,
    /// Little-endian 16-bit immediate.
    Immediate16,
    /// Little-endian 16-bit absolute address.
    Absolute,
    /// Signed 8-bit offset from the address after the operand.
    Relative,
    /// One register selector octet holding a single register code.
    Register,
    /// One register selector octet: destination high nibble, source low nibble.
    RegisterPair,
    /// Register code octet followed by a signed 8-bit displacement.
    RegisterDisplacement,
}

impl OperandLayout {
    /// Number of operand octets after the opcode.
    pub const fn operand_bytes(self) -> u8 {
        match self {
            OperandLayout::Implied => 0,
            OperandLayout::Immediate8
            | OperandLayout::Relative
            | OperandLayout::Register
            | OperandLayout::RegisterPair => 1,
            OperandLayout::Immediate16
            | OperandLayout::Absolute
            | OperandLayout::RegisterDisplacement => 2,
        }
    }
}

/// Metadata for a single FS8 opcode.
///
/// # Examples
///
/// ```
/// use libfs8::OPCODE_TABLE;
///
/// let ld = &OPCODE_TABLE[0x10]; // LD A,#n
/// assert_eq!(ld.mnemonic, "LD");
/// assert_eq!(ld.size_bytes, 2);
/// assert!(ld.defined);
///
/// assert!(!OPCODE_TABLE[0xFD].defined);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeMetadata {
    /// Bare operation name as printed by [`crate::Instruction`]'s `Display`
    /// ("???" for undefined opcodes).
    pub mnemonic: &'static str,

    /// Operand octet layout.
    pub operands: OperandLayout,

    /// Total size in octets, opcode included (1-3).
    pub size_bytes: u8,

    /// Cycles charged when the instruction executes.
    pub base_cycles: u8,

    /// Whether the opcode exists.
    pub defined: bool,
}

const UNDEFINED: OpcodeMetadata = OpcodeMetadata {
    mnemonic: "???",
    operands: OperandLayout::Implied,
    size_bytes: 1,
    base_cycles: 0,
    defined: false,
};

const fn op(mnemonic: &'static str, operands: OperandLayout, base_cycles: u8) -> OpcodeMetadata {
    OpcodeMetadata {
        mnemonic,
        operands,
        size_bytes: 1 + operands.operand_bytes(),
        base_cycles,
        defined: true,
    }
}

/// Complete 256-entry opcode table indexed by opcode octet.
pub const OPCODE_TABLE: [OpcodeMetadata; 256] = build_table();

const fn build_table() -> [OpcodeMetadata; 256] {
    use OperandLayout::*;

    let mut t = [UNDEFINED; 256];

    // Control
    t[0x00] = op("NOP", Implied, 1);
    t[0x01] = op("HALT", Implied, 1);
    t[0x02] = op("SYS", Immediate8, 4);

    // 8-bit loads
    t[0x10] = op("LD", Immediate8, 2);
    t[0x11] = op("LD", Immediate8, 2);
    t[0x12] = op("LD", Immediate8, 2);
    t[0x13] = op("LD", Immediate8, 2);
    t[0x14] = op("LD", Immediate8, 2);
    t[0x15] = op("LD", Immediate8, 2);
    t[0x16] = op("LD", Absolute, 4);
    t[0x17] = op("LD", Absolute, 4);
    t[0x18] = op("LD", Absolute, 4);
    t[0x19] = op("LD", Absolute, 4);
    t[0x1A] = op("LD", Absolute, 4);
    t[0x1B] = op("LD", Absolute, 4);

    // 16-bit loads
    t[0x1C] = op("LD", Immediate16, 3);
    t[0x1D] = op("LD", Immediate16, 3);
    t[0x1E] = op("LD", Immediate16, 3);
    t[0x1F] = op("LD", Immediate16, 3);
    t[0x20] = op("LD", Absolute, 5);
    t[0x21] = op("LD", Absolute, 5);
    t[0x22] = op("LD", Absolute, 5);
    t[0x23] = op("LD", Absolute, 5);

    // Stores
    t[0x24] = op("ST", Absolute, 4);
    t[0x25] = op("ST", Absolute, 4);
    t[0x26] = op("ST", Absolute, 4);
    t[0x27] = op("ST", Absolute, 4);
    t[0x28] = op("ST", Absolute, 4);
    t[0x29] = op("ST", Absolute, 4);
    t[0x2A] = op("ST", Absolute, 5);
    t[0x2B] = op("ST", Absolute, 5);
    t[0x2C] = op("ST", Absolute, 5);
    t[0x2D] = op("ST", Absolute, 5);

    // Arithmetic
    t[0x30] = op("ADD", RegisterPair, 2);
    t[0x31] = op("SUB", RegisterPair, 2);
    t[0x32] = op("CMP", RegisterPair, 2);
    t[0x33] = op("ADD", RegisterPair, 3);
    t[0x34] = op("SUB", RegisterPair, 3);
    t[0x35] = op("CMP", RegisterPair, 3);
    t[0x36] = op("ADD", Immediate8, 2);
    t[0x37] = op("SUB", Immediate8, 2);
    t[0x38] = op("INC", Implied, 2);
    t[0x39] = op("INC", Implied, 2);
    t[0x3A] = op("DEC", Implied, 2);
    t[0x3B] = op("DEC", Implied, 2);

    let mut i = 0;
    while i < 6 {
        t[0x40 + i] = op("INC", Implied, 1);
        t[0x48 + i] = op("DEC", Implied, 1);
        i += 1;
    }

    // Logic
    t[0x50] = op("AND", RegisterPair, 2);
    t[0x51] = op("OR", RegisterPair, 2);
    t[0x52] = op("XOR", RegisterPair, 2);
    t[0x53] = op("AND", Immediate8, 2);
    t[0x54] = op("OR", Immediate8, 2);
    t[0x55] = op("XOR", Immediate8, 2);
    t[0x56] = op("NOT", Register, 2);
    t[0x57] = op("SHL", Register, 2);
    t[0x58] = op("SHR", Register, 2);

    // Control flow
    t[0x60] = op("JMP", Absolute, 3);
    t[0x61] = op("JZ", Absolute, 3);
    t[0x62] = op("JNZ", Absolute, 3);
    t[0x63] = op("JC", Absolute, 3);
    t[0x64] = op("JNC", Absolute, 3);
    t[0x65] = op("JN", Absolute, 3);
    t[0x66] = op("JNN", Absolute, 3);
    t[0x67] = op("CALL", Absolute, 5);
    t[0x68] = op("RET", Implied, 4);
    t[0x69] = op("JR", Relative, 2);
    t[0x6A] = op("JRZ", Relative, 2);
    t[0x6B] = op("JRNZ", Relative, 2);
    t[0x6C] = op("JRC", Relative, 2);

    // Stack
    i = 0;
    while i < 6 {
        t[0x70 + i] = op("PUSH", Implied, 2);
        t[0x78 + i] = op("POP", Implied, 2);
        i += 1;
    }
    t[0x76] = op("PUSH", Implied, 3);
    t[0x77] = op("PUSH", Implied, 3);
    t[0x7E] = op("POP", Implied, 3);
    t[0x7F] = op("POP", Implied, 3);

    // Indexed
    t[0x80] = op("LD", Register, 3);
    t[0x81] = op("LD", Register, 3);
    t[0x82] = op("ST", Register, 3);
    t[0x83] = op("ST", Register, 3);
    t[0x84] = op("LD", RegisterDisplacement, 4);
    t[0x85] = op("LD", RegisterDisplacement, 4);
    t[0x86] = op("ST", RegisterDisplacement, 4);
    t[0x87] = op("ST", RegisterDisplacement, 4);
    t[0x88] = op("LD", Register, 3);
    t[0x89] = op("LD", Register, 3);
    t[0x8A] = op("ST", Register, 3);
    t[0x8B] = op("ST", Register, 3);
    t[0x8C] = op("LD", Register, 3);
    t[0x8D] = op("LD", Register, 3);
    t[0x8E] = op("ST", Register, 3);
    t[0x8F] = op("ST", Register, 3);

    // Transfers and index pointer arithmetic
    t[0x90] = op("MOV", RegisterPair, 2);
    t[0x91] = op("SWAP", RegisterPair, 3);
    t[0x92] = op("MOV", RegisterPair, 2);
    t[0x93] = op("SWAP", RegisterPair, 3);
    t[0x94] = op("MOV", Implied, 1);
    t[0x95] = op("MOV", Implied, 1);
    t[0x96] = op("SWAP", Implied, 2);
    t[0x98] = op("INC", Implied, 1);
    t[0x99] = op("INC", Implied, 1);
    t[0x9A] = op("DEC", Implied, 1);
    t[0x9B] = op("DEC", Implied, 1);
    t[0x9C] = op("ADD", Immediate16, 3);
    t[0x9D] = op("ADD", Immediate16, 3);

    // Compare immediate
    i = 0;
    while i < 6 {
        t[0xA0 + i] = op("CMP", Immediate8, 2);
        i += 1;
    }
    t[0xA6] = op("CMP", Immediate16, 3);
    t[0xA7] = op("CMP", Immediate16, 3);

    t
}

/// Number of defined opcodes.
pub fn defined_count() -> usize {
    OPCODE_TABLE.iter().filter(|m| m.defined).count()
}
