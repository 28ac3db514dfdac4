//! Tests for the opcode metadata table.
//!
//! The table drives fetch (which opcodes exist), decode (operand octet
//! counts) and cycle accounting, so these checks pin its shape down.

use libfs8::opcodes::{defined_count, OperandLayout};
use libfs8::{Instruction, OPCODE_TABLE};

#[test]
fn test_table_has_256_entries() {
    assert_eq!(OPCODE_TABLE.len(), 256);
}

#[test]
fn test_defined_opcode_count() {
    assert_eq!(defined_count(), 132);
}

#[test]
fn test_defined_opcodes_cost_cycles() {
    for (opcode, meta) in OPCODE_TABLE.iter().enumerate() {
        if meta.defined {
            assert!(meta.base_cycles > 0, "0x{:02X} has no cycle cost", opcode);
            assert!(
                (1..=3).contains(&meta.size_bytes),
                "0x{:02X} size {}",
                opcode,
                meta.size_bytes
            );
        } else {
            assert_eq!(meta.mnemonic, "???");
        }
    }
}

#[test]
fn test_gaps_are_undefined() {
    for opcode in [0x03, 0x0F, 0x2E, 0x3C, 0x46, 0x4E, 0x59, 0x6D, 0x97, 0x9E, 0xA8, 0xFD, 0xFF] {
        assert!(!OPCODE_TABLE[opcode].defined, "0x{:02X}", opcode);
    }
}

#[test]
fn test_family_sizes() {
    // 8-bit immediate loads
    for opcode in 0x10..=0x15 {
        assert_eq!(OPCODE_TABLE[opcode].size_bytes, 2);
        assert_eq!(OPCODE_TABLE[opcode].operands, OperandLayout::Immediate8);
    }
    // absolute loads and stores
    for opcode in (0x16..=0x1B).chain(0x20..=0x2D) {
        assert_eq!(OPCODE_TABLE[opcode].size_bytes, 3, "0x{:02X}", opcode);
    }
    // per-register increments, decrements, pushes and pops
    for opcode in (0x40..=0x45).chain(0x48..=0x4D).chain(0x70..=0x7F) {
        assert_eq!(OPCODE_TABLE[opcode].size_bytes, 1, "0x{:02X}", opcode);
    }
    // indexed: displacement forms carry one extra octet
    for opcode in 0x80..=0x8F {
        let expected = if opcode & 0x0C == 0x04 { 3 } else { 2 };
        assert_eq!(OPCODE_TABLE[opcode].size_bytes, expected, "0x{:02X}", opcode);
    }
}

#[test]
fn test_jump_metadata() {
    assert_eq!(OPCODE_TABLE[0x60].mnemonic, "JMP");
    assert_eq!(OPCODE_TABLE[0x60].operands, OperandLayout::Absolute);
    assert_eq!(OPCODE_TABLE[0x67].mnemonic, "CALL");
    assert_eq!(OPCODE_TABLE[0x68].size_bytes, 1);
    for opcode in 0x69..=0x6C {
        assert_eq!(OPCODE_TABLE[opcode].operands, OperandLayout::Relative);
    }
}

#[test]
fn test_decoder_agrees_with_table() {
    for opcode in 0..=255u8 {
        let meta = &OPCODE_TABLE[opcode as usize];
        let decoded = Instruction::decode_bytes(&[opcode, 0x00, 0x00]);
        assert_eq!(decoded.is_ok(), meta.defined, "0x{:02X}", opcode);
        if let Ok((_, size)) = decoded {
            assert_eq!(size, meta.size_bytes as usize, "0x{:02X}", opcode);
        }
    }
}

#[test]
fn test_mnemonic_matches_display() {
    for opcode in 0..=255u8 {
        let meta = &OPCODE_TABLE[opcode as usize];
        if let Ok((instruction, _)) = Instruction::decode_bytes(&[opcode, 0x00, 0x00]) {
            let text = instruction.to_string();
            let name = text.split(' ').next().unwrap_or_default();
            assert_eq!(name, meta.mnemonic, "0x{:02X} prints as {}", opcode, text);
        }
    }
}
