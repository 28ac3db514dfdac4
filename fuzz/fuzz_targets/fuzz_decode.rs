//! Fuzz target for the instruction decoder.
//!
//! Decoding must either fail cleanly or consume exactly the octet count the
//! opcode table declares, and the result must format without panicking.

#![no_main]

use libfs8::{Instruction, OPCODE_TABLE};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some(&opcode) = data.first() else {
        return;
    };

    if let Ok((instruction, size)) = Instruction::decode_bytes(data) {
        assert!(OPCODE_TABLE[opcode as usize].defined);
        assert_eq!(size, OPCODE_TABLE[opcode as usize].size_bytes as usize);
        let _ = instruction.to_string();
    }
});
