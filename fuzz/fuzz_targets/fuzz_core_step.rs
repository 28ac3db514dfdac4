//! Fuzz target for core execution.
//!
//! Builds an arbitrary register file and a program window, then runs a few
//! instructions. Faults are fine; panics are not.

#![no_main]

use arbitrary::Arbitrary;
use libfs8::{Core, Memory, Reg16, Reg8, StatusRegister};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzCoreState {
    bytes: [u8; 6],
    idx: u16,
    idy: u16,
    sp: u16,
    flags: u8,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    state: FuzzCoreState,
    /// Placed at PC
    program: [u8; 32],
    /// Placed where IDX points
    data: [u8; 64],
    steps: u8,
}

fuzz_target!(|input: FuzzInput| {
    let mut core = Core::new(Memory::new());
    let _ = core.load_program(&input.program, 0x0100);
    let _ = core.load_program(&input.data, input.state.idx);

    for (reg, value) in Reg8::ALL.iter().zip(input.state.bytes) {
        core.set_register(*reg, value);
    }
    core.set_register16(Reg16::Idx, input.state.idx);
    core.set_register16(Reg16::Idy, input.state.idy);
    core.set_register16(Reg16::Sp, input.state.sp);
    core.set_status(StatusRegister::from_bits(input.state.flags));
    core.start();

    for _ in 0..input.steps.min(64) {
        let instructions = core.instructions();
        match core.execute_step() {
            Ok(Some(_)) => assert_eq!(core.instructions(), instructions + 1),
            Ok(None) => break,
            Err(_) => {
                assert!(!core.is_running());
                break;
            }
        }
    }

    assert!(core.status().bits() <= 0x0F);
});
