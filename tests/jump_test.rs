//! Tests for absolute and relative jumps.
//!
//! Relative offsets are measured from the address right after the offset
//! octet.

use libfs8::{Core, Memory, Reg16, Reg8, StatusRegister};

fn setup_core(program: &[u8]) -> Core {
    let mut core = Core::new(Memory::new());
    core.load_program(program, 0x0000).unwrap();
    core.set_register16(Reg16::Pc, 0x0000);
    core.start();
    core
}

fn jump_with_flags(opcode: u8, flags: u8) -> u16 {
    let mut core = setup_core(&[opcode, 0x00, 0x10]);
    core.set_status(StatusRegister::from_bits(flags));
    core.execute_step().unwrap();
    core.pc()
}

// ========== Absolute ==========

#[test]
fn test_jmp() {
    let mut core = setup_core(&[0x60, 0x34, 0x12]);
    core.execute_step().unwrap();
    assert_eq!(core.pc(), 0x1234);
    assert_eq!(core.cycles(), 3);
}

#[test]
fn test_conditional_jumps() {
    const Z: u8 = 0x01;
    const C: u8 = 0x02;
    const N: u8 = 0x08;

    // (opcode, flags that take it, flags that don't)
    let cases = [
        (0x61, Z, 0),
        (0x62, 0, Z),
        (0x63, C, 0),
        (0x64, 0, C),
        (0x65, N, 0),
        (0x66, 0, N),
    ];
    for (opcode, taken, not_taken) in cases {
        assert_eq!(jump_with_flags(opcode, taken), 0x1000, "0x{:02X} taken", opcode);
        assert_eq!(jump_with_flags(opcode, not_taken), 0x0003, "0x{:02X} not taken", opcode);
    }
}

#[test]
fn test_jz_after_load() {
    // LD A,#0 ; JZ $0010
    let mut core = setup_core(&[0x10, 0x00, 0x61, 0x10, 0x00]);
    core.execute_step().unwrap();
    core.execute_step().unwrap();
    assert_eq!(core.pc(), 0x0010);
}

#[test]
fn test_jumps_leave_flags() {
    let mut core = setup_core(&[0x60, 0x00, 0x10]);
    core.set_status(StatusRegister::from_bits(0x0F));
    core.execute_step().unwrap();
    assert_eq!(core.status().bits(), 0x0F);
}

// ========== Relative ==========

#[test]
fn test_jr_forward() {
    let mut core = setup_core(&[0x69, 0x05]);
    core.execute_step().unwrap();
    assert_eq!(core.pc(), 0x0007);
}

#[test]
fn test_jr_backward_to_self() {
    let mut core = setup_core(&[0x69, 0xFE]);
    core.execute_step().unwrap();
    assert_eq!(core.pc(), 0x0000);
}

#[test]
fn test_jr_wraps_below_zero() {
    let mut core = setup_core(&[0x69, 0xFC]);
    core.execute_step().unwrap();
    assert_eq!(core.pc(), 0xFFFE);
}

#[test]
fn test_relative_conditions() {
    for (opcode, flags, expected) in [
        (0x6A, 0x01, 0x0012),
        (0x6A, 0x00, 0x0002),
        (0x6B, 0x00, 0x0012),
        (0x6B, 0x01, 0x0002),
        (0x6C, 0x02, 0x0012),
        (0x6C, 0x00, 0x0002),
    ] {
        let mut core = setup_core(&[opcode, 0x10]);
        core.set_status(StatusRegister::from_bits(flags));
        core.execute_step().unwrap();
        assert_eq!(core.pc(), expected, "0x{:02X} flags {:02X}", opcode, flags);
    }
}

#[test]
fn test_countdown_loop() {
    // LD B,#3 ; loop: DEC B ; JRNZ loop ; HALT
    let mut core = setup_core(&[0x11, 0x03, 0x49, 0x6B, 0xFD, 0x01]);
    let executed = core.run_until_halt(100).unwrap();
    assert_eq!(core.get_register(Reg8::B), 0);
    assert_eq!(executed, 8);
    assert!(!core.is_running());
}
