//! Tests for indexed loads and stores through IDX and IDY.

use libfs8::{Core, CoreError, Memory, Reg16, Reg8, StatusRegister};

fn setup_core(program: &[u8]) -> Core {
    let mut core = Core::new(Memory::new());
    core.load_program(program, 0x0000).unwrap();
    core.set_register16(Reg16::Pc, 0x0000);
    core.start();
    core
}

// ========== Direct ==========

#[test]
fn test_load_direct_idx() {
    // LD B,(IDX)
    let mut core = setup_core(&[0x80, 0x01]);
    core.set_register16(Reg16::Idx, 0x2000);
    core.memory_mut().write_byte(0x2000, 0x77).unwrap();
    core.execute_step().unwrap();
    assert_eq!(core.get_register(Reg8::B), 0x77);
    assert_eq!(core.get_register16(Reg16::Idx), 0x2000);
    assert_eq!(core.pc(), 2);
}

#[test]
fn test_load_sets_zero() {
    let mut core = setup_core(&[0x81, 0x00]);
    core.set_register(Reg8::A, 0x10);
    core.set_register16(Reg16::Idy, 0x3000);
    core.execute_step().unwrap();
    assert_eq!(core.get_register(Reg8::A), 0);
    assert!(core.status().zero());
}

#[test]
fn test_store_direct_idy_leaves_flags() {
    // ST C,(IDY)
    let mut core = setup_core(&[0x83, 0x02]);
    core.set_register(Reg8::C, 0x99);
    core.set_register16(Reg16::Idy, 0x4000);
    core.set_status(StatusRegister::from_bits(0x05));
    core.execute_step().unwrap();
    assert_eq!(core.memory().read_byte(0x4000).unwrap(), 0x99);
    assert_eq!(core.status().bits(), 0x05);
}

// ========== Displacement ==========

#[test]
fn test_load_displacement_negative() {
    // LD C,(IDY-2)
    let mut core = setup_core(&[0x85, 0x02, 0xFE]);
    core.set_register16(Reg16::Idy, 0x3002);
    core.memory_mut().write_byte(0x3000, 0xAB).unwrap();
    core.execute_step().unwrap();
    assert_eq!(core.get_register(Reg8::C), 0xAB);
    assert_eq!(core.get_register16(Reg16::Idy), 0x3002);
    assert_eq!(core.pc(), 3);
}

#[test]
fn test_store_displacement_positive() {
    // ST A,(IDX+5)
    let mut core = setup_core(&[0x86, 0x00, 0x05]);
    core.set_register(Reg8::A, 0x42);
    core.set_register16(Reg16::Idx, 0x2000);
    core.execute_step().unwrap();
    assert_eq!(core.memory().read_byte(0x2005).unwrap(), 0x42);
    assert_eq!(core.get_register16(Reg16::Idx), 0x2000);
}

// ========== Post-increment / post-decrement ==========

#[test]
fn test_load_post_increment() {
    let mut core = setup_core(&[0x88, 0x00]);
    core.set_register16(Reg16::Idx, 0x2000);
    core.memory_mut().write_byte(0x2000, 0x11).unwrap();
    core.execute_step().unwrap();
    assert_eq!(core.get_register(Reg8::A), 0x11);
    assert_eq!(core.get_register16(Reg16::Idx), 0x2001);
}

#[test]
fn test_store_post_decrement() {
    // ST D,(IDY)-
    let mut core = setup_core(&[0x8F, 0x03]);
    core.set_register(Reg8::D, 0x55);
    core.set_register16(Reg16::Idy, 0x2000);
    core.execute_step().unwrap();
    assert_eq!(core.memory().read_byte(0x2000).unwrap(), 0x55);
    assert_eq!(core.get_register16(Reg16::Idy), 0x1FFF);
}

#[test]
fn test_post_increment_wraps() {
    // ST A,(IDX)+ with IDX at the last byte
    let mut core = setup_core(&[0x8A, 0x00]);
    core.set_register16(Reg16::Idx, 0xFFFF);
    core.execute_step().unwrap();
    assert_eq!(core.get_register16(Reg16::Idx), 0x0000);
}

#[test]
fn test_block_copy_loop() {
    let program = [
        0x1E, 0x00, 0x20, // LD IDX,#$2000
        0x1F, 0x00, 0x30, // LD IDY,#$3000
        0x11, 0x03, // LD B,#3
        0x88, 0x00, // loop: LD A,(IDX)+
        0x8B, 0x00, // ST A,(IDY)+
        0x49, // DEC B
        0x6B, 0xF9, // JRNZ loop
        0x01, // HALT
    ];
    let mut core = setup_core(&program);
    core.memory_mut().write_byte(0x2000, 0xDE).unwrap();
    core.memory_mut().write_byte(0x2001, 0xAD).unwrap();
    core.memory_mut().write_byte(0x2002, 0xBE).unwrap();

    core.run_until_halt(1000).unwrap();

    assert_eq!(core.memory().read_byte(0x3000).unwrap(), 0xDE);
    assert_eq!(core.memory().read_byte(0x3001).unwrap(), 0xAD);
    assert_eq!(core.memory().read_byte(0x3002).unwrap(), 0xBE);
    assert_eq!(core.get_register16(Reg16::Idx), 0x2003);
    assert_eq!(core.get_register16(Reg16::Idy), 0x3003);
    assert_eq!(core.get_register(Reg8::B), 0);
}

// ========== Faults ==========

#[test]
fn test_fault_leaves_pointer_unchanged() {
    let config = libfs8::MachineConfig {
        memory_size: 0x1000,
        video_base: 0x0C00,
        video_len: 0x0400,
        boot_address: 0x0000,
    };
    let mut core = Core::with_config(&config).unwrap();
    // LD A,(IDX)+
    core.load_program(&[0x88, 0x00], 0x0000).unwrap();
    core.set_register16(Reg16::Idx, 0x2000);
    core.start();

    assert_eq!(
        core.execute_step(),
        Err(CoreError::AddressOutOfRange {
            address: 0x2000,
            size: 0x1000
        })
    );
    assert_eq!(core.get_register16(Reg16::Idx), 0x2000);
    assert!(!core.is_running());
}

#[test]
fn test_invalid_register_operand() {
    let mut core = setup_core(&[0x80, 0x09]);
    assert!(matches!(
        core.execute_step(),
        Err(CoreError::InvalidRegister(_))
    ));
}
