//! ClockManager tests
//!
//! The paced assertions use wide bounds so they hold on a loaded machine.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use libfs8::config::MAX_BATCH_LIMIT;
use libfs8::{ClockConfig, ClockManager, ClockMode, Core, CoreError, Memory, Reg16, Reg8};

fn manager_with(program: &[u8]) -> ClockManager {
    let mut core = Core::new(Memory::new());
    core.load_program(program, 0x0000).unwrap();
    core.set_register16(Reg16::Pc, 0x0000);
    ClockManager::new(core, ClockConfig::default())
}

const SUM_PROGRAM: [u8; 12] = [
    0x10, 50, 0x11, 25, 0x30, 0x01, 0x24, 0x00, 0x20, 0x48, 0x49, 0x01,
];

// JR to self
const SPIN: [u8; 2] = [0x69, 0xFE];

// CALL $0000, five cycles per instruction
const CALL_SELF: [u8; 3] = [0x67, 0x00, 0x00];

fn manager_with_config(program: &[u8], config: ClockConfig) -> ClockManager {
    let mut core = Core::new(Memory::new());
    core.load_program(program, 0x0000).unwrap();
    core.set_register16(Reg16::Pc, 0x0000);
    ClockManager::new(core, config)
}

#[test]
fn test_fast_runs_to_halt() {
    let mut clock = manager_with(&SUM_PROGRAM);
    clock.start(ClockMode::Fast, None).unwrap();
    assert!(clock.wait_for_halt(Duration::from_secs(5)));

    let snapshot = clock.snapshot();
    assert_eq!(snapshot.get(Reg8::A), 74);
    assert_eq!(snapshot.get(Reg8::B), 24);
    assert!(!snapshot.running);
    assert_eq!(clock.instructions(), 7);
    assert!(clock.last_error().is_none());
    assert!(!clock.is_running());
}

#[test]
fn test_short_run_reports_rates() {
    let mut clock = manager_with(&SUM_PROGRAM);
    clock.start(ClockMode::Fast, None).unwrap();
    assert!(clock.wait_for_halt(Duration::from_secs(5)));
    assert!(clock.ips() > 0.0);
    assert!(clock.cps() > 0.0);
}

#[test]
fn test_limited_is_paced() {
    let mut clock = manager_with(&SPIN);
    clock.start(ClockMode::Limited, Some(1_000)).unwrap();
    thread::sleep(Duration::from_millis(200));
    clock.stop();

    let cycles = clock.cycles();
    assert!(cycles > 0);
    assert!(cycles < 2_000, "ran {} cycles at 1 kHz", cycles);
}

#[test]
fn test_limited_counts_whole_instructions() {
    // Each 1-cycle batch runs a 5-cycle CALL; pacing must charge all five
    let mut clock = manager_with(&CALL_SELF);
    clock.start(ClockMode::Limited, Some(150)).unwrap();
    thread::sleep(Duration::from_secs(1));
    clock.stop();

    let cycles = clock.cycles();
    assert!(cycles >= 75, "ran {} cycles at 150 Hz", cycles);
    assert!(cycles < 300, "ran {} cycles at 150 Hz", cycles);
}

#[test]
fn test_realtime_low_frequency() {
    let mut clock = manager_with(&CALL_SELF);
    clock.start(ClockMode::RealTime, Some(150)).unwrap();
    thread::sleep(Duration::from_secs(1));
    clock.stop();

    let cycles = clock.cycles();
    assert!(cycles >= 75, "ran {} cycles at 150 Hz", cycles);
    assert!(cycles < 300, "ran {} cycles at 150 Hz", cycles);
}

#[test]
fn test_realtime_is_paced() {
    let mut clock = manager_with(&SPIN);
    clock.start(ClockMode::RealTime, Some(10_000)).unwrap();
    thread::sleep(Duration::from_millis(200));
    clock.stop();

    let cycles = clock.cycles();
    assert!(cycles > 0);
    assert!(cycles < 20_000, "ran {} cycles at 10 kHz", cycles);
}

#[test]
fn test_fault_is_recorded() {
    let mut clock = manager_with(&[0x00, 0xFD]);
    clock.start(ClockMode::Fast, None).unwrap();
    assert!(clock.wait_for_halt(Duration::from_secs(5)));

    assert!(matches!(
        clock.last_error(),
        Some(CoreError::UnknownInstruction { opcode: 0xFD, .. })
    ));
    assert!(clock.take_error().is_some());
    assert!(clock.last_error().is_none());
}

#[test]
fn test_double_start_rejected() {
    let mut clock = manager_with(&SPIN);
    clock.start(ClockMode::Fast, None).unwrap();
    assert_eq!(
        clock.start(ClockMode::Fast, None),
        Err(CoreError::ClockAlreadyRunning)
    );
    assert_eq!(clock.step(), Err(CoreError::ClockAlreadyRunning));
    clock.stop();
    assert!(!clock.is_running());
}

#[test]
fn test_stop_freezes_counters() {
    let mut clock = manager_with(&SPIN);
    clock.start(ClockMode::Fast, None).unwrap();
    thread::sleep(Duration::from_millis(50));
    clock.stop();

    let instructions = clock.instructions();
    thread::sleep(Duration::from_millis(50));
    assert_eq!(clock.instructions(), instructions);
    assert!(!clock.snapshot().running);
}

#[test]
fn test_rate_is_reported() {
    let mut clock = manager_with(&SPIN);
    clock.start(ClockMode::Fast, None).unwrap();
    thread::sleep(Duration::from_millis(300));
    assert!(clock.ips() > 0.0);
    assert!(clock.cps() >= clock.ips());
    clock.stop();
}

#[test]
fn test_restart_after_stop() {
    let mut clock = manager_with(&SPIN);
    clock.start(ClockMode::Fast, None).unwrap();
    clock.stop();
    clock.start(ClockMode::Limited, Some(1_000)).unwrap();
    assert_eq!(clock.mode(), ClockMode::Limited);
    clock.stop();
}

#[test]
fn test_reset_zeroes_counters() {
    let mut clock = manager_with(&SUM_PROGRAM);
    clock.start(ClockMode::Fast, None).unwrap();
    assert!(clock.wait_for_halt(Duration::from_secs(5)));
    clock.reset();

    assert_eq!(clock.instructions(), 0);
    assert_eq!(clock.cycles(), 0);
    assert_eq!(clock.ips(), 0.0);
    assert_eq!(clock.snapshot().get16(Reg16::Pc), 0x0100);
}

#[test]
fn test_drop_stops_loop() {
    let mut clock = manager_with(&SPIN);
    clock.start(ClockMode::Fast, None).unwrap();
    let core = clock.core();
    drop(clock);
    assert!(!core.lock().unwrap().is_running());
}

#[test]
fn test_wait_for_halt_times_out() {
    let mut clock = manager_with(&SPIN);
    clock.start(ClockMode::Fast, None).unwrap();
    assert!(!clock.wait_for_halt(Duration::from_millis(50)));
    clock.stop();
    assert!(clock.wait_for_halt(Duration::from_millis(50)));
}

#[test]
fn test_with_core_between_batches() {
    let mut clock = manager_with(&SPIN);
    clock.start(ClockMode::Limited, Some(1_000)).unwrap();
    clock.with_core(|core| core.set_register(Reg8::C, 0x42));
    assert_eq!(clock.snapshot().get(Reg8::C), 0x42);
    clock.stop();
}

#[test]
fn test_unbounded_batch_limit_rejected() {
    let config = ClockConfig {
        batch_limit: u64::MAX,
        ..ClockConfig::default()
    };
    let mut clock = manager_with_config(&SPIN, config);
    assert!(matches!(
        clock.start(ClockMode::Fast, None),
        Err(CoreError::InvalidConfig(_))
    ));
    assert!(!clock.is_running());
    assert!(!clock.snapshot().running);
}

#[test]
fn test_stop_returns_with_largest_batch() {
    let config = ClockConfig {
        batch_limit: MAX_BATCH_LIMIT,
        ..ClockConfig::default()
    };
    let mut clock = manager_with_config(&SPIN, config);
    clock.start(ClockMode::Fast, None).unwrap();
    thread::sleep(Duration::from_millis(20));

    let (done, stopped) = mpsc::channel();
    thread::spawn(move || {
        clock.stop();
        let _ = done.send(clock.instructions());
    });
    let instructions = stopped
        .recv_timeout(Duration::from_secs(3))
        .expect("stop did not return");
    assert!(instructions > 0);
}
