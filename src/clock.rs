//! # Clock Manager
//!
//! Drives a [`Core`] under one of four timing disciplines:
//!
//! - **Stepped**: nothing runs on its own; the caller calls [`ClockManager::step`]
//! - **Fast**: a background thread runs batches of instructions unthrottled
//! - **Limited**: a background thread paces toward `target_hz` in ~10 ms
//!   batches, sleeping off any time left over
//! - **RealTime**: like Limited with ~1 ms batches; long gaps are slept, short
//!   ones are yielded
//!
//! The core is shared as `Arc<Mutex<Core>>`. The loop holds the lock for a
//! batch of whole instructions at a time, so readers going through
//! [`ClockManager::with_core`] or [`ClockManager::snapshot`] only ever see
//! instruction-boundary state. Counters are atomics and can be read from any
//! thread without taking the lock.
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use libfs8::{ClockConfig, ClockManager, ClockMode, Core, Memory, Reg8, Reg16};
//!
//! let mut core = Core::new(Memory::new());
//! // LD A,#7 ; HALT
//! core.load_program(&[0x10, 0x07, 0x01], 0x0000).unwrap();
//! core.set_register16(Reg16::Pc, 0x0000);
//!
//! let mut clock = ClockManager::new(core, ClockConfig::default());
//! clock.start(ClockMode::Fast, None).unwrap();
//! assert!(clock.wait_for_halt(Duration::from_secs(5)));
//! clock.stop();
//!
//! assert_eq!(clock.snapshot().get(Reg8::A), 7);
//! assert_eq!(clock.instructions(), 2);
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{ClockConfig, Core, CoreError, RegisterSnapshot};

/// Longest single sleep, so a stop request is noticed promptly.
const SLEEP_SLICE: Duration = Duration::from_millis(10);

/// RealTime sleeps only when it is this far ahead of schedule.
const SPIN_THRESHOLD: Duration = Duration::from_millis(2);

/// Window over which IPS/CPS are recomputed.
const RATE_WINDOW: Duration = Duration::from_millis(100);

/// Execution pacing discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ClockMode {
    /// Caller-driven, one instruction per [`ClockManager::step`].
    #[default]
    Stepped,
    /// Background loop, no pacing.
    Fast,
    /// Background loop paced with coarse sleeps.
    Limited,
    /// Background loop paced with fine-grained timing.
    RealTime,
}

impl ClockMode {
    /// Whether this mode paces toward a target frequency.
    pub fn is_paced(self) -> bool {
        matches!(self, ClockMode::Limited | ClockMode::RealTime)
    }

    /// Batches per second for paced modes.
    fn batches_per_second(self) -> u64 {
        match self {
            ClockMode::RealTime => 1000,
            _ => 100,
        }
    }
}

#[derive(Default)]
struct ClockShared {
    stop_requested: AtomicBool,
    instructions: AtomicU64,
    cycles: AtomicU64,
    ips: AtomicU64,
    cps: AtomicU64,
    error: Mutex<Option<CoreError>>,
    /// True while a background loop is live.
    active: Mutex<bool>,
    exited: Condvar,
}

impl ClockShared {
    fn add_progress(&self, instructions: u64, cycles: u64) {
        self.instructions.fetch_add(instructions, Ordering::Relaxed);
        self.cycles.fetch_add(cycles, Ordering::Relaxed);
    }

    fn publish_rates(&self, ips: f64, cps: f64) {
        self.ips.store(ips.to_bits(), Ordering::Relaxed);
        self.cps.store(cps.to_bits(), Ordering::Relaxed);
    }

    fn is_active(&self) -> bool {
        *lock(&self.active)
    }

    fn set_active(&self, active: bool) {
        *lock(&self.active) = active;
        if !active {
            self.exited.notify_all();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs a core under a [`ClockMode`] and reports throughput.
pub struct ClockManager {
    core: Arc<Mutex<Core>>,
    shared: Arc<ClockShared>,
    config: ClockConfig,
    mode: ClockMode,
    worker: Option<JoinHandle<()>>,
}

impl ClockManager {
    /// Takes ownership of `core`. Nothing runs until [`start`](Self::start).
    pub fn new(core: Core, config: ClockConfig) -> Self {
        Self {
            core: Arc::new(Mutex::new(core)),
            shared: Arc::new(ClockShared::default()),
            mode: config.mode,
            config,
            worker: None,
        }
    }

    /// Shared handle to the core.
    pub fn core(&self) -> Arc<Mutex<Core>> {
        Arc::clone(&self.core)
    }

    /// Runs `f` with the core locked, between instructions.
    pub fn with_core<R>(&self, f: impl FnOnce(&mut Core) -> R) -> R {
        let mut core = lock(&self.core);
        f(&mut core)
    }

    /// Returns a snapshot of the core taken between batches.
    pub fn snapshot(&self) -> RegisterSnapshot {
        lock(&self.core).snapshot()
    }

    /// Returns the mode of the current or most recent run.
    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    /// Returns the clock settings.
    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    /// Starts the core under `mode`.
    ///
    /// Paced modes use `target_hz`, or the configured default when it is
    /// `None`. Stepped mode only marks the core as running.
    pub fn start(&mut self, mode: ClockMode, target_hz: Option<u32>) -> Result<(), CoreError> {
        if self.shared.is_active() {
            return Err(CoreError::ClockAlreadyRunning);
        }
        self.join_worker();
        self.config.validate()?;

        let hz = target_hz.unwrap_or(self.config.target_hz);
        if mode.is_paced() && hz == 0 {
            return Err(CoreError::MissingTargetFrequency(mode));
        }

        self.mode = mode;
        lock(&self.core).start();
        debug!(?mode, hz, "clock start");

        if mode == ClockMode::Stepped {
            return Ok(());
        }

        self.shared.stop_requested.store(false, Ordering::SeqCst);
        self.shared.set_active(true);

        let core = Arc::clone(&self.core);
        let shared = Arc::clone(&self.shared);
        let batch_limit = self.config.batch_limit;
        self.worker = Some(thread::spawn(move || {
            run_loop(&core, &shared, mode, hz, batch_limit);
            shared.set_active(false);
        }));

        Ok(())
    }

    /// Executes one instruction in Stepped mode.
    ///
    /// Returns `Ok(false)` when the core is halted and nothing ran.
    pub fn step(&mut self) -> Result<bool, CoreError> {
        if self.shared.is_active() {
            return Err(CoreError::ClockAlreadyRunning);
        }

        let mut core = lock(&self.core);
        let cycles_before = core.cycles();
        match core.execute_step() {
            Ok(Some(_)) => {
                self.shared.add_progress(1, core.cycles() - cycles_before);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(err) => {
                *lock(&self.shared.error) = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Stops any background loop and halts the core.
    ///
    /// Returns once the loop thread has exited. Calling it again is a no-op.
    pub fn stop(&mut self) {
        self.shared.stop_requested.store(true, Ordering::SeqCst);
        self.join_worker();
        lock(&self.core).stop();
        debug!(
            instructions = self.instructions(),
            cycles = self.cycles(),
            "clock stop"
        );
    }

    fn join_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("clock loop panicked");
                self.shared.set_active(false);
            }
        }
    }

    /// True while a background loop is executing.
    pub fn is_running(&self) -> bool {
        self.shared.is_active()
    }

    /// Blocks until the background loop exits or `timeout` elapses.
    ///
    /// Returns true if no loop is running when it returns. In Stepped mode
    /// there is no loop, so this reports whether the core is halted.
    pub fn wait_for_halt(&self, timeout: Duration) -> bool {
        if self.worker.is_none() {
            return !lock(&self.core).is_running();
        }

        let active = lock(&self.shared.active);
        let (active, _) = self
            .shared
            .exited
            .wait_timeout_while(active, timeout, |active| *active)
            .unwrap_or_else(PoisonError::into_inner);
        !*active
    }

    /// Instructions executed through this manager.
    pub fn instructions(&self) -> u64 {
        self.shared.instructions.load(Ordering::Relaxed)
    }

    /// Cycles executed through this manager.
    pub fn cycles(&self) -> u64 {
        self.shared.cycles.load(Ordering::Relaxed)
    }

    /// Instructions per second over the last measurement window.
    pub fn ips(&self) -> f64 {
        f64::from_bits(self.shared.ips.load(Ordering::Relaxed))
    }

    /// Cycles per second over the last measurement window.
    pub fn cps(&self) -> f64 {
        f64::from_bits(self.shared.cps.load(Ordering::Relaxed))
    }

    /// The fault that stopped the most recent run, if any.
    pub fn last_error(&self) -> Option<CoreError> {
        lock(&self.shared.error).clone()
    }

    /// Returns and clears the recorded fault.
    pub fn take_error(&self) -> Option<CoreError> {
        lock(&self.shared.error).take()
    }

    /// Stops, resets the core and zeroes the counters.
    pub fn reset(&mut self) {
        self.stop();
        lock(&self.core).reset();
        self.shared.instructions.store(0, Ordering::Relaxed);
        self.shared.cycles.store(0, Ordering::Relaxed);
        self.shared.publish_rates(0.0, 0.0);
        *lock(&self.shared.error) = None;
    }
}

impl Drop for ClockManager {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Sleeps until `deadline`, in slices, bailing out on a stop request.
fn sleep_until(deadline: Instant, shared: &ClockShared) {
    loop {
        if shared.stop_requested.load(Ordering::Relaxed) {
            return;
        }
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::sleep((deadline - now).min(SLEEP_SLICE));
    }
}

/// Instruction and cycle counts since the rates were last published.
struct RateWindow {
    start: Instant,
    instructions: u64,
    cycles: u64,
}

impl RateWindow {
    fn new(start: Instant) -> Self {
        Self {
            start,
            instructions: 0,
            cycles: 0,
        }
    }

    fn record(&mut self, instructions: u64, cycles: u64) {
        self.instructions += instructions;
        self.cycles += cycles;
    }

    /// Publishes IPS/CPS once `min_span` has passed, then starts a new window.
    fn publish(&mut self, shared: &ClockShared, now: Instant, min_span: Duration) {
        let elapsed = now - self.start;
        if elapsed < min_span || elapsed.is_zero() {
            return;
        }
        let secs = elapsed.as_secs_f64();
        shared.publish_rates(self.instructions as f64 / secs, self.cycles as f64 / secs);
        *self = RateWindow::new(now);
    }
}

fn run_loop(
    core: &Mutex<Core>,
    shared: &ClockShared,
    mode: ClockMode,
    hz: u32,
    batch_limit: u64,
) {
    let (batch_cycles, nominal_period) = if mode.is_paced() {
        let cycles = (hz as u64 / mode.batches_per_second()).max(1);
        (cycles, Some(Duration::from_secs_f64(cycles as f64 / hz as f64)))
    } else {
        (batch_limit, None)
    };

    let started = Instant::now();
    let mut next_batch = started;
    let mut window = RateWindow::new(started);

    loop {
        if shared.stop_requested.load(Ordering::Relaxed) {
            break;
        }

        let (result, instructions, cycles, still_running) = {
            let mut core = lock(core);
            let instructions_before = core.instructions();
            let cycles_before = core.cycles();
            let result = core.run_for_cycles(batch_cycles);
            (
                result,
                core.instructions() - instructions_before,
                core.cycles() - cycles_before,
                core.is_running(),
            )
        };

        shared.add_progress(instructions, cycles);
        window.record(instructions, cycles);
        window.publish(shared, Instant::now(), RATE_WINDOW);

        if let Err(err) = result {
            error!(error = %err, "clock loop stopped on fault");
            *lock(&shared.error) = Some(err);
            break;
        }
        if !still_running {
            break;
        }

        if let Some(period) = nominal_period {
            // A batch finishes its last instruction, so it may run past
            // `batch_cycles`; schedule by what actually ran.
            next_batch += Duration::from_secs_f64(cycles as f64 / hz as f64);
            let now = Instant::now();
            if next_batch > now {
                let ahead = next_batch - now;
                if mode == ClockMode::Limited || ahead > SPIN_THRESHOLD {
                    sleep_until(next_batch, shared);
                } else {
                    while Instant::now() < next_batch {
                        thread::yield_now();
                    }
                }
            } else if now - next_batch > period * 10 {
                // Too far behind to catch up; resync instead of bursting
                next_batch = now;
            }
        }
    }

    if window.instructions > 0 {
        window.publish(shared, Instant::now(), Duration::ZERO);
    }

    info!(
        instructions = shared.instructions.load(Ordering::Relaxed),
        cycles = shared.cycles.load(Ordering::Relaxed),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "clock loop exited"
    );
}
