//! # Core State and Execution
//!
//! The [`Core`] owns the register file, the status register and the memory it
//! was built with, and runs the fetch-decode-execute loop.
//!
//! ## Execution Model
//!
//! - `execute_step()`: run one instruction, returning what was executed
//! - `execute_cycle()`: the same, for loops that only care about success
//! - `run_for_cycles()`: run until a cycle budget is used up or the core halts
//! - `run_until_halt()`: run until HALT or an instruction limit
//!
//! A core is either **Halted** (after construction, `reset`, `stop`, a HALT
//! instruction or a fault) or **Running** (after `start`). Stepping a halted
//! core does nothing.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::instruction::OperandFetch;
use crate::{
    instructions, CoreError, Instruction, MachineConfig, Memory, Reg16, Reg8, Registers,
    StatusRegister, Width, OPCODE_TABLE,
};

/// Handler for the `SYS n` instruction.
///
/// Receives the call number along with the registers and memory, so it can
/// read arguments and leave results without borrowing the whole core.
pub type SyscallHandler =
    Box<dyn FnMut(u8, &mut Registers, &mut Memory) -> Result<(), CoreError> + Send>;

/// Consistent copy of the architectural state at an instruction boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterSnapshot {
    pub registers: Registers,
    pub flags: u8,
    pub running: bool,
    pub cycles: u64,
    pub instructions: u64,
}

impl RegisterSnapshot {
    /// Returns a byte register value.
    pub fn get(&self, reg: Reg8) -> u8 {
        self.registers.get8(reg)
    }

    /// Returns a word register value.
    pub fn get16(&self, reg: Reg16) -> u16 {
        self.registers.get16(reg)
    }

    /// Returns the unpacked flags.
    pub fn status(&self) -> StatusRegister {
        StatusRegister::from_bits(self.flags)
    }
}

/// FS8 processor core.
///
/// # Examples
///
/// ```
/// use libfs8::{Core, Memory, Reg16};
///
/// let core = Core::new(Memory::new());
///
/// assert_eq!(core.pc(), 0x0100); // boot address
/// assert_eq!(core.sp(), 0xFFFF); // top of memory
/// assert!(!core.is_running());
/// assert_eq!(core.get_register16(Reg16::Da), 0);
/// ```
pub struct Core {
    pub(crate) registers: Registers,
    pub(crate) status: StatusRegister,
    pub(crate) memory: Memory,
    pub(crate) running: bool,
    pub(crate) cycles: u64,
    pub(crate) instructions: u64,
    pub(crate) syscall: Option<SyscallHandler>,
    boot_address: u16,
    stack_top: u16,
}

impl Core {
    /// Creates a halted core bound to `memory`, with PC at the default boot
    /// address and SP at the last byte of memory.
    pub fn new(memory: Memory) -> Self {
        let boot_address = MachineConfig::default().boot_address;
        let stack_top = (memory.size() - 1) as u16;
        Self {
            registers: Registers::new(boot_address, stack_top),
            status: StatusRegister::new(),
            memory,
            running: false,
            cycles: 0,
            instructions: 0,
            syscall: None,
            boot_address,
            stack_top,
        }
    }

    /// Creates a core with fresh memory laid out by `config`.
    pub fn with_config(config: &MachineConfig) -> Result<Self, CoreError> {
        let memory = Memory::with_config(config)?;
        let mut core = Core::new(memory);
        core.boot_address = config.boot_address;
        core.stack_top = config.stack_top();
        core.reset();
        Ok(core)
    }

    /// Zeroes every register and flag, puts PC at the boot address and SP at
    /// the top of memory, and halts. Memory and counters are untouched.
    pub fn reset(&mut self) {
        self.registers = Registers::new(self.boot_address, self.stack_top);
        self.status.clear();
        self.running = false;
        debug!(boot = self.boot_address, sp = self.stack_top, "core reset");
    }

    /// Halted -> Running.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Running -> Halted.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Returns true while the core is Running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Address loaded into PC on reset.
    pub fn boot_address(&self) -> u16 {
        self.boot_address
    }

    /// Installs the handler called by `SYS n`. Without one, SYS does nothing.
    pub fn set_syscall_handler(&mut self, handler: SyscallHandler) {
        self.syscall = Some(handler);
    }

    // ========== Register Access ==========

    /// Returns a byte register value.
    pub fn get_register(&self, reg: Reg8) -> u8 {
        self.registers.get8(reg)
    }

    /// Writes a byte register. Like a hardware load, this updates Zero.
    pub fn set_register(&mut self, reg: Reg8, value: u8) {
        self.registers.set8(reg, value);
        self.status.update_zero(value as u32, Width::Byte);
    }

    /// Returns a word register value.
    pub fn get_register16(&self, reg: Reg16) -> u16 {
        self.registers.get16(reg)
    }

    /// Writes a word register. DA, DB, IDX and IDY update Zero; PC and SP
    /// leave the flags alone.
    pub fn set_register16(&mut self, reg: Reg16, value: u16) {
        self.registers.set16(reg, value);
        if reg.is_data() {
            self.status.update_zero(value as u32, Width::Word);
        }
    }

    /// Reads a byte register by name (`"A"` .. `"F"`).
    pub fn register_by_name(&self, name: &str) -> Result<u8, CoreError> {
        Ok(self.get_register(name.parse()?))
    }

    /// Writes a byte register by name.
    pub fn set_register_by_name(&mut self, name: &str, value: u8) -> Result<(), CoreError> {
        self.set_register(name.parse()?, value);
        Ok(())
    }

    /// Reads a word register by name (`"DA"`, `"DB"`, `"IDX"`, `"IDY"`, `"PC"`, `"SP"`).
    pub fn register16_by_name(&self, name: &str) -> Result<u16, CoreError> {
        Ok(self.get_register16(name.parse()?))
    }

    /// Writes a word register by name.
    pub fn set_register16_by_name(&mut self, name: &str, value: u16) -> Result<(), CoreError> {
        self.set_register16(name.parse()?, value);
        Ok(())
    }

    /// Returns the program counter value.
    pub fn pc(&self) -> u16 {
        self.registers.pc()
    }

    /// Returns the stack pointer value.
    pub fn sp(&self) -> u16 {
        self.registers.sp()
    }

    /// Returns the raw register file.
    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// Returns the status register.
    pub fn status(&self) -> StatusRegister {
        self.status
    }

    /// Replaces the status register.
    pub fn set_status(&mut self, status: StatusRegister) {
        self.status = status;
    }

    /// Returns the memory bound to this core.
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Returns the memory bound to this core for writing.
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Copies `program` into memory at `origin`.
    pub fn load_program(&mut self, program: &[u8], origin: u16) -> Result<(), CoreError> {
        self.memory.load_program(program, origin)
    }

    /// Total cycles charged since construction.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Total instructions executed since construction.
    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    /// Returns a copy of the registers, flags and counters.
    ///
    /// # Examples
    ///
    /// ```
    /// use libfs8::{Core, Memory, Reg16, Reg8};
    ///
    /// let mut core = Core::new(Memory::new());
    /// core.set_register(Reg8::C, 0);
    /// let snapshot = core.snapshot();
    ///
    /// assert_eq!(snapshot.get(Reg8::C), 0);
    /// assert_eq!(snapshot.get16(Reg16::Pc), core.pc());
    /// assert!(snapshot.status().zero());
    /// assert!(!snapshot.running);
    /// ```
    pub fn snapshot(&self) -> RegisterSnapshot {
        RegisterSnapshot {
            registers: self.registers,
            flags: self.status.bits(),
            running: self.running,
            cycles: self.cycles,
            instructions: self.instructions,
        }
    }

    // ========== Stack ==========

    pub(crate) fn push8(&mut self, value: u8) -> Result<(), CoreError> {
        let sp = self.registers.sp();
        self.memory.write_byte(sp, value)?;
        self.registers.set_sp(sp.wrapping_sub(1));
        Ok(())
    }

    pub(crate) fn pop8(&mut self) -> Result<u8, CoreError> {
        let sp = self.registers.sp().wrapping_add(1);
        let value = self.memory.read_byte(sp)?;
        self.registers.set_sp(sp);
        Ok(value)
    }

    pub(crate) fn push16(&mut self, value: u16) -> Result<(), CoreError> {
        let sp = self.registers.sp();
        self.memory.write_word(sp.wrapping_sub(1), value)?;
        self.registers.set_sp(sp.wrapping_sub(2));
        Ok(())
    }

    pub(crate) fn pop16(&mut self) -> Result<u16, CoreError> {
        let sp = self.registers.sp().wrapping_add(2);
        let value = self.memory.read_word(sp.wrapping_sub(1))?;
        self.registers.set_sp(sp);
        Ok(value)
    }

    // ========== Execution ==========

    /// Executes one instruction.
    ///
    /// Returns `Ok(None)` without touching any state when the core is halted.
    /// Any fault halts the core before the error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use libfs8::{Core, CoreError, Memory, Reg16};
    ///
    /// let mut core = Core::new(Memory::new());
    /// core.load_program(&[0xFD], 0x0000).unwrap();
    /// core.set_register16(Reg16::Pc, 0x0000);
    /// core.start();
    ///
    /// match core.execute_step() {
    ///     Err(CoreError::UnknownInstruction { opcode, .. }) => assert_eq!(opcode, 0xFD),
    ///     other => panic!("expected UnknownInstruction, got {:?}", other),
    /// }
    /// assert!(!core.is_running());
    /// ```
    pub fn execute_step(&mut self) -> Result<Option<Instruction>, CoreError> {
        if !self.running {
            return Ok(None);
        }

        match self.fetch_and_execute() {
            Ok(instruction) => Ok(Some(instruction)),
            Err(err) => {
                self.running = false;
                warn!(pc = self.registers.pc(), error = %err, "core halted on fault");
                Err(err)
            }
        }
    }

    /// Executes one instruction if running; a no-op when halted.
    pub fn execute_cycle(&mut self) -> Result<(), CoreError> {
        self.execute_step().map(|_| ())
    }

    fn fetch_and_execute(&mut self) -> Result<Instruction, CoreError> {
        let address = self.registers.pc();
        let opcode = self.memory.read_byte(address)?;
        let metadata = &OPCODE_TABLE[opcode as usize];
        if !metadata.defined {
            return Err(CoreError::UnknownInstruction { opcode, address });
        }

        self.registers.set_pc(address.wrapping_add(1));
        let instruction = Instruction::decode(opcode, address, self)?;
        trace!(pc = address, %instruction, "execute");

        instructions::execute(self, instruction)?;

        self.cycles += metadata.base_cycles as u64;
        self.instructions += 1;
        Ok(instruction)
    }

    /// Runs until at least `cycle_budget` cycles were charged or the core
    /// halts. Returns the cycles actually consumed.
    pub fn run_for_cycles(&mut self, cycle_budget: u64) -> Result<u64, CoreError> {
        let start_cycles = self.cycles;
        let target_cycles = start_cycles + cycle_budget;

        while self.running && self.cycles < target_cycles {
            self.execute_cycle()?;
        }

        Ok(self.cycles - start_cycles)
    }

    /// Runs until HALT or until `max_instructions` have executed. Returns the
    /// number of instructions executed.
    pub fn run_until_halt(&mut self, max_instructions: u64) -> Result<u64, CoreError> {
        let start = self.instructions;
        while self.running && self.instructions - start < max_instructions {
            self.execute_cycle()?;
        }
        Ok(self.instructions - start)
    }
}

impl OperandFetch for Core {
    fn fetch_byte(&mut self) -> Result<u8, CoreError> {
        let pc = self.registers.pc();
        let byte = self.memory.read_byte(pc)?;
        self.registers.set_pc(pc.wrapping_add(1));
        Ok(byte)
    }
}

impl fmt::Debug for Core {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Core")
            .field("registers", &self.registers)
            .field("status", &self.status)
            .field("running", &self.running)
            .field("cycles", &self.cycles)
            .field("instructions", &self.instructions)
            .field("memory_size", &self.memory.size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core_at_zero(program: &[u8]) -> Core {
        let mut core = Core::new(Memory::new());
        core.load_program(program, 0).unwrap();
        core.set_register16(Reg16::Pc, 0);
        core.start();
        core
    }

    #[test]
    fn test_core_initialization() {
        let core = Core::new(Memory::new());
        assert_eq!(core.pc(), 0x0100);
        assert_eq!(core.sp(), 0xFFFF);
        assert!(!core.is_running());
        for reg in Reg8::ALL {
            assert_eq!(core.get_register(reg), 0);
        }
        assert_eq!(core.status().bits(), 0);
        assert_eq!(core.cycles(), 0);
    }

    #[test]
    fn test_reset_restores_boot_state() {
        let mut core = core_at_zero(&[0x10, 0x05]);
        core.execute_step().unwrap();
        core.set_register16(Reg16::Idx, 0x1234);
        core.reset();
        assert_eq!(core.pc(), 0x0100);
        assert_eq!(core.sp(), 0xFFFF);
        assert_eq!(core.get_register(Reg8::A), 0);
        assert_eq!(core.get_register16(Reg16::Idx), 0);
        assert!(!core.is_running());
        // Memory survives a reset
        assert_eq!(core.memory().read_byte(0x0001).unwrap(), 0x05);
    }

    #[test]
    fn test_with_config_small_machine() {
        let config = MachineConfig {
            memory_size: 0x1000,
            video_base: 0x0C00,
            video_len: 0x0400,
            boot_address: 0x0000,
        };
        let core = Core::with_config(&config).unwrap();
        assert_eq!(core.pc(), 0x0000);
        assert_eq!(core.sp(), 0x0FFF);
        assert_eq!(core.memory().size(), 0x1000);
    }

    #[test]
    fn test_set_register_updates_zero() {
        let mut core = Core::new(Memory::new());
        core.set_register(Reg8::C, 0);
        assert!(core.status().zero());
        core.set_register(Reg8::C, 1);
        assert!(!core.status().zero());

        core.set_register16(Reg16::Db, 0x0100);
        assert!(!core.status().zero());
        core.set_register16(Reg16::Db, 0);
        assert!(core.status().zero());
        core.set_register16(Reg16::Pc, 0x0200);
        assert!(core.status().zero());
    }

    #[test]
    fn test_register_by_name() {
        let mut core = Core::new(Memory::new());
        core.set_register_by_name("B", 0x42).unwrap();
        assert_eq!(core.register_by_name("b").unwrap(), 0x42);
        core.set_register16_by_name("IDY", 0x8000).unwrap();
        assert_eq!(core.register16_by_name("IDY").unwrap(), 0x8000);

        assert_eq!(
            core.register_by_name("Q"),
            Err(CoreError::InvalidRegister("Q".to_string()))
        );
        assert!(core.set_register16_by_name("IDZ", 1).is_err());
    }

    #[test]
    fn test_halted_core_does_nothing() {
        let mut core = Core::new(Memory::new());
        let before = core.snapshot();
        assert_eq!(core.execute_step(), Ok(None));
        assert_eq!(core.snapshot(), before);
    }

    #[test]
    fn test_unknown_instruction_leaves_pc() {
        let mut core = core_at_zero(&[0x00, 0xFD]);
        core.execute_step().unwrap();
        let err = core.execute_step().unwrap_err();
        assert_eq!(
            err,
            CoreError::UnknownInstruction {
                opcode: 0xFD,
                address: 0x0001
            }
        );
        assert_eq!(err.to_string(), "unknown instruction 0xFD at 0x0001");
        assert_eq!(core.pc(), 0x0001);
        assert!(!core.is_running());
    }

    #[test]
    fn test_stack_helpers() {
        let mut core = Core::new(Memory::new());
        core.push8(0xAB).unwrap();
        assert_eq!(core.sp(), 0xFFFE);
        core.push16(0x1234).unwrap();
        assert_eq!(core.sp(), 0xFFFC);
        assert_eq!(core.memory().read_word(0xFFFD).unwrap(), 0x1234);
        assert_eq!(core.pop16().unwrap(), 0x1234);
        assert_eq!(core.pop8().unwrap(), 0xAB);
        assert_eq!(core.sp(), 0xFFFF);
    }

    #[test]
    fn test_run_for_cycles_stops_on_halt() {
        let mut core = core_at_zero(&[0x00, 0x00, 0x01]);
        let consumed = core.run_for_cycles(1000).unwrap();
        assert_eq!(consumed, 3);
        assert!(!core.is_running());
    }

    #[test]
    fn test_run_until_halt_limit() {
        // JR -2: loops forever on itself
        let mut core = core_at_zero(&[0x69, 0xFE]);
        assert_eq!(core.run_until_halt(50).unwrap(), 50);
        assert!(core.is_running());
        assert_eq!(core.pc(), 0x0000);
    }
}
