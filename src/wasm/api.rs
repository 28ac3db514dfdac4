//! WASM API for the FS8 emulator.
//!
//! Provides JavaScript-callable interfaces for core control, state inspection
//! and memory access. Execution is always stepped from the JavaScript side;
//! the background clock modes need threads the browser main thread lacks.

use crate::{Core, CoreError, Instruction, Memory, Reg16, Reg8};
use wasm_bindgen::prelude::*;

/// JavaScript-compatible error wrapper
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsError {
    message: String,
}

#[wasm_bindgen]
impl JsError {
    #[wasm_bindgen(constructor)]
    pub fn new(message: &str) -> JsError {
        JsError {
            message: message.to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }
}

impl From<CoreError> for JsError {
    fn from(err: CoreError) -> Self {
        JsError::new(&err.to_string())
    }
}

/// Main emulator interface for JavaScript
#[wasm_bindgen]
pub struct Fs8Emulator {
    core: Core,
}

impl Default for Fs8Emulator {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Fs8Emulator {
    /// Create an emulator with 64 KiB of memory
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Fs8Emulator {
            core: Core::new(Memory::new()),
        }
    }

    /// Copy a program into memory and point PC at it
    pub fn load_program(&mut self, program: &[u8], origin: u16) -> Result<(), JsError> {
        self.core.load_program(program, origin)?;
        self.core.set_register16(Reg16::Pc, origin);
        Ok(())
    }

    pub fn start(&mut self) {
        self.core.start();
    }

    pub fn stop(&mut self) {
        self.core.stop();
    }

    /// Reset registers and flags; memory is kept
    pub fn reset(&mut self) {
        self.core.reset();
    }

    /// Execute a single instruction and return its text, or an empty string
    /// when halted
    pub fn step(&mut self) -> Result<String, JsError> {
        Ok(self
            .core
            .execute_step()?
            .map(|inst| inst.to_string())
            .unwrap_or_default())
    }

    /// Execute up to `cycles` cycles and return actual cycles executed
    pub fn run_for_cycles(&mut self, cycles: u32) -> Result<u32, JsError> {
        Ok(self.core.run_for_cycles(cycles as u64)? as u32)
    }

    /// Register by name ("A".."F")
    pub fn register(&self, name: &str) -> Result<u8, JsError> {
        Ok(self.core.register_by_name(name)?)
    }

    /// 16-bit register by name ("DA", "DB", "IDX", "IDY", "PC", "SP")
    pub fn register16(&self, name: &str) -> Result<u16, JsError> {
        Ok(self.core.register16_by_name(name)?)
    }

    #[wasm_bindgen(getter)]
    pub fn a(&self) -> u8 {
        self.core.get_register(Reg8::A)
    }

    #[wasm_bindgen(getter)]
    pub fn pc(&self) -> u16 {
        self.core.pc()
    }

    #[wasm_bindgen(getter)]
    pub fn sp(&self) -> u16 {
        self.core.sp()
    }

    #[wasm_bindgen(getter)]
    pub fn flags(&self) -> u8 {
        self.core.status().bits()
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.core.is_running()
    }

    #[wasm_bindgen(getter)]
    pub fn cycles(&self) -> f64 {
        // u64 does not cross the JS boundary as a plain number
        self.core.cycles() as f64
    }

    /// Read a byte of memory
    pub fn read_memory(&self, address: u16) -> Result<u8, JsError> {
        Ok(self.core.memory().read_byte(address)?)
    }

    /// Write a byte of memory
    pub fn write_memory(&mut self, address: u16, value: u8) -> Result<(), JsError> {
        Ok(self.core.memory_mut().write_byte(address, value)?)
    }

    /// Copy of the memory-mapped video window
    pub fn video_memory(&self) -> Vec<u8> {
        self.core.memory().video_memory().to_vec()
    }

    /// Disassemble `count` instructions starting at `address`
    pub fn disassemble(&self, address: u16, count: u32) -> Vec<JsValue> {
        let bytes = self.core.memory().as_slice();
        let mut lines = Vec::new();
        let mut offset = address as usize;

        for _ in 0..count {
            let Some(window) = bytes.get(offset..) else {
                break;
            };
            match Instruction::decode_bytes(window) {
                Ok((inst, size)) => {
                    lines.push(JsValue::from(format!("{:04X}  {}", offset, inst)));
                    offset += size;
                }
                Err(_) => {
                    lines.push(JsValue::from(format!("{:04X}  ???", offset)));
                    offset += 1;
                }
            }
        }

        lines
    }
}
