//! WebAssembly bindings for the FS8 emulator.
//!
//! This module provides a JavaScript-callable handle around a stepped
//! [`crate::Core`], so a browser frontend can load a program, run it and poll
//! registers and the video window.

#[cfg(feature = "wasm")]
pub mod api;

#[cfg(feature = "wasm")]
pub use api::Fs8Emulator;
