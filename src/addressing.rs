//! # Indexed Addressing
//!
//! The FS8 has two index pointers, IDX and IDY. Indexed loads and stores go
//! through one of them in one of four modes:
//!
//! - **Direct**: `(IDX)` - access the pointer value
//! - **Displacement**: `(IDX+d)` - pointer plus a signed 8-bit displacement;
//!   the pointer is unchanged
//! - **PostIncrement**: `(IDX)+` - access the pointer value, then add one
//! - **PostDecrement**: `(IDX)-` - access the pointer value, then subtract one
//!
//! All pointer arithmetic wraps at 16 bits.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Reg16;

/// One of the two index pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexPointer {
    Idx,
    Idy,
}

impl IndexPointer {
    /// The 16-bit register backing this pointer.
    pub fn register(self) -> Reg16 {
        match self {
            IndexPointer::Idx => Reg16::Idx,
            IndexPointer::Idy => Reg16::Idy,
        }
    }

    /// The other pointer.
    pub fn other(self) -> IndexPointer {
        match self {
            IndexPointer::Idx => IndexPointer::Idy,
            IndexPointer::Idy => IndexPointer::Idx,
        }
    }
}

impl fmt::Display for IndexPointer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.register().name())
    }
}

/// How an indexed access uses its pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexMode {
    Direct,
    Displacement(i8),
    PostIncrement,
    PostDecrement,
}

impl IndexMode {
    /// Address accessed for a pointer value.
    ///
    /// # Examples
    ///
    /// ```
    /// use libfs8::IndexMode;
    ///
    /// assert_eq!(IndexMode::Displacement(-2).effective_address(0x2000), 0x1FFE);
    /// assert_eq!(IndexMode::PostIncrement.effective_address(0x2000), 0x2000);
    /// ```
    pub fn effective_address(self, pointer: u16) -> u16 {
        match self {
            IndexMode::Displacement(offset) => pointer.wrapping_add_signed(offset as i16),
            IndexMode::Direct | IndexMode::PostIncrement | IndexMode::PostDecrement => pointer,
        }
    }

    /// Pointer value after the access.
    pub fn next_pointer(self, pointer: u16) -> u16 {
        match self {
            IndexMode::PostIncrement => pointer.wrapping_add(1),
            IndexMode::PostDecrement => pointer.wrapping_sub(1),
            IndexMode::Direct | IndexMode::Displacement(_) => pointer,
        }
    }

    /// Assembler-style operand text, e.g. `(IDX+4)`.
    pub fn format(self, pointer: IndexPointer) -> String {
        match self {
            IndexMode::Direct => format!("({})", pointer),
            IndexMode::Displacement(offset) if offset < 0 => {
                format!("({}-{})", pointer, -(offset as i16))
            }
            IndexMode::Displacement(offset) => format!("({}+{})", pointer, offset),
            IndexMode::PostIncrement => format!("({})+", pointer),
            IndexMode::PostDecrement => format!("({})-", pointer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_displacement_wraps() {
        assert_eq!(IndexMode::Displacement(1).effective_address(0xFFFF), 0x0000);
        assert_eq!(IndexMode::Displacement(-128).effective_address(0x0000), 0xFF80);
        assert_eq!(IndexMode::Displacement(127).effective_address(0x1000), 0x107F);
    }

    #[test]
    fn test_post_modes_adjust_after_access() {
        assert_eq!(IndexMode::PostIncrement.next_pointer(0xFFFF), 0x0000);
        assert_eq!(IndexMode::PostDecrement.next_pointer(0x0000), 0xFFFF);
        assert_eq!(IndexMode::Displacement(5).next_pointer(0x1234), 0x1234);
    }

    #[test]
    fn test_format() {
        assert_eq!(IndexMode::Direct.format(IndexPointer::Idx), "(IDX)");
        assert_eq!(IndexMode::Displacement(-3).format(IndexPointer::Idy), "(IDY-3)");
        assert_eq!(IndexMode::Displacement(-128).format(IndexPointer::Idy), "(IDY-128)");
        assert_eq!(IndexMode::PostIncrement.format(IndexPointer::Idx), "(IDX)+");
        assert_eq!(IndexMode::PostDecrement.format(IndexPointer::Idy), "(IDY)-");
    }

    #[test]
    fn test_pointer_registers() {
        assert_eq!(IndexPointer::Idx.register(), Reg16::Idx);
        assert_eq!(IndexPointer::Idy.other(), IndexPointer::Idx);
    }
}
