/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Opcode table and instruction decoding, shared by the processor and the disassembler.

mod opcodes;
mod table;

pub use self::opcodes::{Condition, Location, Op, Operand, OperandKind, Reg16, Register};
pub use self::table::{lookup, OpcodeEntry, OPCODES};

use std::fmt;

use crate::error::{Error, Result};

/// Operand bytes following an opcode.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Data {
    None,
    Byte(u8),
    Word(u16),
}

/// A decoded instruction: its table entry plus the operand bytes read from memory.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Instruction {
    entry: &'static OpcodeEntry,
    data: Data,
}

impl Instruction {

    pub fn entry(&self) -> &'static OpcodeEntry {
        self.entry
    }

    pub fn opcode(&self) -> u8 {
        self.entry.code
    }

    pub fn op(&self) -> Op {
        self.entry.op
    }

    pub fn length(&self) -> u8 {
        self.entry.length()
    }

    pub fn data(&self) -> Data {
        self.data
    }

    /// The 8-bit immediate, or 0 when the instruction has none.
    pub fn byte(&self) -> u8 {
        match self.data {
            Data::Byte(value) => value,
            _ => 0,
        }
    }

    /// The 16-bit immediate or address, or 0 when the instruction has none.
    pub fn word(&self) -> u16 {
        match self.data {
            Data::Word(value) => value,
            _ => 0,
        }
    }
}

/// Decodes the instruction starting at `offset` in `memory`.
///
/// Unmapped opcodes decode as a 1 byte instruction. Fails with
/// [`Error::Truncated`](../error/enum.Error.html) when the operand bytes run past
/// the end of `memory`.
pub fn decode_at(memory: &[u8], offset: usize) -> Result<Instruction> {
    let code = *memory.get(offset).ok_or(Error::Truncated { offset, length: 1 })?;
    let entry = lookup(code);
    let length = entry.length();
    let bytes = memory
        .get(offset..offset + length as usize)
        .ok_or(Error::Truncated { offset, length })?;

    let data = match bytes {
        [_, low, high] => Data::Word(u16::from_le_bytes([*low, *high])),
        [_, value] => Data::Byte(*value),
        _ => Data::None,
    };
    Ok(Instruction { entry, data })
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.entry.mapped {
            return write!(f, "DB ${:02x}", self.entry.code);
        }

        write!(f, "{}", self.entry.mnemonic)?;
        for (index, operand) in self.entry.operands().enumerate() {
            f.write_str(if index == 0 { " " } else { "," })?;
            match operand {
                Operand::Loc(loc) => write!(f, "{}", loc)?,
                Operand::Pair(pair) => write!(f, "{}", pair)?,
                Operand::Psw => f.write_str("PSW")?,
                Operand::Byte => write!(f, "${:02x}", self.byte())?,
                Operand::Word => {
                    let [low, high] = self.word().to_le_bytes();
                    write!(f, "${:02x}{:02x}", high, low)?
                }
                Operand::Vector(n) => write!(f, "{}", n)?,
            }
        }
        Ok(())
    }
}
