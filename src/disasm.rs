/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Disassembler over a window of memory.
//!
//! Decoding goes through the same opcode table as [`Proc8080`](../proc_state/struct.Proc8080.html),
//! so the length reported here is always the number of bytes the processor consumes.

use crate::error::Result;
use crate::opcode;

/// One disassembled instruction.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Disassembly {
    /// Position of the opcode in the window.
    pub offset: usize,
    pub text: String,
    pub length: u8,
}

/// Disassembles the instruction at `offset` in `window`.
///
/// Never touches processor state. Fails with `Truncated` if the operand bytes run past
/// the end of the window.
pub fn disassemble_at(window: &[u8], offset: usize) -> Result<Disassembly> {
    let instruction = opcode::decode_at(window, offset)?;
    Ok(Disassembly {
        offset,
        text: instruction.to_string(),
        length: instruction.length(),
    })
}

/// Iterator disassembling a whole window, instruction after instruction.
///
/// A truncated instruction at the end of the window is yielded once as an error, then the
/// iteration stops.
pub struct Listing<'a> {
    window: &'a [u8],
    offset: usize,
    done: bool,
}

impl<'a> Listing<'a> {

    pub fn new(window: &'a [u8]) -> Listing<'a> {
        Listing::starting_at(window, 0)
    }

    pub fn starting_at(window: &'a [u8], offset: usize) -> Listing<'a> {
        Listing { window, offset, done: false }
    }
}

impl<'a> Iterator for Listing<'a> {
    type Item = Result<Disassembly>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.offset >= self.window.len() {
            return None;
        }

        match disassemble_at(self.window, self.offset) {
            Ok(line) => {
                self.offset += line.length as usize;
                Some(Ok(line))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
