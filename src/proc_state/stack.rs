/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::error::Result;
use crate::opcode::Reg16;
use super::{DataBus, Flags, Proc8080};

// The stack grows downwards: a push writes the low byte at SP - 2 and the high byte at
// SP - 1, a pop reads them back from SP and SP + 1.
impl<Bus: DataBus> Proc8080<Bus> {

    /// `SP` wraps like any 16-bit register; only a word straddling 0xffff (`SP` = 1) faults.
    pub(super) fn push_word(&mut self, value: u16) -> Result<()> {
        let top = self.registers.sp.wrapping_sub(2);
        self.memory.write_word(top as usize, value)?;
        self.registers.sp = top;
        Ok(())
    }

    pub(super) fn pop_word(&mut self) -> Result<u16> {
        let sp = self.registers.sp;
        let value = self.memory.read_word(sp as usize)?;
        self.registers.sp = sp.wrapping_add(2);
        Ok(value)
    }

    pub(super) fn push_pair(&mut self, pair: Reg16) -> Result<()> {
        let value = self.registers.pair(pair);
        self.push_word(value)
    }

    pub(super) fn pop_pair(&mut self, pair: Reg16) -> Result<()> {
        let value = self.pop_word()?;
        self.registers.set_pair(pair, value);
        Ok(())
    }

    /// Pushes `A` as the high byte and the packed flags as the low byte.
    pub(super) fn push_processor_status_word(&mut self) -> Result<()> {
        let psw = self.flags.to_processor_status_word();
        self.push_word(u16::from_be_bytes([self.registers.a, psw]))
    }

    pub(super) fn pop_processor_status_word(&mut self) -> Result<()> {
        let [a, psw] = self.pop_word()?.to_be_bytes();
        self.registers.a = a;
        self.flags = Flags::from_processor_status_word(psw);
        Ok(())
    }

    /// `XTHL`: swaps `HL` with the word on top of the stack.
    pub(super) fn exchange_top_with_hl(&mut self) -> Result<()> {
        let sp = self.registers.sp as usize;
        let top = self.memory.read_word(sp)?;
        self.memory.write_word(sp, self.registers.hl())?;
        self.registers.set_pair(Reg16::H, top);
        Ok(())
    }
}
