/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::config::DEFAULT_STACK_POINTER;
use crate::opcode::{Register, Reg16};

/// The register file. Pairs are not stored: `BC`, `DE` and `HL` are always computed
/// from their halves, so both views stay consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
}

impl Registers {

    pub fn get(&self, reg: Register) -> u8 {
        match reg {
            Register::A => self.a,
            Register::B => self.b,
            Register::C => self.c,
            Register::D => self.d,
            Register::E => self.e,
            Register::H => self.h,
            Register::L => self.l,
        }
    }

    pub fn set(&mut self, reg: Register, value: u8) {
        match reg {
            Register::A => self.a = value,
            Register::B => self.b = value,
            Register::C => self.c = value,
            Register::D => self.d = value,
            Register::E => self.e = value,
            Register::H => self.h = value,
            Register::L => self.l = value,
        }
    }

    pub fn pair(&self, reg: Reg16) -> u16 {
        match reg {
            Reg16::B => u16::from_be_bytes([self.b, self.c]),
            Reg16::D => u16::from_be_bytes([self.d, self.e]),
            Reg16::H => u16::from_be_bytes([self.h, self.l]),
            Reg16::SP => self.sp,
        }
    }

    pub fn set_pair(&mut self, reg: Reg16, value: u16) {
        let [high, low] = value.to_be_bytes();
        match reg {
            Reg16::B => {
                self.b = high;
                self.c = low;
            }
            Reg16::D => {
                self.d = high;
                self.e = low;
            }
            Reg16::H => {
                self.h = high;
                self.l = low;
            }
            Reg16::SP => self.sp = value,
        }
    }

    /// Address designated by the `M` operand.
    pub fn hl(&self) -> u16 {
        self.pair(Reg16::H)
    }
}

impl Default for Registers {

    fn default() -> Registers {
        Registers {
            a: 0,
            b: 0,
            c: 0,
            d: 0,
            e: 0,
            h: 0,
            l: 0,
            sp: DEFAULT_STACK_POINTER,
            pc: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Registers;
    use crate::opcode::{Register, Reg16};

    #[test]
    fn pair_is_high_then_low() {
        let registers = Registers { b: 0x04, c: 0x03, ..Default::default() };
        assert_eq!(registers.pair(Reg16::B), 0x0403);
    }

    #[test]
    fn setting_a_pair_updates_both_halves() {
        let mut registers = Registers::default();
        registers.set_pair(Reg16::H, 0xf1ff);
        assert_eq!(registers.h, 0xf1);
        assert_eq!(registers.l, 0xff);

        registers.set(Register::L, 0x01);
        assert_eq!(registers.hl(), 0xf101);
    }

    #[test]
    fn stack_pointer_pair() {
        let mut registers = Registers::default();
        registers.set_pair(Reg16::SP, 0x1234);
        assert_eq!(registers.sp, 0x1234);
        assert_eq!(registers.pair(Reg16::SP), 0x1234);
    }
}
