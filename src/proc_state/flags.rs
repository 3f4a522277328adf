/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::alu;
use crate::opcode::Condition;

const SIGN: u8 = 1 << 7;
const ZERO: u8 = 1 << 6;
const AUX_CARRY: u8 = 1 << 4;
const PARITY: u8 = 1 << 2;
const ALWAYS_SET: u8 = 1 << 1;
const CARRY: u8 = 1;

/// The five condition flags of the 8080.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy)]
pub struct Flags {
    pub carry: bool,
    pub zero: bool,
    pub sign: bool,
    pub parity: bool,
    pub aux_carry: bool,
}

impl Flags {

    /// Zero, sign and parity of `result`; carry and aux carry cleared.
    pub fn for_result(result: u8) -> Flags {
        Flags {
            carry: false,
            zero: result == 0,
            sign: result & 0x80 != 0,
            parity: alu::parity(result),
            aux_carry: false,
        }
    }

    /// Unpacks a program status word. Bits 1, 3 and 5 are ignored.
    pub fn from_processor_status_word(psw: u8) -> Flags {
        Flags {
            carry: psw & CARRY != 0,
            zero: psw & ZERO != 0,
            sign: psw & SIGN != 0,
            parity: psw & PARITY != 0,
            aux_carry: psw & AUX_CARRY != 0,
        }
    }

    /// Packs the flags as `S Z 0 AC 0 P 1 C`.
    pub fn to_processor_status_word(&self) -> u8 {
        let mut psw = ALWAYS_SET;
        if self.carry { psw |= CARRY; }
        if self.parity { psw |= PARITY; }
        if self.aux_carry { psw |= AUX_CARRY; }
        if self.zero { psw |= ZERO; }
        if self.sign { psw |= SIGN; }
        psw
    }

    /// Whether a conditional jump, call or return on `condition` is taken.
    pub fn satisfies(&self, condition: Condition) -> bool {
        match condition {
            Condition::NotZero => !self.zero,
            Condition::Zero => self.zero,
            Condition::NoCarry => !self.carry,
            Condition::Carry => self.carry,
            Condition::ParityOdd => !self.parity,
            Condition::ParityEven => self.parity,
            Condition::Plus => !self.sign,
            Condition::Minus => self.sign,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Flags;

    #[test]
    fn flags_for_zero() {
        let flags = Flags::for_result(0);
        assert_eq!(flags, Flags { zero: true, parity: true, ..Default::default() });
    }

    #[test]
    fn flags_for_negative_odd_result() {
        let flags = Flags::for_result(0x83);
        assert!(flags.sign);
        assert!(!flags.zero);
        assert!(!flags.parity);
    }

    #[test]
    fn empty_psw_keeps_fixed_bit() {
        assert_eq!(Flags::default().to_processor_status_word(), 0b0000_0010);
    }

    #[test]
    fn psw_layout() {
        let flags = Flags { carry: true, sign: true, aux_carry: true, ..Default::default() };
        assert_eq!(flags.to_processor_status_word(), 0b1001_0011);

        let flags = Flags { zero: true, parity: true, ..Default::default() };
        assert_eq!(flags.to_processor_status_word(), 0b0100_0110);
    }

    #[test]
    fn psw_round_trip_ignores_fixed_bits() {
        assert_eq!(Flags::from_processor_status_word(0xff).to_processor_status_word(), 0b1101_0111);
        assert_eq!(Flags::from_processor_status_word(0b0010_1000), Flags::default());
    }
}
