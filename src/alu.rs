/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Pure 8-bit arithmetic and logic with flag computation.
//!
//! Every function here is total over its inputs and returns the new [`Flags`] rather than
//! mutating processor state, so each flag-affecting instruction can be checked in isolation.

use crate::proc_state::Flags;

/// The eight accumulator operations encoded in bits 3-5 of `0x80..=0xbf` and of the
/// immediate forms `0xc6, 0xce, ... 0xfe`.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbb,
    And,
    Xor,
    Or,
    Cmp,
}

impl AluOp {
    pub const fn from_code(code: u8) -> AluOp {
        match code & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbb,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            _ => AluOp::Cmp,
        }
    }

    /// Mnemonic of the register/memory form.
    pub const fn mnemonic(&self) -> &'static str {
        match self {
            AluOp::Add => "ADD",
            AluOp::Adc => "ADC",
            AluOp::Sub => "SUB",
            AluOp::Sbb => "SBB",
            AluOp::And => "ANA",
            AluOp::Xor => "XRA",
            AluOp::Or => "ORA",
            AluOp::Cmp => "CMP",
        }
    }

    /// Mnemonic of the immediate form.
    pub const fn immediate_mnemonic(&self) -> &'static str {
        match self {
            AluOp::Add => "ADI",
            AluOp::Adc => "ACI",
            AluOp::Sub => "SUI",
            AluOp::Sbb => "SBI",
            AluOp::And => "ANI",
            AluOp::Xor => "XRI",
            AluOp::Or => "ORI",
            AluOp::Cmp => "CPI",
        }
    }
}

/// Result of an accumulator operation. For `CMP`, `result` is the untouched accumulator.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct AluOutput {
    pub result: u8,
    pub flags: Flags,
}

/// Applies `op` to the accumulator `a` and `operand`. `carry` is the incoming carry,
/// only read by `ADC` and `SBB`.
pub fn execute(op: AluOp, a: u8, operand: u8, carry: bool) -> AluOutput {
    match op {
        AluOp::Add => add(a, operand, false),
        AluOp::Adc => add(a, operand, carry),
        AluOp::Sub => sub(a, operand, false),
        AluOp::Sbb => sub(a, operand, carry),
        AluOp::And => and(a, operand),
        AluOp::Xor => logical(a ^ operand),
        AluOp::Or => logical(a | operand),
        AluOp::Cmp => AluOutput { result: a, flags: sub(a, operand, false).flags },
    }
}

pub fn add(a: u8, operand: u8, carry_in: bool) -> AluOutput {
    let carry_in = carry_in as u16;
    let sum = a as u16 + operand as u16 + carry_in;
    let result = sum as u8;
    let mut flags = Flags::for_result(result);
    flags.carry = sum > 0xff;
    flags.aux_carry = (a & 0x0f) as u16 + (operand & 0x0f) as u16 + carry_in > 0x0f;
    AluOutput { result, flags }
}

/// `a - operand - borrow_in`. The borrow is computed on the untruncated operands.
pub fn sub(a: u8, operand: u8, borrow_in: bool) -> AluOutput {
    let subtrahend = operand as u16 + borrow_in as u16;
    let result = (a as u16).wrapping_sub(subtrahend) as u8;
    let mut flags = Flags::for_result(result);
    flags.carry = (a as u16) < subtrahend;
    // bit 3 carry of the two's complement addition a + !operand + !borrow
    flags.aux_carry = (a & 0x0f) + (!operand & 0x0f) + (!borrow_in as u8) > 0x0f;
    AluOutput { result, flags }
}

fn and(a: u8, operand: u8) -> AluOutput {
    let result = a & operand;
    let mut flags = Flags::for_result(result);
    flags.aux_carry = ((a | operand) & 0x08) != 0;
    AluOutput { result, flags }
}

fn logical(result: u8) -> AluOutput {
    AluOutput { result, flags: Flags::for_result(result) }
}

/// `INR`: carry is left as it was.
pub fn increment(value: u8, flags: Flags) -> AluOutput {
    let result = value.wrapping_add(1);
    let mut new_flags = Flags::for_result(result);
    new_flags.carry = flags.carry;
    new_flags.aux_carry = (value & 0x0f) == 0x0f;
    AluOutput { result, flags: new_flags }
}

/// `DCR`: carry is left as it was.
pub fn decrement(value: u8, flags: Flags) -> AluOutput {
    let result = value.wrapping_sub(1);
    let mut new_flags = Flags::for_result(result);
    new_flags.carry = flags.carry;
    new_flags.aux_carry = (value & 0x0f) != 0;
    AluOutput { result, flags: new_flags }
}

/// `DAD`: 16-bit addition, only carry is affected.
pub fn add_16(hl: u16, value: u16, flags: Flags) -> (u16, Flags) {
    let (result, carry) = hl.overflowing_add(value);
    (result, Flags { carry, ..flags })
}

/// `DAA`: turns the accumulator back into two BCD digits after a BCD addition.
pub fn decimal_adjust(a: u8, flags: Flags) -> AluOutput {
    let low = a & 0x0f;
    let mut correction = 0;
    let mut carry = flags.carry;

    if flags.aux_carry || low > 9 {
        correction |= 0x06;
    }
    if flags.carry || a > 0x99 {
        correction |= 0x60;
        carry = true;
    }

    let mut output = add(a, correction, false);
    output.flags.carry = carry;
    output
}

pub fn rotate_left(a: u8, flags: Flags) -> AluOutput {
    AluOutput { result: a.rotate_left(1), flags: Flags { carry: a & 0x80 != 0, ..flags } }
}

pub fn rotate_right(a: u8, flags: Flags) -> AluOutput {
    AluOutput { result: a.rotate_right(1), flags: Flags { carry: a & 0x01 != 0, ..flags } }
}

pub fn rotate_left_through_carry(a: u8, flags: Flags) -> AluOutput {
    let result = (a << 1) | flags.carry as u8;
    AluOutput { result, flags: Flags { carry: a & 0x80 != 0, ..flags } }
}

pub fn rotate_right_through_carry(a: u8, flags: Flags) -> AluOutput {
    let result = (a >> 1) | ((flags.carry as u8) << 7);
    AluOutput { result, flags: Flags { carry: a & 0x01 != 0, ..flags } }
}

/// `true` when `value` has an even number of set bits.
pub fn parity(value: u8) -> bool {
    value.count_ones() % 2 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sets_carry_out_of_bit_7() {
        let out = add(0xff, 0x03, false);
        assert_eq!(out.result, 0x02);
        assert!(out.flags.carry);
        assert!(!out.flags.zero);
        assert!(!out.flags.sign);
        assert!(out.flags.aux_carry);
    }

    #[test]
    fn add_with_carry_in() {
        let out = add(0x01, 0xff, true);
        assert_eq!(out.result, 0x01);
        assert!(out.flags.carry);
    }

    #[test]
    fn add_flags_non_zero_sign_parity_aux_carry() {
        let out = add(0x0f, 0x87, false);
        assert_eq!(out.result, 0x96);
        assert!(!out.flags.zero);
        assert!(out.flags.sign);
        assert!(out.flags.parity);
        assert!(!out.flags.carry);
        assert!(out.flags.aux_carry);
    }

    #[test]
    fn sub_borrows_when_minuend_is_smaller() {
        let out = sub(0x05, 0x06, false);
        assert_eq!(out.result, 0xff);
        assert!(out.flags.carry);
        assert!(out.flags.sign);
        assert!(out.flags.parity);
        assert!(!out.flags.aux_carry);
    }

    #[test]
    fn sub_with_borrow_in() {
        let out = sub(0x03, 0x02, true);
        assert_eq!(out.result, 0x00);
        assert!(out.flags.zero);
        assert!(!out.flags.carry);

        let out = sub(0x02, 0x02, true);
        assert_eq!(out.result, 0xff);
        assert!(out.flags.carry);
    }

    #[test]
    fn sub_aux_carry_without_nibble_borrow() {
        // 0x3e - 0x3e: no borrow from the low nibble, so the complemented add carries
        assert!(sub(0x3e, 0x3e, false).flags.aux_carry);
        assert!(!sub(0x30, 0x01, false).flags.aux_carry);
    }

    #[test]
    fn compare_keeps_accumulator() {
        let out = execute(AluOp::Cmp, 0x10, 0x10, false);
        assert_eq!(out.result, 0x10);
        assert!(out.flags.zero);
        assert!(!out.flags.carry);
    }

    #[test]
    fn logical_operations_clear_carry() {
        for op in [AluOp::And, AluOp::Xor, AluOp::Or] {
            let out = execute(op, 0b1110_1110, 0b1110_1001, true);
            assert!(!out.flags.carry, "{:?} kept the carry", op);
        }
        assert_eq!(execute(AluOp::And, 0b0110_1110, 0b0110_1001, false).result, 0b0110_1000);
        assert_eq!(execute(AluOp::Xor, 0b0110_1110, 0b0110_1001, false).result, 0b0000_0111);
        assert_eq!(execute(AluOp::Or, 0b0110_1110, 0b0110_1001, false).result, 0b0110_1111);
    }

    #[test]
    fn and_aux_carry_follows_bit_3() {
        assert!(execute(AluOp::And, 0x08, 0x00, false).flags.aux_carry);
        assert!(!execute(AluOp::And, 0x10, 0x01, false).flags.aux_carry);
        assert!(!execute(AluOp::Or, 0x08, 0x08, false).flags.aux_carry);
    }

    #[test]
    fn increment_preserves_carry() {
        let out = increment(0x0f, Flags { carry: true, ..Default::default() });
        assert_eq!(out.result, 0x10);
        assert!(out.flags.carry);
        assert!(out.flags.aux_carry);
        assert!(!out.flags.parity);

        let out = increment(0xff, Flags::default());
        assert!(out.flags.zero);
        assert!(!out.flags.carry);
    }

    #[test]
    fn decrement_preserves_carry() {
        let out = decrement(0x00, Flags { carry: true, ..Default::default() });
        assert_eq!(out.result, 0xff);
        assert!(out.flags.carry);
        assert!(out.flags.sign);
        assert!(!out.flags.aux_carry);

        assert!(decrement(0x01, Flags::default()).flags.zero);
    }

    #[test]
    fn add_16_only_touches_carry() {
        let flags = Flags { zero: true, ..Default::default() };
        assert_eq!(add_16(0x0f11, 0x0101, flags), (0x1012, flags));
        let (result, flags) = add_16(0xffff, 0x0101, flags);
        assert_eq!(result, 0x0100);
        assert!(flags.carry);
        assert!(flags.zero);
    }

    #[test]
    fn decimal_adjust_low_nibble() {
        assert_eq!(decimal_adjust(0x4f, Flags::default()).result, 0x55);
        let flags = Flags { aux_carry: true, ..Default::default() };
        assert_eq!(decimal_adjust(0x42, flags).result, 0x48);
    }

    #[test]
    fn decimal_adjust_high_nibble_sets_carry() {
        let out = decimal_adjust(0xb1, Flags::default());
        assert_eq!(out.result, 0x11);
        assert!(out.flags.carry);

        let out = decimal_adjust(0x9b, Flags::default());
        assert_eq!(out.result, 0x01);
        assert!(out.flags.carry);
    }

    #[test]
    fn rotations() {
        let out = rotate_left(0b1001_0101, Flags::default());
        assert_eq!(out.result, 0b0010_1011);
        assert!(out.flags.carry);

        let out = rotate_right(0b0001_0101, Flags::default());
        assert_eq!(out.result, 0b1000_1010);
        assert!(out.flags.carry);

        let carry = Flags { carry: true, ..Default::default() };
        let out = rotate_left_through_carry(0x10, carry);
        assert_eq!(out.result, 0x21);
        assert!(!out.flags.carry);

        let out = rotate_right_through_carry(0x01, carry);
        assert_eq!(out.result, 0x80);
        assert!(out.flags.carry);
    }

    #[test]
    fn parity_counts_set_bits() {
        assert!(parity(0x00));
        assert!(parity(0x03));
        assert!(!parity(0x01));
        assert!(!parity(0x07));
        assert!(parity(0xff));
    }
}
