/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::alu::AluOp;
use super::opcodes::{Condition, Location, Op, Operand, OperandKind, Reg16};

/// Static description of one opcode byte.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct OpcodeEntry {
    pub code: u8,
    pub mnemonic: &'static str,
    pub op: Op,
    pub operands: [Option<Operand>; 2],
    /// `false` for the undocumented encodings, which execute as a 1 byte `NOP`.
    pub mapped: bool,
}

impl OpcodeEntry {
    /// Total instruction length in bytes, opcode included.
    pub const fn length(&self) -> u8 {
        1 + data_len(self.operands[0]) + data_len(self.operands[1])
    }

    pub fn operands(&self) -> impl Iterator<Item = &Operand> {
        self.operands.iter().flatten()
    }

    /// The dominant operand kind: trailing data wins over register operands.
    pub fn operand_kind(&self) -> OperandKind {
        let mut kind = OperandKind::None;
        for operand in self.operands() {
            kind = match (kind, operand) {
                (_, Operand::Word) => OperandKind::Immediate16,
                (OperandKind::Immediate16, _) => OperandKind::Immediate16,
                (_, Operand::Byte) => OperandKind::Immediate8,
                (OperandKind::Immediate8, _) => OperandKind::Immediate8,
                (_, Operand::Pair(_)) | (_, Operand::Psw) => OperandKind::RegisterPair,
                (OperandKind::None, Operand::Loc(_)) => OperandKind::Register,
                (kind, _) => kind,
            };
        }
        kind
    }
}

const fn data_len(operand: Option<Operand>) -> u8 {
    match operand {
        Some(operand) => operand.data_len(),
        None => 0,
    }
}

/// The opcode table, indexed by opcode byte.
pub static OPCODES: [OpcodeEntry; 256] = build_table();

/// Returns the table entry of `code`.
pub fn lookup(code: u8) -> &'static OpcodeEntry {
    &OPCODES[code as usize]
}

const JUMPS: [&str; 8] = ["JNZ", "JZ", "JNC", "JC", "JPO", "JPE", "JP", "JM"];
const CALLS: [&str; 8] = ["CNZ", "CZ", "CNC", "CC", "CPO", "CPE", "CP", "CM"];
const RETURNS: [&str; 8] = ["RNZ", "RZ", "RNC", "RC", "RPO", "RPE", "RP", "RM"];

const fn build_table() -> [OpcodeEntry; 256] {
    let mut table = [unmapped(0); 256];
    let mut code = 0;
    while code < 256 {
        table[code] = describe(code as u8);
        code += 1;
    }
    table
}

const fn unmapped(code: u8) -> OpcodeEntry {
    OpcodeEntry { code, mnemonic: "NOP", op: Op::Nop, operands: [None, None], mapped: false }
}

const fn plain(code: u8, mnemonic: &'static str, op: Op) -> OpcodeEntry {
    OpcodeEntry { code, mnemonic, op, operands: [None, None], mapped: true }
}

const fn one(code: u8, mnemonic: &'static str, op: Op, operand: Operand) -> OpcodeEntry {
    OpcodeEntry { code, mnemonic, op, operands: [Some(operand), None], mapped: true }
}

const fn two(code: u8, mnemonic: &'static str, op: Op, first: Operand, second: Operand) -> OpcodeEntry {
    OpcodeEntry { code, mnemonic, op, operands: [Some(first), Some(second)], mapped: true }
}

const fn describe(code: u8) -> OpcodeEntry {
    // bits 0-2 source, bits 3-5 destination or condition, bits 4-5 register pair
    let src = Location::from_code(code);
    let dst = Location::from_code(code >> 3);
    let pair = Reg16::from_code(code >> 4);
    let cond = Condition::from_code(code >> 3);
    let group = ((code >> 3) & 0x07) as usize;

    match code {
        0x00 => plain(code, "NOP", Op::Nop),
        0x76 => plain(code, "HLT", Op::Hlt),
        0x40..=0x7f => two(code, "MOV", Op::Mov(dst, src), Operand::Loc(dst), Operand::Loc(src)),
        0x80..=0xbf => {
            let alu = AluOp::from_code(code >> 3);
            one(code, alu.mnemonic(), Op::Alu(alu, src), Operand::Loc(src))
        }

        0x07 => plain(code, "RLC", Op::Rlc),
        0x0f => plain(code, "RRC", Op::Rrc),
        0x17 => plain(code, "RAL", Op::Ral),
        0x1f => plain(code, "RAR", Op::Rar),
        0x27 => plain(code, "DAA", Op::Daa),
        0x2f => plain(code, "CMA", Op::Cma),
        0x37 => plain(code, "STC", Op::Stc),
        0x3f => plain(code, "CMC", Op::Cmc),
        0x22 => one(code, "SHLD", Op::Shld, Operand::Word),
        0x2a => one(code, "LHLD", Op::Lhld, Operand::Word),
        0x32 => one(code, "STA", Op::Sta, Operand::Word),
        0x3a => one(code, "LDA", Op::Lda, Operand::Word),
        0x02 | 0x12 => one(code, "STAX", Op::Stax(pair), Operand::Pair(pair)),
        0x0a | 0x1a => one(code, "LDAX", Op::Ldax(pair), Operand::Pair(pair)),
        _ if code < 0x40 => match code & 0x0f {
            0x01 => two(code, "LXI", Op::Lxi(pair), Operand::Pair(pair), Operand::Word),
            0x03 => one(code, "INX", Op::Inx(pair), Operand::Pair(pair)),
            0x09 => one(code, "DAD", Op::Dad(pair), Operand::Pair(pair)),
            0x0b => one(code, "DCX", Op::Dcx(pair), Operand::Pair(pair)),
            _ => match code & 0x07 {
                0x04 => one(code, "INR", Op::Inr(dst), Operand::Loc(dst)),
                0x05 => one(code, "DCR", Op::Dcr(dst), Operand::Loc(dst)),
                0x06 => two(code, "MVI", Op::Mvi(dst), Operand::Loc(dst), Operand::Byte),
                _ => unmapped(code),
            },
        },

        0xc3 => one(code, "JMP", Op::Jmp(None), Operand::Word),
        0xc9 => plain(code, "RET", Op::Ret(None)),
        0xcd => one(code, "CALL", Op::Call(None), Operand::Word),
        0xd3 => one(code, "OUT", Op::Out, Operand::Byte),
        0xdb => one(code, "IN", Op::In, Operand::Byte),
        0xe3 => plain(code, "XTHL", Op::Xthl),
        0xe9 => plain(code, "PCHL", Op::Pchl),
        0xeb => plain(code, "XCHG", Op::Xchg),
        0xf1 => one(code, "POP", Op::PopPsw, Operand::Psw),
        0xf3 => plain(code, "DI", Op::Di),
        0xf5 => one(code, "PUSH", Op::PushPsw, Operand::Psw),
        0xf9 => plain(code, "SPHL", Op::Sphl),
        0xfb => plain(code, "EI", Op::Ei),
        _ => match code & 0x0f {
            0x01 => one(code, "POP", Op::Pop(pair), Operand::Pair(pair)),
            0x05 => one(code, "PUSH", Op::Push(pair), Operand::Pair(pair)),
            _ => match code & 0x07 {
                0x00 => plain(code, RETURNS[group], Op::Ret(Some(cond))),
                0x02 => one(code, JUMPS[group], Op::Jmp(Some(cond)), Operand::Word),
                0x04 => one(code, CALLS[group], Op::Call(Some(cond)), Operand::Word),
                0x06 => {
                    let alu = AluOp::from_code(code >> 3);
                    one(code, alu.immediate_mnemonic(), Op::AluImmediate(alu), Operand::Byte)
                }
                0x07 => one(code, "RST", Op::Rst(group as u8), Operand::Vector(group as u8)),
                _ => unmapped(code),
            },
        },
    }
}
