/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::fmt::{self, Display, Formatter};

use crate::alu::AluOp;

/// An 8-bit register of the register file.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Register {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
}

impl Display for Register {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Target of a 3-bit operand code: one of the registers or `M`, the memory byte
/// addressed by `HL`.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Location {
    Reg(Register),
    M,
}

impl Location {
    /// Decodes the 3-bit operand field (`B C D E H L M A`).
    pub const fn from_code(code: u8) -> Location {
        match code & 0x07 {
            0 => Location::Reg(Register::B),
            1 => Location::Reg(Register::C),
            2 => Location::Reg(Register::D),
            3 => Location::Reg(Register::E),
            4 => Location::Reg(Register::H),
            5 => Location::Reg(Register::L),
            6 => Location::M,
            _ => Location::Reg(Register::A),
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Location::Reg(reg) => write!(f, "{}", reg),
            Location::M => write!(f, "M"),
        }
    }
}

/// A register pair, named after its high register.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Reg16 {
    B,
    D,
    H,
    SP,
}

impl Reg16 {
    /// Decodes the 2-bit pair field (`B D H SP`).
    pub const fn from_code(code: u8) -> Reg16 {
        match code & 0x03 {
            0 => Reg16::B,
            1 => Reg16::D,
            2 => Reg16::H,
            _ => Reg16::SP,
        }
    }
}

impl Display for Reg16 {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Flag condition of the conditional jump, call and return instructions.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Condition {
    NotZero,
    Zero,
    NoCarry,
    Carry,
    ParityOdd,
    ParityEven,
    Plus,
    Minus,
}

impl Condition {
    pub const fn from_code(code: u8) -> Condition {
        match code & 0x07 {
            0 => Condition::NotZero,
            1 => Condition::Zero,
            2 => Condition::NoCarry,
            3 => Condition::Carry,
            4 => Condition::ParityOdd,
            5 => Condition::ParityEven,
            6 => Condition::Plus,
            _ => Condition::Minus,
        }
    }
}

/// What an opcode does. This is the handler half of an opcode table entry: the engine
/// dispatches on it, operand bytes travel separately in the decoded instruction.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Op {
    Nop,
    Hlt,

    // Data transfer
    Mov(Location, Location),
    Mvi(Location),
    Lxi(Reg16),
    Lda,
    Sta,
    Lhld,
    Shld,
    Ldax(Reg16),
    Stax(Reg16),
    Xchg,

    // Arithmetic and logical
    Alu(AluOp, Location),
    AluImmediate(AluOp),
    Inr(Location),
    Dcr(Location),
    Inx(Reg16),
    Dcx(Reg16),
    Dad(Reg16),
    Daa,
    Rlc,
    Rrc,
    Ral,
    Rar,
    Cma,
    Cmc,
    Stc,

    // Branch
    Jmp(Option<Condition>),
    Call(Option<Condition>),
    Ret(Option<Condition>),
    Rst(u8),
    Pchl,

    // Stack, I/O and machine control
    Push(Reg16),
    PushPsw,
    Pop(Reg16),
    PopPsw,
    Xthl,
    Sphl,
    In,
    Out,
    Ei,
    Di,
}

/// One operand as it appears in the assembly text.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Operand {
    Loc(Location),
    Pair(Reg16),
    Psw,
    /// 8-bit immediate or port number following the opcode.
    Byte,
    /// 16-bit address or immediate following the opcode, little-endian.
    Word,
    /// Restart vector number of `RST`.
    Vector(u8),
}

impl Operand {
    /// Number of bytes this operand occupies after the opcode.
    pub const fn data_len(&self) -> u8 {
        match self {
            Operand::Byte => 1,
            Operand::Word => 2,
            _ => 0,
        }
    }
}

/// Coarse classification of the operands of an opcode.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum OperandKind {
    None,
    Register,
    RegisterPair,
    Immediate8,
    Immediate16,
}
