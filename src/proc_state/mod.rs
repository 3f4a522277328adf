/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

mod flags;
mod memory;
mod registers;
mod stack;

use std::fmt;

use tracing::{debug, error, trace, warn};

use crate::alu::{self, AluOp, AluOutput};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::opcode::{self, Instruction, Location, Op, Reg16};
pub use self::flags::Flags;
pub use self::memory::{Memory, MEMORY_SIZE};
pub use self::registers::Registers;

/// Interface used by `Proc8080` for `IN` and `OUT` instructions. This is the main way to interact
/// with the processor emulation.
///
/// The 8080 processor communicates with external devices via the instructions `IN` (the CPU reads
/// from the databus on a given port) and `OUT` (the CPU writes to a given port). What a port does
/// depends on the hardware being emulated; the library user implements this trait to plug
/// devices in.
pub trait DataBus {

    /// Called by `Proc8080` when it applies a `IN` instruction
    fn read_port(&mut self, port: u8) -> u8;

    /// Called by `Proc8080` when it applies a `OUT` instruction
    fn write_port(&mut self, port: u8, value: u8);

}

/// A data bus with nothing attached: every port reads 0 and writes are discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBus;

impl DataBus for NullBus {
    fn read_port(&mut self, _port: u8) -> u8 {
        0
    }

    fn write_port(&mut self, _port: u8, _value: u8) {}
}

/// How a single [`step`](struct.Proc8080.html#method.step) went.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StepStatus {
    Executed,
    /// The opcode is not part of the documented instruction set and ran as a `NOP`.
    InvalidOpcode,
    /// The processor executed `HLT` or was already halted.
    Halted,
    /// An interceptor handled the instruction instead of the processor.
    Intercepted,
}

/// Report of one call to [`step`](struct.Proc8080.html#method.step).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Step {
    /// Address of the instruction.
    pub pc: u16,
    pub opcode: u8,
    /// Bytes consumed; 0 while the processor is halted.
    pub length: u8,
    pub status: StepStatus,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StopReason {
    /// The instruction budget given to `run` is spent.
    Budget,
    Halted,
    /// The program counter left the loaded image.
    EndOfImage,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct RunSummary {
    pub steps: u64,
    pub reason: StopReason,
}

/// Read-only copy of the processor registers and flags, for dumps and inspection.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Snapshot {
    pub registers: Registers,
    pub flags: Flags,
    pub interrupts_enabled: bool,
    pub halted: bool,
}

/// Structure containing the processor state (flags, registers and memory) and logic.
pub struct Proc8080<Bus: DataBus = NullBus> {
    flags: Flags,
    registers: Registers,
    memory: Memory,
    config: Config,
    image_end: Option<usize>,
    interrupts_enabled: bool,
    halted: bool,
    fault: Option<Error>,
    data_bus: Bus,
}

impl<Bus: DataBus> Proc8080<Bus> {

    /// Builds a new `Proc8080` with the default [`Config`](../config/struct.Config.html).
    ///
    /// The `data_bus` contains callbacks called when running a `IN` or `OUT` opcode; use
    /// [`NullBus`](struct.NullBus.html) when nothing is attached.
    pub fn new(data_bus: Bus) -> Proc8080<Bus> {
        Proc8080::with_config(Config::default(), data_bus)
    }

    /// Builds a new `Proc8080`. Memory and registers start zeroed, except `SP` which takes
    /// the configured reset value. Nothing runs until an image is loaded.
    pub fn with_config(config: Config, data_bus: Bus) -> Proc8080<Bus> {
        Proc8080 {
            flags: Flags::default(),
            registers: Registers { sp: config.stack_pointer, ..Registers::default() },
            memory: Memory::new(),
            config,
            image_end: None,
            interrupts_enabled: false,
            halted: false,
            fault: None,
            data_bus,
        }
    }

    /// Copies a raw image at address 0.
    pub fn load_image(&mut self, image: &[u8]) -> Result<()> {
        self.load_image_at(0, image)
    }

    /// Copies a raw image at address `base`. The image must fit below 0x10000.
    pub fn load_image_at(&mut self, base: u16, image: &[u8]) -> Result<()> {
        self.memory.load(base, image)?;
        let end = base as usize + image.len();
        self.image_end = Some(self.image_end.map_or(end, |current| current.max(end)));
        debug!(base, len = image.len(), "image loaded");
        Ok(())
    }

    /// Borrows the procesor flags immutably.
    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    /// Borrows the procesor registers immutably.
    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// Borrows the memory immutably.
    pub fn memory(&self) -> &[u8] {
        self.memory.as_slice()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            registers: self.registers,
            flags: self.flags,
            interrupts_enabled: self.interrupts_enabled,
            halted: self.halted,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// End of the highest loaded image, `None` before anything is loaded.
    pub fn image_end(&self) -> Option<usize> {
        self.image_end
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn data_bus(&self) -> &Bus {
        &self.data_bus
    }

    pub fn data_bus_mut(&mut self) -> &mut Bus {
        &mut self.data_bus
    }

    /// Executes exactly one instruction at the program counter.
    ///
    /// Unmapped opcodes run as a 1 byte `NOP` and are reported with
    /// [`StepStatus::InvalidOpcode`](enum.StepStatus.html). Fails with `MissingImage` before
    /// an image is loaded. An out of bounds access halts the session: the faulting
    /// instruction has no effect and every later call returns the same error.
    pub fn step(&mut self) -> Result<Step> {
        self.check_ready()?;
        if self.halted {
            return self.halted_step();
        }
        let instruction = self.fetch().map_err(|err| self.fail(err))?;
        self.execute(instruction)
    }

    /// Steps until `budget` instructions ran, the processor halts or, when configured, the
    /// program counter leaves the loaded image.
    pub fn run(&mut self, budget: u64) -> Result<RunSummary> {
        self.check_ready()?;
        let mut steps = 0;
        loop {
            let reason = if self.halted {
                Some(StopReason::Halted)
            } else if self.config.stop_at_image_end && self.beyond_image() {
                Some(StopReason::EndOfImage)
            } else if steps == budget {
                Some(StopReason::Budget)
            } else {
                None
            };

            if let Some(reason) = reason {
                return Ok(RunSummary { steps, reason });
            }
            self.step()?;
            steps += 1;
        }
    }

    /// Make the processor run a `RST` instruction.
    ///
    /// There are 8 possible `RST` instruction for the 8080 (`RST 0` to `7`). The specific
    /// instruction is chosen via `rst_value`.
    ///
    /// An interrupt restarts a processor which was in stopped state after running a HLT opcode.
    /// The `RST` itself only happens when interrupts are enabled (`EI`), and disables them.
    ///
    /// # Panics
    /// If `rst_value` is greater than 7;
    pub fn interrupt(&mut self, rst_value: u8) -> Result<()> {
        assert!(rst_value <= 7, "RST value are only from 0 to 7");
        self.check_ready()?;
        if self.interrupts_enabled {
            debug!(rst = rst_value, pc = self.registers.pc, "interrupt");
            let pc = self.registers.pc;
            self.push_word(pc).map_err(|err| self.fail(err))?;
            self.registers.pc = rst_value as u16 * 8;
            self.interrupts_enabled = false;
        }
        self.halted = false;
        Ok(())
    }

    fn check_ready(&self) -> Result<()> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        if self.image_end.is_none() {
            return Err(Error::MissingImage);
        }
        Ok(())
    }

    fn beyond_image(&self) -> bool {
        self.image_end.map_or(true, |end| self.registers.pc as usize >= end)
    }

    fn fail(&mut self, err: Error) -> Error {
        error!(pc = self.registers.pc, "{}", err);
        self.fault = Some(err.clone());
        err
    }

    fn halted_step(&self) -> Result<Step> {
        let pc = self.registers.pc;
        Ok(Step { pc, opcode: self.memory.read(pc as usize)?, length: 0, status: StepStatus::Halted })
    }

    fn fetch(&self) -> Result<Instruction> {
        opcode::decode_at(self.memory.as_slice(), self.registers.pc as usize).map_err(|err| match err {
            Error::Truncated { .. } => Error::OutOfBounds { addr: MEMORY_SIZE as i32 },
            other => other,
        })
    }

    fn execute(&mut self, instruction: Instruction) -> Result<Step> {
        let pc = self.registers.pc;
        trace!("{:04x} - {}", pc, instruction);

        let next_pc = pc.wrapping_add(instruction.length() as u16);
        let target = self.apply_op(instruction, next_pc).map_err(|err| self.fail(err))?;
        self.registers.pc = target.unwrap_or(next_pc);

        let status = if !instruction.entry().mapped {
            warn!(pc, opcode = instruction.opcode(), "unmapped opcode executed as NOP");
            StepStatus::InvalidOpcode
        } else if instruction.op() == Op::Hlt {
            StepStatus::Halted
        } else {
            StepStatus::Executed
        };
        Ok(Step { pc, opcode: instruction.opcode(), length: instruction.length(), status })
    }

    /// Applies the effect of `instruction`. Returns the new program counter when the
    /// instruction transfers control; `next_pc` is the address following it.
    fn apply_op(&mut self, instruction: Instruction, next_pc: u16) -> Result<Option<u16>> {
        let byte = instruction.byte();
        let word = instruction.word();

        match instruction.op() {
            Op::Nop => (),
            Op::Hlt => self.halted = true,

            // Data transfer
            Op::Mov(dst, src) => {
                let value = self.read_location(src)?;
                self.write_location(dst, value)?;
            }
            Op::Mvi(dst) => self.write_location(dst, byte)?,
            Op::Lxi(pair) => self.registers.set_pair(pair, word),
            Op::Lda => self.registers.a = self.memory.read(word as usize)?,
            Op::Sta => self.memory.write(word as usize, self.registers.a)?,
            Op::Lhld => {
                let value = self.memory.read_word(word as usize)?;
                self.registers.set_pair(Reg16::H, value);
            }
            Op::Shld => self.memory.write_word(word as usize, self.registers.hl())?,
            Op::Ldax(pair) => self.registers.a = self.memory.read(self.registers.pair(pair) as usize)?,
            Op::Stax(pair) => self.memory.write(self.registers.pair(pair) as usize, self.registers.a)?,
            Op::Xchg => {
                let de = self.registers.pair(Reg16::D);
                let hl = self.registers.hl();
                self.registers.set_pair(Reg16::D, hl);
                self.registers.set_pair(Reg16::H, de);
            }

            // Arithmetic and logical
            Op::Alu(op, src) => {
                let value = self.read_location(src)?;
                self.accumulate(op, value);
            }
            Op::AluImmediate(op) => self.accumulate(op, byte),
            Op::Inr(loc) => {
                let output = alu::increment(self.read_location(loc)?, self.flags);
                self.write_location(loc, output.result)?;
                self.flags = output.flags;
            }
            Op::Dcr(loc) => {
                let output = alu::decrement(self.read_location(loc)?, self.flags);
                self.write_location(loc, output.result)?;
                self.flags = output.flags;
            }
            Op::Inx(pair) => {
                let value = self.registers.pair(pair).wrapping_add(1);
                self.registers.set_pair(pair, value);
            }
            Op::Dcx(pair) => {
                let value = self.registers.pair(pair).wrapping_sub(1);
                self.registers.set_pair(pair, value);
            }
            Op::Dad(pair) => {
                let (hl, flags) = alu::add_16(self.registers.hl(), self.registers.pair(pair), self.flags);
                self.registers.set_pair(Reg16::H, hl);
                self.flags = flags;
            }
            Op::Daa => self.apply_to_accumulator(alu::decimal_adjust),
            Op::Rlc => self.apply_to_accumulator(alu::rotate_left),
            Op::Rrc => self.apply_to_accumulator(alu::rotate_right),
            Op::Ral => self.apply_to_accumulator(alu::rotate_left_through_carry),
            Op::Rar => self.apply_to_accumulator(alu::rotate_right_through_carry),
            Op::Cma => self.registers.a = !self.registers.a,
            Op::Cmc => self.flags.carry = !self.flags.carry,
            Op::Stc => self.flags.carry = true,

            // Branch
            Op::Jmp(condition) => {
                if self.condition_holds(condition) {
                    return Ok(Some(word));
                }
            }
            Op::Call(condition) => {
                if self.condition_holds(condition) {
                    self.push_word(next_pc)?;
                    return Ok(Some(word));
                }
            }
            Op::Ret(condition) => {
                if self.condition_holds(condition) {
                    return self.pop_word().map(Some);
                }
            }
            Op::Rst(vector) => {
                self.push_word(next_pc)?;
                return Ok(Some(vector as u16 * 8));
            }
            Op::Pchl => return Ok(Some(self.registers.hl())),

            // Stack, I/O, and Machine Control
            Op::Push(pair) => self.push_pair(pair)?,
            Op::PushPsw => self.push_processor_status_word()?,
            Op::Pop(pair) => self.pop_pair(pair)?,
            Op::PopPsw => self.pop_processor_status_word()?,
            Op::Xthl => self.exchange_top_with_hl()?,
            Op::Sphl => self.registers.sp = self.registers.hl(),
            Op::In => self.registers.a = self.data_bus.read_port(byte),
            Op::Out => self.data_bus.write_port(byte, self.registers.a),
            Op::Ei => self.interrupts_enabled = true,
            Op::Di => self.interrupts_enabled = false,
        }
        Ok(None)
    }

    fn read_location(&self, loc: Location) -> Result<u8> {
        match loc {
            Location::Reg(reg) => Ok(self.registers.get(reg)),
            Location::M => self.memory.read(self.registers.hl() as usize),
        }
    }

    fn write_location(&mut self, loc: Location, value: u8) -> Result<()> {
        match loc {
            Location::Reg(reg) => {
                self.registers.set(reg, value);
                Ok(())
            }
            Location::M => self.memory.write(self.registers.hl() as usize, value),
        }
    }

    fn accumulate(&mut self, op: AluOp, value: u8) {
        let output = alu::execute(op, self.registers.a, value, self.flags.carry);
        self.registers.a = output.result;
        self.flags = output.flags;
    }

    fn apply_to_accumulator(&mut self, operation: fn(u8, Flags) -> AluOutput) {
        let output = operation(self.registers.a, self.flags);
        self.registers.a = output.result;
        self.flags = output.flags;
    }

    fn condition_holds(&self, condition: Option<opcode::Condition>) -> bool {
        condition.map_or(true, |condition| self.flags.satisfies(condition))
    }
}

impl<Bus: DataBus> fmt::Debug for Proc8080<Bus> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{
    flags: {:x?},
    registers: {:x?},
    interrupts_enabled: {:?},
    halted: {:?},
}}", self.flags, self.registers, self.interrupts_enabled, self.halted)
    }
}

/// A simple wrapper around [`Proc8080`](struct.Proc8080.html) which allows to intercept
/// instructions.
///
/// This structure is useful for debugging, breakpoints, or standing in for code which is
/// not in the image (like the CP/M BDOS entry point at `0x0005`).
pub struct InterceptableProc8080<Bus, Intercept>
    where Bus: DataBus,
        Intercept: FnMut(&Proc8080<Bus>, &Instruction) -> bool {
    proc8080: Proc8080<Bus>,
    interceptor: Intercept,
}

impl<Bus, Intercept> InterceptableProc8080<Bus, Intercept>
    where Bus: DataBus,
        Intercept: FnMut(&Proc8080<Bus>, &Instruction) -> bool {

    /// Builds an `InterceptableProc8080` by taking ownership of an existing `Proc8080`.
    ///
    /// `interceptor` runs before each instruction, while the program counter still points
    /// at it. It returns:
    ///  - `false` if the processor should go on and apply the instruction normally
    ///  - `true` if it handled the instruction itself; the processor then skips to the
    ///    next one
    pub fn from_8080(proc8080: Proc8080<Bus>, interceptor: Intercept) -> InterceptableProc8080<Bus, Intercept> {
        InterceptableProc8080 { proc8080, interceptor }
    }

    /// Takes ownership of the wrapped `Proc8080`.
    pub fn into_inner(self) -> Proc8080<Bus> {
        self.proc8080
    }

    pub fn step(&mut self) -> Result<Step> {
        self.proc8080.check_ready()?;
        if self.proc8080.halted {
            return self.proc8080.halted_step();
        }
        let instruction = self.proc8080.fetch().map_err(|err| self.proc8080.fail(err))?;
        if (self.interceptor)(&self.proc8080, &instruction) {
            let pc = self.proc8080.registers.pc;
            self.proc8080.registers.pc = pc.wrapping_add(instruction.length() as u16);
            return Ok(Step {
                pc,
                opcode: instruction.opcode(),
                length: instruction.length(),
                status: StepStatus::Intercepted,
            });
        }
        self.proc8080.execute(instruction)
    }

    pub fn proc8080(&self) -> &Proc8080<Bus> {
        &self.proc8080
    }

    pub fn flags(&self) -> &Flags {
        self.proc8080.flags()
    }

    pub fn registers(&self) -> &Registers {
        self.proc8080.registers()
    }

    pub fn memory(&self) -> &[u8] {
        self.proc8080.memory()
    }

    pub fn interrupt(&mut self, rst_value: u8) -> Result<()> {
        self.proc8080.interrupt(rst_value)
    }
}
