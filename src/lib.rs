/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! # Intel 8080 emulator core
//!
//! This crate is an instruction-level emulator of the Intel 8080 processor, together with a
//! disassembler built on the same opcode table.
//!
//! The main struct is [`Proc8080`](proc_state/struct.Proc8080.html) which holds the state of
//! an emulation session (memory, flags and registers) and executes one instruction per
//! [`step`](proc_state/struct.Proc8080.html#method.step).
//!
//! ```
//! use i8080_core::{NullBus, Proc8080, StopReason};
//!
//! // MVI A,$05 ; loop: DCR A ; JNZ loop ; HLT
//! let mut proc8080 = Proc8080::new(NullBus);
//! proc8080.load_image(&[0x3e, 0x05, 0x3d, 0xc2, 0x02, 0x00, 0x76]).unwrap();
//!
//! let summary = proc8080.run(100).unwrap();
//! assert_eq!(summary.reason, StopReason::Halted);
//! assert_eq!(proc8080.registers().a, 0);
//! ```
//!
//! The second useful construct is probably [`disassemble_at`](disasm/fn.disassemble_at.html)
//! and its [`Listing`](disasm/struct.Listing.html) iterator:
//!
//! ```
//! use i8080_core::disasm::Listing;
//!
//! let program = [0x21, 0x34, 0x12, 0x7e, 0xcb];
//! let lines: Vec<String> = Listing::new(&program)
//!     .map(|line| line.unwrap().text)
//!     .collect();
//! assert_eq!(lines, ["LXI H,$1234", "MOV A,M", "DB $cb"]);
//! ```

pub mod alu;
pub mod config;
pub mod disasm;
pub mod error;
pub mod opcode;
pub mod proc_state;

pub use crate::config::Config;
pub use crate::disasm::{disassemble_at, Disassembly, Listing};
pub use crate::error::{Error, Result};
pub use crate::proc_state::{
    DataBus, Flags, InterceptableProc8080, NullBus, Proc8080, Registers, RunSummary, Snapshot,
    Step, StepStatus, StopReason,
};
