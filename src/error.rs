/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Fatal conditions reported by the emulator and the disassembler.
///
/// Unmapped opcodes and `HLT` are not errors: they are reported through
/// [`StepStatus`](../proc_state/enum.StepStatus.html).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A computed address fell outside the 64 KiB address space, e.g. a word access at
    /// `0xffff`.
    #[error("memory access at address {addr} is outside the 64 KiB address space")]
    OutOfBounds { addr: i32 },

    #[error("no image loaded")]
    MissingImage,

    #[error("image of {len} bytes does not fit in memory at base {base:#06x}")]
    ImageTooLarge { base: u16, len: usize },

    /// The instruction at `offset` needs `length` bytes but the window ends before that.
    #[error("instruction at offset {offset:#06x} needs {length} bytes but input ends first")]
    Truncated { offset: usize, length: u8 },
}
