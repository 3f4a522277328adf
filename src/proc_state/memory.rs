/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::error::{Error, Result};

/// Size of the 8080 address space.
pub const MEMORY_SIZE: usize = 0x10000;

/// The flat 64 KiB memory of a session. Every access is bounds-checked; word accesses
/// check both bytes before touching anything.
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Memory {

    pub fn new() -> Memory {
        Memory { bytes: vec![0; MEMORY_SIZE].into_boxed_slice() }
    }

    pub fn read(&self, addr: usize) -> Result<u8> {
        self.bytes.get(addr).copied().ok_or(Error::OutOfBounds { addr: addr as i32 })
    }

    pub fn write(&mut self, addr: usize, value: u8) -> Result<()> {
        let slot = self.bytes.get_mut(addr).ok_or(Error::OutOfBounds { addr: addr as i32 })?;
        *slot = value;
        Ok(())
    }

    /// Little-endian word at `addr`, `addr + 1`.
    pub fn read_word(&self, addr: usize) -> Result<u16> {
        let low = self.read(addr)?;
        let high = self.read(addr + 1)?;
        Ok(u16::from_le_bytes([low, high]))
    }

    pub fn write_word(&mut self, addr: usize, value: u16) -> Result<()> {
        self.check(addr + 1)?;
        let [low, high] = value.to_le_bytes();
        self.write(addr, low)?;
        self.write(addr + 1, high)
    }

    /// Copies `image` to `base`, rejecting images running past the end of memory.
    pub fn load(&mut self, base: u16, image: &[u8]) -> Result<()> {
        let start = base as usize;
        let end = start + image.len();
        if end > MEMORY_SIZE {
            return Err(Error::ImageTooLarge { base, len: image.len() });
        }
        self.bytes[start..end].copy_from_slice(image);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    fn check(&self, addr: usize) -> Result<()> {
        if addr < self.bytes.len() {
            Ok(())
        } else {
            Err(Error::OutOfBounds { addr: addr as i32 })
        }
    }
}

impl Default for Memory {
    fn default() -> Memory {
        Memory::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_are_little_endian() {
        let mut memory = Memory::new();
        memory.write_word(0x3450, 0xc1f5).unwrap();
        assert_eq!(memory.read(0x3450), Ok(0xf5));
        assert_eq!(memory.read(0x3451), Ok(0xc1));
        assert_eq!(memory.read_word(0x3450), Ok(0xc1f5));
    }

    #[test]
    fn last_byte_is_addressable() {
        let mut memory = Memory::new();
        memory.write(0xffff, 0x42).unwrap();
        assert_eq!(memory.read(0xffff), Ok(0x42));
    }

    #[test]
    fn word_across_the_top_is_out_of_bounds() {
        let mut memory = Memory::new();
        assert_eq!(memory.read_word(0xffff), Err(Error::OutOfBounds { addr: 0x10000 }));
        assert_eq!(memory.write_word(0xffff, 0x1234), Err(Error::OutOfBounds { addr: 0x10000 }));
        // nothing written on failure
        assert_eq!(memory.read(0xffff), Ok(0));
    }

    #[test]
    fn load_rejects_oversized_images() {
        let mut memory = Memory::new();
        assert_eq!(memory.load(0xfffe, &[1, 2]), Ok(()));
        assert_eq!(
            memory.load(0xffff, &[1, 2]),
            Err(Error::ImageTooLarge { base: 0xffff, len: 2 })
        );
    }
}
