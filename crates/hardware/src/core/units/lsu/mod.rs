//! Load/Store Unit (LSU).
//!
//! A sparse word-addressed data memory with one-cycle access. Loads return the
//! word sign-extended to the register width; unwritten words read as zero.

use std::collections::BTreeMap;

use crate::core::pipeline::shape::Xlen;

/// Mask selecting the word containing a byte address.
const WORD_MASK: u64 = !3;

/// Data memory accessed by the memory stage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataMemory {
    words: BTreeMap<u64, u32>,
}

impl DataMemory {
    /// Creates an empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the word containing `addr`.
    pub fn load_word(&self, addr: u64, xlen: Xlen) -> u64 {
        let word = self.words.get(&(addr & WORD_MASK)).copied().unwrap_or(0);
        xlen.normalize(word as i32 as i64 as u64)
    }

    /// Stores the low 32 bits of `val` into the word containing `addr`.
    pub fn store_word(&mut self, addr: u64, val: u64) {
        let _ = self.words.insert(addr & WORD_MASK, val as u32);
    }

    /// Number of words ever written.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if nothing was ever stored.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
