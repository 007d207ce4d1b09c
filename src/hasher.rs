//! Deterministic hashing for table keys.
//!
//! Integer keys hash to their own value, so an integer key `k` has the home
//! index `|k| mod capacity`. Anything written as raw bytes (strings, byte
//! slices) is folded with FNV-1a. Composite keys combine their parts with a
//! multiply-by-31 step.

use std::hash::{BuildHasherDefault, Hasher};

/// `BuildHasher` used by [`HashTable`](crate::HashTable) unless another one is supplied.
pub type IdentityState = BuildHasherDefault<IdentityHasher>;

#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityHasher {
    hash: u64,
    written: bool,
}

impl IdentityHasher {
    const FNV_PRIME: u64 = 0x100000001B3;
    const FNV_OFFSET_BASIS: u64 = 0xCBF29CE484222325;
    const COMBINE_MULTIPLIER: u64 = 31;

    #[inline]
    fn mix(&mut self, part: u64) {
        self.hash = if self.written {
            self.hash
                .wrapping_mul(Self::COMBINE_MULTIPLIER)
                .wrapping_add(part)
        } else {
            part
        };
        self.written = true;
    }

    #[inline]
    fn mix_signed(&mut self, part: i64) {
        self.mix(part as u64);
    }
}

impl Hasher for IdentityHasher {
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        let mut fnv: u64 = Self::FNV_OFFSET_BASIS;
        for byte in bytes {
            fnv ^= *byte as u64;
            fnv = fnv.wrapping_mul(Self::FNV_PRIME);
        }
        self.mix(fnv);
    }

    fn write_u8(&mut self, i: u8) {
        self.mix(i as u64);
    }

    fn write_u16(&mut self, i: u16) {
        self.mix(i as u64);
    }

    fn write_u32(&mut self, i: u32) {
        self.mix(i as u64);
    }

    fn write_u64(&mut self, i: u64) {
        self.mix(i);
    }

    fn write_usize(&mut self, i: usize) {
        self.mix(i as u64);
    }

    fn write_i8(&mut self, i: i8) {
        self.mix_signed(i as i64);
    }

    fn write_i16(&mut self, i: i16) {
        self.mix_signed(i as i64);
    }

    fn write_i32(&mut self, i: i32) {
        self.mix_signed(i as i64);
    }

    fn write_i64(&mut self, i: i64) {
        self.mix_signed(i);
    }

    fn write_isize(&mut self, i: isize) {
        self.mix_signed(i as i64);
    }
}
