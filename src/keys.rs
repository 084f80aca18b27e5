//! Zobrist keys for board hashing.
//!
//! A board's hash is the XOR of `key(tile, x, y)` over every non-blank tile,
//! so moving one tile costs two XORs. Hashes are only comparable between
//! boards built against the same table.

use rand::{rngs::StdRng, Rng, SeedableRng};

const KEY_MIN: u64 = 1 << 61;
const KEY_MAX: u64 = 1 << 62;

#[derive(Debug)]
pub struct KeyTable {
    size: usize,
    keys: Vec<u64>,
}

impl KeyTable {
    /// A fresh table seeded from OS entropy.
    pub fn new(size: usize) -> KeyTable {
        Self::generate(size, &mut StdRng::from_entropy())
    }

    /// A reproducible table, used by tests and `--seed`.
    pub fn with_seed(size: usize, seed: u64) -> KeyTable {
        Self::generate(size, &mut StdRng::seed_from_u64(seed))
    }

    fn generate(size: usize, rng: &mut StdRng) -> KeyTable {
        let cells = size * size;
        let keys = (0..cells * cells)
            .map(|_| rng.gen_range(KEY_MIN..=KEY_MAX))
            .collect();

        KeyTable { size, keys }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn key(&self, tile: u16, x: usize, y: usize) -> u64 {
        self.keys[tile as usize * self.size * self.size + x * self.size + y]
    }
}
