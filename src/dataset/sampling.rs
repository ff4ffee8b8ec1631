use super::record::{Label, Record};
use rand::seq::{index, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Draw `n` items without replacement. When `n` covers everything the input is
/// returned untouched; callers shuffle the combined result afterwards.
pub fn sample_up_to<T>(items: Vec<T>, n: usize, seed: u64) -> Vec<T> {
    if items.len() <= n {
        return items;
    }

    let mut rng = seeded(seed);
    let picked = index::sample(&mut rng, items.len(), n);

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    picked
        .iter()
        .filter_map(|i| slots[i].take())
        .collect()
}

/// Fixed-capacity uniform sample over a stream of unknown length.
///
/// Holds at most `capacity` items however many are offered; every offered item
/// ends up retained with equal probability.
#[derive(Debug)]
pub struct Reservoir<T> {
    items: Vec<T>,
    capacity: usize,
    seen: usize,
    rng: ChaCha8Rng,
}

impl<T> Reservoir<T> {
    pub fn new(capacity: usize, seed: u64) -> Self {
        Self {
            items: Vec::new(),
            capacity,
            seen: 0,
            rng: seeded(seed),
        }
    }

    pub fn offer(&mut self, item: T) {
        self.seen += 1;
        if self.items.len() < self.capacity {
            self.items.push(item);
            return;
        }
        let slot = self.rng.gen_range(0..self.seen);
        if slot < self.capacity {
            self.items[slot] = item;
        }
    }

    /// Items offered so far, retained or not.
    pub fn seen(&self) -> usize {
        self.seen
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

pub fn shuffle<T>(items: &mut [T], seed: u64) {
    items.shuffle(&mut seeded(seed));
}

/// Keep the first occurrence of every text. Returns how many rows were dropped.
pub fn dedup_by_text(records: &mut Vec<Record>) -> usize {
    let before = records.len();
    let mut seen = HashSet::with_capacity(records.len());
    records.retain(|record| seen.insert(record.text.clone()));
    before - records.len()
}

pub fn split_by_class(records: Vec<Record>) -> (Vec<Record>, Vec<Record>) {
    records
        .into_iter()
        .partition(|record| record.label == Label::Ai)
}
