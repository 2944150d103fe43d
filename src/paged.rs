//! Two-level deduplicating page table.
//!
//! The full descriptor sequence is first deduplicated value-by-value, then
//! the resulting index sequence is cut into fixed-size pages and deduplicated
//! again. Unassigned, private-use and surrogate planes collapse to a handful
//! of entries and a handful of repeated pages.

use std::collections::HashMap;
use std::hash::Hash;

use anyhow::{Result, ensure};

pub const PAGE_SIZE: usize = 128;

/// The compressed table. Lookup for position `i`:
/// `entries[index[page_offsets[i / page_size] + i % page_size]]`.
pub struct PagedTable<T> {
    /// First-seen-ordered unique values.
    pub entries: Vec<T>,
    /// Deduplicated pages of entry indices, flattened.
    pub index: Vec<u32>,
    /// For each input page, the offset of its index run within `index`.
    pub page_offsets: Vec<u32>,
    page_size: usize,
}

impl<T: Clone + Eq + Hash> PagedTable<T> {
    pub fn build(values: &[T], page_size: usize) -> Self {
        let (entries, positions) = dedup_with_index(values);

        let mut cache: HashMap<&[u32], u32> = HashMap::new();
        let mut index = Vec::new();
        let mut page_offsets = Vec::with_capacity(positions.len().div_ceil(page_size));

        // A final short chunk is a page of its own; it never collides with a
        // full page because the dedup key is the whole index sequence.
        for chunk in positions.chunks(page_size) {
            let offset = match cache.get(chunk) {
                Some(&offset) => offset,
                None => {
                    let offset = index.len() as u32;
                    index.extend_from_slice(chunk);
                    cache.insert(chunk, offset);
                    offset
                }
            };
            page_offsets.push(offset);
        }

        Self {
            entries,
            index,
            page_offsets,
            page_size,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn lookup(&self, position: usize) -> &T {
        let offset = self.page_offsets[position / self.page_size] as usize;
        let entry = self.index[offset + position % self.page_size] as usize;
        &self.entries[entry]
    }

    /// Round-trip check: every input position must reconstruct to its
    /// original value. A mismatch is a bug in the deduplication logic, not
    /// bad input, so it's an internal fatal error.
    pub fn verify(&self, original: &[T]) -> Result<()> {
        for (position, value) in original.iter().enumerate() {
            ensure!(
                self.lookup(position) == value,
                "paged table failed to round-trip position {position:#x}"
            );
        }
        Ok(())
    }
}

/// Replaces each value with an index into a first-seen-ordered unique list.
fn dedup_with_index<T: Clone + Eq + Hash>(values: &[T]) -> (Vec<T>, Vec<u32>) {
    let mut seen: HashMap<&T, u32> = HashMap::new();
    let mut unique = Vec::new();
    let mut positions = Vec::with_capacity(values.len());

    for value in values {
        let position = match seen.get(value) {
            Some(&position) => position,
            None => {
                let position = unique.len() as u32;
                unique.push(value.clone());
                seen.insert(value, position);
                position
            }
        };
        positions.push(position);
    }

    (unique, positions)
}
