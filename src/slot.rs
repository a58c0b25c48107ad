//! A single storage cell of the cache.

use std::time::Instant;

/// Index of a way (associativity set) at an address, in `0..num_sets`.
pub type SetId = usize;

/// An occupied cache slot: one key/value pair plus access metadata.
///
/// The key never changes after creation. The value changes in place on
/// same-key writes; the slot itself is only dropped by eviction.
#[derive(Debug, Clone)]
pub struct Slot<K, V> {
    key: K,
    value: V,
    created: Instant,
    last_modified: Instant,
    last_read: Instant,
    use_count: u64,
    sequence: u64,
}

impl<K, V> Slot<K, V> {
    /// Creates a fresh slot stamped with the given logical `sequence`.
    pub fn new(key: K, value: V, sequence: u64) -> Self {
        let now = Instant::now();
        Self {
            key,
            value,
            created: now,
            last_modified: now,
            last_read: now,
            use_count: 0,
            sequence,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value without touching any metadata.
    pub fn peek(&self) -> &V {
        &self.value
    }

    /// When the slot was first written.
    pub fn created(&self) -> Instant {
        self.created
    }

    /// When the value last changed.
    pub fn last_modified(&self) -> Instant {
        self.last_modified
    }

    /// When the slot was last read (or created, if never read).
    pub fn last_read(&self) -> Instant {
        self.last_read
    }

    /// Number of read hits on this slot.
    pub fn use_count(&self) -> u64 {
        self.use_count
    }

    /// Logical position of the last read or the creation, relative to every
    /// other access of the same cache.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Records a read hit at logical position `sequence` and returns the value.
    pub(crate) fn read(&mut self, sequence: u64) -> &V {
        self.last_read = Instant::now();
        self.use_count += 1;
        self.sequence = sequence;
        &self.value
    }

    /// Replaces the value, keeping the key, and returns the previous value.
    pub(crate) fn update(&mut self, value: V) -> V {
        self.last_modified = Instant::now();
        std::mem::replace(&mut self.value, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_slot() {
        let slot = Slot::new("k", 1, 7);
        assert_eq!(*slot.key(), "k");
        assert_eq!(*slot.peek(), 1);
        assert_eq!(slot.use_count(), 0);
        assert_eq!(slot.sequence(), 7);
        assert_eq!(slot.created(), slot.last_modified());
        assert_eq!(slot.created(), slot.last_read());
    }

    #[test]
    fn test_read_updates_metadata() {
        let mut slot = Slot::new(1u32, "a", 0);
        let created = slot.created();

        assert_eq!(*slot.read(5), "a");
        assert_eq!(*slot.read(9), "a");

        assert_eq!(slot.use_count(), 2);
        assert_eq!(slot.sequence(), 9);
        assert!(slot.last_read() >= created);
        assert_eq!(slot.last_modified(), created);
    }

    #[test]
    fn test_update_keeps_key_and_read_metadata() {
        let mut slot = Slot::new(1u32, 10, 3);
        slot.read(4);
        let last_read = slot.last_read();

        assert_eq!(slot.update(20), 10);

        assert_eq!(*slot.key(), 1);
        assert_eq!(*slot.peek(), 20);
        assert_eq!(slot.use_count(), 1);
        assert_eq!(slot.sequence(), 4);
        assert_eq!(slot.last_read(), last_read);
        assert!(slot.last_modified() >= slot.created());
    }
}
