//! Slot table of the cache.
//!
//! [`SlotMemory`] owns every slot of a cache and implements the per-address
//! algorithm: lookup, insertion into a free way, collision detection and
//! eviction. It knows nothing about key encodings; every operation takes an
//! address computed beforehand by the [indexer][crate::indexer].
//!
//! # Layout
//!
//! The logical table is `num_sets × num_addresses`. It is stored as one flat
//! vector in address-major order, so the ways of one address are contiguous:
//!
//! ```text
//!   index = address * num_sets + set
//!
//!   [ a0:s0 a0:s1 .. a0:sN | a1:s0 a1:s1 .. a1:sN | ... ]
//!     └──── address 0 ────┘ └──── address 1 ────┘
//! ```
//!
//! This lets a replacement policy see all candidates of an address as a single
//! slice indexed by [`SetId`].
//!
//! # Lifecycle of a cell
//!
//! ```text
//!   Empty ──insert──▶ Occupied ──update──▶ Occupied (same key)
//!                        │
//!                        └──replace──▶ Occupied (new key)
//! ```
//!
//! The table is allocated once and never resized.

use log::{debug, trace};

use crate::error::{CacheError, Result};
use crate::options::Options;
use crate::policy::ReplacementPolicy;
use crate::slot::{SetId, Slot};

/// Result of [`SlotMemory::try_insert`].
///
/// When the pair was not stored, ownership of it goes back to the caller.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum InsertOutcome<K, V> {
    /// Stored in a previously empty way.
    Inserted(SetId),
    /// The key already occupies the given way; the caller should update it.
    Collision { set: SetId, key: K, value: V },
    /// Every way holds a different key; the caller should evict.
    Full { key: K, value: V },
}

/// Two-dimensional table of optional slots.
#[derive(Debug, Clone)]
pub struct SlotMemory<K, V> {
    slots: Vec<Option<Slot<K, V>>>,
    num_sets: usize,
    num_addresses: usize,
    sequence: u64,
}

impl<K, V> SlotMemory<K, V> {
    /// Allocates an empty table with the geometry of `options`.
    pub fn new(options: &Options) -> Self {
        let num_sets = options.num_sets();
        let num_addresses = options.num_addresses();
        debug!("SlotMemory::new(sets = {}, addresses = {})", num_sets, num_addresses);

        Self {
            slots: std::iter::repeat_with(|| None).take(num_sets * num_addresses).collect(),
            num_sets,
            num_addresses,
            sequence: 0,
        }
    }

    pub fn num_sets(&self) -> usize {
        self.num_sets
    }

    pub fn num_addresses(&self) -> usize {
        self.num_addresses
    }

    /// The ways at `address`, indexed by [`SetId`].
    pub fn ways(&self, address: usize) -> &[Option<Slot<K, V>>] {
        let start = address * self.num_sets;
        &self.slots[start..start + self.num_sets]
    }

    fn index(&self, set: SetId, address: usize) -> usize {
        debug_assert!(set < self.num_sets);
        debug_assert!(address < self.num_addresses);
        address * self.num_sets + set
    }

    /// Returns the slot at `(set, address)` without touching its metadata.
    pub fn slot(&self, set: SetId, address: usize) -> Option<&Slot<K, V>> {
        self.slots[self.index(set, address)].as_ref()
    }

    /// Number of occupied ways at `address`.
    pub fn occupied(&self, address: usize) -> usize {
        self.ways(address).iter().filter(|slot| slot.is_some()).count()
    }

    /// Number of occupied slots in the whole table.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Returns the next logical access position.
    fn next_sequence(&mut self) -> u64 {
        let sequence = self.sequence;
        self.sequence += 1;
        sequence
    }

    /// Writes a fresh slot at `(set, address)`, dropping whatever was there.
    pub fn put(&mut self, set: SetId, address: usize, key: K, value: V) {
        let sequence = self.next_sequence();
        let index = self.index(set, address);
        self.slots[index] = Some(Slot::new(key, value, sequence));
    }

    /// Overwrites the value at `(set, address)`, keeping the key.
    ///
    /// Returns the previous value, or `None` (writing nothing) if the cell is empty.
    pub fn update_in_place(&mut self, set: SetId, address: usize, value: V) -> Option<V> {
        let index = self.index(set, address);
        let slot = self.slots[index].as_mut()?;
        trace!("update(set = {}, address = {})", set, address);
        Some(slot.update(value))
    }

    /// Asks `policy` for a victim among the ways at `address`.
    fn choose_victim<P>(&self, address: usize, policy: &P) -> Result<SetId>
    where
        P: ReplacementPolicy<K, V> + ?Sized,
    {
        let ways = self.ways(address);
        match policy.choose_victim(ways) {
            Some(set) if set < ways.len() && ways[set].is_some() => Ok(set),
            _ => Err(CacheError::NoCandidate { address }),
        }
    }

    /// Evicts the slot chosen by `policy` at `address` and returns its way,
    /// which is left empty.
    ///
    /// Only meaningful when every way at `address` is occupied.
    ///
    /// # Errors
    ///
    /// [`CacheError::NoCandidate`] if the policy picks no occupied way.
    pub fn evict_and_get_victim<P>(&mut self, address: usize, policy: &P) -> Result<SetId>
    where
        P: ReplacementPolicy<K, V> + ?Sized,
    {
        let victim = self.choose_victim(address, policy)?;
        let index = self.index(victim, address);
        self.slots[index] = None;
        debug!("evict(address = {}) -> set {}", address, victim);
        Ok(victim)
    }

    /// Replaces the slot chosen by `policy` at `address` with `(key, value)`
    /// in one step, so the cell is never observed empty.
    ///
    /// # Errors
    ///
    /// [`CacheError::NoCandidate`] if the policy picks no occupied way.
    pub fn replace<P>(&mut self, key: K, value: V, address: usize, policy: &P) -> Result<SetId>
    where
        P: ReplacementPolicy<K, V> + ?Sized,
    {
        let victim = self.choose_victim(address, policy)?;
        debug!("replace(address = {}) -> set {}", address, victim);
        self.put(victim, address, key, value);
        Ok(victim)
    }
}

impl<K: Eq, V> SlotMemory<K, V> {
    fn position(&self, key: &K, address: usize) -> Option<SetId> {
        self.ways(address)
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|slot| slot.key() == key))
    }

    /// Looks `key` up at `address`.
    ///
    /// On a hit the slot's read time, use count and sequence are refreshed.
    pub fn find(&mut self, key: &K, address: usize) -> Option<&V> {
        let Some(set) = self.position(key, address) else {
            trace!("find(address = {}) -> miss", address);
            return None;
        };
        trace!("find(address = {}) -> hit in set {}", address, set);

        let sequence = self.next_sequence();
        let index = self.index(set, address);
        self.slots[index].as_mut().map(|slot| slot.read(sequence))
    }

    /// Stores `(key, value)` in the first empty way at `address`, unless the
    /// key is already present there or no way is free.
    ///
    /// All ways are checked for the key before a free way is taken, so a key
    /// never occupies two ways of one address. Free ways are taken in
    /// ascending [`SetId`] order.
    pub fn try_insert(&mut self, key: K, value: V, address: usize) -> InsertOutcome<K, V> {
        if let Some(set) = self.position(&key, address) {
            trace!("try_insert(address = {}) -> collision in set {}", address, set);
            return InsertOutcome::Collision { set, key, value };
        }

        match self.ways(address).iter().position(Option::is_none) {
            Some(set) => {
                trace!("try_insert(address = {}) -> set {}", address, set);
                self.put(set, address, key, value);
                InsertOutcome::Inserted(set)
            }
            None => {
                trace!("try_insert(address = {}) -> full", address);
                InsertOutcome::Full { key, value }
            }
        }
    }
}
