//! The cache facade.
//!
//! [`Cache`] ties together the configuration, the key encoder, the replacement
//! policy and the slot table:
//!
//! ```text
//!   write(key, value)
//!     │
//!     ├─ address = low bits of encode(key)
//!     │
//!     └─ try_insert(key, value, address)
//!          ├─ Inserted        → done
//!          ├─ Collision(set)  → update value in place
//!          └─ Full            → policy picks a victim way, replaced by (key, value)
//! ```
//!
//! The cache does not write through to any backing store: callers own
//! durability and must keep the cache up to date themselves.

use log::{debug, trace};

use crate::bytes::{ByteEncoder, NativeEncoder};
use crate::error::Result;
use crate::indexer;
use crate::memory::{InsertOutcome, SlotMemory};
use crate::options::Options;
use crate::policy::{LruSequence, ReplacementPolicy};

/// An n-way set-associative cache with strongly typed keys and values.
///
/// # Type Parameters
///
/// - `K`: Key type. Must be `Eq`, and encodable by `E`.
/// - `V`: Value type.
/// - `P`: Replacement policy, [`LruSequence`] by default.
/// - `E`: Key encoder, [`NativeEncoder`] by default.
///
/// # Example
///
/// ```
/// use nway_cache::cache::Cache;
/// use nway_cache::options::Options;
///
/// // 2 ways per address, 2^1 addresses.
/// let mut cache = Cache::<u32, &str>::new(Options::new(2, 1)?);
///
/// cache.write(1, "one")?;
/// cache.write(3, "three")?; // same address as 1
/// assert_eq!(cache.read(&1)?, Some(&"one"));
///
/// cache.write(5, "five")?; // evicts 3, read longest ago
/// assert_eq!(cache.read(&3)?, None);
/// assert_eq!(cache.read(&5)?, Some(&"five"));
/// # Ok::<(), nway_cache::error::CacheError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Cache<K, V, P = LruSequence, E = NativeEncoder> {
    options: Options,
    memory: SlotMemory<K, V>,
    policy: P,
    encoder: E,
}

impl<K, V> Default for Cache<K, V> {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl<K, V> Cache<K, V> {
    /// Creates a cache with the default policy and key encoding.
    pub fn new(options: Options) -> Self {
        Self::with_policy_and_encoder(options, LruSequence, NativeEncoder)
    }
}

impl<K, V, P> Cache<K, V, P> {
    /// Creates a cache using `policy` for eviction.
    pub fn with_policy(options: Options, policy: P) -> Self {
        Self::with_policy_and_encoder(options, policy, NativeEncoder)
    }
}

impl<K, V, P, E> Cache<K, V, P, E> {
    /// Creates a cache using `policy` for eviction and `encoder` for addressing.
    pub fn with_policy_and_encoder(options: Options, policy: P, encoder: E) -> Self {
        debug!(
            "Cache::new(sets = {}, address_bits = {})",
            options.num_sets(),
            options.address_bits()
        );
        Self {
            options,
            memory: SlotMemory::new(&options),
            policy,
            encoder,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the number of ways per address.
    pub fn num_sets(&self) -> usize {
        self.options.num_sets()
    }

    /// Returns the number of addresses.
    pub fn num_addresses(&self) -> usize {
        self.options.num_addresses()
    }

    /// Returns the total slot capacity (sets × addresses).
    pub fn capacity(&self) -> usize {
        self.options.capacity()
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Read-only view of the slot table, for inspecting slot metadata.
    pub fn memory(&self) -> &SlotMemory<K, V> {
        &self.memory
    }
}

impl<K, V, P, E> Cache<K, V, P, E>
where
    K: Eq,
    P: ReplacementPolicy<K, V>,
    E: ByteEncoder<K>,
{
    /// Computes the address of `key` in this cache.
    ///
    /// # Errors
    ///
    /// - [`CacheError::InvalidKey`][crate::error::CacheError::InvalidKey] if the encoder reports an absent key.
    /// - [`CacheError::AddressOutOfRange`][crate::error::CacheError::AddressOutOfRange] if the key
    ///   encoding has no more bits than the configured address bits.
    pub fn address_of(&self, key: &K) -> Result<usize> {
        indexer::address_with(key, self.options.address_bits(), &self.encoder)
    }

    /// Looks up `key`.
    ///
    /// Returns `Ok(None)` on a miss. A hit refreshes the slot's recency
    /// metadata, which the replacement policy may later rely on.
    ///
    /// # Errors
    ///
    /// Same as [`address_of`][Self::address_of].
    pub fn read(&mut self, key: &K) -> Result<Option<&V>> {
        let address = self.address_of(key)?;
        Ok(self.memory.find(key, address))
    }

    /// Stores `value` under `key`.
    ///
    /// If the key is already cached its value is overwritten. Otherwise the
    /// pair goes to a free way at the key's address, or, if there is none,
    /// replaces the way chosen by the replacement policy.
    ///
    /// # Errors
    ///
    /// Same as [`address_of`][Self::address_of]. Writing never fails for a
    /// valid key with one of the built-in policies.
    pub fn write(&mut self, key: K, value: V) -> Result<()> {
        let address = self.address_of(&key)?;
        match self.memory.try_insert(key, value, address) {
            InsertOutcome::Inserted(set) => {
                trace!("write(address = {}) -> inserted in set {}", address, set);
            }
            InsertOutcome::Collision { set, value, .. } => {
                trace!("write(address = {}) -> updated set {}", address, set);
                let previous = self.memory.update_in_place(set, address, value);
                debug_assert!(previous.is_some(), "collision reported on an empty way");
            }
            InsertOutcome::Full { key, value } => {
                let set = self.memory.replace(key, value, address, &self.policy)?;
                trace!("write(address = {}) -> replaced set {}", address, set);
            }
        }
        Ok(())
    }
}
