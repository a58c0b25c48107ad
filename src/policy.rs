//! Replacement policies.
//!
//! A policy is consulted only when every way at an address is occupied and
//! the key being written is not among them. It picks the way to evict.
//!
//! | Policy | Victim | Ordered by |
//! |--------|--------|------------|
//! | [`Lru`] | least recently used | `last_read` timestamp |
//! | [`Mru`] | most recently used | `last_read` timestamp |
//! | [`LruSequence`] | least recently used | logical `sequence` |
//! | [`MruSequence`] | most recently used | logical `sequence` |
//!
//! The sequence-ordered variants do not depend on clock resolution: many
//! accesses can share one `Instant` on a fast machine, but never one
//! sequence number. Prefer them whenever eviction order has to be exact.
//!
//! Ties are broken in favor of the lowest [`SetId`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::slot::{SetId, Slot};

/// Victim selection strategy.
pub trait ReplacementPolicy<K, V> {
    /// Chooses the way to evict.
    ///
    /// `candidates[set]` is the content of way `set` at a single address.
    /// Returns `None` only if every candidate is empty.
    /// Implementations must not assume anything about the keys.
    fn choose_victim(&self, candidates: &[Option<Slot<K, V>>]) -> Option<SetId>;
}

impl<K, V, P> ReplacementPolicy<K, V> for Box<P>
where
    P: ReplacementPolicy<K, V> + ?Sized,
{
    fn choose_victim(&self, candidates: &[Option<Slot<K, V>>]) -> Option<SetId> {
        (**self).choose_victim(candidates)
    }
}

impl<K, V, P> ReplacementPolicy<K, V> for &P
where
    P: ReplacementPolicy<K, V> + ?Sized,
{
    fn choose_victim(&self, candidates: &[Option<Slot<K, V>>]) -> Option<SetId> {
        (**self).choose_victim(candidates)
    }
}

#[derive(Debug, Copy, Clone)]
enum Pick {
    Oldest,
    Newest,
}

/// Returns the occupied way with the smallest (`Oldest`) or largest
/// (`Newest`) rank; the first such way on ties.
fn pick_by<K, V, T, F>(candidates: &[Option<Slot<K, V>>], pick: Pick, rank: F) -> Option<SetId>
where
    T: Ord,
    F: Fn(&Slot<K, V>) -> T,
{
    let ranked = candidates
        .iter()
        .enumerate()
        .filter_map(|(set, slot)| slot.as_ref().map(|slot| (set, rank(slot))));

    // `min_by` keeps the first of equal elements.
    let best = match pick {
        Pick::Oldest => ranked.min_by(|a, b| a.1.cmp(&b.1)),
        Pick::Newest => ranked.min_by(|a, b| b.1.cmp(&a.1)),
    };
    best.map(|(set, _)| set)
}

/// Evicts the way read longest ago (by wall-clock time).
#[derive(Debug, Default, Copy, Clone)]
pub struct Lru;

impl<K, V> ReplacementPolicy<K, V> for Lru {
    fn choose_victim(&self, candidates: &[Option<Slot<K, V>>]) -> Option<SetId> {
        pick_by(candidates, Pick::Oldest, Slot::last_read)
    }
}

/// Evicts the way read most recently (by wall-clock time).
#[derive(Debug, Default, Copy, Clone)]
pub struct Mru;

impl<K, V> ReplacementPolicy<K, V> for Mru {
    fn choose_victim(&self, candidates: &[Option<Slot<K, V>>]) -> Option<SetId> {
        pick_by(candidates, Pick::Newest, Slot::last_read)
    }
}

/// Evicts the way with the oldest logical access sequence.
#[derive(Debug, Default, Copy, Clone)]
pub struct LruSequence;

impl<K, V> ReplacementPolicy<K, V> for LruSequence {
    fn choose_victim(&self, candidates: &[Option<Slot<K, V>>]) -> Option<SetId> {
        pick_by(candidates, Pick::Oldest, Slot::sequence)
    }
}

/// Evicts the way with the newest logical access sequence.
#[derive(Debug, Default, Copy, Clone)]
pub struct MruSequence;

impl<K, V> ReplacementPolicy<K, V> for MruSequence {
    fn choose_victim(&self, candidates: &[Option<Slot<K, V>>]) -> Option<SetId> {
        pick_by(candidates, Pick::Newest, Slot::sequence)
    }
}

/// Any of the built-in policies, selectable at runtime.
///
/// ```
/// use nway_cache::policy::Policy;
///
/// let policy: Policy = "lru-seq".parse().unwrap();
/// assert_eq!(policy, Policy::LruSequence);
/// assert_eq!(policy.to_string(), "lru-seq");
/// ```
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Policy {
    Lru,
    Mru,
    #[default]
    LruSequence,
    MruSequence,
}

impl Policy {
    pub const ALL: [Policy; 4] = [Policy::Lru, Policy::Mru, Policy::LruSequence, Policy::MruSequence];

    pub fn name(self) -> &'static str {
        match self {
            Policy::Lru => "lru",
            Policy::Mru => "mru",
            Policy::LruSequence => "lru-seq",
            Policy::MruSequence => "mru-seq",
        }
    }
}

impl<K, V> ReplacementPolicy<K, V> for Policy {
    fn choose_victim(&self, candidates: &[Option<Slot<K, V>>]) -> Option<SetId> {
        match self {
            Policy::Lru => Lru.choose_victim(candidates),
            Policy::Mru => Mru.choose_victim(candidates),
            Policy::LruSequence => LruSequence.choose_victim(candidates),
            Policy::MruSequence => MruSequence.choose_victim(candidates),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown replacement policy '{0}' (expected one of: lru, mru, lru-seq, mru-seq)")]
pub struct UnknownPolicy(pub String);

impl FromStr for Policy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lru" => Ok(Policy::Lru),
            "mru" => Ok(Policy::Mru),
            "lru-seq" | "lru-sequence" => Ok(Policy::LruSequence),
            "mru-seq" | "mru-sequence" => Ok(Policy::MruSequence),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}
