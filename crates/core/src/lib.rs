//! Shared identity types and tuning constants for the durachok backend.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

/// Typed identifier: a UUID tagged with the entity it names, so a room id
/// can never be handed to something expecting a player id.
///
/// The trait impls below are written by hand: derives would demand the same
/// traits of the marker type `T`, which is a zero-sized tag and has none.
pub struct ID<T> {
    uuid: uuid::Uuid,
    tag: PhantomData<T>,
}

impl<T> ID<T> {
    fn tagged(uuid: uuid::Uuid) -> Self {
        Self {
            uuid,
            tag: PhantomData,
        }
    }
    pub fn uuid(&self) -> uuid::Uuid {
        self.uuid
    }
    /// Re-tags the identifier: auth hands out member ids, the rooms and the
    /// matchmaker speak player ids for the same uuid.
    pub fn cast<U>(self) -> ID<U> {
        ID::tagged(self.uuid)
    }
}

impl<T> From<uuid::Uuid> for ID<T> {
    fn from(uuid: uuid::Uuid) -> Self {
        Self::tagged(uuid)
    }
}

/// Fresh ids are time-ordered (v7), so creation order survives into the
/// database for free.
impl<T> Default for ID<T> {
    fn default() -> Self {
        Self::tagged(uuid::Uuid::now_v7())
    }
}

impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        Self::tagged(self.uuid)
    }
}
impl<T> Copy for ID<T> {}

impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}
impl<T> Eq for ID<T> {}

// Ordered and hashable by the raw uuid: the rules engine and matchmaker
// keep ids in BTree collections so snapshots serialize deterministically.
impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.uuid.cmp(&other.uuid)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<T> Hash for ID<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uuid.hash(state);
    }
}

impl<T> fmt::Debug for ID<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID({})", self.uuid)
    }
}
impl<T> fmt::Display for ID<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uuid)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.uuid.serialize(serializer)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        uuid::Uuid::deserialize(deserializer).map(Self::tagged)
    }
}

// ============================================================================
// GAME PARAMETERS
// ============================================================================
/// Cards dealt to each player, and the refill target between rounds.
pub const HAND_SIZE: usize = 6;
/// Maximum attack slots on the table in any round.
pub const TABLE_LIMIT: usize = 6;

// ============================================================================
// RUNTIME PARAMETERS
// ============================================================================
/// Session token lifetime.
pub const SESSION_TTL: std::time::Duration = std::time::Duration::from_secs(2 * 60 * 60);
/// Lifetime of a matchmaker player → room binding.
pub const MATCH_TTL: std::time::Duration = std::time::Duration::from_secs(5 * 60);
/// A room with no attached sockets for this long is evicted from memory.
/// Its persisted snapshot survives and is rehydrated on the next attach.
pub const IDLE_EVICTION: std::time::Duration = std::time::Duration::from_secs(30 * 60);
/// Hard deadline on a snapshot write; exceeding it fails the originating event.
pub const PERSIST_DEADLINE: std::time::Duration = std::time::Duration::from_secs(5);
/// Additional attempts for a failed socket write during broadcast.
pub const BROADCAST_RETRIES: usize = 1;
