//! Entity identity and the cursor-scan allocator.

use serde::{Deserialize, Serialize};

use crate::bitset::BitSet;
use crate::error::EcsError;

/// Opaque entity handle in `[0, N)`. `u32` is plenty for the largest
/// supported [`EntityLimit`] (4096) and keeps every storage index cheap to
/// copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Entity(pub u32);

/// Sentinel meaning "no entity". Resolves an ambiguity in the distilled spec
/// (`INVALID_ENTITY = max`): rather than tying the sentinel to a particular
/// `EntityLimit`, it is fixed at the type's maximum so it compares unequal to
/// every valid entity regardless of which limit a world was configured with.
pub const INVALID_ENTITY: Entity = Entity(u32::MAX);

impl Default for Entity {
    fn default() -> Self {
        INVALID_ENTITY
    }
}

impl Entity {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self != INVALID_ENTITY
    }
}

/// Configuration-time entity capacity. The enum form keeps the set of valid
/// capacities closed (matches spec.md §3: `N ∈ {64, 256, 512, 1024, 2048,
/// 4096}`) while still being a plain value a host can load from config.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityLimit {
    N64,
    N256,
    N512,
    N1024,
    N2048,
    N4096,
}

impl EntityLimit {
    pub const fn capacity(self) -> usize {
        match self {
            EntityLimit::N64 => 64,
            EntityLimit::N256 => 256,
            EntityLimit::N512 => 512,
            EntityLimit::N1024 => 1024,
            EntityLimit::N2048 => 2048,
            EntityLimit::N4096 => 4096,
        }
    }

    pub const fn words(self) -> usize {
        self.capacity() / 64
    }
}

/// Cursor-scan entity allocator shared by every generated world type,
/// regardless of which component types it stores.
///
/// IDs are not recycled below `next_entity` within a single run: this is an
/// acknowledged limitation carried over from the source design (spec.md §9)
/// rather than a bug. `destroy_entity` only clears the bit; it never lowers
/// `next_entity`.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntityAllocator<const WORDS: usize> {
    active: BitSet<WORDS>,
    next_entity: u32,
    entity_count: u32,
}

impl<const WORDS: usize> EntityAllocator<WORDS> {
    pub const fn new() -> Self {
        Self {
            active: BitSet::new(),
            next_entity: 0,
            entity_count: 0,
        }
    }

    pub fn active_entities(&self) -> &BitSet<WORDS> {
        &self.active
    }

    pub fn entity_count(&self) -> u32 {
        self.entity_count
    }

    pub fn is_alive(&self, e: Entity) -> bool {
        e.is_valid() && self.active.test(e.index())
    }

    /// Smallest index `e >= next_entity` with the bit clear. Fails once every
    /// slot below the capacity is taken.
    pub fn create(&mut self) -> Result<Entity, EcsError> {
        let capacity = BitSet::<WORDS>::CAPACITY;
        let mut candidate = self.next_entity as usize;
        while candidate < capacity && self.active.test(candidate) {
            candidate += 1;
        }
        if candidate >= capacity {
            return Err(EcsError::EntityLimitExceeded { capacity });
        }

        self.active.set(candidate);
        self.entity_count += 1;
        self.next_entity = candidate as u32 + 1;
        Ok(Entity(candidate as u32))
    }

    /// Clears the entity's presence bit. Returns whether it was previously
    /// alive; callers are responsible for swap-removing the entity from every
    /// component storage before or after calling this (order does not matter
    /// since storages track their own presence independently).
    pub fn destroy(&mut self, e: Entity) -> bool {
        if !self.is_alive(e) {
            return false;
        }
        self.active.clear(e.index());
        self.entity_count -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_ascending_ids() {
        let mut alloc: EntityAllocator<1> = EntityAllocator::new();
        assert_eq!(alloc.create().unwrap(), Entity(0));
        assert_eq!(alloc.create().unwrap(), Entity(1));
        assert_eq!(alloc.entity_count(), 2);
    }

    #[test]
    fn fails_past_capacity() {
        let mut alloc: EntityAllocator<1> = EntityAllocator::new();
        for _ in 0..64 {
            alloc.create().unwrap();
        }
        assert!(matches!(
            alloc.create(),
            Err(EcsError::EntityLimitExceeded { capacity: 64 })
        ));
    }

    #[test]
    fn destroy_does_not_recycle_below_next_entity() {
        let mut alloc: EntityAllocator<1> = EntityAllocator::new();
        let e0 = alloc.create().unwrap();
        let _e1 = alloc.create().unwrap();
        assert!(alloc.destroy(e0));
        // Known limitation: the next allocation continues forward, it does
        // not reuse the freed slot 0.
        let e2 = alloc.create().unwrap();
        assert_eq!(e2, Entity(2));
        assert!(!alloc.is_alive(e0));
    }

    #[test]
    fn destroy_is_not_idempotent_past_the_first_call() {
        let mut alloc: EntityAllocator<1> = EntityAllocator::new();
        let e0 = alloc.create().unwrap();
        assert!(alloc.destroy(e0));
        assert!(!alloc.destroy(e0));
    }
}
