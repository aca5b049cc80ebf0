//! Per-component-type dense storage (spec.md §4.2) and the generic
//! entity/component API (spec.md §4.3) that `define_world!`-generated worlds
//! delegate to.
//!
//! The generic functions here (`add_component`, `get_component`, ...) are
//! written once, parameterized over `<W, T, const WORDS: usize>`, and are
//! monomorphized per concrete world by the macro — this is the
//! "compile-time type-indexed storage" strategy spec.md §9 calls for:
//! every call site resolves to a dedicated, non-branching instantiation, with
//! no runtime type map anywhere on the hot path.

use crate::bitset::BitSet;
use crate::entity::{Entity, EntityAllocator};
use crate::error::EcsError;

/// Dense/sparse storage for one component type, bitset-indexed per spec.md
/// §4.2. Mirrors the teacher's `ComponentStore<T>` (generation-free sparse
/// array) but replaces its implicit "0 means empty" sparse slot convention
/// with the explicit presence `BitSet<WORDS>` the distilled spec requires, so
/// `has`/`entity_bitset` are the same bit, not two data structures that can
/// drift apart.
#[derive(Debug)]
pub struct ComponentStorage<T, const WORDS: usize> {
    dense: Vec<T>,
    index_to_entity: Vec<Entity>,
    entity_to_index: Vec<u32>,
    present: BitSet<WORDS>,
}

impl<T, const WORDS: usize> ComponentStorage<T, WORDS> {
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            index_to_entity: Vec::new(),
            entity_to_index: vec![0u32; BitSet::<WORDS>::CAPACITY],
            present: BitSet::new(),
        }
    }

    pub fn presence(&self) -> &BitSet<WORDS> {
        &self.present
    }

    pub fn count(&self) -> usize {
        self.dense.len()
    }

    pub fn has(&self, e: Entity) -> bool {
        e.is_valid() && self.present.test(e.index())
    }

    /// No-op if `e` already has a component of this type (spec.md §4.2).
    pub fn add(&mut self, e: Entity, value: T) {
        if self.present.test(e.index()) {
            return;
        }
        let dense_index = self.dense.len() as u32;
        self.dense.push(value);
        self.index_to_entity.push(e);
        self.entity_to_index[e.index()] = dense_index;
        self.present.set(e.index());
    }

    pub fn get(&self, e: Entity) -> Option<&T> {
        if !self.has(e) {
            return None;
        }
        self.dense.get(self.entity_to_index[e.index()] as usize)
    }

    pub fn get_mut(&mut self, e: Entity) -> Option<&mut T> {
        if !self.has(e) {
            return None;
        }
        let i = self.entity_to_index[e.index()] as usize;
        self.dense.get_mut(i)
    }

    /// Swap-remove per spec.md §4.2: move the last dense element into the
    /// removed slot, fix up both lookup tables, then pop the tail.
    pub fn remove(&mut self, e: Entity) -> Option<T> {
        if !self.has(e) {
            return None;
        }
        let i = self.entity_to_index[e.index()] as usize;
        let last = self.dense.len() - 1;

        self.dense.swap(i, last);
        self.index_to_entity.swap(i, last);
        let removed = self.dense.pop();
        self.index_to_entity.pop();

        if i != last {
            let moved_entity = self.index_to_entity[i];
            self.entity_to_index[moved_entity.index()] = i as u32;
        }

        self.present.clear(e.index());
        removed
    }

    pub fn dense(&self) -> &[T] {
        &self.dense
    }

    pub fn dense_entities(&self) -> &[Entity] {
        &self.index_to_entity
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.index_to_entity.iter().copied().zip(self.dense.iter())
    }
}

impl<T, const WORDS: usize> Default for ComponentStorage<T, WORDS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, const WORDS: usize> Clone for ComponentStorage<T, WORDS> {
    fn clone(&self) -> Self {
        Self {
            dense: self.dense.clone(),
            index_to_entity: self.index_to_entity.clone(),
            entity_to_index: self.entity_to_index.clone(),
            present: self.present,
        }
    }

    /// Reuses `source`'s backing `Vec` allocations instead of allocating
    /// fresh ones, which is what makes [`crate::pool::FramePool`] worth
    /// having: `Vec::clone_from` keeps existing capacity and only
    /// resizes/overwrites the overlapping prefix.
    fn clone_from(&mut self, source: &Self) {
        self.dense.clone_from(&source.dense);
        self.index_to_entity.clone_from(&source.index_to_entity);
        self.entity_to_index.clone_from(&source.entity_to_index);
        self.present = source.present;
    }
}

/// Implemented once per `(World, ComponentType)` pair by `define_world!`.
/// `WORDS` is a trait parameter rather than an associated constant so the
/// generic free functions below can name it in their bounds; every impl the
/// macro emits fills it with the literal word count of that world's
/// `EntityLimit`.
pub trait ComponentAccess<T, const WORDS: usize> {
    fn storage(&self) -> &ComponentStorage<T, WORDS>;
    fn storage_mut(&mut self) -> &mut ComponentStorage<T, WORDS>;
}

/// Implemented once per world by `define_world!`, giving the generic ops
/// below access to the shared entity allocator.
pub trait EcsWorld<const WORDS: usize> {
    fn allocator(&self) -> &EntityAllocator<WORDS>;
    fn allocator_mut(&mut self) -> &mut EntityAllocator<WORDS>;
}

/// The slice of a world's surface `RollbackManager` needs without being
/// generic over its entity capacity: how many entities are currently alive,
/// for checksum mixing (spec.md §3). Implemented by `define_world!`.
pub trait WorldMeta {
    fn entity_count(&self) -> u32;
}

pub fn create_entity<W, const WORDS: usize>(world: &mut W) -> Result<Entity, EcsError>
where
    W: EcsWorld<WORDS>,
{
    world.allocator_mut().create()
}

pub fn add_component<W, T, const WORDS: usize>(
    world: &mut W,
    e: Entity,
    value: T,
) -> Result<(), EcsError>
where
    W: EcsWorld<WORDS> + ComponentAccess<T, WORDS>,
{
    if !world.allocator().is_alive(e) {
        return Err(EcsError::InvalidEntity(e));
    }
    world.storage_mut().add(e, value);
    Ok(())
}

pub fn get_component<W, T, const WORDS: usize>(world: &W, e: Entity) -> Option<&T>
where
    W: ComponentAccess<T, WORDS>,
{
    if !e.is_valid() {
        return None;
    }
    world.storage().get(e)
}

pub fn get_component_mut<W, T, const WORDS: usize>(world: &mut W, e: Entity) -> Option<&mut T>
where
    W: ComponentAccess<T, WORDS>,
{
    if !e.is_valid() {
        return None;
    }
    world.storage_mut().get_mut(e)
}

pub fn has_component<W, T, const WORDS: usize>(world: &W, e: Entity) -> bool
where
    W: ComponentAccess<T, WORDS>,
{
    e.is_valid() && world.storage().has(e)
}

pub fn remove_component<W, T, const WORDS: usize>(world: &mut W, e: Entity) -> bool
where
    W: ComponentAccess<T, WORDS>,
{
    if !e.is_valid() {
        return false;
    }
    world.storage_mut().remove(e).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Position {
        x: i32,
    }

    #[test]
    fn swap_remove_integrity() {
        // Scenario B from spec.md §8.
        let mut storage: ComponentStorage<Position, 1> = ComponentStorage::new();
        for i in 0..4u32 {
            storage.add(Entity(i), Position { x: i as i32 });
        }
        storage.remove(Entity(1));
        assert_eq!(storage.get(Entity(0)), Some(&Position { x: 0 }));
        assert_eq!(storage.get(Entity(2)), Some(&Position { x: 2 }));
        assert_eq!(storage.get(Entity(3)), Some(&Position { x: 3 }));
        assert_eq!(storage.get(Entity(1)), None);
        assert_eq!(storage.count(), 3);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut storage: ComponentStorage<Position, 1> = ComponentStorage::new();
        storage.add(Entity(0), Position { x: 1 });
        assert!(storage.remove(Entity(0)).is_some());
        assert!(storage.remove(Entity(0)).is_none());
        assert_eq!(storage.count(), 0);
    }

    #[test]
    fn add_is_a_noop_when_already_present() {
        let mut storage: ComponentStorage<Position, 1> = ComponentStorage::new();
        storage.add(Entity(0), Position { x: 1 });
        storage.add(Entity(0), Position { x: 999 });
        assert_eq!(storage.get(Entity(0)), Some(&Position { x: 1 }));
        assert_eq!(storage.count(), 1);
    }

    #[test]
    fn clone_from_reuses_capacity() {
        let mut a: ComponentStorage<Position, 1> = ComponentStorage::new();
        a.add(Entity(0), Position { x: 1 });
        a.add(Entity(1), Position { x: 2 });

        let mut b: ComponentStorage<Position, 1> = ComponentStorage::new();
        b.clone_from(&a);
        assert_eq!(b.get(Entity(0)), Some(&Position { x: 1 }));
        assert_eq!(b.get(Entity(1)), Some(&Position { x: 2 }));
        assert_eq!(b.count(), 2);
    }
}
