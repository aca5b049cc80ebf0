//! Multi-component queries (spec.md §4.4): a working bitset built once by
//! intersecting `active_entities` with every queried component's presence
//! bitset, then iterated by repeated trailing-zero extraction.
//!
//! `QueryTypes` is implemented for tuples of component types up to arity 8 by
//! the macro below — resolved entirely at compile time, matching spec.md
//! §9's "Query type lists" note: no string keys, no per-call heap
//! allocation, no runtime type map.

use crate::bitset::BitSet;
use crate::component::{ComponentAccess, EcsWorld};
use crate::entity::Entity;

/// A fixed, compile-time-specialized list of component types to intersect.
/// The empty tuple `()` matches every active entity (spec.md §4.4 edge
/// case).
pub trait QueryTypes<W, const WORDS: usize> {
    fn intersect(world: &W, bits: &mut BitSet<WORDS>);
}

impl<W, const WORDS: usize> QueryTypes<W, WORDS> for () {
    fn intersect(_world: &W, _bits: &mut BitSet<WORDS>) {}
}

macro_rules! impl_query_types {
    ($($t:ident),+) => {
        impl<W, const WORDS: usize, $($t),+> QueryTypes<W, WORDS> for ($($t,)+)
        where
            $(W: ComponentAccess<$t, WORDS>),+
        {
            fn intersect(world: &W, bits: &mut BitSet<WORDS>) {
                $(bits.intersect_with(<W as ComponentAccess<$t, WORDS>>::storage(world).presence());)+
            }
        }
    };
}

impl_query_types!(A);
impl_query_types!(A, B);
impl_query_types!(A, B, C);
impl_query_types!(A, B, C, D);
impl_query_types!(A, B, C, D, E);
impl_query_types!(A, B, C, D, E, F);
impl_query_types!(A, B, C, D, E, F, G);
impl_query_types!(A, B, C, D, E, F, G, H);

/// Transient iterator over the entities that satisfy a query, in strictly
/// ascending entity-ID order (spec.md §4.3 tie-break rule).
pub struct Query<'w, W, const WORDS: usize> {
    world: &'w W,
    bits: BitSet<WORDS>,
    remaining: BitSet<WORDS>,
}

impl<'w, W, const WORDS: usize> Query<'w, W, WORDS> {
    fn new(world: &'w W, bits: BitSet<WORDS>) -> Self {
        Self {
            world,
            bits,
            remaining: bits,
        }
    }

    pub fn count(&self) -> u32 {
        self.bits.count()
    }

    /// Restarts iteration from the smallest set bit without recomputing the
    /// intersection.
    pub fn reset(&mut self) {
        self.remaining = self.bits;
    }

    /// Reads a component for `e` via the same world reference the query was
    /// built from. Allowed for any `T` the world has, not just the ones in
    /// the query's own type list (spec.md §4.4), returning `None` if absent.
    pub fn get<T>(&self, e: Entity) -> Option<&T>
    where
        W: ComponentAccess<T, WORDS>,
    {
        self.world.storage().get(e)
    }
}

impl<'w, W, const WORDS: usize> Iterator for Query<'w, W, WORDS> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        let idx = self.remaining.next_set_from(0)?;
        self.remaining.clear(idx);
        Some(Entity(idx as u32))
    }
}

pub fn query<'w, W, Q, const WORDS: usize>(world: &'w W) -> Query<'w, W, WORDS>
where
    W: EcsWorld<WORDS>,
    Q: QueryTypes<W, WORDS>,
{
    let mut bits = *world.allocator().active_entities();
    Q::intersect(world, &mut bits);
    Query::new(world, bits)
}
