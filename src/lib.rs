//! A deterministic, bitset-backed ECS core with frame-granular snapshot and
//! rollback, built for lockstep simulation hosts (fighting games, RTS
//! netcode, replay systems).
//!
//! The crate is organized bottom-up:
//!
//! - [`bitset`] — fixed-capacity `BitSet<WORDS>`, the presence primitive
//!   every other module builds on.
//! - [`entity`] — entity handles and the cursor-scan [`entity::EntityAllocator`].
//! - [`component`] — per-type [`component::ComponentStorage`] and the generic
//!   entity/component operations [`define_world!`] wires up.
//! - [`query`] — compile-time-typed multi-component queries.
//! - [`world_macro`] — [`define_world!`], which generates one concrete world
//!   struct per registered component list.
//! - [`frame`] — [`frame::Frame`] and the non-rollback-aware [`frame::Ecs`]
//!   container.
//! - [`pool`] — [`pool::FramePool`], the allocation-reuse strategy behind
//!   rollback snapshotting.
//! - [`checksum`] — per-frame checksum helpers.
//! - [`rollback`] — [`rollback::RollbackManager`], the fixed-timestep driver
//!   and rollback/replay surface most hosts actually embed.
//! - [`error`] — the crate's error taxonomy.
//!
//! Everything here is deterministic and free of wall-clock time, threads, or
//! I/O: callers own the timestep, own the systems, and own transport. See
//! `SPEC_FULL.md` for the full contract.

pub mod bitset;
pub mod checksum;
pub mod component;
pub mod entity;
pub mod error;
pub mod frame;
pub mod pool;
pub mod query;
pub mod rollback;
pub mod world_macro;

pub use bitset::BitSet;
pub use component::{ComponentAccess, ComponentStorage, EcsWorld, WorldMeta};
pub use entity::{Entity, EntityAllocator, EntityLimit, INVALID_ENTITY};
pub use error::{EcsError, RollbackError};
pub use frame::{Ecs, Frame};
pub use pool::FramePool;
pub use query::{Query, QueryTypes};
pub use rollback::{RollbackConfig, RollbackManager, StoredFrame};
