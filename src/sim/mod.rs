//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One seeded random stream, consumed in a fixed order
//! - Stable iteration order (collection order, swap-with-last compaction)
//! - Spawns and removals deferred to the tick boundary
//! - No rendering or platform dependencies

pub mod allocator;
pub mod behavior;
pub mod blast;
pub mod collision;
pub mod entity;
pub mod input;
pub mod powerup;
pub mod state;
pub mod tick;
pub mod wave;
pub mod world;

pub use allocator::PositionAllocator;
pub use blast::{BlastRing, octant_points};
pub use collision::{CollisionGrid, Contact, ContactKind, contact, resolve_contact};
pub use entity::{Entity, EntityId, EntityKind, KindMask, Variant};
pub use input::{IdleInput, InputSource, RandomInput, ScriptedInput, TickInput};
pub use powerup::{Boost, Catch, Lifetime, PowerUpKind, PowerUps};
pub use state::{GamePhase, GameState, RunSummary};
pub use tick::tick;
pub use wave::WaveSpawner;
pub use world::{LaserBudget, PowerUpEffect, World};
