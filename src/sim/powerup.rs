//! Power-up kinds and the table of caught power-ups
//!
//! At most one caught power-up per kind. Catching a kind that is already
//! active merges the remaining durations instead of stacking the effect.

use std::collections::BTreeMap;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, PlayerShip};
use super::world::LaserBudget;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Faster player movement for a while
    MovementSpeed,
    /// Raises the player laser cap
    FasterShots,
    /// Adds two diagonal lasers to every shot
    TripleShots,
}

impl PowerUpKind {
    /// Uniformly random kind
    pub fn roll(rng: &mut Pcg32) -> Self {
        match rng.random_range(0..=2) {
            0 => PowerUpKind::MovementSpeed,
            1 => PowerUpKind::FasterShots,
            _ => PowerUpKind::TripleShots,
        }
    }

    pub fn lifetime(self) -> Lifetime {
        match self {
            PowerUpKind::MovementSpeed => Lifetime::Ticks(MOVEMENT_SPEED_TICKS),
            PowerUpKind::FasterShots | PowerUpKind::TripleShots => Lifetime::Infinite,
        }
    }

    /// Apply the effect and report exactly what changed
    pub fn apply(self, player: Option<&mut PlayerShip>, lasers: &mut LaserBudget) -> Boost {
        let mut boost = Boost::NONE;
        match self {
            PowerUpKind::MovementSpeed => {
                if let Some(ship) = player {
                    ship.movement_speed *= MOVEMENT_SPEED_BOOST;
                    boost.speed_factor = MOVEMENT_SPEED_BOOST;
                }
            }
            PowerUpKind::FasterShots => {
                let raised = (lasers.player_cap as f32 * FASTER_SHOTS_SCALE) as u32;
                boost.laser_cap_delta = raised.saturating_sub(lasers.player_cap);
                lasers.player_cap = raised;
            }
            PowerUpKind::TripleShots => {
                let raised = lasers.player_cap * TRIPLE_SHOTS_SCALE;
                boost.laser_cap_delta = raised - lasers.player_cap;
                lasers.player_cap = raised;
                if let Some(ship) = player {
                    ship.triple_shots = true;
                    boost.triple_shots = true;
                }
            }
        }
        boost
    }

    /// Undo a previously applied `boost`
    pub fn revert(self, boost: Boost, player: Option<&mut PlayerShip>, lasers: &mut LaserBudget) {
        lasers.player_cap = lasers.player_cap.saturating_sub(boost.laser_cap_delta);
        if let Some(ship) = player {
            ship.movement_speed /= boost.speed_factor;
            if boost.triple_shots {
                ship.triple_shots = false;
            }
        }
    }
}

/// Remaining duration of a caught power-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifetime {
    Ticks(u32),
    Infinite,
}

impl Lifetime {
    /// Combined duration when the same kind is caught again
    pub fn merge(self, other: Lifetime) -> Lifetime {
        match (self, other) {
            (Lifetime::Ticks(a), Lifetime::Ticks(b)) => Lifetime::Ticks(a.saturating_add(b)),
            _ => Lifetime::Infinite,
        }
    }
}

/// What a power-up changed when it was applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boost {
    /// Multiplier applied to the player's movement speed
    pub speed_factor: f32,
    /// Added to the player laser cap
    pub laser_cap_delta: u32,
    /// Whether triple-shot mode was switched on
    pub triple_shots: bool,
}

impl Boost {
    pub const NONE: Boost = Boost {
        speed_factor: 1.0,
        laser_cap_delta: 0,
        triple_shots: false,
    };
}

#[derive(Debug, Clone)]
pub struct CaughtPowerUp {
    pub id: EntityId,
    pub kind: PowerUpKind,
    pub remaining: Lifetime,
    pub boost: Boost,
    /// The caught entity, adopted once it leaves the main collection
    pub body: Option<Entity>,
}

/// Outcome of catching a power-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catch {
    /// First of its kind: the effect must be applied
    Registered,
    /// Merged into the active entry; the newcomer is discarded
    Merged,
}

#[derive(Debug, Clone, Default)]
pub struct PowerUps {
    caught: BTreeMap<PowerUpKind, CaughtPowerUp>,
}

impl PowerUps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catch(&mut self, id: EntityId, kind: PowerUpKind) -> Catch {
        if let Some(entry) = self.caught.get_mut(&kind) {
            entry.remaining = entry.remaining.merge(kind.lifetime());
            log::debug!("Merged {kind:?} power-up, remaining {:?}", entry.remaining);
            return Catch::Merged;
        }
        self.caught.insert(
            kind,
            CaughtPowerUp {
                id,
                kind,
                remaining: kind.lifetime(),
                boost: Boost::NONE,
                body: None,
            },
        );
        log::debug!("Caught {kind:?} power-up");
        Catch::Registered
    }

    pub fn record_boost(&mut self, kind: PowerUpKind, boost: Boost) {
        if let Some(entry) = self.caught.get_mut(&kind) {
            entry.boost = boost;
        }
    }

    /// Take ownership of a caught entity removed from the main collection
    pub fn adopt(&mut self, entity: Entity) {
        if let Some(entry) = self.caught.values_mut().find(|e| e.id == entity.id) {
            entry.body = Some(entity);
        }
    }

    /// Count down finite entries; returns the boosts of those that expired
    pub fn tick(&mut self) -> Vec<(PowerUpKind, Boost)> {
        let mut expired = Vec::new();
        self.caught.retain(|kind, entry| match &mut entry.remaining {
            Lifetime::Infinite => true,
            Lifetime::Ticks(left) => {
                *left = left.saturating_sub(1);
                if *left == 0 {
                    log::debug!("{kind:?} power-up expired");
                    expired.push((*kind, entry.boost));
                    false
                } else {
                    true
                }
            }
        });
        expired
    }

    pub fn get(&self, kind: PowerUpKind) -> Option<&CaughtPowerUp> {
        self.caught.get(&kind)
    }

    pub fn remaining(&self, kind: PowerUpKind) -> Option<Lifetime> {
        self.caught.get(&kind).map(|entry| entry.remaining)
    }

    pub fn len(&self) -> usize {
        self.caught.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caught.is_empty()
    }
}
