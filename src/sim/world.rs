//! Shared per-tick context handed to entity hooks
//!
//! Entities never touch each other directly. Anything that reaches beyond the
//! entity itself (spawning, scoring, counters, the random stream, power-up
//! effects) goes through `World`, and structural changes are only queued here
//! until the controller applies them at the tick boundary.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::{Entity, EntityId, EntityKind};
use super::input::TickInput;
use super::powerup::{Boost, Catch, PowerUpKind, PowerUps};
use crate::consts::*;
use crate::settings::{Difficulty, Settings};

/// Live-laser counters and caps per side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaserBudget {
    pub player_live: u32,
    pub alien_live: u32,
    pub player_cap: u32,
    pub alien_cap: u32,
}

impl LaserBudget {
    pub fn new(player_cap: u32, alien_cap: u32) -> Self {
        Self {
            player_live: 0,
            alien_live: 0,
            player_cap,
            alien_cap,
        }
    }

    /// Whether `count` more lasers of `kind` fit under the cap
    pub fn can_spawn(&self, kind: EntityKind, count: u32) -> bool {
        match kind {
            EntityKind::PlayerLaser => self.player_live + count <= self.player_cap,
            EntityKind::AlienLaser => self.alien_live + count <= self.alien_cap,
            _ => false,
        }
    }

    fn take(&mut self, kind: EntityKind) {
        match kind {
            EntityKind::PlayerLaser => self.player_live += 1,
            EntityKind::AlienLaser => self.alien_live += 1,
            _ => {}
        }
    }

    fn give_back(&mut self, kind: EntityKind) {
        match kind {
            EntityKind::PlayerLaser => self.player_live = self.player_live.saturating_sub(1),
            EntityKind::AlienLaser => self.alien_live = self.alien_live.saturating_sub(1),
            _ => {}
        }
    }
}

/// Power-up effect waiting for the controller to reach the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PowerUpEffect {
    Activate(PowerUpKind),
    Expire(PowerUpKind, Boost),
}

#[derive(Debug, Clone)]
pub struct World {
    bounds: Vec2,
    difficulty: Difficulty,
    friendly_fire: bool,
    rng: Pcg32,
    /// Spawn requests, applied at the tick boundary
    pending: Vec<Entity>,
    next_id: u32,
    input: TickInput,
    pub lasers: LaserBudget,
    pub power_ups: PowerUps,
    pub(crate) effects: Vec<PowerUpEffect>,
    score: u32,
    aliens: i32,
    wall_blocks: i32,
    game_over: bool,
    pub(crate) player_id: Option<EntityId>,
}

impl World {
    pub fn new(settings: &Settings) -> Self {
        let difficulty = settings.difficulty();
        Self {
            bounds: settings.world_bounds(),
            difficulty,
            friendly_fire: settings.aliens_friendly_fire,
            rng: Pcg32::seed_from_u64(settings.seed),
            pending: Vec::new(),
            next_id: 1,
            input: TickInput::default(),
            lasers: LaserBudget::new(MAX_PLAYER_LASERS, difficulty.max_alien_lasers()),
            power_ups: PowerUps::new(),
            effects: Vec::new(),
            score: 0,
            aliens: 0,
            wall_blocks: 0,
            game_over: false,
            player_id: None,
        }
    }

    /// Playable area; positions with `y >= bounds.y` are off the field
    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn friendly_fire(&self) -> bool {
        self.friendly_fire
    }

    pub fn input(&self) -> &TickInput {
        &self.input
    }

    pub(crate) fn set_input(&mut self, input: TickInput) {
        self.input = input;
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Uniform integer in `min..=max`
    pub fn random_int(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    /// Uniform float in `min..max`
    pub fn random_float(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..max)
    }

    /// Queue an entity; it becomes live at the next tick boundary
    pub fn spawn(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        entity.id = id;
        if entity.kind == EntityKind::Player {
            self.player_id = Some(id);
        }
        self.pending.push(entity);
        id
    }

    /// Queue a laser and take its budget slot
    pub fn spawn_laser(&mut self, laser: Entity) -> EntityId {
        self.lasers.take(laser.kind);
        self.spawn(laser)
    }

    /// Return a destroyed or expired laser's budget slot
    pub fn despawn_laser(&mut self, kind: EntityKind) {
        self.lasers.give_back(kind);
    }

    pub fn can_spawn_lasers(&self, kind: EntityKind, count: u32) -> bool {
        self.lasers.can_spawn(kind, count)
    }

    pub(crate) fn take_pending(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[Entity] {
        &self.pending
    }

    pub fn add_score(&mut self, points: u32) {
        self.score += points;
    }

    pub fn notify_game_over(&mut self) {
        if !self.game_over {
            log::info!("Game over with score {}", self.score);
        }
        self.game_over = true;
    }

    pub fn notify_alien_spawned(&mut self) {
        self.aliens += 1;
    }

    pub fn notify_alien_destroyed(&mut self) {
        self.aliens -= 1;
    }

    pub fn notify_wall_block_spawned(&mut self) {
        self.wall_blocks += 1;
    }

    pub fn notify_wall_block_destroyed(&mut self) {
        self.wall_blocks -= 1;
    }

    /// Register a caught power-up and queue its effect when it is new
    pub fn catch_power_up(&mut self, id: EntityId, kind: PowerUpKind) -> Catch {
        let outcome = self.power_ups.catch(id, kind);
        if outcome == Catch::Registered {
            self.effects.push(PowerUpEffect::Activate(kind));
        }
        outcome
    }

    pub fn strong_alien_lasers(&self) -> bool {
        self.difficulty.strong_alien_lasers()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn aliens(&self) -> i32 {
        self.aliens
    }

    pub fn wall_blocks(&self) -> i32 {
        self.wall_blocks
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }
}
