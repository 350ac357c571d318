//! Game state and core simulation types
//!
//! Everything a run needs to be reproduced lives here: the entity collection,
//! the world context with its seeded random stream, and the wave spawner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::CollisionGrid;
use super::entity::{Entity, EntityId};
use super::wave::WaveSpawner;
use super::world::World;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Simulation advancing
    Running,
    /// Tick limit reached; the world is intact
    Finished,
    /// Player destroyed or an alien reached the bottom row
    GameOver,
}

/// Observable state at the end of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub running: bool,
    pub score: u32,
    pub iteration: u64,
    pub aliens: i32,
    pub wall_blocks: i32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Live entities in processing order
    pub entities: Vec<Entity>,
    /// Shared context: random stream, spawn queue, counters, power-ups
    pub world: World,
    pub(crate) grid: CollisionGrid,
    pub(crate) waves: WaveSpawner,
    /// Ticks completed
    pub(crate) iteration: u64,
    max_iterations: Option<u64>,
    display_info: bool,
    /// Reused buffer for per-entity collision points
    pub(crate) scratch_points: Vec<Vec2>,
}

impl GameState {
    /// A new game: starting aliens, the player and the first wall blocks,
    /// all queued to become live at the end of the first tick
    pub fn new(settings: &Settings) -> Self {
        let mut state = Self::empty(settings);
        let starting_aliens = settings.effective_starting_aliens();
        state.waves.spawn_aliens(starting_aliens, &mut state.world);
        let bounds = state.world.bounds();
        state.spawn_player(Vec2::new((settings.width / 2) as f32, bounds.y - 1.0));
        state.waves.spawn_wall_blocks(INITIAL_WALL_BLOCKS, &mut state.world);

        log::info!(
            "New game: {}x{} {} mode, seed {}, {} aliens and {} wall blocks queued",
            settings.width,
            settings.height,
            settings.difficulty().as_str(),
            settings.seed,
            state.world.aliens(),
            state.world.wall_blocks()
        );
        state
    }

    /// A world with nothing in it
    pub fn empty(settings: &Settings) -> Self {
        Self {
            entities: Vec::new(),
            world: World::new(settings),
            grid: CollisionGrid::default(),
            waves: WaveSpawner::new(settings),
            iteration: 0,
            max_iterations: settings.max_iterations.map(u64::from),
            display_info: settings.display_info,
            scratch_points: Vec::new(),
        }
    }

    /// Queue an entity; it becomes live at the next tick boundary
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        self.world.spawn(entity)
    }

    pub fn spawn_player(&mut self, pos: Vec2) -> EntityId {
        self.world.spawn(Entity::player(pos))
    }

    /// Live entity by id
    pub fn find(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn player(&self) -> Option<&Entity> {
        self.world.player_id.and_then(|id| self.find(id))
    }

    pub fn phase(&self) -> GamePhase {
        if self.world.is_game_over() {
            GamePhase::GameOver
        } else if self.max_iterations.is_some_and(|max| self.iteration >= max) {
            GamePhase::Finished
        } else {
            GamePhase::Running
        }
    }

    /// Neither game over nor past the tick limit
    pub fn is_running(&self) -> bool {
        self.phase() == GamePhase::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.world.is_game_over()
    }

    pub fn display_info(&self) -> bool {
        self.display_info
    }

    pub fn bounds(&self) -> Vec2 {
        self.world.bounds()
    }

    pub fn score(&self) -> u32 {
        self.world.score()
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn aliens(&self) -> i32 {
        self.world.aliens()
    }

    pub fn wall_blocks(&self) -> i32 {
        self.world.wall_blocks()
    }

    /// Current per-wave alien range
    pub fn wave_range(&self) -> (f32, f32) {
        self.waves.per_wave_range()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            running: self.is_running(),
            score: self.score(),
            iteration: self.iteration,
            aliens: self.aliens(),
            wall_blocks: self.wall_blocks(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityKind;

    #[test]
    fn test_new_game_queues_setup() {
        let state = GameState::new(&Settings::default());
        assert!(state.entities.is_empty());
        let pending = state.world.pending();
        let count = |kind: EntityKind| pending.iter().filter(|e| e.kind == kind).count();
        assert_eq!(count(EntityKind::Alien), 20);
        assert_eq!(count(EntityKind::Player), 1);
        assert_eq!(count(EntityKind::WallBlock), 10);
        assert_eq!(state.aliens(), 20);
        assert_eq!(state.wall_blocks(), 10);

        let player = pending.iter().find(|e| e.kind == EntityKind::Player).unwrap();
        assert_eq!(player.pos, Vec2::new(40.0, 27.0));
    }

    #[test]
    fn test_hard_mode_doubles_starting_aliens() {
        let settings = Settings {
            hard_mode: true,
            ..Default::default()
        };
        let state = GameState::new(&settings);
        assert_eq!(state.aliens(), 40);
        assert_eq!(state.wave_range(), (4.0, 8.0));
    }

    #[test]
    fn test_tick_limit_finishes_run() {
        let settings = Settings {
            max_iterations: Some(0),
            ..Default::default()
        };
        let state = GameState::empty(&settings);
        assert_eq!(state.phase(), GamePhase::Finished);
        assert!(!state.summary().running);
    }

    #[test]
    fn test_summary_serializes() {
        let state = GameState::new(&Settings::default());
        let json = serde_json::to_string(&state.summary()).unwrap();
        assert!(json.contains("\"aliens\":20"));
        assert!(json.contains("\"running\":true"));
    }
}
