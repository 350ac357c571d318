//! Space Raiders - simulation core of a grid-based arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, waves, power-ups)
//! - `renderer`: Per-tick render frames and a plain-text canvas
//! - `settings`: Run configuration and difficulty tuning

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Difficulty, Settings, SettingsError};

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Largest accepted world width or height, in cells
    pub const MAX_WORLD_SIDE: u16 = 1024;

    /// Collision grid buckets, independent of world size
    pub const COLLISION_GRID_COLS: usize = 20;
    pub const COLLISION_GRID_ROWS: usize = 20;
    /// Midpoints closer than 0.8 cells count as a swept hit (0.8²)
    pub const SWEPT_HIT_DIST_SQ: f32 = 0.64;

    /// Ticks between spawn waves
    pub const WAVE_INTERVAL_TICKS: u32 = 50;
    pub const WALL_BLOCKS_PER_WAVE: i32 = 3;
    pub const INITIAL_WALL_BLOCKS: i32 = 10;
    pub const MAX_WALL_BLOCKS: i32 = 40;
    pub const MAX_ALIENS: i32 = 200;
    /// Per-wave alien range before escalation
    pub const MIN_ALIENS_PER_WAVE: f32 = 2.0;
    pub const MAX_ALIENS_PER_WAVE: f32 = 4.0;
    /// Upper bound for the per-wave maximum; the minimum is capped at half
    pub const ALIENS_PER_WAVE_CAP: f32 = 20.0;
    pub const WAVE_MIN_GROWTH: f32 = 0.10;
    pub const WAVE_MAX_GROWTH: f32 = 0.20;

    /// Aliens spawn in the top rows only
    pub const ALIEN_BAND_ROWS: i32 = 4;
    /// Wall blocks spawn everywhere except the bottom rows
    pub const WALL_BAND_BOTTOM_MARGIN: i32 = 6;

    pub const MAX_PLAYER_LASERS: u32 = 4;
    pub const MAX_ALIEN_LASERS: u32 = 10;

    pub const PLAYER_SPEED: f32 = 1.0;
    pub const ALIEN_SPEED_X: f32 = 0.5;
    pub const ALIEN_DRIFT_Y: f32 = 0.02;
    /// Detonating aliens descend this much faster than regular ones
    pub const DETONATOR_DRIFT_SCALE: f32 = 3.0;
    pub const ALIEN_FIRE_CHANCE: f32 = 0.5;
    /// Upper bound of the per-tick energy gain
    pub const ALIEN_ENERGY_GAIN: f32 = 0.02;
    pub const POWER_UP_FALL_SPEED: f32 = 0.5;

    pub const ALIEN_SCORE: u32 = 10;
    pub const UPGRADED_ALIEN_SCORE: u32 = 20;
    /// One in this many destroyed aliens drops a power-up
    pub const POWER_UP_DROP_ODDS: i32 = 10;
    /// Alien lasers below this force bounce off wall blocks
    pub const STRONG_LASER_FORCE: i32 = 5;

    pub const EXPLOSION_TICKS: u32 = 5;
    pub const BLAST_CELL_TICKS: u32 = 1;
    /// Largest ring radius of a detonation sequence
    pub const BLAST_MAX_RADIUS: i32 = 13;

    pub const MOVEMENT_SPEED_TICKS: u32 = 300;
    pub const MOVEMENT_SPEED_BOOST: f32 = 1.5;
    pub const FASTER_SHOTS_SCALE: f32 = 1.5;
    pub const TRIPLE_SHOTS_SCALE: u32 = 3;
}

/// Integer grid cell containing a position
#[inline]
pub fn cell_of(pos: Vec2) -> IVec2 {
    pos.floor().as_ivec2()
}

/// Midpoint of the last motion segment, measured between whole cells
#[inline]
pub fn sweep_midpoint(prev: Vec2, pos: Vec2) -> Vec2 {
    (prev.floor() + pos.floor()) * 0.5
}
