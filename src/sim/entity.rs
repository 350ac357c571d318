//! Entity model: one flattened entity type with kind-specific data
//!
//! Every entity carries the shared collision attributes (health, strike force,
//! acceptance mask) plus a `Variant` holding whatever its kind needs on top.
//! Behavior lives in `behavior.rs`.

use std::f32::consts::FRAC_1_SQRT_2;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::blast::BlastRing;
use super::powerup::PowerUpKind;
use crate::consts::*;

/// Entity type tag; the discriminant is the bit index in acceptance masks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EntityKind {
    Player = 0,
    Alien = 1,
    PlayerLaser = 2,
    AlienLaser = 3,
    Explosion = 4,
    WallBlock = 5,
    PowerUp = 6,
    ExplosionCell = 7,
}

impl EntityKind {
    #[inline]
    pub const fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// Set of attacker kinds allowed to damage an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KindMask(u32);

impl KindMask {
    pub const NONE: KindMask = KindMask(0);

    pub const fn of(kinds: &[EntityKind]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < kinds.len() {
            bits |= kinds[i].bit();
            i += 1;
        }
        KindMask(bits)
    }

    #[inline]
    pub fn contains(self, kind: EntityKind) -> bool {
        self.0 & kind.bit() != 0
    }

    #[inline]
    pub fn without(self, kind: EntityKind) -> Self {
        KindMask(self.0 & !kind.bit())
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

/// Render glyphs
pub mod glyph {
    pub const PLAYER: char = 'P';
    pub const ALIEN: char = 'A';
    pub const UPGRADED_ALIEN: char = 'B';
    pub const DETONATING_ALIEN: char = 'E';
    pub const PLAYER_LASER: char = '^';
    pub const PLAYER_LASER_DIAGONAL: char = 'o';
    pub const ALIEN_LASER: char = '|';
    pub const STRONG_ALIEN_LASER: char = 'w';
    pub const EXPLOSION: char = '*';
    pub const WALL_BLOCK: char = 'X';
    pub const POWER_UP: char = '7';
    pub const BLAST_CELL: char = '+';
}

const PLAYER_ACCEPTS: KindMask = KindMask::of(&[
    EntityKind::AlienLaser,
    EntityKind::Alien,
    EntityKind::PowerUp,
    EntityKind::ExplosionCell,
]);
const ALIEN_ACCEPTS: KindMask = KindMask::of(&[
    EntityKind::AlienLaser,
    EntityKind::PlayerLaser,
    EntityKind::Player,
    EntityKind::ExplosionCell,
]);
const LASER_ACCEPTS: KindMask = KindMask::of(&[
    EntityKind::AlienLaser,
    EntityKind::PlayerLaser,
    EntityKind::Player,
    EntityKind::Alien,
    EntityKind::WallBlock,
    EntityKind::ExplosionCell,
]);
const WALL_ACCEPTS: KindMask = KindMask::of(&[
    EntityKind::PlayerLaser,
    EntityKind::AlienLaser,
    EntityKind::ExplosionCell,
]);
const POWER_UP_ACCEPTS: KindMask = KindMask::of(&[EntityKind::Player]);

/// Unique per run, assigned when the entity is queued for spawning
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    pub const UNASSIGNED: EntityId = EntityId(0);
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    /// Position at the start of the current tick
    pub prev_pos: Vec2,
    pub health: i32,
    /// Damage dealt to whatever accepts this entity's kind
    pub strike_force: i32,
    pub accepts: KindMask,
    /// Cleared on destruction or expiry; removal happens at the tick boundary
    pub active: bool,
    /// Unset for caught power-ups, which move to the power-up table on removal
    pub auto_free: bool,
    pub glyph: char,
    pub variant: Variant,
}

/// Kind-specific entity data
#[derive(Debug, Clone)]
pub enum Variant {
    Player(PlayerShip),
    Alien(Alien),
    Laser(Laser),
    Explosion { timer: u32 },
    WallBlock,
    PowerUp(PowerUpDrop),
    BlastCell { ttl: u32 },
}

#[derive(Debug, Clone)]
pub struct PlayerShip {
    /// Cells per tick
    pub movement_speed: f32,
    pub triple_shots: bool,
    /// Cells crossed this tick when moving more than one cell at once
    pub swept: Vec<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlienGrade {
    Normal,
    Upgraded,
}

#[derive(Debug, Clone)]
pub struct Alien {
    pub grade: AlienGrade,
    /// +1 moving right, -1 moving left
    pub direction: f32,
    /// Horizontal speed and vertical drift
    pub velocity: Vec2,
    pub energy: f32,
    pub upgrade_threshold: f32,
    pub fire_chance: f32,
    /// Present only on detonating aliens
    pub detonator: Option<Detonator>,
}

impl Alien {
    pub fn is_detonating(&self) -> bool {
        matches!(self.detonator, Some(Detonator::Detonating(_)))
    }
}

#[derive(Debug, Clone)]
pub enum Detonator {
    Armed,
    Detonating(BlastRing),
}

/// Region a laser stays valid in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaserPath {
    /// Player laser: valid while `y >= 0`
    Up,
    /// Alien laser: valid while `y <= bounds.y`
    Down,
    /// Diagonal player laser: also bounded by the side walls
    Diagonal,
}

impl LaserPath {
    pub fn is_valid(self, pos: Vec2, bounds: Vec2) -> bool {
        match self {
            LaserPath::Up => pos.y >= 0.0,
            LaserPath::Down => pos.y <= bounds.y,
            LaserPath::Diagonal => pos.y >= 0.0 && pos.x >= 0.0 && pos.x <= bounds.x - 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Laser {
    pub direction: Vec2,
    pub path: LaserPath,
}

#[derive(Debug, Clone)]
pub struct PowerUpDrop {
    pub kind: PowerUpKind,
    pub caught: bool,
}

impl Entity {
    fn base(
        kind: EntityKind,
        pos: Vec2,
        health: i32,
        strike_force: i32,
        accepts: KindMask,
        glyph: char,
        variant: Variant,
    ) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            kind,
            pos,
            prev_pos: pos,
            health,
            strike_force,
            accepts,
            active: true,
            auto_free: true,
            glyph,
            variant,
        }
    }

    pub fn player(pos: Vec2) -> Self {
        Self::base(
            EntityKind::Player,
            pos,
            1,
            10,
            PLAYER_ACCEPTS,
            glyph::PLAYER,
            Variant::Player(PlayerShip {
                movement_speed: PLAYER_SPEED,
                triple_shots: false,
                swept: Vec::new(),
            }),
        )
    }

    /// Regular alien with a randomized upgrade threshold and starting direction
    pub fn alien(pos: Vec2, drift: f32, friendly_fire: bool, rng: &mut Pcg32) -> Self {
        let upgrade_threshold = rng.random_range(0.0..4.0f32) + 1.0;
        let direction = if rng.random_range(0.0..4.0f32) < 2.0 {
            1.0
        } else {
            -1.0
        };
        let accepts = if friendly_fire {
            ALIEN_ACCEPTS
        } else {
            ALIEN_ACCEPTS.without(EntityKind::AlienLaser)
        };
        Self::base(
            EntityKind::Alien,
            pos,
            1,
            10,
            accepts,
            glyph::ALIEN,
            Variant::Alien(Alien {
                grade: AlienGrade::Normal,
                direction,
                velocity: Vec2::new(ALIEN_SPEED_X, drift),
                energy: 0.0,
                upgrade_threshold,
                fire_chance: ALIEN_FIRE_CHANCE,
                detonator: None,
            }),
        )
    }

    /// Alien that never upgrades and detonates into blast rings when destroyed
    pub fn detonating_alien(pos: Vec2, drift: f32, friendly_fire: bool, rng: &mut Pcg32) -> Self {
        let mut entity = Self::alien(pos, drift, friendly_fire, rng);
        entity.glyph = glyph::DETONATING_ALIEN;
        if let Variant::Alien(alien) = &mut entity.variant {
            alien.detonator = Some(Detonator::Armed);
        }
        entity
    }

    fn laser(kind: EntityKind, pos: Vec2, direction: Vec2, path: LaserPath, glyph: char) -> Self {
        Self::base(
            kind,
            pos,
            1,
            1,
            LASER_ACCEPTS.without(kind),
            glyph,
            Variant::Laser(Laser { direction, path }),
        )
    }

    /// Straight laser one row above the shooter
    pub fn player_laser(shooter: Vec2) -> Self {
        Self::laser(
            EntityKind::PlayerLaser,
            shooter + Vec2::new(0.0, -1.0),
            Vec2::new(0.0, -1.0),
            LaserPath::Up,
            glyph::PLAYER_LASER,
        )
    }

    /// Diagonal laser one column to the side; moves at the same speed as a straight one
    pub fn player_laser_diagonal(shooter: Vec2, left: bool) -> Self {
        let side = if left { -1.0 } else { 1.0 };
        Self::laser(
            EntityKind::PlayerLaser,
            shooter.floor() + Vec2::new(side, -1.0),
            Vec2::new(side * FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
            LaserPath::Diagonal,
            glyph::PLAYER_LASER_DIAGONAL,
        )
    }

    pub fn alien_laser(shooter: Vec2) -> Self {
        Self::laser(
            EntityKind::AlienLaser,
            shooter + Vec2::new(0.0, 1.0),
            Vec2::new(0.0, 1.0),
            LaserPath::Down,
            glyph::ALIEN_LASER,
        )
    }

    /// Alien laser that player lasers cannot stop and that breaks wall blocks
    pub fn strong_alien_laser(shooter: Vec2) -> Self {
        let mut laser = Self::alien_laser(shooter);
        laser.accepts = laser.accepts.without(EntityKind::PlayerLaser);
        laser.strike_force = STRONG_LASER_FORCE;
        laser.glyph = glyph::STRONG_ALIEN_LASER;
        laser
    }

    pub fn explosion(pos: Vec2) -> Self {
        Self::base(
            EntityKind::Explosion,
            pos,
            0,
            0,
            KindMask::NONE,
            glyph::EXPLOSION,
            Variant::Explosion {
                timer: EXPLOSION_TICKS,
            },
        )
    }

    pub fn wall_block(pos: Vec2) -> Self {
        Self::base(
            EntityKind::WallBlock,
            pos,
            5,
            10,
            WALL_ACCEPTS,
            glyph::WALL_BLOCK,
            Variant::WallBlock,
        )
    }

    pub fn power_up(pos: Vec2, kind: PowerUpKind) -> Self {
        Self::base(
            EntityKind::PowerUp,
            pos,
            1,
            0,
            POWER_UP_ACCEPTS,
            glyph::POWER_UP,
            Variant::PowerUp(PowerUpDrop {
                kind,
                caught: false,
            }),
        )
    }

    /// Invulnerable cell of a detonation ring; destroys anything it touches
    pub fn blast_cell(pos: Vec2) -> Self {
        Self::base(
            EntityKind::ExplosionCell,
            pos,
            10_000,
            10_000,
            KindMask::NONE,
            glyph::BLAST_CELL,
            Variant::BlastCell {
                ttl: BLAST_CELL_TICKS,
            },
        )
    }

    /// Whether `attacker`'s kind may damage this entity
    #[inline]
    pub fn accepts_attacker(&self, attacker: &Entity) -> bool {
        self.accepts.contains(attacker.kind)
    }

    pub fn as_player(&self) -> Option<&PlayerShip> {
        match &self.variant {
            Variant::Player(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut PlayerShip> {
        match &mut self.variant {
            Variant::Player(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn as_alien(&self) -> Option<&Alien> {
        match &self.variant {
            Variant::Alien(alien) => Some(alien),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_kind_bits_follow_tag_order() {
        assert_eq!(EntityKind::Player.bit(), 1);
        assert_eq!(EntityKind::WallBlock.bit(), 1 << 5);
        assert_eq!(EntityKind::ExplosionCell.bit(), 1 << 7);
        let mask = KindMask::of(&[EntityKind::Alien, EntityKind::PowerUp]);
        assert_eq!(mask.bits(), 0b100_0010);
        assert!(!mask.without(EntityKind::Alien).contains(EntityKind::Alien));
    }

    #[test]
    fn test_lasers_ignore_their_own_side() {
        let player_laser = Entity::player_laser(Vec2::new(5.0, 10.0));
        let alien_laser = Entity::alien_laser(Vec2::new(5.0, 3.0));
        assert!(!player_laser.accepts_attacker(&player_laser));
        assert!(player_laser.accepts_attacker(&alien_laser));
        assert!(!alien_laser.accepts_attacker(&alien_laser));

        let strong = Entity::strong_alien_laser(Vec2::new(5.0, 3.0));
        assert!(!strong.accepts_attacker(&player_laser));
        assert_eq!(strong.strike_force, STRONG_LASER_FORCE);
        assert_eq!(strong.kind, EntityKind::AlienLaser);
    }

    #[test]
    fn test_laser_spawn_offsets() {
        let shooter = Vec2::new(10.5, 20.0);
        assert_eq!(Entity::player_laser(shooter).pos, Vec2::new(10.5, 19.0));
        assert_eq!(Entity::alien_laser(shooter).pos, Vec2::new(10.5, 21.0));
        let left = Entity::player_laser_diagonal(shooter, true);
        assert_eq!(left.pos, Vec2::new(9.0, 19.0));
        let Variant::Laser(laser) = &left.variant else {
            panic!("diagonal laser must carry laser data");
        };
        assert!((laser.direction.length() - 1.0).abs() < 1e-6);
        assert!(laser.direction.x < 0.0 && laser.direction.y < 0.0);
    }

    #[test]
    fn test_alien_friendly_fire_toggle() {
        let mut rng = Pcg32::seed_from_u64(3);
        let laser = Entity::alien_laser(Vec2::ZERO);
        let with = Entity::alien(Vec2::ZERO, ALIEN_DRIFT_Y, true, &mut rng);
        let without = Entity::alien(Vec2::ZERO, ALIEN_DRIFT_Y, false, &mut rng);
        assert!(with.accepts_attacker(&laser));
        assert!(!without.accepts_attacker(&laser));

        let alien = with.as_alien().unwrap();
        assert!((1.0..5.0).contains(&alien.upgrade_threshold));
        assert!(alien.direction == 1.0 || alien.direction == -1.0);
    }

    #[test]
    fn test_blast_cell_is_invulnerable() {
        let cell = Entity::blast_cell(Vec2::new(3.5, 3.5));
        let player = Entity::player(Vec2::new(3.0, 3.0));
        assert_eq!(cell.accepts, KindMask::NONE);
        assert!(player.accepts_attacker(&cell));
        assert_eq!(cell.glyph, glyph::BLAST_CELL);
    }
}
