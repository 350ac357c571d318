//! Collision grid and contact tests
//!
//! A fixed 20x20 spatial hash rebuilt every tick. Entities are processed in
//! collection order; each one tests its collision points against whatever was
//! recorded before it and then records its own points, so earlier entities
//! strike first within a tick.
//!
//! Contacts are approximate continuous collision: two entities touch when
//! they share an integer cell, or when the midpoints of their last motion
//! segments are less than 0.8 cells apart. That catches opposite lasers
//! swapping cells between two ticks without ever sharing one.

use glam::Vec2;

use super::entity::Entity;
use super::world::World;
use crate::consts::*;
use crate::{cell_of, sweep_midpoint};

/// A collision point recorded for the entity at `slot`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridEntry {
    pub point: Vec2,
    pub slot: usize,
}

#[derive(Debug, Clone)]
pub struct CollisionGrid {
    cols: usize,
    rows: usize,
    buckets: Vec<Vec<GridEntry>>,
}

impl Default for CollisionGrid {
    fn default() -> Self {
        Self::new(COLLISION_GRID_COLS, COLLISION_GRID_ROWS)
    }
}

impl CollisionGrid {
    pub fn new(cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            buckets: vec![Vec::new(); cols * rows],
        }
    }

    /// Empty every bucket, keeping allocations
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }

    /// Bucket for a point; negative coordinates have none
    pub fn bucket_of(&self, point: Vec2) -> Option<usize> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let cell = cell_of(point);
        let x = cell.x as usize % self.cols;
        let y = cell.y as usize % self.rows;
        Some(y * self.cols + x)
    }

    pub fn entries(&self, bucket: usize) -> &[GridEntry] {
        &self.buckets[bucket]
    }

    pub fn insert(&mut self, bucket: usize, entry: GridEntry) {
        self.buckets[bucket].push(entry);
    }

    /// Recorded points across all buckets
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// Same integer cell
    Exact,
    /// Motion midpoints within 0.8 cells
    Swept,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub point: Vec2,
    pub kind: ContactKind,
}

/// Test `a` (the entity being processed) against `b` (already recorded)
///
/// The contact point is always taken from `a`: its position for an exact
/// match, its motion midpoint for a swept one.
pub fn contact(a: &Entity, b: &Entity) -> Option<Contact> {
    if cell_of(a.pos) == cell_of(b.pos) {
        return Some(Contact {
            point: a.pos,
            kind: ContactKind::Exact,
        });
    }
    let mid_a = sweep_midpoint(a.prev_pos, a.pos);
    let mid_b = sweep_midpoint(b.prev_pos, b.pos);
    if mid_a.distance_squared(mid_b) <= SWEPT_HIT_DIST_SQ {
        return Some(Contact {
            point: mid_a,
            kind: ContactKind::Swept,
        });
    }
    None
}

/// Resolve a contact in both directions; returns true when `a` was destroyed
pub fn resolve_contact(a: &mut Entity, b: &mut Entity, world: &mut World) -> bool {
    if let Some(hit) = contact(a, b) {
        a.check_collision(b, world, hit.point);
        b.check_collision(a, world, hit.point);
    }
    !a.active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::sim::entity::EntityKind;

    fn moved(mut entity: Entity, from: Vec2, to: Vec2) -> Entity {
        entity.prev_pos = from;
        entity.pos = to;
        entity
    }

    #[test]
    fn test_bucket_wraps_and_rejects_negative() {
        let grid = CollisionGrid::default();
        assert_eq!(grid.bucket_of(Vec2::new(-0.5, 3.0)), None);
        assert_eq!(grid.bucket_of(Vec2::new(3.0, -1.0)), None);
        assert_eq!(
            grid.bucket_of(Vec2::new(21.7, 3.2)),
            grid.bucket_of(Vec2::new(1.0, 3.0))
        );
        assert_eq!(grid.bucket_of(Vec2::new(0.0, 20.0)), Some(0));
    }

    #[test]
    fn test_clear_keeps_nothing() {
        let mut grid = CollisionGrid::default();
        grid.insert(
            3,
            GridEntry {
                point: Vec2::ZERO,
                slot: 0,
            },
        );
        assert_eq!(grid.len(), 1);
        grid.clear();
        assert!(grid.is_empty());
    }

    #[test]
    fn test_exact_contact_uses_processed_position() {
        let a = Entity::wall_block(Vec2::new(4.2, 7.9));
        let b = Entity::player_laser(Vec2::new(4.0, 8.5));
        let hit = contact(&a, &b).unwrap();
        assert_eq!(hit.kind, ContactKind::Exact);
        assert_eq!(hit.point, a.pos);
    }

    #[test]
    fn test_crossing_lasers_meet_halfway() {
        let up = moved(
            Entity::player_laser(Vec2::ZERO),
            Vec2::new(20.0, 10.0),
            Vec2::new(20.0, 9.0),
        );
        let down = moved(
            Entity::alien_laser(Vec2::ZERO),
            Vec2::new(20.0, 9.0),
            Vec2::new(20.0, 10.0),
        );
        let hit = contact(&down, &up).unwrap();
        assert_eq!(hit.kind, ContactKind::Swept);
        assert_eq!(hit.point, Vec2::new(20.0, 9.5));
    }

    #[test]
    fn test_distant_entities_do_not_touch() {
        let a = Entity::wall_block(Vec2::new(1.0, 1.0));
        let b = Entity::wall_block(Vec2::new(3.0, 1.0));
        assert_eq!(contact(&a, &b), None);
    }

    #[test]
    fn test_accepted_attacker_deals_its_strike_force() {
        let mut world = World::new(&Settings::default());
        let mut wall = Entity::wall_block(Vec2::new(5.0, 5.0));
        let mut laser = Entity::player_laser(Vec2::new(5.0, 6.0));
        laser.prev_pos = Vec2::new(5.0, 6.0);
        let destroyed = resolve_contact(&mut laser, &mut wall, &mut world);
        assert!(destroyed);
        assert_eq!(wall.health, 5 - laser.strike_force);
        assert!(wall.active);
        // Laser explodes at the contact point
        assert_eq!(world.pending().len(), 1);
        assert_eq!(world.pending()[0].kind, EntityKind::Explosion);
    }

    #[test]
    fn test_weak_alien_laser_bounces_off_wall() {
        let mut world = World::new(&Settings::default());
        world.notify_wall_block_spawned();
        let mut wall = Entity::wall_block(Vec2::new(5.0, 5.0));
        let mut laser = Entity::alien_laser(Vec2::new(5.0, 4.0));
        resolve_contact(&mut laser, &mut wall, &mut world);
        assert_eq!(wall.health, 5);
        assert!(!laser.active);

        let mut strong = Entity::strong_alien_laser(Vec2::new(5.0, 4.0));
        resolve_contact(&mut strong, &mut wall, &mut world);
        assert_eq!(wall.health, 0);
        assert!(!wall.active);
        assert_eq!(world.wall_blocks(), 0);
    }
}
