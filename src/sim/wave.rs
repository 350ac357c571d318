//! Periodic spawn waves of aliens and wall blocks
//!
//! Every 50 ticks a wave adds up to three wall blocks and a random number of
//! aliens from the current per-wave range. After each wave the range grows
//! with probability 1/2, up to a cap.

use super::allocator::PositionAllocator;
use super::entity::{Entity, EntityKind};
use super::world::World;
use crate::consts::*;
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct WaveSpawner {
    countdown: u32,
    min_aliens: f32,
    max_aliens: f32,
    drift: f32,
    detonators_enabled: bool,
    aliens: PositionAllocator,
    walls: PositionAllocator,
    waves: u32,
}

impl WaveSpawner {
    pub fn new(settings: &Settings) -> Self {
        let difficulty = settings.difficulty();
        let width = settings.width as i32;
        let height = settings.height as i32;
        let count_scale = difficulty.alien_count_scale();
        Self {
            countdown: WAVE_INTERVAL_TICKS,
            min_aliens: MIN_ALIENS_PER_WAVE * count_scale,
            max_aliens: MAX_ALIENS_PER_WAVE * count_scale,
            drift: ALIEN_DRIFT_Y * difficulty.alien_drift_scale(),
            detonators_enabled: settings.special_feature,
            aliens: PositionAllocator::new(width, (height - 1).min(ALIEN_BAND_ROWS)),
            walls: PositionAllocator::new(width, (height - WALL_BAND_BOTTOM_MARGIN).max(0)),
            waves: 0,
        }
    }

    /// Current per-wave alien range, before truncation
    pub fn per_wave_range(&self) -> (f32, f32) {
        (self.min_aliens, self.max_aliens)
    }

    /// Ticks until the next wave
    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    /// Waves spawned so far
    pub fn waves(&self) -> u32 {
        self.waves
    }

    /// Count down and spawn a wave when due
    pub fn advance(&mut self, entities: &[Entity], world: &mut World) {
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return;
        }
        self.countdown = WAVE_INTERVAL_TICKS;

        self.aliens.fill_from_world(entities, EntityKind::Alien);
        self.walls.fill_from_world(entities, EntityKind::WallBlock);

        self.spawn_wall_blocks(WALL_BLOCKS_PER_WAVE, world);
        let count = world.random_int(self.min_aliens as i32, self.max_aliens as i32);
        self.spawn_aliens(count, world);

        let grow = world.random_int(0, 1) as f32;
        self.min_aliens =
            (self.min_aliens * (1.0 + grow * WAVE_MIN_GROWTH)).min(ALIENS_PER_WAVE_CAP / 2.0);
        self.max_aliens = (self.max_aliens * (1.0 + grow * WAVE_MAX_GROWTH)).min(ALIENS_PER_WAVE_CAP);
        self.waves += 1;

        log::info!(
            "Wave {}: {} aliens, {} wall blocks, next range {:.2}..{:.2}",
            self.waves,
            world.aliens(),
            world.wall_blocks(),
            self.min_aliens,
            self.max_aliens
        );
    }

    /// Queue up to `count` wall blocks on free cells, respecting the live cap
    pub fn spawn_wall_blocks(&mut self, count: i32, world: &mut World) {
        self.walls.init_batch();
        for _ in 0..count {
            let Some(cell) = self.walls.next_free(world.rng()) else {
                break;
            };
            if world.wall_blocks() >= MAX_WALL_BLOCKS {
                break;
            }
            world.spawn(Entity::wall_block(cell.as_vec2()));
            world.notify_wall_block_spawned();
        }
    }

    /// Queue up to `count` aliens on free cells, plus possibly one detonating alien
    pub fn spawn_aliens(&mut self, count: i32, world: &mut World) {
        let count = count.min(MAX_ALIENS - world.aliens());
        if count <= 0 {
            return;
        }
        self.aliens.init_batch();
        let friendly_fire = world.friendly_fire();
        for _ in 0..count {
            let Some(cell) = self.aliens.next_free(world.rng()) else {
                break;
            };
            let alien = Entity::alien(cell.as_vec2(), self.drift, friendly_fire, world.rng());
            world.spawn(alien);
            world.notify_alien_spawned();
        }

        if !self.detonators_enabled || world.random_int(0, 1) != 0 {
            return;
        }
        let Some(cell) = self.aliens.next_free(world.rng()) else {
            return;
        };
        if world.aliens() < MAX_ALIENS {
            let drift = self.drift * DETONATOR_DRIFT_SCALE;
            let alien = Entity::detonating_alien(cell.as_vec2(), drift, friendly_fire, world.rng());
            world.spawn(alien);
            world.notify_alien_spawned();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn setup(settings: &Settings) -> (WaveSpawner, World) {
        (WaveSpawner::new(settings), World::new(settings))
    }

    #[test]
    fn test_bands_follow_world_height() {
        let (spawner, _) = setup(&Settings::default());
        assert_eq!(spawner.aliens.rows(), 4);
        assert_eq!(spawner.walls.rows(), 23);

        let short = Settings {
            height: 3,
            ..Default::default()
        };
        let (spawner, _) = setup(&short);
        assert_eq!(spawner.aliens.rows(), 2);
        assert_eq!(spawner.walls.rows(), 0);
    }

    #[test]
    fn test_wave_fires_every_interval() {
        let settings = Settings::default();
        let (mut spawner, mut world) = setup(&settings);
        for _ in 0..WAVE_INTERVAL_TICKS - 1 {
            spawner.advance(&[], &mut world);
        }
        assert!(world.pending().is_empty());
        spawner.advance(&[], &mut world);
        assert_eq!(spawner.waves(), 1);
        assert_eq!(spawner.countdown(), WAVE_INTERVAL_TICKS);
        assert_eq!(world.wall_blocks(), WALL_BLOCKS_PER_WAVE);
        assert!((2..=4).contains(&world.aliens()));
    }

    #[test]
    fn test_spawned_cells_are_distinct() {
        let settings = Settings::default();
        let (mut spawner, mut world) = setup(&settings);
        spawner.spawn_aliens(40, &mut world);
        spawner.spawn_wall_blocks(10, &mut world);
        let cells: HashSet<(i32, i32, bool)> = world
            .pending()
            .iter()
            .map(|e| {
                let c = crate::cell_of(e.pos);
                (c.x, c.y, e.kind == EntityKind::Alien)
            })
            .collect();
        assert_eq!(cells.len(), world.pending().len());
        assert!(world.pending().iter().filter(|e| e.kind == EntityKind::Alien).all(|e| e.pos.y < 4.0));
    }

    #[test]
    fn test_wall_cap_holds() {
        let (mut spawner, mut world) = setup(&Settings::default());
        for _ in 0..MAX_WALL_BLOCKS - 1 {
            world.notify_wall_block_spawned();
        }
        spawner.spawn_wall_blocks(3, &mut world);
        assert_eq!(world.wall_blocks(), MAX_WALL_BLOCKS);
        assert_eq!(world.pending().len(), 1);
    }

    #[test]
    fn test_alien_cap_holds() {
        let (mut spawner, mut world) = setup(&Settings::default());
        for _ in 0..MAX_ALIENS - 2 {
            world.notify_alien_spawned();
        }
        spawner.spawn_aliens(10, &mut world);
        assert_eq!(world.aliens(), MAX_ALIENS);
        spawner.spawn_aliens(10, &mut world);
        assert_eq!(world.aliens(), MAX_ALIENS);
    }

    #[test]
    fn test_small_band_spawns_fewer() {
        let settings = Settings {
            width: 3,
            height: 2,
            ..Default::default()
        };
        let (mut spawner, mut world) = setup(&settings);
        spawner.spawn_aliens(10, &mut world);
        assert_eq!(world.aliens(), 3);
    }

    #[test]
    fn test_escalation_is_monotonic_and_capped() {
        let settings = Settings {
            hard_mode: true,
            ..Default::default()
        };
        let (mut spawner, mut world) = setup(&settings);
        assert_eq!(spawner.per_wave_range(), (4.0, 8.0));
        let mut last = spawner.per_wave_range();
        for _ in 0..200 * WAVE_INTERVAL_TICKS {
            spawner.advance(&[], &mut world);
            let range = spawner.per_wave_range();
            assert!(range.0 >= last.0 && range.1 >= last.1);
            assert!(range.0 <= ALIENS_PER_WAVE_CAP / 2.0 && range.1 <= ALIENS_PER_WAVE_CAP);
            last = range;
        }
        assert_eq!(last, (ALIENS_PER_WAVE_CAP / 2.0, ALIENS_PER_WAVE_CAP));
    }

    #[test]
    fn test_detonating_alien_drifts_faster() {
        let settings = Settings {
            special_feature: true,
            ..Default::default()
        };
        let (mut spawner, mut world) = setup(&settings);
        for _ in 0..20 {
            spawner.spawn_aliens(1, &mut world);
        }
        let detonators: Vec<&Entity> = world
            .pending()
            .iter()
            .filter(|e| e.as_alien().is_some_and(|a| a.detonator.is_some()))
            .collect();
        assert!(!detonators.is_empty());
        for alien in detonators {
            let drift = alien.as_alien().unwrap().velocity.y;
            assert_eq!(drift, ALIEN_DRIFT_Y * DETONATOR_DRIFT_SCALE);
        }
    }
}
