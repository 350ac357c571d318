//! Per-kind behavior: update, collision points, strike and destruction hooks

use glam::Vec2;

use super::blast::BlastRing;
use super::entity::{AlienGrade, Detonator, Entity, EntityKind, KindMask, Variant, glyph};
use super::powerup::{Catch, PowerUpKind};
use super::world::World;
use crate::cell_of;
use crate::consts::*;

impl Entity {
    /// Advance one tick
    pub fn update(&mut self, world: &mut World) {
        match self.variant {
            Variant::Player(_) => self.update_player(world),
            Variant::Alien(_) => self.update_alien(world),
            Variant::Laser(_) => self.update_laser(world),
            Variant::Explosion { .. } => {
                if let Variant::Explosion { timer } = &mut self.variant {
                    *timer = timer.saturating_sub(1);
                    if *timer == 0 {
                        self.active = false;
                    }
                }
            }
            Variant::WallBlock => {}
            Variant::PowerUp(_) => {
                self.prev_pos = self.pos;
                self.pos.y += POWER_UP_FALL_SPEED;
                if self.pos.y.floor() >= world.bounds().y.floor() {
                    self.active = false;
                }
            }
            Variant::BlastCell { .. } => {
                if let Variant::BlastCell { ttl } = &mut self.variant {
                    if *ttl == 0 {
                        self.active = false;
                    } else {
                        *ttl -= 1;
                    }
                }
            }
        }
    }

    fn update_player(&mut self, world: &mut World) {
        let bounds = world.bounds();
        let input = *world.input();
        let Entity {
            pos,
            prev_pos,
            variant: Variant::Player(ship),
            ..
        } = self
        else {
            return;
        };

        *prev_pos = *pos;
        let last_x = pos.x.floor() as i32;
        if input.left {
            pos.x -= ship.movement_speed;
        } else if input.right {
            pos.x += ship.movement_speed;
        }
        pos.x = pos.x.clamp(0.0, (bounds.x - 1.0).max(0.0));

        // Fast moves skip cells; record every cell crossed so nothing slips through
        ship.swept.clear();
        let x = pos.x.floor() as i32;
        if (x - last_x).abs() > 1 {
            let step = if x > last_x { -1 } else { 1 };
            let mut cell = x;
            while cell != last_x {
                ship.swept.push(Vec2::new(cell as f32, pos.y));
                cell += step;
            }
            ship.swept.push(Vec2::new(last_x as f32, pos.y));
        }

        let shots = if ship.triple_shots { 3 } else { 1 };
        if input.fire && world.can_spawn_lasers(EntityKind::PlayerLaser, shots) {
            world.spawn_laser(Entity::player_laser(*pos));
            if ship.triple_shots {
                world.spawn_laser(Entity::player_laser_diagonal(*pos, true));
                world.spawn_laser(Entity::player_laser_diagonal(*pos, false));
            }
        }
    }

    fn update_alien(&mut self, world: &mut World) {
        let bounds = world.bounds();
        let Entity {
            pos,
            prev_pos,
            health,
            active,
            glyph: sprite,
            variant: Variant::Alien(alien),
            ..
        } = self
        else {
            return;
        };

        if let Some(Detonator::Detonating(blast)) = &mut alien.detonator {
            match blast.next_ring() {
                Some(cells) => {
                    for cell in cells {
                        world.spawn(Entity::blast_cell(cell));
                    }
                }
                None => *active = false,
            }
            return;
        }

        *prev_pos = *pos;
        pos.x += alien.direction * alien.velocity.x;
        pos.y += alien.velocity.y;
        if pos.x < 0.0 || pos.x >= bounds.x - 1.0 {
            alien.direction = -alien.direction;
            pos.x = if alien.direction > 0.0 {
                0.0
            } else {
                bounds.x - 1.0
            };
        }

        if pos.y >= bounds.y - 1.0 {
            world.notify_game_over();
            return;
        }

        if alien.detonator.is_none() && alien.grade == AlienGrade::Normal {
            alien.energy += world.random_float(0.0, ALIEN_ENERGY_GAIN);
            if alien.energy >= alien.upgrade_threshold {
                alien.grade = AlienGrade::Upgraded;
                *sprite = glyph::UPGRADED_ALIEN;
                alien.velocity *= 2.0;
                *health *= 2;
                alien.fire_chance *= 1.5;
            }
        }

        if world.random_float(0.0, 1.0) < alien.fire_chance
            && world.can_spawn_lasers(EntityKind::AlienLaser, 1)
        {
            let strong = alien.grade == AlienGrade::Upgraded
                && world.strong_alien_lasers()
                && world.random_int(0, 1) == 0;
            let laser = if strong {
                Entity::strong_alien_laser(*pos)
            } else {
                Entity::alien_laser(*pos)
            };
            world.spawn_laser(laser);
        }
    }

    fn update_laser(&mut self, world: &mut World) {
        let bounds = world.bounds();
        let Entity {
            kind,
            pos,
            prev_pos,
            active,
            variant: Variant::Laser(laser),
            ..
        } = self
        else {
            return;
        };
        *prev_pos = *pos;
        *pos += laser.direction;
        if !laser.path.is_valid(*pos, bounds) {
            *active = false;
            world.despawn_laser(*kind);
        }
    }

    /// Points this entity occupies for collision purposes this tick
    pub fn collision_points(&self, out: &mut Vec<Vec2>) {
        if let Variant::Player(ship) = &self.variant {
            if !ship.swept.is_empty() {
                out.extend_from_slice(&ship.swept);
                return;
            }
        }
        out.push(self.pos);
        if cell_of(self.pos) != cell_of(self.prev_pos) {
            out.push(self.prev_pos);
        }
    }

    /// Take a hit from `attacker` if its kind is accepted
    pub fn check_collision(&mut self, attacker: &Entity, world: &mut World, point: Vec2) {
        if self.accepts_attacker(attacker) {
            self.on_struck(attacker, world, point);
        }
    }

    fn on_struck(&mut self, attacker: &Entity, world: &mut World, point: Vec2) {
        if matches!(self.variant, Variant::WallBlock)
            && attacker.kind == EntityKind::AlienLaser
            && attacker.strike_force < STRONG_LASER_FORCE
        {
            return;
        }
        self.health -= attacker.strike_force;
        if self.health <= 0 {
            self.active = false;
            self.on_destroyed(attacker, world, point);
        }
    }

    fn on_destroyed(&mut self, attacker: &Entity, world: &mut World, point: Vec2) {
        match self.variant {
            Variant::Player(_) => {
                self.wreck(attacker, world, point);
                world.notify_game_over();
            }
            Variant::Alien(_) => self.destroy_alien(attacker, world, point),
            Variant::Laser(_) => {
                self.pos = point;
                world.spawn(Entity::explosion(point));
                world.despawn_laser(self.kind);
            }
            Variant::WallBlock => {
                world.notify_wall_block_destroyed();
                world.spawn(Entity::explosion(self.pos));
            }
            Variant::PowerUp(_) => self.catch_power_up(world),
            Variant::Explosion { .. } | Variant::BlastCell { .. } => {}
        }
    }

    /// Ship destruction: move to the contact point and leave an explosion
    fn wreck(&mut self, attacker: &Entity, world: &mut World, point: Vec2) {
        self.pos = point;
        // Keep the explosion on a vertical attacker's column
        if attacker.prev_pos.x == attacker.pos.x {
            self.pos.x = attacker.pos.x;
        }
        world.spawn(Entity::explosion(point));
    }

    fn destroy_alien(&mut self, attacker: &Entity, world: &mut World, point: Vec2) {
        let Variant::Alien(alien) = &self.variant else {
            return;
        };
        if alien.is_detonating() {
            return;
        }
        let armed = alien.detonator.is_some();
        let points = match alien.grade {
            AlienGrade::Normal => ALIEN_SCORE,
            AlienGrade::Upgraded => UPGRADED_ALIEN_SCORE,
        };

        if attacker.kind == EntityKind::PlayerLaser {
            world.add_score(points);
        }
        self.wreck(attacker, world, point);
        world.notify_alien_destroyed();
        if world.random_int(0, POWER_UP_DROP_ODDS - 1) == 0 {
            let kind = PowerUpKind::roll(world.rng());
            world.spawn(Entity::power_up(self.pos, kind));
        }
        if armed {
            self.detonate();
        }
    }

    /// Switch a destroyed detonating alien into its blast sequence
    ///
    /// The entity stays active but moves off the field, where it cannot
    /// collide, and emits one ring per tick from its last cell.
    fn detonate(&mut self) {
        let origin = self.pos.floor() + Vec2::splat(0.5);
        if let Variant::Alien(alien) = &mut self.variant {
            alien.detonator = Some(Detonator::Detonating(BlastRing::new(
                origin,
                BLAST_MAX_RADIUS,
            )));
        }
        log::debug!("Alien {:?} detonating at {origin}", self.id);
        self.active = true;
        self.accepts = KindMask::NONE;
        self.pos = Vec2::splat(-1.0);
        self.prev_pos = self.pos;
        self.kind = EntityKind::ExplosionCell;
    }

    fn catch_power_up(&mut self, world: &mut World) {
        let id = self.id;
        let Variant::PowerUp(body) = &mut self.variant else {
            return;
        };
        body.caught = true;
        if world.catch_power_up(id, body.kind) == Catch::Registered {
            // Leaves the collection at the boundary but is kept by the power-up table
            self.auto_free = false;
        }
    }
}
