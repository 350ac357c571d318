//! Fixed timestep simulation tick
//!
//! One tick, in order: refresh input, clear the collision grid, update and
//! collide every active entity in collection order, run the wave countdown,
//! tick caught power-ups, then compact the collection and append spawns.
//! Nothing is added or removed from `entities` until that final step.

use super::collision::{GridEntry, resolve_contact};
use super::entity::Entity;
use super::input::TickInput;
use super::state::GameState;
use super::world::{PowerUpEffect, World};

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.world.is_game_over() {
        return;
    }
    state.world.set_input(*input);
    state.grid.clear();

    for slot in 0..state.entities.len() {
        if !state.entities[slot].active {
            continue;
        }
        state.entities[slot].update(&mut state.world);
        resolve_collisions(state, slot);
    }

    state.waves.advance(&state.entities, &mut state.world);

    let expired = state.world.power_ups.tick();
    state
        .world
        .effects
        .extend(expired.into_iter().map(|(kind, boost)| PowerUpEffect::Expire(kind, boost)));
    apply_power_up_effects(&mut state.entities, &mut state.world);

    apply_structural_changes(state);
    state.iteration += 1;
}

/// Test the entity at `slot` against everything recorded so far this tick,
/// then record its points unless it was destroyed
fn resolve_collisions(state: &mut GameState, slot: usize) {
    let GameState {
        entities,
        world,
        grid,
        scratch_points,
        ..
    } = state;
    if !entities[slot].active {
        return;
    }

    scratch_points.clear();
    entities[slot].collision_points(scratch_points);
    for &point in scratch_points.iter() {
        let Some(bucket) = grid.bucket_of(point) else {
            continue;
        };
        for i in 0..grid.entries(bucket).len() {
            let other = grid.entries(bucket)[i].slot;
            if other == slot || !entities[other].active {
                continue;
            }
            let (entity, recorded) = pair_mut(entities, slot, other);
            let destroyed = resolve_contact(entity, recorded, world);
            apply_power_up_effects(entities, world);
            if destroyed {
                break;
            }
        }
        if !entities[slot].active {
            break;
        }
        grid.insert(bucket, GridEntry { point, slot });
    }
}

/// Two distinct entities borrowed mutably at once
fn pair_mut(entities: &mut [Entity], a: usize, b: usize) -> (&mut Entity, &mut Entity) {
    debug_assert_ne!(a, b);
    if a < b {
        let (low, high) = entities.split_at_mut(b);
        (&mut low[a], &mut high[0])
    } else {
        let (low, high) = entities.split_at_mut(a);
        (&mut high[0], &mut low[b])
    }
}

/// Apply queued power-up effects to the player and the laser budget
fn apply_power_up_effects(entities: &mut [Entity], world: &mut World) {
    if world.effects.is_empty() {
        return;
    }
    let effects = std::mem::take(&mut world.effects);
    let mut player = match world.player_id {
        Some(id) => entities
            .iter_mut()
            .find(|e| e.id == id)
            .and_then(Entity::as_player_mut),
        None => None,
    };

    for effect in effects {
        match effect {
            PowerUpEffect::Activate(kind) => {
                let boost = kind.apply(player.as_deref_mut(), &mut world.lasers);
                world.power_ups.record_boost(kind, boost);
            }
            PowerUpEffect::Expire(kind, boost) => {
                kind.revert(boost, player.as_deref_mut(), &mut world.lasers);
            }
        }
    }
}

/// Swap inactive entities to the end, drop them (caught power-ups go to the
/// power-up table), then append this tick's spawns
fn apply_structural_changes(state: &mut GameState) {
    let entities = &mut state.entities;
    let mut live = entities.len();
    let mut i = 0;
    while i < live {
        if entities[i].active {
            i += 1;
        } else {
            // Re-check slot i: it now holds what was last
            live -= 1;
            entities.swap(i, live);
        }
    }
    for removed in entities.drain(live..) {
        if !removed.auto_free {
            state.world.power_ups.adopt(removed);
        }
    }
    entities.extend(state.world.take_pending());
}
