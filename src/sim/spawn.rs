//! Fruit spawner and difficulty ramp

use glam::Vec2;
use rand::Rng;

use super::rules::Rules;
use super::state::{Fruit, GameEvent, GameState};

/// Drop one new fruit at the top of the field.
///
/// Returns the new fruit's ID, or `None` when the run is over. With a ramp
/// configured, every spawn also speeds up later fruits and shortens the
/// spawn interval down to its floor.
pub fn spawn_fruit(state: &mut GameState, rules: &Rules) -> Option<u32> {
    if state.is_game_over() {
        return None;
    }

    let size = state
        .rng
        .random_range(rules.fruit_size_min..=rules.fruit_size_max) as f32;
    let max_x = (rules.field_width - size).max(0.0) as u32;
    let x = state.rng.random_range(0..=max_x) as f32;

    let jitter = if rules.speed_jitter > 0.0 {
        state.rng.random::<f32>() * rules.speed_jitter
    } else {
        0.0
    };
    let speed = state.difficulty.fall_speed + jitter;

    let color = if rules.palette.is_empty() {
        Default::default()
    } else {
        rules.palette[state.rng.random_range(0..rules.palette.len())]
    };

    let id = state.next_entity_id();
    state.fruits.push(Fruit {
        id,
        pos: Vec2::new(x, 0.0),
        size,
        speed,
        color,
    });
    state.events.push(GameEvent::Spawned { id });
    log::debug!("Spawned fruit {} at x={} size={} speed={:.2}", id, x, size, speed);

    if let Some(ramp) = &rules.ramp {
        state.difficulty.fall_speed += ramp.speed_step;
        state.difficulty.spawn_interval_ms = (state.difficulty.spawn_interval_ms
            - ramp.interval_step_ms)
            .max(ramp.min_interval_ms);
    }

    Some(id)
}
