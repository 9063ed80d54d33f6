//! Fixed timestep simulation tick
//!
//! Core game loop step that advances the simulation deterministically.

use super::collision::{is_caught, is_missed};
use super::rules::{InputModel, Rules};
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Left arrow held (held-key model)
    pub left: bool,
    /// Right arrow held (held-key model)
    pub right: bool,
    /// Queued discrete steps, negative = left (step model)
    pub nudge: i32,
}

impl TickInput {
    /// Horizontal basket displacement for this tick
    pub fn displacement(&self, model: InputModel) -> f32 {
        match model {
            InputModel::Step { step } => self.nudge as f32 * step,
            InputModel::Held { speed } => {
                let dir = self.right as i32 - self.left as i32;
                dir as f32 * speed
            }
        }
    }
}

/// Advance the game state by one fixed tick
pub fn tick(state: &mut GameState, rules: &Rules, input: &TickInput) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    state.time_ticks += 1;

    state
        .basket
        .shift(input.displacement(rules.input), rules.field_width);
    let basket = state.basket.bounds();

    let mut i = 0;
    while i < state.fruits.len() {
        let fruit = &mut state.fruits[i];
        fruit.fall();
        let bounds = fruit.bounds();

        // Catch wins over miss when both would apply
        if is_caught(&bounds, &basket) {
            let fruit = state.fruits.remove(i);
            state.score += 1;
            state.events.push(GameEvent::Caught {
                id: fruit.id,
                score: state.score,
            });
            log::debug!("Caught fruit {} (score {})", fruit.id, state.score);
            continue;
        }

        if is_missed(&bounds, rules.field_height) {
            let fruit = state.fruits.remove(i);
            state.lives = state.lives.saturating_sub(1);
            state.events.push(GameEvent::Missed {
                id: fruit.id,
                lives: state.lives,
            });
            log::debug!("Missed fruit {} ({} lives left)", fruit.id, state.lives);

            if state.lives == 0 {
                state.phase = GamePhase::GameOver;
                state.events.push(GameEvent::GameOver { score: state.score });
                log::info!("Game over with score {}", state.score);
                return;
            }
            continue;
        }

        i += 1;
    }
}
