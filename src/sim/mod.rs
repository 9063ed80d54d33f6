//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod rules;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, is_caught, is_missed};
pub use rules::{InputModel, Ramp, Rules, RulesError, Variant};
pub use spawn::spawn_fruit;
pub use state::{Basket, Difficulty, Fruit, FruitColor, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
