//! Fruit Frenzy - catch the falling fruit
//!
//! Core modules:
//! - `sim`: Deterministic simulation (fruits, basket, collision, game state)
//! - `game_loop`: Fixed timestep driver with the update and spawn schedules
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Key/value storage for settings and high scores

pub mod game_loop;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game_loop::{GameLoop, Timer};
pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Play-field dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Basket defaults
    pub const BASKET_WIDTH: f32 = 80.0;
    pub const BASKET_HEIGHT: f32 = 20.0;
    /// Gap between the basket bottom and the field bottom
    pub const BASKET_BOTTOM_MARGIN: f32 = 10.0;

    /// Longest frame delta fed into the scheduler (ms). Longer stalls are dropped.
    pub const MAX_FRAME_MS: f64 = 250.0;

    /// Initial spawn interval shared by both variants (ms)
    pub const SPAWN_INTERVAL_MS: f64 = 1500.0;
}

/// Seed for a new run, taken from the wall clock
pub fn clock_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5eed)
    }
}

/// Wall-clock timestamp in milliseconds since the Unix epoch
pub fn now_ms() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}
