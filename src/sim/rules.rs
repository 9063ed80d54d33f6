//! Rule presets and validation
//!
//! Two presets exist because the game shipped as two front-ends that
//! disagreed on lives, difficulty ramp and input model. Both are kept as
//! data rather than picking one.

use serde::{Deserialize, Serialize};

use super::state::FruitColor;
use crate::consts::*;

/// Which preset rule set to play with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// 3 lives, fixed speed, discrete basket steps, 50 ms ticks
    Classic,
    /// 5 lives, ramping difficulty, held-key movement, 16 ms ticks
    #[default]
    Arcade,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Arcade => "Arcade",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "tk" => Some(Variant::Classic),
            "arcade" | "qt" => Some(Variant::Arcade),
            _ => None,
        }
    }

    /// Preset rules for this variant
    pub fn rules(&self) -> Rules {
        match self {
            Variant::Classic => Rules::classic(),
            Variant::Arcade => Rules::arcade(),
        }
    }

    /// Prompt shown on the game over overlay
    pub fn restart_hint(&self) -> &'static str {
        match self {
            Variant::Classic => "PRESS R TO RESTART",
            Variant::Arcade => "PRESS SPACE TO RESTART",
        }
    }
}

/// How arrow keys move the basket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputModel {
    /// Each key press (including key repeat) moves the basket by `step` pixels
    Step { step: f32 },
    /// The basket moves `speed` pixels per tick while a key is held
    Held { speed: f32 },
}

/// Difficulty increase applied after every spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    /// Added to the base fall speed (pixels/tick)
    pub speed_step: f32,
    /// Removed from the spawn interval (ms)
    pub interval_step_ms: f64,
    /// Spawn interval floor (ms)
    pub min_interval_ms: f64,
}

/// Complete gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    /// Preset these rules derive from (look, prompts, leaderboard tag)
    pub variant: Variant,
    pub field_width: f32,
    pub field_height: f32,
    pub basket_width: f32,
    pub basket_height: f32,
    /// Gap between the basket bottom and the field bottom
    pub basket_margin: f32,
    pub starting_lives: u32,
    /// Update tick period (ms)
    pub tick_interval_ms: f64,
    /// Fruit diameter range (inclusive)
    pub fruit_size_min: u32,
    pub fruit_size_max: u32,
    /// Initial base fall speed (pixels/tick)
    pub fall_speed: f32,
    /// Upper bound of the random speed bonus per fruit, in [0, jitter)
    pub speed_jitter: f32,
    /// Initial spawn interval (ms)
    pub spawn_interval_ms: f64,
    pub ramp: Option<Ramp>,
    pub input: InputModel,
    /// Spawn one fruit as soon as a run starts instead of after one interval
    pub spawn_on_start: bool,
    pub palette: Vec<FruitColor>,
}

impl Default for Rules {
    fn default() -> Self {
        Variant::default().rules()
    }
}

impl Rules {
    pub fn classic() -> Self {
        Self {
            variant: Variant::Classic,
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            basket_width: BASKET_WIDTH,
            basket_height: BASKET_HEIGHT,
            basket_margin: BASKET_BOTTOM_MARGIN,
            starting_lives: 3,
            tick_interval_ms: 50.0,
            fruit_size_min: 30,
            fruit_size_max: 30,
            fall_speed: 5.0,
            speed_jitter: 0.0,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            ramp: None,
            input: InputModel::Step { step: 20.0 },
            spawn_on_start: true,
            palette: vec![
                FruitColor::Red,
                FruitColor::Green,
                FruitColor::Orange,
                FruitColor::Yellow,
                FruitColor::Purple,
            ],
        }
    }

    pub fn arcade() -> Self {
        Self {
            variant: Variant::Arcade,
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            basket_width: BASKET_WIDTH,
            basket_height: BASKET_HEIGHT,
            basket_margin: BASKET_BOTTOM_MARGIN,
            starting_lives: 5,
            tick_interval_ms: 16.0,
            fruit_size_min: 20,
            fruit_size_max: 30,
            fall_speed: 2.0,
            speed_jitter: 1.0,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            ramp: Some(Ramp {
                speed_step: 0.02,
                interval_step_ms: 10.0,
                min_interval_ms: 300.0,
            }),
            input: InputModel::Held { speed: 8.0 },
            spawn_on_start: false,
            palette: vec![
                FruitColor::Red,
                FruitColor::Green,
                FruitColor::Yellow,
                FruitColor::Magenta,
                FruitColor::Orange,
            ],
        }
    }

    /// Top edge of the basket
    pub fn basket_y(&self) -> f32 {
        self.field_height - self.basket_height - self.basket_margin
    }

    /// Reject tunings the simulation cannot honor
    pub fn validate(&self) -> Result<(), RulesError> {
        if !(positive(self.field_width) && positive(self.field_height)) {
            return Err(RulesError::EmptyField);
        }
        if !(positive(self.basket_width) && positive(self.basket_height))
            || !(self.basket_margin.is_finite() && self.basket_margin >= 0.0)
        {
            return Err(RulesError::EmptyBasket);
        }
        if self.basket_width > self.field_width
            || self.basket_height + self.basket_margin > self.field_height
        {
            return Err(RulesError::BasketTooLarge);
        }
        if self.starting_lives == 0 {
            return Err(RulesError::NoLives);
        }
        if self.fruit_size_min == 0 || self.fruit_size_min > self.fruit_size_max {
            return Err(RulesError::FruitSize {
                min: self.fruit_size_min,
                max: self.fruit_size_max,
            });
        }
        if self.fruit_size_max as f32 > self.field_width {
            return Err(RulesError::FruitSize {
                min: self.fruit_size_min,
                max: self.fruit_size_max,
            });
        }
        if !positive(self.fall_speed)
            || !(self.speed_jitter.is_finite() && self.speed_jitter >= 0.0)
        {
            return Err(RulesError::FallSpeed(self.fall_speed));
        }
        if !interval(self.tick_interval_ms) || !interval(self.spawn_interval_ms) {
            return Err(RulesError::Interval);
        }
        if let Some(ramp) = &self.ramp {
            if !interval(ramp.min_interval_ms)
                || !(ramp.interval_step_ms.is_finite() && ramp.interval_step_ms >= 0.0)
            {
                return Err(RulesError::Interval);
            }
            if !(ramp.speed_step.is_finite() && ramp.speed_step >= 0.0) {
                return Err(RulesError::FallSpeed(self.fall_speed));
            }
        }
        match self.input {
            InputModel::Step { step } if !positive(step) => return Err(RulesError::BasketSpeed),
            InputModel::Held { speed } if !positive(speed) => return Err(RulesError::BasketSpeed),
            _ => {}
        }
        if self.palette.is_empty() {
            return Err(RulesError::EmptyPalette);
        }
        Ok(())
    }
}

/// Shortest tick or spawn interval accepted (ms)
pub const MIN_INTERVAL_MS: f64 = 1.0;

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

fn interval(ms: f64) -> bool {
    ms.is_finite() && ms >= MIN_INTERVAL_MS
}

/// Why a [`Rules`] value was rejected
#[derive(Debug, Clone, PartialEq)]
pub enum RulesError {
    EmptyField,
    EmptyBasket,
    BasketTooLarge,
    NoLives,
    FruitSize { min: u32, max: u32 },
    FallSpeed(f32),
    BasketSpeed,
    Interval,
    EmptyPalette,
}

impl std::fmt::Display for RulesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField => write!(f, "play field must have a positive size"),
            Self::EmptyBasket => write!(f, "basket must have a positive size"),
            Self::BasketTooLarge => write!(f, "basket does not fit inside the play field"),
            Self::NoLives => write!(f, "starting lives must be at least 1"),
            Self::FruitSize { min, max } => {
                write!(f, "invalid fruit size range {}..={}", min, max)
            }
            Self::FallSpeed(speed) => {
                write!(f, "fall speed must be positive and finite, got {}", speed)
            }
            Self::BasketSpeed => write!(f, "basket movement must be positive"),
            Self::Interval => write!(
                f,
                "tick and spawn intervals must be finite and at least {} ms",
                MIN_INTERVAL_MS
            ),
            Self::EmptyPalette => write!(f, "fruit palette is empty"),
        }
    }
}

impl std::error::Error for RulesError {}
