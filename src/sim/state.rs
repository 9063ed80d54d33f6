//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::rules::Rules;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Lives ran out, waiting for restart
    GameOver,
}

/// Fruit colors (cosmetic only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FruitColor {
    #[default]
    Red,
    Green,
    Orange,
    Yellow,
    Purple,
    Magenta,
}

/// Something that happened during a tick, drained by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Spawned { id: u32 },
    Caught { id: u32, score: u32 },
    Missed { id: u32, lives: u32 },
    GameOver { score: u32 },
    Restarted,
}

/// A falling fruit
#[derive(Debug, Clone, PartialEq)]
pub struct Fruit {
    pub id: u32,
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    /// Diameter
    pub size: f32,
    /// Pixels per tick
    pub speed: f32,
    pub color: FruitColor,
}

impl Fruit {
    /// Advance one tick
    #[inline]
    pub fn fall(&mut self) {
        self.pos.y += self.speed;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.pos + Vec2::splat(self.size))
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }
}

/// The player's basket
#[derive(Debug, Clone, PartialEq)]
pub struct Basket {
    /// Left edge
    pub x: f32,
    /// Top edge (fixed)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Basket {
    /// Centered horizontally, resting near the bottom of the field
    pub fn new(rules: &Rules) -> Self {
        Self {
            x: (rules.field_width - rules.basket_width) / 2.0,
            y: rules.basket_y(),
            width: rules.basket_width,
            height: rules.basket_height,
        }
    }

    /// Move horizontally, staying inside `[0, field_width]`
    pub fn shift(&mut self, dx: f32, field_width: f32) {
        self.x = (self.x + dx).clamp(0.0, (field_width - self.width).max(0.0));
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            Vec2::new(self.x, self.y),
            Vec2::new(self.x + self.width, self.y + self.height),
        )
    }
}

/// Spawn speed and cadence, ramped as the run goes on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    /// Base fall speed for new fruits (pixels/tick)
    pub fall_speed: f32,
    /// Delay between spawns (ms)
    pub spawn_interval_ms: f64,
}

impl Difficulty {
    pub fn new(rules: &Rules) -> Self {
        Self {
            fall_speed: rules.fall_speed,
            spawn_interval_ms: rules.spawn_interval_ms,
        }
    }
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub score: u32,
    pub lives: u32,
    pub phase: GamePhase,
    /// Simulation tick counter (resets on restart)
    pub time_ticks: u64,
    pub difficulty: Difficulty,
    pub basket: Basket,
    /// Live fruits, in spawn order
    pub fruits: Vec<Fruit>,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(rules: &Rules, seed: u64) -> Self {
        Self {
            seed,
            score: 0,
            lives: rules.starting_lives,
            phase: GamePhase::Playing,
            time_ticks: 0,
            difficulty: Difficulty::new(rules),
            basket: Basket::new(rules),
            fruits: Vec::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Start a fresh run. Only allowed from `GameOver`; returns whether it happened.
    ///
    /// The RNG keeps its stream so consecutive runs differ.
    pub fn restart(&mut self, rules: &Rules) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        self.score = 0;
        self.lives = rules.starting_lives;
        self.phase = GamePhase::Playing;
        self.time_ticks = 0;
        self.difficulty = Difficulty::new(rules);
        self.basket = Basket::new(rules);
        self.fruits.clear();
        self.events.push(GameEvent::Restarted);
        true
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
