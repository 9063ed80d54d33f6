//! Fixed timestep driver
//!
//! The host calls [`GameLoop::advance`] once per displayed frame with the
//! elapsed wall-clock time. Two repeating schedules are replayed in
//! chronological order inside that call: the update tick (every
//! `rules.tick_interval_ms`) and the spawn tick (every
//! `difficulty.spawn_interval_ms`, which shrinks as the ramp kicks in).

use crate::consts::MAX_FRAME_MS;
use crate::highscores::HighScores;
use crate::sim::{
    GameEvent, GameState, InputModel, Rules, RulesError, TickInput, spawn_fruit, tick,
};

/// Slack for floating point drift when two schedules land on the same instant
const EPSILON_MS: f64 = 1e-6;

/// Upper bound on timer firings handled by one [`GameLoop::advance`] call
const MAX_STEPS_PER_ADVANCE: usize = 4096;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Restart,
}

/// A repeating schedule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    interval_ms: f64,
    elapsed_ms: f64,
}

impl Timer {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            elapsed_ms: 0.0,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Time until the next firing
    pub fn remaining_ms(&self) -> f64 {
        (self.interval_ms - self.elapsed_ms).max(0.0)
    }

    pub fn advance(&mut self, ms: f64) {
        self.elapsed_ms += ms;
    }

    /// Consume one period if due
    pub fn fire(&mut self) -> bool {
        if self.remaining_ms() <= EPSILON_MS {
            self.elapsed_ms = 0.0;
            true
        } else {
            false
        }
    }

    /// Change the period for subsequent firings, keeping progress
    pub fn set_interval(&mut self, interval_ms: f64) {
        self.interval_ms = interval_ms;
    }

    pub fn reset(&mut self, interval_ms: f64) {
        self.interval_ms = interval_ms;
        self.elapsed_ms = 0.0;
    }
}

/// Owns one game session: state, rules, pending input and both schedules
pub struct GameLoop {
    state: GameState,
    rules: Rules,
    input: TickInput,
    update_timer: Timer,
    spawn_timer: Timer,
    high_scores: HighScores,
}

impl GameLoop {
    /// Start a run with the given rules
    pub fn new(rules: Rules, seed: u64) -> Result<Self, RulesError> {
        rules.validate()?;
        let state = GameState::new(&rules, seed);
        let mut game = Self {
            update_timer: Timer::new(rules.tick_interval_ms),
            spawn_timer: Timer::new(state.difficulty.spawn_interval_ms),
            state,
            rules,
            input: TickInput::default(),
            high_scores: HighScores::new(),
        };
        if game.rules.spawn_on_start {
            spawn_fruit(&mut game.state, &game.rules);
        }
        log::info!(
            "New run: seed={}, lives={}, tick={}ms",
            seed,
            game.rules.starting_lives,
            game.rules.tick_interval_ms
        );
        Ok(game)
    }

    /// Attach a leaderboard that game-over scores are recorded into
    pub fn with_high_scores(mut self, high_scores: HighScores) -> Self {
        self.high_scores = high_scores;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn input(&self) -> &TickInput {
        &self.input
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Best recorded score, if any
    pub fn best_score(&self) -> Option<u32> {
        self.high_scores.top_score()
    }

    /// Run every update and spawn tick due within `elapsed_ms`.
    ///
    /// Returns the events produced, in order.
    pub fn advance(&mut self, elapsed_ms: f64) -> Vec<GameEvent> {
        let mut budget = elapsed_ms.clamp(0.0, MAX_FRAME_MS);
        let mut steps = 0;

        loop {
            let step = self
                .update_timer
                .remaining_ms()
                .min(self.spawn_timer.remaining_ms());
            if step > budget + EPSILON_MS {
                self.update_timer.advance(budget);
                self.spawn_timer.advance(budget);
                break;
            }
            if steps == MAX_STEPS_PER_ADVANCE {
                log::warn!("Dropping {:.3}ms after {} steps in one frame", budget, steps);
                break;
            }
            steps += 1;
            self.update_timer.advance(step);
            self.spawn_timer.advance(step);
            budget -= step;

            if self.update_timer.fire() {
                self.run_tick();
            }
            if self.spawn_timer.fire() {
                spawn_fruit(&mut self.state, &self.rules);
                self.spawn_timer
                    .set_interval(self.state.difficulty.spawn_interval_ms);
            }
        }

        let events = self.state.drain_events();
        for event in &events {
            if let GameEvent::GameOver { score } = *event {
                self.record_score(score);
            }
        }
        events
    }

    /// One update tick with the pending input; discrete steps are consumed
    fn run_tick(&mut self) {
        tick(&mut self.state, &self.rules, &self.input);
        self.input.nudge = 0;
    }

    fn record_score(&mut self, score: u32) {
        let variant = self.rules.variant;
        match self.high_scores.add_score(score, variant, crate::now_ms()) {
            Some(rank) => log::info!("Score {} ranked #{}", score, rank),
            None => log::info!("Score {} did not make the leaderboard", score),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Left | Key::Right => {
                if self.state.is_game_over() {
                    return;
                }
                let dir = if key == Key::Left { -1 } else { 1 };
                match self.rules.input {
                    InputModel::Step { .. } => self.input.nudge += dir,
                    InputModel::Held { .. } => {
                        if dir < 0 {
                            self.input.left = true;
                        } else {
                            self.input.right = true;
                        }
                    }
                }
            }
            Key::Restart => {
                self.restart();
            }
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.input.left = false,
            Key::Right => self.input.right = false,
            Key::Restart => {}
        }
    }

    /// Forget held arrows and queued steps, for when the host loses focus
    /// and the matching key-up will never arrive
    pub fn release_keys(&mut self) {
        if self.input != TickInput::default() {
            log::debug!("Releasing held keys");
        }
        self.input = TickInput::default();
    }

    /// Start over after a game over. Returns false (and does nothing) mid-run.
    pub fn restart(&mut self) -> bool {
        if !self.state.restart(&self.rules) {
            return false;
        }
        self.input = TickInput::default();
        self.update_timer.reset(self.rules.tick_interval_ms);
        self.spawn_timer
            .reset(self.state.difficulty.spawn_interval_ms);
        if self.rules.spawn_on_start {
            spawn_fruit(&mut self.state, &self.rules);
        }
        log::info!("Restarted");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Fruit, FruitColor, GamePhase, Variant};
    use glam::Vec2;

    fn classic() -> GameLoop {
        GameLoop::new(Rules::classic(), 5).unwrap()
    }

    fn arcade() -> GameLoop {
        GameLoop::new(Rules::arcade(), 5).unwrap()
    }

    #[test]
    fn test_timer_fires_on_boundary() {
        let mut timer = Timer::new(50.0);
        timer.advance(49.0);
        assert!(!timer.fire());
        timer.advance(1.0);
        assert!(timer.fire());
        assert_eq!(timer.remaining_ms(), 50.0);
    }

    #[test]
    fn test_rejects_invalid_rules() {
        let rules = Rules {
            starting_lives: 0,
            ..Rules::classic()
        };
        assert!(matches!(
            GameLoop::new(rules, 0),
            Err(RulesError::NoLives)
        ));
    }

    #[test]
    fn test_classic_spawns_immediately() {
        let game = classic();
        assert_eq!(game.state().fruits.len(), 1);
    }

    #[test]
    fn test_arcade_spawns_after_interval() {
        let mut game = arcade();
        assert!(game.state().fruits.is_empty());

        // 1499 ms in 100 ms frames: nothing yet
        for _ in 0..14 {
            game.advance(100.0);
        }
        game.advance(99.0);
        assert!(game.state().fruits.is_empty());

        let events = game.advance(1.0);
        assert_eq!(game.state().fruits.len(), 1);
        assert!(matches!(events.last(), Some(GameEvent::Spawned { .. })));
    }

    #[test]
    fn test_update_ticks_follow_interval() {
        let mut game = classic();
        game.advance(49.0);
        assert_eq!(game.state().time_ticks, 0);
        game.advance(1.0);
        assert_eq!(game.state().time_ticks, 1);
        game.advance(200.0);
        assert_eq!(game.state().time_ticks, 5);
    }

    #[test]
    fn test_frame_delta_is_capped() {
        let mut game = classic();
        game.advance(10_000.0);
        assert_eq!(game.state().time_ticks, 5);

        game.advance(-5.0);
        assert_eq!(game.state().time_ticks, 5);
    }

    #[test]
    fn test_ramp_shortens_spawn_timer() {
        let mut game = arcade();
        for _ in 0..6 {
            game.advance(250.0);
        }
        assert_eq!(game.state().fruits.len(), 1);
        assert_eq!(game.spawn_timer.interval_ms(), 1490.0);

        // Second spawn arrives 1490 ms after the first
        let mut elapsed = 0.0;
        while game.state().fruits.len() < 2 {
            game.advance(10.0);
            elapsed += 10.0;
            assert!(elapsed <= 1500.0);
        }
        assert_eq!(elapsed, 1490.0);
    }

    #[test]
    fn test_step_keys_queue_nudges() {
        let mut game = classic();
        game.key_down(Key::Left);
        game.key_down(Key::Left);
        assert_eq!(game.input().nudge, -2);

        game.advance(50.0);
        assert_eq!(game.state().basket.x, 120.0);
        assert_eq!(game.input().nudge, 0);

        // No double-apply on the next tick
        game.advance(50.0);
        assert_eq!(game.state().basket.x, 120.0);
    }

    #[test]
    fn test_held_keys_move_until_released() {
        let mut game = arcade();
        game.key_down(Key::Right);
        game.advance(32.0);
        assert_eq!(game.state().basket.x, 176.0);

        game.key_up(Key::Right);
        game.advance(32.0);
        assert_eq!(game.state().basket.x, 176.0);
    }

    #[test]
    fn test_release_keys_stops_held_slide() {
        let mut game = arcade();
        game.key_down(Key::Left);
        game.advance(32.0);
        assert_eq!(game.state().basket.x, 144.0);

        game.release_keys();
        assert_eq!(game.input(), &TickInput::default());
        game.advance(160.0);
        assert_eq!(game.state().basket.x, 144.0);
    }

    #[test]
    fn test_release_keys_drops_queued_steps() {
        let mut game = classic();
        game.key_down(Key::Right);
        game.key_down(Key::Right);
        game.release_keys();
        game.advance(50.0);
        assert_eq!(game.state().basket.x, 160.0);
    }

    #[test]
    fn test_advance_is_bounded_for_degenerate_intervals() {
        let mut game = classic();
        // Bypasses validation on purpose
        game.rules.tick_interval_ms = 1e-15;
        game.update_timer.reset(1e-15);

        game.advance(16.0);
        assert!(game.state().time_ticks > 0);
        assert!(game.state().time_ticks <= MAX_STEPS_PER_ADVANCE as u64);
    }

    fn force_game_over(game: &mut GameLoop) {
        game.state.fruits.clear();
        game.state.basket.x = 320.0;
        game.state.lives = 1;
        game.state.score = 7;
        let id = game.state.next_entity_id();
        game.state.fruits.push(Fruit {
            id,
            pos: Vec2::new(0.0, 600.0),
            size: 20.0,
            speed: 5.0,
            color: FruitColor::Red,
        });
    }

    #[test]
    fn test_game_over_records_high_score() {
        let mut game = classic();
        force_game_over(&mut game);

        let events = game.advance(50.0);
        assert!(events.contains(&GameEvent::GameOver { score: 7 }));
        assert_eq!(game.state().phase, GamePhase::GameOver);
        assert_eq!(game.best_score(), Some(7));
        assert_eq!(game.high_scores().entries[0].variant, Variant::Classic);
    }

    #[test]
    fn test_spawning_stops_after_game_over() {
        let mut game = classic();
        force_game_over(&mut game);
        game.advance(50.0);
        let count = game.state().fruits.len();

        for _ in 0..40 {
            game.advance(250.0);
        }
        assert_eq!(game.state().fruits.len(), count);
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let mut game = classic();
        game.state.score = 3;
        game.key_down(Key::Restart);
        assert_eq!(game.state().score, 3);

        force_game_over(&mut game);
        game.advance(50.0);
        assert!(game.state().is_game_over());

        // Arrow keys are ignored while the game is over
        game.key_down(Key::Left);
        assert_eq!(game.input().nudge, 0);

        game.key_down(Key::Restart);
        let state = game.state();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.basket.x, 160.0);
        // Classic drops the first fruit right away
        assert_eq!(state.fruits.len(), 1);
        assert_eq!(game.input(), &TickInput::default());
    }

    #[test]
    fn test_restart_resets_arcade_ramp() {
        let mut game = arcade();
        for _ in 0..40 {
            game.advance(250.0);
        }
        assert!(game.state().difficulty.fall_speed > 2.0);

        game.state.phase = GamePhase::GameOver;
        game.state.lives = 0;
        assert!(game.restart());
        assert_eq!(game.state().difficulty.fall_speed, 2.0);
        assert_eq!(game.state().difficulty.spawn_interval_ms, 1500.0);
        assert_eq!(game.spawn_timer.remaining_ms(), 1500.0);
        assert!(game.state().fruits.is_empty());
        assert_eq!(game.state().lives, 5);
    }
}
