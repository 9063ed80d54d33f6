//! End-to-end gameplay through the public API

use fruit_frenzy::game_loop::Key;
use fruit_frenzy::sim::{
    Fruit, FruitColor, GameEvent, GamePhase, GameState, Rules, TickInput, Variant, tick,
};
use fruit_frenzy::{GameLoop, HighScores};
use glam::Vec2;

fn drop_fruit(state: &mut GameState, x: f32, size: f32, speed: f32) -> u32 {
    let id = state.next_entity_id();
    state.fruits.push(Fruit {
        id,
        pos: Vec2::new(x, 0.0),
        size,
        speed,
        color: FruitColor::Red,
    });
    id
}

/// Advance in frame-sized steps until game over, with an upper bound
fn play_until_game_over(game: &mut GameLoop, max_ms: f64) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let mut elapsed = 0.0;
    while !game.state().is_game_over() && elapsed < max_ms {
        events.extend(game.advance(100.0));
        elapsed += 100.0;
    }
    events
}

#[test]
fn fruit_over_basket_is_caught() {
    let rules = Rules::classic();
    let mut state = GameState::new(&rules, 0);
    assert_eq!(state.basket.x, 160.0);
    assert_eq!(state.basket.y, 570.0);
    let id = drop_fruit(&mut state, 170.0, 30.0, 5.0);

    let limit = (570.0_f32 / 5.0).ceil() as u32;
    let mut caught_at = None;
    for n in 1..=limit {
        tick(&mut state, &rules, &TickInput::default());
        if state.drain_events().contains(&GameEvent::Caught { id, score: 1 }) {
            caught_at = Some(n);
            break;
        }
    }

    assert!(caught_at.is_some(), "not caught within {} ticks", limit);
    assert_eq!(state.score, 1);
    assert!(state.fruits.is_empty());
    assert_eq!(state.lives, rules.starting_lives);
}

#[test]
fn fruit_past_the_bottom_costs_a_life() {
    let rules = Rules::classic();
    let mut state = GameState::new(&rules, 0);
    let id = drop_fruit(&mut state, 0.0, 20.0, 5.0);

    let mut missed = false;
    for _ in 0..200 {
        tick(&mut state, &rules, &TickInput::default());
        if state.drain_events().contains(&GameEvent::Missed { id, lives: 2 }) {
            missed = true;
            break;
        }
    }

    assert!(missed);
    assert_eq!(state.lives, 2);
    assert_eq!(state.score, 0);
    assert!(state.fruits.is_empty());
}

#[test]
fn unattended_classic_run_ends_and_restarts() {
    let mut game = GameLoop::new(Rules::classic(), 2024).unwrap();
    let events = play_until_game_over(&mut game, 600_000.0);

    assert!(game.state().is_game_over());
    assert_eq!(game.state().lives, 0);
    let final_score = game.state().score;
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count(),
        1
    );
    assert!(events.contains(&GameEvent::GameOver { score: final_score }));
    let misses = events
        .iter()
        .filter(|e| matches!(e, GameEvent::Missed { .. }))
        .count();
    assert_eq!(misses, 3);

    // Nothing moves while game over
    let frozen = game.state().fruits.clone();
    assert!(game.advance(250.0).is_empty());
    assert_eq!(game.state().fruits, frozen);
    assert_eq!(game.state().score, final_score);

    game.key_down(Key::Restart);
    let state = game.state();
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.score, 0);
    assert_eq!(state.lives, 3);
    // Classic drops a fruit straight away
    assert_eq!(state.fruits.len(), 1);
    assert_eq!(state.basket.x, 160.0);
}

#[test]
fn restart_is_ignored_mid_run() {
    let mut game = GameLoop::new(Rules::arcade(), 5).unwrap();
    game.advance(250.0);
    let before = game.state().time_ticks;

    game.key_down(Key::Restart);
    assert!(!game.restart());
    assert_eq!(game.state().time_ticks, before);
    assert!(!game.advance(0.0).contains(&GameEvent::Restarted));
}

#[test]
fn held_arrow_slides_basket_to_the_wall() {
    let mut game = GameLoop::new(Rules::arcade(), 1).unwrap();
    game.key_down(Key::Left);
    for _ in 0..4 {
        game.advance(250.0);
    }
    assert_eq!(game.state().basket.x, 0.0);

    game.key_up(Key::Left);
    game.key_down(Key::Right);
    for _ in 0..8 {
        game.advance(250.0);
    }
    assert_eq!(game.state().basket.x, 320.0);
}

#[test]
fn game_over_score_lands_on_the_leaderboard() {
    let mut game = GameLoop::new(Rules::classic(), 77)
        .unwrap()
        .with_high_scores(HighScores::new());

    // Steer under the lowest fruit for two catches, then park at the wall
    let mut events = Vec::new();
    let mut elapsed = 0.0;
    while !game.state().is_game_over() && elapsed < 600_000.0 {
        let state = game.state();
        let basket_center = state.basket.x + state.basket.width / 2.0;
        let lowest = state
            .fruits
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|f| f.center().x);
        match (state.score < 2, lowest) {
            (true, Some(x)) if x < basket_center - 10.0 => game.key_down(Key::Left),
            (true, Some(x)) if x > basket_center + 10.0 => game.key_down(Key::Right),
            (true, _) => {}
            (false, _) => game.key_down(Key::Left),
        }
        events.extend(game.advance(50.0));
        elapsed += 50.0;
    }

    assert!(game.state().is_game_over());
    let score = game.state().score;
    assert!(score >= 2);
    assert!(events.contains(&GameEvent::GameOver { score }));
    assert_eq!(game.best_score(), Some(score));
    let entries = &game.high_scores().entries;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].score, score);
    assert_eq!(entries[0].variant, Variant::Classic);
}

#[test]
fn same_seed_same_inputs_same_run() {
    let script = [
        (Some(Key::Left), 120.0),
        (None, 250.0),
        (Some(Key::Right), 250.0),
        (None, 250.0),
        (None, 250.0),
        (Some(Key::Left), 90.0),
        (None, 250.0),
    ];

    let run = |seed: u64| {
        let mut game = GameLoop::new(Rules::arcade(), seed).unwrap();
        let mut events = Vec::new();
        for _ in 0..20 {
            for (key, ms) in script {
                if let Some(key) = key {
                    game.key_up(Key::Left);
                    game.key_up(Key::Right);
                    game.key_down(key);
                }
                events.extend(game.advance(ms));
            }
        }
        (game.state().clone(), events)
    };

    let (a, events_a) = run(31337);
    let (b, events_b) = run(31337);
    assert_eq!(events_a, events_b);
    assert_eq!(a.fruits, b.fruits);
    assert_eq!(a.score, b.score);
    assert_eq!(a.lives, b.lives);
    assert_eq!(a.basket, b.basket);
    assert_eq!(a.time_ticks, b.time_ticks);
}
