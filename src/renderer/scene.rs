//! Frame geometry from game state
//!
//! Everything is emitted in field pixels (origin top-left, y down); the
//! pipeline maps it to the letterboxed viewport.

use glam::Vec2;

use super::shapes;
use super::vertex::{Theme, Vertex, fruit_rgba};
use crate::sim::{GamePhase, GameState, Rules};

const FRUIT_SEGMENTS: u32 = 24;
const HUD_SCALE: f32 = 2.0;
const HUD_MARGIN: f32 = 10.0;
const TITLE_SCALE: f32 = 5.0;
const BODY_SCALE: f32 = 3.0;
const HINT_SCALE: f32 = 2.0;

/// Build the vertex list for one frame
pub fn build_scene(
    state: &GameState,
    rules: &Rules,
    theme: &Theme,
    best: Option<u32>,
) -> Vec<Vertex> {
    let field = Vec2::new(rules.field_width, rules.field_height);
    let mut vertices = Vec::with_capacity(4096);

    vertices.extend(shapes::rect(Vec2::ZERO, field, theme.background));

    for fruit in &state.fruits {
        vertices.extend(shapes::circle(
            fruit.center(),
            fruit.size / 2.0,
            fruit_rgba(fruit.color),
            FRUIT_SEGMENTS,
        ));
    }

    let basket = state.basket.bounds();
    vertices.extend(shapes::rect(basket.min, basket.max, theme.basket));

    hud(&mut vertices, state, theme, best, field);

    if state.phase == GamePhase::GameOver {
        game_over(&mut vertices, state, rules, theme, field);
    }

    vertices
}

fn hud(
    vertices: &mut Vec<Vertex>,
    state: &GameState,
    theme: &Theme,
    best: Option<u32>,
    field: Vec2,
) {
    let line = shapes::text_height(HUD_SCALE) + 6.0;
    vertices.extend(shapes::text(
        &format!("SCORE {}", state.score),
        Vec2::splat(HUD_MARGIN),
        HUD_SCALE,
        theme.hud_text,
    ));
    vertices.extend(shapes::text(
        &format!("LIVES {}", state.lives),
        Vec2::new(HUD_MARGIN, HUD_MARGIN + line),
        HUD_SCALE,
        theme.hud_text,
    ));

    if let Some(best) = best {
        let best = format!("BEST {}", best.max(state.score));
        let x = field.x - HUD_MARGIN - shapes::text_width(&best, HUD_SCALE);
        vertices.extend(shapes::text(
            &best,
            Vec2::new(x, HUD_MARGIN),
            HUD_SCALE,
            theme.hud_text,
        ));
    }
}

fn game_over(
    vertices: &mut Vec<Vertex>,
    state: &GameState,
    rules: &Rules,
    theme: &Theme,
    field: Vec2,
) {
    if let Some(overlay) = theme.overlay {
        vertices.extend(shapes::rect(Vec2::ZERO, field, overlay));
    }

    let cx = field.x / 2.0;
    let cy = field.y / 2.0;
    vertices.extend(shapes::centered_text(
        "GAME OVER",
        cx,
        cy - 70.0,
        TITLE_SCALE,
        theme.game_over_title,
    ));
    vertices.extend(shapes::centered_text(
        &format!("FINAL SCORE {}", state.score),
        cx,
        cy,
        BODY_SCALE,
        theme.game_over_text,
    ));
    vertices.extend(shapes::centered_text(
        rules.variant.restart_hint(),
        cx,
        cy + 50.0,
        HINT_SCALE,
        theme.game_over_text,
    ));
}
