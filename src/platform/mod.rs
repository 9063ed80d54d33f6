//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Window or canvas creation
//! - Input events
//! - The frame callback that drives [`GameLoop::advance`]
//!
//! Both hosts share [`Session`], which owns the game and the render state.

#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::game_loop::{GameLoop, Key};
use crate::highscores::HighScores;
use crate::renderer::{RenderInitError, RenderState, Theme, build_scene};
use crate::settings::Settings;
use crate::sim::{GameEvent, RulesError};

/// Host initialization failures. All of these are fatal.
#[derive(Debug)]
pub enum PlatformError {
    #[cfg(not(target_arch = "wasm32"))]
    EventLoopCreation(winit::error::EventLoopError),
    #[cfg(not(target_arch = "wasm32"))]
    EventLoopExecution(winit::error::EventLoopError),
    #[cfg(not(target_arch = "wasm32"))]
    WindowCreation(winit::error::OsError),
    /// Missing window, document or `#canvas` element
    Canvas(String),
    CreateSurface(wgpu::CreateSurfaceError),
    RequestAdapter(wgpu::RequestAdapterError),
    Renderer(RenderInitError),
    InvalidRules(RulesError),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(not(target_arch = "wasm32"))]
            Self::EventLoopCreation(e) => write!(f, "Event loop creation failed: {}", e),
            #[cfg(not(target_arch = "wasm32"))]
            Self::EventLoopExecution(e) => write!(f, "Event loop error: {}", e),
            #[cfg(not(target_arch = "wasm32"))]
            Self::WindowCreation(e) => write!(f, "Window creation failed: {}", e),
            Self::Canvas(msg) => write!(f, "Canvas unavailable: {}", msg),
            Self::CreateSurface(e) => write!(f, "Surface creation failed: {}", e),
            Self::RequestAdapter(e) => write!(f, "No suitable GPU adapter: {}", e),
            Self::Renderer(e) => write!(f, "Renderer setup failed: {}", e),
            Self::InvalidRules(e) => write!(f, "Invalid rules: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {}

impl From<RulesError> for PlatformError {
    fn from(e: RulesError) -> Self {
        Self::InvalidRules(e)
    }
}

/// Map a DOM `KeyboardEvent.key` value
pub fn key_from_web(key: &str) -> Option<Key> {
    match key {
        "ArrowLeft" => Some(Key::Left),
        "ArrowRight" => Some(Key::Right),
        "r" | "R" | " " => Some(Key::Restart),
        _ => None,
    }
}

/// Build the game from stored settings and high scores
pub fn load_game() -> Result<GameLoop, PlatformError> {
    let settings = Settings::load();
    let seed = crate::clock_seed();
    let game = GameLoop::new(settings.rules(), seed)?.with_high_scores(HighScores::load());
    log::info!("Game initialized with seed: {}", seed);
    Ok(game)
}

/// Pick an adapter for `surface` and set up the render pipeline
pub async fn create_render_state(
    instance: &wgpu::Instance,
    surface: wgpu::Surface<'static>,
    width: u32,
    height: u32,
    field: (f32, f32),
) -> Result<RenderState, PlatformError> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await
        .map_err(PlatformError::RequestAdapter)?;

    log::info!("Using adapter: {:?}", adapter.get_info().name);

    RenderState::new(surface, &adapter, width, height, field)
        .await
        .map_err(PlatformError::Renderer)
}

/// A running game attached to a drawable surface
pub struct Session {
    game: GameLoop,
    theme: Theme,
    render: RenderState,
}

impl Session {
    pub fn new(game: GameLoop, render: RenderState) -> Self {
        let theme = Theme::for_variant(game.rules().variant);
        Self {
            game,
            theme,
            render,
        }
    }

    pub fn key_down(&mut self, key: Key) {
        self.game.key_down(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.game.key_up(key);
    }

    /// Drop held input when the window or tab loses focus
    pub fn release_keys(&mut self) {
        self.game.release_keys();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.render.resize(width, height);
    }

    /// Advance by the wall-clock time since the last frame, then draw
    pub fn frame(&mut self, elapsed_ms: f64) {
        let events = self.game.advance(elapsed_ms);
        if events
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. }))
        {
            if let Err(e) = self.game.high_scores().save() {
                log::warn!("Could not save high scores: {}", e);
            }
        }

        let vertices = build_scene(
            self.game.state(),
            self.game.rules(),
            &self.theme,
            self.game.best_score(),
        );
        match self.render.render(&vertices) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.render.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory while rendering");
            }
            Err(e) => log::warn!("Surface error: {:?}", e),
        }
    }
}
