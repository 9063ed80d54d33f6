//! Native host: a winit window driving the game once per redraw

use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use super::{PlatformError, Session, create_render_state, load_game};
use crate::game_loop::Key;

const WINDOW_TITLE: &str = "Fruit Frenzy";

/// Run until the window closes.
///
/// Initialization failures inside the event loop are carried out and
/// returned once the loop exits.
pub fn run() -> Result<(), PlatformError> {
    log::debug!("Starting winit event loop");

    let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;
    let mut app = App::default();
    event_loop
        .run_app(&mut app)
        .map_err(PlatformError::EventLoopExecution)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[derive(Default)]
struct App {
    window: Option<Arc<Window>>,
    session: Option<Session>,
    last_frame: Option<Instant>,
    error: Option<PlatformError>,
}

impl App {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), PlatformError> {
        let game = load_game()?;
        let rules = game.rules();
        let field = (rules.field_width, rules.field_height);

        let attributes = WindowAttributes::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(field.0 as f64, field.1 as f64));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .map_err(PlatformError::WindowCreation)?,
        );
        let size = window.inner_size();
        log::info!("Window created: {}x{}", size.width, size.height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .map_err(PlatformError::CreateSurface)?;
        let render = pollster::block_on(create_render_state(
            &instance,
            surface,
            size.width,
            size.height,
            field,
        ))?;

        self.session = Some(Session::new(game, render));
        self.window = Some(window);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                session.resize(size.width, size.height);
            }

            WindowEvent::Focused(false) => {
                session.release_keys();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                if code == KeyCode::Escape && event.state == ElementState::Pressed {
                    log::info!("Escape pressed, exiting");
                    event_loop.exit();
                    return;
                }
                if let Some(key) = map_key(code) {
                    match event.state {
                        ElementState::Pressed => session.key_down(key),
                        ElementState::Released => session.key_up(key),
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let elapsed_ms = self
                    .last_frame
                    .map(|t| now.duration_since(t).as_secs_f64() * 1000.0)
                    .unwrap_or(0.0);
                self.last_frame = Some(now);
                session.frame(elapsed_ms);
            }

            _ => {}
        }
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::KeyR | KeyCode::Space => Some(Key::Restart),
        _ => None,
    }
}
