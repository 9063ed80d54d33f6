//! Browser host: `#canvas`, keyboard listeners and a `requestAnimationFrame` loop

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{FocusEvent, HtmlCanvasElement, KeyboardEvent};

use super::{PlatformError, Session, create_render_state, key_from_web, load_game};

pub async fn run() -> Result<(), PlatformError> {
    let window = web_sys::window().ok_or_else(|| PlatformError::Canvas("no window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| PlatformError::Canvas("no document".into()))?;

    let canvas: HtmlCanvasElement = document
        .get_element_by_id("canvas")
        .ok_or_else(|| PlatformError::Canvas("no #canvas element".into()))?
        .dyn_into()
        .map_err(|_| PlatformError::Canvas("#canvas is not a canvas".into()))?;

    // Back the canvas with device pixels
    let dpr = window.device_pixel_ratio();
    let width = (canvas.client_width() as f64 * dpr) as u32;
    let height = (canvas.client_height() as f64 * dpr) as u32;
    canvas.set_width(width);
    canvas.set_height(height);

    let game = load_game()?;
    let field = (game.rules().field_width, game.rules().field_height);

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::BROWSER_WEBGPU,
        ..Default::default()
    });
    let surface = instance
        .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
        .map_err(PlatformError::CreateSurface)?;
    let render = create_render_state(&instance, surface, width, height, field).await?;

    let session = Rc::new(RefCell::new(Session::new(game, render)));
    setup_input_handlers(&window, session.clone());
    setup_focus_loss(&window, &document, session.clone());
    request_animation_frame(session, None);

    log::info!("Fruit Frenzy running");
    Ok(())
}

/// Arrow keys and space would otherwise scroll the page
fn scrolls_page(key: &str) -> bool {
    matches!(key, "ArrowLeft" | "ArrowRight" | " ")
}

fn setup_input_handlers(window: &web_sys::Window, session: Rc<RefCell<Session>>) {
    {
        let session = session.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let key = event.key();
            if scrolls_page(&key) {
                event.prevent_default();
            }
            if let Some(key) = key_from_web(&key) {
                session.borrow_mut().key_down(key);
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if let Some(key) = key_from_web(&event.key()) {
                session.borrow_mut().key_up(key);
            }
        });
        let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// Key-ups are never delivered once the page loses focus
fn setup_focus_loss(
    window: &web_sys::Window,
    document: &web_sys::Document,
    session: Rc<RefCell<Session>>,
) {
    {
        let session = session.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: FocusEvent| {
            session.borrow_mut().release_keys();
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            session.borrow_mut().release_keys();
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn request_animation_frame(session: Rc<RefCell<Session>>, last_time: Option<f64>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |time: f64| {
        game_loop(session, last_time, time);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn game_loop(session: Rc<RefCell<Session>>, last_time: Option<f64>, time: f64) {
    let elapsed_ms = last_time.map(|last| time - last).unwrap_or(0.0);
    session.borrow_mut().frame(elapsed_ms);
    request_animation_frame(session, Some(time));
}
