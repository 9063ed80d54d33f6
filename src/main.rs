//! Fruit Frenzy entry point
//!
//! Handles platform-specific initialization and hands control to the host loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
    }

    log::info!("Fruit Frenzy starting...");

    if let Err(e) = fruit_frenzy::platform::web::run().await {
        log::error!("{}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Fruit Frenzy (native) starting...");

    if let Err(e) = fruit_frenzy::platform::native::run() {
        log::error!("{}", e);
        eprintln!("fruit-frenzy: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}
