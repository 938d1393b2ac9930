//! Bugia encounter core crate.
//!
//! A top-down overworld where the player walks a small map, trips a scripted
//! creature encounter, and fades into an animated battle screen with a
//! playable FIGHT/BAG/POKéMON/RUN menu. All gameplay is a pure state machine
//! (`state::SceneState`) that returns side effects; the browser host in `web`
//! drives it from requestAnimationFrame and draws it onto a canvas.

use wasm_bindgen::prelude::*;

pub mod assets;
pub mod audio;
pub mod battle;
pub mod config;
pub mod dialog;
pub mod effects;
pub mod encounter;
pub mod error;
pub mod fade;
pub mod input;
pub mod logging;
pub mod render;
pub mod scene;
pub mod state;
pub mod timing;
pub mod world;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::SceneConfig;
pub use effects::{Effect, Music, Sfx};
pub use error::GameError;
pub use input::{InputEvent, Key};
pub use render::{Rect, Surface, render};
pub use scene::{MapScene, Scene, SceneManager};
pub use state::SceneState;
pub use timing::FrameTime;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
}

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

/// Starts the game on a canvas. `config_json` optionally overrides any subset
/// of the tunables (requires the `serde_json` feature).
#[wasm_bindgen]
pub fn start_game(config_json: Option<String>) -> Result<(), JsValue> {
    let config = load_config(config_json.as_deref()).map_err(|err| JsValue::from_str(&err.to_string()))?;
    launch(config)
}

#[cfg(target_arch = "wasm32")]
fn launch(config: SceneConfig) -> Result<(), JsValue> {
    web::start(config)
}

#[cfg(not(target_arch = "wasm32"))]
fn launch(_config: SceneConfig) -> Result<(), JsValue> {
    Err(JsValue::from_str("the browser host is only available on wasm32"))
}

fn load_config(json: Option<&str>) -> Result<SceneConfig, GameError> {
    match json {
        #[cfg(feature = "serde_json")]
        Some(text) => SceneConfig::from_json(text),
        #[cfg(not(feature = "serde_json"))]
        Some(_) => {
            log::warn!("config override ignored: built without the serde_json feature");
            Ok(SceneConfig::default())
        }
        None => {
            let cfg = SceneConfig::default();
            cfg.validate()?;
            Ok(cfg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        assert_eq!(load_config(None).unwrap(), SceneConfig::default());
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_override_is_validated() {
        assert!(load_config(Some(r#"{"fade": {"speed": 0}}"#)).is_err());
        let cfg = load_config(Some(r#"{"fade": {"speed": 20}}"#)).unwrap();
        assert_eq!(cfg.fade.speed, 20.0);
    }
}
