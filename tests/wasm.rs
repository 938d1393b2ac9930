// Browser smoke tests; run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use bugia_encounter::{FrameTime, SceneConfig, SceneState};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn scene_ticks_in_the_browser() {
    let mut state = SceneState::new(SceneConfig::default());
    state.update(FrameTime::one_tick());
    assert!(!state.in_battle());
}

#[wasm_bindgen_test]
fn start_game_creates_the_canvas() {
    bugia_encounter::start_game(None).unwrap();
    let doc = web_sys::window().unwrap().document().unwrap();
    assert!(doc.get_element_by_id("bugia-canvas").is_some());
}
