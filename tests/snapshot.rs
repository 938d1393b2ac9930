// Snapshot tests (native, `serde_json` feature): a mid-battle scene survives a
// JSON round trip and keeps rendering and ticking identically.
#![cfg(feature = "serde_json")]

use bugia_encounter::assets::{AssetSource, ImageId, ImageInfo};
use bugia_encounter::{FrameTime, InputEvent, Key, Rect, SceneConfig, SceneState, Sfx, Surface};

struct AllReady;

impl AssetSource for AllReady {
    fn image(&self, _id: ImageId) -> Option<ImageInfo> {
        Some(ImageInfo { width: 1024, height: 1024 })
    }
}

#[derive(Default)]
struct Recorder(Vec<String>);

impl Surface for Recorder {
    fn fill_rect(&mut self, rect: Rect, color: &str, alpha: f64) {
        self.0.push(format!("fill {rect:?} {color} {alpha}"));
    }
    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f64) {
        self.0.push(format!("stroke {rect:?} {color} {line_width}"));
    }
    fn draw_image(&mut self, id: ImageId, src: Option<Rect>, dest: Rect, alpha: f64) {
        self.0.push(format!("image {id:?} {src:?} {dest:?} {alpha}"));
    }
    fn draw_text(&mut self, text: &str, x: f64, y: f64, color: &str, alpha: f64) {
        self.0.push(format!("text {text} {x} {y} {color} {alpha}"));
    }
}

fn frames(state: &SceneState) -> Vec<String> {
    let mut rec = Recorder::default();
    bugia_encounter::render(state, &AllReady, &mut rec);
    rec.0
}

fn mid_battle() -> SceneState {
    let mut state = SceneState::new(SceneConfig::default());
    state.handle_event(InputEvent::KeyDown(Key::Up));
    for _ in 0..3_000 {
        let fx = state.update(FrameTime::one_tick());
        if fx.contains(&bugia_encounter::Effect::PlaySound(Sfx::WildCry)) {
            state.on_sound_failed(Sfx::WildCry);
        }
        if state.in_battle() && !state.battle.panels.gate.all_docked() {
            break;
        }
    }
    state
}

#[test]
fn snapshot_round_trip_renders_identically() {
    let state = mid_battle();
    assert!(state.in_battle(), "snapshot taken during the battle intro");

    let json = serde_json::to_string(&state).unwrap();
    let restored: SceneState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, state);
    assert_eq!(frames(&restored), frames(&state));

    let (a, fx_a) = state.advance(FrameTime::one_tick());
    let (b, fx_b) = restored.advance(FrameTime::one_tick());
    assert_eq!(a, b);
    assert_eq!(fx_a, fx_b);
}

#[test]
fn partial_config_override_keeps_defaults() {
    let cfg = SceneConfig::from_json(r#"{"dialog": {"text": "A wild bug appeared!"}}"#).unwrap();
    assert_eq!(cfg.dialog.text, "A wild bug appeared!");
    assert_eq!(cfg.dialog.pause_ms, SceneConfig::default().dialog.pause_ms);
    assert_eq!(cfg.world, SceneConfig::default().world);
}
