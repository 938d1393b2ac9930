//! Scene contract and registry. `MapScene` glues the pure `SceneState` to an
//! audio backend: it executes returned effects and feeds playback outcomes
//! back into the state.

use std::collections::HashMap;

use crate::assets::AssetSource;
use crate::audio::{AudioBackend, AudioDirector};
use crate::config::SceneConfig;
use crate::effects::Effect;
use crate::error::GameError;
use crate::input::InputEvent;
use crate::render::{self, Surface};
use crate::state::SceneState;
use crate::timing::FrameTime;

pub trait Scene {
    fn on_enter(&mut self) {}
    fn on_exit(&mut self) {}
    fn handle_event(&mut self, event: InputEvent);
    /// `elapsed_ms` is the raw wall-clock delta; scenes clamp it themselves.
    fn update(&mut self, elapsed_ms: f64);
    fn render(&self, assets: &dyn AssetSource, surface: &mut dyn Surface);
}

pub const MAP_SCENE: &str = "map";

pub struct MapScene<B: AudioBackend> {
    state: SceneState,
    audio: AudioDirector<B>,
}

impl<B: AudioBackend> MapScene<B> {
    pub fn new(config: SceneConfig, backend: B) -> Self {
        let audio = AudioDirector::new(backend, &config.audio);
        Self { state: SceneState::new(config), audio }
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn audio(&self) -> &AudioDirector<B> {
        &self.audio
    }

    fn dispatch(&mut self, effects: Vec<Effect>) {
        for sfx in self.audio.apply(&effects) {
            self.state.on_sound_failed(sfx);
        }
    }
}

impl<B: AudioBackend> Scene for MapScene<B> {
    fn on_enter(&mut self) {
        log::info!("entering map scene");
        let fx = self.state.on_enter();
        self.dispatch(fx);
    }

    fn on_exit(&mut self) {
        self.dispatch(vec![Effect::StopMusic]);
    }

    fn handle_event(&mut self, event: InputEvent) {
        let fx = self.state.handle_event(event);
        self.dispatch(fx);
    }

    fn update(&mut self, elapsed_ms: f64) {
        for sfx in self.audio.poll_finished() {
            self.state.on_sound_ended(sfx);
        }
        for sfx in self.audio.poll_failed() {
            self.state.on_sound_failed(sfx);
        }
        let fx = self.state.update(FrameTime::from_elapsed_ms(elapsed_ms));
        self.dispatch(fx);
    }

    fn render(&self, assets: &dyn AssetSource, surface: &mut dyn Surface) {
        render::render(&self.state, assets, surface);
    }
}

/// Named scenes with one active at a time.
#[derive(Default)]
pub struct SceneManager {
    scenes: HashMap<String, Box<dyn Scene>>,
    current: Option<String>,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, scene: Box<dyn Scene>) {
        self.scenes.insert(name.into(), scene);
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Unknown names leave the running scene in place.
    pub fn change_scene(&mut self, name: &str) -> Result<(), GameError> {
        if !self.scenes.contains_key(name) {
            log::warn!("scene '{name}' is not registered");
            return Err(GameError::UnknownScene(name.to_string()));
        }
        if let Some(scene) = self.active_mut() {
            scene.on_exit();
        }
        self.current = Some(name.to_string());
        if let Some(scene) = self.active_mut() {
            scene.on_enter();
        }
        Ok(())
    }

    fn active_mut(&mut self) -> Option<&mut Box<dyn Scene>> {
        let name = self.current.as_ref()?;
        self.scenes.get_mut(name)
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        if let Some(scene) = self.active_mut() {
            scene.handle_event(event);
        }
    }

    pub fn update(&mut self, elapsed_ms: f64) {
        if let Some(scene) = self.active_mut() {
            scene.update(elapsed_ms);
        }
    }

    pub fn render(&self, assets: &dyn AssetSource, surface: &mut dyn Surface) {
        let Some(name) = self.current.as_ref() else { return };
        if let Some(scene) = self.scenes.get(name) {
            scene.render(assets, surface);
        }
    }
}
