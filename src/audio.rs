//! Audio collaborator boundary. The scene only emits `Effect`s; the director
//! executes them against a backend, suppresses one-shots that are still
//! playing, owns mute, and reports sounds that failed to start.

use crate::config::AudioConfig;
use crate::effects::{Effect, Music, Sfx};
use crate::error::GameError;

pub type SoundHandle = u32;

pub trait AudioBackend {
    fn play_music(&mut self, track: Music, looped: bool) -> Result<(), GameError>;
    fn stop_music(&mut self);
    fn play_sfx(&mut self, sfx: Sfx) -> Result<SoundHandle, GameError>;
    fn is_playing(&self, sfx: Sfx) -> bool;
    fn set_music_volume(&mut self, volume: f64);
    fn set_sfx_volume(&mut self, volume: f64);
    /// One-shots whose playback ended since the previous call.
    fn drain_finished(&mut self) -> Vec<Sfx>;
    /// One-shots rejected after `play_sfx` returned, e.g. by an autoplay policy.
    fn drain_failed(&mut self) -> Vec<Sfx> {
        Vec::new()
    }
}

impl<B: AudioBackend + ?Sized> AudioBackend for Box<B> {
    fn play_music(&mut self, track: Music, looped: bool) -> Result<(), GameError> {
        (**self).play_music(track, looped)
    }
    fn stop_music(&mut self) {
        (**self).stop_music()
    }
    fn play_sfx(&mut self, sfx: Sfx) -> Result<SoundHandle, GameError> {
        (**self).play_sfx(sfx)
    }
    fn is_playing(&self, sfx: Sfx) -> bool {
        (**self).is_playing(sfx)
    }
    fn set_music_volume(&mut self, volume: f64) {
        (**self).set_music_volume(volume)
    }
    fn set_sfx_volume(&mut self, volume: f64) {
        (**self).set_sfx_volume(volume)
    }
    fn drain_finished(&mut self) -> Vec<Sfx> {
        (**self).drain_finished()
    }
    fn drain_failed(&mut self) -> Vec<Sfx> {
        (**self).drain_failed()
    }
}

/// Backend with no output. Every one-shot fails, so timers take over.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn play_music(&mut self, _track: Music, _looped: bool) -> Result<(), GameError> {
        Ok(())
    }
    fn stop_music(&mut self) {}
    fn play_sfx(&mut self, sfx: Sfx) -> Result<SoundHandle, GameError> {
        Err(GameError::AudioUnavailable { sound: sfx })
    }
    fn is_playing(&self, _sfx: Sfx) -> bool {
        false
    }
    fn set_music_volume(&mut self, _volume: f64) {}
    fn set_sfx_volume(&mut self, _volume: f64) {}
    fn drain_finished(&mut self) -> Vec<Sfx> {
        Vec::new()
    }
}

pub struct AudioDirector<B: AudioBackend> {
    backend: B,
    music_volume: f64,
    sfx_volume: f64,
    muted: bool,
}

impl<B: AudioBackend> AudioDirector<B> {
    pub fn new(mut backend: B, cfg: &AudioConfig) -> Self {
        backend.set_music_volume(cfg.music_volume);
        backend.set_sfx_volume(cfg.sfx_volume);
        Self { backend, music_volume: cfg.music_volume, sfx_volume: cfg.sfx_volume, muted: false }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Executes effects in order; returns the one-shots that could not start.
    pub fn apply(&mut self, effects: &[Effect]) -> Vec<Sfx> {
        let mut failed = Vec::new();
        for effect in effects {
            match *effect {
                Effect::PlaySound(sfx) => {
                    if self.backend.is_playing(sfx) {
                        log::debug!("{sfx:?} still playing, not restarted");
                        continue;
                    }
                    if let Err(err) = self.backend.play_sfx(sfx) {
                        log::warn!("{err}");
                        failed.push(sfx);
                    }
                }
                Effect::PlayMusic { track, looped } => {
                    if let Err(err) = self.backend.play_music(track, looped) {
                        log::warn!("music {track:?}: {err}");
                    }
                }
                Effect::StopMusic => self.backend.stop_music(),
                Effect::ToggleMute => self.toggle_mute(),
            }
        }
        failed
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        let (music, sfx) = if self.muted { (0.0, 0.0) } else { (self.music_volume, self.sfx_volume) };
        self.backend.set_music_volume(music);
        self.backend.set_sfx_volume(sfx);
        log::info!("audio {}", if self.muted { "muted" } else { "unmuted" });
    }

    pub fn poll_finished(&mut self) -> Vec<Sfx> {
        self.backend.drain_finished()
    }

    pub fn poll_failed(&mut self) -> Vec<Sfx> {
        self.backend.drain_failed()
    }
}
