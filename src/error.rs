//! Error taxonomy shared by the loaders, the audio director and the scene
//! registry. None of these is fatal to the frame loop: callers log them and
//! carry on with the asset or sound treated as absent.

use crate::assets::ImageId;
use crate::effects::Sfx;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("failed to load image {asset:?}: {reason}")]
    AssetLoad { asset: ImageId, reason: String },

    #[error("no audio output available for {sound:?}")]
    AudioUnavailable { sound: Sfx },

    #[error("playback of {sound:?} failed: {reason}")]
    AudioPlayback { sound: Sfx, reason: String },

    #[error("scene '{0}' is not registered")]
    UnknownScene(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[cfg(feature = "serde_json")]
    #[error("could not parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("browser API failure: {0}")]
    Dom(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for GameError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        GameError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}
