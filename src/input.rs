//! Input events as one tagged union, decoded from DOM key codes at the edge.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Back,
    Restart,
    Mute,
    Other,
}

impl Key {
    /// Maps a `KeyboardEvent.code` value.
    pub fn from_code(code: &str) -> Self {
        match code {
            "ArrowUp" | "KeyW" => Key::Up,
            "ArrowDown" | "KeyS" => Key::Down,
            "ArrowLeft" | "KeyA" => Key::Left,
            "ArrowRight" | "KeyD" => Key::Right,
            "Enter" | "NumpadEnter" | "Space" => Key::Confirm,
            "Escape" | "Backspace" => Key::Back,
            "KeyR" => Key::Restart,
            "KeyM" => Key::Mute,
            _ => Key::Other,
        }
    }

    pub fn is_direction(self) -> bool {
        matches!(self, Key::Up | Key::Down | Key::Left | Key::Right)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Canvas-space coordinates.
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
}
