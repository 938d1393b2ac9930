//! Side effects requested by state transitions. Transitions never touch the
//! audio output directly; they push `Effect`s that the scene hands to the
//! `AudioDirector` after the tick.

/// One-shot sound effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sfx {
    Collision,
    /// Confirm blip, also used for the alert indicator and dialog arrival.
    Confirm,
    Denied,
    WildCry,
    BattleCry,
    BallToss,
    BallPoof,
    Spore,
    SpikeCannon,
}

impl Sfx {
    pub const ALL: [Sfx; 9] = [
        Sfx::Collision,
        Sfx::Confirm,
        Sfx::Denied,
        Sfx::WildCry,
        Sfx::BattleCry,
        Sfx::BallToss,
        Sfx::BallPoof,
        Sfx::Spore,
        Sfx::SpikeCannon,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Sfx::Collision => "assets/sounds/SFX_COLLISION.wav",
            Sfx::Confirm => "assets/sounds/SFX_PRESS_AB.wav",
            Sfx::Denied => "assets/sounds/SFX_DENIED.wav",
            Sfx::WildCry | Sfx::BattleCry => "assets/sounds/SFX_CRY_17.wav",
            Sfx::BallToss => "assets/sounds/SFX_BALL_TOSS.wav",
            Sfx::BallPoof => "assets/sounds/SFX_BALL_POOF.wav",
            Sfx::Spore => "assets/sounds/Spore.mp3",
            Sfx::SpikeCannon => "assets/sounds/SpikeCannon.mp3",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Music {
    Overworld,
    Battle,
}

impl Music {
    pub fn path(self) -> &'static str {
        match self {
            Music::Overworld => "assets/sounds/32 Mt. Moon.mp3",
            Music::Battle => "assets/sounds/14 Battle! (Wild Pokemon).mp3",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    PlaySound(Sfx),
    PlayMusic { track: Music, looped: bool },
    StopMusic,
    ToggleMute,
}

/// Collects effects emitted during one transition.
#[derive(Debug, Default)]
pub struct Effects(Vec<Effect>);

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sound(&mut self, sfx: Sfx) {
        self.0.push(Effect::PlaySound(sfx));
    }

    pub fn push(&mut self, effect: Effect) {
        self.0.push(effect);
    }

    pub fn extend(&mut self, other: Effects) {
        self.0.extend(other.0);
    }

    pub fn count_sound(&self, sfx: Sfx) -> usize {
        self.0.iter().filter(|e| **e == Effect::PlaySound(sfx)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Effect] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Effect> {
        self.0
    }
}
