// Reactor Core - Game Events & Data Types

use std::ops::Sub;

// ---------------------------------------------------------------------------
// Motion sample (3-axis accelerometer reading, m/s²)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length of the vector.
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

// ---------------------------------------------------------------------------
// Player actions
// ---------------------------------------------------------------------------

/// Resolved button gesture, pulsed for exactly one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Tap,
    DoubleTap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionLabel {
    Tap,
    DoubleTap,
    Shake,
    Twist,
    DirectionalLeft,
    DirectionalRight,
}

impl ActionLabel {
    /// Command word shown to the player when this action is the target.
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Tap              => "VENT",
            Self::DoubleTap        => "PING",
            Self::Shake            => "QUAKE",
            Self::Twist            => "TWIST",
            Self::DirectionalLeft  => "LEFT",
            Self::DirectionalRight => "RIGHT",
        }
    }
}

impl From<ButtonAction> for ActionLabel {
    fn from(action: ButtonAction) -> Self {
        match action {
            ButtonAction::Tap       => Self::Tap,
            ButtonAction::DoubleTap => Self::DoubleTap,
        }
    }
}

// ---------------------------------------------------------------------------
// Game lifecycle
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Menu,
    Play,
    GameOver,
}

/// Why a round ended in a loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundFailure {
    /// The player performed a different action than the target.
    Mismatch { expected: ActionLabel, got: ActionLabel },
    /// The round clock ran out with no action resolved.
    Timeout,
}

/// Observable state changes, emitted at most once per tick by the state
/// machine and turned into screens/light colors by the console.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Knob moved in the menu.
    LevelChanged { level: u8, time_limit: f32 },
    /// Settle delay before a round has begun.
    GetReady,
    /// A new round with a fresh target is live.
    RoundStarted { target: ActionLabel, time_limit: f32 },
    /// Correct action; `score` is the new total.
    RoundWon { score: u32, level: u8 },
    /// Wrong action or timeout; the game is over.
    RoundLost { reason: RoundFailure, score: u32 },
    /// Back in the menu after a game over.
    ReturnedToMenu { level: u8, time_limit: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_of_pythagorean_triple() {
        assert!((Vec3::new(3.0, 4.0, 12.0).magnitude() - 13.0).abs() < 1e-5);
    }

    #[test]
    fn button_actions_map_to_labels() {
        assert_eq!(ActionLabel::from(ButtonAction::Tap), ActionLabel::Tap);
        assert_eq!(ActionLabel::from(ButtonAction::DoubleTap), ActionLabel::DoubleTap);
    }
}
