// Reactor Core - Hardware & Game Configuration
// Target: Seeed Studio Xiao ESP32-C3 (RISC-V)

use std::time::Duration;

use crate::events::ActionLabel;
use crate::rotary::RotaryPolicy;

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (Xiao ESP32-C3 pinout)
// ---------------------------------------------------------------------------
pub const PIN_ENCODER_A: i32 = 2;   // D0    - Rotary encoder channel A (INPUT_PULLUP)
pub const PIN_ENCODER_B: i32 = 3;   // D1    - Rotary encoder channel B (INPUT_PULLUP)
pub const PIN_BUTTON: i32 = 4;      // D2    - User button (INPUT_PULLUP, active LOW)
pub const PIN_PIXEL: i32 = 5;       // D3    - WS2812 status light
pub const PIN_I2C_SDA: i32 = 6;     // D4    - I2C data line
pub const PIN_I2C_SCL: i32 = 7;     // D5    - I2C clock line

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_ADDR_ADXL345: u8 = 0x53;
pub const I2C_ADDR_OLED: u8 = 0x3C;
pub const I2C_BAUDRATE_KHZ: u32 = 400;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks

// ---------------------------------------------------------------------------
// Display (SSD1306 OLED)
// ---------------------------------------------------------------------------
pub const SCREEN_WIDTH: u32 = 128;
pub const SCREEN_HEIGHT: u32 = 64;
pub const DISPLAY_BUFFER_SIZE: usize = (SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize) / 8; // 1024
pub const DISPLAY_LINE_Y: [i32; 4] = [8, 24, 40, 56];

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_GAME: usize = 8192;

// ---------------------------------------------------------------------------
// Status light
// ---------------------------------------------------------------------------
pub const PIXEL_BRIGHTNESS: f32 = 0.3;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const POLL_INTERVAL_MS: u64 = 10;                  // 100 Hz input poll
pub const CALIBRATION_SAMPLE_INTERVAL_MS: u64 = 50;
pub const CALIBRATION_HOLD_MS: u64 = 1000;             // "COMPLETE" screen
pub const TAP_WINDOW_MS: u64 = 350;                    // single vs double tap
pub const SHAKE_SUPPRESS_MS: u64 = 500;                // button ringing mask
pub const SUCCESS_PAUSE_MS: u64 = 500;
pub const BUTTON_DEBOUNCE_MS: u64 = 5;

// ---------------------------------------------------------------------------
// Motion
// ---------------------------------------------------------------------------
pub const CALIBRATION_SAMPLES: usize = 20;
pub const CALIBRATION_READ_RETRIES: usize = 3;
pub const STANDARD_GRAVITY: f32 = 9.81;
pub const ADXL345_SCALE_FULL_RES: f32 = 0.004 * 9.806_65; // m/s² per LSB

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------
pub const LEVEL_MIN: u8 = 1;
pub const LEVEL_MAX: u8 = 10;
pub const POINTS_PER_LEVEL: u32 = 5;
pub const DIRECTIONAL_THRESHOLD: i32 = 3;

/// How the knob changes the level while the menu is idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnobPolicy {
    /// Any movement advances one level, wrapping past the maximum.
    Cycle,
    /// Clockwise +1, counter-clockwise -1, clamped to the level range.
    Step,
}

impl KnobPolicy {
    /// Apply one observed knob movement of `delta` detents to `level`.
    pub fn adjust(self, level: u8, delta: i32) -> u8 {
        match self {
            Self::Cycle => {
                if level >= LEVEL_MAX {
                    LEVEL_MIN
                } else {
                    (level + 1).max(LEVEL_MIN)
                }
            }
            Self::Step => {
                let stepped = if delta > 0 {
                    level.saturating_add(1)
                } else if delta < 0 {
                    level.saturating_sub(1)
                } else {
                    level
                };
                stepped.clamp(LEVEL_MIN, LEVEL_MAX)
            }
        }
    }
}

/// Level select screen style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuLayout {
    /// "SELECT LEVEL" with difficulty name and time limit.
    Select,
    /// "REACTOR CORE" banner with fixed instructions and the bare level.
    Banner,
}

/// A named bundle of thresholds and policies the game engine runs with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variant {
    pub name: &'static str,
    pub shake_threshold: f32,
    pub rotary: RotaryPolicy,
    pub commands: &'static [ActionLabel],
    pub time_base: f32,
    pub time_step: f32,
    pub time_floor: f32,
    /// `None` lets the level keep climbing past `LEVEL_MAX` during play.
    pub level_cap: Option<u8>,
    pub settle: Duration,
    pub knob: KnobPolicy,
    pub menu: MenuLayout,
}

impl Variant {
    pub const A: Variant = Variant {
        name: "A",
        shake_threshold: 20.0,
        rotary: RotaryPolicy::AbsoluteThreshold,
        commands: &[
            ActionLabel::Tap,
            ActionLabel::DoubleTap,
            ActionLabel::Shake,
            ActionLabel::Twist,
        ],
        time_base: 3.0,
        time_step: 0.18,
        time_floor: 1.2,
        level_cap: Some(LEVEL_MAX),
        settle: Duration::from_millis(800),
        knob: KnobPolicy::Cycle,
        menu: MenuLayout::Select,
    };

    pub const B: Variant = Variant {
        name: "B",
        shake_threshold: 15.0,
        rotary: RotaryPolicy::SignedThreshold(DIRECTIONAL_THRESHOLD),
        commands: &[
            ActionLabel::Tap,
            ActionLabel::Shake,
            ActionLabel::DirectionalLeft,
            ActionLabel::DirectionalRight,
        ],
        time_base: 3.0,
        time_step: 0.2,
        time_floor: 0.8,
        level_cap: None,
        settle: Duration::from_millis(500),
        knob: KnobPolicy::Step,
        menu: MenuLayout::Banner,
    };

    /// Round time limit (seconds) selected from the menu for `level`.
    pub fn time_limit(&self, level: u8) -> f32 {
        (self.time_base - f32::from(level) * self.time_step).max(self.time_floor)
    }

    /// Time limit after a level-up during play.
    pub fn tightened(&self, time_limit: f32) -> f32 {
        (time_limit - self.time_step).max(self.time_floor)
    }

    /// Level after a level-up during play.
    pub fn promoted(&self, level: u8) -> u8 {
        match self.level_cap {
            Some(cap) => level.saturating_add(1).min(cap),
            None => level.saturating_add(1),
        }
    }
}

impl Default for Variant {
    fn default() -> Self {
        Self::A
    }
}
