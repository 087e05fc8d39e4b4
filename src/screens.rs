// Reactor Core - Screens
//
// Text and light color for every phase of the game.

use crate::config::*;
use crate::events::{ActionLabel, GameEvent};

pub type Rgb = (u8, u8, u8);

pub const LIGHT_OFF: Rgb = (0, 0, 0);
pub const LIGHT_MENU: Rgb = (0, 0, 255);
pub const LIGHT_ROUND: Rgb = (255, 100, 0);
pub const LIGHT_SUCCESS: Rgb = (0, 255, 0);
pub const LIGHT_GAME_OVER: Rgb = (255, 0, 0);

/// Four display lines plus the status light color to set alongside them
/// (`None` leaves the light unchanged).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub lines: [String; 4],
    pub light: Option<Rgb>,
}

impl Screen {
    fn new(lines: [&str; 4], light: Option<Rgb>) -> Self {
        Self {
            lines: lines.map(str::to_owned),
            light,
        }
    }
}

pub fn difficulty_name(level: u8) -> &'static str {
    match level {
        0..=3 => "EASY",
        4..=7 => "MEDIUM",
        _ => "HARD",
    }
}

pub fn calibrating() -> Screen {
    Screen::new(["SYSTEM SETUP", "Calibrating", "Sensors...", "Do not move!"], None)
}

pub fn calibrated() -> Screen {
    Screen::new(["CALIBRATION", "COMPLETE", "", "Press Button"], None)
}

/// Level select.  `entered` is true when the menu has just been opened, before
/// the knob has moved.
pub fn menu(layout: MenuLayout, level: u8, time_limit: f32, entered: bool) -> Screen {
    match layout {
        MenuLayout::Select => {
            let level_line = format!("Level: {} ({})", level, difficulty_name(level));
            let time_line = format!("Time: {:.1}s", time_limit);
            let hint = if entered { "Twist to Change" } else { "Btn to Start" };
            Screen::new(
                ["SELECT LEVEL", level_line.as_str(), time_line.as_str(), hint],
                Some(LIGHT_MENU),
            )
        }
        MenuLayout::Banner => {
            let level_line = format!("Level: {}", level);
            Screen::new(
                ["REACTOR CORE", "Twist to Select", "Btn to Start", level_line.as_str()],
                Some(LIGHT_MENU),
            )
        }
    }
}

pub fn get_ready() -> Screen {
    Screen::new(["", "GET READY...", "", ""], Some(LIGHT_OFF))
}

pub fn round(target: ActionLabel, time_limit: f32) -> Screen {
    let target_line = format!("> {} <", target.prompt());
    let time_line = format!("Time: {:.1}s", time_limit);
    Screen::new(
        ["WARNING!", "ACTION REQUIRED:", target_line.as_str(), time_line.as_str()],
        Some(LIGHT_ROUND),
    )
}

pub fn success(score: u32) -> Screen {
    let score_line = format!("Score: {}", score);
    Screen::new(["CORE STABLE", "Great Job!", score_line.as_str(), ""], Some(LIGHT_SUCCESS))
}

pub fn game_over(score: u32) -> Screen {
    let score_line = format!("Final Score: {}", score);
    Screen::new(
        ["MELTDOWN!", "GAME OVER", score_line.as_str(), "Btn to Reset"],
        Some(LIGHT_GAME_OVER),
    )
}

/// Screen shown in response to a state machine event.
pub fn for_event(event: &GameEvent, layout: MenuLayout) -> Screen {
    match *event {
        GameEvent::LevelChanged { level, time_limit } => menu(layout, level, time_limit, false),
        GameEvent::GetReady => get_ready(),
        GameEvent::RoundStarted { target, time_limit } => round(target, time_limit),
        GameEvent::RoundWon { score, .. } => success(score),
        GameEvent::RoundLost { score, .. } => game_over(score),
        GameEvent::ReturnedToMenu { level, time_limit } => menu(layout, level, time_limit, true),
    }
}

/// Scale a color by the status light brightness.
pub fn dimmed((r, g, b): Rgb) -> Rgb {
    let scale = |c: u8| (f32::from(c) * PIXEL_BRIGHTNESS).round() as u8;
    (scale(r), scale(g), scale(b))
}
