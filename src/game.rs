// Reactor Core - Round State Machine
//
// Owns the game session (Menu -> Play -> GameOver) and advances it one tick
// at a time.  Each tick takes the raw readings gathered by the console plus
// the current time, runs the detectors in a fixed order, arbitrates, and
// reports at most one `GameEvent`.  No blocking happens in here: the settle
// and success pauses are timed phases of Play.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::arbiter;
use crate::calibration::CalibrationOffset;
use crate::config::*;
use crate::events::{ActionLabel, GameEvent, GameState, RoundFailure, Vec3};
use crate::input::ButtonClickClassifier;
use crate::motion::MotionEventDetector;
use crate::rotary::{self, EncoderSnapshot};

// ---------------------------------------------------------------------------
// Target selection
// ---------------------------------------------------------------------------

/// Chooses the command for each new round.
pub trait TargetPicker {
    fn pick(&mut self, commands: &[ActionLabel]) -> ActionLabel;
}

/// Uniform random choice from the variant's command set.
pub struct RandomPicker<R>(pub R);

impl<R: Rng> TargetPicker for RandomPicker<R> {
    fn pick(&mut self, commands: &[ActionLabel]) -> ActionLabel {
        commands
            .choose(&mut self.0)
            .copied()
            .unwrap_or(ActionLabel::Tap)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The one live game session.  Volatile: reset on every power cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameSession {
    pub state: GameState,
    pub score: u32,
    pub level: u8,
    /// Seconds allowed per round.
    pub time_limit: f32,
}

impl GameSession {
    pub fn new(variant: &Variant) -> Self {
        Self {
            state: GameState::Menu,
            score: 0,
            level: LEVEL_MIN,
            time_limit: variant.time_limit(LEVEL_MIN),
        }
    }
}

/// Raw readings for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// `true` = released.
    pub button_level: bool,
    pub encoder_position: i32,
    /// `None` when the sensor was not sampled or the read failed.
    pub motion: Option<Vec3>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Round {
    target: ActionLabel,
    started: Duration,
    encoder: EncoderSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PlayPhase {
    GetReady { until: Duration },
    Round(Round),
    Success { until: Duration },
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------
pub struct RoundStateMachine<P> {
    variant: Variant,
    session: GameSession,
    phase: PlayPhase,
    offset: CalibrationOffset,
    button: ButtonClickClassifier,
    motion: MotionEventDetector,
    // Menu knob reference; re-captured on the first tick after entering Menu.
    knob_reference: Option<i32>,
    picker: P,
}

impl<P: TargetPicker> RoundStateMachine<P> {
    pub fn new(variant: Variant, offset: CalibrationOffset, picker: P) -> Self {
        Self {
            session: GameSession::new(&variant),
            phase: PlayPhase::GetReady { until: Duration::ZERO },
            offset,
            button: ButtonClickClassifier::new(),
            motion: MotionEventDetector::new(variant.shake_threshold),
            knob_reference: None,
            picker,
            variant,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    /// Target of the live round, if one is running.
    pub fn target(&self) -> Option<ActionLabel> {
        match (self.session.state, self.phase) {
            (GameState::Play, PlayPhase::Round(round)) => Some(round.target),
            _ => None,
        }
    }

    /// Whether the next tick consumes a motion sample.  Outside a live round
    /// the accelerometer is not read at all.
    pub fn wants_motion(&self) -> bool {
        self.target().is_some()
    }

    /// Advance the game by one tick.
    pub fn tick(&mut self, input: &TickInput, now: Duration) -> Option<GameEvent> {
        match self.session.state {
            GameState::Menu => self.tick_menu(input, now),
            GameState::Play => self.tick_play(input, now),
            GameState::GameOver => self.tick_game_over(input, now),
        }
    }

    fn tick_menu(&mut self, input: &TickInput, now: Duration) -> Option<GameEvent> {
        if self.button.update(input.button_level, now).is_some() {
            self.session.state = GameState::Play;
            log::info!(
                "Game start: level {} ({:.2}s per round)",
                self.session.level,
                self.session.time_limit
            );
            return Some(self.enter_get_ready(now));
        }

        let reference = *self.knob_reference.get_or_insert(input.encoder_position);
        if input.encoder_position == reference {
            return None;
        }
        self.knob_reference = Some(input.encoder_position);

        let delta = input.encoder_position.wrapping_sub(reference);
        self.session.level = self.variant.knob.adjust(self.session.level, delta);
        self.session.time_limit = self.variant.time_limit(self.session.level);
        log::debug!(
            "Level -> {} ({:.2}s)",
            self.session.level,
            self.session.time_limit
        );
        Some(GameEvent::LevelChanged {
            level: self.session.level,
            time_limit: self.session.time_limit,
        })
    }

    fn tick_play(&mut self, input: &TickInput, now: Duration) -> Option<GameEvent> {
        match self.phase {
            PlayPhase::GetReady { until } => {
                self.button.observe(input.button_level);
                if now < until {
                    return None;
                }
                let target = self.picker.pick(self.variant.commands);
                self.phase = PlayPhase::Round(Round {
                    target,
                    started: now,
                    encoder: EncoderSnapshot::new(input.encoder_position),
                });
                log::info!("New round: target={:?}", target);
                Some(GameEvent::RoundStarted {
                    target,
                    time_limit: self.session.time_limit,
                })
            }
            PlayPhase::Success { until } => {
                self.button.observe(input.button_level);
                if now < until {
                    return None;
                }
                Some(self.enter_get_ready(now))
            }
            PlayPhase::Round(round) => self.tick_round(round, input, now),
        }
    }

    fn tick_round(&mut self, mut round: Round, input: &TickInput, now: Duration) -> Option<GameEvent> {
        if input.encoder_position != round.encoder.current_position {
            log::debug!(
                "Encoder moving: pos {} delta {}",
                input.encoder_position,
                input.encoder_position.wrapping_sub(round.encoder.start_position)
            );
        }
        round.encoder.current_position = input.encoder_position;

        // Detectors first, in a fixed order, then arbitration.
        let button_action = self.button.update(input.button_level, now);
        let is_shaking = input.motion.is_some_and(|sample| {
            self.motion
                .update(sample, &self.offset, self.button.last_click_time(), now)
        });
        let twist_action = rotary::decode(round.encoder.delta(), self.variant.rotary);

        if let Some(action) = arbiter::resolve(button_action, is_shaking, twist_action) {
            if action == round.target {
                return Some(self.win(now));
            }
            return Some(self.lose(RoundFailure::Mismatch {
                expected: round.target,
                got: action,
            }));
        }

        let elapsed = now.saturating_sub(round.started).as_secs_f32();
        if elapsed >= self.session.time_limit {
            return Some(self.lose(RoundFailure::Timeout));
        }

        self.phase = PlayPhase::Round(round);
        None
    }

    fn tick_game_over(&mut self, input: &TickInput, now: Duration) -> Option<GameEvent> {
        self.button.update(input.button_level, now)?;

        self.session.state = GameState::Menu;
        self.session.score = 0;
        self.knob_reference = None;
        Some(GameEvent::ReturnedToMenu {
            level: self.session.level,
            time_limit: self.session.time_limit,
        })
    }

    fn enter_get_ready(&mut self, now: Duration) -> GameEvent {
        self.button.reset_burst();
        self.phase = PlayPhase::GetReady {
            until: now + self.variant.settle,
        };
        GameEvent::GetReady
    }

    fn win(&mut self, now: Duration) -> GameEvent {
        self.button.reset_burst();
        self.session.score += 1;
        if self.session.score % POINTS_PER_LEVEL == 0 {
            self.session.level = self.variant.promoted(self.session.level);
            self.session.time_limit = self.variant.tightened(self.session.time_limit);
            log::info!(
                "Level up: {} ({:.2}s per round)",
                self.session.level,
                self.session.time_limit
            );
        }
        log::info!("Success, score {}", self.session.score);
        self.phase = PlayPhase::Success {
            until: now + Duration::from_millis(SUCCESS_PAUSE_MS),
        };
        GameEvent::RoundWon {
            score: self.session.score,
            level: self.session.level,
        }
    }

    fn lose(&mut self, reason: RoundFailure) -> GameEvent {
        self.button.reset_burst();
        match reason {
            RoundFailure::Mismatch { expected, got } => {
                log::info!("Fail: wanted {:?}, got {:?}", expected, got)
            }
            RoundFailure::Timeout => log::info!("Fail: timeout"),
        }
        self.session.state = GameState::GameOver;
        GameEvent::RoundLost {
            reason,
            score: self.session.score,
        }
    }
}
