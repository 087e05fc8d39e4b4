// Reactor Core - Game Task
//
// Owns the peripherals, the clock and the round state machine.  Calibrates
// once, then polls at ~100 Hz: every tick reads the encoder, the button and
// (during a live round) the accelerometer exactly once, advances the state
// machine, and presents whatever event it reports.

use std::time::Duration;

use crate::calibration::{CalibrationOffset, MotionCalibrator};
use crate::config::*;
use crate::events::GameEvent;
use crate::game::{RoundStateMachine, TargetPicker, TickInput};
use crate::peripherals::{
    Board, Button, Clock, MotionSensor, RotaryEncoder, StatusLight, TextDisplay,
};
use crate::screens::{self, Screen};

pub struct Console<M, E, B, L, D, C, P> {
    board: Board<M, E, B, L, D>,
    clock: C,
    game: RoundStateMachine<P>,
    offset: CalibrationOffset,
}

impl<M, E, B, L, D, C, P> Console<M, E, B, L, D, C, P>
where
    M: MotionSensor,
    E: RotaryEncoder,
    B: Button,
    L: StatusLight,
    D: TextDisplay,
    C: Clock,
    P: TargetPicker,
{
    /// Calibrate the accelerometer and open the menu.  Fails only when
    /// calibration cannot read the sensor.
    pub fn start(
        mut board: Board<M, E, B, L, D>,
        clock: C,
        variant: Variant,
        picker: P,
    ) -> anyhow::Result<Self> {
        log::info!("Starting game, variant {}", variant.name);

        let offset =
            MotionCalibrator::new().calibrate(&mut board.motion, &mut board.display, &clock)?;
        clock.sleep(Duration::from_millis(CALIBRATION_HOLD_MS));

        let game = RoundStateMachine::new(variant, offset, picker);
        let mut console = Self {
            board,
            clock,
            game,
            offset,
        };

        let session = *console.game.session();
        let layout = console.game.variant().menu;
        console.present(&screens::menu(layout, session.level, session.time_limit, true));
        Ok(console)
    }

    pub fn game(&self) -> &RoundStateMachine<P> {
        &self.game
    }

    pub fn offset(&self) -> CalibrationOffset {
        self.offset
    }

    /// One polling tick.
    pub fn step(&mut self) -> Option<GameEvent> {
        let now = self.clock.now();
        let input = self.sample_inputs();
        let event = self.game.tick(&input, now)?;
        log::debug!("{:?}", event);
        self.present(&screens::for_event(&event, self.game.variant().menu));
        Some(event)
    }

    /// Poll forever at `POLL_INTERVAL_MS`.
    pub fn run(mut self) -> ! {
        let poll_interval = Duration::from_millis(POLL_INTERVAL_MS);
        loop {
            self.step();
            self.clock.sleep(poll_interval);
        }
    }

    fn sample_inputs(&mut self) -> TickInput {
        let encoder_position = self.board.encoder.position();
        let button_level = self.board.button.level();

        // A failed read only costs this tick's shake check.
        let motion = if self.game.wants_motion() {
            match self.board.motion.read() {
                Ok(sample) => Some(sample),
                Err(e) => {
                    log::warn!("Accelerometer read error, skipping tick: {:#}", e);
                    None
                }
            }
        } else {
            None
        };

        TickInput {
            button_level,
            encoder_position,
            motion,
        }
    }

    fn present(&mut self, screen: &Screen) {
        let [l1, l2, l3, l4] = &screen.lines;
        if let Err(e) = self.board.display.show(l1, l2, l3, l4) {
            log::error!("Display error: {:#}", e);
        }
        if let Some((r, g, b)) = screen.light {
            if let Err(e) = self.board.light.set_color(r, g, b) {
                log::error!("Status light error: {:#}", e);
            }
        }
    }
}

/// Calibrate and run the game loop on the current thread.
pub fn game_task<M, E, B, L, D, C, P>(
    board: Board<M, E, B, L, D>,
    clock: C,
    variant: Variant,
    picker: P,
) -> anyhow::Result<()>
where
    M: MotionSensor,
    E: RotaryEncoder,
    B: Button,
    L: StatusLight,
    D: TextDisplay,
    C: Clock,
    P: TargetPicker,
{
    log::info!("Game task started");
    Console::start(board, clock, variant, picker)?.run()
}
