// Reactor Core - Game Core
//
// Hardware-agnostic heart of the firmware: input classification, gesture
// detection, arbitration and the round state machine.  Builds on any std
// target so it can be exercised on the host; the ESP-IDF drivers live in the
// binary.

pub mod arbiter;
pub mod calibration;
pub mod config;
pub mod display;
pub mod events;
pub mod game;
pub mod input;
pub mod motion;
pub mod peripherals;
pub mod rotary;
pub mod screens;
pub mod tasks;
