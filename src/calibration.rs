// Reactor Core - Motion Calibrator
//
// Averages a short burst of accelerometer samples taken while the board is
// held still.  The mean becomes a per-axis bias, with one g removed from the
// vertical axis so a level board ends up with zero bias.

use std::time::Duration;

use anyhow::Context;

use crate::config::*;
use crate::events::Vec3;
use crate::peripherals::{Clock, MotionSensor, TextDisplay};
use crate::screens::{self, Screen};

/// Per-axis sensor bias.  Computed once at startup and never changed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalibrationOffset {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl CalibrationOffset {
    /// Bias from the per-axis sums of `count` resting samples.
    pub fn from_sums(sum: Vec3, count: usize) -> Self {
        let n = count.max(1) as f32;
        Self {
            x: sum.x / n,
            y: sum.y / n,
            z: sum.z / n - STANDARD_GRAVITY,
        }
    }

    /// Remove the bias from a raw sample.
    pub fn apply(&self, raw: Vec3) -> Vec3 {
        raw - Vec3::new(self.x, self.y, self.z)
    }
}

pub struct MotionCalibrator {
    samples: usize,
    interval: Duration,
    retries: usize,
}

impl MotionCalibrator {
    pub fn new() -> Self {
        Self {
            samples: CALIBRATION_SAMPLES,
            interval: Duration::from_millis(CALIBRATION_SAMPLE_INTERVAL_MS),
            retries: CALIBRATION_READ_RETRIES,
        }
    }

    /// Sample the sensor and compute the bias.  Blocks for roughly
    /// `samples × interval`.
    ///
    /// A sample that still fails after the retries aborts calibration; the
    /// game cannot run without it.
    pub fn calibrate<S, D, C>(
        &self,
        sensor: &mut S,
        display: &mut D,
        clock: &C,
    ) -> anyhow::Result<CalibrationOffset>
    where
        S: MotionSensor,
        D: TextDisplay,
        C: Clock,
    {
        log::info!("Calibrating accelerometer ({} samples)…", self.samples);
        notify(display, &screens::calibrating());

        let mut sum = Vec3::default();
        for index in 0..self.samples {
            let sample = self
                .read_with_retry(sensor)
                .with_context(|| format!("calibration sample {index} failed"))?;
            sum.x += sample.x;
            sum.y += sample.y;
            sum.z += sample.z;
            clock.sleep(self.interval);
        }

        let offset = CalibrationOffset::from_sums(sum, self.samples);
        log::info!(
            "Calibration complete: offset x={:.2} y={:.2} z={:.2}",
            offset.x,
            offset.y,
            offset.z
        );
        notify(display, &screens::calibrated());
        Ok(offset)
    }

    fn read_with_retry<S: MotionSensor>(&self, sensor: &mut S) -> anyhow::Result<Vec3> {
        let mut attempt = 0;
        loop {
            match sensor.read() {
                Ok(sample) => return Ok(sample),
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    log::warn!("Accelerometer read failed (attempt {}): {:#}", attempt, e);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for MotionCalibrator {
    fn default() -> Self {
        Self::new()
    }
}

fn notify<D: TextDisplay>(display: &mut D, screen: &Screen) {
    let [l1, l2, l3, l4] = &screen.lines;
    if let Err(e) = display.show(l1, l2, l3, l4) {
        log::error!("Display error: {:#}", e);
    }
}
