// Reactor Core - Motion Event Detector
//
// Turns a calibrated accelerometer sample into a shake / no-shake decision.
// Presses on the button ring through the enclosure into the accelerometer,
// so shakes are masked for a while after every press edge.

use std::time::Duration;

use crate::calibration::CalibrationOffset;
use crate::config::*;
use crate::events::Vec3;

pub struct MotionEventDetector {
    threshold: f32,
    suppress_window: Duration,
}

impl MotionEventDetector {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            suppress_window: Duration::from_millis(SHAKE_SUPPRESS_MS),
        }
    }

    /// Returns `true` when `raw_sample` is a shake on this tick.
    ///
    /// `last_click_time` is the most recent button press edge; within the
    /// suppression window the result is always `false`.
    pub fn update(
        &self,
        raw_sample: Vec3,
        offset: &CalibrationOffset,
        last_click_time: Option<Duration>,
        now: Duration,
    ) -> bool {
        let suppressed = last_click_time
            .is_some_and(|t| now.saturating_sub(t) < self.suppress_window);
        if suppressed {
            return false;
        }

        offset.apply(raw_sample).magnitude() > self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn strong_sample_is_a_shake() {
        let detector = MotionEventDetector::new(20.0);
        let offset = CalibrationOffset::default();
        let sample = Vec3::new(15.0, 15.0, 0.0);
        assert!(detector.update(sample, &offset, None, secs(5)));
    }

    #[test]
    fn resting_board_is_not_a_shake() {
        let detector = MotionEventDetector::new(15.0);
        let offset = CalibrationOffset { x: 0.2, y: -0.1, z: 0.0 };
        // 1 g on z at rest
        let resting = Vec3::new(0.2, -0.1, 9.81);
        assert!(!detector.update(resting, &offset, None, secs(5)));
    }

    #[test]
    fn recent_press_masks_shake() {
        let detector = MotionEventDetector::new(20.0);
        let offset = CalibrationOffset::default();
        let sample = Vec3::new(30.0, 0.0, 0.0);
        let now = secs(10);
        let press = now - Duration::from_millis(100);
        assert!(!detector.update(sample, &offset, Some(press), now));

        let press = now - Duration::from_millis(500);
        assert!(detector.update(sample, &offset, Some(press), now));
    }

    proptest! {
        #[test]
        fn mask_wins_over_any_magnitude(
            x in -200.0f32..200.0,
            y in -200.0f32..200.0,
            z in -200.0f32..200.0,
            since_press_ms in 0u64..500,
        ) {
            let detector = MotionEventDetector::new(15.0);
            let now = secs(60);
            let press = now - Duration::from_millis(since_press_ms);
            prop_assert!(!detector.update(
                Vec3::new(x, y, z),
                &CalibrationOffset::default(),
                Some(press),
                now,
            ));
        }
    }
}
