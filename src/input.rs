// Reactor Core - Button Click Classifier
//
// Edge-detects presses on the active-LOW button and groups them into single
// or double taps.  A lone press is only committed once the tap window has
// passed without a second press, so single taps resolve up to one window
// late while double taps resolve on the second press.

use std::time::Duration;

use crate::config::*;
use crate::events::ButtonAction;

pub struct ButtonClickClassifier {
    window: Duration,

    // Edge detection
    previous_level: bool,

    // Burst tracking
    click_count: u8,
    last_click_time: Option<Duration>,
}

impl ButtonClickClassifier {
    pub fn new() -> Self {
        Self {
            window: Duration::from_millis(TAP_WINDOW_MS),
            previous_level: true, // pull-up -> idle HIGH
            click_count: 0,
            last_click_time: None,
        }
    }

    /// Call once per tick with the raw button level (`true` = released).
    ///
    /// Returns the action resolved on this tick, if any.  The result is a
    /// one-tick pulse: the next call starts from `None` again.
    pub fn update(&mut self, raw_level: bool, now: Duration) -> Option<ButtonAction> {
        // ---- press edge (released -> pressed) ----
        if self.previous_level && !raw_level {
            let within_window = self
                .last_click_time
                .is_some_and(|t| now.saturating_sub(t) < self.window);

            self.click_count = if within_window {
                self.click_count.saturating_add(1)
            } else {
                1
            };
            self.last_click_time = Some(now);
        }
        self.previous_level = raw_level;

        // ---- resolution ----
        match self.click_count {
            1 if self.window_expired(now) => {
                self.click_count = 0;
                Some(ButtonAction::Tap)
            }
            2 => {
                self.click_count = 0;
                Some(ButtonAction::DoubleTap)
            }
            _ => None,
        }
    }

    /// Track the button level on ticks where no action may resolve, so a
    /// press that started then is not seen as a fresh edge later.
    pub fn observe(&mut self, raw_level: bool) {
        self.previous_level = raw_level;
    }

    /// Drop a half-finished burst.  `last_click_time` is kept for shake
    /// suppression.
    pub fn reset_burst(&mut self) {
        self.click_count = 0;
    }

    /// Time of the most recent press edge, `None` before the first press.
    pub fn last_click_time(&self) -> Option<Duration> {
        self.last_click_time
    }

    pub fn click_count(&self) -> u8 {
        self.click_count
    }

    fn window_expired(&self, now: Duration) -> bool {
        self.last_click_time
            .is_some_and(|t| now.saturating_sub(t) > self.window)
    }
}

impl Default for ButtonClickClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TICK_MS: u64 = 10;

    /// Feeds one level per tick (10 ms apart) and collects every emitted action.
    fn run(levels: &[bool]) -> Vec<(u64, ButtonAction)> {
        let mut classifier = ButtonClickClassifier::new();
        levels
            .iter()
            .enumerate()
            .filter_map(|(i, &level)| {
                let t = i as u64 * TICK_MS;
                classifier
                    .update(level, Duration::from_millis(t))
                    .map(|a| (t, a))
            })
            .collect()
    }

    /// `idle` released ticks, then press for `hold` ticks, released after.
    fn press(levels: &mut Vec<bool>, hold: usize, gap_after: usize) {
        levels.extend(std::iter::repeat(false).take(hold));
        levels.extend(std::iter::repeat(true).take(gap_after));
    }

    #[test]
    fn single_press_resolves_after_window() {
        let mut levels = vec![true; 3];
        press(&mut levels, 5, 60);
        let actions = run(&levels);
        assert_eq!(actions.len(), 1);
        let (t, action) = actions[0];
        assert_eq!(action, ButtonAction::Tap);
        // press edge at 30 ms, first tick strictly past 350 ms later
        assert_eq!(t, 390);
    }

    #[test]
    fn second_press_upgrades_to_double_tap_immediately() {
        let mut levels = vec![true; 2];
        press(&mut levels, 3, 5);
        press(&mut levels, 3, 60);
        let actions = run(&levels);
        assert_eq!(actions, vec![(100, ButtonAction::DoubleTap)]);
    }

    #[test]
    fn held_button_is_one_press() {
        let mut levels = vec![true];
        press(&mut levels, 100, 50);
        let actions = run(&levels);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].1, ButtonAction::Tap);
    }

    #[test]
    fn pulse_is_cleared_on_next_tick() {
        let mut classifier = ButtonClickClassifier::new();
        classifier.update(false, Duration::from_millis(0));
        classifier.update(true, Duration::from_millis(10));
        assert_eq!(
            classifier.update(true, Duration::from_millis(400)),
            Some(ButtonAction::Tap)
        );
        assert_eq!(classifier.update(true, Duration::from_millis(410)), None);
        assert_eq!(classifier.click_count(), 0);
    }

    #[test]
    fn last_click_time_tracks_press_edges() {
        let mut classifier = ButtonClickClassifier::new();
        assert_eq!(classifier.last_click_time(), None);
        classifier.update(false, Duration::from_millis(120));
        assert_eq!(classifier.last_click_time(), Some(Duration::from_millis(120)));
        classifier.update(false, Duration::from_millis(130));
        assert_eq!(classifier.last_click_time(), Some(Duration::from_millis(120)));
    }

    #[test]
    fn reset_burst_drops_pending_press() {
        let mut classifier = ButtonClickClassifier::new();
        classifier.update(false, Duration::from_millis(0));
        classifier.update(true, Duration::from_millis(10));
        classifier.reset_burst();
        assert_eq!(classifier.click_count(), 0);
        assert_eq!(classifier.update(true, Duration::from_millis(400)), None);
        assert_eq!(classifier.last_click_time(), Some(Duration::ZERO));
    }

    #[test]
    fn observed_press_is_not_an_edge() {
        let mut classifier = ButtonClickClassifier::new();
        classifier.observe(false);
        assert_eq!(classifier.update(false, Duration::from_millis(10)), None);
        assert_eq!(classifier.update(true, Duration::from_millis(20)), None);
        assert_eq!(classifier.update(true, Duration::from_millis(500)), None);
        assert_eq!(classifier.last_click_time(), None);
    }

    proptest! {
        #[test]
        fn isolated_press_is_exactly_one_tap(
            lead in 0usize..20,
            hold in 1usize..80,
        ) {
            let mut levels = vec![true; lead + 1];
            press(&mut levels, hold, 60);
            let actions = run(&levels);
            prop_assert_eq!(actions.len(), 1);
            prop_assert_eq!(actions[0].1, ButtonAction::Tap);
        }

        #[test]
        fn two_presses_inside_window_are_one_double_tap(
            hold in 1usize..10,
            gap in 1usize..20,
        ) {
            // second edge lands (hold + gap) ticks after the first: < 350 ms
            let mut levels = vec![true; 2];
            press(&mut levels, hold, gap);
            press(&mut levels, 1, 80);
            let actions = run(&levels);
            prop_assert_eq!(actions.len(), 1);
            prop_assert_eq!(actions[0].1, ButtonAction::DoubleTap);
        }
    }
}
