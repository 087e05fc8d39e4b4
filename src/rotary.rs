// Reactor Core - Rotary Gesture Decoder
//
// Maps the knob travel accumulated since the round started onto a gesture.
// The delta is never reset per tick, so slow turns still add up.

use crate::events::ActionLabel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotaryPolicy {
    /// Any travel at all is a generic `Twist`.
    AbsoluteThreshold,
    /// Travel of at least `n` detents either way is `DirectionalRight` /
    /// `DirectionalLeft`.
    SignedThreshold(i32),
}

/// Decode the round's encoder `delta` under `policy`.
pub fn decode(delta: i32, policy: RotaryPolicy) -> Option<ActionLabel> {
    match policy {
        RotaryPolicy::AbsoluteThreshold if delta.unsigned_abs() >= 1 => Some(ActionLabel::Twist),
        RotaryPolicy::AbsoluteThreshold => None,
        RotaryPolicy::SignedThreshold(n) if delta >= n => Some(ActionLabel::DirectionalRight),
        RotaryPolicy::SignedThreshold(n) if delta <= -n => Some(ActionLabel::DirectionalLeft),
        RotaryPolicy::SignedThreshold(_) => None,
    }
}

// Indexed by (previous AB << 2) | current AB.
const TRANSITIONS: [i8; 16] = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];

/// Quarter step for one A/B channel change (each 2-bit, `A << 1 | B`).
/// Unchanged or double-bit jumps count 0.
pub fn quadrature_step(previous: u8, current: u8) -> i8 {
    TRANSITIONS[usize::from(((previous & 0b11) << 2) | (current & 0b11))]
}

/// Encoder position at round start and now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderSnapshot {
    pub start_position: i32,
    pub current_position: i32,
}

impl EncoderSnapshot {
    pub fn new(position: i32) -> Self {
        Self {
            start_position: position,
            current_position: position,
        }
    }

    pub fn delta(&self) -> i32 {
        self.current_position.wrapping_sub(self.start_position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn directional_needs_three_detents() {
        let policy = RotaryPolicy::SignedThreshold(3);
        assert_eq!(decode(2, policy), None);
        assert_eq!(decode(3, policy), Some(ActionLabel::DirectionalRight));
        assert_eq!(decode(-2, policy), None);
        assert_eq!(decode(-3, policy), Some(ActionLabel::DirectionalLeft));
    }

    #[test]
    fn any_travel_is_a_twist() {
        assert_eq!(decode(0, RotaryPolicy::AbsoluteThreshold), None);
        assert_eq!(decode(-1, RotaryPolicy::AbsoluteThreshold), Some(ActionLabel::Twist));
        assert_eq!(decode(i32::MIN, RotaryPolicy::AbsoluteThreshold), Some(ActionLabel::Twist));
    }

    #[test]
    fn snapshot_delta_accumulates_from_start() {
        let mut snapshot = EncoderSnapshot::new(40);
        snapshot.current_position = 41;
        snapshot.current_position = 43;
        assert_eq!(snapshot.delta(), 3);
    }

    fn walk(states: &[u8]) -> i32 {
        states
            .windows(2)
            .map(|pair| i32::from(quadrature_step(pair[0], pair[1])))
            .sum()
    }

    #[test]
    fn full_cycle_is_one_detent_each_way() {
        assert_eq!(walk(&[0b00, 0b10, 0b11, 0b01, 0b00]), 4);
        assert_eq!(walk(&[0b00, 0b01, 0b11, 0b10, 0b00]), -4);
    }

    #[test]
    fn contact_bounce_cancels() {
        // A chatters on the first edge before settling
        assert_eq!(walk(&[0b00, 0b10, 0b00, 0b10, 0b00, 0b10, 0b11, 0b01, 0b00]), 4);
    }

    #[test]
    fn skipped_state_counts_nothing() {
        assert_eq!(quadrature_step(0b00, 0b11), 0);
        assert_eq!(quadrature_step(0b01, 0b10), 0);
        assert_eq!(quadrature_step(0b10, 0b10), 0);
    }

    proptest! {
        #[test]
        fn signed_policy_matches_thresholds(delta in -10_000i32..10_000) {
            let expected = if delta >= 3 {
                Some(ActionLabel::DirectionalRight)
            } else if delta <= -3 {
                Some(ActionLabel::DirectionalLeft)
            } else {
                None
            };
            prop_assert_eq!(decode(delta, RotaryPolicy::SignedThreshold(3)), expected);
        }

        #[test]
        fn absolute_policy_fires_on_nonzero(delta in any::<i32>()) {
            let expected = (delta != 0).then_some(ActionLabel::Twist);
            prop_assert_eq!(decode(delta, RotaryPolicy::AbsoluteThreshold), expected);
        }
    }
}
