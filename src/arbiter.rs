// Reactor Core - Input Priority Arbiter
//
// Several detectors can fire on the same tick; exactly one action reaches the
// state machine.  Precedence follows signal reliability: button edges, then
// shake, then knob travel.

use crate::events::{ActionLabel, ButtonAction};

/// Pick the single action for this tick.  Pure: same inputs, same output.
pub fn resolve(
    button_action: Option<ButtonAction>,
    is_shaking: bool,
    twist_action: Option<ActionLabel>,
) -> Option<ActionLabel> {
    if let Some(action) = button_action {
        return Some(action.into());
    }
    if is_shaking {
        return Some(ActionLabel::Shake);
    }
    twist_action
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn button() -> impl Strategy<Value = Option<ButtonAction>> {
        prop_oneof![
            Just(None),
            Just(Some(ButtonAction::Tap)),
            Just(Some(ButtonAction::DoubleTap)),
        ]
    }

    fn twist() -> impl Strategy<Value = Option<ActionLabel>> {
        prop_oneof![
            Just(None),
            Just(Some(ActionLabel::Twist)),
            Just(Some(ActionLabel::DirectionalLeft)),
            Just(Some(ActionLabel::DirectionalRight)),
        ]
    }

    #[test]
    fn button_beats_shake_and_twist() {
        assert_eq!(
            resolve(Some(ButtonAction::DoubleTap), true, Some(ActionLabel::Twist)),
            Some(ActionLabel::DoubleTap)
        );
    }

    #[test]
    fn shake_beats_twist() {
        assert_eq!(
            resolve(None, true, Some(ActionLabel::DirectionalLeft)),
            Some(ActionLabel::Shake)
        );
    }

    #[test]
    fn twist_only_when_nothing_else() {
        assert_eq!(resolve(None, false, Some(ActionLabel::Twist)), Some(ActionLabel::Twist));
        assert_eq!(resolve(None, false, None), None);
    }

    proptest! {
        #[test]
        fn resolution_is_idempotent(b in button(), shaking in any::<bool>(), t in twist()) {
            prop_assert_eq!(resolve(b, shaking, t), resolve(b, shaking, t));
        }

        #[test]
        fn some_input_always_yields_an_action(b in button(), shaking in any::<bool>(), t in twist()) {
            let any_fired = b.is_some() || shaking || t.is_some();
            prop_assert_eq!(resolve(b, shaking, t).is_some(), any_fired);
        }
    }
}
