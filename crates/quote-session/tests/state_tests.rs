use proptest::prelude::*;
use quote_session::{allowed_transitions, validate_transition, SessionError, SessionState};

fn any_state() -> impl Strategy<Value = SessionState> {
    prop_oneof![
        Just(SessionState::New),
        Just(SessionState::Loading),
        Just(SessionState::Ready),
        Just(SessionState::Saving),
        Just(SessionState::Preview),
        Just(SessionState::Failed),
    ]
}

#[test]
fn test_new_transitions() {
    assert!(validate_transition(SessionState::New, SessionState::Ready).is_ok());
    assert!(validate_transition(SessionState::New, SessionState::Loading).is_ok());

    // Invalid
    assert!(validate_transition(SessionState::New, SessionState::Preview).is_err());
    assert!(validate_transition(SessionState::New, SessionState::Saving).is_err());
}

#[test]
fn test_saving_transitions() {
    assert!(validate_transition(SessionState::Saving, SessionState::Preview).is_ok());
    assert!(validate_transition(SessionState::Saving, SessionState::Ready).is_ok());
    assert_eq!(
        validate_transition(SessionState::Saving, SessionState::Saving),
        Err(SessionError::InvalidTransition {
            from: SessionState::Saving,
            to: SessionState::Saving,
        })
    );
}

#[test]
fn test_failed_is_terminal() {
    assert!(SessionState::Failed.is_terminal());
    assert!(allowed_transitions(SessionState::Failed).is_empty());
    for state in SessionState::ALL {
        if state != SessionState::Failed {
            assert!(!state.is_terminal(), "{state} should not be terminal");
        }
    }
}

#[test]
fn test_preview_only_goes_back() {
    assert_eq!(
        allowed_transitions(SessionState::Preview),
        vec![SessionState::Ready]
    );
}

proptest! {
    #[test]
    fn prop_all_transitions_are_subset_of_allowed(from in any_state(), to in any_state()) {
        let res = validate_transition(from, to);
        let allowed = allowed_transitions(from);

        if res.is_ok() {
            prop_assert!(allowed.contains(&to));
        } else {
            prop_assert!(!allowed.contains(&to));
        }
    }

    #[test]
    fn prop_failed_only_reached_from_loading(from in any_state()) {
        let reaches_failed = validate_transition(from, SessionState::Failed).is_ok();
        prop_assert_eq!(reaches_failed, from == SessionState::Loading);
    }
}
