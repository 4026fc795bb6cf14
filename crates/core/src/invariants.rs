//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use crate::models::Player;
use crate::utility::GameState;

/// Validate that derived game state is internally consistent
pub fn assert_game_state_invariants(state: &GameState) {
    // A running game is never paused
    debug_assert!(
        !state.in_progress || state.paused == Some(false),
        "Game in progress but paused flag is {:?}",
        state.paused
    );

    // No pause flag before the first start or after a stop
    debug_assert!(
        state.paused.is_some() || !state.in_progress,
        "Game in progress without a pause flag"
    );

    debug_assert!(
        state.trigger_distance > 0.0,
        "Non-positive touch trigger distance {}",
        state.trigger_distance
    );

    if let (Some(last), Some(penultimate)) = (&state.last_touch_by, &state.penultimate_touch_by) {
        assert_distinct_touches(last, penultimate);
    }
}

/// Two consecutive touches never come from the same touch context
pub fn assert_distinct_touches(last: &Player, penultimate: &Player) {
    debug_assert!(
        !last.same_touch_context(penultimate),
        "Player {} ({:?}) holds both last and penultimate touch",
        last.id,
        last.team
    );
}
