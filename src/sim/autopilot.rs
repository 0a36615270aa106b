//! Autopilot: steers the player through upcoming gaps
//!
//! Used by the in-page toggle and the native headless demo. It only
//! produces jump intents; it never touches state directly.

use super::state::GameState;

/// Dead band below the target before the autopilot jumps
const JUMP_MARGIN: f32 = 20.0;

/// Vertical position the player should hold right now
pub fn target_y(state: &GameState) -> f32 {
    state
        .obstacles
        .iter()
        .find(|o| o.right() > state.player.x)
        .map(|o| o.gap_center())
        .unwrap_or(state.field.height * 0.5)
}

/// Whether to jump this tick
pub fn decide(state: &GameState) -> bool {
    let player = &state.player;
    player.velocity >= 0.0 && player.center_y() > target_y(state) + JUMP_MARGIN
}
