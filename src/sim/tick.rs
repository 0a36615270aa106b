//! Fixed timestep simulation tick
//!
//! Order within a playing tick is fixed: physics, obstacles, collisions.

use super::collision;
use super::mode::ModeEvent;
use super::obstacles;
use super::physics::{self, Contact};
use super::state::{CrashCause, GameEvent, GameState};
use crate::settings::Tunables;

/// Intent flags gathered from input handlers since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (or start when not playing)
    pub jump: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput, tunables: &Tunables) {
    // Start a run; nothing is simulated on the tick that starts it
    if input.jump && state.transition(ModeEvent::Start).is_some() {
        log::info!("Run started");
        state.events.push(GameEvent::Started);
        return;
    }

    if !state.mode.is_simulating() {
        return;
    }

    state.time_ticks += 1;

    // --- Physics ---
    if input.jump {
        physics::jump(&mut state.player, tunables.effective_jump_force());
        state.events.push(GameEvent::Jumped);
    } else {
        physics::integrate(&mut state.player, tunables.effective_gravity());
    }

    if physics::resolve_bounds(&mut state.player, &state.field) == Contact::Ground {
        crash(state, CrashCause::Ground);
        return;
    }

    // --- Obstacles ---
    obstacles::update(state, tunables);

    // --- Collisions ---
    if let Some(cause) = collision::detect(&state.player, &state.obstacles, tunables) {
        crash(state, cause);
    }
}

fn crash(state: &mut GameState, cause: CrashCause) {
    if state.transition(ModeEvent::Crash).is_some() {
        log::info!("Crashed ({:?}) with score {}", cause, state.score);
        state.events.push(GameEvent::Crashed { cause });
    }
}
