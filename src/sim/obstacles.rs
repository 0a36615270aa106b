//! Obstacle lifecycle: advance, score, purge, spawn
//!
//! Obstacles are kept ordered by x with the oldest first. Only the newest
//! one is consulted for spawning.

use rand::Rng;

use super::state::{Field, GameEvent, GameState, Obstacle, Player};
use crate::consts::{BASE_OBSTACLE_WIDTH, GAP_CENTER_MAX_FRAC, GAP_CENTER_MIN_FRAC};
use crate::settings::Tunables;

/// Shift every obstacle left by `speed`
pub fn advance(obstacles: &mut [Obstacle], speed: f32) {
    for obstacle in obstacles.iter_mut() {
        obstacle.x -= speed;
    }
}

/// Latch obstacles the player has passed. Returns how many newly scored.
///
/// An obstacle counts once its right edge is left of the player's center.
pub fn score_passed(obstacles: &mut [Obstacle], player: &Player) -> u32 {
    let line = player.center_x();
    let mut newly = 0;
    for obstacle in obstacles.iter_mut().filter(|o| !o.scored) {
        if obstacle.right() < line {
            obstacle.scored = true;
            newly += 1;
        }
    }
    newly
}

/// Drop obstacles whose right edge has left the field
pub fn purge_offscreen(obstacles: &mut Vec<Obstacle>) {
    obstacles.retain(|o| o.right() >= 0.0);
}

/// Whether the newest obstacle has moved far enough in for another
pub fn needs_spawn(obstacles: &[Obstacle], field: &Field, spawn_spacing: f32) -> bool {
    match obstacles.last() {
        Some(newest) => newest.x < field.width - spawn_spacing,
        None => true,
    }
}

/// Random gap center, uniform over the allowed band
pub fn roll_gap_center<R: Rng>(rng: &mut R, field: &Field) -> f32 {
    let lo = field.height * GAP_CENTER_MIN_FRAC;
    let hi = field.height * GAP_CENTER_MAX_FRAC;
    rng.random_range(lo..hi)
}

/// Append a new obstacle at the right edge. Width is captured from the
/// current size scale and never rescaled afterwards.
pub fn spawn(state: &mut GameState, tunables: &Tunables) {
    let gap_center = roll_gap_center(&mut state.rng, &state.field);
    let obstacle = Obstacle::new(
        state.field.spawn_x(),
        gap_center,
        tunables.gap,
        BASE_OBSTACLE_WIDTH * tunables.obstacle_size,
        state.field.ground_y(),
    );
    log::debug!(
        "Obstacle spawned at x={} gap_center={:.1}",
        obstacle.x,
        gap_center
    );
    state.obstacles.push(obstacle);
}

/// One obstacle-manager step
pub fn update(state: &mut GameState, tunables: &Tunables) {
    advance(&mut state.obstacles, tunables.effective_obstacle_speed());

    let newly = score_passed(&mut state.obstacles, &state.player);
    for _ in 0..newly {
        state.score += 1;
        state.events.push(GameEvent::Scored { score: state.score });
        log::debug!("Score: {}", state.score);
    }

    purge_offscreen(&mut state.obstacles);

    if needs_spawn(&state.obstacles, &state.field, tunables.spawn_spacing) {
        spawn(state, tunables);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::mode::ModeEvent;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing_state() -> GameState {
        let mut state = GameState::new(Field::new(800.0, 600.0), 42);
        state.transition(ModeEvent::Ready);
        state.transition(ModeEvent::Start);
        state
    }

    #[test]
    fn first_update_spawns_at_right_edge() {
        let mut state = playing_state();
        update(&mut state, &Tunables::default());
        assert_eq!(state.obstacles.len(), 1);
        let o = &state.obstacles[0];
        assert_eq!(o.x, 800.0);
        assert_eq!(o.width, 180.0);
        assert!((o.top_height + 250.0 + o.bottom_height - 540.0).abs() < 1e-3);
    }

    #[test]
    fn gap_center_stays_in_band() {
        let field = Field::new(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let c = roll_gap_center(&mut rng, &field);
            assert!((119.99..360.01).contains(&c), "center {}", c);
        }
    }

    #[test]
    fn spawn_waits_for_spacing() {
        let field = Field::new(800.0, 600.0);
        let mut obstacles = vec![Obstacle::new(400.0, 300.0, 250.0, 180.0, 540.0)];
        // 400 == 800 - 400, not yet past the threshold
        assert!(!needs_spawn(&obstacles, &field, 400.0));
        obstacles[0].x = 399.0;
        assert!(needs_spawn(&obstacles, &field, 400.0));
        assert!(needs_spawn(&[], &field, 400.0));
    }

    #[test]
    fn advance_moves_all_uniformly() {
        let mut obstacles = vec![
            Obstacle::new(100.0, 300.0, 250.0, 180.0, 540.0),
            Obstacle::new(500.0, 200.0, 250.0, 90.0, 540.0),
        ];
        advance(&mut obstacles, 2.5);
        assert_eq!(obstacles[0].x, 97.5);
        assert_eq!(obstacles[1].x, 497.5);
    }

    #[test]
    fn purge_uses_right_edge() {
        let mut obstacles = vec![
            Obstacle::new(-181.0, 300.0, 250.0, 180.0, 540.0),
            Obstacle::new(-180.0, 300.0, 250.0, 180.0, 540.0),
            Obstacle::new(0.0, 300.0, 250.0, 180.0, 540.0),
        ];
        purge_offscreen(&mut obstacles);
        assert_eq!(obstacles.len(), 2);
        assert_eq!(obstacles[0].x, -180.0);
        assert_eq!(obstacles[1].x, 0.0);
    }

    #[test]
    fn scoring_latches_once() {
        let player = Player::spawn(&Field::new(800.0, 600.0)); // center x = 220
        let mut obstacles = vec![Obstacle::new(40.0, 300.0, 250.0, 180.0, 540.0)];
        // right edge 220 is not strictly left of 220
        assert_eq!(score_passed(&mut obstacles, &player), 0);
        obstacles[0].x = 39.0;
        assert_eq!(score_passed(&mut obstacles, &player), 1);
        assert_eq!(score_passed(&mut obstacles, &player), 0);
        assert!(obstacles[0].scored);
    }

    #[test]
    fn width_is_captured_at_spawn() {
        let mut state = playing_state();
        let mut tunables = Tunables::default();
        tunables.obstacle_size = 0.5;
        spawn(&mut state, &tunables);
        tunables.obstacle_size = 2.0;
        spawn(&mut state, &tunables);
        assert_eq!(state.obstacles[0].width, 90.0);
        assert_eq!(state.obstacles[1].width, 360.0);
    }

    #[test]
    fn score_matches_latched_obstacles() {
        let mut state = playing_state();
        let tunables = Tunables::default();
        let mut spawned = 0usize;
        for _ in 0..3000 {
            let previous = state.score;
            update(&mut state, &tunables);
            assert!(state.score >= previous);
            // A fresh spawn sits exactly on the right edge after the update
            if state.obstacles.last().is_some_and(|o| o.x == state.field.width) {
                spawned += 1;
            }
            // Anything purged was scored first (its right edge crossed the player earlier)
            let purged = spawned - state.obstacles.len();
            assert_eq!(state.score as usize, state.scored_obstacles() + purged);
        }
        assert!(state.score > 0);
    }
}
