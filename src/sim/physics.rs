//! Player physics
//!
//! Symplectic Euler, one step per tick: velocity first, then position.

use super::state::{Field, Player};
use crate::consts::{JUMP_ROTATION_DEG, MAX_ROTATION_DEG, ROTATION_PER_VELOCITY};

/// Result of a physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    None,
    /// Hit the top edge; clamped, the run continues
    Ceiling,
    /// Reached the ground line; the run ends
    Ground,
}

/// Display angle for a velocity, in degrees
#[inline]
pub fn rotation_for(velocity: f32) -> f32 {
    (velocity * ROTATION_PER_VELOCITY).clamp(JUMP_ROTATION_DEG, MAX_ROTATION_DEG)
}

/// Fall under gravity for one tick
pub fn integrate(player: &mut Player, gravity: f32) {
    player.velocity += gravity;
    player.y += player.velocity;
    player.rotation = rotation_for(player.velocity);
}

/// Jump tick: velocity is replaced, not accumulated, and the nose snaps up.
/// The derived rotation takes over again on the next tick.
pub fn jump(player: &mut Player, jump_force: f32) {
    player.velocity = jump_force;
    player.y += player.velocity;
    player.rotation = JUMP_ROTATION_DEG;
}

/// Resolve field edges after moving. Ground wins over ceiling.
pub fn resolve_bounds(player: &mut Player, field: &Field) -> Contact {
    if player.y + player.height >= field.ground_y() {
        return Contact::Ground;
    }
    if player.y <= 0.0 {
        player.y = 0.0;
        player.velocity = 0.0;
        return Contact::Ceiling;
    }
    Contact::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player_at(y: f32) -> Player {
        let mut p = Player::spawn(&Field::new(800.0, 600.0));
        p.y = y;
        p
    }

    #[test]
    fn velocity_accumulates_gravity() {
        let mut p = player_at(100.0);
        for _ in 0..20 {
            integrate(&mut p, 0.13);
        }
        assert!((p.velocity - 20.0 * 0.13).abs() < 1e-4);
    }

    #[test]
    fn jump_then_fall_matches_closed_form() {
        let (y0, jump_force, gravity) = (240.0_f32, -3.0_f32, 0.13_f32);
        let mut p = player_at(y0);

        jump(&mut p, jump_force);
        for _ in 0..10 {
            integrate(&mut p, gravity);
        }

        let expected_y = y0 + jump_force + (1..=10).map(|k| jump_force + k as f32 * gravity).sum::<f32>();
        assert!((p.velocity - (-1.7)).abs() < 1e-4, "velocity {}", p.velocity);
        assert!((p.y - expected_y).abs() < 1e-3, "y {} vs {}", p.y, expected_y);
    }

    #[test]
    fn jump_snaps_rotation_then_decays() {
        let mut p = player_at(200.0);
        jump(&mut p, -3.0);
        assert_eq!(p.rotation, -30.0);

        integrate(&mut p, 0.13);
        // -2.87 * 3 = -8.61, the derived value replaces the snap
        assert!((p.rotation - (-8.61)).abs() < 1e-3);
    }

    #[test]
    fn rotation_is_clamped() {
        assert_eq!(rotation_for(-100.0), -30.0);
        assert_eq!(rotation_for(100.0), 90.0);
        assert_eq!(rotation_for(2.0), 6.0);
    }

    #[test]
    fn ceiling_clamps_without_ending() {
        let field = Field::new(800.0, 600.0);
        let mut p = player_at(-4.0);
        p.velocity = -3.0;
        assert_eq!(resolve_bounds(&mut p, &field), Contact::Ceiling);
        assert_eq!(p.y, 0.0);
        assert_eq!(p.velocity, 0.0);
    }

    #[test]
    fn ground_contact_is_terminal() {
        let field = Field::new(800.0, 600.0);
        // 450 + 90 == 540 touches the ground line
        let mut p = player_at(450.0);
        assert_eq!(resolve_bounds(&mut p, &field), Contact::Ground);

        let mut p = player_at(449.0);
        assert_eq!(resolve_bounds(&mut p, &field), Contact::None);
    }

    proptest! {
        #[test]
        fn jump_always_sets_exact_values(prior in -50.0f32..50.0, force in -20.0f32..-0.1) {
            let mut p = player_at(300.0);
            p.velocity = prior;
            jump(&mut p, force);
            prop_assert_eq!(p.velocity, force);
            prop_assert_eq!(p.rotation, -30.0);
        }

        #[test]
        fn free_fall_velocity_is_linear(n in 0usize..200, gravity in 0.0f32..1.0) {
            let mut p = player_at(0.0);
            for _ in 0..n {
                integrate(&mut p, gravity);
            }
            prop_assert!((p.velocity - n as f32 * gravity).abs() <= 1e-3 * (n as f32 + 1.0));
        }
    }
}
