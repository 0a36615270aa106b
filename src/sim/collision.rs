//! Collision detection
//!
//! Every entity is tested with a collision rectangle inset from its visual
//! rectangle. The debug overlay draws these same rectangles, so anything
//! that changes here changes what the overlay shows.

use super::state::{CrashCause, Obstacle, Player};
use crate::settings::Tunables;

/// Axis-aligned rectangle (y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict overlap: rectangles that only share an edge do not collide
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Whether `inner` lies within this rectangle
    pub fn contains(&self, inner: &Rect) -> bool {
        inner.x >= self.x
            && inner.y >= self.y
            && inner.right() <= self.right()
            && inner.bottom() <= self.bottom()
    }
}

/// Visual rectangle of the player body
pub fn player_rect(player: &Player) -> Rect {
    Rect::new(player.x, player.y, player.width, player.height)
}

/// Visual rectangle of the top barrier
pub fn top_rect(obstacle: &Obstacle) -> Rect {
    Rect::new(obstacle.x, 0.0, obstacle.width, obstacle.top_height.max(0.0))
}

/// Visual rectangle of the bottom barrier
pub fn bottom_rect(obstacle: &Obstacle) -> Rect {
    Rect::new(
        obstacle.x,
        obstacle.bottom_y,
        obstacle.width,
        obstacle.bottom_height.max(0.0),
    )
}

/// Player hitbox: shrunk evenly toward the center on both axes
pub fn player_hitbox(player: &Player, tunables: &Tunables) -> Rect {
    let sw = tunables.player_collision_width;
    let sh = tunables.player_collision_height;
    let pad_x = player.width * (1.0 - sw) * 0.5;
    let pad_y = player.height * (1.0 - sh) * 0.5;
    Rect::new(
        player.x + pad_x,
        player.y + pad_y,
        player.width * sw,
        player.height * sh,
    )
}

/// Top barrier hitbox: narrowed evenly, shortened from the gap side
pub fn top_hitbox(obstacle: &Obstacle, tunables: &Tunables) -> Rect {
    let visual = top_rect(obstacle);
    let sw = tunables.obstacle_collision_width;
    let sh = tunables.obstacle_collision_height;
    Rect::new(
        visual.x + visual.width * (1.0 - sw) * 0.5,
        visual.y,
        visual.width * sw,
        visual.height * sh,
    )
}

/// Bottom barrier hitbox: narrowed evenly, shortened from the gap side
pub fn bottom_hitbox(obstacle: &Obstacle, tunables: &Tunables) -> Rect {
    let visual = bottom_rect(obstacle);
    let sw = tunables.obstacle_collision_width;
    let sh = tunables.obstacle_collision_height;
    Rect::new(
        visual.x + visual.width * (1.0 - sw) * 0.5,
        visual.y + visual.height * (1.0 - sh),
        visual.width * sw,
        visual.height * sh,
    )
}

/// First obstacle barrier the player hits, if any
pub fn detect(player: &Player, obstacles: &[Obstacle], tunables: &Tunables) -> Option<CrashCause> {
    let hitbox = player_hitbox(player, tunables);
    for obstacle in obstacles {
        if hitbox.overlaps(&top_hitbox(obstacle, tunables)) {
            return Some(CrashCause::TopBarrier);
        }
        if hitbox.overlaps(&bottom_hitbox(obstacle, tunables)) {
            return Some(CrashCause::BottomBarrier);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Field;
    use proptest::prelude::*;

    #[test]
    fn shared_edge_is_not_a_collision() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));

        let c = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn overlap_detected() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(9.5, 9.5, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn default_player_hitbox() {
        let mut player = Player::spawn(&Field::new(800.0, 600.0));
        player.y = 240.0;
        let hb = player_hitbox(&player, &Tunables::default());
        assert_eq!(hb, Rect::new(190.0, 262.5, 60.0, 45.0));
    }

    #[test]
    fn obstacle_hitboxes_shrink_from_the_gap() {
        let o = Obstacle::new(100.0, 300.0, 250.0, 180.0, 540.0);
        let mut t = Tunables::default();
        t.obstacle_collision_width = 0.5;
        t.obstacle_collision_height = 0.8;

        let top = top_hitbox(&o, &t);
        assert_eq!(top.x, 145.0);
        assert_eq!(top.width, 90.0);
        assert_eq!(top.y, 0.0);
        assert!((top.height - 140.0).abs() < 1e-4); // 175 * 0.8, bottom edge pulled up

        let bottom = bottom_hitbox(&o, &t);
        assert!((bottom.bottom() - 540.0).abs() < 1e-3); // still sits on the ground line
        assert!((bottom.y - 448.0).abs() < 1e-4); // 425 + 115 * 0.2
    }

    #[test]
    fn player_in_gap_is_clear() {
        let field = Field::new(800.0, 600.0);
        let mut player = Player::spawn(&field);
        // player hitbox spans x 190..250, y 262.5..307.5
        let o = Obstacle::new(150.0, 285.0, 250.0, 180.0, 540.0);
        assert_eq!(detect(&player, &[o.clone()], &Tunables::default()), None);

        player.y = 10.0;
        assert_eq!(
            detect(&player, &[o.clone()], &Tunables::default()),
            Some(CrashCause::TopBarrier)
        );

        player.y = 420.0;
        assert_eq!(
            detect(&player, &[o], &Tunables::default()),
            Some(CrashCause::BottomBarrier)
        );
    }

    #[test]
    fn negative_top_height_never_collides() {
        let o = Obstacle::new(150.0, 100.0, 250.0, 180.0, 540.0);
        assert!(o.top_height < 0.0);
        let mut player = Player::spawn(&Field::new(800.0, 600.0));
        player.y = 0.0;
        assert_ne!(
            detect(&player, &[o], &Tunables::default()),
            Some(CrashCause::TopBarrier)
        );
    }

    proptest! {
        #[test]
        fn hitboxes_fit_inside_visual_rects(
            x in -200.0f32..800.0,
            y in 0.0f32..450.0,
            center in 120.0f32..360.0,
            gap in 50.0f32..250.0,
            pw in 0.0f32..=1.0,
            ph in 0.0f32..=1.0,
            ow in 0.0f32..=1.0,
            oh in 0.0f32..=1.0,
        ) {
            let t = Tunables {
                player_collision_width: pw,
                player_collision_height: ph,
                obstacle_collision_width: ow,
                obstacle_collision_height: oh,
                ..Tunables::default()
            };
            let mut player = Player::spawn(&Field::new(800.0, 600.0));
            player.y = y;
            let o = Obstacle::new(x, center, gap, 180.0, 540.0);

            let eps = 1e-3;
            let grow = |r: Rect| Rect::new(r.x - eps, r.y - eps, r.width + 2.0 * eps, r.height + 2.0 * eps);

            let hb = player_hitbox(&player, &t);
            prop_assert!(grow(player_rect(&player)).contains(&hb));
            prop_assert!(hb.width <= player.width && hb.height <= player.height);

            let top = top_hitbox(&o, &t);
            prop_assert!(grow(top_rect(&o)).contains(&top));

            let bottom = bottom_hitbox(&o, &t);
            prop_assert!(grow(bottom_rect(&o)).contains(&bottom));
        }
    }
}
