//! Frame description
//!
//! `build` turns the current state into a list of draw commands in pixel
//! space. It never touches the GPU, so the whole frame layout is testable,
//! including the collision overlay.

use glam::Vec2;

use super::vertex::colors;
use crate::assets::{Assets, SpriteId};
use crate::settings::Tunables;
use crate::sim::collision::{self, Rect};
use crate::sim::{GameState, Obstacle, Player};

/// How a shape is filled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid([f32; 4]),
    Sprite(SpriteId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Axis-aligned filled rectangle
    Rect { rect: Rect, fill: Fill },
    /// Vertical two-color gradient
    Gradient {
        rect: Rect,
        top: [f32; 4],
        bottom: [f32; 4],
    },
    /// Rectangle rotated about its center
    Quad {
        center: Vec2,
        size: Vec2,
        degrees: f32,
        fill: Fill,
    },
    /// Stroked rotated rectangle
    QuadOutline {
        center: Vec2,
        size: Vec2,
        degrees: f32,
        thickness: f32,
        color: [f32; 4],
    },
    /// Stroked axis-aligned rectangle
    Outline {
        rect: Rect,
        thickness: f32,
        color: [f32; 4],
    },
}

const OBSTACLE_STROKE: f32 = 3.0;
const PLAYER_STROKE: f32 = 2.0;
const GROUND_LINE: f32 = 2.0;
const OVERLAY_STROKE: f32 = 3.0;

/// Describe one frame
pub fn build(
    state: &GameState,
    tunables: &Tunables,
    assets: &Assets,
    show_collision_boxes: bool,
) -> Vec<DrawCmd> {
    let mut cmds = Vec::new();
    if !state.mode.is_drawn() {
        return cmds;
    }

    background(&mut cmds, state, assets);

    if state.mode.shows_scene() {
        for obstacle in &state.obstacles {
            obstacle_cmds(&mut cmds, obstacle, assets);
        }
        player_cmds(&mut cmds, &state.player, tunables, assets);
    }

    ground(&mut cmds, state);

    if show_collision_boxes && state.mode.shows_scene() {
        overlay(&mut cmds, state, tunables);
    }

    cmds
}

fn background(cmds: &mut Vec<DrawCmd>, state: &GameState, assets: &Assets) {
    let (w, h) = (state.field.width, state.field.height);
    if assets.is_loaded(SpriteId::Background) {
        cmds.push(DrawCmd::Rect {
            rect: Rect::new(0.0, 0.0, w, h),
            fill: Fill::Sprite(SpriteId::Background),
        });
        return;
    }

    // Sky down to 70%, then grass
    let horizon = h * 0.7;
    cmds.push(DrawCmd::Rect {
        rect: Rect::new(0.0, 0.0, w, horizon),
        fill: Fill::Solid(colors::SKY),
    });
    cmds.push(DrawCmd::Gradient {
        rect: Rect::new(0.0, horizon, w, h - horizon),
        top: colors::GRASS_LIGHT,
        bottom: colors::GRASS_DARK,
    });
}

fn obstacle_cmds(cmds: &mut Vec<DrawCmd>, obstacle: &Obstacle, assets: &Assets) {
    // Sprites keep their own height and hang from the gap edges
    match assets.size(SpriteId::ObstacleTop) {
        Some((_, img_h)) => cmds.push(DrawCmd::Rect {
            rect: Rect::new(
                obstacle.x,
                obstacle.top_height - img_h as f32,
                obstacle.width,
                img_h as f32,
            ),
            fill: Fill::Sprite(SpriteId::ObstacleTop),
        }),
        None => solid_obstacle(cmds, collision::top_rect(obstacle)),
    }

    match assets.size(SpriteId::ObstacleBottom) {
        Some((_, img_h)) => cmds.push(DrawCmd::Rect {
            rect: Rect::new(obstacle.x, obstacle.bottom_y, obstacle.width, img_h as f32),
            fill: Fill::Sprite(SpriteId::ObstacleBottom),
        }),
        None => solid_obstacle(cmds, collision::bottom_rect(obstacle)),
    }
}

fn solid_obstacle(cmds: &mut Vec<DrawCmd>, rect: Rect) {
    cmds.push(DrawCmd::Rect {
        rect,
        fill: Fill::Solid(colors::OBSTACLE),
    });
    cmds.push(DrawCmd::Outline {
        rect,
        thickness: OBSTACLE_STROKE,
        color: colors::OUTLINE,
    });
}

fn player_cmds(cmds: &mut Vec<DrawCmd>, player: &Player, tunables: &Tunables, assets: &Assets) {
    let center = Vec2::new(player.center_x(), player.center_y());
    // Size scale is visual only
    let size = Vec2::new(player.width, player.height) * tunables.player_size;

    if assets.is_loaded(SpriteId::Player) {
        cmds.push(DrawCmd::Quad {
            center,
            size,
            degrees: player.rotation,
            fill: Fill::Sprite(SpriteId::Player),
        });
    } else {
        cmds.push(DrawCmd::Quad {
            center,
            size,
            degrees: player.rotation,
            fill: Fill::Solid(colors::PLAYER),
        });
        cmds.push(DrawCmd::QuadOutline {
            center,
            size,
            degrees: player.rotation,
            thickness: PLAYER_STROKE,
            color: colors::OUTLINE,
        });
    }
}

fn ground(cmds: &mut Vec<DrawCmd>, state: &GameState) {
    let field = &state.field;
    cmds.push(DrawCmd::Rect {
        rect: ground_rect(state),
        fill: Fill::Solid(colors::GROUND),
    });
    cmds.push(DrawCmd::Rect {
        rect: Rect::new(0.0, field.ground_y() - GROUND_LINE / 2.0, field.width, GROUND_LINE),
        fill: Fill::Solid(colors::OUTLINE),
    });
}

fn ground_rect(state: &GameState) -> Rect {
    let field = &state.field;
    Rect::new(0.0, field.ground_y(), field.width, field.ground_height())
}

/// Collision rectangles exactly as the collision step tests them
fn overlay(cmds: &mut Vec<DrawCmd>, state: &GameState, tunables: &Tunables) {
    cmds.push(DrawCmd::Outline {
        rect: collision::player_hitbox(&state.player, tunables),
        thickness: OVERLAY_STROKE,
        color: colors::OVERLAY_PLAYER,
    });
    for obstacle in &state.obstacles {
        for rect in [
            collision::top_hitbox(obstacle, tunables),
            collision::bottom_hitbox(obstacle, tunables),
        ] {
            cmds.push(DrawCmd::Outline {
                rect,
                thickness: OVERLAY_STROKE,
                color: colors::OVERLAY_OBSTACLE,
            });
        }
    }
    cmds.push(DrawCmd::Outline {
        rect: ground_rect(state),
        thickness: OVERLAY_STROKE,
        color: colors::OVERLAY_GROUND,
    });
}
