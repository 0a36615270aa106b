//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle lists in pixel space (y down). The
//! pipeline maps pixels to clip space.

use glam::{Mat2, Vec2};

use super::scene::{DrawCmd, Fill};
use super::vertex::{Vertex, colors};
use crate::assets::SpriteId;
use crate::sim::Rect;

/// Texture a batch samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    /// 1x1 white texel; vertex color is the fill
    White,
    Sprite(SpriteId),
}

/// Consecutive triangles sharing a texture
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub texture: TextureSlot,
    pub vertices: Vec<Vertex>,
}

const FULL_UV: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Two triangles from corners in order top-left, top-right, bottom-right, bottom-left
pub fn quad(corners: [Vec2; 4], uvs: [[f32; 2]; 4], colors: [[f32; 4]; 4]) -> [Vertex; 6] {
    let v = |i: usize| Vertex::textured(corners[i].x, corners[i].y, uvs[i][0], uvs[i][1], colors[i]);
    [v(0), v(1), v(2), v(0), v(2), v(3)]
}

pub fn rect_corners(r: &Rect) -> [Vec2; 4] {
    [
        Vec2::new(r.x, r.y),
        Vec2::new(r.right(), r.y),
        Vec2::new(r.right(), r.bottom()),
        Vec2::new(r.x, r.bottom()),
    ]
}

/// Solid rectangle
pub fn rect(r: &Rect, color: [f32; 4]) -> [Vertex; 6] {
    quad(rect_corners(r), [[0.0; 2]; 4], [color; 4])
}

/// Rectangle showing a whole texture
pub fn sprite_rect(r: &Rect, tint: [f32; 4]) -> [Vertex; 6] {
    quad(rect_corners(r), FULL_UV, [tint; 4])
}

/// Rectangle blending from `top` to `bottom`
pub fn gradient(r: &Rect, top: [f32; 4], bottom: [f32; 4]) -> [Vertex; 6] {
    quad(rect_corners(r), [[0.0; 2]; 4], [top, top, bottom, bottom])
}

/// Corners of a `size` rectangle centered on `center`, rotated clockwise
/// (on screen) by `degrees`
pub fn rotated_corners(center: Vec2, size: Vec2, degrees: f32) -> [Vec2; 4] {
    let rot = Mat2::from_angle(degrees.to_radians());
    let half = size * 0.5;
    [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ]
    .map(|p| center + rot * p)
}

/// Stroke centered on the rectangle's edges
pub fn outline(r: &Rect, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let t = thickness;
    let h = t / 2.0;
    let edges = [
        Rect::new(r.x - h, r.y - h, r.width + t, t),
        Rect::new(r.x - h, r.bottom() - h, r.width + t, t),
        Rect::new(r.x - h, r.y + h, t, (r.height - t).max(0.0)),
        Rect::new(r.right() - h, r.y + h, t, (r.height - t).max(0.0)),
    ];
    edges.iter().flat_map(|e| rect(e, color)).collect()
}

/// Stroke of a rotated rectangle
pub fn quad_outline(center: Vec2, size: Vec2, degrees: f32, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let rot = Mat2::from_angle(degrees.to_radians());
    let local = Rect::new(-size.x / 2.0, -size.y / 2.0, size.x, size.y);
    outline(&local, thickness, color)
        .into_iter()
        .map(|mut v| {
            let p = center + rot * Vec2::from(v.position);
            v.position = p.into();
            v
        })
        .collect()
}

/// Tessellate a frame, merging consecutive commands that share a texture
pub fn tessellate(cmds: &[DrawCmd]) -> Vec<Batch> {
    let mut batches: Vec<Batch> = Vec::new();

    for cmd in cmds {
        let (texture, vertices): (TextureSlot, Vec<Vertex>) = match cmd {
            DrawCmd::Rect { rect: r, fill } => match fill {
                Fill::Solid(color) => (TextureSlot::White, rect(r, *color).to_vec()),
                Fill::Sprite(id) => (TextureSlot::Sprite(*id), sprite_rect(r, colors::WHITE).to_vec()),
            },
            DrawCmd::Gradient { rect: r, top, bottom } => {
                (TextureSlot::White, gradient(r, *top, *bottom).to_vec())
            }
            DrawCmd::Quad {
                center,
                size,
                degrees,
                fill,
            } => {
                let corners = rotated_corners(*center, *size, *degrees);
                match fill {
                    Fill::Solid(color) => (
                        TextureSlot::White,
                        quad(corners, [[0.0; 2]; 4], [*color; 4]).to_vec(),
                    ),
                    Fill::Sprite(id) => (
                        TextureSlot::Sprite(*id),
                        quad(corners, FULL_UV, [colors::WHITE; 4]).to_vec(),
                    ),
                }
            }
            DrawCmd::QuadOutline {
                center,
                size,
                degrees,
                thickness,
                color,
            } => (
                TextureSlot::White,
                quad_outline(*center, *size, *degrees, *thickness, *color),
            ),
            DrawCmd::Outline {
                rect: r,
                thickness,
                color,
            } => (TextureSlot::White, outline(r, *thickness, *color)),
        };

        match batches.last_mut() {
            Some(batch) if batch.texture == texture => batch.vertices.extend(vertices),
            _ => batches.push(Batch { texture, vertices }),
        }
    }

    batches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn rect_covers_its_corners() {
        let verts = rect(&Rect::new(10.0, 20.0, 30.0, 40.0), colors::SKY);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
        assert!(verts.iter().all(|v| v.color == colors::SKY));
    }

    #[test]
    fn gradient_colors_by_row() {
        let verts = gradient(&Rect::new(0.0, 0.0, 1.0, 1.0), colors::GRASS_LIGHT, colors::GRASS_DARK);
        for v in verts {
            let expected = if v.position[1] == 0.0 {
                colors::GRASS_LIGHT
            } else {
                colors::GRASS_DARK
            };
            assert_eq!(v.color, expected);
        }
    }

    #[test]
    fn rotation_is_clockwise_on_screen() {
        let c = rotated_corners(Vec2::ZERO, Vec2::new(4.0, 2.0), 90.0);
        // Top-left (-2, -1) swings to (1, -2) with y pointing down
        assert!(close(c[0], Vec2::new(1.0, -2.0)), "{:?}", c[0]);

        let unrotated = rotated_corners(Vec2::new(5.0, 5.0), Vec2::new(4.0, 2.0), 0.0);
        assert!(close(unrotated[2], Vec2::new(7.0, 6.0)));
    }

    #[test]
    fn outline_is_four_edges() {
        let verts = outline(&Rect::new(0.0, 0.0, 100.0, 50.0), 2.0, colors::OUTLINE);
        assert_eq!(verts.len(), 24);
        let min_x = verts.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        let max_y = verts.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert_eq!(min_x, -1.0);
        assert_eq!(max_y, 51.0);
    }

    #[test]
    fn batches_split_on_texture_change() {
        let r = Rect::new(0.0, 0.0, 1.0, 1.0);
        let cmds = [
            DrawCmd::Rect { rect: r, fill: Fill::Solid(colors::SKY) },
            DrawCmd::Gradient { rect: r, top: colors::SKY, bottom: colors::GROUND },
            DrawCmd::Rect { rect: r, fill: Fill::Sprite(SpriteId::Player) },
            DrawCmd::Outline { rect: r, thickness: 1.0, color: colors::OUTLINE },
        ];
        let batches = tessellate(&cmds);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].texture, TextureSlot::White);
        assert_eq!(batches[0].vertices.len(), 12);
        assert_eq!(batches[1].texture, TextureSlot::Sprite(SpriteId::Player));
        assert_eq!(batches[2].vertices.len(), 24);
    }
}
