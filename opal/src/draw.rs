//! Draw command types handed to the native api.

use crate::api::RawName;
use glam::{Mat3, Vec2};

/// An RGBA color, linear, unpremultiplied.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Color {
        Color { r, g, b, a }
    }

    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
}

/// What a draw reads its geometry from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DrawSource {
    /// An indexed range of the currently relevant vertex/index buffer pair.
    Mesh {
        vertices: RawName,
        indices: RawName,
        base_vertex: u32,
        first_index: u32,
        index_count: u32,
    },
    /// A quad sampling a rectangle of a texture. `uv_min`/`uv_max` are
    /// normalized texture coordinates, `size` is in model units.
    TexturedQuad {
        texture: RawName,
        uv_min: Vec2,
        uv_max: Vec2,
        size: Vec2,
    },
}

/// One draw call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawCmd {
    pub source: DrawSource,
    /// Model transform, 2D affine as a 3x3 column-major matrix.
    pub transform: Mat3,
    pub color: Color,
}
