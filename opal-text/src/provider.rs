//! The external glyph-metrics collaborator.
//!
//! Text shaping lives outside this crate. A [`GlyphProvider`] supplies
//! per-character advance widths plus either triangulated outlines (for
//! vector fonts) or coverage bitmaps (for atlas fonts). Characters a
//! provider does not know are reported as `None`, not as errors.

use glam::Vec2;

bitflags::bitflags! {
    /// Style axes of a face. Empty means regular.
    pub struct FontStyle: u32 {
        const BOLD = 0b01;
        const ITALIC = 0b10;
    }
}

/// Identifies a face at a size: what a provider is asked to measure or
/// render against.
#[derive(Copy, Clone, Debug)]
pub struct FaceRequest<'a> {
    pub family: &'a str,
    pub em_size: u32,
    pub style: FontStyle,
}

/// Measurements of one glyph, in font-rendering units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GlyphMetrics {
    /// Horizontal pen advance after this glyph.
    pub advance: f32,
    /// Ink extents, width x height.
    pub size: Vec2,
}

/// One vertex of a triangulated glyph outline.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 2],
}

/// A triangulated glyph outline. Indices are glyph-local; draws offset
/// them with a base vertex.
#[derive(Clone, Debug)]
pub struct GlyphOutline {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

/// A rasterized glyph: `width * height` coverage bytes, row-major.
#[derive(Clone, Debug)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<u8>,
}

/// Supplies glyph measurements and renderable data for font families.
pub trait GlyphProvider: Send + Sync {
    /// Whether the provider can serve `family` at all.
    fn supports_family(&self, family: &str) -> bool;

    /// Measures one glyph. `None` if the face has no glyph for `ch`.
    fn metrics(&self, face: &FaceRequest, ch: char) -> Option<GlyphMetrics>;

    /// Triangulated outline for vector rendering.
    fn outline(&self, face: &FaceRequest, ch: char) -> Option<GlyphOutline>;

    /// Coverage bitmap for atlas rendering.
    fn rasterize(&self, face: &FaceRequest, ch: char) -> Option<GlyphBitmap>;
}
