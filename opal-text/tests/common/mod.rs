//! Shared fixture: a deterministic glyph provider plus a recording
//! context.

use glam::Vec2;
use opal::{Context, RecordingApi};
use opal_text::{
    FaceRequest, GlyphBitmap, GlyphMetrics, GlyphOutline, GlyphProvider, MeshVertex,
};
use std::sync::Arc;

pub const FAMILY: &str = "Test";

/// Serves the "Test" family with box glyphs: every renderable character
/// gets a quad outline / filled bitmap, with per-character advances so
/// ordering mistakes show up in pen positions.
pub struct TestGlyphs;

impl TestGlyphs {
    fn known(&self, face: &FaceRequest, ch: char) -> bool {
        face.family == FAMILY && (1..=127).contains(&(ch as u32)) && !ch.is_control()
    }
}

impl GlyphProvider for TestGlyphs {
    fn supports_family(&self, family: &str) -> bool {
        family == FAMILY
    }

    fn metrics(&self, face: &FaceRequest, ch: char) -> Option<GlyphMetrics> {
        if !self.known(face, ch) {
            return None;
        }
        let em = face.em_size as f32;
        let advance = em * (0.4 + (ch as u32 % 8) as f32 * 0.05);
        Some(GlyphMetrics {
            advance,
            size: Vec2::new(advance * 0.9, em),
        })
    }

    fn outline(&self, face: &FaceRequest, ch: char) -> Option<GlyphOutline> {
        let metrics = self.metrics(face, ch)?;
        let (w, h) = (metrics.size.x, metrics.size.y);
        Some(GlyphOutline {
            vertices: vec![
                MeshVertex { position: [0.0, 0.0] },
                MeshVertex { position: [w, 0.0] },
                MeshVertex { position: [w, h] },
                MeshVertex { position: [0.0, h] },
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
        })
    }

    fn rasterize(&self, face: &FaceRequest, ch: char) -> Option<GlyphBitmap> {
        let metrics = self.metrics(face, ch)?;
        let width = (metrics.size.x.ceil() as u32).max(1);
        let height = (metrics.size.y.ceil() as u32).max(1);
        Some(GlyphBitmap {
            width,
            height,
            coverage: vec![0xff; (width * height) as usize],
        })
    }
}

pub struct Fixture {
    pub api: Arc<RecordingApi>,
    pub context: Context,
    pub provider: Arc<TestGlyphs>,
}

pub fn fixture() -> Fixture {
    let _ = tracing_subscriber::fmt::try_init();
    let api = Arc::new(RecordingApi::new());
    let context = Context::new(api.clone());
    Fixture {
        api,
        context,
        provider: Arc::new(TestGlyphs),
    }
}
