//! Fonts, the glyph-table build, the font cache and string drawing.

use crate::atlas;
use crate::effect::{FontFx, ResolvedFx};
use crate::error::{Result, TextError};
use crate::glyph::{font_characters, Glyph, GlyphSlot, FALLBACK_CHAR};
use crate::provider::{FaceRequest, FontStyle, GlyphBitmap, GlyphMetrics, GlyphProvider, MeshVertex};
use fnv::FnvHashMap;
use glam::{Mat3, Vec2};
use opal::{
    Binding, Buffer, BufferUsage, Capability, Color, CurrentContext, DrawCmd, DrawSource, RawName,
    RefCount, Region, ShareGroup, Shared, Texture, TextureFormat, TextureInfo,
};
use std::f32::consts::FRAC_1_SQRT_2;
use std::sync::{Arc, Mutex};
use tracing::{trace, trace_span};

/// Everything needed to construct a font.
#[derive(Clone, Debug)]
pub struct FontDescriptor {
    pub family: String,
    pub em_size: u32,
    pub style: FontStyle,
    pub effects: Vec<FontFx>,
}

impl FontDescriptor {
    /// A regular-style descriptor with no effects.
    pub fn new(family: impl Into<String>, em_size: u32) -> FontDescriptor {
        FontDescriptor {
            family: family.into(),
            em_size,
            style: FontStyle::empty(),
            effects: Vec::new(),
        }
    }

    pub fn with_style(mut self, style: FontStyle) -> FontDescriptor {
        self.style = style;
        self
    }

    pub fn with_effect(mut self, fx: FontFx) -> FontDescriptor {
        self.effects.push(fx);
        self
    }

    /// Identity of this font for caching purposes: `family + "+" + em_size`.
    ///
    /// Style and effects are deliberately not part of the key, so two
    /// descriptors differing only in style or effects alias the same
    /// cached font object.
    pub fn cache_key(&self) -> String {
        format!("{}+{}", self.family, self.em_size)
    }
}

/// How a font's glyphs are rendered.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FontBackend {
    /// Triangulated outlines in a vertex/index buffer pair.
    Vector,
    /// Rasterized glyph bitmaps packed into one texture.
    TextureAtlas,
}

/// The GPU objects backing a built glyph table. Raw names are cached at
/// build time; the store outlives every draw that references them.
enum GlyphStore {
    Mesh {
        vertices: Buffer,
        indices: Buffer,
        vertices_raw: RawName,
        indices_raw: RawName,
    },
    Atlas {
        texture: Texture,
        texture_raw: RawName,
    },
}

impl GlyphStore {
    fn share_group(&self) -> ShareGroup {
        match self {
            GlyphStore::Mesh { vertices, .. } => vertices.share_group(),
            GlyphStore::Atlas { texture, .. } => texture.share_group(),
        }
    }

    fn bind(&self, context: &CurrentContext) -> opal::Result<()> {
        match self {
            GlyphStore::Mesh { vertices, .. } => vertices.bind(context),
            GlyphStore::Atlas { texture, .. } => texture.bind(context),
        }
    }

    fn unbind(&self, context: &CurrentContext) -> opal::Result<()> {
        match self {
            GlyphStore::Mesh { vertices, .. } => vertices.unbind(context),
            GlyphStore::Atlas { texture, .. } => texture.unbind(context),
        }
    }

    fn dispose_with(&self, context: &CurrentContext) -> opal::Result<()> {
        match self {
            GlyphStore::Mesh {
                vertices, indices, ..
            } => {
                vertices.dispose_with(context)?;
                indices.dispose_with(context)
            }
            GlyphStore::Atlas { texture, .. } => texture.dispose_with(context),
        }
    }

    fn source(&self, glyph: &Glyph) -> DrawSource {
        match (self, glyph.slot) {
            (
                GlyphStore::Mesh {
                    vertices_raw,
                    indices_raw,
                    ..
                },
                GlyphSlot::Mesh {
                    base_vertex,
                    first_index,
                    index_count,
                },
            ) => DrawSource::Mesh {
                vertices: *vertices_raw,
                indices: *indices_raw,
                base_vertex,
                first_index,
                index_count,
            },
            (GlyphStore::Atlas { texture_raw, .. }, GlyphSlot::Atlas { uv_min, uv_max }) => {
                DrawSource::TexturedQuad {
                    texture: *texture_raw,
                    uv_min,
                    uv_max,
                    size: glyph.size,
                }
            }
            _ => unreachable!("glyph slot kind does not match its store"),
        }
    }
}

struct GlyphTable {
    glyphs: FnvHashMap<char, Glyph>,
    store: GlyphStore,
}

enum GlyphState {
    /// Glyphs not yet built; no native objects exist.
    Pending,
    Ready(GlyphTable),
    Disposed,
}

/// A font: a lazily built, immutable glyph table plus resolved effects.
///
/// Fonts are shared resources: the [`Shared`] reference-count protocol
/// governs their lifetime, and once built, tearing down the glyph store
/// requires a current context of the owning share group. The state
/// machine is one-way: `Pending -> Ready -> Disposed`.
pub struct Font {
    descriptor: FontDescriptor,
    backend: FontBackend,
    fx: ResolvedFx,
    provider: Arc<dyn GlyphProvider>,
    refs: RefCount,
    state: Mutex<GlyphState>,
}

impl Font {
    /// Pure factory: validates the family and resolves effects. Performs
    /// no native work; the glyph table is built on first draw or by an
    /// explicit [`prepare`](Font::prepare).
    pub fn new(
        provider: Arc<dyn GlyphProvider>,
        descriptor: FontDescriptor,
        backend: FontBackend,
    ) -> Result<Font> {
        if !provider.supports_family(&descriptor.family) {
            return Err(TextError::UnknownFamily(descriptor.family));
        }
        let fx = ResolvedFx::resolve(&descriptor.effects);
        Ok(Font {
            descriptor,
            backend,
            fx,
            provider,
            refs: RefCount::new(),
            state: Mutex::new(GlyphState::Pending),
        })
    }

    pub fn descriptor(&self) -> &FontDescriptor {
        &self.descriptor
    }

    pub fn backend(&self) -> FontBackend {
        self.backend
    }

    /// The shadow/halo the font draws with, after last-wins resolution.
    pub fn resolved_fx(&self) -> &ResolvedFx {
        &self.fx
    }

    pub fn cache_key(&self) -> String {
        self.descriptor.cache_key()
    }

    /// Whether the glyph table has been built.
    pub fn is_ready(&self) -> bool {
        matches!(&*self.state.lock().unwrap(), GlyphState::Ready(_))
    }

    /// Builds the glyph table if it is still pending.
    pub fn prepare(&self, context: &CurrentContext) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        match &*state {
            GlyphState::Ready(_) => return Ok(()),
            GlyphState::Disposed => return Err(opal::Error::Disposed.into()),
            GlyphState::Pending => {}
        }
        let table = self.build_glyphs(context)?;
        *state = GlyphState::Ready(table);
        Ok(())
    }

    fn build_glyphs(&self, context: &CurrentContext) -> Result<GlyphTable> {
        let _span = trace_span!(
            "build_glyphs",
            family = self.descriptor.family.as_str(),
            em_size = self.descriptor.em_size
        )
        .entered();
        let face = FaceRequest {
            family: &self.descriptor.family,
            em_size: self.descriptor.em_size,
            style: self.descriptor.style,
        };
        let key = self.descriptor.cache_key();

        let table = match self.backend {
            FontBackend::Vector => {
                if !context.supports(Capability::IndexU32) {
                    return Err(TextError::Unsupported("32-bit glyph index buffers"));
                }
                self.build_mesh_table(context, &face, &key)?
            }
            FontBackend::TextureAtlas => {
                if !context.supports(Capability::SingleChannelTexture) {
                    return Err(TextError::Unsupported("single-channel glyph atlas"));
                }
                self.build_atlas_table(context, &face, &key)?
            }
        };
        trace!(glyphs = table.glyphs.len(), "glyph table built");
        Ok(table)
    }

    fn build_mesh_table(
        &self,
        context: &CurrentContext,
        face: &FaceRequest,
        key: &str,
    ) -> Result<GlyphTable> {
        let mut vertices: Vec<MeshVertex> = Vec::new();
        let mut indices: Vec<u32> = Vec::new();
        let mut glyphs = FnvHashMap::default();

        for ch in font_characters() {
            let Some(metrics) = self.provider.metrics(face, ch) else {
                continue;
            };
            let Some(outline) = self.provider.outline(face, ch) else {
                continue;
            };
            let slot = GlyphSlot::Mesh {
                base_vertex: vertices.len() as u32,
                first_index: indices.len() as u32,
                index_count: outline.indices.len() as u32,
            };
            vertices.extend_from_slice(&outline.vertices);
            indices.extend_from_slice(&outline.indices);
            glyphs.insert(ch, new_glyph(ch, metrics, slot));
        }

        let vertex_buffer = Buffer::with_data(
            context,
            format!("font/{}/vertices", key),
            BufferUsage::VERTEX | BufferUsage::UPLOAD_DST,
            bytemuck::cast_slice(&vertices),
        );
        let index_buffer = Buffer::with_data(
            context,
            format!("font/{}/indices", key),
            BufferUsage::INDEX | BufferUsage::UPLOAD_DST,
            bytemuck::cast_slice(&indices),
        );
        let vertices_raw = vertex_buffer.raw()?;
        let indices_raw = index_buffer.raw()?;
        Ok(GlyphTable {
            glyphs,
            store: GlyphStore::Mesh {
                vertices: vertex_buffer,
                indices: index_buffer,
                vertices_raw,
                indices_raw,
            },
        })
    }

    fn build_atlas_table(
        &self,
        context: &CurrentContext,
        face: &FaceRequest,
        key: &str,
    ) -> Result<GlyphTable> {
        let mut entries: Vec<(char, GlyphMetrics, GlyphBitmap)> = Vec::new();
        for ch in font_characters() {
            let Some(metrics) = self.provider.metrics(face, ch) else {
                continue;
            };
            let Some(bitmap) = self.provider.rasterize(face, ch) else {
                continue;
            };
            debug_assert_eq!(
                bitmap.coverage.len(),
                (bitmap.width * bitmap.height) as usize,
                "glyph bitmap size mismatch"
            );
            entries.push((ch, metrics, bitmap));
        }

        let sizes: Vec<(u32, u32)> = entries.iter().map(|(_, _, b)| (b.width, b.height)).collect();
        let layout = atlas::pack(&sizes);

        let mut texels = vec![0u8; (layout.width * layout.height) as usize];
        let mut glyphs = FnvHashMap::default();
        let atlas_size = Vec2::new(layout.width as f32, layout.height as f32);
        for ((ch, metrics, bitmap), slot) in entries.iter().zip(&layout.slots) {
            for row in 0..bitmap.height {
                let src = (row * bitmap.width) as usize;
                let dst = ((slot.y + row) * layout.width + slot.x) as usize;
                texels[dst..dst + bitmap.width as usize]
                    .copy_from_slice(&bitmap.coverage[src..src + bitmap.width as usize]);
            }
            let uv_min = Vec2::new(slot.x as f32, slot.y as f32) / atlas_size;
            let uv_max = Vec2::new(
                (slot.x + slot.width) as f32,
                (slot.y + slot.height) as f32,
            ) / atlas_size;
            glyphs.insert(*ch, new_glyph(*ch, *metrics, GlyphSlot::Atlas { uv_min, uv_max }));
        }

        let texture = Texture::new(
            context,
            format!("font/{}/atlas", key),
            TextureInfo {
                width: layout.width,
                height: layout.height,
                format: TextureFormat::R8,
            },
        )?;
        texture.upload(
            context,
            Region {
                x: 0,
                y: 0,
                width: layout.width,
                height: layout.height,
            },
            &texels,
        )?;
        let texture_raw = texture.raw()?;
        Ok(GlyphTable {
            glyphs,
            store: GlyphStore::Atlas {
                texture,
                texture_raw,
            },
        })
    }

    /// Draws `text` as one logical unit of work against the current
    /// context: a shadow pass, then a halo pass, then the base color
    /// pass, each covering the whole string in character order with the
    /// pen advancing by each glyph's measured width.
    ///
    /// Characters outside the renderable set substitute the `'?'`
    /// fallback glyph; if the provider supplied no fallback either, the
    /// character is skipped without advancing. Any state pushed (the
    /// glyph store binding) is undone before an error propagates.
    pub fn draw_string(
        &self,
        context: &CurrentContext,
        transform: Mat3,
        color: Color,
        text: &str,
    ) -> Result<()> {
        self.prepare(context)?;
        let state = self.state.lock().unwrap();
        let table = match &*state {
            GlyphState::Ready(table) => table,
            _ => return Err(opal::Error::Disposed.into()),
        };
        let _span = trace_span!("draw_string", chars = text.chars().count()).entered();

        let bound = BoundStore::bind(&table.store, context)?;
        if let Some(shadow) = self.fx.shadow {
            draw_pass(context, table, transform, shadow.color, text, shadow.offset);
        }
        if let Some(halo) = self.fx.halo {
            for offset in halo_offsets(halo.width) {
                draw_pass(context, table, transform, halo.color, text, offset);
            }
        }
        draw_pass(context, table, transform, color, text, Vec2::ZERO);
        drop(bound);
        Ok(())
    }

    fn check_store_group(&self, context: &CurrentContext) -> opal::Result<()> {
        let state = self.state.lock().unwrap();
        if let GlyphState::Ready(table) = &*state {
            if table.store.share_group() != context.share_group() {
                return Err(opal::Error::ForeignContext);
            }
        }
        Ok(())
    }

    /// Tears down the glyph store and enters the terminal state. Runs
    /// inside the reference-count critical section; the share-group check
    /// and the teardown share one hold of the state lock, so a concurrent
    /// `prepare` can never slip a fresh store past the check.
    fn release_store(&self, context: &CurrentContext) -> opal::Result<()> {
        let mut state = self.state.lock().unwrap();
        if let GlyphState::Ready(table) = &*state {
            if table.store.share_group() != context.share_group() {
                return Err(opal::Error::ForeignContext);
            }
        }
        match std::mem::replace(&mut *state, GlyphState::Disposed) {
            GlyphState::Ready(table) => table.store.dispose_with(context),
            _ => Ok(()),
        }
    }
}

impl Shared for Font {
    fn ref_count(&self) -> u32 {
        self.refs.count()
    }

    fn is_disposed(&self) -> bool {
        self.refs.is_disposed()
    }

    fn inc_ref(&self) -> opal::Result<u32> {
        self.refs.inc()
    }

    fn dec_ref(&self, context: &CurrentContext) -> opal::Result<bool> {
        self.check_store_group(context)?;
        self.refs.dec(|| self.release_store(context))
    }

    fn dispose(&self) -> opal::Result<()> {
        // only valid while no native store exists; checked atomically
        // with the transition so a racing prepare cannot leak its store
        self.refs.dispose(|| {
            let mut state = self.state.lock().unwrap();
            if matches!(&*state, GlyphState::Ready(_)) {
                return Err(opal::Error::ContextRequired);
            }
            *state = GlyphState::Disposed;
            Ok(())
        })
    }

    fn dispose_with(&self, context: &CurrentContext) -> opal::Result<()> {
        self.check_store_group(context)?;
        self.refs.dispose(|| self.release_store(context))
    }
}

fn new_glyph(ch: char, metrics: GlyphMetrics, slot: GlyphSlot) -> Glyph {
    Glyph {
        ch,
        // monotonic pen accumulation relies on non-negative advances
        advance: metrics.advance.max(0.0),
        size: metrics.size,
        slot,
    }
}

/// One whole-string pass: glyph draws in character order, pen advancing
/// after each emitted glyph.
fn draw_pass(
    context: &CurrentContext,
    table: &GlyphTable,
    transform: Mat3,
    color: Color,
    text: &str,
    offset: Vec2,
) {
    let mut pen = 0.0f32;
    for ch in text.chars() {
        let glyph = table
            .glyphs
            .get(&ch)
            .or_else(|| table.glyphs.get(&FALLBACK_CHAR));
        let Some(glyph) = glyph else {
            continue;
        };
        let local = Mat3::from_translation(Vec2::new(pen, 0.0) + offset);
        context.draw(&DrawCmd {
            source: table.store.source(glyph),
            transform: transform * local,
            color,
        });
        pen += glyph.advance;
    }
}

/// Ring of eight compass offsets at halo width.
fn halo_offsets(width: f32) -> [Vec2; 8] {
    let d = width * FRAC_1_SQRT_2;
    [
        Vec2::new(width, 0.0),
        Vec2::new(-width, 0.0),
        Vec2::new(0.0, width),
        Vec2::new(0.0, -width),
        Vec2::new(d, d),
        Vec2::new(d, -d),
        Vec2::new(-d, d),
        Vec2::new(-d, -d),
    ]
}

/// Scoped bind of a glyph store; dropping it undoes the bind.
struct BoundStore<'a, 'b> {
    store: &'a GlyphStore,
    context: &'a CurrentContext<'b>,
}

impl<'a, 'b> BoundStore<'a, 'b> {
    fn bind(store: &'a GlyphStore, context: &'a CurrentContext<'b>) -> opal::Result<Self> {
        store.bind(context)?;
        Ok(BoundStore { store, context })
    }
}

impl<'a, 'b> Drop for BoundStore<'a, 'b> {
    fn drop(&mut self) {
        let _ = self.store.unbind(self.context);
    }
}

/// Associates cache keys with fonts. The association itself keeps nothing
/// alive: entries whose font was disposed are replaced on lookup and
/// dropped by [`sweep`](FontCache::sweep).
pub struct FontCache {
    provider: Arc<dyn GlyphProvider>,
    fonts: Mutex<FnvHashMap<String, Arc<Font>>>,
}

impl FontCache {
    pub fn new(provider: Arc<dyn GlyphProvider>) -> FontCache {
        FontCache {
            provider,
            fonts: Mutex::new(FnvHashMap::default()),
        }
    }

    /// Returns the cached font for the descriptor's key, creating it on a
    /// miss. Every successful call registers one unit of interest; release
    /// it with [`Shared::dec_ref`].
    pub fn get_or_create(
        &self,
        descriptor: FontDescriptor,
        backend: FontBackend,
    ) -> Result<Arc<Font>> {
        let key = descriptor.cache_key();
        let mut fonts = self.fonts.lock().unwrap();
        if let Some(font) = fonts.get(&key) {
            if !font.is_disposed() {
                font.inc_ref()?;
                return Ok(font.clone());
            }
        }
        let font = Arc::new(Font::new(self.provider.clone(), descriptor, backend)?);
        font.inc_ref()?;
        fonts.insert(key, font.clone());
        Ok(font)
    }

    /// Number of cached entries, disposed or not.
    pub fn len(&self) -> usize {
        self.fonts.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.lock().unwrap().is_empty()
    }

    /// Drops entries whose font reached the terminal disposed state.
    pub fn sweep(&self) {
        self.fonts
            .lock()
            .unwrap()
            .retain(|_, font| !font.is_disposed());
    }
}
