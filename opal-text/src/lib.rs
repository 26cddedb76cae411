//! Font abstraction and glyph engine on top of the `opal` object layer.
//!
//! A [`Font`] lazily builds an immutable glyph table over the fixed
//! renderable character set, as either triangulated outline meshes or a
//! packed texture atlas, then draws strings as ordered per-glyph draws
//! with optional shadow/halo passes. Fonts are shared resources under the
//! [`opal::Shared`] reference-count protocol; glyph metrics and renderable
//! data come from an external [`GlyphProvider`].

mod atlas;
mod effect;
mod error;
mod font;
mod glyph;
mod provider;

pub use crate::effect::{FontFx, Halo, ResolvedFx, Shadow};
pub use crate::error::{Result, TextError};
pub use crate::font::{Font, FontBackend, FontCache, FontDescriptor};
pub use crate::glyph::{font_characters, Glyph, GlyphSlot, FALLBACK_CHAR};
pub use crate::provider::{
    FaceRequest, FontStyle, GlyphBitmap, GlyphMetrics, GlyphOutline, GlyphProvider, MeshVertex,
};
