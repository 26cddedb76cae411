//! Glyphs and the fixed renderable character set.

use glam::Vec2;

/// The glyph substituted for characters outside the renderable set.
pub const FALLBACK_CHAR: char = '?';

/// The fixed ordered sequence of renderable characters: code points 1
/// through 127 inclusive, with control characters omitted. This defines
/// exactly which glyphs get pre-built into a font's glyph table; it never
/// changes and contains no duplicates.
pub fn font_characters() -> impl Iterator<Item = char> {
    (1u32..=127)
        .filter_map(char::from_u32)
        .filter(|c| !c.is_control())
}

/// Where a glyph's renderable data lives in its font's glyph store.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GlyphSlot {
    /// An indexed range of the font's mesh buffers.
    Mesh {
        base_vertex: u32,
        first_index: u32,
        index_count: u32,
    },
    /// A normalized UV rectangle of the font's atlas texture.
    Atlas { uv_min: Vec2, uv_max: Vec2 },
}

/// One pre-built glyph.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Glyph {
    pub ch: char,
    /// Pen advance after this glyph, clamped non-negative so accumulated
    /// advances stay monotonic.
    pub advance: f32,
    /// Ink extents in font-rendering units.
    pub size: Vec2,
    pub slot: GlyphSlot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn character_set_is_stable_and_duplicate_free() {
        let first: Vec<char> = font_characters().collect();
        let second: Vec<char> = font_characters().collect();
        assert_eq!(first, second);

        let unique: HashSet<char> = first.iter().copied().collect();
        assert_eq!(unique.len(), first.len());
    }

    #[test]
    fn character_set_excludes_control_characters() {
        assert!(font_characters().all(|c| !c.is_control()));
        assert!(font_characters().all(|c| (c as u32) >= 1 && (c as u32) <= 127));
        // the printable ASCII range survives
        assert!(font_characters().any(|c| c == ' '));
        assert!(font_characters().any(|c| c == '~'));
        assert!(font_characters().all(|c| c != '\n' && c != '\x7f'));
    }
}
