//! Additive rendering effects layered behind or around a glyph's base
//! color pass. Effects carry rendering parameters only; they have no
//! lifecycle of their own.

use glam::Vec2;
use opal::Color;

/// A font effect.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FontFx {
    /// A single offset copy of the string drawn behind the base pass.
    Shadow { color: Color, offset: Vec2 },
    /// A ring of copies drawn around the base pass.
    Halo { color: Color, width: f32 },
}

/// Active shadow parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub offset: Vec2,
}

/// Active halo parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Halo {
    pub color: Color,
    pub width: f32,
}

/// The effects a font actually draws with: at most one shadow and one
/// halo.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ResolvedFx {
    pub shadow: Option<Shadow>,
    pub halo: Option<Halo>,
}

impl ResolvedFx {
    /// Scans an effect list; the last entry of each kind wins, earlier
    /// entries of the same kind are overridden. An empty list resolves to
    /// no effects.
    pub fn resolve(effects: &[FontFx]) -> ResolvedFx {
        let mut resolved = ResolvedFx::default();
        for fx in effects {
            match *fx {
                FontFx::Shadow { color, offset } => {
                    resolved.shadow = Some(Shadow { color, offset });
                }
                FontFx::Halo { color, width } => {
                    resolved.halo = Some(Halo { color, width });
                }
            }
        }
        resolved
    }
}
