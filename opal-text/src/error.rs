/// Errors emitted by the font engine.
#[derive(Clone, Debug, thiserror::Error)]
pub enum TextError {
    /// The glyph provider knows nothing about the requested family.
    #[error("unknown font family `{0}`")]
    UnknownFamily(String),

    /// The font configuration cannot be honored on this context, e.g. an
    /// atlas font without single-channel texture support.
    #[error("unsupported font configuration: {0}")]
    Unsupported(&'static str),

    /// Failure from the underlying object layer.
    #[error(transparent)]
    Gpu(#[from] opal::Error),
}

pub type Result<T, E = TextError> = std::result::Result<T, E>;
