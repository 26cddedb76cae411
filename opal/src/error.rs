/// Errors emitted by the object layer.
///
/// Precondition violations (`AlreadyCurrent`, `ContextRequired`,
/// `ForeignContext`, `Disposed`) indicate caller bugs and are surfaced
/// immediately; nothing in this layer retries or swallows them.
/// `Unsupported` is distinct so callers can tell capability gaps apart
/// from programming errors.
#[derive(Clone, Debug, thiserror::Error)]
pub enum Error {
    /// The context is already current on some thread.
    #[error("context is already current on a thread")]
    AlreadyCurrent,

    /// Ordinary disposal was called on a resource that still owns a native
    /// handle; releasing it requires a current context.
    #[error("releasing the native handle requires a current context")]
    ContextRequired,

    /// The supplied context does not share the resource's object namespace.
    #[error("context does not own this resource's share group")]
    ForeignContext,

    /// Operation on a resource in the terminal disposed state.
    #[error("resource was disposed")]
    Disposed,

    /// Explicit disposal of a resource that still has registered
    /// references.
    #[error("resource still has {0} registered reference(s)")]
    StillReferenced(u32),

    /// The native implementation lacks a required feature.
    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    /// Shader compilation failed; carries the native info log.
    #[error("shader compilation failed: {0}")]
    ShaderCompilation(String),

    /// Program linking failed; carries the native info log.
    #[error("program link failed: {0}")]
    ProgramLink(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
