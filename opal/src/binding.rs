use crate::context::CurrentContext;
use crate::error::Result;

/// The binding capability of context-bound objects.
///
/// Binding is orthogonal to lifetime: an object may be unbound-but-alive,
/// bound-and-alive, or disposed. Binding a disposed object fails with
/// [`Error::Disposed`](crate::Error::Disposed).
pub trait Binding {
    /// Binds the object to its kind's native target.
    fn bind(&self, context: &CurrentContext) -> Result<()>;

    /// Unbinds the object if it is bound.
    fn unbind(&self, context: &CurrentContext) -> Result<()>;

    /// Whether the object is currently bound.
    fn is_bound(&self) -> bool;
}
