//! Contexts and context currency.
//!
//! A [`Context`] wraps the native api object together with a *share group*:
//! the namespace in which native object names are valid. Contexts created
//! with [`Context::new_shared`] exchange objects freely; everything else is
//! foreign.
//!
//! Native state can only be mutated while a context is *current*, and a
//! context is current on at most one thread at a time. Currency is
//! represented by a value: [`Context::make_current`] hands out a
//! [`CurrentContext`] guard, and every operation that touches native state
//! takes `&CurrentContext`, so calls outside a valid context scope don't
//! compile.

use crate::api::NativeApi;
use crate::error::{Error, Result};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};
use tracing::trace;

/// Identifies the object namespace a context belongs to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ShareGroup(u64);

static NEXT_SHARE_GROUP: AtomicU64 = AtomicU64::new(1);

pub(crate) struct ContextInner {
    api: Arc<dyn NativeApi>,
    share_group: ShareGroup,
    /// Thread the context is current on, if any.
    current: Mutex<Option<ThreadId>>,
}

/// A native graphics context.
pub struct Context {
    inner: Arc<ContextInner>,
}

impl Context {
    /// Creates a context with a fresh share group.
    pub fn new(api: Arc<dyn NativeApi>) -> Context {
        let share_group = ShareGroup(NEXT_SHARE_GROUP.fetch_add(1, Ordering::Relaxed));
        Context {
            inner: Arc::new(ContextInner {
                api,
                share_group,
                current: Mutex::new(None),
            }),
        }
    }

    /// Creates a context sharing `other`'s object namespace.
    pub fn new_shared(other: &Context) -> Context {
        Context {
            inner: Arc::new(ContextInner {
                api: other.inner.api.clone(),
                share_group: other.inner.share_group,
                current: Mutex::new(None),
            }),
        }
    }

    /// The share group this context belongs to.
    pub fn share_group(&self) -> ShareGroup {
        self.inner.share_group
    }

    /// Whether this context is current on the calling thread.
    pub fn is_current(&self) -> bool {
        *self.inner.current.lock().unwrap() == Some(thread::current().id())
    }

    /// Makes the context current on the calling thread and returns the
    /// guard gating native-mutating operations. Fails with
    /// [`Error::AlreadyCurrent`] if the context is current anywhere,
    /// including nested on this thread.
    pub fn make_current(&self) -> Result<CurrentContext<'_>> {
        let mut current = self.inner.current.lock().unwrap();
        if current.is_some() {
            return Err(Error::AlreadyCurrent);
        }
        *current = Some(thread::current().id());
        trace!(share_group = ?self.inner.share_group, "make_current");
        Ok(CurrentContext {
            context: self,
            _not_send: PhantomData,
        })
    }
}

/// Proof that a context is current on the calling thread.
///
/// Holding one is the precondition for disposal, binding and drawing.
/// Dropping it releases currency. Not `Send`: currency is a per-thread
/// property.
pub struct CurrentContext<'a> {
    context: &'a Context,
    _not_send: PhantomData<*const ()>,
}

impl<'a> CurrentContext<'a> {
    /// The context this guard keeps current.
    pub fn context(&self) -> &Context {
        self.context
    }

    /// The share group of the current context.
    pub fn share_group(&self) -> ShareGroup {
        self.context.inner.share_group
    }

    /// Whether the native implementation supports `cap`.
    pub fn supports(&self, cap: crate::api::Capability) -> bool {
        self.context.inner.api.supports(cap)
    }

    /// Issues one draw against the current context.
    pub fn draw(&self, cmd: &crate::draw::DrawCmd) {
        self.context.inner.api.draw(cmd);
    }

    pub(crate) fn api(&self) -> &Arc<dyn NativeApi> {
        &self.context.inner.api
    }
}

impl<'a> Drop for CurrentContext<'a> {
    fn drop(&mut self) {
        *self.context.inner.current.lock().unwrap() = None;
        trace!(share_group = ?self.context.inner.share_group, "release_current");
    }
}
