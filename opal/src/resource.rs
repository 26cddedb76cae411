//! Context-bound resource state and the disposal contract.
//!
//! A [`ResourceCore`] ties a native object name to the share group that
//! owns it. Releasing the name is only valid while a context of that group
//! is current, which is why every releasing entry point takes a
//! [`CurrentContext`] guard. The reference count, the name and the bind
//! flag all live under one mutex so the count-to-zero transition and the
//! native release are a single atomic step.

use crate::api::{NativeApi, ObjectKind, RawName};
use crate::context::{CurrentContext, ShareGroup};
use crate::error::{Error, Result};
use std::sync::{Arc, Mutex};
use tracing::{error, trace};

/// The shared-resource contract: reference counting plus the two disposal
/// entry points.
///
/// `dispose` is the ordinary entry point, valid only when no native handle
/// remains to release. `dispose_with` releases the native handle through a
/// current context of the owning share group. A resource whose count has
/// been driven to zero, or that was disposed explicitly, is in a terminal
/// state; any further operation on it fails with [`Error::Disposed`].
pub trait Shared {
    /// Number of parties currently holding interest in the resource.
    fn ref_count(&self) -> u32;

    /// Whether the resource reached the terminal disposed state.
    fn is_disposed(&self) -> bool;

    /// Registers interest, extending the resource's lifetime beyond the
    /// current scope. Returns the new count.
    fn inc_ref(&self) -> Result<u32>;

    /// Releases interest. The decrement that drives the count to zero
    /// disposes the resource before returning; `Ok(true)` reports that it
    /// did. Decrementing an already-disposed resource is a tolerated
    /// no-op (`Ok(false)`).
    fn dec_ref(&self, context: &CurrentContext) -> Result<bool>;

    /// Ordinary disposal. Fails with [`Error::ContextRequired`] if a
    /// native handle still needs releasing.
    fn dispose(&self) -> Result<()>;

    /// Context-explicit disposal: releases the native handle through
    /// `context` and transitions to the terminal state.
    fn dispose_with(&self, context: &CurrentContext) -> Result<()>;
}

struct CoreState {
    refs: u32,
    /// Native name; `None` once released. Doubles as the disposed flag.
    raw: Option<RawName>,
    bound: bool,
}

/// State shared by every context-bound object (buffers, textures, shaders).
pub(crate) struct ResourceCore {
    api: Arc<dyn NativeApi>,
    share_group: ShareGroup,
    kind: ObjectKind,
    /// Debug label, carried into trace output.
    label: String,
    state: Mutex<CoreState>,
}

impl ResourceCore {
    pub(crate) fn new(
        context: &CurrentContext,
        kind: ObjectKind,
        label: impl Into<String>,
        raw: RawName,
    ) -> ResourceCore {
        ResourceCore {
            api: context.api().clone(),
            share_group: context.share_group(),
            kind,
            label: label.into(),
            state: Mutex::new(CoreState {
                refs: 0,
                raw: Some(raw),
                bound: false,
            }),
        }
    }

    pub(crate) fn api(&self) -> &Arc<dyn NativeApi> {
        &self.api
    }

    pub(crate) fn share_group(&self) -> ShareGroup {
        self.share_group
    }

    pub(crate) fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub(crate) fn label(&self) -> &str {
        &self.label
    }

    /// The native name, while the resource is alive.
    pub(crate) fn raw(&self) -> Result<RawName> {
        self.state.lock().unwrap().raw.ok_or(Error::Disposed)
    }

    fn check_group(&self, context: &CurrentContext) -> Result<()> {
        if context.share_group() != self.share_group {
            return Err(Error::ForeignContext);
        }
        Ok(())
    }

    /// Releases the native handle. Caller holds the state lock.
    fn release(&self, state: &mut CoreState, raw: RawName) {
        if state.bound {
            self.api.unbind(self.kind);
            state.bound = false;
        }
        self.api.delete(self.kind, raw);
        trace!(kind = ?self.kind, label = self.label.as_str(), "destroy_resource");
    }

    pub(crate) fn ref_count(&self) -> u32 {
        self.state.lock().unwrap().refs
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.state.lock().unwrap().raw.is_none()
    }

    pub(crate) fn inc_ref(&self) -> Result<u32> {
        let mut state = self.state.lock().unwrap();
        if state.raw.is_none() {
            return Err(Error::Disposed);
        }
        state.refs += 1;
        Ok(state.refs)
    }

    pub(crate) fn dec_ref(&self, context: &CurrentContext) -> Result<bool> {
        self.check_group(context)?;
        let mut state = self.state.lock().unwrap();
        if state.raw.is_none() {
            // double release is the one forgiving path
            return Ok(false);
        }
        if state.refs > 0 {
            state.refs -= 1;
        }
        if state.refs == 0 {
            let raw = state.raw.take().unwrap();
            self.release(&mut state, raw);
            return Ok(true);
        }
        Ok(false)
    }

    pub(crate) fn dispose(&self) -> Result<()> {
        let state = self.state.lock().unwrap();
        if state.raw.is_none() {
            return Err(Error::Disposed);
        }
        if state.refs > 0 {
            return Err(Error::StillReferenced(state.refs));
        }
        // a native handle always needs releasing, and that takes a context
        Err(Error::ContextRequired)
    }

    pub(crate) fn dispose_with(&self, context: &CurrentContext) -> Result<()> {
        self.check_group(context)?;
        let mut state = self.state.lock().unwrap();
        if state.raw.is_none() {
            return Err(Error::Disposed);
        }
        if state.refs > 0 {
            return Err(Error::StillReferenced(state.refs));
        }
        let raw = state.raw.take().unwrap();
        self.release(&mut state, raw);
        Ok(())
    }

    pub(crate) fn bind(&self, context: &CurrentContext) -> Result<()> {
        self.check_group(context)?;
        let mut state = self.state.lock().unwrap();
        let raw = state.raw.ok_or(Error::Disposed)?;
        self.api.bind(self.kind, raw);
        state.bound = true;
        Ok(())
    }

    pub(crate) fn unbind(&self, context: &CurrentContext) -> Result<()> {
        self.check_group(context)?;
        let mut state = self.state.lock().unwrap();
        if state.raw.is_none() {
            return Err(Error::Disposed);
        }
        if state.bound {
            self.api.unbind(self.kind);
            state.bound = false;
        }
        Ok(())
    }

    pub(crate) fn is_bound(&self) -> bool {
        self.state.lock().unwrap().bound
    }
}

impl Drop for ResourceCore {
    fn drop(&mut self) {
        // Without a current context there is no valid way to release the
        // handle here; report the leak instead of issuing a native call.
        let state = self.state.get_mut().unwrap();
        if let Some(raw) = state.raw {
            error!(
                kind = ?self.kind,
                label = self.label.as_str(),
                raw = raw.get(),
                "native object leaked: dropped without disposal"
            );
        }
    }
}
