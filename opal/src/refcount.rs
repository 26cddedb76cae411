//! The reference-counted disposal protocol.
//!
//! Every shared resource owns a [`RefCount`]: a count of the parties
//! currently *interested* in it. The count models interest, not ownership
//! fan-out; the native handle stays exclusively owned by one resource
//! object. A resource starts at zero so "create, use once, release" works
//! without a matching increment, and the first decrement that finds the
//! count at zero disposes it.
//!
//! One mutex covers read, mutate and dispose as a single atomic unit, so
//! two threads can never both observe a count of one and race each other
//! to zero, and disposal fires exactly once. The release closure runs
//! inside the critical section and may veto the transition, so a
//! resource whose release fails stays alive. Disposal happens-before the
//! triggering `dec` returns.

use crate::error::{Error, Result};
use std::sync::Mutex;

struct RefState {
    count: u32,
    disposed: bool,
}

/// A per-resource reference count with disposal-on-zero semantics.
pub struct RefCount {
    state: Mutex<RefState>,
}

impl RefCount {
    /// A fresh count: zero references, not disposed.
    pub fn new() -> RefCount {
        RefCount {
            state: Mutex::new(RefState {
                count: 0,
                disposed: false,
            }),
        }
    }

    /// Current number of interested parties.
    pub fn count(&self) -> u32 {
        self.state.lock().unwrap().count
    }

    /// Whether disposal has already fired.
    pub fn is_disposed(&self) -> bool {
        self.state.lock().unwrap().disposed
    }

    /// Registers interest, extending the resource's lifetime. Returns the
    /// new count. Incrementing a disposed resource is a usage error.
    pub fn inc(&self) -> Result<u32> {
        let mut state = self.state.lock().unwrap();
        if state.disposed {
            return Err(Error::Disposed);
        }
        state.count += 1;
        Ok(state.count)
    }

    /// Releases interest. Decrements the count if it is above zero; if the
    /// result is zero and the resource is not yet disposed, runs `release`
    /// inside the critical section and returns `Ok(true)` on success. A
    /// failing `release` vetoes the transition: the decrement is undone,
    /// the resource stays alive and the error propagates. Decrementing an
    /// already-disposed resource is a tolerated no-op.
    ///
    /// `release` runs with the count lock held, so any state it checks
    /// and tears down cannot change between the check and the transition.
    pub fn dec(&self, release: impl FnOnce() -> Result<()>) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        if state.disposed {
            return Ok(false);
        }
        let decremented = state.count > 0;
        if decremented {
            state.count -= 1;
        }
        if state.count > 0 {
            return Ok(false);
        }
        match release() {
            Ok(()) => {
                state.disposed = true;
                Ok(true)
            }
            Err(err) => {
                if decremented {
                    state.count += 1;
                }
                Err(err)
            }
        }
    }

    /// Explicit disposal. Fails with [`Error::StillReferenced`] while
    /// interest remains and with [`Error::Disposed`] once disposed;
    /// otherwise runs `release` inside the critical section. As with
    /// [`dec`](RefCount::dec), a failing `release` leaves the resource
    /// alive.
    pub fn dispose(&self, release: impl FnOnce() -> Result<()>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.disposed {
            return Err(Error::Disposed);
        }
        if state.count > 0 {
            return Err(Error::StillReferenced(state.count));
        }
        release()?;
        state.disposed = true;
        Ok(())
    }
}

impl Default for RefCount {
    fn default() -> Self {
        RefCount::new()
    }
}
