//! Single-slot cancellable delayed callback.
//!
//! The callback is represented by a value of type `A` handed back to the
//! owner when the delay elapses; the owner performs the action with full
//! access to its own state. Arming replaces whatever was armed before, so a
//! stale callback can never fire into a later arming.

/// Float slack so that `n` ticks of `delay / n` seconds fire on tick `n`.
const EXPIRY_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone)]
struct Armed<A> {
    remaining: f32,
    action: A,
}

/// Owned, single-shot timer holding at most one outstanding callback.
#[derive(Debug, Clone)]
pub struct TimedCallback<A> {
    armed: Option<Armed<A>>,
}

impl<A> Default for TimedCallback<A> {
    fn default() -> Self {
        Self { armed: None }
    }
}

impl<A> TimedCallback<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire after `delay` seconds, cancelling any
    /// callback that was still outstanding.
    pub fn arm(&mut self, delay: f32, action: A) {
        if let Some(previous) = self.armed.replace(Armed {
            remaining: delay,
            action,
        }) {
            log::trace!("re-armed timer with {:.3}s left on the old one", previous.remaining);
        }
    }

    /// Drop the outstanding callback. Returns whether one was armed.
    pub fn cancel(&mut self) -> bool {
        self.armed.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Seconds left on the outstanding callback.
    pub fn remaining(&self) -> Option<f32> {
        self.armed.as_ref().map(|armed| armed.remaining)
    }

    /// Count down by `dt` and hand back the action once the delay has elapsed.
    pub fn advance(&mut self, dt: f32) -> Option<A> {
        let armed = self.armed.as_mut()?;
        armed.remaining -= dt;
        if armed.remaining > EXPIRY_EPSILON {
            return None;
        }
        self.armed.take().map(|armed| armed.action)
    }
}
