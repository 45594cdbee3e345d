//! Deferred-transition finite state machine.
//!
//! Transitions are requested while a tick evaluates its conditions and are
//! applied at a single point inside [`DeferredStateMachine::tick`]. Only the
//! first request per tick is kept, and the update hook always runs against a
//! state whose enter hook has already completed.

use std::fmt::Debug;

/// Per-state behavior driven by the machine. Implementations dispatch on
/// the state enum with an exhaustive `match`.
pub trait StateHooks<S> {
    /// Called on the state being left, before the new one is entered.
    fn on_exit(&mut self, _state: S) {}

    /// Called once each time a state becomes current (re-entry included).
    fn on_enter(&mut self, state: S);

    /// Called every tick for the settled current state.
    fn on_update(&mut self, state: S);
}

/// Current state plus at most one pending transition.
///
/// A fresh machine has no current state and `initial` pending, so the first
/// tick always runs the initial state's enter hook.
#[derive(Debug, Clone)]
pub struct DeferredStateMachine<S> {
    current: Option<S>,
    pending: Option<S>,
}

impl<S: Copy + Debug> DeferredStateMachine<S> {
    pub fn new(initial: S) -> Self {
        Self {
            current: None,
            pending: Some(initial),
        }
    }

    /// The resident state, `None` only before the first tick.
    pub fn current(&self) -> Option<S> {
        self.current
    }

    pub fn pending(&self) -> Option<S> {
        self.pending
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Queue a transition for the next [`tick`](Self::tick). Returns false and
    /// leaves the queued transition untouched if one is already pending.
    pub fn request_transition(&mut self, target: S) -> bool {
        if let Some(existing) = self.pending {
            log::trace!("ignoring transition to {target:?}, {existing:?} already pending");
            return false;
        }
        self.pending = Some(target);
        true
    }

    /// Apply the pending transition (exit, swap, enter), then run the update
    /// hook. Returns the state entered this tick, if any. `pending` is always
    /// empty when this returns.
    pub fn tick<H: StateHooks<S>>(&mut self, hooks: &mut H) -> Option<S> {
        let entered = self.pending.take().map(|next| {
            if let Some(previous) = self.current {
                hooks.on_exit(previous);
            }
            log::trace!("transition {:?} -> {next:?}", self.current);
            self.current = Some(next);
            hooks.on_enter(next);
            next
        });

        if let Some(state) = self.current {
            hooks.on_update(state);
        }

        entered
    }
}
