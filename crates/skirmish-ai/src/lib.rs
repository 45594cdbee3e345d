//! Actor behavior for SKIRMISH.
//!
//! Implements the deferred-transition state machine, the vision probe,
//! and the two controllers built on them: the enemy combat agent and the
//! player locomotion controller. Environmental queries come in through the
//! collaborator traits in [`services`]; nothing here owns a world.

pub mod combat;
pub mod fsm;
pub mod health;
pub mod locomotion;
pub mod perception;
pub mod services;
pub mod timer;

pub use skirmish_core as core;

#[cfg(test)]
mod tests;
