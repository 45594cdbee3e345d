//! Headless reference host for SKIRMISH.
//!
//! Owns the hecs world, implements the navigation and physics collaborators
//! over a static arena, tracks match progress, and runs all systems once per
//! tick, producing serializable snapshots.

pub mod arena;
pub mod components;
pub mod engine;
pub mod match_tracker;
pub mod physics;
pub mod snapshot;
pub mod systems;
pub mod world_setup;

pub use engine::SimulationEngine;
pub use skirmish_core as core;
