//! Core types and definitions for the SKIRMISH actor simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! poses, input snapshots, state enums, events, constants and configuration.
//! It has no dependency on an ECS or any runtime framework.

pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod types;
