//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Resident state of a combat agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatState {
    /// Standing still, waiting for the first evaluation.
    Idle,
    /// Roaming random points around the spawn anchor.
    Wander,
    /// Re-pathing toward the target every tick.
    Chase,
    /// Short high-speed lunge at the target; ends only on its timer.
    Dash,
}

/// Resident state of a locomotion controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocomotionState {
    Idle,
    Jump,
}

/// Fire-and-forget animation trigger sent to the animation driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationCue {
    Idle,
    Walk,
    Attack,
    Dash,
    Jump,
}

/// What an actor touched, as reported by a collision callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactKind {
    /// A player-fired projectile.
    Projectile,
    /// An enemy body.
    Enemy,
    /// The player body.
    Player,
    /// Static level geometry.
    Obstacle,
}

/// Why the match was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefeatReason {
    PlayerDown,
    TimeExpired,
}

/// Final result of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Victory,
    Defeat(DefeatReason),
}
