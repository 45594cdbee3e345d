//! Events emitted by agents for animation, UI and audio feedback.

use serde::{Deserialize, Serialize};

use crate::enums::AnimationCue;
use crate::types::ActorId;

/// Discrete notifications produced during a tick. Consumers never feed
/// these back into the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AgentEvent {
    /// An actor entered a state and wants the matching animation played.
    Animation { actor: ActorId, cue: AnimationCue },
    /// An actor lost health but is still alive.
    Damaged { actor: ActorId, health: u32 },
    /// An enemy agent reached zero health.
    Defeated { actor: ActorId },
    /// The player reached zero health.
    PlayerDown { actor: ActorId },
}
