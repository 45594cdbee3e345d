//! Serializable per-tick view of the world.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use skirmish_core::enums::{CombatState, LocomotionState, MatchOutcome};
use skirmish_core::events::AgentEvent;
use skirmish_core::types::{ActorId, SimTime};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub time: SimTime,
    pub player: Option<PlayerView>,
    /// Sorted by id.
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    #[serde(rename = "match")]
    pub match_state: MatchView,
    /// Events produced during this tick, in emission order.
    pub events: Vec<AgentEvent>,
}

impl WorldSnapshot {
    /// Serialize for a front end or a replay log.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: ActorId,
    pub position: Vec3,
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    pub velocity: Vec3,
    pub state: Option<LocomotionState>,
    pub grounded: bool,
    pub jumps_used: u32,
    pub health: u32,
    pub max_health: u32,
    /// Health bar fill, in [0, 1].
    pub health_fraction: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: ActorId,
    pub position: Vec3,
    pub yaw_degrees: f32,
    pub state: Option<CombatState>,
    pub health: u32,
    pub max_health: u32,
    pub health_fraction: f32,
    pub destination: Option<Vec3>,
    pub dash_remaining: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: Vec3,
    pub velocity: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchView {
    pub total_enemies: u32,
    pub defeated_enemies: u32,
    pub time_remaining: f32,
    pub outcome: Option<MatchOutcome>,
}
