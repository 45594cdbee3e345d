//! Match progress: enemy tally, time limit and final outcome.
//!
//! Once an outcome is decided every further notification is ignored.

use serde::{Deserialize, Serialize};

use skirmish_ai::services::MatchProgressSink;
use skirmish_core::config::MatchConfig;
use skirmish_core::enums::{DefeatReason, MatchOutcome};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchTracker {
    total_enemies: u32,
    defeated_enemies: u32,
    time_remaining: f32,
    outcome: Option<MatchOutcome>,
}

impl MatchTracker {
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            total_enemies: 0,
            defeated_enemies: 0,
            time_remaining: config.duration,
            outcome: None,
        }
    }

    /// Count a newly spawned enemy toward the victory condition.
    pub fn register_enemy(&mut self) {
        self.total_enemies += 1;
    }

    pub fn total_enemies(&self) -> u32 {
        self.total_enemies
    }

    pub fn defeated_enemies(&self) -> u32 {
        self.defeated_enemies
    }

    pub fn remaining_enemies(&self) -> u32 {
        self.total_enemies.saturating_sub(self.defeated_enemies)
    }

    pub fn time_remaining(&self) -> f32 {
        self.time_remaining
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Run the match clock. Reaching zero loses the match.
    pub fn advance(&mut self, dt: f32) {
        if self.is_over() {
            return;
        }
        self.time_remaining = (self.time_remaining - dt).max(0.0);
        if self.time_remaining <= 0.0 {
            self.finish(MatchOutcome::Defeat(DefeatReason::TimeExpired));
        }
    }

    fn finish(&mut self, outcome: MatchOutcome) {
        if self.outcome.is_none() {
            log::info!(
                "match over: {outcome:?} ({}/{} enemies, {:.1}s left)",
                self.defeated_enemies,
                self.total_enemies,
                self.time_remaining
            );
            self.outcome = Some(outcome);
        }
    }
}

impl MatchProgressSink for MatchTracker {
    fn on_agent_defeated(&mut self) {
        if self.is_over() {
            return;
        }
        self.defeated_enemies += 1;
        if self.defeated_enemies >= self.total_enemies {
            self.finish(MatchOutcome::Victory);
        }
    }

    fn on_player_game_over(&mut self) {
        self.finish(MatchOutcome::Defeat(DefeatReason::PlayerDown));
    }
}
