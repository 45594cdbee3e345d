//! Player locomotion: Idle/Jump machine, mouse-look and planar movement.
//!
//! Only jumping is state-gated. Look and movement run every tick whatever
//! the state. Ground contact is probed fresh every logic tick.

use glam::Vec3;

use skirmish_core::config::LocomotionConfig;
use skirmish_core::constants::CONTACT_DAMAGE;
use skirmish_core::enums::{AnimationCue, ContactKind, LocomotionState};
use skirmish_core::events::AgentEvent;
use skirmish_core::types::{look_direction, ActorId, InputSnapshot, Pose};

use crate::fsm::{DeferredStateMachine, StateHooks};
use crate::health::{DamageOutcome, HealthTrack};
use crate::services::{MatchProgressSink, PhysicsQuery, VelocitySink};

/// Everything the controller reads and writes during one logic tick.
pub struct LocomotionContext<'a> {
    pub dt: f32,
    pub input: &'a InputSnapshot,
    pub physics: &'a dyn PhysicsQuery,
    pub body: &'a mut dyn VelocitySink,
    pub events: &'a mut Vec<AgentEvent>,
}

/// Transition table for the locomotion machine.
pub fn next_state(
    current: LocomotionState,
    grounded: bool,
    input: &InputSnapshot,
    jumps_used: u32,
    max_jumps: u32,
) -> Option<LocomotionState> {
    match current {
        LocomotionState::Idle => (grounded && input.jump_held).then_some(LocomotionState::Jump),
        LocomotionState::Jump => {
            if !grounded && jumps_used < max_jumps && input.jump_pressed {
                Some(LocomotionState::Jump)
            } else if grounded {
                Some(LocomotionState::Idle)
            } else {
                None
            }
        }
    }
}

struct LocomotionHooks<'b, 'a> {
    id: ActorId,
    jump_amount: f32,
    jumps_used: &'b mut u32,
    ctx: &'b mut LocomotionContext<'a>,
}

impl StateHooks<LocomotionState> for LocomotionHooks<'_, '_> {
    fn on_enter(&mut self, state: LocomotionState) {
        match state {
            LocomotionState::Idle => {}
            LocomotionState::Jump => {
                // Overwrite, so repeated jumps never stack.
                let mut velocity = self.ctx.body.velocity();
                velocity.y = self.jump_amount;
                self.ctx.body.set_velocity(velocity);
                *self.jumps_used += 1;
                log::debug!("player {:?} jump {}", self.id, *self.jumps_used);
                self.ctx.events.push(AgentEvent::Animation {
                    actor: self.id,
                    cue: AnimationCue::Jump,
                });
            }
        }
    }

    fn on_update(&mut self, _state: LocomotionState) {}
}

/// Player-driven actor controller.
#[derive(Debug)]
pub struct LocomotionController {
    id: ActorId,
    config: LocomotionConfig,
    machine: DeferredStateMachine<LocomotionState>,
    grounded: bool,
    jumps_used: u32,
    pitch_degrees: f32,
    health: HealthTrack,
}

impl LocomotionController {
    pub fn new(id: ActorId, config: LocomotionConfig) -> Self {
        let health = HealthTrack::new(config.max_health);
        Self {
            id,
            config,
            machine: DeferredStateMachine::new(LocomotionState::Idle),
            grounded: false,
            jumps_used: 0,
            pitch_degrees: 0.0,
            health,
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn state(&self) -> Option<LocomotionState> {
        self.machine.current()
    }

    pub fn pending(&self) -> Option<LocomotionState> {
        self.machine.pending()
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Ground contact as of the last logic tick.
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Jumps taken since last touching ground.
    pub fn jumps_used(&self) -> u32 {
        self.jumps_used
    }

    /// Camera pivot pitch in degrees (positive looks down).
    pub fn pitch_degrees(&self) -> f32 {
        self.pitch_degrees
    }

    pub fn health(&self) -> &HealthTrack {
        &self.health
    }

    /// Camera view direction for the given body pose.
    pub fn view_direction(&self, pose: &Pose) -> Vec3 {
        look_direction(pose.yaw_degrees, self.pitch_degrees)
    }

    /// Apply mouse deltas: yaw turns the body, pitch tilts the camera pivot
    /// within the configured limit.
    pub fn look(&mut self, pose: &mut Pose, input: &InputSnapshot, dt: f32) {
        let scale = self.config.mouse_sensitivity * dt;
        pose.rotate_yaw(input.mouse_delta.x * scale);
        let limit = self.config.max_look_angle;
        self.pitch_degrees =
            (self.pitch_degrees - input.mouse_delta.y * scale).clamp(-limit, limit);
    }

    /// Planar velocity requested by the movement keys, relative to `pose`.
    pub fn movement_velocity(&self, pose: &Pose, input: &InputSnapshot) -> Vec3 {
        let forward = pose.forward();
        let right = pose.right();
        let mut direction = Vec3::ZERO;
        if input.move_forward {
            direction += forward;
        }
        if input.move_left {
            direction -= right;
        }
        if input.move_back {
            direction -= forward;
        }
        if input.move_right {
            direction += right;
        }

        let mut speed = self.config.move_speed;
        if input.run && input.move_forward {
            speed *= self.config.run_multiplier;
        }
        direction.normalize_or_zero() * speed
    }

    /// Fixed-rate phase: translate the body along the input direction.
    pub fn fixed_update(&self, pose: &mut Pose, input: &InputSnapshot, dt: f32) {
        pose.position += self.movement_velocity(pose, input) * dt;
    }

    /// Center of the ground probe sphere for a collider centered at `center`.
    pub fn ground_probe_origin(&self, center: Vec3) -> Vec3 {
        let drop = (self.config.collider_height - 1.0) / 2.0 + self.config.ground_probe_skin;
        Vec3::new(center.x, center.y - drop, center.z)
    }

    /// Logic phase: look, probe the ground, then evaluate and apply at most
    /// one jump transition. Returns the state entered this tick, if any.
    pub fn tick(
        &mut self,
        pose: &mut Pose,
        ctx: &mut LocomotionContext<'_>,
    ) -> Option<LocomotionState> {
        self.look(pose, ctx.input, ctx.dt);

        self.grounded = ctx.physics.check_sphere_overlap(
            self.ground_probe_origin(pose.position),
            self.config.ground_probe_radius,
            self.config.ground_layer_mask,
        );
        if self.grounded {
            self.jumps_used = 0;
        }

        if !self.machine.has_pending() {
            if let Some(current) = self.machine.current() {
                if let Some(next) = next_state(
                    current,
                    self.grounded,
                    ctx.input,
                    self.jumps_used,
                    self.config.max_jumps,
                ) {
                    self.machine.request_transition(next);
                }
            }
        }

        let mut hooks = LocomotionHooks {
            id: self.id,
            jump_amount: self.config.jump_amount,
            jumps_used: &mut self.jumps_used,
            ctx,
        };
        self.machine.tick(&mut hooks)
    }

    /// Collision callback. Enemy bodies deal one point of damage.
    pub fn on_contact(
        &mut self,
        kind: ContactKind,
        sink: &mut dyn MatchProgressSink,
        events: &mut Vec<AgentEvent>,
    ) -> Option<DamageOutcome> {
        match kind {
            ContactKind::Enemy => Some(self.apply_damage(CONTACT_DAMAGE, sink, events)),
            ContactKind::Projectile | ContactKind::Player | ContactKind::Obstacle => None,
        }
    }

    /// Apply damage. Reaching zero signals game over to `sink` exactly once.
    pub fn apply_damage(
        &mut self,
        amount: u32,
        sink: &mut dyn MatchProgressSink,
        events: &mut Vec<AgentEvent>,
    ) -> DamageOutcome {
        let outcome = self.health.apply_damage(amount);
        match outcome {
            DamageOutcome::Absorbed { remaining } => {
                log::info!("player hit, {remaining} health left");
                events.push(AgentEvent::Damaged {
                    actor: self.id,
                    health: remaining,
                });
            }
            DamageOutcome::Defeated => {
                log::info!("player down");
                events.push(AgentEvent::PlayerDown { actor: self.id });
                sink.on_player_game_over();
            }
            DamageOutcome::AlreadyDefeated => {}
        }
        outcome
    }
}
