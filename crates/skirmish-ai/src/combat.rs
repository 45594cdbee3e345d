//! Enemy combat agent.
//!
//! Idle → Wander/Chase on first evaluation, Wander ↔ Chase on perception,
//! Chase → Dash inside dash distance, Dash → Chase/Wander when its timer
//! expires. At most one transition is requested per tick and it is applied by
//! the [`DeferredStateMachine`]. Damage arrives outside the tick through
//! [`CombatAgent::apply_damage`] and is applied immediately.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::{Rng, RngCore};

use skirmish_core::config::CombatConfig;
use skirmish_core::constants::CONTACT_DAMAGE;
use skirmish_core::enums::{AnimationCue, CombatState, ContactKind};
use skirmish_core::events::AgentEvent;
use skirmish_core::types::{ActorId, Pose, TargetView};

use crate::fsm::{DeferredStateMachine, StateHooks};
use crate::health::{DamageOutcome, HealthTrack};
use crate::perception::VisionProbe;
use crate::services::{MatchProgressSink, NavMesh, NavigationAgent, PhysicsQuery};
use crate::timer::TimedCallback;

/// Everything an agent reads from the world during one logic tick.
pub struct CombatContext<'a> {
    /// Seconds since the previous logic tick.
    pub dt: f32,
    /// The agent's pose this tick (owned by the host transform).
    pub pose: &'a Pose,
    /// The tracked target, if it exists.
    pub target: Option<TargetView>,
    pub nav_mesh: &'a dyn NavMesh,
    pub physics: &'a dyn PhysicsQuery,
    pub rng: &'a mut dyn RngCore,
    pub events: &'a mut Vec<AgentEvent>,
}

/// What the agent knows about its target when choosing a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub visible: bool,
    /// Distance to the target, `None` without a target.
    pub distance: Option<f32>,
}

/// Transition table. Returns the state to request from `current`, if any.
/// Dash never leaves through here; only its timer ends it.
pub fn next_state(
    current: CombatState,
    observation: &Observation,
    config: &CombatConfig,
) -> Option<CombatState> {
    match current {
        CombatState::Idle => Some(if observation.visible {
            CombatState::Chase
        } else {
            CombatState::Wander
        }),
        CombatState::Wander => observation.visible.then_some(CombatState::Chase),
        CombatState::Chase => {
            let distance = observation.distance?;
            if distance <= config.dash_distance {
                Some(CombatState::Dash)
            } else if !observation.visible {
                Some(CombatState::Wander)
            } else {
                None
            }
        }
        CombatState::Dash => None,
    }
}

/// Marker carried by the dash timer.
#[derive(Debug, Clone, Copy)]
struct DashExpired;

/// Result of a collision notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactResponse {
    /// The other object should be removed by the host.
    pub consume_other: bool,
    /// Damage result, `None` if the contact was harmless.
    pub damage: Option<DamageOutcome>,
}

/// Agent state apart from the machine itself, so hooks can borrow it while
/// the machine is ticking.
#[derive(Debug)]
struct CombatBody<N> {
    id: ActorId,
    config: CombatConfig,
    vision: VisionProbe,
    nav: N,
    wander_anchor: Vec3,
    wander_countdown: f32,
    dash_timer: TimedCallback<DashExpired>,
    health: HealthTrack,
}

impl<N: NavigationAgent> CombatBody<N> {
    fn observe(&self, ctx: &CombatContext<'_>) -> Observation {
        match ctx.target {
            Some(target) => Observation {
                visible: self.vision.can_see(ctx.pose, &target, ctx.physics),
                distance: Some(ctx.pose.distance_to(target.position)),
            },
            None => Observation {
                visible: false,
                distance: None,
            },
        }
    }

    fn cue(&self, ctx: &mut CombatContext<'_>, cue: AnimationCue) {
        ctx.events.push(AgentEvent::Animation { actor: self.id, cue });
    }

    /// Send the agent to a random walkable point around its anchor. If the
    /// point cannot be projected onto walkable ground the agent stays put.
    fn pick_wander_point(&mut self, ctx: &mut CombatContext<'_>) {
        let offset = random_in_disk(&mut *ctx.rng, self.config.wander_radius);
        let candidate = self.wander_anchor + Vec3::new(offset.x, 0.0, offset.y);
        let destination = match ctx
            .nav_mesh
            .project_to_navigable(candidate, self.config.nav_projection_radius)
        {
            Some(point) => point,
            None => {
                log::warn!(
                    "agent {:?}: wander point {candidate} off navmesh, holding position",
                    self.id
                );
                ctx.pose.position
            }
        };
        self.nav.set_destination(destination);
    }

    fn update_wander(&mut self, ctx: &mut CombatContext<'_>) {
        self.wander_countdown -= ctx.dt;
        if self.nav.remaining_distance() < self.config.wander_arrival_distance
            || self.wander_countdown <= 0.0
        {
            self.pick_wander_point(ctx);
            self.wander_countdown = self.config.wander_interval;
        }
    }
}

struct CombatHooks<'b, 'a, N> {
    body: &'b mut CombatBody<N>,
    ctx: &'b mut CombatContext<'a>,
}

impl<N: NavigationAgent> StateHooks<CombatState> for CombatHooks<'_, '_, N> {
    fn on_enter(&mut self, state: CombatState) {
        let body = &mut *self.body;
        let ctx = &mut *self.ctx;
        log::debug!("agent {:?} entered {state:?}", body.id);

        match state {
            CombatState::Idle => {
                body.cue(ctx, AnimationCue::Idle);
                body.nav.reset_path();
            }
            CombatState::Wander => {
                body.cue(ctx, AnimationCue::Walk);
                body.nav.set_speed(body.config.wander_speed);
                body.pick_wander_point(ctx);
                body.wander_countdown = body.config.wander_interval;
            }
            CombatState::Chase => {
                body.cue(ctx, AnimationCue::Attack);
                body.nav.set_speed(body.config.chase_speed);
            }
            CombatState::Dash => {
                body.cue(ctx, AnimationCue::Dash);
                body.nav.set_speed(body.config.dash_speed());
                // Destination is captured once; the dash does not steer.
                if let Some(target) = ctx.target {
                    body.nav.set_destination(target.position);
                }
                body.dash_timer.arm(body.config.dash_duration, DashExpired);
            }
        }
    }

    fn on_update(&mut self, state: CombatState) {
        match state {
            CombatState::Wander => self.body.update_wander(self.ctx),
            CombatState::Chase => {
                if let Some(target) = self.ctx.target {
                    self.body.nav.set_destination(target.position);
                }
            }
            CombatState::Idle | CombatState::Dash => {}
        }
    }
}

/// An enemy driven by perception, navigation and a dash timer.
#[derive(Debug)]
pub struct CombatAgent<N> {
    machine: DeferredStateMachine<CombatState>,
    body: CombatBody<N>,
}

impl<N: NavigationAgent> CombatAgent<N> {
    /// Create an agent at `spawn`. The spawn position becomes the fixed
    /// wander anchor and the first tick enters Idle.
    pub fn new(id: ActorId, config: CombatConfig, spawn: &Pose, nav: N) -> Self {
        let vision = VisionProbe::from_config(&config);
        let health = HealthTrack::new(config.max_health);
        let wander_countdown = config.wander_interval;
        Self {
            machine: DeferredStateMachine::new(CombatState::Idle),
            body: CombatBody {
                id,
                config,
                vision,
                nav,
                wander_anchor: spawn.position,
                wander_countdown,
                dash_timer: TimedCallback::new(),
                health,
            },
        }
    }

    pub fn id(&self) -> ActorId {
        self.body.id
    }

    /// Resident state, `None` before the first tick.
    pub fn state(&self) -> Option<CombatState> {
        self.machine.current()
    }

    pub fn pending(&self) -> Option<CombatState> {
        self.machine.pending()
    }

    pub fn config(&self) -> &CombatConfig {
        &self.body.config
    }

    pub fn health(&self) -> &HealthTrack {
        &self.body.health
    }

    pub fn is_defeated(&self) -> bool {
        self.body.health.is_defeated()
    }

    pub fn navigation(&self) -> &N {
        &self.body.nav
    }

    pub fn navigation_mut(&mut self) -> &mut N {
        &mut self.body.nav
    }

    pub fn wander_anchor(&self) -> Vec3 {
        self.body.wander_anchor
    }

    pub fn wander_countdown(&self) -> f32 {
        self.body.wander_countdown
    }

    /// Seconds left before the current dash ends, if one is running.
    pub fn dash_remaining(&self) -> Option<f32> {
        self.body.dash_timer.remaining()
    }

    /// Ask for a transition on the next tick. First request wins.
    pub fn request_transition(&mut self, target: CombatState) -> bool {
        self.machine.request_transition(target)
    }

    /// Run one logic tick. Returns the state entered this tick, if any.
    /// A defeated agent does nothing.
    pub fn tick(&mut self, ctx: &mut CombatContext<'_>) -> Option<CombatState> {
        if self.body.health.is_defeated() {
            return None;
        }

        if self.body.dash_timer.advance(ctx.dt).is_some() {
            if self.machine.current() == Some(CombatState::Dash) {
                let next = if self.body.observe(ctx).visible {
                    CombatState::Chase
                } else {
                    CombatState::Wander
                };
                self.machine.request_transition(next);
            } else {
                log::trace!("agent {:?}: dropping stale dash expiry", self.body.id);
            }
        }

        if !self.machine.has_pending() {
            if let Some(current) = self.machine.current() {
                let observation = self.body.observe(ctx);
                if let Some(next) = next_state(current, &observation, &self.body.config) {
                    self.machine.request_transition(next);
                }
            }
        }

        let mut hooks = CombatHooks {
            body: &mut self.body,
            ctx,
        };
        self.machine.tick(&mut hooks)
    }

    /// Collision callback. Projectiles deal one point of damage and are
    /// consumed; every other contact is ignored.
    pub fn on_contact(
        &mut self,
        kind: ContactKind,
        sink: &mut dyn MatchProgressSink,
        events: &mut Vec<AgentEvent>,
    ) -> ContactResponse {
        match kind {
            ContactKind::Projectile => ContactResponse {
                consume_other: true,
                damage: Some(self.apply_damage(CONTACT_DAMAGE, sink, events)),
            },
            ContactKind::Enemy | ContactKind::Player | ContactKind::Obstacle => ContactResponse {
                consume_other: false,
                damage: None,
            },
        }
    }

    /// Apply damage immediately. The hit that reaches zero health cancels the
    /// dash timer, stops navigation and notifies `sink` once; later hits are
    /// no-ops.
    pub fn apply_damage(
        &mut self,
        amount: u32,
        sink: &mut dyn MatchProgressSink,
        events: &mut Vec<AgentEvent>,
    ) -> DamageOutcome {
        let outcome = self.body.health.apply_damage(amount);
        match outcome {
            DamageOutcome::Absorbed { remaining } => {
                log::debug!("agent {:?} hit, {remaining} health left", self.body.id);
                events.push(AgentEvent::Damaged {
                    actor: self.body.id,
                    health: remaining,
                });
            }
            DamageOutcome::Defeated => {
                log::info!("agent {:?} defeated", self.body.id);
                self.body.dash_timer.cancel();
                self.body.nav.reset_path();
                events.push(AgentEvent::Defeated {
                    actor: self.body.id,
                });
                sink.on_agent_defeated();
            }
            DamageOutcome::AlreadyDefeated => {}
        }
        outcome
    }
}

/// Uniform random point in a disk of `radius` centered on the origin.
fn random_in_disk(rng: &mut dyn RngCore, radius: f32) -> Vec2 {
    let r = radius * rng.gen::<f32>().sqrt();
    let theta = rng.gen_range(0.0..TAU);
    Vec2::new(r * theta.cos(), r * theta.sin())
}
