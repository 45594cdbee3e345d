//! Simulation engine.
//!
//! `SimulationEngine` owns the hecs world, the arena and the match, feeds the
//! player's input through every system once per tick, and produces
//! `WorldSnapshot`s. Seeded from a single u64, so identical seeds and inputs
//! replay identically.

use glam::Vec3;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use skirmish_core::config::{ConfigError, GameConfig};
use skirmish_core::constants::DT;
use skirmish_core::events::AgentEvent;
use skirmish_core::types::{InputSnapshot, Pose, SimTime};

use crate::arena::Arena;
use crate::match_tracker::MatchTracker;
use crate::physics::BodySphere;
use crate::snapshot::WorldSnapshot;
use crate::systems;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Seconds per tick.
    pub dt: f32,
    pub game: GameConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            dt: DT,
            game: GameConfig::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all match state.
pub struct SimulationEngine {
    world: World,
    arena: Arena,
    game: GameConfig,
    dt: f32,
    time: SimTime,
    rng: ChaCha8Rng,
    tracker: MatchTracker,
    player: Option<Entity>,
    despawn_buffer: Vec<Entity>,
    bodies: Vec<BodySphere>,
    events: Vec<AgentEvent>,
}

impl SimulationEngine {
    /// Create an engine over `arena`. Fails if the game configuration is
    /// invalid.
    pub fn new(config: SimConfig, arena: Arena) -> Result<Self, ConfigError> {
        config.game.validate()?;
        if !(config.dt > 0.0) {
            return Err(ConfigError::Invalid {
                field: "dt",
                reason: "must be greater than zero",
            });
        }
        let tracker = MatchTracker::new(&config.game.match_rules);
        Ok(Self {
            world: World::new(),
            arena,
            game: config.game,
            dt: config.dt,
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            tracker,
            player: None,
            despawn_buffer: Vec::new(),
            bodies: Vec::new(),
            events: Vec::new(),
        })
    }

    /// Place the player with its feet at `feet`. Only one player is kept; a
    /// second call replaces the first.
    pub fn spawn_player(&mut self, feet: Vec3, yaw_degrees: f32) -> Entity {
        if let Some(previous) = self.player.take() {
            let _ = self.world.despawn(previous);
        }
        let entity = world_setup::spawn_player(&mut self.world, &self.game, feet, yaw_degrees);
        self.player = Some(entity);
        entity
    }

    /// Place one enemy on the floor at `pose`.
    pub fn spawn_enemy(&mut self, pose: Pose) -> Entity {
        let pose = Pose::new(self.arena.clamp_to_walkable(pose.position), pose.yaw_degrees);
        world_setup::spawn_enemy(&mut self.world, &self.game, &mut self.tracker, pose)
    }

    /// Scatter `count` enemies at seeded random spots away from the player.
    pub fn populate(&mut self, count: usize) -> Vec<Entity> {
        let avoid = self
            .player
            .and_then(|p| self.world.get::<&Pose>(p).ok().map(|pose| pose.position))
            .unwrap_or(Vec3::ZERO);
        world_setup::scatter_enemies(
            &mut self.world,
            &mut self.rng,
            &self.arena,
            &self.game,
            &mut self.tracker,
            count,
            avoid,
        )
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    /// Once the match has an outcome the world is frozen.
    pub fn tick(&mut self, input: &InputSnapshot) -> WorldSnapshot {
        if !self.tracker.is_over() {
            self.run_systems(input);
            self.tracker.advance(self.dt);
            self.time.advance(self.dt);
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(&self.world, &self.time, &self.tracker, events)
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn tracker(&self) -> &MatchTracker {
        &self.tracker
    }

    pub fn is_over(&self) -> bool {
        self.tracker.is_over()
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn config(&self) -> &GameConfig {
        &self.game
    }

    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get a mutable reference to the ECS world (for tests and tooling).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Run all systems in order.
    fn run_systems(&mut self, input: &InputSnapshot) {
        let dt = self.dt;
        // 1. Player movement, gravity and locomotion logic
        systems::player::run(&mut self.world, &self.arena, input, dt, &mut self.events);
        // 2. Projectiles: fire, fly, hit
        systems::projectiles::run(
            &mut self.world,
            &self.arena,
            &self.game.projectile,
            input,
            dt,
            &mut self.tracker,
            &mut self.events,
        );
        // 3. Enemy combat AI
        systems::combat_ai::run(
            &mut self.world,
            &self.arena,
            &mut self.rng,
            &mut self.bodies,
            dt,
            &mut self.events,
        );
        // 4. Navigation movement
        systems::navigation::run(&mut self.world, &self.arena, dt);
        // 5. Enemy-player contact damage
        systems::contact::run(&mut self.world, &mut self.tracker, &mut self.events);
        // 6. Cleanup (defeated, spent)
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }
}
