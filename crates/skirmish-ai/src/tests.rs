#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{Vec2, Vec3};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    use skirmish_core::config::{CombatConfig, LocomotionConfig};
    use skirmish_core::enums::{AnimationCue, CombatState, ContactKind, LocomotionState};
    use skirmish_core::events::AgentEvent;
    use skirmish_core::types::{ActorId, InputSnapshot, Pose, TargetView};

    use crate::combat::{next_state, CombatAgent, CombatContext, Observation};
    use crate::fsm::{DeferredStateMachine, StateHooks};
    use crate::health::{DamageOutcome, HealthTrack};
    use crate::locomotion::{LocomotionContext, LocomotionController};
    use crate::perception::VisionProbe;
    use crate::services::*;
    use crate::timer::TimedCallback;

    const AGENT: ActorId = ActorId(1);
    const PLAYER: ActorId = ActorId(2);
    const DT: f32 = 0.1;

    // ---- Fakes ----

    #[derive(Debug)]
    struct FakeNav {
        destination: Option<Vec3>,
        speed: f32,
        remaining: f32,
        resets: u32,
        destinations_set: u32,
    }

    impl Default for FakeNav {
        fn default() -> Self {
            Self {
                destination: None,
                speed: 0.0,
                remaining: 100.0,
                resets: 0,
                destinations_set: 0,
            }
        }
    }

    impl NavigationAgent for FakeNav {
        fn set_destination(&mut self, point: Vec3) {
            self.destination = Some(point);
            self.destinations_set += 1;
        }
        fn reset_path(&mut self) {
            self.destination = None;
            self.resets += 1;
        }
        fn remaining_distance(&self) -> f32 {
            self.remaining
        }
        fn set_speed(&mut self, speed: f32) {
            self.speed = speed;
        }
    }

    struct FakeNavMesh {
        walkable: bool,
    }

    impl NavMesh for FakeNavMesh {
        fn project_to_navigable(&self, point: Vec3, _max_distance: f32) -> Option<Vec3> {
            self.walkable.then_some(point)
        }
    }

    struct FakePhysics {
        ray_hit: Option<HitIdentity>,
        grounded: bool,
    }

    impl PhysicsQuery for FakePhysics {
        fn raycast_first_hit(
            &self,
            _origin: Vec3,
            _direction: Vec3,
            _max: f32,
        ) -> Option<HitIdentity> {
            self.ray_hit
        }
        fn check_sphere_overlap(&self, _center: Vec3, _radius: f32, _mask: u32) -> bool {
            self.grounded
        }
    }

    #[derive(Default)]
    struct FakeSink {
        defeated: u32,
        game_over: u32,
    }

    impl MatchProgressSink for FakeSink {
        fn on_agent_defeated(&mut self) {
            self.defeated += 1;
        }
        fn on_player_game_over(&mut self) {
            self.game_over += 1;
        }
    }

    #[derive(Default)]
    struct FakeBody {
        velocity: Vec3,
    }

    impl VelocitySink for FakeBody {
        fn velocity(&self) -> Vec3 {
            self.velocity
        }
        fn set_velocity(&mut self, velocity: Vec3) {
            self.velocity = velocity;
        }
    }

    /// World seen by a single combat agent standing at the origin facing +Z.
    struct Harness {
        pose: Pose,
        target: Option<TargetView>,
        nav_mesh: FakeNavMesh,
        physics: FakePhysics,
        rng: ChaCha8Rng,
        events: Vec<AgentEvent>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                pose: Pose::new(Vec3::ZERO, 0.0),
                target: None,
                nav_mesh: FakeNavMesh { walkable: true },
                physics: FakePhysics {
                    ray_hit: None,
                    grounded: true,
                },
                rng: ChaCha8Rng::seed_from_u64(7),
                events: Vec::new(),
            }
        }

        /// Place the player straight ahead at `distance`, visible or occluded.
        fn player_ahead(&mut self, distance: f32, visible: bool) {
            self.target = Some(TargetView {
                id: PLAYER,
                position: Vec3::new(0.0, 0.0, distance),
            });
            self.set_visible(visible);
        }

        fn set_visible(&mut self, visible: bool) {
            self.physics.ray_hit = Some(if visible {
                HitIdentity::Actor(PLAYER)
            } else {
                HitIdentity::Static
            });
        }

        fn tick(&mut self, agent: &mut CombatAgent<FakeNav>) -> Option<CombatState> {
            let mut ctx = CombatContext {
                dt: DT,
                pose: &self.pose,
                target: self.target,
                nav_mesh: &self.nav_mesh,
                physics: &self.physics,
                rng: &mut self.rng,
                events: &mut self.events,
            };
            agent.tick(&mut ctx)
        }
    }

    fn make_agent() -> CombatAgent<FakeNav> {
        CombatAgent::new(
            AGENT,
            CombatConfig::default(),
            &Pose::new(Vec3::ZERO, 0.0),
            FakeNav::default(),
        )
    }

    // ---- Deferred state machine ----

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Red,
        Green,
    }

    #[derive(Default)]
    struct Recorder {
        log: Vec<String>,
    }

    impl StateHooks<Light> for Recorder {
        fn on_exit(&mut self, state: Light) {
            self.log.push(format!("exit {state:?}"));
        }
        fn on_enter(&mut self, state: Light) {
            self.log.push(format!("enter {state:?}"));
        }
        fn on_update(&mut self, state: Light) {
            self.log.push(format!("update {state:?}"));
        }
    }

    #[test]
    fn test_fsm_first_tick_enters_initial_state() {
        let mut fsm = DeferredStateMachine::new(Light::Red);
        assert_eq!(fsm.current(), None);
        assert_eq!(fsm.pending(), Some(Light::Red));

        let mut hooks = Recorder::default();
        assert_eq!(fsm.tick(&mut hooks), Some(Light::Red));
        assert_eq!(fsm.current(), Some(Light::Red));
        assert_eq!(fsm.pending(), None);
        assert_eq!(hooks.log, vec!["enter Red", "update Red"]);
    }

    #[test]
    fn test_fsm_second_request_in_same_tick_is_ignored() {
        let mut fsm = DeferredStateMachine::new(Light::Red);
        let mut hooks = Recorder::default();
        fsm.tick(&mut hooks);

        assert!(fsm.request_transition(Light::Green));
        assert!(!fsm.request_transition(Light::Red));
        assert_eq!(fsm.pending(), Some(Light::Green));

        fsm.tick(&mut hooks);
        assert_eq!(fsm.current(), Some(Light::Green));
    }

    #[test]
    fn test_fsm_exit_runs_before_enter_and_update_last() {
        let mut fsm = DeferredStateMachine::new(Light::Red);
        let mut hooks = Recorder::default();
        fsm.tick(&mut hooks);
        hooks.log.clear();

        fsm.request_transition(Light::Green);
        fsm.tick(&mut hooks);
        assert_eq!(hooks.log, vec!["exit Red", "enter Green", "update Green"]);
    }

    #[test]
    fn test_fsm_reentry_runs_exit_and_enter() {
        let mut fsm = DeferredStateMachine::new(Light::Green);
        let mut hooks = Recorder::default();
        fsm.tick(&mut hooks);
        hooks.log.clear();

        fsm.request_transition(Light::Green);
        assert_eq!(fsm.tick(&mut hooks), Some(Light::Green));
        assert_eq!(hooks.log, vec!["exit Green", "enter Green", "update Green"]);
    }

    #[test]
    fn test_fsm_tick_without_request_only_updates() {
        let mut fsm = DeferredStateMachine::new(Light::Red);
        let mut hooks = Recorder::default();
        fsm.tick(&mut hooks);
        hooks.log.clear();

        assert_eq!(fsm.tick(&mut hooks), None);
        assert_eq!(hooks.log, vec!["update Red"]);
    }

    #[test]
    fn test_fsm_pending_always_empty_after_tick() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut fsm = DeferredStateMachine::new(Light::Red);
        let mut hooks = Recorder::default();
        for _ in 0..500 {
            for _ in 0..rng.gen_range(0..3) {
                let target = if rng.gen_bool(0.5) { Light::Red } else { Light::Green };
                fsm.request_transition(target);
            }
            fsm.tick(&mut hooks);
            assert_eq!(fsm.pending(), None);
        }
    }

    // ---- Timed callback ----

    #[test]
    fn test_timer_fires_once_after_delay() {
        let mut timer = TimedCallback::new();
        timer.arm(0.3, "done");
        assert_eq!(timer.advance(0.1), None);
        assert_eq!(timer.advance(0.1), None);
        assert_eq!(timer.advance(0.1), Some("done"));
        assert!(!timer.is_armed());
        assert_eq!(timer.advance(0.1), None);
    }

    #[test]
    fn test_timer_rearm_replaces_previous_callback() {
        let mut timer = TimedCallback::new();
        timer.arm(0.2, 1);
        timer.arm(1.0, 2);
        // The first arming would have fired here
        assert_eq!(timer.advance(0.2), None);
        assert_relative_eq!(timer.remaining().unwrap(), 0.8, epsilon = 1e-5);
        assert_eq!(timer.advance(0.8), Some(2));
    }

    #[test]
    fn test_timer_cancel() {
        let mut timer = TimedCallback::new();
        timer.arm(0.1, ());
        assert!(timer.cancel());
        assert!(!timer.is_armed());
        assert_eq!(timer.advance(1.0), None);
        assert!(!timer.cancel());
    }

    // ---- Health ----

    #[test]
    fn test_health_three_hits_defeat() {
        let mut health = HealthTrack::new(3);
        assert_eq!(health.apply_damage(1), DamageOutcome::Absorbed { remaining: 2 });
        assert_eq!(health.apply_damage(1), DamageOutcome::Absorbed { remaining: 1 });
        assert_eq!(health.apply_damage(1), DamageOutcome::Defeated);
        assert_eq!(health.apply_damage(1), DamageOutcome::AlreadyDefeated);
        assert_eq!(health.current(), 0);
    }

    #[test]
    fn test_health_overkill_clamps_to_zero() {
        let mut health = HealthTrack::new(3);
        assert_eq!(health.apply_damage(10), DamageOutcome::Defeated);
        assert_eq!(health.current(), 0);
        assert!(health.is_defeated());
    }

    #[test]
    fn test_health_fraction() {
        let mut health = HealthTrack::new(4);
        assert_relative_eq!(health.fraction(), 1.0);
        health.apply_damage(1);
        assert_relative_eq!(health.fraction(), 0.75);
    }

    // ---- Perception ----

    fn probe() -> VisionProbe {
        VisionProbe::from_config(&CombatConfig::default())
    }

    #[rstest]
    #[case::straight_ahead(Vec3::new(0.0, 0.0, 5.0), Some(HitIdentity::Actor(PLAYER)), true)]
    #[case::inside_cone_edge(Vec3::new(2.0, 0.0, 5.0), Some(HitIdentity::Actor(PLAYER)), true)]
    #[case::out_of_range(Vec3::new(0.0, 0.0, 10.5), Some(HitIdentity::Actor(PLAYER)), false)]
    #[case::outside_cone(Vec3::new(5.0, 0.0, 5.0), Some(HitIdentity::Actor(PLAYER)), false)]
    #[case::behind(Vec3::new(0.0, 0.0, -3.0), Some(HitIdentity::Actor(PLAYER)), false)]
    #[case::occluded_by_wall(Vec3::new(0.0, 0.0, 5.0), Some(HitIdentity::Static), false)]
    #[case::other_actor_in_the_way(Vec3::new(0.0, 0.0, 5.0), Some(HitIdentity::Actor(ActorId(9))), false)]
    #[case::ray_hits_nothing(Vec3::new(0.0, 0.0, 5.0), None, false)]
    fn test_vision(#[case] target: Vec3, #[case] hit: Option<HitIdentity>, #[case] expected: bool) {
        let physics = FakePhysics {
            ray_hit: hit,
            grounded: false,
        };
        let observer = Pose::new(Vec3::ZERO, 0.0);
        let target = TargetView {
            id: PLAYER,
            position: target,
        };
        assert_eq!(probe().can_see(&observer, &target, &physics), expected);
    }

    #[test]
    fn test_vision_follows_observer_heading() {
        let physics = FakePhysics {
            ray_hit: Some(HitIdentity::Actor(PLAYER)),
            grounded: false,
        };
        let target = TargetView {
            id: PLAYER,
            position: Vec3::new(6.0, 0.0, 0.0),
        };
        assert!(!probe().can_see(&Pose::new(Vec3::ZERO, 0.0), &target, &physics));
        assert!(probe().can_see(&Pose::new(Vec3::ZERO, 90.0), &target, &physics));
    }

    #[test]
    fn test_vision_coincident_target_not_observable() {
        let physics = FakePhysics {
            ray_hit: Some(HitIdentity::Actor(PLAYER)),
            grounded: false,
        };
        let target = TargetView {
            id: PLAYER,
            position: Vec3::ZERO,
        };
        assert!(!probe().can_see(&Pose::default(), &target, &physics));
    }

    // ---- Combat transition table ----

    #[rstest]
    #[case(CombatState::Idle, true, Some(5.0), Some(CombatState::Chase))]
    #[case(CombatState::Idle, false, Some(5.0), Some(CombatState::Wander))]
    #[case(CombatState::Idle, false, None, Some(CombatState::Wander))]
    #[case(CombatState::Wander, true, Some(5.0), Some(CombatState::Chase))]
    #[case(CombatState::Wander, false, Some(5.0), None)]
    #[case(CombatState::Chase, true, None, None)]
    #[case(CombatState::Chase, true, Some(3.0), Some(CombatState::Dash))]
    #[case(CombatState::Chase, false, Some(2.0), Some(CombatState::Dash))]
    #[case(CombatState::Chase, false, Some(6.0), Some(CombatState::Wander))]
    #[case(CombatState::Chase, true, Some(6.0), None)]
    #[case(CombatState::Dash, false, Some(20.0), None)]
    fn test_combat_transition_table(
        #[case] current: CombatState,
        #[case] visible: bool,
        #[case] distance: Option<f32>,
        #[case] expected: Option<CombatState>,
    ) {
        let observation = Observation { visible, distance };
        assert_eq!(
            next_state(current, &observation, &CombatConfig::default()),
            expected
        );
    }

    // ---- Combat agent ----

    #[test]
    fn test_agent_first_tick_enters_idle() {
        let mut agent = make_agent();
        let mut world = Harness::new();
        assert_eq!(agent.state(), None);
        assert_eq!(agent.pending(), Some(CombatState::Idle));

        assert_eq!(world.tick(&mut agent), Some(CombatState::Idle));
        assert_eq!(agent.pending(), None);
        assert_eq!(agent.navigation().resets, 1);
        assert!(world.events.contains(&AgentEvent::Animation {
            actor: AGENT,
            cue: AnimationCue::Idle
        }));
    }

    #[test]
    fn test_idle_agent_spotting_target_chases() {
        let mut agent = make_agent();
        let mut world = Harness::new();
        world.tick(&mut agent);

        world.player_ahead(6.0, true);
        world.tick(&mut agent);
        assert_eq!(agent.state(), Some(CombatState::Chase));
        assert_relative_eq!(agent.navigation().speed, CombatConfig::default().chase_speed);
        // Chase re-paths to the target every tick
        assert_eq!(agent.navigation().destination, Some(Vec3::new(0.0, 0.0, 6.0)));

        world.target = Some(TargetView {
            id: PLAYER,
            position: Vec3::new(0.5, 0.0, 7.0),
        });
        world.tick(&mut agent);
        assert_eq!(agent.navigation().destination, Some(Vec3::new(0.5, 0.0, 7.0)));
    }

    #[test]
    fn test_idle_agent_without_target_wanders_near_anchor() {
        let mut agent = make_agent();
        let mut world = Harness::new();
        world.tick(&mut agent);
        world.tick(&mut agent);

        assert_eq!(agent.state(), Some(CombatState::Wander));
        let config = CombatConfig::default();
        assert_relative_eq!(agent.navigation().speed, config.wander_speed);
        let destination = agent.navigation().destination.unwrap();
        assert!(destination.distance(agent.wander_anchor()) <= config.wander_radius + 1e-4);
        assert_eq!(destination.y, 0.0);
    }

    #[test]
    fn test_wander_projection_failure_holds_position() {
        let mut agent = make_agent();
        let mut world = Harness::new();
        world.nav_mesh.walkable = false;
        world.pose.position = Vec3::new(1.0, 0.0, 2.0);
        world.tick(&mut agent);
        world.tick(&mut agent);

        assert_eq!(agent.state(), Some(CombatState::Wander));
        assert_eq!(agent.navigation().destination, Some(Vec3::new(1.0, 0.0, 2.0)));
    }

    #[test]
    fn test_wander_repicks_on_arrival_and_resets_countdown() {
        let mut agent = make_agent();
        let mut world = Harness::new();
        world.tick(&mut agent);
        world.tick(&mut agent);
        let picks = agent.navigation().destinations_set;

        world.tick(&mut agent);
        assert_eq!(agent.navigation().destinations_set, picks);
        assert!(agent.wander_countdown() < CombatConfig::default().wander_interval);

        agent.navigation_mut().remaining = 0.2;
        world.tick(&mut agent);
        assert_eq!(agent.navigation().destinations_set, picks + 1);
        assert_relative_eq!(agent.wander_countdown(), CombatConfig::default().wander_interval);
    }

    #[test]
    fn test_wander_repicks_when_countdown_expires() {
        let config = CombatConfig::default();
        let mut agent = make_agent();
        let mut world = Harness::new();
        world.tick(&mut agent);
        world.tick(&mut agent);
        let picks = agent.navigation().destinations_set;

        // Entering Wander already consumed one dt of the countdown
        let ticks_left = (config.wander_interval / DT).round() as usize - 1;
        for _ in 0..ticks_left - 1 {
            world.tick(&mut agent);
        }
        assert_eq!(agent.navigation().destinations_set, picks);

        world.tick(&mut agent);
        world.tick(&mut agent);
        assert_eq!(agent.navigation().destinations_set, picks + 1);
        assert!(agent.wander_countdown() > config.wander_interval - 2.0 * DT);
    }

    #[test]
    fn test_chase_without_target_stays_in_chase() {
        let mut agent = make_agent();
        let mut world = Harness::new();
        world.tick(&mut agent);
        world.player_ahead(6.0, true);
        world.tick(&mut agent);
        assert_eq!(agent.state(), Some(CombatState::Chase));

        world.target = None;
        for _ in 0..10 {
            world.tick(&mut agent);
            assert_eq!(agent.state(), Some(CombatState::Chase));
        }
    }

    #[test]
    fn test_chase_losing_sight_returns_to_wander() {
        let mut agent = make_agent();
        let mut world = Harness::new();
        world.tick(&mut agent);
        world.player_ahead(6.0, true);
        world.tick(&mut agent);

        world.set_visible(false);
        assert_eq!(world.tick(&mut agent), Some(CombatState::Wander));
    }

    /// Drive an agent to Dash: Idle, then Chase at 6m, then Dash at 2m.
    fn dash_agent(world: &mut Harness) -> CombatAgent<FakeNav> {
        let mut agent = make_agent();
        world.tick(&mut agent);
        world.player_ahead(6.0, true);
        world.tick(&mut agent);
        world.player_ahead(2.0, true);
        assert_eq!(world.tick(&mut agent), Some(CombatState::Dash));
        agent
    }

    #[test]
    fn test_dash_entry_sets_speed_and_captures_destination() {
        let mut world = Harness::new();
        let mut agent = dash_agent(&mut world);
        let config = CombatConfig::default();

        assert_relative_eq!(agent.navigation().speed, config.chase_speed * 2.5);
        assert_eq!(agent.navigation().destination, Some(Vec3::new(0.0, 0.0, 2.0)));
        assert_relative_eq!(agent.dash_remaining().unwrap(), config.dash_duration);

        // Target moves; the dash keeps its original destination
        world.player_ahead(1.0, true);
        world.tick(&mut agent);
        assert_eq!(agent.state(), Some(CombatState::Dash));
        assert_eq!(agent.navigation().destination, Some(Vec3::new(0.0, 0.0, 2.0)));
    }

    #[test]
    fn test_dash_expiry_uses_perception_at_expiry() {
        let mut world = Harness::new();
        let mut agent = dash_agent(&mut world);
        let expected_ticks = (CombatConfig::default().dash_duration / DT).round() as u32;

        // Visible at entry, hidden by the time the timer fires
        world.player_ahead(2.0, false);
        let mut ticks = 0;
        while agent.state() == Some(CombatState::Dash) {
            world.tick(&mut agent);
            ticks += 1;
            assert!(ticks <= expected_ticks + 1, "dash never ended");
        }
        assert!(ticks + 1 >= expected_ticks, "dash ended early after {ticks}");
        assert_eq!(agent.state(), Some(CombatState::Wander));
        assert_eq!(agent.dash_remaining(), None);
    }

    #[test]
    fn test_dash_expiry_with_target_visible_returns_to_chase() {
        let mut world = Harness::new();
        let mut agent = dash_agent(&mut world);
        world.player_ahead(8.0, true);

        let mut ticks = 0;
        while agent.state() == Some(CombatState::Dash) {
            world.tick(&mut agent);
            ticks += 1;
            assert!(ticks < 20);
        }
        assert_eq!(agent.state(), Some(CombatState::Chase));
    }

    #[test]
    fn test_dash_timer_left_behind_after_forced_exit_is_dropped() {
        let mut world = Harness::new();
        let mut agent = dash_agent(&mut world);
        world.player_ahead(8.0, true);
        for _ in 0..3 {
            assert_eq!(world.tick(&mut agent), None);
        }

        assert!(agent.request_transition(CombatState::Chase));
        assert_eq!(world.tick(&mut agent), Some(CombatState::Chase));
        assert!(agent.dash_remaining().is_some());

        // Outlive the old dash timer by a wide margin
        let ticks = (CombatConfig::default().dash_duration / DT).round() as usize + 5;
        for _ in 0..ticks {
            assert_eq!(world.tick(&mut agent), None);
            assert_eq!(agent.state(), Some(CombatState::Chase));
        }
        assert_eq!(agent.dash_remaining(), None);
    }

    #[test]
    fn test_dash_reentry_restarts_full_duration() {
        let mut world = Harness::new();
        let mut agent = dash_agent(&mut world);
        let expected_ticks = (CombatConfig::default().dash_duration / DT).round() as u32;

        world.player_ahead(8.0, true);
        for _ in 0..expected_ticks / 2 {
            assert_eq!(world.tick(&mut agent), None);
        }
        agent.request_transition(CombatState::Chase);
        assert_eq!(world.tick(&mut agent), Some(CombatState::Chase));

        world.player_ahead(2.0, true);
        assert_eq!(world.tick(&mut agent), Some(CombatState::Dash));
        assert_relative_eq!(
            agent.dash_remaining().unwrap(),
            CombatConfig::default().dash_duration
        );

        world.player_ahead(8.0, true);
        let mut ticks = 0;
        while agent.state() == Some(CombatState::Dash) {
            world.tick(&mut agent);
            ticks += 1;
            assert!(ticks <= expected_ticks + 1, "dash never ended");
        }
        assert!(ticks + 1 >= expected_ticks, "dash ended early after {ticks}");
        assert_eq!(agent.state(), Some(CombatState::Chase));
    }

    #[test]
    fn test_pending_empty_after_every_agent_tick() {
        let mut agent = make_agent();
        let mut world = Harness::new();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..400 {
            if rng.gen_bool(0.3) {
                world.target = None;
            } else {
                let position = Vec3::new(rng.gen_range(-4.0..4.0), 0.0, rng.gen_range(-1.0..12.0));
                world.target = Some(TargetView { id: PLAYER, position });
            }
            world.set_visible(rng.gen_bool(0.5));
            agent.navigation_mut().remaining = rng.gen_range(0.0..5.0);
            world.tick(&mut agent);
            assert_eq!(agent.pending(), None);
        }
    }

    // ---- Combat damage ----

    #[test]
    fn test_three_hits_defeat_agent_once() {
        let mut agent = make_agent();
        let mut sink = FakeSink::default();
        let mut events = Vec::new();
        for _ in 0..4 {
            agent.apply_damage(1, &mut sink, &mut events);
        }
        assert!(agent.is_defeated());
        assert_eq!(sink.defeated, 1);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, AgentEvent::Defeated { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_two_hits_leave_agent_alive() {
        let mut agent = make_agent();
        let mut sink = FakeSink::default();
        let mut events = Vec::new();
        agent.apply_damage(1, &mut sink, &mut events);
        let outcome = agent.apply_damage(1, &mut sink, &mut events);
        assert_eq!(outcome, DamageOutcome::Absorbed { remaining: 1 });
        assert_eq!(sink.defeated, 0);
        assert!(!agent.is_defeated());
    }

    #[test]
    fn test_death_mid_dash_cancels_timer_and_stops_ticking() {
        let mut world = Harness::new();
        let mut agent = dash_agent(&mut world);
        let mut sink = FakeSink::default();
        let mut events = Vec::new();

        agent.apply_damage(3, &mut sink, &mut events);
        assert_eq!(agent.dash_remaining(), None);
        assert_eq!(agent.navigation().destination, None);

        for _ in 0..30 {
            assert_eq!(world.tick(&mut agent), None);
        }
        assert_eq!(agent.state(), Some(CombatState::Dash));
        assert_eq!(sink.defeated, 1);
    }

    #[test]
    fn test_projectile_contact_damages_and_is_consumed() {
        let mut agent = make_agent();
        let mut sink = FakeSink::default();
        let mut events = Vec::new();

        let response = agent.on_contact(ContactKind::Projectile, &mut sink, &mut events);
        assert!(response.consume_other);
        assert_eq!(response.damage, Some(DamageOutcome::Absorbed { remaining: 2 }));

        let response = agent.on_contact(ContactKind::Player, &mut sink, &mut events);
        assert!(!response.consume_other);
        assert_eq!(response.damage, None);
        assert_eq!(agent.health().current(), 2);
    }

    // ---- Locomotion ----

    struct LocoHarness {
        pose: Pose,
        physics: FakePhysics,
        body: FakeBody,
        events: Vec<AgentEvent>,
    }

    impl LocoHarness {
        fn new() -> Self {
            Self {
                pose: Pose::new(Vec3::new(0.0, 1.0, 0.0), 0.0),
                physics: FakePhysics {
                    ray_hit: None,
                    grounded: true,
                },
                body: FakeBody::default(),
                events: Vec::new(),
            }
        }

        fn tick(
            &mut self,
            controller: &mut LocomotionController,
            input: InputSnapshot,
        ) -> Option<LocomotionState> {
            let mut ctx = LocomotionContext {
                dt: DT,
                input: &input,
                physics: &self.physics,
                body: &mut self.body,
                events: &mut self.events,
            };
            controller.tick(&mut self.pose, &mut ctx)
        }
    }

    fn jump_held() -> InputSnapshot {
        InputSnapshot {
            jump_held: true,
            jump_pressed: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_ground_jump_double_jump_and_landing() {
        let config = LocomotionConfig::default();
        let mut player = LocomotionController::new(PLAYER, config.clone());
        let mut world = LocoHarness::new();

        assert_eq!(world.tick(&mut player, InputSnapshot::default()), Some(LocomotionState::Idle));

        assert_eq!(world.tick(&mut player, jump_held()), Some(LocomotionState::Jump));
        assert_relative_eq!(world.body.velocity.y, config.jump_amount);
        assert_eq!(player.jumps_used(), 1);

        // Airborne, falling, second press
        world.physics.grounded = false;
        world.body.velocity.y = -3.0;
        assert_eq!(world.tick(&mut player, jump_held()), Some(LocomotionState::Jump));
        assert_relative_eq!(world.body.velocity.y, config.jump_amount);
        assert_eq!(player.jumps_used(), 2);

        // Out of jumps
        assert_eq!(world.tick(&mut player, jump_held()), None);
        assert_eq!(player.jumps_used(), 2);

        world.physics.grounded = true;
        assert_eq!(world.tick(&mut player, InputSnapshot::default()), Some(LocomotionState::Idle));
        assert_eq!(player.jumps_used(), 0);
        assert!(player.is_grounded());
    }

    #[test]
    fn test_air_jump_requires_fresh_press() {
        let mut player = LocomotionController::new(PLAYER, LocomotionConfig::default());
        let mut world = LocoHarness::new();
        world.tick(&mut player, InputSnapshot::default());
        world.tick(&mut player, jump_held());

        world.physics.grounded = false;
        let held_only = InputSnapshot {
            jump_held: true,
            ..Default::default()
        };
        assert_eq!(world.tick(&mut player, held_only), None);
        assert_eq!(player.jumps_used(), 1);
        assert_eq!(player.state(), Some(LocomotionState::Jump));
    }

    #[test]
    fn test_no_jump_from_idle_while_airborne() {
        let mut player = LocomotionController::new(PLAYER, LocomotionConfig::default());
        let mut world = LocoHarness::new();
        world.physics.grounded = false;
        world.tick(&mut player, InputSnapshot::default());
        assert_eq!(world.tick(&mut player, jump_held()), None);
        assert_eq!(player.state(), Some(LocomotionState::Idle));
    }

    #[test]
    fn test_mouse_look_clamps_pitch_and_turns_body() {
        let config = LocomotionConfig::default();
        let mut player = LocomotionController::new(PLAYER, config.clone());
        let mut pose = Pose::default();

        let input = InputSnapshot {
            mouse_delta: Vec2::new(0.2, -100.0),
            ..Default::default()
        };
        player.look(&mut pose, &input, DT);
        assert_relative_eq!(pose.yaw_degrees, 0.2 * config.mouse_sensitivity * DT, epsilon = 1e-4);
        assert_relative_eq!(player.pitch_degrees(), config.max_look_angle);

        let input = InputSnapshot {
            mouse_delta: Vec2::new(0.0, 100.0),
            ..Default::default()
        };
        player.look(&mut pose, &input, DT);
        assert_relative_eq!(player.pitch_degrees(), -config.max_look_angle);
    }

    #[test]
    fn test_diagonal_movement_is_normalized() {
        let config = LocomotionConfig::default();
        let player = LocomotionController::new(PLAYER, config.clone());
        let input = InputSnapshot {
            move_forward: true,
            move_right: true,
            ..Default::default()
        };
        let velocity = player.movement_velocity(&Pose::default(), &input);
        assert_relative_eq!(velocity.length(), config.move_speed, epsilon = 1e-5);
        assert!(velocity.x > 0.0 && velocity.z > 0.0);
    }

    #[test]
    fn test_run_only_applies_moving_forward() {
        let config = LocomotionConfig::default();
        let player = LocomotionController::new(PLAYER, config.clone());
        let run_forward = InputSnapshot {
            move_forward: true,
            run: true,
            ..Default::default()
        };
        let run_back = InputSnapshot {
            move_back: true,
            run: true,
            ..Default::default()
        };
        let pose = Pose::default();
        assert_relative_eq!(
            player.movement_velocity(&pose, &run_forward).length(),
            config.move_speed * config.run_multiplier,
            epsilon = 1e-5
        );
        assert_relative_eq!(
            player.movement_velocity(&pose, &run_back).length(),
            config.move_speed,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_fixed_update_translates_in_facing_frame() {
        let config = LocomotionConfig::default();
        let player = LocomotionController::new(PLAYER, config.clone());
        let mut pose = Pose::new(Vec3::ZERO, 90.0);
        let input = InputSnapshot {
            move_forward: true,
            ..Default::default()
        };
        player.fixed_update(&mut pose, &input, 0.5);
        assert_relative_eq!(pose.position.x, config.move_speed * 0.5, epsilon = 1e-4);
        assert_relative_eq!(pose.position.z, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let player = LocomotionController::new(PLAYER, LocomotionConfig::default());
        let input = InputSnapshot {
            move_forward: true,
            move_back: true,
            ..Default::default()
        };
        assert_eq!(player.movement_velocity(&Pose::default(), &input), Vec3::ZERO);
    }

    #[test]
    fn test_ground_probe_sits_below_capsule() {
        let player = LocomotionController::new(PLAYER, LocomotionConfig::default());
        let origin = player.ground_probe_origin(Vec3::new(1.0, 1.0, 2.0));
        assert_relative_eq!(origin.y, 1.0 - 0.6, epsilon = 1e-6);
        assert_eq!(origin.x, 1.0);
        assert_eq!(origin.z, 2.0);
    }

    #[test]
    fn test_player_game_over_signalled_once() {
        let mut player = LocomotionController::new(PLAYER, LocomotionConfig::default());
        let mut sink = FakeSink::default();
        let mut events = Vec::new();
        for _ in 0..5 {
            player.on_contact(ContactKind::Enemy, &mut sink, &mut events);
        }
        assert_eq!(sink.game_over, 1);
        assert!(player.health().is_defeated());
        assert_eq!(
            player.on_contact(ContactKind::Projectile, &mut sink, &mut events),
            None
        );
    }
}
