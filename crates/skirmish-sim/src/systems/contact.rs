//! Contact system: enemies hurt the player when they start touching it.

use hecs::World;

use skirmish_ai::locomotion::LocomotionController;
use skirmish_core::constants::ACTOR_RADIUS;
use skirmish_core::enums::ContactKind;
use skirmish_core::events::AgentEvent;
use skirmish_core::types::Pose;

use crate::components::{enemy_center, ContactState, EnemyAgent, Player};
use crate::match_tracker::MatchTracker;

pub fn run(world: &mut World, tracker: &mut MatchTracker, events: &mut Vec<AgentEvent>) {
    let player = world
        .query::<(&Pose, &Player)>()
        .iter()
        .next()
        .map(|(entity, (pose, _))| (entity, pose.position));
    let Some((player_entity, player_center)) = player else {
        return;
    };

    let reach = ACTOR_RADIUS * 2.0;
    let mut onsets = 0;
    for (_entity, (pose, agent, contact)) in
        world.query_mut::<(&Pose, &EnemyAgent, &mut ContactState)>()
    {
        let touching = !agent.is_defeated() && enemy_center(pose).distance(player_center) <= reach;
        if touching && !contact.touching_player {
            onsets += 1;
        }
        contact.touching_player = touching;
    }

    if onsets == 0 {
        return;
    }
    if let Ok(mut controller) = world.get::<&mut LocomotionController>(player_entity) {
        for _ in 0..onsets {
            controller.on_contact(ContactKind::Enemy, tracker, events);
        }
    }
}
