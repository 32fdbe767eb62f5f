//! Translates rapier contact notifications into session events.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::app::state::AppState;
use crate::core::components::{Ground, GroundContacts, Player, Tracked};
use crate::core::progression::{EntityId, EntityKind, GameEvent};
use crate::core::system::system_order::GameInputSet;

pub struct CollisionEventsPlugin;

impl Plugin for CollisionEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            translate_collisions
                .in_set(GameInputSet)
                .run_if(in_state(AppState::Playing)),
        );
    }
}

/// What one side of a contact pair is, as far as the rules care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Player,
    Ground,
    Tracked(EntityKind, EntityId),
    Other,
}

/// Rule event for a freshly started contact, independent of pair order.
pub fn contact_event(a: Party, b: Party) -> Option<GameEvent> {
    use EntityKind::*;
    match (a, b) {
        (Party::Player, Party::Tracked(Hostile { .. }, hostile))
        | (Party::Tracked(Hostile { .. }, hostile), Party::Player) => {
            Some(GameEvent::HostileStrikesPlayer { hostile })
        }
        (Party::Player, Party::Tracked(Pickup, pickup))
        | (Party::Tracked(Pickup, pickup), Party::Player) => {
            Some(GameEvent::PlayerCollectsPickup { pickup })
        }
        (Party::Tracked(Projectile, projectile), Party::Tracked(Hostile { .. }, hostile))
        | (Party::Tracked(Hostile { .. }, hostile), Party::Tracked(Projectile, projectile)) => {
            Some(GameEvent::ProjectileStrikesHostile { projectile, hostile })
        }
        _ => None,
    }
}

/// Rule event for a finished contact; only player-hostile separations matter.
pub fn separation_event(a: Party, b: Party) -> Option<GameEvent> {
    match (a, b) {
        (Party::Player, Party::Tracked(EntityKind::Hostile { .. }, hostile))
        | (Party::Tracked(EntityKind::Hostile { .. }, hostile), Party::Player) => {
            Some(GameEvent::HostileContactEnded { hostile })
        }
        _ => None,
    }
}

fn is_player_on_ground(a: Party, b: Party) -> bool {
    matches!((a, b), (Party::Player, Party::Ground) | (Party::Ground, Party::Player))
}

fn translate_collisions(
    mut collisions: EventReader<CollisionEvent>,
    q_player: Query<(), With<Player>>,
    q_ground: Query<(), With<Ground>>,
    q_tracked: Query<&Tracked>,
    mut q_contacts: Query<&mut GroundContacts, With<Player>>,
    mut events: EventWriter<GameEvent>,
) {
    let classify = |e: Entity| -> Party {
        if q_player.contains(e) {
            Party::Player
        } else if q_ground.contains(e) {
            Party::Ground
        } else if let Ok(t) = q_tracked.get(e) {
            Party::Tracked(t.kind, t.id)
        } else {
            Party::Other
        }
    };
    for collision in collisions.read() {
        match collision {
            CollisionEvent::Started(e1, e2, _) => {
                let (a, b) = (classify(*e1), classify(*e2));
                if is_player_on_ground(a, b) {
                    for mut contacts in &mut q_contacts {
                        contacts.0 += 1;
                    }
                } else if let Some(event) = contact_event(a, b) {
                    events.write(event);
                }
            }
            CollisionEvent::Stopped(e1, e2, _) => {
                let (a, b) = (classify(*e1), classify(*e2));
                if is_player_on_ground(a, b) {
                    for mut contacts in &mut q_contacts {
                        contacts.0 = contacts.0.saturating_sub(1);
                    }
                } else if let Some(event) = separation_event(a, b) {
                    events.write(event);
                }
            }
        }
    }
}
