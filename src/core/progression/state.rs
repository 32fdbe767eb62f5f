use bevy::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use super::invincibility::Invincibility;

/// Stable id for an entity record, independent of the ECS `Entity` it is realized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Hostile { boss: bool },
    Pickup,
    Projectile,
}

impl EntityKind {
    pub const REGULAR_HOSTILE: Self = EntityKind::Hostile { boss: false };
    pub const BOSS: Self = EntityKind::Hostile { boss: true };

    pub fn is_hostile(self) -> bool {
        matches!(self, EntityKind::Hostile { .. })
    }

    pub fn is_boss(self) -> bool {
        matches!(self, EntityKind::Hostile { boss: true })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityRecord {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Counted collection of entity records, iterated in id order.
#[derive(Debug, Clone, Default)]
pub struct EntityCollection {
    records: BTreeMap<EntityId, EntityRecord>,
}

impl EntityCollection {
    pub fn insert(&mut self, record: EntityRecord) {
        self.records.insert(record.id, record);
    }

    pub fn remove(&mut self, id: EntityId) -> Option<EntityRecord> {
        self.records.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityRecord> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityRecord> {
        self.records.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityRecord> {
        self.records.values()
    }

    /// Empties the collection, returning the ids that were removed.
    pub fn drain_ids(&mut self) -> Vec<EntityId> {
        let ids = self.records.keys().copied().collect();
        self.records.clear();
        ids
    }
}

/// Mutable per-run game data: score, level, flags and the live entity records.
#[derive(Debug, Clone)]
pub struct GameState {
    pub score: u32,
    pub current_level: u32,
    pub boss_active: bool,
    pub invincibility: Invincibility,
    pub hostiles: EntityCollection,
    pub pickups: EntityCollection,
    pub projectiles: EntityCollection,
    /// Hostiles currently overlapping the player. Only tracked while the shield absorbs them.
    hostile_contacts: BTreeSet<EntityId>,
    next_id: u32,
}

impl GameState {
    pub fn new(shield_duration: Duration) -> Self {
        Self {
            score: 0,
            current_level: 1,
            boss_active: false,
            invincibility: Invincibility::new(shield_duration),
            hostiles: EntityCollection::default(),
            pickups: EntityCollection::default(),
            projectiles: EntityCollection::default(),
            hostile_contacts: BTreeSet::new(),
            next_id: 0,
        }
    }

    pub fn player_invincible(&self) -> bool {
        self.invincibility.is_active()
    }

    pub fn hud_text(&self) -> String {
        format!("Score: {} | Level: {}", self.score, self.current_level)
    }

    pub(crate) fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Routes a record into the collection for its kind.
    pub fn register(&mut self, record: EntityRecord) {
        match record.kind {
            EntityKind::Hostile { boss } => {
                self.hostiles.insert(record);
                self.boss_active |= boss;
            }
            EntityKind::Pickup => self.pickups.insert(record),
            EntityKind::Projectile => self.projectiles.insert(record),
        }
    }

    /// Notes a live hostile pressing against the (shielded) player.
    pub fn touch_hostile(&mut self, id: EntityId) {
        if self.hostiles.contains(id) {
            self.hostile_contacts.insert(id);
        }
    }

    pub fn release_hostile(&mut self, id: EntityId) {
        self.hostile_contacts.remove(&id);
    }

    /// Any hostile still overlapping the player.
    pub fn touching_hostile(&self) -> Option<EntityId> {
        self.hostile_contacts.iter().next().copied()
    }

    /// Drops every hostile and pickup record, returning their ids.
    pub fn clear_wave(&mut self) -> Vec<EntityId> {
        let mut cleared = self.hostiles.drain_ids();
        cleared.extend(self.pickups.drain_ids());
        self.hostile_contacts.clear();
        self.boss_active = false;
        cleared
    }

    /// Removes a hostile and recomputes the boss flag from what is left.
    pub fn remove_hostile(&mut self, id: EntityId) -> Option<EntityRecord> {
        let removed = self.hostiles.remove(id)?;
        self.hostile_contacts.remove(&id);
        if removed.kind.is_boss() {
            self.boss_active = self.hostiles.iter().any(|r| r.kind.is_boss());
        }
        Some(removed)
    }

    /// Level-advance condition: no hostile of any class alive and no boss pending.
    pub fn level_cleared(&self) -> bool {
        self.hostiles.is_empty() && !self.boss_active
    }

    /// Records the engine-side motion of a live entity. Unknown ids are ignored.
    pub fn sync_motion(&mut self, id: EntityId, position: Vec2, velocity: Vec2) {
        let record = self
            .hostiles
            .get_mut(id)
            .or_else(|| self.pickups.get_mut(id))
            .or_else(|| self.projectiles.get_mut(id));
        if let Some(r) = record {
            r.position = position;
            r.velocity = velocity;
        }
    }

    /// Back to initial values; returns every id that was still live so the engine side can drop it.
    pub fn reset(&mut self) -> Vec<EntityId> {
        let mut removed = self.clear_wave();
        removed.extend(self.projectiles.drain_ids());
        self.score = 0;
        self.current_level = 1;
        self.invincibility.cancel();
        removed
    }
}
