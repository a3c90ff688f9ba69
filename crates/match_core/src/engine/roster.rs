//! Roster side table
//!
//! Player id -> team, role and AI flag, plus each player's timed effects.
//! Effects are plain records with an expiry second, checked by the same tick
//! loop that drives the match clock.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::{PlayerId, PlayerRole, TeamId};
use crate::error::CommandRejection;

/// Read-only view of one roster entry handed to other components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlot {
    pub id: PlayerId,
    pub team: TeamId,
    pub role: PlayerRole,
    pub is_ai: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    SpeedBoost,
    Shrink,
    Enlarge,
    Stunned,
    PowerShot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedEffect {
    pub kind: EffectKind,
    pub started_at: u64,
    pub expires_at: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub slot: PlayerSlot,
    pub name: String,
    pub effects: Vec<TimedEffect>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    entries: BTreeMap<PlayerId, RosterEntry>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, slot: PlayerSlot, name: &str) -> Result<(), CommandRejection> {
        if self.entries.contains_key(&slot.id) {
            return Err(CommandRejection::DuplicatePlayer(slot.id));
        }
        self.entries.insert(
            slot.id,
            RosterEntry {
                slot,
                name: name.to_string(),
                effects: Vec::new(),
            },
        );
        Ok(())
    }

    pub fn remove(&mut self, id: PlayerId) -> Option<RosterEntry> {
        self.entries.remove(&id)
    }

    pub fn get(&self, id: PlayerId) -> Option<&RosterEntry> {
        self.entries.get(&id)
    }

    pub fn team_of(&self, id: PlayerId) -> Option<TeamId> {
        self.entries.get(&id).map(|entry| entry.slot.team)
    }

    /// Copies of every slot, ordered by player id.
    pub fn slots(&self) -> Vec<PlayerSlot> {
        self.entries.values().map(|entry| entry.slot).collect()
    }

    pub fn ids(&self) -> Vec<PlayerId> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn team_size(&self, team: TeamId) -> usize {
        self.entries.values().filter(|e| e.slot.team == team).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Give `id` an effect lasting `duration` seconds from `now`. Re-applying
    /// the same kind refreshes its expiry instead of stacking.
    pub fn apply_effect(
        &mut self,
        id: PlayerId,
        kind: EffectKind,
        now: u64,
        duration: u64,
    ) -> Result<(), CommandRejection> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(CommandRejection::UnknownPlayer(id))?;
        let effect = TimedEffect {
            kind,
            started_at: now,
            expires_at: now.saturating_add(duration),
        };
        match entry.effects.iter_mut().find(|e| e.kind == kind) {
            Some(existing) => *existing = effect,
            None => entry.effects.push(effect),
        }
        Ok(())
    }

    pub fn active_effects(&self, id: PlayerId) -> &[TimedEffect] {
        self.entries
            .get(&id)
            .map(|entry| entry.effects.as_slice())
            .unwrap_or(&[])
    }

    /// Remove and return every effect with `expires_at <= now`.
    pub fn expire_effects(&mut self, now: u64) -> Vec<(PlayerId, TimedEffect)> {
        let mut expired = Vec::new();
        for (id, entry) in self.entries.iter_mut() {
            entry.effects.retain(|effect| {
                if effect.expires_at <= now {
                    expired.push((*id, *effect));
                    false
                } else {
                    true
                }
            });
        }
        expired
    }
}
