// Point-in-time scoreboard: KDA per participant and objective/gold totals per team, counted
// from scratch over the events up to the cutoff. No state survives between calls.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::events::{BuildingType, Event, EventLog, MonsterType};
use crate::inventory::InventoryTimeline;
use crate::types::{
    credited_team, opposing_team, team_of, ItemId, Participant, ParticipantId, TeamId, Timestamp,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Kda {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TeamTotals {
    pub kills: u32,
    /// Enemy towers destroyed.
    pub towers: u32,
    /// Enemy inhibitors destroyed.
    pub inhibitors: u32,
    /// Every dragon, elder included.
    pub dragons: u32,
    pub elders: u32,
    pub barons: u32,
    pub grubs: u32,
    pub heralds: u32,
    /// Value of the items the team currently holds.
    pub gold: i64,
    /// Total gold earned per the latest gold frame, 0 without frames.
    pub earned_gold: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSnapshot {
    pub participants: BTreeMap<ParticipantId, Kda>,
    pub teams: BTreeMap<TeamId, TeamTotals>,
}

impl AggregateSnapshot {
    fn seeded(participants: &[Participant]) -> Self {
        let mut snapshot = AggregateSnapshot::default();
        for p in participants {
            snapshot.participants.entry(p.participant_id).or_default();
            snapshot.teams.entry(p.team_id).or_default();
        }
        snapshot
    }

    pub fn team(&self, team: TeamId) -> TeamTotals {
        self.teams.get(&team).copied().unwrap_or_default()
    }

    pub fn kda(&self, participant: ParticipantId) -> Option<Kda> {
        self.participants.get(&participant).copied()
    }

    /// Fills `earned_gold` from the latest frame at or before `t`.
    pub fn with_earned_gold(
        mut self,
        frames: &GoldTimeline,
        participants: &[Participant],
        t: Timestamp,
    ) -> Self {
        if let Some(frame) = frames.frame_at(t) {
            for (team, gold) in frame.team_earned_gold(participants) {
                self.teams.entry(team).or_default().earned_gold = gold;
            }
        }
        self
    }
}

/// Counts everything that happened up to game time `now` (seconds).
///
/// Events naming participants outside `participants` are left uncounted. Team gold is the
/// summed `price(item, version)` of every item held at `now`.
pub fn compute_aggregates<P>(
    log: &EventLog,
    now: f64,
    participants: &[Participant],
    inventory: &InventoryTimeline,
    price: P,
    version: &str,
) -> AggregateSnapshot
where
    P: Fn(ItemId, &str) -> i64,
{
    let cutoff = Timestamp::from_secs_f64(now);
    let mut snapshot = AggregateSnapshot::seeded(participants);
    let mut uncounted = 0usize;

    for event in log.until(cutoff) {
        match &event.event {
            Event::ChampionKill {
                victim_id,
                killer_id,
                assisting_participant_ids,
                ..
            } => {
                match team_of(participants, *killer_id) {
                    Some(team) => {
                        snapshot.participants.entry(*killer_id).or_default().kills += 1;
                        snapshot.teams.entry(team).or_default().kills += 1;
                    }
                    None => uncounted += 1,
                }
                if let Some(kda) = snapshot.participants.get_mut(victim_id) {
                    kda.deaths += 1;
                }
                for assister in assisting_participant_ids {
                    if let Some(kda) = snapshot.participants.get_mut(assister) {
                        kda.assists += 1;
                    }
                }
            }
            Event::BuildingKill {
                team_id,
                building_type,
                ..
            } => {
                // team_id owned the building; the other side gets the credit
                let Some(credited) = opposing_team(*team_id) else {
                    uncounted += 1;
                    continue;
                };
                let totals = snapshot.teams.entry(credited).or_default();
                match building_type {
                    BuildingType::TowerBuilding => totals.towers += 1,
                    BuildingType::InhibitorBuilding => totals.inhibitors += 1,
                }
            }
            Event::EliteMonsterKill {
                killer_id,
                monster_type,
                assisting_participant_ids,
                ..
            } => {
                let Some(team) = credited_team(participants, *killer_id, assisting_participant_ids)
                else {
                    uncounted += 1;
                    continue;
                };
                let totals = snapshot.teams.entry(team).or_default();
                match monster_type {
                    MonsterType::Horde => totals.grubs += 1,
                    MonsterType::Riftherald => totals.heralds += 1,
                    MonsterType::BaronNashor => totals.barons += 1,
                    MonsterType::Dragon => {
                        totals.dragons += 1;
                        if event.is_elder_kill() {
                            totals.elders += 1;
                        }
                    }
                    MonsterType::Other => {}
                }
            }
            Event::ItemPurchased { .. } | Event::ItemSold { .. } | Event::ItemUndo { .. } => {}
        }
    }

    for p in participants {
        let Some(state) = inventory.state_at(p.participant_id, cutoff) else {
            continue;
        };
        let value: i64 = state.held_items().map(|item| price(item, version)).sum();
        snapshot.teams.entry(p.team_id).or_default().gold += value;
    }

    if uncounted > 0 {
        tracing::trace!(uncounted, now, "events without an attributable participant");
    }

    snapshot
}

/// Gold of one participant in a gold frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantGold {
    pub participant_id: ParticipantId,
    pub total_gold: i64,
    #[serde(default)]
    pub minions: i64,
}

/// Per-minute gold snapshot from the match timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoldFrame {
    pub timestamp: Timestamp,
    #[serde(default)]
    pub participants: Vec<ParticipantGold>,
}

impl GoldFrame {
    pub fn team_earned_gold(&self, participants: &[Participant]) -> BTreeMap<TeamId, i64> {
        let mut totals = BTreeMap::new();
        for gold in &self.participants {
            if let Some(team) = team_of(participants, gold.participant_id) {
                *totals.entry(team).or_insert(0) += gold.total_gold;
            }
        }
        totals
    }
}

/// Gold frames sorted by timestamp.
#[derive(Debug, Clone, Default)]
pub struct GoldTimeline {
    frames: Vec<GoldFrame>,
}

impl GoldTimeline {
    pub fn new(mut frames: Vec<GoldFrame>) -> Self {
        frames.sort_by_key(|f| f.timestamp);
        GoldTimeline { frames }
    }

    /// Latest frame at or before `t`.
    pub fn frame_at(&self, t: Timestamp) -> Option<&GoldFrame> {
        let idx = self.frames.partition_point(|f| f.timestamp <= t);
        idx.checked_sub(1).map(|i| &self.frames[i])
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
