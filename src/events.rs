// Event model for a recorded match: a closed sum type over the timeline events the engine reads,
// plus the sorted log every query component scans.

use serde::{Deserialize, Serialize};

use crate::types::{ItemId, ParticipantId, TeamId, Timestamp};

/// Map position of a champion kill (map units).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

/// Destroyed structure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildingType {
    TowerBuilding,
    InhibitorBuilding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LaneType {
    TopLane,
    MidLane,
    BotLane,
}

/// Epic monster kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MonsterType {
    /// Voidgrubs.
    Horde,
    Riftherald,
    BaronNashor,
    Dragon,
    /// Any monster this engine does not track.
    #[serde(other)]
    Other,
}

/// Dragon subtype, only meaningful when the monster is a dragon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DragonType {
    AirDragon,
    EarthDragon,
    FireDragon,
    WaterDragon,
    HextechDragon,
    ChemtechDragon,
    ElderDragon,
    #[serde(other)]
    Unknown,
}

/// Payload of a timeline event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Event {
    ChampionKill {
        victim_id: ParticipantId,
        /// 0 when a minion, turret or monster landed the last hit.
        killer_id: ParticipantId,
        #[serde(default)]
        assisting_participant_ids: Vec<ParticipantId>,
        #[serde(default)]
        position: Position,
    },
    BuildingKill {
        /// Team that owned the destroyed building.
        team_id: TeamId,
        killer_id: ParticipantId,
        building_type: BuildingType,
        #[serde(default)]
        lane_type: Option<LaneType>,
        #[serde(default)]
        assisting_participant_ids: Vec<ParticipantId>,
    },
    EliteMonsterKill {
        killer_id: ParticipantId,
        monster_type: MonsterType,
        #[serde(default)]
        monster_sub_type: Option<DragonType>,
        #[serde(default)]
        assisting_participant_ids: Vec<ParticipantId>,
    },
    ItemPurchased {
        participant_id: ParticipantId,
        item_id: ItemId,
        #[serde(default)]
        slot: Option<i64>,
    },
    ItemSold {
        participant_id: ParticipantId,
        item_id: ItemId,
        #[serde(default)]
        slot: Option<i64>,
    },
    ItemUndo {
        participant_id: ParticipantId,
        before_id: ItemId,
        after_id: ItemId,
    },
}

impl Event {
    /// True for the three variants that change a participant's inventory.
    pub fn is_item_event(&self) -> bool {
        matches!(
            self,
            Event::ItemPurchased { .. } | Event::ItemSold { .. } | Event::ItemUndo { .. }
        )
    }
}

/// Single timestamped event of the match timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub timestamp: Timestamp,
    pub event: Event,
}

impl GameEvent {
    pub fn new(timestamp_ms: i64, event: Event) -> Self {
        GameEvent {
            timestamp: Timestamp::from_millis(timestamp_ms),
            event,
        }
    }

    /// True for elite monster kills of the elder dragon.
    pub fn is_elder_kill(&self) -> bool {
        matches!(
            self.event,
            Event::EliteMonsterKill {
                monster_type: MonsterType::Dragon,
                monster_sub_type: Some(DragonType::ElderDragon),
                ..
            }
        )
    }
}

/// The whole event log of one match, stably sorted by timestamp once at load.
///
/// Capture order is not guaranteed to be chronological; events sharing a timestamp keep
/// their capture order so an undo never jumps ahead of the purchase it reverts.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new(mut events: Vec<GameEvent>) -> Self {
        // sort_by_key is stable
        events.sort_by_key(|e| e.timestamp);
        EventLog { events }
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Index of the last event with `timestamp <= t`, or `None` if every event is later.
    pub fn cutoff_index(&self, t: Timestamp) -> Option<usize> {
        self.events
            .partition_point(|e| e.timestamp <= t)
            .checked_sub(1)
    }

    /// Events that have already happened at game time `t` (inclusive).
    pub fn until(&self, t: Timestamp) -> &[GameEvent] {
        let end = self.cutoff_index(t).map_or(0, |i| i + 1);
        &self.events[..end]
    }
}
