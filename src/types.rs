// Strong typing over raw numbers. Newtypes for game time, aliases for the small integer ids
// the match history hands us.

use serde::{Deserialize, Serialize};

use crate::markers::MarkerFlags;

/// Participant id inside one match (1..=10 in a 5v5 game, 0 = no champion involved).
pub type ParticipantId = i64;

/// Team id (100 = blue side, 200 = red side).
pub type TeamId = i64;

/// Item id (0 = empty slot).
pub type ItemId = i64;

pub const BLUE_TEAM: TeamId = 100;
pub const RED_TEAM: TeamId = 200;

/// Game time in milliseconds since the in-game clock started. Newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    pub fn from_millis(ms: i64) -> Self {
        Timestamp(ms)
    }

    /// Fractional seconds as supplied by the playback driver. Rounds down to the millisecond.
    pub fn from_secs_f64(secs: f64) -> Self {
        if !secs.is_finite() {
            return if secs > 0.0 { Timestamp(i64::MAX) } else { Timestamp(i64::MIN) };
        }
        Timestamp((secs * 1000.0).floor() as i64)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }

    pub fn as_secs(&self) -> f64 {
        self.0 as f64 / 1000.0
    }
}

/// The other side of the map, if `team` is one of the two known sides.
pub fn opposing_team(team: TeamId) -> Option<TeamId> {
    match team {
        BLUE_TEAM => Some(RED_TEAM),
        RED_TEAM => Some(BLUE_TEAM),
        _ => None,
    }
}

/// One player slot of the match, as far as this engine cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub participant_id: ParticipantId,
    pub team_id: TeamId,
}

impl Participant {
    pub fn new(participant_id: ParticipantId, team_id: TeamId) -> Self {
        Participant {
            participant_id,
            team_id,
        }
    }
}

/// Team lookup for a match roster.
pub(crate) fn team_of(participants: &[Participant], id: ParticipantId) -> Option<TeamId> {
    participants
        .iter()
        .find(|p| p.participant_id == id)
        .map(|p| p.team_id)
}

/// Team credited with an objective: the killer's team, else the first assister with a known team.
pub(crate) fn credited_team(
    participants: &[Participant],
    killer: ParticipantId,
    assisters: &[ParticipantId],
) -> Option<TeamId> {
    team_of(participants, killer)
        .or_else(|| assisters.iter().find_map(|&id| team_of(participants, id)))
}

/// Objective chain whose next spawn is being forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveLane {
    /// Voidgrubs, then Rift Herald, then Baron Nashor.
    Baron,
    /// Elemental drakes, then the Elder Dragon.
    Dragon,
}

/// Viewer configuration passed from JS when a match is opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    /// Selects the objective ruleset.
    pub queue_id: i64,
    /// Game version handed to the price lookup.
    pub game_version: String,
    /// Participant whose kills, deaths and assists get markers.
    pub focus_participant: Option<ParticipantId>,
    /// Game time (seconds) at which the recording started.
    pub ingame_time_rec_start_offset: f64,
    pub marker_flags: MarkerFlags,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            queue_id: 420,
            game_version: String::new(),
            focus_participant: None,
            ingame_time_rec_start_offset: 0.0,
            marker_flags: MarkerFlags::default(),
        }
    }
}
