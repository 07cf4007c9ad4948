// Seek-bar markers: the moments of a match worth jumping to, placed on the video timeline.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::events::{Event, EventLog, MonsterType};
use crate::types::{credited_team, opposing_team, team_of, Participant, ParticipantId, TeamId};

/// Which marker kinds the viewer wants.
///
/// Deserializing never fails on the individual flags: absent keys and values that are not
/// booleans leave the flag enabled, unknown keys are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerFlags {
    pub kill: bool,
    pub death: bool,
    pub assist: bool,
    pub structure: bool,
    pub dragon: bool,
    pub voidgrub: bool,
    pub herald: bool,
    pub baron: bool,
}

impl Default for MarkerFlags {
    fn default() -> Self {
        MarkerFlags {
            kill: true,
            death: true,
            assist: true,
            structure: true,
            dragon: true,
            voidgrub: true,
            herald: true,
            baron: true,
        }
    }
}

impl<'de> Deserialize<'de> for MarkerFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MarkerFlagsVisitor;

        impl<'de> Visitor<'de> for MarkerFlagsVisitor {
            type Value = MarkerFlags;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of marker flags")
            }

            fn visit_map<A>(self, mut map: A) -> Result<MarkerFlags, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut flags = MarkerFlags::default();

                while let Some(key) = map.next_key::<String>()? {
                    // The value is always consumed, even for keys we do not know.
                    let enabled = map
                        .next_value::<serde_json::Value>()?
                        .as_bool()
                        .unwrap_or(true);
                    let flag = match key.as_str() {
                        "kill" => &mut flags.kill,
                        "death" => &mut flags.death,
                        "assist" => &mut flags.assist,
                        "structure" => &mut flags.structure,
                        "dragon" => &mut flags.dragon,
                        "voidgrub" => &mut flags.voidgrub,
                        "herald" => &mut flags.herald,
                        "baron" => &mut flags.baron,
                        _ => continue,
                    };
                    *flag = enabled;
                }

                Ok(flags)
            }
        }

        deserializer.deserialize_map(MarkerFlagsVisitor)
    }
}

impl MarkerFlags {
    fn allows(&self, kind: MarkerKind) -> bool {
        match kind {
            MarkerKind::Kill => self.kill,
            MarkerKind::Death => self.death,
            MarkerKind::Assist => self.assist,
            MarkerKind::Structure => self.structure,
            MarkerKind::Dragon => self.dragon,
            MarkerKind::Voidgrub => self.voidgrub,
            MarkerKind::Herald => self.herald,
            MarkerKind::Baron => self.baron,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Kill,
    Death,
    Assist,
    Structure,
    Dragon,
    Voidgrub,
    Herald,
    Baron,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub kind: MarkerKind,
    /// Seconds of game time.
    pub game_time: f64,
    /// Seconds into the recording.
    pub video_time: f64,
    /// Team credited with the kill, when known.
    pub team_id: Option<TeamId>,
}

/// Markers for the whole match, in chronological order.
///
/// `rec_start_offset` is the game time (seconds) at which the recording started. Champion
/// markers are only produced for `focus`; structure and monster markers are produced for both
/// teams.
pub fn timeline_markers(
    log: &EventLog,
    participants: &[Participant],
    focus: Option<ParticipantId>,
    flags: &MarkerFlags,
    rec_start_offset: f64,
) -> Vec<Marker> {
    let mut markers = Vec::new();

    for event in log.events() {
        let game_time = event.timestamp.as_secs();
        let video_time = game_time - rec_start_offset;
        if video_time < 0.0 {
            continue;
        }

        let mut push = |kind: MarkerKind, team_id: Option<TeamId>| {
            if flags.allows(kind) {
                markers.push(Marker {
                    kind,
                    game_time,
                    video_time,
                    team_id,
                });
            }
        };

        match &event.event {
            Event::ChampionKill {
                victim_id,
                killer_id,
                assisting_participant_ids,
                ..
            } => {
                let Some(focus) = focus else { continue };
                let killer_team = team_of(participants, *killer_id);
                if *killer_id == focus {
                    push(MarkerKind::Kill, killer_team);
                } else if *victim_id == focus {
                    push(MarkerKind::Death, killer_team);
                } else if assisting_participant_ids.contains(&focus) {
                    push(MarkerKind::Assist, killer_team);
                }
            }
            Event::BuildingKill { team_id, .. } => {
                push(MarkerKind::Structure, opposing_team(*team_id));
            }
            Event::EliteMonsterKill {
                killer_id,
                monster_type,
                assisting_participant_ids,
                ..
            } => {
                let kind = match monster_type {
                    MonsterType::Horde => MarkerKind::Voidgrub,
                    MonsterType::Riftherald => MarkerKind::Herald,
                    MonsterType::BaronNashor => MarkerKind::Baron,
                    MonsterType::Dragon => MarkerKind::Dragon,
                    MonsterType::Other => continue,
                };
                push(
                    kind,
                    credited_team(participants, *killer_id, assisting_participant_ids),
                );
            }
            Event::ItemPurchased { .. } | Event::ItemSold { .. } | Event::ItemUndo { .. } => {}
        }
    }

    tracing::debug!(count = markers.len(), ?focus, "built timeline markers");
    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{BuildingType, GameEvent};

    fn roster() -> Vec<Participant> {
        (1..=10)
            .map(|id| Participant::new(id, if id <= 5 { 100 } else { 200 }))
            .collect()
    }

    fn champion_kill(
        ts: i64,
        killer: ParticipantId,
        victim: ParticipantId,
        assists: Vec<ParticipantId>,
    ) -> GameEvent {
        GameEvent::new(
            ts,
            Event::ChampionKill {
                victim_id: victim,
                killer_id: killer,
                assisting_participant_ids: assists,
                position: Default::default(),
            },
        )
    }

    fn log() -> EventLog {
        EventLog::new(vec![
            champion_kill(5_000, 1, 6, vec![]),
            champion_kill(200_000, 7, 1, vec![]),
            champion_kill(300_000, 2, 8, vec![1]),
            champion_kill(310_000, 3, 9, vec![4]),
            GameEvent::new(
                400_000,
                Event::BuildingKill {
                    team_id: 200,
                    killer_id: 2,
                    building_type: BuildingType::TowerBuilding,
                    lane_type: None,
                    assisting_participant_ids: vec![],
                },
            ),
            GameEvent::new(
                500_000,
                Event::EliteMonsterKill {
                    killer_id: 0,
                    monster_type: MonsterType::Horde,
                    monster_sub_type: None,
                    assisting_participant_ids: vec![7],
                },
            ),
        ])
    }

    fn kinds(markers: &[Marker]) -> Vec<MarkerKind> {
        markers.iter().map(|m| m.kind).collect()
    }

    #[test]
    fn focus_perspective_markers() {
        let markers = timeline_markers(&log(), &roster(), Some(1), &MarkerFlags::default(), 0.0);
        assert_eq!(
            kinds(&markers),
            vec![
                MarkerKind::Kill,
                MarkerKind::Death,
                MarkerKind::Assist,
                MarkerKind::Structure,
                MarkerKind::Voidgrub,
            ]
        );
        assert_eq!(markers[1].team_id, Some(200));
        assert_eq!(markers[3].team_id, Some(100));
        assert_eq!(markers[4].team_id, Some(200));
    }

    #[test]
    fn offset_moves_markers_and_drops_pre_recording_ones() {
        let markers = timeline_markers(&log(), &roster(), Some(1), &MarkerFlags::default(), 10.0);
        assert_eq!(markers[0].kind, MarkerKind::Death);
        assert_eq!(markers[0].game_time, 200.0);
        assert_eq!(markers[0].video_time, 190.0);
    }

    #[test]
    fn flags_filter_kinds() {
        let flags = MarkerFlags {
            kill: false,
            structure: false,
            ..MarkerFlags::default()
        };
        let markers = timeline_markers(&log(), &roster(), Some(1), &flags, 0.0);
        assert_eq!(
            kinds(&markers),
            vec![MarkerKind::Death, MarkerKind::Assist, MarkerKind::Voidgrub]
        );
    }

    #[test]
    fn without_focus_only_objectives() {
        let markers = timeline_markers(&log(), &roster(), None, &MarkerFlags::default(), 0.0);
        assert_eq!(kinds(&markers), vec![MarkerKind::Structure, MarkerKind::Voidgrub]);
    }

    #[test]
    fn flags_default_missing_keys() {
        let flags: MarkerFlags = serde_json::from_str(r#"{"baron": false, "unknown": 1}"#).unwrap();
        assert!(!flags.baron);
        assert!(flags.kill);
    }

    #[test]
    fn malformed_flag_values_stay_enabled() {
        let flags: MarkerFlags = serde_json::from_str(
            r#"{"kill": "yes", "death": null, "assist": [false], "herald": {"x": 1}, "dragon": false}"#,
        )
        .unwrap();
        assert_eq!(
            flags,
            MarkerFlags {
                dragon: false,
                ..MarkerFlags::default()
            }
        );
    }
}
