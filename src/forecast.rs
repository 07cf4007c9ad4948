// Objective spawn forecasting. Recomputed from the event log on every call so scrubbing in
// either direction gives the same answer as playing forward.

use serde::{Deserialize, Serialize};

use crate::events::{Event, EventLog, GameEvent, MonsterType};
use crate::objectives::ObjectiveConfig;
use crate::types::{ObjectiveLane, Timestamp};

/// Voidgrubs first spawn (8:00).
pub const GRUB_SPAWN_TIME: f64 = 8.0 * 60.0;
/// Rift Herald spawn (15:00).
pub const HERALD_SPAWN_TIME: f64 = 15.0 * 60.0;
/// First drake (5:00), identical for every ruleset.
pub const FIRST_DRAGON_SPAWN_TIME: f64 = 5.0 * 60.0;

/// Without any baron-lane kill: grubs are forecast until 14:45, herald until 19:00.
const HERALD_PHASE_START: f64 = 14.0 * 60.0 + 45.0;
const BARON_PHASE_START: f64 = 19.0 * 60.0;

pub const BARON_BUFF_DURATION: f64 = 180.0;
pub const ELDER_BUFF_DURATION: f64 = 150.0;

/// How early the spawn after the current one gets pre-announced.
pub const LOOKAHEAD_WINDOW: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpawnKind {
    Grub,
    Herald,
    Baron,
    Dragon,
}

/// A spawn that follows the forecast one and is close to due.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingSpawn {
    pub kind: SpawnKind,
    pub due_time: f64,
}

/// Next objective of one lane at a given game time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnForecast {
    /// Game time in seconds.
    pub due_time: f64,
    pub kind: SpawnKind,
    /// Already spawned (`due_time <= now`).
    pub is_live: bool,
    /// Dragon lane only: the forecast dragon is the Elder Dragon.
    pub is_elder: bool,
    /// Baron (baron lane) or Elder (dragon lane) buff still running.
    pub buff_active: bool,
    pub buff_remaining: f64,
    pub upcoming: Option<UpcomingSpawn>,
}

impl SpawnForecast {
    fn new(kind: SpawnKind, due_time: f64, now: f64) -> Self {
        SpawnForecast {
            due_time,
            kind,
            is_live: due_time <= now,
            is_elder: false,
            buff_active: false,
            buff_remaining: 0.0,
            upcoming: None,
        }
    }

    /// Marks a buff taken at `kill_time` as active if it still runs at `now`.
    fn with_buff(mut self, kill_time: Option<f64>, duration: f64, now: f64) -> Self {
        if let Some(kill_time) = kill_time {
            let elapsed = now - kill_time;
            if (0.0..duration).contains(&elapsed) {
                self.buff_active = true;
                self.buff_remaining = duration - elapsed;
            }
        }
        self
    }
}

/// Elite monster kills that happened at or before `now`, oldest first.
fn monster_kills(log: &EventLog, now: f64) -> impl Iterator<Item = (&GameEvent, MonsterType)> + '_ {
    log.until(Timestamp::from_secs_f64(now))
        .iter()
        .filter_map(|e| match e.event {
            Event::EliteMonsterKill { monster_type, .. } => Some((e, monster_type)),
            _ => None,
        })
}

/// Forecasts the next spawn of `lane` at game time `now` (seconds).
pub fn forecast_next_spawn(
    log: &EventLog,
    now: f64,
    config: &ObjectiveConfig,
    lane: ObjectiveLane,
) -> SpawnForecast {
    let forecast = match lane {
        ObjectiveLane::Baron => forecast_baron_lane(log, now, config),
        ObjectiveLane::Dragon => forecast_dragon_lane(log, now, config),
    };
    tracing::trace!(?lane, now, due = forecast.due_time, kind = ?forecast.kind, "forecast");
    forecast
}

fn forecast_baron_lane(log: &EventLog, now: f64, config: &ObjectiveConfig) -> SpawnForecast {
    let mut last_kill: Option<(MonsterType, f64)> = None;
    let mut last_baron: Option<f64> = None;

    for (event, monster) in monster_kills(log, now) {
        let at = event.timestamp.as_secs();
        match monster {
            MonsterType::Horde | MonsterType::Riftherald => last_kill = Some((monster, at)),
            MonsterType::BaronNashor => {
                last_kill = Some((monster, at));
                last_baron = Some(at);
            }
            MonsterType::Dragon | MonsterType::Other => {}
        }
    }

    let (kind, due_time) = match last_kill {
        Some((MonsterType::Horde, _)) => (SpawnKind::Herald, HERALD_SPAWN_TIME),
        Some((MonsterType::Riftherald, _)) => (SpawnKind::Baron, config.baron_spawn_time),
        Some((_, killed_at)) => (SpawnKind::Baron, killed_at + config.baron_respawn_time),
        None if !config.has_grubs && !config.has_herald => {
            (SpawnKind::Baron, config.baron_spawn_time)
        }
        None if now < HERALD_PHASE_START => (SpawnKind::Grub, GRUB_SPAWN_TIME),
        None if now < BARON_PHASE_START => (SpawnKind::Herald, HERALD_SPAWN_TIME),
        None => (SpawnKind::Baron, config.baron_spawn_time),
    };

    let mut forecast =
        SpawnForecast::new(kind, due_time, now).with_buff(last_baron, BARON_BUFF_DURATION, now);

    if config.has_grubs {
        let following = match kind {
            SpawnKind::Grub => Some((SpawnKind::Herald, HERALD_SPAWN_TIME)),
            SpawnKind::Herald => Some((SpawnKind::Baron, config.baron_spawn_time)),
            SpawnKind::Baron | SpawnKind::Dragon => None,
        };
        forecast.upcoming = following
            .filter(|&(_, due)| now >= due - LOOKAHEAD_WINDOW && now < due)
            .map(|(kind, due_time)| UpcomingSpawn { kind, due_time });
    }

    forecast
}

fn forecast_dragon_lane(log: &EventLog, now: f64, config: &ObjectiveConfig) -> SpawnForecast {
    let mut last_dragon: Option<(f64, bool)> = None;
    let mut last_elder: Option<f64> = None;

    for (event, monster) in monster_kills(log, now) {
        if monster != MonsterType::Dragon {
            continue;
        }
        let at = event.timestamp.as_secs();
        let elder = event.is_elder_kill();
        if elder {
            last_elder = Some(at);
        }
        last_dragon = Some((at, elder));
    }

    let (due_time, is_elder) = match last_dragon {
        None => (FIRST_DRAGON_SPAWN_TIME, false),
        Some((killed_at, true)) => (killed_at + config.elder_respawn_time, true),
        Some((killed_at, false)) => {
            let candidate = killed_at + config.dragon_interval;
            match config.fixed_elder_time() {
                Some(elder_time) if candidate >= elder_time => (candidate.max(elder_time), true),
                _ => (candidate, false),
            }
        }
    };

    let mut forecast = SpawnForecast::new(SpawnKind::Dragon, due_time, now)
        .with_buff(last_elder, ELDER_BUFF_DURATION, now);
    forecast.is_elder = is_elder;
    forecast
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::DragonType;
    use crate::objectives::{select_objective_config, ElderSpawn};
    use crate::types::ParticipantId;

    fn kill(
        secs: i64,
        killer: ParticipantId,
        monster: MonsterType,
        sub: Option<DragonType>,
    ) -> GameEvent {
        GameEvent::new(
            secs * 1000,
            Event::EliteMonsterKill {
                killer_id: killer,
                monster_type: monster,
                monster_sub_type: sub,
                assisting_participant_ids: vec![],
            },
        )
    }

    fn drake(secs: i64) -> GameEvent {
        kill(secs, 1, MonsterType::Dragon, Some(DragonType::FireDragon))
    }

    fn elder(secs: i64) -> GameEvent {
        kill(secs, 1, MonsterType::Dragon, Some(DragonType::ElderDragon))
    }

    fn baron_lane(events: Vec<GameEvent>, now: f64) -> SpawnForecast {
        forecast_next_spawn(
            &EventLog::new(events),
            now,
            &ObjectiveConfig::STANDARD,
            ObjectiveLane::Baron,
        )
    }

    fn dragon_lane(events: Vec<GameEvent>, now: f64, config: &ObjectiveConfig) -> SpawnForecast {
        forecast_next_spawn(&EventLog::new(events), now, config, ObjectiveLane::Dragon)
    }

    #[test]
    fn grubs_killed_forecasts_herald() {
        let forecast = baron_lane(vec![kill(300, 3, MonsterType::Horde, None)], 310.0);
        assert_eq!(forecast.kind, SpawnKind::Herald);
        assert_eq!(forecast.due_time, 900.0);
        assert!(!forecast.is_live);
    }

    #[test]
    fn bootstrap_grub_is_live_at_ten_minutes() {
        let forecast = baron_lane(vec![], 600.0);
        assert_eq!(forecast.kind, SpawnKind::Grub);
        assert_eq!(forecast.due_time, 480.0);
        assert!(forecast.is_live);
        assert!(forecast.upcoming.is_none());
    }

    #[test]
    fn bootstrap_phases() {
        assert_eq!(baron_lane(vec![], 884.0).kind, SpawnKind::Grub);
        assert_eq!(baron_lane(vec![], 885.0).kind, SpawnKind::Herald);
        let late = baron_lane(vec![], 1140.0);
        assert_eq!(late.kind, SpawnKind::Baron);
        assert_eq!(late.due_time, 1200.0);
    }

    #[test]
    fn lookahead_announces_herald_and_baron() {
        let grub = baron_lane(vec![], 780.0);
        assert_eq!(
            grub.upcoming,
            Some(UpcomingSpawn {
                kind: SpawnKind::Herald,
                due_time: 900.0
            })
        );
        assert!(baron_lane(vec![], 779.0).upcoming.is_none());

        let herald = baron_lane(vec![], 1100.0);
        assert_eq!(herald.kind, SpawnKind::Herald);
        assert_eq!(
            herald.upcoming,
            Some(UpcomingSpawn {
                kind: SpawnKind::Baron,
                due_time: 1200.0
            })
        );
    }

    #[test]
    fn lookahead_stops_once_the_next_spawn_is_due() {
        let grubs_taken = vec![kill(500, 3, MonsterType::Horde, None)];

        let before = baron_lane(grubs_taken.clone(), 1199.0);
        assert_eq!(before.upcoming.map(|u| u.kind), Some(SpawnKind::Baron));

        let at_due = baron_lane(grubs_taken.clone(), 1200.0);
        assert_eq!(at_due.kind, SpawnKind::Herald);
        assert!(at_due.upcoming.is_none());

        let late = baron_lane(grubs_taken, 1500.0);
        assert_eq!(late.kind, SpawnKind::Herald);
        assert_eq!(late.due_time, 900.0);
        assert!(late.upcoming.is_none());

        assert!(baron_lane(vec![], 900.0).upcoming.is_none());
    }

    #[test]
    fn no_lookahead_without_grubs() {
        let config = ObjectiveConfig {
            has_grubs: false,
            ..ObjectiveConfig::STANDARD
        };
        let forecast =
            forecast_next_spawn(&EventLog::new(vec![]), 800.0, &config, ObjectiveLane::Baron);
        assert_eq!(forecast.kind, SpawnKind::Grub);
        assert!(forecast.upcoming.is_none());
    }

    #[test]
    fn herald_kill_forecasts_first_baron() {
        let forecast = baron_lane(vec![kill(920, 7, MonsterType::Riftherald, None)], 1000.0);
        assert_eq!(forecast.kind, SpawnKind::Baron);
        assert_eq!(forecast.due_time, 1200.0);
    }

    #[test]
    fn baron_buff_then_respawn() {
        let events = vec![kill(1000, 8, MonsterType::BaronNashor, None)];

        let during = baron_lane(events.clone(), 1100.0);
        assert!(during.buff_active);
        assert_eq!(during.buff_remaining, 80.0);

        let after = baron_lane(events, 1200.0);
        assert!(!after.buff_active);
        assert_eq!(after.kind, SpawnKind::Baron);
        assert_eq!(after.due_time, 1000.0 + ObjectiveConfig::STANDARD.baron_respawn_time);
    }

    #[test]
    fn scrubbing_back_before_a_kill_forgets_it() {
        let events = vec![kill(1000, 8, MonsterType::BaronNashor, None)];
        let before = baron_lane(events.clone(), 999.0);
        assert!(!before.buff_active);
        assert_eq!(before.kind, SpawnKind::Herald);
        assert_eq!(baron_lane(events, 1100.0).due_time, 1360.0);
    }

    #[test]
    fn modes_without_grubs_or_herald_start_on_baron() {
        let config = select_objective_config(480);
        let forecast =
            forecast_next_spawn(&EventLog::new(vec![]), 60.0, &config, ObjectiveLane::Baron);
        assert_eq!(forecast.kind, SpawnKind::Baron);
        assert_eq!(forecast.due_time, config.baron_spawn_time);
    }

    #[test]
    fn first_dragon_at_five_minutes() {
        let forecast = dragon_lane(vec![], 10.0, &select_objective_config(480));
        assert_eq!(forecast.kind, SpawnKind::Dragon);
        assert_eq!(forecast.due_time, 300.0);
        assert!(!forecast.is_elder);
    }

    #[test]
    fn dynamic_elder_keeps_regular_interval() {
        let forecast = dragon_lane(vec![drake(2000)], 2010.0, &ObjectiveConfig::STANDARD);
        assert_eq!(forecast.due_time, 2300.0);
        assert!(!forecast.is_elder);
    }

    #[test]
    fn fixed_elder_supersedes_drakes() {
        let config = ObjectiveConfig {
            elder_spawn_time: ElderSpawn::Fixed(1500.0),
            ..ObjectiveConfig::STANDARD
        };

        let early = dragon_lane(vec![drake(600)], 700.0, &config);
        assert_eq!(early.due_time, 900.0);
        assert!(!early.is_elder);

        let late = dragon_lane(vec![drake(1300)], 1310.0, &config);
        assert_eq!(late.due_time, 1600.0);
        assert!(late.is_elder);
    }

    #[test]
    fn elder_buff_and_respawn() {
        let events = vec![drake(1200), elder(2000)];
        let config = ObjectiveConfig::STANDARD;

        let during = dragon_lane(events.clone(), 2100.0, &config);
        assert!(during.buff_active);
        assert_eq!(during.buff_remaining, 50.0);
        assert!(during.is_elder);
        assert_eq!(during.due_time, 2000.0 + config.elder_respawn_time);

        let after = dragon_lane(events, 2150.0, &config);
        assert!(!after.buff_active);
        assert!(!after.is_live);
    }

    #[test]
    fn dragon_kills_do_not_touch_baron_lane() {
        let forecast = baron_lane(vec![drake(300), elder(1900)], 1950.0);
        assert_eq!(forecast.kind, SpawnKind::Baron);
        assert!(!forecast.buff_active);
    }

    #[test]
    fn forecast_serializes_camel_case() {
        let json = serde_json::to_value(baron_lane(vec![], 600.0)).unwrap();
        assert_eq!(json["kind"], "grub");
        assert_eq!(json["dueTime"], 480.0);
        assert_eq!(json["isLive"], true);
    }
}
