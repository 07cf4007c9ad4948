// Objective rulesets per queue. Spawn clocks differ between game modes; the forecaster only
// ever sees the ruleset picked here.

use serde::{Deserialize, Serialize};

/// When the Elder Dragon first becomes available.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElderSpawn {
    /// Elder takes over from regular drakes once this game time (seconds) has passed.
    Fixed(f64),
    /// Elder unlocks through dragon soul; not modelled by a clock.
    Dynamic,
}

/// Objective spawn rules for one match type. All times are seconds of game time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveConfig {
    pub has_grubs: bool,
    pub has_herald: bool,
    pub baron_spawn_time: f64,
    pub elder_spawn_time: ElderSpawn,
    pub dragon_interval: f64,
    pub baron_respawn_time: f64,
    pub elder_respawn_time: f64,
}

impl ObjectiveConfig {
    /// Summoner's Rift 5v5 (draft, ranked, blind, custom, practice tool).
    pub const STANDARD: ObjectiveConfig = ObjectiveConfig {
        has_grubs: true,
        has_herald: true,
        baron_spawn_time: 20.0 * 60.0,
        elder_spawn_time: ElderSpawn::Dynamic,
        dragon_interval: 5.0 * 60.0,
        baron_respawn_time: 6.0 * 60.0,
        elder_respawn_time: 6.0 * 60.0,
    };

    /// Swiftplay: no grubs or herald, earlier baron, elder on a clock.
    pub const SWIFTPLAY: ObjectiveConfig = ObjectiveConfig {
        has_grubs: false,
        has_herald: false,
        baron_spawn_time: 15.0 * 60.0,
        elder_spawn_time: ElderSpawn::Fixed(25.0 * 60.0),
        dragon_interval: 4.0 * 60.0,
        baron_respawn_time: 5.0 * 60.0,
        elder_respawn_time: 5.0 * 60.0,
    };

    /// Fixed elder clock, if this ruleset has one.
    pub fn fixed_elder_time(&self) -> Option<f64> {
        match self.elder_spawn_time {
            ElderSpawn::Fixed(secs) if secs > 0.0 => Some(secs),
            _ => None,
        }
    }
}

impl Default for ObjectiveConfig {
    fn default() -> Self {
        ObjectiveConfig::STANDARD
    }
}

const SWIFTPLAY_QUEUES: &[(i64, i64)] = &[(480, 480)];

/// Picks the ruleset for a queue id. Unknown ids fall back to the standard 5v5 rules.
pub fn select_objective_config(queue_id: i64) -> ObjectiveConfig {
    let is_swiftplay = SWIFTPLAY_QUEUES
        .iter()
        .any(|&(lo, hi)| (lo..=hi).contains(&queue_id));

    if is_swiftplay {
        ObjectiveConfig::SWIFTPLAY
    } else {
        ObjectiveConfig::STANDARD
    }
}
