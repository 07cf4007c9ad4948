// replay_engine: match replay state for the recording viewer.
// Rebuilds point-in-time game state (inventories, scoreboard, objective timers) from a
// recorded match's event log for whatever game time the video player is showing.

mod aggregate;
mod error;
mod events;
mod forecast;
mod inventory;
mod markers;
mod objectives;
mod types;

use std::collections::HashMap;

use serde::Deserialize;
use wasm_bindgen::prelude::*;

pub use aggregate::{
    compute_aggregates, AggregateSnapshot, GoldFrame, GoldTimeline, Kda, ParticipantGold,
    TeamTotals,
};
pub use error::EngineError;
pub use events::{
    BuildingType, DragonType, Event, EventLog, GameEvent, LaneType, MonsterType, Position,
};
pub use forecast::{forecast_next_spawn, SpawnForecast, SpawnKind, UpcomingSpawn};
pub use inventory::{InventoryState, InventoryTimeline, ParticipantTimeline};
pub use markers::{timeline_markers, Marker, MarkerFlags, MarkerKind};
pub use objectives::{select_objective_config, ElderSpawn, ObjectiveConfig};
pub use types::*;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Match metadata as written next to the recording.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchMetadata {
    participants: Vec<Participant>,
    #[serde(default)]
    events: Vec<serde_json::Value>,
    #[serde(default)]
    gold_timeline: Vec<GoldFrame>,
}

/// Parses events one by one; anything this engine cannot read is skipped.
fn parse_events(raw: Vec<serde_json::Value>) -> Vec<GameEvent> {
    let total = raw.len();
    let events: Vec<GameEvent> = raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable event");
                None
            }
        })
        .collect();
    tracing::debug!(total, kept = events.len(), "parsed match events");
    events
}

fn parse_lane(lane: &str) -> Result<ObjectiveLane, EngineError> {
    match lane {
        "baron" => Ok(ObjectiveLane::Baron),
        "dragon" => Ok(ObjectiveLane::Dragon),
        other => Err(EngineError::UnknownLane(other.to_string())),
    }
}

fn js_error(err: EngineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Replay state of one opened match, exposed to JavaScript.
///
/// Everything is built once in the constructor; every query is a pure function of the
/// requested time, so frame ticks and seeks can arrive in any order. Opening another match
/// means constructing a new viewer.
#[wasm_bindgen]
pub struct MatchViewer {
    config: ViewerConfig,
    objectives: ObjectiveConfig,
    participants: Vec<Participant>,
    log: EventLog,
    inventory: InventoryTimeline,
    gold: GoldTimeline,
    prices: HashMap<ItemId, i64>,
    markers: Vec<Marker>,
}

#[wasm_bindgen]
impl MatchViewer {
    #[wasm_bindgen(constructor)]
    pub fn new(metadata_json: &str, config_json: &str) -> Result<MatchViewer, JsValue> {
        MatchViewer::from_json(metadata_json, config_json).map_err(js_error)
    }

    /// Item prices for this match's game version, as `{ "<itemId>": price }`.
    pub fn set_price_table(&mut self, prices_json: &str) -> Result<(), JsValue> {
        self.set_price_table_json(prices_json).map_err(js_error)
    }

    /// Inventory of a participant at `t_ms` game milliseconds, or `null` if unknown.
    pub fn inventory_at(&self, participant_id: i32, t_ms: f64) -> Result<String, JsValue> {
        let t = Timestamp::from_millis(t_ms.floor() as i64);
        self.inventory_json(participant_id as ParticipantId, t)
            .map_err(js_error)
    }

    /// Scoreboard at `t_secs`, items priced with the price table.
    pub fn aggregates_at(&self, t_secs: f64) -> Result<String, JsValue> {
        self.aggregates_json(t_secs).map_err(js_error)
    }

    /// Scoreboard at `t_secs`, items priced by calling `price_fn(itemId, version)`.
    pub fn aggregates_at_with(
        &self,
        t_secs: f64,
        price_fn: &js_sys::Function,
    ) -> Result<String, JsValue> {
        let price = |item: ItemId, version: &str| {
            price_fn
                .call2(
                    &JsValue::NULL,
                    &JsValue::from_f64(item as f64),
                    &JsValue::from_str(version),
                )
                .ok()
                .and_then(|value| value.as_f64())
                .map_or(0, |value| value as i64)
        };
        serde_json::to_string(&self.aggregates_with(t_secs, price))
            .map_err(|e| js_error(e.into()))
    }

    /// Next spawn of `lane` ("baron" or "dragon") at `t_secs`.
    pub fn forecast_at(&self, t_secs: f64, lane: &str) -> Result<String, JsValue> {
        self.forecast_json(t_secs, lane).map_err(js_error)
    }

    /// Seek-bar markers for the whole match.
    pub fn markers(&self) -> Result<String, JsValue> {
        self.markers_json().map_err(js_error)
    }
}

impl MatchViewer {
    pub fn from_json(metadata_json: &str, config_json: &str) -> Result<Self, EngineError> {
        let metadata: MatchMetadata = serde_json::from_str(metadata_json)
            .map_err(|e| EngineError::InvalidMetadata(e.to_string()))?;
        let config: ViewerConfig = if config_json.trim().is_empty() {
            ViewerConfig::default()
        } else {
            serde_json::from_str(config_json)
                .map_err(|e| EngineError::InvalidConfig(e.to_string()))?
        };

        Ok(MatchViewer::from_parts(
            metadata.participants,
            parse_events(metadata.events),
            metadata.gold_timeline,
            config,
        ))
    }

    pub fn from_parts(
        participants: Vec<Participant>,
        events: Vec<GameEvent>,
        gold_frames: Vec<GoldFrame>,
        config: ViewerConfig,
    ) -> Self {
        let ids: Vec<ParticipantId> = participants.iter().map(|p| p.participant_id).collect();
        let log = EventLog::new(events);
        let inventory = InventoryTimeline::build(log.events(), &ids);
        let objectives = select_objective_config(config.queue_id);
        let markers = timeline_markers(
            &log,
            &participants,
            config.focus_participant,
            &config.marker_flags,
            config.ingame_time_rec_start_offset,
        );

        tracing::debug!(
            queue_id = config.queue_id,
            participants = participants.len(),
            events = log.len(),
            "opened match"
        );

        MatchViewer {
            config,
            objectives,
            participants,
            log,
            inventory,
            gold: GoldTimeline::new(gold_frames),
            prices: HashMap::new(),
            markers,
        }
    }

    pub fn set_price_table_json(&mut self, prices_json: &str) -> Result<(), EngineError> {
        self.prices = serde_json::from_str(prices_json)
            .map_err(|e| EngineError::InvalidPriceTable(e.to_string()))?;
        Ok(())
    }

    pub fn objective_config(&self) -> &ObjectiveConfig {
        &self.objectives
    }

    pub fn inventory(&self, participant: ParticipantId, t: Timestamp) -> Option<&InventoryState> {
        self.inventory.state_at(participant, t)
    }

    pub fn inventory_json(
        &self,
        participant: ParticipantId,
        t: Timestamp,
    ) -> Result<String, EngineError> {
        Ok(serde_json::to_string(&self.inventory(participant, t))?)
    }

    /// Scoreboard at `t_secs` with a caller-supplied price lookup.
    pub fn aggregates_with<P>(&self, t_secs: f64, price: P) -> AggregateSnapshot
    where
        P: Fn(ItemId, &str) -> i64,
    {
        let snapshot = compute_aggregates(
            &self.log,
            t_secs,
            &self.participants,
            &self.inventory,
            price,
            &self.config.game_version,
        );
        if self.gold.is_empty() {
            snapshot
        } else {
            let t = Timestamp::from_secs_f64(t_secs);
            snapshot.with_earned_gold(&self.gold, &self.participants, t)
        }
    }

    pub fn aggregates(&self, t_secs: f64) -> AggregateSnapshot {
        self.aggregates_with(t_secs, |item, _| self.prices.get(&item).copied().unwrap_or(0))
    }

    pub fn aggregates_json(&self, t_secs: f64) -> Result<String, EngineError> {
        Ok(serde_json::to_string(&self.aggregates(t_secs))?)
    }

    pub fn forecast(&self, t_secs: f64, lane: ObjectiveLane) -> SpawnForecast {
        forecast_next_spawn(&self.log, t_secs, &self.objectives, lane)
    }

    pub fn forecast_json(&self, t_secs: f64, lane: &str) -> Result<String, EngineError> {
        let lane = parse_lane(lane)?;
        Ok(serde_json::to_string(&self.forecast(t_secs, lane))?)
    }

    pub fn timeline_markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn markers_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string(&self.markers)?)
    }
}
