// Inventory timelines: replays purchase/sell/undo events per participant into an append-only
// list of immutable snapshots, then answers "inventory at time t" for any t, in any order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::events::{Event, GameEvent};
use crate::types::{ItemId, ParticipantId, Timestamp};

/// Number of regular item slots (0..=5). Slot 6 is the trinket.
pub const ITEM_SLOTS: usize = 6;
pub const TRINKET_SLOT: i64 = 6;

/// Control Ward. Bought into a regular slot even though it is a ward.
pub const CONTROL_WARD: ItemId = 2055;

/// Items that always live in the trinket slot.
pub const TRINKET_ITEMS: [ItemId; 5] = [
    3330, // Scarecrow Effigy
    3340, // Stealth Ward
    3363, // Farsight Alteration
    3364, // Oracle Lens
    3513, // Eye of the Herald
];

pub fn is_trinket(item: ItemId) -> bool {
    item != CONTROL_WARD && TRINKET_ITEMS.contains(&item)
}

/// Inventory of one participant at one point in time.
///
/// `items` never grows past six entries. Sold items are zeroed in place rather than removed
/// so an item keeps its slot index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct InventoryState {
    pub items: Vec<ItemId>,
    pub trinket: ItemId,
}

impl InventoryState {
    pub fn empty() -> Self {
        InventoryState::default()
    }

    /// Item in a regular slot, 0 if the slot is empty or was never filled.
    pub fn slot(&self, slot: usize) -> ItemId {
        self.items.get(slot).copied().unwrap_or(0)
    }

    /// Every non-empty item id, trinket included.
    pub fn held_items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items
            .iter()
            .copied()
            .chain(std::iter::once(self.trinket))
            .filter(|&id| id != 0)
    }

    fn purchase(&mut self, item: ItemId, slot: Option<i64>) {
        if is_trinket(item) {
            self.trinket = item;
            return;
        }

        match slot {
            Some(s) if (0..ITEM_SLOTS as i64).contains(&s) => {
                let s = s as usize;
                if self.items.len() <= s {
                    self.items.resize(s + 1, 0);
                }
                self.items[s] = item;
            }
            Some(TRINKET_SLOT) if item != CONTROL_WARD => self.trinket = item,
            _ => self.place_in_first_free_slot(item),
        }
    }

    /// Fallback placement for events without a usable slot.
    fn place_in_first_free_slot(&mut self, item: ItemId) {
        if let Some(free) = self.items.iter_mut().find(|id| **id == 0) {
            *free = item;
        } else if self.items.len() < ITEM_SLOTS {
            self.items.push(item);
        } else {
            tracing::trace!(item, "inventory full, dropping purchase");
        }
    }

    fn sell(&mut self, item: ItemId, slot: Option<i64>) {
        if self.trinket == item {
            self.trinket = 0;
            return;
        }

        if let Some(s) = slot.filter(|s| (0..ITEM_SLOTS as i64).contains(s)) {
            let s = s as usize;
            if self.items.get(s) == Some(&item) {
                self.items[s] = 0;
                return;
            }
        }

        if let Some(held) = self.items.iter_mut().find(|id| **id == item) {
            *held = 0;
        } else {
            tracing::trace!(item, "sold item not in inventory");
        }
    }

    /// "The slot that held `after` now holds `before`".
    fn undo(&mut self, before: ItemId, after: ItemId) {
        match (before, after) {
            (0, 0) => {}
            (0, after) => self.sell(after, None),
            (before, 0) => self.purchase(before, None),
            (before, after) => {
                self.sell(after, None);
                self.purchase(before, None);
            }
        }
    }

    /// Applies one item event. Non-item events leave the state untouched.
    fn apply(&mut self, event: &Event) {
        match *event {
            Event::ItemPurchased { item_id, slot, .. } => self.purchase(item_id, slot),
            Event::ItemSold { item_id, slot, .. } => self.sell(item_id, slot),
            Event::ItemUndo {
                before_id,
                after_id,
                ..
            } => self.undo(before_id, after_id),
            Event::ChampionKill { .. }
            | Event::BuildingKill { .. }
            | Event::EliteMonsterKill { .. } => {}
        }
    }
}

fn item_event_owner(event: &Event) -> Option<ParticipantId> {
    match *event {
        Event::ItemPurchased { participant_id, .. }
        | Event::ItemSold { participant_id, .. }
        | Event::ItemUndo { participant_id, .. } => Some(participant_id),
        Event::ChampionKill { .. }
        | Event::BuildingKill { .. }
        | Event::EliteMonsterKill { .. } => None,
    }
}

/// Append-only list of `(timestamp, state)` snapshots for one participant.
/// Always starts with `(0, empty)`; timestamps never decrease.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantTimeline {
    snapshots: Vec<(Timestamp, InventoryState)>,
}

impl ParticipantTimeline {
    fn new() -> Self {
        ParticipantTimeline {
            snapshots: vec![(Timestamp::ZERO, InventoryState::empty())],
        }
    }

    fn latest(&self) -> &InventoryState {
        // Never empty: constructed with the initial snapshot and only appended to.
        &self.snapshots[self.snapshots.len() - 1].1
    }

    fn push(&mut self, at: Timestamp, state: InventoryState) {
        // Events before the game clock started collapse onto the initial snapshot's time.
        let at = at.max(Timestamp::ZERO);
        self.snapshots.push((at, state));
    }

    pub fn snapshots(&self) -> &[(Timestamp, InventoryState)] {
        &self.snapshots
    }

    /// State of the latest snapshot at or before `t`; the initial empty state if `t` precedes
    /// every snapshot.
    pub fn state_at(&self, t: Timestamp) -> &InventoryState {
        let idx = self.snapshots.partition_point(|(ts, _)| *ts <= t);
        &self.snapshots[idx.saturating_sub(1)].1
    }
}

/// Inventory timelines for every participant of one match.
///
/// Built once when a match is opened and never mutated afterwards; a new match gets a new
/// instance.
#[derive(Debug, Clone, Default)]
pub struct InventoryTimeline {
    timelines: BTreeMap<ParticipantId, ParticipantTimeline>,
}

impl InventoryTimeline {
    /// Builds timelines with event participant ids taken as-is.
    pub fn build(events: &[GameEvent], participant_ids: &[ParticipantId]) -> Self {
        Self::build_with_remap(events, participant_ids, |id| id)
    }

    /// Builds timelines, mapping each event's participant id through `remap` first.
    ///
    /// The hook exists for recordings whose timeline ids do not line up with the roster ids;
    /// no such mapping is applied by default.
    pub fn build_with_remap<F>(
        events: &[GameEvent],
        participant_ids: &[ParticipantId],
        remap: F,
    ) -> Self
    where
        F: Fn(ParticipantId) -> ParticipantId,
    {
        let mut timelines: BTreeMap<ParticipantId, ParticipantTimeline> = participant_ids
            .iter()
            .map(|&id| (id, ParticipantTimeline::new()))
            .collect();

        let mut item_events: Vec<&GameEvent> =
            events.iter().filter(|e| e.event.is_item_event()).collect();
        item_events.sort_by_key(|e| e.timestamp);

        let mut skipped = 0usize;
        for event in item_events {
            let Some(owner) = item_event_owner(&event.event).map(&remap) else {
                continue;
            };
            let Some(timeline) = timelines.get_mut(&owner) else {
                skipped += 1;
                continue;
            };

            let mut next = timeline.latest().clone();
            next.apply(&event.event);
            timeline.push(event.timestamp, next);
        }

        if skipped > 0 {
            tracing::debug!(skipped, "item events for unknown participants ignored");
        }
        tracing::debug!(
            participants = timelines.len(),
            snapshots = timelines.values().map(|t| t.snapshots.len()).sum::<usize>(),
            "built inventory timelines"
        );

        InventoryTimeline { timelines }
    }

    /// Inventory of `participant` at game time `t`, `None` if the participant is unknown.
    pub fn state_at(&self, participant: ParticipantId, t: Timestamp) -> Option<&InventoryState> {
        self.timelines.get(&participant).map(|tl| tl.state_at(t))
    }

    pub fn timeline(&self, participant: ParticipantId) -> Option<&ParticipantTimeline> {
        self.timelines.get(&participant)
    }

    pub fn participant_ids(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.timelines.keys().copied()
    }
}
