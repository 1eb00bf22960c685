//! Drag-gesture transfer between the results surface and the favourites surface.
//!
//! A gesture starts when a record is picked up (its JSON copy becomes the
//! payload) and ends on drop or cancellation, after which the protocol is
//! idle again. Only two drops mutate anything:
//!
//! - onto the favourites surface: the record is added
//! - onto the results surface, when picked up from favourites: the record is removed
//!
//! Every other ending, including a missing or undecodable payload, is a
//! cancelled gesture and leaves the favourites untouched.

use crate::error::Result;
use crate::favourites::FavouritesStore;
use crate::models::{PropertyId, PropertyRecord};
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error};

/// The two views a record can be dragged between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    Results,
    Favourites,
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Results => f.write_str("results"),
            Surface::Favourites => f.write_str("favourites"),
        }
    }
}

/// Where the pointer is when the gesture ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Surface(Surface),
    Outside,
}

/// Serialized copy of one record, carried for the duration of a gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPayload(String);

impl TransferPayload {
    pub fn encode(record: &PropertyRecord) -> Result<Self> {
        Ok(Self(serde_json::to_string(record)?))
    }

    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse the carried record, applying the same checks as catalog loading
    pub fn decode(&self) -> Result<PropertyRecord> {
        let record: PropertyRecord = serde_json::from_str(&self.0)?;
        record.validate()?;
        Ok(record)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        payload: TransferPayload,
        origin: Surface,
        /// Valid target currently under the pointer, for highlight only
        hovering: Option<Surface>,
    },
}

/// What a finished gesture did to the favourites
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Added(PropertyId),
    Removed(PropertyId),
    /// The drop reached the store but changed nothing (already present or absent)
    Unchanged(PropertyId),
    Cancelled,
    /// The store could not persist the change; previous state kept
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Add,
    Remove,
}

fn action_for(origin: Surface, target: DropTarget) -> Option<Action> {
    match (origin, target) {
        (_, DropTarget::Surface(Surface::Favourites)) => Some(Action::Add),
        (Surface::Favourites, DropTarget::Surface(Surface::Results)) => Some(Action::Remove),
        _ => None,
    }
}

/// Single-gesture state machine
#[derive(Debug, Default)]
pub struct TransferProtocol {
    state: DragState,
}

impl TransferProtocol {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Valid target to highlight, if any
    pub fn highlighted(&self) -> Option<Surface> {
        match &self.state {
            DragState::Dragging { hovering, .. } => *hovering,
            DragState::Idle => None,
        }
    }

    /// Start a gesture. A stale gesture that never ended is replaced.
    pub fn pick_up(&mut self, record: &PropertyRecord, origin: Surface) -> Result<()> {
        let payload = TransferPayload::encode(record)?;
        if self.is_dragging() {
            debug!("Replacing unfinished drag gesture");
        }
        debug!("Picked up {} from {}", record.id, origin);
        self.state = DragState::Dragging {
            payload,
            origin,
            hovering: None,
        };
        Ok(())
    }

    pub fn hover(&mut self, target: DropTarget) {
        if let DragState::Dragging { hovering, .. } = &mut self.state {
            *hovering = match target {
                DropTarget::Surface(surface) => Some(surface),
                DropTarget::Outside => None,
            };
        }
    }

    pub fn cancel(&mut self) {
        if self.is_dragging() {
            debug!("Drag gesture cancelled");
        }
        self.state = DragState::Idle;
    }

    /// End the gesture over `target`. Always leaves the protocol idle.
    pub fn drop_on<S: KeyValueStore>(
        &mut self,
        target: DropTarget,
        store: &mut FavouritesStore<S>,
    ) -> DropOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Idle => {
                debug!("Drop with no gesture in progress; ignoring");
                DropOutcome::Cancelled
            }
            DragState::Dragging {
                payload, origin, ..
            } => complete(Some(&payload), origin, target, store),
        }
    }

    /// Complete a drop from raw drag data, without a tracked gesture.
    /// For shells whose drop events carry the payload themselves.
    pub fn drop_raw<S: KeyValueStore>(
        raw: Option<&str>,
        origin: Surface,
        target: DropTarget,
        store: &mut FavouritesStore<S>,
    ) -> DropOutcome {
        let payload = raw.map(TransferPayload::from_raw);
        complete(payload.as_ref(), origin, target, store)
    }
}

fn complete<S: KeyValueStore>(
    payload: Option<&TransferPayload>,
    origin: Surface,
    target: DropTarget,
    store: &mut FavouritesStore<S>,
) -> DropOutcome {
    let Some(action) = action_for(origin, target) else {
        debug!("Drop from {} on {:?} is not a transfer", origin, target);
        return DropOutcome::Cancelled;
    };

    let Some(payload) = payload.filter(|p| !p.as_str().is_empty()) else {
        debug!("Drop without payload; ignoring");
        return DropOutcome::Cancelled;
    };

    let record = match payload.decode() {
        Ok(record) => record,
        Err(e) => {
            debug!("Discarding malformed drag payload: {}", e);
            return DropOutcome::Cancelled;
        }
    };

    let id = record.id.clone();
    let before = store.collection().len();
    let result = match action {
        Action::Add => store.add(record).map(|c| c.len()),
        Action::Remove => store.remove(&id).map(|c| c.len()),
    };

    match result {
        Ok(after) if after != before => match action {
            Action::Add => DropOutcome::Added(id),
            Action::Remove => DropOutcome::Removed(id),
        },
        Ok(_) => DropOutcome::Unchanged(id),
        Err(e) => {
            error!("Failed to persist favourites after drop of {}: {}", id, e);
            DropOutcome::Failed
        }
    }
}
