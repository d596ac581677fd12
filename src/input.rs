//! Interaction model: selection, the pointer gesture state machine, and
//! palette drag payloads.
//!
//! `InteractionState` is everything the engine remembers between events.
//! `InputState` is the gesture being tracked between pointer-down and
//! pointer-up; each dragging variant carries the grab offset and the
//! pre-drag position so release can either commit or revert.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::doc::{Category, PlaceableId, RoomId};
use crate::error::ErrorCode;
use crate::geometry::Point;

/// The single focused entity. At most one thing is selected at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Room(RoomId),
    Fixture(PlaceableId),
    Furniture(PlaceableId),
}

impl Selection {
    /// Selection for a placeable of the given category.
    #[must_use]
    pub fn placeable(id: PlaceableId, category: Category) -> Self {
        match category {
            Category::Fixture => Self::Fixture(id),
            Category::Furniture => Self::Furniture(id),
        }
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    #[must_use]
    pub fn room_id(&self) -> Option<RoomId> {
        match *self {
            Self::Room(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn placeable_id(&self) -> Option<PlaceableId> {
        match *self {
            Self::Fixture(id) | Self::Furniture(id) => Some(id),
            _ => None,
        }
    }
}

/// Gesture state between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Pointer went down on empty canvas.
    PressedEmpty,
    /// Pointer went down on a room body; moving drags the room.
    DraggingRoom {
        id: RoomId,
        /// Pointer position minus room origin at press time.
        grab_offset: Point,
        /// Room origin before the drag, restored on rejection.
        orig: Point,
        /// Whether any pointer-move happened since the press.
        moved: bool,
    },
    /// Pointer went down on a fixture or furniture item.
    DraggingPlaceable {
        id: PlaceableId,
        category: Category,
        grab_offset: Point,
        orig: Point,
        moved: bool,
    },
}

impl InputState {
    /// Whether a press is being tracked.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Everything the controller keeps between events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub selection: Selection,
    pub input: InputState,
}

impl InteractionState {
    /// Drop both the selection and any in-flight gesture.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Error parsing a legacy drag string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("drag payload has no category prefix: {0:?}")]
    MissingPrefix(String),
    #[error("unknown drag payload category: {0:?}")]
    UnknownCategory(String),
    #[error("drag payload is missing a type name or asset: {0:?}")]
    Incomplete(String),
}

impl ErrorCode for PayloadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingPrefix(_) => "E_PAYLOAD_NO_PREFIX",
            Self::UnknownCategory(_) => "E_PAYLOAD_UNKNOWN_CATEGORY",
            Self::Incomplete(_) => "E_PAYLOAD_INCOMPLETE",
        }
    }
}

/// A palette item being dropped onto the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
    pub category: Category,
    pub type_name: String,
    pub asset_ref: String,
}

impl DragPayload {
    #[must_use]
    pub fn new(category: Category, type_name: &str, asset_ref: &str) -> Self {
        Self { category, type_name: type_name.to_string(), asset_ref: asset_ref.to_string() }
    }

    /// Payload for a named palette entry, if the catalog has it.
    #[must_use]
    pub fn from_catalog(category: Category, type_name: &str) -> Option<Self> {
        category
            .catalog()
            .iter()
            .find(|(name, _)| *name == type_name)
            .map(|(name, asset)| Self::new(category, name, asset))
    }
}

impl FromStr for DragPayload {
    type Err = PayloadError;

    /// Parse `"FURNITURE:<type>,<asset>"` or `"FIXTURE:<type>,<asset>"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, rest) = s.split_once(':').ok_or_else(|| PayloadError::MissingPrefix(s.to_string()))?;
        let category = match prefix {
            "FURNITURE" => Category::Furniture,
            "FIXTURE" => Category::Fixture,
            other => return Err(PayloadError::UnknownCategory(other.to_string())),
        };
        match rest.split_once(',') {
            Some((type_name, asset_ref)) if !type_name.is_empty() && !asset_ref.is_empty() => {
                Ok(Self::new(category, type_name, asset_ref))
            }
            _ => Err(PayloadError::Incomplete(s.to_string())),
        }
    }
}
