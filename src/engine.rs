use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::codec::{self, CodecError};
use crate::config::LayoutConfig;
use crate::doc::{PlaceableId, RoomId, RoomKind};
use crate::error::ErrorCode;
use crate::geometry::Point;
use crate::hit::{Hit, hit_test};
use crate::input::{DragPayload, InputState, InteractionState, Selection};
use crate::layout::{Direction, Layout, PlacementError, PlacementHint, RoomProperties};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers and commands for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RenderNeeded,
    SelectionChanged(Selection),
    /// New properties-panel contents; `None` clears the panel.
    PropertiesChanged(Option<RoomProperties>),
    RoomAdded(RoomId),
    RoomDeleted(RoomId),
    PlaceableAdded(PlaceableId),
    PlaceableDeleted(PlaceableId),
    /// A placement or move was refused; the layout is unchanged.
    Rejected(PlacementError),
}

/// Interaction controller: owns the layout and turns pointer events and
/// editor commands into validated layout mutations.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    pub layout: Layout,
    pub state: InteractionState,
}

impl Engine {
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self { layout: Layout::new(config), state: InteractionState::default() }
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> Selection {
        self.state.selection
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Properties of the selected room, if a room is selected.
    #[must_use]
    pub fn selected_room_properties(&self) -> Option<RoomProperties> {
        self.state
            .selection
            .room_id()
            .and_then(|id| self.layout.room_properties(&id))
    }

    /// Room that directional placement is relative to: the selected room, or
    /// the room owning the selected fixture or furniture.
    #[must_use]
    pub fn reference_room(&self) -> Option<RoomId> {
        match self.state.selection {
            Selection::None => None,
            Selection::Room(id) => Some(id),
            Selection::Fixture(id) | Selection::Furniture(id) => self.layout.placeable(&id).map(|p| p.parent),
        }
    }

    fn select(&mut self, selection: Selection) -> Vec<Action> {
        self.state.selection = selection;
        vec![
            Action::SelectionChanged(selection),
            Action::PropertiesChanged(self.selected_room_properties()),
            Action::RenderNeeded,
        ]
    }

    fn reject(err: PlacementError) -> Vec<Action> {
        warn!(code = err.error_code(), error = %err, "placement rejected");
        vec![Action::Rejected(err)]
    }

    // --- Pointer events ---

    /// Start a gesture. Fixtures and furniture are selected immediately; a
    /// room is only selected on release.
    pub fn on_pointer_down(&mut self, pt: Point) -> Vec<Action> {
        self.state.input = InputState::Idle;
        match hit_test(pt, &self.layout) {
            Some(Hit::Placeable { id, category, .. }) => {
                let Some(orig) = self.layout.placeable(&id).map(|p| p.position) else {
                    return vec![];
                };
                self.state.input = InputState::DraggingPlaceable {
                    id,
                    category,
                    grab_offset: pt.offset_from(orig),
                    orig,
                    moved: false,
                };
                debug!(placeable_id = %id, category = category.name(), "press on placeable");
                self.select(Selection::placeable(id, category))
            }
            Some(Hit::Room(id)) => {
                let Some(orig) = self.layout.room(&id).map(|r| r.bounds.origin()) else {
                    return vec![];
                };
                self.state.input = InputState::DraggingRoom { id, grab_offset: pt.offset_from(orig), orig, moved: false };
                debug!(room_id = %id, "press on room");
                vec![]
            }
            None => {
                self.state.input = InputState::PressedEmpty;
                debug!(x = pt.x, y = pt.y, "press on empty canvas");
                vec![]
            }
        }
    }

    /// Live drag feedback. Nothing is validated until release.
    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        match &mut self.state.input {
            InputState::DraggingRoom { id, grab_offset, moved, .. } => {
                self.layout.drag_room_to(id, pt.offset_from(*grab_offset));
                *moved = true;
                vec![Action::RenderNeeded]
            }
            InputState::DraggingPlaceable { id, grab_offset, moved, .. } => {
                self.layout.drag_placeable_to(id, pt.offset_from(*grab_offset));
                *moved = true;
                vec![Action::RenderNeeded]
            }
            InputState::Idle | InputState::PressedEmpty => vec![],
        }
    }

    /// Finish a gesture: validate and commit, or revert to the pre-drag
    /// position. Gesture tracking is cleared in every case.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.state.input) {
            InputState::Idle => vec![],
            InputState::PressedEmpty => {
                if self.state.selection.is_none() {
                    return vec![];
                }
                self.select(Selection::None)
            }
            InputState::DraggingRoom { id, orig, moved, .. } => {
                let mut actions = vec![];
                if moved {
                    match self.layout.validate_room(&id) {
                        Ok(()) => info!(room_id = %id, from_x = orig.x, from_y = orig.y, "room drag committed"),
                        Err(err) => {
                            self.layout.restore_room(&id, orig);
                            actions.extend(Self::reject(err));
                        }
                    }
                }
                actions.extend(self.select(Selection::Room(id)));
                actions
            }
            InputState::DraggingPlaceable { id, orig, moved, .. } => {
                if !moved {
                    return vec![];
                }
                let mut actions = vec![];
                match self.layout.validate_placeable(&id) {
                    Ok(()) => info!(placeable_id = %id, "placeable drag committed"),
                    Err(err) => {
                        self.layout.set_placeable_position(&id, orig);
                        actions.extend(Self::reject(err));
                    }
                }
                actions.push(Action::RenderNeeded);
                actions
            }
        }
    }

    /// Drop a palette item at `pt`.
    pub fn on_drop(&mut self, payload: &DragPayload, pt: Point) -> Vec<Action> {
        match self
            .layout
            .add_placeable(payload.category, &payload.type_name, &payload.asset_ref, pt)
        {
            Ok(id) => vec![Action::PlaceableAdded(id), Action::RenderNeeded],
            Err(err) => Self::reject(err),
        }
    }

    // --- Commands ---

    /// Add a room of `kind`. With a direction and a reference room the new
    /// room goes flush against that side; otherwise default placement.
    pub fn add_room(&mut self, kind: RoomKind, width_m: f64, height_m: f64, direction: Option<Direction>) -> Vec<Action> {
        let hint = match (direction, self.reference_room()) {
            (Some(direction), Some(reference)) => PlacementHint::Adjacent { reference, direction },
            _ => PlacementHint::Default,
        };
        match self.layout.add_room(kind.label(), kind.color(), width_m, height_m, hint) {
            Ok(id) => vec![Action::RoomAdded(id), Action::RenderNeeded],
            Err(err) => Self::reject(err),
        }
    }

    /// Delete the selected room and everything in it.
    pub fn delete_selected_room(&mut self) -> Vec<Action> {
        let Some(id) = self.state.selection.room_id() else {
            return vec![];
        };
        if self.layout.delete_room(&id).is_none() {
            return vec![];
        }
        self.state.input = InputState::Idle;
        let mut actions = vec![Action::RoomDeleted(id)];
        actions.extend(self.select(Selection::None));
        actions
    }

    /// Delete the selected fixture or furniture item.
    pub fn delete_selected_placeable(&mut self) -> Vec<Action> {
        let Some(id) = self.state.selection.placeable_id() else {
            return vec![];
        };
        if self.layout.delete_placeable(&id).is_none() {
            return vec![];
        }
        self.state.input = InputState::Idle;
        let mut actions = vec![Action::PlaceableDeleted(id)];
        actions.extend(self.select(Selection::None));
        actions
    }

    /// Rotate the selected fixture or furniture item a quarter turn.
    pub fn rotate_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.state.selection.placeable_id() else {
            return vec![];
        };
        match self.layout.rotate(&id) {
            Ok(rotation) => {
                debug!(placeable_id = %id, degrees = rotation.degrees(), "placeable rotated");
                vec![Action::RenderNeeded]
            }
            Err(err) => Self::reject(err),
        }
    }

    /// Save the layout. Returns the path written.
    ///
    /// # Errors
    ///
    /// See [`codec::save`].
    pub fn save(&self, path: &Path) -> Result<PathBuf, CodecError> {
        codec::save(&self.layout, path)
    }

    /// Replace the layout with a saved plan and reset selection and gestures.
    /// On error the current layout is kept.
    ///
    /// # Errors
    ///
    /// See [`codec::load`].
    pub fn load(&mut self, path: &Path) -> Result<Vec<Action>, CodecError> {
        self.layout = codec::load(path, &self.layout.config())?;
        self.state.reset();
        Ok(vec![Action::SelectionChanged(Selection::None), Action::PropertiesChanged(None), Action::RenderNeeded])
    }
}
