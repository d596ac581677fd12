//! Layout model: the ordered set of rooms on the canvas and the rules that
//! keep it consistent.
//!
//! DESIGN
//! ======
//! Every committed state satisfies two invariants: no two rooms overlap, and
//! no two placeables inside one room overlap regardless of category. Each
//! mutating operation either commits a state that satisfies them or returns a
//! [`PlacementError`] and leaves the layout exactly as it found it.
//!
//! The drag primitives (`drag_room_to`, `drag_placeable_to`) are the one
//! exception: they move entities without validation so a gesture can show
//! live feedback. The caller must follow them with `validate_*` and restore
//! the pre-drag position on failure, which is what the engine's pointer-up
//! handler does.
//!
//! PLACEMENT
//! =========
//! Default placement scans top-left candidates row by row in grid steps
//! starting at one grid cell in from the corner. Directional placement puts
//! the new room flush against one side of a reference room; touching edges
//! are not overlaps.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::LayoutConfig;
use crate::consts::GRID_SIZE;
use crate::error::ErrorCode;
use crate::doc::{Category, ColorTag, Placeable, PlaceableId, Room, RoomId, Rotation};
use crate::geometry::{Point, Rect, meters_to_units, snap_point, units_to_meters};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlacementError {
    #[error("room dimensions {width}x{height} are too large for the canvas")]
    RoomTooLarge { width: i32, height: i32 },
    #[error("not enough space on the canvas to add this room")]
    CanvasTooSmall,
    #[error("cannot place room outside the canvas boundaries")]
    OutOfBounds,
    #[error("cannot place {subject} here: it overlaps with {other}")]
    Overlap { subject: String, other: String },
    #[error("cannot place {subject} outside its room")]
    OutsideRoom { subject: String },
    #[error("drop point is not inside any room")]
    NoTargetRoom,
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),
    #[error("room not found: {0}")]
    RoomNotFound(RoomId),
    #[error("fixture or furniture not found: {0}")]
    PlaceableNotFound(PlaceableId),
}

impl ErrorCode for PlacementError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::RoomTooLarge { .. } => "E_ROOM_TOO_LARGE",
            Self::CanvasTooSmall => "E_CANVAS_TOO_SMALL",
            Self::OutOfBounds => "E_OUT_OF_BOUNDS",
            Self::Overlap { .. } => "E_OVERLAP",
            Self::OutsideRoom { .. } => "E_OUTSIDE_ROOM",
            Self::NoTargetRoom => "E_NO_TARGET_ROOM",
            Self::InvalidDimensions(_) => "E_INVALID_DIMENSIONS",
            Self::RoomNotFound(_) => "E_ROOM_NOT_FOUND",
            Self::PlaceableNotFound(_) => "E_PLACEABLE_NOT_FOUND",
        }
    }
}

/// Compass side of a reference room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Top-left corner of a `width` x `height` rectangle sitting flush
    /// against this side of `reference`.
    #[must_use]
    pub fn adjacent_origin(self, reference: &Rect, width: i32, height: i32) -> Point {
        match self {
            Self::North => Point::new(reference.x, reference.y.saturating_sub(height)),
            Self::South => Point::new(reference.x, reference.bottom()),
            Self::East => Point::new(reference.right(), reference.y),
            Self::West => Point::new(reference.x.saturating_sub(width), reference.y),
        }
    }
}

/// How `add_room` chooses a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementHint {
    /// First free slot in a row-major grid scan.
    Default,
    /// Flush against one side of an existing room.
    Adjacent { reference: RoomId, direction: Direction },
}

/// Room summary in real-world units, as shown in a properties panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomProperties {
    pub id: RoomId,
    pub type_label: String,
    pub color: ColorTag,
    pub x_m: f64,
    pub y_m: f64,
    pub width_m: f64,
    pub height_m: f64,
    pub area_m2: f64,
    pub fixtures: usize,
    pub furniture: usize,
}

/// Parse a user-entered length in meters.
///
/// # Errors
///
/// Returns `InvalidDimensions` for non-numeric, non-finite, or non-positive input.
pub fn parse_dimension(text: &str) -> Result<f64, PlacementError> {
    let Ok(value) = text.trim().parse::<f64>() else {
        return Err(PlacementError::InvalidDimensions(format!("{text:?} is not a number")));
    };
    check_meters(value)?;
    Ok(value)
}

fn check_meters(value: f64) -> Result<(), PlacementError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PlacementError::InvalidDimensions(format!("{value} must be a positive length")));
    }
    Ok(())
}

/// Convert a room size in meters to canvas units.
///
/// # Errors
///
/// Returns `InvalidDimensions` if either side is not a positive length or
/// rounds to zero units.
pub fn room_size_units(width_m: f64, height_m: f64) -> Result<(i32, i32), PlacementError> {
    check_meters(width_m)?;
    check_meters(height_m)?;
    let width = meters_to_units(width_m);
    let height = meters_to_units(height_m);
    if width <= 0 || height <= 0 {
        return Err(PlacementError::InvalidDimensions(format!("{width_m} m x {height_m} m is too small")));
    }
    Ok((width, height))
}

/// The collection of rooms on one canvas.
#[derive(Debug, Clone)]
pub struct Layout {
    config: LayoutConfig,
    rooms: Vec<Room>,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl Layout {
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self { config, rooms: Vec::new() }
    }

    /// Build a layout from existing rooms, checking the room invariants.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` for a room with a non-positive side or an
    /// edge past `i32::MAX`, and `Overlap` if two rooms overlap.
    pub fn from_rooms(config: LayoutConfig, rooms: Vec<Room>) -> Result<Self, PlacementError> {
        let mut layout = Self::new(config);
        layout.replace_rooms(rooms)?;
        Ok(layout)
    }

    // --- Queries ---

    #[must_use]
    pub fn config(&self) -> LayoutConfig {
        self.config
    }

    /// The canvas as a rectangle anchored at the origin.
    #[must_use]
    pub fn canvas(&self) -> Rect {
        Rect::new(0, 0, self.config.canvas_width, self.config.canvas_height)
    }

    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    #[must_use]
    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == *id)
    }

    fn room_mut(&mut self, id: &RoomId) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|r| r.id == *id)
    }

    /// First room, in layout order, containing `p`.
    #[must_use]
    pub fn room_at(&self, p: Point) -> Option<&Room> {
        self.rooms.iter().find(|r| r.bounds.contains(p))
    }

    #[must_use]
    pub fn placeable(&self, id: &PlaceableId) -> Option<&Placeable> {
        self.rooms.iter().find_map(|r| r.placeable(id))
    }

    /// Every fixture and furniture item in the layout.
    pub fn placeables(&self) -> impl Iterator<Item = &Placeable> {
        self.rooms.iter().flat_map(Room::placeables)
    }

    fn owning_room_mut(&mut self, id: &PlaceableId) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|r| r.placeable(id).is_some())
    }

    #[must_use]
    pub fn is_within_canvas(&self, rect: &Rect) -> bool {
        self.canvas().contains_rect(rect)
    }

    /// First room other than `except` whose bounds overlap `rect`.
    #[must_use]
    pub fn overlapping_room(&self, rect: &Rect, except: Option<&RoomId>) -> Option<&Room> {
        self.rooms
            .iter()
            .filter(|r| except != Some(&r.id))
            .find(|r| r.bounds.intersects(rect))
    }

    /// Properties panel values for a room.
    #[must_use]
    pub fn room_properties(&self, id: &RoomId) -> Option<RoomProperties> {
        let room = self.room(id)?;
        let width_m = units_to_meters(room.bounds.width);
        let height_m = units_to_meters(room.bounds.height);
        Some(RoomProperties {
            id: room.id,
            type_label: room.type_label.clone(),
            color: room.color,
            x_m: units_to_meters(room.bounds.x),
            y_m: units_to_meters(room.bounds.y),
            width_m,
            height_m,
            area_m2: width_m * height_m,
            fixtures: room.fixtures.len(),
            furniture: room.furniture.len(),
        })
    }

    // --- Rooms ---

    /// Add a room of `width_m` x `height_m` meters.
    ///
    /// # Errors
    ///
    /// `InvalidDimensions` for bad sizes; `RoomTooLarge` / `CanvasTooSmall`
    /// from default placement; `OutOfBounds` / `Overlap` / `RoomNotFound`
    /// from directional placement.
    pub fn add_room(
        &mut self,
        type_label: &str,
        color: ColorTag,
        width_m: f64,
        height_m: f64,
        hint: PlacementHint,
    ) -> Result<RoomId, PlacementError> {
        let (width, height) = room_size_units(width_m, height_m)?;
        let origin = match hint {
            PlacementHint::Default => self.find_default_position(width, height)?,
            PlacementHint::Adjacent { reference, direction } => {
                self.find_adjacent_position(&reference, direction, width, height)?
            }
        };

        let room = Room::new(Rect::new(origin.x, origin.y, width, height), color, type_label);
        let id = room.id;
        info!(room_id = %id, type_label, x = origin.x, y = origin.y, width, height, "room added");
        self.rooms.push(room);
        Ok(id)
    }

    /// First free top-left position for a `width` x `height` room.
    ///
    /// # Errors
    ///
    /// `RoomTooLarge` if the room is bigger than the canvas; `CanvasTooSmall`
    /// if the scan runs off the canvas or exhausts the attempt cap.
    pub fn find_default_position(&self, width: i32, height: i32) -> Result<Point, PlacementError> {
        let LayoutConfig { canvas_width, canvas_height, max_attempts } = self.config;
        if width > canvas_width || height > canvas_height {
            return Err(PlacementError::RoomTooLarge { width, height });
        }

        let mut candidate = Point::new(GRID_SIZE, GRID_SIZE);
        for _ in 0..max_attempts {
            let rect = Rect::new(candidate.x, candidate.y, width, height);
            if !self.is_within_canvas(&rect) {
                return Err(PlacementError::CanvasTooSmall);
            }
            if self.overlapping_room(&rect, None).is_none() {
                return Ok(candidate);
            }

            candidate.x = candidate.x.saturating_add(GRID_SIZE);
            if candidate.x.saturating_add(width) > canvas_width {
                candidate.x = GRID_SIZE;
                candidate.y = candidate.y.saturating_add(GRID_SIZE);
            }
            if candidate.y.saturating_add(height) > canvas_height {
                return Err(PlacementError::CanvasTooSmall);
            }
        }
        debug!(max_attempts, width, height, "default placement exhausted attempt cap");
        Err(PlacementError::CanvasTooSmall)
    }

    /// Top-left position flush against `direction` side of `reference`.
    ///
    /// # Errors
    ///
    /// `RoomNotFound` for an unknown reference, `OutOfBounds` if the result
    /// leaves the canvas, `Overlap` if it hits an existing room.
    pub fn find_adjacent_position(
        &self,
        reference: &RoomId,
        direction: Direction,
        width: i32,
        height: i32,
    ) -> Result<Point, PlacementError> {
        let anchor = self.room(reference).ok_or(PlacementError::RoomNotFound(*reference))?;
        let origin = direction.adjacent_origin(&anchor.bounds, width, height);
        let rect = Rect::new(origin.x, origin.y, width, height);
        if !self.is_within_canvas(&rect) {
            return Err(PlacementError::OutOfBounds);
        }
        if let Some(other) = self.overlapping_room(&rect, None) {
            return Err(PlacementError::Overlap { subject: "room".into(), other: other.type_label.clone() });
        }
        Ok(origin)
    }

    /// Remove a room together with everything it owns.
    pub fn delete_room(&mut self, id: &RoomId) -> Option<Room> {
        let idx = self.rooms.iter().position(|r| r.id == *id)?;
        let room = self.rooms.remove(idx);
        info!(
            room_id = %room.id,
            fixtures = room.fixtures.len(),
            furniture = room.furniture.len(),
            "room deleted"
        );
        Some(room)
    }

    /// Move a room so its top-left corner lands on `new_top_left` (snapped and
    /// clamped to the canvas), carrying its contents along.
    ///
    /// # Errors
    ///
    /// `RoomNotFound`, or `OutOfBounds` / `Overlap` after which the room and
    /// its contents are back where they started.
    pub fn move_room(&mut self, id: &RoomId, new_top_left: Point) -> Result<(), PlacementError> {
        let original = self.room(id).ok_or(PlacementError::RoomNotFound(*id))?.bounds.origin();
        self.drag_room_to(id, new_top_left);
        if let Err(err) = self.validate_room(id) {
            self.restore_room(id, original);
            return Err(err);
        }
        info!(room_id = %id, from_x = original.x, from_y = original.y, "room moved");
        Ok(())
    }

    /// Unvalidated live move: snap, clamp to the canvas, translate the room
    /// and its contents. Returns the applied delta.
    pub fn drag_room_to(&mut self, id: &RoomId, top_left: Point) -> Option<(i32, i32)> {
        let canvas = self.canvas();
        let room = self.room_mut(id)?;
        let snapped = snap_point(top_left, GRID_SIZE);
        // min-then-max so a room wider than the canvas pins to 0 instead of panicking.
        let x = snapped.x.min(canvas.width - room.bounds.width).max(0);
        let y = snapped.y.min(canvas.height - room.bounds.height).max(0);
        let dx = x.saturating_sub(room.bounds.x);
        let dy = y.saturating_sub(room.bounds.y);
        room.translate(dx, dy);
        Some((dx, dy))
    }

    /// Put a room (and contents) back at `origin` without snapping or checks.
    pub fn restore_room(&mut self, id: &RoomId, origin: Point) -> bool {
        let Some(room) = self.room_mut(id) else {
            return false;
        };
        let dx = origin.x.saturating_sub(room.bounds.x);
        let dy = origin.y.saturating_sub(room.bounds.y);
        room.translate(dx, dy);
        true
    }

    /// Check a room against the canvas and every other room.
    ///
    /// # Errors
    ///
    /// `RoomNotFound`, `OutOfBounds`, or `Overlap`.
    pub fn validate_room(&self, id: &RoomId) -> Result<(), PlacementError> {
        let room = self.room(id).ok_or(PlacementError::RoomNotFound(*id))?;
        if !self.is_within_canvas(&room.bounds) {
            return Err(PlacementError::OutOfBounds);
        }
        if let Some(other) = self.overlapping_room(&room.bounds, Some(id)) {
            return Err(PlacementError::Overlap {
                subject: room.type_label.clone(),
                other: other.type_label.clone(),
            });
        }
        Ok(())
    }

    /// Replace all rooms, checking sizes and pairwise overlap first.
    ///
    /// # Errors
    ///
    /// `InvalidDimensions` or `Overlap`; the layout is unchanged on error.
    pub fn replace_rooms(&mut self, rooms: Vec<Room>) -> Result<(), PlacementError> {
        for (i, room) in rooms.iter().enumerate() {
            if !room.bounds.is_valid() {
                return Err(PlacementError::InvalidDimensions(format!(
                    "{} at ({}, {}) with size {}x{} is not a valid room",
                    room.type_label, room.bounds.x, room.bounds.y, room.bounds.width, room.bounds.height
                )));
            }
            if let Some(other) = rooms[..i].iter().find(|o| o.bounds.intersects(&room.bounds)) {
                return Err(PlacementError::Overlap {
                    subject: room.type_label.clone(),
                    other: other.type_label.clone(),
                });
            }
        }
        self.rooms = rooms;
        Ok(())
    }

    // --- Fixtures and furniture ---

    /// Drop a new placeable at `drop_point` (snapped to the grid).
    ///
    /// Only the snapped drop point has to lie inside a room; the item's full
    /// bounds are checked against its siblings but not against the room edge.
    ///
    /// # Errors
    ///
    /// `NoTargetRoom` if no room contains the point, `Overlap` if the item
    /// would overlap any fixture or furniture in that room.
    pub fn add_placeable(
        &mut self,
        category: Category,
        type_name: &str,
        asset_ref: &str,
        drop_point: Point,
    ) -> Result<PlaceableId, PlacementError> {
        let position = snap_point(drop_point, GRID_SIZE);
        let room = self
            .rooms
            .iter_mut()
            .find(|r| r.bounds.contains(position))
            .ok_or(PlacementError::NoTargetRoom)?;

        let item = Placeable::new(category, type_name, asset_ref, position, room.id);
        if let Some(other) = room.overlapping_placeable(&item.bounds(), None) {
            return Err(PlacementError::Overlap { subject: type_name.to_string(), other: other.type_name.clone() });
        }

        let id = item.id;
        info!(
            placeable_id = %id,
            room_id = %room.id,
            category = category.name(),
            type_name,
            x = position.x,
            y = position.y,
            "placeable added"
        );
        room.items_mut(category).push(item);
        Ok(id)
    }

    /// [`Self::add_placeable`] for a fixture.
    ///
    /// # Errors
    ///
    /// See [`Self::add_placeable`].
    pub fn add_fixture(&mut self, type_name: &str, asset_ref: &str, drop_point: Point) -> Result<PlaceableId, PlacementError> {
        self.add_placeable(Category::Fixture, type_name, asset_ref, drop_point)
    }

    /// [`Self::add_placeable`] for a furniture item.
    ///
    /// # Errors
    ///
    /// See [`Self::add_placeable`].
    pub fn add_furniture(&mut self, type_name: &str, asset_ref: &str, drop_point: Point) -> Result<PlaceableId, PlacementError> {
        self.add_placeable(Category::Furniture, type_name, asset_ref, drop_point)
    }

    /// Move a placeable by `(dx, dy)`, snapping and (for furniture) clamping to
    /// its room, then validate.
    ///
    /// # Errors
    ///
    /// `PlaceableNotFound`, or `OutsideRoom` / `Overlap` after which the item
    /// is back at its previous position.
    pub fn move_placeable(&mut self, id: &PlaceableId, dx: i32, dy: i32) -> Result<(), PlacementError> {
        let original = self.placeable(id).ok_or(PlacementError::PlaceableNotFound(*id))?.position;
        let target = Point::new(original.x.saturating_add(dx), original.y.saturating_add(dy));
        self.drag_placeable_to(id, target);
        if let Err(err) = self.validate_placeable(id) {
            self.set_placeable_position(id, original);
            return Err(err);
        }
        Ok(())
    }

    /// [`Self::move_placeable`] restricted to fixtures.
    ///
    /// # Errors
    ///
    /// `PlaceableNotFound` if `id` is not a fixture; otherwise see [`Self::move_placeable`].
    pub fn move_fixture(&mut self, id: &PlaceableId, dx: i32, dy: i32) -> Result<(), PlacementError> {
        self.require_category(id, Category::Fixture)?;
        self.move_placeable(id, dx, dy)
    }

    /// [`Self::move_placeable`] restricted to furniture.
    ///
    /// # Errors
    ///
    /// `PlaceableNotFound` if `id` is not furniture; otherwise see [`Self::move_placeable`].
    pub fn move_furniture(&mut self, id: &PlaceableId, dx: i32, dy: i32) -> Result<(), PlacementError> {
        self.require_category(id, Category::Furniture)?;
        self.move_placeable(id, dx, dy)
    }

    fn require_category(&self, id: &PlaceableId, category: Category) -> Result<(), PlacementError> {
        match self.placeable(id) {
            Some(item) if item.category == category => Ok(()),
            _ => Err(PlacementError::PlaceableNotFound(*id)),
        }
    }

    /// Unvalidated live move of a placeable. Snaps to the grid; furniture is
    /// clamped inside its room. Returns the applied position.
    pub fn drag_placeable_to(&mut self, id: &PlaceableId, top_left: Point) -> Option<Point> {
        let room = self.owning_room_mut(id)?;
        let bounds = room.bounds;
        let item = room.placeable_mut(id)?;
        let mut position = snap_point(top_left, GRID_SIZE);
        if item.category.clamps_during_drag() {
            let size = item.category.size();
            position.x = position.x.min(bounds.right().saturating_sub(size)).max(bounds.x);
            position.y = position.y.min(bounds.bottom().saturating_sub(size)).max(bounds.y);
        }
        item.position = position;
        Some(position)
    }

    /// Set a placeable's position verbatim. Used to revert a rejected drag.
    pub fn set_placeable_position(&mut self, id: &PlaceableId, position: Point) -> bool {
        match self.owning_room_mut(id).and_then(|room| room.placeable_mut(id)) {
            Some(item) => {
                item.position = position;
                true
            }
            None => false,
        }
    }

    /// Check a placeable lies inside its room and clear of every sibling.
    ///
    /// # Errors
    ///
    /// `PlaceableNotFound`, `RoomNotFound`, `OutsideRoom`, or `Overlap`.
    pub fn validate_placeable(&self, id: &PlaceableId) -> Result<(), PlacementError> {
        let item = self.placeable(id).ok_or(PlacementError::PlaceableNotFound(*id))?;
        let room = self.room(&item.parent).ok_or(PlacementError::RoomNotFound(item.parent))?;
        let bounds = item.bounds();
        if !room.bounds.contains_rect(&bounds) {
            return Err(PlacementError::OutsideRoom { subject: item.type_name.clone() });
        }
        if let Some(other) = room.overlapping_placeable(&bounds, Some(id)) {
            return Err(PlacementError::Overlap { subject: item.type_name.clone(), other: other.type_name.clone() });
        }
        Ok(())
    }

    /// Advance a placeable's rotation by a quarter turn.
    ///
    /// # Errors
    ///
    /// `PlaceableNotFound`.
    pub fn rotate(&mut self, id: &PlaceableId) -> Result<Rotation, PlacementError> {
        let item = self
            .owning_room_mut(id)
            .and_then(|room| room.placeable_mut(id))
            .ok_or(PlacementError::PlaceableNotFound(*id))?;
        item.rotate();
        Ok(item.rotation)
    }

    /// Remove a placeable from its room.
    pub fn delete_placeable(&mut self, id: &PlaceableId) -> Option<Placeable> {
        let item = self.owning_room_mut(id)?.remove_placeable(id)?;
        info!(placeable_id = %item.id, category = item.category.name(), "placeable deleted");
        Some(item)
    }
}
