//! Document model: rooms and the fixtures/furniture they own.
//!
//! A [`Room`] owns two ordered collections of [`Placeable`]s, one per
//! [`Category`]. Fixtures and furniture are the same shape with a different
//! size constant and a different drag rule, so they share one type. Each
//! placeable points back at its room by [`RoomId`]; the room is looked up in
//! the layout rather than held by reference.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{FIXTURE_SIZE, FURNITURE_SIZE};
use crate::geometry::{Point, Rect};

/// Unique identifier for a room.
pub type RoomId = Uuid;

/// Unique identifier for a fixture or furniture item.
pub type PlaceableId = Uuid;

/// Fill colour tag for a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Green,
    Red,
    Yellow,
    Blue,
    #[default]
    White,
}

impl ColorTag {
    /// CSS-style hex colour used to fill the room.
    #[must_use]
    pub fn hex(self) -> &'static str {
        match self {
            Self::Green => "#90EE90",
            Self::Red => "#FFB6C1",
            Self::Yellow => "#FFFFE0",
            Self::Blue => "#ADD8E6",
            Self::White => "#FFFFFF",
        }
    }
}

/// Room categories offered by the editor palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomKind {
    Bedroom,
    Kitchen,
    DrawingRoom,
    Bathroom,
}

impl RoomKind {
    /// Every palette entry, in display order.
    pub const ALL: [RoomKind; 4] = [Self::Bedroom, Self::Kitchen, Self::DrawingRoom, Self::Bathroom];

    /// Label stored on rooms of this kind.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Bedroom => "Bedroom",
            Self::Kitchen => "Kitchen",
            Self::DrawingRoom => "Drawing Room",
            Self::Bathroom => "Bathroom",
        }
    }

    #[must_use]
    pub fn color(self) -> ColorTag {
        match self {
            Self::Bedroom => ColorTag::Green,
            Self::Kitchen => ColorTag::Red,
            Self::DrawingRoom => ColorTag::Yellow,
            Self::Bathroom => ColorTag::Blue,
        }
    }
}

/// Which collection of a room a placeable belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Plumbing, doors, windows: fixed installations.
    Fixture,
    /// Movable furniture.
    Furniture,
}

impl Category {
    /// Side length of this category's square bounding box.
    #[must_use]
    pub fn size(self) -> i32 {
        match self {
            Self::Fixture => FIXTURE_SIZE,
            Self::Furniture => FURNITURE_SIZE,
        }
    }

    /// Whether a drag keeps the item inside its parent room as it moves.
    /// Fixtures may wander during a drag and are only checked on release.
    #[must_use]
    pub fn clamps_during_drag(self) -> bool {
        matches!(self, Self::Furniture)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Fixture => "fixture",
            Self::Furniture => "furniture",
        }
    }

    /// Palette entries for this category as `(type name, asset path)`.
    #[must_use]
    pub fn catalog(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Fixture => FIXTURE_CATALOG,
            Self::Furniture => FURNITURE_CATALOG,
        }
    }
}

/// Fixture palette: `(type name, asset path)`.
pub const FIXTURE_CATALOG: &[(&str, &str)] = &[
    ("Commode", "images/commode.png"),
    ("Washbasin", "images/washbasin.png"),
    ("Shower", "images/shower.png"),
    ("Kitchen Sink", "images/kitchen sink.png"),
    ("Stove", "images/stove.png"),
    ("Door", "images/door.png"),
    ("Window", "images/window.png"),
];

/// Furniture palette: `(type name, asset path)`.
pub const FURNITURE_CATALOG: &[(&str, &str)] = &[
    ("Bed", "images/bed.png"),
    ("Chair", "images/chair.png"),
    ("Table", "images/table.png"),
    ("Sofa", "images/sofa.png"),
    ("Dining Set", "images/dining set.png"),
];

/// Quarter-turn rotation of a placeable. Purely visual; bounds are square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// The next clockwise quarter turn, wrapping 270 back to 0.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Deg0 => Self::Deg90,
            Self::Deg90 => Self::Deg180,
            Self::Deg180 => Self::Deg270,
            Self::Deg270 => Self::Deg0,
        }
    }

    #[must_use]
    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }
}

/// A fixture or furniture item owned by a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placeable {
    pub id: PlaceableId,
    pub category: Category,
    /// Palette type name, e.g. `"Washbasin"`.
    pub type_name: String,
    /// Opaque image reference for the host renderer.
    pub asset_ref: String,
    /// Top-left corner of the bounding box.
    pub position: Point,
    pub rotation: Rotation,
    /// Owning room. A relation only; the room holds the item.
    pub parent: RoomId,
}

impl Placeable {
    #[must_use]
    pub fn new(category: Category, type_name: &str, asset_ref: &str, position: Point, parent: RoomId) -> Self {
        Self {
            id: Uuid::new_v4(),
            category,
            type_name: type_name.to_string(),
            asset_ref: asset_ref.to_string(),
            position,
            rotation: Rotation::Deg0,
            parent,
        }
    }

    /// Square bounding box at the current position.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let size = self.category.size();
        Rect::new(self.position.x, self.position.y, size, size)
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.position.x = self.position.x.saturating_add(dx);
        self.position.y = self.position.y.saturating_add(dy);
    }

    pub fn rotate(&mut self) {
        self.rotation = self.rotation.next();
    }
}

/// A rectangular room and everything placed in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub bounds: Rect,
    pub color: ColorTag,
    pub type_label: String,
    pub fixtures: Vec<Placeable>,
    pub furniture: Vec<Placeable>,
}

impl Room {
    /// Create an empty room with a fresh id.
    #[must_use]
    pub fn new(bounds: Rect, color: ColorTag, type_label: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            bounds,
            color,
            type_label: type_label.to_string(),
            fixtures: Vec::new(),
            furniture: Vec::new(),
        }
    }

    /// The collection for `category`.
    #[must_use]
    pub fn items(&self, category: Category) -> &[Placeable] {
        match category {
            Category::Fixture => &self.fixtures,
            Category::Furniture => &self.furniture,
        }
    }

    pub fn items_mut(&mut self, category: Category) -> &mut Vec<Placeable> {
        match category {
            Category::Fixture => &mut self.fixtures,
            Category::Furniture => &mut self.furniture,
        }
    }

    /// Fixtures then furniture, in collection order.
    pub fn placeables(&self) -> impl Iterator<Item = &Placeable> {
        self.fixtures.iter().chain(self.furniture.iter())
    }

    #[must_use]
    pub fn placeable(&self, id: &PlaceableId) -> Option<&Placeable> {
        self.placeables().find(|p| p.id == *id)
    }

    pub fn placeable_mut(&mut self, id: &PlaceableId) -> Option<&mut Placeable> {
        self.fixtures
            .iter_mut()
            .chain(self.furniture.iter_mut())
            .find(|p| p.id == *id)
    }

    /// First placeable (either category) other than `except` whose bounds
    /// overlap `bounds`.
    #[must_use]
    pub fn overlapping_placeable(&self, bounds: &Rect, except: Option<&PlaceableId>) -> Option<&Placeable> {
        self.placeables()
            .filter(|p| except != Some(&p.id))
            .find(|p| p.bounds().intersects(bounds))
    }

    /// Move the room and all of its contents by the same delta.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.bounds = self.bounds.translate(dx, dy);
        for item in self.fixtures.iter_mut().chain(self.furniture.iter_mut()) {
            item.translate(dx, dy);
        }
    }

    /// Remove a placeable by id from whichever collection holds it.
    pub fn remove_placeable(&mut self, id: &PlaceableId) -> Option<Placeable> {
        for items in [&mut self.fixtures, &mut self.furniture] {
            if let Some(idx) = items.iter().position(|p| p.id == *id) {
                return Some(items.remove(idx));
            }
        }
        None
    }
}
