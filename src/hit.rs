#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::doc::{Category, PlaceableId, RoomId};
use crate::geometry::Point;
use crate::layout::Layout;

/// What lies under a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Room(RoomId),
    Placeable { id: PlaceableId, category: Category, room: RoomId },
}

impl Hit {
    /// The room that was hit, or the room owning the hit placeable.
    #[must_use]
    pub fn room_id(&self) -> RoomId {
        match *self {
            Self::Room(id) | Self::Placeable { room: id, .. } => id,
        }
    }
}

/// Categories in hit priority order: furniture sits on top of fixtures.
const PICK_ORDER: [Category; 2] = [Category::Furniture, Category::Fixture];

/// Find the entity under `pt`.
///
/// Furniture in any room wins over fixtures in any room, which win over
/// rooms. Within one tier the first match in layout order is returned.
#[must_use]
pub fn hit_test(pt: Point, layout: &Layout) -> Option<Hit> {
    for category in PICK_ORDER {
        for room in layout.rooms() {
            if let Some(item) = room.items(category).iter().find(|p| p.bounds().contains(pt)) {
                return Some(Hit::Placeable { id: item.id, category, room: room.id });
            }
        }
    }
    layout.room_at(pt).map(|room| Hit::Room(room.id))
}
