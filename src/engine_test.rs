#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{Category, Rotation};
use crate::geometry::Rect;

// =============================================================
// Helpers
// =============================================================

fn pt(x: i32, y: i32) -> Point {
    Point::new(x, y)
}

fn engine_with_room() -> (Engine, RoomId) {
    let mut engine = Engine::default();
    let id = added_room(&engine.add_room(RoomKind::Bedroom, 4.0, 4.0, None));
    (engine, id)
}

fn added_room(actions: &[Action]) -> RoomId {
    match actions.first() {
        Some(Action::RoomAdded(id)) => *id,
        other => panic!("expected RoomAdded, got {other:?}"),
    }
}

fn added_placeable(actions: &[Action]) -> PlaceableId {
    match actions.first() {
        Some(Action::PlaceableAdded(id)) => *id,
        other => panic!("expected PlaceableAdded, got {other:?}"),
    }
}

fn rejected(actions: &[Action]) -> Option<&PlacementError> {
    actions.iter().find_map(|a| match a {
        Action::Rejected(err) => Some(err),
        _ => None,
    })
}

fn drop_item(engine: &mut Engine, category: Category, name: &str, at: Point) -> Vec<Action> {
    let payload = DragPayload::from_catalog(category, name).unwrap();
    engine.on_drop(&payload, at)
}

fn drag(engine: &mut Engine, from: Point, to: Point) -> Vec<Action> {
    engine.on_pointer_down(from);
    engine.on_pointer_move(to);
    engine.on_pointer_up()
}

fn room_bounds(engine: &Engine, id: &RoomId) -> Rect {
    engine.layout().room(id).unwrap().bounds
}

fn position(engine: &Engine, id: &PlaceableId) -> Point {
    engine.layout().placeable(id).unwrap().position
}

// =============================================================
// Click selection
// =============================================================

#[test]
fn click_on_room_selects_it_on_release() {
    let (mut engine, id) = engine_with_room();
    assert!(engine.on_pointer_down(pt(50, 50)).is_empty());
    assert_eq!(engine.selection(), Selection::None);

    let actions = engine.on_pointer_up();
    assert_eq!(engine.selection(), Selection::Room(id));
    assert!(actions.contains(&Action::SelectionChanged(Selection::Room(id))));
    let props = engine.selected_room_properties().unwrap();
    assert_eq!(props.type_label, "Bedroom");
    assert_eq!(props.area_m2, 16.0);
    assert!(actions.contains(&Action::PropertiesChanged(Some(props))));
}

#[test]
fn click_on_empty_canvas_clears_selection() {
    let (mut engine, id) = engine_with_room();
    engine.on_pointer_down(pt(50, 50));
    engine.on_pointer_up();
    assert_eq!(engine.selection(), Selection::Room(id));

    engine.on_pointer_down(pt(700, 500));
    let actions = engine.on_pointer_up();
    assert_eq!(engine.selection(), Selection::None);
    assert!(actions.contains(&Action::PropertiesChanged(None)));
}

#[test]
fn click_on_empty_canvas_without_selection_is_quiet() {
    let (mut engine, _) = engine_with_room();
    engine.on_pointer_down(pt(700, 500));
    assert!(engine.on_pointer_up().is_empty());
}

#[test]
fn press_on_placeable_selects_immediately() {
    let (mut engine, _) = engine_with_room();
    let chair = added_placeable(&drop_item(&mut engine, Category::Furniture, "Chair", pt(40, 40)));
    let actions = engine.on_pointer_down(pt(45, 45));
    assert_eq!(engine.selection(), Selection::Furniture(chair));
    assert!(actions.contains(&Action::PropertiesChanged(None)));
    assert!(engine.on_pointer_up().is_empty());
    assert_eq!(engine.selection(), Selection::Furniture(chair));
}

#[test]
fn pointer_up_without_press_does_nothing() {
    let (mut engine, _) = engine_with_room();
    assert!(engine.on_pointer_up().is_empty());
    assert!(engine.on_pointer_move(pt(10, 10)).is_empty());
}

// =============================================================
// Room drag
// =============================================================

#[test]
fn drag_room_commits_and_carries_contents() {
    let (mut engine, id) = engine_with_room();
    let sink = added_placeable(&drop_item(&mut engine, Category::Fixture, "Washbasin", pt(40, 40)));
    engine.state.selection = Selection::None;

    engine.on_pointer_down(pt(150, 150));
    let moved = engine.on_pointer_move(pt(430, 330));
    assert_eq!(moved, vec![Action::RenderNeeded]);
    let actions = engine.on_pointer_up();

    assert!(rejected(&actions).is_none());
    assert_eq!(room_bounds(&engine, &id), Rect::new(300, 200, 160, 160));
    assert_eq!(position(&engine, &sink), pt(320, 220));
    assert_eq!(engine.selection(), Selection::Room(id));
    assert_eq!(engine.state.input, InputState::Idle);
}

#[test]
fn drag_room_follows_live_and_clamps() {
    let (mut engine, id) = engine_with_room();
    engine.on_pointer_down(pt(30, 30));
    engine.on_pointer_move(pt(2000, 2000));
    // Canvas 800x600, room 160x160.
    assert_eq!(room_bounds(&engine, &id).origin(), pt(640, 440));
    engine.on_pointer_up();
    assert_eq!(room_bounds(&engine, &id).origin(), pt(640, 440));
}

#[test]
fn drag_room_onto_neighbour_reverts() {
    let mut engine = Engine::default();
    let a = added_room(&engine.add_room(RoomKind::Bedroom, 3.0, 4.0, None));
    let b = added_room(&engine.add_room(RoomKind::Kitchen, 3.0, 4.0, None));
    let stove = added_placeable(&drop_item(&mut engine, Category::Fixture, "Stove", pt(160, 40)));

    let actions = drag(&mut engine, pt(150, 30), pt(90, 30));

    assert_eq!(
        rejected(&actions),
        Some(&PlacementError::Overlap { subject: "Kitchen".into(), other: "Bedroom".into() })
    );
    assert_eq!(room_bounds(&engine, &b), Rect::new(140, 20, 120, 160));
    assert_eq!(room_bounds(&engine, &a), Rect::new(20, 20, 120, 160));
    assert_eq!(position(&engine, &stove), pt(160, 40));
    assert_eq!(engine.selection(), Selection::Room(b));
    assert_eq!(engine.state.input, InputState::Idle);
}

#[test]
fn drag_room_flush_against_neighbour_commits() {
    let mut engine = Engine::default();
    added_room(&engine.add_room(RoomKind::Bedroom, 3.0, 4.0, None));
    let b = added_room(&engine.add_room(RoomKind::Kitchen, 3.0, 4.0, None));
    let actions = drag(&mut engine, pt(150, 30), pt(30, 190));
    assert!(rejected(&actions).is_none());
    assert_eq!(room_bounds(&engine, &b).origin(), pt(20, 180));
}

// =============================================================
// Placeable drag
// =============================================================

#[test]
fn drag_furniture_is_clamped_to_room() {
    let (mut engine, _) = engine_with_room();
    let chair = added_placeable(&drop_item(&mut engine, Category::Furniture, "Chair", pt(40, 40)));
    engine.on_pointer_down(pt(45, 45));
    engine.on_pointer_move(pt(505, 505));
    assert_eq!(position(&engine, &chair), pt(140, 140));
    let actions = engine.on_pointer_up();
    assert!(rejected(&actions).is_none());
    assert_eq!(position(&engine, &chair), pt(140, 140));
}

#[test]
fn drag_fixture_outside_room_reverts_on_release() {
    let (mut engine, _) = engine_with_room();
    let sink = added_placeable(&drop_item(&mut engine, Category::Fixture, "Washbasin", pt(40, 40)));
    engine.on_pointer_down(pt(45, 45));
    engine.on_pointer_move(pt(405, 45));
    // Fixtures follow the pointer freely during the drag.
    assert_eq!(position(&engine, &sink), pt(400, 40));
    let actions = engine.on_pointer_up();
    assert_eq!(rejected(&actions), Some(&PlacementError::OutsideRoom { subject: "Washbasin".into() }));
    assert_eq!(position(&engine, &sink), pt(40, 40));
    assert_eq!(engine.selection(), Selection::Fixture(sink));
}

#[test]
fn drag_to_extreme_pointer_positions_does_not_overflow() {
    let (mut engine, room) = engine_with_room();
    let sink = added_placeable(&drop_item(&mut engine, Category::Fixture, "Washbasin", pt(40, 40)));
    let actions = drag(&mut engine, pt(45, 45), pt(i32::MIN, i32::MAX));
    assert_eq!(rejected(&actions), Some(&PlacementError::OutsideRoom { subject: "Washbasin".into() }));
    assert_eq!(position(&engine, &sink), pt(40, 40));

    let actions = drag(&mut engine, pt(100, 100), pt(i32::MAX, i32::MAX));
    assert_eq!(rejected(&actions), None);
    assert_eq!(room_bounds(&engine, &room).origin(), pt(640, 440));
}

#[test]
fn drag_fixture_onto_furniture_reverts() {
    let (mut engine, _) = engine_with_room();
    let sink = added_placeable(&drop_item(&mut engine, Category::Fixture, "Washbasin", pt(40, 40)));
    added_placeable(&drop_item(&mut engine, Category::Furniture, "Bed", pt(120, 40)));
    let actions = drag(&mut engine, pt(45, 45), pt(105, 45));
    assert!(matches!(rejected(&actions), Some(PlacementError::Overlap { .. })));
    assert_eq!(position(&engine, &sink), pt(40, 40));
}

#[test]
fn furniture_wins_press_over_fixture() {
    let mut engine = Engine::default();
    added_room(&engine.add_room(RoomKind::Bedroom, 4.0, 4.0, None));
    added_room(&engine.add_room(RoomKind::Bathroom, 3.0, 3.0, None));
    // Door overhangs from the first room into the second.
    added_placeable(&drop_item(&mut engine, Category::Fixture, "Door", pt(160, 40)));
    let bed = added_placeable(&drop_item(&mut engine, Category::Furniture, "Bed", pt(180, 40)));
    engine.on_pointer_down(pt(185, 45));
    assert_eq!(engine.selection(), Selection::Furniture(bed));
}

// =============================================================
// Drops
// =============================================================

#[test]
fn drop_furniture_on_fixture_is_rejected() {
    let (mut engine, id) = engine_with_room();
    drop_item(&mut engine, Category::Fixture, "Commode", pt(40, 40));
    let actions = drop_item(&mut engine, Category::Furniture, "Table", pt(60, 60));
    assert!(matches!(rejected(&actions), Some(PlacementError::Overlap { .. })));
    assert!(engine.layout().room(&id).unwrap().furniture.is_empty());
}

#[test]
fn drop_outside_rooms_is_rejected() {
    let (mut engine, _) = engine_with_room();
    let actions = drop_item(&mut engine, Category::Furniture, "Sofa", pt(600, 500));
    assert_eq!(actions, vec![Action::Rejected(PlacementError::NoTargetRoom)]);
}

#[test]
fn drop_legacy_payload() {
    let (mut engine, id) = engine_with_room();
    let payload: DragPayload = "FURNITURE:Sofa,images/sofa.png".parse().unwrap();
    let actions = engine.on_drop(&payload, pt(60, 60));
    let sofa = added_placeable(&actions);
    assert_eq!(engine.layout().placeable(&sofa).unwrap().parent, id);
}

// =============================================================
// Commands
// =============================================================

#[test]
fn add_room_without_reference_uses_default_placement() {
    let mut engine = Engine::default();
    let id = added_room(&engine.add_room(RoomKind::Bedroom, 3.0, 4.0, Some(Direction::East)));
    assert_eq!(room_bounds(&engine, &id), Rect::new(20, 20, 120, 160));
}

#[test]
fn add_room_east_of_selected_room() {
    let mut engine = Engine::default();
    let a = added_room(&engine.add_room(RoomKind::Bedroom, 3.0, 4.0, None));
    engine.state.selection = Selection::Room(a);
    let b = added_room(&engine.add_room(RoomKind::Kitchen, 2.0, 2.0, Some(Direction::East)));
    assert_eq!(room_bounds(&engine, &b), Rect::new(140, 20, 80, 80));
    assert_eq!(engine.layout().room(&b).unwrap().color, crate::doc::ColorTag::Red);
}

#[test]
fn add_room_relative_to_selected_placeable_parent() {
    let (mut engine, room) = engine_with_room();
    let sink = added_placeable(&drop_item(&mut engine, Category::Fixture, "Washbasin", pt(40, 40)));
    engine.state.selection = Selection::Fixture(sink);
    assert_eq!(engine.reference_room(), Some(room));
    let b = added_room(&engine.add_room(RoomKind::Bathroom, 2.0, 2.0, Some(Direction::South)));
    assert_eq!(room_bounds(&engine, &b), Rect::new(20, 180, 80, 80));
}

#[test]
fn add_room_north_off_canvas_is_rejected() {
    let (mut engine, room) = engine_with_room();
    engine.state.selection = Selection::Room(room);
    let actions = engine.add_room(RoomKind::Kitchen, 2.0, 2.0, Some(Direction::North));
    assert_eq!(actions, vec![Action::Rejected(PlacementError::OutOfBounds)]);
    assert_eq!(engine.layout().len(), 1);
}

#[test]
fn add_room_too_large_is_rejected() {
    let mut engine = Engine::default();
    let actions = engine.add_room(RoomKind::Bedroom, 30.0, 30.0, None);
    assert!(matches!(rejected(&actions), Some(PlacementError::RoomTooLarge { .. })));
}

#[test]
fn delete_selected_room_clears_selection() {
    let (mut engine, id) = engine_with_room();
    drop_item(&mut engine, Category::Furniture, "Bed", pt(40, 40));
    engine.on_pointer_down(pt(150, 150));
    engine.on_pointer_up();

    let actions = engine.delete_selected_room();
    assert_eq!(actions.first(), Some(&Action::RoomDeleted(id)));
    assert!(engine.layout().is_empty());
    assert_eq!(engine.layout().placeables().count(), 0);
    assert_eq!(engine.selection(), Selection::None);
}

#[test]
fn delete_without_selection_is_noop() {
    let (mut engine, _) = engine_with_room();
    assert!(engine.delete_selected_room().is_empty());
    assert!(engine.delete_selected_placeable().is_empty());
    assert!(engine.rotate_selected().is_empty());
    assert_eq!(engine.layout().len(), 1);
}

#[test]
fn delete_selected_placeable() {
    let (mut engine, id) = engine_with_room();
    let bed = added_placeable(&drop_item(&mut engine, Category::Furniture, "Bed", pt(40, 40)));
    engine.on_pointer_down(pt(45, 45));
    engine.on_pointer_up();
    let actions = engine.delete_selected_placeable();
    assert_eq!(actions.first(), Some(&Action::PlaceableDeleted(bed)));
    assert!(engine.layout().room(&id).unwrap().furniture.is_empty());
    assert_eq!(engine.selection(), Selection::None);
}

#[test]
fn rotate_selected_four_times_is_identity() {
    let (mut engine, _) = engine_with_room();
    let sink = added_placeable(&drop_item(&mut engine, Category::Fixture, "Shower", pt(40, 40)));
    engine.on_pointer_down(pt(45, 45));
    engine.on_pointer_up();
    engine.rotate_selected();
    assert_eq!(engine.layout().placeable(&sink).unwrap().rotation, Rotation::Deg90);
    for _ in 0..3 {
        assert_eq!(engine.rotate_selected(), vec![Action::RenderNeeded]);
    }
    assert_eq!(engine.layout().placeable(&sink).unwrap().rotation, Rotation::Deg0);
}

#[test]
fn save_and_load_reset_interaction() {
    let dir = tempfile::tempdir().unwrap();
    let (mut engine, id) = engine_with_room();
    drop_item(&mut engine, Category::Furniture, "Bed", pt(40, 40));
    let path = engine.save(&dir.path().join("home")).unwrap();
    assert_eq!(path.extension().unwrap(), "fpl");

    engine.state.selection = Selection::Room(id);
    engine.on_pointer_down(pt(50, 50));
    let actions = engine.load(&path).unwrap();

    assert!(actions.contains(&Action::SelectionChanged(Selection::None)));
    assert_eq!(engine.state, InteractionState::default());
    assert_eq!(engine.layout().len(), 1);
    assert_eq!(room_bounds(&engine, &engine.layout().rooms()[0].id), Rect::new(20, 20, 160, 160));
    assert_eq!(engine.layout().placeables().count(), 0);
}

#[test]
fn failed_load_keeps_layout() {
    let dir = tempfile::tempdir().unwrap();
    let (mut engine, id) = engine_with_room();
    assert!(engine.load(&dir.path().join("missing.fpl")).is_err());
    assert!(engine.layout().room(&id).is_some());
}
