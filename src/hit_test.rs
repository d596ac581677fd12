use super::*;
use crate::doc::ColorTag;
use crate::layout::PlacementHint;

fn two_rooms() -> (Layout, RoomId, RoomId) {
    let mut layout = Layout::default();
    let a = layout
        .add_room("Bedroom", ColorTag::Green, 4.0, 4.0, PlacementHint::Default)
        .unwrap();
    let b = layout
        .add_room("Bathroom", ColorTag::Blue, 3.0, 3.0, PlacementHint::Default)
        .unwrap();
    (layout, a, b)
}

#[test]
fn empty_canvas_hits_nothing() {
    let (layout, _, _) = two_rooms();
    assert_eq!(hit_test(Point::new(700, 500), &layout), None);
}

#[test]
fn room_body_hit() {
    let (layout, a, b) = two_rooms();
    assert_eq!(hit_test(Point::new(30, 30), &layout), Some(Hit::Room(a)));
    // Room b starts where a ends.
    assert_eq!(hit_test(Point::new(180, 30), &layout), Some(Hit::Room(b)));
}

#[test]
fn fixture_beats_room() {
    let (mut layout, a, _) = two_rooms();
    let sink = layout.add_fixture("Washbasin", "images/washbasin.png", Point::new(40, 40)).unwrap();
    let hit = hit_test(Point::new(50, 50), &layout).unwrap();
    assert_eq!(hit, Hit::Placeable { id: sink, category: Category::Fixture, room: a });
    assert_eq!(hit.room_id(), a);
}

#[test]
fn adjacent_placeables_hit_separately() {
    let (mut layout, a, _) = two_rooms();
    let sink = layout.add_fixture("Washbasin", "images/washbasin.png", Point::new(40, 40)).unwrap();
    let chair = layout.add_furniture("Chair", "images/chair.png", Point::new(80, 40)).unwrap();
    assert_eq!(
        hit_test(Point::new(85, 45), &layout),
        Some(Hit::Placeable { id: chair, category: Category::Furniture, room: a })
    );
    assert_eq!(
        hit_test(Point::new(75, 45), &layout),
        Some(Hit::Placeable { id: sink, category: Category::Fixture, room: a })
    );
}

#[test]
fn furniture_beats_fixture_across_rooms() {
    let (mut layout, a, b) = two_rooms();
    // Fixture in a overhangs into b; furniture in b covers the same point.
    let door = layout.add_fixture("Door", "images/door.png", Point::new(160, 40)).unwrap();
    assert_eq!(layout.placeable(&door).unwrap().parent, a);
    let bed = layout.add_furniture("Bed", "images/bed.png", Point::new(180, 40)).unwrap();
    assert_eq!(
        hit_test(Point::new(185, 45), &layout),
        Some(Hit::Placeable { id: bed, category: Category::Furniture, room: b })
    );
}

#[test]
fn placeable_edges_are_half_open() {
    let (mut layout, a, _) = two_rooms();
    layout.add_fixture("Stove", "images/stove.png", Point::new(40, 40)).unwrap();
    assert_eq!(hit_test(Point::new(80, 80), &layout), Some(Hit::Room(a)));
}
