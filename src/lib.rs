//! Floor-plan layout model and interaction controller.
//!
//! Rooms are axis-aligned rectangles on a fixed-size canvas. Each room owns
//! fixtures (sinks, doors, windows) and furniture. The library keeps the
//! layout consistent under every edit: rooms never overlap each other, and
//! the items inside a room never overlap regardless of category. A host UI
//! feeds pointer events and commands into [`engine::Engine`] and reacts to
//! the returned [`engine::Action`]s; it owns no layout rules of its own.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Gesture handling and editor commands over a layout |
//! | [`layout`] | Room and placeable operations with validation and rollback |
//! | [`doc`] | Room, fixture, and furniture types |
//! | [`geometry`] | Points, rectangles, grid snapping, unit conversion |
//! | [`input`] | Selection, gesture state, drag payloads |
//! | [`hit`] | Hit-testing with furniture over fixtures over rooms |
//! | [`codec`] | `.fpl` plan file encoding |
//! | [`config`] | Canvas and search limits from the environment |
//! | [`error`] | `ErrorCode` trait shared by all error enums |
//! | [`consts`] | Grid size, item sizes, defaults |

pub mod codec;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod layout;
