//! Shared numeric constants for the layout model.

// ── Grid ────────────────────────────────────────────────────────

/// Snapping quantum in canvas units. One grid cell is half a meter.
pub const GRID_SIZE: i32 = 20;

/// Canvas units per meter (`GRID_SIZE * 2`).
pub const UNITS_PER_METER: f64 = (GRID_SIZE * 2) as f64;

// ── Placeables ──────────────────────────────────────────────────

/// Side length of a fixture's square bounding box.
pub const FIXTURE_SIZE: i32 = 40;

/// Side length of a furniture item's square bounding box.
pub const FURNITURE_SIZE: i32 = 40;

// ── Canvas ──────────────────────────────────────────────────────

/// Default canvas width when no configuration overrides it.
pub const DEFAULT_CANVAS_WIDTH: i32 = 800;

/// Default canvas height when no configuration overrides it.
pub const DEFAULT_CANVAS_HEIGHT: i32 = 600;

/// Upper bound on candidate positions tried by default room placement.
pub const DEFAULT_MAX_PLACEMENT_ATTEMPTS: usize = 1000;

// ── Persistence ─────────────────────────────────────────────────

/// File extension for saved floor plans, without the leading dot.
pub const PLAN_EXTENSION: &str = "fpl";
