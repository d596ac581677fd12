//! `.fpl` plan files: a JSON array of room records.
//!
//! Only room geometry, colour, and label are stored. Fixtures and furniture
//! are dropped on save, and loaded rooms come back empty with fresh ids.

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::LayoutConfig;
use crate::consts::PLAN_EXTENSION;
use crate::doc::{ColorTag, Room};
use crate::error::ErrorCode;
use crate::geometry::Rect;
use crate::layout::Layout;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("plan file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("plan data is malformed: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("plan data is inconsistent: {0}")]
    Invalid(String),
}

impl ErrorCode for CodecError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "E_PLAN_IO",
            Self::Decode(_) => "E_PLAN_DECODE",
            Self::Invalid(_) => "E_PLAN_INVALID",
        }
    }
}

/// One persisted room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub color: ColorTag,
    #[serde(rename = "type")]
    pub type_label: String,
}

impl From<&Room> for RoomRecord {
    fn from(room: &Room) -> Self {
        Self {
            x: room.bounds.x,
            y: room.bounds.y,
            width: room.bounds.width,
            height: room.bounds.height,
            color: room.color,
            type_label: room.type_label.clone(),
        }
    }
}

impl RoomRecord {
    fn into_room(self) -> Room {
        Room::new(Rect::new(self.x, self.y, self.width, self.height), self.color, &self.type_label)
    }
}

/// Encode the rooms of `layout` in layout order.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if JSON encoding fails.
pub fn serialize(layout: &Layout) -> Result<Vec<u8>, CodecError> {
    let records: Vec<RoomRecord> = layout.rooms().iter().map(RoomRecord::from).collect();
    Ok(serde_json::to_vec_pretty(&records)?)
}

/// Decode a plan into a new layout using `config` for the canvas.
///
/// # Errors
///
/// [`CodecError::Decode`] for malformed JSON, [`CodecError::Invalid`] for a
/// room with a non-positive size or an edge past `i32::MAX`, or for two
/// overlapping rooms.
pub fn deserialize(bytes: &[u8], config: &LayoutConfig) -> Result<Layout, CodecError> {
    let records: Vec<RoomRecord> = serde_json::from_slice(bytes)?;
    let rooms = records.into_iter().map(RoomRecord::into_room).collect();
    Layout::from_rooms(*config, rooms).map_err(|err| CodecError::Invalid(err.to_string()))
}

/// Path with `.fpl` appended unless it already ends in it (any case).
#[must_use]
pub fn with_plan_extension(path: &Path) -> PathBuf {
    let has_ext = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PLAN_EXTENSION));
    if has_ext {
        return path.to_path_buf();
    }
    let mut raw = OsString::from(path.as_os_str());
    raw.push(".");
    raw.push(PLAN_EXTENSION);
    PathBuf::from(raw)
}

/// Write `layout` to `path` (with the plan extension added if missing).
/// Returns the path actually written.
///
/// # Errors
///
/// [`CodecError::Io`] if the file cannot be written.
pub fn save(layout: &Layout, path: &Path) -> Result<PathBuf, CodecError> {
    let path = with_plan_extension(path);
    let bytes = serialize(layout)?;
    std::fs::write(&path, bytes)?;
    info!(path = %path.display(), rooms = layout.len(), "plan saved");
    Ok(path)
}

/// Read a plan from `path`.
///
/// # Errors
///
/// [`CodecError::Io`] if the file cannot be read, otherwise see [`deserialize`].
pub fn load(path: &Path, config: &LayoutConfig) -> Result<Layout, CodecError> {
    let bytes = std::fs::read(path)?;
    let layout = deserialize(&bytes, config)?;
    info!(path = %path.display(), rooms = layout.len(), "plan loaded");
    Ok(layout)
}
