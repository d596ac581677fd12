use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use floorplan::codec::{self, CodecError};
use floorplan::config::{CANVAS_HEIGHT_VAR, CANVAS_WIDTH_VAR, ConfigError, LayoutConfig};
use floorplan::doc::{RoomId, RoomKind};
use floorplan::error::ErrorCode;
use floorplan::geometry::Point;
use floorplan::layout::{Direction, Layout, PlacementError, PlacementHint, parse_dimension};
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0} ({code})", code = .0.error_code())]
    Config(#[from] ConfigError),
    #[error("{0} ({code})", code = .0.error_code())]
    Codec(#[from] CodecError),
    #[error("{0} ({code})", code = .0.error_code())]
    Placement(#[from] PlacementError),
    #[error("no room at index {index}; the plan has {count} room(s)")]
    NoSuchRoom { index: usize, count: usize },
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

impl ErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(err) => err.error_code(),
            Self::Codec(err) => err.error_code(),
            Self::Placement(err) => err.error_code(),
            Self::NoSuchRoom { .. } => "E_NO_SUCH_ROOM",
            Self::Json(_) => "E_JSON_OUTPUT",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "floorplan", about = "Edit .fpl floor-plan files")]
struct Cli {
    #[arg(long, global = true, env = CANVAS_WIDTH_VAR)]
    canvas_width: Option<i32>,

    #[arg(long, global = true, env = CANVAS_HEIGHT_VAR)]
    canvas_height: Option<i32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write an empty plan.
    New { file: PathBuf },
    /// Print every room with its properties.
    Show { file: PathBuf },
    /// Add a room, by default at the first free slot.
    AddRoom {
        file: PathBuf,
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Width in meters.
        #[arg(long, value_parser = parse_dimension)]
        width: f64,
        /// Height in meters.
        #[arg(long, value_parser = parse_dimension)]
        height: f64,
        /// Place flush against the room at this index.
        #[arg(long, requires = "direction")]
        next_to: Option<usize>,
        #[arg(long, value_enum, requires = "next_to")]
        direction: Option<DirectionArg>,
    },
    /// Move a room's top-left corner (snapped and clamped to the canvas).
    MoveRoom {
        file: PathBuf,
        index: usize,
        #[arg(long, allow_negative_numbers = true)]
        x: i32,
        #[arg(long, allow_negative_numbers = true)]
        y: i32,
    },
    /// Delete a room and everything in it.
    DeleteRoom { file: PathBuf, index: usize },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum KindArg {
    Bedroom,
    Kitchen,
    DrawingRoom,
    Bathroom,
}

impl From<KindArg> for RoomKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Bedroom => Self::Bedroom,
            KindArg::Kitchen => Self::Kitchen,
            KindArg::DrawingRoom => Self::DrawingRoom,
            KindArg::Bathroom => Self::Bathroom,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum DirectionArg {
    North,
    East,
    South,
    West,
}

impl From<DirectionArg> for Direction {
    fn from(direction: DirectionArg) -> Self {
        match direction {
            DirectionArg::North => Self::North,
            DirectionArg::East => Self::East,
            DirectionArg::South => Self::South,
            DirectionArg::West => Self::West,
        }
    }
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = layout_config(&cli)?;
    tracing::debug!(?config, "layout config resolved");
    let output = run(cli.command, config)?;
    print_json(&output)
}

/// Environment config with canvas flags applied on top.
fn layout_config(cli: &Cli) -> Result<LayoutConfig, CliError> {
    let base = LayoutConfig::from_env()?;
    let width = positive_flag(CANVAS_WIDTH_VAR, cli.canvas_width)?.unwrap_or(base.canvas_width);
    let height = positive_flag(CANVAS_HEIGHT_VAR, cli.canvas_height)?.unwrap_or(base.canvas_height);
    Ok(base.with_canvas(width, height))
}

fn positive_flag(var: &'static str, value: Option<i32>) -> Result<Option<i32>, ConfigError> {
    match value {
        Some(v) if v <= 0 => Err(ConfigError::NotPositive { var, value: i64::from(v) }),
        other => Ok(other),
    }
}

fn run(command: Command, config: LayoutConfig) -> Result<Value, CliError> {
    match command {
        Command::New { file } => {
            let path = codec::save(&Layout::new(config), &file)?;
            Ok(json!({ "path": path.display().to_string(), "rooms": 0 }))
        }
        Command::Show { file } => {
            let layout = open(&file, config)?;
            describe(&layout)
        }
        Command::AddRoom { file, kind, width, height, next_to, direction } => {
            let mut layout = open(&file, config)?;
            let hint = match (next_to, direction) {
                (Some(index), Some(direction)) => PlacementHint::Adjacent {
                    reference: room_id_at(&layout, index)?,
                    direction: direction.into(),
                },
                _ => PlacementHint::Default,
            };
            let kind = RoomKind::from(kind);
            let id = layout.add_room(kind.label(), kind.color(), width, height, hint)?;
            codec::save(&layout, &file)?;
            room_json(&layout, &id)
        }
        Command::MoveRoom { file, index, x, y } => {
            let mut layout = open(&file, config)?;
            let id = room_id_at(&layout, index)?;
            layout.move_room(&id, Point::new(x, y))?;
            codec::save(&layout, &file)?;
            room_json(&layout, &id)
        }
        Command::DeleteRoom { file, index } => {
            let mut layout = open(&file, config)?;
            let id = room_id_at(&layout, index)?;
            let removed = layout.delete_room(&id);
            codec::save(&layout, &file)?;
            Ok(json!({
                "deleted": removed.map(|room| room.type_label),
                "rooms": layout.len(),
            }))
        }
    }
}

fn open(file: &Path, config: LayoutConfig) -> Result<Layout, CliError> {
    Ok(codec::load(&codec::with_plan_extension(file), &config)?)
}

fn room_id_at(layout: &Layout, index: usize) -> Result<RoomId, CliError> {
    layout
        .rooms()
        .get(index)
        .map(|room| room.id)
        .ok_or(CliError::NoSuchRoom { index, count: layout.len() })
}

fn room_json(layout: &Layout, id: &RoomId) -> Result<Value, CliError> {
    Ok(serde_json::to_value(layout.room_properties(id))?)
}

fn describe(layout: &Layout) -> Result<Value, CliError> {
    let canvas = layout.canvas();
    let mut rooms = Vec::with_capacity(layout.len());
    for (index, room) in layout.rooms().iter().enumerate() {
        let mut entry = serde_json::to_value(layout.room_properties(&room.id))?;
        if let Some(map) = entry.as_object_mut() {
            map.insert("index".to_owned(), json!(index));
            map.insert("bounds".to_owned(), serde_json::to_value(room.bounds)?);
            map.insert("fill".to_owned(), json!(room.color.hex()));
        }
        rooms.push(entry);
    }
    Ok(json!({
        "canvas": { "width": canvas.width, "height": canvas.height },
        "rooms": rooms,
    }))
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
