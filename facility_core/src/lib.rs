//! Simulation core for a derelict-facility exploration prototype.
//!
//! Owns the procedurally generated grid map, the fixed-capacity
//! entity-component store and the deterministic per-tick systems
//! (movement, autopilot, interactions, power, field of view). Rendering,
//! raw input polling and save-file I/O are external adapters: the core
//! exposes read-only state to them and consumes their drained event
//! lists, nothing more.

mod components;
pub mod config;
mod error;
pub mod geometry;
pub mod grid;
pub mod input;
pub mod mapgen;
pub mod pathfinding;
mod session;
pub mod snapshot;
mod store;
pub mod systems;
pub mod telemetry;
mod tile;
pub mod visibility;

pub use components::{
    ComponentMask, Door, Glyph, Interactable, PlayerControl, PlayerStatus, Position,
    PowerGenerator, Terminal,
};
pub use config::SimulationConfig;
pub use error::{ConfigError, SimError, StoreError};
pub use geometry::{Point, Rect};
pub use grid::GridMap;
pub use input::{InputEvent, InputQueue, InputSender, Key};
pub use mapgen::{FacilityGenerator, GeneratedFacility, GeneratorConfig};
pub use pathfinding::Pathfinder;
pub use session::{Simulation, TickReport};
pub use snapshot::SaveState;
pub use store::{Entity, EntityStore};
pub use systems::PowerStatus;
pub use tile::{
    Tile, TileKind, FLOOR_VARIANTS, WALL_MASK_EAST, WALL_MASK_NORTH, WALL_MASK_SOUTH,
    WALL_MASK_WEST,
};
pub use visibility::compute_fov;
