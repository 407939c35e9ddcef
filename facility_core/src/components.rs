use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

bitflags! {
    /// Presence bitmask: one bit per component kind, stored per entity
    /// slot. This mask is the single source of truth for "does entity E
    /// have component C"; payload arrays are never consulted for presence.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct ComponentMask: u32 {
        const POSITION = 1 << 0;
        const CONTROL = 1 << 1;
        const GLYPH = 1 << 2;
        /// Cannot be walked through. Mask-only: the bit itself is the data.
        const SOLID = 1 << 3;
        const INTERACTABLE = 1 << 4;
        const POWER_GENERATOR = 1 << 5;
        const DOOR = 1 << 6;
        const TERMINAL = 1 << 7;
    }
}

/// Where an entity stands on the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl From<Point> for Position {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// Health condition of a controlled entity.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerStatus {
    #[default]
    Healthy,
    Sick,
    Hurt,
}

impl PlayerStatus {
    pub fn title(self) -> &'static str {
        match self {
            PlayerStatus::Healthy => "Healthy",
            PlayerStatus::Sick => "SICK / TOXIC",
            PlayerStatus::Hurt => "Hurt",
        }
    }
}

/// Marks an entity as driven by the user (or by autopilot on their behalf).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerControl {
    pub autopilot: bool,
    /// Remaining steps towards the current autopilot destination.
    pub path: Vec<Point>,
    pub status: PlayerStatus,
}

/// Text-cell visual for the renderer: a character plus an RGBA tint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glyph {
    pub ch: char,
    pub color: [u8; 4],
}

impl Glyph {
    pub fn new(ch: char, color: [u8; 4]) -> Self {
        Self { ch, color }
    }
}

/// Lets the player trigger an action when adjacent and interacting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interactable {
    pub prompt: String,
}

/// Interactive power source feeding the facility grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerGenerator {
    pub active: bool,
}

/// Mechanism that can block both movement and sight while closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    pub open: bool,
}

/// Console that lets the player request a save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminal {
    pub saved: bool,
}
