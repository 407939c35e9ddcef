use serde::{Deserialize, Serialize};

/// Number of floor texture variants the generator can roll (1..=4).
/// Variant 0 is the plain, untextured floor.
pub const FLOOR_VARIANTS: u8 = 4;

/// Wall neighbor bits used for renderer auto-tiling.
pub const WALL_MASK_NORTH: u8 = 0b0001;
pub const WALL_MASK_EAST: u8 = 0b0010;
pub const WALL_MASK_SOUTH: u8 = 0b0100;
pub const WALL_MASK_WEST: u8 = 0b1000;

/// Static classification of a grid cell.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Empty = 0,
    Wall = 1,
    Floor = 2,
}

/// One grid cell's walkability and visual state.
///
/// Allocated once at generation time and mutated afterwards by the
/// visibility pass (`visible`, `explored`, `distance`) and by the
/// generator's auto-tiling post process (`wall_mask`).
/// Invariant: `visible` implies `explored`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    pub walkable: bool,
    /// Is the controlled entity looking at this tile right now?
    pub visible: bool,
    /// Has this tile ever been seen? Never reset once true.
    pub explored: bool,
    /// Procedural texture noise, 0 = plain.
    pub variant: u8,
    /// Chebyshev distance from the viewer when last visible, for depth shading.
    pub distance: i32,
    /// 4-bit N/E/S/W neighbor mask for wall auto-tiling.
    pub wall_mask: u8,
}

impl Tile {
    pub fn wall() -> Self {
        Self {
            kind: TileKind::Wall,
            walkable: false,
            ..Self::default()
        }
    }

    pub fn floor(variant: u8) -> Self {
        Self {
            kind: TileKind::Floor,
            walkable: true,
            variant,
            ..Self::default()
        }
    }
}
