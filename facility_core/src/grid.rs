use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Point, Rect},
    tile::Tile,
};

/// Flat row-major tile grid plus the room/door metadata produced by the
/// facility generator.
///
/// The grid is owned by one simulation session; the pathfinder and the
/// visibility engine borrow it but never replace it. `tiles.len()` is
/// always `width * height`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridMap {
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<Tile>,
    pub rooms: Vec<Rect>,
    pub doors: Vec<Point>,
}

impl GridMap {
    pub fn new(width: i32, height: i32) -> Self {
        debug_assert!(width >= 0 && height >= 0, "negative map dimensions");
        Self {
            width,
            height,
            tiles: vec![Tile::default(); (width * height) as usize],
            rooms: Vec::new(),
            doors: Vec::new(),
        }
    }

    /// Converts 2D coordinates into the flat tile index.
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Out-of-bounds lookups are a normal "no tile" result, never a panic.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        if self.in_bounds(x, y) {
            self.tiles.get(self.index(x, y))
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.tiles.get_mut(idx)
        } else {
            None
        }
    }

    pub fn set(&mut self, x: i32, y: i32, tile: Tile) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.tiles[idx] = tile;
        }
    }

    /// False for out-of-bounds coordinates and non-walkable tiles alike.
    #[inline]
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.get(x, y).map(|t| t.walkable).unwrap_or(false)
    }
}
