use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Point, Rect},
    grid::GridMap,
    tile::{
        Tile, TileKind, FLOOR_VARIANTS, WALL_MASK_EAST, WALL_MASK_NORTH, WALL_MASK_SOUTH,
        WALL_MASK_WEST,
    },
};

/// Room placement policy for the facility generator.
///
/// The attempt budget is a policy knob rather than a hidden constant:
/// every attempt counts against it, including rolls rejected for overlap
/// or for not fitting, so small maps may legitimately end up with zero
/// or one room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub max_room_attempts: u32,
    pub min_room_size: i32,
    pub max_room_size: i32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_room_attempts: 50,
            min_room_size: 4,
            max_room_size: 10,
        }
    }
}

/// Result of a successful generation run.
#[derive(Debug, Clone)]
pub struct GeneratedFacility {
    pub map: GridMap,
    pub spawn: Point,
}

/// Randomized facility builder: room placement, L-corridor carving, wall
/// auto-tile masks and doorway detection. Deterministic for a given seed.
#[derive(Debug)]
pub struct FacilityGenerator {
    rng: SmallRng,
    config: GeneratorConfig,
}

impl FacilityGenerator {
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, GeneratorConfig::default())
    }

    pub fn with_config(seed: u64, config: GeneratorConfig) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            config,
        }
    }

    /// Build a facility map. Returns `None` when either dimension is below
    /// the minimum room size; no partial map is ever produced.
    pub fn generate(&mut self, width: i32, height: i32) -> Option<GeneratedFacility> {
        if width < self.config.min_room_size || height < self.config.min_room_size {
            return None;
        }

        // Spawn falls back to the map center if no room is ever accepted.
        let mut spawn = Point::new(width / 2, height / 2);

        let mut map = GridMap::new(width, height);
        for x in 0..width {
            for y in 0..height {
                map.set(x, y, Tile::wall());
            }
        }

        let mut rooms: Vec<Rect> = Vec::new();

        for _ in 0..self.config.max_room_attempts {
            let room_w = self
                .rng
                .gen_range(self.config.min_room_size..=self.config.max_room_size);
            let room_h = self
                .rng
                .gen_range(self.config.min_room_size..=self.config.max_room_size);

            let max_x = width - room_w - 1;
            let max_y = height - room_h - 1;

            // The rolled room cannot fit anywhere; the attempt is spent.
            if max_x < 0 || max_y < 0 {
                continue;
            }

            let x = self.rng.gen_range(0..=max_x);
            let y = self.rng.gen_range(0..=max_y);
            let new_room = Rect::new(x, y, x + room_w, y + room_h);

            if rooms.iter().any(|other| new_room.intersects(other)) {
                continue;
            }

            for rx in new_room.x1..=new_room.x2 {
                for ry in new_room.y1..=new_room.y2 {
                    self.carve_floor(&mut map, rx, ry);
                }
            }

            if let Some(prev_room) = rooms.last() {
                let prev = prev_room.center();
                let next = new_room.center();

                if self.rng.gen_range(0..2) == 1 {
                    // Horizontal then vertical.
                    self.carve_horizontal_corridor(&mut map, prev.x, next.x, prev.y);
                    self.carve_vertical_corridor(&mut map, prev.y, next.y, next.x);
                } else {
                    // Vertical then horizontal.
                    self.carve_vertical_corridor(&mut map, prev.y, next.y, prev.x);
                    self.carve_horizontal_corridor(&mut map, prev.x, next.x, next.y);
                }
            } else {
                spawn = new_room.center();
            }

            rooms.push(new_room);
        }

        map.rooms = rooms;
        compute_wall_masks(&mut map);
        map.doors = find_doorways(&map);

        tracing::debug!(
            target: "facility_core::mapgen",
            width,
            height,
            rooms = map.rooms.len(),
            doors = map.doors.len(),
            walkable = map.tiles.iter().filter(|t| t.walkable).count(),
            "facility generated"
        );

        Some(GeneratedFacility { map, spawn })
    }

    fn carve_floor(&mut self, map: &mut GridMap, x: i32, y: i32) {
        // 80% plain floor, 20% one of the four noise variants.
        let variant = if self.rng.gen_range(0..10) < 2 {
            self.rng.gen_range(1..=FLOOR_VARIANTS)
        } else {
            0
        };
        map.set(x, y, Tile::floor(variant));
    }

    fn carve_horizontal_corridor(&mut self, map: &mut GridMap, x1: i32, x2: i32, y: i32) {
        let (x1, x2) = if x1 > x2 { (x2, x1) } else { (x1, x2) };
        for x in x1..=x2 {
            self.carve_floor(map, x, y);
        }
    }

    fn carve_vertical_corridor(&mut self, map: &mut GridMap, y1: i32, y2: i32, x: i32) {
        let (y1, y2) = if y1 > y2 { (y2, y1) } else { (y1, y2) };
        for y in y1..=y2 {
            self.carve_floor(map, x, y);
        }
    }
}

/// Stamp the 4-bit wall-neighbor mask onto every wall tile. A missing
/// (out-of-bounds) neighbor contributes no bit.
fn compute_wall_masks(map: &mut GridMap) {
    let is_wall = |map: &GridMap, x: i32, y: i32| {
        map.get(x, y).map(|t| t.kind == TileKind::Wall).unwrap_or(false)
    };

    for y in 0..map.height {
        for x in 0..map.width {
            if map.get(x, y).map(|t| t.kind) != Some(TileKind::Wall) {
                continue;
            }

            let mut mask = 0u8;
            if is_wall(map, x, y - 1) {
                mask |= WALL_MASK_NORTH;
            }
            if is_wall(map, x + 1, y) {
                mask |= WALL_MASK_EAST;
            }
            if is_wall(map, x, y + 1) {
                mask |= WALL_MASK_SOUTH;
            }
            if is_wall(map, x - 1, y) {
                mask |= WALL_MASK_WEST;
            }

            if let Some(tile) = map.get_mut(x, y) {
                tile.wall_mask = mask;
            }
        }
    }
}

/// Scan the one-tile perimeter outside every room edge; each walkable
/// perimeter cell is a doorway anchor, deduplicated by coordinate.
fn find_doorways(map: &GridMap) -> Vec<Point> {
    let mut doors = Vec::new();
    let mut seen = std::collections::HashSet::new();

    let mut record = |doors: &mut Vec<Point>, seen: &mut std::collections::HashSet<Point>, p: Point| {
        if map.is_walkable(p.x, p.y) && seen.insert(p) {
            doors.push(p);
        }
    };

    for room in &map.rooms {
        for x in room.x1..=room.x2 {
            record(&mut doors, &mut seen, Point::new(x, room.y1 - 1));
            record(&mut doors, &mut seen, Point::new(x, room.y2 + 1));
        }
        for y in room.y1..=room.y2 {
            record(&mut doors, &mut seen, Point::new(room.x1 - 1, y));
            record(&mut doors, &mut seen, Point::new(room.x2 + 1, y));
        }
    }

    doors
}
