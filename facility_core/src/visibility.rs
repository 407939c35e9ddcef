use crate::grid::GridMap;

/// Recompute the field of view around `(origin_x, origin_y)`.
///
/// Clears `visible` on every tile, then casts one ray to each cell on the
/// perimeter of the radius box (clamped to map bounds). Tiles reached by a
/// ray become visible and explored and record their viewing depth;
/// `explored` is never cleared. A cell where `blocks_light` reports true
/// ends its ray but stays lit itself. The origin tile is always visible.
///
/// `blocks_light` is caller-supplied so dynamic obstructions such as
/// closed doors and solid fixtures can occlude sight without this module
/// knowing about entity state.
pub fn compute_fov<F>(map: &mut GridMap, origin_x: i32, origin_y: i32, radius: i32, blocks_light: F)
where
    F: Fn(i32, i32) -> bool,
{
    for tile in &mut map.tiles {
        tile.visible = false;
    }

    if !map.in_bounds(origin_x, origin_y) {
        return;
    }

    let min_x = (origin_x - radius).max(0);
    let max_x = (origin_x + radius).min(map.width - 1);
    let min_y = (origin_y - radius).max(0);
    let max_y = (origin_y + radius).min(map.height - 1);

    for x in min_x..=max_x {
        cast_ray(map, origin_x, origin_y, x, min_y, &blocks_light);
        cast_ray(map, origin_x, origin_y, x, max_y, &blocks_light);
    }
    for y in min_y..=max_y {
        cast_ray(map, origin_x, origin_y, min_x, y, &blocks_light);
        cast_ray(map, origin_x, origin_y, max_x, y, &blocks_light);
    }

    // The viewer always sees their own tile, even when standing inside an
    // occluder.
    let idx = map.index(origin_x, origin_y);
    map.tiles[idx].visible = true;
    map.tiles[idx].explored = true;
    map.tiles[idx].distance = 0;
}

/// Walk a Bresenham line from the origin towards `(x2, y2)`, lighting each
/// cell in ray order until the ray leaves the map or hits an occluder.
fn cast_ray<F>(map: &mut GridMap, x1: i32, y1: i32, x2: i32, y2: i32, blocks_light: &F)
where
    F: Fn(i32, i32) -> bool,
{
    walk_line(x1, y1, x2, y2, |x, y| {
        if !map.in_bounds(x, y) {
            return false;
        }

        let depth = (x - x1).abs().max((y - y1).abs());
        let idx = map.index(x, y);
        map.tiles[idx].visible = true;
        map.tiles[idx].explored = true;
        map.tiles[idx].distance = depth;

        // Light does not pass through a blocking cell, but the cell itself
        // stays lit.
        !blocks_light(x, y)
    });
}

/// Integer Bresenham line walk. Calls `visit` for every cell from
/// `(x0, y0)` to `(x1, y1)` inclusive, in order, stopping early when
/// `visit` returns false. Horizontal and vertical error steps may trigger
/// in the same iteration, producing a diagonal step.
fn walk_line<F>(mut x0: i32, mut y0: i32, x1: i32, y1: i32, mut visit: F)
where
    F: FnMut(i32, i32) -> bool,
{
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if !visit(x0, y0) {
            return;
        }
        if x0 == x1 && y0 == y1 {
            return;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{Tile, TileKind};

    fn test_map(layout: &str) -> GridMap {
        let lines: Vec<&str> = layout.trim().lines().map(str::trim).collect();
        let height = lines.len() as i32;
        let width = lines[0].len() as i32;
        let mut map = GridMap::new(width, height);
        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                let tile = if ch == '#' { Tile::wall() } else { Tile::floor(0) };
                map.set(x as i32, y as i32, tile);
            }
        }
        map
    }

    fn wall_blocks(map: &GridMap) -> impl Fn(i32, i32) -> bool + '_ {
        |x, y| {
            map.get(x, y)
                .map(|t| t.kind == TileKind::Wall)
                .unwrap_or(true)
        }
    }

    #[test]
    fn origin_is_always_visible() {
        let mut map = test_map(
            "#####
             #####
             #####",
        );
        // Standing inside solid rock: the viewer still sees their own cell.
        compute_fov(&mut map, 2, 1, 4, |_, _| true);
        let origin = map.get(2, 1).unwrap();
        assert!(origin.visible);
        assert!(origin.explored);
        assert_eq!(origin.distance, 0);
    }

    #[test]
    fn wall_stops_the_ray_but_stays_lit() {
        let mut map = test_map(
            ".......
             .......
             ...#...
             .......
             .......",
        );
        let blocked: Vec<(i32, i32)> = map
            .tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.kind == TileKind::Wall)
            .map(|(i, _)| (i as i32 % map.width, i as i32 / map.width))
            .collect();
        assert_eq!(blocked, vec![(3, 2)]);

        let snapshot = map.clone();
        compute_fov(&mut map, 0, 2, 10, wall_blocks(&snapshot));

        assert!(map.get(3, 2).unwrap().visible, "blocking wall must stay lit");
        assert!(
            !map.get(4, 2).unwrap().visible,
            "tile behind the wall must be dark"
        );
        assert!(map.get(0, 2).unwrap().visible);
        assert!(map.get(2, 2).unwrap().visible);
    }

    #[test]
    fn visible_implies_explored() {
        let mut map = test_map(
            ".....
             ..#..
             .....",
        );
        let snapshot = map.clone();
        compute_fov(&mut map, 0, 0, 6, wall_blocks(&snapshot));

        for tile in &map.tiles {
            if tile.visible {
                assert!(tile.explored);
            }
        }
    }

    #[test]
    fn explored_is_monotonic_across_recomputes() {
        let mut map = test_map(
            "..........
             ..........
             ..........",
        );
        compute_fov(&mut map, 0, 1, 3, |_, _| false);
        let explored_before: Vec<bool> = map.tiles.iter().map(|t| t.explored).collect();

        // Move the viewer far away; old tiles go dark but stay explored.
        compute_fov(&mut map, 9, 1, 3, |_, _| false);
        for (i, was_explored) in explored_before.iter().enumerate() {
            if *was_explored {
                assert!(map.tiles[i].explored, "tile {i} lost its explored flag");
            }
        }
        assert!(!map.get(0, 1).unwrap().visible);
    }

    #[test]
    fn radius_clamps_to_map_bounds() {
        let mut map = test_map(
            "...
             ...",
        );
        compute_fov(&mut map, 0, 0, 50, |_, _| false);
        assert!(map.tiles.iter().all(|t| t.visible));
    }

    #[test]
    fn depth_records_chebyshev_distance() {
        let mut map = test_map(
            ".....
             .....
             .....",
        );
        compute_fov(&mut map, 2, 1, 4, |_, _| false);
        assert_eq!(map.get(2, 1).unwrap().distance, 0);
        assert_eq!(map.get(4, 1).unwrap().distance, 2);
        assert_eq!(map.get(0, 0).unwrap().distance, 2);
    }

    #[test]
    fn dynamic_occluders_block_sight() {
        let mut map = test_map(
            ".......
             .......",
        );
        // A closed door at (3, 0), supplied purely through the predicate.
        compute_fov(&mut map, 0, 0, 10, |x, y| x == 3 && y == 0);
        assert!(map.get(3, 0).unwrap().visible);
        assert!(!map.get(5, 0).unwrap().visible);
        assert!(!map.get(6, 0).unwrap().visible);
    }
}
