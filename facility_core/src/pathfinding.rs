use crate::{geometry::Point, grid::GridMap};

const NO_NODE: u32 = u32::MAX;

/// Neighbor offsets in expansion order: north, south, west, east.
/// The fixed order keeps search results stable across calls.
const NEIGHBORS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Per-cell search state. One slot per grid cell, addressed by the cell's
/// flat index, reused across searches via generation stamps.
#[derive(Debug, Clone, Copy)]
struct SearchNode {
    parent: u32,
    g: i32,
    h: i32,
    f: i32,
    heap_pos: u32,
    open_gen: u32,
    closed_gen: u32,
}

impl Default for SearchNode {
    fn default() -> Self {
        Self {
            parent: NO_NODE,
            g: 0,
            h: 0,
            f: 0,
            heap_pos: 0,
            open_gen: 0,
            closed_gen: 0,
        }
    }
}

/// Reusable grid A* search.
///
/// Pre-sized once for a map's dimensions; all per-search bookkeeping is
/// reset by bumping a generation counter instead of clearing arrays, so a
/// search allocates nothing after warm-up. One instance supports only
/// sequential searches; its buffers must not be shared.
#[derive(Debug)]
pub struct Pathfinder {
    width: i32,
    height: i32,
    nodes: Vec<SearchNode>,
    heap: Vec<u32>,
    generation: u32,
}

impl Pathfinder {
    pub fn new(width: i32, height: i32) -> Self {
        let area = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            nodes: vec![SearchNode::default(); area],
            heap: Vec::with_capacity(64),
            generation: 0,
        }
    }

    /// Shortest 4-directional path from `start` to `target`, both inclusive,
    /// under unit step cost and the Manhattan heuristic.
    ///
    /// Returns an empty path when the target tile is missing, non-walkable
    /// or unreachable; a missing path is a normal outcome, not an error.
    /// Ties on f-cost are broken by the smaller h-cost, which keeps the
    /// chosen path identical across calls on identical map state.
    pub fn find_path(&mut self, map: &GridMap, start: Point, target: Point) -> Vec<Point> {
        debug_assert_eq!(
            (self.width, self.height),
            (map.width, map.height),
            "pathfinder sized for a different map"
        );

        if !map.in_bounds(start.x, start.y) || !map.is_walkable(target.x, target.y) {
            return Vec::new();
        }

        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped around: stale stamps could alias the new generation.
            self.nodes.fill(SearchNode::default());
            self.generation = 1;
        }
        self.heap.clear();

        let start_idx = self.cell_index(start.x, start.y);
        let target_idx = self.cell_index(target.x, target.y);

        {
            let gen = self.generation;
            let node = &mut self.nodes[start_idx as usize];
            node.parent = NO_NODE;
            node.g = 0;
            node.h = start.manhattan_distance(target);
            node.f = node.h;
            node.open_gen = gen;
            node.closed_gen = 0;
        }
        self.heap_push(start_idx);

        while let Some(current_idx) = self.heap_pop() {
            if current_idx == target_idx {
                return self.reconstruct(target_idx);
            }

            self.nodes[current_idx as usize].closed_gen = self.generation;
            let current_g = self.nodes[current_idx as usize].g;
            let cx = current_idx as i32 % self.width;
            let cy = current_idx as i32 / self.width;

            for (dx, dy) in NEIGHBORS {
                let nx = cx + dx;
                let ny = cy + dy;
                if !map.is_walkable(nx, ny) {
                    continue;
                }

                let nidx = self.cell_index(nx, ny);
                let gen = self.generation;
                if self.nodes[nidx as usize].closed_gen == gen {
                    continue;
                }

                let tentative_g = current_g + 1;
                let node = &mut self.nodes[nidx as usize];
                if node.open_gen != gen {
                    node.parent = current_idx;
                    node.g = tentative_g;
                    node.h = Point::new(nx, ny).manhattan_distance(target);
                    node.f = tentative_g + node.h;
                    node.open_gen = gen;
                    node.closed_gen = 0;
                    self.heap_push(nidx);
                } else if tentative_g < node.g {
                    // A cheaper route to an already-open cell: relax in
                    // place and restore the heap order from its slot.
                    node.parent = current_idx;
                    node.g = tentative_g;
                    node.f = tentative_g + node.h;
                    let pos = node.heap_pos as usize;
                    self.sift_up(pos);
                }
            }
        }

        Vec::new()
    }

    #[inline]
    fn cell_index(&self, x: i32, y: i32) -> u32 {
        (y * self.width + x) as u32
    }

    fn reconstruct(&self, target_idx: u32) -> Vec<Point> {
        let mut path = Vec::new();
        let mut current = target_idx;
        while current != NO_NODE {
            path.push(Point::new(
                current as i32 % self.width,
                current as i32 / self.width,
            ));
            current = self.nodes[current as usize].parent;
        }
        path.reverse();
        path
    }

    /// Frontier ordering: smaller f first, then smaller h on ties.
    #[inline]
    fn ranks_before(&self, a: u32, b: u32) -> bool {
        let na = &self.nodes[a as usize];
        let nb = &self.nodes[b as usize];
        na.f < nb.f || (na.f == nb.f && na.h < nb.h)
    }

    fn heap_push(&mut self, idx: u32) {
        let pos = self.heap.len();
        self.heap.push(idx);
        self.nodes[idx as usize].heap_pos = pos as u32;
        self.sift_up(pos);
    }

    fn heap_pop(&mut self) -> Option<u32> {
        if self.heap.is_empty() {
            return None;
        }
        let top = self.heap[0];
        let last = self.heap.pop().unwrap();
        if !self.heap.is_empty() {
            self.heap[0] = last;
            self.nodes[last as usize].heap_pos = 0;
            self.sift_down(0);
        }
        Some(top)
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.ranks_before(self.heap[pos], self.heap[parent]) {
                break;
            }
            self.heap_swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        loop {
            let left = pos * 2 + 1;
            let right = pos * 2 + 2;
            let mut smallest = pos;

            if left < self.heap.len() && self.ranks_before(self.heap[left], self.heap[smallest]) {
                smallest = left;
            }
            if right < self.heap.len() && self.ranks_before(self.heap[right], self.heap[smallest]) {
                smallest = right;
            }
            if smallest == pos {
                break;
            }
            self.heap_swap(pos, smallest);
            pos = smallest;
        }
    }

    #[inline]
    fn heap_swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.nodes[self.heap[a] as usize].heap_pos = a as u32;
        self.nodes[self.heap[b] as usize].heap_pos = b as u32;
    }
}
