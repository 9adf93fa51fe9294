use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::heap::ScoredHeap;

/// Step costs for 8-directional movement. Diagonal cost is a fixed
/// constant so path costs and the heuristic agree exactly.
const CARDINAL_COST: f32 = 1.0;
const DIAGONAL_COST: f32 = std::f32::consts::SQRT_2;

const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// A single grid cell on a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Search node. Nodes live in a per-search arena; `parent` is an arena
/// index, so the links form a DAG terminating at the start node.
struct SearchNode {
    x: i32,
    y: i32,
    g: f32,
    h: f32,
    f: f32,
    parent: Option<usize>,
}

/// Open-set handle for one discovered cell. Equality is on the cell
/// alone so a rescore can locate the stale entry after `f` changed.
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    cell: usize,
    f: f32,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cell == other.cell
    }
}

/// Octile distance: admissible and consistent for 8-directional grids
/// with these step costs
#[inline]
fn octile(x: i32, y: i32, goal_x: i32, goal_y: i32) -> f32 {
    let dx = (x - goal_x).abs() as f32;
    let dy = (y - goal_y).abs() as f32;
    (dx + dy) + (DIAGONAL_COST - 2.0) * dx.min(dy)
}

/// A* pathfinder over a flat walkability bitmap.
///
/// The bitmap is row-major, `y * width + x`. Searches are synchronous
/// and self-contained; map mutations take effect for subsequent searches
/// only.
pub struct Pathfinder {
    width: i32,
    height: i32,
    walkable: Vec<bool>,
}

impl Pathfinder {
    /// Create a pathfinder over a row-major walkability bitmap
    pub fn new(width: i32, height: i32, walkable: Vec<bool>) -> Self {
        assert_eq!(walkable.len(), (width * height) as usize);
        Self {
            width,
            height,
            walkable,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    #[inline]
    fn cell_index(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    /// Walkability at a coordinate. Out-of-range reads are blocked,
    /// never wrapped.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.walkable[self.cell_index(x, y)]
    }

    /// Replace the whole walkability bitmap
    pub fn set_walkable_map(&mut self, walkable: Vec<bool>) {
        assert_eq!(walkable.len(), (self.width * self.height) as usize);
        self.walkable = walkable;
    }

    /// Mutate a single cell. Out-of-range updates are ignored.
    pub fn update_tile(&mut self, x: i32, y: i32, walkable: bool) {
        if !self.in_bounds(x, y) {
            log::warn!(
                "update_tile: ({}, {}) outside {}x{} grid, ignoring",
                x,
                y,
                self.width,
                self.height
            );
            return;
        }
        let index = self.cell_index(x, y);
        self.walkable[index] = walkable;
    }

    /// Find the cheapest 8-directional path between two cells.
    ///
    /// Returns `None` when either endpoint is out of bounds or the goal
    /// is unreachable; both are routine outcomes, not errors. A search
    /// never mutates the pathfinder.
    pub fn find_path(&self, start: GridPos, end: GridPos) -> Option<Vec<GridPos>> {
        if !self.in_bounds(start.x, start.y) || !self.in_bounds(end.x, end.y) {
            log::debug!(
                "find_path: endpoint out of bounds, start=({}, {}) end=({}, {})",
                start.x,
                start.y,
                end.x,
                end.y
            );
            return None;
        }

        if start == end {
            return Some(vec![start]);
        }

        let goal_cell = self.cell_index(end.x, end.y);

        // Arena of every node created during this search
        let mut nodes: Vec<SearchNode> = Vec::new();
        // Cell index -> arena index for every discovered cell
        let mut discovered: HashMap<usize, usize> = HashMap::new();
        let mut closed = vec![false; self.walkable.len()];
        let mut open = ScoredHeap::new(|entry: &OpenEntry| entry.f);

        let start_h = octile(start.x, start.y, end.x, end.y);
        nodes.push(SearchNode {
            x: start.x,
            y: start.y,
            g: 0.0,
            h: start_h,
            f: start_h,
            parent: None,
        });
        let start_cell = self.cell_index(start.x, start.y);
        discovered.insert(start_cell, 0);
        open.push(OpenEntry {
            cell: start_cell,
            f: start_h,
        });

        while let Some(entry) = open.pop_min() {
            if closed[entry.cell] {
                continue;
            }
            closed[entry.cell] = true;

            let current_index = match discovered.get(&entry.cell) {
                Some(&index) => index,
                None => continue,
            };

            if entry.cell == goal_cell {
                return Some(reconstruct_path(&nodes, current_index));
            }

            let (cx, cy, cg) = {
                let node = &nodes[current_index];
                (node.x, node.y, node.g)
            };

            for (dx, dy) in NEIGHBOR_OFFSETS {
                let nx = cx + dx;
                let ny = cy + dy;
                if !self.in_bounds(nx, ny) {
                    continue;
                }
                let neighbor_cell = self.cell_index(nx, ny);
                if closed[neighbor_cell] || !self.walkable[neighbor_cell] {
                    continue;
                }

                let step = if dx != 0 && dy != 0 {
                    DIAGONAL_COST
                } else {
                    CARDINAL_COST
                };
                let tentative_g = cg + step;

                match discovered.get(&neighbor_cell) {
                    None => {
                        let h = octile(nx, ny, end.x, end.y);
                        let f = tentative_g + h;
                        nodes.push(SearchNode {
                            x: nx,
                            y: ny,
                            g: tentative_g,
                            h,
                            f,
                            parent: Some(current_index),
                        });
                        discovered.insert(neighbor_cell, nodes.len() - 1);
                        open.push(OpenEntry {
                            cell: neighbor_cell,
                            f,
                        });
                    }
                    Some(&existing) => {
                        // Strictly cheaper paths reroute the open node
                        if tentative_g < nodes[existing].g {
                            let f = tentative_g + nodes[existing].h;
                            let node = &mut nodes[existing];
                            node.g = tentative_g;
                            node.f = f;
                            node.parent = Some(current_index);
                            if !open.rescore(OpenEntry {
                                cell: neighbor_cell,
                                f,
                            }) {
                                open.push(OpenEntry {
                                    cell: neighbor_cell,
                                    f,
                                });
                            }
                        }
                    }
                }
            }
        }

        // Open set exhausted without reaching the goal
        None
    }
}

/// Walk parent links from the goal node back to the start, then reverse
fn reconstruct_path(nodes: &[SearchNode], goal_index: usize) -> Vec<GridPos> {
    let mut path = Vec::new();
    let mut current = Some(goal_index);
    while let Some(index) = current {
        let node = &nodes[index];
        path.push(GridPos::new(node.x, node.y));
        current = node.parent;
    }
    path.reverse();
    path
}
