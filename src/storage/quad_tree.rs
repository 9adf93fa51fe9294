/// Quadtree for hierarchical spatial partitioning
///
/// A quadtree recursively divides 2D space into four quadrants. Each node
/// holds entries up to a capacity threshold and subdivides on overflow.
/// Entries are axis-aligned rectangles: generated tiles occupy a unit
/// rectangle, structure footprints span several tiles. Entries straddling
/// a quadrant boundary stay at their node instead of descending.
///
/// Used for viewport culling and minimap range queries. The index is
/// rebuilt wholesale (clear + re-insert) when the tile set changes; there
/// is no per-entry removal.
///
/// Time complexity:
/// - Insert: O(log n) average
/// - Query: O(log n + k) where k = results
use log::warn;

use crate::world_gen::Tile;

/// Rectangle bounds
#[derive(Debug, Clone, Copy)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Unit rectangle anchored at a tile coordinate
    pub fn unit(x: i32, y: i32) -> Self {
        Self::new(x as f32, y as f32, 1.0, 1.0)
    }

    /// Check if rectangles intersect. Edge-touching counts as intersecting.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.x + other.width
            && self.x + self.width >= other.x
            && self.y <= other.y + other.height
            && self.y + self.height >= other.y
    }

    /// Check if `other` lies entirely within this rectangle
    #[inline]
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }
}

/// Quadtree configuration
#[derive(Debug, Clone, Copy)]
pub struct QuadTreeConfig {
    /// Maximum entries per node before subdivision
    pub max_objects: usize,

    /// Maximum depth of tree (prevents infinite subdivision)
    pub max_levels: usize,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            max_objects: 10,
            max_levels: 5,
        }
    }
}

/// An indexed entry: the entry rectangle plus the tile it refers to
struct Entry {
    rect: Rect,
    tile: Tile,
}

/// Quadtree node
pub struct QuadTree {
    /// Boundary of this node
    bounds: Rect,

    /// Entries held at this node
    entries: Vec<Entry>,

    /// Children nodes (NW, NE, SW, SE)
    children: Option<Box<[QuadTree; 4]>>,

    /// Current depth
    level: usize,

    /// Configuration
    config: QuadTreeConfig,
}

impl QuadTree {
    /// Create new quadtree with default config
    pub fn new(bounds: Rect) -> Self {
        Self::with_config(bounds, QuadTreeConfig::default())
    }

    /// Create new quadtree with custom config
    pub fn with_config(bounds: Rect, config: QuadTreeConfig) -> Self {
        Self {
            bounds,
            entries: Vec::new(),
            children: None,
            level: 0,
            config,
        }
    }

    /// Create quadtree spanning the whole map
    pub fn for_map() -> Self {
        use crate::config::map as map_config;
        Self::new(Rect::new(
            0.0,
            0.0,
            map_config::WIDTH as f32,
            map_config::HEIGHT as f32,
        ))
    }

    fn child(bounds: Rect, config: QuadTreeConfig, level: usize) -> Self {
        Self {
            bounds,
            entries: Vec::new(),
            children: None,
            level,
            config,
        }
    }

    /// Bounds of quadrant `index` (NW, NE, SW, SE)
    fn quadrant_bounds(&self, index: usize) -> Rect {
        let half_width = self.bounds.width / 2.0;
        let half_height = self.bounds.height / 2.0;
        let x = self.bounds.x;
        let y = self.bounds.y;

        match index {
            0 => Rect::new(x, y, half_width, half_height),
            1 => Rect::new(x + half_width, y, half_width, half_height),
            2 => Rect::new(x, y + half_height, half_width, half_height),
            _ => Rect::new(x + half_width, y + half_height, half_width, half_height),
        }
    }

    /// Quadrant that fully contains `rect`, if any. Containment rather
    /// than intersection: straddlers stay at the parent level.
    fn quadrant_for(&self, rect: &Rect) -> Option<usize> {
        (0..4).find(|&index| self.quadrant_bounds(index).contains(rect))
    }

    /// Subdivide node into 4 quadrants and redistribute entries
    fn subdivide(&mut self) {
        let next_level = self.level + 1;
        self.children = Some(Box::new([
            Self::child(self.quadrant_bounds(0), self.config, next_level),
            Self::child(self.quadrant_bounds(1), self.config, next_level),
            Self::child(self.quadrant_bounds(2), self.config, next_level),
            Self::child(self.quadrant_bounds(3), self.config, next_level),
        ]));

        // Redistribute entries that fit entirely within a quadrant
        let entries = std::mem::take(&mut self.entries);
        for entry in entries {
            match self.quadrant_for(&entry.rect) {
                Some(index) => {
                    if let Some(children) = &mut self.children {
                        children[index].insert_entry(entry);
                    }
                }
                None => self.entries.push(entry),
            }
        }
    }

    fn insert_entry(&mut self, entry: Entry) {
        if self.children.is_some() {
            if let Some(index) = self.quadrant_for(&entry.rect) {
                if let Some(children) = &mut self.children {
                    children[index].insert_entry(entry);
                }
                return;
            }
            self.entries.push(entry);
            return;
        }

        self.entries.push(entry);

        if self.entries.len() > self.config.max_objects && self.level < self.config.max_levels {
            self.subdivide();
        }
    }

    /// Insert a tile as a unit rectangle at its coordinate
    pub fn insert(&mut self, tile: Tile) {
        let rect = Rect::unit(tile.x, tile.y);
        self.insert_with_rect(tile, rect);
    }

    /// Insert a tile with an explicit footprint (multi-tile structures)
    pub fn insert_with_rect(&mut self, tile: Tile, rect: Rect) {
        if !self.bounds.intersects(&rect) {
            warn!("quad_tree: entry {} lies outside index bounds, ignoring", tile.id);
            return;
        }
        self.insert_entry(Entry { rect, tile });
    }

    /// Collect every tile whose entry rectangle intersects `rect`,
    /// pruning subtrees whose bounds cannot intersect
    pub fn query<'a>(&'a self, rect: &Rect, results: &mut Vec<&'a Tile>) {
        if !self.bounds.intersects(rect) {
            return;
        }

        for entry in &self.entries {
            if entry.rect.intersects(rect) {
                results.push(&entry.tile);
            }
        }

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query(rect, results);
            }
        }
    }

    /// Discard all entries, keeping the original bounds
    pub fn clear(&mut self) {
        self.entries.clear();
        self.children = None;
    }

    /// Total entry count (including children)
    pub fn len(&self) -> usize {
        let mut total = self.entries.len();
        if let Some(children) = &self.children {
            for child in children.iter() {
                total += child.len();
            }
        }
        total
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world_gen::WorldGenerator;

    fn sample_tile(generator: &WorldGenerator, x: i32, y: i32) -> Tile {
        generator.generate_tile_at(x, y)
    }

    #[test]
    fn test_insert_query_roundtrip() {
        let generator = WorldGenerator::new(11);
        let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 100.0, 100.0));

        for x in 0..10 {
            for y in 0..10 {
                tree.insert(sample_tile(&generator, x * 10, y * 10));
            }
        }
        assert_eq!(tree.len(), 100);

        let mut results = Vec::new();
        tree.query(&Rect::new(0.0, 0.0, 100.0, 100.0), &mut results);
        assert_eq!(results.len(), 100);

        // Set equality on ids, independent of traversal order
        let mut ids: Vec<&str> = results.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_disjoint_query_is_empty() {
        let generator = WorldGenerator::new(11);
        let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 100.0, 100.0));

        tree.insert(sample_tile(&generator, 5, 5));
        tree.insert(sample_tile(&generator, 20, 20));

        let mut results = Vec::new();
        tree.query(&Rect::new(60.0, 60.0, 10.0, 10.0), &mut results);
        assert!(results.is_empty());
    }

    #[test]
    fn test_subdivision_preserves_entries() {
        let generator = WorldGenerator::new(11);
        let mut tree = QuadTree::with_config(
            Rect::new(0.0, 0.0, 64.0, 64.0),
            QuadTreeConfig {
                max_objects: 4,
                max_levels: 5,
            },
        );

        // Cluster enough entries in one quadrant to force subdivision
        for i in 0..12 {
            tree.insert(sample_tile(&generator, i % 4, i / 4));
        }
        assert_eq!(tree.len(), 12);

        let mut results = Vec::new();
        tree.query(&Rect::new(0.0, 0.0, 64.0, 64.0), &mut results);
        assert_eq!(results.len(), 12);
    }

    #[test]
    fn test_straddler_stays_queryable() {
        let generator = WorldGenerator::new(11);
        let mut tree = QuadTree::with_config(
            Rect::new(0.0, 0.0, 64.0, 64.0),
            QuadTreeConfig {
                max_objects: 2,
                max_levels: 5,
            },
        );

        // Footprint across the center line cannot descend into a quadrant
        let straddler = sample_tile(&generator, 30, 30);
        tree.insert_with_rect(straddler, Rect::new(30.0, 30.0, 4.0, 4.0));
        for i in 0..8 {
            tree.insert(sample_tile(&generator, i, i));
        }

        let mut results = Vec::new();
        tree.query(&Rect::new(31.0, 31.0, 1.0, 1.0), &mut results);
        assert!(results.iter().any(|t| t.x == 30 && t.y == 30));
    }

    #[test]
    fn test_out_of_bounds_insert_is_rejected() {
        let generator = WorldGenerator::new(11);
        let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 32.0, 32.0));

        tree.insert(sample_tile(&generator, 100, 100));
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn test_edge_touching_counts_as_intersecting() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 5.0, 5.0);
        assert!(a.intersects(&b));

        let generator = WorldGenerator::new(11);
        let mut tree = QuadTree::new(Rect::new(0.0, 0.0, 32.0, 32.0));
        tree.insert(sample_tile(&generator, 10, 0));

        let mut results = Vec::new();
        tree.query(&Rect::new(0.0, 0.0, 10.0, 10.0), &mut results);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_for_map_spans_world() {
        use crate::config::map as map_config;

        let generator = WorldGenerator::new(11);
        let mut tree = QuadTree::for_map();

        tree.insert(sample_tile(&generator, 0, 0));
        tree.insert(sample_tile(&generator, map_config::WIDTH - 1, map_config::HEIGHT - 1));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_clear_resets_to_original_bounds() {
        let generator = WorldGenerator::new(11);
        let mut tree = QuadTree::with_config(
            Rect::new(0.0, 0.0, 64.0, 64.0),
            QuadTreeConfig {
                max_objects: 2,
                max_levels: 5,
            },
        );

        for i in 0..10 {
            tree.insert(sample_tile(&generator, i, i));
        }
        tree.clear();
        assert!(tree.is_empty());

        // Still accepts the full original extent after clearing
        tree.insert(sample_tile(&generator, 63, 63));
        assert_eq!(tree.len(), 1);
    }
}
