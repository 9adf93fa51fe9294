//! Core systems for an isometric cyberpunk city-builder: deterministic
//! terrain generation, a quadtree spatial index, and A* pathfinding run
//! on a dedicated worker thread.
//!
//! The generator turns noise-derived height/moisture/urban-density
//! fields into discrete tiles; the spatial index serves viewport and
//! minimap range queries over those tiles; the walkability bitmap the
//! generator derives feeds the pathfinding worker. Rendering, UI, and
//! persistence live in other crates and consume these through the
//! re-exported types below.

pub mod config;
pub mod pathfinding;
pub mod storage;
pub mod world_gen;

pub use pathfinding::{GridPos, PathRequest, PathResponse, Pathfinder, PathfindingWorker, ScoredHeap};
pub use storage::{QuadTree, QuadTreeConfig, Rect};
pub use world_gen::{FieldSampler, Tile, TileKind, VariantRegistry, WorldGenerator};
