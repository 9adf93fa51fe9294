pub mod astar;
pub mod heap;
pub mod worker;

pub use astar::{GridPos, Pathfinder};
pub use heap::ScoredHeap;
pub use worker::{PathRequest, PathResponse, PathfindingWorker};
