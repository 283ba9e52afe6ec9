//! # grid_walker
//!
//! Incremental grid pathfinding meant to be watched. Depth-first, breadth-first, greedy
//! best-first, Dijkstra and A* search all run on the same step-wise [Walker]: every call to
//! [Walker::update_search] expands exactly one node, so the frontier can be drawn frame by
//! frame while the search grows.
//!
//! The [GridMap] holds terrain and per-tile costs, orthogonal or isometric projections and a
//! scrolling camera for mouse picking. [Pathfinder] ties a map to one walker per strategy and
//! turns a finished search into a path polyline.
//!
//! Costs are integers: a cardinal step onto a tile costs the tile cost times [C], a diagonal
//! step the tile cost times [D], an approximation of `C * sqrt(2)`.
pub mod camera;
pub mod error;
pub mod frontier;
pub mod grid_map;
mod image_io;
pub mod pathfinder;
pub mod search_node;
pub mod solver;
pub mod walker;

pub use camera::{Camera, Projection, TileGeometry, Viewport};
pub use error::{MapError, SearchError};
pub use grid_map::{GridMap, TerrainType, Tile, TileCost};
pub use pathfinder::Pathfinder;
pub use search_node::SearchNode;
pub use solver::{SearchStrategy, Strategy};
pub use walker::{Connection, SearchState, Walker};

/// Whether a diagonal step may pass the corner of an impassable tile.
pub const ALLOW_CORNER_CUTTING: bool = false;
/// Cost scale of a cardinal step.
pub const C: i32 = 99;
/// Cost scale of a diagonal step.
pub const D: i32 = 140;
/// Helper constant for the octile heuristic.
pub const E: i32 = 2 * C - D;
/// Tile costs below this are raised to it when stepping, keeping the heuristic admissible.
pub const MIN_TILE_COST: TileCost = 1;
pub const N_SMALLVEC_SIZE: usize = 8;
