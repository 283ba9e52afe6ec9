use crate::grid_map::TerrainType;
use grid_util::Point;

/// A cell that has been discovered by a search.
///
/// Nodes live in the node pool of the [Walker](crate::walker::Walker) that created them and
/// refer to their parent by pool index, so the parents of a pool always form a tree rooted at
/// the start node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchNode {
    pub position: Point,
    /// Accumulated cost from the start (g).
    pub cost: i32,
    /// Priority relevant total: g for cost-only strategies, g + h for A*.
    pub total_cost: i32,
    /// Heuristic estimate of the remaining cost (h).
    pub distance: i32,
    pub terrain: TerrainType,
    pub parent: Option<usize>,
}

impl SearchNode {
    pub fn new(position: Point, terrain: TerrainType) -> SearchNode {
        SearchNode {
            position,
            cost: 0,
            total_cost: 0,
            distance: 0,
            terrain,
            parent: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
