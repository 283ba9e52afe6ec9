use crate::frontier::FrontierKind;
use crate::solver::SearchStrategy;

/// Expands the node with the smallest accumulated cost plus heuristic. Cost optimal as long as
/// `heuristic_factor` is at most 1; larger factors give Weighted A*, which trades optimality
/// for fewer expansions.
#[derive(Clone, Debug)]
pub struct AStar {
    pub heuristic_factor: f32,
}

impl AStar {
    pub fn new() -> AStar {
        AStar {
            heuristic_factor: 1.0,
        }
    }

    pub fn weighted(heuristic_factor: f32) -> AStar {
        AStar { heuristic_factor }
    }
}

impl Default for AStar {
    fn default() -> AStar {
        AStar::new()
    }
}

impl SearchStrategy for AStar {
    fn name(&self) -> &'static str {
        "A*"
    }

    fn frontier_kind(&self) -> FrontierKind {
        FrontierKind::Priority
    }

    fn updates_cost(&self) -> bool {
        true
    }

    /// Just the cost plus the heuristic times the heuristic factor.
    fn total_cost(&self, cost: i32, distance: i32) -> i32 {
        cost + (distance as f32 * self.heuristic_factor) as i32
    }
}
