use crate::frontier::FrontierKind;
use crate::search_node::SearchNode;
use crate::solver::SearchStrategy;

/// Always expands the node that looks closest to the goal. Fast on open maps, neither cost nor
/// length optimal.
#[derive(Copy, Clone, Debug, Default)]
pub struct GreedyBestFirst;

impl SearchStrategy for GreedyBestFirst {
    fn name(&self) -> &'static str {
        "Greedy best-first"
    }

    fn frontier_kind(&self) -> FrontierKind {
        FrontierKind::Priority
    }

    fn priority(&self, node: &SearchNode) -> i32 {
        node.distance
    }
}
