use crate::frontier::FrontierKind;
use crate::solver::SearchStrategy;

/// Expands nodes in discovery order. Paths are optimal in the number of steps but tile costs
/// are ignored.
#[derive(Copy, Clone, Debug, Default)]
pub struct BreadthFirst;

impl SearchStrategy for BreadthFirst {
    fn name(&self) -> &'static str {
        "Breadth-first"
    }

    fn frontier_kind(&self) -> FrontierKind {
        FrontierKind::Queue
    }
}
