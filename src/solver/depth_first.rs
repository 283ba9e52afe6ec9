use crate::frontier::FrontierKind;
use crate::solver::SearchStrategy;

/// Expands the most recently discovered node first. Finds a path whenever one exists, with
/// no guarantee on its length or cost.
#[derive(Copy, Clone, Debug, Default)]
pub struct DepthFirst;

impl SearchStrategy for DepthFirst {
    fn name(&self) -> &'static str {
        "Depth-first"
    }

    fn frontier_kind(&self) -> FrontierKind {
        FrontierKind::Stack
    }
}
