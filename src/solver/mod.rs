//! Search strategies. Every strategy is driven by the same [Walker](crate::walker::Walker); a
//! strategy only decides which [Frontier](crate::frontier::Frontier) container is used, how a
//! node is prioritized and whether cheaper routes to an already discovered node are taken.
use crate::frontier::FrontierKind;
use crate::search_node::SearchNode;
use core::fmt;

pub mod astar;
pub mod breadth_first;
pub mod depth_first;
pub mod dijkstra;
pub mod greedy;

pub use astar::AStar;
pub use breadth_first::BreadthFirst;
pub use depth_first::DepthFirst;
pub use dijkstra::Dijkstra;
pub use greedy::GreedyBestFirst;

pub trait SearchStrategy: fmt::Debug {
    fn name(&self) -> &'static str;

    fn frontier_kind(&self) -> FrontierKind;

    /// Whether a cheaper route to a node that is still in the frontier replaces the stored one.
    /// Strategies that do not track costs reject rediscovered nodes instead.
    fn updates_cost(&self) -> bool {
        false
    }

    /// Value stored in [SearchNode::total_cost] for a node with accumulated cost `cost` and
    /// heuristic `distance`.
    fn total_cost(&self, cost: i32, _distance: i32) -> i32 {
        cost
    }

    /// Ordering key for priority frontiers, smallest first. Unused by stacks and queues.
    fn priority(&self, node: &SearchNode) -> i32 {
        node.total_cost
    }
}

/// The built-in strategies, in the order a [Pathfinder](crate::pathfinder::Pathfinder) lists them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    DepthFirst,
    BreadthFirst,
    GreedyBestFirst,
    Dijkstra,
    AStar,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::DepthFirst,
        Strategy::BreadthFirst,
        Strategy::GreedyBestFirst,
        Strategy::Dijkstra,
        Strategy::AStar,
    ];

    pub fn boxed(self) -> Box<dyn SearchStrategy> {
        match self {
            Strategy::DepthFirst => Box::new(DepthFirst),
            Strategy::BreadthFirst => Box::new(BreadthFirst),
            Strategy::GreedyBestFirst => Box::new(GreedyBestFirst),
            Strategy::Dijkstra => Box::new(Dijkstra),
            Strategy::AStar => Box::new(AStar::new()),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.boxed().name())
    }
}
