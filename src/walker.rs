//! The step-wise search engine shared by all strategies.
//!
//! A [Walker] performs exactly one expansion per [Walker::update_search] call and keeps its
//! frontier, node pool and closed set between calls, so a caller can draw the search as it
//! grows. Nodes are stored in an [IndexMap] keyed by position; a node's parent is an index into
//! that map, which makes path reconstruction a walk over indices.
use crate::error::{SearchError, SearchResult};
use crate::frontier::{Frontier, FrontierEntry};
use crate::grid_map::GridMap;
use crate::search_node::SearchNode;
use crate::solver::SearchStrategy;
use crate::N_SMALLVEC_SIZE;
use fxhash::FxBuildHasher;
use grid_util::Point;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use log::{debug, info, warn};
use smallvec::SmallVec;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SearchState {
    Idle,
    Searching,
    Succeeded,
    Failed,
}

impl SearchState {
    pub fn is_finished(self) -> bool {
        matches!(self, SearchState::Succeeded | SearchState::Failed)
    }
}

/// Outcome of offering a neighbour to the frontier during the last step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub position: Point,
    pub accepted: bool,
}

#[derive(Debug)]
pub struct Walker {
    strategy: Box<dyn SearchStrategy>,
    frontier: Frontier,
    nodes: FxIndexMap<Point, SearchNode>,
    closed: FxIndexSet<Point>,
    bound: Option<(usize, usize)>,
    start: Point,
    end: Point,
    state: SearchState,
    goal: Option<usize>,
    last_connections: SmallVec<[Connection; N_SMALLVEC_SIZE]>,
}

impl Walker {
    pub fn new(strategy: Box<dyn SearchStrategy>) -> Walker {
        Walker {
            frontier: Frontier::new(strategy.frontier_kind()),
            strategy,
            nodes: FxIndexMap::default(),
            closed: FxIndexSet::default(),
            bound: None,
            start: Point::new(0, 0),
            end: Point::new(0, 0),
            state: SearchState::Idle,
            goal: None,
            last_connections: SmallVec::new(),
        }
    }

    /// Binds the walker to a map. Only the dimensions are remembered; every later call gets the
    /// map passed in again and is checked against them.
    pub fn init(&mut self, map: &GridMap) {
        self.bound = Some((map.width(), map.height()));
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    fn check_binding(&self, map: &GridMap) -> SearchResult<()> {
        match self.bound {
            None => {
                warn!("{} walker used before being bound to a map", self.name());
                Err(SearchError::Unbound)
            }
            Some((w, h)) if w != map.width() || h != map.height() => {
                warn!("{} walker stepped on a map of another size", self.name());
                Err(SearchError::MapMismatch {
                    bound_width: w,
                    bound_height: h,
                    width: map.width(),
                    height: map.height(),
                })
            }
            Some(_) => Ok(()),
        }
    }

    fn check_endpoint(map: &GridMap, p: Point) -> SearchResult<()> {
        if !map.in_bounds(p) {
            Err(SearchError::OutOfBounds(p))
        } else if !map.is_passable(p) {
            Err(SearchError::Impassable(p))
        } else {
            Ok(())
        }
    }

    /// Seeds a new search from `start` to `end`. On error the walker is left untouched.
    pub fn start_search(&mut self, map: &GridMap, start: Point, end: Point) -> SearchResult<()> {
        self.check_binding(map)?;
        if let Err(e) = Self::check_endpoint(map, start).and(Self::check_endpoint(map, end)) {
            warn!("{} search from {} to {} rejected: {}", self.name(), start, end, e);
            return Err(e);
        }
        self.reset_search();
        self.start = start;
        self.end = end;
        let terrain = map.get_type(start.x, start.y).unwrap_or_default();
        let mut node = SearchNode::new(start, terrain);
        node.distance = map.heuristic(&start, &end);
        node.total_cost = self.strategy.total_cost(0, node.distance);
        let priority = self.strategy.priority(&node);
        self.nodes.insert(start, node);
        self.frontier.push(0, priority, 0);
        self.state = SearchState::Searching;
        info!("{} search from {} to {} started", self.name(), start, end);
        Ok(())
    }

    /// Performs a single expansion step and returns the resulting state. Finished searches
    /// return their final state without doing anything.
    pub fn update_search(&mut self, map: &GridMap) -> SearchResult<SearchState> {
        self.check_binding(map)?;
        match self.state {
            SearchState::Idle => {
                warn!("{} walker stepped without a started search", self.name());
                return Err(SearchError::NotStarted);
            }
            SearchState::Succeeded | SearchState::Failed => return Ok(self.state),
            SearchState::Searching => {}
        }
        self.last_connections.clear();

        let Some(FrontierEntry { index, .. }) = self.pop_live_entry() else {
            return Ok(self.fail());
        };
        let position = self.nodes[index].position;
        self.closed.insert(position);
        debug!("{} expanding {}", self.name(), position);

        if position == self.end {
            self.goal = Some(index);
            self.state = SearchState::Succeeded;
            info!(
                "{} search reached {} after {} expansions",
                self.name(),
                self.end,
                self.closed.len()
            );
            return Ok(self.state);
        }

        for neighbour in map.neighborhood_points(&position) {
            let accepted = self.add_connection(map, index, neighbour);
            self.last_connections.push(Connection {
                position: neighbour,
                accepted,
            });
        }
        // Nodes leave the frontier only by being closed, so once every discovered node is
        // closed only stale entries remain.
        if self.closed.len() == self.nodes.len() {
            self.frontier.clear();
            return Ok(self.fail());
        }
        Ok(self.state)
    }

    /// Pops entries until one refers to a node that is not closed and was pushed with the
    /// node's current cost.
    fn pop_live_entry(&mut self) -> Option<FrontierEntry> {
        while let Some(entry) = self.frontier.pop() {
            let node = &self.nodes[entry.index];
            if self.closed.contains(&node.position) || entry.cost > node.cost {
                continue;
            }
            return Some(entry);
        }
        None
    }

    fn fail(&mut self) -> SearchState {
        self.state = SearchState::Failed;
        info!(
            "{} search found no path from {} to {} after {} expansions",
            self.name(),
            self.start,
            self.end,
            self.closed.len()
        );
        self.state
    }

    /// Offers `neighbour` of the expanded node at pool index `parent` to the frontier.
    ///
    /// Rejects positions that are not adjacent to the parent, outside the map, impassable or
    /// closed, as well as disallowed diagonal steps. A position already in the frontier is only accepted by cost-aware
    /// strategies, and only when the new route is cheaper.
    pub fn add_connection(&mut self, map: &GridMap, parent: usize, neighbour: Point) -> bool {
        let Some(&parent_node) = self.nodes.get_index(parent).map(|(_, n)| n) else {
            return false;
        };
        if !self.closed.contains(&parent_node.position)
            || !map
                .neighborhood_points(&parent_node.position)
                .contains(&neighbour)
            || !map.in_bounds(neighbour)
            || !map.can_move_to(neighbour, parent_node.position)
            || self.closed.contains(&neighbour)
        {
            return false;
        }
        let cost = parent_node.cost + map.step_cost(parent_node.position, neighbour);
        let (index, node) = match self.nodes.entry(neighbour) {
            Vacant(e) => {
                let terrain = map.get_type(neighbour.x, neighbour.y).unwrap_or_default();
                let mut node = SearchNode::new(neighbour, terrain);
                node.distance = map.heuristic(&neighbour, &self.end);
                node.cost = cost;
                node.total_cost = self.strategy.total_cost(cost, node.distance);
                node.parent = Some(parent);
                let index = e.index();
                (index, *e.insert(node))
            }
            Occupied(mut e) => {
                if !self.strategy.updates_cost() || e.get().cost <= cost {
                    return false;
                }
                let index = e.index();
                let node = e.get_mut();
                node.cost = cost;
                node.total_cost = self.strategy.total_cost(cost, node.distance);
                node.parent = Some(parent);
                (index, *node)
            }
        };
        self.frontier.push(index, self.strategy.priority(&node), node.cost);
        true
    }

    /// Drops all search state and returns to [SearchState::Idle]. The map binding and the
    /// allocations are kept.
    pub fn reset_search(&mut self) {
        self.frontier.clear();
        self.nodes.clear();
        self.closed.clear();
        self.last_connections.clear();
        self.goal = None;
        self.state = SearchState::Idle;
    }

    /// Steps until the search finishes or `max_steps` steps were taken.
    pub fn run(&mut self, map: &GridMap, max_steps: usize) -> SearchResult<SearchState> {
        for _ in 0..max_steps {
            if self.update_search(map)?.is_finished() {
                break;
            }
        }
        Ok(self.state)
    }

    /// Path from start to end, if the search succeeded.
    pub fn reconstruct_path(&self) -> Option<Vec<Point>> {
        let goal = self.goal.filter(|_| self.state == SearchState::Succeeded)?;
        let mut path: Vec<Point> = std::iter::successors(Some(goal), |&i| self.nodes[i].parent)
            .map(|i| self.nodes[i].position)
            .collect();
        path.reverse();
        Some(path)
    }

    /// Accumulated cost of the found path.
    pub fn path_cost(&self) -> Option<i32> {
        self.goal_node().map(|n| n.cost)
    }

    pub fn goal_node(&self) -> Option<&SearchNode> {
        self.goal
            .filter(|_| self.state == SearchState::Succeeded)
            .map(|i| &self.nodes[i])
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn strategy(&self) -> &dyn SearchStrategy {
        self.strategy.as_ref()
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn node(&self, index: usize) -> Option<&SearchNode> {
        self.nodes.get_index(index).map(|(_, n)| n)
    }

    /// All discovered nodes in discovery order.
    pub fn nodes(&self) -> impl Iterator<Item = &SearchNode> + '_ {
        self.nodes.values()
    }

    /// Positions that are waiting in the frontier.
    pub fn frontier_positions(&self) -> Vec<Point> {
        self.frontier
            .iter()
            .map(|e| self.nodes[e.index].position)
            .filter(|p| !self.closed.contains(p))
            .unique()
            .collect()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Expanded positions in expansion order.
    pub fn closed_positions(&self) -> impl Iterator<Item = &Point> + '_ {
        self.closed.iter()
    }

    pub fn is_closed(&self, p: &Point) -> bool {
        self.closed.contains(p)
    }

    /// Neighbours offered during the last step together with whether they were accepted.
    pub fn last_connections(&self) -> &[Connection] {
        &self.last_connections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_map::TerrainType;
    use crate::solver::{AStar, BreadthFirst, Dijkstra};

    fn walker(map: &GridMap) -> Walker {
        let mut walker = Walker::new(Box::new(AStar::new()));
        walker.init(map);
        walker
    }

    #[test]
    fn unbound_walker_is_an_error() {
        let map = GridMap::square(3).unwrap();
        let mut walker = Walker::new(Box::new(Dijkstra));
        assert_eq!(
            walker.start_search(&map, Point::new(0, 0), Point::new(2, 2)),
            Err(SearchError::Unbound)
        );
        assert_eq!(walker.update_search(&map), Err(SearchError::Unbound));
    }

    #[test]
    fn stepping_before_start_is_an_error() {
        let map = GridMap::square(3).unwrap();
        let mut walker = walker(&map);
        assert_eq!(walker.update_search(&map), Err(SearchError::NotStarted));
        assert_eq!(walker.state(), SearchState::Idle);
    }

    #[test]
    fn other_map_size_is_an_error() {
        let map = GridMap::square(3).unwrap();
        let other = GridMap::square(4).unwrap();
        let mut walker = walker(&map);
        walker
            .start_search(&map, Point::new(0, 0), Point::new(2, 2))
            .unwrap();
        assert!(matches!(
            walker.update_search(&other),
            Err(SearchError::MapMismatch { .. })
        ));
    }

    #[test]
    fn invalid_endpoints_leave_state_untouched() {
        let mut map = GridMap::square(3).unwrap();
        map.set_type(2, 2, TerrainType::Obstacle).unwrap();
        let mut walker = walker(&map);
        assert_eq!(
            walker.start_search(&map, Point::new(-1, 0), Point::new(1, 1)),
            Err(SearchError::OutOfBounds(Point::new(-1, 0)))
        );
        assert_eq!(
            walker.start_search(&map, Point::new(0, 0), Point::new(2, 2)),
            Err(SearchError::Impassable(Point::new(2, 2)))
        );
        assert_eq!(walker.state(), SearchState::Idle);

        walker
            .start_search(&map, Point::new(0, 0), Point::new(1, 1))
            .unwrap();
        walker.update_search(&map).unwrap();
        assert!(walker
            .start_search(&map, Point::new(0, 0), Point::new(3, 3))
            .is_err());
        assert_eq!(walker.state(), SearchState::Searching);
        assert_eq!(walker.closed_positions().count(), 1);
    }

    #[test]
    fn one_expansion_per_step() {
        let map = GridMap::square(6).unwrap();
        let mut walker = walker(&map);
        walker
            .start_search(&map, Point::new(0, 0), Point::new(5, 5))
            .unwrap();
        assert_eq!(walker.frontier_positions(), vec![Point::new(0, 0)]);
        for step in 1..=3 {
            assert_eq!(walker.update_search(&map), Ok(SearchState::Searching));
            assert_eq!(walker.closed_positions().count(), step);
        }
    }

    #[test]
    fn last_connections_report_rejections() {
        let mut map = GridMap::square(3).unwrap();
        map.set_type(1, 0, TerrainType::Obstacle).unwrap();
        let mut walker = walker(&map);
        walker
            .start_search(&map, Point::new(0, 0), Point::new(2, 2))
            .unwrap();
        walker.update_search(&map).unwrap();
        let accepted: Vec<Point> = walker
            .last_connections()
            .iter()
            .filter(|c| c.accepted)
            .map(|c| c.position)
            .collect();
        // Right is blocked, the diagonal would cut its corner, out of bounds are rejected.
        assert_eq!(accepted, vec![Point::new(0, 1)]);
        assert_eq!(walker.last_connections().len(), 8);
    }

    #[test]
    fn add_connection_rejects_closed_and_rediscovered() {
        let map = GridMap::square(3).unwrap();
        let mut walker = Walker::new(Box::new(BreadthFirst));
        walker.init(&map);
        walker
            .start_search(&map, Point::new(1, 1), Point::new(2, 2))
            .unwrap();
        walker.update_search(&map).unwrap();
        // The start is closed.
        assert!(!walker.add_connection(&map, 0, Point::new(1, 1)));
        // Already in the frontier and breadth-first does not update.
        assert!(!walker.add_connection(&map, 0, Point::new(1, 0)));
        // Out of the map.
        assert!(!walker.add_connection(&map, 0, Point::new(1, -1)));
        // Unknown parent.
        assert!(!walker.add_connection(&map, 99, Point::new(1, 0)));
    }

    #[test]
    fn add_connection_rejects_non_adjacent() {
        let mut map = GridMap::square(6).unwrap();
        let mut walker = Walker::new(Box::new(Dijkstra));
        walker.init(&map);
        walker
            .start_search(&map, Point::new(0, 0), Point::new(5, 5))
            .unwrap();
        walker.update_search(&map).unwrap();
        let nodes = walker.nodes().count();
        assert!(!walker.add_connection(&map, 0, Point::new(5, 5)));
        assert!(!walker.add_connection(&map, 0, Point::new(2, 0)));
        assert_eq!(walker.nodes().count(), nodes);
        // Diagonal neighbours are not adjacent without diagonal moves.
        map.allow_diagonal_move = false;
        walker
            .start_search(&map, Point::new(2, 2), Point::new(5, 5))
            .unwrap();
        walker.update_search(&map).unwrap();
        assert!(!walker.add_connection(&map, 0, Point::new(3, 3)));
    }

    /// The step that closes the last reachable cell reports the failure, even when stale
    /// entries are still waiting in the frontier.
    #[test]
    fn fails_on_step_closing_last_reachable_cell() {
        let mut map = GridMap::square(4).unwrap();
        for y in 0..4 {
            map.set_type(2, y, TerrainType::Obstacle).unwrap();
        }
        map.set_cost(0, 1, 9).unwrap();
        map.set_cost(1, 1, 9).unwrap();
        let mut walker = Walker::new(Box::new(Dijkstra));
        walker.init(&map);
        walker
            .start_search(&map, Point::new(0, 0), Point::new(3, 3))
            .unwrap();
        let mut state = SearchState::Searching;
        while state == SearchState::Searching {
            let closed = walker.closed_positions().count();
            state = walker.update_search(&map).unwrap();
            assert_eq!(walker.closed_positions().count(), closed + 1);
        }
        assert_eq!(state, SearchState::Failed);
        assert_eq!(walker.closed_positions().count(), 8);
        assert_eq!(walker.frontier_len(), 0);
    }

    #[test]
    fn fails_when_walled_in() {
        let mut map = GridMap::square(3).unwrap();
        for (x, y) in [(1, 0), (1, 1), (0, 1)] {
            map.set_type(x, y, TerrainType::Obstacle).unwrap();
        }
        let mut walker = walker(&map);
        walker
            .start_search(&map, Point::new(0, 0), Point::new(2, 2))
            .unwrap();
        assert_eq!(walker.update_search(&map), Ok(SearchState::Failed));
        assert_eq!(walker.reconstruct_path(), None);
        assert_eq!(walker.path_cost(), None);
        // Finished searches keep their state.
        assert_eq!(walker.update_search(&map), Ok(SearchState::Failed));
    }

    #[test]
    fn parents_form_a_tree_rooted_at_start() {
        let mut map = GridMap::square(8).unwrap();
        map.set_type(4, 2, TerrainType::Obstacle).unwrap();
        map.set_cost(3, 3, 5).unwrap();
        let mut walker = walker(&map);
        let start = Point::new(0, 0);
        walker.start_search(&map, start, Point::new(7, 6)).unwrap();
        walker.run(&map, 1000).unwrap();
        let n = walker.nodes().count();
        for (i, node) in walker.nodes().enumerate() {
            // Following parents from any node reaches the start within pool-size hops.
            let root = std::iter::successors(Some(i), |&j| walker.node(j).unwrap().parent)
                .take(n + 1)
                .last()
                .unwrap();
            assert_eq!(walker.node(root).unwrap().position, start);
            assert_eq!(node.is_root(), node.position == start);
        }
    }

    #[test]
    fn reset_returns_to_idle_and_keeps_binding() {
        let map = GridMap::square(4).unwrap();
        let mut walker = walker(&map);
        walker
            .start_search(&map, Point::new(0, 0), Point::new(3, 3))
            .unwrap();
        walker.run(&map, 100).unwrap();
        walker.reset_search();
        assert_eq!(walker.state(), SearchState::Idle);
        assert!(walker.is_bound());
        assert_eq!(walker.nodes().count(), 0);
        assert_eq!(walker.frontier_len(), 0);
        assert_eq!(walker.reconstruct_path(), None);
    }
}
