use crate::frontier::FrontierKind;
use crate::solver::SearchStrategy;

/// Uniform cost search: expands the node with the smallest accumulated cost. Cost optimal.
#[derive(Copy, Clone, Debug, Default)]
pub struct Dijkstra;

impl SearchStrategy for Dijkstra {
    fn name(&self) -> &'static str {
        "Dijkstra"
    }

    fn frontier_kind(&self) -> FrontierKind {
        FrontierKind::Priority
    }

    fn updates_cost(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_map::{GridMap, TerrainType};
    use crate::walker::{SearchState, Walker};
    use crate::{C, D};
    use grid_util::Point;

    /// A band of marsh is walked around when the detour is cheaper.
    #[test]
    fn avoids_expensive_tiles() {
        // S m G
        // . m .
        // . . .
        let mut map = GridMap::square(3).unwrap();
        map.allow_diagonal_move = false;
        for y in 0..2 {
            map.set_type(1, y, TerrainType::Marsh).unwrap();
            map.set_cost(1, y, 10).unwrap();
        }
        let mut walker = Walker::new(Box::new(Dijkstra));
        walker.init(&map);
        walker
            .start_search(&map, Point::new(0, 0), Point::new(2, 0))
            .unwrap();
        assert_eq!(walker.run(&map, 100).unwrap(), SearchState::Succeeded);
        assert_eq!(walker.path_cost(), Some(6 * C));
        assert_eq!(walker.reconstruct_path().unwrap().len(), 7);
    }

    /// A node reached again through a cheaper route is re-parented.
    #[test]
    fn cheaper_route_replaces_parent() {
        // S . .
        // a . .
        // . X .
        // X (cost 2) is first discovered diagonally from `a`, then more cheaply straight
        // down from (1, 1).
        let mut map = GridMap::new(3, 3, Default::default(), Default::default()).unwrap();
        map.set_cost(1, 2, 2).unwrap();
        let mut walker = Walker::new(Box::new(Dijkstra));
        walker.init(&map);
        let goal = Point::new(1, 2);
        walker.start_search(&map, Point::new(0, 0), goal).unwrap();
        assert_eq!(walker.run(&map, 100).unwrap(), SearchState::Succeeded);
        assert_eq!(walker.path_cost(), Some(D + 2 * C));
        assert_eq!(
            walker.reconstruct_path().unwrap(),
            vec![Point::new(0, 0), Point::new(1, 1), goal]
        );
    }
}
