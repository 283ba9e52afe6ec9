use crate::error::{SearchError, SearchResult};
use crate::grid_map::GridMap;
use crate::solver::Strategy;
use crate::walker::{SearchState, Walker};
use grid_util::Point;
use log::info;

/// [Pathfinder] owns a [GridMap] and one [Walker] per strategy. The active walker is advanced
/// by one expansion per [update](Self::update) call and the path it finds is kept as a
/// polyline of grid positions for drawing.
#[derive(Debug)]
pub struct Pathfinder {
    map: GridMap,
    walkers: Vec<Walker>,
    current: usize,
    path_line: Vec<Point>,
}

impl Pathfinder {
    /// Creates a walker for every built-in [Strategy], in [Strategy::ALL] order. The first one
    /// is active.
    pub fn new(map: GridMap) -> Pathfinder {
        let walkers = Strategy::ALL
            .iter()
            .map(|s| Walker::new(s.boxed()))
            .collect();
        Pathfinder::bind(map, walkers)
    }

    /// Uses a custom roster of walkers, binding each of them to `map`. The roster must not be
    /// empty.
    pub fn with_walkers(map: GridMap, walkers: Vec<Walker>) -> SearchResult<Pathfinder> {
        if walkers.is_empty() {
            return Err(SearchError::EmptyRoster);
        }
        Ok(Pathfinder::bind(map, walkers))
    }

    fn bind(map: GridMap, mut walkers: Vec<Walker>) -> Pathfinder {
        for walker in walkers.iter_mut() {
            walker.init(&map);
        }
        Pathfinder {
            map,
            walkers,
            current: 0,
            path_line: Vec::new(),
        }
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    /// Mutable access for editing tiles and moving the camera. Resizing the map through this
    /// makes the walkers report [SearchError::MapMismatch]; use [replace_map](Self::replace_map)
    /// instead.
    pub fn map_mut(&mut self) -> &mut GridMap {
        &mut self.map
    }

    /// Swaps in a new map, resetting and rebinding every walker.
    pub fn replace_map(&mut self, map: GridMap) -> GridMap {
        let old = std::mem::replace(&mut self.map, map);
        for walker in self.walkers.iter_mut() {
            walker.reset_search();
            walker.init(&self.map);
        }
        self.path_line.clear();
        old
    }

    pub fn walkers(&self) -> &[Walker] {
        &self.walkers
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_walker(&self) -> &Walker {
        &self.walkers[self.current]
    }

    pub fn current_walker_mut(&mut self) -> &mut Walker {
        &mut self.walkers[self.current]
    }

    /// Selects the active walker. A search in progress on the previous walker is left as is;
    /// the path line is replaced by the path of the newly active walker, if it has one.
    pub fn set_current_walker(&mut self, index: usize) -> SearchResult<()> {
        if index >= self.walkers.len() {
            return Err(SearchError::InvalidWalker(index));
        }
        self.current = index;
        self.path_line = self.walkers[index].reconstruct_path().unwrap_or_default();
        info!("Active walker is now {}", self.walkers[index].name());
        Ok(())
    }

    /// Starts a search with the active walker and clears the previous path.
    pub fn start_search(&mut self, start: Point, end: Point) -> SearchResult<()> {
        self.path_line.clear();
        self.walkers[self.current].start_search(&self.map, start, end)
    }

    pub fn reset_search(&mut self) {
        self.path_line.clear();
        self.walkers[self.current].reset_search();
    }

    pub fn state(&self) -> SearchState {
        self.current_walker().state()
    }

    /// Advances the camera and, if the active walker is searching, performs one search step.
    /// The path line is rebuilt when that step reaches the goal.
    pub fn update(&mut self, dt: f32) -> SearchResult<SearchState> {
        self.map.update(dt);
        let walker = &mut self.walkers[self.current];
        if walker.state() == SearchState::Searching
            && walker.update_search(&self.map)? == SearchState::Succeeded
        {
            self.path_line = walker.reconstruct_path().unwrap_or_default();
            info!(
                "{} path of {} positions found",
                walker.name(),
                self.path_line.len()
            );
        }
        Ok(walker.state())
    }

    /// Calls [update](Self::update) until the active search finishes or `max_steps` steps
    /// were taken.
    pub fn run_to_completion(&mut self, max_steps: usize) -> SearchResult<SearchState> {
        for _ in 0..max_steps {
            if self.update(0.0)? != SearchState::Searching {
                break;
            }
        }
        Ok(self.state())
    }

    pub fn get_path_line(&self) -> &[Point] {
        &self.path_line
    }

    pub fn clear_path_line(&mut self) {
        self.path_line.clear();
    }

    pub fn path_cost(&self) -> Option<i32> {
        self.current_walker().path_cost()
    }
}
