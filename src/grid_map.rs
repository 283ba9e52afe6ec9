use crate::camera::{Camera, Projection, TileGeometry, Viewport};
use crate::error::{MapError, MapResult};
use crate::{ALLOW_CORNER_CUTTING, C, D, E, MIN_TILE_COST, N_SMALLVEC_SIZE};
use core::fmt;
use grid_util::grid::{SimpleValueGrid, ValueGrid};
use grid_util::point::Point;
use itertools::iproduct;
use log::debug;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

/// Per-tile traversal cost. Values below [MIN_TILE_COST] are treated as [MIN_TILE_COST] when
/// stepping onto the tile.
pub type TileCost = i8;

/// Terrain of a tile. The discriminant is the code used when persisting maps.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum TerrainType {
    Water = 0,
    Grass = 1,
    Marsh = 2,
    Obstacle = 3,
}

impl Default for TerrainType {
    fn default() -> TerrainType {
        TerrainType::Grass
    }
}

impl TerrainType {
    /// Obstacles can never be entered, whatever their stored cost.
    pub fn is_passable(self) -> bool {
        self != TerrainType::Obstacle
    }

    pub fn symbol(self) -> char {
        match self {
            TerrainType::Water => '~',
            TerrainType::Grass => '.',
            TerrainType::Marsh => ',',
            TerrainType::Obstacle => '#',
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    pub terrain: TerrainType,
    pub cost: TileCost,
}

impl Default for Tile {
    fn default() -> Tile {
        Tile {
            terrain: TerrainType::Grass,
            cost: 1,
        }
    }
}

/// Offsets of the eight neighbours, cardinal directions at even indices.
/// Expansion order of every search follows this table.
const NEIGHBOUR_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// [GridMap] owns the tiles searched by a [Walker](crate::walker::Walker) together with the
/// view state used to draw them: projection, tile geometry and camera. It also maintains
/// connected components in a [UnionFind] so that reachability can be queried without a search.
#[derive(Clone, Debug)]
pub struct GridMap {
    tiles: SimpleValueGrid<Tile>,
    pub allow_diagonal_move: bool,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
    projection: Projection,
    tile_geometry: TileGeometry,
    camera: Camera,
}

impl GridMap {
    /// Creates a `width x height` map filled with grass of cost 1.
    pub fn new(
        width: i32,
        height: i32,
        projection: Projection,
        tile_geometry: TileGeometry,
    ) -> MapResult<GridMap> {
        if width <= 0 || height <= 0 {
            return Err(MapError::InvalidSize { width, height });
        }
        tile_geometry.validate(projection)?;
        let mut map = GridMap {
            tiles: SimpleValueGrid::new(width as usize, height as usize, Tile::default()),
            allow_diagonal_move: true,
            components: UnionFind::new(0),
            components_dirty: true,
            projection,
            tile_geometry,
            camera: Camera::default(),
        };
        map.pre_calc();
        map.generate_components();
        Ok(map)
    }

    /// Square orthogonal map with default tile geometry.
    pub fn square(size: i32) -> MapResult<GridMap> {
        GridMap::new(size, size, Projection::Orthogonal, TileGeometry::default())
    }

    /// Reallocates the tiles, discarding the previous contents.
    pub fn init(&mut self, width: i32, height: i32) -> MapResult<()> {
        if width <= 0 || height <= 0 {
            return Err(MapError::InvalidSize { width, height });
        }
        self.tiles = SimpleValueGrid::new(width as usize, height as usize, Tile::default());
        self.pre_calc();
        self.generate_components();
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.tiles.width()
    }

    pub fn height(&self) -> usize {
        self.tiles.height()
    }

    pub fn in_bounds(&self, p: Point) -> bool {
        self.tiles.index_in_bounds(p.x, p.y)
    }

    pub fn tile(&self, p: Point) -> Option<Tile> {
        if self.in_bounds(p) {
            Some(self.tiles.get_point(p))
        } else {
            None
        }
    }

    pub fn get_cost(&self, x: i32, y: i32) -> Option<TileCost> {
        self.tile(Point::new(x, y)).map(|t| t.cost)
    }

    pub fn set_cost(&mut self, x: i32, y: i32, cost: TileCost) -> MapResult<()> {
        let p = Point::new(x, y);
        let mut tile = self.tile(p).ok_or(MapError::OutOfBounds(p))?;
        tile.cost = cost;
        self.tiles.set_point(p, tile);
        Ok(())
    }

    pub fn get_type(&self, x: i32, y: i32) -> Option<TerrainType> {
        self.tile(Point::new(x, y)).map(|t| t.terrain)
    }

    /// Updates the terrain of a tile. Joins newly connected components and flags the components
    /// as dirty if an obstacle is placed, since that may split a component.
    pub fn set_type(&mut self, x: i32, y: i32, terrain: TerrainType) -> MapResult<()> {
        let p = Point::new(x, y);
        let mut tile = self.tile(p).ok_or(MapError::OutOfBounds(p))?;
        let was_passable = tile.terrain.is_passable();
        tile.terrain = terrain;
        self.tiles.set_point(p, tile);
        match (was_passable, terrain.is_passable()) {
            (true, false) => self.components_dirty = true,
            (false, true) => {
                // Unblocking a tile also re-enables diagonal moves between its neighbours.
                if ALLOW_CORNER_CUTTING || !self.allow_diagonal_move {
                    self.join_neighbours(p);
                } else {
                    self.components_dirty = true;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Sets terrain and cost at once.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) -> MapResult<()> {
        self.set_type(x, y, tile.terrain)?;
        self.set_cost(x, y, tile.cost)
    }

    pub fn is_passable(&self, p: Point) -> bool {
        self.tile(p).map_or(false, |t| t.terrain.is_passable())
    }

    /// Candidate neighbours of a position in expansion order, without any bounds or
    /// passability filtering.
    pub fn neighborhood_points(&self, p: &Point) -> SmallVec<[Point; N_SMALLVEC_SIZE]> {
        NEIGHBOUR_OFFSETS
            .iter()
            .enumerate()
            .filter(|(i, _)| self.allow_diagonal_move || i % 2 == 0)
            .map(|(_, (dx, dy))| Point::new(p.x + dx, p.y + dy))
            .collect()
    }

    /// Checks whether a single step from `from` to the adjacent `to` is allowed.
    pub fn can_move_to(&self, to: Point, from: Point) -> bool {
        debug_assert!((from.x - to.x).abs() <= 1 && (from.y - to.y).abs() <= 1);
        if !self.is_passable(to) {
            return false;
        }
        let diagonal = from.x != to.x && from.y != to.y;
        if !diagonal {
            return true;
        }
        self.allow_diagonal_move
            && (ALLOW_CORNER_CUTTING
                || (self.is_passable(Point::new(from.x, to.y))
                    && self.is_passable(Point::new(to.x, from.y))))
    }

    /// Cost of stepping onto `to`: the tile cost scaled by [C] for cardinal and [D] for diagonal
    /// steps.
    pub fn step_cost(&self, from: Point, to: Point) -> i32 {
        let tile_cost = self
            .tile(to)
            .map_or(MIN_TILE_COST, |t| t.cost.max(MIN_TILE_COST)) as i32;
        if from.x != to.x && from.y != to.y {
            tile_cost * D
        } else {
            tile_cost * C
        }
    }

    /// Lower bound on the cost from `p1` to `p2`. Octile distance when diagonals are allowed,
    /// scaled Manhattan distance otherwise.
    pub fn heuristic(&self, p1: &Point, p2: &Point) -> i32 {
        let delta_x = (p1.x - p2.x).abs();
        let delta_y = (p1.y - p2.y).abs();
        if self.allow_diagonal_move {
            // Formula from https://github.com/riscy/a_star_on_grids
            // to efficiently compute the cost of a path taking the maximal amount
            // of diagonal steps before going straight
            (E * (delta_x - delta_y).abs() + D * (delta_x + delta_y)) / 2
        } else {
            (delta_x + delta_y) * C
        }
    }

    fn join_neighbours(&mut self, p: Point) {
        let p_ix = self.tiles.get_ix_point(&p);
        for n in self.neighborhood_points(&p) {
            if self.in_bounds(n) && self.can_move_to(n, p) {
                let n_ix = self.tiles.get_ix_point(&n);
                self.components.union(p_ix, n_ix);
            }
        }
    }

    /// Generates a new [UnionFind] structure and links up passable neighbours.
    pub fn generate_components(&mut self) {
        let w = self.width() as i32;
        let h = self.height() as i32;
        debug!("Generating connected components for a {w}x{h} map");
        self.components = UnionFind::new(self.width() * self.height());
        self.components_dirty = false;
        for (x, y) in iproduct!(0..w, 0..h) {
            let p = Point::new(x, y);
            if self.is_passable(p) {
                self.join_neighbours(p);
            }
        }
    }

    /// Checks if start and goal are passable and on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        if self.is_passable(*start) && self.is_passable(*goal) {
            let start_ix = self.tiles.get_ix_point(start);
            let goal_ix = self.tiles.get_ix_point(goal);
            self.components.equiv(start_ix, goal_ix)
        } else {
            false
        }
    }

    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        !self.reachable(start, goal)
    }

    /// Advances the camera and regenerates the components if they are marked as dirty.
    pub fn update(&mut self, dt: f32) {
        self.camera.update(dt);
        if self.components_dirty {
            self.generate_components();
        }
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Switches the projection. Fails if the current tile geometry is too small for it.
    pub fn set_projection(&mut self, projection: Projection) -> MapResult<()> {
        self.tile_geometry.validate(projection)?;
        self.projection = projection;
        self.pre_calc();
        Ok(())
    }

    pub fn tile_geometry(&self) -> TileGeometry {
        self.tile_geometry
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Screen position of a tile anchor under the current camera.
    pub fn get_map_to_screen_coords(&self, p: Point) -> Point {
        self.camera
            .world_to_screen(self.projection.map_to_world(self.tile_geometry, p))
    }

    /// Map position under a screen pixel. The result may lie outside the map.
    pub fn get_screen_to_map_coords(&self, s: Point) -> Point {
        self.projection
            .world_to_map(self.tile_geometry, self.camera.screen_to_world(s))
    }

    /// Tile under a screen pixel, if any.
    pub fn pick_tile(&self, s: Point) -> Option<Point> {
        let p = self.get_screen_to_map_coords(s);
        self.in_bounds(p).then_some(p)
    }

    pub fn move_camera(&mut self, dx: i32, dy: i32) {
        self.camera.move_by(dx, dy);
    }

    pub fn set_camera_start_position(&mut self, x: i32, y: i32) {
        self.camera.set_start_position(x, y);
    }

    pub fn set_camera_velocity(&mut self, vx: f32, vy: f32) {
        self.camera.set_scroll_velocity(vx, vy);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        let (w, h) = (self.width() as i32, self.height() as i32);
        self.camera
            .pre_calc(self.projection, self.tile_geometry, w, h, viewport);
    }

    /// Recomputes the camera bounds for the current viewport.
    pub fn pre_calc(&mut self) {
        let viewport = self.camera.viewport();
        self.set_viewport(viewport);
    }
}

impl fmt::Display for GridMap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.height() as i32 {
            let row: String = (0..self.width() as i32)
                .map(|x| self.tiles.get(x, y).terrain.symbol())
                .collect();
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
