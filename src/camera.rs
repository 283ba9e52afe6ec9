//! Map/screen projections and the scrolling camera used to view a [GridMap](crate::grid_map::GridMap).
//!
//! Map coordinates are tile indices. World coordinates are pixels produced by the
//! projection before any scrolling is applied. Screen coordinates are world
//! coordinates shifted so that the top-left of the map bounds sits at the
//! viewport start, minus the camera offset.
use crate::error::{MapError, MapResult};
use grid_util::Point;

/// How tiles are laid out on screen.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Projection {
    /// `screen = map * tile_size`.
    #[default]
    Orthogonal,
    /// Diamond tiles: `x = (mx - my) * half_width`, `y = (mx + my) * half_height`.
    Isometric,
}

/// Pixel size of a single tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileGeometry {
    pub width: i32,
    pub height: i32,
}

impl TileGeometry {
    pub const fn new(width: i32, height: i32) -> TileGeometry {
        TileGeometry { width, height }
    }

    /// Checks that tiles are large enough for the screen and map transforms to stay inverses:
    /// at least one pixel for orthogonal tiles, two for isometric ones so that the half sizes
    /// are non-zero.
    pub fn validate(&self, projection: Projection) -> MapResult<()> {
        let min = match projection {
            Projection::Orthogonal => 1,
            Projection::Isometric => 2,
        };
        if self.width < min || self.height < min {
            return Err(MapError::InvalidTileGeometry {
                width: self.width,
                height: self.height,
                projection,
            });
        }
        Ok(())
    }

    pub fn half_width(&self) -> i32 {
        self.width / 2
    }
    pub fn half_height(&self) -> i32 {
        self.height / 2
    }
}

impl Default for TileGeometry {
    fn default() -> TileGeometry {
        TileGeometry::new(32, 32)
    }
}

/// Visible screen rectangle, `start` inclusive and `end` exclusive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub start: Point,
    pub end: Point,
}

impl Viewport {
    pub fn new(start: Point, end: Point) -> Viewport {
        Viewport { start, end }
    }
    pub fn width(&self) -> i32 {
        (self.end.x - self.start.x).max(0)
    }
    pub fn height(&self) -> i32 {
        (self.end.y - self.start.y).max(0)
    }
}

impl Default for Viewport {
    fn default() -> Viewport {
        Viewport::new(Point::new(0, 0), Point::new(800, 600))
    }
}

impl Projection {
    /// Pixel position of the anchor of a tile: its top-left corner for orthogonal maps and its
    /// top vertex for isometric ones.
    pub fn map_to_world(self, tile: TileGeometry, p: Point) -> Point {
        match self {
            Projection::Orthogonal => Point::new(p.x * tile.width, p.y * tile.height),
            Projection::Isometric => Point::new(
                (p.x - p.y) * tile.half_width(),
                (p.x + p.y) * tile.half_height(),
            ),
        }
    }

    /// Tile containing a world pixel. Exact inverse of [map_to_world](Self::map_to_world) on tile
    /// anchors; any pixel inside a tile's footprint maps back to that tile.
    pub fn world_to_map(self, tile: TileGeometry, w: Point) -> Point {
        match self {
            Projection::Orthogonal => Point::new(
                w.x.div_euclid(tile.width.max(1)),
                w.y.div_euclid(tile.height.max(1)),
            ),
            Projection::Isometric => {
                let a = w.x as f32 / tile.half_width().max(1) as f32;
                let b = w.y as f32 / tile.half_height().max(1) as f32;
                Point::new(((a + b) / 2.0).floor() as i32, ((b - a) / 2.0).floor() as i32)
            }
        }
    }

    /// Pixel bounds `(min, max)` covered by a `width x height` map.
    pub fn world_bounds(self, tile: TileGeometry, width: i32, height: i32) -> (Point, Point) {
        match self {
            Projection::Orthogonal => (
                Point::new(0, 0),
                Point::new(width * tile.width, height * tile.height),
            ),
            Projection::Isometric => (
                Point::new(-height * tile.half_width(), 0),
                Point::new(width * tile.half_width(), (width + height) * tile.half_height()),
            ),
        }
    }
}

/// Camera pan state. Offsets are kept in `[0, max_offset]` on both axes.
#[derive(Clone, Debug)]
pub struct Camera {
    x: f32,
    y: f32,
    velocity_x: f32,
    velocity_y: f32,
    max_offset: Point,
    world_min: Point,
    viewport: Viewport,
}

impl Camera {
    pub fn new(viewport: Viewport) -> Camera {
        Camera {
            x: 0.0,
            y: 0.0,
            velocity_x: 0.0,
            velocity_y: 0.0,
            max_offset: Point::new(0, 0),
            world_min: Point::new(0, 0),
            viewport,
        }
    }

    /// Recomputes the scroll limits. Must be called whenever the viewport or the map
    /// dimensions change.
    pub fn pre_calc(
        &mut self,
        projection: Projection,
        tile: TileGeometry,
        map_width: i32,
        map_height: i32,
        viewport: Viewport,
    ) {
        let (min, max) = projection.world_bounds(tile, map_width, map_height);
        self.viewport = viewport;
        self.world_min = min;
        self.max_offset = Point::new(
            (max.x - min.x - viewport.width()).max(0),
            (max.y - min.y - viewport.height()).max(0),
        );
        self.clamp();
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn max_offset(&self) -> Point {
        self.max_offset
    }

    /// Current integer scroll offset in pixels.
    pub fn offset(&self) -> Point {
        Point::new(self.x.floor() as i32, self.y.floor() as i32)
    }

    pub fn set_start_position(&mut self, x: i32, y: i32) {
        self.x = x as f32;
        self.y = y as f32;
        self.clamp();
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.x += dx as f32;
        self.y += dy as f32;
        self.clamp();
    }

    /// Scroll speed in pixels per second, applied by [update](Self::update).
    pub fn set_scroll_velocity(&mut self, vx: f32, vy: f32) {
        self.velocity_x = vx;
        self.velocity_y = vy;
    }

    pub fn is_scrolling(&self) -> bool {
        self.velocity_x != 0.0 || self.velocity_y != 0.0
    }

    pub fn update(&mut self, dt: f32) {
        if self.is_scrolling() {
            self.x += self.velocity_x * dt;
            self.y += self.velocity_y * dt;
            self.clamp();
        }
    }

    /// World pixel to screen pixel.
    pub fn world_to_screen(&self, w: Point) -> Point {
        let offset = self.offset();
        Point::new(
            w.x - self.world_min.x - offset.x + self.viewport.start.x,
            w.y - self.world_min.y - offset.y + self.viewport.start.y,
        )
    }

    /// Screen pixel to world pixel.
    pub fn screen_to_world(&self, s: Point) -> Point {
        let offset = self.offset();
        Point::new(
            s.x - self.viewport.start.x + offset.x + self.world_min.x,
            s.y - self.viewport.start.y + offset.y + self.world_min.y,
        )
    }

    fn clamp(&mut self) {
        self.x = self.x.clamp(0.0, self.max_offset.x as f32);
        self.y = self.y.clamp(0.0, self.max_offset.y as f32);
    }
}

impl Default for Camera {
    fn default() -> Camera {
        Camera::new(Viewport::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isometric_anchor_round_trip() {
        let tile = TileGeometry::new(64, 32);
        for x in -3..10 {
            for y in -3..10 {
                let p = Point::new(x, y);
                let w = Projection::Isometric.map_to_world(tile, p);
                assert_eq!(Projection::Isometric.world_to_map(tile, w), p);
            }
        }
    }

    /// Pixels inside a diamond pick the diamond's tile.
    #[test]
    fn isometric_picking_inside_diamond() {
        let tile = TileGeometry::new(64, 32);
        let p = Point::new(3, 2);
        let anchor = Projection::Isometric.map_to_world(tile, p);
        // Centre of the diamond and points just inside each vertex.
        for (dx, dy) in [(0, 16), (0, 1), (0, 31), (-31, 16), (31, 16)] {
            let w = Point::new(anchor.x + dx, anchor.y + dy);
            assert_eq!(Projection::Isometric.world_to_map(tile, w), p);
        }
    }

    #[test]
    fn orthogonal_picking_uses_floor() {
        let tile = TileGeometry::new(16, 16);
        assert_eq!(
            Projection::Orthogonal.world_to_map(tile, Point::new(31, 0)),
            Point::new(1, 0)
        );
        assert_eq!(
            Projection::Orthogonal.world_to_map(tile, Point::new(-1, -17)),
            Point::new(-1, -2)
        );
    }

    #[test]
    fn camera_is_clamped() {
        let mut camera = Camera::new(Viewport::default());
        camera.pre_calc(
            Projection::Orthogonal,
            TileGeometry::new(32, 32),
            50,
            10,
            Viewport::new(Point::new(0, 0), Point::new(800, 600)),
        );
        // 50 * 32 - 800 horizontally, the map is shorter than the viewport vertically.
        assert_eq!(camera.max_offset(), Point::new(800, 0));
        camera.move_by(-100, 40);
        assert_eq!(camera.offset(), Point::new(0, 0));
        camera.move_by(5000, 0);
        assert_eq!(camera.offset(), Point::new(800, 0));
    }

    #[test]
    fn camera_velocity_scrolls_over_time() {
        let mut camera = Camera::new(Viewport::default());
        camera.pre_calc(
            Projection::Orthogonal,
            TileGeometry::new(32, 32),
            100,
            100,
            Viewport::new(Point::new(0, 0), Point::new(320, 320)),
        );
        camera.set_scroll_velocity(100.0, 50.0);
        camera.update(0.5);
        assert_eq!(camera.offset(), Point::new(50, 25));
        camera.set_scroll_velocity(0.0, 0.0);
        camera.update(10.0);
        assert_eq!(camera.offset(), Point::new(50, 25));
    }

    #[test]
    fn growing_viewport_reclamps_offset() {
        let tile = TileGeometry::new(32, 32);
        let mut camera = Camera::new(Viewport::default());
        camera.pre_calc(
            Projection::Orthogonal,
            tile,
            20,
            20,
            Viewport::new(Point::new(0, 0), Point::new(320, 320)),
        );
        camera.set_start_position(320, 320);
        assert_eq!(camera.offset(), Point::new(320, 320));
        camera.pre_calc(
            Projection::Orthogonal,
            tile,
            20,
            20,
            Viewport::new(Point::new(0, 0), Point::new(480, 480)),
        );
        assert_eq!(camera.offset(), Point::new(160, 160));
    }
}
