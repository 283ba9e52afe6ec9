//! Error types for map editing and search control.
use crate::camera::Projection;
use grid_util::Point;
use thiserror::Error;

/// Errors raised while creating, editing or persisting a [GridMap](crate::grid_map::GridMap).
#[derive(Error, Debug)]
pub enum MapError {
    #[error("invalid map size {width}x{height}")]
    InvalidSize { width: i32, height: i32 },

    #[error("tile geometry {width}x{height} is too small for {projection:?} projection")]
    InvalidTileGeometry {
        width: i32,
        height: i32,
        projection: Projection,
    },

    #[error("position {0} is outside of the map")]
    OutOfBounds(Point),

    #[error("unknown terrain code {0}")]
    InvalidTerrain(u8),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Misuse of a [Walker](crate::walker::Walker) or [Pathfinder](crate::pathfinder::Pathfinder).
///
/// A search that simply finds no path is not an error, it ends in
/// [SearchState::Failed](crate::walker::SearchState::Failed).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("walker is not bound to a map")]
    Unbound,

    #[error("walker was bound to a {bound_width}x{bound_height} map but stepped on a {width}x{height} map")]
    MapMismatch {
        bound_width: usize,
        bound_height: usize,
        width: usize,
        height: usize,
    },

    #[error("no search has been started")]
    NotStarted,

    #[error("endpoint {0} is outside of the map")]
    OutOfBounds(Point),

    #[error("endpoint {0} is not passable")]
    Impassable(Point),

    #[error("no walker with index {0}")]
    InvalidWalker(usize),

    #[error("a pathfinder needs at least one walker")]
    EmptyRoster,
}

pub type MapResult<T> = std::result::Result<T, MapError>;
pub type SearchResult<T> = std::result::Result<T, SearchError>;
