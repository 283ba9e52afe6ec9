//! Persists a [GridMap] as an image: one pixel per tile, the red channel holding the
//! [TerrainType] code and the green channel the tile cost.
use crate::error::{MapError, MapResult};
use crate::grid_map::{GridMap, TerrainType, Tile, TileCost};
use image::{Rgba, RgbaImage};
use itertools::iproduct;
use log::{info, warn};
use std::path::Path;

impl GridMap {
    /// Encodes the tiles into an RGBA image.
    pub fn to_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.width() as u32, self.height() as u32);
        for (x, y) in iproduct!(0..self.width() as i32, 0..self.height() as i32) {
            if let Some(tile) = self.tile(grid_util::Point::new(x, y)) {
                let code: u8 = tile.terrain.into();
                image.put_pixel(x as u32, y as u32, Rgba([code, tile.cost as u8, 0, 255]));
            }
        }
        image
    }

    /// Replaces size and tiles with the contents of an image produced by
    /// [to_image](Self::to_image). The map is left untouched if any pixel is invalid.
    pub fn load_from_image(&mut self, image: &RgbaImage) -> MapResult<()> {
        let (width, height) = (image.width() as i32, image.height() as i32);
        let mut tiles = Vec::with_capacity((width.max(0) * height.max(0)) as usize);
        for (x, y, pixel) in image.enumerate_pixels() {
            let Rgba([code, cost, _, _]) = *pixel;
            let terrain = TerrainType::try_from(code).map_err(|_| {
                warn!("Pixel ({x}, {y}) holds unknown terrain code {code}");
                MapError::InvalidTerrain(code)
            })?;
            tiles.push((
                x as i32,
                y as i32,
                Tile {
                    terrain,
                    cost: cost as TileCost,
                },
            ));
        }
        self.init(width, height)?;
        for (x, y, tile) in tiles {
            self.set_tile(x, y, tile)?;
        }
        self.generate_components();
        Ok(())
    }

    /// Loads a map from an image file. The format is deduced from the file extension.
    pub fn load_from_image_file<P: AsRef<Path>>(&mut self, path: P) -> MapResult<()> {
        let path = path.as_ref();
        let image = image::open(path)?.to_rgba8();
        self.load_from_image(&image)?;
        info!(
            "Loaded {}x{} map from {}",
            self.width(),
            self.height(),
            path.display()
        );
        Ok(())
    }

    /// Saves the map to an image file. The format is deduced from the file extension.
    pub fn save_to_image_file<P: AsRef<Path>>(&self, path: P) -> MapResult<()> {
        let path = path.as_ref();
        self.to_image().save(path)?;
        info!(
            "Saved {}x{} map to {}",
            self.width(),
            self.height(),
            path.display()
        );
        Ok(())
    }
}
