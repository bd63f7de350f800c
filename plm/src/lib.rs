//! Path loss map (`plm_<robot>.tif`) loading and lookup.
//!
//! A path loss map is a single band raster where every sample holds
//! the path loss, in dB, experienced by a radio at that location. The
//! raster is georeferenced with a regular affine geotransform (UTM)
//! plus two custom metadata tags, `CUSTOM_X_ORIGIN` and
//! `CUSTOM_Y_ORIGIN`, which place the simulator's local frame inside
//! the UTM frame.

mod error;
#[cfg(feature = "gdal")]
mod gtiff;

pub use crate::error::PlmError;
use geo::geometry::Coord;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

/// Base floating point type used for all coordinates.
pub type C = f64;

/// Metadata tag holding the local frame's X offset into UTM.
pub const CUSTOM_X_ORIGIN: &str = "CUSTOM_X_ORIGIN";

/// Metadata tag holding the local frame's Y offset into UTM.
pub const CUSTOM_Y_ORIGIN: &str = "CUSTOM_Y_ORIGIN";

/// Everything needed to go from a local position to a pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Georef {
    /// Offset from the simulator's local frame into UTM.
    pub origin: Coord<C>,

    /// UTM coordinate of the raster's top-left corner.
    pub utm_origin: Coord<C>,

    /// Pixel size along each axis. Y is usually negative (north-up).
    pub pixel_scale: Coord<C>,
}

impl Georef {
    /// Builds a `Georef` from the custom origin tags and a GDAL style
    /// geotransform (`[x0, dx, _, y0, _, dy]`).
    pub fn from_geo_transform(origin: Coord<C>, gt: &[C; 6]) -> Self {
        Self {
            origin,
            utm_origin: Coord { x: gt[0], y: gt[3] },
            pixel_scale: Coord { x: gt[1], y: gt[5] },
        }
    }

    /// Returns the pixel containing the local `position`.
    ///
    /// Division results are truncated toward zero, not rounded or
    /// floored; a position that lands 3.9 pixels in maps to pixel 3.
    pub fn pixel(&self, position: Coord<C>) -> Pixel {
        let utm = position + self.origin;
        #[allow(clippy::cast_possible_truncation)]
        Pixel {
            col: ((utm.x - self.utm_origin.x) / self.pixel_scale.x) as isize,
            row: ((utm.y - self.utm_origin.y) / self.pixel_scale.y) as isize,
        }
    }
}

/// A (column, row) index into a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub col: isize,
    pub row: isize,
}

/// A path loss map read into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct PathLossMap {
    georef: Georef,

    /// Number of (columns, rows) in this map.
    dimensions: (usize, usize),

    /// Path loss samples (dB), row-major.
    samples: Box<[f32]>,
}

impl PathLossMap {
    /// Returns a map over `samples`, which must be row-major and hold
    /// exactly `cols * rows` values.
    pub fn new(
        georef: Georef,
        (cols, rows): (usize, usize),
        samples: Vec<f32>,
    ) -> Result<Self, PlmError> {
        if samples.len() != cols * rows {
            return Err(PlmError::BandSize {
                expected: cols * rows,
                actual: samples.len(),
            });
        }
        Ok(Self {
            georef,
            dimensions: (cols, rows),
            samples: samples.into_boxed_slice(),
        })
    }

    pub fn georef(&self) -> &Georef {
        &self.georef
    }

    /// Returns (columns, rows).
    pub fn dimensions(&self) -> (usize, usize) {
        self.dimensions
    }

    /// Returns the sample at `pixel`, if it lies within this map.
    pub fn get(&self, Pixel { col, row }: Pixel) -> Option<f32> {
        let (cols, rows) = self.dimensions;
        #[allow(clippy::cast_possible_wrap)]
        if 0 <= col && col < cols as isize && 0 <= row && row < rows as isize {
            #[allow(clippy::cast_sign_loss)]
            let idx_1d = row as usize * cols + col as usize;
            Some(self.samples[idx_1d])
        } else {
            None
        }
    }

    /// Returns the path loss (dB) at the local `position`.
    pub fn path_loss(&self, position: Coord<C>) -> Result<f32, PlmError> {
        let pixel = self.georef.pixel(position);
        log::debug!("position {position:?} -> pixel {pixel:?}");
        self.get(pixel).ok_or(PlmError::OutOfBounds {
            pixel,
            cols: self.dimensions.0,
            rows: self.dimensions.1,
        })
    }
}

/// Somewhere path loss maps can be loaded from, by robot name.
pub trait MapSource {
    fn load(&self, robot: &str) -> Result<PathLossMap, PlmError>;
}

/// A directory of `plm_<robot>.tif` files.
///
/// Every [`MapSource::load`] reopens and rereads the file; nothing is
/// cached between calls.
#[derive(Debug, Clone)]
pub struct PlmDir {
    dir: PathBuf,
}

impl PlmDir {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the expected path of `robot`'s map.
    pub fn path(&self, robot: &str) -> PathBuf {
        [&self.dir, Path::new(&file_name(robot))].iter().collect()
    }
}

#[cfg(feature = "gdal")]
impl MapSource for PlmDir {
    fn load(&self, robot: &str) -> Result<PathLossMap, PlmError> {
        let path = self.path(robot);
        if !path.is_file() {
            return Err(PlmError::Io(io::Error::new(
                ErrorKind::NotFound,
                format!("path loss map {path:?} not found"),
            )));
        }
        PathLossMap::open(path)
    }
}

#[cfg(not(feature = "gdal"))]
impl MapSource for PlmDir {
    fn load(&self, robot: &str) -> Result<PathLossMap, PlmError> {
        Err(PlmError::Io(io::Error::new(
            ErrorKind::Unsupported,
            format!(
                "cannot read {:?}, built without GeoTIFF support",
                self.path(robot)
            ),
        )))
    }
}

/// Returns the expected file name for `robot`'s map.
pub fn file_name(robot: &str) -> String {
    format!("plm_{robot}.tif")
}

#[cfg(test)]
mod tests {
    use super::{file_name, Coord, Georef, PathLossMap, Pixel, PlmDir, PlmError};
    use std::path::PathBuf;

    /// 4x3 map, 0.5m pixels, north-up, with the local frame offset by
    /// (1000, 2000).
    fn georef() -> Georef {
        Georef::from_geo_transform(
            Coord {
                x: 1000.0,
                y: 2000.0,
            },
            &[1000.0, 0.5, 0.0, 2001.5, 0.0, -0.5],
        )
    }

    fn map() -> PathLossMap {
        let samples = (0..12).map(|v| v as f32).collect();
        PathLossMap::new(georef(), (4, 3), samples).unwrap()
    }

    #[test]
    fn test_from_geo_transform() {
        let georef = georef();
        assert_eq!(
            georef.utm_origin,
            Coord {
                x: 1000.0,
                y: 2001.5
            }
        );
        assert_eq!(georef.pixel_scale, Coord { x: 0.5, y: -0.5 });
    }

    #[test]
    fn test_pixel_truncates() {
        let georef = Georef {
            origin: Coord { x: 0.0, y: 0.0 },
            utm_origin: Coord { x: 0.0, y: 0.0 },
            pixel_scale: Coord { x: 1.0, y: -1.0 },
        };
        assert_eq!(
            georef.pixel(Coord { x: 3.9, y: -2.99 }),
            Pixel { col: 3, row: 2 }
        );
        // Truncation is toward zero, so slightly outside still lands
        // on the first pixel.
        assert_eq!(
            georef.pixel(Coord { x: -0.5, y: 0.5 }),
            Pixel { col: 0, row: 0 }
        );
        assert_eq!(
            georef.pixel(Coord { x: -1.5, y: 0.0 }),
            Pixel { col: -1, row: 0 }
        );
    }

    #[test]
    fn test_pixel_is_deterministic() {
        let georef = georef();
        let position = Coord { x: 1.2, y: 0.4 };
        assert_eq!(georef.pixel(position), georef.pixel(position));
        assert_eq!(georef.pixel(position), Pixel { col: 2, row: 2 });
    }

    #[test]
    fn test_get_is_row_major() {
        let map = map();
        assert_eq!(map.get(Pixel { col: 0, row: 0 }), Some(0.0));
        assert_eq!(map.get(Pixel { col: 3, row: 0 }), Some(3.0));
        assert_eq!(map.get(Pixel { col: 0, row: 1 }), Some(4.0));
        assert_eq!(map.get(Pixel { col: 3, row: 2 }), Some(11.0));
    }

    #[test]
    fn test_out_of_bounds_get_returns_none() {
        let map = map();
        assert_eq!(map.get(Pixel { col: 4, row: 0 }), None);
        assert_eq!(map.get(Pixel { col: 0, row: 3 }), None);
        assert_eq!(map.get(Pixel { col: -1, row: 0 }), None);
        assert_eq!(map.get(Pixel { col: 0, row: -1 }), None);
    }

    #[test]
    fn test_path_loss() {
        let map = map();
        // utm (1001.2, 2000.4) -> col 2, row 2
        assert_eq!(map.path_loss(Coord { x: 1.2, y: 0.4 }).unwrap(), 10.0);
        // utm (1000.0, 2001.5) -> top left
        assert_eq!(map.path_loss(Coord { x: 0.0, y: 1.5 }).unwrap(), 0.0);
    }

    #[test]
    fn test_path_loss_out_of_bounds() {
        let map = map();
        match map.path_loss(Coord { x: 100.0, y: 0.0 }) {
            Err(PlmError::OutOfBounds { pixel, cols, rows }) => {
                assert_eq!(pixel, Pixel { col: 200, row: 3 });
                assert_eq!((cols, rows), (4, 3));
            }
            other => panic!("expected OutOfBounds, got {other:?}"),
        }
    }

    #[test]
    fn test_band_size_mismatch() {
        assert!(matches!(
            PathLossMap::new(georef(), (4, 3), vec![0.0; 11]),
            Err(PlmError::BandSize {
                expected: 12,
                actual: 11
            })
        ));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("robo1"), "plm_robo1.tif");
        let dir = PlmDir::new("/tmp/maps");
        assert_eq!(dir.path("r2"), PathBuf::from("/tmp/maps/plm_r2.tif"));
    }
}
