//! GeoTIFF loading through GDAL.

use crate::{Georef, PathLossMap, PlmError, C, CUSTOM_X_ORIGIN, CUSTOM_Y_ORIGIN};
use gdal::{Dataset, Metadata};
use geo::geometry::Coord;
use log::debug;
use std::path::Path;

impl PathLossMap {
    /// Returns a map read into memory from the GeoTIFF at `path`.
    ///
    /// The dataset is only held for the duration of this call.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PlmError> {
        let path = path.as_ref();
        debug!("loading {path:?}");
        let dataset = Dataset::open(path)?;

        let origin = Coord {
            x: custom_origin(&dataset, CUSTOM_X_ORIGIN, path)?,
            y: custom_origin(&dataset, CUSTOM_Y_ORIGIN, path)?,
        };
        let georef = Georef::from_geo_transform(origin, &dataset.geo_transform()?);

        let dimensions @ (cols, rows) = dataset.raster_size();
        let band = dataset.rasterband(1)?;
        let buffer = band.read_as::<f32>((0, 0), (cols, rows), (cols, rows), None)?;

        Self::new(georef, dimensions, buffer.data)
    }
}

fn custom_origin(dataset: &Dataset, tag: &'static str, path: &Path) -> Result<C, PlmError> {
    let value = dataset
        .metadata_item(tag, "")
        .ok_or_else(|| PlmError::MissingTag(tag, path.to_owned()))?;
    value.trim().parse().map_err(|_| PlmError::InvalidTag {
        tag,
        value,
        path: path.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use crate::{
        Coord, MapSource, PathLossMap, Pixel, PlmDir, PlmError, CUSTOM_X_ORIGIN, CUSTOM_Y_ORIGIN,
    };
    use gdal::{raster::Buffer, DriverManager, Metadata};
    use std::path::Path;
    use tempfile::TempDir;

    const COLS: usize = 5;
    const ROWS: usize = 4;

    /// Writes a float32 GeoTIFF where each row increases by 0.75 dB
    /// per column, offset by 10 dB per row.
    fn write_plm(path: &Path, tags: &[(&str, &str)]) {
        let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
        let mut dataset = driver
            .create_with_band_type::<f32, _>(path, COLS as isize, ROWS as isize, 1)
            .unwrap();
        dataset
            .set_geo_transform(&[500_000.0, 2.0, 0.0, 4_000_000.0, 0.0, -2.0])
            .unwrap();
        for (key, value) in tags {
            dataset.set_metadata_item(key, value, "").unwrap();
        }
        let data: Vec<f32> = (0..ROWS)
            .flat_map(|row| (0..COLS).map(move |col| row as f32 * 10.0 + col as f32 * 0.75))
            .collect();
        let mut band = dataset.rasterband(1).unwrap();
        band.write((0, 0), (COLS, ROWS), &Buffer::new((COLS, ROWS), data))
            .unwrap();
    }

    #[test]
    fn test_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plm_robo1.tif");
        write_plm(
            &path,
            &[(CUSTOM_X_ORIGIN, "499990.0"), (CUSTOM_Y_ORIGIN, "3999990")],
        );

        let map = PathLossMap::open(&path).unwrap();
        assert_eq!(map.dimensions(), (COLS, ROWS));
        assert_eq!(
            map.georef().origin,
            Coord {
                x: 499_990.0,
                y: 3_999_990.0
            }
        );
        assert_eq!(map.get(Pixel { col: 3, row: 2 }), Some(22.25));

        // local (13, 5) -> utm (500003, 3999995) -> col 1, row 2
        assert_eq!(map.path_loss(Coord { x: 13.0, y: 5.0 }).unwrap(), 20.75);
    }

    #[test]
    fn test_plm_dir_load() {
        let dir = TempDir::new().unwrap();
        write_plm(
            &dir.path().join("plm_robo2.tif"),
            &[(CUSTOM_X_ORIGIN, "0"), (CUSTOM_Y_ORIGIN, "0")],
        );
        let source = PlmDir::new(dir.path());
        assert!(source.load("robo2").is_ok());
        assert!(matches!(source.load("robo3"), Err(PlmError::Io(_))));
    }

    #[test]
    fn test_missing_tag() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plm_r.tif");
        write_plm(&path, &[(CUSTOM_X_ORIGIN, "0")]);
        assert!(matches!(
            PathLossMap::open(&path),
            Err(PlmError::MissingTag(CUSTOM_Y_ORIGIN, _))
        ));
    }

    #[test]
    fn test_invalid_tag() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plm_r.tif");
        write_plm(&path, &[(CUSTOM_X_ORIGIN, "east"), (CUSTOM_Y_ORIGIN, "0")]);
        match PathLossMap::open(&path) {
            Err(PlmError::InvalidTag { tag, value, .. }) => {
                assert_eq!(tag, CUSTOM_X_ORIGIN);
                assert_eq!(value, "east");
            }
            other => panic!("expected InvalidTag, got {other:?}"),
        }
    }
}
