//! Grid construction from a polygon feature collection
//!
//! The grid definition file is a JSON object with a `features` list. Each
//! feature's `geometry.coordinates[0]` is one closed rectangle ring; all
//! other feature content is ignored.

use super::{cell_name, BoundingBox, Cell, GridIndex};
use crate::error::{common, ErrorCode, GeoTallyError, Result};
use serde::Deserialize;
use std::cmp::Ordering;
use std::path::Path;
use tracing::{debug, info};

/// Parsed grid definition file
#[derive(Debug, Clone, Deserialize)]
pub struct GridDefinition {
    pub features: Vec<GridFeature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridFeature {
    pub geometry: FeatureGeometry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureGeometry {
    /// Polygon rings; only the outer ring is used
    pub coordinates: Vec<Vec<Vec<f64>>>,
}

impl GridDefinition {
    pub fn from_json(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(common::input_not_found(path));
        }
        let content = std::fs::read_to_string(path).map_err(|e| common::read_failed(path, e))?;
        Self::from_json(&content).map_err(|e| common::invalid_json(path, e))
    }
}

/// Fold a rectangle ring into `(x1, x2, y1, y2)`
///
/// Starts from the first vertex and, for each later vertex, replaces the
/// upper bound when the coordinate exceeds the current lower bound and the
/// lower bound otherwise. This is order-sensitive and only meaningful for
/// rectangle rings; it is not a general bounding box.
pub fn simplify(vertices: &[[f64; 2]]) -> Option<BoundingBox> {
    let (first, rest) = vertices.split_first()?;
    let mut bounds = BoundingBox {
        x1: first[0],
        x2: first[0],
        y1: first[1],
        y2: first[1],
    };

    for [x, y] in rest.iter().copied() {
        if bounds.x1 < x {
            bounds.x2 = x;
        } else {
            bounds.x1 = x;
        }

        if bounds.y1 < y {
            bounds.y2 = y;
        } else {
            bounds.y1 = y;
        }
    }

    Some(bounds)
}

/// Collects rectangles and assigns positional cell names
#[derive(Debug, Default)]
pub struct GridBuilder {
    rectangles: Vec<BoundingBox>,
}

impl GridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from every feature in a parsed definition
    pub fn from_definition(definition: &GridDefinition) -> Result<Self> {
        let mut builder = Self::new();
        for (idx, feature) in definition.features.iter().enumerate() {
            let ring = feature
                .geometry
                .coordinates
                .first()
                .map(Vec::as_slice)
                .unwrap_or_default();
            builder
                .add_ring(ring)
                .map_err(|e| e.with_context(format!("feature #{}", idx)))?;
        }
        Ok(builder)
    }

    /// Read a grid definition file and build its index
    pub fn load(path: &Path) -> Result<GridIndex> {
        let definition = GridDefinition::load(path)?;
        Self::from_definition(&definition)
            .and_then(Self::build)
            .map_err(|e| e.with_path(path))
    }

    /// Add one polygon ring; every vertex needs at least an x and a y
    pub fn add_ring(&mut self, ring: &[Vec<f64>]) -> Result<&mut Self> {
        if ring.len() < 3 {
            return Err(GeoTallyError::config_with_code(
                ErrorCode::CONFIG_INVALID_FEATURE,
                format!("polygon ring has {} vertices, need at least 3", ring.len()),
            ));
        }

        let vertices = ring
            .iter()
            .map(|v| match v.as_slice() {
                [x, y, ..] => Ok([*x, *y]),
                _ => Err(GeoTallyError::config_with_code(
                    ErrorCode::CONFIG_INVALID_FEATURE,
                    format!("vertex {:?} has fewer than two coordinates", v),
                )),
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(bounds) = simplify(&vertices) {
            self.rectangles.push(bounds);
        }
        Ok(self)
    }

    /// Add an already simplified rectangle
    pub fn add_rectangle(&mut self, bounds: BoundingBox) -> &mut Self {
        self.rectangles.push(bounds);
        self
    }

    /// Sort rows by `y1` descending and columns by `x1` ascending, then name
    /// each cell by its position
    pub fn build(self) -> Result<GridIndex> {
        if self.rectangles.is_empty() {
            return Err(GeoTallyError::config_with_code(
                ErrorCode::CONFIG_EMPTY_GRID,
                "grid definition contains no features",
            ));
        }

        let mut rectangles = self.rectangles;
        rectangles.sort_by(|a, b| {
            b.y1.total_cmp(&a.y1)
                .then_with(|| a.x1.total_cmp(&b.x1))
        });

        let mut cells = Vec::with_capacity(rectangles.len());
        let mut row = 0;
        let mut column = 0;
        let mut current_y1: Option<f64> = None;

        for bounds in rectangles {
            if current_y1.map(|y| y.total_cmp(&bounds.y1)) != Some(Ordering::Equal) {
                row += 1;
                column = 0;
                current_y1 = Some(bounds.y1);
            }
            column += 1;

            let id = cell_name(row, column);
            debug!(
                "Cell {}: x=[{}, {}] y=[{}, {}]",
                id, bounds.x1, bounds.x2, bounds.y1, bounds.y2
            );
            cells.push(Cell { id, bounds });
        }

        info!("Built grid with {} cells in {} rows", cells.len(), row);
        Ok(GridIndex::new(cells))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn square_ring(x1: f64, y1: f64, size: f64) -> Vec<Vec<f64>> {
        vec![
            vec![x1, y1 + size],
            vec![x1 + size, y1 + size],
            vec![x1 + size, y1],
            vec![x1, y1],
            vec![x1, y1 + size],
        ]
    }

    #[test]
    fn test_simplify_rectangle_ring() {
        let ring = [[0.0, 2.0], [3.0, 2.0], [3.0, 0.0], [0.0, 0.0], [0.0, 2.0]];
        let bounds = simplify(&ring).unwrap();
        assert_eq!(
            bounds,
            BoundingBox {
                x1: 0.0,
                x2: 3.0,
                y1: 0.0,
                y2: 2.0
            }
        );
    }

    #[test]
    fn test_simplify_empty_ring() {
        assert!(simplify(&[]).is_none());
    }

    #[test]
    fn test_simplify_is_order_sensitive() {
        // Not a bounding box: a later, smaller vertex overwrites the upper bound
        let ring = [[0.0, 0.0], [3.0, 2.0], [1.0, 1.0]];
        let bounds = simplify(&ring).unwrap();
        assert_eq!(bounds.x1, 0.0);
        assert_eq!(bounds.x2, 1.0);
        assert_eq!(bounds.y1, 0.0);
        assert_eq!(bounds.y2, 1.0);
    }

    #[test]
    fn test_build_names_rows_north_to_south() {
        let mut builder = GridBuilder::new();
        for (x, y) in [(1.0, 0.0), (0.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            builder.add_ring(&square_ring(x, y, 1.0)).unwrap();
        }
        let index = builder.build().unwrap();
        let ids: Vec<_> = index.cell_ids().collect();
        assert_eq!(ids, vec!["A1", "A2", "B1", "B2"]);

        let a2 = index.get("A2").unwrap();
        assert_eq!((a2.x1, a2.y1), (1.0, 1.0));
        let b1 = index.get("B1").unwrap();
        assert_eq!((b1.x1, b1.y1), (0.0, 0.0));
    }

    #[test]
    fn test_build_uses_double_letters_past_z() {
        let mut builder = GridBuilder::new();
        for row in 0..28 {
            builder.add_ring(&square_ring(0.0, -(row as f64), 1.0)).unwrap();
        }
        let index = builder.build().unwrap();
        let ids: Vec<_> = index.cell_ids().collect();
        assert_eq!(ids[0], "A1");
        assert_eq!(ids[25], "Z1");
        assert_eq!(ids[26], "AA1");
        assert_eq!(ids[27], "AB1");
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_empty_grid_is_config_error() {
        let err = GridBuilder::new().build().unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_EMPTY_GRID);
    }

    #[test]
    fn test_short_ring_is_config_error() {
        let err = GridBuilder::new()
            .add_ring(&[vec![0.0, 0.0], vec![1.0, 1.0]])
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID_FEATURE);
    }

    #[test]
    fn test_vertex_without_y_is_config_error() {
        let err = GridBuilder::new()
            .add_ring(&[vec![0.0], vec![1.0, 1.0], vec![1.0, 0.0]])
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID_FEATURE);
    }

    #[test]
    fn test_from_definition_json() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"id": 9},
                 "geometry": {"type": "Polygon", "coordinates": [[[0, 1], [1, 1], [1, 0], [0, 0], [0, 1]]]}},
                {"type": "Feature", "properties": {"id": 10},
                 "geometry": {"type": "Polygon", "coordinates": [[[1, 1], [2, 1], [2, 0], [1, 0], [1, 1]]]}}
            ]
        }"#;
        let definition = GridDefinition::from_json(json).unwrap();
        let index = GridBuilder::from_definition(&definition)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("A2").unwrap().x2, 2.0);
    }

    #[test]
    fn test_feature_without_rings_is_config_error() {
        let json = r#"{"features": [{"geometry": {"coordinates": []}}]}"#;
        let definition = GridDefinition::from_json(json).unwrap();
        let err = GridBuilder::from_definition(&definition).unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID_FEATURE);
        assert!(err.to_string().contains("feature #0"));
    }
}
