//! Country outlines for the choropleth, read from a Natural Earth style
//! GeoJSON `FeatureCollection`.

use std::path::{Path, PathBuf};

use geojson::{GeoJson, Value};
use thiserror::Error;

/// Feature properties tried, in order, for the country name.
const NAME_PROPERTIES: [&str; 3] = ["ADMIN", "NAME", "name"];

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid GeoJSON: {0}")]
    Parse(#[from] geojson::Error),
    #[error("expected a FeatureCollection")]
    NotFeatureCollection,
}

/// One country: its name and the exterior rings of its polygons as
/// `[lon, lat]` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryShape {
    pub name: String,
    pub rings: Vec<Vec<[f64; 2]>>,
}

#[derive(Debug, Clone, Default)]
pub struct WorldMap {
    shapes: Vec<CountryShape>,
}

impl WorldMap {
    pub fn load(path: &Path) -> Result<Self, GeoError> {
        let text = std::fs::read_to_string(path).map_err(|source| GeoError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let map = Self::from_geojson_str(&text)?;
        log::info!(
            "Loaded {} country outlines from {}",
            map.shapes.len(),
            path.display()
        );
        Ok(map)
    }

    pub fn from_geojson_str(text: &str) -> Result<Self, GeoError> {
        let GeoJson::FeatureCollection(collection) = text.parse::<GeoJson>()? else {
            return Err(GeoError::NotFeatureCollection);
        };

        let mut shapes = Vec::with_capacity(collection.features.len());
        for feature in &collection.features {
            let Some(name) = NAME_PROPERTIES
                .iter()
                .find_map(|key| feature.property(key).and_then(|v| v.as_str()))
            else {
                log::debug!("Skipping feature without a name property");
                continue;
            };
            let rings = match feature.geometry.as_ref().map(|g| &g.value) {
                Some(Value::Polygon(polygon)) => exterior(polygon).into_iter().collect(),
                Some(Value::MultiPolygon(polygons)) => {
                    polygons.iter().filter_map(|p| exterior(p)).collect()
                }
                _ => Vec::new(),
            };
            if rings.is_empty() {
                continue;
            }
            shapes.push(CountryShape {
                name: name.to_string(),
                rings,
            });
        }

        Ok(WorldMap { shapes })
    }

    pub fn shapes(&self) -> &[CountryShape] {
        &self.shapes
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

fn exterior(polygon: &[Vec<Vec<f64>>]) -> Option<Vec<[f64; 2]>> {
    let ring: Vec<[f64; 2]> = polygon
        .first()?
        .iter()
        .filter(|pos| pos.len() >= 2)
        .map(|pos| [pos[0], pos[1]])
        .collect();
    (ring.len() >= 3).then_some(ring)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "ADMIN": "Squareland" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "Islands" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[2, 2], [3, 2], [3, 3], [2, 2]]],
                        [[[4, 4], [5, 4], [5, 5], [4, 4]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": { "other": 1 },
                "geometry": { "type": "Point", "coordinates": [0, 0] }
            }
        ]
    }"#;

    #[test]
    fn reads_polygons_and_multipolygons() {
        let map = WorldMap::from_geojson_str(SAMPLE).unwrap();
        assert_eq!(map.shapes().len(), 2);
        assert_eq!(map.shapes()[0].name, "Squareland");
        assert_eq!(map.shapes()[0].rings[0].len(), 5);
        assert_eq!(map.shapes()[1].name, "Islands");
        assert_eq!(map.shapes()[1].rings.len(), 2);
    }

    #[test]
    fn rejects_bare_geometry() {
        let err = WorldMap::from_geojson_str(r#"{"type":"Point","coordinates":[0,0]}"#).unwrap_err();
        assert!(matches!(err, GeoError::NotFeatureCollection));
    }
}
