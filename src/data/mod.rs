use std::collections::HashMap;
use std::fs;
use std::path::Path;

use geojson::{Feature, GeoJson, Geometry, JsonValue, Value};
use glam::DVec2;
use rayon::prelude::*;

use crate::error::{MapError, Result};
use crate::map::{RegionShape, Ring};
use crate::region::RegionId;

/// Properties checked (in order) for a region identifier
const ID_PROPERTIES: [&str; 4] = ["ADM0_A3", "ISO_A3", "iso_a3", "id"];

/// Properties checked (in order) for a display name
const NAME_PROPERTIES: [&str; 3] = ["NAME", "name", "ADMIN"];

/// Natural Earth uses -99 for "no code"
const MISSING_CODE: &str = "-99";

/// Load region shapes from a GeoJSON file.
///
/// Regions whose name appears in `exclude` are dropped. Features sharing an
/// id are merged into one region.
pub fn load_regions(path: &Path, exclude: &[String]) -> Result<Vec<RegionShape>> {
    let mut bytes = fs::read(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let geojson: GeoJson =
        simd_json::serde::from_slice(&mut bytes).map_err(|source| MapError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let regions = regions_from_geojson(geojson, exclude);
    if regions.is_empty() {
        return Err(MapError::NoRegions {
            path: path.to_path_buf(),
        });
    }

    tracing::info!(path = %path.display(), regions = regions.len(), "boundary dataset loaded");
    Ok(regions)
}

/// Pick the boundary dataset for a session.
///
/// An explicitly requested dataset must load. Without one, `default_path` is
/// used when it exists, otherwise the built-in continent outlines.
pub fn load_or_builtin(
    requested: Option<&Path>,
    default_path: &Path,
    exclude: &[String],
) -> Result<Vec<RegionShape>> {
    match requested {
        Some(path) => load_regions(path, exclude).inspect_err(|err| {
            tracing::error!(%err, "boundary dataset failed to load");
        }),
        None if default_path.exists() => load_regions(default_path, exclude),
        None => {
            tracing::info!(path = %default_path.display(), "no dataset, using built-in continents");
            Ok(builtin_regions())
        }
    }
}

/// Convert parsed GeoJSON into merged region shapes
pub fn regions_from_geojson(geojson: GeoJson, exclude: &[String]) -> Vec<RegionShape> {
    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(g) => vec![Feature::from(g)],
    };

    let converted: Vec<RegionShape> = features
        .par_iter()
        .enumerate()
        .filter_map(|(idx, feature)| region_from_feature(idx, feature))
        .filter(|shape| !exclude.iter().any(|name| *name == shape.name))
        .collect();

    let mut merged: Vec<RegionShape> = Vec::with_capacity(converted.len());
    let mut positions: HashMap<RegionId, usize> = HashMap::new();
    for shape in converted {
        match positions.get(&shape.id) {
            Some(&pos) => merged[pos].merge(shape.rings),
            None => {
                positions.insert(shape.id.clone(), merged.len());
                merged.push(shape);
            }
        }
    }
    merged
}

fn region_from_feature(idx: usize, feature: &Feature) -> Option<RegionShape> {
    let name = NAME_PROPERTIES
        .iter()
        .find_map(|key| property_string(feature, key));
    let id = feature
        .id
        .as_ref()
        .map(|id| match id {
            geojson::feature::Id::String(s) => s.clone(),
            geojson::feature::Id::Number(n) => n.to_string(),
        })
        .or_else(|| ID_PROPERTIES.iter().find_map(|key| property_string(feature, key)))
        .or_else(|| name.clone())
        .unwrap_or_else(|| format!("feature-{idx}"));
    let name = name.unwrap_or_else(|| id.clone());

    let Some(geometry) = feature.geometry.as_ref() else {
        tracing::warn!(%name, "feature missing geometry, skipped");
        return None;
    };

    let mut rings = Vec::new();
    collect_rings(geometry, &mut rings);
    if rings.is_empty() {
        tracing::warn!(%name, "feature has no polygon geometry, skipped");
        return None;
    }

    tracing::debug!(%id, %name, rings = rings.len(), "region converted");
    Some(RegionShape::new(RegionId::new(id), name, rings))
}

/// Non-empty string form of a property, ignoring the -99 placeholder
fn property_string(feature: &Feature, key: &str) -> Option<String> {
    let value = feature.property(key)?;
    let text = match value {
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty() && text != MISSING_CODE).then_some(text)
}

fn collect_rings(geometry: &Geometry, rings: &mut Vec<Ring>) {
    match &geometry.value {
        Value::Polygon(polygon) => rings.extend(polygon.iter().map(|r| to_ring(r))),
        Value::MultiPolygon(polygons) => {
            rings.extend(polygons.iter().flatten().map(|r| to_ring(r)));
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_rings(g, rings);
            }
        }
        _ => {}
    }
}

fn to_ring(coords: &[Vec<f64>]) -> Ring {
    coords
        .iter()
        .filter(|c| c.len() >= 2)
        .map(|c| DVec2::new(c[0], c[1]))
        .collect()
}

/// Coarse continent outlines used when no dataset is available
pub fn builtin_regions() -> Vec<RegionShape> {
    let continents: [(&str, &str, &[(f64, f64)]); 7] = [
        (
            "NAM",
            "North America",
            &[
                (-168.0, 66.0), (-140.0, 70.0), (-95.0, 72.0), (-65.0, 60.0),
                (-55.0, 50.0), (-70.0, 42.0), (-81.0, 30.0), (-97.0, 26.0),
                (-105.0, 20.0), (-83.0, 9.0), (-78.0, 8.0), (-95.0, 15.0),
                (-110.0, 23.0), (-124.0, 40.0), (-125.0, 50.0), (-150.0, 59.0),
            ],
        ),
        (
            "SAM",
            "South America",
            &[
                (-78.0, 8.0), (-60.0, 10.0), (-50.0, 0.0), (-35.0, -7.0),
                (-40.0, -22.0), (-58.0, -38.0), (-68.0, -55.0), (-75.0, -50.0),
                (-72.0, -30.0), (-70.0, -18.0), (-81.0, -5.0),
            ],
        ),
        (
            "EUR",
            "Europe",
            &[
                (-10.0, 36.0), (5.0, 43.0), (15.0, 38.0), (28.0, 36.0),
                (40.0, 42.0), (50.0, 47.0), (60.0, 55.0), (60.0, 70.0),
                (25.0, 71.0), (5.0, 62.0), (8.0, 54.0), (-5.0, 48.0),
                (-10.0, 44.0),
            ],
        ),
        (
            "AFR",
            "Africa",
            &[
                (-17.0, 21.0), (-6.0, 35.0), (10.0, 37.0), (32.0, 31.0),
                (43.0, 12.0), (51.0, 12.0), (40.0, -15.0), (35.0, -25.0),
                (20.0, -35.0), (12.0, -18.0), (9.0, 4.0), (-8.0, 4.0),
                (-17.0, 14.0),
            ],
        ),
        (
            "ASI",
            "Asia",
            &[
                (40.0, 42.0), (35.0, 32.0), (43.0, 13.0), (58.0, 22.0),
                (67.0, 24.0), (78.0, 8.0), (88.0, 22.0), (100.0, 3.0),
                (108.0, 12.0), (122.0, 30.0), (140.0, 45.0), (160.0, 60.0),
                (180.0, 68.0), (140.0, 73.0), (100.0, 78.0), (60.0, 70.0),
                (60.0, 55.0), (50.0, 47.0),
            ],
        ),
        (
            "OCE",
            "Australia",
            &[
                (114.0, -22.0), (130.0, -12.0), (142.0, -11.0), (153.0, -26.0),
                (150.0, -37.0), (140.0, -38.0), (131.0, -31.0), (115.0, -34.0),
            ],
        ),
        (
            "GRL",
            "Greenland",
            &[
                (-73.0, 78.0), (-20.0, 83.0), (-18.0, 75.0), (-42.0, 60.0),
                (-53.0, 66.0),
            ],
        ),
    ];

    continents
        .iter()
        .map(|(id, name, outline)| {
            let ring = outline.iter().map(|&(lon, lat)| DVec2::new(lon, lat)).collect();
            RegionShape::new(RegionId::from(*id), *name, vec![ring])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "NAME": "France", "ADM0_A3": "FRA", "ISO_A3": "-99" },
                "geometry": { "type": "Polygon", "coordinates": [[[0,40],[8,40],[8,50],[0,50],[0,40]]] }
            },
            {
                "type": "Feature",
                "id": "ESP",
                "properties": { "name": "Spain" },
                "geometry": { "type": "MultiPolygon", "coordinates": [
                    [[[-9,36],[0,36],[0,43],[-9,43],[-9,36]]],
                    [[[1,39],[4,39],[4,40],[1,40],[1,39]]]
                ] }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "France", "ADM0_A3": "FRA" },
                "geometry": { "type": "Polygon", "coordinates": [[[50,-22],[56,-22],[56,-20],[50,-20],[50,-22]]] }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "Antarctica", "ADM0_A3": "ATA" },
                "geometry": { "type": "Polygon", "coordinates": [[[-180,-90],[180,-90],[180,-60],[-180,-60],[-180,-90]]] }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "Nowhere" },
                "geometry": null
            },
            {
                "type": "Feature",
                "properties": { "NAME": "Point Land" },
                "geometry": { "type": "Point", "coordinates": [1, 1] }
            }
        ]
    }"#;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_ids_names_and_merge() {
        let file = write_temp(SAMPLE);
        let regions = load_regions(file.path(), &["Antarctica".to_string()]).unwrap();

        let ids: Vec<&str> = regions.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["FRA", "ESP"]);

        let france = &regions[0];
        assert_eq!(france.name, "France");
        assert_eq!(france.rings.len(), 2);
        assert!(france.contains(DVec2::new(53.0, -21.0)));

        let spain = &regions[1];
        assert_eq!(spain.name, "Spain");
        assert!(spain.contains(DVec2::new(2.0, 39.5)));
    }

    #[test]
    fn test_exclude_is_optional() {
        let file = write_temp(SAMPLE);
        let regions = load_regions(file.path(), &[]).unwrap();
        assert!(regions.iter().any(|r| r.id.as_str() == "ATA"));
    }

    #[test]
    fn test_bare_geometry() {
        let file = write_temp(
            r#"{ "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]] }"#,
        );
        let regions = load_regions(file.path(), &[]).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].id.as_str(), "feature-0");
    }

    #[test]
    fn test_missing_file() {
        let err = load_regions(Path::new("/definitely/not/here.geojson"), &[]).unwrap_err();
        assert!(matches!(err, MapError::Io { .. }));
    }

    #[test]
    fn test_invalid_json() {
        let file = write_temp("{ not json");
        let err = load_regions(file.path(), &[]).unwrap_err();
        assert!(matches!(err, MapError::Json { .. }));
    }

    #[test]
    fn test_no_regions() {
        let file = write_temp(r#"{ "type": "FeatureCollection", "features": [] }"#);
        let err = load_regions(file.path(), &[]).unwrap_err();
        assert!(matches!(err, MapError::NoRegions { .. }));
    }

    #[test]
    fn test_requested_dataset_must_load() {
        let default = write_temp(SAMPLE);
        let err = load_or_builtin(
            Some(Path::new("/definitely/not/here.geojson")),
            default.path(),
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, MapError::Io { .. }));
    }

    #[test]
    fn test_default_dataset_used_when_present() {
        let default = write_temp(SAMPLE);
        let regions = load_or_builtin(None, default.path(), &["Antarctica".to_string()]).unwrap();
        assert_eq!(regions.len(), 2);
    }

    #[test]
    fn test_missing_default_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let regions = load_or_builtin(None, &dir.path().join("countries.geojson"), &[]).unwrap();
        assert_eq!(regions.len(), builtin_regions().len());
    }

    #[test]
    fn test_broken_default_dataset_is_an_error() {
        let default = write_temp("{ not json");
        let err = load_or_builtin(None, default.path(), &[]).unwrap_err();
        assert!(matches!(err, MapError::Json { .. }));
    }

    #[test]
    fn test_builtin_regions() {
        let regions = builtin_regions();
        assert_eq!(regions.len(), 7);
        let africa = regions.iter().find(|r| r.id.as_str() == "AFR").unwrap();
        assert!(africa.contains(DVec2::new(20.0, 5.0)));
    }
}
