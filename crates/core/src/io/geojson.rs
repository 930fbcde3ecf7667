//! GeoJSON FeatureCollection files

use std::fs;
use std::path::{Path, PathBuf};

use geo_types::{Coord, Geometry, LineString, MultiLineString, Point, Polygon};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::geometry::Point2D;
use crate::vector::{AttributeValue, FeatureCollection};

use super::{VectorSink, VectorSource};

/// `[x, y]`, optionally followed by further ordinates that are ignored.
type Position = Vec<f64>;

#[derive(Debug, Serialize, Deserialize)]
struct CollectionDoc {
    #[serde(rename = "type")]
    kind: String,
    features: Vec<FeatureDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FeatureDoc {
    #[serde(rename = "type", default)]
    kind: String,
    geometry: Option<GeometryDoc>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
enum GeometryDoc {
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

/// A GeoJSON FeatureCollection on disk.
#[derive(Debug, Clone)]
pub struct GeoJsonFile {
    path: PathBuf,
}

impl GeoJsonFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn geometries(&self) -> Result<Vec<Geometry<f64>>> {
        let text = fs::read_to_string(&self.path)?;
        let doc: CollectionDoc = serde_json::from_str(&text)?;
        if doc.kind != "FeatureCollection" {
            return Err(Error::Format(format!("expected a FeatureCollection, found {}", doc.kind)));
        }
        doc.features
            .into_iter()
            .filter_map(|f| f.geometry)
            .map(Geometry::try_from)
            .collect()
    }
}

impl VectorSource for GeoJsonFile {
    fn read_polygons(&self) -> Result<Vec<Polygon<f64>>> {
        let mut polygons = Vec::new();
        for geom in self.geometries()? {
            match geom {
                Geometry::Polygon(p) => polygons.push(p),
                Geometry::MultiPolygon(mp) => polygons.extend(mp.0),
                _ => {}
            }
        }
        tracing::debug!(count = polygons.len(), path = %self.path.display(), "read polygons");
        Ok(polygons)
    }

    fn read_points(&self) -> Result<Vec<Point2D>> {
        let mut points = Vec::new();
        for geom in self.geometries()? {
            match geom {
                Geometry::Point(p) => points.push(Point2D::from(p)),
                Geometry::MultiPoint(mp) => points.extend(mp.0.into_iter().map(Point2D::from)),
                _ => {}
            }
        }
        for (i, p) in points.iter_mut().enumerate() {
            p.index = Some(i);
        }
        Ok(points)
    }
}

impl VectorSink for GeoJsonFile {
    fn write_features(&self, features: &FeatureCollection) -> Result<()> {
        let doc = CollectionDoc {
            kind: "FeatureCollection".into(),
            features: features
                .iter()
                .map(|f| FeatureDoc {
                    kind: "Feature".into(),
                    geometry: f.geometry.as_ref().and_then(GeometryDoc::from_geometry),
                    properties: Some(
                        f.properties
                            .iter()
                            .map(|(k, v)| (k.clone(), attribute_to_json(v)))
                            .collect(),
                    ),
                })
                .collect(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&doc)?)?;
        Ok(())
    }
}

fn attribute_to_json(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::Null => Value::Null,
        AttributeValue::Bool(b) => Value::from(*b),
        AttributeValue::Int(i) => Value::from(*i),
        AttributeValue::Float(f) => Value::from(*f),
        AttributeValue::String(s) => Value::from(s.as_str()),
    }
}

impl TryFrom<GeometryDoc> for Geometry<f64> {
    type Error = Error;

    fn try_from(doc: GeometryDoc) -> Result<Self> {
        Ok(match doc {
            GeometryDoc::Point(p) => Geometry::Point(Point::from(coord(&p)?)),
            GeometryDoc::MultiPoint(ps) => Geometry::MultiPoint(
                ps.iter()
                    .map(|p| coord(p).map(Point::from))
                    .collect::<Result<Vec<_>>>()?
                    .into(),
            ),
            GeometryDoc::LineString(line) => Geometry::LineString(ring(&line)?),
            GeometryDoc::MultiLineString(lines) => Geometry::MultiLineString(MultiLineString::new(
                lines.iter().map(|l| ring(l)).collect::<Result<_>>()?,
            )),
            GeometryDoc::Polygon(rings) => Geometry::Polygon(polygon(&rings)?),
            GeometryDoc::MultiPolygon(polys) => Geometry::MultiPolygon(
                polys
                    .iter()
                    .map(|p| polygon(p))
                    .collect::<Result<Vec<_>>>()?
                    .into(),
            ),
        })
    }
}

impl GeometryDoc {
    /// `None` for geometry kinds the format has no use for here.
    fn from_geometry(geom: &Geometry<f64>) -> Option<Self> {
        Some(match geom {
            Geometry::Point(p) => GeometryDoc::Point(position(p.0)),
            Geometry::MultiPoint(mp) => GeometryDoc::MultiPoint(mp.0.iter().map(|p| position(p.0)).collect()),
            Geometry::LineString(ls) => GeometryDoc::LineString(positions(ls)),
            Geometry::MultiLineString(mls) => GeometryDoc::MultiLineString(mls.0.iter().map(positions).collect()),
            Geometry::Polygon(p) => GeometryDoc::Polygon(polygon_positions(p)),
            Geometry::MultiPolygon(mp) => GeometryDoc::MultiPolygon(mp.0.iter().map(polygon_positions).collect()),
            _ => return None,
        })
    }
}

fn coord(position: &[f64]) -> Result<Coord<f64>> {
    match position {
        [x, y, ..] => Ok(Coord { x: *x, y: *y }),
        _ => Err(Error::Format("position needs two numbers".into())),
    }
}

fn ring(positions: &[Position]) -> Result<LineString<f64>> {
    // Polygon::new closes rings; lines are kept as given
    positions
        .iter()
        .map(|p| coord(p))
        .collect::<Result<Vec<_>>>()
        .map(LineString::new)
}

fn polygon(rings: &[Vec<Position>]) -> Result<Polygon<f64>> {
    let (exterior, interiors) = rings
        .split_first()
        .ok_or_else(|| Error::Format("polygon without rings".into()))?;
    let interiors = interiors.iter().map(|r| ring(r)).collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(ring(exterior)?, interiors))
}

fn position(c: Coord<f64>) -> Position {
    vec![c.x, c.y]
}

fn positions(line: &LineString<f64>) -> Vec<Position> {
    line.coords().map(|c| position(*c)).collect()
}

fn polygon_positions(p: &Polygon<f64>) -> Vec<Vec<Position>> {
    std::iter::once(p.exterior())
        .chain(p.interiors())
        .map(positions)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Feature;

    fn square(x0: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![(x0, 0.0), (x0 + 1.0, 0.0), (x0 + 1.0, 1.0), (x0, 1.0), (x0, 0.0)]),
            vec![],
        )
    }

    #[test]
    fn test_write_then_read_polygons() {
        let dir = tempfile::tempdir().unwrap();
        let file = GeoJsonFile::new(dir.path().join("out.geojson"));

        let features: FeatureCollection = [square(0.0), square(5.0)]
            .into_iter()
            .enumerate()
            .map(|(i, p)| Feature::from_polygon(p).with_property("cluster", i))
            .collect();
        file.write_features(&features).unwrap();

        let polys = file.read_polygons().unwrap();
        assert_eq!(polys, vec![square(0.0), square(5.0)]);

        let text = std::fs::read_to_string(file.path()).unwrap();
        assert!(text.contains("\"cluster\": 1"));
    }

    #[test]
    fn test_read_points_and_multipolygon() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.geojson");
        std::fs::write(
            &path,
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[1.5,2.5]}},
                {"type":"Feature","properties":{},"geometry":{"type":"MultiPoint","coordinates":[[0,0],[3,4]]}},
                {"type":"Feature","properties":{},"geometry":{"type":"MultiPolygon","coordinates":[
                    [[[0,0],[1,0],[1,1],[0,0]]],
                    [[[5,5],[6,5],[6,6],[5,5]]]
                ]}},
                {"type":"Feature","properties":{},"geometry":null}
            ]}"#,
        )
        .unwrap();

        let file = GeoJsonFile::new(&path);
        let pts = file.read_points().unwrap();
        assert_eq!(pts.len(), 3);
        assert_eq!(pts[0], Point2D::new(1.5, 2.5));
        assert_eq!(pts[2].index, Some(2));
        assert_eq!(file.read_polygons().unwrap().len(), 2);
    }

    #[test]
    fn test_lines_and_null_properties_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.geojson");
        std::fs::write(
            &path,
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":null,"geometry":{"type":"LineString","coordinates":[[0,0],[1,1]]}},
                {"type":"Feature","geometry":{"coordinates":[[[0,0,7],[2,0,7],[2,2,7],[0,0,7]]],"type":"Polygon"}}
            ]}"#,
        )
        .unwrap();

        let polys = GeoJsonFile::new(&path).read_polygons().unwrap();
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].exterior().0[1], Coord { x: 2.0, y: 0.0 });
    }

    #[test]
    fn test_rejects_short_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.geojson");
        std::fs::write(
            &path,
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[1]}}
            ]}"#,
        )
        .unwrap();
        let err = GeoJsonFile::new(&path).read_points().unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn test_rejects_non_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.geojson");
        std::fs::write(&path, r#"{"type":"Point","coordinates":[0,0]}"#).unwrap();
        let err = GeoJsonFile::new(&path).read_polygons().unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }
}
