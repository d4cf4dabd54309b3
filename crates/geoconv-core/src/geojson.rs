//! GeoJSON documents for a polygon ring and its anchor points.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::error::ConvertError;
use crate::model::{AnchorSet, Coordinate, PolygonRing};
use crate::options::schema::AxisOrder;

pub const CRS_NAME: &str = "urn:ogc:def:crs:OGC:1.3:CRS84";
pub const EXTENSION: &str = "geojson";

/// Suffix appended to the source stem for the anchor document.
pub const ANCHOR_SUFFIX: &str = "_";

#[derive(Debug, Clone, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub features: Vec<Feature>,
    pub crs: Crs,
}

#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub properties: FeatureProperties,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureProperties {
    pub name: &'static str,
    pub buffer: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Polygon(Vec<Vec<[f64; 2]>>),
    MultiPoint(Vec<[f64; 2]>),
}

#[derive(Debug, Clone, Serialize)]
pub struct Crs {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub properties: CrsProperties,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrsProperties {
    pub name: &'static str,
}

/// Paths of the documents written for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFiles {
    pub polygon: PathBuf,
    pub anchor: Option<PathBuf>,
}

fn position(c: &Coordinate, axis: AxisOrder) -> [f64; 2] {
    match axis {
        AxisOrder::LonLat => [c.lon, c.lat],
        AxisOrder::LatLon => [c.lat, c.lon],
    }
}

fn collection(name: String, geometry: Geometry) -> FeatureCollection {
    FeatureCollection {
        kind: "FeatureCollection",
        name,
        features: vec![Feature {
            kind: "Feature",
            properties: FeatureProperties {
                name: "0",
                buffer: 0,
            },
            geometry,
        }],
        crs: Crs {
            kind: "name",
            properties: CrsProperties { name: CRS_NAME },
        },
    }
}

/// A single-polygon collection; the ring is closed by repeating its first point.
pub fn polygon_document(name: &str, ring: &PolygonRing, axis: AxisOrder) -> FeatureCollection {
    let positions = ring.closed().iter().map(|c| position(c, axis)).collect();
    collection(name.to_string(), Geometry::Polygon(vec![positions]))
}

/// A single multi-point collection over the anchors.
pub fn anchor_document(name: &str, anchors: &AnchorSet, axis: AxisOrder) -> FeatureCollection {
    let positions = anchors.points().iter().map(|c| position(c, axis)).collect();
    collection(name.to_string(), Geometry::MultiPoint(positions))
}

/// Serialize with a four-space indent and a trailing newline.
pub fn to_pretty_json(doc: &FeatureCollection) -> Result<Vec<u8>, ConvertError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Output paths for `source`: `<stem>.geojson` and `<stem>_.geojson`.
pub fn output_paths(source: &Path, output_dir: &Path) -> (PathBuf, PathBuf) {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".into());
    (
        output_dir.join(format!("{stem}.{EXTENSION}")),
        output_dir.join(format!("{stem}{ANCHOR_SUFFIX}.{EXTENSION}")),
    )
}

/// Write the polygon document, and the anchor document when requested and
/// there is at least one anchor.
pub fn write_documents(
    source: &Path,
    ring: &PolygonRing,
    anchors: &AnchorSet,
    output_dir: &Path,
    create_anchor: bool,
    axis: AxisOrder,
) -> Result<EmittedFiles, ConvertError> {
    if ring.is_empty() {
        return Err(ConvertError::NoCoordinatesFound);
    }

    std::fs::create_dir_all(output_dir)?;
    let (polygon_path, anchor_path) = output_paths(source, output_dir);

    let source_name = source
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let polygon = polygon_document(&source_name, ring, axis);
    let polygon_tmp = stage(output_dir, &to_pretty_json(&polygon)?)?;

    // Both documents are staged before either is moved into place.
    let anchor_tmp = if create_anchor && !anchors.is_empty() {
        let anchor_name = anchor_path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let doc = anchor_document(&anchor_name, anchors, axis);
        Some(stage(output_dir, &to_pretty_json(&doc)?)?)
    } else {
        None
    };

    polygon_tmp
        .persist(&polygon_path)
        .map_err(|e| ConvertError::Io(e.error))?;
    info!(path = %polygon_path.display(), points = ring.len(), "polygon written");

    let anchor = match anchor_tmp {
        Some(tmp) => {
            if let Err(e) = tmp.persist(&anchor_path) {
                if let Err(rm) = std::fs::remove_file(&polygon_path) {
                    warn!(
                        path = %polygon_path.display(),
                        error = %rm,
                        "cannot remove polygon document"
                    );
                }
                return Err(ConvertError::Io(e.error));
            }
            info!(path = %anchor_path.display(), points = anchors.len(), "anchors written");
            Some(anchor_path)
        }
        None => None,
    };

    Ok(EmittedFiles {
        polygon: polygon_path,
        anchor,
    })
}

/// Write `bytes` to a synced temp file in `dir`, ready to be persisted.
fn stage(dir: &Path, bytes: &[u8]) -> Result<NamedTempFile, ConvertError> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}
