use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{ConvertError, Location};
use crate::extraction::spreadsheet::is_integral;
use crate::extraction::{ScanOutput, Scanner};
use crate::model::{AnchorSet, Coordinate, PolygonRing};
use crate::numbering::check_sequence;
use crate::options::schema::{ColumnOrder, ConvertOptions};

pub const DELIMITER: u8 = b';';

/// Reads one ring from ';'-delimited rows of (index, latitude, longitude)
/// in a configured column order.
pub struct DelimitedScanner;

impl Scanner for DelimitedScanner {
    fn scan(&self, path: &Path, options: &ConvertOptions) -> Result<ScanOutput, ConvertError> {
        let file = std::fs::File::open(path).map_err(|e| ConvertError::SourceUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        scan_rows(file, options).map_err(|e| match e {
            ConvertError::Io(io) => ConvertError::SourceUnreadable {
                path: path.to_path_buf(),
                reason: io.to_string(),
            },
            other => other,
        })
    }

    fn name(&self) -> &str {
        "delimited-text"
    }
}

/// One parsed row.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PointRow {
    line: usize,
    index: i64,
    coord: Coordinate,
}

/// Harvest a ring from delimited rows.
///
/// Every row must parse; the first bad row fails the whole source.
pub fn scan_rows<R: Read>(
    reader: R,
    options: &ConvertOptions,
) -> Result<ScanOutput, ConvertError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(csv_error)?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows.len() + 1);
        rows.push(parse_row(&record, line, options.column_order)?);
    }

    if rows.is_empty() {
        return Err(ConvertError::NoCoordinatesFound);
    }

    if options.cycle_check {
        let indices: Vec<i64> = rows.iter().map(|r| r.index).collect();
        check_sequence(&indices, |i| Location::Line(rows[i].line))?;
    }

    let count = rows.len();
    let ring = PolygonRing::from_points(rows.into_iter().map(|r| r.coord).collect());
    debug!(
        rows = count,
        points = ring.len(),
        order = %options.column_order,
        "delimited text scanned"
    );

    Ok(ScanOutput {
        ring,
        anchors: AnchorSet::default(),
        warnings: Vec::new(),
    })
}

fn parse_row(
    record: &csv::StringRecord,
    line: usize,
    order: ColumnOrder,
) -> Result<PointRow, ConvertError> {
    let location = Location::Line(line);
    let (index_pos, lat_pos, lon_pos) = order.positions();

    let field = |pos: usize, name: &str| -> Result<String, ConvertError> {
        record
            .get(pos)
            .map(normalize_field)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConvertError::MissingField {
                field: name.to_string(),
                location,
            })
    };

    let index_text = field(index_pos, "point index")?;
    let lat_text = field(lat_pos, "latitude")?;
    let lon_text = field(lon_pos, "longitude")?;

    Ok(PointRow {
        line,
        index: parse_index(&index_text, location)?,
        coord: Coordinate::new(
            parse_degrees(&lat_text, "latitude", location)?,
            parse_degrees(&lon_text, "longitude", location)?,
        ),
    })
}

/// Strip a byte-order mark and switch decimal commas to dots.
fn normalize_field(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().replace(',', ".")
}

/// Point indices may be written as "3" or "3.0"; fractions are rejected.
fn parse_index(s: &str, location: Location) -> Result<i64, ConvertError> {
    if let Ok(i) = s.parse::<i64>() {
        return Ok(i);
    }
    match s.parse::<f64>() {
        Ok(f) if is_integral(f) => Ok(f as i64),
        _ => Err(ConvertError::TokenParse {
            token: s.to_string(),
            reason: "point index is not an integer".into(),
            location,
        }),
    }
}

fn parse_degrees(s: &str, axis: &str, location: Location) -> Result<f64, ConvertError> {
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(f),
        _ => Err(ConvertError::TokenParse {
            token: s.to_string(),
            reason: format!("{axis} is not a number"),
            location,
        }),
    }
}

fn csv_error(e: csv::Error) -> ConvertError {
    let line = e.position().map(|p| p.line() as usize);
    match e.into_kind() {
        csv::ErrorKind::Io(io) => ConvertError::Io(io),
        csv::ErrorKind::Utf8 { err, .. } => ConvertError::TokenParse {
            token: String::new(),
            reason: format!("invalid UTF-8: {err}"),
            location: Location::Line(line.unwrap_or(0)),
        },
        other => ConvertError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{other:?}"),
        )),
    }
}
