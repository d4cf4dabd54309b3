use std::path::Path;

use calamine::{Data, Range, Reader};
use tracing::{debug, warn};

use crate::error::{column_letters, ConvertError, Location};
use crate::extraction::{ScanOutput, ScanWarning, Scanner};
use crate::grammar::Grammar;
use crate::model::{AnchorSet, Coordinate, NumberingPair, PolygonRing};
use crate::numbering::check_cycle;
use crate::options::schema::ConvertOptions;

/// Columns left of a coordinate cell holding its "from" and "to" point numbers.
const NUMBER_FROM_OFFSET: u32 = 4;
const NUMBER_TO_OFFSET: u32 = 3;

/// Reads coordinates from the first sheet of a workbook.
pub struct SpreadsheetScanner;

impl Scanner for SpreadsheetScanner {
    fn scan(&self, path: &Path, options: &ConvertOptions) -> Result<ScanOutput, ConvertError> {
        let sheet = read_first_sheet(path)?;
        scan_sheet(&sheet, options)
    }

    fn name(&self) -> &str {
        "spreadsheet"
    }
}

/// Open a workbook and load cached cell values of its first sheet.
pub fn read_first_sheet(path: &Path) -> Result<Range<Data>, ConvertError> {
    let unreadable = |reason: String| ConvertError::SourceUnreadable {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook =
        calamine::open_workbook_auto(path).map_err(|e| unreadable(e.to_string()))?;
    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| unreadable("workbook has no sheets".into()))?
        .map_err(|e| unreadable(e.to_string()))
}

/// Harvest the polygon run (plus numbering checks) and the anchor run of a sheet.
pub fn scan_sheet(
    sheet: &Range<Data>,
    options: &ConvertOptions,
) -> Result<ScanOutput, ConvertError> {
    let grammar = options.grammar;

    let (start_row, col) = match options.start_cell.as_deref() {
        Some(addr) => parse_cell_address(addr)?,
        None => find_run_start(sheet, &grammar, &options.polygon_keyword)
            .ok_or(ConvertError::NoCoordinatesFound)?,
    };
    let start = Location::Cell {
        row: start_row,
        col,
    };
    debug!(%start, "polygon run starts");

    let mut points = Vec::new();
    let mut numbering = Vec::new();
    for (row, coord) in coordinate_run(sheet, &grammar, (start_row, col)) {
        points.push(coord);
        if options.cycle_check {
            numbering.push(read_numbering(sheet, row, col)?);
        }
    }

    if points.is_empty() {
        return Err(ConvertError::NoCoordinatesFound);
    }

    if options.cycle_check {
        check_cycle(&numbering, |i| Location::Cell {
            row: start_row + i as u32,
            col: col - NUMBER_FROM_OFFSET,
        })?;
    }

    let mut warnings = Vec::new();
    let anchors = match find_run_start(sheet, &grammar, &options.anchor_keyword) {
        Some(start) => harvest_anchors(sheet, &grammar, start, &mut warnings),
        None => AnchorSet::default(),
    };

    let ring = PolygonRing::from_points(points);
    debug!(points = ring.len(), anchors = anchors.len(), "sheet scanned");

    Ok(ScanOutput {
        ring,
        anchors,
        warnings,
    })
}

/// Find the first coordinate cell (row-major) whose row above starts with
/// `keyword` in column A.
pub fn find_run_start(
    sheet: &Range<Data>,
    grammar: &Grammar,
    keyword: &str,
) -> Option<(u32, u32)> {
    let (origin_row, origin_col) = sheet.start()?;

    sheet.used_cells().find_map(|(r, c, cell)| {
        let row = origin_row + r as u32;
        let col = origin_col + c as u32;
        let text = cell_text(cell)?;
        if row == 0 || !grammar.is_valid(text) {
            return None;
        }
        let label = sheet.get_value((row - 1, 0)).and_then(cell_text)?;
        label.starts_with(keyword).then_some((row, col))
    })
}

/// Lazily walk down a column from `start`, yielding parsed coordinates
/// until the first cell that is not a coordinate.
pub fn coordinate_run<'a>(
    sheet: &'a Range<Data>,
    grammar: &'a Grammar,
    start: (u32, u32),
) -> impl Iterator<Item = (u32, Coordinate)> + 'a {
    let (start_row, col) = start;
    let last_row = sheet.end().map(|(r, _)| r).unwrap_or(0);

    (start_row..=last_row).map_while(move |row| {
        let text = sheet.get_value((row, col)).and_then(cell_text)?;
        grammar.parse(text).ok().map(|coord| (row, coord))
    })
}

fn harvest_anchors(
    sheet: &Range<Data>,
    grammar: &Grammar,
    start: (u32, u32),
    warnings: &mut Vec<ScanWarning>,
) -> AnchorSet {
    let (start_row, col) = start;
    let points: Vec<Coordinate> = coordinate_run(sheet, grammar, start)
        .map(|(_, coord)| coord)
        .collect();

    // A run that stops on anything but a blank cell was cut short.
    let stop_row = start_row + points.len() as u32;
    let location = Location::Cell { row: stop_row, col };
    let reason = match sheet.get_value((stop_row, col)) {
        None | Some(Data::Empty) => None,
        Some(Data::String(s)) if s.trim().is_empty() => None,
        Some(Data::String(s)) => grammar
            .parse(s.trim())
            .err()
            .map(|e| e.at(location).to_string()),
        Some(other) => Some(format!("{other} at {location} is not coordinate text")),
    };
    if let Some(reason) = reason {
        warn!(%location, %reason, "anchor run truncated");
        warnings.push(ScanWarning {
            message: format!(
                "anchor list truncated after {} point(s): {}",
                points.len(),
                reason
            ),
            location: Some(location),
        });
    }

    AnchorSet::new(points)
}

fn read_numbering(
    sheet: &Range<Data>,
    row: u32,
    col: u32,
) -> Result<NumberingPair, ConvertError> {
    if col < NUMBER_FROM_OFFSET {
        return Err(ConvertError::MissingField {
            field: format!(
                "numbering columns ({} is too close to column A)",
                column_letters(col)
            ),
            location: Location::Cell { row, col },
        });
    }

    Ok(NumberingPair {
        from: read_point_number(sheet, row, col - NUMBER_FROM_OFFSET)?,
        to: read_point_number(sheet, row, col - NUMBER_TO_OFFSET)?,
    })
}

fn read_point_number(sheet: &Range<Data>, row: u32, col: u32) -> Result<i64, ConvertError> {
    let location = Location::Cell { row, col };
    let not_integer = |token: String| ConvertError::TokenParse {
        token,
        reason: "point number is not an integer".into(),
        location,
    };

    match sheet.get_value((row, col)) {
        None | Some(Data::Empty) => Err(ConvertError::MissingField {
            field: "point number".into(),
            location,
        }),
        Some(Data::Int(i)) => Ok(*i),
        Some(Data::Float(f)) if is_integral(*f) => Ok(*f as i64),
        Some(Data::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(ConvertError::MissingField {
                    field: "point number".into(),
                    location,
                });
            }
            trimmed
                .parse::<i64>()
                .map_err(|_| not_integer(trimmed.to_string()))
        }
        Some(other) => Err(not_integer(format!("{other}"))),
    }
}

/// Finite, whole and inside the `i64` range.
pub(crate) fn is_integral(f: f64) -> bool {
    f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}

/// Text of a string cell, trimmed; `None` for blanks and non-string cells.
fn cell_text(cell: &Data) -> Option<&str> {
    match cell {
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        _ => None,
    }
}

/// Parse an A1-style address ("F19", case-insensitive) into 0-based (row, col).
pub fn parse_cell_address(addr: &str) -> Result<(u32, u32), ConvertError> {
    let invalid = || ConvertError::InvalidCellAddress(addr.to_string());
    let trimmed = addr.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_alphabetic())
        .ok_or_else(invalid)?;
    let (letters, digits) = trimmed.split_at(split);
    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let mut col: u32 = 0;
    for b in letters.bytes() {
        let value = (b.to_ascii_uppercase() - b'A') as u32 + 1;
        col = col
            .checked_mul(26)
            .and_then(|c| c.checked_add(value))
            .ok_or_else(invalid)?;
    }

    let row: u32 = digits.parse().map_err(|_| invalid())?;
    if row == 0 {
        return Err(invalid());
    }

    Ok((row - 1, col - 1))
}
