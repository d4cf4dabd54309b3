use crate::error::ConvertError;
use crate::grammar::Grammar;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_POLYGON_KEYWORD: &str = "Номер";
pub const DEFAULT_ANCHOR_KEYWORD: &str = "Привязка";

/// Settings for one conversion call. Every field has a default, so an
/// options file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Check numbering continuity (and, for spreadsheets, cyclic closure).
    pub cycle_check: bool,
    /// Explicit A1 address of the first polygon coordinate (spreadsheets).
    pub start_cell: Option<String>,
    /// Write the anchor document when anchors were found.
    pub create_anchor: bool,
    /// Column roles of delimited-text rows.
    pub column_order: ColumnOrder,
    /// Where documents are written. `None` puts them in a `geojson`
    /// directory beside each source file.
    pub output_directory: Option<PathBuf>,
    pub grammar: Grammar,
    /// Column-A label in the row above a polygon run.
    pub polygon_keyword: String,
    /// Column-A label in the row above an anchor run.
    pub anchor_keyword: String,
    pub axis_order: AxisOrder,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            cycle_check: true,
            start_cell: None,
            create_anchor: false,
            column_order: ColumnOrder::default(),
            output_directory: None,
            grammar: Grammar::default(),
            polygon_keyword: DEFAULT_POLYGON_KEYWORD.to_string(),
            anchor_keyword: DEFAULT_ANCHOR_KEYWORD.to_string(),
            axis_order: AxisOrder::default(),
        }
    }
}

/// Column roles in a delimited-text row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColumnOrder {
    #[default]
    IndexLatLon,
    LatLonIndex,
    LonLatIndex,
}

impl ColumnOrder {
    pub const ALL: [ColumnOrder; 3] = [
        ColumnOrder::IndexLatLon,
        ColumnOrder::LatLonIndex,
        ColumnOrder::LonLatIndex,
    ];

    /// Field positions of (index, latitude, longitude).
    pub fn positions(self) -> (usize, usize, usize) {
        match self {
            ColumnOrder::IndexLatLon => (0, 1, 2),
            ColumnOrder::LatLonIndex => (2, 0, 1),
            ColumnOrder::LonLatIndex => (2, 1, 0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnOrder::IndexLatLon => "index-lat-lon",
            ColumnOrder::LatLonIndex => "lat-lon-index",
            ColumnOrder::LonLatIndex => "lon-lat-index",
        }
    }
}

impl fmt::Display for ColumnOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnOrder {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        ColumnOrder::ALL
            .into_iter()
            .find(|order| order.as_str() == key)
            .ok_or_else(|| ConvertError::UnsupportedColumnOrder(s.to_string()))
    }
}

impl TryFrom<String> for ColumnOrder {
    type Error = ConvertError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColumnOrder> for String {
    fn from(order: ColumnOrder) -> String {
        order.as_str().to_string()
    }
}

/// Position layout in emitted documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AxisOrder {
    /// `[longitude, latitude]`, the interchange-format convention.
    #[default]
    LonLat,
    /// `[latitude, longitude]`, as older exports of this data were written.
    LatLon,
}
