pub mod schema;

use crate::error::ConvertError;
use crate::extraction::spreadsheet::parse_cell_address;
use schema::ConvertOptions;
use std::path::Path;

/// Load conversion options from a JSON file.
pub fn load_options(path: &Path) -> Result<ConvertOptions, ConvertError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConvertError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_options(&content, path)
}

/// Parse options from a JSON string.
pub fn parse_options(json: &str, source: &Path) -> Result<ConvertOptions, ConvertError> {
    let options: ConvertOptions =
        serde_json::from_str(json).map_err(|e| ConvertError::ConfigLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_options(&options)?;
    Ok(options)
}

/// Parse options from a JSON string (no file path context).
pub fn parse_options_str(json: &str) -> Result<ConvertOptions, ConvertError> {
    let options: ConvertOptions = serde_json::from_str(json).map_err(ConvertError::Json)?;
    validate_options(&options)?;
    Ok(options)
}

/// Check that options are usable before any file is touched.
pub fn validate_options(options: &ConvertOptions) -> Result<(), ConvertError> {
    if let Some(ref cell) = options.start_cell {
        parse_cell_address(cell)?;
    }

    if options.polygon_keyword.trim().is_empty() {
        return Err(ConvertError::ConfigInvalid(
            "polygon_keyword must not be empty".into(),
        ));
    }

    if options.anchor_keyword.trim().is_empty() {
        return Err(ConvertError::ConfigInvalid(
            "anchor_keyword must not be empty".into(),
        ));
    }

    if options.polygon_keyword == options.anchor_keyword {
        return Err(ConvertError::ConfigInvalid(format!(
            "polygon_keyword and anchor_keyword are both '{}'",
            options.polygon_keyword
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Grammar, Hemispheres};
    use schema::{AxisOrder, ColumnOrder};

    #[test]
    fn empty_object_gives_defaults() {
        let opts = parse_options_str("{}").unwrap();
        assert_eq!(opts, ConvertOptions::default());
        assert!(opts.cycle_check);
        assert!(!opts.create_anchor);
        assert_eq!(opts.grammar, Grammar::PERMISSIVE);
        assert_eq!(opts.axis_order, AxisOrder::LonLat);
    }

    #[test]
    fn parse_full_options() {
        let json = r#"{
            "cycle_check": false,
            "start_cell": "F19",
            "create_anchor": true,
            "column_order": "lon-lat-index",
            "output_directory": "out",
            "grammar": { "hemispheres": "north-east", "decimal_comma": false },
            "polygon_keyword": "Number",
            "anchor_keyword": "Anchor",
            "axis_order": "lat-lon"
        }"#;
        let opts = parse_options_str(json).unwrap();
        assert!(!opts.cycle_check);
        assert_eq!(opts.start_cell.as_deref(), Some("F19"));
        assert_eq!(opts.column_order, ColumnOrder::LonLatIndex);
        assert_eq!(opts.grammar.hemispheres, Hemispheres::NorthEast);
        assert_eq!(opts.grammar, Grammar::NARROW);
        assert_eq!(opts.axis_order, AxisOrder::LatLon);
    }

    #[test]
    fn unknown_column_order_rejected() {
        let err = parse_options_str(r#"{ "column_order": "lon-index-lat" }"#).unwrap_err();
        assert!(err.to_string().contains("lon-index-lat"));
    }

    #[test]
    fn column_order_accepts_loose_spelling() {
        assert_eq!(
            "Index, Lat, Lon".parse::<ColumnOrder>().unwrap(),
            ColumnOrder::IndexLatLon
        );
        assert_eq!(
            "lat_lon_index".parse::<ColumnOrder>().unwrap(),
            ColumnOrder::LatLonIndex
        );
        assert!(matches!(
            "index-lon-lat".parse::<ColumnOrder>(),
            Err(ConvertError::UnsupportedColumnOrder(_))
        ));
    }

    #[test]
    fn column_order_positions() {
        assert_eq!(ColumnOrder::IndexLatLon.positions(), (0, 1, 2));
        assert_eq!(ColumnOrder::LatLonIndex.positions(), (2, 0, 1));
        assert_eq!(ColumnOrder::LonLatIndex.positions(), (2, 1, 0));
    }

    #[test]
    fn bad_start_cell_rejected() {
        let err = parse_options_str(r#"{ "start_cell": "19F" }"#).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidCellAddress(_)));
    }

    #[test]
    fn identical_keywords_rejected() {
        let json = r#"{ "polygon_keyword": "X", "anchor_keyword": "X" }"#;
        assert!(matches!(
            parse_options_str(json),
            Err(ConvertError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn load_options_reports_path() {
        let err = load_options(Path::new("/nonexistent/geoconv.json")).unwrap_err();
        match err {
            ConvertError::ConfigLoad { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/geoconv.json"))
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
