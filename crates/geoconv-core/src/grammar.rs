//! Coordinate token grammar.
//!
//! A token is exactly two whitespace-separated parts. Each part is either a
//! bare decimal (`64.062788`) or a hemisphere letter glued to a decimal
//! (`N64.062788`). When the first part names a longitude axis the pair is
//! read as (longitude, latitude) and swapped; bare pairs are always
//! (latitude, longitude).

use crate::error::ConvertError;
use crate::model::Coordinate;
use serde::{Deserialize, Serialize};

/// Which hemisphere letters a grammar accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Hemispheres {
    /// N and E only; values are non-negative.
    NorthEast,
    /// N, S, E and W; S and W negate the value.
    #[default]
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Grammar {
    pub hemispheres: Hemispheres,
    /// Accept ',' as the decimal separator in addition to '.'.
    pub decimal_comma: bool,
}

impl Default for Grammar {
    fn default() -> Self {
        Grammar::PERMISSIVE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Lat,
    Lon,
}

#[derive(Debug, Clone, Copy)]
struct Part {
    axis: Option<Axis>,
    value: f64,
}

impl Grammar {
    /// N/E only, '.' decimals, first-quadrant ranges.
    pub const NARROW: Grammar = Grammar {
        hemispheres: Hemispheres::NorthEast,
        decimal_comma: false,
    };

    /// N/S/E/W, '.' or ',' decimals, full ranges.
    pub const PERMISSIVE: Grammar = Grammar {
        hemispheres: Hemispheres::All,
        decimal_comma: true,
    };

    pub fn is_valid(&self, s: &str) -> bool {
        self.parse(s).is_ok()
    }

    /// Parse a coordinate token into (latitude, longitude).
    pub fn parse(&self, s: &str) -> Result<Coordinate, ConvertError> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.len() != 2 {
            return Err(invalid(s, "expected two whitespace-separated values"));
        }

        let first = self.parse_part(s, parts[0])?;
        let second = self.parse_part(s, parts[1])?;

        let (lat, lon) = match (first.axis, second.axis) {
            (None, None) => (first.value, second.value),
            (Some(Axis::Lat), Some(Axis::Lon)) => (first.value, second.value),
            (Some(Axis::Lon), Some(Axis::Lat)) => (second.value, first.value),
            (Some(_), Some(_)) => {
                return Err(invalid(s, "both values name the same axis"));
            }
            _ => {
                return Err(invalid(
                    s,
                    "hemisphere letters must be given on both values or neither",
                ));
            }
        };

        let (lat_min, lon_min) = match self.hemispheres {
            Hemispheres::NorthEast => (0.0, 0.0),
            Hemispheres::All => (-90.0, -180.0),
        };
        if !(lat_min..=90.0).contains(&lat) {
            return Err(invalid(s, &format!("latitude {lat} out of range")));
        }
        if !(lon_min..=180.0).contains(&lon) {
            return Err(invalid(s, &format!("longitude {lon} out of range")));
        }

        Ok(Coordinate::new(lat, lon))
    }

    fn parse_part(&self, token: &str, part: &str) -> Result<Part, ConvertError> {
        let mut chars = part.chars();
        let (axis, sign, digits) = match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => {
                let (axis, sign) = match (c, self.hemispheres) {
                    ('N', _) => (Axis::Lat, 1.0),
                    ('E', _) => (Axis::Lon, 1.0),
                    ('S', Hemispheres::All) => (Axis::Lat, -1.0),
                    ('W', Hemispheres::All) => (Axis::Lon, -1.0),
                    _ => {
                        return Err(invalid(token, &format!("unknown hemisphere letter '{c}'")));
                    }
                };
                (Some(axis), sign, chars.as_str())
            }
            _ => (None, 1.0, part),
        };

        let value = self.parse_decimal(token, digits)?;
        Ok(Part {
            axis,
            value: sign * value,
        })
    }

    /// Digits, one separator, digits. Integers and exponents are rejected.
    fn parse_decimal(&self, token: &str, s: &str) -> Result<f64, ConvertError> {
        let is_separator = |c: char| c == '.' || (self.decimal_comma && c == ',');
        let (int_part, frac_part) = match s.find(is_separator) {
            Some(idx) => (&s[..idx], &s[idx + 1..]),
            None => return Err(invalid(token, &format!("'{s}' is not a decimal number"))),
        };
        let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(invalid(token, &format!("'{s}' is not a decimal number")));
        }

        let normalized = format!("{int_part}.{frac_part}");
        normalized
            .parse::<f64>()
            .map_err(|e| invalid(token, &format!("'{s}': {e}")))
    }
}

fn invalid(token: &str, reason: &str) -> ConvertError {
    ConvertError::InvalidToken {
        token: token.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NARROW: Grammar = Grammar::NARROW;
    const WIDE: Grammar = Grammar::PERMISSIVE;

    #[test]
    fn prefixed_pair_in_either_order() {
        let expected = Coordinate::new(64.062788, 67.503584);
        for g in [NARROW, WIDE] {
            assert_eq!(g.parse("N64.062788 E67.503584").unwrap(), expected);
            assert_eq!(g.parse("E67.503584 N64.062788").unwrap(), expected);
        }
    }

    #[test]
    fn bare_pair_is_lat_lon() {
        assert_eq!(
            NARROW.parse("64.062788 67.503584").unwrap(),
            Coordinate::new(64.062788, 67.503584)
        );
    }

    #[test]
    fn boundaries_are_inclusive() {
        assert!(NARROW.is_valid("N90.000000 E180.000000"));
        assert!(NARROW.is_valid("0.000000 0.000000"));
        assert_eq!(
            NARROW.parse("N90.000000 E180.000000").unwrap(),
            Coordinate::new(90.0, 180.0)
        );
        assert!(WIDE.is_valid("S90.0 W180.0"));
    }

    #[test]
    fn out_of_range_rejected() {
        assert!(!NARROW.is_valid("N200.000000 E100.000000"));
        assert!(!NARROW.is_valid("N10.0 E180.5"));
        assert!(!WIDE.is_valid("S90.5 E10.0"));
    }

    #[test]
    fn bad_hemisphere_letter() {
        assert!(!NARROW.is_valid("N64.062788 X67.503584"));
        assert!(!WIDE.is_valid("N64.062788 X67.503584"));
        assert!(NARROW.parse("N64.062788 X67.503584").is_err());
    }

    #[test]
    fn southern_and_western_only_in_permissive() {
        assert!(!NARROW.is_valid("S64.062788 W67.503584"));
        assert_eq!(
            WIDE.parse("S64.062788 W67.503584").unwrap(),
            Coordinate::new(-64.062788, -67.503584)
        );
        assert_eq!(
            WIDE.parse("W67.5 S64.5").unwrap(),
            Coordinate::new(-64.5, -67.5)
        );
    }

    #[test]
    fn comma_decimals_only_in_permissive() {
        assert!(!NARROW.is_valid("64,062788 67,503584"));
        assert!(WIDE.is_valid("64,062788 67,503584"));
        assert_eq!(
            WIDE.parse("N64,062788 E67,503584").unwrap(),
            Coordinate::new(64.062788, 67.503584)
        );
    }

    #[test]
    fn wrong_part_count() {
        for s in ["", "64.062788", "N64.062788", "1.0 2.0 3.0", "   "] {
            assert!(!WIDE.is_valid(s), "{s:?} should be invalid");
        }
    }

    #[test]
    fn malformed_numbers() {
        let samples = [
            "64 67",
            "N64. E67.5",
            "N.5 E67.5",
            "N6a.5 E67.5",
            "1e1.0 2.0",
            "N-5.0 E5.0",
            "N 64.0 E67.0",
        ];
        for s in samples {
            assert!(!WIDE.is_valid(s), "{s:?} should be invalid");
        }
    }

    #[test]
    fn mixed_or_duplicate_axes_rejected() {
        assert!(!WIDE.is_valid("N64.0 67.0"));
        assert!(!WIDE.is_valid("64.0 E67.0"));
        assert!(!WIDE.is_valid("N64.0 N67.0"));
        assert!(!WIDE.is_valid("E64.0 W67.0"));
    }

    #[test]
    fn validity_agrees_with_parse() {
        let samples = [
            "N64.062788 E67.503584",
            "E67.503584 N64.062788",
            "64,062788 67,503584",
            "S1.0 E2.0",
            "N91.0 E2.0",
            "garbage",
            "N1.0\tE2.0",
        ];
        for g in [NARROW, WIDE] {
            for s in samples {
                assert_eq!(g.is_valid(s), g.parse(s).is_ok(), "{s:?}");
            }
        }
    }

    #[test]
    fn errors_carry_the_token() {
        match WIDE.parse("N1.0 Q2.0") {
            Err(ConvertError::InvalidToken { token, .. }) => assert_eq!(token, "N1.0 Q2.0"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
