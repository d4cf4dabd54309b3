use serde::{Deserialize, Serialize};
use std::fmt;

/// Absolute tolerance, per axis, for treating two points as the same vertex.
/// Points a full tolerance apart are distinct.
pub const CLOSURE_TOLERANCE: f64 = 1e-6;

/// Absorbs f64 rounding in differences of six-decimal values.
const ROUNDING_MARGIN: f64 = 1e-9;

/// A parsed (latitude, longitude) pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Coordinate { lat, lon }
    }

    /// True if both axes differ by less than `CLOSURE_TOLERANCE`.
    pub fn approx_eq(&self, other: &Coordinate) -> bool {
        let limit = CLOSURE_TOLERANCE - ROUNDING_MARGIN;
        (self.lat - other.lat).abs() < limit && (self.lon - other.lon).abs() < limit
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// Polygon boundary in scan order. Always held open: the first point is
/// never repeated at the end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolygonRing(Vec<Coordinate>);

impl PolygonRing {
    /// Build a ring, dropping a trailing point that repeats the first one.
    pub fn from_points(mut points: Vec<Coordinate>) -> Self {
        if points.len() > 1 {
            let first = points[0];
            if points.last().is_some_and(|last| last.approx_eq(&first)) {
                points.pop();
            }
        }
        PolygonRing(points)
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The ring with its first point appended again, as interchange formats expect.
    pub fn closed(&self) -> Vec<Coordinate> {
        let mut out = self.0.clone();
        if let Some(first) = self.0.first() {
            out.push(*first);
        }
        out
    }
}

/// Reference points that travel with a polygon but are not part of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorSet(Vec<Coordinate>);

impl AnchorSet {
    pub fn new(points: Vec<Coordinate>) -> Self {
        AnchorSet(points)
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// "From point N to point M" labels read beside a spreadsheet coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberingPair {
    pub from: i64,
    pub to: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_drops_closing_duplicate() {
        let ring = PolygonRing::from_points(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(0.0000004, -0.0000009),
        ]);
        assert_eq!(ring.len(), 3);
    }

    #[test]
    fn from_points_keeps_distinct_last_point() {
        let ring = PolygonRing::from_points(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(0.00001, 0.0),
        ]);
        assert_eq!(ring.len(), 3);
    }

    #[test]
    fn one_tolerance_apart_is_distinct() {
        let first = Coordinate::new(64.000001, 67.000001);
        assert!(!first.approx_eq(&Coordinate::new(64.000002, 67.000001)));
        assert!(!first.approx_eq(&Coordinate::new(64.0000021, 67.000001)));
        assert!(!Coordinate::new(0.0, 0.0).approx_eq(&Coordinate::new(0.000001, 0.0)));
        assert!(first.approx_eq(&Coordinate::new(64.0000019, 67.0000005)));
    }

    #[test]
    fn single_point_is_left_alone() {
        let ring = PolygonRing::from_points(vec![Coordinate::new(5.0, 5.0)]);
        assert_eq!(ring.len(), 1);
    }

    #[test]
    fn closed_repeats_first_point() {
        let ring = PolygonRing::from_points(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(1.0, 1.0),
        ]);
        let closed = ring.closed();
        assert_eq!(closed.len(), 4);
        assert_eq!(closed[3], closed[0]);
    }
}
