use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde_derive::{Deserialize, Serialize};

use super::error::StrokeError;

/// One of eight compass directions a stroke segment can travel in.
///
/// Screen convention: x grows to the right and y grows downward, so `D` is
/// a movement toward larger y.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DirectionCode {
    U,
    D,
    L,
    R,
    Ul,
    Ur,
    Dl,
    Dr,
}

use DirectionCode::*;

// 16 bins of 22.5 degrees each, starting at angle 0.
// Every code owns two neighboring bins; R's pair wraps across 0.
const BINS: [DirectionCode; 16] = [R, Dr, Dr, D, D, Dl, Dl, L, L, Ul, Ul, U, U, Ur, Ur, R];

impl DirectionCode {
    pub const ALL: [DirectionCode; 8] = [U, D, L, R, Ul, Ur, Dl, Dr];

    /// Quantizes a segment angle (radians, as returned by `atan2(dy, dx)`)
    /// to the nearest of the eight compass directions.
    pub fn from_angle(angle: f64) -> DirectionCode {
        let angle = if angle < 0.0 { angle + PI * 2.0 } else { angle };
        let step = PI * 2.0 / BINS.len() as f64;
        // A tiny negative angle plus 2*PI can round up to exactly 2*PI
        let ix = (angle / step).floor() as usize % BINS.len();
        BINS[ix]
    }

    pub fn symbol(self) -> &'static str {
        match self {
            U => "u",
            D => "d",
            L => "l",
            R => "r",
            Ul => "ul",
            Ur => "ur",
            Dl => "dl",
            Dr => "dr",
        }
    }
}

impl fmt::Display for DirectionCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for DirectionCode {
    type Err = StrokeError;

    fn from_str(s: &str) -> Result<DirectionCode, StrokeError> {
        DirectionCode::ALL
            .iter()
            .copied()
            .find(|code| code.symbol() == s)
            .ok_or_else(|| StrokeError::UnknownDirection(s.to_string()))
    }
}

// Parses a comma-separated list like "r,d,dl". Whitespace around codes is ignored;
// an empty string is an empty list.
pub fn parse_directions(csv: &str) -> Result<Vec<DirectionCode>, StrokeError> {
    let csv = csv.trim();
    if csv.is_empty() {
        return Ok(Vec::new());
    }
    csv.split(',').map(|code| code.trim().parse()).collect()
}

pub fn format_directions(directions: &[DirectionCode]) -> String {
    let symbols: Vec<&str> = directions.iter().map(|d| d.symbol()).collect();
    symbols.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deg(d: f64) -> f64 {
        d.to_radians()
    }

    #[test]
    fn test_compass_points() {
        assert_eq!(DirectionCode::from_angle(0.0), R);
        assert_eq!(DirectionCode::from_angle(deg(45.0)), Dr);
        assert_eq!(DirectionCode::from_angle(deg(90.0)), D);
        assert_eq!(DirectionCode::from_angle(deg(135.0)), Dl);
        assert_eq!(DirectionCode::from_angle(PI), L);
        assert_eq!(DirectionCode::from_angle(deg(-135.0)), Ul);
        assert_eq!(DirectionCode::from_angle(deg(-90.0)), U);
        assert_eq!(DirectionCode::from_angle(deg(-45.0)), Ur);
    }

    #[test]
    fn test_bin_edges() {
        // R covers -22.5 .. 22.5 degrees
        assert_eq!(DirectionCode::from_angle(deg(22.4)), R);
        assert_eq!(DirectionCode::from_angle(deg(22.6)), Dr);
        assert_eq!(DirectionCode::from_angle(deg(-22.4)), R);
        assert_eq!(DirectionCode::from_angle(deg(-22.6)), Ur);
        assert_eq!(DirectionCode::from_angle(deg(67.4)), Dr);
        assert_eq!(DirectionCode::from_angle(deg(67.6)), D);
        assert_eq!(DirectionCode::from_angle(deg(179.9)), L);
        assert_eq!(DirectionCode::from_angle(deg(-179.9)), L);
    }

    #[test]
    fn test_wraparound() {
        assert_eq!(DirectionCode::from_angle(0.0), R);
        assert_eq!(DirectionCode::from_angle(-0.0), R);
        assert_eq!(DirectionCode::from_angle(-1e-18), R);
        assert_eq!(DirectionCode::from_angle(PI * 2.0 - 1e-9), R);
    }

    #[test]
    fn test_every_angle_maps_once() {
        // Sweep the full circle; each code must own exactly 45 degrees
        let mut counts = std::collections::HashMap::new();
        for i in 0..3600 {
            let angle = (i as f64 + 0.5) / 3600.0 * PI * 2.0;
            *counts.entry(DirectionCode::from_angle(angle)).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), 8);
        for code in DirectionCode::ALL.iter() {
            assert_eq!(counts[code], 450, "{} should own 45 degrees", code);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse_directions("r, d,dl").unwrap(), vec![R, D, Dl]);
        assert!(parse_directions("").unwrap().is_empty());
        assert!(matches!(parse_directions("r,x"), Err(StrokeError::UnknownDirection(ref s)) if s == "x"));
        assert_eq!(format_directions(&[Ur, L]), "ur,l");
        let json = serde_json::to_string(&vec![Ul, R]).unwrap();
        assert_eq!(json, "[\"ul\",\"r\"]");
    }
}
