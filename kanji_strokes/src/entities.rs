use kurbo::Point;
use serde_derive::{Deserialize, Serialize};

use super::direction::DirectionCode;
use super::error::StrokeError;

// One sampled position of a gesture.
// x and y are normalized into 0..1 by the capture surface's size; t is in milliseconds.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    pub t: i64,
}

impl SamplePoint {
    pub fn new(x: f64, y: f64, t: i64) -> SamplePoint {
        SamplePoint { x, y, t }
    }

    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

// A position as reported by the input device, before normalization
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct RawPoint {
    pub x: f64,
    pub y: f64,
    pub t: i64,
}

impl RawPoint {
    pub fn new(x: f64, y: f64, t: i64) -> RawPoint {
        RawPoint { x, y, t }
    }
}

// The capture surface's bounding rectangle, in device coordinates
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> SurfaceRect {
        SurfaceRect { left, top, width, height }
    }

    /// Maps a device position into the surface's own 0..1 coordinate space.
    ///
    /// Returns `None` if the surface has no area to normalize against.
    pub fn normalize(&self, raw: RawPoint) -> Option<SamplePoint> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return None;
        }
        Some(SamplePoint {
            x: (raw.x - self.left) / self.width,
            y: (raw.y - self.top) / self.height,
            t: raw.t,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn from_points(points: &[SamplePoint]) -> BoundingBox {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for pt in points {
            min_x = min_x.min(pt.x);
            max_x = max_x.max(pt.x);
            min_y = min_y.min(pt.y);
            max_y = max_y.max(pt.y);
        }
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }
}

/// A simplified gesture: an order-preserving subsequence of the raw samples
/// that always keeps the first and last point.
///
/// Holds at least two points, which every later pipeline stage relies on.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct SimplifiedPath(Vec<SamplePoint>);

impl SimplifiedPath {
    pub fn new(points: Vec<SamplePoint>) -> Result<SimplifiedPath, StrokeError> {
        if points.len() < 2 {
            return Err(StrokeError::TooFewPoints(points.len()));
        }
        Ok(SimplifiedPath(points))
    }

    pub fn points(&self) -> &[SamplePoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn first(&self) -> SamplePoint {
        self.0[0]
    }

    pub fn last(&self) -> SamplePoint {
        self.0[self.0.len() - 1]
    }
}

// Everything known about one finished stroke; this is what capture hands to its listener.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StrokeInfo {
    pub points: SimplifiedPath,
    pub bbox: BoundingBox,
    pub direction_changes: usize,
    pub straightness: f64,
    pub total_length: f64,
    pub direct_distance: f64,
    pub angles: Vec<f64>,
    pub directions: Vec<DirectionCode>,
}
