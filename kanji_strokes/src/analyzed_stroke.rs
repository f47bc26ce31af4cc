use std::f64::consts::PI;

use super::direction::DirectionCode;
use super::entities::*;
use super::geometry::{dir, dist};

// Default minimum turn between consecutive segments that counts as a change of direction
pub const DEFAULT_DIRECTION_CHANGE_THRESHOLD: f64 = PI / 12.0;

/// Shape measurements of one simplified stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeFeatures {
    pub bbox: BoundingBox,
    // Sum of all segment lengths
    pub total_length: f64,
    // Straight-line distance from first to last point
    pub direct_distance: f64,
    // direct_distance / total_length; 0 for a path that doesn't go anywhere
    pub straightness: f64,
    // Number of turns sharper than the threshold
    pub direction_changes: usize,
    // One angle per segment, in -PI..=PI
    pub angles: Vec<f64>,
    // One compass direction per segment
    pub directions: Vec<DirectionCode>,
}

impl StrokeFeatures {
    pub fn extract(path: &SimplifiedPath, direction_change_threshold: f64) -> StrokeFeatures {
        let points = path.points();
        let bbox = BoundingBox::from_points(points);

        let mut total_length = 0f64;
        let mut direction_changes = 0;
        let mut prev_angle: Option<f64> = None;
        let mut angles: Vec<f64> = Vec::with_capacity(points.len() - 1);
        let mut directions: Vec<DirectionCode> = Vec::with_capacity(points.len() - 1);
        for pair in points.windows(2) {
            total_length += dist(&pair[0], &pair[1]);
            let angle = dir(&pair[0], &pair[1]);
            angles.push(angle);
            directions.push(DirectionCode::from_angle(angle));
            // Raw difference, not wrapped around the circle
            if let Some(prev) = prev_angle {
                if (angle - prev).abs() > direction_change_threshold {
                    direction_changes += 1;
                }
            }
            prev_angle = Some(angle);
        }

        let direct_distance = dist(&path.first(), &path.last());
        let straightness = if total_length > 0.0 { direct_distance / total_length } else { 0.0 };

        StrokeFeatures {
            bbox,
            total_length,
            direct_distance,
            straightness,
            direction_changes,
            angles,
            directions,
        }
    }

    // Bundles the features with the path they were measured on
    pub fn into_info(self, path: SimplifiedPath) -> StrokeInfo {
        StrokeInfo {
            points: path,
            bbox: self.bbox,
            direction_changes: self.direction_changes,
            straightness: self.straightness,
            total_length: self.total_length,
            direct_distance: self.direct_distance,
            angles: self.angles,
            directions: self.directions,
        }
    }
}

impl<'a> From<&'a StrokeInfo> for StrokeFeatures {
    fn from(info: &'a StrokeInfo) -> StrokeFeatures {
        StrokeFeatures {
            bbox: info.bbox,
            total_length: info.total_length,
            direct_distance: info.direct_distance,
            straightness: info.straightness,
            direction_changes: info.direction_changes,
            angles: info.angles.clone(),
            directions: info.directions.clone(),
        }
    }
}
