use std::fmt;

use serde_derive::{Deserialize, Serialize};

use super::analyzed_stroke::StrokeFeatures;
use super::config::ClassifierConfig;
use super::direction::{format_directions, DirectionCode};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum StrokeShape {
    HorizontalLine,
    VerticalLine,
    Curve,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Classification {
    pub shape: StrokeShape,
    pub directions: Vec<DirectionCode>,
}

/// Labels a stroke as a horizontal line, a vertical line, or a curve.
///
/// Only nearly straight strokes with fewer than `max_direction_changes` turns
/// can be lines, and then only if their bounding box is clearly wider than tall
/// (or taller than wide). A straight diagonal stroke has a roughly square box
/// and therefore ends up as a curve.
pub fn classify(features: &StrokeFeatures, config: &ClassifierConfig) -> Classification {
    let bbox = &features.bbox;
    let mut shape = StrokeShape::Curve;
    if features.straightness > config.straightness_threshold && features.direction_changes < config.max_direction_changes {
        if bbox.width > bbox.height * config.aspect_ratio {
            shape = StrokeShape::HorizontalLine;
        } else if bbox.height > bbox.width * config.aspect_ratio {
            shape = StrokeShape::VerticalLine;
        }
    }
    Classification {
        shape,
        directions: features.directions.clone(),
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self.shape {
            StrokeShape::HorizontalLine => "line|horizontal",
            StrokeShape::VerticalLine => "line|vertical",
            StrokeShape::Curve => "curve",
        };
        write!(f, "{}|directions:{}", label, format_directions(&self.directions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::analyzed_stroke::DEFAULT_DIRECTION_CHANGE_THRESHOLD;
    use super::super::entities::{SamplePoint, SimplifiedPath};

    fn classify_json(json: &str) -> Classification {
        let raw: Vec<Vec<f64>> = serde_json::from_str(json).unwrap();
        let points = raw.iter().map(|xy| SamplePoint::new(xy[0], xy[1], 0)).collect();
        let path = SimplifiedPath::new(points).unwrap();
        let features = StrokeFeatures::extract(&path, DEFAULT_DIRECTION_CHANGE_THRESHOLD);
        classify(&features, &ClassifierConfig::default())
    }

    #[test]
    fn test_horizontal() {
        let c = classify_json("[[0.2,0.5],[0.8,0.52]]");
        assert_eq!(c.shape, StrokeShape::HorizontalLine);
        assert_eq!(c.to_string(), "line|horizontal|directions:r");
    }

    #[test]
    fn test_vertical() {
        let c = classify_json("[[0.5,0.9],[0.48,0.1]]");
        assert_eq!(c.shape, StrokeShape::VerticalLine);
        assert_eq!(c.to_string(), "line|vertical|directions:u");
    }

    #[test]
    fn test_corner_is_curve() {
        let c = classify_json("[[0.1,0.1],[0.5,0.1],[0.5,0.5]]");
        assert_eq!(c.shape, StrokeShape::Curve);
        assert_eq!(c.to_string(), "curve|directions:r,d");
    }

    #[test]
    fn test_straight_diagonal_falls_through_to_curve() {
        // Perfectly straight, no turns, but the box is square: literally a curve
        let c = classify_json("[[0.2,0.2],[0.8,0.8]]");
        assert_eq!(c.shape, StrokeShape::Curve);
        assert_eq!(c.directions, vec![DirectionCode::Dr]);
    }

    #[test]
    fn test_zigzag_is_curve() {
        // Wide and flat, but it turns back and forth
        let c = classify_json("[[0.1,0.5],[0.3,0.45],[0.5,0.5],[0.7,0.45],[0.9,0.5]]");
        assert_eq!(c.shape, StrokeShape::Curve);
        assert_eq!(c.directions.len(), 4);
    }

    #[test]
    fn test_config_thresholds() {
        let raw = "[[0.2,0.2],[0.7,0.5]]";
        assert_eq!(classify_json(raw).shape, StrokeShape::Curve);
        let raw: Vec<Vec<f64>> = serde_json::from_str(raw).unwrap();
        let points = raw.iter().map(|xy| SamplePoint::new(xy[0], xy[1], 0)).collect();
        let features = StrokeFeatures::extract(&SimplifiedPath::new(points).unwrap(), DEFAULT_DIRECTION_CHANGE_THRESHOLD);
        let loose = ClassifierConfig { aspect_ratio: 1.5, ..ClassifierConfig::default() };
        assert_eq!(classify(&features, &loose).shape, StrokeShape::HorizontalLine);
    }

    #[test]
    fn test_shape_serializes_kebab_case() {
        assert_eq!(serde_json::to_string(&StrokeShape::HorizontalLine).unwrap(), "\"horizontal-line\"");
    }
}
