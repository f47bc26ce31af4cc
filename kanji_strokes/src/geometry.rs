use kurbo::Vec2;

use super::entities::SamplePoint;

// Vector from a to b
pub fn segment(a: &SamplePoint, b: &SamplePoint) -> Vec2 {
    b.pos() - a.pos()
}

// Gets distance between two points
pub fn dist(a: &SamplePoint, b: &SamplePoint) -> f64 {
    segment(a, b).length()
}

// Direction from a to b, in radians, as atan2(dy, dx).
// 0 is to the right; since y grows downward, PI / 2 is down.
pub fn dir(a: &SamplePoint, b: &SamplePoint) -> f64 {
    segment(a, b).atan2()
}

/// Perpendicular distance of `p` from the line through `start` and `end`.
///
/// The angle between the chord and the offset of `p` comes from their dot
/// product; the distance is the offset's length times the sine of that angle.
/// A zero-length chord degrades to the plain distance from `start`.
pub fn point_to_line_dist(p: &SamplePoint, start: &SamplePoint, end: &SamplePoint) -> f64 {
    let chord = segment(start, end);
    let offset = segment(start, p);
    let chord_len = chord.length();
    let offset_len = offset.length();
    if offset_len == 0.0 {
        return 0.0;
    }
    if chord_len == 0.0 {
        return offset_len;
    }
    // Rounding can push the cosine a hair outside -1..1
    let cos_alpha = (chord.dot(offset) / (chord_len * offset_len)).clamp(-1.0, 1.0);
    let alpha = cos_alpha.acos();
    offset_len * alpha.sin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn pt(x: f64, y: f64) -> SamplePoint {
        SamplePoint::new(x, y, 0)
    }

    #[test]
    fn test_dist_and_dir() {
        assert!((dist(&pt(0.0, 0.0), &pt(0.3, 0.4)) - 0.5).abs() < 1e-12);
        assert_eq!(dir(&pt(0.0, 0.0), &pt(1.0, 0.0)), 0.0);
        assert!((dir(&pt(0.0, 0.0), &pt(0.0, 1.0)) - PI / 2.0).abs() < 1e-12);
        assert!((dir(&pt(0.0, 0.0), &pt(-1.0, 0.0)) - PI).abs() < 1e-12);
    }

    #[test]
    fn test_point_to_line() {
        let start = pt(0.0, 0.0);
        let end = pt(1.0, 0.0);
        assert!((point_to_line_dist(&pt(0.5, 0.2), &start, &end) - 0.2).abs() < 1e-12);
        // Beyond the segment's end the distance is still measured to the infinite line
        assert!((point_to_line_dist(&pt(2.0, -0.3), &start, &end) - 0.3).abs() < 1e-12);
        assert!(point_to_line_dist(&pt(0.7, 0.0), &start, &end).abs() < 1e-12);
        assert_eq!(point_to_line_dist(&start, &start, &end), 0.0);
    }

    #[test]
    fn test_point_to_degenerate_line() {
        let start = pt(0.5, 0.5);
        let d = point_to_line_dist(&pt(0.8, 0.9), &start, &start);
        assert!((d - 0.5).abs() < 1e-12);
    }
}
