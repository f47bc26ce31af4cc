use tracing::debug;

use super::entities::{SamplePoint, SimplifiedPath};
use super::error::StrokeError;
use super::geometry::point_to_line_dist;

// Default tolerance, in normalized surface units
pub const DEFAULT_TOLERANCE: f64 = 0.05;

/// Reduces a gesture to the points that carry its shape (Ramer-Douglas-Peucker).
///
/// Ranges are examined from a work stack instead of by recursion. For each
/// range the interior point farthest from the chord is kept if it lies at
/// least `eps` away, and both halves are examined in turn; otherwise the whole
/// interior is dropped. The first and last points always survive, and the
/// result keeps the input's order.
pub fn simplify(points: &[SamplePoint], eps: f64) -> Result<SimplifiedPath, StrokeError> {
    if points.len() < 2 {
        return Err(StrokeError::TooFewPoints(points.len()));
    }

    // One item for each point: true if it's kept
    let mut markers = vec![false; points.len()];
    markers[0] = true;
    markers[points.len() - 1] = true;

    let mut stack: Vec<(usize, usize)> = vec![(0, points.len() - 1)];
    while let Some((start_ix, end_ix)) = stack.pop() {
        let start = &points[start_ix];
        let end = &points[end_ix];
        // First strictly greater distance wins, so ties go to the earlier point
        let mut max_ix = None;
        let mut max_dist = -1f64;
        for ix in start_ix + 1..end_ix {
            let dist = point_to_line_dist(&points[ix], start, end);
            if dist > max_dist {
                max_dist = dist;
                max_ix = Some(ix);
            }
        }
        let max_ix = match max_ix {
            Some(ix) if max_dist >= eps => ix,
            _ => continue,
        };
        markers[max_ix] = true;
        stack.push((start_ix, max_ix));
        stack.push((max_ix, end_ix));
    }

    let kept: Vec<SamplePoint> = points
        .iter()
        .zip(markers.iter())
        .filter(|(_, keep)| **keep)
        .map(|(pt, _)| *pt)
        .collect();
    debug!(raw = points.len(), kept = kept.len(), eps, "simplified gesture");
    SimplifiedPath::new(kept)
}
