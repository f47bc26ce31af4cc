use super::direction::DirectionCode;

/// Checks whether a traced stroke is consistent with a reference stroke.
///
/// The reference must appear in `directions` in order, but not necessarily
/// contiguously: captured directions that don't line up with the next expected
/// one are skipped as noise. Reference directions can't be skipped or reordered.
pub fn match_stroke(directions: &[DirectionCode], reference: &[DirectionCode]) -> bool {
    let mut ri = 0;
    let mut di = 0;
    while ri < reference.len() && di < directions.len() {
        if directions[di] == reference[ri] {
            ri += 1;
        }
        di += 1;
    }
    ri == reference.len()
}
