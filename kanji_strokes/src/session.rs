use serde_derive::{Deserialize, Serialize};
use tracing::{debug, info};

use super::direction::DirectionCode;
use super::matcher::match_stroke;
use super::reference::{KanjiEntry, ReferenceLibrary};

/// Where a learner is in their practice: which grade, which kanji, and which
/// stroke of that kanji is expected next.
///
/// The context is a plain value; every operation returns the updated context
/// instead of changing shared state.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub grade: usize,
    pub kanji: usize,
    pub stroke: usize,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "verdict", rename_all = "kebab-case")]
pub enum StrokeVerdict {
    // The stroke matched; `next` is the index of the stroke expected now
    Matched { next: usize },
    // The last stroke matched: the whole kanji was written correctly
    Completed,
    // Progress was reset to the first stroke
    Mismatch,
    // A tap too short to be a stroke; progress is unchanged
    Discarded,
}

impl SessionContext {
    pub fn new(grade: usize, kanji: usize) -> SessionContext {
        SessionContext { grade, kanji, stroke: 0 }
    }

    /// Checks a traced stroke against the stroke this context expects of `entry`.
    pub fn evaluate(self, entry: &KanjiEntry, directions: &[DirectionCode]) -> (SessionContext, StrokeVerdict) {
        let reference = match entry.directions.get(self.stroke) {
            Some(reference) => reference,
            None => {
                debug!(kanji = %entry.kanji, stroke = self.stroke, "no reference for expected stroke");
                return (self.reset(), StrokeVerdict::Mismatch);
            }
        };
        let matched = match_stroke(directions, reference);
        debug!(kanji = %entry.kanji, stroke = self.stroke, ?directions, ?reference, matched, "stroke evaluated");
        if !matched {
            return (self.reset(), StrokeVerdict::Mismatch);
        }
        let next = self.stroke + 1;
        if next >= entry.directions.len() {
            info!(kanji = %entry.kanji, "kanji completed");
            return (self.reset(), StrokeVerdict::Completed);
        }
        (SessionContext { stroke: next, ..self }, StrokeVerdict::Matched { next })
    }

    pub fn reset(self) -> SessionContext {
        SessionContext { stroke: 0, ..self }
    }

    // Moves by `offset` kanji within a grade of `kanji_count`, staying in range
    pub fn change_kanji(self, offset: isize, kanji_count: usize) -> SessionContext {
        let last = kanji_count.saturating_sub(1) as isize;
        let kanji = (self.kanji as isize).saturating_add(offset).clamp(0, last) as usize;
        SessionContext { kanji, stroke: 0, ..self }
    }

    pub fn select_grade(self, grade: usize) -> SessionContext {
        SessionContext { grade, kanji: 0, stroke: 0 }
    }

    pub fn entry<'a>(&self, library: &'a ReferenceLibrary) -> Option<&'a KanjiEntry> {
        library.kanji(self.grade, self.kanji)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::direction::parse_directions;

    fn entry(json: &str) -> KanjiEntry {
        serde_json::from_str(json).unwrap()
    }

    fn dirs(csv: &str) -> Vec<DirectionCode> {
        parse_directions(csv).unwrap()
    }

    static KUCHI: &str = r#"{"kanji":"口","directions":[["d"],["r","d"],["r"]]}"#;

    #[test]
    fn test_full_kanji() {
        let kuchi = entry(KUCHI);
        let ctx = SessionContext::new(0, 5);
        let (ctx, v) = ctx.evaluate(&kuchi, &dirs("d"));
        assert_eq!(v, StrokeVerdict::Matched { next: 1 });
        let (ctx, v) = ctx.evaluate(&kuchi, &dirs("r,dr,d"));
        assert_eq!(v, StrokeVerdict::Matched { next: 2 });
        let (ctx, v) = ctx.evaluate(&kuchi, &dirs("r"));
        assert_eq!(v, StrokeVerdict::Completed);
        assert_eq!(ctx, SessionContext::new(0, 5));
    }

    #[test]
    fn test_mismatch_resets() {
        let kuchi = entry(KUCHI);
        let (ctx, _) = SessionContext::default().evaluate(&kuchi, &dirs("d"));
        assert_eq!(ctx.stroke, 1);
        // Second stroke drawn in the wrong order
        let (ctx, v) = ctx.evaluate(&kuchi, &dirs("d,r"));
        assert_eq!(v, StrokeVerdict::Mismatch);
        assert_eq!(ctx.stroke, 0);
    }

    #[test]
    fn test_context_is_not_mutated() {
        let kuchi = entry(KUCHI);
        let before = SessionContext::default();
        let (after, _) = before.evaluate(&kuchi, &dirs("d"));
        assert_eq!(before.stroke, 0);
        assert_eq!(after.stroke, 1);
    }

    #[test]
    fn test_stroke_index_past_reference() {
        let kuchi = entry(KUCHI);
        let ctx = SessionContext { grade: 0, kanji: 0, stroke: 7 };
        let (ctx, v) = ctx.evaluate(&kuchi, &dirs("r"));
        assert_eq!(v, StrokeVerdict::Mismatch);
        assert_eq!(ctx.stroke, 0);
    }

    #[test]
    fn test_navigation() {
        let ctx = SessionContext { grade: 1, kanji: 2, stroke: 2 };
        assert_eq!(ctx.change_kanji(1, 10), SessionContext { grade: 1, kanji: 3, stroke: 0 });
        assert_eq!(ctx.change_kanji(-5, 10).kanji, 0);
        assert_eq!(ctx.change_kanji(20, 10).kanji, 9);
        assert_eq!(ctx.change_kanji(1, 0).kanji, 0);
        assert_eq!(ctx.select_grade(0), SessionContext::default());
        assert_eq!(ctx.reset(), SessionContext { grade: 1, kanji: 2, stroke: 0 });
    }

    #[test]
    fn test_entry_lookup() {
        let library = ReferenceLibrary::embedded().unwrap();
        let ctx = SessionContext::new(0, 0);
        assert_eq!(ctx.entry(&library).unwrap().kanji, "一");
        assert!(SessionContext::new(9, 0).entry(&library).is_none());
    }

    #[test]
    fn test_verdict_json() {
        let json = serde_json::to_string(&StrokeVerdict::Matched { next: 2 }).unwrap();
        assert_eq!(json, r#"{"verdict":"matched","next":2}"#);
        let json = serde_json::to_string(&StrokeVerdict::Discarded).unwrap();
        assert_eq!(json, r#"{"verdict":"discarded"}"#);
    }
}
