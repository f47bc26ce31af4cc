//! Stroke recognition for kanji tracing practice.
//!
//! A traced gesture goes through [`StrokeCapture`], which simplifies it
//! ([`simplify`]) and measures it ([`StrokeFeatures`]). The resulting compass
//! directions can be labeled with [`classify`] and checked against a kanji's
//! reference strokes with [`match_stroke`]; [`SessionContext`] strings those
//! checks together stroke by stroke.
//!
//! The `#[wasm_bindgen]` functions expose the same pipeline to a browser page,
//! exchanging JSON strings.

mod analyzed_stroke;
mod capture;
mod classifier;
mod config;
mod direction;
mod entities;
mod error;
mod geometry;
mod matcher;
mod reference;
mod session;
mod simplifier;

use std::cell::RefCell;

use serde_derive::Serialize;
use tracing::debug;
use wasm_bindgen::prelude::*;

pub use analyzed_stroke::{StrokeFeatures, DEFAULT_DIRECTION_CHANGE_THRESHOLD};
pub use capture::{CaptureEvent, CaptureState, StrokeCapture, StrokeListener};
pub use classifier::{classify, Classification, StrokeShape};
pub use config::{ClassifierConfig, FeatureConfig, PipelineConfig, SimplifierConfig};
pub use direction::{format_directions, parse_directions, DirectionCode};
pub use entities::{BoundingBox, RawPoint, SamplePoint, SimplifiedPath, StrokeInfo, SurfaceRect};
pub use error::{ReferenceError, StrokeError};
pub use matcher::match_stroke;
pub use reference::{parse_stroke_text, Grade, KanjiEntry, ReferenceLibrary, ReferenceStroke};
pub use session::{SessionContext, StrokeVerdict};
pub use simplifier::{simplify, DEFAULT_TOLERANCE};

// Simplifies and measures an already normalized gesture
pub fn analyze_points(points: &[SamplePoint], config: &PipelineConfig) -> Result<StrokeInfo, StrokeError> {
    let path = simplify(points, config.simplifier.tolerance)?;
    let features = StrokeFeatures::extract(&path, config.features.direction_change_threshold);
    Ok(features.into_info(path))
}

// Parses and analyzes a gesture; None for a tap too short to be a stroke
fn analyze_gesture(points_json: &str, config: &PipelineConfig) -> Result<Option<StrokeInfo>, StrokeError> {
    let points: Vec<SamplePoint> = serde_json::from_str(points_json)?;
    if points.len() < 2 {
        debug!(points = points.len(), "discarding gesture too short to be a stroke");
        return Ok(None);
    }
    analyze_points(&points, config).map(Some)
}

#[derive(Serialize)]
struct LabeledClassification {
    #[serde(flatten)]
    classification: Classification,
    label: String,
}

#[derive(Serialize)]
struct PracticeResult<'a> {
    kanji: &'a str,
    stroke: usize,
    #[serde(flatten)]
    verdict: StrokeVerdict,
    directions: Vec<DirectionCode>,
}

#[derive(Serialize)]
struct CurrentKanji<'a> {
    grade: usize,
    index: usize,
    count: usize,
    stroke: usize,
    #[serde(flatten)]
    entry: &'a KanjiEntry,
}

/// Input is a JSON array of {"x","y","t"} points, already normalized to the surface.
///
/// A gesture of fewer than two points is discarded and reported as `null`.
pub fn analyze_json(points_json: &str, config: &PipelineConfig) -> Result<String, StrokeError> {
    let info = analyze_gesture(points_json, config)?;
    Ok(serde_json::to_string(&info)?)
}

// Same input as analyze_json; `null` for a discarded gesture
pub fn classify_json(points_json: &str, config: &PipelineConfig) -> Result<String, StrokeError> {
    let info = match analyze_gesture(points_json, config)? {
        Some(info) => info,
        None => return Ok("null".to_string()),
    };
    let classification = classify(&StrokeFeatures::from(&info), &config.classifier);
    let label = classification.to_string();
    Ok(serde_json::to_string(&LabeledClassification { classification, label })?)
}

// Both arguments are comma-separated direction codes, e.g. "r,d"
pub fn match_json(directions_csv: &str, reference_csv: &str) -> Result<bool, StrokeError> {
    let directions = parse_directions(directions_csv)?;
    let reference = parse_directions(reference_csv)?;
    Ok(match_stroke(&directions, &reference))
}

/// Evaluates one traced stroke for the kanji `ctx` points at.
///
/// Returns the updated context and a JSON report of the verdict. A tap too
/// short to be a stroke is reported as discarded and leaves the context as it was.
pub fn practice_json(
    library: &ReferenceLibrary,
    ctx: SessionContext,
    points_json: &str,
    config: &PipelineConfig,
) -> Result<(SessionContext, String), StrokeError> {
    let entry = match ctx.entry(library) {
        Some(entry) => entry,
        None => {
            return Err(StrokeError::NoSuchKanji {
                grade: ctx.grade,
                kanji: ctx.kanji,
            })
        }
    };
    let (next_ctx, verdict, directions) = match analyze_gesture(points_json, config)? {
        Some(info) => {
            let (next_ctx, verdict) = ctx.evaluate(entry, &info.directions);
            (next_ctx, verdict, info.directions)
        }
        None => (ctx, StrokeVerdict::Discarded, Vec::new()),
    };
    let report = PracticeResult {
        kanji: &entry.kanji,
        stroke: ctx.stroke,
        verdict,
        directions,
    };
    Ok((next_ctx, serde_json::to_string(&report)?))
}

/// Describes the kanji `ctx` points at: its reference entry, its position
/// within the grade and the stroke expected next.
pub fn current_kanji_json(library: &ReferenceLibrary, ctx: SessionContext) -> Result<String, StrokeError> {
    let no_such_kanji = || StrokeError::NoSuchKanji {
        grade: ctx.grade,
        kanji: ctx.kanji,
    };
    let grade = library.grade(ctx.grade).ok_or_else(no_such_kanji)?;
    let entry = grade.kanji.get(ctx.kanji).ok_or_else(no_such_kanji)?;
    let current = CurrentKanji {
        grade: ctx.grade,
        index: ctx.kanji,
        count: grade.kanji.len(),
        stroke: ctx.stroke,
        entry,
    };
    Ok(serde_json::to_string(&current)?)
}

thread_local!(static LIBRARY: Result<ReferenceLibrary, ReferenceError> = ReferenceLibrary::embedded());
thread_local!(static SESSION: RefCell<SessionContext> = RefCell::new(SessionContext::default()));

fn to_js(err: StrokeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// The embedded library, or why it failed to load
fn loaded(library: &Result<ReferenceLibrary, ReferenceError>) -> Result<&ReferenceLibrary, String> {
    library
        .as_ref()
        .map_err(|err| format!("embedded kanji data failed to load: {}", err))
}

fn with_library<T>(f: impl FnOnce(&ReferenceLibrary) -> Result<T, JsValue>) -> Result<T, JsValue> {
    LIBRARY.with(|library| {
        let library = loaded(library).map_err(|msg| JsValue::from_str(&msg))?;
        f(library)
    })
}

#[wasm_bindgen]
pub fn analyze(points_json: &str) -> Result<String, JsValue> {
    analyze_json(points_json, &PipelineConfig::default()).map_err(to_js)
}

#[wasm_bindgen]
pub fn classify_points(points_json: &str) -> Result<String, JsValue> {
    classify_json(points_json, &PipelineConfig::default()).map_err(to_js)
}

#[wasm_bindgen]
pub fn matches(directions: &str, reference: &str) -> Result<bool, JsValue> {
    match_json(directions, reference).map_err(to_js)
}

// Points the page's practice session at another kanji of the embedded library
#[wasm_bindgen]
pub fn select_kanji(grade: usize, kanji: usize) {
    SESSION.with(|session| {
        *session.borrow_mut() = SessionContext::new(grade, kanji);
    });
}

#[wasm_bindgen]
pub fn select_grade(grade: usize) {
    SESSION.with(|session| {
        let ctx = *session.borrow();
        *session.borrow_mut() = ctx.select_grade(grade);
    });
}

// Previous / next buttons; stays within the current grade
#[wasm_bindgen]
pub fn change_kanji(offset: isize) {
    SESSION.with(|session| {
        let ctx = *session.borrow();
        let count = LIBRARY.with(|library| {
            loaded(library)
                .ok()
                .and_then(|library| library.grade(ctx.grade))
                .map_or(0, |grade| grade.kanji.len())
        });
        *session.borrow_mut() = ctx.change_kanji(offset, count);
    });
}

#[wasm_bindgen]
pub fn reset_practice() {
    SESSION.with(|session| {
        let ctx = *session.borrow();
        *session.borrow_mut() = ctx.reset();
    });
}

#[wasm_bindgen]
pub fn current_kanji() -> Result<String, JsValue> {
    with_library(|library| {
        let ctx = SESSION.with(|session| *session.borrow());
        current_kanji_json(library, ctx).map_err(to_js)
    })
}

#[wasm_bindgen]
pub fn practice_stroke(points_json: &str) -> Result<String, JsValue> {
    with_library(|library| {
        SESSION.with(|session| {
            let ctx = *session.borrow();
            let (next, report) = practice_json(library, ctx, points_json, &PipelineConfig::default()).map_err(to_js)?;
            *session.borrow_mut() = next;
            Ok(report)
        })
    })
}
