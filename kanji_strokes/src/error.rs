use thiserror::Error;

// Errors raised by the recognition pipeline and its string-based entry points.
// Ordinary outcomes (discarded taps, mismatches) are data, not errors.
#[derive(Debug, Error)]
pub enum StrokeError {
    #[error("a stroke needs at least 2 points, got {0}")]
    TooFewPoints(usize),

    #[error("unknown direction code `{0}`")]
    UnknownDirection(String),

    #[error("no kanji at grade {grade}, index {kanji}")]
    NoSuchKanji { grade: usize, kanji: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to parse configuration")]
    ConfigToml(#[from] toml::de::Error),

    #[error("malformed JSON")]
    Json(#[from] serde_json::Error),
}

// Errors raised while loading or validating reference data.
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("malformed reference JSON")]
    Json(#[from] serde_json::Error),

    #[error("malformed reference binary")]
    Bincode(#[from] bincode::Error),

    #[error("kanji {kanji} has no reference strokes")]
    NoStrokes { kanji: String },

    #[error("kanji {kanji} has an empty reference stroke at index {stroke}")]
    EmptyStroke { kanji: String, stroke: usize },

    #[error("line {line}: unknown direction code `{code}`")]
    UnknownDirection { line: usize, code: String },

    #[error("line {line}: expected a blank line before the next kanji")]
    MissingSeparator { line: usize },
}
