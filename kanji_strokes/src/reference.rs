use serde_derive::{Deserialize, Serialize};
use tracing::debug;

use super::direction::DirectionCode;
use super::error::ReferenceError;

// The canonical direction sequence of one stroke
pub type ReferenceStroke = Vec<DirectionCode>;

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct KanjiEntry {
    pub kanji: String,
    #[serde(default)]
    pub kun: String,
    #[serde(default)]
    pub on: String,
    #[serde(default)]
    pub meaning: String,
    // One reference per stroke, in stroke order
    pub directions: Vec<ReferenceStroke>,
}

impl KanjiEntry {
    pub fn stroke_count(&self) -> usize {
        self.directions.len()
    }

    fn validate(&self) -> Result<(), ReferenceError> {
        if self.directions.is_empty() {
            return Err(ReferenceError::NoStrokes { kanji: self.kanji.clone() });
        }
        if let Some(stroke) = self.directions.iter().position(|dirs| dirs.is_empty()) {
            return Err(ReferenceError::EmptyStroke {
                kanji: self.kanji.clone(),
                stroke,
            });
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Grade {
    pub name: String,
    pub kanji: Vec<KanjiEntry>,
}

/// All practice kanji, grouped by grade.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Default)]
pub struct ReferenceLibrary {
    pub grades: Vec<Grade>,
}

static EMBEDDED_JSON: &str = include_str!("../data/kanji.json");

impl ReferenceLibrary {
    pub fn from_json(json: &str) -> Result<ReferenceLibrary, ReferenceError> {
        let library: ReferenceLibrary = serde_json::from_str(json)?;
        library.validate()?;
        Ok(library)
    }

    // The compact form written by kanji_data_convert
    pub fn from_bincode(bytes: &[u8]) -> Result<ReferenceLibrary, ReferenceError> {
        let library: ReferenceLibrary = bincode::deserialize(bytes)?;
        library.validate()?;
        Ok(library)
    }

    pub fn to_bincode(&self) -> Result<Vec<u8>, ReferenceError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn to_json(&self) -> Result<String, ReferenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // The small library compiled into the crate
    pub fn embedded() -> Result<ReferenceLibrary, ReferenceError> {
        ReferenceLibrary::from_json(EMBEDDED_JSON)
    }

    pub fn validate(&self) -> Result<(), ReferenceError> {
        for grade in &self.grades {
            for entry in &grade.kanji {
                entry.validate()?;
            }
        }
        debug!(grades = self.grades.len(), kanji = self.kanji_count(), "reference library loaded");
        Ok(())
    }

    pub fn kanji_count(&self) -> usize {
        self.grades.iter().map(|g| g.kanji.len()).sum()
    }

    pub fn grade(&self, ix: usize) -> Option<&Grade> {
        self.grades.get(ix)
    }

    pub fn kanji(&self, grade_ix: usize, kanji_ix: usize) -> Option<&KanjiEntry> {
        self.grade(grade_ix).and_then(|grade| grade.kanji.get(kanji_ix))
    }

    pub fn find(&self, kanji: &str) -> Option<&KanjiEntry> {
        self.grades.iter().flat_map(|grade| grade.kanji.iter()).find(|entry| entry.kanji == kanji)
    }
}

// A whole line holding one non-ASCII character outside the full-width letter block
fn looks_like_kanji(line: &str) -> bool {
    let mut chars = line.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => !c.is_ascii() && !('\u{ff00}'..='\u{ffef}').contains(&c),
        _ => false,
    }
}

/// Parses the plain-text authoring format for stroke directions.
///
/// Blocks are separated by blank lines. The first line of a block is the
/// kanji, and every following line is one stroke given as comma-separated
/// direction codes:
///
/// ```text
/// 日
/// d
/// r,d
/// r
/// r
/// ```
///
/// Readings and meanings are left empty.
pub fn parse_stroke_text(text: &str) -> Result<Vec<KanjiEntry>, ReferenceError> {
    let mut res: Vec<KanjiEntry> = Vec::new();
    let mut current: Option<KanjiEntry> = None;
    for (ix, line) in text.lines().enumerate() {
        let line_no = ix + 1;
        let line = line.trim();
        if line.is_empty() {
            if let Some(entry) = current.take() {
                res.push(entry);
            }
            continue;
        }
        match current.as_mut() {
            None => {
                current = Some(KanjiEntry {
                    kanji: line.to_string(),
                    kun: String::new(),
                    on: String::new(),
                    meaning: String::new(),
                    directions: Vec::new(),
                });
            }
            Some(entry) => {
                let mut stroke: ReferenceStroke = Vec::new();
                for code in line.split(',') {
                    let code = code.trim();
                    let dir = code.parse::<DirectionCode>().map_err(|_| {
                        if looks_like_kanji(line) {
                            // The next kanji, missing its blank separator line
                            ReferenceError::MissingSeparator { line: line_no }
                        } else {
                            ReferenceError::UnknownDirection {
                                line: line_no,
                                code: code.to_string(),
                            }
                        }
                    })?;
                    stroke.push(dir);
                }
                entry.directions.push(stroke);
            }
        }
    }
    if let Some(entry) = current.take() {
        res.push(entry);
    }
    for entry in &res {
        entry.validate()?;
    }
    Ok(res)
}
