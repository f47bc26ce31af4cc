use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_derive::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kanji_strokes::{parse_stroke_text, Grade, KanjiEntry, ReferenceLibrary};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Bincode,
}

/// Builds a reference library from stroke direction text files.
///
/// Each input file becomes one grade, named after the file.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Stroke direction files, one per grade
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// JSON object of readings and meanings, keyed by kanji
    #[arg(long)]
    meta: Option<PathBuf>,

    /// Where to write the library
    #[arg(short, long, default_value = "./data/kanji.json")]
    out: PathBuf,

    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

#[derive(Deserialize, Debug, Default)]
struct KanjiMeta {
    #[serde(default)]
    kun: String,
    #[serde(default)]
    on: String,
    #[serde(default)]
    meaning: String,
}

fn read_meta(path: &Path) -> Result<HashMap<String, KanjiMeta>> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} should be a JSON object keyed by kanji", path.display()))
}

fn read_grade(path: &Path, meta: &HashMap<String, KanjiMeta>) -> Result<Grade> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut kanji: Vec<KanjiEntry> = parse_stroke_text(&text).with_context(|| format!("in {}", path.display()))?;
    for entry in kanji.iter_mut() {
        match meta.get(&entry.kanji) {
            Some(m) => {
                entry.kun = m.kun.clone();
                entry.on = m.on.clone();
                entry.meaning = m.meaning.clone();
            }
            None if !meta.is_empty() => warn!(kanji = %entry.kanji, "no readings or meaning"),
            None => {}
        }
    }
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "grade".to_string());
    info!(grade = %name, kanji = kanji.len(), "parsed grade");
    Ok(Grade { name, kanji })
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
    let args = Args::parse();

    let meta = match &args.meta {
        Some(path) => read_meta(path)?,
        None => HashMap::new(),
    };
    let mut library = ReferenceLibrary::default();
    for input in &args.inputs {
        library.grades.push(read_grade(input, &meta)?);
    }
    library.validate()?;

    let bytes = match args.format {
        Format::Json => library.to_json()?.into_bytes(),
        Format::Bincode => library.to_bincode()?,
    };
    let mut f = File::create(&args.out).with_context(|| format!("failed to create {}", args.out.display()))?;
    f.write_all(&bytes).with_context(|| format!("failed to write {}", args.out.display()))?;
    info!(out = %args.out.display(), kanji = library.kanji_count(), bytes = bytes.len(), "wrote reference library");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_is_merged() {
        let dir = std::env::temp_dir().join(format!("kanji_data_convert_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("g1.txt");
        fs::write(&input, "十\nr\nd\n\n一\nr\n").unwrap();
        let meta: HashMap<String, KanjiMeta> =
            serde_json::from_str(r#"{"十":{"kun":"とお","on":"ジュウ","meaning":"ten"}}"#).unwrap();
        let grade = read_grade(&input, &meta).unwrap();
        assert_eq!(grade.name, "g1");
        assert_eq!(grade.kanji.len(), 2);
        assert_eq!(grade.kanji[0].meaning, "ten");
        assert_eq!(grade.kanji[1].meaning, "");
        fs::remove_dir_all(&dir).unwrap();
    }
}
