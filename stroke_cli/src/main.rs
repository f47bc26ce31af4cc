use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_derive::Deserialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use kanji_strokes::{
    classify, CaptureEvent, KanjiEntry, PipelineConfig, RawPoint, ReferenceLibrary, SessionContext, StrokeCapture,
    StrokeFeatures, StrokeVerdict, SurfaceRect,
};

/// Replays recorded kanji tracing attempts through stroke capture and matching.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// JSON-lines file of recorded attempts
    #[arg(default_value = "debug/inputs.jsonl")]
    input: PathBuf,

    /// TOML file overriding the pipeline's tuning constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reference data (.json or .bin); defaults to the built-in kanji
    #[arg(long)]
    library: Option<PathBuf>,

    /// Width of the surface the attempts were recorded on, in pixels
    #[arg(long, default_value_t = 400.0)]
    width: f64,

    /// Height of the surface the attempts were recorded on, in pixels
    #[arg(long, default_value_t = 400.0)]
    height: f64,

    /// How many times to replay the whole file
    #[arg(long, default_value_t = 1)]
    iters: usize,

    /// More logging; repeat for trace output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// One recorded attempt at writing a kanji
#[derive(Deserialize, Debug)]
struct Attempt {
    kanji: String,
    // One list of device-space points per stroke
    strokes: Vec<Vec<RawPoint>>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn read_attempts(path: &Path) -> Result<Vec<Attempt>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut res: Vec<Attempt> = Vec::new();
    for (ix, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let attempt: Attempt =
            serde_json::from_str(&line).with_context(|| format!("{}:{}: malformed attempt", path.display(), ix + 1))?;
        res.push(attempt);
    }
    Ok(res)
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        None => Ok(PipelineConfig::default()),
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
            PipelineConfig::from_toml_str(&text).with_context(|| format!("invalid config {}", path.display()))
        }
    }
}

fn load_library(path: Option<&Path>) -> Result<ReferenceLibrary> {
    let path = match path {
        None => return ReferenceLibrary::embedded().context("built-in kanji data is broken"),
        Some(path) => path,
    };
    let library = if path.extension().map_or(false, |ext| ext == "bin") {
        let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        ReferenceLibrary::from_bincode(&bytes)
    } else {
        let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        ReferenceLibrary::from_json(&text)
    };
    library.with_context(|| format!("invalid reference data {}", path.display()))
}

// Feeds one attempt through capture and the session; true if the kanji was completed
fn replay(attempt: &Attempt, entry: &KanjiEntry, capture: &mut StrokeCapture, surface: SurfaceRect, report: bool) -> bool {
    let mut ctx = SessionContext::default();
    let mut completed = false;
    for (stroke_ix, points) in attempt.strokes.iter().enumerate() {
        let (first, rest) = match points.split_first() {
            Some(split) => split,
            None => continue,
        };
        capture.handle(CaptureEvent::Start(*first, surface), &mut ());
        for pt in rest {
            capture.handle(CaptureEvent::Move(*pt, surface), &mut ());
        }
        let stroke = match capture.handle(CaptureEvent::End, &mut ()) {
            Some(stroke) => stroke,
            None => {
                debug!(kanji = %attempt.kanji, stroke = stroke_ix, "gesture discarded");
                continue;
            }
        };
        let classification = classify(&StrokeFeatures::from(&stroke), &capture.config().classifier);
        let expected = ctx.stroke;
        let (next, verdict) = ctx.evaluate(entry, &stroke.directions);
        ctx = next;
        if report {
            println!("  stroke {} (expecting #{}): {} -> {:?}", stroke_ix + 1, expected + 1, classification, verdict);
        }
        completed = verdict == StrokeVerdict::Completed;
    }
    completed
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Tally {
    // Attempts that had reference data and were replayed
    evaluated: usize,
    correct: usize,
}

// One pass over all attempts; attempts without reference data don't count
fn replay_all(
    attempts: &[Attempt],
    library: &ReferenceLibrary,
    capture: &mut StrokeCapture,
    surface: SurfaceRect,
    report: bool,
) -> Tally {
    let mut tally = Tally::default();
    for attempt in attempts {
        let entry = match library.find(&attempt.kanji) {
            Some(entry) => entry,
            None => {
                if report {
                    warn!(kanji = %attempt.kanji, "no reference data; skipping");
                }
                continue;
            }
        };
        if report {
            println!("{} ({}, {} strokes)", entry.kanji, entry.meaning, entry.stroke_count());
        }
        let completed = replay(attempt, entry, capture, surface, report);
        if report {
            println!("  => {}", if completed { "correct" } else { "not completed" });
        }
        tally.evaluated += 1;
        if completed {
            tally.correct += 1;
        }
    }
    tally
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(args.config.as_deref())?;
    let library = load_library(args.library.as_deref())?;
    if !(args.width > 0.0 && args.height > 0.0) {
        bail!("surface size must be positive, got {}x{}", args.width, args.height);
    }
    let surface = SurfaceRect::new(0.0, 0.0, args.width, args.height);

    info!(path = %args.input.display(), "loading recorded attempts");
    let attempts = read_attempts(&args.input)?;
    info!(attempts = attempts.len(), iters = args.iters, "starting replay");

    let mut capture = StrokeCapture::new(config);
    let start = Instant::now();
    let mut total = Tally::default();
    for iter in 0..args.iters {
        let tally = replay_all(&attempts, &library, &mut capture, surface, iter == 0);
        total.evaluated += tally.evaluated;
        total.correct += tally.correct;
    }
    let duration = start.elapsed();
    println!("Finished in {:?}. Correct attempts: {} of {}.", duration, total.correct, total.evaluated);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(json: &str) -> Attempt {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_skipped_attempts_are_not_counted() {
        let library = ReferenceLibrary::embedded().unwrap();
        let surface = SurfaceRect::new(0.0, 0.0, 400.0, 400.0);
        let ten = r#"{"kanji":"十","strokes":[
            [{"x":40,"y":200,"t":0},{"x":200,"y":202,"t":16},{"x":360,"y":200,"t":32}],
            [{"x":200,"y":40,"t":100},{"x":202,"y":200,"t":116},{"x":200,"y":360,"t":132}]]}"#;
        let unknown = r#"{"kanji":"龍","strokes":[[{"x":40,"y":200,"t":0},{"x":360,"y":200,"t":32}]]}"#;
        let attempts = vec![attempt(ten), attempt(unknown)];
        let mut capture = StrokeCapture::default();
        let tally = replay_all(&attempts, &library, &mut capture, surface, false);
        assert_eq!(tally, Tally { evaluated: 1, correct: 1 });
    }
}
