use tracing::{debug, trace, warn};

use super::analyzed_stroke::StrokeFeatures;
use super::config::PipelineConfig;
use super::entities::*;
use super::simplifier::simplify;

/// Receives capture notifications, synchronously, in the call stack of the
/// input event that caused them.
///
/// A gesture produces `on_start`, any number of `on_move`, then `on_end`;
/// if the gesture was long enough to be a stroke, `on_stroke` follows `on_end`.
pub trait StrokeListener {
    fn on_start(&mut self, _point: SamplePoint) {}
    fn on_move(&mut self, _point: SamplePoint) {}
    fn on_end(&mut self) {}
    fn on_stroke(&mut self, _stroke: &StrokeInfo) {}
}

// For callers that only want the return value of end()
impl StrokeListener for () {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Drawing,
}

// Inbound events from a capture surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureEvent {
    Start(RawPoint, SurfaceRect),
    Move(RawPoint, SurfaceRect),
    End,
    // The surface lost the pointer mid-gesture
    Leave,
}

/// Single-pointer gesture capture.
///
/// Buffers the normalized samples of the gesture in progress and, when it ends,
/// turns them into a [`StrokeInfo`].
#[derive(Debug)]
pub struct StrokeCapture {
    config: PipelineConfig,
    state: CaptureState,
    points: Vec<SamplePoint>,
}

impl StrokeCapture {
    pub fn new(config: PipelineConfig) -> StrokeCapture {
        StrokeCapture {
            config,
            state: CaptureState::Idle,
            points: Vec::new(),
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    // Samples of the gesture in progress
    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn handle<L: StrokeListener>(&mut self, event: CaptureEvent, listener: &mut L) -> Option<StrokeInfo> {
        match event {
            CaptureEvent::Start(raw, surface) => {
                self.start(raw, surface, listener);
                None
            }
            CaptureEvent::Move(raw, surface) => {
                self.move_to(raw, surface, listener);
                None
            }
            CaptureEvent::End => self.end(listener),
            CaptureEvent::Leave => self.leave(listener),
        }
    }

    pub fn start<L: StrokeListener>(&mut self, raw: RawPoint, surface: SurfaceRect, listener: &mut L) {
        let point = match surface.normalize(raw) {
            Some(point) => point,
            None => {
                warn!(?surface, "ignoring gesture start on a surface without area");
                return;
            }
        };
        if self.state == CaptureState::Drawing {
            debug!(dropped = self.points.len(), "gesture restarted before it ended");
        }
        self.state = CaptureState::Drawing;
        self.points.clear();
        self.points.push(point);
        trace!(x = point.x, y = point.y, t = point.t, "gesture start");
        listener.on_start(point);
    }

    pub fn move_to<L: StrokeListener>(&mut self, raw: RawPoint, surface: SurfaceRect, listener: &mut L) {
        if self.state != CaptureState::Drawing {
            return;
        }
        let point = match surface.normalize(raw) {
            Some(point) => point,
            None => {
                warn!(?surface, "ignoring move on a surface without area");
                return;
            }
        };
        self.points.push(point);
        trace!(x = point.x, y = point.y, t = point.t, "gesture move");
        listener.on_move(point);
    }

    /// Finishes the gesture in progress.
    ///
    /// Returns the analyzed stroke, or `None` if nothing was being drawn or the
    /// gesture was a tap too short to be a stroke.
    pub fn end<L: StrokeListener>(&mut self, listener: &mut L) -> Option<StrokeInfo> {
        if self.state != CaptureState::Drawing {
            return None;
        }
        self.state = CaptureState::Idle;
        let points = std::mem::take(&mut self.points);
        listener.on_end();
        if points.len() < 2 {
            debug!(points = points.len(), "discarding gesture too short to be a stroke");
            return None;
        }
        let path = match simplify(&points, self.config.simplifier.tolerance) {
            Ok(path) => path,
            Err(err) => {
                debug!(%err, "discarding gesture");
                return None;
            }
        };
        let features = StrokeFeatures::extract(&path, self.config.features.direction_change_threshold);
        let info = features.into_info(path);
        debug!(
            points = info.points.len(),
            directions = ?info.directions,
            straightness = info.straightness,
            direction_changes = info.direction_changes,
            "stroke captured"
        );
        listener.on_stroke(&info);
        Some(info)
    }

    // Same as end(), for when the surface loses the pointer
    pub fn leave<L: StrokeListener>(&mut self, listener: &mut L) -> Option<StrokeInfo> {
        if self.state != CaptureState::Drawing {
            return None;
        }
        self.end(listener)
    }
}

impl Default for StrokeCapture {
    fn default() -> StrokeCapture {
        StrokeCapture::new(PipelineConfig::default())
    }
}
