//! Decoded clip data.
//!
//! Motion clips are sets of piecewise curves over time. Each curve targets a
//! model parameter, a part opacity, or one of the model-level channels
//! (`Opacity`, `EyeBlink`, `LipSync`).

use puppet_api_core::BlendMode;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub time: f32,
    pub value: f32,
}

impl Point {
    #[inline]
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Segment {
    Linear([Point; 2]),
    /// Start, two control points, end.
    Bezier([Point; 4]),
    /// Holds the start value until the end time.
    Stepped([Point; 2]),
    /// Jumps to the end value right after the start time.
    InverseStepped([Point; 2]),
}

impl Segment {
    pub fn start(&self) -> Point {
        match self {
            Segment::Linear(p) | Segment::Stepped(p) | Segment::InverseStepped(p) => p[0],
            Segment::Bezier(p) => p[0],
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Segment::Linear(p) | Segment::Stepped(p) | Segment::InverseStepped(p) => p[1],
            Segment::Bezier(p) => p[3],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveTarget {
    Model,
    Parameter,
    PartOpacity,
}

pub const MODEL_CHANNEL_OPACITY: &str = "Opacity";
pub const MODEL_CHANNEL_EYE_BLINK: &str = "EyeBlink";
pub const MODEL_CHANNEL_LIP_SYNC: &str = "LipSync";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub target: CurveTarget,
    pub id: String,
    /// Per-curve fades override the clip fades when present.
    pub fade_in: Option<f32>,
    pub fade_out: Option<f32>,
    pub initial: Point,
    pub segments: Vec<Segment>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionData {
    /// Seconds. Zero or negative with `looped == false` means unbounded.
    pub duration: f32,
    pub fps: f32,
    pub looped: bool,
    pub fade_in: f32,
    pub fade_out: f32,
    pub curves: Vec<Curve>,
}

impl MotionData {
    /// Segment times must be non-decreasing and the duration finite.
    pub fn validate_basic(&self) -> Result<(), String> {
        if !self.duration.is_finite() {
            return Err("duration must be finite".into());
        }
        for curve in &self.curves {
            let mut last = curve.initial.time;
            for seg in &curve.segments {
                let end = seg.end().time;
                if end < last {
                    return Err(format!("curve '{}' has decreasing segment times", curve.id));
                }
                last = end;
            }
        }
        Ok(())
    }

    /// Time at which the clip stops contributing, or `None` when it never does.
    pub fn end_time(&self, start: f32) -> Option<f32> {
        if self.looped || self.duration <= 0.0 {
            None
        } else {
            Some(start + self.duration)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpressionParameter {
    pub id: String,
    pub value: f32,
    pub blend: BlendMode,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpressionData {
    pub fade_in: f32,
    pub fade_out: f32,
    pub parameters: Vec<ExpressionParameter>,
}
