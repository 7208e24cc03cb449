use serde::Deserialize;

use puppet_api_core::BlendMode;

use crate::data::{Curve, CurveTarget, ExpressionData, ExpressionParameter, MotionData, Point, Segment};
use crate::error::ClipDecodeError;

/// Parse a `*.motion3.json` clip.
///
/// Notes:
/// - Segments are a flat number list: the first point `(t, v)`, then for each
///   segment a type tag (0 linear, 1 bezier, 2 stepped, 3 inverse stepped)
///   followed by one point (three for bezier).
/// - Missing or negative fades resolve to `default_fade`.
pub fn parse_motion_json(bytes: &[u8], default_fade: (f32, f32)) -> Result<MotionData, ClipDecodeError> {
    let raw: RawMotion = serde_json::from_slice(bytes).map_err(|e| motion_err(e.to_string()))?;

    let mut curves = Vec::with_capacity(raw.curves.len());
    for rc in raw.curves {
        let target = match rc.target.as_str() {
            "Model" => CurveTarget::Model,
            "Parameter" => CurveTarget::Parameter,
            "PartOpacity" => CurveTarget::PartOpacity,
            other => return Err(motion_err(format!("unknown curve target '{other}'"))),
        };
        let (initial, segments) = decode_segments(&rc.segments).map_err(|reason| {
            motion_err(format!("curve '{}': {reason}", rc.id))
        })?;
        curves.push(Curve {
            target,
            id: rc.id,
            fade_in: rc.fade_in_time.filter(|v| *v >= 0.0),
            fade_out: rc.fade_out_time.filter(|v| *v >= 0.0),
            initial,
            segments,
        });
    }

    let data = MotionData {
        duration: raw.meta.duration,
        fps: raw.meta.fps,
        looped: raw.meta.looped,
        fade_in: raw.meta.fade_in_time.filter(|v| *v >= 0.0).unwrap_or(default_fade.0),
        fade_out: raw.meta.fade_out_time.filter(|v| *v >= 0.0).unwrap_or(default_fade.1),
        curves,
    };
    data.validate_basic().map_err(motion_err)?;
    Ok(data)
}

fn decode_segments(raw: &[f32]) -> Result<(Point, Vec<Segment>), String> {
    if raw.len() < 2 {
        return Err("segment list needs a starting point".into());
    }
    let at = |i: usize| -> Result<Point, String> {
        match (raw.get(i), raw.get(i + 1)) {
            (Some(t), Some(v)) => Ok(Point::new(*t, *v)),
            _ => Err(format!("truncated segment at offset {i}")),
        }
    };
    let initial = at(0)?;
    let mut last = initial;
    let mut segments = Vec::new();
    let mut i = 2;
    while i < raw.len() {
        let tag = raw[i];
        i += 1;
        let seg = match tag as i32 {
            0 => {
                let p = at(i)?;
                i += 2;
                Segment::Linear([last, p])
            }
            1 => {
                let (c1, c2, p) = (at(i)?, at(i + 2)?, at(i + 4)?);
                i += 6;
                Segment::Bezier([last, c1, c2, p])
            }
            2 => {
                let p = at(i)?;
                i += 2;
                Segment::Stepped([last, p])
            }
            3 => {
                let p = at(i)?;
                i += 2;
                Segment::InverseStepped([last, p])
            }
            _ => return Err(format!("unknown segment type {tag}")),
        };
        last = seg.end();
        segments.push(seg);
    }
    Ok((initial, segments))
}

/// Parse a `*.exp3.json` expression. Missing fades resolve to `default_fade`.
pub fn parse_expression_json(
    bytes: &[u8],
    default_fade: (f32, f32),
) -> Result<ExpressionData, ClipDecodeError> {
    let raw: RawExpression = serde_json::from_slice(bytes).map_err(|e| ClipDecodeError {
        document: "expression",
        reason: e.to_string(),
    })?;
    Ok(ExpressionData {
        fade_in: raw.fade_in_time.filter(|v| *v >= 0.0).unwrap_or(default_fade.0),
        fade_out: raw.fade_out_time.filter(|v| *v >= 0.0).unwrap_or(default_fade.1),
        parameters: raw
            .parameters
            .into_iter()
            .map(|p| ExpressionParameter {
                id: p.id,
                value: p.value,
                blend: p.blend.as_deref().map(BlendMode::from_name).unwrap_or_default(),
            })
            .collect(),
    })
}

fn motion_err(reason: impl Into<String>) -> ClipDecodeError {
    ClipDecodeError {
        document: "motion",
        reason: reason.into(),
    }
}

// ---- private serde schema ----

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawMotion {
    meta: RawMeta,
    #[serde(default)]
    curves: Vec<RawCurve>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawMeta {
    duration: f32,
    #[serde(default = "default_fps")]
    fps: f32,
    #[serde(default, rename = "Loop")]
    looped: bool,
    #[serde(default)]
    fade_in_time: Option<f32>,
    #[serde(default)]
    fade_out_time: Option<f32>,
}

fn default_fps() -> f32 {
    30.0
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawCurve {
    target: String,
    id: String,
    #[serde(default)]
    fade_in_time: Option<f32>,
    #[serde(default)]
    fade_out_time: Option<f32>,
    segments: Vec<f32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawExpression {
    #[serde(default)]
    fade_in_time: Option<f32>,
    #[serde(default)]
    fade_out_time: Option<f32>,
    #[serde(default)]
    parameters: Vec<RawExpressionParameter>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawExpressionParameter {
    id: String,
    value: f32,
    #[serde(default)]
    blend: Option<String>,
}
