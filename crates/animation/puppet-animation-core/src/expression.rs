//! Expression layer: named parameter overlays cross-faded on change.

use std::rc::Rc;

use indexmap::IndexMap;
use log::{debug, warn};
use puppet_api_core::ParameterVector;
use puppet_assets_core::ModelBundle;
use rand::Rng;

use crate::config::AnimationConfig;
use crate::data::ExpressionData;
use crate::error::PlaybackError;
use crate::fade::FadeState;
use crate::motion_json::parse_expression_json;

struct ExpressionEntry {
    name: String,
    data: Rc<ExpressionData>,
    fade: FadeState,
}

#[derive(Default)]
pub struct ExpressionPlayer {
    expressions: IndexMap<String, Rc<ExpressionData>>,
    entries: Vec<ExpressionEntry>,
    user_time: f32,
}

impl ExpressionPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode every expression of `bundle`. Undecodable ones are skipped.
    pub fn from_bundle(bundle: &ModelBundle, config: &AnimationConfig) -> Self {
        let fade = (config.expression_fade_in, config.expression_fade_out);
        let mut player = Self::new();
        for e in &bundle.expressions {
            match parse_expression_json(&e.bytes, fade) {
                Ok(data) => player.insert(e.name.clone(), data),
                Err(err) => warn!("expression '{}' skipped: {err}", e.name),
            }
        }
        player
    }

    pub fn insert(&mut self, name: impl Into<String>, data: ExpressionData) {
        self.expressions.insert(name.into(), Rc::new(data));
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.expressions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    /// Name of the most recently started expression still in the queue.
    pub fn current(&self) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| !e.fade.fading_out)
            .map(|e| e.name.as_str())
    }

    pub fn set_expression(&mut self, name: &str) -> Result<(), PlaybackError> {
        let data = self
            .expressions
            .get(name)
            .cloned()
            .ok_or_else(|| PlaybackError::ExpressionNotFound {
                name: name.to_string(),
            })?;
        self.fade_out_all();
        debug!("expression {name} started");
        self.entries.push(ExpressionEntry {
            name: name.to_string(),
            data,
            fade: FadeState::default(),
        });
        Ok(())
    }

    /// Pick uniformly among all expressions. `None` when there are none.
    pub fn set_random_expression<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<String> {
        if self.expressions.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.expressions.len());
        let name = self.expressions.get_index(index)?.0.clone();
        self.set_expression(&name).ok()?;
        Some(name)
    }

    /// Fade every active expression out.
    pub fn reset(&mut self) {
        self.fade_out_all();
    }

    fn fade_out_all(&mut self) {
        let now = self.user_time;
        for e in &mut self.entries {
            let fade_out = e.data.fade_out;
            e.fade.start_fade_out(now, fade_out);
        }
    }

    /// Apply active expressions oldest first. Returns whether any applied.
    pub fn update(&mut self, params: &mut ParameterVector, dt: f32) -> bool {
        self.user_time += dt;
        let now = self.user_time;
        let mut updated = false;
        for e in &mut self.entries {
            if !e.fade.started {
                e.fade.begin(now, None);
            }
            let weight = e.fade.weight(now, e.data.fade_in, e.data.fade_out);
            for p in &e.data.parameters {
                params.blend_by_id(&p.id, p.blend, p.value, weight);
            }
            updated = true;
        }
        self.entries.retain(|e| !e.fade.is_finished(now));
        updated
    }

    pub fn stop_all(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ExpressionParameter;
    use approx::assert_relative_eq;
    use puppet_api_core::{BlendMode, Parameter};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn player() -> ExpressionPlayer {
        let mut p = ExpressionPlayer::new();
        for (name, value) in [("Smile", 0.5), ("Angry", -0.5)] {
            p.insert(
                name,
                ExpressionData {
                    fade_in: 0.0,
                    fade_out: 0.0,
                    parameters: vec![ExpressionParameter {
                        id: "ParamMouthForm".into(),
                        value,
                        blend: BlendMode::Add,
                    }],
                },
            );
        }
        p
    }

    #[test]
    fn unknown_expression_is_an_error() {
        let mut p = player();
        assert!(matches!(
            p.set_expression("Nope"),
            Err(PlaybackError::ExpressionNotFound { .. })
        ));
    }

    #[test]
    fn replacing_an_expression_retires_the_old_one() {
        let mut p = player();
        let mut params = ParameterVector::new([Parameter::new("ParamMouthForm", -1.0, 1.0, 0.0)]);
        p.set_expression("Smile").unwrap();
        p.update(&mut params, 0.016);
        assert_relative_eq!(params.value(0).unwrap(), 0.5);

        params.reset_to_defaults();
        p.set_expression("Angry").unwrap();
        assert_eq!(p.current(), Some("Angry"));
        p.update(&mut params, 0.016);
        params.reset_to_defaults();
        p.update(&mut params, 0.016);
        assert_relative_eq!(params.value(0).unwrap(), -0.5);
    }

    #[test]
    fn random_expression_picks_a_declared_name() {
        let mut p = player();
        let mut rng = StdRng::seed_from_u64(7);
        let name = p.set_random_expression(&mut rng).expect("some expression");
        assert!(name == "Smile" || name == "Angry");
        assert!(ExpressionPlayer::new().set_random_expression(&mut rng).is_none());
    }
}
