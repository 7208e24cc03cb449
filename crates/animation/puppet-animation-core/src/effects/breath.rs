use std::f32::consts::PI;

use puppet_api_core::ids::{PARAM_ANGLE_X, PARAM_ANGLE_Y, PARAM_ANGLE_Z, PARAM_BODY_ANGLE_X, PARAM_BREATH};
use puppet_api_core::ParameterVector;
use serde::{Deserialize, Serialize};

/// One sinusoid: `offset + peak * sin(2 pi t / cycle)`, added with `weight`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreathParameter {
    pub id: String,
    pub offset: f32,
    pub peak: f32,
    pub cycle: f32,
    pub weight: f32,
}

impl BreathParameter {
    pub fn new(id: &str, offset: f32, peak: f32, cycle: f32, weight: f32) -> Self {
        Self {
            id: id.to_string(),
            offset,
            peak,
            cycle,
            weight,
        }
    }
}

pub fn default_breath_parameters() -> Vec<BreathParameter> {
    vec![
        BreathParameter::new(PARAM_ANGLE_X, 0.0, 15.0, 6.5345, 0.5),
        BreathParameter::new(PARAM_ANGLE_Y, 0.0, 8.0, 3.5345, 0.5),
        BreathParameter::new(PARAM_ANGLE_Z, 0.0, 10.0, 5.5345, 0.5),
        BreathParameter::new(PARAM_BODY_ANGLE_X, 0.0, 4.0, 15.5345, 0.5),
        BreathParameter::new(PARAM_BREATH, 0.5, 0.5, 3.2345, 1.0),
    ]
}

#[derive(Clone, Debug)]
pub struct Breath {
    parameters: Vec<BreathParameter>,
    elapsed: f32,
}

impl Default for Breath {
    fn default() -> Self {
        Self::new(default_breath_parameters())
    }
}

impl Breath {
    pub fn new(parameters: Vec<BreathParameter>) -> Self {
        Self {
            parameters,
            elapsed: 0.0,
        }
    }

    pub fn parameters(&self) -> &[BreathParameter] {
        &self.parameters
    }

    pub fn update(&mut self, params: &mut ParameterVector, dt: f32) {
        self.elapsed += dt;
        let t = self.elapsed * 2.0 * PI;
        for p in &self.parameters {
            let cycle = if p.cycle == 0.0 { 1.0 } else { p.cycle };
            params.add_by_id(&p.id, p.offset + p.peak * (t / cycle).sin(), p.weight);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use puppet_api_core::Parameter;

    #[test]
    fn adds_sinusoid_onto_current_value() {
        let mut params = ParameterVector::new([
            Parameter::new(PARAM_ANGLE_X, -30.0, 30.0, 0.0),
            Parameter::new(PARAM_BREATH, 0.0, 1.0, 0.0),
        ]);
        let mut breath = Breath::default();
        let dt = 6.5345 / 4.0;
        breath.update(&mut params, dt);
        // Quarter cycle of AngleX: sin = 1.
        assert_relative_eq!(params.value_by_id(PARAM_ANGLE_X).unwrap(), 7.5, epsilon = 1e-4);
        let expected = 0.5 + 0.5 * (dt * 2.0 * PI / 3.2345).sin();
        assert_relative_eq!(params.value_by_id(PARAM_BREATH).unwrap(), expected, epsilon = 1e-5);
    }
}
