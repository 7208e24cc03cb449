use hashbrown::HashMap;
use once_cell::sync::Lazy;
use puppet_api_core::{
    CanvasInfo, EngineError, ModelEngine, ModelHandle, ModelLayout, Parameter, ParameterVector,
    PartOpacityVector,
};

static DEFAULT_LAYOUT: Lazy<ModelLayout> = Lazy::new(|| ModelLayout {
    parameters: vec![
        Parameter::new("ParamAngleX", -30.0, 30.0, 0.0),
        Parameter::new("ParamAngleY", -30.0, 30.0, 0.0),
        Parameter::new("ParamAngleZ", -30.0, 30.0, 0.0),
        Parameter::new("ParamBodyAngleX", -10.0, 10.0, 0.0),
        Parameter::new("ParamEyeBallX", -1.0, 1.0, 0.0),
        Parameter::new("ParamEyeBallY", -1.0, 1.0, 0.0),
        Parameter::new("ParamBreath", 0.0, 1.0, 0.0),
        Parameter::new("ParamMouthOpenY", 0.0, 1.0, 0.0),
        Parameter::new("ParamEyeLOpen", 0.0, 1.0, 1.0),
        Parameter::new("ParamEyeROpen", 0.0, 1.0, 1.0),
    ],
    parts: vec!["PartHead".into(), "PartBody".into(), "PartArmA".into()],
    canvas: CanvasInfo {
        width: 2.0,
        height: 2.0,
    },
});

pub fn default_layout() -> ModelLayout {
    DEFAULT_LAYOUT.clone()
}

/// Axis-aligned region in model space, y up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Rect {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

#[derive(Debug, Default)]
struct MockModel {
    parameters: Vec<f32>,
    parts: Vec<f32>,
}

/// Engine double: accepts any topology starting with `MOC3`, records what
/// the runtime commits and answers hit tests from rectangles.
#[derive(Debug)]
pub struct MockEngine {
    layout: ModelLayout,
    hit_regions: HashMap<String, Rect>,
    models: HashMap<ModelHandle, MockModel>,
    next_handle: u32,
    pub reject_physics: bool,
    pub evaluations: usize,
    pub physics_steps: usize,
    pub pose_steps: usize,
    pub released: Vec<ModelHandle>,
    pub consistency_checks: Vec<bool>,
    pub hit_queries: Vec<(String, f32, f32)>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    pub fn new() -> Self {
        Self::with_layout(default_layout())
            .with_hit_region("HitAreaHead", Rect::new(-0.5, 0.3, 0.5, 1.0))
            .with_hit_region("HitAreaBody", Rect::new(-0.5, -1.0, 0.5, 0.3))
    }

    pub fn with_layout(layout: ModelLayout) -> Self {
        Self {
            layout,
            hit_regions: HashMap::new(),
            models: HashMap::new(),
            next_handle: 0,
            reject_physics: false,
            evaluations: 0,
            physics_steps: 0,
            pose_steps: 0,
            released: Vec::new(),
            consistency_checks: Vec::new(),
            hit_queries: Vec::new(),
        }
    }

    pub fn with_hit_region(mut self, id: &str, rect: Rect) -> Self {
        self.hit_regions.insert(id.to_string(), rect);
        self
    }

    pub fn layout(&self) -> &ModelLayout {
        &self.layout
    }

    pub fn live_handles(&self) -> Vec<ModelHandle> {
        let mut handles: Vec<_> = self.models.keys().copied().collect();
        handles.sort();
        handles
    }

    /// Most recently committed value of `id` on the single live model.
    pub fn committed(&self, id: &str) -> Option<f32> {
        let index = self.layout.parameters.iter().position(|p| p.id == id)?;
        let handle = self.live_handles().pop()?;
        self.models.get(&handle)?.parameters.get(index).copied()
    }

    pub fn committed_part(&self, id: &str) -> Option<f32> {
        let index = self.layout.parts.iter().position(|p| p == id)?;
        let handle = self.live_handles().pop()?;
        self.models.get(&handle)?.parts.get(index).copied()
    }
}

impl ModelEngine for MockEngine {
    fn load_topology(
        &mut self,
        topology: &[u8],
        consistency_check: bool,
    ) -> Result<ModelHandle, EngineError> {
        self.consistency_checks.push(consistency_check);
        if !topology.starts_with(b"MOC3") {
            return Err(EngineError::TopologyRejected {
                reason: "missing MOC3 magic".into(),
            });
        }
        self.next_handle += 1;
        let handle = ModelHandle(self.next_handle);
        self.models.insert(
            handle,
            MockModel {
                parameters: self.layout.parameters.iter().map(|p| p.default_value).collect(),
                parts: vec![1.0; self.layout.parts.len()],
            },
        );
        Ok(handle)
    }

    fn initialize(&mut self, handle: ModelHandle) -> Result<ModelLayout, EngineError> {
        if !self.models.contains_key(&handle) {
            return Err(EngineError::UnknownHandle(handle));
        }
        Ok(self.layout.clone())
    }

    fn set_parameter(&mut self, handle: ModelHandle, index: usize, value: f32) {
        if let Some(slot) = self
            .models
            .get_mut(&handle)
            .and_then(|m| m.parameters.get_mut(index))
        {
            *slot = value;
        }
    }

    fn parameter(&self, handle: ModelHandle, index: usize) -> Option<f32> {
        self.models.get(&handle)?.parameters.get(index).copied()
    }

    fn set_part_opacity(&mut self, handle: ModelHandle, index: usize, opacity: f32) {
        if let Some(slot) = self.models.get_mut(&handle).and_then(|m| m.parts.get_mut(index)) {
            *slot = opacity;
        }
    }

    fn evaluate(&mut self, _handle: ModelHandle) {
        self.evaluations += 1;
    }

    fn hit_test(&self, _handle: ModelHandle, region_id: &str, x: f32, y: f32) -> bool {
        self.hit_regions
            .get(region_id)
            .map(|r| r.contains(x, y))
            .unwrap_or(false)
    }

    fn release(&mut self, handle: ModelHandle) {
        if self.models.remove(&handle).is_some() {
            self.released.push(handle);
        }
    }

    fn load_physics(&mut self, _handle: ModelHandle, _data: &[u8]) -> Result<(), EngineError> {
        if self.reject_physics {
            return Err(EngineError::CapabilityRejected {
                capability: "physics",
                reason: "rejected by mock".into(),
            });
        }
        Ok(())
    }

    fn evaluate_physics(&mut self, _handle: ModelHandle, _parameters: &mut ParameterVector, _dt: f32) {
        self.physics_steps += 1;
    }

    fn load_pose(&mut self, _handle: ModelHandle, _data: &[u8]) -> Result<(), EngineError> {
        Ok(())
    }

    fn apply_pose(&mut self, _handle: ModelHandle, _parts: &mut PartOpacityVector, _dt: f32) {
        self.pose_steps += 1;
    }
}
