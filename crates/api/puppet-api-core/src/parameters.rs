//! Parameter and part-opacity vectors plus the per-instance [`ModelState`].
//!
//! A [`ParameterVector`] is the working copy of every scalar the evaluation
//! engine exposes. Layers write into it during a frame; the scheduler commits
//! it to the engine once per frame. It also carries a single checkpoint slot
//! (`save`/`load`) so additive layers can be rolled back between frames.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::blend::BlendMode;

/// One scalar parameter as described by the engine layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: String,
    pub value: f32,
    pub default_value: f32,
    pub min: f32,
    pub max: f32,
}

impl Parameter {
    pub fn new(id: impl Into<String>, min: f32, max: f32, default_value: f32) -> Self {
        Self {
            id: id.into(),
            value: default_value,
            default_value,
            min,
            max,
        }
    }

    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if self.min <= self.max {
            value.clamp(self.min, self.max)
        } else {
            value
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ParameterVector {
    params: Vec<Parameter>,
    index: HashMap<String, usize>,
    saved: Vec<f32>,
}

impl ParameterVector {
    pub fn new(params: impl IntoIterator<Item = Parameter>) -> Self {
        let params: Vec<Parameter> = params.into_iter().collect();
        let index = params
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        let saved = params.iter().map(|p| p.value).collect();
        Self {
            params,
            index,
            saved,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Parameter> {
        self.params.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn value(&self, index: usize) -> Option<f32> {
        self.params.get(index).map(|p| p.value)
    }

    pub fn value_by_id(&self, id: &str) -> Option<f32> {
        self.index_of(id).and_then(|i| self.value(i))
    }

    /// Overwrite with `weight`: `current * (1 - w) + value * w`, clamped to range.
    pub fn set(&mut self, index: usize, value: f32, weight: f32) {
        if let Some(p) = self.params.get_mut(index) {
            let blended = if weight >= 1.0 {
                value
            } else {
                p.value + (value - p.value) * weight
            };
            p.value = p.clamp(blended);
        }
    }

    pub fn add(&mut self, index: usize, value: f32, weight: f32) {
        if let Some(current) = self.value(index) {
            self.set(index, current + value * weight, 1.0);
        }
    }

    pub fn multiply(&mut self, index: usize, value: f32, weight: f32) {
        if let Some(current) = self.value(index) {
            self.set(index, current * (1.0 + (value - 1.0) * weight), 1.0);
        }
    }

    /// Apply `value` with the given blend mode. Returns false for unknown ids.
    pub fn blend_by_id(&mut self, id: &str, mode: BlendMode, value: f32, weight: f32) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        match mode {
            BlendMode::Add => self.add(index, value, weight),
            BlendMode::Multiply => self.multiply(index, value, weight),
            BlendMode::Overwrite => self.set(index, value, weight),
        }
        true
    }

    pub fn set_by_id(&mut self, id: &str, value: f32, weight: f32) -> bool {
        self.blend_by_id(id, BlendMode::Overwrite, value, weight)
    }

    pub fn add_by_id(&mut self, id: &str, value: f32, weight: f32) -> bool {
        self.blend_by_id(id, BlendMode::Add, value, weight)
    }

    /// Store the current values in the checkpoint slot.
    pub fn save(&mut self) {
        self.saved.clear();
        self.saved.extend(self.params.iter().map(|p| p.value));
    }

    /// Restore the checkpoint taken by the last [`save`](Self::save).
    pub fn load(&mut self) {
        for (p, v) in self.params.iter_mut().zip(self.saved.iter()) {
            p.value = *v;
        }
    }

    pub fn reset_to_defaults(&mut self) {
        for p in &mut self.params {
            p.value = p.default_value;
        }
        self.save();
    }

    pub fn values(&self) -> Vec<f32> {
        self.params.iter().map(|p| p.value).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartOpacity {
    pub id: String,
    pub opacity: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PartOpacityVector {
    parts: Vec<PartOpacity>,
    index: HashMap<String, usize>,
}

impl PartOpacityVector {
    pub fn new(ids: impl IntoIterator<Item = String>) -> Self {
        let parts: Vec<PartOpacity> = ids
            .into_iter()
            .map(|id| PartOpacity { id, opacity: 1.0 })
            .collect();
        let index = parts
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        Self { parts, index }
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PartOpacity> {
        self.parts.iter()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn opacity(&self, index: usize) -> Option<f32> {
        self.parts.get(index).map(|p| p.opacity)
    }

    pub fn opacity_by_id(&self, id: &str) -> Option<f32> {
        self.index_of(id).and_then(|i| self.opacity(i))
    }

    pub fn set(&mut self, index: usize, opacity: f32) {
        if let Some(p) = self.parts.get_mut(index) {
            p.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    pub fn set_by_id(&mut self, id: &str, opacity: f32) -> bool {
        match self.index_of(id) {
            Some(i) => {
                self.set(i, opacity);
                true
            }
            None => false,
        }
    }
}

/// Mutable per-instance state the frame pipeline writes into.
#[derive(Clone, Debug)]
pub struct ModelState {
    pub parameters: ParameterVector,
    pub parts: PartOpacityVector,
    /// Whole-model opacity. Taps are ignored unless this is exactly 1.
    pub opacity: f32,
}

impl ModelState {
    pub fn new(parameters: ParameterVector, parts: PartOpacityVector) -> Self {
        Self {
            parameters,
            parts,
            opacity: 1.0,
        }
    }
}

impl Default for ModelState {
    fn default() -> Self {
        Self::new(ParameterVector::default(), PartOpacityVector::default())
    }
}
