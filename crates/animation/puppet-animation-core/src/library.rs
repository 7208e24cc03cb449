//! Decoded-clip cache keyed by `(group, index)`.
//!
//! Clips decode lazily from the bundle on first use unless preloaded.
//! Lazily decoded clips are flagged `auto_delete` so the queue can tell them
//! apart from preloaded ones. Inserting under an existing key replaces the
//! old clip.

use std::rc::Rc;

use hashbrown::HashMap;
use log::{debug, warn};
use puppet_assets_core::ModelBundle;

use crate::config::AnimationConfig;
use crate::data::MotionData;
use crate::error::PlaybackError;
use crate::ids::MotionKey;
use crate::motion_json::parse_motion_json;

#[derive(Clone)]
struct CachedClip {
    data: Rc<MotionData>,
    auto_delete: bool,
}

pub struct MotionLibrary {
    bundle: Rc<ModelBundle>,
    cache: HashMap<MotionKey, CachedClip>,
    default_fade: (f32, f32),
}

impl MotionLibrary {
    pub fn new(bundle: Rc<ModelBundle>, config: &AnimationConfig) -> Self {
        Self {
            bundle,
            cache: HashMap::new(),
            default_fade: (config.motion_fade_in, config.motion_fade_out),
        }
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    pub fn group_names(&self) -> Vec<&str> {
        self.bundle.motion_groups.iter().map(|g| g.name.as_str()).collect()
    }

    pub fn group_len(&self, group: &str) -> Option<usize> {
        self.bundle.motion_group(group).map(|g| g.clips.len())
    }

    pub fn voice(&self, group: &str) -> Option<&[u8]> {
        self.bundle.motion_group(group)?.voice.as_deref()
    }

    /// Cached clip for `key`, decoding it on a miss. The flag is true when
    /// the clip was decoded on demand.
    pub fn get_or_decode(&mut self, key: &MotionKey) -> Result<(Rc<MotionData>, bool), PlaybackError> {
        if let Some(hit) = self.cache.get(key) {
            return Ok((Rc::clone(&hit.data), hit.auto_delete));
        }
        let data = Rc::new(self.decode(key)?);
        debug!("decoded motion {key} on demand");
        self.cache.insert(
            key.clone(),
            CachedClip {
                data: Rc::clone(&data),
                auto_delete: true,
            },
        );
        Ok((data, true))
    }

    fn decode(&self, key: &MotionKey) -> Result<MotionData, PlaybackError> {
        let group = self
            .bundle
            .motion_group(&key.group)
            .ok_or_else(|| PlaybackError::GroupNotFound {
                group: key.group.clone(),
            })?;
        let bytes = group.clips.get(key.index).ok_or_else(|| PlaybackError::ClipNotFound {
            group: key.group.clone(),
            index: key.index,
        })?;
        let mut data = parse_motion_json(bytes, self.default_fade)?;

        let declared = self
            .bundle
            .settings
            .motion_groups
            .get(&key.group)
            .and_then(|clips| clips.get(key.index));
        if let Some(m) = declared {
            if let Some(fade_in) = m.fade_in_time.filter(|v| *v >= 0.0) {
                data.fade_in = fade_in;
            }
            if let Some(fade_out) = m.fade_out_time.filter(|v| *v >= 0.0) {
                data.fade_out = fade_out;
            }
        }
        Ok(data)
    }

    /// Decode every declared clip. Returns how many failed; failures are
    /// left to be reported again on first use.
    pub fn preload_all(&mut self) -> usize {
        let keys: Vec<MotionKey> = self
            .bundle
            .motion_groups
            .iter()
            .flat_map(|g| (0..g.clips.len()).map(move |i| MotionKey::new(g.name.clone(), i)))
            .collect();
        let mut failures = 0;
        for key in keys {
            if self.cache.contains_key(&key) {
                continue;
            }
            match self.decode(&key) {
                Ok(data) => self.insert(key, data),
                Err(e) => {
                    warn!("motion {key} failed to preload: {e}");
                    failures += 1;
                }
            }
        }
        failures
    }

    pub fn insert(&mut self, key: MotionKey, data: MotionData) {
        self.cache.insert(
            key,
            CachedClip {
                data: Rc::new(data),
                auto_delete: false,
            },
        );
    }

    pub fn invalidate(&mut self, key: &MotionKey) -> bool {
        self.cache.remove(key).is_some()
    }

    pub fn contains(&self, key: &MotionKey) -> bool {
        self.cache.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
