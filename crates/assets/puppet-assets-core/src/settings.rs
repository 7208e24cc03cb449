//! Settings documents: the native `*.model3.json` manifest and the hotkey
//! document some distributions ship instead of expression/motion tables.
//!
//! Both are parsed through private serde schema structs and converted into
//! the public [`ModelSettings`] model.

use indexmap::IndexMap;
use serde::Deserialize;

pub const SETTINGS_SUFFIX: &str = "model3.json";
pub const HOTKEY_SUFFIX: &str = ".vtube.json";

/// Group name used for motions declared only through hotkeys.
pub const HOTKEY_MOTION_GROUP: &str = "Hotkeys";

#[derive(Clone, Debug, PartialEq)]
pub struct ExpressionRef {
    pub name: String,
    pub file: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MotionRef {
    pub file: String,
    pub sound: Option<String>,
    pub fade_in_time: Option<f32>,
    pub fade_out_time: Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HitArea {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParameterGroup {
    pub name: String,
    pub ids: Vec<String>,
}

/// Manifest of one puppet: artifact paths and declarative metadata.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelSettings {
    pub topology: String,
    pub textures: Vec<String>,
    pub physics: Option<String>,
    pub pose: Option<String>,
    pub user_data: Option<String>,
    pub expressions: Vec<ExpressionRef>,
    pub motion_groups: IndexMap<String, Vec<MotionRef>>,
    pub groups: Vec<ParameterGroup>,
    pub hit_areas: Vec<HitArea>,
    /// Layout hints with lower-cased keys and underscores removed.
    pub layout: IndexMap<String, f32>,
}

impl ModelSettings {
    pub fn parse(bytes: &[u8]) -> Result<Self, String> {
        let raw: RawSettings = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        let refs = raw.file_references;
        if refs.moc.trim().is_empty() {
            return Err("FileReferences.Moc is empty".into());
        }
        Ok(Self {
            topology: refs.moc,
            textures: refs.textures,
            physics: non_empty(refs.physics),
            pose: non_empty(refs.pose),
            user_data: non_empty(refs.user_data),
            expressions: refs
                .expressions
                .into_iter()
                .map(|e| ExpressionRef {
                    name: e.name,
                    file: e.file,
                })
                .collect(),
            motion_groups: refs
                .motions
                .into_iter()
                .map(|(group, clips)| {
                    let clips = clips
                        .into_iter()
                        .map(|m| MotionRef {
                            file: m.file,
                            sound: non_empty(m.sound),
                            fade_in_time: m.fade_in_time,
                            fade_out_time: m.fade_out_time,
                        })
                        .collect();
                    (group, clips)
                })
                .collect(),
            groups: raw
                .groups
                .into_iter()
                .map(|g| ParameterGroup {
                    name: g.name,
                    ids: g.ids,
                })
                .collect(),
            hit_areas: raw
                .hit_areas
                .into_iter()
                .map(|h| HitArea {
                    id: h.id,
                    name: h.name,
                })
                .collect(),
            layout: raw
                .layout
                .into_iter()
                .map(|(k, v)| (k.to_ascii_lowercase().replace('_', ""), v))
                .collect(),
        })
    }

    pub fn group_ids(&self, name: &str) -> Vec<String> {
        self.groups
            .iter()
            .filter(|g| g.name == name)
            .flat_map(|g| g.ids.iter().cloned())
            .collect()
    }

    pub fn eye_blink_ids(&self) -> Vec<String> {
        self.group_ids("EyeBlink")
    }

    pub fn lip_sync_ids(&self) -> Vec<String> {
        self.group_ids("LipSync")
    }

    pub fn expression_names(&self) -> impl Iterator<Item = &str> {
        self.expressions.iter().map(|e| e.name.as_str())
    }

    pub fn motion_group_names(&self) -> impl Iterator<Item = &str> {
        self.motion_groups.keys().map(String::as_str)
    }

    pub fn motion_count(&self, group: &str) -> usize {
        self.motion_groups.get(group).map(Vec::len).unwrap_or(0)
    }

    /// Fill empty expression/motion tables from a hotkey document.
    pub fn merge_hotkeys(&mut self, hotkeys: &HotkeySettings) {
        if self.expressions.is_empty() {
            self.expressions = hotkeys
                .expressions()
                .map(|(name, file)| ExpressionRef {
                    name: name.to_string(),
                    file: file.to_string(),
                })
                .collect();
        }
        if self.motion_groups.is_empty() {
            let clips: Vec<MotionRef> = hotkeys
                .animations()
                .map(|file| MotionRef {
                    file: file.to_string(),
                    sound: None,
                    fade_in_time: None,
                    fade_out_time: None,
                })
                .collect();
            if !clips.is_empty() {
                self.motion_groups.insert(HOTKEY_MOTION_GROUP.to_string(), clips);
            }
        }
    }

    pub fn lacks_playback_tables(&self) -> bool {
        self.expressions.is_empty() || self.motion_groups.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hotkey {
    pub name: String,
    pub action: String,
    pub file: String,
}

/// Hotkey-driven settings document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HotkeySettings {
    pub hotkeys: Vec<Hotkey>,
}

impl HotkeySettings {
    pub fn parse(bytes: &[u8]) -> Result<Self, String> {
        let raw: RawHotkeySettings = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        Ok(Self {
            hotkeys: raw
                .hotkeys
                .into_iter()
                .filter(|h| !h.file.is_empty())
                .map(|h| Hotkey {
                    name: h.name,
                    action: h.action,
                    file: h.file,
                })
                .collect(),
        })
    }

    /// `(name, file)` of every expression toggle. Unnamed hotkeys use the file stem.
    pub fn expressions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.hotkeys
            .iter()
            .filter(|h| h.action == "ToggleExpression" || h.file.ends_with(".exp3.json"))
            .map(|h| {
                let name = if h.name.is_empty() {
                    file_stem(&h.file)
                } else {
                    h.name.as_str()
                };
                (name, h.file.as_str())
            })
    }

    pub fn animations(&self) -> impl Iterator<Item = &str> {
        self.hotkeys
            .iter()
            .filter(|h| h.action == "TriggerAnimation" || h.file.ends_with(".motion3.json"))
            .map(|h| h.file.as_str())
    }
}

fn file_stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.split('.').next().unwrap_or(name)
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

// ---- private serde schema ----

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawSettings {
    file_references: RawFileReferences,
    #[serde(default)]
    groups: Vec<RawGroup>,
    #[serde(default)]
    hit_areas: Vec<RawHitArea>,
    #[serde(default)]
    layout: IndexMap<String, f32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawFileReferences {
    moc: String,
    #[serde(default)]
    textures: Vec<String>,
    #[serde(default)]
    physics: Option<String>,
    #[serde(default)]
    pose: Option<String>,
    #[serde(default)]
    user_data: Option<String>,
    #[serde(default)]
    expressions: Vec<RawExpressionRef>,
    #[serde(default)]
    motions: IndexMap<String, Vec<RawMotionRef>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawExpressionRef {
    name: String,
    file: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawMotionRef {
    file: String,
    #[serde(default)]
    sound: Option<String>,
    #[serde(default)]
    fade_in_time: Option<f32>,
    #[serde(default)]
    fade_out_time: Option<f32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawGroup {
    #[serde(default)]
    name: String,
    #[serde(default)]
    ids: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawHitArea {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawHotkeySettings {
    #[serde(default)]
    hotkeys: Vec<RawHotkey>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawHotkey {
    #[serde(default)]
    name: String,
    #[serde(default)]
    action: String,
    #[serde(default)]
    file: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTINGS: &str = r#"{
        "Version": 3,
        "FileReferences": {
            "Moc": "hiyori.moc3",
            "Textures": ["hiyori.2048/texture_00.png"],
            "Physics": "hiyori.physics3.json",
            "Motions": {
                "Idle": [{ "File": "motions/idle.motion3.json", "FadeInTime": 0.5 }],
                "TapBody": [{ "File": "motions/tap.motion3.json", "Sound": "sounds/tap.wav" }]
            }
        },
        "Groups": [
            { "Target": "Parameter", "Name": "EyeBlink", "Ids": ["ParamEyeLOpen", "ParamEyeROpen"] },
            { "Target": "Parameter", "Name": "LipSync", "Ids": ["ParamMouthOpenY"] }
        ],
        "HitAreas": [{ "Id": "HitAreaHead", "Name": "Head" }],
        "Layout": { "CenterX": 0.0, "Width": 2.0 }
    }"#;

    #[test]
    fn parses_native_settings() {
        let s = ModelSettings::parse(SETTINGS.as_bytes()).expect("parse");
        assert_eq!(s.topology, "hiyori.moc3");
        assert_eq!(s.physics.as_deref(), Some("hiyori.physics3.json"));
        assert!(s.pose.is_none());
        let groups: Vec<&str> = s.motion_group_names().collect();
        assert_eq!(groups, vec!["Idle", "TapBody"]);
        assert_eq!(s.motion_groups["TapBody"][0].sound.as_deref(), Some("sounds/tap.wav"));
        assert_eq!(s.eye_blink_ids(), vec!["ParamEyeLOpen", "ParamEyeROpen"]);
        assert_eq!(s.lip_sync_ids(), vec!["ParamMouthOpenY"]);
        assert_eq!(s.layout.get("centerx"), Some(&0.0));
        assert_eq!(s.hit_areas[0].name, "Head");
    }

    #[test]
    fn rejects_missing_topology() {
        let err = ModelSettings::parse(br#"{ "FileReferences": { "Moc": "" } }"#).unwrap_err();
        assert!(err.contains("Moc"));
        assert!(ModelSettings::parse(b"not json").is_err());
    }

    #[test]
    fn hotkeys_fill_empty_tables_only() {
        let mut s = ModelSettings::parse(br#"{ "FileReferences": { "Moc": "a.moc3" } }"#).unwrap();
        let hotkeys = HotkeySettings::parse(
            br#"{ "Hotkeys": [
                { "Name": "Smile", "Action": "ToggleExpression", "File": "smile.exp3.json" },
                { "Name": "", "Action": "ToggleExpression", "File": "exp/angry.exp3.json" },
                { "Name": "Wave", "Action": "TriggerAnimation", "File": "wave.motion3.json" },
                { "Name": "Nothing", "Action": "RemoveAllExpressions", "File": "" }
            ] }"#,
        )
        .unwrap();
        s.merge_hotkeys(&hotkeys);
        let names: Vec<&str> = s.expression_names().collect();
        assert_eq!(names, vec!["Smile", "angry"]);
        assert_eq!(s.motion_count(HOTKEY_MOTION_GROUP), 1);
    }
}
