//! Bundle loading: resolve every artifact a settings document names and
//! fetch it, from a container or relative to the settings location.
//!
//! Required: settings, topology, textures, expressions and motion clips.
//! Optional: physics, pose, user data, voice tracks and the hotkey document.
//! Any required failure aborts the whole load.

use log::{debug, warn};
use puppet_api_core::TextureImage;

use crate::bundle::{ExpressionBuffer, ModelBundle, MotionGroupBuffers};
use crate::container::{sniff, Archive, ContainerKind};
use crate::error::LoadError;
use crate::settings::{HotkeySettings, ModelSettings, HOTKEY_SUFFIX, SETTINGS_SUFFIX};
use crate::source::BundleSource;
use crate::texture::decode_texture;

enum Resolver<'a> {
    Archive(Archive),
    Loose {
        source: &'a dyn BundleSource,
        base: String,
    },
}

impl Resolver<'_> {
    fn required(&self, logical: &str) -> Result<Vec<u8>, LoadError> {
        match self {
            Resolver::Archive(archive) => match archive.resolve(logical) {
                Some(bytes) if !bytes.is_empty() => Ok(bytes.to_vec()),
                _ => Err(LoadError::MissingAsset {
                    path: logical.to_string(),
                }),
            },
            Resolver::Loose { source, base } => {
                let path = join(base, logical);
                match source.fetch(&path) {
                    Ok(bytes) if !bytes.is_empty() => Ok(bytes),
                    Ok(_) => Err(LoadError::MissingAsset { path }),
                    Err(e) => {
                        debug!("fetch of {path} failed: {e:#}");
                        Err(LoadError::MissingAsset { path })
                    }
                }
            }
        }
    }

    fn optional(&self, logical: Option<&str>) -> Option<Vec<u8>> {
        let logical = logical?;
        match self.required(logical) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("optional artifact skipped: {e}");
                None
            }
        }
    }
}

/// Fetch and assemble the bundle behind `reference`.
pub fn load_bundle(source: &dyn BundleSource, reference: &str) -> Result<ModelBundle, LoadError> {
    let root = source.fetch(reference).map_err(|e| LoadError::Fetch {
        reference: reference.to_string(),
        reason: format!("{e:#}"),
    })?;
    if root.is_empty() {
        return Err(LoadError::MissingAsset {
            path: reference.to_string(),
        });
    }

    let (mut settings, hotkeys, resolver) = match sniff(&root) {
        ContainerKind::Zip => {
            let archive = Archive::from_bytes(&root)?;
            let (settings_path, settings_bytes) =
                archive
                    .find_suffix(SETTINGS_SUFFIX)
                    .ok_or_else(|| LoadError::MissingAsset {
                        path: format!("{reference}:*.{SETTINGS_SUFFIX}"),
                    })?;
            let settings = parse_settings(settings_path, settings_bytes)?;
            let hotkeys = archive
                .find_suffix(HOTKEY_SUFFIX)
                .and_then(|(path, bytes)| parse_hotkeys(path, bytes));
            debug!("container {reference}: {} entries", archive.len());
            (settings, hotkeys, Resolver::Archive(archive))
        }
        ContainerKind::Loose => {
            let settings = parse_settings(reference, &root)?;
            let base = parent_dir(reference).to_string();
            let hotkey_ref = hotkey_sibling(reference);
            let hotkeys = hotkey_ref.and_then(|r| match source.fetch(&r) {
                Ok(bytes) => parse_hotkeys(&r, &bytes),
                Err(_) => None,
            });
            (settings, hotkeys, Resolver::Loose { source, base })
        }
    };

    if let Some(hotkeys) = hotkeys {
        if settings.lacks_playback_tables() {
            settings.merge_hotkeys(&hotkeys);
        }
    }

    let topology = resolver.required(&settings.topology)?;

    let expressions = settings
        .expressions
        .iter()
        .map(|e| {
            Ok(ExpressionBuffer {
                name: e.name.clone(),
                bytes: resolver.required(&e.file)?,
            })
        })
        .collect::<Result<Vec<_>, LoadError>>()?;

    let physics = resolver.optional(settings.physics.as_deref());
    let pose = resolver.optional(settings.pose.as_deref());
    let user_data = resolver.optional(settings.user_data.as_deref());

    let mut motion_groups = Vec::with_capacity(settings.motion_groups.len());
    for (name, clips) in &settings.motion_groups {
        let buffers = clips
            .iter()
            .map(|m| resolver.required(&m.file))
            .collect::<Result<Vec<_>, LoadError>>()?;
        let voice = resolver.optional(clips.iter().find_map(|m| m.sound.as_deref()));
        motion_groups.push(MotionGroupBuffers {
            name: name.clone(),
            clips: buffers,
            voice,
        });
    }

    let textures = settings
        .textures
        .iter()
        .map(|path| {
            let bytes = resolver.required(path)?;
            decode_texture(path, &bytes)
        })
        .collect::<Result<Vec<TextureImage>, LoadError>>()?;

    let bundle = ModelBundle {
        settings,
        topology,
        expressions,
        physics,
        pose,
        user_data,
        motion_groups,
        textures,
    };
    debug!("bundle {reference} loaded: {} bytes", bundle.size_bytes());
    Ok(bundle)
}

fn parse_settings(path: &str, bytes: &[u8]) -> Result<ModelSettings, LoadError> {
    ModelSettings::parse(bytes).map_err(|reason| LoadError::InvalidSettings {
        path: path.to_string(),
        reason,
    })
}

fn parse_hotkeys(path: &str, bytes: &[u8]) -> Option<HotkeySettings> {
    match HotkeySettings::parse(bytes) {
        Ok(h) => Some(h),
        Err(e) => {
            warn!("ignoring hotkey document {path}: {e}");
            None
        }
    }
}

fn parent_dir(reference: &str) -> &str {
    reference.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

fn hotkey_sibling(reference: &str) -> Option<String> {
    let stem = reference.strip_suffix(SETTINGS_SUFFIX)?;
    let stem = stem.strip_suffix('.').unwrap_or(stem);
    Some(format!("{stem}{HOTKEY_SUFFIX}"))
}

fn join(base: &str, logical: &str) -> String {
    let logical = logical.trim_start_matches("./");
    if base.is_empty() {
        logical.to_string()
    } else {
        format!("{base}/{logical}")
    }
}
