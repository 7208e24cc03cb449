use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use hashbrown::HashMap;
use once_cell::sync::Lazy;
use serde::Deserialize;

pub mod mocks;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    puppets: HashMap<String, PuppetEntry>,
}

#[derive(Debug, Deserialize)]
struct PuppetEntry {
    root: String,
    settings: String,
    topology: String,
    #[serde(default)]
    textures: Vec<TextureEntry>,
    #[serde(default)]
    voices: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TextureEntry {
    path: String,
    width: u32,
    height: u32,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

fn collect_files(dir: &Path, prefix: &str, out: &mut Vec<(String, Vec<u8>)>) -> Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("failed to list fixture dir {}", dir.display()))?
        .collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|e| e.file_name());
    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let key = format!("{prefix}/{name}");
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, &key, out)?;
        } else {
            let bytes = fs::read(&path)
                .with_context(|| format!("failed to read fixture at {}", path.display()))?;
            out.push((key, bytes));
        }
    }
    Ok(())
}

/// Encode a solid-colour PNG.
pub fn png(width: u32, height: u32, rgba: [u8; 4]) -> Result<Vec<u8>> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("failed to encode fixture png")?;
    Ok(buf)
}

/// Pack `(path, bytes)` entries into a stored (uncompressed) zip.
pub fn zip_entries(entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes) in entries {
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        writer.start_file(name.as_str(), options)?;
        writer.write_all(bytes)?;
    }
    Ok(writer.finish()?.into_inner())
}

/// Topology bytes understood by [`mocks::MockEngine`].
pub fn topology_bytes(name: &str) -> Vec<u8> {
    format!("MOC3 fixture topology for {name}").into_bytes()
}

pub mod puppets {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.puppets.keys().cloned().collect()
    }

    /// Reference of the settings document inside [`files`].
    pub fn settings_ref(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.puppets, "puppet", name)?;
        Ok(format!("{name}/{}", entry.settings))
    }

    /// Every file of the puppet keyed `"<name>/<relative path>"`, generated
    /// artifacts (topology, textures, voice tracks) included.
    pub fn files(name: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let entry = lookup(&MANIFEST.puppets, "puppet", name)?;
        let mut out = Vec::new();
        collect_files(&fixtures_root().join(&entry.root), name, &mut out)?;
        out.push((format!("{name}/{}", entry.topology), topology_bytes(name)));
        for tex in &entry.textures {
            out.push((
                format!("{name}/{}", tex.path),
                png(tex.width, tex.height, [200, 120, 80, 255])?,
            ));
        }
        for voice in &entry.voices {
            out.push((format!("{name}/{voice}"), b"RIFF fixture voice".to_vec()));
        }
        Ok(out)
    }

    /// Same as [`files`] with entries whose key ends in `suffix` dropped.
    pub fn files_without(name: &str, suffix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        Ok(files(name)?
            .into_iter()
            .filter(|(k, _)| !k.ends_with(suffix))
            .collect())
    }

    /// The puppet packed as a container with a `<name>/` top-level directory.
    pub fn zip(name: &str) -> Result<Vec<u8>> {
        zip_entries(&files(name)?)
    }
}
