//! Zip container detection and in-memory entry table.

use std::io::{Cursor, Read};

use indexmap::IndexMap;
use log::trace;

use crate::error::LoadError;
use crate::settings::SETTINGS_SUFFIX;

const LOCAL_HEADER: [u8; 4] = *b"PK\x03\x04";
const EMPTY_ARCHIVE: [u8; 4] = *b"PK\x05\x06";
/// Upper bound on the buffer reserved from an entry's declared size.
const MAX_PREALLOC: u64 = 1 << 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    Zip,
    Loose,
}

/// Classify bytes by their magic number.
pub fn sniff(bytes: &[u8]) -> ContainerKind {
    match bytes.get(..4) {
        Some(magic) if magic == LOCAL_HEADER || magic == EMPTY_ARCHIVE => ContainerKind::Zip,
        _ => ContainerKind::Loose,
    }
}

/// True when `bytes` is a zip holding a settings document, a topology and at
/// least one texture.
pub fn is_puppet_container(bytes: &[u8]) -> bool {
    if sniff(bytes) != ContainerKind::Zip {
        return false;
    }
    match Archive::from_bytes(bytes) {
        Ok(archive) => {
            archive.find_suffix(SETTINGS_SUFFIX).is_some()
                && archive.find_suffix(".moc3").is_some()
                && archive.names().any(|n| {
                    let n = n.to_ascii_lowercase();
                    n.ends_with(".png") || n.ends_with(".jpg") || n.ends_with(".jpeg") || n.ends_with(".webp")
                })
        }
        Err(_) => false,
    }
}

/// Every file entry of a container keyed by its path with the top-level
/// directory removed. Directory entries and `__MACOSX` metadata are skipped.
#[derive(Debug, Default)]
pub struct Archive {
    entries: IndexMap<String, Vec<u8>>,
}

impl Archive {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).map_err(archive_err)?;
        let mut entries = IndexMap::with_capacity(zip.len());
        for i in 0..zip.len() {
            let mut file = zip.by_index(i).map_err(archive_err)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().replace('\\', "/");
            if name.starts_with("__MACOSX") || name.contains("/__MACOSX/") {
                continue;
            }
            let mut buf = Vec::with_capacity(file.size().min(MAX_PREALLOC) as usize);
            file.read_to_end(&mut buf).map_err(|e| LoadError::Archive {
                reason: format!("{name}: {e}"),
            })?;
            let key = strip_top_level(&name).to_string();
            trace!("container entry {key} ({} bytes)", buf.len());
            entries.insert(key, buf);
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// First entry whose key ends with `suffix`.
    pub fn find_suffix(&self, suffix: &str) -> Option<(&str, &[u8])> {
        self.entries
            .iter()
            .find(|(k, _)| k.ends_with(suffix))
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Resolve a logical filename from a settings document. Exact key first,
    /// then suffix, then containment.
    pub fn resolve(&self, logical: &str) -> Option<&[u8]> {
        let name = normalize(logical);
        if name.is_empty() {
            return None;
        }
        if let Some(bytes) = self.get(name) {
            return Some(bytes);
        }
        self.entries
            .iter()
            .find(|(k, _)| k.ends_with(name))
            .or_else(|| self.entries.iter().find(|(k, _)| k.contains(name)))
            .map(|(_, v)| v.as_slice())
    }

    pub fn size_bytes(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

fn strip_top_level(name: &str) -> &str {
    match name.split_once('/') {
        Some((_, rest)) if !rest.is_empty() => rest,
        _ => name,
    }
}

fn normalize(logical: &str) -> &str {
    let mut name = logical.trim();
    loop {
        if let Some(rest) = name.strip_prefix("./") {
            name = rest;
        } else if let Some(rest) = name.strip_prefix("../") {
            name = rest;
        } else {
            return name;
        }
    }
}

fn archive_err(e: zip::result::ZipError) -> LoadError {
    LoadError::Archive {
        reason: e.to_string(),
    }
}
