//! Byte sources a bundle is fetched from.

use std::path::{Path, PathBuf};

use hashbrown::HashMap;

/// Fetches raw bytes for a reference. References are `/`-separated paths.
pub trait BundleSource {
    fn fetch(&self, reference: &str) -> anyhow::Result<Vec<u8>>;
}

impl<T: BundleSource + ?Sized> BundleSource for &T {
    fn fetch(&self, reference: &str) -> anyhow::Result<Vec<u8>> {
        (**self).fetch(reference)
    }
}

/// Local files below a root directory.
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl BundleSource for FileSource {
    fn fetch(&self, reference: &str) -> anyhow::Result<Vec<u8>> {
        let path = self.root.join(reference);
        Ok(std::fs::read(path)?)
    }
}

/// In-memory table of reference -> bytes.
#[derive(Default, Clone)]
pub struct MemorySource {
    entries: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reference: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(reference.into(), bytes);
    }

    pub fn remove(&mut self, reference: &str) -> Option<Vec<u8>> {
        self.entries.remove(reference)
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.entries.contains_key(reference)
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<u8>)> for MemorySource {
    fn from_iter<I: IntoIterator<Item = (K, Vec<u8>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl BundleSource for MemorySource {
    fn fetch(&self, reference: &str) -> anyhow::Result<Vec<u8>> {
        self.entries
            .get(reference)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no entry named '{reference}'"))
    }
}
