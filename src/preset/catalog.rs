//! Preset and fragment registries
//!
//! A registry scans `<catalog>/<kind>/<category>/<id>.json` the first time it
//! is read and keeps the parsed entries in memory until `reload` or `close`.
//! Unreadable or malformed files are skipped with an error log; the rest of
//! the catalog still loads.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use super::entry::PresetEntry;
use crate::constants::catalog::{FILE_EXTENSION, FRAGMENTS_DIR, PRESETS_DIR};
use crate::state::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Presets,
    Fragments,
}

impl CatalogKind {
    pub fn dir_name(self) -> &'static str {
        match self {
            CatalogKind::Presets => PRESETS_DIR,
            CatalogKind::Fragments => FRAGMENTS_DIR,
        }
    }
}

#[derive(Debug)]
pub struct PresetRegistry {
    root: PathBuf,
    kind: CatalogKind,
    entries: Vec<PresetEntry>,
    loaded: bool,
    open: bool,
}

impl PresetRegistry {
    /// Open the registry for one catalog kind. Nothing is read until the
    /// first lookup.
    pub fn open(catalog_dir: &Path, kind: CatalogKind) -> Self {
        Self {
            root: catalog_dir.join(kind.dir_name()),
            kind,
            entries: Vec::new(),
            loaded: false,
            open: true,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Drop cached entries; the next lookup rescans the catalog
    pub fn reload(&mut self) {
        self.entries.clear();
        self.loaded = false;
        debug!(root = %self.root.display(), "Registry cache cleared");
    }

    /// Drop cached entries and refuse further lookups
    pub fn close(&mut self) {
        self.entries.clear();
        self.loaded = false;
        self.open = false;
    }

    /// All entries in directory order (category, then id). Empty once closed.
    pub fn entries(&mut self) -> &[PresetEntry] {
        self.ensure_loaded();
        &self.entries
    }

    pub fn categories(&mut self) -> Vec<String> {
        let mut categories: Vec<String> = self.entries().iter().map(|e| e.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    pub fn in_category(&mut self, category: &str) -> Vec<&PresetEntry> {
        self.entries()
            .iter()
            .filter(|e| e.category == category)
            .collect()
    }

    /// Look up by `category/id` or by bare `id` (first match)
    pub fn find(&mut self, key: &str) -> Option<&PresetEntry> {
        let entries = self.entries();
        match key.split_once('/') {
            Some((category, id)) => entries.iter().find(|e| e.category == category && e.id == id),
            None => entries.iter().find(|e| e.id == key),
        }
    }

    fn ensure_loaded(&mut self) {
        if self.loaded || !self.open {
            return;
        }
        self.entries = scan_catalog(&self.root, self.kind);
        self.loaded = true;
        info!(
            root = %self.root.display(),
            count = self.entries.len(),
            "Loaded {}",
            self.kind.dir_name()
        );
    }
}

fn scan_catalog(root: &Path, kind: CatalogKind) -> Vec<PresetEntry> {
    let mut entries = Vec::new();
    if !root.is_dir() {
        debug!(root = %root.display(), "Catalog directory does not exist");
        return entries;
    }

    for category_dir in sorted_children(root) {
        if !category_dir.is_dir() {
            continue;
        }
        let Some(category) = category_dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if kind == CatalogKind::Fragments && Category::from_prefix(category).is_none() {
            warn!(category = %category, "Fragment directory does not name a category");
        }

        for path in sorted_children(&category_dir) {
            if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let document = match read_document(&path) {
                Ok(document) => document,
                Err(e) => {
                    error!(path = %path.display(), error = %format!("{e:#}"), "Skipping unreadable catalog file");
                    continue;
                }
            };
            let entry = match kind {
                CatalogKind::Presets => PresetEntry::from_document(id, category, document),
                CatalogKind::Fragments => PresetEntry::from_fragment(id, category, document),
            };
            match entry {
                Some(entry) => entries.push(entry),
                None => error!(path = %path.display(), "Skipping catalog file that is not a JSON object"),
            }
        }
    }
    entries
}

fn sorted_children(dir: &Path) -> Vec<PathBuf> {
    let mut children: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(read) => read.flatten().map(|e| e.path()).collect(),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Failed to read catalog directory");
            Vec::new()
        }
    };
    children.sort();
    children
}

fn read_document(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file {:?}", path))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse JSON from {:?}", path))
}
