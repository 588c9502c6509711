//! # Scanner Module
//!
//! Finds the scripts Scriptdeck can offer.
//!
//! The scan is deliberately shallow: only the immediate entries of one directory
//! (normally the folder next to the executable) are looked at. Every `.ps1` file,
//! in any letter case, becomes a [`ScriptDescriptor`], and the [`Classifier`]
//! decides right there whether it needs elevation. Nothing is re-read later.
//!
//! An unreadable directory is not an error, it yields an empty list so the menu
//! can say "nothing found" instead of crashing.

use std::path::{Path, PathBuf};
use log::{debug, info, warn};
use serde::Serialize;
use walkdir::WalkDir;
use crate::classifier::Classifier;
use crate::invariant_ppt::assert_invariant;

/// Extension (without the dot) of the scripts we launch.
pub const SCRIPT_EXTENSION: &str = "ps1";

pub const INV_ABSOLUTE_PATH: &str = "Descriptor path must be absolute";

/// A script found during the scan.
///
/// Fields are private; a descriptor never changes after the scanner builds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptDescriptor {
    name: String,
    path: PathBuf,
    requires_elevation: bool,
}

impl ScriptDescriptor {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        requires_elevation: bool,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            requires_elevation,
        }
    }

    /// Display name: the file name without `.ps1`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn requires_elevation(&self) -> bool {
        self.requires_elevation
    }
}

/// Strips a trailing `.ps1` (any case) from `file_name`.
///
/// Returns `None` when the name does not end with the script extension.
fn script_name(file_name: &str) -> Option<&str> {
    let suffix_len = SCRIPT_EXTENSION.len() + 1;
    let split = file_name.len().checked_sub(suffix_len)?;
    if !file_name.is_char_boundary(split) {
        return None;
    }
    let (stem, suffix) = file_name.split_at(split);
    let is_script = suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(SCRIPT_EXTENSION);
    is_script.then_some(stem)
}

/// Lists the scripts directly inside `dir`.
///
/// Results are sorted by file name so the menu order is stable between runs.
pub fn scan(dir: &Path, classifier: &Classifier) -> Vec<ScriptDescriptor> {
    let dir = match std::path::absolute(dir) {
        Ok(d) => d,
        Err(e) => {
            warn!("Cannot resolve scan directory {:?}: {}", dir, e);
            return Vec::new();
        }
    };

    debug!("Scanning directory: {:?}", dir);
    let walker = WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    let mut scripts = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                // The root failing to open shows up here as the only item.
                warn!("Skipping unreadable entry in {:?}: {}", dir, e);
                continue;
            }
        };

        let path = entry.path();
        // Follows symlinks; skips directories and dangling links.
        if !path.is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        let Some(name) = script_name(&file_name) else {
            continue;
        };

        assert_invariant(path.is_absolute(), INV_ABSOLUTE_PATH, "Scanner");

        let requires_elevation = classifier.classify(path);
        debug!("Found script {:?} (requires_elevation={})", name, requires_elevation);
        scripts.push(ScriptDescriptor::new(name, path, requires_elevation));
    }

    info!("Found {} script(s) in {:?}", scripts.len(), dir);
    scripts
}
