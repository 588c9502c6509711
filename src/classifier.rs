//! # Classifier Module
//!
//! Decides whether a script should be launched through UAC.
//!
//! The check is a plain keyword heuristic: a script is flagged as privileged when
//! any of its lines (lowercased) contains one of the sensitive-operation keywords,
//! such as HKLM registry access, service control, ownership/ACL changes, power or
//! boot configuration, and system file repair.
//!
//! This is **not** a security boundary. False positives (a comment mentioning
//! `takeown`) and false negatives (an obfuscated `Stop-Service`) both happen, and
//! that is accepted.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use log::{debug, trace};

/// Keywords that mark a script as needing administrator rights.
pub const DEFAULT_ADMIN_KEYWORDS: &[&str] = &[
    "hklm:",
    "hkey_local_machine",
    "hkcr:",
    "hkey_classes_root",
    "registry::hkey_classes_root",
    "registry::hkey_local_machine",
    "set-service",
    "stop-service",
    "start-service",
    "new-psdrive -name hkcr",
    "takeown",
    "icacls",
    "powercfg",
    "net start",
    "net stop",
    "bcdedit",
    "dism",
    "sfc /scannow",
];

/// An immutable set of lowercase substrings.
///
/// Built once and handed to the [`Classifier`]; nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Builds a set from arbitrary strings.
    ///
    /// Keywords are lowercased. Empty keywords are dropped, since an empty
    /// substring would match every line.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    /// Returns the first keyword contained in `lowercase_line`, if any.
    fn find_in(&self, lowercase_line: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|kw| lowercase_line.contains(kw.as_str()))
            .map(String::as_str)
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.keywords.len()
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_KEYWORDS)
    }
}

/// Flags scripts that look like they need elevation.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    keywords: KeywordSet,
}

impl Classifier {
    pub fn new(keywords: KeywordSet) -> Self {
        Self { keywords }
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    /// Returns `true` if any line of the file at `path` contains a keyword.
    ///
    /// A file that cannot be opened classifies as `false`.
    pub fn classify(&self, path: &Path) -> bool {
        match File::open(path) {
            Ok(file) => {
                let privileged = self.classify_reader(BufReader::new(file));
                trace!("Classified {:?}: requires_elevation={}", path, privileged);
                privileged
            }
            Err(e) => {
                debug!("Cannot open {:?} for classification: {}", path, e);
                false
            }
        }
    }

    /// Same as [`Classifier::classify`], over any buffered reader.
    ///
    /// Lines are decoded lossily, so a stray non-UTF-8 byte does not end the scan.
    /// A read error stops the scan and keeps the result so far (`false`).
    pub fn classify_reader<R: BufRead>(&self, mut reader: R) -> bool {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => return false,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf).to_lowercase();
                    if let Some(kw) = self.keywords.find_in(&line) {
                        debug!("Matched admin keyword {:?}", kw);
                        return true;
                    }
                }
                Err(e) => {
                    debug!("Read error during classification: {}", e);
                    return false;
                }
            }
        }
    }
}
