use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::{HumanizerError, Result};

pub const ABBREVIATIONS_RESOURCE: &str = "abbreviations";
pub const ABBREVIATIONS_FILE: &str = "abbreviations.txt";

static BUNDLED_ABBREVIATIONS: &[&str] = &[
    "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "mt.", "gen.", "gov.", "sen.",
    "rep.", "capt.", "lt.", "col.", "sgt.", "vs.", "etc.", "e.g.", "i.e.", "cf.", "al.",
    "approx.", "dept.", "est.", "fig.", "inc.", "ltd.", "co.", "corp.", "no.", "vol.", "pp.",
    "ed.", "jan.", "feb.", "mar.", "apr.", "jun.", "jul.", "aug.", "sep.", "sept.", "oct.",
    "nov.", "dec.", "u.s.", "u.k.", "a.m.", "p.m.",
];

pub type Abbreviations = Arc<HashSet<String>>;

#[derive(Debug, Clone)]
enum Source {
    Bundled,
    Directory(PathBuf),
}

#[derive(Debug)]
pub struct ResourceStore {
    source: Source,
    abbreviations: OnceCell<std::result::Result<Abbreviations, String>>,
}

impl ResourceStore {
    pub fn bundled() -> Self {
        Self {
            source: Source::Bundled,
            abbreviations: OnceCell::new(),
        }
    }

    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::Directory(dir.into()),
            abbreviations: OnceCell::new(),
        }
    }

    pub fn is_provisioned(&self) -> bool {
        matches!(self.abbreviations.get(), Some(Ok(_)))
    }

    /// Ensures the abbreviation list is loaded and returns it.
    pub fn abbreviations(&self) -> Result<Abbreviations> {
        let loaded = self.abbreviations.get_or_init(|| match &self.source {
            Source::Bundled => Ok(normalize(BUNDLED_ABBREVIATIONS.iter().copied())),
            Source::Directory(dir) => load_from_dir(dir),
        });
        loaded
            .clone()
            .map_err(|reason| HumanizerError::ResourceUnavailable {
                resource: ABBREVIATIONS_RESOURCE.to_string(),
                reason,
            })
    }
}

impl Default for ResourceStore {
    fn default() -> Self {
        Self::bundled()
    }
}

fn load_from_dir(dir: &Path) -> std::result::Result<Abbreviations, String> {
    let path = dir.join(ABBREVIATIONS_FILE);
    match std::fs::read_to_string(&path) {
        Ok(contents) => {
            let entries = contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'));
            let set = normalize(entries);
            log::info!(
                "loaded {} abbreviations from {}",
                set.len(),
                path.display()
            );
            Ok(set)
        }
        Err(e) => Err(format!("{}: {e}", path.display())),
    }
}

fn normalize<'a>(entries: impl Iterator<Item = &'a str>) -> Abbreviations {
    let mut set = HashSet::new();
    for entry in entries {
        let lower = entry.to_lowercase();
        let bare = lower.trim_end_matches('.').to_string();
        if !bare.is_empty() {
            set.insert(bare);
        }
    }
    Arc::new(set)
}

/// Checks a word (with its trailing period) against the list.
pub fn is_abbreviation(abbreviations: &HashSet<String>, word: &str) -> bool {
    let trimmed = word
        .trim_start_matches(|c: char| matches!(c, '(' | '"' | '\''))
        .to_lowercase();
    if !trimmed.ends_with('.') {
        return false;
    }
    abbreviations.contains(trimmed.trim_end_matches('.'))
}
