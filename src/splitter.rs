use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{HumanizerError, Result};
use crate::resources::{is_abbreviation, ResourceStore};

pub trait SentenceSplitter: Send + Sync {
    fn split(&self, text: &str) -> Result<Vec<String>>;

    fn name(&self) -> &'static str;
}

// ---------------------------------------------------------------------------
// Punctuation fallback
// ---------------------------------------------------------------------------

static SENTENCE_END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());

#[derive(Debug, Clone, Copy, Default)]
pub struct PunctuationSplitter;

impl PunctuationSplitter {
    pub fn split_text(text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut last = 0;
        for m in SENTENCE_END_RE.find_iter(text) {
            // keep the punctuation mark (always one ASCII byte)
            push_trimmed(&mut sentences, &text[last..m.start() + 1]);
            last = m.end();
        }
        push_trimmed(&mut sentences, &text[last..]);
        sentences
    }
}

impl SentenceSplitter for PunctuationSplitter {
    fn split(&self, text: &str) -> Result<Vec<String>> {
        Ok(Self::split_text(text))
    }

    fn name(&self) -> &'static str {
        "punctuation"
    }
}

fn push_trimmed(out: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        out.push(piece.to_string());
    }
}

// ---------------------------------------------------------------------------
// UAX #29 splitter
// ---------------------------------------------------------------------------

pub struct UnicodeSplitter {
    resources: Arc<ResourceStore>,
}

impl UnicodeSplitter {
    pub fn new(resources: Arc<ResourceStore>) -> Self {
        Self { resources }
    }
}

impl Default for UnicodeSplitter {
    fn default() -> Self {
        Self::new(Arc::new(ResourceStore::bundled()))
    }
}

impl SentenceSplitter for UnicodeSplitter {
    fn split(&self, text: &str) -> Result<Vec<String>> {
        let abbreviations = self.resources.abbreviations()?;
        let mut sentences: Vec<String> = Vec::new();
        for raw in text.split_sentence_bounds() {
            let sentence = raw.trim();
            if sentence.is_empty() {
                continue;
            }
            if let Some(prev) = sentences.last_mut() {
                let tail = prev.split_whitespace().last().unwrap_or_default();
                if is_initial(tail) || is_abbreviation(&abbreviations, tail) {
                    prev.push(' ');
                    prev.push_str(sentence);
                    continue;
                }
            }
            sentences.push(sentence.to_string());
        }
        Ok(sentences)
    }

    fn name(&self) -> &'static str {
        "unicode"
    }
}

/// A single capital followed by a period, e.g. the "J." in "J. Smith".
fn is_initial(word: &str) -> bool {
    let mut chars = word.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(c), Some('.'), None) if c.is_uppercase()
    )
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitterKind {
    #[default]
    Unicode,
    Punctuation,
}

impl SplitterKind {
    pub fn build(self, resources: Arc<ResourceStore>) -> Box<dyn SentenceSplitter> {
        match self {
            Self::Unicode => Box::new(UnicodeSplitter::new(resources)),
            Self::Punctuation => Box::new(PunctuationSplitter),
        }
    }
}

impl fmt::Display for SplitterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unicode => f.write_str("unicode"),
            Self::Punctuation => f.write_str("punctuation"),
        }
    }
}

impl FromStr for SplitterKind {
    type Err = HumanizerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unicode" => Ok(Self::Unicode),
            "punctuation" => Ok(Self::Punctuation),
            other => Err(HumanizerError::InvalidConfig(format!(
                "unknown splitter `{other}` (expected `unicode` or `punctuation`)"
            ))),
        }
    }
}
