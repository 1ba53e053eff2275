//! Rewrites formal, machine-sounding prose into casual text.

use once_cell::sync::Lazy;

pub mod config;
pub mod error;
pub mod lexicon;
pub mod random;
pub mod resources;
pub mod rewriter;
pub mod session;
pub mod splitter;

pub use config::Hyperparameters;
pub use error::{HumanizerError, Result};
pub use lexicon::Lexicon;
pub use random::RandomSource;
pub use rewriter::{Humanizer, MutationCounts, Rewrite};
pub use session::{Session, SimulatedDetector};
pub use splitter::{PunctuationSplitter, SentenceSplitter, SplitterKind, UnicodeSplitter};

static DEFAULT_HUMANIZER: Lazy<Humanizer> =
    Lazy::new(|| Humanizer::new(Hyperparameters::default()).unwrap());

/// Rewrites `text` with the default hyperparameters and the thread-local RNG.
/// Empty or whitespace-only input comes back unchanged.
pub fn humanize(text: &str) -> String {
    DEFAULT_HUMANIZER.humanize(text, &mut rand::thread_rng())
}
