use std::sync::Arc;

use serde::Serialize;

use crate::config::Hyperparameters;
use crate::error::Result;
use crate::lexicon::Lexicon;
use crate::random::RandomSource;
use crate::resources::ResourceStore;
use crate::splitter::{PunctuationSplitter, SentenceSplitter};

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// How many times each randomized or pattern-driven mutation fired in one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MutationCounts {
    pub sentences: usize,
    pub transitions_stripped: usize,
    pub starters: usize,
    pub fillers: usize,
    pub connectors: usize,
    pub ellipses: usize,
    pub exclamations: usize,
    pub casual_tags: usize,
    pub grammar_rules: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Rewrite {
    pub text: String,
    pub counts: MutationCounts,
    pub splitter: &'static str,
    /// The configured splitter was unusable and punctuation splitting ran instead.
    pub fell_back: bool,
}

/// The six-stage rewrite. Immutable after construction; all randomness comes
/// from the caller's [`RandomSource`].
pub struct Humanizer {
    hp: Hyperparameters,
    lexicon: Arc<Lexicon>,
    splitter: Box<dyn SentenceSplitter>,
}

impl Humanizer {
    pub fn new(hp: Hyperparameters) -> Result<Self> {
        hp.validate()?;
        let lexicon = if hp.extra_vocabulary.is_empty() {
            Lexicon::english()
        } else {
            Arc::new(
                Lexicon::english()
                    .as_ref()
                    .clone()
                    .with_extra_vocabulary(&hp.extra_vocabulary)?,
            )
        };
        let resources = Arc::new(match &hp.resource_dir {
            Some(dir) => ResourceStore::from_dir(dir),
            None => ResourceStore::bundled(),
        });
        let splitter = hp.splitter.build(resources);
        Ok(Self {
            hp,
            lexicon,
            splitter,
        })
    }

    pub fn with_splitter(mut self, splitter: Box<dyn SentenceSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hp
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn humanize<R: RandomSource>(&self, text: &str, rng: &mut R) -> String {
        self.humanize_with_report(text, rng).text
    }

    pub fn humanize_with_report<R: RandomSource>(&self, text: &str, rng: &mut R) -> Rewrite {
        let mut counts = MutationCounts::default();
        if text.trim().is_empty() {
            return Rewrite {
                text: text.to_string(),
                counts,
                splitter: self.splitter.name(),
                fell_back: false,
            };
        }

        // 1. Vocabulary
        let text = self.lexicon.vocabulary.apply_all(text);
        // 2. Sentences
        let (sentences, fell_back) = self.split_sentences(&text);
        let text = self.rewrite_sentences(sentences, rng, &mut counts);
        // 3. Contractions
        let text = self.lexicon.contractions.apply_all(&text);
        // 4. Casual punctuation
        let text = self.add_casual_punctuation(&text, rng, &mut counts);
        // 5. Grammar
        let text = self.normalize_grammar(text, rng, &mut counts);
        // 6. Capitalization
        let text = capitalize_first(text.trim());

        log::debug!("rewrite finished: {counts:?}");
        Rewrite {
            text,
            counts,
            splitter: if fell_back {
                PunctuationSplitter.name()
            } else {
                self.splitter.name()
            },
            fell_back,
        }
    }

    fn split_sentences(&self, text: &str) -> (Vec<String>, bool) {
        match self.splitter.split(text) {
            Ok(sentences) => (sentences, false),
            Err(e) => {
                log::warn!(
                    "{} splitter unavailable ({e}), falling back to punctuation splitting",
                    self.splitter.name()
                );
                (PunctuationSplitter::split_text(text), true)
            }
        }
    }

    fn rewrite_sentences<R: RandomSource>(
        &self,
        sentences: Vec<String>,
        rng: &mut R,
        counts: &mut MutationCounts,
    ) -> String {
        let mut rewritten = Vec::with_capacity(sentences.len());
        for (i, sentence) in sentences.into_iter().enumerate() {
            counts.sentences += 1;

            let (mut sentence, stripped) = self.lexicon.transitions.strip_leading(&sentence);
            counts.transitions_stripped += stripped;

            if rng.chance(self.hp.starter_probability)
                && word_count(&sentence) > self.hp.starter_min_words
            {
                if let Some(starter) = rng.choose(&self.lexicon.starters) {
                    sentence = format!("{starter}{}", lowercase_first(&sentence));
                    counts.starters += 1;
                }
            }

            if rng.chance(self.hp.filler_probability)
                && word_count(&sentence) > self.hp.filler_min_words
            {
                if let Some(with_filler) = self.insert_filler(&sentence, rng) {
                    sentence = with_filler;
                    counts.fillers += 1;
                }
            }

            if i > 0 && rng.chance(self.hp.connector_probability) {
                if let Some(connector) = rng.choose(&self.lexicon.connectors) {
                    sentence = format!("{connector}, {}", sentence.to_lowercase());
                    counts.connectors += 1;
                }
            }

            rewritten.push(sentence);
        }
        rewritten.join(" ")
    }

    /// Inserts a filler at a word position in `[2, len - 2]`, never between
    /// the halves of an expanded contraction.
    fn insert_filler<R: RandomSource>(&self, sentence: &str, rng: &mut R) -> Option<String> {
        let mut words: Vec<String> = sentence.split_whitespace().map(str::to_string).collect();
        if words.len() < 4 {
            return None;
        }
        let positions: Vec<usize> = (2..=words.len() - 2)
            .filter(|&pos| !self.lexicon.joins_contraction(&words[pos - 1], &words[pos]))
            .collect();
        let pos = *rng.choose(&positions)?;
        let filler = rng.choose(&self.lexicon.fillers)?;
        words.insert(pos, format!("{filler},"));
        Some(words.join(" "))
    }

    fn add_casual_punctuation<R: RandomSource>(
        &self,
        text: &str,
        rng: &mut R,
        counts: &mut MutationCounts,
    ) -> String {
        let mut fragments: Vec<String> = text.split(". ").map(str::to_string).collect();
        for fragment in fragments.iter_mut() {
            if rng.chance(self.hp.ellipsis_probability) {
                fragment.push_str("...");
                counts.ellipses += 1;
            } else if rng.chance(self.hp.exclamation_probability) {
                fragment.push('!');
                counts.exclamations += 1;
            }
        }
        let text = fragments.join(". ");

        let mut fragments: Vec<String> = text.split(". ").map(str::to_string).collect();
        for fragment in fragments.iter_mut() {
            if rng.chance(self.hp.casual_tag_probability) {
                if let Some(tag) = rng.choose(&self.lexicon.casual_tags) {
                    fragment.push_str(tag);
                    counts.casual_tags += 1;
                }
            }
        }
        fragments.join(". ")
    }

    fn normalize_grammar<R: RandomSource>(
        &self,
        mut text: String,
        rng: &mut R,
        counts: &mut MutationCounts,
    ) -> String {
        for rule in self.lexicon.grammar.rules() {
            if rng.chance(self.hp.grammar_probability) {
                text = rule.apply(&text).into_owned();
                counts.grammar_rules += 1;
            }
        }
        text
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lower-cases the first letter unless the sentence opens with the pronoun "I".
/// Only the first letter changes, so acronyms and names later in the sentence
/// keep their case ("Well, the NASA team", not "Well, the nasa team").
fn lowercase_first(sentence: &str) -> String {
    let first_word = sentence.split_whitespace().next().unwrap_or_default();
    if first_word == "I" || first_word.starts_with("I'") {
        return sentence.to_string();
    }
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splitter::SplitterKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Every draw returns `value`; every choice picks the first candidate.
    struct Fixed(f64);

    impl RandomSource for Fixed {
        fn next_f64(&mut self) -> f64 {
            self.0
        }

        fn below(&mut self, _n: usize) -> usize {
            0
        }
    }

    /// Replays `draws` in order, then answers 0.999 once they run out.
    struct Script(std::collections::VecDeque<f64>);

    impl Script {
        fn new(draws: &[f64]) -> Self {
            Self(draws.iter().copied().collect())
        }
    }

    impl RandomSource for Script {
        fn next_f64(&mut self) -> f64 {
            self.0.pop_front().unwrap_or(0.999)
        }

        fn below(&mut self, _n: usize) -> usize {
            0
        }
    }

    fn deterministic() -> Humanizer {
        Humanizer::new(Hyperparameters::deterministic()).unwrap()
    }

    #[test]
    fn blank_input_is_returned_unchanged() {
        let h = Humanizer::new(Hyperparameters::default()).unwrap();
        let mut rng = Fixed(0.0);
        assert_eq!(h.humanize("", &mut rng), "");
        assert_eq!(h.humanize("  \n\t ", &mut rng), "  \n\t ");
    }

    #[test]
    fn fixed_rewrites_only() {
        let h = deterministic();
        let mut rng = Fixed(0.0);
        assert_eq!(h.humanize("We will utilize this.", &mut rng), "We'll use this.");
        assert_eq!(h.humanize("I do not know", &mut rng), "I don't know");
    }

    #[test]
    fn transition_stripped_before_starter() {
        let h = Humanizer::new(Hyperparameters::default()).unwrap();
        let rewrite = h.humanize_with_report("Thus, the results are clear today.", &mut Fixed(0.0));
        assert!(rewrite.text.starts_with("Well, the "), "{}", rewrite.text);
        assert!(!rewrite.text.to_lowercase().contains("thus"));
        assert_eq!(rewrite.counts.transitions_stripped, 1);
        assert_eq!(rewrite.counts.starters, 1);
    }

    #[test]
    fn all_branches_fire_with_zero_draws() {
        let h = Humanizer::new(Hyperparameters::default()).unwrap();
        let text = "The cat sat on the warm mat today. The dog slept near the old door.";
        let rewrite = h.humanize_with_report(text, &mut Fixed(0.0));
        assert_eq!(rewrite.counts.sentences, 2);
        assert_eq!(rewrite.counts.starters, 2);
        assert_eq!(rewrite.counts.fillers, 2);
        assert_eq!(rewrite.counts.connectors, 1);
        assert_eq!(rewrite.counts.grammar_rules, 12);
        assert!(rewrite.text.contains("and then, well, "), "{}", rewrite.text);
    }

    #[test]
    fn no_branch_fires_with_high_draws() {
        let h = Humanizer::new(Hyperparameters::default()).unwrap();
        let text = "The cat sat on the warm mat today. The dog slept near the old door.";
        let rewrite = h.humanize_with_report(text, &mut Fixed(0.999));
        assert_eq!(rewrite.text, text);
        assert_eq!(rewrite.counts.starters + rewrite.counts.fillers, 0);
    }

    #[test]
    fn exclamation_when_ellipsis_draw_fails() {
        let hp = Hyperparameters {
            exclamation_probability: 1.0,
            ..Hyperparameters::deterministic()
        };
        let h = Humanizer::new(hp).unwrap();
        let rewrite = h.humanize_with_report("The sun rose. The birds sang.", &mut Fixed(0.5));
        assert_eq!(rewrite.text, "The sun rose!. The birds sang.!");
        assert_eq!(rewrite.counts.exclamations, 2);
        assert_eq!(rewrite.counts.ellipses, 0);
    }

    #[test]
    fn exclamation_draw_only_after_failed_ellipsis() {
        let hp = Hyperparameters {
            ellipsis_probability: 0.5,
            exclamation_probability: 0.5,
            ..Hyperparameters::deterministic()
        };
        let h = Humanizer::new(hp).unwrap();
        let mut counts = MutationCounts::default();
        // fragment one: ellipsis misses, exclamation hits; fragment two: ellipsis hits
        let mut rng = Script::new(&[0.9, 0.1, 0.1]);
        let out = h.add_casual_punctuation("The sun rose. The birds sang.", &mut rng, &mut counts);
        assert_eq!(out, "The sun rose!. The birds sang....");
        assert_eq!((counts.ellipses, counts.exclamations), (1, 1));
        assert!(rng.0.is_empty());
    }

    #[test]
    fn fragment_never_gets_both_marks() {
        let hp = Hyperparameters {
            ellipsis_probability: 1.0,
            exclamation_probability: 1.0,
            ..Hyperparameters::deterministic()
        };
        let h = Humanizer::new(hp).unwrap();
        let rewrite = h.humanize_with_report("The sun rose. The birds sang.", &mut Fixed(0.0));
        assert_eq!(rewrite.text, "The sun rose.... The birds sang....");
        assert_eq!(rewrite.counts.exclamations, 0);

        let hp = Hyperparameters {
            ellipsis_probability: 0.5,
            exclamation_probability: 0.5,
            ..Hyperparameters::deterministic()
        };
        let h = Humanizer::new(hp).unwrap();
        for seed in 0..300 {
            let mut rng = StdRng::seed_from_u64(seed);
            let rewrite = h.humanize_with_report("The sun rose. The birds sang.", &mut rng);
            assert!(!rewrite.text.contains("...!"), "seed {seed}: {}", rewrite.text);
            assert!(!rewrite.text.contains("!..."), "seed {seed}: {}", rewrite.text);
            assert!(rewrite.counts.ellipses + rewrite.counts.exclamations <= 2);
        }
    }

    #[test]
    fn first_sentence_never_gets_connector() {
        let hp = Hyperparameters {
            connector_probability: 1.0,
            ..Hyperparameters::deterministic()
        };
        let h = Humanizer::new(hp).unwrap();
        let rewrite = h.humanize_with_report("Only one sentence here.", &mut Fixed(0.0));
        assert_eq!(rewrite.counts.connectors, 0);
        assert_eq!(rewrite.text, "Only one sentence here.");

        let rewrite = h.humanize_with_report("The fox ran. The dog sat.", &mut Fixed(0.0));
        assert_eq!(rewrite.counts.connectors, 1);
        assert!(rewrite.text.starts_with("The fox ran. "), "{}", rewrite.text);
    }

    #[test]
    fn filler_never_splits_contraction() {
        let h = deterministic();
        // first candidate position (2) would fall between "do" and "not"
        let out = h.insert_filler("We do not want this thing", &mut Fixed(0.0)).unwrap();
        assert_eq!(out, "We do not you know, want this thing");
    }

    #[test]
    fn filler_position_bounds() {
        let h = deterministic();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = h.insert_filler("one two three four five six", &mut rng).unwrap();
            let words: Vec<&str> = out.split_whitespace().collect();
            assert_eq!(&words[..2], &["one", "two"]);
            assert_eq!(words.last(), Some(&"six"));
        }
    }

    #[test]
    fn starter_keeps_pronoun_capital() {
        assert_eq!(lowercase_first("I think so."), "I think so.");
        assert_eq!(lowercase_first("I'm sure."), "I'm sure.");
        assert_eq!(lowercase_first("It works."), "it works.");
        assert_eq!(lowercase_first("The NASA team won."), "the NASA team won.");
        assert_eq!(lowercase_first(""), "");
    }

    #[test]
    fn capitalize_handles_unicode() {
        assert_eq!(capitalize_first("éclair time"), "Éclair time");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn missing_resources_fall_back_to_punctuation() {
        let hp = Hyperparameters {
            splitter: SplitterKind::Unicode,
            resource_dir: Some("/nonexistent/humanizer".into()),
            ..Hyperparameters::deterministic()
        };
        let h = Humanizer::new(hp).unwrap();
        let rewrite = h.humanize_with_report("First one. Second one.", &mut Fixed(0.0));
        assert!(rewrite.fell_back);
        assert_eq!(rewrite.splitter, "punctuation");
        assert_eq!(rewrite.counts.sentences, 2);
        assert_eq!(rewrite.text, "First one. Second one.");
    }

    #[test]
    fn humanizer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Humanizer>();
    }
}
