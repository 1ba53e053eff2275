use std::fmt;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::{HumanizerError, Result};
use crate::random::RandomSource;
use crate::rewriter::Humanizer;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

macro_rules! labels {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Mode {
    Standard,
    #[default]
    Advanced,
    Professional,
    Creative,
}

labels!(Mode {
    Standard => "Standard",
    Advanced => "Advanced",
    Professional => "Professional",
    Creative => "Creative",
});

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum LanguageStyle {
    #[default]
    Casual,
    Professional,
    Academic,
    Creative,
    Conversational,
}

labels!(LanguageStyle {
    Casual => "Casual",
    Professional => "Professional",
    Academic => "Academic",
    Creative => "Creative",
    Conversational => "Conversational",
});

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Tone {
    #[default]
    Friendly,
    Formal,
    Witty,
    Serious,
    Enthusiastic,
}

labels!(Tone {
    Friendly => "Friendly",
    Formal => "Formal",
    Witty => "Witty",
    Serious => "Serious",
    Enthusiastic => "Enthusiastic",
});

pub const MIN_INTENSITY: u8 = 1;
pub const MAX_INTENSITY: u8 = 10;

/// Labels recorded with each run. They are bookkeeping only and do not
/// change what the rewrite does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "transformation_mode")]
    pub mode: Mode,
    pub intensity: u8,
    #[serde(rename = "language_mode")]
    pub language_style: LanguageStyle,
    #[serde(rename = "output_tone")]
    pub tone: Tone,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            intensity: 7,
            language_style: LanguageStyle::default(),
            tone: Tone::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_INTENSITY..=MAX_INTENSITY).contains(&self.intensity) {
            return Err(HumanizerError::InvalidConfig(format!(
                "intensity must be within [{MIN_INTENSITY}, {MAX_INTENSITY}], got {}",
                self.intensity
            )));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ---------------------------------------------------------------------------
// Simulated detection
// ---------------------------------------------------------------------------

/// Display-only "AI detection" number. It is a uniform random integer and
/// says nothing about the text.
pub struct SimulatedDetector;

impl SimulatedDetector {
    pub const MIN: u8 = 3;
    pub const MAX: u8 = 12;

    pub fn score<R: RandomSource>(rng: &mut R) -> u8 {
        rng.range_inclusive(Self::MIN as usize, Self::MAX as usize) as u8
    }
}

// ---------------------------------------------------------------------------
// Sample texts
// ---------------------------------------------------------------------------

pub const EXAMPLE_TEXT: &str = "The implementation of this advanced methodology will facilitate \
significant optimization and subsequently demonstrate substantial improvements in performance \
metrics through sophisticated algorithmic processing.";

pub const QUICK_TEST_TEXT: &str =
    "The implementation of this methodology demonstrates significant optimization.";

pub const SAMPLE_TEXTS: &[&str] = &[
    "The implementation of advanced machine learning algorithms has demonstrated significant \
improvements in operational efficiency and cost reduction metrics across multiple \
organizational departments.",
    "Furthermore, the utilization of sophisticated computational methodologies facilitates \
enhanced data processing capabilities and enables more comprehensive analytical frameworks.",
    "The optimization process requires careful consideration of multiple parameters to ensure \
maximum performance while maintaining system stability and resource efficiency.",
    "Subsequently, the comprehensive analysis indicates that substantial improvements can be \
attributed to the strategic implementation of innovative technological solutions.",
    "The deployment of artificial intelligence systems necessitates thorough evaluation of \
computational requirements and scalability considerations for optimal performance.",
];

pub fn random_sample<R: RandomSource>(rng: &mut R) -> &'static str {
    rng.choose(SAMPLE_TEXTS).copied().unwrap_or(EXAMPLE_TEXT)
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStats {
    pub original_words: usize,
    pub humanized_words: usize,
    pub original_chars: usize,
    pub humanized_chars: usize,
    pub change_percentage: f64,
}

impl TextStats {
    pub fn compute(original: &str, humanized: &str) -> Self {
        let original_words = original.split_whitespace().count();
        let humanized_words = humanized.split_whitespace().count();
        let change_percentage = if original_words > 0 {
            humanized_words as f64 / original_words as f64 * 100.0
        } else {
            0.0
        };
        Self {
            original_words,
            humanized_words,
            original_chars: original.chars().count(),
            humanized_chars: humanized.chars().count(),
            change_percentage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub readability: &'static str,
    pub complexity: &'static str,
    pub human_likeness: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionSummary {
    pub processed: usize,
    pub average_detection: f64,
}

// ---------------------------------------------------------------------------
// Transcript
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    pub timestamp: DateTime<Local>,
    pub input: String,
    pub output: String,
    #[serde(rename = "detection")]
    pub detection_score: u8,
    #[serde(flatten)]
    pub settings: Settings,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportStatistics {
    pub original_words: usize,
    pub humanized_words: usize,
    pub change_percentage: f64,
    pub ai_detection_score: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSettings {
    pub mode: Mode,
    pub intensity: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub timestamp: DateTime<Local>,
    pub original_text: String,
    pub humanized_text: String,
    pub statistics: ReportStatistics,
    pub settings: ReportSettings,
}

#[derive(Debug, Clone)]
struct Current {
    original: String,
    result: String,
    detection_score: u8,
}

pub struct Session {
    humanizer: Arc<Humanizer>,
    settings: Settings,
    history: Vec<TranscriptEntry>,
    current: Option<Current>,
}

impl Session {
    pub fn new(humanizer: Arc<Humanizer>, settings: Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            humanizer,
            settings,
            history: Vec::new(),
            current: None,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) -> Result<()> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    pub fn history(&self) -> &[TranscriptEntry] {
        &self.history
    }

    pub fn result(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.result.as_str())
    }

    pub fn detection_score(&self) -> Option<u8> {
        self.current.as_ref().map(|c| c.detection_score)
    }

    /// Rewrites `input`, scores it, and appends the run to the transcript.
    pub fn process<R: RandomSource>(&mut self, input: &str, rng: &mut R) -> Result<&TranscriptEntry> {
        if input.trim().is_empty() {
            return Err(HumanizerError::EmptyInput);
        }
        let output = self.humanizer.humanize(input, rng);
        let detection_score = SimulatedDetector::score(rng);
        self.current = Some(Current {
            original: input.to_string(),
            result: output.clone(),
            detection_score,
        });
        self.history.push(TranscriptEntry {
            timestamp: Local::now(),
            input: input.to_string(),
            output,
            detection_score,
            settings: self.settings,
        });
        log::debug!("session processed entry #{}", self.history.len());
        self.history
            .last()
            .ok_or_else(|| HumanizerError::Unexpected("transcript is empty after append".into()))
    }

    pub fn reprocess<R: RandomSource>(&mut self, rng: &mut R) -> Result<&str> {
        let current = self.current.as_mut().ok_or(HumanizerError::NothingProcessed)?;
        current.result = self.humanizer.humanize(&current.original, rng);
        Ok(&current.result)
    }

    pub fn enhance<R: RandomSource>(&mut self, rng: &mut R) -> Result<&str> {
        self.refine(2, rng)
    }

    /// Feeds the current result through `passes` more rewrites.
    pub fn refine<R: RandomSource>(&mut self, passes: usize, rng: &mut R) -> Result<&str> {
        let current = self.current.as_mut().ok_or(HumanizerError::NothingProcessed)?;
        for _ in 0..passes {
            current.result = self.humanizer.humanize(&current.result, rng);
        }
        Ok(&current.result)
    }

    /// Rewrites the quick-test sentence without touching the transcript.
    pub fn quick_test<R: RandomSource>(&self, rng: &mut R) -> String {
        self.humanizer.humanize(QUICK_TEST_TEXT, rng)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Forgets the current text; the transcript is kept.
    pub fn new_text(&mut self) {
        self.current = None;
    }

    pub fn summary(&self) -> SessionSummary {
        let total: u64 = self.history.iter().map(|e| u64::from(e.detection_score)).sum();
        SessionSummary {
            processed: self.history.len(),
            average_detection: total as f64 / self.history.len().max(1) as f64,
        }
    }

    pub fn stats(&self) -> Option<TextStats> {
        self.current
            .as_ref()
            .map(|c| TextStats::compute(&c.original, &c.result))
    }

    pub fn analysis(&self) -> Option<Analysis> {
        let current = self.current.as_ref()?;
        let words = current.result.split_whitespace().count();
        Some(Analysis {
            readability: if words < 50 { "High" } else { "Medium" },
            complexity: if current.detection_score < 10 { "Low" } else { "Medium" },
            human_likeness: if current.detection_score < 15 { "High" } else { "Medium" },
        })
    }

    pub fn export_text(&self) -> Result<String> {
        let current = self.current.as_ref().ok_or(HumanizerError::NothingProcessed)?;
        Ok(format!(
            "Original Text:\n{}\n\nHumanized Text:\n{}\n\nProcessing Details:\n- Mode: {}\n- Detection Score: {}%\n- Processed: {}\n",
            current.original,
            current.result,
            self.settings.mode,
            current.detection_score,
            Local::now().format("%Y-%m-%d %H:%M:%S"),
        ))
    }

    pub fn report(&self) -> Result<Report> {
        let current = self.current.as_ref().ok_or(HumanizerError::NothingProcessed)?;
        let stats = TextStats::compute(&current.original, &current.result);
        Ok(Report {
            timestamp: Local::now(),
            original_text: current.original.clone(),
            humanized_text: current.result.clone(),
            statistics: ReportStatistics {
                original_words: stats.original_words,
                humanized_words: stats.humanized_words,
                change_percentage: stats.change_percentage,
                ai_detection_score: current.detection_score,
            },
            settings: ReportSettings {
                mode: self.settings.mode,
                intensity: self.settings.intensity,
            },
        })
    }

    pub fn report_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.report()?)?)
    }

    pub fn write_text(&self, path: &Path) -> Result<()> {
        write_file(path, &self.export_text()?)
    }

    pub fn write_report(&self, path: &Path) -> Result<()> {
        write_file(path, &self.report_json()?)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|source| HumanizerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Hyperparameters;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session() -> Session {
        let humanizer = Arc::new(Humanizer::new(Hyperparameters::deterministic()).unwrap());
        Session::new(humanizer, Settings::default()).unwrap()
    }

    #[test]
    fn detection_score_is_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1000 {
            let score = SimulatedDetector::score(&mut rng);
            assert!((SimulatedDetector::MIN..=SimulatedDetector::MAX).contains(&score));
        }
    }

    #[test]
    fn quick_test_leaves_transcript_alone() {
        let s = session();
        let out = s.quick_test(&mut StdRng::seed_from_u64(2));
        assert!(!out.to_lowercase().contains("implementation"), "{out}");
        assert!(s.history().is_empty());
        assert!(s.result().is_none());
    }

    #[test]
    fn random_sample_covers_the_pool() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let sample = random_sample(&mut rng);
            assert!(SAMPLE_TEXTS.contains(&sample));
            seen.insert(sample);
        }
        assert_eq!(seen.len(), SAMPLE_TEXTS.len());
    }

    #[test]
    fn example_text_processes() {
        let mut s = session();
        let entry = s.process(EXAMPLE_TEXT, &mut StdRng::seed_from_u64(4)).unwrap();
        assert!(!entry.output.to_lowercase().contains("facilitate"));
        assert!(entry.output.to_lowercase().contains("help"), "{}", entry.output);
    }

    #[test]
    fn empty_input_is_rejected() {
        let mut s = session();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(s.process("   ", &mut rng), Err(HumanizerError::EmptyInput)));
        assert!(s.history().is_empty());
    }

    #[test]
    fn process_appends_to_history() {
        let mut s = session();
        let mut rng = StdRng::seed_from_u64(1);
        let entry = s.process("We will utilize this.", &mut rng).unwrap();
        assert_eq!(entry.output, "We'll use this.");
        assert_eq!(entry.settings.mode, Mode::Advanced);
        s.process("I do not know.", &mut rng).unwrap();
        assert_eq!(s.history().len(), 2);
        assert_eq!(s.result(), Some("I don't know."));
    }

    #[test]
    fn summary_of_empty_session() {
        let s = session();
        assert_eq!(
            s.summary(),
            SessionSummary {
                processed: 0,
                average_detection: 0.0
            }
        );
    }

    #[test]
    fn summary_averages_scores() {
        let mut s = session();
        let mut rng = StdRng::seed_from_u64(9);
        s.process("First text here.", &mut rng).unwrap();
        s.process("Second text here.", &mut rng).unwrap();
        let expected = s
            .history()
            .iter()
            .map(|e| e.detection_score as f64)
            .sum::<f64>()
            / 2.0;
        assert_eq!(s.summary().processed, 2);
        assert!((s.summary().average_detection - expected).abs() < 1e-9);
    }

    #[test]
    fn reprocess_and_enhance_need_a_result() {
        let mut s = session();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(s.reprocess(&mut rng), Err(HumanizerError::NothingProcessed)));
        assert!(matches!(s.enhance(&mut rng), Err(HumanizerError::NothingProcessed)));
        s.process("We will utilize this.", &mut rng).unwrap();
        assert_eq!(s.reprocess(&mut rng).unwrap(), "We'll use this.");
        assert_eq!(s.enhance(&mut rng).unwrap(), "We'll use this.");
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn clear_and_new_text() {
        let mut s = session();
        let mut rng = StdRng::seed_from_u64(1);
        s.process("Some text to rewrite.", &mut rng).unwrap();
        s.new_text();
        assert!(s.result().is_none());
        assert_eq!(s.history().len(), 1);
        s.clear_history();
        assert!(s.history().is_empty());
    }

    #[test]
    fn stats_compute() {
        let stats = TextStats::compute("one two three four", "one two");
        assert_eq!(stats.original_words, 4);
        assert_eq!(stats.humanized_words, 2);
        assert_eq!(stats.original_chars, 18);
        assert!((stats.change_percentage - 50.0).abs() < 1e-9);
        assert_eq!(TextStats::compute("", "x").change_percentage, 0.0);
    }

    #[test]
    fn text_export_layout() {
        let mut s = session();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(s.export_text().is_err());
        s.process("We will utilize this.", &mut rng).unwrap();
        let text = s.export_text().unwrap();
        assert!(text.starts_with("Original Text:\nWe will utilize this.\n\nHumanized Text:\nWe'll use this.\n"));
        assert!(text.contains("- Mode: Advanced\n"));
        assert!(text.contains(&format!("- Detection Score: {}%", s.detection_score().unwrap())));
    }

    #[test]
    fn json_report_is_valid() {
        let mut s = session();
        let mut rng = StdRng::seed_from_u64(1);
        s.process("We will utilize this.", &mut rng).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&s.report_json().unwrap()).unwrap();
        assert_eq!(parsed["original_text"], "We will utilize this.");
        assert_eq!(parsed["statistics"]["original_words"], 4);
        assert_eq!(parsed["settings"]["mode"], "Advanced");
        assert_eq!(parsed["settings"]["intensity"], 7);
        assert!(parsed.get("timestamp").is_some());
    }

    #[test]
    fn settings_json_uses_export_names() {
        let json = Settings::default().to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["transformation_mode"], "Advanced");
        assert_eq!(parsed["language_mode"], "Casual");
        assert_eq!(parsed["output_tone"], "Friendly");
        assert_eq!(parsed["intensity"], 7);
    }

    #[test]
    fn intensity_is_bounded() {
        let settings = Settings {
            intensity: 11,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
        let humanizer = Arc::new(Humanizer::new(Hyperparameters::deterministic()).unwrap());
        assert!(Session::new(humanizer, settings).is_err());
    }

    #[test]
    fn analysis_labels() {
        let mut s = session();
        let mut rng = StdRng::seed_from_u64(2);
        assert!(s.analysis().is_none());
        s.process("Short text here.", &mut rng).unwrap();
        let analysis = s.analysis().unwrap();
        assert_eq!(analysis.readability, "High");
        // simulated scores never exceed 12
        assert_eq!(analysis.human_likeness, "High");
    }
}
