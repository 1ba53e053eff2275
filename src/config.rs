use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HumanizerError, Result};
use crate::splitter::SplitterKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Hyperparameters {
    pub starter_probability: f64,
    pub filler_probability: f64,
    pub connector_probability: f64,
    pub ellipsis_probability: f64,
    pub exclamation_probability: f64,
    pub casual_tag_probability: f64,
    pub grammar_probability: f64,
    pub starter_min_words: usize,
    pub filler_min_words: usize,
    pub splitter: SplitterKind,
    /// Directory holding `abbreviations.txt`; bundled list when unset.
    pub resource_dir: Option<PathBuf>,
    /// Extra `[formal, casual]` pairs applied after the built-in vocabulary.
    pub extra_vocabulary: Vec<(String, String)>,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            starter_probability: 0.30,
            filler_probability: 0.20,
            connector_probability: 0.40,
            ellipsis_probability: 0.10,
            exclamation_probability: 0.05,
            casual_tag_probability: 0.15,
            grammar_probability: 0.30,
            starter_min_words: 3,
            filler_min_words: 5,
            splitter: SplitterKind::Unicode,
            resource_dir: None,
            extra_vocabulary: Vec::new(),
        }
    }
}

impl Hyperparameters {
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| HumanizerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let hp: Self = serde_json::from_str(&contents)?;
        hp.validate()?;
        log::info!("loaded hyperparameters from {}", path.display());
        Ok(hp)
    }

    pub fn validate(&self) -> Result<()> {
        let probabilities = [
            ("starter_probability", self.starter_probability),
            ("filler_probability", self.filler_probability),
            ("connector_probability", self.connector_probability),
            ("ellipsis_probability", self.ellipsis_probability),
            ("exclamation_probability", self.exclamation_probability),
            ("casual_tag_probability", self.casual_tag_probability),
            ("grammar_probability", self.grammar_probability),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(HumanizerError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if let Some((source, _)) = self
            .extra_vocabulary
            .iter()
            .find(|(source, _)| source.trim().is_empty())
        {
            return Err(HumanizerError::InvalidConfig(format!(
                "extra_vocabulary contains an empty source phrase ({source:?})"
            )));
        }
        Ok(())
    }

    /// Every randomized stage switched off; only the fixed rewrites remain.
    pub fn deterministic() -> Self {
        Self {
            starter_probability: 0.0,
            filler_probability: 0.0,
            connector_probability: 0.0,
            ellipsis_probability: 0.0,
            exclamation_probability: 0.0,
            casual_tag_probability: 0.0,
            grammar_probability: 0.0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        assert!(Hyperparameters::default().validate().is_ok());
        assert!(Hyperparameters::deterministic().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let hp: Hyperparameters =
            serde_json::from_str(r#"{"filler_probability": 0.5, "splitter": "punctuation"}"#)
                .unwrap();
        assert_eq!(hp.filler_probability, 0.5);
        assert_eq!(hp.starter_probability, 0.30);
        assert_eq!(hp.splitter, SplitterKind::Punctuation);
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let hp = Hyperparameters {
            connector_probability: 1.5,
            ..Hyperparameters::default()
        };
        let err = hp.validate().unwrap_err();
        assert!(err.to_string().contains("connector_probability"));
    }

    #[test]
    fn rejects_unknown_fields() {
        let parsed: std::result::Result<Hyperparameters, _> =
            serde_json::from_str(r#"{"intensity": 9}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"grammar_probability": 1.0, "extra_vocabulary": [["leverage", "use"]]}}"#
        )
        .unwrap();
        let hp = Hyperparameters::load_from(file.path()).unwrap();
        assert_eq!(hp.grammar_probability, 1.0);
        assert_eq!(
            hp.extra_vocabulary,
            vec![("leverage".to_string(), "use".to_string())]
        );
    }

    #[test]
    fn load_from_missing_file_is_io_error() {
        let err = Hyperparameters::load_from(Path::new("/nonexistent/hp.json")).unwrap_err();
        assert!(matches!(err, HumanizerError::Io { .. }));
    }
}
