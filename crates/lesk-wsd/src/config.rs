use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::corpus::{CorpusOptions, DEFAULT_MAX_FIELD_LEN, DEFAULT_MAX_SENTENCE_LEN, FieldLimits};
use crate::evaluate::MatchPolicy;
use crate::lesk::SignatureMode;
use crate::tokenize::{DEFAULT_MAX_TOKENS, Tokenizer};

pub const DEFAULT_LEXICON_PATH: &str = "/usr/share/wordnet";
pub const DEFAULT_CORPUS_PATH: &str = "semcor/brown1/tagfiles";
pub const DEFAULT_POOL_SIZE: usize = 500;
pub const DEFAULT_SAMPLE_SIZE: usize = 50;
pub const DEFAULT_MAX_FILES: usize = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Evaluation settings. Every key is optional in the TOML form.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub max_tokens_per_text: usize,
    /// Drop stopwords and non-alphabetic tokens before scoring.
    pub filter_stopwords: bool,
    /// Replaces the built-in English list when set.
    pub stopwords: Option<Vec<String>>,
    pub max_sentence_len: usize,
    pub max_field_len: usize,
    pub max_sentence_pool_size: usize,
    pub sample_size: usize,
    pub max_files_scanned: usize,
    pub lexicon_search_path: PathBuf,
    pub corpus_path: PathBuf,
    /// Reduce inflected target words to WordNet base forms.
    pub lemmatize: bool,
    pub signature: SignatureMode,
    /// Fixed RNG seed; entropy when absent.
    pub seed: Option<u64>,
    pub matching: MatchPolicy,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_tokens_per_text: DEFAULT_MAX_TOKENS,
            filter_stopwords: false,
            stopwords: None,
            max_sentence_len: DEFAULT_MAX_SENTENCE_LEN,
            max_field_len: DEFAULT_MAX_FIELD_LEN,
            max_sentence_pool_size: DEFAULT_POOL_SIZE,
            sample_size: DEFAULT_SAMPLE_SIZE,
            max_files_scanned: DEFAULT_MAX_FILES,
            lexicon_search_path: PathBuf::from(DEFAULT_LEXICON_PATH),
            corpus_path: PathBuf::from(DEFAULT_CORPUS_PATH),
            lemmatize: true,
            signature: SignatureMode::default(),
            seed: None,
            matching: MatchPolicy::default(),
        }
    }
}

impl EvalConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tokens_per_text == 0 {
            return Err(ConfigError::Invalid(
                "max_tokens_per_text must be at least 1".into(),
            ));
        }
        if let MatchPolicy::Keywords { rules } = &self.matching
            && rules.is_empty()
        {
            return Err(ConfigError::Invalid(
                "keyword matching needs at least one rule".into(),
            ));
        }
        Ok(())
    }

    pub fn tokenizer(&self) -> Tokenizer {
        let tokenizer = Tokenizer::new(self.max_tokens_per_text);
        match (self.filter_stopwords, &self.stopwords) {
            (false, _) => tokenizer,
            (true, Some(words)) => tokenizer.with_stopwords(words),
            (true, None) => tokenizer.with_english_stopwords(),
        }
    }

    pub fn field_limits(&self) -> FieldLimits {
        FieldLimits {
            max_sentence_len: self.max_sentence_len,
            max_field_len: self.max_field_len,
        }
    }

    pub fn corpus_options(&self) -> CorpusOptions {
        CorpusOptions {
            max_files_scanned: self.max_files_scanned,
            pool_capacity: self.max_sentence_pool_size,
            limits: self.field_limits(),
        }
    }
}
