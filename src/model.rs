//! Pre-trained multinomial Naive Bayes model.
//!
//! The model is read once from a JSON file at startup, validated, and then
//! shared read-only between all request handlers.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::error::ModelError;

const PRIOR_SUM_TOLERANCE: f64 = 1e-6;

/// On-disk layout of the model file, before validation.
#[derive(Debug, Deserialize)]
struct ModelFile {
    alpha: f64,
    vocab: Vec<String>,
    class_priors: BTreeMap<String, f64>,
    class_total_words: BTreeMap<String, u64>,
    word_counts: BTreeMap<String, HashMap<String, u64>>,
}

/// Per-class parameters. Only built once the class is known to have a
/// prior, a word total and a count table.
#[derive(Debug, Clone)]
pub struct ClassStats {
    pub prior: f64,
    pub total_words: u64,
    word_counts: HashMap<String, u64>,
}

impl ClassStats {
    /// Training count of `token`, zero when never observed.
    pub fn word_count(&self, token: &str) -> u64 {
        self.word_counts.get(token).copied().unwrap_or(0)
    }
}

/// Validated, immutable classifier parameters.
#[derive(Debug, Clone)]
pub struct Model {
    alpha: f64,
    vocab: Vec<String>,
    vocab_set: HashSet<String>,
    classes: BTreeMap<String, ClassStats>,
}

/// Summary of the loaded model exposed on `GET /model`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ModelInfo {
    pub classes: Vec<String>,
    pub priors: BTreeMap<String, f64>,
    pub vocab_size: usize,
    pub alpha: f64,
}

impl Model {
    /// Builds a model from its parts, checking that every class with a prior
    /// also has a word total and a count table.
    pub fn new(
        alpha: f64,
        vocab: Vec<String>,
        class_priors: BTreeMap<String, f64>,
        mut class_total_words: BTreeMap<String, u64>,
        mut word_counts: BTreeMap<String, HashMap<String, u64>>,
    ) -> Result<Self, ModelError> {
        if !alpha.is_finite() || alpha <= 0.0 {
            return Err(ModelError::InvalidAlpha(alpha));
        }
        // Every smoothed ratio must stay a finite, non-zero f64.
        let vocab_mass = alpha * vocab.len() as f64;
        if !vocab_mass.is_finite() {
            return Err(ModelError::InvalidAlpha(alpha));
        }
        if class_priors.is_empty() {
            return Err(ModelError::NoClasses);
        }

        let prior_sum: f64 = class_priors.values().sum();
        if (prior_sum - 1.0).abs() > PRIOR_SUM_TOLERANCE {
            warn!("Class priors sum to {} instead of 1", prior_sum);
        }

        let mut classes = BTreeMap::new();
        for (class, prior) in class_priors {
            if !prior.is_finite() || prior <= 0.0 || prior > 1.0 {
                return Err(ModelError::InvalidPrior { class, prior });
            }
            let Some(total_words) = class_total_words.remove(&class) else {
                return Err(ModelError::MissingClass {
                    class,
                    table: "class_total_words",
                });
            };
            let Some(counts) = word_counts.remove(&class) else {
                return Err(ModelError::MissingClass {
                    class,
                    table: "word_counts",
                });
            };
            if alpha / (total_words as f64 + vocab_mass) == 0.0 {
                return Err(ModelError::InvalidAlpha(alpha));
            }

            classes.insert(
                class,
                ClassStats {
                    prior,
                    total_words,
                    word_counts: counts,
                },
            );
        }

        for class in class_total_words.keys().chain(word_counts.keys()) {
            warn!("Ignoring counts for class '{}' which has no prior", class);
        }

        let vocab_set: HashSet<String> = vocab.iter().cloned().collect();
        if vocab_set.len() != vocab.len() {
            warn!(
                "Vocabulary has {} duplicate entries",
                vocab.len() - vocab_set.len()
            );
        }

        Ok(Self {
            alpha,
            vocab,
            vocab_set,
            classes,
        })
    }

    /// Parses and validates a model from its JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let file: ModelFile = serde_json::from_str(json)?;
        Self::new(
            file.alpha,
            file.vocab,
            file.class_priors,
            file.class_total_words,
            file.word_counts,
        )
    }

    /// Reads the model file at `path`. Any failure here should stop the
    /// process before it starts serving.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let model = Self::from_json_str(&json)?;

        info!(
            "Loaded model from {}: {} classes, {} vocabulary entries, alpha {}",
            path.display(),
            model.classes.len(),
            model.vocab.len(),
            model.alpha
        );
        Ok(model)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Length of the vocabulary list as stored in the model file.
    pub fn vocab_len(&self) -> usize {
        self.vocab.len()
    }

    pub fn in_vocab(&self, token: &str) -> bool {
        self.vocab_set.contains(token)
    }

    /// Class labels in lexicographic order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Classes with their parameters, in label order.
    pub fn class_stats(&self) -> impl Iterator<Item = (&str, &ClassStats)> {
        self.classes.iter().map(|(class, stats)| (class.as_str(), stats))
    }

    pub fn prior(&self, class: &str) -> Option<f64> {
        self.classes.get(class).map(|stats| stats.prior)
    }

    pub fn total_words(&self, class: &str) -> Option<u64> {
        self.classes.get(class).map(|stats| stats.total_words)
    }

    /// Training count of `token` for `class`, zero when never observed.
    pub fn word_count(&self, class: &str, token: &str) -> u64 {
        self.classes
            .get(class)
            .map(|stats| stats.word_count(token))
            .unwrap_or(0)
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            classes: self.classes().map(str::to_string).collect(),
            priors: self
                .class_stats()
                .map(|(class, stats)| (class.to_string(), stats.prior))
                .collect(),
            vocab_size: self.vocab.len(),
            alpha: self.alpha,
        }
    }
}
