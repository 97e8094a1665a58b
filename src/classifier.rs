//! Multinomial Naive Bayes scoring with Laplace smoothing.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;
use utoipa::ToSchema;

use crate::model::Model;
use crate::normalizer::normalize;

/// Winning label and the full posterior distribution.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Prediction {
    pub label: String,
    pub probabilities: BTreeMap<String, f64>,
}

/// Computes the posterior distribution over classes for `tokens`.
///
/// Tokens outside the model vocabulary contribute nothing, so an empty or
/// fully out-of-vocabulary sequence yields the normalized priors.
pub fn predict_proba<S: AsRef<str>>(tokens: &[S], model: &Model) -> BTreeMap<String, f64> {
    let vocab_mass = model.alpha() * model.vocab_len() as f64;

    let log_scores: BTreeMap<&str, f64> = model
        .class_stats()
        .map(|(class, stats)| {
            let denom = stats.total_words as f64 + vocab_mass;

            let log_score = tokens
                .iter()
                .map(AsRef::<str>::as_ref)
                .filter(|token| model.in_vocab(token))
                .map(|token| {
                    let count = stats.word_count(token) as f64;
                    ((count + model.alpha()) / denom).ln()
                })
                .fold(stats.prior.ln(), |acc, term| acc + term);

            (class, log_score)
        })
        .collect();

    // Shift by the max so the largest term is exp(0).
    let max_log = log_scores
        .values()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let exps: BTreeMap<&str, f64> = log_scores
        .into_iter()
        .map(|(class, score)| (class, (score - max_log).exp()))
        .collect();
    let total: f64 = exps.values().sum();

    exps.into_iter()
        .map(|(class, e)| (class.to_string(), e / total))
        .collect()
}

/// Label with the highest probability. Exact ties go to the
/// lexicographically smallest label.
pub fn best_label(probabilities: &BTreeMap<String, f64>) -> Option<&str> {
    let mut best: Option<(&str, f64)> = None;
    for (label, &p) in probabilities {
        match best {
            Some((_, best_p)) if p <= best_p => {}
            _ => best = Some((label.as_str(), p)),
        }
    }
    best.map(|(label, _)| label)
}

/// Normalizes `text` and classifies it against `model`.
pub fn predict(text: &str, model: &Model) -> Prediction {
    predict_tokens(&normalize(text), model)
}

/// Classifies an already normalized token sequence.
pub fn predict_tokens<S: AsRef<str>>(tokens: &[S], model: &Model) -> Prediction {
    let probabilities = predict_proba(tokens, model);
    // A validated model always has at least one class.
    let label = best_label(&probabilities).unwrap_or_default().to_string();

    debug!(
        "Classified {} tokens as '{}' ({:.4})",
        tokens.len(),
        label,
        probabilities.get(&label).copied().unwrap_or_default()
    );

    Prediction {
        label,
        probabilities,
    }
}
