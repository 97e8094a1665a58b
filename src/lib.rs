//! Movie review sentiment classification with a pre-trained Naive Bayes model.

pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod model;
pub mod normalizer;
pub mod render;
