//! Offline classifier: `classify [--model PATH] [TEXT...]`.
//!
//! Reads the review from the arguments, or from stdin when none are given,
//! and prints the prediction as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use std::io::Read;
use std::path::PathBuf;

use review_sentiment::classifier;
use review_sentiment::config::Config;
use review_sentiment::model::Model;
use review_sentiment::normalizer::normalize;

#[derive(Parser, Debug)]
#[command(
    name = "classify",
    about = "Classify a movie review with a Naive Bayes model file."
)]
struct Args {
    /// Model JSON file; defaults to MODEL_PATH or nb_model.json
    #[arg(long)]
    model: Option<PathBuf>,

    /// Review text; read from stdin when omitted
    text: Vec<String>,
}

fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    let model_path = match args.model {
        Some(path) => path,
        None => Config::from_env()?.model_path,
    };
    let model = Model::load(&model_path)
        .with_context(|| format!("could not load model from {}", model_path.display()))?;

    let text = if args.text.is_empty() {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read review from stdin")?;
        buf
    } else {
        args.text.join(" ")
    };

    let tokens = normalize(&text);
    let known = tokens.iter().filter(|t| model.in_vocab(t)).count();
    eprintln!("{} tokens, {} in vocabulary", tokens.len(), known);

    let prediction = classifier::predict_tokens(&tokens, &model);
    println!("{}", serde_json::to_string_pretty(&prediction)?);
    Ok(())
}
