// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Credibility check CLI
//!
//! Usage:
//!   credibility-check --text "Officials confirmed ..." --url https://www.reuters.com/x
//!   credibility-check --file article.txt --history history.jsonl --json
//!   credibility-check --batch articles.csv
//!   credibility-check --history history.jsonl --export 3

use anyhow::{bail, Context, Result};
use clap::Parser;
use credibility_scorer::batch::{analyze_batch_with, read_articles};
use credibility_scorer::history::{AnalysisRecord, HistoryStore};
use credibility_scorer::{CredibilityDetector, ScoreResult, ScorerConfig, TrainingSummary};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "credibility-check")]
#[command(about = "Score the credibility of news text")]
#[command(version)]
struct Args {
    /// Text to analyze
    #[arg(short, long, conflicts_with_all = ["file", "batch"])]
    text: Option<String>,

    /// File containing the text to analyze
    #[arg(short, long, conflicts_with = "batch")]
    file: Option<PathBuf>,

    /// Source URL of the article (used for source credibility only)
    #[arg(short, long)]
    url: Option<String>,

    /// CSV file with `content` and `url` columns
    #[arg(short, long)]
    batch: Option<PathBuf>,

    /// JSON Lines file to store analyses in
    #[arg(long)]
    history: Option<PathBuf>,

    /// Print a stored analysis by id
    #[arg(long, requires = "history")]
    export: Option<u64>,

    /// Print the training summary of the model ensemble
    #[arg(long)]
    models: bool,

    /// Skip model training and score with heuristic rules only
    #[arg(long)]
    heuristic_only: bool,

    /// Machine-readable JSON output
    #[arg(long)]
    json: bool,

    /// Configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed for model training
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ScorerConfig::from_json_file(path)?,
        None => ScorerConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate()?;

    let store = args.history.clone().map(HistoryStore::new);

    if let Some(id) = args.export {
        let Some(store) = &store else {
            bail!("--export requires --history");
        };
        let Some(export) = store.export(id)? else {
            bail!("Analysis {} not found in {}", id, store.path().display());
        };
        println!("{}", serde_json::to_string_pretty(&export)?);
        return Ok(());
    }

    let detector = if args.heuristic_only {
        CredibilityDetector::heuristic_only(config)
    } else {
        CredibilityDetector::new(config)
    };

    if args.models {
        print_models(detector.training_summary(), args.json)?;
        if args.text.is_none() && args.file.is_none() && args.batch.is_none() {
            return Ok(());
        }
    }

    if let Some(path) = &args.batch {
        return run_batch(&detector, path, args.json);
    }

    let text = match (&args.text, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read text from stdin")?;
            buf
        }
    };

    let content = detector.check_content(&text)?;
    let url = args.url.as_deref();
    let result = detector.analyze(content, url);

    let saved = match &store {
        Some(store) => Some(store.append(AnalysisRecord::from_result(content, url, &result))?),
        None => None,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
        if let Some(record) = saved {
            println!("\nSaved as analysis {}", record.id);
        }
    }

    Ok(())
}

fn run_batch(detector: &CredibilityDetector, path: &Path, json: bool) -> Result<()> {
    let articles = read_articles(path)?;
    if articles.is_empty() {
        bail!("No articles provided in {}", path.display());
    }

    let considered = articles.len().min(detector.config().batch_limit);
    let pb = ProgressBar::new(considered as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Scoring: [{wide_bar:.cyan/blue}] {pos}/{len}")?
            .progress_chars("#>-"),
    );
    let results = analyze_batch_with(detector, &articles, |_| pb.inc(1));
    pb.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!("{:<8} {:<16} {:<40} {}", "Score", "Verdict", "URL", "Content");
    println!("{:-<100}", "");
    for item in &results {
        let verdict = if item.is_fake { "likely fake" } else { "likely credible" };
        let preview: String = item.content.chars().take(40).collect();
        println!(
            "{:<8.3} {:<16} {:<40} {}",
            item.credibility_score,
            verdict,
            item.url.as_deref().unwrap_or("-"),
            preview
        );
    }
    println!("{:-<100}", "");
    println!("{} of {} articles scored", results.len(), considered);
    Ok(())
}

fn print_models(summary: Option<&TrainingSummary>, json: bool) -> Result<()> {
    let Some(summary) = summary else {
        if json {
            println!("null");
        } else {
            println!("Trained models unavailable; scoring uses heuristic rules only");
        }
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!(
        "Training corpus: {} documents, vocabulary {} terms",
        summary.documents, summary.vocabulary_size
    );
    println!("{:-<60}", "");
    println!("{:<15} {:>12}  {}", "Model", "Train acc.", "Description");
    println!("{:-<60}", "");
    for c in &summary.classifiers {
        println!("{:<15} {:>12.4}  {}", c.name, c.training_accuracy, c.description);
    }
    println!("{:-<60}", "");
    Ok(())
}

fn print_result(result: &ScoreResult) {
    let d = &result.details;
    println!("{}", "=".repeat(60));
    println!("Credibility: {}% ({})", result.percentage(), result.verdict());
    println!("{}", "=".repeat(60));
    println!("Scoring path:   {}", d.scoring_path);
    println!("Heuristic:      {:.3}", d.heuristic_score);
    if let Some(p) = d.model_probability {
        println!("Model mean:     {:.3}", p);
    }
    println!("Keyword score:  {:.3}", d.keyword_score);
    println!("Sentiment:      {} ({:.3})", d.sentiment, d.sentiment_score);
    println!("Source score:   {:.3}", d.source_score);
    println!("Readability:    {:.3}", d.readability.score);
    println!("Length:         {} chars, {} words", d.length, d.word_count);
    if !d.keyword_indicators.is_empty() {
        println!("Indicators:     {}", d.keyword_indicators.join(", "));
    }
    let entities = &d.entities;
    if !entities.is_empty() {
        println!(
            "Entities:       {} organizations, {} locations, {} dates",
            entities.organizations.len(),
            entities.locations.len(),
            entities.dates.len()
        );
    }
    let top = result.explanation.top_features(5);
    if !top.is_empty() {
        let terms: Vec<String> = top.iter().map(|(t, w)| format!("{} ({:.3})", t, w)).collect();
        println!("Top terms:      {}", terms.join(", "));
    }
    println!("\n{}", result.explanation.summary);
}
