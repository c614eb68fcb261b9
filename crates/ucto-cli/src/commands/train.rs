//! Train command - learn candidate patterns from reviewer corrections.

use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use console::style;
use tracing::info;

use ucto_core::learning::{self, FeedbackStore, LearnedPatternSet};
use ucto_core::models::feedback::TrackedField;

use super::load_config;

/// Arguments for the train command.
#[derive(Args)]
pub struct TrainArgs {
    /// Feedback file, a JSON array of correction records
    #[arg(long)]
    feedback: Option<PathBuf>,

    /// Where to write the learned patterns
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of keywords kept per field
    #[arg(long)]
    top: Option<usize>,

    /// Print the learned patterns without writing them
    #[arg(long)]
    dry_run: bool,
}

pub async fn run(args: TrainArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let feedback_path = args.feedback.unwrap_or(config.learning.feedback_file);
    let output_path = args.output.unwrap_or(config.learning.output_file);
    let top = args.top.unwrap_or(config.learning.top_keywords);

    let store = FeedbackStore::new(&feedback_path);
    let batch = store.load();

    if !batch.skipped.is_empty() {
        eprintln!(
            "{} Skipped {} malformed feedback entries",
            style("⚠").yellow(),
            batch.skipped.len()
        );
        for skipped in &batch.skipped {
            eprintln!("  - {}", skipped);
        }
    }

    if batch.is_empty() {
        println!(
            "{} No feedback entries found in {}, nothing to learn",
            style("ℹ").blue(),
            feedback_path.display()
        );
        return Ok(());
    }

    let set = learning::train(&batch.entries, top).with_trained_at(Utc::now());
    set.validate()?;

    print_statistics(&set);
    print_patterns(&set);

    if args.dry_run {
        info!("Dry run, not writing {}", output_path.display());
        return Ok(());
    }

    set.save(&output_path)?;
    println!(
        "{} Learned patterns written to {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn print_statistics(set: &LearnedPatternSet) {
    let stats = &set.statistics;

    println!(
        "{} Analyzed {} feedback entries",
        style("ℹ").blue(),
        stats.total_feedback
    );
    println!("{}", style("Corrections:").bold());
    for field in TrackedField::ALL {
        println!("  {:<14} {}", field.as_str(), stats.corrections(field));
    }

    let currencies = stats
        .keywords(TrackedField::Currency)
        .filter(|tally| !tally.is_empty());
    if let Some(tally) = currencies {
        let listed: Vec<String> = tally.iter().map(|(c, n)| format!("{} ({})", c, n)).collect();
        println!("  corrected currencies: {}", listed.join(", "));
    }
    println!();
}

fn print_patterns(set: &LearnedPatternSet) {
    println!("{}", style("Learned patterns:").bold());

    for (field, patterns) in &set.patterns {
        println!("  {}", style(field).cyan());
        if patterns.is_empty() {
            println!("    {}", style("(no keywords found)").dim());
        }
        for pattern in patterns {
            println!(
                "    {:>3}x {:<12} {}",
                pattern.frequency, pattern.keyword, pattern.pattern
            );
        }
    }
    println!();
}
