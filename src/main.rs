use std::{
    io::{self, BufRead},
    path::Path,
};

use clap::Parser;
use indicatif::ProgressBar;
use owo_colors::OwoColorize;

use jmatch::{MatchConfig, Matcher, normalize, reference};

use crate::cli::{Cli, Command};

mod cli;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    match args.command {
        Command::Lookup {
            reference,
            name_field,
            threshold,
            scorer,
            cache,
            json,
            names,
        } => lookup(
            &reference,
            &name_field,
            MatchConfig {
                scorer: scorer.into(),
                threshold,
            },
            cache,
            json,
            names,
        ),
        Command::Normalize { names } => {
            for name in names {
                println!("{}", normalize(&name));
            }
            Ok(())
        }
    }
}

fn lookup(
    reference_path: &Path,
    name_field: &str,
    config: MatchConfig,
    cache: usize,
    json: bool,
    names: Vec<String>,
) -> anyhow::Result<()> {
    let reference = reference::load_json(reference_path, name_field)?;
    let queries = if names.is_empty() {
        stdin_names()?
    } else {
        names
    };

    let mut matcher = Matcher::new(&reference, config).with_cache(cache);

    // Only worth drawing a bar for batches where the scan time is visible.
    let bar = if queries.len() >= 100 {
        ProgressBar::new(queries.len() as u64)
    } else {
        ProgressBar::hidden()
    };

    let mut matched = 0usize;
    let mut unmatched = 0usize;
    for raw in &queries {
        let result = matcher.lookup(raw);
        if result.is_match() {
            matched += 1;
        } else {
            unmatched += 1;
        }

        if json {
            let line = serde_json::json!({
                "query": result.query,
                "matched_key": result.key,
                "score": result.score,
                "metadata": result.payloads,
            });
            bar.suspend(|| println!("{line}"));
        } else {
            let payloads = serde_json::to_string(result.payloads)?;
            bar.suspend(|| {
                println!(
                    "{}\t{}\t{}\t{}",
                    result.query,
                    result.key.unwrap_or(""),
                    result.score,
                    payloads
                )
            });
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    eprintln!("{} {}  {} {}", "✓".green(), matched, "✗".red(), unmatched);
    Ok(())
}

/// One query per stdin line; blank lines are skipped.
fn stdin_names() -> anyhow::Result<Vec<String>> {
    let mut names = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            names.push(line.to_string());
        }
    }
    Ok(names)
}
