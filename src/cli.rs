use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use jmatch::Scorer;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Annotate journal names with reference metadata via fuzzy lookup
    Lookup {
        /// Reference file: a JSON array of objects, each carrying the journal
        /// name plus its metadata
        #[arg(short, long, value_name = "FILE")]
        reference: PathBuf,

        /// Field in each reference object holding the journal name
        #[arg(long, default_value = "name")]
        name_field: String,

        /// Minimum similarity score (0-100) for a fuzzy candidate to count
        #[arg(short, long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(0..=100))]
        threshold: u8,

        /// Similarity scorer
        #[arg(short, long, value_enum, default_value_t = ScorerArg::Ratio)]
        scorer: ScorerArg,

        /// Normalization cache capacity; 0 disables the memo
        #[arg(long, default_value_t = 1024)]
        cache: usize,

        /// Emit one JSON object per query instead of tab-separated columns
        #[arg(long)]
        json: bool,

        /// Names to look up; read from stdin, one per line, when empty
        #[arg(value_name = "NAME")]
        names: Vec<String>,
    },
    /// Print the canonical comparison key for each name
    Normalize {
        #[arg(value_name = "NAME")]
        names: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ScorerArg {
    /// Normalized edit-distance ratio over the whole key
    Ratio,
    /// Edit-distance ratio after sorting tokens, order-insensitive
    TokenSort,
}

impl From<ScorerArg> for Scorer {
    fn from(arg: ScorerArg) -> Self {
        match arg {
            ScorerArg::Ratio => Scorer::Ratio,
            ScorerArg::TokenSort => Scorer::TokenSort,
        }
    }
}
