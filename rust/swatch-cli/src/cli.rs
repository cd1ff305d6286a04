use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use swatch_names::config::{
    DEFAULT_STATE_SIZE, DEFAULT_VENDORS, DEFAULT_VOCABULARY_SIZE, MAX_ITERATIONS,
};

#[derive(Debug, Parser)]
#[command(name = "swatch")]
#[command(bin_name = "swatch")]
#[command(
    about = "Learn paint color names from vendor catalogs and invent new ones",
    long_about = None
)]
pub struct SwatchCli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the vocabulary, pattern table and language model
    Train(TrainArgs),
    /// Name one or more RGB colors using trained artifacts
    Generate(GenerateArgs),
}

fn default_vendors() -> Vec<String> {
    DEFAULT_VENDORS.iter().map(|v| v.to_string()).collect()
}

#[derive(Debug, Args)]
pub struct TrainArgs {
    /// Directory holding one `<vendor>/db.csv` per vendor
    #[arg(long)]
    pub data: PathBuf,

    /// Directory the artifacts are written to
    #[arg(long)]
    pub out: PathBuf,

    #[arg(long = "vendor", default_values_t = default_vendors())]
    pub vendors: Vec<String>,

    #[arg(long, default_value_t = DEFAULT_VOCABULARY_SIZE)]
    pub vocabulary_size: usize,

    #[arg(long, default_value_t = DEFAULT_STATE_SIZE)]
    pub state_size: usize,

    /// JSON sense graph used to find words related to each color
    #[arg(long)]
    pub hierarchy: Option<PathBuf>,

    /// JSON map of word to POS tag, overriding the built-in rules; stored
    /// with the artifacts and reused by `generate`
    #[arg(long)]
    pub lexicon: Option<PathBuf>,

    /// Replaces the default stoplist when given at least once
    #[arg(long = "stopword")]
    pub stopwords: Vec<String>,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[arg(long)]
    pub artifacts: PathBuf,

    /// Target colors as `r,g,b` or `#rrggbb`; read from stdin when absent
    pub colors: Vec<String>,

    #[arg(long, default_value_t = 1)]
    pub neighbours: usize,

    #[arg(long, default_value_t = MAX_ITERATIONS)]
    pub max_iterations: usize,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Also aim for patterns without a color term
    #[arg(long)]
    pub all_patterns: bool,

    /// Reject candidates that copy a training name
    #[arg(long)]
    pub novel: bool,
}
