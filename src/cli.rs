use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Generate Translation Word Links TSVs for books of the canon.
#[derive(Parser)]
#[command(name = "twl-generator")]
#[command(about = "Link English translation words to Translation Words articles", long_about = None)]
pub struct Cli {
    /// Book code to process, e.g. `gen` or `rev`.
    #[arg(short, long, required_unless_present = "all")]
    pub book: Option<String>,

    /// Process all 66 books of the canon.
    #[arg(long, conflicts_with = "book")]
    pub all: bool,

    /// Output file for a single-book run (default: `twl_<BOOK>.tsv` in the
    /// output directory).
    #[arg(short, long, conflicts_with = "all")]
    pub out: Option<PathBuf>,

    /// Directory for output files.
    #[arg(long = "out-dir", default_value = ".")]
    pub out_dir: PathBuf,

    /// Pipeline mode: scan English text, or walk Strong's attributions.
    #[arg(long, value_enum, default_value_t = Mode::English)]
    pub mode: Mode,

    /// Widen stage-1/2 matching with regular conjugation forms.
    #[arg(long)]
    pub rich_conjugations: bool,

    /// Skip the on-disk archive cache.
    #[arg(long)]
    pub no_cache: bool,

    /// Override the vocabulary archive URL.
    #[arg(long)]
    pub archive_url: Option<String>,

    /// Override the Strong's list URL.
    #[arg(long)]
    pub strongs_list_url: Option<String>,

    /// Override the USFM content endpoint base URL.
    #[arg(long)]
    pub content_base: Option<String>,

    /// add-GL-quote service URL; without it the fallback copies columns.
    #[arg(long)]
    pub add_gl_url: Option<String>,

    /// GL→OL converter service URL; without it English quotations are kept.
    #[arg(long)]
    pub convert_url: Option<String>,
}

/// Which pipeline drives row emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Trie-scan clean verse text (English-first).
    English,
    /// Walk `\w` tokens by Strong's attribution (Strong's-first).
    Strongs,
}
