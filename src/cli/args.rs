//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    classify::ClassifyArgs, completions::CompletionsArgs, generate::GenerateArgs,
};

#[derive(Parser)]
#[command(name = "dm329")]
#[command(author, version, about = "DM 329/2004 pressure equipment reports")]
#[command(long_about = "Classify the pressure equipment of a compressed-air installation under DM 329/2004 and generate the Italian technical report (Relazione Tecnica) as a DOCX file.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the technical report from an input data sheet
    Generate(GenerateArgs),

    /// Print the equipment table with each item's disposition
    Classify(ClassifyArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown table
    #[default]
    Table,
    /// CSV format (for spreadsheets)
    Csv,
    /// JSON format (for programming)
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}
