//! `dm329 generate` - write the technical report for a data sheet

use chrono::NaiveDate;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{parse_date, write_file};
use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::report::{generate_report, generate_report_on};
use crate::yaml::parse_input_file;

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Input data sheet (.yaml, .yml or .json)
    pub input: PathBuf,

    /// Directory to write the report to (default: config or current directory)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Issue date printed in the report (DD-MM-YYYY, default: today)
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,
}

pub fn run(args: GenerateArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut input = parse_input_file(&args.input)?;

    if input.additional_info.technician.is_none() {
        input.additional_info.technician = config.technician.clone();
    }

    let report = match args.date {
        Some(date) => generate_report_on(&input, date)?,
        None => generate_report(&input)?,
    };

    let dir = args.output.unwrap_or_else(|| config.output_dir());
    if !dir.exists() {
        std::fs::create_dir_all(&dir).into_diagnostic()?;
    }

    write_file(&report.bytes, &dir.join(&report.filename), global.quiet)
}
