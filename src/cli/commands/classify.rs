//! `dm329 classify` - equipment table with dispositions, without a report

use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::helpers::truncate_str;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::report::{classify_inventory, FormattedEquipmentEntry};
use crate::yaml::parse_input_file;

const HEADER: [&str; 8] = [
    "POS.",
    "DESCRIZIONE",
    "COSTRUTTORE",
    "CAPACITÀ",
    "PRESSIONE",
    "N. FABBRICA",
    "ESITO",
    "MOTIVAZIONE",
];

const JUSTIFICATION_WIDTH: usize = 60;

#[derive(clap::Args, Debug)]
pub struct ClassifyArgs {
    /// Input data sheet (.yaml, .yml or .json)
    pub input: PathBuf,

    /// Output format (default: config or table)
    #[arg(long, short = 'f', value_enum)]
    pub format: Option<OutputFormat>,
}

pub fn run(args: ClassifyArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = match args.format {
        Some(format) => format,
        None => config
            .default_format
            .as_deref()
            .and_then(|f| f.parse().ok())
            .unwrap_or_default(),
    };

    let input = parse_input_file(&args.input)?;
    let entries = classify_inventory(&input);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries).into_diagnostic()?);
        }
        OutputFormat::Csv => print!("{}", to_csv(&entries)?),
        OutputFormat::Table => {
            println!("{}", to_table(&entries));
            if !global.quiet {
                let verifications = entries
                    .iter()
                    .filter(|e| e.disposition.as_ref().is_some_and(|d| d.requires_verification()))
                    .count();
                println!(
                    "\n{} item(s), {} subject to verification",
                    entries.len(),
                    verifications
                );
            }
        }
    }
    Ok(())
}

fn row(entry: &FormattedEquipmentEntry) -> [String; 8] {
    let (outcome, justification) = match &entry.disposition {
        Some(d) => (d.tag().to_string(), d.justification().to_string()),
        None => ("-".to_string(), String::new()),
    };
    [
        entry.position.clone(),
        entry.description.clone(),
        entry.manufacturer.clone(),
        entry.capacity.clone(),
        entry.pressure.clone(),
        entry.serial.clone(),
        outcome,
        justification,
    ]
}

fn to_table(entries: &[FormattedEquipmentEntry]) -> String {
    let mut builder = Builder::default();
    builder.push_record(HEADER);
    for entry in entries {
        let mut record = row(entry);
        record[7] = truncate_str(&record[7], JUSTIFICATION_WIDTH);
        builder.push_record(record);
    }
    builder.build().with(Style::markdown()).to_string()
}

fn to_csv(entries: &[FormattedEquipmentEntry]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER).into_diagnostic()?;
    for entry in entries {
        writer.write_record(row(entry)).into_diagnostic()?;
    }
    let bytes = writer.into_inner().into_diagnostic()?;
    String::from_utf8(bytes).into_diagnostic()
}
