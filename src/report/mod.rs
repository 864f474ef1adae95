//! DM 329/2004 technical report engine
//!
//! Pipeline, leaf first:
//!
//! - [`classifier`] - volume/pressure thresholds to a disposition
//! - [`formatter`] - records (plus linked child) to table rows
//! - [`grouping`] - contiguous runs of equal disposition
//! - [`narrative`] - Italian sentences driven by counts and flags
//! - [`document`] - section composition into [`blocks`]
//! - [`render`] - DOCX bytes
//!
//! Every call is a pure function of its input; nothing is cached between
//! reports.

pub mod blocks;
pub mod classifier;
pub mod document;
pub mod formatter;
pub mod grouping;
pub mod narrative;
pub mod render;

pub use blocks::ReportDocument;
pub use classifier::{classify, classify_record, DispositionTag, VerificationDisposition, VesselClass};
pub use document::{build_document, ReportContext};
pub use formatter::{format_equipment, format_inventory, EquipmentIndex, FormattedEquipmentEntry};
pub use grouping::{group_by_disposition, Group, GroupTag};

use chrono::{Local, NaiveDate};

use crate::core::error::Result;
use crate::entities::ReportInput;

const MAX_NAME_CHARS: usize = 30;

/// A finished report and the name to save it under
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// Generate the report dated today
pub fn generate_report(input: &ReportInput) -> Result<GeneratedReport> {
    generate_report_on(input, Local::now().date_naive())
}

/// Generate the report with a fixed issue date
pub fn generate_report_on(input: &ReportInput, date: NaiveDate) -> Result<GeneratedReport> {
    let ctx = ReportContext::new(input, date);
    tracing::debug!(
        customer = %input.customer.company_name,
        entries = ctx.entries.len(),
        "formatted equipment"
    );

    let document = build_document(&ctx);
    tracing::debug!(blocks = document.blocks.len(), "document assembled");

    let bytes = render::to_docx(&document)?;
    let filename = suggested_filename(&input.customer.company_name, date);
    tracing::info!(file = %filename, size = bytes.len(), "report generated");

    Ok(GeneratedReport { bytes, filename })
}

/// Formatted entries with dispositions, in table order
pub fn classify_inventory(input: &ReportInput) -> Vec<FormattedEquipmentEntry> {
    let index = EquipmentIndex::build(&input.inventory);
    format_inventory(&input.inventory, &index)
}

/// `Relazione_Tecnica_<name>_<DD-MM-YYYY>.docx`
///
/// The name keeps only ASCII letters and digits, at most 30 of them.
pub fn suggested_filename(company_name: &str, date: NaiveDate) -> String {
    let clean: String = company_name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(MAX_NAME_CHARS)
        .collect();
    format!(
        "Relazione_Tecnica_{}_{}.docx",
        clean,
        date.format("%d-%m-%Y")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Compressor, Deoiler, Filter, Nameplate, Tank, VesselRating};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    fn plate(code: &str) -> Nameplate {
        Nameplate {
            code: code.to_string(),
            ..Default::default()
        }
    }

    fn rating(volume: f64, pressure: f64) -> VesselRating {
        VesselRating {
            volume_liters: Some(volume),
            max_pressure_bar: Some(pressure),
            ..Default::default()
        }
    }

    #[test]
    fn test_suggested_filename() {
        insta::assert_snapshot!(
            suggested_filename("Officine Rossi & Figli S.r.l.", date()),
            @"Relazione_Tecnica_OfficineRossiFigliSrl_05-03-2024.docx"
        );
    }

    #[test]
    fn test_filename_truncates_and_strips() {
        let name = suggested_filename("Società Meccanica Trevigiana di Precisione S.p.A.", date());
        assert_eq!(
            name,
            "Relazione_Tecnica_SocietMeccanicaTrevigianadiPre_05-03-2024.docx"
        );
        assert_eq!(
            suggested_filename("", date()),
            "Relazione_Tecnica__05-03-2024.docx"
        );
    }

    #[test]
    fn test_generate_report() {
        let mut input = ReportInput::default();
        input.customer.company_name = "Rossi".to_string();
        input.inventory.tanks.push(Tank {
            plate: plate("S1"),
            rating: rating(100.0, 90.0),
            ..Default::default()
        });
        input.inventory.compressors.push(Compressor {
            plate: plate("C1"),
            ..Default::default()
        });
        input.inventory.deoilers.push(Deoiler {
            plate: plate("C1.1"),
            rating: rating(30.0, 15.0),
            compressor_code: Some("C1".to_string()),
            safety_valve: None,
        });
        input.inventory.filters.push(Filter { plate: plate("F1") });

        let report = generate_report_on(&input, date()).unwrap();
        assert_eq!(report.filename, "Relazione_Tecnica_Rossi_05-03-2024.docx");
        assert!(report.bytes.starts_with(b"PK"));

        let entries = classify_inventory(&input);
        let verifications: Vec<&str> = entries
            .iter()
            .filter(|e| e.disposition.as_ref().is_some_and(|d| d.requires_verification()))
            .map(|e| e.position.as_str())
            .collect();
        assert_eq!(verifications, vec!["C1.1", "S1"]);
    }

    #[test]
    fn test_generation_is_idempotent() {
        let mut input = ReportInput::default();
        input.inventory.tanks.push(Tank {
            plate: plate("S1"),
            rating: rating(500.0, 16.0),
            ..Default::default()
        });

        let first = build_document(&ReportContext::new(&input, date()));
        let second = build_document(&ReportContext::new(&input, date()));
        assert_eq!(first.plain_text(), second.plain_text());
        assert_eq!(
            first.tables().collect::<Vec<_>>(),
            second.tables().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_input_is_not_mutated() {
        let mut input = ReportInput::default();
        input.inventory.tanks.push(Tank {
            plate: plate("S1"),
            rating: rating(100.0, 90.0),
            ..Default::default()
        });
        let before = input.clone();
        generate_report_on(&input, date()).unwrap();
        assert_eq!(input, before);
    }
}
