//! Report input - everything the caller supplies for one report

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::customer::{Address, Customer};
use crate::entities::equipment::{
    Compressor, Deoiler, Dryer, Filter, FilterVessel, HeatExchanger, Separator, Tank,
};

/// Compressor speed regulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedRegulation {
    #[default]
    #[serde(alias = "fissi")]
    Fixed,
    #[serde(alias = "variabili")]
    Variable,
}

impl std::fmt::Display for SpeedRegulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeedRegulation::Fixed => write!(f, "fixed"),
            SpeedRegulation::Variable => write!(f, "variable"),
        }
    }
}

/// Classification of the air drawn in by the compressors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntakeAir {
    #[serde(alias = "pulita")]
    Clean,
    #[serde(alias = "vapori")]
    Vapors,
    #[serde(alias = "acidi")]
    Acids,
    #[serde(alias = "polveri")]
    Dust,
    #[serde(alias = "umidità", alias = "umidita")]
    Humidity,
    #[serde(alias = "altro")]
    Other,
}

impl IntakeAir {
    /// Italian noun used in the narrative
    pub fn label(&self) -> &'static str {
        match self {
            IntakeAir::Clean => "aria pulita",
            IntakeAir::Vapors => "vapori",
            IntakeAir::Acids => "acidi",
            IntakeAir::Dust => "polveri",
            IntakeAir::Humidity => "umidità",
            IntakeAir::Other => "altri contaminanti",
        }
    }
}

/// Raw installation flags collected during the site survey
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallationFlags {
    /// Room entirely dedicated to compressed air
    pub dedicated_room: bool,

    /// Access to the room restricted to authorized staff
    pub access_restricted: bool,

    /// Intake air classification; empty means not surveyed
    pub intake_air: Vec<IntakeAir>,
}

impl InstallationFlags {
    /// Intake air counts as clean when not surveyed or explicitly marked clean
    pub fn intake_air_clean(&self) -> bool {
        self.intake_air.is_empty() || self.intake_air.contains(&IntakeAir::Clean)
    }
}

/// User-entered configuration supplied at generation time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditionalInfo {
    /// Speed regulation per compressor code
    pub compressor_speeds: BTreeMap<String, SpeedRegulation>,

    /// Equipment codes subjected to ultrasonic thickness testing
    pub thickness_tested: Vec<String>,

    /// Tanks fed by each compressor (compressor code -> tank codes)
    pub compressor_tanks: BTreeMap<String, Vec<String>>,

    pub installation: InstallationFlags,

    /// Reason for a revised issue of the report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_reason: Option<String>,

    /// Technician signing the report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician: Option<String>,
}

impl AdditionalInfo {
    pub fn is_thickness_tested(&self, code: &str) -> bool {
        self.thickness_tested.iter().any(|c| c == code)
    }

    /// Compressors missing from the map count as fixed speed
    pub fn speed_of(&self, compressor_code: &str) -> SpeedRegulation {
        self.compressor_speeds
            .get(compressor_code)
            .copied()
            .unwrap_or_default()
    }
}

/// The eight equipment collections of a data sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inventory {
    pub tanks: Vec<Tank>,
    pub compressors: Vec<Compressor>,
    pub deoilers: Vec<Deoiler>,
    pub dryers: Vec<Dryer>,
    pub heat_exchangers: Vec<HeatExchanger>,
    pub filters: Vec<Filter>,
    pub filter_vessels: Vec<FilterVessel>,
    pub separators: Vec<Separator>,
}

/// Complete input snapshot for one report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportInput {
    pub customer: Customer,

    /// Address of the production site hosting the installation
    #[serde(default)]
    pub site_address: Address,

    /// Business activity (free text or ATECO description)
    #[serde(default)]
    pub activity_description: String,

    #[serde(default)]
    pub inventory: Inventory,

    #[serde(default)]
    pub additional_info: AdditionalInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intake_air_clean_rule() {
        let mut flags = InstallationFlags::default();
        assert!(flags.intake_air_clean());

        flags.intake_air = vec![IntakeAir::Dust];
        assert!(!flags.intake_air_clean());

        flags.intake_air.push(IntakeAir::Clean);
        assert!(flags.intake_air_clean());
    }

    #[test]
    fn test_speed_defaults_to_fixed() {
        let mut info = AdditionalInfo::default();
        info.compressor_speeds
            .insert("C2".to_string(), SpeedRegulation::Variable);

        assert_eq!(info.speed_of("C1"), SpeedRegulation::Fixed);
        assert_eq!(info.speed_of("C2"), SpeedRegulation::Variable);
    }

    #[test]
    fn test_italian_aliases() {
        let yaml = r#"
compressor_speeds:
  C1: variabili
  C2: fissi
installation:
  intake_air: [polveri, umidità]
"#;
        let info: AdditionalInfo = serde_yml::from_str(yaml).unwrap();
        assert_eq!(info.speed_of("C1"), SpeedRegulation::Variable);
        assert_eq!(info.speed_of("C2"), SpeedRegulation::Fixed);
        assert_eq!(
            info.installation.intake_air,
            vec![IntakeAir::Dust, IntakeAir::Humidity]
        );
    }

    #[test]
    fn test_minimal_input() {
        let yaml = r#"
customer:
  company_name: Officine Rossi S.r.l.
"#;
        let input: ReportInput = serde_yml::from_str(yaml).unwrap();
        assert_eq!(input.customer.company_name, "Officine Rossi S.r.l.");
        assert!(input.inventory.tanks.is_empty());
        assert!(!input.additional_info.installation.dedicated_room);
    }
}
