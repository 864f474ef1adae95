//! Equipment records - the pressure equipment found in a compressed-air room
//!
//! Each equipment family has its own struct; [`EquipmentRecord`] is the sum
//! type over all of them. Dependent equipment (deoilers, heat exchangers,
//! filter vessels) refers to its parent by position code, never by pointer.

use serde::{Deserialize, Serialize};

/// Equipment family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentKind {
    Tank,
    Compressor,
    Deoiler,
    Dryer,
    HeatExchanger,
    Filter,
    FilterVessel,
    Separator,
    SafetyValve,
}

impl EquipmentKind {
    /// Italian description used in the report tables
    pub fn description(&self) -> &'static str {
        match self {
            EquipmentKind::Tank => "Serbatoio aria verticale",
            EquipmentKind::Compressor => "Compressore",
            EquipmentKind::Deoiler => "Serbatoio disoleatore",
            EquipmentKind::Dryer => "Essiccatore frigorifero",
            EquipmentKind::HeatExchanger => "Scambiatore di calore",
            EquipmentKind::Filter => "Filtro di linea",
            EquipmentKind::FilterVessel => "Recipiente filtro",
            EquipmentKind::Separator => "Separatore acqua-olio",
            EquipmentKind::SafetyValve => "Valvola di sicurezza",
        }
    }
}

impl std::fmt::Display for EquipmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EquipmentKind::Tank => write!(f, "tank"),
            EquipmentKind::Compressor => write!(f, "compressor"),
            EquipmentKind::Deoiler => write!(f, "deoiler"),
            EquipmentKind::Dryer => write!(f, "dryer"),
            EquipmentKind::HeatExchanger => write!(f, "heat_exchanger"),
            EquipmentKind::Filter => write!(f, "filter"),
            EquipmentKind::FilterVessel => write!(f, "filter_vessel"),
            EquipmentKind::Separator => write!(f, "separator"),
            EquipmentKind::SafetyValve => write!(f, "safety_valve"),
        }
    }
}

impl std::str::FromStr for EquipmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "tank" => Ok(EquipmentKind::Tank),
            "compressor" => Ok(EquipmentKind::Compressor),
            "deoiler" => Ok(EquipmentKind::Deoiler),
            "dryer" => Ok(EquipmentKind::Dryer),
            "heat_exchanger" => Ok(EquipmentKind::HeatExchanger),
            "filter" => Ok(EquipmentKind::Filter),
            "filter_vessel" => Ok(EquipmentKind::FilterVessel),
            "separator" => Ok(EquipmentKind::Separator),
            "safety_valve" => Ok(EquipmentKind::SafetyValve),
            _ => Err(format!("Unknown equipment kind: {}", s)),
        }
    }
}

/// Identification data read from the nameplate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nameplate {
    /// Position code on the installation scheme (e.g. "S1", "C2", "E1.1")
    pub code: String,

    /// Manufacturer name
    #[serde(default)]
    pub manufacturer: String,

    /// Model designation
    #[serde(default)]
    pub model: String,

    /// Serial number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    /// Year of manufacture
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
}

/// Pressure rating of a vessel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VesselRating {
    /// Internal volume in liters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_liters: Option<f64>,

    /// Maximum allowable pressure PS in bar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pressure_bar: Option<f64>,

    /// Maximum allowable temperature TS in °C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_temperature_c: Option<f64>,

    /// PED category from the declaration of conformity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ped_category: Option<String>,
}

/// Safety valve mounted on a vessel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SafetyValve {
    #[serde(default)]
    pub manufacturer: String,

    #[serde(default)]
    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,

    /// Rated discharge capacity in l/min
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rated_discharge_l_min: Option<f64>,

    /// Set (calibration) pressure in bar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_pressure_bar: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_temperature_c: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ped_category: Option<String>,
}

/// How condensate is drained from a tank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CondensateDrain {
    Manual,
    #[default]
    Automatic,
}

impl CondensateDrain {
    pub fn label(&self) -> &'static str {
        match self {
            CondensateDrain::Manual => "manuale",
            CondensateDrain::Automatic => "automatico",
        }
    }
}

/// Internal surface finish of a tank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InternalFinish {
    Galvanized,
    Vitroflex,
    Painted,
    Raw,
}

/// Pressure gauge fitted on a tank
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PressureGauge {
    /// Full scale in bar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_scale_bar: Option<f64>,

    /// Red mark in bar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub red_mark_bar: Option<f64>,
}

/// Air receiver tank
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    #[serde(flatten)]
    pub plate: Nameplate,

    #[serde(flatten)]
    pub rating: VesselRating,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_valve: Option<SafetyValve>,

    #[serde(default)]
    pub condensate_drain: CondensateDrain,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_finish: Option<InternalFinish>,

    /// Anchored to the floor
    #[serde(default)]
    pub anchored: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gauge: Option<PressureGauge>,
}

/// Rotary screw compressor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Compressor {
    #[serde(flatten)]
    pub plate: Nameplate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pressure_bar: Option<f64>,

    /// Free air delivery in l/min
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_l_min: Option<f64>,
}

/// Oil separator vessel inside a compressor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deoiler {
    #[serde(flatten)]
    pub plate: Nameplate,

    #[serde(flatten)]
    pub rating: VesselRating,

    /// Code of the compressor this deoiler belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressor_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_valve: Option<SafetyValve>,
}

/// Refrigerated air dryer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dryer {
    #[serde(flatten)]
    pub plate: Nameplate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pressure_bar: Option<f64>,

    /// Treated air flow in l/min
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_l_min: Option<f64>,
}

/// Pressurized heat exchanger inside a dryer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeatExchanger {
    #[serde(flatten)]
    pub plate: Nameplate,

    #[serde(flatten)]
    pub rating: VesselRating,

    /// Code of the dryer this exchanger belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dryer_code: Option<String>,
}

/// Line filter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(flatten)]
    pub plate: Nameplate,
}

/// Filter housing vessel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterVessel {
    #[serde(flatten)]
    pub plate: Nameplate,

    #[serde(flatten)]
    pub rating: VesselRating,

    /// Code of the filter this vessel belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_code: Option<String>,
}

/// Water/oil condensate separator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Separator {
    #[serde(flatten)]
    pub plate: Nameplate,
}

/// Any piece of equipment in the inventory
#[derive(Debug, Clone, PartialEq)]
pub enum EquipmentRecord {
    Tank(Tank),
    Compressor(Compressor),
    Deoiler(Deoiler),
    Dryer(Dryer),
    HeatExchanger(HeatExchanger),
    Filter(Filter),
    FilterVessel(FilterVessel),
    Separator(Separator),
}

impl EquipmentRecord {
    pub fn kind(&self) -> EquipmentKind {
        match self {
            EquipmentRecord::Tank(_) => EquipmentKind::Tank,
            EquipmentRecord::Compressor(_) => EquipmentKind::Compressor,
            EquipmentRecord::Deoiler(_) => EquipmentKind::Deoiler,
            EquipmentRecord::Dryer(_) => EquipmentKind::Dryer,
            EquipmentRecord::HeatExchanger(_) => EquipmentKind::HeatExchanger,
            EquipmentRecord::Filter(_) => EquipmentKind::Filter,
            EquipmentRecord::FilterVessel(_) => EquipmentKind::FilterVessel,
            EquipmentRecord::Separator(_) => EquipmentKind::Separator,
        }
    }

    pub fn plate(&self) -> &Nameplate {
        match self {
            EquipmentRecord::Tank(t) => &t.plate,
            EquipmentRecord::Compressor(c) => &c.plate,
            EquipmentRecord::Deoiler(d) => &d.plate,
            EquipmentRecord::Dryer(d) => &d.plate,
            EquipmentRecord::HeatExchanger(h) => &h.plate,
            EquipmentRecord::Filter(f) => &f.plate,
            EquipmentRecord::FilterVessel(v) => &v.plate,
            EquipmentRecord::Separator(s) => &s.plate,
        }
    }

    pub fn code(&self) -> &str {
        &self.plate().code
    }

    /// Pressure rating, for the kinds that are vessels
    pub fn rating(&self) -> Option<&VesselRating> {
        match self {
            EquipmentRecord::Tank(t) => Some(&t.rating),
            EquipmentRecord::Deoiler(d) => Some(&d.rating),
            EquipmentRecord::HeatExchanger(h) => Some(&h.rating),
            EquipmentRecord::FilterVessel(v) => Some(&v.rating),
            EquipmentRecord::Compressor(_)
            | EquipmentRecord::Dryer(_)
            | EquipmentRecord::Filter(_)
            | EquipmentRecord::Separator(_) => None,
        }
    }
}

macro_rules! impl_from_record {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for EquipmentRecord {
                fn from(value: $ty) -> Self {
                    EquipmentRecord::$ty(value)
                }
            }
        )*
    };
}

impl_from_record!(Tank, Compressor, Deoiler, Dryer, HeatExchanger, Filter, FilterVessel, Separator);
