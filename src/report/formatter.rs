//! Equipment formatting - one record (plus its linked child) into table rows
//!
//! A physical unit can yield several rows: a tank and its safety valve
//! (`S1`, `S1.1`), a compressor, its deoiler and the deoiler's valve
//! (`C1`, `C1.1`, `C1.1.1`). Only vessels carry a disposition; compressors,
//! dryers, filters, separators and valves never do.

use serde::Serialize;
use std::collections::HashMap;

use crate::core::error::{ReportError, Result};
use crate::entities::{
    Compressor, Deoiler, Dryer, EquipmentKind, EquipmentRecord, Filter, FilterVessel,
    HeatExchanger, Inventory, Nameplate, SafetyValve, Separator, Tank, VesselRating,
};
use crate::report::classifier::{classify, VerificationDisposition, VesselClass};

const VESSEL_TEMPERATURE: &str = "-10 ÷ +120";
const VALVE_TEMPERATURE: &str = "-10 ÷ +200";
const EXCHANGER_TEMPERATURE: &str = "-20 ÷ +120";
const DRYER_TEMPERATURE: &str = "70";
const VALVE_CATEGORY: &str = "IV";

/// One row of the characterization and verification tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedEquipmentEntry {
    pub position: String,
    pub kind: EquipmentKind,
    pub description: String,
    pub manufacturer: String,
    pub model: String,
    /// Volume in l, produced/treated flow or discharge in l/min
    pub capacity: String,
    /// Maximum allowable pressure, or set pressure for valves
    pub pressure: String,
    pub temperature: String,
    pub category: String,
    pub year: String,
    pub serial: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disposition: Option<VerificationDisposition>,
}

/// Format an optional number without trailing zeros ("500", "10.5")
pub(crate) fn number_text(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn base_entry(position: String, kind: EquipmentKind, plate: &Nameplate) -> FormattedEquipmentEntry {
    FormattedEquipmentEntry {
        position,
        kind,
        description: kind.description().to_string(),
        manufacturer: plate.manufacturer.clone(),
        model: plate.model.clone(),
        capacity: String::new(),
        pressure: String::new(),
        temperature: String::new(),
        category: String::new(),
        year: plate.year.map(|y| y.to_string()).unwrap_or_default(),
        serial: plate.serial_number.clone().unwrap_or_default(),
        disposition: None,
    }
}

fn vessel_entry(
    plate: &Nameplate,
    kind: EquipmentKind,
    rating: &VesselRating,
    class: VesselClass,
    default_temperature: &str,
) -> FormattedEquipmentEntry {
    FormattedEquipmentEntry {
        capacity: number_text(rating.volume_liters),
        pressure: number_text(rating.max_pressure_bar),
        temperature: rating
            .max_temperature_c
            .map(|t| t.to_string())
            .unwrap_or_else(|| default_temperature.to_string()),
        category: rating.ped_category.clone().unwrap_or_default(),
        disposition: Some(classify(
            class,
            rating.volume_liters,
            rating.max_pressure_bar,
        )),
        ..base_entry(plate.code.clone(), kind, plate)
    }
}

/// Valve row; valves are covered by the verification of the vessel they protect
fn valve_entry(parent_code: &str, valve: &SafetyValve) -> FormattedEquipmentEntry {
    FormattedEquipmentEntry {
        position: format!("{}.1", parent_code),
        kind: EquipmentKind::SafetyValve,
        description: EquipmentKind::SafetyValve.description().to_string(),
        manufacturer: valve.manufacturer.clone(),
        model: valve.model.clone(),
        capacity: number_text(valve.rated_discharge_l_min),
        pressure: number_text(valve.set_pressure_bar),
        temperature: valve
            .max_temperature_c
            .map(|t| t.to_string())
            .unwrap_or_else(|| VALVE_TEMPERATURE.to_string()),
        category: valve
            .ped_category
            .clone()
            .unwrap_or_else(|| VALVE_CATEGORY.to_string()),
        year: valve.year.map(|y| y.to_string()).unwrap_or_default(),
        serial: valve.serial_number.clone().unwrap_or_default(),
        disposition: None,
    }
}

pub fn format_tank(tank: &Tank) -> Vec<FormattedEquipmentEntry> {
    let mut rows = vec![vessel_entry(
        &tank.plate,
        EquipmentKind::Tank,
        &tank.rating,
        VesselClass::Tank,
        VESSEL_TEMPERATURE,
    )];
    if let Some(valve) = &tank.safety_valve {
        rows.push(valve_entry(&tank.plate.code, valve));
    }
    rows
}

fn format_deoiler(deoiler: &Deoiler) -> Vec<FormattedEquipmentEntry> {
    let mut rows = vec![vessel_entry(
        &deoiler.plate,
        EquipmentKind::Deoiler,
        &deoiler.rating,
        VesselClass::SmallPressureVessel,
        VESSEL_TEMPERATURE,
    )];
    if let Some(valve) = &deoiler.safety_valve {
        rows.push(valve_entry(&deoiler.plate.code, valve));
    }
    rows
}

fn format_exchanger(exchanger: &HeatExchanger) -> FormattedEquipmentEntry {
    vessel_entry(
        &exchanger.plate,
        EquipmentKind::HeatExchanger,
        &exchanger.rating,
        VesselClass::SmallPressureVessel,
        EXCHANGER_TEMPERATURE,
    )
}

fn format_filter_vessel(vessel: &FilterVessel) -> FormattedEquipmentEntry {
    vessel_entry(
        &vessel.plate,
        EquipmentKind::FilterVessel,
        &vessel.rating,
        VesselClass::SmallPressureVessel,
        EXCHANGER_TEMPERATURE,
    )
}

/// Compressors are excluded from the decree (Art. 1.3.L D.Lgs. 93/2000)
pub fn format_compressor(
    compressor: &Compressor,
    deoiler: Option<&Deoiler>,
) -> Vec<FormattedEquipmentEntry> {
    let mut rows = vec![FormattedEquipmentEntry {
        capacity: number_text(compressor.flow_l_min),
        pressure: number_text(compressor.max_pressure_bar),
        ..base_entry(
            compressor.plate.code.clone(),
            EquipmentKind::Compressor,
            &compressor.plate,
        )
    }];
    if let Some(deoiler) = deoiler {
        rows.extend(format_deoiler(deoiler));
    }
    rows
}

pub fn format_dryer(dryer: &Dryer, exchanger: Option<&HeatExchanger>) -> Vec<FormattedEquipmentEntry> {
    let mut rows = vec![FormattedEquipmentEntry {
        capacity: number_text(dryer.flow_l_min),
        pressure: number_text(dryer.max_pressure_bar),
        temperature: DRYER_TEMPERATURE.to_string(),
        ..base_entry(dryer.plate.code.clone(), EquipmentKind::Dryer, &dryer.plate)
    }];
    if let Some(exchanger) = exchanger {
        rows.push(format_exchanger(exchanger));
    }
    rows
}

pub fn format_filter(filter: &Filter, vessel: Option<&FilterVessel>) -> Vec<FormattedEquipmentEntry> {
    let mut rows = vec![base_entry(
        filter.plate.code.clone(),
        EquipmentKind::Filter,
        &filter.plate,
    )];
    if let Some(vessel) = vessel {
        rows.push(format_filter_vessel(vessel));
    }
    rows
}

pub fn format_separator(separator: &Separator) -> FormattedEquipmentEntry {
    base_entry(
        separator.plate.code.clone(),
        EquipmentKind::Separator,
        &separator.plate,
    )
}

fn check_link(parent: &EquipmentRecord, child: &EquipmentRecord, link: Option<&str>) -> Result<()> {
    match link {
        Some(code) if code != parent.code() => Err(ReportError::MalformedInput(format!(
            "{} {} links to {} but was paired with {} {}",
            child.kind(),
            child.code(),
            code,
            parent.kind(),
            parent.code()
        ))),
        _ => Ok(()),
    }
}

/// Format one record and its optional linked child
///
/// A child of a kind the parent cannot carry, or whose link code names a
/// different parent, is a programming error.
pub fn format_equipment(
    record: &EquipmentRecord,
    linked: Option<&EquipmentRecord>,
) -> Result<Vec<FormattedEquipmentEntry>> {
    use EquipmentRecord as R;

    match (record, linked) {
        (R::Tank(tank), None) => Ok(format_tank(tank)),
        (R::Compressor(c), None) => Ok(format_compressor(c, None)),
        (R::Compressor(c), Some(child @ R::Deoiler(d))) => {
            check_link(record, child, d.compressor_code.as_deref())?;
            Ok(format_compressor(c, Some(d)))
        }
        (R::Deoiler(d), None) => Ok(format_deoiler(d)),
        (R::Dryer(d), None) => Ok(format_dryer(d, None)),
        (R::Dryer(d), Some(child @ R::HeatExchanger(h))) => {
            check_link(record, child, h.dryer_code.as_deref())?;
            Ok(format_dryer(d, Some(h)))
        }
        (R::HeatExchanger(h), None) => Ok(vec![format_exchanger(h)]),
        (R::Filter(f), None) => Ok(format_filter(f, None)),
        (R::Filter(f), Some(child @ R::FilterVessel(v))) => {
            check_link(record, child, v.filter_code.as_deref())?;
            Ok(format_filter(f, Some(v)))
        }
        (R::FilterVessel(v), None) => Ok(vec![format_filter_vessel(v)]),
        (R::Separator(s), None) => Ok(vec![format_separator(s)]),
        (_, Some(child)) => Err(ReportError::MalformedInput(format!(
            "{} {} cannot carry a linked {} ({})",
            record.kind(),
            record.code(),
            child.kind(),
            child.code()
        ))),
    }
}

/// Code lookup over an inventory, built once per report
///
/// Children are indexed by the code of the parent they name. When two
/// children name the same parent the first one wins.
#[derive(Debug, Default)]
pub struct EquipmentIndex<'a> {
    deoilers: HashMap<&'a str, &'a Deoiler>,
    exchangers: HashMap<&'a str, &'a HeatExchanger>,
    filter_vessels: HashMap<&'a str, &'a FilterVessel>,
    tanks: HashMap<&'a str, &'a Tank>,
    compressors: HashMap<&'a str, &'a Compressor>,
}

impl<'a> EquipmentIndex<'a> {
    pub fn build(inventory: &'a Inventory) -> Self {
        let mut index = Self::default();

        for tank in &inventory.tanks {
            index.tanks.entry(tank.plate.code.as_str()).or_insert(tank);
        }
        for compressor in &inventory.compressors {
            index
                .compressors
                .entry(compressor.plate.code.as_str())
                .or_insert(compressor);
        }
        for deoiler in &inventory.deoilers {
            if let Some(code) = deoiler.compressor_code.as_deref() {
                index.deoilers.entry(code).or_insert(deoiler);
            }
        }
        for exchanger in &inventory.heat_exchangers {
            if let Some(code) = exchanger.dryer_code.as_deref() {
                index.exchangers.entry(code).or_insert(exchanger);
            }
        }
        for vessel in &inventory.filter_vessels {
            if let Some(code) = vessel.filter_code.as_deref() {
                index.filter_vessels.entry(code).or_insert(vessel);
            }
        }

        index.log_orphans(inventory);
        index
    }

    fn log_orphans(&self, inventory: &Inventory) {
        let dryers: Vec<&str> = inventory.dryers.iter().map(|d| d.plate.code.as_str()).collect();
        let filters: Vec<&str> = inventory.filters.iter().map(|f| f.plate.code.as_str()).collect();

        for deoiler in &inventory.deoilers {
            let linked = deoiler
                .compressor_code
                .as_deref()
                .is_some_and(|c| self.compressors.contains_key(c));
            if !linked {
                tracing::warn!(code = %deoiler.plate.code, "deoiler without compressor omitted");
            }
        }
        for exchanger in &inventory.heat_exchangers {
            let linked = exchanger
                .dryer_code
                .as_deref()
                .is_some_and(|c| dryers.contains(&c));
            if !linked {
                tracing::warn!(code = %exchanger.plate.code, "heat exchanger without dryer omitted");
            }
        }
        for vessel in &inventory.filter_vessels {
            let linked = vessel
                .filter_code
                .as_deref()
                .is_some_and(|c| filters.contains(&c));
            if !linked {
                tracing::warn!(code = %vessel.plate.code, "filter vessel without filter omitted");
            }
        }
    }

    pub fn deoiler_of(&self, compressor_code: &str) -> Option<&'a Deoiler> {
        self.deoilers.get(compressor_code).copied()
    }

    pub fn exchanger_of(&self, dryer_code: &str) -> Option<&'a HeatExchanger> {
        self.exchangers.get(dryer_code).copied()
    }

    pub fn filter_vessel_of(&self, filter_code: &str) -> Option<&'a FilterVessel> {
        self.filter_vessels.get(filter_code).copied()
    }

    pub fn tank(&self, code: &str) -> Option<&'a Tank> {
        self.tanks.get(code).copied()
    }

    pub fn compressor(&self, code: &str) -> Option<&'a Compressor> {
        self.compressors.get(code).copied()
    }
}

/// Format the whole inventory in report order: compressors with deoilers,
/// tanks, dryers with exchangers, filters with vessels, separators
pub fn format_inventory(
    inventory: &Inventory,
    index: &EquipmentIndex<'_>,
) -> Vec<FormattedEquipmentEntry> {
    let mut rows = Vec::new();

    for compressor in &inventory.compressors {
        rows.extend(format_compressor(
            compressor,
            index.deoiler_of(&compressor.plate.code),
        ));
    }
    for tank in &inventory.tanks {
        rows.extend(format_tank(tank));
    }
    for dryer in &inventory.dryers {
        rows.extend(format_dryer(dryer, index.exchanger_of(&dryer.plate.code)));
    }
    for filter in &inventory.filters {
        rows.extend(format_filter(
            filter,
            index.filter_vessel_of(&filter.plate.code),
        ));
    }
    for separator in &inventory.separators {
        rows.push(format_separator(separator));
    }

    rows
}
