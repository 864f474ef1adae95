//! DM 329/2004 threshold classification
//!
//! Maps the volume and maximum allowable pressure of a vessel to the
//! procedure it is subject to. Thresholds:
//!
//! | Class | Excluded | Verification | Declaration |
//! |---|---|---|---|
//! | Tank | V < 50 l | PS × V > 8000 | otherwise |
//! | Small pressure vessel | V < 25 l | V ≥ 25 l and PS > 12 bar | otherwise |
//!
//! Small pressure vessels are deoilers, heat exchangers and filter vessels.
//! Compressors, dryers, filters, separators and safety valves are never
//! classified.

use serde::Serialize;

use crate::core::error::{ReportError, Result};
use crate::entities::{EquipmentKind, EquipmentRecord};

const TANK_MIN_VOLUME: f64 = 50.0;
const TANK_PSV_LIMIT: f64 = 8000.0;
const VESSEL_MIN_VOLUME: f64 = 25.0;
const VESSEL_PRESSURE_LIMIT: f64 = 12.0;

/// Procedure an item is subject to, with the reason
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "justification", rename_all = "snake_case")]
pub enum VerificationDisposition {
    /// Declaration of commissioning only
    Declaration(String),
    /// Commissioning verification by a third party
    VerificationRequired(String),
    /// Outside the scope of the decree
    Excluded(String),
}

/// Disposition without its justification, for grouping and counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispositionTag {
    Declaration,
    VerificationRequired,
    Excluded,
}

impl VerificationDisposition {
    pub fn tag(&self) -> DispositionTag {
        match self {
            VerificationDisposition::Declaration(_) => DispositionTag::Declaration,
            VerificationDisposition::VerificationRequired(_) => {
                DispositionTag::VerificationRequired
            }
            VerificationDisposition::Excluded(_) => DispositionTag::Excluded,
        }
    }

    pub fn justification(&self) -> &str {
        match self {
            VerificationDisposition::Declaration(j)
            | VerificationDisposition::VerificationRequired(j)
            | VerificationDisposition::Excluded(j) => j,
        }
    }

    pub fn requires_verification(&self) -> bool {
        self.tag() == DispositionTag::VerificationRequired
    }
}

impl std::fmt::Display for DispositionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispositionTag::Declaration => write!(f, "dichiarazione"),
            DispositionTag::VerificationRequired => write!(f, "verifica"),
            DispositionTag::Excluded => write!(f, "esclusa"),
        }
    }
}

/// Threshold rule applied to a vessel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VesselClass {
    /// Air receivers: PS × V rule
    Tank,
    /// Deoilers, heat exchangers, filter vessels: PS > 12 bar rule
    SmallPressureVessel,
}

impl VesselClass {
    /// Rule for an equipment kind; kinds outside the decree are an error
    pub fn for_kind(kind: EquipmentKind) -> Result<Self> {
        match kind {
            EquipmentKind::Tank => Ok(VesselClass::Tank),
            EquipmentKind::Deoiler | EquipmentKind::HeatExchanger | EquipmentKind::FilterVessel => {
                Ok(VesselClass::SmallPressureVessel)
            }
            EquipmentKind::Compressor
            | EquipmentKind::Dryer
            | EquipmentKind::Filter
            | EquipmentKind::Separator
            | EquipmentKind::SafetyValve => Err(ReportError::NotClassifiable { kind }),
        }
    }
}

/// PS × V product in bar·l
pub fn pressure_volume_product(volume_liters: f64, max_pressure_bar: f64) -> f64 {
    volume_liters * max_pressure_bar
}

/// PS × V for display: whole numbers as is, otherwise one decimal that
/// never lands on the other side of the 8000 limit
pub fn format_psv(psv: f64) -> String {
    if psv.fract() == 0.0 {
        return format!("{:.0}", psv);
    }
    let rounded = (psv * 10.0).round() / 10.0;
    let shown = if psv > TANK_PSV_LIMIT && rounded <= TANK_PSV_LIMIT {
        (psv * 10.0).ceil() / 10.0
    } else if psv <= TANK_PSV_LIMIT && rounded > TANK_PSV_LIMIT {
        (psv * 10.0).floor() / 10.0
    } else {
        rounded
    };
    format!("{:.1}", shown)
}

/// Classify a vessel from its volume and maximum allowable pressure
pub fn classify(
    class: VesselClass,
    volume_liters: Option<f64>,
    max_pressure_bar: Option<f64>,
) -> VerificationDisposition {
    let (volume, pressure) = match (volume_liters, max_pressure_bar) {
        (Some(v), Some(p)) => (v, p),
        _ => return VerificationDisposition::Excluded("Dati insufficienti".to_string()),
    };

    match class {
        VesselClass::Tank => classify_tank(volume, pressure),
        VesselClass::SmallPressureVessel => classify_small_vessel(volume, pressure),
    }
}

fn classify_tank(volume: f64, pressure: f64) -> VerificationDisposition {
    if volume < TANK_MIN_VOLUME {
        return VerificationDisposition::Excluded(
            "Volume < 50 litri (Art. 2.i DM 329/2004)".to_string(),
        );
    }

    let psv = pressure_volume_product(volume, pressure);
    if psv > TANK_PSV_LIMIT {
        VerificationDisposition::VerificationRequired(format!(
            "PS × V = {} > 8000 (Art. 4 e 5 DM 329/2004)",
            format_psv(psv)
        ))
    } else {
        VerificationDisposition::Declaration(format!(
            "PS × V = {} ≤ 8000 (Art. 4 e 5 DM 329/2004)",
            format_psv(psv)
        ))
    }
}

fn classify_small_vessel(volume: f64, pressure: f64) -> VerificationDisposition {
    if volume < VESSEL_MIN_VOLUME {
        return VerificationDisposition::Excluded(
            "Volume < 25 litri (Art. 2.i DM 329/2004)".to_string(),
        );
    }

    if pressure > VESSEL_PRESSURE_LIMIT {
        VerificationDisposition::VerificationRequired(
            "Volume ≥ 25 litri e PS > 12 bar (Art. 4 e 5 DM 329/2004)".to_string(),
        )
    } else {
        VerificationDisposition::Declaration("Volume ≥ 25 litri ma PS ≤ 12 bar".to_string())
    }
}

/// Classify a record, failing fast on kinds the decree never classifies
pub fn classify_record(record: &EquipmentRecord) -> Result<VerificationDisposition> {
    let class = VesselClass::for_kind(record.kind())?;
    let rating = record.rating().ok_or(ReportError::NotClassifiable {
        kind: record.kind(),
    })?;
    Ok(classify(class, rating.volume_liters, rating.max_pressure_bar))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Compressor, Nameplate, Tank, VesselRating};

    fn tank(v: f64, p: f64) -> VerificationDisposition {
        classify(VesselClass::Tank, Some(v), Some(p))
    }

    fn vessel(v: f64, p: f64) -> VerificationDisposition {
        classify(VesselClass::SmallPressureVessel, Some(v), Some(p))
    }

    #[test]
    fn test_missing_data_is_excluded() {
        for class in [VesselClass::Tank, VesselClass::SmallPressureVessel] {
            assert_eq!(
                classify(class, None, Some(10.0)),
                VerificationDisposition::Excluded("Dati insufficienti".to_string())
            );
            assert_eq!(classify(class, Some(100.0), None).tag(), DispositionTag::Excluded);
            assert_eq!(classify(class, None, None).tag(), DispositionTag::Excluded);
        }
    }

    #[test]
    fn test_tank_volume_threshold() {
        assert_eq!(tank(49.9, 200.0).tag(), DispositionTag::Excluded);
        assert!(tank(49.9, 200.0).justification().contains("50 litri"));
        assert_eq!(tank(50.0, 10.0).tag(), DispositionTag::Declaration);
    }

    #[test]
    fn test_tank_psv_boundary() {
        // 500 l × 16 bar = 8000 exactly: declaration only
        assert_eq!(tank(500.0, 16.0).tag(), DispositionTag::Declaration);
        assert_eq!(tank(500.0, 16.01).tag(), DispositionTag::VerificationRequired);
        assert_eq!(tank(50.0, 160.0).tag(), DispositionTag::Declaration);
    }

    #[test]
    fn test_tank_justification_contains_product() {
        let d = tank(100.0, 90.0);
        assert_eq!(d.tag(), DispositionTag::VerificationRequired);
        assert!(d.justification().contains("9000"));

        let d = tank(100.0, 11.0);
        assert!(d.justification().contains("1100"));
        assert!(d.justification().contains("≤ 8000"));
    }

    #[test]
    fn test_small_vessel_thresholds() {
        assert_eq!(vessel(24.9, 100.0).tag(), DispositionTag::Excluded);
        assert_eq!(vessel(25.0, 12.0).tag(), DispositionTag::Declaration);
        assert_eq!(vessel(25.0, 12.01).tag(), DispositionTag::VerificationRequired);
        assert_eq!(vessel(30.0, 15.0).tag(), DispositionTag::VerificationRequired);
        assert_eq!(vessel(1000.0, 8.0).tag(), DispositionTag::Declaration);
    }

    #[test]
    fn test_zero_values_are_not_missing() {
        assert_eq!(tank(0.0, 10.0).tag(), DispositionTag::Excluded);
        assert!(tank(0.0, 10.0).justification().contains("50 litri"));
        assert_eq!(tank(100.0, 0.0).tag(), DispositionTag::Declaration);
    }

    #[test]
    fn test_unclassified_kinds_fail_fast() {
        for kind in [
            EquipmentKind::Compressor,
            EquipmentKind::Dryer,
            EquipmentKind::Filter,
            EquipmentKind::Separator,
            EquipmentKind::SafetyValve,
        ] {
            assert!(matches!(
                VesselClass::for_kind(kind),
                Err(ReportError::NotClassifiable { kind: k }) if k == kind
            ));
        }
        assert_eq!(
            VesselClass::for_kind(EquipmentKind::FilterVessel).unwrap(),
            VesselClass::SmallPressureVessel
        );
    }

    #[test]
    fn test_classify_record() {
        let record = EquipmentRecord::from(Tank {
            plate: Nameplate {
                code: "S1".to_string(),
                ..Default::default()
            },
            rating: VesselRating {
                volume_liters: Some(270.0),
                max_pressure_bar: Some(11.0),
                ..Default::default()
            },
            ..Default::default()
        });
        assert_eq!(
            classify_record(&record).unwrap().tag(),
            DispositionTag::Declaration
        );

        let record = EquipmentRecord::from(Compressor::default());
        assert!(classify_record(&record).is_err());
    }

    #[test]
    fn test_psv_text_stays_on_its_side_of_the_limit() {
        assert_eq!(format_psv(8000.0), "8000");
        assert_eq!(format_psv(5499.5), "5499.5");
        assert_eq!(format_psv(8000.04), "8000.1");
        assert_eq!(format_psv(7999.96), "8000.0");

        let d = tank(500.02, 16.0);
        assert_eq!(d.tag(), DispositionTag::VerificationRequired);
        assert!(d.justification().starts_with("PS × V = 8000.3 > 8000"));
    }

    #[test]
    fn test_classification_is_pure() {
        assert_eq!(tank(720.0, 13.0), tank(720.0, 13.0));
    }
}
