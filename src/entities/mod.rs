//! Input data model
//!
//! - [`EquipmentRecord`] - sum type over the eight equipment families
//! - [`Customer`] / [`Address`] - who operates the installation and where
//! - [`ReportInput`] - the complete snapshot handed to the report engine

pub mod customer;
pub mod equipment;
pub mod input;

pub use customer::{Address, Customer};
pub use equipment::{
    Compressor, CondensateDrain, Deoiler, Dryer, EquipmentKind, EquipmentRecord, Filter,
    FilterVessel, HeatExchanger, InternalFinish, Nameplate, PressureGauge, SafetyValve,
    Separator, Tank, VesselRating,
};
pub use input::{
    AdditionalInfo, InstallationFlags, IntakeAir, Inventory, ReportInput, SpeedRegulation,
};
