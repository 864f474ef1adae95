//! dm329 - pressure equipment classification and technical reports
//!
//! Classifies the pressure equipment of a compressed-air installation under
//! Italian DM 329/2004 and produces the "Relazione Tecnica" as a DOCX file.

pub mod cli;
pub mod core;
pub mod entities;
pub mod report;
pub mod yaml;
