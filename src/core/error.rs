//! Report generation errors
//!
//! Missing numeric attributes and unresolved code links are not errors: the
//! classifier and formatter resolve them. What remains are programming
//! errors (wrong equipment kind) and serialization failures.

use miette::Diagnostic;
use thiserror::Error;

use crate::entities::EquipmentKind;

#[derive(Debug, Error, Diagnostic)]
pub enum ReportError {
    #[error("{kind} equipment is never classified under DM 329/2004")]
    #[diagnostic(code(dm329::classifier::not_classifiable))]
    NotClassifiable { kind: EquipmentKind },

    #[error("malformed input: {0}")]
    #[diagnostic(
        code(dm329::formatter::malformed),
        help("report generation failed, check input data")
    )]
    MalformedInput(String),

    #[error("failed to serialize document: {0}")]
    #[diagnostic(
        code(dm329::render::serialization),
        help("report generation failed, check input data")
    )]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ReportError::NotClassifiable {
            kind: EquipmentKind::Compressor,
        };
        assert_eq!(
            err.to_string(),
            "compressor equipment is never classified under DM 329/2004"
        );

        let err = ReportError::MalformedInput("tank linked to compressor C1".to_string());
        assert!(err.to_string().starts_with("malformed input"));
        assert!(err.help().is_some());
    }
}
