//! Loading a [`ReportInput`] from YAML or JSON

pub mod diagnostics;

pub use diagnostics::{InputError, InputSyntaxError};

use std::path::Path;

use crate::entities::ReportInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Yaml,
    Json,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(InputFormat::Yaml),
            "json" => Some(InputFormat::Json),
            _ => None,
        }
    }
}

/// Parse input text; `filename` labels diagnostics
pub fn parse_input_str(
    source: &str,
    filename: &str,
    format: InputFormat,
) -> Result<ReportInput, InputError> {
    let parsed: Result<ReportInput, InputSyntaxError> = match format {
        InputFormat::Yaml => serde_yml::from_str(source)
            .map_err(|e| InputSyntaxError::from_yaml(&e, source, filename)),
        InputFormat::Json => serde_json::from_str(source)
            .map_err(|e| InputSyntaxError::from_json(&e, source, filename)),
    };
    Ok(parsed?)
}

pub fn parse_input_file(path: &Path) -> Result<ReportInput, InputError> {
    let format = InputFormat::from_path(path).ok_or_else(|| InputError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let source = std::fs::read_to_string(path)?;
    let input = parse_input_str(&source, &path.display().to_string(), format)?;

    tracing::debug!(
        path = %path.display(),
        tanks = input.inventory.tanks.len(),
        compressors = input.inventory.compressors.len(),
        "input loaded"
    );
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
customer:
  company_name: Officine Rossi S.r.l.
  legal_address:
    street: Via Roma
    civic_number: "12"
    postal_code: "31020"
    city: San Polo di Piave
    province: TV
activity_description: carpenteria metallica
inventory:
  tanks:
    - code: S1
      manufacturer: Acme
      volume_liters: 500
      max_pressure_bar: 11
"#;

    #[test]
    fn test_format_from_path() {
        assert_eq!(InputFormat::from_path(Path::new("a.yaml")), Some(InputFormat::Yaml));
        assert_eq!(InputFormat::from_path(Path::new("a.YML")), Some(InputFormat::Yaml));
        assert_eq!(InputFormat::from_path(Path::new("a.json")), Some(InputFormat::Json));
        assert_eq!(InputFormat::from_path(Path::new("a.txt")), None);
        assert_eq!(InputFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_parse_yaml() {
        let input = parse_input_str(SAMPLE, "sample.yaml", InputFormat::Yaml).unwrap();
        assert_eq!(input.inventory.tanks[0].plate.code, "S1");
        assert_eq!(input.inventory.tanks[0].rating.volume_liters, Some(500.0));
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{"customer": {"company_name": "Rossi"}, "inventory": {"compressors": [{"code": "C1", "flow_l_min": 3200}]}}"#;
        let input = parse_input_str(json, "sample.json", InputFormat::Json).unwrap();
        assert_eq!(input.inventory.compressors[0].flow_l_min, Some(3200.0));
    }

    #[test]
    fn test_syntax_error_is_diagnostic() {
        let err = parse_input_str("customer: [", "bad.yaml", InputFormat::Yaml).unwrap_err();
        assert!(matches!(err, InputError::Syntax(_)));
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let input = parse_input_file(file.path()).unwrap();
        assert_eq!(input.customer.company_name, "Officine Rossi S.r.l.");

        let err = parse_input_file(Path::new("input.txt")).unwrap_err();
        assert!(matches!(err, InputError::UnsupportedFormat { .. }));
    }
}
