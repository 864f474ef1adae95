//! Integration tests for the dm329 CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SAMPLE_INPUT: &str = r#"
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
      serial_number: "A-100"
      volume_liters: 900
      max_pressure_bar: 11
      safety_valve:
        manufacturer: Valvex
        set_pressure_bar: 11
        rated_discharge_l_min: 5000
    - code: S2
      manufacturer: Acme
      volume_liters: 40
      max_pressure_bar: 11
  compressors:
    - code: C1
      manufacturer: Kompressa
      max_pressure_bar: 10
      flow_l_min: 3200
  deoilers:
    - code: C1.1
      volume_liters: 30
      max_pressure_bar: 15
      compressor_code: C1
additional_info:
  compressor_speeds:
    C1: variable
  compressor_tanks:
    C1: [S1]
  technician: Ing. Bianchi
"#;

/// Helper to get a dm329 command isolated from the user's config
fn dm329(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dm329").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("DM329_OUTPUT_DIR")
        .env_remove("DM329_TECHNICIAN")
        .env_remove("DM329_LOG");
    cmd
}

/// Helper to write the sample data sheet into a temp directory
fn write_input(tmp: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = tmp.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

// ============================================================================
// Generate
// ============================================================================

#[test]
fn test_generate_writes_docx() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "impianto.yaml", SAMPLE_INPUT);
    let out = tmp.path().join("out");

    dm329(&tmp)
        .arg("generate")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .args(["--date", "05-03-2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let report = out.join("Relazione_Tecnica_OfficineRossiSrl_05-03-2024.docx");
    let bytes = fs::read(&report).unwrap();
    assert!(bytes.starts_with(b"PK"));
    assert!(bytes
        .windows(b"word/document.xml".len())
        .any(|w| w == b"word/document.xml"));
}

#[test]
fn test_generate_quiet_prints_nothing() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "impianto.yml", SAMPLE_INPUT);

    dm329(&tmp)
        .current_dir(tmp.path())
        .args(["-q", "generate"])
        .arg(&input)
        .args(["--date", "01-01-2025"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(tmp
        .path()
        .join("Relazione_Tecnica_OfficineRossiSrl_01-01-2025.docx")
        .exists());
}

#[test]
fn test_generate_uses_output_dir_env() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "impianto.yaml", SAMPLE_INPUT);
    let out = tmp.path().join("relazioni");

    dm329(&tmp)
        .env("DM329_OUTPUT_DIR", &out)
        .arg("generate")
        .arg(&input)
        .args(["--date", "05-03-2024"])
        .assert()
        .success();

    assert!(out
        .join("Relazione_Tecnica_OfficineRossiSrl_05-03-2024.docx")
        .exists());
}

#[test]
fn test_generate_rejects_bad_date() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "impianto.yaml", SAMPLE_INPUT);

    dm329(&tmp)
        .arg("generate")
        .arg(&input)
        .args(["--date", "2024-03-05"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DD-MM-YYYY"));
}

#[test]
fn test_generate_rejects_unsupported_format() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "impianto.txt", SAMPLE_INPUT);

    dm329(&tmp)
        .arg("generate")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported input format"));
}

#[test]
fn test_generate_reports_syntax_errors() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "rotto.yaml", "inventory:\n  tanks: [\n");

    dm329(&tmp)
        .arg("generate")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid input file"));
}

#[test]
fn test_generate_missing_file() {
    let tmp = TempDir::new().unwrap();

    dm329(&tmp)
        .arg("generate")
        .arg(tmp.path().join("assente.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read input file"));
}

// ============================================================================
// Classify
// ============================================================================

#[test]
fn test_classify_table() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "impianto.yaml", SAMPLE_INPUT);

    dm329(&tmp)
        .arg("classify")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("| S1"))
        .stdout(predicate::str::contains("verifica"))
        .stdout(predicate::str::contains("subject to verification"));
}

#[test]
fn test_classify_json() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "impianto.yaml", SAMPLE_INPUT);

    let output = dm329(&tmp)
        .arg("classify")
        .arg(&input)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = entries.as_array().unwrap();

    let s1 = entries.iter().find(|e| e["position"] == "S1").unwrap();
    assert_eq!(s1["disposition"]["type"], "verification_required");

    let s2 = entries.iter().find(|e| e["position"] == "S2").unwrap();
    assert_eq!(s2["disposition"]["type"], "excluded");

    let deoiler = entries.iter().find(|e| e["position"] == "C1.1").unwrap();
    assert_eq!(deoiler["disposition"]["type"], "verification_required");
}

#[test]
fn test_classify_csv() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(&tmp, "impianto.yaml", SAMPLE_INPUT);

    dm329(&tmp)
        .arg("classify")
        .arg(&input)
        .args(["-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("POS.,DESCRIZIONE"))
        .stdout(predicate::str::contains("S2,"));
}

#[test]
fn test_classify_json_input() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(
        &tmp,
        "impianto.json",
        r#"{"customer": {"company_name": "Rossi"},
            "inventory": {"tanks": [{"code": "S9", "volume_liters": 100, "max_pressure_bar": 10}]}}"#,
    );

    dm329(&tmp)
        .arg("classify")
        .arg(&input)
        .args(["--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("S9,"))
        .stdout(predicate::str::contains("dichiarazione"));
}

// ============================================================================
// Completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();

    dm329(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dm329"));
}

#[test]
fn test_help_lists_commands() {
    let tmp = TempDir::new().unwrap();

    dm329(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("classify"));
}
