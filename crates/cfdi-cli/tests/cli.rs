use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const DONATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<cfdi:Comprobante xmlns:cfdi="http://www.sat.gob.mx/cfd/4" Version="4.0" Fecha="2024-05-01T09:00:00" Serie="F" Folio="1">
  <cfdi:Emisor Rfc="AAA010101AAA" Nombre="Fundacion"/>
  <cfdi:Conceptos>
    <cfdi:Concepto ClaveProdServ="84101600" Cantidad="1" Descripcion="Donativo - 99.00.100"/>
  </cfdi:Conceptos>
</cfdi:Comprobante>"#;

const NO_FIELDS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<cfdi:Comprobante xmlns:cfdi="http://www.sat.gob.mx/cfd/4" Version="4.0"/>"#;

const BROKEN: &str = "<cfdi:Comprobante xmlns:cfdi=\"http://www.sat.gob.mx/cfd/4\" Fecha=\"2024-05-01";

fn cfdi() -> Command {
    let mut cmd = Command::cargo_bin("cfdi").unwrap();
    // Keep the user's config file out of the way.
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("cfdi-cli-tests"));
    cmd
}

fn write_sources(dir: &Path) {
    fs::write(dir.join("A.xml"), DONATION).unwrap();
    fs::write(dir.join("B.xml"), NO_FIELDS).unwrap();
    fs::write(dir.join("C.xml"), BROKEN).unwrap();
    fs::write(dir.join("notes.txt"), "ignored").unwrap();
}

#[test]
fn test_classify_scenarios() {
    let source = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    write_sources(source.path());

    cfdi()
        .arg("classify")
        .arg(source.path())
        .arg(dest.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 3 of 3 files"))
        .stdout(predicate::str::contains("C.xml"));

    let root = dest.path();
    assert!(root.join("2024-05-01").join("Serie F").join("99.00.100").join("A.xml").is_file());
    assert!(
        root.join("SIN_FECHA")
            .join("Serie SIN_SERIE")
            .join("SIN_CODIGO")
            .join("B.xml")
            .is_file()
    );
    assert_eq!(fs::read(root.join("ERRORES").join("C.xml")).unwrap(), BROKEN.as_bytes());
    assert!(!root.join("notes.txt").exists());
    assert!(source.path().join("A.xml").is_file());
}

#[test]
fn test_classify_json_output() {
    let source = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    write_sources(source.path());

    let output = cfdi()
        .arg("classify")
        .arg(source.path())
        .arg(dest.path())
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["total"], 3);
    assert_eq!(result["classified"], 2);
    assert_eq!(result["errored"], 1);
    assert_eq!(result["failures"][0]["file_name"], "C.xml");
    assert_eq!(result["cancelled"], false);
}

#[test]
fn test_classify_writes_summary() {
    let source = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let reports = tempfile::tempdir().unwrap();
    write_sources(source.path());
    let summary = reports.path().join("summary.csv");

    cfdi()
        .arg("classify")
        .arg(source.path())
        .arg(dest.path())
        .arg("--summary")
        .arg(&summary)
        .assert()
        .success();

    let csv = fs::read_to_string(&summary).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "filename,status,date_folder,series,code,destination,error");
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("A.xml,classified,2024-05-01,F,99.00.100,"));
    assert!(lines[3].starts_with("C.xml,error,"));
}

#[test]
fn test_classify_empty_source() {
    let source = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();

    cfdi()
        .arg("classify")
        .arg(source.path())
        .arg(dest.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No XML files found"));

    assert_eq!(fs::read_dir(dest.path()).unwrap().count(), 0);
}

#[test]
fn test_classify_missing_source_fails() {
    let dest = tempfile::tempdir().unwrap();
    let missing = dest.path().join("missing");

    cfdi()
        .arg("classify")
        .arg(&missing)
        .arg(dest.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("source directory not found"));
}

#[test]
fn test_classify_with_config_file() {
    let source = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let conf_dir = tempfile::tempdir().unwrap();
    write_sources(source.path());
    let config = conf_dir.path().join("config.json");
    fs::write(&config, r#"{ "layout": { "error_dir": "FAILED" } }"#).unwrap();

    cfdi()
        .arg("--config")
        .arg(&config)
        .arg("classify")
        .arg(source.path())
        .arg(dest.path())
        .assert()
        .success();

    assert!(dest.path().join("FAILED").join("C.xml").is_file());
    assert!(!dest.path().join("ERRORES").exists());
}

#[test]
fn test_inspect_reports_key() {
    let source = tempfile::tempdir().unwrap();
    write_sources(source.path());

    cfdi()
        .arg("inspect")
        .arg(source.path().join("A.xml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-05-01"))
        .stdout(predicate::str::contains("99.00.100"))
        .stdout(predicate::str::contains("donation"));
}

#[test]
fn test_inspect_malformed_fails() {
    let source = tempfile::tempdir().unwrap();
    write_sources(source.path());

    cfdi()
        .arg("inspect")
        .arg(source.path().join("C.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not well-formed"));
}
