//! Integration tests for the retexto CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get the path to a test fixture
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{name}")
}

fn retexto() -> Command {
    let mut cmd = Command::cargo_bin("retexto").unwrap();
    cmd.env_remove("RETEXTO_CONFIG").env_remove("RETEXTO_LANGUAGE");
    cmd
}

#[test]
fn test_punctuate_spanish_dictation() {
    retexto()
        .args(["punctuate", "-q", "-i"])
        .arg(fixture_path("dictado.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Bueno llegamos tarde, porque llovía, sin embargo la reunión salió bien.",
        ));
}

#[test]
fn test_punctuate_english() {
    retexto()
        .args(["punctuate", "-q", "-l", "en", "-i"])
        .arg(fixture_path("english.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "The meeting started late, however everyone stayed.",
        ));
}

#[test]
fn test_punctuate_unknown_language() {
    retexto()
        .args(["punctuate", "-q", "-l", "xx", "-i"])
        .arg(fixture_path("dictado.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("xx"));
}

#[test]
fn test_split_json_output() {
    let output = retexto()
        .args(["split", "-q", "-f", "json", "-e", "words", "-s", "12", "--overlap", "2", "-i"])
        .arg(fixture_path("acta.txt"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let fragments: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let fragments = fragments.as_array().unwrap();
    assert!(fragments.len() > 1);
    assert_eq!(fragments[0]["offset"], 0);
    assert_eq!(fragments[0]["text"], "Se abre la sesión a las diez.");
    assert!(fragments[1]["overlap_bytes"].as_u64().unwrap() > 0);
}

#[test]
fn test_split_short_document_is_whole() {
    retexto()
        .args(["split", "-q", "-f", "markdown", "-i"])
        .arg(fixture_path("acta.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("*Total segments: 1*"));
}

#[test]
fn test_split_glob_labels_sources() {
    retexto()
        .args(["split", "-q", "-i", "tests/fixtures/*.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("==> tests/fixtures/acta.txt <=="))
        .stdout(predicate::str::contains("==> tests/fixtures/english.txt <=="));
}

#[test]
fn test_split_no_matching_files() {
    retexto()
        .args(["split", "-q", "-i", "tests/fixtures/*.nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No files found"));
}

#[test]
fn test_run_identity_reproduces_input() {
    let expected = fs::read_to_string(fixture_path("acta.txt")).unwrap();

    retexto()
        .args([
            "run", "-q", "-p", "identity", "-e", "words", "-s", "10", "--overlap", "0", "-i",
        ])
        .arg(fixture_path("acta.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.trim()));
}

#[test]
fn test_run_from_stdin_writes_artifact() {
    let dir = TempDir::new().unwrap();

    retexto()
        .args(["run", "-q", "-i", "-", "--output-dir"])
        .arg(dir.path())
        .write_stdin("hola como estas yo bien y tu")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hola como estas yo bien y tu."));

    let artifact = fs::read_to_string(dir.path().join("texto_procesado.txt")).unwrap();
    assert_eq!(artifact, "Hola como estas yo bien y tu.");
}

#[test]
fn test_run_reports_summary() {
    retexto()
        .args(["run", "-p", "identity", "-i"])
        .arg(fixture_path("acta.txt"))
        .assert()
        .success()
        .stderr(predicate::str::contains("1 fragment(s)"));
}

#[test]
fn test_run_rejects_bad_fragmenter_settings() {
    retexto()
        .args(["run", "-q", "-s", "5", "--overlap", "5", "-i"])
        .arg(fixture_path("acta.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("must exceed overlap"));
}

#[test]
fn test_generate_and_validate_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("retexto.toml");

    retexto()
        .args(["generate-config", "-o"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("generated successfully"));

    retexto()
        .args(["validate", "-c"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Kind: retexto"));

    retexto()
        .args(["split", "-q", "-c"])
        .arg(&config)
        .args(["-i", fixture_path("acta.txt").as_str()])
        .assert()
        .success();
}

#[test]
fn test_generated_language_config_is_usable() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("gl.toml");

    retexto()
        .args(["generate-config", "-k", "language", "-l", "gl", "-o"])
        .arg(&config)
        .assert()
        .success();

    retexto()
        .args(["validate", "-c"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Language code: gl"));

    retexto()
        .args(["punctuate", "-q", "--language-config"])
        .arg(&config)
        .args(["-i", fixture_path("english.txt").as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("The meeting started late however everyone stayed."));
}

#[test]
fn test_validate_invalid_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[metadata]\ncode = \"\"\nname = \"x\"\n\n[terminators]\nchars = [\".\"]\n")
        .unwrap();

    retexto()
        .args(["validate", "-c"])
        .arg(&config)
        .assert()
        .failure()
        .stdout(predicate::str::contains("✗ Configuration is invalid!"));
}

#[test]
fn test_list_commands() {
    retexto()
        .args(["list", "languages"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Spanish"))
        .stdout(predicate::str::contains("English"));

    retexto()
        .args(["list", "formats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("json"));

    retexto()
        .args(["list", "estimators"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tokens"));
}

#[test]
fn test_help_lists_commands() {
    retexto()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("split"))
        .stdout(predicate::str::contains("punctuate"))
        .stdout(predicate::str::contains("generate-config"));
}
