//! Integration tests for the trieseg CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get the path to a test fixture
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

fn trieseg() -> Command {
    Command::cargo_bin("trieseg").unwrap()
}

#[test]
fn test_index_report_to_stdout() {
    trieseg()
        .arg("index")
        .arg("-i")
        .arg(fixture_path("corpus.txt"))
        .arg("-u")
        .arg(fixture_path("units.txt"))
        .arg("-t")
        .arg(fixture_path("types.txt"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<output>"))
        .stdout(predicate::str::contains("<units>2</units>"))
        .stdout(predicate::str::contains("<leaf "));
}

#[test]
fn test_index_writes_every_output_and_trie() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("report1.xml");
    let second = temp_dir.path().join("report2.xml");
    let trie = temp_dir.path().join("trie.json");

    trieseg()
        .arg("index")
        .arg("-i")
        .arg(fixture_path("corpus.txt"))
        .arg("-o")
        .arg(&first)
        .arg("-o")
        .arg(&second)
        .arg("--trie")
        .arg(&trie)
        .arg("--max-depth")
        .arg("5")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let report = fs::read_to_string(&first).unwrap();
    assert_eq!(report, fs::read_to_string(&second).unwrap());
    assert!(report.contains("<units>7</units>"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&trie).unwrap()).unwrap();
    assert!(json["children"]["w"]["children"]["a"].is_object());
    assert_eq!(json["children"]["w"]["count"], 4);
}

#[test]
fn test_index_rejects_bad_units() {
    let temp_dir = TempDir::new().unwrap();
    let units = temp_dir.path().join("units.txt");
    fs::write(&units, "5\n2\n").unwrap();

    trieseg()
        .arg("index")
        .arg("-i")
        .arg(fixture_path("corpus.txt"))
        .arg("-u")
        .arg(&units)
        .assert()
        .failure();
}

#[test]
fn test_segment_file() {
    trieseg()
        .arg("segment")
        .arg("--trie")
        .arg(fixture_path("trie.json"))
        .arg("-i")
        .arg(fixture_path("abcd.txt"))
        .arg("-w")
        .arg("4")
        .arg("-d")
        .arg("|")
        .assert()
        .success()
        .stdout("ab|cd|");
}

#[test]
fn test_segment_stdin_with_config_file() {
    trieseg()
        .arg("-c")
        .arg(fixture_path("config.toml"))
        .arg("segment")
        .arg("--trie")
        .arg(fixture_path("trie.json"))
        .arg("--emit-scores")
        .write_stdin("abcd")
        .assert()
        .success()
        .stdout("ab|1|cd|");
}

#[test]
fn test_segment_no_emit_scores_overrides_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("scores.toml");
    fs::write(
        &config,
        "[segmenter]\nwindow_size = 4\ndivider = \"|\"\nemit_scores = true\n",
    )
    .unwrap();

    trieseg()
        .arg("-c")
        .arg(&config)
        .arg("segment")
        .arg("--trie")
        .arg(fixture_path("trie.json"))
        .write_stdin("abcd")
        .assert()
        .success()
        .stdout("ab|1|cd|");

    trieseg()
        .arg("-c")
        .arg(&config)
        .arg("segment")
        .arg("--trie")
        .arg(fixture_path("trie.json"))
        .arg("--no-emit-scores")
        .write_stdin("abcd")
        .assert()
        .success()
        .stdout("ab|cd|");
}

#[test]
fn test_segment_escaped_divider() {
    trieseg()
        .arg("segment")
        .arg("--trie")
        .arg(fixture_path("trie.json"))
        .arg("-w")
        .arg("4")
        .arg("-d")
        .arg("\\n")
        .write_stdin("abcd")
        .assert()
        .success()
        .stdout("ab\ncd\n");
}

#[test]
fn test_segment_multiple_outputs() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("a.txt");
    let second = temp_dir.path().join("b.txt");

    trieseg()
        .arg("-c")
        .arg(fixture_path("config.toml"))
        .arg("segment")
        .arg("--trie")
        .arg(fixture_path("trie.json"))
        .arg("-i")
        .arg(fixture_path("abcd.txt"))
        .arg("-o")
        .arg(&first)
        .arg("-o")
        .arg(&second)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&first).unwrap(), "ab|cd|");
    assert_eq!(fs::read_to_string(&second).unwrap(), "ab|cd|");
}

#[test]
fn test_index_then_segment() {
    let temp_dir = TempDir::new().unwrap();
    let trie = temp_dir.path().join("trie.json");
    trieseg()
        .arg("index")
        .arg("-i")
        .arg(fixture_path("corpus.txt"))
        .arg("-o")
        .arg(temp_dir.path().join("report.xml"))
        .arg("--trie")
        .arg(&trie)
        .assert()
        .success();

    let output = trieseg()
        .arg("segment")
        .arg("--trie")
        .arg(&trie)
        .arg("-w")
        .arg("6")
        .arg("-d")
        .arg(" ")
        .write_stdin("walkedtalks")
        .output()
        .unwrap();
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    assert_eq!(text.replace(' ', ""), "walkedtalks");
}

#[test]
fn test_segment_missing_trie() {
    trieseg()
        .arg("segment")
        .arg("--trie")
        .arg("nonexistent.json")
        .write_stdin("abcd")
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_invalid_window() {
    trieseg()
        .arg("segment")
        .arg("--trie")
        .arg(fixture_path("trie.json"))
        .arg("-w")
        .arg("0")
        .write_stdin("abcd")
        .assert()
        .failure()
        .stderr(predicate::str::contains("window_size"));
}

#[test]
fn test_search_patterns() {
    trieseg()
        .arg("search")
        .arg("-i")
        .arg(fixture_path("corpus.txt"))
        .arg("walk")
        .arg("xyz")
        .assert()
        .success()
        .stdout(predicate::str::contains("walk\ttrue"))
        .stdout(predicate::str::contains("xyz\tfalse"));
}

#[test]
fn test_search_longest_and_dump() {
    trieseg()
        .arg("search")
        .arg("-i")
        .arg(fixture_path("corpus.txt"))
        .arg("--longest")
        .arg("--dump")
        .arg("talkz")
        .assert()
        .success()
        .stdout(predicate::str::contains("suffix tree:"))
        .stdout(predicate::str::contains("talkz\t4"));
}

#[test]
fn test_search_without_patterns() {
    trieseg()
        .arg("search")
        .arg("-i")
        .arg(fixture_path("corpus.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));
}

#[test]
fn test_morph() {
    trieseg()
        .arg("morph")
        .arg("-i")
        .arg(fixture_path("corpus.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("walk\t"))
        .stdout(predicate::str::contains("talk\t"));
}

#[test]
fn test_invalid_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("bad.toml");
    fs::write(&config, "[segmenter]\nwindow = 3\n").unwrap();

    trieseg()
        .arg("-c")
        .arg(&config)
        .arg("morph")
        .write_stdin("walk$")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config file"));
}

#[test]
fn test_help_lists_commands() {
    trieseg()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("index"))
        .stdout(predicate::str::contains("segment"))
        .stdout(predicate::str::contains("morph"));
}
