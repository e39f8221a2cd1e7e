//! End-to-end tests for the iffclip binary
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use iffclip_formats::ftxt::write_text_form;
use iffclip_formats::iff::{IffWriter, TypeTag};
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Command bound to a private unit directory and config location
fn iffclip(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("iffclip").unwrap();
    cmd.env("IFFCLIP_DIR", dir.path().join("units"))
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env_remove("IFFCLIP_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn seed_unit(dir: &TempDir, unit: u8, content: &[u8]) {
    let units = dir.path().join("units");
    fs::create_dir_all(&units).unwrap();
    fs::write(units.join(format!("unit-{unit:03}.clip")), content).unwrap();
}

/// Claim a unit from the test process until the returned file drops
fn hold_claim(dir: &TempDir, unit: u8) -> fs::File {
    let path = dir
        .path()
        .join("units")
        .join(format!("unit-{unit:03}.lock"));
    let file = fs::File::create(path).unwrap();
    file.try_lock().unwrap();
    file
}

fn unit_file(dir: &TempDir, unit: u8) -> std::path::PathBuf {
    dir.path()
        .join("units")
        .join(format!("unit-{unit:03}.clip"))
}

fn split_text_form(runs: &[&[u8]]) -> Vec<u8> {
    let mut writer = IffWriter::new(Vec::new());
    writer
        .with_container(TypeTag::FORM, TypeTag::FTXT, |w| {
            for run in runs {
                w.write_leaf(TypeTag::CHRS, run)?;
            }
            Ok(())
        })
        .unwrap();
    writer.finish().unwrap()
}

fn write_file(path: &Path, content: &[u8]) {
    fs::write(path, content).unwrap();
}

#[test]
fn test_help_command() {
    let dir = TempDir::new().unwrap();
    iffclip(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("copy"))
        .stdout(predicate::str::contains("paste"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("flush"))
        .stdout(predicate::str::contains("convert"));
}

#[test]
fn test_version_command() {
    let dir = TempDir::new().unwrap();
    iffclip(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("iffclip"));
}

#[test]
fn test_paste_concatenates_text_runs() {
    let dir = TempDir::new().unwrap();
    seed_unit(&dir, 0, &split_text_form(&[b"Hello, ", b"World!"]));
    let out = dir.path().join("out.txt");

    iffclip(&dir).arg("paste").arg(&out).assert().success();

    let pasted = fs::read(&out).unwrap();
    assert_eq!(pasted, b"Hello, World!");
    assert_eq!(pasted.len(), 13);
}

#[test]
fn test_paste_to_stdout() {
    let dir = TempDir::new().unwrap();
    seed_unit(&dir, 7, &split_text_form(&[b"abc"]));

    iffclip(&dir)
        .args(["paste", "-", "-u", "7"])
        .assert()
        .success()
        .stdout("abc");
}

#[test]
fn test_paste_empty_unit_creates_nothing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.txt");

    iffclip(&dir)
        .arg("paste")
        .arg(&out)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("iffclip: "))
        .stderr(predicate::str::contains("empty"));

    assert!(!out.exists());
}

#[test]
fn test_paste_refuses_existing_file() {
    let dir = TempDir::new().unwrap();
    seed_unit(&dir, 0, &split_text_form(&[b"new"]));
    let out = dir.path().join("taken.txt");
    write_file(&out, b"old");

    iffclip(&dir)
        .arg("paste")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(fs::read(&out).unwrap(), b"old");

    iffclip(&dir)
        .arg("paste")
        .arg(&out)
        .arg("--force")
        .assert()
        .success();
    assert_eq!(fs::read(&out).unwrap(), b"new");
}

#[test]
fn test_paste_non_iff_unit_fails() {
    let dir = TempDir::new().unwrap();
    seed_unit(&dir, 0, b"\x00\x01 plain bytes, no header");
    let out = dir.path().join("out.bin");

    iffclip(&dir)
        .arg("paste")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not hold IFF data"));
    assert!(!out.exists());
}

#[test]
fn test_copy_then_paste_round_trip() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    write_file(&input, b"line one\nline two\n");

    iffclip(&dir)
        .args(["copy", "-u", "3"])
        .arg(&input)
        .assert()
        .success();

    let stored = fs::read(unit_file(&dir, 3)).unwrap();
    assert_eq!(
        stored,
        write_text_form(Vec::new(), b"line one\nline two\n").unwrap()
    );

    iffclip(&dir)
        .args(["paste", "-u", "3"])
        .arg(&output)
        .assert()
        .success();
    assert_eq!(fs::read(&output).unwrap(), b"line one\nline two\n");
}

#[test]
fn test_copy_interchange_file_verbatim() {
    let dir = TempDir::new().unwrap();
    let mut writer = IffWriter::new(Vec::new());
    writer
        .with_container(TypeTag::FORM, TypeTag::new(*b"ILBM"), |w| {
            w.write_leaf(TypeTag::new(*b"BMHD"), &[0u8; 20])
        })
        .unwrap();
    let picture = writer.finish().unwrap();
    let input = dir.path().join("pic.iff");
    let output = dir.path().join("copy.iff");
    write_file(&input, &picture);

    iffclip(&dir).arg("copy").arg(&input).assert().success();
    assert_eq!(fs::read(unit_file(&dir, 0)).unwrap(), picture);

    iffclip(&dir).arg("paste").arg(&output).assert().success();
    assert_eq!(fs::read(&output).unwrap(), picture);
}

#[test]
fn test_copy_empty_text_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("empty.txt");
    write_file(&input, b"");

    iffclip(&dir)
        .arg("copy")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no text data to copy"));
    assert!(!unit_file(&dir, 0).exists());
}

#[test]
fn test_copy_binary_file_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("blob.bin");
    write_file(&input, &[0, 159, 146, 150, 0, 0, 7]);

    iffclip(&dir).arg("copy").arg(&input).assert().failure();
}

#[test]
fn test_list_shows_units_in_use() {
    let dir = TempDir::new().unwrap();
    seed_unit(&dir, 0, &write_text_form(Vec::new(), b"Hi").unwrap());
    let blob: Vec<u8> = (0u8..40).collect();
    seed_unit(&dir, 5, &blob);

    let output = iffclip(&dir)
        .arg("list")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();

    let rows: Vec<&str> = text
        .lines()
        .filter(|line| line.starts_with("   0  ") || line.starts_with("   5  "))
        .collect();
    assert_eq!(
        rows,
        vec![
            "   0  FTXT       14  (maps to 18)   Hi",
            "   5  ????       40",
        ]
    );
    assert!(text.contains("Total: 2 clipboard unit(s) in use."));
    assert!(text.contains("Suggested units from router v2."));
}

fn listed_rows(dir: &TempDir) -> Vec<String> {
    let output = iffclip(dir)
        .arg("list")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .skip(3)
        .take_while(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[test]
fn test_list_non_text_form() {
    let dir = TempDir::new().unwrap();
    let mut writer = IffWriter::new(Vec::new());
    writer
        .with_container(TypeTag::FORM, TypeTag::new(*b"ILBM"), |w| {
            w.write_leaf(TypeTag::new(*b"BMHD"), &[0u8; 20])
        })
        .unwrap();
    seed_unit(&dir, 5, &writer.finish().unwrap());

    assert_eq!(listed_rows(&dir), vec!["   5  ILBM       32  (maps to 26)"]);
}

#[test]
fn test_list_preview_joins_runs_and_stops_at_limit() {
    let dir = TempDir::new().unwrap();
    seed_unit(
        &dir,
        0,
        &split_text_form(&[
            b"Hello,\tworld!\r\n",
            b"second run\x01\x02 of text",
            b"third run goes past the limit",
        ]),
    );

    assert_eq!(
        listed_rows(&dir),
        vec!["   0  FTXT       94  (maps to 18)   Hello, world!  second run.. of textthird"]
    );
}

#[test]
fn test_list_empty_device() {
    let dir = TempDir::new().unwrap();
    iffclip(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No clipboard units contain data."))
        .stdout(predicate::str::contains("Total").not());
}

#[test]
fn test_list_skips_claimed_unit() {
    let dir = TempDir::new().unwrap();
    seed_unit(&dir, 2, &write_text_form(Vec::new(), b"busy").unwrap());
    let _claim = hold_claim(&dir, 2);

    iffclip(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No clipboard units contain data."));
}

#[test]
fn test_flush_empties_unit() {
    let dir = TempDir::new().unwrap();
    seed_unit(&dir, 9, &write_text_form(Vec::new(), b"gone").unwrap());

    iffclip(&dir).args(["flush", "-u", "9"]).assert().success();
    assert!(!unit_file(&dir, 9).exists());

    iffclip(&dir)
        .args(["paste", "-", "-u", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty"));
}

#[test]
fn test_convert_copies_and_pastes() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    write_file(&input, b"through the clipboard");

    iffclip(&dir)
        .args(["convert", "-u", "4"])
        .arg(&input)
        .arg(&output)
        .assert()
        .success();
    assert_eq!(fs::read(&output).unwrap(), b"through the clipboard");
    assert!(unit_file(&dir, 4).exists());
}

#[test]
fn test_convert_pastes_after_failed_copy() {
    let dir = TempDir::new().unwrap();
    seed_unit(&dir, 0, &write_text_form(Vec::new(), b"earlier").unwrap());
    let input = dir.path().join("empty.txt");
    let output = dir.path().join("out.txt");
    write_file(&input, b"");

    iffclip(&dir)
        .arg("convert")
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no text data to copy"));
    assert_eq!(fs::read(&output).unwrap(), b"earlier");
}

#[test]
fn test_unit_out_of_range_rejected() {
    let dir = TempDir::new().unwrap();
    iffclip(&dir)
        .args(["flush", "-u", "256"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("iffclip: "))
        .stderr(predicate::str::contains("256"))
        .stderr(predicate::function(|err: &str| err.lines().count() == 1));
}

#[test]
fn test_missing_subcommand_fails_with_one_line() {
    let dir = TempDir::new().unwrap();
    iffclip(&dir)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("iffclip: "))
        .stderr(predicate::str::contains("subcommand"))
        .stderr(predicate::function(|err: &str| err.lines().count() == 1));
}

#[test]
fn test_unknown_subcommand_fails_with_one_line() {
    let dir = TempDir::new().unwrap();
    iffclip(&dir)
        .arg("cut")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("iffclip: "));
}

#[test]
fn test_claimed_unit_is_unavailable() {
    let dir = TempDir::new().unwrap();
    seed_unit(&dir, 1, &write_text_form(Vec::new(), b"x").unwrap());
    let _claim = hold_claim(&dir, 1);

    iffclip(&dir)
        .args(["paste", "-", "-u", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("iffclip: "));
}

#[test]
fn test_leftover_lock_file_does_not_block_unit() {
    let dir = TempDir::new().unwrap();
    seed_unit(&dir, 1, &write_text_form(Vec::new(), b"still here").unwrap());
    fs::write(dir.path().join("units").join("unit-001.lock"), b"12345\n").unwrap();

    iffclip(&dir)
        .args(["paste", "-", "-u", "1"])
        .assert()
        .success()
        .stdout("still here");
}

#[test]
fn test_config_router_version() {
    let dir = TempDir::new().unwrap();
    seed_unit(&dir, 0, &write_text_form(Vec::new(), b"Hi").unwrap());
    let config = dir.path().join("iffclip.toml");
    write_file(&config, b"router_version = \"v1\"\n");

    iffclip(&dir)
        .arg("--config")
        .arg(&config)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("(maps to 41)"))
        .stdout(predicate::str::contains("router v1"));
}
