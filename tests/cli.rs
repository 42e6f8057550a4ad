use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn with_extension(dir: &Path, ext: &str) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().map_or(false, |x| x == ext))
        .collect();
    found.sort();
    found
}

#[test]
fn renders_ten_frames_and_an_animation() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("montepi")
        .unwrap()
        .args(&["100", "1000", "2", "--output"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(".gif"));

    let frames = with_extension(dir.path(), "ppm");
    assert_eq!(frames.len(), 10);
    for frame in &frames {
        let bytes = fs::read(frame).unwrap();
        assert!(bytes.starts_with(b"P6 100 100 255\n"));
        assert_eq!(bytes.len(), 15 + 100 * 100 * 3);
        let name = frame.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("img"));
        assert!(name.contains('_') && name.contains('-'));
    }

    let animations = with_extension(dir.path(), "gif");
    assert_eq!(animations.len(), 1);
    assert!(fs::read(&animations[0]).unwrap().starts_with(b"GIF89a"));
}

#[test]
fn frame_count_is_configurable() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("montepi")
        .unwrap()
        .args(&["40", "100", "1", "--frames", "4", "--threads", "1", "-o"])
        .arg(dir.path())
        .assert()
        .success();
    assert_eq!(with_extension(dir.path(), "ppm").len(), 4);
}

#[test]
fn rejects_a_zero_size() {
    Command::cargo_bin("montepi")
        .unwrap()
        .args(&["0", "1000", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("image size"));
}

#[test]
fn rejects_a_non_numeric_precision() {
    Command::cargo_bin("montepi")
        .unwrap()
        .args(&["100", "1000", "two"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("decimals"));
}

#[test]
fn rejects_too_few_points_for_the_frames() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("montepi")
        .unwrap()
        .args(&["100", "10", "2", "-o"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid configuration"));
    assert!(with_extension(dir.path(), "ppm").is_empty());
}

#[test]
fn clean_removes_stale_output() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("stale.ppm"), b"old").unwrap();
    fs::write(dir.path().join("stale.gif"), b"old").unwrap();
    fs::write(dir.path().join("notes.txt"), b"keep").unwrap();

    Command::cargo_bin("montepi")
        .unwrap()
        .args(&["30", "300", "1", "--clean", "-o"])
        .arg(dir.path())
        .assert()
        .success();

    assert!(!dir.path().join("stale.ppm").exists());
    assert!(!dir.path().join("stale.gif").exists());
    assert!(dir.path().join("notes.txt").exists());
    assert_eq!(with_extension(dir.path(), "ppm").len(), 10);
}

#[test]
fn failed_assembly_keeps_the_frames() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("montepi")
        .unwrap()
        .env("PATH", "")
        .args(&["30", "300", "1", "--assembler", "convert", "-o"])
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("convert -delay 100 -loop 0"));
    assert_eq!(with_extension(dir.path(), "ppm").len(), 10);
}
