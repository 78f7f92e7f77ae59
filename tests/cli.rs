use assert_cmd::prelude::*;
use image::{GenericImageView, Rgb, RgbImage};
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

// A small image with a bright diagonal band, written as PNG.
fn fixture(dir: &TempDir, width: u32, height: u32) -> PathBuf {
    let img = RgbImage::from_fn(width, height, |x, y| {
        if (x + y) % 7 < 2 {
            Rgb([250, 240, 230])
        } else {
            Rgb([(x * 9) as u8, (y * 13) as u8, 40])
        }
    });
    let path = dir.path().join("input.png");
    img.save(&path).unwrap();
    path
}

fn dimensions(path: &Path) -> (u32, u32) {
    image::open(path).unwrap().dimensions()
}

fn seamcarve() -> Command {
    Command::cargo_bin("seamcarve").unwrap()
}

#[test]
fn carves_explicit_seam_counts() {
    let dir = tempdir().unwrap();
    let input = fixture(&dir, 20, 10);
    let output = dir.path().join("out.png");
    seamcarve()
        .arg("-x")
        .arg("5")
        .arg("-y")
        .arg("2")
        .arg(&input)
        .arg(&output)
        .assert()
        .success();
    assert_eq!(dimensions(&output), (15, 8));
}

#[test]
fn carves_to_target_dimensions() {
    let dir = tempdir().unwrap();
    let input = fixture(&dir, 16, 12);
    let output = dir.path().join("out.png");
    seamcarve()
        .args(&["--width", "11", "--height", "9", "--recompute-interval", "3"])
        .arg(&input)
        .arg(&output)
        .assert()
        .success();
    assert_eq!(dimensions(&output), (11, 9));
}

#[test]
fn splits_a_total_over_both_axes() {
    let dir = tempdir().unwrap();
    let input = fixture(&dir, 20, 10);
    let output = dir.path().join("out.png");
    seamcarve()
        .args(&["--seams", "7", "--blend", "--enhanced", "--forward"])
        .arg(&input)
        .arg(&output)
        .assert()
        .success();
    assert_eq!(dimensions(&output), (16, 7));
}

#[test]
fn stops_at_the_floor_without_failing() {
    let dir = tempdir().unwrap();
    let input = fixture(&dir, 6, 6);
    let output = dir.path().join("out.png");
    seamcarve()
        .args(&["-x", "50", "--min-dimension", "3"])
        .arg(&input)
        .arg(&output)
        .assert()
        .success();
    assert_eq!(dimensions(&output), (3, 6));
}

#[test]
fn writes_the_energy_map() {
    let dir = tempdir().unwrap();
    let input = fixture(&dir, 9, 7);
    let output = dir.path().join("energy.png");
    seamcarve()
        .arg("--energy")
        .arg(&input)
        .arg(&output)
        .assert()
        .success();
    assert_eq!(dimensions(&output), (9, 7));
}

#[test]
fn refuses_to_enlarge() {
    let dir = tempdir().unwrap();
    let input = fixture(&dir, 8, 8);
    let output = dir.path().join("out.png");
    seamcarve()
        .args(&["--width", "12"])
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot enlarge"));
}

#[test]
fn rejects_bad_numbers() {
    let dir = tempdir().unwrap();
    let input = fixture(&dir, 8, 8);
    let output = dir.path().join("out.png");
    seamcarve()
        .args(&["-x", "three"])
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("whole number"));
}

#[test]
fn reports_missing_input() {
    let dir = tempdir().unwrap();
    seamcarve()
        .arg(dir.path().join("nope.png"))
        .arg(dir.path().join("out.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("seamcarve:"));
}
