//! Integration tests for the `contour` command line
//!
//! Runs the real binary: argument validation must fail before any output is written, and a
//! valid invocation must produce the output image.

mod common;

use std::path::Path;
use std::process::{Command, Output};

use common::{disc, indexed_tiles, write_tiles};
use marching_contours::codec::{read_bitmap, write_bitmap};

fn contour(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_contour"))
        .args(args)
        .output()
        .expect("failed to run contour binary")
}

fn arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

#[test]
fn test_missing_arguments_exit_non_zero() {
    assert!(!contour(&[]).status.success());
    assert!(!contour(&["in.ppm"]).status.success());

    let out = contour(&["in.ppm", "out.ppm"]);
    assert!(!out.status.success());
    assert!(!out.stderr.is_empty());
}

#[test]
fn test_invalid_worker_count_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.ppm");
    let output = dir.path().join("out.ppm");
    write_bitmap(&disc(32, 32), &input).unwrap();

    for workers in ["0", "-4", "abc", "2.5"] {
        let out = contour(&[arg(&input), arg(&output), workers, "--builtin-tiles"]);
        assert!(!out.status.success(), "workers = {}", workers);
        let stderr = String::from_utf8_lossy(&out.stderr);
        assert!(stderr.contains("Worker count"), "stderr: {}", stderr);
        assert!(!output.exists());
    }
}

#[test]
fn test_builtin_tiles_run() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.ppm");
    let output = dir.path().join("out.png");
    write_bitmap(&disc(81, 65), &input).unwrap();

    let out = contour(&[arg(&input), arg(&output), "3", "--builtin-tiles", "--step", "4"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let rendered = read_bitmap(&output).unwrap();
    assert_eq!((rendered.width(), rendered.height()), (81, 65));
}

#[test]
fn test_tile_directory_run() {
    let dir = tempfile::tempdir().unwrap();
    let tiles_dir = dir.path().join("contours");
    std::fs::create_dir(&tiles_dir).unwrap();
    write_tiles(&tiles_dir, &indexed_tiles(8));

    let input = dir.path().join("in.ppm");
    let output = dir.path().join("out.ppm");
    write_bitmap(&disc(64, 64), &input).unwrap();

    let out = contour(&[arg(&input), arg(&output), "2", "--contours", arg(&tiles_dir)]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(output.exists());
}

#[test]
fn test_missing_tiles_fail_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.ppm");
    let output = dir.path().join("out.ppm");
    write_bitmap(&disc(16, 16), &input).unwrap();

    let empty = dir.path().join("no-tiles");
    std::fs::create_dir(&empty).unwrap();

    let out = contour(&[arg(&input), arg(&output), "2", "--contours", arg(&empty)]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("0.ppm"));
    assert!(!output.exists());
}

#[test]
fn test_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.ppm");
    let out = contour(&["/no/such/image.ppm", arg(&output), "1", "--builtin-tiles"]);
    assert!(!out.status.success());
    assert!(!output.exists());
}
