//! Command-line tests for the headless runner

mod common;

use std::process::Command;

use common::{grid, write_file};
use preview::core::FrameSnapshot;

fn headless() -> Command {
    Command::new(env!("CARGO_BIN_EXE_preview-headless"))
}

#[test]
fn test_json_snapshot_after_moves() {
    let file = write_file(&grid(10, 4, '|'));
    let output = headless()
        .arg(file.path())
        .args(["--rows", "6", "--cols", "40", "--moves", "jjjjl"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let snapshot = FrameSnapshot::from_json(&String::from_utf8(output.stdout).unwrap()).unwrap();
    // Four data rows fit; the fifth move down scrolls one row
    assert_eq!(snapshot.window.first_row, 1);
    assert_eq!(snapshot.cursor.row, 3);
    assert_eq!(snapshot.cursor.col, 1);
    assert_eq!(snapshot.rows[0], vec!["r1c0", "r1c1"]);
}

#[test]
fn test_text_output() {
    let file = write_file(&grid(2, 2, ';'));
    let output = headless()
        .arg(file.path())
        .args(["-d", ";", "--rows", "5", "--cols", "40", "--text"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], " c0                | c1");
    assert_eq!(lines[1], " r0c0              | r0c1");
}

#[test]
fn test_no_header_flag() {
    let file = write_file(&grid(1, 1, '|'));
    let output = headless().arg("-h").arg(file.path()).output().unwrap();
    assert!(output.status.success());

    let snapshot = FrameSnapshot::from_json(&String::from_utf8(output.stdout).unwrap()).unwrap();
    assert_eq!(snapshot.headers, None);
    assert_eq!(snapshot.rows, vec![vec!["c0"], vec!["r0c0"]]);
}

#[test]
fn test_usage_errors() {
    assert!(!headless().output().unwrap().status.success());
    assert!(!headless().args(["a", "b"]).output().unwrap().status.success());
}

#[test]
fn test_missing_file_fails() {
    let output = headless().arg("/nonexistent/data.psv").output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("/nonexistent/data.psv"));
}

#[test]
fn test_bad_move_fails() {
    let file = write_file(&grid(1, 1, '|'));
    let output = headless()
        .arg(file.path())
        .args(["--moves", "jz"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_ragged_row_in_first_screen_is_reported() {
    let file = write_file("a|b\n1|2\n3|4\n5\n6|7\n");
    let output = headless()
        .arg(file.path())
        .args(["--rows", "8", "--cols", "80", "--text"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[2].starts_with(" 3"));
    assert!(!text.contains(" 6"));
    assert!(lines.last().unwrap().contains("row 3: expected 2 fields, found 1"));
}
