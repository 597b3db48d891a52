//! Viewport tests
//!
//! Drive a frame over real files and check the window it holds after each
//! load and shift.

mod common;

use common::{comma_options, grid, mmap_source, write_file};
use preview::core::{Direction, Frame, FrameError, Movement};
use preview::data::{open_source, DataError, DataSource, LineSource, ParseErrorKind};
use proptest::prelude::*;

/// Cell text of the frame, row-major
fn cells(frame: &Frame) -> Vec<Vec<String>> {
    frame.snapshot().rows
}

// ============================================================================
// End-to-end scrolling
// ============================================================================

#[test]
fn test_load_then_scroll_to_end() {
    // Header plus four data rows, three columns
    let (_file, mut source) = mmap_source(&grid(4, 3, ','), true);
    let mut frame = Frame::new(10, 2, 3).unwrap();

    frame.load(&mut source).unwrap();
    let window = frame.window();
    assert_eq!(window.rows(), 0..3);
    assert_eq!(window.cols(), 0..2);
    assert_eq!(
        frame.headers().unwrap().iter().collect::<Vec<_>>(),
        vec!["c0", "c1"]
    );
    assert_eq!(cells(&frame)[0], vec!["r0c0", "r0c1"]);

    frame.shift_row(Direction::Forward, &mut source).unwrap();
    assert_eq!(frame.window().rows(), 1..4);
    for (column, col) in frame.columns().iter().zip(0..) {
        assert_eq!(column.front().unwrap(), &format!("r1c{}", col));
        assert_eq!(column.back().unwrap(), &format!("r3c{}", col));
    }

    let err = frame.shift_row(Direction::Forward, &mut source).unwrap_err();
    assert!(matches!(err, FrameError::Data(DataError::EndOfData)));
    assert_eq!(frame.window().last_row(), 3);
    assert!(frame.is_consistent());
}

#[test]
fn test_shift_row_is_reversible() {
    let (_file, mut source) = mmap_source(&grid(10, 4, ','), true);
    let mut frame = Frame::new(10, 3, 4).unwrap();
    frame.load(&mut source).unwrap();
    frame.shift_row(Direction::Forward, &mut source).unwrap();

    let window = frame.window();
    let before = cells(&frame);

    frame.shift_row(Direction::Forward, &mut source).unwrap();
    frame.shift_row(Direction::Backward, &mut source).unwrap();

    assert_eq!(frame.window(), window);
    assert_eq!(cells(&frame), before);
}

#[test]
fn test_shift_col_is_reversible() {
    let (_file, mut source) = mmap_source(&grid(5, 6, ','), true);
    let mut frame = Frame::new(10, 3, 5).unwrap();
    frame.load(&mut source).unwrap();

    let before = frame.snapshot();
    frame.shift_col(Direction::Forward, &mut source).unwrap();
    assert_eq!(frame.window().cols(), 1..4);
    assert_eq!(
        frame.headers().unwrap().iter().collect::<Vec<_>>(),
        vec!["c1", "c2", "c3"]
    );
    frame.shift_col(Direction::Backward, &mut source).unwrap();
    assert_eq!(frame.snapshot(), before);
}

#[test]
fn test_shift_col_past_last_column() {
    let (_file, mut source) = mmap_source(&grid(3, 2, ','), true);
    let mut frame = Frame::new(10, 2, 3).unwrap();
    frame.load(&mut source).unwrap();

    let before = frame.snapshot();
    let err = frame.shift_col(Direction::Forward, &mut source).unwrap_err();
    assert!(matches!(
        err,
        FrameError::Data(DataError::ColumnOutOfBounds { col: 2, ncols: 2 })
    ));
    assert_eq!(frame.snapshot(), before);
}

// ============================================================================
// Errors leave the frame untouched
// ============================================================================

#[test]
fn test_ragged_row_refuses_shift() {
    let (_file, mut source) = mmap_source("a,b,c\n1,2,3\n4,5\n6,7,8\n", true);
    let mut frame = Frame::new(10, 3, 1).unwrap();
    frame.load(&mut source).unwrap();

    let before = frame.snapshot();
    let err = frame.shift_row(Direction::Forward, &mut source).unwrap_err();
    match err {
        FrameError::Data(DataError::Parse { row, kind }) => {
            assert_eq!(row.0, Some(1));
            assert_eq!(
                kind,
                ParseErrorKind::RaggedRow {
                    expected: 3,
                    found: 2
                }
            );
        },
        other => panic!("unexpected error: {}", other),
    }
    assert!(err_is_recoverable(&mut frame, &mut source));
    assert_eq!(frame.snapshot(), before);
    assert!(!source.offsets().is_scanned(1));
}

fn err_is_recoverable(frame: &mut Frame, source: &mut dyn DataSource) -> bool {
    frame
        .shift_row(Direction::Forward, source)
        .unwrap_err()
        .is_recoverable()
}

#[test]
fn test_quoted_delimiter_is_content() {
    let (_file, mut source) = mmap_source("\"a,b\",c,d\n", false);
    let mut frame = Frame::new(10, 3, 2).unwrap();
    frame.load(&mut source).unwrap();
    assert_eq!(cells(&frame), vec![vec!["a,b", "c", "d"]]);
}

#[test]
fn test_capacity_limit() {
    let file = write_file(&grid(10, 2, ','));
    let options = preview::data::SourceOptions {
        row_capacity: 4,
        ..comma_options(true)
    };
    let mut source = open_source(file.path(), options).unwrap();
    let mut frame = Frame::new(10, 2, 3).unwrap();
    frame.load(source.as_mut()).unwrap();

    frame.shift_row(Direction::Forward, source.as_mut()).unwrap();
    let err = frame.shift_row(Direction::Forward, source.as_mut()).unwrap_err();
    assert!(matches!(
        err,
        FrameError::Data(DataError::OutOfCapacity { row: 4, capacity: 4 })
    ));
    assert_eq!(frame.window().rows(), 1..4);
}

// ============================================================================
// Cursor movement
// ============================================================================

#[test]
fn test_page_down_then_up() {
    let (_file, mut source) = mmap_source(&grid(20, 2, ','), true);
    let mut frame = Frame::new(10, 2, 5).unwrap();
    frame.load(&mut source).unwrap();

    frame.move_cursor(Movement::PageDown, &mut source).unwrap();
    assert_eq!(frame.cursor_position(), (5, 0));
    frame.move_cursor(Movement::PageDown, &mut source).unwrap();
    assert_eq!(frame.cursor_position(), (10, 0));
    frame.move_cursor(Movement::PageUp, &mut source).unwrap();
    frame.move_cursor(Movement::PageUp, &mut source).unwrap();
    assert_eq!(frame.cursor_position(), (0, 0));
    assert!(frame.is_consistent());
}

// ============================================================================
// Sequential source
// ============================================================================

#[test]
fn test_line_source_drives_frame() {
    let content = grid(6, 3, ',');
    let file = write_file(&content);
    let mut lines = LineSource::new(file.path(), comma_options(true));
    lines.open().unwrap();
    let (_mapped_file, mut mapped) = mmap_source(&content, true);

    let mut by_line = Frame::new(10, 2, 3).unwrap();
    let mut by_map = Frame::new(10, 2, 3).unwrap();
    by_line.load(&mut lines).unwrap();
    by_map.load(&mut mapped).unwrap();

    for direction in [Direction::Forward, Direction::Forward, Direction::Backward] {
        by_line.shift_row(direction, &mut lines).unwrap();
        by_map.shift_row(direction, &mut mapped).unwrap();
    }
    by_line.shift_col(Direction::Forward, &mut lines).unwrap();
    by_map.shift_col(Direction::Forward, &mut mapped).unwrap();

    assert_eq!(by_line.snapshot(), by_map.snapshot());
}

#[cfg(unix)]
#[test]
fn test_pipe_scrolls_forward() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rows.pipe");
    let status = std::process::Command::new("mkfifo").arg(&path).status().unwrap();
    assert!(status.success());

    let content = grid(8, 2, ',');
    let writer = {
        let path = path.clone();
        std::thread::spawn(move || std::fs::write(path, content).unwrap())
    };

    let mut source = open_source(&path, comma_options(true)).unwrap();
    let mut frame = Frame::new(10, 2, 3).unwrap();
    frame.load(source.as_mut()).unwrap();
    for _ in 0..5 {
        frame.shift_row(Direction::Forward, source.as_mut()).unwrap();
    }
    assert_eq!(frame.window().rows(), 5..8);
    assert_eq!(cells(&frame)[2], vec!["r7c0", "r7c1"]);
    assert!(source.is_last_row(7));

    writer.join().unwrap();
}

#[cfg(unix)]
#[test]
fn test_pipe_refuses_going_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rows.pipe");
    let status = std::process::Command::new("mkfifo").arg(&path).status().unwrap();
    assert!(status.success());

    let content = grid(8, 3, ',');
    let writer = {
        let path = path.clone();
        std::thread::spawn(move || std::fs::write(path, content).unwrap())
    };

    let mut source = open_source(&path, comma_options(true)).unwrap();
    let mut frame = Frame::new(10, 2, 3).unwrap();
    frame.load(source.as_mut()).unwrap();
    frame.shift_row(Direction::Forward, source.as_mut()).unwrap();
    frame.shift_row(Direction::Forward, source.as_mut()).unwrap();
    let before = frame.snapshot();

    // Both need rows the reader has already passed
    for err in [
        frame.shift_col(Direction::Forward, source.as_mut()).unwrap_err(),
        frame.shift_row(Direction::Backward, source.as_mut()).unwrap_err(),
    ] {
        assert!(matches!(err, FrameError::Data(DataError::NotSeekable(_))));
        assert!(err.is_recoverable());
        assert!(!err.is_boundary());
    }
    assert_eq!(frame.snapshot(), before);

    frame.shift_row(Direction::Forward, source.as_mut()).unwrap();
    assert_eq!(frame.window().rows(), 3..6);
    assert_eq!(cells(&frame)[2], vec!["r5c0", "r5c1"]);

    writer.join().unwrap();
}

// ============================================================================
// Property tests
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Shift {
    Row(Direction),
    Col(Direction),
}

fn shift_strategy() -> impl Strategy<Value = Shift> {
    prop_oneof![
        Just(Shift::Row(Direction::Forward)),
        Just(Shift::Row(Direction::Backward)),
        Just(Shift::Col(Direction::Forward)),
        Just(Shift::Col(Direction::Backward)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn window_matches_file_after_any_shifts(
        rows in 1usize..12,
        cols in 1usize..6,
        max_rows in 1usize..6,
        max_cols in 1usize..4,
        shifts in prop::collection::vec(shift_strategy(), 0..40),
    ) {
        let (_file, mut source) = mmap_source(&grid(rows, cols, ','), true);
        let mut frame = Frame::new(8, max_cols, max_rows).unwrap();
        frame.load(&mut source).unwrap();

        for shift in shifts {
            let before = frame.snapshot();
            let result = match shift {
                Shift::Row(d) => frame.shift_row(d, &mut source),
                Shift::Col(d) => frame.shift_col(d, &mut source),
            };
            if let Err(e) = result {
                prop_assert!(e.is_boundary());
                prop_assert_eq!(frame.snapshot(), before);
            }

            prop_assert!(frame.is_consistent());
            let window = frame.window();
            prop_assert_eq!(window.nrows, rows.min(max_rows));
            prop_assert_eq!(window.ncols, cols.min(max_cols));
            prop_assert!(window.first_row + window.nrows <= rows);
            prop_assert!(window.first_col + window.ncols <= cols);

            for (i, row) in frame.snapshot().rows.iter().enumerate() {
                for (j, cell) in row.iter().enumerate() {
                    let expected = format!("r{}c{}", window.first_row + i, window.first_col + j);
                    prop_assert_eq!(cell, &expected);
                }
            }
        }
    }
}
