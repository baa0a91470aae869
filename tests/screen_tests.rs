use std::fs;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;
use termsaver::screen::clock::{ascii_time, ClockScreen};
use termsaver::screen::lifecycle::{Lifecycle, RenderCycle};
use termsaver::screen::programmer::ProgrammerScreen;
use termsaver::screen::RecordingPacer;
use termsaver::terminal::TerminalGeometry;
use termsaver::typing::Typist;

fn morning() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 18)
        .unwrap()
        .and_hms_opt(9, 5, 0)
        .unwrap()
}

fn evening() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 18)
        .unwrap()
        .and_hms_opt(21, 5, 0)
        .unwrap()
}

fn run_clock(twelve_hour: bool, now: fn() -> NaiveDateTime) -> (String, Vec<Duration>) {
    let mut screen =
        ClockScreen::new(twelve_hour, TerminalGeometry::fixed(80, 25)).with_clock(now);
    let pacer = RecordingPacer::interrupt_after(1);
    let mut out = Vec::new();

    let mut lifecycle = Lifecycle::new(&pacer);
    lifecycle.run(&mut screen, &mut out).unwrap();
    assert_eq!(lifecycle.state(), RenderCycle::Terminated);

    (String::from_utf8(out).unwrap(), pacer.pauses())
}

#[test]
fn clock_renders_24_hour_time_and_waits_a_second() {
    let (out, pauses) = run_clock(false, morning);

    assert!(out.contains("Sunday, 18th October 2026"));
    for row in ascii_time("09:05").lines() {
        assert!(out.contains(row), "missing row {row:?}");
    }
    assert_eq!(pauses, vec![Duration::from_secs(1)]);
}

#[test]
fn clock_renders_12_hour_time_with_suffix_and_faster_frames() {
    let (out, pauses) = run_clock(true, evening);

    for row in ascii_time("9:05pm").lines() {
        assert!(out.contains(row), "missing row {row:?}");
    }
    assert_eq!(pauses, vec![Duration::from_millis(700)]);
}

#[test]
fn programmer_types_the_discovered_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("main.rs"), "fn main() {}").unwrap();

    let mut screen = ProgrammerScreen::new(dir.path().to_path_buf(), None, Typist::instant());
    // Ten non-blank characters plus the line pause.
    let pacer = RecordingPacer::interrupt_after(11);
    let mut out = Vec::new();
    Lifecycle::new(&pacer).run(&mut screen, &mut out).unwrap();

    assert!(String::from_utf8_lossy(&out).contains("fn main() {}"));
    assert_eq!(pacer.pauses().len(), 11);
}

#[test]
fn programmer_on_empty_directory_fails_with_path_not_found() {
    let dir = TempDir::new().unwrap();
    let mut screen = ProgrammerScreen::new(dir.path().to_path_buf(), None, Typist::instant());
    let pacer = RecordingPacer::new();
    let mut lifecycle = Lifecycle::new(&pacer);

    let err = lifecycle.run(&mut screen, &mut Vec::new()).unwrap_err();
    assert_eq!(err.exit_code(), libc::ENOENT);
    assert_eq!(lifecycle.state(), RenderCycle::Terminated);
}
