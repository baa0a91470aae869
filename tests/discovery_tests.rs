use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use termsaver::discovery::{self, FileQueue};
use termsaver::screen::{Pacer, RecordingPacer};
use termsaver::ScreenError;

fn write(root: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn take(queue: &mut FileQueue, pacer: &dyn Pacer, n: usize) -> Vec<PathBuf> {
    (0..n)
        .map(|_| {
            let path = queue.next(pacer).unwrap();
            queue.requeue(path.clone());
            path
        })
        .collect()
}

#[test]
fn cycles_over_every_file_in_stable_order() {
    let dir = TempDir::new().unwrap();
    let expected: HashSet<PathBuf> = ["a.txt", "b/c.txt", "b/d/e.txt", "f.txt"]
        .iter()
        .map(|rel| write(dir.path(), rel, b"text"))
        .collect();
    let n = expected.len();

    let mut queue = discovery::start_scan(dir.path(), None).unwrap();
    let pacer = RecordingPacer::new();
    assert_eq!(queue.wait_scan_finished(&pacer).unwrap(), n);
    let seen = take(&mut queue, &pacer, 2 * n);

    let first: HashSet<PathBuf> = seen[..n].iter().cloned().collect();
    assert_eq!(first, expected);
    assert_eq!(seen[..n], seen[n..]);
}

#[test]
fn binary_files_are_rejected_whatever_the_filter() {
    let dir = TempDir::new().unwrap();
    let text = write(dir.path(), "good.rs", b"fn main() {}\n");
    write(dir.path(), "bad.rs", b"\x7fELF\0\0\0");
    write(dir.path(), "other.txt", b"not matching the filter");

    let mut queue = discovery::start_scan(dir.path(), Some(".rs")).unwrap();
    let pacer = RecordingPacer::new();
    assert_eq!(queue.wait_scan_finished(&pacer).unwrap(), 1);
    for path in take(&mut queue, &pacer, 5) {
        assert_eq!(path, text);
    }
}

#[test]
fn dot_directories_are_skipped() {
    let dir = TempDir::new().unwrap();
    let visible = write(dir.path(), "src/lib.rs", b"pub fn f() {}");
    write(dir.path(), ".git/config", b"[core]");
    write(dir.path(), "src/.cache/blob", b"cached");

    let mut queue = discovery::start_scan(dir.path(), None).unwrap();
    let pacer = RecordingPacer::new();
    for path in take(&mut queue, &pacer, 3) {
        assert_eq!(path, visible);
    }
}

#[test]
fn single_file_root_is_queued_directly() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "only.txt", b"one");

    let mut queue = discovery::start_scan(&file, Some("does-not-matter")).unwrap();
    let pacer = RecordingPacer::new();
    assert_eq!(take(&mut queue, &pacer, 3), vec![file.clone(), file.clone(), file]);
}

#[test]
fn empty_tree_fails_instead_of_blocking() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "image.bin", b"\0\0\0");

    let mut queue = discovery::start_scan(dir.path(), None).unwrap();
    let err = queue.next(&RecordingPacer::new()).unwrap_err();
    assert!(matches!(err, ScreenError::PathNotFound { .. }));
    assert!(queue.scan_finished());
}

#[test]
fn missing_root_is_reported_up_front() {
    let dir = TempDir::new().unwrap();
    let err = discovery::start_scan(&dir.path().join("missing"), None)
        .err()
        .unwrap();
    assert!(matches!(err, ScreenError::PathNotFound { .. }));
}

#[test]
fn waiting_consumer_honours_interrupt() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"a");

    let mut queue = discovery::start_scan(dir.path(), None).unwrap();
    let pacer = RecordingPacer::new();
    pacer.interrupt().trigger();
    assert!(queue.next(&pacer).unwrap_err().is_interrupt());
}

#[test]
fn consumer_may_start_before_the_walk_ends() {
    let dir = TempDir::new().unwrap();
    let expected: HashSet<PathBuf> = (0..40)
        .map(|i| write(dir.path(), &format!("d{}/f{i}.txt", i % 4), b"text"))
        .collect();

    let mut queue = discovery::start_scan(dir.path(), None).unwrap();
    let pacer = RecordingPacer::new();
    let mut seen = HashSet::new();
    while seen.len() < expected.len() {
        let path = queue.next(&pacer).unwrap();
        queue.requeue(path.clone());
        seen.insert(path);
    }
    assert_eq!(seen, expected);
}

#[test]
fn dropped_paths_end_the_cycle_once_the_scan_is_done() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"a");
    write(dir.path(), "b.txt", b"b");

    let mut queue = discovery::start_scan(dir.path(), None).unwrap();
    let pacer = RecordingPacer::new();
    queue.wait_scan_finished(&pacer).unwrap();

    // Consume both without putting them back.
    queue.next(&pacer).unwrap();
    queue.next(&pacer).unwrap();
    let err = queue.next(&pacer).unwrap_err();
    assert!(matches!(err, ScreenError::PathNotFound { .. }));
    assert!(err.to_string().contains("could be read"));
}

#[cfg(unix)]
#[test]
fn broken_links_and_loops_do_not_stop_the_walk() {
    use std::os::unix::fs::symlink;

    let dir = TempDir::new().unwrap();
    let expected: HashSet<PathBuf> = ["a.txt", "sub/b.txt", "sub/deeper/c.txt", "z.txt"]
        .iter()
        .map(|rel| write(dir.path(), rel, b"text"))
        .collect();
    symlink(dir.path().join("missing.txt"), dir.path().join("dangling.txt")).unwrap();
    symlink(dir.path(), dir.path().join("sub/loop")).unwrap();

    let mut queue = discovery::start_scan(dir.path(), None).unwrap();
    let pacer = RecordingPacer::new();
    assert_eq!(queue.wait_scan_finished(&pacer).unwrap(), expected.len());

    let seen: HashSet<PathBuf> = take(&mut queue, &pacer, expected.len()).into_iter().collect();
    assert_eq!(seen, expected);
}
