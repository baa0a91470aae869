//! Background file discovery feeding a cyclic queue.
//!
//! A scanner thread walks a directory tree and sends every admissible text file down a
//! channel. The consumer takes paths one at a time and puts each back once shown, so the
//! queue cycles forever while the walk is still growing it.

use std::collections::VecDeque;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::defaults;
use crate::error::{ScreenError, ScreenResult};
use crate::screen::Pacer;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug)]
enum Discovered {
    Path(PathBuf),
    /// Last message of a scan.
    Finished { admitted: usize },
}

/// Consumer side of the discovery queue.
pub struct FileQueue {
    root: PathBuf,
    tx: Sender<Discovered>,
    rx: Receiver<Discovered>,
    /// Paths already taken off the channel but not yet handed out.
    pending: VecDeque<PathBuf>,
    admitted: Option<usize>,
}

/// Start discovering files under `root`.
///
/// A file root is queued as-is. A directory root is walked on a background thread, skipping
/// dot-directories, binary files and (when `extension` is given) files whose name does not
/// end with it. Returns before the walk completes.
pub fn start_scan(root: &Path, extension: Option<&str>) -> ScreenResult<FileQueue> {
    if !root.exists() {
        return Err(ScreenError::path_not_found(
            root,
            "Make sure the file or directory exists.",
        ));
    }

    let (tx, rx) = mpsc::channel();
    let queue = FileQueue {
        root: root.to_path_buf(),
        tx: tx.clone(),
        rx,
        pending: VecDeque::new(),
        admitted: None,
    };

    if root.is_file() {
        debug!(path = %root.display(), "Queueing single file");
        // The receiver is alive, so these cannot fail.
        let _ = tx.send(Discovered::Path(root.to_path_buf()));
        let _ = tx.send(Discovered::Finished { admitted: 1 });
        return Ok(queue);
    }

    let walk_root = root.to_path_buf();
    let extension = extension.map(str::to_string);
    thread::Builder::new()
        .name("file-scanner".into())
        .spawn(move || scan(&walk_root, extension.as_deref(), &tx))
        .context("Failed to spawn file scanner thread")?;

    info!(root = %root.display(), "Started file scan");
    Ok(queue)
}

impl FileQueue {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Block until a path is available.
    ///
    /// Fails with `PathNotFound` once the scan has finished and nothing is left to hand out,
    /// either because nothing was admitted or because every path was dropped from the cycle.
    /// Fails with `Interrupted` when the pacer reports an interrupt while waiting.
    pub fn next(&mut self, pacer: &dyn Pacer) -> ScreenResult<PathBuf> {
        if let Some(path) = self.pending.pop_front() {
            return Ok(path);
        }
        loop {
            pacer.check()?;
            match self.receive()? {
                Some(Discovered::Path(path)) => return Ok(path),
                Some(Discovered::Finished { admitted }) => {
                    self.admitted = Some(admitted);
                    debug!(admitted, "File scan finished");
                    if admitted == 0 {
                        return Err(self.exhausted());
                    }
                }
                None if self.admitted.is_some() => return Err(self.exhausted()),
                None => continue,
            }
        }
    }

    /// Block until the background walk is complete, keeping everything it found queued in
    /// order. Returns how many files were admitted.
    pub fn wait_scan_finished(&mut self, pacer: &dyn Pacer) -> ScreenResult<usize> {
        loop {
            if let Some(admitted) = self.admitted {
                return Ok(admitted);
            }
            pacer.check()?;
            match self.receive()? {
                Some(Discovered::Path(path)) => self.pending.push_back(path),
                Some(Discovered::Finished { admitted }) => {
                    self.admitted = Some(admitted);
                    debug!(admitted, "File scan finished");
                }
                None => continue,
            }
        }
    }

    /// Put a consumed path back at the tail of the queue.
    pub fn requeue(&self, path: PathBuf) {
        let _ = self.tx.send(Discovered::Path(path));
    }

    pub fn scan_finished(&self) -> bool {
        self.admitted.is_some()
    }

    /// One message, or `None` when nothing arrived within the poll interval.
    fn receive(&self) -> ScreenResult<Option<Discovered>> {
        match self.rx.recv_timeout(POLL_INTERVAL) {
            Ok(message) => Ok(Some(message)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            // We hold a sender ourselves, so the channel never disconnects.
            Err(RecvTimeoutError::Disconnected) => Err(ScreenError::path_not_found(
                &self.root,
                "File discovery stopped unexpectedly.",
            )),
        }
    }

    fn exhausted(&self) -> ScreenError {
        let reason = match self.admitted {
            Some(0) => "No readable text files were found there.",
            _ => "None of the files found there could be read.",
        };
        ScreenError::path_not_found(&self.root, reason)
    }
}

fn scan(root: &Path, extension: Option<&str>, tx: &Sender<Discovered>) {
    let mut admitted = 0;
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden_dir(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(path = ?err.path(), error = %err, "Skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !matches_extension(path, extension) {
            continue;
        }
        if is_binary(path) {
            debug!(path = %path.display(), "Skipping binary or unreadable file");
            continue;
        }
        if tx.send(Discovered::Path(path.to_path_buf())).is_err() {
            return;
        }
        admitted += 1;
    }

    let _ = tx.send(Discovered::Finished { admitted });
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name().to_string_lossy().starts_with('.')
}

/// Plain suffix match on the file name, so `py` admits `happy`.
pub fn matches_extension(path: &Path, extension: Option<&str>) -> bool {
    match extension {
        None => true,
        Some(ext) => path
            .file_name()
            .map(|name| name.to_string_lossy().ends_with(ext))
            .unwrap_or(false),
    }
}

/// A file is binary when its first kilobyte contains a NUL byte. Files that cannot be read
/// are treated as binary.
pub fn is_binary(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return true;
    };
    let mut head = Vec::with_capacity(defaults::BINARY_SNIFF_BYTES as usize);
    match file.take(defaults::BINARY_SNIFF_BYTES).read_to_end(&mut head) {
        Ok(_) => head.contains(&0),
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn extension_is_a_suffix_match() {
        let p = Path::new("/tmp/happy");
        assert!(matches_extension(p, Some("py")));
        assert!(matches_extension(Path::new("main.rs"), Some(".rs")));
        assert!(!matches_extension(Path::new("main.rs"), Some("py")));
        assert!(matches_extension(Path::new("anything"), None));
    }

    #[test]
    fn nul_in_first_kilobyte_means_binary() {
        let dir = TempDir::new().unwrap();
        let text = dir.path().join("a.txt");
        let bin = dir.path().join("b.bin");
        let late = dir.path().join("c.txt");
        fs::write(&text, "plain text\n").unwrap();
        fs::write(&bin, b"abc\0def").unwrap();
        let mut late_nul = vec![b'x'; 2048];
        late_nul[1500] = 0;
        fs::write(&late, late_nul).unwrap();

        assert!(!is_binary(&text));
        assert!(is_binary(&bin));
        assert!(!is_binary(&late));
        assert!(is_binary(&dir.path().join("missing")));
    }
}
