//! Directory scanning.
//!
//! The scanner walks a tree one file at a time. Results are available
//! three ways: a synchronous progress callback ([`Scanner::scan`]), a lazy
//! iterator ([`Scanner::files`]), or a background worker streaming events
//! over a channel ([`spawn_scan`]).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use anyhow::anyhow;
use walkdir::WalkDir;

use crate::error::{ImportScanError, Result};
use crate::resolver::ModuleResolver;

use super::extractor::find_imports;
use super::result::{FileScan, ScanResult};

/// Suffix of the files the scanner considers.
pub const DEFAULT_SUFFIX: &str = ".py";

/// Scans source trees for unresolved imports.
#[derive(Debug, Clone)]
pub struct Scanner<R> {
    resolver: R,
    suffix: String,
}

impl<R: ModuleResolver> Scanner<R> {
    /// Create a scanner that checks imports with `resolver`.
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }

    /// Only consider files whose name ends with `suffix`.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// The recognized source file suffix.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// The resolver used for each candidate import.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Scan `root`, calling `progress` once per matching file.
    ///
    /// The callback runs synchronously, before the next file is read.
    pub fn scan<F>(&self, root: &Path, mut progress: F) -> Result<ScanResult>
    where
        F: FnMut(&FileScan),
    {
        let mut files = Vec::new();
        for file in self.files(root)? {
            progress(&file);
            files.push(file);
        }
        Ok(ScanResult::new(files))
    }

    /// Lazily scan `root`, one file per iteration.
    ///
    /// Fails up front if `root` cannot be listed.
    pub fn files(&self, root: &Path) -> Result<ScanIter<'_, R>> {
        check_root(root)?;
        tracing::debug!("Scanning {} for *{} files", root.display(), self.suffix);

        Ok(ScanIter {
            scanner: self,
            walker: WalkDir::new(root)
                .sort_by_file_name()
                .into_iter(),
        })
    }

    /// Scan a single file, returning its unresolved imports.
    pub fn scan_file(&self, path: &Path) -> FileScan {
        let unresolved = self.resolver.unresolved(find_imports(path));

        let scan = FileScan::new(path, unresolved);
        tracing::debug!(
            "Scanned {} ({} unresolved)",
            path.display(),
            scan.unresolved.len()
        );
        scan
    }

    fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(&self.suffix))
    }
}

fn check_root(root: &Path) -> Result<()> {
    let unreadable = |message: String| ImportScanError::RootUnreadable {
        path: root.to_path_buf(),
        message,
    };

    let metadata = fs::metadata(root).map_err(|e| unreadable(e.to_string()))?;
    if !metadata.is_dir() {
        return Err(unreadable("not a directory".to_string()));
    }
    fs::read_dir(root).map_err(|e| unreadable(e.to_string()))?;
    Ok(())
}

/// Lazy, single-pass sequence of per-file scan results.
pub struct ScanIter<'a, R> {
    scanner: &'a Scanner<R>,
    walker: walkdir::IntoIter,
}

impl<R: ModuleResolver> Iterator for ScanIter<'_, R> {
    type Item = FileScan;

    fn next(&mut self) -> Option<FileScan> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            // Links are not followed; one that does not point at a
            // directory counts as a file, even when dangling.
            let file_type = entry.file_type();
            let is_file =
                file_type.is_file() || (file_type.is_symlink() && !entry.path().is_dir());

            if is_file && self.scanner.matches(entry.path()) {
                return Some(self.scanner.scan_file(entry.path()));
            }
        }
    }
}

/// Event sent by a background scan.
#[derive(Debug)]
pub enum ScanEvent {
    /// A file finished scanning.
    File(FileScan),

    /// The scan ended, with the number of files scanned or the reason it
    /// could not start.
    Finished(Result<usize>),
}

/// Handle to a scan running on a worker thread.
pub struct ScanHandle {
    events: Receiver<ScanEvent>,
    worker: JoinHandle<()>,
}

impl ScanHandle {
    /// The event stream; it ends after [`ScanEvent::Finished`].
    pub fn events(&self) -> &Receiver<ScanEvent> {
        &self.events
    }

    /// Drain all events and assemble the final result.
    pub fn wait(self) -> Result<ScanResult> {
        self.wait_with(|_| {})
    }

    /// Like [`ScanHandle::wait`], calling `on_file` as each file arrives.
    pub fn wait_with<F>(self, mut on_file: F) -> Result<ScanResult>
    where
        F: FnMut(&FileScan),
    {
        let mut files = Vec::new();
        let mut outcome = None;

        for event in self.events.iter() {
            match event {
                ScanEvent::File(file) => {
                    on_file(&file);
                    files.push(file);
                }
                ScanEvent::Finished(result) => outcome = Some(result),
            }
        }

        if self.worker.join().is_err() {
            return Err(anyhow!("scan worker panicked after {} file(s)", files.len()).into());
        }
        let Some(outcome) = outcome else {
            return Err(anyhow!("scan worker stopped before finishing").into());
        };
        outcome.map(|_| ScanResult::new(files))
    }
}

/// Run `scanner` over `root` on a background thread.
pub fn spawn_scan<R>(scanner: Scanner<R>, root: PathBuf) -> ScanHandle
where
    R: ModuleResolver + Send + 'static,
{
    let (tx, rx) = mpsc::channel();

    let worker = thread::spawn(move || {
        let files = match scanner.files(&root) {
            Ok(files) => files,
            Err(e) => {
                let _ = tx.send(ScanEvent::Finished(Err(e)));
                return;
            }
        };

        let mut count = 0;
        for file in files {
            count += 1;
            if tx.send(ScanEvent::File(file)).is_err() {
                // Receiver dropped; nobody is listening.
                return;
            }
        }
        let _ = tx.send(ScanEvent::Finished(Ok(count)));
    });

    ScanHandle { events: rx, worker }
}
