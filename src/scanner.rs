//! Tree walking and in-place rewriting of candidate files.

use crate::error::StripError;
use crate::patterns::{is_candidate, is_ignored_dir, StripRules};
use crate::remover::MarkerRemover;

use humansize::{format_size, BINARY};
use ignore::{Walk, WalkBuilder};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Options controlling a run (runtime flags)
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Abort on the first error instead of skipping the file
    pub fail_fast: bool,
    /// Draw a spinner on stderr while scanning
    pub show_progress: bool,
}

/// Counters produced by one run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Candidate files seen, whether or not they changed
    pub examined: usize,
    /// Files rewritten
    pub modified: usize,
    /// Files or walk entries skipped because of an error
    pub failed: usize,
    pub bytes_removed: u64,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} files. Modified {} files.",
            self.examined, self.modified
        )
    }
}

/// What happened to a single candidate file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Unchanged,
    Modified { blocks: usize, bytes_removed: u64 },
}

/// Lazy, single-pass sequence of candidate files under a root
pub struct CandidateFiles {
    walker: Option<Walk>,
    root: PathBuf,
    /// Directory that ignored names are compared below
    base: PathBuf,
    rules: StripRules,
}

impl Iterator for CandidateFiles {
    type Item = Result<PathBuf, StripError>;

    fn next(&mut self) -> Option<Self::Item> {
        let walker = self.walker.as_mut()?;

        for result in walker.by_ref() {
            let entry = match result {
                Ok(entry) => entry,
                Err(source) => {
                    return Some(Err(StripError::Traversal {
                        root: self.root.clone(),
                        source,
                    }))
                }
            };

            let path = entry.path();

            // Links are neither followed nor rewritten, even when they point at a file
            if entry.path_is_symlink() {
                debug!("Skipping symlink: {}", path.display());
                continue;
            }

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            // The walker never prunes the root itself, which matters in substring mode
            if path
                .parent()
                .is_some_and(|dir| is_ignored_dir(dir, &self.base, &self.rules))
            {
                continue;
            }

            if is_candidate(path, &self.rules) {
                return Some(Ok(path.to_path_buf()));
            }
        }

        None
    }
}

/// Enumerate candidate files under `root`, pruning ignored directories.
///
/// A missing root yields nothing. A root that is a single file yields that
/// file if it is a candidate; its own directory is then never treated as
/// ignored in segment mode. Hidden entries are visited, ignore files are not
/// honoured, and symlinks are skipped with a debug record.
pub fn candidate_files(root: &Path, rules: &StripRules) -> CandidateFiles {
    let base = if root.is_file() {
        root.parent().unwrap_or(root).to_path_buf()
    } else {
        root.to_path_buf()
    };

    if !root.exists() {
        warn!("Scan root {} does not exist", root.display());
        return CandidateFiles {
            walker: None,
            root: root.to_path_buf(),
            base,
            rules: rules.clone(),
        };
    }

    let prune_root = base.clone();
    let prune_rules = rules.clone();

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .parents(false)
        .git_ignore(false)
        .ignore(false)
        .git_global(false)
        .git_exclude(false)
        .follow_links(false)
        .filter_entry(move |entry| {
            let path = entry.path();
            if entry.file_type().is_some_and(|ft| ft.is_dir())
                && is_ignored_dir(path, &prune_root, &prune_rules)
            {
                debug!("Skipping ignored directory: {}", path.display());
                return false;
            }
            true
        })
        .build();

    CandidateFiles {
        walker: Some(walker),
        root: root.to_path_buf(),
        base,
        rules: rules.clone(),
    }
}

/// Read one file, strip its marker blocks, and rewrite it if anything changed.
pub fn process_file(path: &Path, remover: &MarkerRemover) -> Result<FileOutcome, StripError> {
    let bytes = fs::read(path).map_err(|source| StripError::Access {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8(bytes).map_err(|source| StripError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let stripped = remover.strip(&content);
    if !stripped.changed() {
        return Ok(FileOutcome::Unchanged);
    }

    fs::write(path, stripped.text.as_bytes()).map_err(|source| StripError::Access {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(FileOutcome::Modified {
        blocks: stripped.removed,
        bytes_removed: (content.len() - stripped.text.len()) as u64,
    })
}

fn spinner(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")
    {
        progress.set_style(style);
    }
    progress.enable_steady_tick(std::time::Duration::from_millis(100));
    progress
}

/// Scan `root` and strip marker blocks from every candidate file.
///
/// Per-file and walk errors are logged, counted in `failed`, and skipped,
/// unless `options.fail_fast` is set, in which case the first one is returned.
pub fn run(root: &Path, rules: &StripRules, options: ScanOptions) -> Result<RunSummary, StripError> {
    let remover = MarkerRemover::with_scope(&rules.sentinel, rules.block_scope)?;
    let progress = spinner(options.show_progress);
    let mut summary = RunSummary::default();

    for candidate in candidate_files(root, rules) {
        let path = match candidate {
            Ok(path) => path,
            Err(err) if options.fail_fast => {
                progress.finish_and_clear();
                return Err(err);
            }
            Err(err) => {
                progress.suspend(|| warn!("Skipping entry: {}", err));
                summary.failed += 1;
                continue;
            }
        };

        summary.examined += 1;
        progress.set_message(format!("Examining {}", path.display()));

        match process_file(&path, &remover) {
            Ok(FileOutcome::Modified {
                blocks,
                bytes_removed,
            }) => {
                summary.modified += 1;
                summary.bytes_removed += bytes_removed;
                progress.suspend(|| {
                    info!(
                        "Stripped {} block(s) from {} ({})",
                        blocks,
                        path.display(),
                        format_size(bytes_removed, BINARY)
                    )
                });
            }
            Ok(FileOutcome::Unchanged) => {
                debug!("No marker blocks in {}", path.display());
            }
            Err(err) if options.fail_fast => {
                progress.finish_and_clear();
                return Err(err);
            }
            Err(err) => {
                progress.suspend(|| warn!("Skipping file: {}", err));
                summary.failed += 1;
            }
        }
    }

    progress.finish_and_clear();

    if summary.modified > 0 {
        info!(
            "Removed {} of annotation text in total",
            format_size(summary.bytes_removed, BINARY)
        );
    }

    Ok(summary)
}
