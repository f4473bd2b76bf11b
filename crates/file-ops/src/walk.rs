//! Best-effort recursive directory traversal.
//!
//! Entries are visited depth-first in pre-order, siblings sorted by file
//! name. Metadata comes from the directory entry itself (`lstat`), so a
//! symbolic link is reported as a link and never descended into.

use std::fs::Metadata;
use std::ops::ControlFlow;
use std::path::Path;

/// Traversal options.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct WalkOptions {
    /// Skip dot-prefixed entries (and everything beneath dot directories).
    pub skip_hidden: bool,
}

/// Runs one traversal step, turning a failure into a skip.
pub(crate) fn skip_on_error<T>(
    result: std::io::Result<T>,
    path: &Path,
    errors: &mut u64,
) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            *errors += 1;
            tracing::debug!(path = %path.display(), error = %e, "skipping unreadable entry");
            None
        }
    }
}

/// Walks everything below `root`, calling `visit(relative_path, metadata)`.
///
/// `visit` may return `ControlFlow::Break` to stop early. Returns the number
/// of entries that had to be skipped.
pub(crate) fn walk<F>(root: &Path, opts: WalkOptions, mut visit: F) -> u64
where
    F: FnMut(&Path, &Metadata) -> ControlFlow<()>,
{
    let mut errors = 0;
    let _ = walk_dir(root, root, opts, &mut errors, &mut visit);
    errors
}

fn walk_dir<F>(
    root: &Path,
    current: &Path,
    opts: WalkOptions,
    errors: &mut u64,
    visit: &mut F,
) -> ControlFlow<()>
where
    F: FnMut(&Path, &Metadata) -> ControlFlow<()>,
{
    let Some(read) = skip_on_error(std::fs::read_dir(current), current, errors) else {
        return ControlFlow::Continue(());
    };

    let mut entries: Vec<_> = read
        .filter_map(|entry| skip_on_error(entry, current, errors))
        .collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        if opts.skip_hidden && entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        let Some(metadata) = skip_on_error(entry.metadata(), &path, errors) else {
            continue;
        };

        let rel = path.strip_prefix(root).unwrap_or(&path);
        visit(rel, &metadata)?;

        if metadata.is_dir() {
            walk_dir(root, &path, opts, errors, visit)?;
        }
    }

    ControlFlow::Continue(())
}

/// Renders a relative path with `/` separators on every platform.
pub(crate) fn to_slash(rel: &Path) -> String {
    rel.to_string_lossy().replace('\\', "/")
}
