use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

/// Per-file tail-reading state, keyed by the raw file's path.
///
/// `bytes_consumed`/`lines_consumed` mark how far the ever-growing file has
/// been read; `pending` holds lines read but not yet safe to finalize.
/// Nothing here touches stable storage — a restart starts over from byte
/// zero (already-consolidated output lines are then re-emitted).
#[derive(Debug, Clone, Default)]
pub struct FileCursor {
    pub bytes_consumed: u64,
    pub lines_consumed: u64,
    pub pending: VecDeque<String>,
    pub emitted_any: bool,
}

/// Keyed cursor storage. `get` hands the entry out (or a fresh default),
/// `put` stores it back after a pass; a persistent implementation can slot
/// in without touching the windowing code.
pub trait CursorStore: Send {
    fn get(&mut self, path: &Path) -> FileCursor;
    fn put(&mut self, path: PathBuf, cursor: FileCursor);
}

/// Process-lifetime cursor table. Entries are created lazily and never
/// evicted, matching the engine's tracked-job lifetime.
#[derive(Debug, Default)]
pub struct InMemoryCursorStore {
    cursors: HashMap<PathBuf, FileCursor>,
}

impl InMemoryCursorStore {
    #[must_use]
    pub fn new() -> Self {
        InMemoryCursorStore::default()
    }
}

impl CursorStore for InMemoryCursorStore {
    fn get(&mut self, path: &Path) -> FileCursor {
        self.cursors.remove(path).unwrap_or_default()
    }

    fn put(&mut self, path: PathBuf, cursor: FileCursor) {
        self.cursors.insert(path, cursor);
    }
}
