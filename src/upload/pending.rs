use super::types::PendingFile;

/// Files staged for the next upload, in the order they were added.
///
/// Entries are never deduplicated: picking the same file twice stages it
/// twice. Files leave only through `clear` or once an upload of them is
/// confirmed (`remove_submitted`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingUploadSet {
    files: Vec<PendingFile>,
    /// Bumped by every `clear`, so a late upload confirmation can tell
    /// whether the files it sent are still the head of the list.
    generation: u64,
}

impl PendingUploadSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, files: impl IntoIterator<Item = PendingFile>) {
        self.files.extend(files);
    }

    pub fn clear(&mut self) {
        self.files.clear();
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Drops the first `count` files, which an upload started at
    /// `generation` sent. Files added after that upload started stay. If the
    /// set was cleared in between, the sent files are already gone and
    /// nothing is removed.
    pub fn remove_submitted(&mut self, generation: u64, count: usize) {
        if generation != self.generation {
            return;
        }
        let count = count.min(self.files.len());
        self.files.drain(..count);
    }

    pub fn files(&self) -> &[PendingFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}
