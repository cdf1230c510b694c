use super::types::PendingFile;
use ignore::WalkBuilder;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Turns what the user picked in a file dialog into pending files.
pub struct FileCollector;

impl FileCollector {
    /// Files become one entry each; directories are expanded with
    /// `from_folder`. Paths that cannot be read are skipped.
    pub fn from_paths(paths: &[PathBuf]) -> Vec<PendingFile> {
        let mut files = Vec::new();

        for path in paths {
            match fs::metadata(path) {
                Ok(metadata) if metadata.is_dir() => files.extend(Self::from_folder(path)),
                Ok(metadata) => {
                    let relative_path = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| path.to_string_lossy().to_string());
                    files.push(PendingFile::new(path.clone(), relative_path, metadata.len()));
                }
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            }
        }

        files
    }

    /// Walks `folder`, honouring ignore files and skipping hidden entries.
    /// Relative paths start with the folder's own name.
    pub fn from_folder(folder: &Path) -> Vec<PendingFile> {
        let base = folder.parent().unwrap_or(folder);
        let mut files = Vec::new();

        let walker = WalkBuilder::new(folder)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping entry under {}: {}", folder.display(), e);
                    continue;
                }
            };

            if !entry.file_type().map_or(false, |t| t.is_file()) {
                continue;
            }

            let path = entry.path();
            let size = match entry.metadata() {
                Ok(metadata) => metadata.len(),
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };

            let relative_path = Self::relative_path(path, base);
            debug!("Collected {}", relative_path);
            files.push(PendingFile::new(path.to_path_buf(), relative_path, size));
        }

        files
    }

    fn relative_path(path: &Path, base: &Path) -> String {
        let relative = path.strip_prefix(base).unwrap_or(path);
        relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}
