use std::path::PathBuf;

/// A local file the user picked but has not submitted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub path: PathBuf,
    pub name: String,
    /// Path relative to what the user picked, `/`-separated. Shown in the
    /// upload panel only; the store receives `name`.
    pub relative_path: String,
    pub size: u64,
}

impl PendingFile {
    pub fn new(path: PathBuf, relative_path: String, size: u64) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| relative_path.clone());

        Self {
            path,
            name,
            relative_path,
            size,
        }
    }

    pub fn display_size(&self) -> String {
        const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

        let mut size = self.size as f64;
        let mut unit = 0;
        while size >= 1024.0 && unit < UNITS.len() - 1 {
            size /= 1024.0;
            unit += 1;
        }

        if unit == 0 {
            format!("{} {}", self.size, UNITS[0])
        } else {
            format!("{:.1} {}", size, UNITS[unit])
        }
    }
}
