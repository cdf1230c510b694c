mod file_collector;
mod pending;
mod types;

pub use file_collector::FileCollector;
pub use pending::PendingUploadSet;
pub use types::PendingFile;
