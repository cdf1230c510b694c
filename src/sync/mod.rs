mod session;
mod state;

pub use session::{DocumentSession, SyncEvent, UPLOAD_ERROR_MESSAGE};
pub use state::{Operation, OperationTracker, SyncPhase};
