mod http_store;
#[cfg(test)]
pub mod memory_store;
mod types;

pub use http_store::HttpDocumentStore;
pub use types::{DocumentId, DocumentStore, Result, StoreError};
