use super::state::{Operation, OperationTracker, SyncPhase};
use crate::store::{self, DocumentId, DocumentStore};
use crate::upload::{PendingFile, PendingUploadSet};
use derivative::Derivative;
use std::future::Future;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

pub const UPLOAD_ERROR_MESSAGE: &str = "Error uploading files";

/// Completion of one remote call, delivered back to the session.
#[derive(Debug)]
pub enum SyncEvent {
    Loaded(store::Result<Vec<DocumentId>>),
    /// `count` files were sent from the pending set as it stood at
    /// `generation`.
    Submitted {
        generation: u64,
        count: usize,
        result: store::Result<Vec<DocumentId>>,
    },
    RemovedOne {
        id: DocumentId,
        result: store::Result<()>,
    },
    RemovedAll(store::Result<()>),
}

impl SyncEvent {
    pub fn operation(&self) -> Operation {
        match self {
            SyncEvent::Loaded(_) => Operation::Load,
            SyncEvent::Submitted { .. } => Operation::Submit,
            SyncEvent::RemovedOne { .. } => Operation::RemoveOne,
            SyncEvent::RemovedAll(_) => Operation::RemoveAll,
        }
    }
}

/// Owns the mirrored document list, the staged uploads and the error line.
///
/// Remote calls run on the tokio runtime and report back through a channel;
/// nothing changes until `poll_events` applies them, so all mutation happens
/// on the thread that owns the session. Calls are never queued against each
/// other and completions are applied in arrival order.
///
/// Removing a single document is optimistic: the entry leaves the local list
/// before the store is asked, and is not put back if the store refuses.
/// Uploads and delete-all only touch the list once the store confirms.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct DocumentSession {
    documents: Vec<DocumentId>,
    pending: PendingUploadSet,
    error_message: Option<String>,
    upload_panel_open: bool,
    tracker: OperationTracker,
    #[derivative(Debug = "ignore")]
    store: Arc<dyn DocumentStore>,
    #[derivative(Debug = "ignore")]
    runtime: Handle,
    #[derivative(Debug = "ignore")]
    event_sender: Sender<SyncEvent>,
    #[derivative(Debug = "ignore")]
    event_receiver: Receiver<SyncEvent>,
}

impl DocumentSession {
    pub fn new(store: Arc<dyn DocumentStore>, runtime: Handle) -> Self {
        let (event_sender, event_receiver) = mpsc::channel();
        Self {
            documents: Vec::new(),
            pending: PendingUploadSet::new(),
            error_message: None,
            upload_panel_open: false,
            tracker: OperationTracker::default(),
            store,
            runtime,
            event_sender,
            event_receiver,
        }
    }

    pub fn documents(&self) -> &[DocumentId] {
        &self.documents
    }

    pub fn pending(&self) -> &PendingUploadSet {
        &self.pending
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_upload_panel_open(&self) -> bool {
        self.upload_panel_open
    }

    pub fn phase(&self, operation: Operation) -> SyncPhase {
        self.tracker.phase(operation)
    }

    pub fn has_in_flight(&self) -> bool {
        self.tracker.any_in_flight()
    }

    pub fn status_text(&self) -> String {
        self.tracker.get_status_text()
    }

    /// Something is staged and no upload is already running.
    pub fn can_submit(&self) -> bool {
        !self.pending.is_empty() && self.phase(Operation::Submit) != SyncPhase::InFlight
    }

    pub fn add_pending(&mut self, files: impl IntoIterator<Item = PendingFile>) {
        self.pending.add(files);
        debug!("{} files pending", self.pending.len());
    }

    pub fn open_upload_panel(&mut self) {
        self.upload_panel_open = true;
        self.tracker.acknowledge(Operation::Submit);
    }

    /// Closing the panel without submitting discards the staged files.
    pub fn dismiss_upload_panel(&mut self) {
        self.upload_panel_open = false;
        self.error_message = None;
        self.pending.clear();
    }

    /// Fetches the full list and replaces the local one with it.
    pub fn load(&mut self) {
        info!("Loading document list");
        let store = Arc::clone(&self.store);
        self.spawn(Operation::Load, async move {
            SyncEvent::Loaded(store.list().await)
        });
    }

    /// Uploads every staged file in one request. Returns `false` without
    /// contacting the store when nothing is staged.
    pub fn submit(&mut self) -> bool {
        if self.pending.is_empty() {
            warn!("Upload requested with no files pending");
            return false;
        }

        let files = self.pending.files().to_vec();
        let generation = self.pending.generation();
        info!(
            "Uploading {} files ({} bytes)",
            files.len(),
            self.pending.total_size()
        );

        let store = Arc::clone(&self.store);
        self.spawn(Operation::Submit, async move {
            let result = store.upload(&files).await;
            SyncEvent::Submitted {
                generation,
                count: files.len(),
                result,
            }
        });
        true
    }

    /// Drops `id` from the local list right away, then asks the store to
    /// delete it.
    pub fn remove_one(&mut self, id: &str) {
        self.documents.retain(|document| document != id);
        info!("Deleting document '{}'", id);

        let store = Arc::clone(&self.store);
        let id = id.to_string();
        self.spawn(Operation::RemoveOne, async move {
            let result = store.delete(&id).await;
            SyncEvent::RemovedOne { id, result }
        });
    }

    pub fn remove_all(&mut self) {
        info!("Deleting all documents");
        let store = Arc::clone(&self.store);
        self.spawn(Operation::RemoveAll, async move {
            SyncEvent::RemovedAll(store.delete_all().await)
        });
    }

    /// Applies every completion that has arrived so far. Returns how many
    /// were applied.
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.event_receiver.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    fn spawn<F>(&mut self, operation: Operation, task: F)
    where
        F: Future<Output = SyncEvent> + Send + 'static,
    {
        self.tracker.begin(operation);
        let sender = self.event_sender.clone();
        self.runtime.spawn(async move {
            let event = task.await;
            if sender.send(event).is_err() {
                debug!("Session gone before {:?} completed", operation);
            }
        });
    }

    fn apply(&mut self, event: SyncEvent) {
        let operation = event.operation();

        let succeeded = match event {
            SyncEvent::Loaded(Ok(documents)) => {
                info!("Loaded {} documents", documents.len());
                self.documents = documents;
                true
            }
            SyncEvent::Loaded(Err(e)) => {
                error!("Error fetching documents: {}", e);
                false
            }
            SyncEvent::Submitted {
                generation,
                count,
                result: Ok(documents),
            } => {
                info!("Upload complete, store now holds {} documents", documents.len());
                self.documents = documents;
                self.pending.remove_submitted(generation, count);
                self.error_message = None;
                self.upload_panel_open = false;
                true
            }
            SyncEvent::Submitted { result: Err(e), .. } => {
                error!("Error uploading files: {}", e);
                self.error_message = Some(UPLOAD_ERROR_MESSAGE.to_string());
                false
            }
            SyncEvent::RemovedOne { id, result: Ok(()) } => {
                info!("Deleted document '{}'", id);
                true
            }
            SyncEvent::RemovedOne { id, result: Err(e) } => {
                // The local list keeps the removal; the next load resyncs it.
                error!("Error deleting document '{}': {}", id, e);
                false
            }
            SyncEvent::RemovedAll(Ok(())) => {
                info!("Deleted all documents");
                self.documents.clear();
                true
            }
            SyncEvent::RemovedAll(Err(e)) => {
                error!("Error deleting all documents: {}", e);
                false
            }
        };

        self.tracker.finish(operation, succeeded);
    }
}
