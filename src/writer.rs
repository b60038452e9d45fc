use crate::record::ObservationRecord;
use crate::store::{LocalStore, StoreError};
use tokio::sync::{mpsc, oneshot};

const QUEUE_DEPTH: usize = 64;

enum Command {
    Append {
        record: ObservationRecord,
        reply: oneshot::Sender<Result<(), StoreError>>,
    },
    Recent {
        limit: usize,
        reply: oneshot::Sender<Result<Vec<ObservationRecord>, StoreError>>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("record writer is no longer running")]
    Closed,
}

/// Handle to the thread that owns the local store. Appends and reads are
/// applied one at a time in arrival order, so concurrent submissions cannot
/// drop each other's records.
#[derive(Clone)]
pub struct RecordWriter {
    tx: mpsc::Sender<Command>,
}

impl RecordWriter {
    pub fn spawn(store: LocalStore) -> std::io::Result<Self> {
        let (tx, mut rx) = mpsc::channel::<Command>(QUEUE_DEPTH);
        std::thread::Builder::new()
            .name("record-writer".to_string())
            .spawn(move || {
                while let Some(cmd) = rx.blocking_recv() {
                    match cmd {
                        Command::Append { record, reply } => {
                            let res = store.append(&record);
                            if let Err(e) = &res {
                                tracing::error!(error = %e, record_id = %record.id, "local append failed");
                            }
                            let _ = reply.send(res);
                        }
                        Command::Recent { limit, reply } => {
                            let _ = reply.send(store.recent(limit));
                        }
                    }
                }
                tracing::debug!("record writer stopped");
            })?;
        Ok(Self { tx })
    }

    pub async fn append(&self, record: ObservationRecord) -> Result<(), WriterError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Append { record, reply })
            .await
            .map_err(|_| WriterError::Closed)?;
        rx.await
            .map_err(|_| WriterError::Closed)?
            .map_err(WriterError::from)
    }

    pub async fn recent(&self, limit: usize) -> Result<Vec<ObservationRecord>, WriterError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Recent { limit, reply })
            .await
            .map_err(|_| WriterError::Closed)?;
        rx.await
            .map_err(|_| WriterError::Closed)?
            .map_err(WriterError::from)
    }
}
