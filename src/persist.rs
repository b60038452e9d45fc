use crate::record::ObservationRecord;
use crate::writer::{RecordWriter, WriterError};
use std::time::Duration;

pub const LOCAL_FILE_WARNING: &str =
    "GOOGLE_APPS_SCRIPT_WEBHOOK is not set; the record was saved to the local file.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Webhook,
    LocalFile,
}

impl StorageKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Webhook => "google-sheets-webhook",
            Self::LocalFile => "local-file",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    Storage(#[from] WriterError),
    #[error("webhook responded with status {status}")]
    UpstreamFailure { status: u16 },
    #[error("webhook unreachable: {0}")]
    Network(#[from] reqwest::Error),
}

pub struct WebhookBackend {
    address: String,
    client: reqwest::Client,
}

impl WebhookBackend {
    pub fn new(address: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            address: address.into(),
            client,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    async fn send(&self, record: &ObservationRecord) -> Result<(), PersistError> {
        let resp = self.client.post(&self.address).json(record).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PersistError::UpstreamFailure {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

pub struct LocalFileBackend {
    writer: RecordWriter,
}

impl LocalFileBackend {
    pub fn new(writer: RecordWriter) -> Self {
        Self { writer }
    }
}

/// Where submissions go. Chosen once at startup; a failure on the chosen
/// backend is never retried or redirected to the other one.
pub enum StorageBackend {
    Webhook(WebhookBackend),
    LocalFile(LocalFileBackend),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistOutcome {
    pub storage: StorageKind,
    pub warning: Option<&'static str>,
}

impl StorageBackend {
    pub fn kind(&self) -> StorageKind {
        match self {
            Self::Webhook(_) => StorageKind::Webhook,
            Self::LocalFile(_) => StorageKind::LocalFile,
        }
    }

    pub async fn persist(
        &self,
        record: &ObservationRecord,
    ) -> Result<PersistOutcome, PersistError> {
        match self {
            Self::Webhook(hook) => {
                hook.send(record).await?;
                Ok(PersistOutcome {
                    storage: StorageKind::Webhook,
                    warning: None,
                })
            }
            Self::LocalFile(local) => {
                local.writer.append(record.clone()).await?;
                Ok(PersistOutcome {
                    storage: StorageKind::LocalFile,
                    warning: Some(LOCAL_FILE_WARNING),
                })
            }
        }
    }
}
