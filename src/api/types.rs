use crate::api::error::ApiError;
use crate::persist::StorageBackend;
use crate::school::{SchoolData, SchoolError};
use crate::writer::RecordWriter;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup. A load failure is kept so that every
    /// bootstrap request reports it instead of the process refusing to start.
    pub school: Arc<Result<SchoolData, SchoolError>>,
    pub backend: Arc<StorageBackend>,
    pub writer: RecordWriter,
    pub public_dir: PathBuf,
}

impl AppState {
    pub fn school(&self) -> Result<&SchoolData, ApiError> {
        match &*self.school {
            Ok(school) => Ok(school),
            Err(e) => Err(ApiError::ReferenceData(e.to_string())),
        }
    }
}
