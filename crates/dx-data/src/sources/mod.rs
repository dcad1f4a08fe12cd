pub mod json_source;
pub mod sample_source;

pub use json_source::JsonSource;
pub use sample_source::SampleSource;

use async_trait::async_trait;
use dx_core::model::{ChatMessage, Document, DocumentContent};

use crate::DataError;

/// Trait for anything that can list documents and hand out their extracted content
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// All documents, in catalogue order
    async fn documents(&self) -> Result<Vec<Document>, DataError>;

    /// One document by id
    async fn document(&self, id: &str) -> Result<Document, DataError> {
        self.documents()
            .await?
            .into_iter()
            .find(|doc| doc.id == id)
            .ok_or_else(|| DataError::DocumentNotFound(id.to_string()))
    }

    /// Extracted blocks, tables, images and entities of a document
    async fn content(&self, id: &str) -> Result<DocumentContent, DataError>;

    /// Canned assistant replies used by the chat simulation
    async fn chat_responses(&self) -> Result<Vec<ChatMessage>, DataError>;

    /// Get the source name/path
    fn source_name(&self) -> &str;
}
