//! Catalogue loaded from a JSON bundle on disk

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use dx_core::model::{ChatMessage, Document, DocumentContent};

use super::DocumentSource;
use crate::DataError;

/// On-disk layout of a bundle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentBundle {
    pub documents: Vec<Document>,

    /// Extracted content keyed by document id
    #[serde(default)]
    pub content: IndexMap<String, DocumentContent>,

    #[serde(default)]
    pub chat_responses: Vec<ChatMessage>,
}

/// Source reading a [`DocumentBundle`] from a JSON file
pub struct JsonSource {
    path: PathBuf,
    name: String,
    bundle: DocumentBundle,
}

impl JsonSource {
    /// Load and parse the bundle at `path`
    pub async fn new(path: PathBuf) -> Result<Self, DataError> {
        let bundle = tokio::task::spawn_blocking({
            let path = path.clone();
            move || Self::read_bundle(&path)
        })
        .await??;

        info!(
            "Loaded {} documents from {:?}",
            bundle.documents.len(),
            path
        );

        Ok(Self {
            name: path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown.json")
                .to_string(),
            path,
            bundle,
        })
    }

    fn read_bundle(path: &Path) -> Result<DocumentBundle, DataError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DocumentSource for JsonSource {
    async fn documents(&self) -> Result<Vec<Document>, DataError> {
        Ok(self.bundle.documents.clone())
    }

    /// Documents without a content entry have nothing extracted yet
    async fn content(&self, id: &str) -> Result<DocumentContent, DataError> {
        if !self.bundle.documents.iter().any(|doc| doc.id == id) {
            return Err(DataError::DocumentNotFound(id.to_string()));
        }
        Ok(self.bundle.content.get(id).cloned().unwrap_or_default())
    }

    async fn chat_responses(&self) -> Result<Vec<ChatMessage>, DataError> {
        Ok(self.bundle.chat_responses.clone())
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SampleSource;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("dx-data-{}-{}", std::process::id(), name))
    }

    #[tokio::test]
    async fn test_round_trip_sample_bundle() {
        let sample = SampleSource::new();
        let mut bundle = DocumentBundle {
            documents: sample.documents().await.unwrap(),
            chat_responses: sample.chat_responses().await.unwrap(),
            ..Default::default()
        };
        bundle
            .content
            .insert("doc-1".to_string(), sample.content("doc-1").await.unwrap());

        let path = temp_path("bundle.json");
        fs::write(&path, serde_json::to_string_pretty(&bundle).unwrap()).unwrap();

        let source = JsonSource::new(path.clone()).await.unwrap();
        assert_eq!(source.documents().await.unwrap().len(), 5);
        assert_eq!(source.content("doc-1").await.unwrap().blocks.len(), 9);
        assert!(source.content("doc-2").await.unwrap().blocks.is_empty());
        assert!(matches!(
            source.content("doc-9").await,
            Err(DataError::DocumentNotFound(_))
        ));
        assert_eq!(source.chat_responses().await.unwrap().len(), 3);
        assert!(source.source_name().ends_with("bundle.json"));

        let _ = fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let result = JsonSource::new(temp_path("missing.json")).await;
        assert!(matches!(result, Err(DataError::Io(_))));
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let path = temp_path("broken.json");
        fs::write(&path, "{ \"documents\": [").unwrap();

        let result = JsonSource::new(path.clone()).await;
        assert!(matches!(result, Err(DataError::Json(_))));

        let _ = fs::remove_file(path);
    }
}
