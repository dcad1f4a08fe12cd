//! Page routing and launch arguments

use std::path::PathBuf;

use dx_core::Document;
use tracing::warn;

/// Document the upload flow lands on once parsing finishes
pub const PARSED_DOCUMENT_ID: &str = "doc-1";

/// Which page fills the window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Documents,
    NewParse,
    Workspace(String),
}

/// Look up `id`, falling back to the first catalogued document
pub fn resolve_document<'a>(documents: &'a [Document], id: &str) -> Option<&'a Document> {
    documents.iter().find(|doc| doc.id == id).or_else(|| {
        let fallback = documents.first();
        if let Some(doc) = fallback {
            warn!("Unknown document {}, showing {} instead", id, doc.id);
        }
        fallback
    })
}

/// `docext [settings.json] [documents.json]`
#[derive(Debug, Default, PartialEq)]
pub struct LaunchArgs {
    pub settings_path: Option<PathBuf>,
    pub data_path: Option<PathBuf>,
}

impl LaunchArgs {
    /// Parse the arguments after the program name
    pub fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let mut args = args.into_iter().filter(|a| !a.is_empty()).map(PathBuf::from);
        Self {
            settings_path: args.next(),
            data_path: args.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dx_core::model::{DocumentKind, DocumentStatus};

    fn doc(id: &str) -> Document {
        let date = NaiveDate::from_ymd_opt(2024, 10, 15).unwrap();
        Document {
            id: id.to_string(),
            title: format!("Document {}", id),
            kind: DocumentKind::Pdf,
            status: DocumentStatus::Parsed,
            pages: Vec::new(),
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn test_resolve_known_and_unknown() {
        let documents = vec![doc("doc-1"), doc("doc-2")];
        assert_eq!(resolve_document(&documents, "doc-2").map(|d| d.id.as_str()), Some("doc-2"));
        assert_eq!(resolve_document(&documents, "doc-404").map(|d| d.id.as_str()), Some("doc-1"));
        assert!(resolve_document(&[], "doc-1").is_none());
    }

    #[test]
    fn test_launch_args() {
        assert_eq!(LaunchArgs::parse(Vec::new()), LaunchArgs::default());

        let args = LaunchArgs::parse(vec!["settings.json".to_string(), "bundle.json".to_string()]);
        assert_eq!(args.settings_path, Some(PathBuf::from("settings.json")));
        assert_eq!(args.data_path, Some(PathBuf::from("bundle.json")));
    }
}
