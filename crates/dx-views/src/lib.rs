//! Panels of the extraction workspace
//!
//! Every panel reads the shared [`dx_core::WorkspaceState`] through the open
//! [`dx_core::WorkspaceSession`] and writes back to it on click. Nothing here
//! talks to another panel directly.

mod chat;
mod entities;
mod images;
mod inspector;
mod markdown;
mod panel;
mod selection;
mod tables;
mod viewer;

pub use chat::ChatPanel;
pub use entities::EntitiesPanel;
pub use images::ImagesPanel;
pub use inspector::Inspector;
pub use markdown::{MarkdownPanel, MarkdownViewMode};
pub use panel::{PanelKind, WorkspacePanel};
pub use selection::SelectionWatcher;
pub use tables::{export_csv, TablesPanel};
pub use viewer::{next_page, prev_page, DocumentViewer, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use dx_core::events::EventBus;
    use dx_core::model::{
        BoundingBox, Document, DocumentContent, DocumentKind, DocumentStatus, Entity, EntityStatus,
        Evidence, ExtractedImage, ExtractedTable, MarkdownBlock, PageData, RegionKind, SourceRef,
        TableGrid,
    };
    use dx_core::{AppSettings, PageNumber, WorkspaceSession};
    use tokio::runtime::Handle;

    pub fn block(id: &str, page: PageNumber) -> MarkdownBlock {
        MarkdownBlock {
            block_id: id.to_string(),
            markdown: format!("## Section {}\n\nBody of {}.", id, id),
            confidence: 0.9,
            source_ref: SourceRef {
                page,
                bbox: BoundingBox::new(10.0, 5.0, 80.0, 8.0),
                kind: RegionKind::TextBlock,
            },
        }
    }

    pub fn table(id: &str, page: PageNumber) -> ExtractedTable {
        ExtractedTable {
            table_id: id.to_string(),
            page,
            bbox: BoundingBox::new(10.0, 30.0, 80.0, 25.0),
            as_markdown: "| Segment | Revenue |\n|---|---|\n| Cloud | $12M |".to_string(),
            grid: TableGrid {
                columns: vec!["Segment".to_string(), "Revenue".to_string()],
                rows: vec![vec!["Cloud".to_string(), "$12M".to_string()]],
            },
            confidence: 0.92,
        }
    }

    pub fn image(id: &str, page: PageNumber) -> ExtractedImage {
        ExtractedImage {
            image_id: id.to_string(),
            page,
            bbox: BoundingBox::new(15.0, 60.0, 70.0, 30.0),
            thumbnail_color: "hsl(172 30% 90%)".to_string(),
            llm_explanation: "Bar chart of quarterly revenue".to_string(),
            tags: vec!["chart".to_string()],
        }
    }

    pub fn entity(id: &str, block_id: &str, page: PageNumber, confidence: f32) -> Entity {
        Entity {
            entity_id: id.to_string(),
            entity_type: "metric".to_string(),
            value: format!("value of {}", id),
            confidence,
            evidence: Evidence {
                block_id: block_id.to_string(),
                page,
                snippet: "snippet".to_string(),
            },
            status: EntityStatus::Pending,
        }
    }

    pub fn document(pages: u32) -> Document {
        let date = NaiveDate::from_ymd_opt(2024, 10, 15).unwrap();
        Document {
            id: "doc-1".to_string(),
            title: "Q3 2024 Financial Report".to_string(),
            kind: DocumentKind::Pdf,
            status: DocumentStatus::Parsed,
            pages: (1..=pages).map(|page_number| PageData { page_number }).collect(),
            created_at: date,
            updated_at: date,
        }
    }

    pub fn open(content: DocumentContent, pages: u32) -> WorkspaceSession {
        WorkspaceSession::open(
            document(pages),
            content,
            Vec::new(),
            AppSettings::default(),
            Arc::new(EventBus::new()),
            Handle::current(),
        )
    }
}
