//! Document and extraction records shared by every crate
//!
//! These are plain data carriers. The workspace state never looks inside them;
//! panels use the page numbers and bounding boxes to decide what to highlight.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Opaque identifier of a selectable region (text block, table or image)
pub type BlockId = String;

/// 1-based page number
pub type PageNumber = u32;

/// Kind of source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    ImageSet,
}

/// Processing status of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Uploaded,
    Parsing,
    Parsed,
    EntitiesReady,
    Failed,
}

impl DocumentStatus {
    /// Label shown in status badges
    pub fn label(&self) -> &'static str {
        match self {
            DocumentStatus::Uploaded => "uploaded",
            DocumentStatus::Parsing => "parsing",
            DocumentStatus::Parsed => "parsed",
            DocumentStatus::EntitiesReady => "entities ready",
            DocumentStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageData {
    pub page_number: PageNumber,
}

/// A document in the catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub kind: DocumentKind,
    pub status: DocumentStatus,
    pub pages: Vec<PageData>,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
}

impl Document {
    pub fn total_pages(&self) -> PageNumber {
        self.pages.len() as PageNumber
    }

    /// Case-insensitive title match used by the catalogue search box
    pub fn matches(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Filter a document list by title, keeping the original order
pub fn search_documents<'a>(documents: &'a [Document], query: &str) -> Vec<&'a Document> {
    documents.iter().filter(|doc| doc.matches(query)).collect()
}

/// Region on a page, all fields are percentages of the page dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }
}

/// What kind of content a region holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    TextBlock,
    TableRegion,
    ImageRegion,
}

impl RegionKind {
    pub fn label(&self) -> &'static str {
        match self {
            RegionKind::TextBlock => "text_block",
            RegionKind::TableRegion => "table_region",
            RegionKind::ImageRegion => "image_region",
        }
    }
}

/// Where a markdown block came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub page: PageNumber,
    pub bbox: BoundingBox,
    pub kind: RegionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkdownBlock {
    pub block_id: BlockId,
    pub markdown: String,
    pub confidence: f32,
    pub source_ref: SourceRef,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableGrid {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTable {
    pub table_id: BlockId,
    pub page: PageNumber,
    pub bbox: BoundingBox,
    pub as_markdown: String,
    pub grid: TableGrid,
    pub confidence: f32,
}

impl ExtractedTable {
    /// Render the grid as CSV, header row first
    pub fn to_csv(&self) -> anyhow::Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.grid.columns)?;
        for row in &self.grid.rows {
            writer.write_record(row)?;
        }
        let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("CSV flush failed: {}", e))?;
        Ok(String::from_utf8(bytes)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedImage {
    pub image_id: BlockId,
    pub page: PageNumber,
    pub bbox: BoundingBox,
    /// CSS-style `hsl(h s% l%)` swatch colour
    pub thumbnail_color: String,
    pub llm_explanation: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Pointer from an entity back to the block it was found in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub block_id: BlockId,
    pub page: PageNumber,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_id: String,
    pub entity_type: String,
    pub value: String,
    pub confidence: f32,
    pub evidence: Evidence,
    pub status: EntityStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub block_id: BlockId,
    pub page: PageNumber,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub message_id: String,
    pub role: ChatRole,
    pub content: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
}

/// Everything extracted from one document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentContent {
    #[serde(default)]
    pub blocks: Vec<MarkdownBlock>,
    #[serde(default)]
    pub tables: Vec<ExtractedTable>,
    #[serde(default)]
    pub images: Vec<ExtractedImage>,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

/// Confidence bucket used by badges and bulk acceptance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub const HIGH_THRESHOLD: f32 = 0.85;
    pub const MEDIUM_THRESHOLD: f32 = 0.6;

    pub fn from_score(score: f32) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            ConfidenceLevel::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

/// Whole-number percentage for badges, e.g. `0.915 -> 92`
pub fn confidence_percent(score: f32) -> u32 {
    (score * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, title: &str) -> Document {
        let date = NaiveDate::from_ymd_opt(2024, 10, 15).unwrap();
        Document {
            id: id.to_string(),
            title: title.to_string(),
            kind: DocumentKind::Pdf,
            status: DocumentStatus::Parsed,
            pages: vec![PageData { page_number: 1 }, PageData { page_number: 2 }],
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let docs = vec![doc("doc-1", "Q3 Financial Report"), doc("doc-2", "NDA Agreement")];

        let hits = search_documents(&docs, "financial");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "doc-1");

        assert_eq!(search_documents(&docs, "").len(), 2);
        assert!(search_documents(&docs, "invoice").is_empty());
    }

    #[test]
    fn test_confidence_levels() {
        assert_eq!(ConfidenceLevel::from_score(0.85), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(0.84), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(0.6), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(0.59), ConfidenceLevel::Low);
        assert_eq!(confidence_percent(0.915), 92);
    }

    #[test]
    fn test_table_csv_export() {
        let table = ExtractedTable {
            table_id: "table-1".to_string(),
            page: 2,
            bbox: BoundingBox::new(10.0, 32.0, 80.0, 25.0),
            as_markdown: String::new(),
            grid: TableGrid {
                columns: vec!["Segment".to_string(), "Q3 2024".to_string()],
                rows: vec![vec!["Enterprise, Solutions".to_string(), "$89.3M".to_string()]],
            },
            confidence: 0.92,
        };

        let csv = table.to_csv().unwrap();
        assert_eq!(csv, "Segment,Q3 2024\n\"Enterprise, Solutions\",$89.3M\n");
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&DocumentStatus::EntitiesReady).unwrap();
        assert_eq!(json, "\"entities_ready\"");
        assert_eq!(doc("d", "t").total_pages(), 2);
    }
}
