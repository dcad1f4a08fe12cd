//! Built-in sample catalogue: five documents and one parsed financial report

use async_trait::async_trait;
use chrono::NaiveDate;
use once_cell::sync::Lazy;

use dx_core::model::{
    BoundingBox, ChatMessage, ChatRole, Citation, Document, DocumentContent, DocumentKind,
    DocumentStatus, Entity, EntityStatus, Evidence, ExtractedImage, ExtractedTable, MarkdownBlock,
    PageData, PageNumber, RegionKind, SourceRef, TableGrid,
};

use super::DocumentSource;
use crate::DataError;

static DOCUMENTS: Lazy<Vec<Document>> = Lazy::new(|| {
    vec![
        document("doc-1", "Q3 2024 Financial Report — Acme Corp", DocumentKind::Pdf, DocumentStatus::Parsed, 4, (10, 15), (10, 16)),
        document("doc-2", "NDA Agreement — Globex Industries", DocumentKind::Pdf, DocumentStatus::EntitiesReady, 2, (10, 10), (10, 12)),
        document("doc-3", "Product Specification v2.1", DocumentKind::Pdf, DocumentStatus::Parsing, 3, (10, 18), (10, 18)),
        document("doc-4", "Invoice Scans — October Batch", DocumentKind::ImageSet, DocumentStatus::Uploaded, 5, (10, 19), (10, 19)),
        document("doc-5", "Board Meeting Minutes — Sep 2024", DocumentKind::Pdf, DocumentStatus::Failed, 1, (10, 5), (10, 5)),
    ]
});

static CONTENT: Lazy<DocumentContent> = Lazy::new(|| DocumentContent {
    blocks: blocks(),
    tables: tables(),
    images: images(),
    entities: entities(),
});

static CHAT_RESPONSES: Lazy<Vec<ChatMessage>> = Lazy::new(chat_responses);

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap_or(NaiveDate::MIN)
}

fn document(
    id: &str,
    title: &str,
    kind: DocumentKind,
    status: DocumentStatus,
    pages: PageNumber,
    created: (u32, u32),
    updated: (u32, u32),
) -> Document {
    Document {
        id: id.to_string(),
        title: title.to_string(),
        kind,
        status,
        pages: (1..=pages).map(|page_number| PageData { page_number }).collect(),
        created_at: date(created.0, created.1),
        updated_at: date(updated.0, updated.1),
    }
}

fn block(id: &str, markdown: &str, confidence: f32, page: PageNumber, bbox: [f32; 4], kind: RegionKind) -> MarkdownBlock {
    MarkdownBlock {
        block_id: id.to_string(),
        markdown: markdown.to_string(),
        confidence,
        source_ref: SourceRef {
            page,
            bbox: BoundingBox::new(bbox[0], bbox[1], bbox[2], bbox[3]),
            kind,
        },
    }
}

const REVENUE_TABLE: &str = "| Segment | Q3 2024 | Q3 2023 | Change |\n|---------|---------|---------|--------|\n| Enterprise Solutions | $89.3M | $78.1M | +14.3% |\n| Consumer Products | $53.2M | $49.1M | +8.4% |";

const KPI_TABLE: &str = "| KPI | Q3 2024 | Q2 2024 | Trend |\n|-----|---------|---------|-------|\n| Retention Rate | 94.2% | 91.8% | ↑ |\n| MAU | 2.1M | 1.9M | ↑ |\n| NPS | 72 | 68 | ↑ |";

fn blocks() -> Vec<MarkdownBlock> {
    use RegionKind::{TableRegion, TextBlock};

    vec![
        block("block-1", "# Q3 2024 Financial Report", 0.98, 1, [10.0, 5.0, 80.0, 8.0], TextBlock),
        block(
            "block-2",
            "This report presents the consolidated financial results for Acme Corporation for the third quarter ending September 30, 2024. Overall performance exceeded market expectations with revenue growth of 12% year-over-year.",
            0.94, 1, [10.0, 16.0, 80.0, 18.0], TextBlock,
        ),
        block("block-3", "## Revenue Overview", 0.97, 1, [10.0, 40.0, 50.0, 6.0], TextBlock),
        block(
            "block-4",
            "Total revenue for Q3 2024 reached **$142.5 million**, up from $127.2 million in Q3 2023. The Enterprise Solutions segment contributed $89.3 million, while Consumer Products generated $53.2 million. APAC expansion drove 34% of new revenue.",
            0.91, 2, [10.0, 5.0, 80.0, 22.0], TextBlock,
        ),
        block("block-5", REVENUE_TABLE, 0.88, 2, [10.0, 32.0, 80.0, 25.0], TableRegion),
        block("block-6", "## Key Performance Indicators", 0.96, 3, [10.0, 5.0, 55.0, 6.0], TextBlock),
        block(
            "block-7",
            "Customer retention rate improved to **94.2%** from 91.8% in the prior quarter. Monthly active users grew to 2.1 million, with average session duration increasing by 18%. Net Promoter Score reached an all-time high of 72.",
            0.89, 3, [10.0, 14.0, 80.0, 28.0], TextBlock,
        ),
        block("block-8", "## Risk Factors", 0.95, 4, [10.0, 5.0, 40.0, 6.0], TextBlock),
        block(
            "block-9",
            "The company faces several material risks including market volatility affecting currency exchange rates, evolving regulatory requirements in EU data protection (GDPR amendments), potential supply chain disruptions in semiconductor procurement, and competitive pressure from emerging market players with lower cost structures.",
            0.87, 4, [10.0, 14.0, 80.0, 32.0], TextBlock,
        ),
    ]
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn tables() -> Vec<ExtractedTable> {
    vec![
        ExtractedTable {
            table_id: "table-1".to_string(),
            page: 2,
            bbox: BoundingBox::new(10.0, 32.0, 80.0, 25.0),
            as_markdown: REVENUE_TABLE.to_string(),
            grid: TableGrid {
                columns: strings(&["Segment", "Q3 2024", "Q3 2023", "Change"]),
                rows: vec![
                    strings(&["Enterprise Solutions", "$89.3M", "$78.1M", "+14.3%"]),
                    strings(&["Consumer Products", "$53.2M", "$49.1M", "+8.4%"]),
                ],
            },
            confidence: 0.92,
        },
        ExtractedTable {
            table_id: "table-2".to_string(),
            page: 3,
            bbox: BoundingBox::new(10.0, 48.0, 80.0, 22.0),
            as_markdown: KPI_TABLE.to_string(),
            grid: TableGrid {
                columns: strings(&["KPI", "Q3 2024", "Q2 2024", "Trend"]),
                rows: vec![
                    strings(&["Retention Rate", "94.2%", "91.8%", "↑"]),
                    strings(&["MAU", "2.1M", "1.9M", "↑"]),
                    strings(&["NPS", "72", "68", "↑"]),
                ],
            },
            confidence: 0.9,
        },
    ]
}

fn images() -> Vec<ExtractedImage> {
    vec![
        ExtractedImage {
            image_id: "image-1".to_string(),
            page: 2,
            bbox: BoundingBox::new(15.0, 65.0, 70.0, 28.0),
            thumbnail_color: "hsl(172 30% 90%)".to_string(),
            llm_explanation: "Bar chart comparing Q3 2024 vs Q3 2023 revenue across Enterprise Solutions and Consumer Products segments. Enterprise shows stronger growth trajectory.".to_string(),
            tags: strings(&["chart", "bar-graph", "revenue"]),
        },
        ExtractedImage {
            image_id: "image-2".to_string(),
            page: 4,
            bbox: BoundingBox::new(20.0, 52.0, 60.0, 38.0),
            thumbnail_color: "hsl(220 20% 90%)".to_string(),
            llm_explanation: "Market positioning quadrant diagram showing Acme Corp in the 'Leaders' quadrant, with competitors plotted across Innovation and Market Share axes.".to_string(),
            tags: strings(&["diagram", "quadrant", "competitive-analysis"]),
        },
    ]
}

fn entity(id: &str, entity_type: &str, value: &str, confidence: f32, block_id: &str, page: PageNumber, snippet: &str) -> Entity {
    Entity {
        entity_id: id.to_string(),
        entity_type: entity_type.to_string(),
        value: value.to_string(),
        confidence,
        evidence: Evidence {
            block_id: block_id.to_string(),
            page,
            snippet: snippet.to_string(),
        },
        status: EntityStatus::Pending,
    }
}

fn entities() -> Vec<Entity> {
    vec![
        entity("ent-1", "Organization", "Acme Corporation", 0.97, "block-2", 1, "consolidated financial results for Acme Corporation"),
        entity("ent-2", "Amount", "$142.5 million", 0.95, "block-4", 2, "Total revenue for Q3 2024 reached $142.5 million"),
        entity("ent-3", "Date", "Q3 2024 (Sep 30, 2024)", 0.98, "block-2", 1, "third quarter ending September 30, 2024"),
        entity("ent-4", "Amount", "$89.3 million", 0.93, "block-4", 2, "Enterprise Solutions segment contributed $89.3 million"),
        entity("ent-5", "Metric", "94.2% retention rate", 0.88, "block-7", 3, "Customer retention rate improved to 94.2%"),
        entity("ent-6", "Location", "APAC", 0.82, "block-4", 2, "APAC expansion drove 34% of new revenue"),
    ]
}

fn response(id: &str, content: &str, block_id: &str, page: PageNumber, label: &str) -> ChatMessage {
    ChatMessage {
        message_id: id.to_string(),
        role: ChatRole::Assistant,
        content: content.to_string(),
        citations: vec![Citation {
            block_id: block_id.to_string(),
            page,
            label: label.to_string(),
        }],
    }
}

fn chat_responses() -> Vec<ChatMessage> {
    vec![
        response(
            "resp-1",
            "Based on the document, the total revenue for Q3 2024 was **$142.5 million**, representing a 12% year-over-year increase. The primary growth drivers were the Enterprise Solutions segment and expansion into APAC markets.",
            "block-4", 2, "Revenue Overview, p.2",
        ),
        response(
            "resp-2",
            "The document mentions several key risks:\n\n1. **Market volatility** affecting currency exchange rates\n2. **Regulatory changes** in EU data protection\n3. **Supply chain disruption** risks in semiconductor procurement\n4. **Competitive pressure** from emerging market players",
            "block-9", 4, "Risk Factors, p.4",
        ),
        response(
            "resp-3",
            "Table #1 shows the revenue breakdown by segment:\n\n- **Enterprise Solutions**: $89.3M (up 14.3% from Q3 2023)\n- **Consumer Products**: $53.2M (up 8.4% from Q3 2023)\n\nEnterprise Solutions is clearly the dominant segment, contributing roughly 63% of total revenue.",
            "table-1", 2, "Revenue Table, p.2",
        ),
    ]
}

/// In-memory source backed by the built-in sample data.
///
/// Every catalogued document shares the same parsed content.
#[derive(Debug, Default, Clone, Copy)]
pub struct SampleSource;

impl SampleSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentSource for SampleSource {
    async fn documents(&self) -> Result<Vec<Document>, DataError> {
        Ok(DOCUMENTS.clone())
    }

    async fn content(&self, id: &str) -> Result<DocumentContent, DataError> {
        if DOCUMENTS.iter().any(|doc| doc.id == id) {
            Ok(CONTENT.clone())
        } else {
            Err(DataError::DocumentNotFound(id.to_string()))
        }
    }

    async fn chat_responses(&self) -> Result<Vec<ChatMessage>, DataError> {
        Ok(CHAT_RESPONSES.clone())
    }

    fn source_name(&self) -> &str {
        "sample data"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dx_core::regions::regions_on_page;

    #[tokio::test]
    async fn test_catalogue() {
        let source = SampleSource::new();
        let docs = source.documents().await.unwrap();
        assert_eq!(docs.len(), 5);
        assert_eq!(docs[0].total_pages(), 4);
        assert_eq!(docs[4].status, DocumentStatus::Failed);
    }

    #[tokio::test]
    async fn test_unknown_document() {
        let source = SampleSource::new();
        assert!(matches!(
            source.document("doc-404").await,
            Err(DataError::DocumentNotFound(id)) if id == "doc-404"
        ));
        assert!(source.content("doc-404").await.is_err());
    }

    #[tokio::test]
    async fn test_page_two_regions() {
        let content = SampleSource::new().content("doc-1").await.unwrap();
        let ids: Vec<String> = regions_on_page(&content, 2).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["block-4", "block-5", "table-1", "image-1"]);
    }

    #[tokio::test]
    async fn test_evidence_points_at_known_blocks() {
        let content = SampleSource::new().content("doc-1").await.unwrap();
        for entity in &content.entities {
            let block = content
                .blocks
                .iter()
                .find(|b| b.block_id == entity.evidence.block_id)
                .unwrap();
            assert_eq!(block.source_ref.page, entity.evidence.page);
        }
    }

    #[tokio::test]
    async fn test_chat_citations_are_selectable() {
        let source = SampleSource::new();
        let content = source.content("doc-1").await.unwrap();
        for reply in source.chat_responses().await.unwrap() {
            for citation in reply.citations {
                let on_page = regions_on_page(&content, citation.page);
                assert!(on_page.iter().any(|r| r.id == citation.block_id));
            }
        }
    }
}
