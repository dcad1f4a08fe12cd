//! Overlay regions shown by the document viewer

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use crate::model::{BlockId, BoundingBox, DocumentContent, PageNumber, RegionKind};
use crate::workspace::{SelectionContext, SelectionSubscriber, FIRST_PAGE};

/// A clickable region drawn over a page
#[derive(Debug, Clone, PartialEq)]
pub struct ContentRegion {
    pub id: BlockId,
    pub bbox: BoundingBox,
    pub kind: RegionKind,
}

/// All text blocks, tables and images located on `page`, in that order
pub fn regions_on_page(content: &DocumentContent, page: PageNumber) -> Vec<ContentRegion> {
    let blocks = content
        .blocks
        .iter()
        .filter(|b| b.source_ref.page == page)
        .map(|b| ContentRegion {
            id: b.block_id.clone(),
            bbox: b.source_ref.bbox,
            kind: b.source_ref.kind,
        });

    let tables = content
        .tables
        .iter()
        .filter(|t| t.page == page)
        .map(|t| ContentRegion {
            id: t.table_id.clone(),
            bbox: t.bbox,
            kind: RegionKind::TableRegion,
        });

    let images = content
        .images
        .iter()
        .filter(|img| img.page == page)
        .map(|img| ContentRegion {
            id: img.image_id.clone(),
            bbox: img.bbox,
            kind: RegionKind::ImageRegion,
        });

    blocks.chain(tables).chain(images).collect()
}

#[derive(Debug)]
struct RegionCache {
    document_id: String,
    content: Arc<DocumentContent>,
    page: PageNumber,
    generation: u64,
    regions: Arc<Vec<ContentRegion>>,
}

impl RegionCache {
    fn rebuild(&mut self) {
        self.regions = Arc::new(regions_on_page(&self.content, self.page));
        trace!(
            "Rebuilt {} overlay regions for {} page {}",
            self.regions.len(),
            self.document_id,
            self.page
        );
    }
}

/// Overlay set for the current page, kept in sync by subscribing to the workspace state
#[derive(Debug)]
pub struct PageRegions {
    cache: RwLock<RegionCache>,
}

impl PageRegions {
    pub fn new(document_id: impl Into<String>, content: Arc<DocumentContent>) -> Self {
        let mut cache = RegionCache {
            document_id: document_id.into(),
            content,
            page: FIRST_PAGE,
            generation: 0,
            regions: Arc::new(Vec::new()),
        };
        cache.rebuild();

        Self {
            cache: RwLock::new(cache),
        }
    }

    /// Swap in another document's content and rebuild for the current page
    pub fn set_document(&self, document_id: impl Into<String>, content: Arc<DocumentContent>) {
        let mut cache = self.cache.write();
        cache.document_id = document_id.into();
        cache.content = content;
        cache.rebuild();
    }

    /// Regions on the page last seen
    pub fn regions(&self) -> Arc<Vec<ContentRegion>> {
        self.cache.read().regions.clone()
    }

    pub fn page(&self) -> PageNumber {
        self.cache.read().page
    }

    pub fn document_id(&self) -> String {
        self.cache.read().document_id.clone()
    }

    /// Selection generation the cache was last synced with
    pub fn generation(&self) -> u64 {
        self.cache.read().generation
    }
}

impl SelectionSubscriber for PageRegions {
    fn on_selection_change(&self, context: &SelectionContext) {
        let mut cache = self.cache.write();
        if context.generation < cache.generation {
            trace!("Ignoring outdated selection generation {}", context.generation);
            return;
        }
        cache.generation = context.generation;
        if cache.page != context.selection.current_page {
            cache.page = context.selection.current_page;
            cache.rebuild();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExtractedImage, ExtractedTable, MarkdownBlock, SourceRef, TableGrid};
    use crate::workspace::{SelectionState, WorkspaceState};
    use std::sync::Weak;

    fn block(id: &str, page: PageNumber) -> MarkdownBlock {
        MarkdownBlock {
            block_id: id.to_string(),
            markdown: format!("## {}", id),
            confidence: 0.9,
            source_ref: SourceRef {
                page,
                bbox: BoundingBox::new(10.0, 5.0, 80.0, 8.0),
                kind: RegionKind::TextBlock,
            },
        }
    }

    fn content() -> DocumentContent {
        DocumentContent {
            blocks: vec![block("block-1", 1), block("block-4", 2), block("block-5", 2)],
            tables: vec![ExtractedTable {
                table_id: "table-1".to_string(),
                page: 2,
                bbox: BoundingBox::new(10.0, 32.0, 80.0, 25.0),
                as_markdown: String::new(),
                grid: TableGrid::default(),
                confidence: 0.92,
            }],
            images: vec![ExtractedImage {
                image_id: "image-1".to_string(),
                page: 2,
                bbox: BoundingBox::new(15.0, 65.0, 70.0, 28.0),
                thumbnail_color: "hsl(172 30% 90%)".to_string(),
                llm_explanation: String::new(),
                tags: vec![],
            }],
            entities: vec![],
        }
    }

    fn ids(regions: &[ContentRegion]) -> Vec<&str> {
        regions.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_regions_on_page_order() {
        let content = content();
        let regions = regions_on_page(&content, 2);
        assert_eq!(ids(&regions), vec!["block-4", "block-5", "table-1", "image-1"]);
        assert_eq!(regions[2].kind, RegionKind::TableRegion);
        assert_eq!(regions[3].kind, RegionKind::ImageRegion);
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        assert!(regions_on_page(&content(), 9).is_empty());
        assert!(regions_on_page(&content(), 0).is_empty());
    }

    #[test]
    fn test_page_regions_follow_state() {
        let state = WorkspaceState::new();
        let regions = Arc::new(PageRegions::new("doc-1", Arc::new(content())));
        let _sub = state.subscribe(regions.clone());

        assert_eq!(ids(&regions.regions()), vec!["block-1"]);

        state.set_current_page(2);
        assert_eq!(regions.page(), 2);
        assert_eq!(regions.regions().len(), 4);

        // selection alone does not move the page
        state.select("block-4");
        assert_eq!(regions.page(), 2);
        assert_eq!(regions.generation(), state.generation());
    }

    #[test]
    fn test_late_subscriber_starts_on_current_page() {
        let state = WorkspaceState::new();
        state.set_current_page(2);

        let regions = Arc::new(PageRegions::new("doc-1", Arc::new(content())));
        let _sub = state.subscribe(regions.clone());
        assert_eq!(regions.page(), 2);
        assert_eq!(regions.regions().len(), 4);
    }

    #[test]
    fn test_outdated_context_is_ignored() {
        let regions = PageRegions::new("doc-1", Arc::new(content()));
        let context = |page: PageNumber, generation: u64| SelectionContext {
            selection: SelectionState { selected_block_id: None, current_page: page },
            generation,
        };

        regions.on_selection_change(&context(2, 4));
        regions.on_selection_change(&context(1, 3));

        assert_eq!(regions.page(), 2);
        assert_eq!(regions.generation(), 4);
        assert_eq!(regions.regions().len(), 4);
    }

    #[test]
    fn test_regions_track_page_rewritten_by_earlier_subscriber() {
        /// Keeps the viewer on page 1 or 2
        struct FirstTwoPages {
            state: Weak<WorkspaceState>,
        }

        impl SelectionSubscriber for FirstTwoPages {
            fn on_selection_change(&self, context: &SelectionContext) {
                if context.selection.current_page > 2 {
                    if let Some(state) = self.state.upgrade() {
                        state.set_current_page(2);
                    }
                }
            }
        }

        let state = Arc::new(WorkspaceState::new());
        let limit = Arc::new(FirstTwoPages { state: Arc::downgrade(&state) });
        let regions = Arc::new(PageRegions::new("doc-1", Arc::new(content())));
        let _limit_sub = state.subscribe(limit.clone());
        let _regions_sub = state.subscribe(regions.clone());

        state.set_current_page(5);

        assert_eq!(state.current_page(), 2);
        assert_eq!(regions.page(), state.current_page());
        assert_eq!(regions.generation(), state.generation());
        assert_eq!(ids(&regions.regions()), vec!["block-4", "block-5", "table-1", "image-1"]);
    }

    #[test]
    fn test_document_change_rebuilds() {
        let regions = PageRegions::new("doc-1", Arc::new(content()));
        regions.set_document("doc-2", Arc::new(DocumentContent::default()));
        assert_eq!(regions.document_id(), "doc-2");
        assert!(regions.regions().is_empty());
    }
}
