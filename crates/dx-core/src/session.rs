//! An open workspace: one document plus everything that hangs off it
//!
//! The session owns the shared [`WorkspaceState`] for its lifetime. Panels get
//! an `Arc` to the state and keep their own subscriptions; tearing the
//! session down cancels every deferred task it started.

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::info;

use crate::chat::ChatSession;
use crate::events::events::{CitationFollowed, DocumentOpened, WorkspaceClosed};
use crate::events::EventBus;
use crate::model::{BlockId, ChatMessage, Document, DocumentContent, PageNumber};
use crate::regions::PageRegions;
use crate::review::EntityReview;
use crate::settings::AppSettings;
use crate::tasks::TaskScope;
use crate::workspace::{Subscription, WorkspaceState};

pub struct WorkspaceSession {
    document: Document,
    content: Arc<DocumentContent>,
    state: Arc<WorkspaceState>,
    regions: Arc<PageRegions>,
    _regions_subscription: Subscription,
    review: EntityReview,
    chat: ChatSession,
    tasks: TaskScope,
    events: Arc<EventBus>,
    settings: AppSettings,
}

impl WorkspaceSession {
    /// Open `document` with a fresh selection state
    pub fn open(
        document: Document,
        content: DocumentContent,
        chat_responses: Vec<ChatMessage>,
        settings: AppSettings,
        events: Arc<EventBus>,
        handle: Handle,
    ) -> Self {
        let content = Arc::new(content);
        let state = Arc::new(WorkspaceState::new());

        let regions = Arc::new(PageRegions::new(document.id.clone(), content.clone()));
        let regions_subscription = state.subscribe(regions.clone());

        let review = EntityReview::new(document.id.clone(), content.entities.clone(), events.clone());
        let chat = ChatSession::new(chat_responses, settings.simulation.chat_reply_delay());

        info!("Opened workspace for {} ({} pages)", document.id, document.total_pages());
        events.publish(DocumentOpened {
            document_id: document.id.clone(),
            title: document.title.clone(),
            total_pages: document.total_pages(),
        });

        Self {
            document,
            content,
            state,
            regions,
            _regions_subscription: regions_subscription,
            review,
            chat,
            tasks: TaskScope::new(handle),
            events,
            settings,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn content(&self) -> &Arc<DocumentContent> {
        &self.content
    }

    pub fn state(&self) -> &Arc<WorkspaceState> {
        &self.state
    }

    /// Overlay regions for the current page
    pub fn regions(&self) -> &Arc<PageRegions> {
        &self.regions
    }

    pub fn review(&self) -> &EntityReview {
        &self.review
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn tasks(&self) -> &TaskScope {
        &self.tasks
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Follow a citation or evidence link
    pub fn follow(&self, block_id: impl Into<BlockId>, page: PageNumber) {
        let block_id = block_id.into();
        self.state.focus(block_id.clone(), page);
        self.events.publish(CitationFollowed { block_id, page });
    }

    /// Send a chat message; the reply is owned by this session
    pub fn send_chat(&self, text: &str) -> bool {
        self.chat.send(&self.tasks, text).is_some()
    }

    /// Run the confirmed entity extraction
    pub fn confirm_extraction(&self) -> bool {
        self.review
            .confirm_extraction(&self.tasks, self.settings.simulation.extraction_delay())
            .is_some()
    }

    /// Accept every entity at or above the configured threshold
    pub fn accept_all(&self) -> usize {
        self.review.accept_above(self.settings.auto_accept_threshold)
    }

    /// Whether a deferred reply or extraction is still outstanding
    pub fn is_busy(&self) -> bool {
        self.tasks.has_pending()
    }
}

impl Drop for WorkspaceSession {
    fn drop(&mut self) {
        self.tasks.cancel_all();
        info!("Closed workspace for {}", self.document.id);
        self.events.publish(WorkspaceClosed {
            document_id: self.document.id.clone(),
        });
    }
}
