//! Shared selection and page state for a single open workspace

use serde::{Deserialize, Serialize};

use crate::model::{BlockId, PageNumber};

mod state;
mod subscriber;

pub use state::{Subscription, WorkspaceState};
pub use subscriber::SelectionSubscriber;

/// Page shown when a workspace is first opened
pub const FIRST_PAGE: PageNumber = 1;

/// Snapshot of what is focused in the workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    /// Currently selected block, table or image
    pub selected_block_id: Option<BlockId>,

    /// Page displayed by the document viewer
    pub current_page: PageNumber,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            selected_block_id: None,
            current_page: FIRST_PAGE,
        }
    }
}

impl SelectionState {
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_block_id.as_deref() == Some(id)
    }
}

/// Context passed to subscribers on every change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionContext {
    pub selection: SelectionState,

    /// Monotonic counter, bumped on every effective change
    pub generation: u64,
}
