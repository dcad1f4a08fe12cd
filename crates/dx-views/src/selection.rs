//! Per-panel view of selection changes

use std::sync::Arc;

use parking_lot::Mutex;

use dx_core::{BlockId, SelectionContext, SelectionSubscriber, Subscription, WorkspaceState};

/// Remembers the last selection a panel saw and queues a scroll target
/// whenever a different block becomes selected.
#[derive(Debug, Default)]
pub struct SelectionWatcher {
    last_seen: Mutex<(u64, Option<BlockId>)>,
    scroll_target: Mutex<Option<BlockId>>,
}

impl SelectionWatcher {
    /// Subscribe a new watcher to `state`; it lives as long as the returned handle
    pub fn attach(state: &WorkspaceState) -> (Arc<Self>, Subscription) {
        let watcher = Arc::new(Self::default());
        let subscription = state.subscribe(watcher.clone());
        (watcher, subscription)
    }

    /// Block to bring into view, handed out once per change
    pub fn take_scroll_target(&self) -> Option<BlockId> {
        self.scroll_target.lock().take()
    }
}

impl SelectionSubscriber for SelectionWatcher {
    fn on_selection_change(&self, context: &SelectionContext) {
        let mut last_seen = self.last_seen.lock();
        let (generation, block_id) = &mut *last_seen;
        if context.generation < *generation {
            return;
        }
        *generation = context.generation;
        if *block_id == context.selection.selected_block_id {
            return;
        }
        *block_id = context.selection.selected_block_id.clone();
        *self.scroll_target.lock() = block_id.clone();
    }
}

/// Watcher plus the subscription keeping it registered
#[derive(Debug)]
pub(crate) struct PanelSubscription {
    watcher: Arc<SelectionWatcher>,
    _subscription: Subscription,
}

impl PanelSubscription {
    pub(crate) fn new(state: &WorkspaceState) -> Self {
        let (watcher, subscription) = SelectionWatcher::attach(state);
        Self {
            watcher,
            _subscription: subscription,
        }
    }

    pub(crate) fn watcher(&self) -> &SelectionWatcher {
        &self.watcher
    }
}
