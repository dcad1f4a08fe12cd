//! Workspace state holder implementation

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::debug;

use super::{SelectionContext, SelectionState, SelectionSubscriber};
use crate::model::{BlockId, PageNumber};

type SubscriberList = RwLock<Vec<(u64, Weak<dyn SelectionSubscriber>)>>;

/// State stored internally
#[derive(Debug, Clone, Default)]
struct InnerState {
    selection: SelectionState,
    generation: u64,
}

/// Single source of truth for what is focused in a workspace.
///
/// The holder stores whatever it is given: ids are not checked against the
/// document and pages are not clamped. Callers such as the pager clamp
/// before writing.
pub struct WorkspaceState {
    state: RwLock<InnerState>,
    subscribers: Arc<SubscriberList>,
    next_subscriber_id: AtomicU64,
}

impl WorkspaceState {
    /// Create a state holder with nothing selected on the first page
    pub fn new() -> Self {
        Self {
            state: RwLock::new(InnerState::default()),
            subscribers: Arc::new(RwLock::new(Vec::new())),
            next_subscriber_id: AtomicU64::new(0),
        }
    }

    /// Currently selected block id, if any
    pub fn selected_block_id(&self) -> Option<BlockId> {
        self.state.read().selection.selected_block_id.clone()
    }

    /// Replace the selection. `None` clears it.
    pub fn set_selected_block_id(&self, id: Option<BlockId>) {
        debug!("Selecting block {:?}", id);
        self.update(|selection| selection.selected_block_id = id);
    }

    /// Shorthand for `set_selected_block_id(Some(id))`
    pub fn select(&self, id: impl Into<BlockId>) {
        self.set_selected_block_id(Some(id.into()));
    }

    pub fn clear_selection(&self) {
        self.set_selected_block_id(None);
    }

    /// Page currently displayed by the viewer
    pub fn current_page(&self) -> PageNumber {
        self.state.read().selection.current_page
    }

    /// Replace the current page without clamping
    pub fn set_current_page(&self, page: PageNumber) {
        debug!("Moving to page {}", page);
        self.update(|selection| selection.current_page = page);
    }

    /// Jump to a citation: select the block and show its page with a single notification
    pub fn focus(&self, id: impl Into<BlockId>, page: PageNumber) {
        let id = id.into();
        debug!("Focusing {} on page {}", id, page);
        self.update(|selection| {
            selection.selected_block_id = Some(id);
            selection.current_page = page;
        });
    }

    /// Back to the initial state, used when another document is opened
    pub fn reset(&self) {
        self.update(|selection| *selection = SelectionState::default());
    }

    /// Whether `id` is the current selection
    pub fn is_selected(&self, id: &str) -> bool {
        self.state.read().selection.is_selected(id)
    }

    pub fn snapshot(&self) -> SelectionState {
        self.state.read().selection.clone()
    }

    /// Counter bumped on every effective change
    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    /// Get the context handed to subscribers
    pub fn get_context(&self) -> SelectionContext {
        let state = self.state.read();
        SelectionContext {
            selection: state.selection.clone(),
            generation: state.generation,
        }
    }

    /// Register a subscriber.
    ///
    /// The subscriber is called once right away with the current state. It stays
    /// registered until the returned handle or the subscriber itself is dropped.
    pub fn subscribe(&self, subscriber: Arc<dyn SelectionSubscriber>) -> Subscription {
        let id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.write().push((id, Arc::downgrade(&subscriber)));

        subscriber.on_selection_change(&self.get_context());

        Subscription {
            id,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .iter()
            .filter(|(_, weak)| weak.strong_count() > 0)
            .count()
    }

    /// Apply a change and notify if anything actually changed
    fn update(&self, apply: impl FnOnce(&mut SelectionState)) {
        let mut state = self.state.write();
        let mut next = state.selection.clone();
        apply(&mut next);

        if next == state.selection {
            return;
        }

        state.selection = next;
        state.generation += 1;
        drop(state);

        self.notify_subscribers();
    }

    /// Notify all subscribers of a change
    fn notify_subscribers(&self) {
        let context = self.get_context();

        let live: Vec<Arc<dyn SelectionSubscriber>> = {
            let mut subscribers = self.subscribers.write();

            // Remove any dead weak references
            subscribers.retain(|(_, weak)| weak.strong_count() > 0);
            subscribers.iter().filter_map(|(_, weak)| weak.upgrade()).collect()
        };

        // No lock is held here, so subscribers may read or write the state.
        // A write from inside a callback runs its own full round, after which
        // the rest of this one would only deliver an outdated context.
        for subscriber in live {
            if self.generation() != context.generation {
                debug!("Generation {} superseded mid-notification", context.generation);
                break;
            }
            subscriber.on_selection_change(&context);
        }
    }
}

impl Default for WorkspaceState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WorkspaceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkspaceState")
            .field("selection", &self.snapshot())
            .field("generation", &self.generation())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Handle returned by [`WorkspaceState::subscribe`]; unsubscribes on drop
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    subscribers: Weak<SubscriberList>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            subscribers.write().retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Records every context it is handed
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<SelectionContext>>,
    }

    impl SelectionSubscriber for Recorder {
        fn on_selection_change(&self, context: &SelectionContext) {
            self.seen.lock().push(context.clone());
        }
    }

    /// Minimal list panel following the highlight convention
    struct ItemList {
        items: Vec<&'static str>,
        state: Arc<WorkspaceState>,
    }

    impl ItemList {
        fn highlighted(&self) -> Vec<&'static str> {
            self.items
                .iter()
                .copied()
                .filter(|id| self.state.is_selected(id))
                .collect()
        }
    }

    #[test]
    fn test_initial_state() {
        let state = WorkspaceState::new();
        assert_eq!(state.selected_block_id(), None);
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.generation(), 0);
    }

    #[test]
    fn test_select_then_page() {
        let state = WorkspaceState::new();
        state.set_selected_block_id(Some("block-4".to_string()));
        state.set_current_page(2);

        assert_eq!(
            state.snapshot(),
            SelectionState {
                selected_block_id: Some("block-4".to_string()),
                current_page: 2,
            }
        );
    }

    #[test]
    fn test_clear_selection() {
        let state = WorkspaceState::new();
        state.select("block-1");
        state.set_selected_block_id(None);
        assert_eq!(state.selected_block_id(), None);
    }

    #[test]
    fn test_pages_are_not_clamped() {
        let state = WorkspaceState::new();
        for page in [0, 1, 4, 99, PageNumber::MAX] {
            state.set_current_page(page);
            assert_eq!(state.current_page(), page);
        }
    }

    #[test]
    fn test_unknown_id_is_accepted() {
        let state = Arc::new(WorkspaceState::new());
        let panel = ItemList { items: vec!["block-1", "table-1"], state: state.clone() };

        state.select("unknown-id");
        assert_eq!(state.selected_block_id().as_deref(), Some("unknown-id"));
        assert!(panel.highlighted().is_empty());
    }

    #[test]
    fn test_repeated_select_is_idempotent() {
        let state = WorkspaceState::new();
        let recorder = Arc::new(Recorder::default());
        let _sub = state.subscribe(recorder.clone());

        state.select("block-2");
        let once = (state.snapshot(), state.generation());
        state.select("block-2");

        assert_eq!((state.snapshot(), state.generation()), once);
        // initial call plus one change
        assert_eq!(recorder.seen.lock().len(), 2);
    }

    #[test]
    fn test_subscriber_sees_new_value_synchronously() {
        let state = WorkspaceState::new();
        let recorder = Arc::new(Recorder::default());
        let _sub = state.subscribe(recorder.clone());

        state.set_current_page(3);

        let seen = recorder.seen.lock();
        assert_eq!(seen.last().map(|c| c.selection.current_page), Some(3));
        assert_eq!(seen.last().map(|c| c.generation), Some(state.generation()));
    }

    #[test]
    fn test_late_subscriber_gets_current_value() {
        let state = WorkspaceState::new();
        state.focus("block-7", 3);

        let recorder = Arc::new(Recorder::default());
        let _sub = state.subscribe(recorder.clone());

        let seen = recorder.seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].selection.selected_block_id.as_deref(), Some("block-7"));
        assert_eq!(seen[0].selection.current_page, 3);
    }

    #[test]
    fn test_focus_notifies_once() {
        let state = WorkspaceState::new();
        let recorder = Arc::new(Recorder::default());
        let _sub = state.subscribe(recorder.clone());

        state.focus("table-1", 2);

        let seen = recorder.seen.lock();
        assert_eq!(seen.len(), 2);
        assert!(seen[1].selection.is_selected("table-1"));
        assert_eq!(seen[1].selection.current_page, 2);
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        let state = WorkspaceState::new();
        let recorder = Arc::new(Recorder::default());
        let sub = state.subscribe(recorder.clone());
        assert_eq!(state.subscriber_count(), 1);

        drop(sub);
        state.set_current_page(2);

        assert_eq!(state.subscriber_count(), 0);
        assert_eq!(recorder.seen.lock().len(), 1);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let state = WorkspaceState::new();
        let recorder = Arc::new(Recorder::default());
        let _sub = state.subscribe(recorder.clone());

        drop(recorder);
        state.set_current_page(2);
        assert_eq!(state.subscriber_count(), 0);
    }

    #[test]
    fn test_subscriber_may_write_back() {
        struct FollowsPage {
            state: Weak<WorkspaceState>,
        }

        impl SelectionSubscriber for FollowsPage {
            fn on_selection_change(&self, context: &SelectionContext) {
                // Clear the selection whenever the page moves past 3
                if context.selection.current_page > 3 {
                    if let Some(state) = self.state.upgrade() {
                        state.clear_selection();
                    }
                }
            }
        }

        let state = Arc::new(WorkspaceState::new());
        let follower = Arc::new(FollowsPage { state: Arc::downgrade(&state) });
        let _sub = state.subscribe(follower.clone());

        state.focus("block-9", 4);
        assert_eq!(state.selected_block_id(), None);
        assert_eq!(state.current_page(), 4);
    }

    #[test]
    fn test_write_back_does_not_leave_later_subscribers_stale() {
        /// Pulls the page back to 3 whenever it moves further
        struct PageLimit {
            state: Weak<WorkspaceState>,
        }

        impl SelectionSubscriber for PageLimit {
            fn on_selection_change(&self, context: &SelectionContext) {
                if context.selection.current_page > 3 {
                    if let Some(state) = self.state.upgrade() {
                        state.set_current_page(3);
                    }
                }
            }
        }

        let state = Arc::new(WorkspaceState::new());
        let limit = Arc::new(PageLimit { state: Arc::downgrade(&state) });
        let recorder = Arc::new(Recorder::default());
        let _limit_sub = state.subscribe(limit.clone());
        let _recorder_sub = state.subscribe(recorder.clone());

        state.set_current_page(5);

        assert_eq!(state.current_page(), 3);
        let seen = recorder.seen.lock();
        let last = seen.last().unwrap();
        assert_eq!(last.selection.current_page, 3);
        assert_eq!(last.generation, state.generation());
        // the page 5 round was cut short before reaching the recorder
        assert!(seen.iter().all(|c| c.selection.current_page != 5));
    }

    #[test]
    fn test_selection_is_global_across_panels() {
        let state = Arc::new(WorkspaceState::new());
        let first = ItemList { items: vec!["a", "b"], state: state.clone() };
        let second = ItemList { items: vec!["c", "d"], state: state.clone() };

        state.select("b");

        assert_eq!(first.highlighted(), vec!["b"]);
        assert!(second.highlighted().is_empty());
    }

    #[test]
    fn test_reset() {
        let state = WorkspaceState::new();
        state.focus("block-4", 2);
        state.reset();
        assert_eq!(state.snapshot(), SelectionState::default());
    }
}
