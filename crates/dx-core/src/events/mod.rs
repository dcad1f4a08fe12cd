use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

/// Workspace-wide event bus
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Common workspace events
pub mod events {
    use super::Event;
    use crate::model::{EntityStatus, PageNumber};

    /// A document was opened in the workspace
    #[derive(Debug, Clone)]
    pub struct DocumentOpened {
        pub document_id: String,
        pub title: String,
        pub total_pages: PageNumber,
    }

    /// The workspace was torn down
    #[derive(Debug, Clone)]
    pub struct WorkspaceClosed {
        pub document_id: String,
    }

    /// A citation or evidence link moved the focus
    #[derive(Debug, Clone)]
    pub struct CitationFollowed {
        pub block_id: String,
        pub page: PageNumber,
    }

    /// Simulated entity extraction finished
    #[derive(Debug, Clone)]
    pub struct EntitiesExtracted {
        pub document_id: String,
        pub count: usize,
    }

    /// An entity was accepted or rejected
    #[derive(Debug, Clone)]
    pub struct EntityReviewed {
        pub entity_id: String,
        pub status: EntityStatus,
    }

    /// Simulated upload and parse finished
    #[derive(Debug, Clone)]
    pub struct ParseCompleted {
        pub file_name: String,
        pub document_id: String,
    }

    // Implement Event trait for all event types
    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        DocumentOpened,
        WorkspaceClosed,
        CitationFollowed,
        EntitiesExtracted,
        EntityReviewed,
        ParseCompleted
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_insert_with(Vec::new).push(handler);
    }

    /// Publish an event. Handlers must not publish from inside `handle`.
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();

        if let Some(event_handlers) = handlers.get_mut(&type_id) {
            for handler in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for creating event handlers from closures
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}

/// Create a handler that only sees events of type `E`
pub fn typed_handler<E, F>(mut f: F) -> Box<dyn EventHandler>
where
    E: Event,
    F: FnMut(&E) + Send + Sync + 'static,
{
    handler_from_fn(move |event| {
        if let Some(event) = event.as_any().downcast_ref::<E>() {
            f(event);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::events::{CitationFollowed, ParseCompleted};
    use super::*;

    #[test]
    fn test_publish_reaches_typed_subscribers_only() {
        let bus = EventBus::new();
        let followed = Arc::new(Mutex::new(Vec::new()));
        let completed = Arc::new(Mutex::new(0));

        let sink = followed.clone();
        bus.subscribe::<CitationFollowed>(typed_handler(move |e: &CitationFollowed| {
            sink.lock().push((e.block_id.clone(), e.page));
        }));
        let counter = completed.clone();
        bus.subscribe::<ParseCompleted>(typed_handler(move |_: &ParseCompleted| {
            *counter.lock() += 1;
        }));

        bus.publish(CitationFollowed { block_id: "block-9".to_string(), page: 4 });

        assert_eq!(*followed.lock(), vec![("block-9".to_string(), 4)]);
        assert_eq!(*completed.lock(), 0);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::default();
        bus.publish(ParseCompleted { file_name: "a.pdf".to_string(), document_id: "doc-1".to_string() });
    }
}
