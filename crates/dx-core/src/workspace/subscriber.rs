//! Selection subscriber trait

use super::SelectionContext;

/// Trait for panels that need to respond to selection or page changes
pub trait SelectionSubscriber: Send + Sync {
    /// Called synchronously after the selection or current page changes,
    /// and once with the current state when the subscriber registers
    fn on_selection_change(&self, context: &SelectionContext);
}
