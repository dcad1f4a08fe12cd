//! Core functionality for the document extraction workspace
//!
//! This crate provides the shared selection state that ties the document
//! viewer and the inspector panels together, plus the data model and the
//! simulated backend (chat, entity extraction, upload and parse).

pub mod chat;
pub mod events;
pub mod ingest;
pub mod model;
pub mod regions;
pub mod review;
pub mod session;
pub mod settings;
pub mod tasks;
pub mod workspace;

// Re-export commonly used types
pub use workspace::{
    SelectionContext, SelectionState, SelectionSubscriber, Subscription, WorkspaceState,
};
pub use model::{BlockId, Document, DocumentContent, PageNumber};
pub use regions::{ContentRegion, PageRegions};
pub use session::WorkspaceSession;
pub use settings::{AppSettings, SimulationSettings};
pub use tasks::{CancelToken, DeferredTask, TaskScope};
