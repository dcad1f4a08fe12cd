//! Entity extraction and review workflow

use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::events::events::{EntitiesExtracted, EntityReviewed};
use crate::events::EventBus;
use crate::model::{Entity, EntityStatus};
use crate::tasks::{DeferredTask, TaskScope};

/// Where the review currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewPhase {
    /// Nothing extracted yet
    Idle,
    /// Asking the user to confirm they reviewed the parsed content
    Confirming,
    /// Extraction is running
    Extracting,
    /// Entities are available for review
    Done,
}

#[derive(Debug)]
struct ReviewState {
    phase: ReviewPhase,
    entities: Vec<Entity>,
}

/// Review state for one document's entities
pub struct EntityReview {
    document_id: String,
    /// What the simulated extractor returns
    extracted: Arc<Vec<Entity>>,
    state: Arc<RwLock<ReviewState>>,
    events: Arc<EventBus>,
}

impl EntityReview {
    pub fn new(document_id: impl Into<String>, extracted: Vec<Entity>, events: Arc<EventBus>) -> Self {
        Self {
            document_id: document_id.into(),
            extracted: Arc::new(extracted),
            state: Arc::new(RwLock::new(ReviewState {
                phase: ReviewPhase::Idle,
                entities: Vec::new(),
            })),
            events,
        }
    }

    pub fn phase(&self) -> ReviewPhase {
        self.state.read().phase
    }

    pub fn entities(&self) -> Vec<Entity> {
        self.state.read().entities.clone()
    }

    /// Open the confirmation step. Only valid from `Idle`.
    pub fn request_extraction(&self) -> bool {
        let mut state = self.state.write();
        if state.phase != ReviewPhase::Idle {
            return false;
        }
        state.phase = ReviewPhase::Confirming;
        true
    }

    /// Back out of the confirmation step
    pub fn cancel_confirmation(&self) {
        let mut state = self.state.write();
        if state.phase == ReviewPhase::Confirming {
            state.phase = ReviewPhase::Idle;
        }
    }

    /// Start the simulated extraction; entities arrive after `delay`
    pub fn confirm_extraction(&self, scope: &TaskScope, delay: Duration) -> Option<DeferredTask> {
        {
            let mut state = self.state.write();
            if state.phase != ReviewPhase::Confirming {
                return None;
            }
            state.phase = ReviewPhase::Extracting;
        }
        info!("Extracting entities for {}", self.document_id);

        let state = self.state.clone();
        let extracted = self.extracted.clone();
        let events = self.events.clone();
        let document_id = self.document_id.clone();

        Some(scope.spawn_after("entity-extraction", delay, move || {
            let entities: Vec<Entity> = extracted
                .iter()
                .cloned()
                .map(|mut entity| {
                    entity.status = EntityStatus::Pending;
                    entity
                })
                .collect();
            let count = entities.len();

            {
                let mut state = state.write();
                state.entities = entities;
                state.phase = ReviewPhase::Done;
            }

            info!("Extracted {} entities for {}", count, document_id);
            events.publish(EntitiesExtracted { document_id, count });
        }))
    }

    /// Change one entity's status. Returns false for unknown ids.
    pub fn set_status(&self, entity_id: &str, status: EntityStatus) -> bool {
        let found = {
            let mut state = self.state.write();
            match state.entities.iter_mut().find(|e| e.entity_id == entity_id) {
                Some(entity) => {
                    entity.status = status;
                    true
                }
                None => false,
            }
        };

        if found {
            debug!("Entity {} marked {:?}", entity_id, status);
            self.events.publish(EntityReviewed {
                entity_id: entity_id.to_string(),
                status,
            });
        }
        found
    }

    pub fn accept(&self, entity_id: &str) -> bool {
        self.set_status(entity_id, EntityStatus::Accepted)
    }

    pub fn reject(&self, entity_id: &str) -> bool {
        self.set_status(entity_id, EntityStatus::Rejected)
    }

    /// Accept every entity whose confidence is at least `threshold`.
    /// Returns how many entities were accepted.
    pub fn accept_above(&self, threshold: f32) -> usize {
        let accepted: Vec<String> = {
            let mut state = self.state.write();
            state
                .entities
                .iter_mut()
                .filter(|e| e.confidence >= threshold)
                .map(|e| {
                    e.status = EntityStatus::Accepted;
                    e.entity_id.clone()
                })
                .collect()
        };

        for entity_id in &accepted {
            self.events.publish(EntityReviewed {
                entity_id: entity_id.clone(),
                status: EntityStatus::Accepted,
            });
        }
        info!("Bulk accepted {} entities at >= {:.2}", accepted.len(), threshold);
        accepted.len()
    }

    /// Entities grouped by type, groups in order of first appearance
    pub fn grouped(&self) -> IndexMap<String, Vec<Entity>> {
        let state = self.state.read();
        let mut groups: IndexMap<String, Vec<Entity>> = IndexMap::new();
        for entity in &state.entities {
            groups.entry(entity.entity_type.clone()).or_default().push(entity.clone());
        }
        groups
    }

    pub fn pending_count(&self) -> usize {
        self.state
            .read()
            .entities
            .iter()
            .filter(|e| e.status == EntityStatus::Pending)
            .count()
    }
}
