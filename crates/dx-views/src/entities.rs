//! Entities panel: extraction trigger and per-entity review

use egui::{Align, CollapsingHeader, Frame, Layout, RichText, ScrollArea, Sense, Stroke, Ui};

use dx_core::model::{confidence_percent, Entity, EntityStatus};
use dx_core::review::ReviewPhase;
use dx_core::{BlockId, WorkspaceSession};
use dx_ui::theme::accent_color;
use dx_ui::{caption, confidence_badge, entity_status_badge, icon_button, icons};

use crate::panel::{PanelKind, WorkspacePanel};

/// Review UI over the session's [`dx_core::review::EntityReview`]
#[derive(Default)]
pub struct EntitiesPanel;

impl EntitiesPanel {
    pub fn new() -> Self {
        Self
    }

    /// Jump to the block an entity was found in
    pub fn follow_evidence(session: &WorkspaceSession, entity: &Entity) {
        session.follow(entity.evidence.block_id.clone(), entity.evidence.page);
    }

    fn idle_ui(session: &WorkspaceSession, ui: &mut Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(24.0);
            ui.label("Entities have not been extracted for this document yet.");
            ui.add_space(8.0);
            if ui.button("Extract entities").clicked() {
                session.review().request_extraction();
            }
        });
    }

    fn confirm_dialog(session: &WorkspaceSession, ui: &mut Ui) {
        egui::Window::new("Confirm extraction")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ui.ctx(), |ui| {
                ui.label("Have you reviewed the parsed content?");
                caption(ui, "Entities are extracted from the current markdown, tables and images.");
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Confirm").clicked() {
                        session.confirm_extraction();
                    }
                    if ui.button("Cancel").clicked() {
                        session.review().cancel_confirmation();
                    }
                });
            });
    }

    fn entity_row(session: &WorkspaceSession, ui: &mut Ui, entity: &Entity, selected: bool) {
        let stroke = if selected {
            Stroke::new(2.0, accent_color())
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke
        };

        let frame = Frame::group(ui.style()).stroke(stroke).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(&entity.value).strong());
                confidence_badge(ui, entity.confidence);
                entity_status_badge(ui, entity.status);

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if entity.status != EntityStatus::Rejected
                        && icon_button(ui, icons::CROSS, "Reject").clicked()
                    {
                        session.review().reject(&entity.entity_id);
                    }
                    if entity.status != EntityStatus::Accepted
                        && icon_button(ui, icons::CHECK, "Accept").clicked()
                    {
                        session.review().accept(&entity.entity_id);
                    }
                });
            });
            caption(
                ui,
                format!("“{}” · page {}", entity.evidence.snippet, entity.evidence.page),
            );
        });

        let response = ui
            .interact(frame.response.rect, ui.id().with(&entity.entity_id), Sense::click())
            .on_hover_text("Show evidence");
        if response.clicked() {
            Self::follow_evidence(session, entity);
        }
    }

    fn review_ui(session: &WorkspaceSession, ui: &mut Ui) {
        let review = session.review();
        let threshold = session.settings().auto_accept_threshold;

        ui.horizontal(|ui| {
            ui.label(format!("{} pending", review.pending_count()));
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let label = format!("Accept all ≥ {}%", confidence_percent(threshold));
                if ui.button(label).clicked() {
                    session.accept_all();
                }
            });
        });
        ui.separator();

        let groups = review.grouped();
        if groups.is_empty() {
            ui.label("No entities were found.");
            return;
        }

        let selection = session.state().snapshot();
        ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
            for (entity_type, entities) in &groups {
                CollapsingHeader::new(format!("{} ({})", entity_type, entities.len()))
                    .default_open(true)
                    .show(ui, |ui| {
                        for entity in entities {
                            let selected = selection.is_selected(&entity.entity_id);
                            Self::entity_row(session, ui, entity, selected);
                        }
                    });
            }
        });
    }
}

impl WorkspacePanel for EntitiesPanel {
    fn kind(&self) -> PanelKind {
        PanelKind::Entities
    }

    /// Entities are keyed by their own id. The evidence block belongs to the markdown panel.
    fn item_ids(&self, session: &WorkspaceSession) -> Vec<BlockId> {
        session
            .review()
            .entities()
            .into_iter()
            .map(|e| e.entity_id)
            .collect()
    }

    fn ui(&mut self, session: &WorkspaceSession, ui: &mut Ui) {
        match session.review().phase() {
            ReviewPhase::Idle => Self::idle_ui(session, ui),
            ReviewPhase::Confirming => {
                Self::idle_ui(session, ui);
                Self::confirm_dialog(session, ui);
            }
            ReviewPhase::Extracting => {
                ui.vertical_centered(|ui| {
                    ui.add_space(24.0);
                    ui.spinner();
                    ui.label("Extracting entities…");
                });
            }
            ReviewPhase::Done => Self::review_ui(session, ui),
        }
    }
}
