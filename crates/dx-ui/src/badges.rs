//! Small pill-shaped labels for statuses, confidence scores and tags

use egui::{Color32, Frame, Margin, Response, RichText, Ui};

use dx_core::model::{confidence_percent, ConfidenceLevel, DocumentStatus, EntityStatus};

use crate::theme::{accent_color, error_color, muted_color, warning_color};

/// Draw a filled pill with `text`
pub fn badge(ui: &mut Ui, text: impl Into<String>, fill: Color32, text_color: Color32) -> Response {
    Frame::none()
        .fill(fill)
        .rounding(8.0)
        .inner_margin(Margin::symmetric(6.0, 1.0))
        .show(ui, |ui| {
            ui.label(RichText::new(text.into()).small().color(text_color));
        })
        .response
}

/// Outline colour of a document status badge
pub fn status_color(status: DocumentStatus) -> Color32 {
    match status {
        DocumentStatus::Uploaded => muted_color(),
        DocumentStatus::Parsing => accent_color().linear_multiply(0.6),
        DocumentStatus::Parsed | DocumentStatus::EntitiesReady => accent_color(),
        DocumentStatus::Failed => error_color(),
    }
}

pub fn status_badge(ui: &mut Ui, status: DocumentStatus) -> Response {
    let color = status_color(status);
    // Only the finished state is drawn solid
    if status == DocumentStatus::EntitiesReady {
        badge(ui, status.label(), color, Color32::WHITE)
    } else {
        badge(ui, status.label(), color.linear_multiply(0.15), color)
    }
}

pub fn confidence_color(level: ConfidenceLevel) -> Color32 {
    match level {
        ConfidenceLevel::High => accent_color(),
        ConfidenceLevel::Medium => warning_color(),
        ConfidenceLevel::Low => error_color(),
    }
}

/// Percentage badge coloured by confidence bucket
pub fn confidence_badge(ui: &mut Ui, score: f32) -> Response {
    let color = confidence_color(ConfidenceLevel::from_score(score));
    badge(ui, format!("{}%", confidence_percent(score)), color.linear_multiply(0.2), color)
}

pub fn entity_status_badge(ui: &mut Ui, status: EntityStatus) -> Response {
    let (label, color) = match status {
        EntityStatus::Pending => ("pending", muted_color()),
        EntityStatus::Accepted => ("accepted", accent_color()),
        EntityStatus::Rejected => ("rejected", error_color()),
    };
    badge(ui, label, color.linear_multiply(0.15), color)
}

pub fn tag(ui: &mut Ui, text: &str) -> Response {
    badge(ui, text, ui.visuals().faint_bg_color, ui.visuals().text_color())
}
