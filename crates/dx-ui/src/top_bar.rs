//! Header bar shown above an open workspace

use egui::{Align, Layout, RichText, TopBottomPanel};

use dx_core::model::Document;

use crate::badges::status_badge;
use crate::icons;
use crate::theme::muted_color;

/// What the user asked for from the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopBarAction {
    None,
    Back,
    ToggleChat,
    ToggleTheme,
}

/// Render the workspace header
pub fn workspace_top_bar(ctx: &egui::Context, document: &Document, chat_open: bool, busy: bool) -> TopBarAction {
    let mut action = TopBarAction::None;

    TopBottomPanel::top("workspace_top_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button(format!("{} Documents", icons::BACK)).clicked() {
                action = TopBarAction::Back;
            }
            ui.separator();

            ui.label(RichText::new(&document.title).strong());
            status_badge(ui, document.status);
            ui.label(
                RichText::new(format!("{} pages", document.total_pages()))
                    .small()
                    .color(muted_color()),
            );

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let chat_label = if chat_open { "Hide chat" } else { "Ask AI" };
                if ui
                    .selectable_label(chat_open, format!("{} {}", icons::CHAT, chat_label))
                    .clicked()
                {
                    action = TopBarAction::ToggleChat;
                }
                if ui.button(icons::THEME).on_hover_text("Toggle light/dark").clicked() {
                    action = TopBarAction::ToggleTheme;
                }
                if busy {
                    ui.spinner();
                }
            });
        });
    });

    action
}
