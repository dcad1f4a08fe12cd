//! Chat panel: questions about the open document with clickable citations

use egui::{Align, Frame, Key, Layout, Margin, RichText, ScrollArea, TextEdit, Ui};

use dx_core::model::{ChatMessage, ChatRole, Citation};
use dx_core::{BlockId, WorkspaceSession};
use dx_ui::caption;
use dx_ui::theme::accent_color;

#[derive(Default)]
pub struct ChatPanel {
    input: String,
}

impl ChatPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Send the typed message. The input is kept when nothing was sent.
    pub fn submit(&mut self, session: &WorkspaceSession) -> bool {
        if self.input.trim().is_empty() {
            return false;
        }
        let text = std::mem::take(&mut self.input);
        session.send_chat(text.trim());
        true
    }

    pub fn follow_citation(session: &WorkspaceSession, citation: &Citation) {
        session.follow(citation.block_id.clone(), citation.page);
    }

    /// Draw the panel. Returns the block of a citation clicked this frame.
    pub fn ui(&mut self, session: &WorkspaceSession, ui: &mut Ui) -> Option<BlockId> {
        let mut followed = None;
        ui.heading("Ask about this document");
        ui.separator();

        let chat = session.chat();
        let messages = chat.messages();
        let waiting = session.is_busy() && messages.last().map(|m| m.role) == Some(ChatRole::User);

        let input_height = 64.0;
        ScrollArea::vertical()
            .auto_shrink([false; 2])
            .stick_to_bottom(true)
            .max_height((ui.available_height() - input_height).max(80.0))
            .show(ui, |ui| {
                if messages.is_empty() {
                    caption(ui, "Try one of these:");
                    for prompt in chat.suggested_prompts() {
                        if ui.button(*prompt).clicked() {
                            session.send_chat(prompt);
                        }
                    }
                }

                for message in &messages {
                    if let Some(citation) = message_bubble(ui, message) {
                        Self::follow_citation(session, citation);
                        followed = Some(citation.block_id.clone());
                    }
                }

                if waiting {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        caption(ui, "Thinking…");
                    });
                }
            });

        ui.separator();
        ui.horizontal(|ui| {
            let response = ui.add(
                TextEdit::singleline(&mut self.input)
                    .hint_text("Ask a question…")
                    .desired_width(ui.available_width() - 60.0),
            );
            let entered = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
            if (ui.button("Send").clicked() || entered) && self.submit(session) {
                response.request_focus();
            }
        });

        followed
    }
}

/// Returns the citation clicked, if any
fn message_bubble<'m>(ui: &mut Ui, message: &'m ChatMessage) -> Option<&'m Citation> {
    let mut clicked = None;
    let is_user = message.role == ChatRole::User;
    let layout = if is_user {
        Layout::top_down(Align::Max)
    } else {
        Layout::top_down(Align::Min)
    };

    ui.with_layout(layout, |ui| {
        let fill = if is_user {
            accent_color().linear_multiply(0.25)
        } else {
            ui.visuals().faint_bg_color
        };

        Frame::none()
            .fill(fill)
            .rounding(8.0)
            .inner_margin(Margin::symmetric(10.0, 6.0))
            .show(ui, |ui| {
                ui.set_max_width(ui.available_width() * 0.85);
                ui.label(&message.content);

                if !message.citations.is_empty() {
                    ui.horizontal_wrapped(|ui| {
                        for citation in &message.citations {
                            let label = RichText::new(format!("{} · p.{}", citation.label, citation.page)).small();
                            if ui.link(label).clicked() {
                                clicked = Some(citation);
                            }
                        }
                    });
                }
            });
    });
    ui.add_space(4.0);
    clicked
}
