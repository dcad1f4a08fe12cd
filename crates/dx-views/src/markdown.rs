//! Markdown panel: the text blocks extracted from the document

use egui::{Align, Frame, Layout, RichText, ScrollArea, Sense, Stroke, Ui};

use dx_core::model::MarkdownBlock;
use dx_core::{BlockId, WorkspaceSession};
use dx_ui::theme::accent_color;
use dx_ui::{caption, confidence_badge, icon_button, icons};

use crate::panel::{PanelKind, WorkspacePanel};
use crate::selection::PanelSubscription;

/// How block text is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkdownViewMode {
    Rendered,
    Source,
}

pub struct MarkdownPanel {
    mode: MarkdownViewMode,
    subscription: PanelSubscription,
}

impl MarkdownPanel {
    pub fn new(session: &WorkspaceSession) -> Self {
        Self {
            mode: MarkdownViewMode::Rendered,
            subscription: PanelSubscription::new(session.state()),
        }
    }

    pub fn mode(&self) -> MarkdownViewMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: MarkdownViewMode) {
        self.mode = mode;
    }

    /// Select a block and show its page
    pub fn select_block(session: &WorkspaceSession, block: &MarkdownBlock) {
        session.state().focus(block.block_id.clone(), block.source_ref.page);
    }

    fn block_card(&self, ui: &mut Ui, block: &MarkdownBlock, selected: bool) -> egui::Response {
        let stroke = if selected {
            Stroke::new(2.0, accent_color())
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke
        };

        let frame = Frame::group(ui.style()).stroke(stroke).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                caption(
                    ui,
                    format!("Page {} · {}", block.source_ref.page, block.source_ref.kind.label()),
                );
                confidence_badge(ui, block.confidence);
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if icon_button(ui, icons::COPY, "Copy markdown").clicked() {
                        ui.output_mut(|o| o.copied_text = block.markdown.clone());
                    }
                });
            });

            match self.mode {
                MarkdownViewMode::Rendered => render_markdown(ui, &block.markdown),
                MarkdownViewMode::Source => {
                    ui.label(RichText::new(&block.markdown).monospace());
                }
            }
        });

        ui.interact(frame.response.rect, ui.id().with(&block.block_id), Sense::click())
    }
}

impl WorkspacePanel for MarkdownPanel {
    fn kind(&self) -> PanelKind {
        PanelKind::Markdown
    }

    fn item_ids(&self, session: &WorkspaceSession) -> Vec<BlockId> {
        session.content().blocks.iter().map(|b| b.block_id.clone()).collect()
    }

    fn ui(&mut self, session: &WorkspaceSession, ui: &mut Ui) {
        let content = session.content().clone();

        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.mode, MarkdownViewMode::Rendered, "Rendered");
            ui.selectable_value(&mut self.mode, MarkdownViewMode::Source, "Source");
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                caption(ui, format!("{} blocks", content.blocks.len()));
            });
        });
        ui.separator();

        if content.blocks.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("No text blocks were extracted");
            });
            return;
        }

        let scroll_target = self.subscription.watcher().take_scroll_target();
        let selection = session.state().snapshot();

        ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
            for block in &content.blocks {
                let response = self.block_card(ui, block, selection.is_selected(&block.block_id));

                if scroll_target.as_deref() == Some(block.block_id.as_str()) {
                    response.scroll_to_me(Some(Align::Center));
                }
                if response.clicked() {
                    Self::select_block(session, block);
                }
            }
        });
    }
}

/// Line-based rendering: headings, bullets and pipe tables. Inline emphasis is dropped.
fn render_markdown(ui: &mut Ui, markdown: &str) {
    for line in markdown.lines() {
        let line = line.trim();
        if line.is_empty() {
            ui.add_space(4.0);
        } else if let Some(heading) = heading_text(line) {
            ui.label(RichText::new(strip_emphasis(heading)).strong().size(15.0));
        } else if let Some(item) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
            ui.horizontal_wrapped(|ui| {
                ui.label("•");
                ui.label(strip_emphasis(item));
            });
        } else if line.starts_with('|') {
            if !is_table_rule(line) {
                ui.label(RichText::new(line).monospace());
            }
        } else {
            ui.label(strip_emphasis(line));
        }
    }
}

fn heading_text(line: &str) -> Option<&str> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    line[hashes..].strip_prefix(' ').map(str::trim)
}

fn strip_emphasis(text: &str) -> String {
    text.replace("**", "").replace("__", "")
}

/// `|---|:--:|` separator rows
fn is_table_rule(line: &str) -> bool {
    line.chars().all(|c| matches!(c, '|' | '-' | ':' | ' '))
}
