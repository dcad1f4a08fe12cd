//! Document catalogue with title search

use egui::{Align, Layout, RichText, TextEdit, Ui};
use egui_extras::{Column, TableBuilder};

use dx_core::model::{search_documents, Document, DocumentKind};
use dx_ui::{caption, icons, status_badge};

pub enum DocumentsAction {
    Open(String),
    NewParse,
}

#[derive(Default)]
pub struct DocumentsPage {
    query: String,
}

impl DocumentsPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ui(&mut self, ui: &mut Ui, documents: &[Document], source_name: &str) -> Option<DocumentsAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            ui.heading("Documents");
            caption(ui, format!("from {}", source_name));
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button(format!("{} New parse", icons::UPLOAD)).clicked() {
                    action = Some(DocumentsAction::NewParse);
                }
                ui.add(
                    TextEdit::singleline(&mut self.query)
                        .hint_text("Search documents…")
                        .desired_width(240.0),
                );
            });
        });
        ui.separator();

        let matches = search_documents(documents, &self.query);
        if matches.is_empty() {
            ui.centered_and_justified(|ui| {
                if documents.is_empty() {
                    ui.label("No documents yet. Start a new parse to add one.");
                } else {
                    ui.label(format!("No documents match “{}”", self.query));
                }
            });
            return action;
        }

        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(Column::remainder().at_least(240.0))
            .column(Column::initial(90.0))
            .column(Column::initial(120.0))
            .column(Column::initial(60.0))
            .column(Column::initial(100.0))
            .header(22.0, |mut header| {
                for title in ["Title", "Type", "Status", "Pages", "Updated"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for doc in &matches {
                    body.row(26.0, |mut row| {
                        row.col(|ui| {
                            let title = RichText::new(format!("{} {}", icons::FILE, doc.title));
                            if ui.link(title).clicked() {
                                action = Some(DocumentsAction::Open(doc.id.clone()));
                            }
                        });
                        row.col(|ui| {
                            ui.label(match doc.kind {
                                DocumentKind::Pdf => "PDF",
                                DocumentKind::ImageSet => "Images",
                            });
                        });
                        row.col(|ui| {
                            status_badge(ui, doc.status);
                        });
                        row.col(|ui| {
                            ui.label(doc.total_pages().to_string());
                        });
                        row.col(|ui| {
                            ui.label(doc.updated_at.format("%b %d, %Y").to_string());
                        });
                    });
                }
            });

        action
    }
}
