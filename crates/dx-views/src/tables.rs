//! Tables panel: extracted tables with an expandable grid

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use egui::{Align, Frame, Layout, RichText, ScrollArea, Sense, Stroke, Ui};
use egui_extras::{Column, TableBuilder};
use tracing::{error, info};

use dx_core::model::ExtractedTable;
use dx_core::{BlockId, WorkspaceSession};
use dx_ui::theme::accent_color;
use dx_ui::{caption, confidence_badge, icon_button, icons};

use crate::panel::{PanelKind, WorkspacePanel};
use crate::selection::PanelSubscription;

/// Write the table grid to `path` as CSV
pub fn export_csv(table: &ExtractedTable, path: &Path) -> anyhow::Result<()> {
    let csv = table.to_csv()?;
    fs::write(path, csv)?;
    info!("Exported {} to {:?}", table.table_id, path);
    Ok(())
}

pub struct TablesPanel {
    expanded: HashSet<BlockId>,
    subscription: PanelSubscription,
}

impl TablesPanel {
    pub fn new(session: &WorkspaceSession) -> Self {
        Self {
            expanded: HashSet::new(),
            subscription: PanelSubscription::new(session.state()),
        }
    }

    pub fn is_expanded(&self, table_id: &str) -> bool {
        self.expanded.contains(table_id)
    }

    /// Select the table, show its page and toggle its grid
    pub fn activate(&mut self, session: &WorkspaceSession, table: &ExtractedTable) {
        session.state().focus(table.table_id.clone(), table.page);
        if !self.expanded.remove(&table.table_id) {
            self.expanded.insert(table.table_id.clone());
        }
    }

    fn table_card(&self, ui: &mut Ui, table: &ExtractedTable, selected: bool) -> egui::Response {
        let stroke = if selected {
            Stroke::new(2.0, accent_color())
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke
        };
        let expanded = self.is_expanded(&table.table_id);

        let frame = Frame::group(ui.style()).stroke(stroke).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(format!("{} {}", icons::TABLE, table.table_id)).strong());
                caption(
                    ui,
                    format!("Page {} · {} rows", table.page, table.grid.rows.len()),
                );
                confidence_badge(ui, table.confidence);

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if icon_button(ui, icons::EXPORT, "Export CSV").clicked() {
                        save_csv_dialog(table);
                    }
                    if icon_button(ui, icons::COPY, "Copy markdown").clicked() {
                        ui.output_mut(|o| o.copied_text = table.as_markdown.clone());
                    }
                });
            });

            if expanded {
                ui.push_id(&table.table_id, |ui| grid(ui, table));
            } else {
                caption(ui, table.grid.columns.join(" · "));
            }
        });

        ui.interact(frame.response.rect, ui.id().with(&table.table_id), Sense::click())
    }
}

impl WorkspacePanel for TablesPanel {
    fn kind(&self) -> PanelKind {
        PanelKind::Tables
    }

    fn item_ids(&self, session: &WorkspaceSession) -> Vec<BlockId> {
        session.content().tables.iter().map(|t| t.table_id.clone()).collect()
    }

    fn ui(&mut self, session: &WorkspaceSession, ui: &mut Ui) {
        let content = session.content().clone();

        if content.tables.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("No tables were extracted");
            });
            return;
        }

        let scroll_target = self.subscription.watcher().take_scroll_target();
        let selection = session.state().snapshot();
        let mut activated = None;

        ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
            for table in &content.tables {
                let response = self.table_card(ui, table, selection.is_selected(&table.table_id));

                if scroll_target.as_deref() == Some(table.table_id.as_str()) {
                    response.scroll_to_me(Some(Align::Center));
                }
                if response.clicked() {
                    activated = Some(table);
                }
            }
        });

        if let Some(table) = activated {
            self.activate(session, table);
        }
    }
}

fn grid(ui: &mut Ui, table: &ExtractedTable) {
    let mut builder = TableBuilder::new(ui).striped(true).vscroll(false);
    for _ in &table.grid.columns {
        builder = builder.column(Column::auto().at_least(60.0).resizable(true));
    }

    builder
        .header(20.0, |mut header| {
            for column in &table.grid.columns {
                header.col(|ui| {
                    ui.strong(column);
                });
            }
        })
        .body(|mut body| {
            for row_data in &table.grid.rows {
                body.row(18.0, |mut row| {
                    for index in 0..table.grid.columns.len() {
                        row.col(|ui| {
                            ui.label(row_data.get(index).map(String::as_str).unwrap_or(""));
                        });
                    }
                });
            }
        });
}

fn save_csv_dialog(table: &ExtractedTable) {
    if let Some(path) = rfd::FileDialog::new()
        .set_title("Export table as CSV")
        .add_filter("CSV Files", &["csv"])
        .set_file_name(&format!("{}.csv", table.table_id))
        .save_file()
    {
        if let Err(e) = export_csv(table, &path) {
            error!("Failed to export {}: {}", table.table_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{open, table};
    use dx_core::DocumentContent;

    #[tokio::test]
    async fn test_click_toggles_grid_and_focuses() {
        let content = DocumentContent {
            tables: vec![table("table-1", 2), table("table-2", 3)],
            ..Default::default()
        };
        let session = open(content, 3);
        let mut panel = TablesPanel::new(&session);
        let first = session.content().tables[0].clone();

        panel.activate(&session, &first);
        assert!(panel.is_expanded("table-1"));
        assert_eq!(session.state().current_page(), 2);
        assert_eq!(panel.highlighted(&session), vec!["table-1".to_string()]);

        panel.activate(&session, &first);
        assert!(!panel.is_expanded("table-1"));
        // still selected after collapsing
        assert!(session.state().is_selected("table-1"));
    }

    #[test]
    fn test_export_csv_writes_file() {
        let path = std::env::temp_dir().join(format!("dx-table-{}.csv", std::process::id()));
        export_csv(&table("table-1", 1), &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Segment,Revenue\nCloud,$12M\n");
        let _ = fs::remove_file(path);
    }
}
