//! New parse page: pick or drop a file and watch the simulated upload

use std::sync::Arc;

use egui::{Align, Frame, Layout, ProgressBar, RichText, Ui};
use tokio::runtime::Handle;
use tracing::info;

use dx_core::events::EventBus;
use dx_core::ingest::{ParsePhase, ParseSimulation};
use dx_core::{AppSettings, DeferredTask, TaskScope};
use dx_ui::theme::{accent_color, error_color, muted_color};
use dx_ui::{caption, icons};

const PICKER_EXTENSIONS: [&str; 9] = ["pdf", "png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff"];

pub enum ParseAction {
    Back,
}

pub struct ParsePage {
    simulation: ParseSimulation,
    current: Option<DeferredTask>,
    error: Option<String>,
    tasks: TaskScope,
}

impl ParsePage {
    pub fn new(settings: &AppSettings, events: Arc<EventBus>, target_document_id: &str, handle: Handle) -> Self {
        Self {
            simulation: ParseSimulation::new(settings.simulation.clone(), events, target_document_id),
            current: None,
            error: None,
            tasks: TaskScope::new(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.simulation.is_running()
    }

    /// Last rejection message, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn start(&mut self, file_name: &str, mime: Option<&str>) {
        match self.simulation.start(&self.tasks, file_name, mime) {
            Ok(task) => {
                self.error = None;
                self.current = Some(task);
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Abandon the running upload and go back to the drop zone
    pub fn cancel(&mut self) {
        if let Some(task) = self.current.take() {
            task.cancel();
            info!("Upload cancelled");
        }
        self.simulation.reset();
    }

    pub fn ui(&mut self, ui: &mut Ui) -> Option<ParseAction> {
        let mut action = None;
        let progress = self.simulation.progress();

        ui.horizontal(|ui| {
            if ui.button(format!("{} Documents", icons::BACK)).clicked() {
                action = Some(ParseAction::Back);
            }
            ui.heading("New parse");
        });
        ui.separator();

        ui.horizontal(|ui| {
            for phase in ParsePhase::ALL {
                let text = if phase.index() < progress.phase.index() {
                    RichText::new(format!("{} {}", icons::CHECK, phase.label())).color(accent_color())
                } else if phase == progress.phase {
                    RichText::new(phase.label()).strong()
                } else {
                    RichText::new(phase.label()).color(muted_color())
                };
                ui.label(text);
                if phase != ParsePhase::Done {
                    ui.label(RichText::new("›").color(muted_color()));
                }
            }
        });
        ui.add_space(12.0);

        match progress.phase {
            ParsePhase::Upload => self.drop_zone(ui),
            ParsePhase::Uploading | ParsePhase::Parsing => {
                ui.label(RichText::new(&progress.file_name).strong());
                ui.add(
                    ProgressBar::new(progress.progress / 100.0)
                        .text(format!("{} {:.0}%", progress.phase.label(), progress.progress)),
                );
                ui.add_space(8.0);
                if ui.button("Cancel").clicked() {
                    self.cancel();
                }
            }
            ParsePhase::Done => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(format!("Parsed {}. Opening workspace…", progress.file_name));
                });
            }
        }

        action
    }

    fn drop_zone(&mut self, ui: &mut Ui) {
        let dropped = ui.ctx().input(|i| i.raw.dropped_files.clone());
        if let Some(file) = dropped.first() {
            let name = file
                .path
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.name.clone());
            self.start(&name, None);
            return;
        }

        let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
        let stroke_color = if hovering { accent_color() } else { muted_color() };

        Frame::group(ui.style())
            .stroke(egui::Stroke::new(1.5, stroke_color))
            .inner_margin(32.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.with_layout(Layout::top_down(Align::Center), |ui| {
                    ui.label(RichText::new(icons::UPLOAD).size(32.0));
                    ui.label("Drop a PDF or image here");
                    caption(ui, "or");
                    if ui.button("Browse files…").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Documents", &PICKER_EXTENSIONS)
                            .pick_file()
                        {
                            let name = path
                                .file_name()
                                .map(|n| n.to_string_lossy().into_owned())
                                .unwrap_or_default();
                            self.start(&name, None);
                        }
                    }
                });
            });

        if let Some(error) = &self.error {
            ui.add_space(8.0);
            ui.label(RichText::new(error).color(error_color()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn page() -> ParsePage {
        ParsePage::new(&AppSettings::default(), Arc::new(EventBus::new()), "doc-1", Handle::current())
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejects_unsupported_file() {
        let mut page = page();
        page.start("notes.docx", None);
        assert!(!page.is_running());
        assert_eq!(page.error(), Some("Unsupported file type: notes.docx"));

        page.start("scan.png", None);
        assert!(page.is_running());
        assert_eq!(page.error(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_returns_to_drop_zone() {
        let mut page = page();
        page.start("report.pdf", Some("application/pdf"));
        tokio::time::sleep(Duration::from_millis(450)).await;
        assert!(page.is_running());

        page.cancel();
        assert!(!page.is_running());
        assert_eq!(page.simulation.progress().phase, ParsePhase::Upload);

        // the cancelled task must not move the progress again
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(page.simulation.progress().phase, ParsePhase::Upload);
    }
}
