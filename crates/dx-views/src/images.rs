//! Images panel: figures found in the document

use egui::{vec2, Align, Color32, Frame, RichText, ScrollArea, Sense, Stroke, Ui};

use dx_core::model::ExtractedImage;
use dx_core::{BlockId, WorkspaceSession};
use dx_ui::theme::{accent_color, muted_color};
use dx_ui::{caption, icons, parse_hsl, tag};

use crate::panel::{PanelKind, WorkspacePanel};
use crate::selection::PanelSubscription;

const SWATCH_HEIGHT: f32 = 72.0;

pub struct ImagesPanel {
    subscription: PanelSubscription,
}

impl ImagesPanel {
    pub fn new(session: &WorkspaceSession) -> Self {
        Self {
            subscription: PanelSubscription::new(session.state()),
        }
    }

    pub fn select_image(session: &WorkspaceSession, image: &ExtractedImage) {
        session.state().focus(image.image_id.clone(), image.page);
    }
}

impl WorkspacePanel for ImagesPanel {
    fn kind(&self) -> PanelKind {
        PanelKind::Images
    }

    fn item_ids(&self, session: &WorkspaceSession) -> Vec<BlockId> {
        session.content().images.iter().map(|i| i.image_id.clone()).collect()
    }

    fn ui(&mut self, session: &WorkspaceSession, ui: &mut Ui) {
        let content = session.content().clone();

        if content.images.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("No images were extracted");
            });
            return;
        }

        let scroll_target = self.subscription.watcher().take_scroll_target();
        let selection = session.state().snapshot();

        ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
            for image in &content.images {
                let selected = selection.is_selected(&image.image_id);
                let stroke = if selected {
                    Stroke::new(2.0, accent_color())
                } else {
                    ui.visuals().widgets.noninteractive.bg_stroke
                };

                let frame = Frame::group(ui.style()).stroke(stroke).show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    swatch(ui, image);
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&image.image_id).strong());
                        caption(ui, format!("Page {}", image.page));
                    });
                    ui.label(&image.llm_explanation);
                    ui.horizontal_wrapped(|ui| {
                        for name in &image.tags {
                            tag(ui, name);
                        }
                    });
                });

                let response = ui.interact(frame.response.rect, ui.id().with(&image.image_id), Sense::click());
                if scroll_target.as_deref() == Some(image.image_id.as_str()) {
                    response.scroll_to_me(Some(Align::Center));
                }
                if response.clicked() {
                    Self::select_image(session, image);
                }
            }
        });
    }
}

fn swatch(ui: &mut Ui, image: &ExtractedImage) {
    let fill = parse_hsl(&image.thumbnail_color).unwrap_or_else(muted_color);
    let (rect, _) = ui.allocate_exact_size(vec2(ui.available_width(), SWATCH_HEIGHT), Sense::hover());
    ui.painter().rect_filled(rect, 4.0, fill);
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        icons::IMAGE,
        egui::FontId::proportional(24.0),
        Color32::from_black_alpha(120),
    );
}
