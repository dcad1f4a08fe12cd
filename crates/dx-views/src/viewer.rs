//! Document viewer: page canvas, pager, zoom and region overlays

use egui::{pos2, vec2, Align, Align2, Color32, FontId, Layout, Rect, ScrollArea, Sense, Stroke, Ui};

use dx_core::model::{BoundingBox, RegionKind};
use dx_core::{BlockId, ContentRegion, PageNumber, WorkspaceSession};
use dx_ui::theme::{accent_color, muted_color, warning_color};
use dx_ui::{caption, icons};

use crate::selection::PanelSubscription;

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 2.0;
pub const ZOOM_STEP: f32 = 0.25;

/// Letter size in points at 100% zoom
const PAGE_SIZE: egui::Vec2 = egui::Vec2::new(612.0, 792.0);

/// Page after `current`, never past `total`
pub fn next_page(current: PageNumber, total: PageNumber) -> PageNumber {
    current.saturating_add(1).clamp(1, total.max(1))
}

/// Page before `current`, never below the first page
pub fn prev_page(current: PageNumber, total: PageNumber) -> PageNumber {
    current.saturating_sub(1).clamp(1, total.max(1))
}

fn region_color(kind: RegionKind) -> Color32 {
    match kind {
        RegionKind::TextBlock => accent_color(),
        RegionKind::TableRegion => Color32::from_rgb(90, 140, 230),
        RegionKind::ImageRegion => warning_color(),
    }
}

/// Map a percentage box onto the on-screen page rectangle
fn region_rect(page: Rect, bbox: &BoundingBox) -> Rect {
    let size = page.size();
    Rect::from_min_size(
        pos2(
            page.min.x + size.x * bbox.left / 100.0,
            page.min.y + size.y * bbox.top / 100.0,
        ),
        vec2(size.x * bbox.width / 100.0, size.y * bbox.height / 100.0),
    )
}

pub struct DocumentViewer {
    zoom: f32,
    show_overlays: bool,
    subscription: PanelSubscription,
}

impl DocumentViewer {
    pub fn new(session: &WorkspaceSession) -> Self {
        Self {
            zoom: 1.0,
            show_overlays: true,
            subscription: PanelSubscription::new(session.state()),
        }
    }

    /// Region id the next frame will scroll into view, consumed on read
    pub fn take_scroll_target(&self) -> Option<BlockId> {
        self.subscription.watcher().take_scroll_target()
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    pub fn next_page(&self, session: &WorkspaceSession) {
        let state = session.state();
        state.set_current_page(next_page(state.current_page(), session.document().total_pages()));
    }

    pub fn prev_page(&self, session: &WorkspaceSession) {
        let state = session.state();
        state.set_current_page(prev_page(state.current_page(), session.document().total_pages()));
    }

    /// Clicking an overlay selects it without moving the page
    pub fn select_region(&self, session: &WorkspaceSession, region: &ContentRegion) {
        session.state().select(region.id.clone());
    }

    /// Draw the viewer. Returns the region clicked this frame.
    pub fn ui(&mut self, session: &WorkspaceSession, ui: &mut Ui) -> Option<BlockId> {
        self.toolbar(session, ui);
        ui.separator();

        let total = session.document().total_pages();
        let page = session.state().current_page();
        if page == 0 || page > total {
            ui.centered_and_justified(|ui| {
                ui.label(format!("Page {} is outside this document ({} pages)", page, total));
            });
            return None;
        }

        ScrollArea::both()
            .auto_shrink([false; 2])
            .show(ui, |ui| ui.vertical_centered(|ui| self.page_canvas(session, ui, page)).inner)
            .inner
    }

    fn toolbar(&mut self, session: &WorkspaceSession, ui: &mut Ui) {
        let total = session.document().total_pages();
        let page = session.state().current_page();

        ui.horizontal(|ui| {
            if ui.add_enabled(page > 1, egui::Button::new("◀")).clicked() {
                self.prev_page(session);
            }
            ui.label(format!("Page {} of {}", page, total));
            if ui.add_enabled(page < total, egui::Button::new("▶")).clicked() {
                self.next_page(session);
            }

            ui.separator();
            if ui.add_enabled(self.zoom > MIN_ZOOM, egui::Button::new("−")).clicked() {
                self.zoom_out();
            }
            ui.label(format!("{}%", self.zoom_percent()));
            if ui.add_enabled(self.zoom < MAX_ZOOM, egui::Button::new("+")).clicked() {
                self.zoom_in();
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.checkbox(&mut self.show_overlays, "Regions");
            });
        });
    }

    fn page_canvas(&self, session: &WorkspaceSession, ui: &mut Ui, page: PageNumber) -> Option<BlockId> {
        let (page_rect, _) = ui.allocate_exact_size(PAGE_SIZE * self.zoom, Sense::hover());
        let painter = ui.painter_at(page_rect.expand(8.0));

        painter.rect_filled(page_rect.translate(vec2(3.0, 3.0)), 2.0, Color32::from_black_alpha(60));
        painter.rect_filled(page_rect, 2.0, Color32::WHITE);
        painter.text(
            page_rect.center_bottom() - vec2(0.0, 16.0 * self.zoom),
            Align2::CENTER_CENTER,
            format!("{} {}", icons::FILE, page),
            FontId::proportional(11.0 * self.zoom),
            muted_color(),
        );

        // Taken every frame so a hidden overlay layer does not replay old targets
        let scroll_target = self.take_scroll_target();
        if !self.show_overlays {
            return None;
        }

        let regions = session.regions().regions();
        let selection = session.state().snapshot();
        let mut clicked = None;

        for region in regions.iter() {
            let rect = region_rect(page_rect, &region.bbox);
            let color = region_color(region.kind);
            let selected = selection.is_selected(&region.id);

            let response = ui
                .interact(rect, ui.id().with(("region", &region.id)), Sense::click())
                .on_hover_text(format!("{} · {}", region.id, region.kind.label()));

            let fill_alpha = if selected { 0.35 } else if response.hovered() { 0.2 } else { 0.08 };
            painter.rect_filled(rect, 2.0, color.linear_multiply(fill_alpha));
            painter.rect_stroke(rect, 2.0, Stroke::new(if selected { 2.5 } else { 1.0 }, color));

            if scroll_target.as_deref() == Some(region.id.as_str()) {
                ui.scroll_to_rect(rect, Some(Align::Center));
            }

            if selected {
                painter.text(
                    rect.left_top() + vec2(4.0, 2.0),
                    Align2::LEFT_TOP,
                    region.kind.label(),
                    FontId::monospace(10.0),
                    color,
                );
            }

            if response.clicked() {
                clicked = Some(region);
            }
        }

        if regions.is_empty() {
            caption(ui, "No extracted regions on this page");
        }

        clicked.map(|region: &ContentRegion| {
            self.select_region(session, region);
            region.id.clone()
        })
    }
}
