//! Shared widgets and styling for the extraction workspace
//!
//! Everything here is stateless: callers pass in what to draw and get back
//! either a [`egui::Response`] or an action enum.

pub mod badges;
pub mod color;
pub mod theme;
pub mod top_bar;

pub use badges::{badge, confidence_badge, entity_status_badge, status_badge, tag};
pub use color::parse_hsl;
pub use theme::{apply_theme, Theme};
pub use top_bar::{workspace_top_bar, TopBarAction};

/// Small button with a hover tooltip
pub fn icon_button(ui: &mut egui::Ui, icon: &str, tooltip: &str) -> egui::Response {
    ui.add(egui::Button::new(icon).small()).on_hover_text(tooltip)
}

/// Caption text in the muted colour
pub fn caption(ui: &mut egui::Ui, text: impl Into<String>) -> egui::Response {
    ui.label(egui::RichText::new(text.into()).small().color(theme::muted_color()))
}

// Common icon definitions
pub mod icons {
    pub const BACK: &str = "⬅";
    pub const CHAT: &str = "💬";
    pub const COPY: &str = "📋";
    pub const EXPORT: &str = "💾";
    pub const EXPAND: &str = "⛶";
    pub const FILE: &str = "📄";
    pub const IMAGE: &str = "🖼";
    pub const TABLE: &str = "▦";
    pub const THEME: &str = "◐";
    pub const UPLOAD: &str = "⬆";
    pub const CHECK: &str = "✔";
    pub const CROSS: &str = "✖";
}
