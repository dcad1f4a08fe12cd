use egui::{Context, Visuals, Style, Color32, Rounding, Stroke, FontId, FontFamily, TextStyle};
use std::collections::BTreeMap;

/// Theme configuration
pub struct Theme {
    pub name: String,
    pub dark_mode: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Workspace Dark".to_string(),
            dark_mode: true,
        }
    }
}

impl Theme {
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        Self {
            name: if dark_mode { "Workspace Dark" } else { "Workspace Light" }.to_string(),
            dark_mode,
        }
    }
}

/// Apply the application theme (teal accent on neutral panels)
pub fn apply_theme(ctx: &Context, theme: &Theme) {
    let mut style = Style::default();
    let mut visuals = if theme.dark_mode { Visuals::dark() } else { Visuals::light() };

    let accent = accent_color();

    if theme.dark_mode {
        let bg_color = Color32::from_rgb(22, 24, 26);
        let panel_bg = Color32::from_rgb(30, 32, 35);
        let widget_bg = Color32::from_rgb(40, 43, 46);
        let text_color = Color32::from_rgb(222, 224, 226);

        visuals.window_fill = panel_bg;
        visuals.panel_fill = panel_bg;
        visuals.extreme_bg_color = bg_color;
        visuals.faint_bg_color = widget_bg;

        visuals.widgets.noninteractive.bg_fill = widget_bg;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, text_color);
        visuals.widgets.inactive.bg_fill = widget_bg;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, text_color);
        visuals.widgets.hovered.bg_fill = Color32::from_rgb(52, 56, 60);
        visuals.widgets.active.bg_fill = Color32::from_rgb(62, 66, 70);
    }

    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
    ] {
        widget.rounding = Rounding::same(6.0);
    }
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, accent);

    // Selection and highlighting
    visuals.selection.bg_fill = accent.linear_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, accent);
    visuals.hyperlink_color = accent;

    // Shadows
    visuals.window_shadow.extrusion = 8.0;
    visuals.popup_shadow.extrusion = 4.0;

    // Apply spacing
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    style.spacing.menu_margin = egui::Margin::same(8.0);
    style.spacing.indent = 18.0;

    // Font sizes
    let mut font_sizes = BTreeMap::new();
    font_sizes.insert(TextStyle::Small, FontId::new(11.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Body, FontId::new(13.5, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Button, FontId::new(13.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Heading, FontId::new(19.0, FontFamily::Proportional));
    font_sizes.insert(TextStyle::Monospace, FontId::new(12.0, FontFamily::Monospace));

    style.text_styles = font_sizes;

    // Apply the style and visuals
    ctx.set_style(style);
    ctx.set_visuals(visuals);
    tracing::debug!("Applied theme {}", theme.name);
}

/// Get the accent color for the theme
pub fn accent_color() -> Color32 {
    Color32::from_rgb(38, 166, 154)
}

/// Get the error color for the theme
pub fn error_color() -> Color32 {
    Color32::from_rgb(230, 80, 80)
}

/// Get the warning color for the theme
pub fn warning_color() -> Color32 {
    Color32::from_rgb(230, 180, 80)
}

/// Muted text for captions and page references
pub fn muted_color() -> Color32 {
    Color32::from_gray(150)
}
