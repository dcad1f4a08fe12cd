//! CSS colour strings used by the extraction records

use egui::Color32;

/// Parse `hsl(h s% l%)`, also accepting commas between the components
pub fn parse_hsl(text: &str) -> Option<Color32> {
    let inner = text.trim().strip_prefix("hsl(")?.strip_suffix(')')?;
    let mut parts = inner
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty());

    let hue: f32 = parts.next()?.trim_end_matches("deg").parse().ok()?;
    let saturation: f32 = parts.next()?.strip_suffix('%')?.parse().ok()?;
    let lightness: f32 = parts.next()?.strip_suffix('%')?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    Some(hsl_to_color(hue, saturation / 100.0, lightness / 100.0))
}

/// Convert HSL (hue in degrees, s and l in 0..=1) to an opaque colour
pub fn hsl_to_color(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);
    let h = hue.rem_euclid(360.0) / 60.0;

    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = l - chroma / 2.0;

    let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color32::from_rgb(channel(r), channel(g), channel(b))
}
