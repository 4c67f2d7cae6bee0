use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

/// Fill of the leading bar in a ranking chart (`#72BCD4`).
pub const HIGHLIGHT: Color32 = Color32::from_rgb(0x72, 0xBC, 0xD4);

/// Fill of the remaining bars in a ranking chart (`#D3D3D3`).
pub const NEUTRAL: Color32 = Color32::from_rgb(0xD3, 0xD3, 0xD3);

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            to_color32(hsl.into_color())
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Colour for a review score on the 1–5 scale, dark purple (1) to yellow (5).
pub fn review_color(score: Option<f64>) -> Color32 {
    let Some(score) = score else {
        return Color32::GRAY;
    };
    let low: LinSrgb = Srgb::new(0.267_f32, 0.005, 0.329).into_linear();
    let mid: LinSrgb = Srgb::new(0.128_f32, 0.567, 0.551).into_linear();
    let high: LinSrgb = Srgb::new(0.993_f32, 0.906, 0.144).into_linear();
    let t = ((score - 1.0) / 4.0).clamp(0.0, 1.0) as f32;
    let rgb = if t < 0.5 {
        low.mix(mid, t * 2.0)
    } else {
        mid.mix(high, (t - 0.5) * 2.0)
    };
    to_color32(Srgb::from_linear(rgb))
}

// ---------------------------------------------------------------------------
// Color mapping: order status → Color32
// ---------------------------------------------------------------------------

/// Maps order statuses to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from the distinct statuses of a dataset.
    pub fn new(statuses: &[String]) -> Self {
        let palette = generate_palette(statuses.len());
        let mapping = statuses.iter().cloned().zip(palette).collect();
        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a status.
    pub fn color_for(&self, status: &str) -> Color32 {
        self.mapping
            .get(status)
            .copied()
            .unwrap_or(self.default_color)
    }
}
