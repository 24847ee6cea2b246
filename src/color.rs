use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use titanic_dashboard::data::CellValue;

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
            // Start at blue so a two-level hue reads blue / orange.
            let hue = 210.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.70, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: hue level → Color32
// ---------------------------------------------------------------------------

/// Maps the levels of a hue column to distinct colours so every chart
/// colours "Yes"/"No" the same way.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<CellValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map for the given column from its levels.
    pub fn new(column: &str, levels: &[CellValue]) -> Self {
        let palette = generate_palette(levels.len());
        let mapping: BTreeMap<CellValue, Color32> = levels
            .iter()
            .cloned()
            .zip(palette)
            .collect();

        ColorMap {
            column: column.to_string(),
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given level.
    pub fn color_for(&self, value: &CellValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}
