use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::aggregate::GroupKey;

/// Fill for every bar chart (`#0083B8`).
pub const BAR_COLOR: Color32 = Color32::from_rgb(0x00, 0x83, 0xB8);

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
// Slice colours: group label → Color32
// ---------------------------------------------------------------------------

/// Maps the groups of a share chart to distinct colours. Colours follow the
/// sorted group keys, so a group keeps its colour when the ranking changes.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<GroupKey, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new<'a>(keys: impl IntoIterator<Item = &'a GroupKey>) -> Self {
        let mut sorted: Vec<GroupKey> = keys.into_iter().cloned().collect();
        sorted.sort();
        sorted.dedup();
        let palette = generate_palette(sorted.len());
        ColorMap {
            mapping: sorted.into_iter().zip(palette).collect(),
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, key: &GroupKey) -> Color32 {
        self.mapping.get(key).copied().unwrap_or(self.default_color)
    }
}
