use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

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
// Series colors: one stable colour per chart series kind
// ---------------------------------------------------------------------------

/// The chart series the dashboard draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SeriesKind {
    Count,
    CentralPrice,
    PriceYoy,
    Yield,
    YieldYoy,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 5] = [
        SeriesKind::Count,
        SeriesKind::CentralPrice,
        SeriesKind::PriceYoy,
        SeriesKind::Yield,
        SeriesKind::YieldYoy,
    ];
}

/// Maps each series kind to a distinct palette colour so the same metric
/// looks the same on every tab.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    mapping: BTreeMap<SeriesKind, Color32>,
    default_color: Color32,
}

impl Default for SeriesColors {
    fn default() -> Self {
        let palette = generate_palette(SeriesKind::ALL.len());
        let mapping = SeriesKind::ALL
            .iter()
            .zip(palette.into_iter())
            .map(|(&kind, color)| (kind, color))
            .collect();
        SeriesColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }
}

impl SeriesColors {
    pub fn color_for(&self, kind: SeriesKind) -> Color32 {
        self.mapping
            .get(&kind)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colors_are_distinct() {
        let palette = generate_palette(SeriesKind::ALL.len());
        for (i, a) in palette.iter().enumerate() {
            for b in palette.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
