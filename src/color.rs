use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Srgb};

/// Fill for countries without a value on the map.
pub const MISSING_COLOR: Color32 = Color32::from_rgb(211, 211, 211);

/// Stops of the yellow → green → blue sequential scale used by the map.
const YL_GN_BU: [(u8, u8, u8); 5] = [
    (255, 255, 217),
    (199, 233, 180),
    (65, 182, 196),
    (34, 94, 168),
    (8, 29, 88),
];

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
            to_color32(rgb)
        })
        .collect()
}

/// Colour for `t` in `[0, 1]` on the sequential map scale, interpolated in
/// linear RGB. Values outside the interval are clamped.
pub fn sequential(t: f64) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) as f32 } else { 0.0 };
    let segments = (YL_GN_BU.len() - 1) as f32;
    let pos = t * segments;
    let idx = (pos.floor() as usize).min(YL_GN_BU.len() - 2);
    let frac = pos - idx as f32;

    let stop = |(r, g, b): (u8, u8, u8)| -> LinSrgb {
        Srgb::new(r, g, b).into_format::<f32>().into_linear()
    };
    let a = stop(YL_GN_BU[idx]);
    let b = stop(YL_GN_BU[idx + 1]);
    let mixed = LinSrgb::new(
        a.red + (b.red - a.red) * frac,
        a.green + (b.green - a.green) * frac,
        a.blue + (b.blue - a.blue) * frac,
    );
    to_color32(Srgb::from_linear(mixed))
}

/// Blue → grey → red scale for correlations in `[-1, 1]`.
pub fn diverging(r: f64) -> Color32 {
    let t = if r.is_finite() { r.clamp(-1.0, 1.0) } else { 0.0 };
    let (from, to, frac) = if t < 0.0 {
        ((59, 76, 192), (221, 221, 221), (t + 1.0) as f32)
    } else {
        ((221, 221, 221), (180, 4, 38), t as f32)
    };
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * frac).round() as u8;
    Color32::from_rgb(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

/// Normalise `value` into `[0, 1]` given the observed bounds.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if (max - min).abs() < f64::EPSILON {
        0.5
    } else {
        (value - min) / (max - min)
    }
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

// ---------------------------------------------------------------------------
// Color mapping: category → Color32
// ---------------------------------------------------------------------------

/// Maps the categories of a column (e.g. regions) to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from the sorted categories of a column.
    pub fn new<'a>(categories: impl IntoIterator<Item = &'a String>) -> Self {
        let categories: Vec<&String> = categories.into_iter().collect();
        let palette = generate_palette(categories.len());
        let mapping: BTreeMap<String, Color32> = categories
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a category; unknown or missing gets grey.
    pub fn color_for(&self, category: Option<&str>) -> Color32 {
        category
            .and_then(|c| self.mapping.get(c))
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Return the legend entries (category → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping.iter().map(|(v, c)| (v.clone(), *c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(5);
        assert_eq!(p.len(), 5);
        assert_ne!(p[0], p[1]);
    }

    #[test]
    fn sequential_scale_hits_its_end_stops() {
        assert_eq!(sequential(0.0), Color32::from_rgb(255, 255, 217));
        assert_eq!(sequential(1.0), Color32::from_rgb(8, 29, 88));
        assert_eq!(sequential(-3.0), sequential(0.0));
        assert_eq!(sequential(f64::NAN), sequential(0.0));
    }

    #[test]
    fn color_map_falls_back_to_grey() {
        let regions = vec!["Africa".to_string(), "Europe".to_string()];
        let cm = ColorMap::new(&regions);
        assert_ne!(cm.color_for(Some("Africa")), cm.color_for(Some("Europe")));
        assert_eq!(cm.color_for(None), Color32::GRAY);
        assert_eq!(cm.color_for(Some("Atlantis")), Color32::GRAY);
        assert_eq!(cm.legend_entries().len(), 2);
    }

    #[test]
    fn diverging_scale_is_centered() {
        assert_eq!(diverging(-1.0), Color32::from_rgb(59, 76, 192));
        assert_eq!(diverging(0.0), Color32::from_rgb(221, 221, 221));
        assert_eq!(diverging(1.0), Color32::from_rgb(180, 4, 38));
    }

    #[test]
    fn normalize_handles_flat_ranges() {
        assert_eq!(normalize(5.0, 0.0, 10.0), 0.5);
        assert_eq!(normalize(3.0, 3.0, 3.0), 0.5);
    }
}
