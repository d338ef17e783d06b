//! Colors and scale helpers for charts.

use plotters::prelude::*;

/// Fallback palette when a series color cannot be parsed (Tailwind 500 shades).
const PALETTE: [RGBColor; 6] = [
    RGBColor(59, 130, 246), // blue   (#3B82F6)
    RGBColor(239, 68, 68),  // red    (#EF4444)
    RGBColor(34, 197, 94),  // green  (#22C55E)
    RGBColor(234, 179, 8),  // yellow (#EAB308)
    RGBColor(168, 85, 247), // purple (#A855F7)
    RGBColor(249, 115, 22), // orange (#F97316)
];

/// Placeholder block color while loading (gray-200).
pub const PLACEHOLDER: RGBColor = RGBColor(229, 231, 235);

#[inline]
pub fn palette_color(idx: usize) -> RGBColor {
    PALETTE[idx % PALETTE.len()]
}

/// Parse `#rrggbb` (or `rrggbb`) into an RGB color.
pub fn parse_hex_color(hex: &str) -> Option<RGBColor> {
    let h = hex.trim().trim_start_matches('#');
    if h.len() != 6 || !h.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&h[i..i + 2], 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// Series color: the declared hex, else the palette slot.
pub fn series_color(hex: &str, idx: usize) -> RGBColor {
    parse_hex_color(hex).unwrap_or_else(|| palette_color(idx))
}

/// Y range that always includes zero and never collapses to a point.
pub fn value_range(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if (hi - lo).abs() < f64::EPSILON {
        (lo, lo + 1.0)
    } else {
        (lo, hi + (hi - lo) * 0.05)
    }
}
