//! Chart presentation: bar or line charts of shaped rows, written to **SVG** or
//! **PNG** with plotters, or drawn as text bars for terminals.
//!
//! A chart takes a data slice, the category axis, and a list of series
//! descriptors (`field`, `color`, `label`). While loading, only a placeholder
//! block is drawn.

pub mod text;
pub mod util;

use crate::format::{format_compact, format_count, map_locale};
use anyhow::{Result, anyhow};
use ansi_term::Colour;
use num_format::Locale;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;
use std::sync::Once;

use text::{truncate_chars, truncate_to_width};
use util::{PLACEHOLDER, series_color, value_range};

/// A row a chart can plot: one category on the x axis, numeric fields by name.
pub trait ChartDatum {
    fn category(&self) -> &str;
    fn value(&self, field: &str) -> Option<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
}

/// One plotted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    pub field: &'static str,
    /// `#rrggbb`
    pub color: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    /// Name of the category field (`"state"`, `"country"`).
    pub x_key: &'static str,
    pub series: Vec<Series>,
}

impl ChartSpec {
    pub fn bar(title: impl Into<String>, x_key: &'static str, series: Vec<Series>) -> Self {
        Self {
            title: title.into(),
            kind: ChartKind::Bar,
            x_key,
            series,
        }
    }

    pub fn line(title: impl Into<String>, x_key: &'static str, series: Vec<Series>) -> Self {
        Self {
            title: title.into(),
            kind: ChartKind::Line,
            x_key,
            series,
        }
    }
}

static INIT_FONTS: Once = Once::new();

/// `ab_glyph` does not discover OS fonts; register the bundled one once.
fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

/// Render `data` to `out_path` (`.svg` → SVG, anything else → PNG).
///
/// `loading = true` draws the title and a placeholder block instead of data.
pub fn render_chart<D, P>(
    data: &[D],
    spec: &ChartSpec,
    out_path: P,
    width: u32,
    height: u32,
    locale_tag: &str,
    loading: bool,
) -> Result<()>
where
    D: ChartDatum,
    P: AsRef<Path>,
{
    if spec.series.is_empty() {
        return Err(anyhow!("chart needs at least one series"));
    }
    ensure_fonts_registered();
    let out_path = out_path.as_ref();
    let locale = map_locale(locale_tag);

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(out_path, (width, height)).into_drawing_area();
        draw_chart(root, data, spec, locale, loading)?;
    } else {
        let root = BitMapBackend::new(out_path, (width, height)).into_drawing_area();
        draw_chart(root, data, spec, locale, loading)?;
    }
    log::debug!("wrote chart '{}' to {}", spec.title, out_path.display());
    Ok(())
}

fn draw_chart<DB, D>(
    root: DrawingArea<DB, Shift>,
    data: &[D],
    spec: &ChartSpec,
    locale: &Locale,
    loading: bool,
) -> Result<()>
where
    DB: DrawingBackend,
    D: ChartDatum,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    if loading || data.is_empty() {
        let area = root
            .titled(&spec.title, (FontFamily::SansSerif, 18))
            .map_err(|e| anyhow!("{:?}", e))?;
        let (w, h) = area.dim_in_pixel();
        let block = Rectangle::new(
            [(16, 16), ((w as i32 - 16).max(17), (h as i32 - 16).max(17))],
            PLACEHOLDER.filled(),
        );
        area.draw(&block).map_err(|e| anyhow!("{:?}", e))?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
        return Ok(());
    }

    let n = data.len();
    let (y_min, y_max) = value_range(
        data.iter()
            .flat_map(|d| spec.series.iter().filter_map(move |s| d.value(s.field))),
    );

    let categories: Vec<String> = data
        .iter()
        .map(|d| truncate_to_width(d.category(), 11, 90))
        .collect();
    let fmt_x = |x: &f64| {
        let r = x.round();
        if (x - r).abs() > 1e-6 || r < 0.0 {
            return String::new();
        }
        categories.get(r as usize).cloned().unwrap_or_default()
    };
    let fmt_y = |y: &f64| format_compact(*y, locale);

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, (FontFamily::SansSerif, 18))
        .margin(16)
        .x_label_area_size(40)
        .y_label_area_size(64)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), y_min..y_max)
        .map_err(|e| anyhow!("{:?}", e))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .y_labels(8)
        .x_label_formatter(&fmt_x)
        .y_label_formatter(&fmt_y)
        .x_label_style((FontFamily::SansSerif, 11))
        .y_label_style((FontFamily::SansSerif, 12))
        .x_desc(spec.x_key)
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    let n_series = spec.series.len();
    let group_width = 0.8f64;
    let bar_w = group_width / n_series as f64;

    for (idx, s) in spec.series.iter().enumerate() {
        let color = series_color(s.color, idx);
        match spec.kind {
            ChartKind::Bar => {
                chart
                    .draw_series(data.iter().enumerate().filter_map(|(i, d)| {
                        let v = d.value(s.field)?;
                        let x0 = i as f64 - group_width / 2.0 + idx as f64 * bar_w;
                        Some(Rectangle::new(
                            [(x0, 0.0f64.min(v)), (x0 + bar_w, 0.0f64.max(v))],
                            color.filled(),
                        ))
                    }))
                    .map_err(|e| anyhow!("{:?}", e))?
                    .label(s.label)
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
            }
            ChartKind::Line => {
                let points: Vec<(f64, f64)> = data
                    .iter()
                    .enumerate()
                    .filter_map(|(i, d)| d.value(s.field).map(|v| (i as f64, v)))
                    .collect();
                chart
                    .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
                    .map_err(|e| anyhow!("{:?}", e))?
                    .label(s.label)
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2))
                    });
                chart
                    .draw_series(points.into_iter().map(|p| Circle::new(p, 3, color.filled())))
                    .map_err(|e| anyhow!("{:?}", e))?;
            }
        }
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.85))
        .position(SeriesLabelPosition::UpperRight)
        .label_font((FontFamily::SansSerif, 13))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// Width of the longest text bar, in characters.
const TEXT_BAR_WIDTH: usize = 40;
const TEXT_LABEL_WIDTH: usize = 20;
/// Lines of the text placeholder block.
pub const TEXT_PLACEHOLDER_LINES: usize = 5;

/// Horizontal text bars, one block per series. Line charts are drawn the same way.
pub fn render_chart_text<D: ChartDatum>(
    data: &[D],
    spec: &ChartSpec,
    locale: &Locale,
    loading: bool,
    color: bool,
) -> String {
    let mut out = String::new();
    out.push_str(&spec.title);
    out.push('\n');

    if loading {
        for _ in 0..TEXT_PLACEHOLDER_LINES {
            out.push_str(&"░".repeat(TEXT_LABEL_WIDTH + 1 + TEXT_BAR_WIDTH));
            out.push('\n');
        }
        return out;
    }

    for (idx, s) in spec.series.iter().enumerate() {
        let max = data
            .iter()
            .filter_map(|d| d.value(s.field))
            .fold(0.0f64, f64::max);
        if spec.series.len() > 1 {
            out.push_str(&format!("{}:\n", s.label));
        }
        let rgb = series_color(s.color, idx);
        for d in data {
            let Some(v) = d.value(s.field) else { continue };
            let len = if max > 0.0 {
                ((v.max(0.0) / max) * TEXT_BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            let bar = "█".repeat(len);
            let bar = if color {
                Colour::RGB(rgb.0, rgb.1, rgb.2).paint(bar).to_string()
            } else {
                bar
            };
            let label = truncate_chars(d.category(), TEXT_LABEL_WIDTH);
            out.push_str(&format!(
                "{label:<width$} {bar} {}\n",
                format_count(v, locale),
                width = TEXT_LABEL_WIDTH
            ));
        }
    }
    out
}
