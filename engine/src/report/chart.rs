// SVG line chart of the close price and its moving averages against date
use chrono::NaiveDate;
use shared::models::{Indicator, PriceSeries};
use shared::utils::value_range;
use std::path::Path;

use crate::config::settings::ChartStyle;
use crate::error::Result;

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 170.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 100.0;
const X_TICKS: usize = 6;
const Y_TICKS: usize = 5;
const FALLBACK_COLOR: &str = "gray";

struct PlotArea {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    first_date: NaiveDate,
    day_span: f64,
    min_price: f64,
    max_price: f64,
}

impl PlotArea {
    fn x(&self, date: NaiveDate) -> f64 {
        if self.day_span <= 0.0 {
            return self.left + self.width / 2.0;
        }
        let days = (date - self.first_date).num_days() as f64;
        self.left + days / self.day_span * self.width
    }

    fn y(&self, price: f64) -> f64 {
        self.top + (self.max_price - price) / (self.max_price - self.min_price) * self.height
    }
}

/// Legend label for an SMA indicator, e.g. "20-day SMA".
fn legend_label(indicator: &Indicator) -> String {
    match indicator.parameters.get("period").and_then(|v| v.as_u64()) {
        Some(period) => format!("{}-day SMA", period),
        None => indicator.name.clone(),
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// One polyline per unbroken run of points; a missing date or value ends the run.
fn broken_line(values: &[Option<f64>], dates: &[Option<NaiveDate>], area: &PlotArea, color: &str, width: u32) -> String {
    let mut out = String::new();
    let mut run: Vec<(f64, f64)> = Vec::new();
    for (value, date) in values.iter().zip(dates) {
        match (value, date) {
            (Some(v), Some(d)) => run.push((area.x(*d), area.y(*v))),
            _ if !run.is_empty() => {
                out.push_str(&polyline(&run, color, width));
                run.clear();
            }
            _ => {}
        }
    }
    if !run.is_empty() {
        out.push_str(&polyline(&run, color, width));
    }
    out
}

fn polyline(points: &[(f64, f64)], color: &str, width: u32) -> String {
    let points = points
        .iter()
        .map(|(x, y)| format!("{:.2},{:.2}", x, y))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>\n",
        points,
        escape_xml(color),
        width
    )
}

/// Renders the close series and every indicator as a standalone SVG document.
/// Missing closes, missing dates and undefined indicator values break the
/// line instead of dropping to zero.
pub fn render_svg(symbol: &str, series: &PriceSeries, style: &ChartStyle) -> String {
    let width = style.width as f64;
    let height = style.height as f64;
    let title = format!("{} Stock Price Trend", symbol);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = style.width,
        h = style.height
    ));
    svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    svg.push_str(&format!(
        "<text x=\"{:.1}\" y=\"30\" text-anchor=\"middle\" font-size=\"18\" font-family=\"sans-serif\">{}</text>\n",
        width / 2.0,
        escape_xml(&title)
    ));

    let plot_width = (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
    let plot_height = (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);
    svg.push_str(&format!(
        "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"none\" stroke=\"black\"/>\n",
        MARGIN_LEFT, MARGIN_TOP, plot_width, plot_height
    ));
    svg.push_str(&format!(
        "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"14\" font-family=\"sans-serif\">Date</text>\n",
        MARGIN_LEFT + plot_width / 2.0,
        height - 10.0
    ));
    svg.push_str(&format!(
        "<text x=\"20\" y=\"{y:.1}\" text-anchor=\"middle\" font-size=\"14\" font-family=\"sans-serif\" transform=\"rotate(-90 20 {y:.1})\">Stock Price</text>\n",
        y = MARGIN_TOP + plot_height / 2.0
    ));

    let closes = series.closes();
    let all_values = std::iter::once(closes.as_slice())
        .chain(series.indicators.iter().map(|ind| ind.values.as_slice()));
    let dates = series.dates();
    let known_dates: Vec<NaiveDate> = dates.iter().flatten().copied().collect();

    let (Some((min_price, max_price)), Some(first_date), Some(last_date)) = (
        value_range(all_values),
        known_dates.iter().min().copied(),
        known_dates.iter().max().copied(),
    )
    else {
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"14\" font-family=\"sans-serif\">No data</text>\n",
            MARGIN_LEFT + plot_width / 2.0,
            MARGIN_TOP + plot_height / 2.0
        ));
        svg.push_str("</svg>\n");
        return svg;
    };

    // Flat series still get a visible band
    let (min_price, max_price) = if (max_price - min_price).abs() < f64::EPSILON {
        (min_price - 1.0, max_price + 1.0)
    } else {
        let pad = (max_price - min_price) * 0.05;
        (min_price - pad, max_price + pad)
    };

    let area = PlotArea {
        left: MARGIN_LEFT,
        top: MARGIN_TOP,
        width: plot_width,
        height: plot_height,
        first_date,
        day_span: (last_date - first_date).num_days() as f64,
        min_price,
        max_price,
    };

    svg.push_str(&render_axes(&area, &known_dates));
    svg.push_str(&broken_line(&closes, &dates, &area, &style.close_color, style.line_width));

    let mut legend = vec![("Close Price".to_string(), style.close_color.clone())];

    for (i, indicator) in series.indicators.iter().enumerate() {
        let color = if style.sma_colors.is_empty() {
            FALLBACK_COLOR.to_string()
        } else {
            style.sma_colors[i % style.sma_colors.len()].clone()
        };
        svg.push_str(&broken_line(&indicator.values, &dates, &area, &color, style.line_width));

        legend.push((legend_label(indicator), color));
    }

    svg.push_str(&render_legend(&legend, MARGIN_LEFT + plot_width + 15.0, MARGIN_TOP + 10.0));
    svg.push_str("</svg>\n");
    svg
}

fn render_axes(area: &PlotArea, dates: &[NaiveDate]) -> String {
    let mut out = String::new();

    for step in 0..=Y_TICKS {
        let price = area.min_price + (area.max_price - area.min_price) * step as f64 / Y_TICKS as f64;
        let y = area.y(price);
        out.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{y:.2}\" x2=\"{:.1}\" y2=\"{y:.2}\" stroke=\"#dddddd\"/>\n",
            area.left,
            area.left + area.width,
            y = y
        ));
        out.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.2}\" text-anchor=\"end\" font-size=\"11\" font-family=\"sans-serif\">{:.2}</text>\n",
            area.left - 6.0,
            y + 4.0,
            price
        ));
    }

    let mut sorted: Vec<NaiveDate> = dates.to_vec();
    sorted.sort();
    sorted.dedup();
    let tick_count = X_TICKS.min(sorted.len());
    let base_y = area.top + area.height;
    for step in 0..tick_count {
        let idx = if tick_count == 1 { 0 } else { step * (sorted.len() - 1) / (tick_count - 1) };
        let date = sorted[idx];
        let x = area.x(date);
        out.push_str(&format!(
            "<line x1=\"{x:.2}\" y1=\"{:.1}\" x2=\"{x:.2}\" y2=\"{:.1}\" stroke=\"black\"/>\n",
            base_y,
            base_y + 5.0,
            x = x
        ));
        out.push_str(&format!(
            "<text x=\"{x:.2}\" y=\"{y:.1}\" text-anchor=\"end\" font-size=\"11\" font-family=\"sans-serif\" transform=\"rotate(-45 {x:.2} {y:.1})\">{d}</text>\n",
            x = x,
            y = base_y + 18.0,
            d = date.format("%Y-%m-%d")
        ));
    }
    out
}

fn render_legend(entries: &[(String, String)], x: f64, y: f64) -> String {
    let mut out = String::new();
    for (i, (label, color)) in entries.iter().enumerate() {
        let row_y = y + i as f64 * 20.0;
        out.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{ly:.1}\" x2=\"{:.1}\" y2=\"{ly:.1}\" stroke=\"{}\" stroke-width=\"3\"/>\n",
            x,
            x + 24.0,
            escape_xml(color),
            ly = row_y
        ));
        out.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\" font-family=\"sans-serif\">{}</text>\n",
            x + 30.0,
            row_y + 4.0,
            escape_xml(label)
        ));
    }
    out
}

pub fn save_svg(path: impl AsRef<Path>, svg: &str) -> Result<()> {
    std::fs::write(path.as_ref(), svg)?;
    tracing::info!(path = %path.as_ref().display(), "Wrote chart");
    Ok(())
}
