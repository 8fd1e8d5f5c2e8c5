//! Plain SVG output.
//!
//! Trend charts draw daily counts as bars against the left axis and mean
//! sentiment as a line against a fixed -1..1 right axis. Keyword charts draw
//! one bar per keyword from a zero baseline with the value printed on it.

use nm_core::Result;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use super::{output_path, ChartRenderer};
use crate::chart::{KeywordChart, TrendChart};

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 540.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 70.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 100.0;

const BAR_COLOR: &str = "#8fb8de";
const LINE_COLOR: &str = "#d1495b";
const POSITIVE_COLOR: &str = "#3c9d5d";
const NEGATIVE_COLOR: &str = "#c8553d";

#[derive(Debug, Clone)]
pub struct SvgRenderer {
    dir: PathBuf,
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn plot_width() -> f64 {
    WIDTH - MARGIN_LEFT - MARGIN_RIGHT
}

fn plot_height() -> f64 {
    HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
}

/// y coordinate of a sentiment value on the -1..1 axis
fn sentiment_y(value: f64) -> f64 {
    let clamped = value.clamp(-1.0, 1.0);
    MARGIN_TOP + (1.0 - clamped) / 2.0 * plot_height()
}

struct Canvas {
    body: String,
}

impl Canvas {
    fn new(title: &str) -> Self {
        let mut body = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\">\n",
            w = WIDTH,
            h = HEIGHT
        );
        body.push_str(&format!("<rect width=\"{}\" height=\"{}\" fill=\"white\"/>\n", WIDTH, HEIGHT));
        body.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" font-size=\"20\" text-anchor=\"middle\">{}</text>\n",
            WIDTH / 2.0,
            MARGIN_TOP / 2.0 + 6.0,
            escape(title)
        ));
        Self { body }
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str) {
        self.body.push_str(&format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"/>\n",
            x, y, w, h, fill
        ));
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str, dashed: bool) {
        let dash = if dashed { " stroke-dasharray=\"6 4\"" } else { "" };
        self.body.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\"{}/>\n",
            x1, y1, x2, y2, stroke, dash
        ));
    }

    fn text(&mut self, x: f64, y: f64, anchor: &str, size: u32, content: &str) {
        self.body.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"{}\" text-anchor=\"{}\">{}</text>\n",
            x, y, size, anchor, escape(content)
        ));
    }

    /// Label rotated to run up and to the left from its anchor
    fn slanted_text(&mut self, x: f64, y: f64, content: &str) {
        self.body.push_str(&format!(
            "<text x=\"{x:.1}\" y=\"{y:.1}\" font-size=\"12\" text-anchor=\"end\" transform=\"rotate(-40 {x:.1} {y:.1})\">{}</text>\n",
            escape(content),
            x = x,
            y = y
        ));
    }

    fn polyline(&mut self, points: &[(f64, f64)], stroke: &str) {
        let coords = points
            .iter()
            .map(|(x, y)| format!("{:.1},{:.1}", x, y))
            .collect::<Vec<_>>()
            .join(" ");
        self.body.push_str(&format!(
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>\n",
            coords, stroke
        ));
        for (x, y) in points {
            self.body.push_str(&format!("<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"{}\"/>\n", x, y, stroke));
        }
    }

    fn sentiment_axis(&mut self, x: f64, anchor: &str, offset: f64) {
        for tick in [-1.0, -0.5, 0.0, 0.5, 1.0] {
            let y = sentiment_y(tick);
            self.text(x + offset, y + 4.0, anchor, 11, &format!("{:.1}", tick));
        }
    }

    fn finish(mut self) -> String {
        self.body.push_str("</svg>\n");
        self.body
    }
}

impl SvgRenderer {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn trend_svg(chart: &TrendChart) -> String {
        let mut canvas = Canvas::new(&chart.title());
        let left = MARGIN_LEFT;
        let right = WIDTH - MARGIN_RIGHT;
        let bottom = MARGIN_TOP + plot_height();
        let max_count = chart.days.iter().map(|d| d.count).max().unwrap_or(0).max(1) as f64;
        let slot = plot_width() / chart.days.len().max(1) as f64;
        let bar_width = slot * 0.6;

        canvas.line(left, MARGIN_TOP, left, bottom, "#333", false);
        canvas.line(right, MARGIN_TOP, right, bottom, LINE_COLOR, false);
        canvas.line(left, bottom, right, bottom, "#333", false);
        canvas.line(left, sentiment_y(0.0), right, sentiment_y(0.0), "#999", true);

        for step in 0..=4 {
            let value = max_count * step as f64 / 4.0;
            let y = bottom - plot_height() * step as f64 / 4.0;
            canvas.text(left - 8.0, y + 4.0, "end", 11, &format!("{:.0}", value));
        }
        canvas.sentiment_axis(right, "start", 8.0);
        canvas.text(left, MARGIN_TOP - 12.0, "start", 12, "Articles");
        canvas.text(right, MARGIN_TOP - 12.0, "end", 12, "Mean sentiment");

        let mut points = Vec::with_capacity(chart.days.len());
        for (i, day) in chart.days.iter().enumerate() {
            let center = left + slot * (i as f64 + 0.5);
            let height = plot_height() * day.count as f64 / max_count;
            canvas.rect(center - bar_width / 2.0, bottom - height, bar_width, height, BAR_COLOR);
            canvas.slanted_text(center, bottom + 16.0, &day.date.format("%Y-%m-%d").to_string());
            points.push((center, sentiment_y(day.mean_sentiment)));
        }
        canvas.polyline(&points, LINE_COLOR);

        canvas.finish()
    }

    fn keywords_svg(chart: &KeywordChart) -> String {
        let mut canvas = Canvas::new(&chart.title());
        let left = MARGIN_LEFT;
        let right = WIDTH - MARGIN_RIGHT;
        let zero = sentiment_y(0.0);
        let slot = plot_width() / chart.bars.len().max(1) as f64;
        let bar_width = slot * 0.6;

        canvas.line(left, MARGIN_TOP, left, MARGIN_TOP + plot_height(), "#333", false);
        canvas.line(left, zero, right, zero, "#333", false);
        canvas.sentiment_axis(left, "end", -8.0);

        for (i, bar) in chart.bars.iter().enumerate() {
            let center = left + slot * (i as f64 + 0.5);
            let y = sentiment_y(bar.mean_sentiment);
            let (top, height) = if y < zero { (y, zero - y) } else { (zero, y - zero) };
            let color = if bar.mean_sentiment >= 0.0 { POSITIVE_COLOR } else { NEGATIVE_COLOR };
            canvas.rect(center - bar_width / 2.0, top, bar_width, height, color);

            let label_y = if bar.mean_sentiment >= 0.0 { top - 6.0 } else { top + height + 14.0 };
            canvas.text(center, label_y, "middle", 12, &format!("{:.3}", bar.mean_sentiment));
            canvas.slanted_text(center, MARGIN_TOP + plot_height() + 16.0, &bar.keyword);
        }

        canvas.finish()
    }

    fn write(&self, prefix: &str, svg: String) -> Result<PathBuf> {
        let path = output_path(&self.dir, prefix, "svg")?;
        fs::write(&path, svg)?;
        info!("📊 Chart saved to {}", path.display());
        Ok(path)
    }
}

impl ChartRenderer for SvgRenderer {
    fn name(&self) -> &str {
        "svg"
    }

    fn render_trend(&self, chart: &TrendChart) -> Result<PathBuf> {
        self.write("trend", Self::trend_svg(chart))
    }

    fn render_keywords(&self, chart: &KeywordChart) -> Result<PathBuf> {
        self.write("keywords", Self::keywords_svg(chart))
    }
}
