//! Median line over a standard deviation band, as inline SVG.

use chrono::{DateTime, Utc};
use dashboard_common::ForecastSpan;
use grid_stats::AggregateSeries;
use tracing::debug;

use crate::color::Color;
use crate::error::{RenderError, RenderResult};
use crate::html::{self, escape, format_number, px};

const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;
const Y_TICKS: usize = 5;
const MAX_X_TICKS: usize = 6;
const BAND_OPACITY: f64 = 0.5;

/// Everything about a chart except the data.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub y_label: String,
    pub x_label: String,
    pub width: u32,
    pub height: u32,
    pub band_color: Color,
    pub band_label: String,
    pub median_label: String,
}

impl ChartSpec {
    /// The dashboard chart for one variable: 800x500, empty x label.
    pub fn for_variable(variable: &str, display_name: &str, span: ForecastSpan, band_color: Color) -> Self {
        Self {
            title: format!(
                "Median and standard deviation of {} for the next {}",
                variable, span
            ),
            y_label: display_name.to_string(),
            x_label: String::new(),
            width: 800,
            height: 500,
            band_color,
            band_label: "standard deviation".to_string(),
            median_label: "median".to_string(),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Maps data coordinates into the plot rectangle.
struct Frame {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    t0: f64,
    t1: f64,
    y0: f64,
    y1: f64,
}

impl Frame {
    fn new(spec: &ChartSpec, series: &AggregateSeries) -> Self {
        let seconds: Vec<f64> = series.times.iter().map(epoch_seconds).collect();
        let (mut t0, mut t1) = (seconds[0], seconds[seconds.len() - 1]);
        if t1 <= t0 {
            t0 -= 3600.0;
            t1 += 3600.0;
        }

        let (mut y0, mut y1) = series.value_range().unwrap_or((0.0, 1.0));
        if y1 <= y0 {
            let pad = if y0 == 0.0 { 1.0 } else { y0.abs() * 0.05 };
            y0 -= pad;
            y1 += pad;
        } else {
            let pad = (y1 - y0) * 0.05;
            y0 -= pad;
            y1 += pad;
        }

        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: (spec.width as f64 - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (spec.height as f64 - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
            t0,
            t1,
            y0,
            y1,
        }
    }

    fn x(&self, time: &DateTime<Utc>) -> f64 {
        self.left + (epoch_seconds(time) - self.t0) / (self.t1 - self.t0) * self.width
    }

    fn y(&self, value: f64) -> f64 {
        self.top + (self.y1 - value) / (self.y1 - self.y0) * self.height
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }
}

fn epoch_seconds(time: &DateTime<Utc>) -> f64 {
    time.timestamp() as f64 + time.timestamp_subsec_millis() as f64 / 1000.0
}

/// Maximal runs of indices where `valid(i)` holds.
fn segments(len: usize, valid: impl Fn(usize) -> bool) -> Vec<Vec<usize>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for i in 0..len {
        if valid(i) {
            current.push(i);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Render the chart as a standalone SVG element.
pub fn render_chart_svg(spec: &ChartSpec, series: &AggregateSeries) -> RenderResult<String> {
    if series.is_empty() {
        return Err(RenderError::EmptySeries(series.variable.clone()));
    }
    let frame = Frame::new(spec, series);
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"chart\" width=\"{}\" height=\"{}\" font-family=\"sans-serif\">\n",
        spec.width, spec.height
    );

    // Title and axis labels
    svg.push_str(&format!(
        "<text class=\"title\" x=\"{}\" y=\"24\" font-size=\"14\" text-anchor=\"middle\">{}</text>\n",
        px(spec.width as f64 / 2.0),
        escape(&spec.title)
    ));
    svg.push_str(&format!(
        "<text class=\"y-label\" transform=\"translate(18,{}) rotate(-90)\" font-size=\"12\" text-anchor=\"middle\">{}</text>\n",
        px(frame.top + frame.height / 2.0),
        escape(&spec.y_label)
    ));
    if !spec.x_label.is_empty() {
        svg.push_str(&format!(
            "<text class=\"x-label\" x=\"{}\" y=\"{}\" font-size=\"12\" text-anchor=\"middle\">{}</text>\n",
            px(frame.left + frame.width / 2.0),
            px(spec.height as f64 - 8.0),
            escape(&spec.x_label)
        ));
    }

    push_axes(&mut svg, &frame, series);

    // Standard deviation band
    let n = series.len();
    svg.push_str(&format!(
        "<g class=\"band\" fill=\"{}\" fill-opacity=\"{}\" stroke=\"none\">\n",
        spec.band_color.to_hex(),
        BAND_OPACITY
    ));
    for run in segments(n, |i| series.low[i].is_finite() && series.high[i].is_finite()) {
        let upper = run
            .iter()
            .map(|&i| format!("{},{}", px(frame.x(&series.times[i])), px(frame.y(series.high[i]))));
        let lower = run
            .iter()
            .rev()
            .map(|&i| format!("{},{}", px(frame.x(&series.times[i])), px(frame.y(series.low[i]))));
        let points: Vec<String> = upper.chain(lower).collect();
        svg.push_str(&format!("<polygon points=\"{}\"/>\n", points.join(" ")));
    }
    svg.push_str("</g>\n");

    // Median line and per-point tooltips
    svg.push_str("<g class=\"median\" stroke=\"#000000\" stroke-width=\"2\" fill=\"none\">\n");
    for run in segments(n, |i| series.median[i].is_finite()) {
        let points: Vec<String> = run
            .iter()
            .map(|&i| format!("{},{}", px(frame.x(&series.times[i])), px(frame.y(series.median[i]))))
            .collect();
        svg.push_str(&format!("<polyline points=\"{}\"/>\n", points.join(" ")));
    }
    svg.push_str("</g>\n<g class=\"median-points\" fill=\"#000000\">\n");
    for i in 0..n {
        if !series.median[i].is_finite() {
            continue;
        }
        svg.push_str(&format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"2.5\"><title>{}: median {}, std {}</title></circle>\n",
            px(frame.x(&series.times[i])),
            px(frame.y(series.median[i])),
            series.times[i].format("%Y-%m-%d %H:%M UTC"),
            format_number(series.median[i]),
            format_number(series.std[i])
        ));
    }
    svg.push_str("</g>\n");

    push_legend(&mut svg, spec, &frame);
    svg.push_str("</svg>\n");

    debug!(variable = %series.variable, points = n, "Rendered chart");
    Ok(svg)
}

/// Render the chart wrapped in a complete HTML document.
pub fn render_chart_html(spec: &ChartSpec, series: &AggregateSeries) -> RenderResult<String> {
    let svg = render_chart_svg(spec, series)?;
    Ok(html::document(&spec.title, "", &svg))
}

fn push_axes(svg: &mut String, frame: &Frame, series: &AggregateSeries) {
    svg.push_str("<g class=\"axes\" stroke=\"#444444\" font-size=\"10\">\n");
    svg.push_str(&format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\"/>\n",
        px(frame.left),
        px(frame.top),
        px(frame.width),
        px(frame.height)
    ));

    for i in 0..Y_TICKS {
        let value = frame.y0 + (frame.y1 - frame.y0) * i as f64 / (Y_TICKS - 1) as f64;
        let y = px(frame.y(value));
        svg.push_str(&format!(
            "<line x1=\"{}\" y1=\"{y}\" x2=\"{}\" y2=\"{y}\" stroke-opacity=\"0.2\"/>\n",
            px(frame.left),
            px(frame.right()),
        ));
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{y}\" stroke=\"none\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            px(frame.left - 6.0),
            format_number(value),
        ));
    }

    let n = series.len();
    let ticks = n.min(MAX_X_TICKS);
    let mut last = None;
    for k in 0..ticks {
        let i = if ticks > 1 { k * (n - 1) / (ticks - 1) } else { 0 };
        if last == Some(i) {
            continue;
        }
        last = Some(i);
        let x = px(frame.x(&series.times[i]));
        svg.push_str(&format!(
            "<line x1=\"{x}\" y1=\"{}\" x2=\"{x}\" y2=\"{}\"/>\n",
            px(frame.bottom()),
            px(frame.bottom() + 4.0),
        ));
        svg.push_str(&format!(
            "<text x=\"{x}\" y=\"{}\" stroke=\"none\" text-anchor=\"middle\">{}</text>\n",
            px(frame.bottom() + 16.0),
            series.times[i].format("%b %d %H:%M"),
        ));
    }
    svg.push_str("</g>\n");
}

fn push_legend(svg: &mut String, spec: &ChartSpec, frame: &Frame) {
    let (box_w, box_h) = (160.0, 44.0);
    let x = frame.right() - box_w - 10.0;
    let y = frame.bottom() - box_h - 10.0;
    svg.push_str(&format!(
        "<g class=\"legend\" font-size=\"11\">\n<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#ffffff\" fill-opacity=\"0.85\" stroke=\"#cccccc\"/>\n",
        px(x),
        px(y),
        px(box_w),
        px(box_h)
    ));
    svg.push_str(&format!(
        "<rect x=\"{}\" y=\"{}\" width=\"16\" height=\"10\" fill=\"{}\" fill-opacity=\"{}\"/>\n<text x=\"{}\" y=\"{}\">{}</text>\n",
        px(x + 8.0),
        px(y + 8.0),
        spec.band_color.to_hex(),
        BAND_OPACITY,
        px(x + 30.0),
        px(y + 17.0),
        escape(&spec.band_label)
    ));
    svg.push_str(&format!(
        "<line x1=\"{}\" y1=\"{ly}\" x2=\"{}\" y2=\"{ly}\" stroke=\"#000000\" stroke-width=\"2\"/>\n<text x=\"{}\" y=\"{}\">{}</text>\n</g>\n",
        px(x + 8.0),
        px(x + 24.0),
        px(x + 30.0),
        px(y + 36.0),
        escape(&spec.median_label),
        ly = px(y + 32.0)
    ));
}
