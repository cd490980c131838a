//! SVG chart rendering.

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::path::{Path, PathBuf};

use trendwatch_core::Observation;

use crate::error::ReportError;
use crate::svg::{color, Svg};
use crate::{count_in_order, top_observations, truncate_chars};

pub const SENTIMENT_BINS: usize = 20;
pub const TOP_TRENDS_IN_CHART: usize = 15;
const KEYWORD_LABEL_CHARS: usize = 50;

/// One rendered chart, ready to be written or embedded.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: &'static str,
    pub file_name: &'static str,
    pub svg: String,
}

/// Render the full chart set for a report, in display order.
#[must_use]
pub fn render_charts(observations: &[Observation]) -> Vec<Chart> {
    vec![
        Chart {
            title: "Category Distribution",
            file_name: "category_distribution.svg",
            svg: category_pie(observations),
        },
        Chart {
            title: "Platform Comparison",
            file_name: "platform_comparison.svg",
            svg: platform_bars(observations),
        },
        Chart {
            title: "Sentiment Distribution",
            file_name: "sentiment_distribution.svg",
            svg: sentiment_histogram(observations),
        },
        Chart {
            title: "Top Trends",
            file_name: "top_trends.svg",
            svg: top_trends_bars(observations),
        },
    ]
}

/// Write each chart into `dir`, creating it if needed. Returns the paths in
/// chart order.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the directory or a file cannot be written.
pub fn write_charts(dir: &Path, charts: &[Chart]) -> Result<Vec<PathBuf>, ReportError> {
    crate::ensure_dir(dir)?;
    charts
        .iter()
        .map(|chart| {
            let path = dir.join(chart.file_name);
            std::fs::write(&path, &chart.svg).map_err(|e| ReportError::io(&path, e))?;
            tracing::debug!(chart = chart.title, path = %path.display(), "chart written");
            Ok(path)
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn category_pie(observations: &[Observation]) -> String {
    let mut svg = Svg::new(720, 420, "Trend Distribution by Category");
    let counts = count_in_order(observations.iter().map(|o| o.category.as_str()));
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    if total == 0 {
        no_data(&mut svg, 360.0, 220.0);
        return svg.finish();
    }

    let (cx, cy, r) = (210.0, 225.0, 165.0);
    let mut start = -FRAC_PI_2;
    for (i, (label, count)) in counts.iter().enumerate() {
        let share = *count as f64 / total as f64;
        let fill = color(i);

        if counts.len() == 1 {
            svg.raw(&format!(
                r##"<circle cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" fill="{fill}" stroke="#fff"/>"##
            ));
        } else {
            let end = start + share * TAU;
            let (x0, y0) = (cx + r * start.cos(), cy + r * start.sin());
            let (x1, y1) = (cx + r * end.cos(), cy + r * end.sin());
            let large_arc = u8::from(end - start > PI);
            svg.raw(&format!(
                r##"<path d="M {cx:.1} {cy:.1} L {x0:.2} {y0:.2} A {r:.1} {r:.1} 0 {large_arc} 1 {x1:.2} {y1:.2} Z" fill="{fill}" stroke="#fff"/>"##
            ));
            start = end;
        }

        let ly = 80.0 + 26.0 * i as f64;
        svg.rect(410.0, ly - 12.0, 14.0, 14.0, fill);
        svg.text(
            432.0,
            ly,
            &format!("{label}: {count} ({:.1}%)", share * 100.0),
            "font-size=\"13\"",
        );
    }

    svg.finish()
}

#[allow(clippy::cast_precision_loss)]
fn platform_bars(observations: &[Observation]) -> String {
    let mut svg = Svg::new(600, 400, "Trends by Platform");
    let counts = count_in_order(observations.iter().map(|o| o.platform.as_str()));
    if counts.is_empty() {
        no_data(&mut svg, 300.0, 200.0);
        return svg.finish();
    }

    let (left, top, plot_w, plot_h) = (70.0, 60.0, 490.0, 270.0);
    let baseline = top + plot_h;
    let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(1).max(1) as f64;
    let slot = plot_w / counts.len() as f64;
    let bar_w = slot * 0.6;

    axes(&mut svg, left, top, plot_w, plot_h);
    svg.text(
        20.0,
        top + plot_h / 2.0,
        "Number of Trends",
        "font-size=\"12\" text-anchor=\"middle\" transform=\"rotate(-90 20 195)\"",
    );

    for (i, (platform, count)) in counts.iter().enumerate() {
        let h = *count as f64 / max * plot_h;
        let x = left + slot * i as f64 + (slot - bar_w) / 2.0;
        svg.rect(x, baseline - h, bar_w, h, color(i));
        svg.text(
            x + bar_w / 2.0,
            baseline - h - 6.0,
            &count.to_string(),
            "font-size=\"13\" text-anchor=\"middle\"",
        );
        svg.text(
            x + bar_w / 2.0,
            baseline + 20.0,
            platform,
            "font-size=\"12\" text-anchor=\"middle\"",
        );
    }

    svg.finish()
}

/// Bucket scores into [`SENTIMENT_BINS`] equal bins over `[-1, 1]`.
///
/// The last bin is closed on the right, so `1.0` lands in it.
#[must_use]
pub fn sentiment_bins(scores: impl IntoIterator<Item = f64>) -> [usize; SENTIMENT_BINS] {
    let mut bins = [0usize; SENTIMENT_BINS];
    for score in scores {
        let clamped = score.clamp(-1.0, 1.0);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let index = (((clamped + 1.0) / 2.0 * SENTIMENT_BINS as f64).floor() as usize)
            .min(SENTIMENT_BINS - 1);
        bins[index] += 1;
    }
    bins
}

#[allow(clippy::cast_precision_loss)]
fn sentiment_histogram(observations: &[Observation]) -> String {
    let mut svg = Svg::new(640, 400, "Sentiment Score Distribution");
    let bins = sentiment_bins(observations.iter().map(|o| o.sentiment_score));

    let (left, top, plot_w, plot_h) = (60.0, 60.0, 540.0, 270.0);
    let baseline = top + plot_h;
    let max = bins.iter().copied().max().unwrap_or(0).max(1) as f64;
    let bin_w = plot_w / SENTIMENT_BINS as f64;

    axes(&mut svg, left, top, plot_w, plot_h);
    for (i, count) in bins.iter().enumerate() {
        if *count == 0 {
            continue;
        }
        let h = *count as f64 / max * plot_h;
        svg.rect(left + bin_w * i as f64, baseline - h, bin_w, h, "#87ceeb");
    }

    for tick in [-1.0_f64, -0.5, 0.0, 0.5, 1.0] {
        let x = left + (tick + 1.0) / 2.0 * plot_w;
        svg.text(
            x,
            baseline + 18.0,
            &format!("{tick:.1}"),
            "font-size=\"11\" text-anchor=\"middle\"",
        );
    }
    svg.text(
        left + plot_w / 2.0,
        baseline + 40.0,
        "Sentiment Score",
        "font-size=\"12\" text-anchor=\"middle\"",
    );

    let neutral_x = left + plot_w / 2.0;
    svg.line(
        neutral_x,
        top,
        neutral_x,
        baseline,
        r#"stroke="red" stroke-width="1.5" stroke-dasharray="6 4""#,
    );
    svg.line(
        left + plot_w - 90.0,
        top + 10.0,
        left + plot_w - 66.0,
        top + 10.0,
        r#"stroke="red" stroke-width="1.5" stroke-dasharray="6 4""#,
    );
    svg.text(left + plot_w - 60.0, top + 14.0, "Neutral", "font-size=\"12\"");

    svg.finish()
}

#[allow(clippy::cast_precision_loss)]
fn top_trends_bars(observations: &[Observation]) -> String {
    let top = top_observations(observations, TOP_TRENDS_IN_CHART);
    let rows = top.len().max(1);
    let height = 80 + 26 * u32::try_from(rows).unwrap_or(1);
    let mut svg = Svg::new(
        820,
        height,
        &format!("Top {TOP_TRENDS_IN_CHART} Trending Topics"),
    );
    if top.is_empty() {
        no_data(&mut svg, 410.0, 70.0);
        return svg.finish();
    }

    let (label_right, bar_left, bar_max) = (330.0, 340.0, 400.0);
    let max = top
        .iter()
        .map(|o| o.combined_score())
        .fold(0.0_f64, f64::max);
    let scale = if max > 0.0 { bar_max / max } else { 0.0 };
    let last = top.len().saturating_sub(1).max(1) as f64;

    for (i, obs) in top.iter().enumerate() {
        let y = 50.0 + 26.0 * i as f64;
        let score = obs.combined_score();
        let w = (score * scale).max(0.0);
        // Warm at the top of the ranking, cool at the bottom.
        let warmth = 1.0 - i as f64 / last;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (red, blue) = (
            (80.0 + 170.0 * warmth) as u8,
            (250.0 - 170.0 * warmth) as u8,
        );
        svg.rect(bar_left, y, w, 20.0, &format!("#{red:02x}70{blue:02x}"));
        svg.text(
            label_right,
            y + 15.0,
            truncate_chars(&obs.keyword, KEYWORD_LABEL_CHARS),
            "font-size=\"11\" text-anchor=\"end\"",
        );
        svg.text(
            bar_left + w + 6.0,
            y + 15.0,
            &format!("{score:.0}"),
            "font-size=\"11\"",
        );
    }
    svg.text(
        bar_left + bar_max / 2.0,
        f64::from(height) - 8.0,
        "Engagement Score",
        "font-size=\"12\" text-anchor=\"middle\"",
    );

    svg.finish()
}

fn axes(svg: &mut Svg, left: f64, top: f64, w: f64, h: f64) {
    let axis = r##"stroke="#333" stroke-width="1""##;
    svg.line(left, top, left, top + h, axis);
    svg.line(left, top + h, left + w, top + h, axis);
}

fn no_data(svg: &mut Svg, x: f64, y: f64) {
    svg.text(
        x,
        y,
        "No data",
        "font-size=\"14\" fill=\"#777\" text-anchor=\"middle\"",
    );
}
