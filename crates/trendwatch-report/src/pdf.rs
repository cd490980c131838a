//! PDF report: the metrics table, the chart set drawn as native PDF shapes,
//! and the top-20 table.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rect, Rgb,
    path::PaintMode,
};
use trendwatch_core::Observation;

use crate::charts::{sentiment_bins, SENTIMENT_BINS, TOP_TRENDS_IN_CHART};
use crate::error::ReportError;
use crate::html::{ReportMetrics, TOP_TRENDS_IN_TABLE};
use crate::svg::PALETTE;
use crate::{count_in_order, top_observations, truncate_chars};

// US letter.
const PAGE_W: f32 = 215.9;
const PAGE_H: f32 = 279.4;
const MARGIN: f32 = 18.0;

const TITLE: &str = "Digital Marketing Trends Report";

/// `trend_report_YYYYMMDD_HHMMSS.pdf`
#[must_use]
pub fn default_pdf_report_name(now: DateTime<Utc>) -> String {
    format!("trend_report_{}.pdf", now.format("%Y%m%d_%H%M%S"))
}

/// Render the report document as PDF bytes.
///
/// # Errors
///
/// Returns [`ReportError::Pdf`] if the document cannot be assembled.
pub fn render_pdf_report(
    observations: &[Observation],
    metrics: &ReportMetrics,
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, ReportError> {
    let (doc, page, layer) = PdfDocument::new(TITLE, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_err)?;
    let first = doc.get_page(page).get_layer(layer);

    {
        let mut w = PageWriter {
            doc: &doc,
            layer: first,
            regular,
            bold,
            y: PAGE_H - MARGIN,
        };

        w.text(MARGIN, 22.0, true, TITLE);
        w.advance(9.0);
        w.text(
            MARGIN,
            10.0,
            false,
            &format!("Generated on {}", generated_at.format("%B %d, %Y")),
        );
        w.advance(12.0);

        metrics_section(&mut w, metrics);

        w.new_page();
        w.heading("Visual Analysis");
        category_chart(&mut w, observations);
        platform_chart(&mut w, observations);
        sentiment_chart(&mut w, observations);
        top_trends_chart(&mut w, observations);

        w.new_page();
        top_trends_table(&mut w, observations);
    }

    doc.save_to_bytes().map_err(pdf_err)
}

/// Render the PDF report and write it into `dir`. When `file_name` is `None`,
/// [`default_pdf_report_name`] is used.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the directory or file cannot be written, or
/// [`ReportError::Pdf`] if rendering fails.
pub fn write_pdf_report(
    dir: &Path,
    file_name: Option<&str>,
    observations: &[Observation],
    metrics: &ReportMetrics,
    generated_at: DateTime<Utc>,
) -> Result<PathBuf, ReportError> {
    crate::ensure_dir(dir)?;
    let name = file_name.map_or_else(|| default_pdf_report_name(generated_at), str::to_string);
    let path = dir.join(name);

    let bytes = render_pdf_report(observations, metrics, generated_at)?;
    std::fs::write(&path, bytes).map_err(|e| ReportError::io(&path, e))?;

    tracing::info!(path = %path.display(), trends = observations.len(), "PDF report written");
    Ok(path)
}

fn pdf_err(e: impl std::fmt::Display) -> ReportError {
    ReportError::Pdf(e.to_string())
}

struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Baseline of the next line, in mm from the page bottom.
    y: f32,
}

impl PageWriter<'_> {
    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_H - MARGIN;
    }

    /// Start a new page unless `height` mm still fit above the bottom margin.
    fn reserve(&mut self, height: f32) {
        if self.y - height < MARGIN {
            self.new_page();
        }
    }

    fn advance(&mut self, dy: f32) {
        self.y -= dy;
    }

    fn text(&self, x: f32, size: f32, bold: bool, content: &str) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.set_fill_color(black());
        self.layer
            .use_text(printable(content), size, Mm(x), Mm(self.y), font);
    }

    fn heading(&mut self, content: &str) {
        self.reserve(12.0);
        self.text(MARGIN, 15.0, true, content);
        self.advance(9.0);
    }

    fn bar(&self, x: f32, y: f32, w: f32, h: f32, fill: Color) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        self.layer.set_fill_color(fill);
        self.layer
            .add_rect(Rect::new(Mm(x), Mm(y), Mm(x + w), Mm(y + h)).with_mode(PaintMode::Fill));
    }
}

fn metrics_section(w: &mut PageWriter<'_>, metrics: &ReportMetrics) {
    w.heading("Key Metrics");

    let rows = [
        ("Total Trends Analyzed", metrics.total_trends.to_string()),
        (
            "Most Common Category",
            metrics
                .most_common_category
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
        ),
        (
            "Average Sentiment Score",
            format!("{:.2}", metrics.avg_sentiment),
        ),
        ("Platforms Monitored", metrics.platforms_monitored.to_string()),
        ("Report Period", metrics.period_label.clone()),
    ];

    w.bar(MARGIN, w.y - 2.0, 130.0, 7.0, rgb(0.5, 0.5, 0.5));
    w.text(MARGIN + 2.0, 11.0, true, "Metric");
    w.text(MARGIN + 80.0, 11.0, true, "Value");
    w.advance(8.0);
    for (label, value) in rows {
        w.text(MARGIN + 2.0, 10.0, false, label);
        w.text(MARGIN + 80.0, 10.0, false, &value);
        w.advance(7.0);
    }
}

/// Horizontal bars: label column, bar scaled to the largest value, value
/// caption after the bar.
#[allow(clippy::cast_precision_loss)]
fn hbars(w: &mut PageWriter<'_>, rows: &[(String, f64, String)], label_w: f32) {
    const BAR_MAX: f32 = 85.0;
    const ROW_H: f32 = 6.0;

    if rows.is_empty() {
        w.text(MARGIN + 4.0, 10.0, false, "No data");
        w.advance(ROW_H);
        return;
    }

    let max = rows.iter().map(|(_, v, _)| *v).fold(0.0_f64, f64::max);
    for (i, (label, value, caption)) in rows.iter().enumerate() {
        w.reserve(ROW_H);
        #[allow(clippy::cast_possible_truncation)]
        let len = if max > 0.0 {
            (value / max) as f32 * BAR_MAX
        } else {
            0.0
        };
        let x = MARGIN + label_w;
        w.text(MARGIN, 8.0, false, label);
        w.bar(x, w.y - 1.0, len, 4.0, palette(i));
        w.text(x + len + 2.0, 8.0, false, caption);
        w.advance(ROW_H);
    }
}

#[allow(clippy::cast_precision_loss)]
fn category_chart(w: &mut PageWriter<'_>, observations: &[Observation]) {
    w.heading("Category Distribution");
    let counts = count_in_order(observations.iter().map(|o| o.category.as_str()));
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    let rows: Vec<(String, f64, String)> = counts
        .iter()
        .map(|(label, n)| {
            let share = *n as f64 / total.max(1) as f64 * 100.0;
            ((*label).to_string(), *n as f64, format!("{n} ({share:.1}%)"))
        })
        .collect();
    hbars(w, &rows, 55.0);
    w.advance(6.0);
}

#[allow(clippy::cast_precision_loss)]
fn platform_chart(w: &mut PageWriter<'_>, observations: &[Observation]) {
    w.heading("Platform Comparison");
    let rows: Vec<(String, f64, String)> =
        count_in_order(observations.iter().map(|o| o.platform.as_str()))
            .into_iter()
            .map(|(label, n)| (label.to_string(), n as f64, n.to_string()))
            .collect();
    hbars(w, &rows, 55.0);
    w.advance(6.0);
}

#[allow(clippy::cast_precision_loss)]
fn sentiment_chart(w: &mut PageWriter<'_>, observations: &[Observation]) {
    const PLOT_W: f32 = 160.0;
    const PLOT_H: f32 = 45.0;

    w.heading("Sentiment Distribution");
    w.reserve(PLOT_H + 14.0);

    let bins = sentiment_bins(observations.iter().map(|o| o.sentiment_score));
    let max = bins.iter().copied().max().unwrap_or(0).max(1) as f32;
    let bin_w = PLOT_W / SENTIMENT_BINS as f32;
    let baseline = w.y - PLOT_H;

    w.bar(MARGIN, baseline - 0.3, PLOT_W, 0.3, black());
    for (i, count) in bins.iter().enumerate() {
        let h = *count as f32 / max * PLOT_H;
        w.bar(
            MARGIN + bin_w * i as f32 + 0.3,
            baseline,
            bin_w - 0.6,
            h,
            rgb(0.53, 0.81, 0.92),
        );
    }
    // Neutral marker at 0.0.
    w.bar(
        MARGIN + PLOT_W / 2.0 - 0.25,
        baseline,
        0.5,
        PLOT_H,
        rgb(0.9, 0.2, 0.2),
    );

    w.y = baseline - 5.0;
    for tick in [-1.0_f32, -0.5, 0.0, 0.5, 1.0] {
        let x = MARGIN + (tick + 1.0) / 2.0 * PLOT_W - 2.0;
        w.text(x, 8.0, false, &format!("{tick:.1}"));
    }
    w.advance(10.0);
}

fn top_trends_chart(w: &mut PageWriter<'_>, observations: &[Observation]) {
    w.heading(&format!("Top {TOP_TRENDS_IN_CHART} Trends by Engagement"));
    let rows: Vec<(String, f64, String)> = top_observations(observations, TOP_TRENDS_IN_CHART)
        .into_iter()
        .map(|o| {
            let score = o.combined_score();
            (
                truncate_chars(&o.keyword, 50).to_string(),
                score,
                format!("{:.0}", score.trunc()),
            )
        })
        .collect();
    hbars(w, &rows, 72.0);
}

fn top_trends_table(w: &mut PageWriter<'_>, observations: &[Observation]) {
    const COLUMNS: [(f32, &str); 5] = [
        (0.0, "Rank"),
        (12.0, "Keyword"),
        (80.0, "Category"),
        (125.0, "Platform"),
        (155.0, "Score"),
    ];

    w.heading(&format!("Top {TOP_TRENDS_IN_TABLE} Marketing Trends"));

    w.bar(MARGIN, w.y - 2.0, 175.0, 6.5, rgb(0.5, 0.5, 0.5));
    for (dx, header) in COLUMNS {
        w.text(MARGIN + dx + 1.0, 9.0, true, header);
    }
    w.advance(7.0);

    for (idx, obs) in top_observations(observations, TOP_TRENDS_IN_TABLE)
        .into_iter()
        .enumerate()
    {
        w.reserve(6.0);
        if idx % 2 == 1 {
            w.bar(MARGIN, w.y - 1.8, 175.0, 5.5, rgb(0.9, 0.9, 0.9));
        }
        let cells = [
            (idx + 1).to_string(),
            truncate_chars(&obs.keyword, 40).to_string(),
            truncate_chars(&obs.category, 20).to_string(),
            obs.platform.as_str().to_string(),
            format!("{:.0}", obs.combined_score().trunc()),
        ];
        for ((dx, _), cell) in COLUMNS.iter().zip(cells.iter()) {
            w.text(MARGIN + dx + 1.0, 8.0, false, cell);
        }
        w.advance(6.0);
    }
}

fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn black() -> Color {
    rgb(0.0, 0.0, 0.0)
}

fn palette(index: usize) -> Color {
    let hex = PALETTE[index % PALETTE.len()].trim_start_matches('#');
    let channel = |at: usize| {
        hex.get(at..at + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .map_or(0.5, |v| f32::from(v) / 255.0)
    };
    rgb(channel(0), channel(2), channel(4))
}

/// Non-ASCII characters become `?`. The built-in fonts carry no glyphs for them.
fn printable(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '?' })
        .collect()
}
