//! Output emitters for trendwatch: CSV exports, SVG charts, and the HTML and
//! PDF reports.
//!
//! Every emitter works on an in-memory slice of [`Observation`]s and has no
//! knowledge of the store.

pub mod charts;
pub mod csv_export;
pub mod error;
pub mod html;
pub mod pdf;

mod svg;

use std::path::Path;

use trendwatch_core::Observation;

pub use charts::{render_charts, write_charts, Chart};
pub use csv_export::{export_csv, write_csv, CSV_HEADER};
pub use error::ReportError;
pub use html::{default_report_name, render_html_report, write_html_report, ReportMetrics};
pub use pdf::{default_pdf_report_name, render_pdf_report, write_pdf_report};

/// Observations ordered by combined score, highest first, keeping at most `n`.
///
/// Ties keep their input order.
#[must_use]
pub fn top_observations(observations: &[Observation], n: usize) -> Vec<&Observation> {
    let mut ranked: Vec<&Observation> = observations.iter().collect();
    ranked.sort_by(|a, b| b.combined_score().total_cmp(&a.combined_score()));
    ranked.truncate(n);
    ranked
}

/// Count occurrences of each key in first-seen order.
pub(crate) fn count_in_order<'a, I>(keys: I) -> Vec<(&'a str, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key, 1)),
        }
    }
    counts
}

pub(crate) fn ensure_dir(dir: &Path) -> Result<(), ReportError> {
    std::fs::create_dir_all(dir).map_err(|e| ReportError::io(dir, e))
}

/// Truncate to at most `max` characters.
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
