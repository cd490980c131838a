//! CSV export of observations.

use std::io::Write;
use std::path::Path;

use trendwatch_core::Observation;

use crate::error::ReportError;

pub const CSV_HEADER: &str =
    "Keyword,Platform,Category,Volume,Sentiment Score,Engagement Score,Timestamp";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Write the header and one row per observation to `out`.
///
/// Every field is quoted, so the keyword always is. Commas inside the
/// keyword are replaced with semicolons.
///
/// # Errors
///
/// Returns [`ReportError::Csv`] if a row cannot be written.
pub fn write_csv<W: Write>(out: W, observations: &[Observation]) -> Result<usize, ReportError> {
    let mut out = out;
    writeln!(out, "{CSV_HEADER}").map_err(csv::Error::from)?;

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(out);

    for obs in observations {
        writer.write_record([
            obs.keyword.replace(',', ";"),
            obs.platform.as_str().to_string(),
            obs.category.clone(),
            obs.volume.to_string(),
            obs.sentiment_score.to_string(),
            obs.engagement_score.to_string(),
            obs.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        ])?;
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(observations.len())
}

/// Export observations to a CSV file at `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the file cannot be created and
/// [`ReportError::Csv`] if writing fails.
pub fn export_csv(path: &Path, observations: &[Observation]) -> Result<usize, ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        crate::ensure_dir(parent)?;
    }
    let file = std::fs::File::create(path).map_err(|e| ReportError::io(path, e))?;
    let written = write_csv(std::io::BufWriter::new(file), observations)?;

    tracing::info!(path = %path.display(), rows = written, "exported trends to CSV");
    Ok(written)
}
