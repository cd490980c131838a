//! Payload parsing for the Google Trends widget API.

use serde::Deserialize;

use crate::error::SourceError;

/// Identifier of the interest-over-time widget in an explore response.
pub(crate) const TIMESERIES_WIDGET: &str = "TIMESERIES";

#[derive(Debug, Deserialize)]
pub(crate) struct ExploreResponse {
    #[serde(default)]
    pub(crate) widgets: Vec<Widget>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Widget {
    pub(crate) id: String,
    pub(crate) token: Option<String>,
    pub(crate) request: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MultilineResponse {
    pub(crate) default: MultilineData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MultilineData {
    #[serde(default)]
    pub(crate) timeline_data: Vec<TimelinePoint>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TimelinePoint {
    #[serde(default)]
    pub(crate) value: Vec<i64>,
}

/// Reduced view of one keyword's interest series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SeriesSummary {
    /// Truncated arithmetic mean.
    pub(crate) mean: i64,
    pub(crate) max: i64,
    /// Last sample strictly above the first.
    pub(crate) rising: bool,
}

/// Drop the anti-JSON-hijacking prefix (`)]}'`) Google puts before payloads.
pub(crate) fn strip_xssi_prefix(body: &str) -> &str {
    body.find('{').map_or(body, |start| &body[start..])
}

pub(crate) fn parse_payload<T: serde::de::DeserializeOwned>(
    body: &str,
    context: &str,
) -> Result<T, SourceError> {
    serde_json::from_str(strip_xssi_prefix(body)).map_err(|e| SourceError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

/// Pull the `(token, request)` pair of the interest-over-time widget.
pub(crate) fn timeseries_widget(
    explore: ExploreResponse,
) -> Result<(String, serde_json::Value), SourceError> {
    let widget = explore
        .widgets
        .into_iter()
        .find(|w| w.id == TIMESERIES_WIDGET)
        .ok_or_else(|| SourceError::UnexpectedPayload("no TIMESERIES widget".to_string()))?;

    match (widget.token, widget.request) {
        (Some(token), Some(request)) => Ok((token, request)),
        _ => Err(SourceError::UnexpectedPayload(
            "TIMESERIES widget without token or request".to_string(),
        )),
    }
}

/// Values of the `index`-th compared keyword, in time order.
pub(crate) fn series_for(points: &[TimelinePoint], index: usize) -> Vec<i64> {
    points
        .iter()
        .filter_map(|p| p.value.get(index).copied())
        .collect()
}

pub(crate) fn summarize_series(series: &[i64]) -> Option<SeriesSummary> {
    let first = *series.first()?;
    let last = *series.last()?;
    let max = series.iter().copied().max()?;
    let len = i64::try_from(series.len()).ok()?;
    let mean = series.iter().sum::<i64>() / len;

    Some(SeriesSummary {
        mean,
        max,
        rising: last > first,
    })
}
