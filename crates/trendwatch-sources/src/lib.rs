//! Trend collectors for trendwatch.
//!
//! Each source polls one external platform and turns the results into
//! [`Observation`]s. Failures are contained per call: a failed batch or
//! subreddit is logged, counted in the returned [`Collection`], and skipped.

pub mod error;
pub mod google_trends;
pub mod reddit;

mod timeline;

use std::time::Duration;

use async_trait::async_trait;
use trendwatch_core::Observation;

pub use error::SourceError;
pub use google_trends::{GoogleTrendsClient, GoogleTrendsSource, MAX_KEYWORDS_PER_BATCH};
pub use reddit::{RedditClient, RedditSource};

/// Items gathered by one source together with per-call outcome counts.
#[derive(Debug, Default, Clone)]
pub struct Collection {
    pub observations: Vec<Observation>,
    pub calls_succeeded: usize,
    pub calls_failed: usize,
}

impl Collection {
    /// True when calls were attempted and none succeeded.
    ///
    /// Distinguishes a dead upstream from a source that legitimately
    /// returned nothing.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.calls_succeeded == 0 && self.calls_failed > 0
    }

    pub fn merge(&mut self, other: Collection) {
        self.observations.extend(other.observations);
        self.calls_succeeded += other.calls_succeeded;
        self.calls_failed += other.calls_failed;
    }
}

/// A platform that can be polled for trend observations.
#[async_trait]
pub trait TrendSource: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Poll the platform. Never fails as a whole: per-call errors are logged
    /// and reflected in [`Collection::calls_failed`].
    async fn collect(&self) -> Collection;
}

/// Sleep between two external calls to respect upstream rate limits.
pub(crate) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use trendwatch_core::Platform;

    use super::*;

    #[test]
    fn all_failed_requires_attempts() {
        let empty = Collection::default();
        assert!(!empty.all_failed());

        let dead = Collection {
            observations: Vec::new(),
            calls_succeeded: 0,
            calls_failed: 3,
        };
        assert!(dead.all_failed());

        let partial = Collection {
            observations: Vec::new(),
            calls_succeeded: 1,
            calls_failed: 3,
        };
        assert!(!partial.all_failed());
    }

    #[test]
    fn merge_sums_counts() {
        let mut a = Collection {
            observations: vec![Observation::new("a", Platform::Reddit, 1)],
            calls_succeeded: 1,
            calls_failed: 0,
        };
        a.merge(Collection {
            observations: vec![Observation::new("b", Platform::GoogleTrends, 2)],
            calls_succeeded: 2,
            calls_failed: 1,
        });
        assert_eq!(a.observations.len(), 2);
        assert_eq!(a.calls_succeeded, 3);
        assert_eq!(a.calls_failed, 1);
    }
}
