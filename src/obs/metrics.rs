// self
use crate::obs::RefreshOutcome;

/// Records a refresh outcome via the global metrics recorder and tracing subscriber (when
/// enabled).
pub fn record_refresh_outcome(outcome: RefreshOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("oauth2_notify_refresh_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(feature = "tracing")]
	{
		tracing::debug!(outcome = outcome.as_str(), "token source outcome");
	}

	#[cfg(not(any(feature = "metrics", feature = "tracing")))]
	{
		let _ = outcome;
	}
}
