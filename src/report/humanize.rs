use chrono::{DateTime, Utc};

const SEC_PER_MIN: u64 = 60;
const SEC_PER_HOUR: u64 = 60 * 60;
const SEC_PER_DAY: u64 = 60 * 60 * 24;

/// Age of `then` at `now`, e.g. `3.5 days`. Timestamps in the future count as zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn humanize_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = u64::try_from(now.signed_duration_since(then).num_seconds()).unwrap_or(0);
    let (unit_secs, unit) = if secs < SEC_PER_HOUR {
        (SEC_PER_MIN, "min")
    } else if secs < SEC_PER_DAY {
        (SEC_PER_HOUR, "hr")
    } else {
        (SEC_PER_DAY, "days")
    };
    format!("{:.1} {unit}", secs as f64 / unit_secs as f64)
}
