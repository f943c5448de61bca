use chrono::{DateTime, Months, TimeZone, Utc};
use log::warn;

const SECONDS_PER_APPROX_MONTH: i64 = 30 * 24 * 60 * 60;

/// The instant `months` calendar months before `now`.
///
/// Calendar subtraction clamps to the last day of shorter months
/// (31 March minus one month is 28/29 February). If the result falls outside
/// chrono's representable range, 30-day months are used instead.
pub fn months_ago(now: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    match now.checked_sub_months(Months::new(months)) {
        Some(cutoff) => cutoff,
        None => {
            warn!(
                "calendar subtraction of {} months out of range, approximating with 30-day months",
                months
            );
            let seconds = now
                .timestamp()
                .saturating_sub(SECONDS_PER_APPROX_MONTH * i64::from(months));
            Utc.timestamp_opt(seconds, 0)
                .single()
                .unwrap_or(DateTime::<Utc>::MIN_UTC)
        }
    }
}

/// Whether a commit time lies strictly before the cutoff.
pub fn is_older_than(commit_time: i64, cutoff: DateTime<Utc>) -> bool {
    commit_time < cutoff.timestamp()
}
