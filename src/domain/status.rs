use chrono::{DateTime, TimeDelta, Utc};

use crate::entities::lost_documents::DocumentStatus;

/// Longest archive duration honoured. Larger stored values are treated as
/// this many days, which keeps every derived instant a four-digit year.
pub const MAX_ARCHIVE_DAYS: i64 = 36_500;

fn archive_span(archive_days: i64) -> TimeDelta {
    TimeDelta::try_days(archive_days.clamp(0, MAX_ARCHIVE_DAYS)).unwrap_or(TimeDelta::MAX)
}

/// Moment at which a letter reported at `report_date` becomes archived.
#[must_use]
pub fn archives_at(report_date: DateTime<Utc>, archive_days: i64) -> DateTime<Utc> {
    report_date
        .checked_add_signed(archive_span(archive_days))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Letters reported strictly before this instant are archived.
#[must_use]
pub fn archive_cutoff(now: DateTime<Utc>, archive_days: i64) -> DateTime<Utc> {
    now.checked_sub_signed(archive_span(archive_days))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[must_use]
pub fn derive_status(
    report_date: DateTime<Utc>,
    now: DateTime<Utc>,
    archive_days: i64,
) -> DocumentStatus {
    if now > archives_at(report_date, archive_days) {
        DocumentStatus::Archived
    } else {
        DocumentStatus::Issued
    }
}
