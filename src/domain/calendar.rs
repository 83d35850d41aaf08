//! Calendar boundaries in the office timezone, expressed as UTC instants.
//!
//! Ranges are half-open: `[start, end)`.

use anyhow::Context;
use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

pub type Range = (DateTime<Utc>, DateTime<Utc>);

/// First instant of `date` in `tz`. When local midnight falls into a DST gap
/// the first valid instant an hour later is used.
#[must_use]
pub fn local_midnight(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);

    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(naive + chrono::Duration::hours(1)))
                .earliest()
        })
        .map_or_else(
            || Utc.from_utc_datetime(&naive),
            |local| local.with_timezone(&Utc),
        )
}

#[must_use]
pub fn local_date(tz: Tz, at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&tz).date_naive()
}

pub fn day_range(tz: Tz, date: NaiveDate) -> anyhow::Result<Range> {
    let next = date
        .checked_add_days(Days::new(1))
        .context("Date out of range")?;
    Ok((local_midnight(tz, date), local_midnight(tz, next)))
}

pub fn month_range(tz: Tz, year: i32, month: u32) -> anyhow::Result<Range> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .with_context(|| format!("Invalid month {year}-{month}"))?;
    let next = first
        .checked_add_months(Months::new(1))
        .context("Date out of range")?;
    Ok((local_midnight(tz, first), local_midnight(tz, next)))
}

pub fn year_range(tz: Tz, year: i32) -> anyhow::Result<Range> {
    let first =
        NaiveDate::from_ymd_opt(year, 1, 1).with_context(|| format!("Invalid year {year}"))?;
    let next = first
        .with_year(year + 1)
        .context("Date out of range")?;
    Ok((local_midnight(tz, first), local_midnight(tz, next)))
}
