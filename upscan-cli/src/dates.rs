//! `YYYY-MM-DD` command-line dates to zone-aware timestamps.
//!
//! `--since` is the start of the local day, `--until` the last second of it.

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use upscan_ingest::DateWindow;

pub fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date {s:?} (expected YYYY-MM-DD)"))
}

fn at(date: NaiveDate, time: NaiveTime, tz: Tz) -> Result<DateTime<FixedOffset>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.fixed_offset())
        .ok_or_else(|| anyhow!("{date} {time} does not exist in {tz}"))
}

pub fn day_start(date: NaiveDate, tz: Tz) -> Result<DateTime<FixedOffset>> {
    at(date, NaiveTime::MIN, tz)
}

pub fn day_end(date: NaiveDate, tz: Tz) -> Result<DateTime<FixedOffset>> {
    let end = NaiveTime::from_hms_opt(23, 59, 59).context("end of day")?;
    at(date, end, tz)
}

/// Blank inputs mean an open bound
pub fn window(since: Option<&str>, until: Option<&str>, tz: Tz) -> Result<DateWindow> {
    fn nonblank(s: Option<&str>) -> Option<&str> {
        s.filter(|s| !s.trim().is_empty())
    }

    let since = nonblank(since)
        .map(|s| parse_day(s).and_then(|d| day_start(d, tz)))
        .transpose()?;
    let until = nonblank(until)
        .map(|s| parse_day(s).and_then(|d| day_end(d, tz)))
        .transpose()?;

    if let (Some(s), Some(u)) = (since, until) {
        if s > u {
            bail!("--since ({}) is after --until ({})", s.date_naive(), u.date_naive());
        }
    }

    Ok(DateWindow::new(since, until))
}
