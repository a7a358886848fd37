use crate::error::ReporterError;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

/// How the current-month window is closed. Storage metrics such as S3
/// BucketSizeBytes are reported once per day, so their window runs to the end
/// of today; request-style metrics stop at the invocation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurrentWindowEnd {
    Now,
    EndOfToday,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Window length in seconds, rounded up to the next minute. CloudWatch
    /// requires the period to be a multiple of 60, and a period covering the
    /// whole window yields one datapoint per statistic.
    pub fn period_seconds(&self) -> i64 {
        let seconds = (self.end - self.start).num_seconds().max(60);
        (seconds + 59) / 60 * 60
    }

    pub fn end_label(&self) -> String {
        self.end.format("%d/%m/%Y").to_string()
    }
}

/// Current month-to-date paired with the previous full calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportWindows {
    pub current: TimeWindow,
    pub previous: TimeWindow,
}

/// Derives both reporting windows from the injected clock value. The previous
/// window ends exactly one second before the first instant of the current
/// month, so the two windows are contiguous and never overlap.
pub fn month_windows(
    now: DateTime<Utc>,
    end_mode: CurrentWindowEnd,
) -> Result<ReportWindows, ReporterError> {
    let current_start = month_start(now.year(), now.month())?;
    let current_end = match end_mode {
        CurrentWindowEnd::Now => now,
        CurrentWindowEnd::EndOfToday => day_end(now.year(), now.month(), now.day())?,
    };

    let (previous_year, previous_month) = if now.month() == 1 {
        (now.year() - 1, 12)
    } else {
        (now.year(), now.month() - 1)
    };
    let previous_start = month_start(previous_year, previous_month)?;
    let previous_end = current_start - Duration::seconds(1);

    Ok(ReportWindows {
        current: TimeWindow {
            start: current_start,
            end: current_end,
        },
        previous: TimeWindow {
            start: previous_start,
            end: previous_end,
        },
    })
}

fn month_start(year: i32, month: u32) -> Result<DateTime<Utc>, ReporterError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or(ReporterError::InvalidTime)
}

fn day_end(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>, ReporterError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(23, 59, 59))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or(ReporterError::InvalidTime)
}

#[cfg(test)]
mod tests {
    use crate::time_window::{month_windows, CurrentWindowEnd};
    use chrono::{DateTime, Duration, Utc};
    use std::str::FromStr;

    #[test]
    fn test_windows_mid_month() {
        let now = DateTime::<Utc>::from_str("2020-12-15T10:30:00.0+00:00").unwrap();
        let windows = month_windows(now, CurrentWindowEnd::Now).unwrap();

        assert_eq!(
            windows.current.start,
            DateTime::<Utc>::from_str("2020-12-01T00:00:00.0+00:00").unwrap()
        );
        assert_eq!(windows.current.end, now);
        assert_eq!(
            windows.previous.start,
            DateTime::<Utc>::from_str("2020-11-01T00:00:00.0+00:00").unwrap()
        );
        assert_eq!(
            windows.previous.end,
            DateTime::<Utc>::from_str("2020-11-30T23:59:59.0+00:00").unwrap()
        );
    }

    #[test]
    fn test_windows_end_of_today() {
        let now = DateTime::<Utc>::from_str("2021-02-03T08:00:00.0+00:00").unwrap();
        let windows = month_windows(now, CurrentWindowEnd::EndOfToday).unwrap();

        assert_eq!(
            windows.current.end,
            DateTime::<Utc>::from_str("2021-02-03T23:59:59.0+00:00").unwrap()
        );
    }

    #[test]
    fn test_windows_january_rolls_back_a_year() {
        let now = DateTime::<Utc>::from_str("2021-01-10T00:00:00.0+00:00").unwrap();
        let windows = month_windows(now, CurrentWindowEnd::Now).unwrap();

        assert_eq!(
            windows.previous.start,
            DateTime::<Utc>::from_str("2020-12-01T00:00:00.0+00:00").unwrap()
        );
        assert_eq!(
            windows.previous.end,
            DateTime::<Utc>::from_str("2020-12-31T23:59:59.0+00:00").unwrap()
        );
    }

    #[test]
    fn test_windows_are_contiguous_and_disjoint() {
        let now = DateTime::<Utc>::from_str("2020-03-20T12:00:00.0+00:00").unwrap();
        let windows = month_windows(now, CurrentWindowEnd::Now).unwrap();

        assert!(windows.previous.end < windows.current.start);
        assert_eq!(
            windows.previous.end + Duration::seconds(1),
            windows.current.start
        );
        assert!(windows.previous.start <= windows.previous.end);
        assert!(windows.current.start <= windows.current.end);
    }

    #[test]
    fn test_period_covers_window_in_whole_minutes() {
        let now = DateTime::<Utc>::from_str("2020-12-15T10:30:30.0+00:00").unwrap();
        let windows = month_windows(now, CurrentWindowEnd::Now).unwrap();

        assert_eq!(windows.current.period_seconds() % 60, 0);
        assert!(
            windows.current.period_seconds()
                >= (windows.current.end - windows.current.start).num_seconds()
        );
    }

    #[test]
    fn test_end_label_format() {
        let now = DateTime::<Utc>::from_str("2020-12-05T10:00:00.0+00:00").unwrap();
        let windows = month_windows(now, CurrentWindowEnd::Now).unwrap();

        assert_eq!(windows.previous.end_label(), "30/11/2020");
    }
}
