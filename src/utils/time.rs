use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// Start of the UTC day `days` days before `now`'s day. Windows reaching
/// past the calendar start at its first day.
pub fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    let date = Duration::try_days(days.max(0))
        .and_then(|span| now.date_naive().checked_sub_signed(span))
        .unwrap_or(NaiveDate::MIN);
    start_of_day(date)
}

/// `now` minus `days` whole days, saturating at the earliest instant.
pub fn days_before(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    Duration::try_days(days.max(0))
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_ago_truncates_to_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 15, 42, 7).unwrap();
        assert_eq!(days_ago(now, 0), Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap());
        assert_eq!(days_ago(now, 7), Utc.with_ymd_and_hms(2024, 3, 3, 0, 0, 0).unwrap());
        assert_eq!(days_ago(now, -2), days_ago(now, 0));
    }

    #[test]
    fn huge_windows_saturate_instead_of_overflowing() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 15, 42, 7).unwrap();
        assert_eq!(days_ago(now, i64::MAX).date_naive(), NaiveDate::MIN);
        assert_eq!(days_before(now, i64::MAX), DateTime::<Utc>::MIN_UTC);
        assert_eq!(days_before(now, 1), now - Duration::days(1));
    }
}
