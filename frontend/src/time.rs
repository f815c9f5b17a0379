use chrono::{DateTime, Local, NaiveDateTime, TimeDelta, TimeZone, Utc};
use std::fmt::Display;

/// Value format of `<input type="datetime-local">`
const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";
const INPUT_FORMAT_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

/// Relative phrase for an RFC 3339 time, e.g. `3 hours ago`. Unparsable input is returned as is.
pub fn from_now(time: &str) -> String {
    match DateTime::parse_from_rfc3339(time) {
        Ok(time) => relative(time.with_timezone(&Utc), Utc::now()),
        Err(_) => time.to_string(),
    }
}

pub fn relative(time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (time - now).num_seconds();
    let phrase = duration_phrase(seconds.unsigned_abs());
    if seconds > 0 {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

fn round_div(value: u64, divisor: u64) -> u64 {
    (value + divisor / 2) / divisor
}

fn duration_phrase(seconds: u64) -> String {
    let minutes = round_div(seconds, 60);
    let hours = round_div(seconds, 60 * 60);
    let days = round_div(seconds, 24 * 60 * 60);
    match seconds {
        0..45 => "a few seconds".to_string(),
        45..90 => "a minute".to_string(),
        _ if minutes < 45 => format!("{minutes} minutes"),
        _ if minutes < 90 => "an hour".to_string(),
        _ if hours < 22 => format!("{hours} hours"),
        _ if hours < 36 => "a day".to_string(),
        _ if days < 26 => format!("{days} days"),
        _ if days < 46 => "a month".to_string(),
        _ if days < 320 => format!("{} months", round_div(days, 30)),
        _ if days < 548 => "a year".to_string(),
        _ => format!("{} years", round_div(days, 365)),
    }
}

pub fn to_input_value(time: &str) -> String {
    to_input_value_in(time, &Local)
}

pub fn to_input_value_in<Tz: TimeZone>(time: &str, zone: &Tz) -> String
where
    Tz::Offset: Display,
{
    DateTime::parse_from_rfc3339(time)
        .map(|time| time.with_timezone(zone).format(INPUT_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn from_input_value(value: &str) -> Option<String> {
    from_input_value_in(value, &Local)
}

/// Converts an input value in `zone` back to RFC 3339 in UTC
pub fn from_input_value_in<Tz: TimeZone>(value: &str, zone: &Tz) -> Option<String> {
    let naive = NaiveDateTime::parse_from_str(value, INPUT_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, INPUT_FORMAT_SECONDS))
        .ok()?;
    let time = zone.from_local_datetime(&naive).earliest()?;
    Some(time.with_timezone(&Utc).to_rfc3339())
}

pub fn default_expiry(now: DateTime<Utc>) -> String {
    (now + TimeDelta::days(30)).to_rfc3339()
}

#[cfg(test)]
mod test {
    use super::{from_input_value_in, relative, to_input_value_in};
    use chrono::{DateTime, FixedOffset, TimeDelta, Utc};

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn ago(delta: TimeDelta) -> String {
        relative(now() - delta, now())
    }

    #[test]
    fn past_phrases() {
        assert_eq!(ago(TimeDelta::seconds(10)), "a few seconds ago");
        assert_eq!(ago(TimeDelta::seconds(50)), "a minute ago");
        assert_eq!(ago(TimeDelta::minutes(5)), "5 minutes ago");
        assert_eq!(ago(TimeDelta::minutes(50)), "an hour ago");
        assert_eq!(ago(TimeDelta::hours(3)), "3 hours ago");
        assert_eq!(ago(TimeDelta::hours(30)), "a day ago");
        assert_eq!(ago(TimeDelta::days(4)), "4 days ago");
        assert_eq!(ago(TimeDelta::days(30)), "a month ago");
        assert_eq!(ago(TimeDelta::days(90)), "3 months ago");
        assert_eq!(ago(TimeDelta::days(400)), "a year ago");
        assert_eq!(ago(TimeDelta::days(1100)), "3 years ago");
    }

    #[test]
    fn future_phrases() {
        assert_eq!(relative(now() + TimeDelta::days(2), now()), "in 2 days");
        assert_eq!(relative(now() + TimeDelta::seconds(5), now()), "in a few seconds");
    }

    #[test]
    fn input_value_uses_zone() {
        let zone = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            to_input_value_in("2024-05-01T10:00:00+00:00", &zone),
            "2024-05-01T12:00"
        );
        assert_eq!(to_input_value_in("garbage", &zone), "");
    }

    #[test]
    fn input_value_back_to_utc() {
        let zone = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            from_input_value_in("2024-05-01T12:00", &zone).as_deref(),
            Some("2024-05-01T10:00:00+00:00")
        );
        assert_eq!(
            from_input_value_in("2024-05-01T12:00:30", &zone).as_deref(),
            Some("2024-05-01T10:00:30+00:00")
        );
        assert_eq!(from_input_value_in("", &zone), None);
    }
}
