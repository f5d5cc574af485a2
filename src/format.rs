use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use std::time::{Duration, Instant};

pub const PREVIEW_CHARS: usize = 100;
pub const TOAST_LIFETIME: Duration = Duration::from_secs(3);

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Renders a backend date relative to `now`: `Today`, `Tomorrow`, `Yesterday`,
/// `N days ago`, or `Mon D` for dates further ahead.
///
/// The day difference is floored, so anything later today counts as `Today`
/// and anything earlier today as `Yesterday`. Unparsable input is returned as is.
pub fn relative_date(value: &str, now: DateTime<Utc>) -> String {
    let Some(date) = parse_date(value) else {
        return value.to_string();
    };

    let diff = (date - now).num_milliseconds().div_euclid(MILLIS_PER_DAY);
    match diff {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        days if days < 0 => format!("{} days ago", days.abs()),
        _ => date.format("%b %-d").to_string(),
    }
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// First [`PREVIEW_CHARS`] characters of `text`, with `...` appended only when
/// something was cut. Text of exactly that length is shown whole.
pub fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Header shown above the daily plan, e.g. `Sunday, October 18`.
pub fn plan_date(today: NaiveDate) -> String {
    today.format("%A, %B %-d").to_string()
}

/// Thousands-separated amount with at most two decimals, trailing zeros dropped.
pub fn grouped(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut out = String::with_capacity(whole.len() + whole.len() / 3 + 4);
    if negative && cents > 0 {
        out.push('-');
    }
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    if fraction > 0 {
        let decimals = format!("{fraction:02}");
        out.push('.');
        out.push_str(decimals.trim_end_matches('0'));
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub raised_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            raised_at: Instant::now(),
        }
    }

    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) < TOAST_LIFETIME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    #[test]
    fn relative_date_names_adjacent_days() {
        let now = noon();
        assert_eq!(relative_date("2026-10-18T12:00:00Z", now), "Today");
        assert_eq!(relative_date("2026-10-19T12:00:00Z", now), "Tomorrow");
        assert_eq!(relative_date("2026-10-17T12:00:00Z", now), "Yesterday");
        assert_eq!(relative_date("2026-10-14T12:00:00Z", now), "4 days ago");
    }

    #[test]
    fn relative_date_floors_partial_days() {
        let now = noon();
        assert_eq!(relative_date("2026-10-18T20:00:00Z", now), "Today");
        assert_eq!(relative_date("2026-10-18T11:00:00Z", now), "Yesterday");
        assert_eq!(relative_date("2026-10-18", now), "Yesterday");
    }

    #[test]
    fn relative_date_uses_short_month_further_ahead() {
        let now = noon();
        assert_eq!(relative_date("2026-10-25T09:30:00.000Z", now), "Oct 25");
        assert_eq!(relative_date("2026-12-01T12:00:00", now), "Dec 1");
    }

    #[test]
    fn relative_date_keeps_unparsable_input() {
        assert_eq!(relative_date("next sprint", noon()), "next sprint");
    }

    #[test]
    fn preview_cuts_only_past_the_limit() {
        let exact = "a".repeat(PREVIEW_CHARS);
        assert_eq!(preview(&exact), exact);

        let long = format!("{exact}b");
        assert_eq!(preview(&long), format!("{exact}..."));

        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        let text = "é".repeat(PREVIEW_CHARS + 5);
        let cut = preview(&text);
        assert_eq!(cut.chars().count(), PREVIEW_CHARS + 3);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn plan_date_spells_weekday_and_month() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(plan_date(today), "Sunday, October 18");
    }

    #[test]
    fn grouped_inserts_separators() {
        assert_eq!(grouped(0.0), "0");
        assert_eq!(grouped(950.0), "950");
        assert_eq!(grouped(125000.0), "125,000");
        assert_eq!(grouped(1234567.5), "1,234,567.5");
        assert_eq!(grouped(-4200.25), "-4,200.25");
    }

    #[test]
    fn toast_expires_after_three_seconds() {
        let toast = Toast::new("Data refreshed successfully!", ToastKind::Success);
        assert!(toast.is_visible_at(toast.raised_at));
        assert!(toast.is_visible_at(toast.raised_at + Duration::from_millis(2999)));
        assert!(!toast.is_visible_at(toast.raised_at + TOAST_LIFETIME));
    }
}
