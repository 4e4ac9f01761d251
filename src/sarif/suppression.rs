use std::cmp::Reverse;

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, TimeZone, Utc, Weekday};
use tracing::warn;

use crate::issue::{DateSource, IgnoreDetails, SuppressionStatus};

use super::Suppression;

const DEFAULT_REASON: &str = "None given";

impl SuppressionStatus {
    /// `None` for a status string this converter does not know.
    pub fn from_sarif(status: Option<&str>) -> Option<Self> {
        match status {
            None | Some("accepted") => Some(SuppressionStatus::Accepted),
            Some("underReview") => Some(SuppressionStatus::UnderReview),
            Some("rejected") => Some(SuppressionStatus::Rejected),
            Some(_) => None,
        }
    }
}

/// Picks the suppression that decides the result's ignore state.
///
/// Priority is `Accepted > UnderReview > Rejected`; among equals the first
/// one listed wins. Suppressions with an unknown status are never picked.
pub fn highest_suppression(
    suppressions: &[Suppression],
) -> Option<(&Suppression, SuppressionStatus)> {
    suppressions
        .iter()
        .filter_map(|suppression| {
            SuppressionStatus::from_sarif(suppression.status.as_deref())
                .map(|status| (suppression, status))
        })
        .min_by_key(|(_, status)| Reverse(*status))
}

/// Returns whether the result counts as ignored, and the details of the deciding suppression.
pub fn ignore_details_from_suppressions(
    suppressions: &[Suppression],
) -> (bool, Option<IgnoreDetails>) {
    match highest_suppression(suppressions) {
        Some((suppression, status)) => (
            status == SuppressionStatus::Accepted,
            Some(to_ignore_details(suppression, status)),
        ),
        None => (false, None),
    }
}

fn to_ignore_details(suppression: &Suppression, status: SuppressionStatus) -> IgnoreDetails {
    let reason = if suppression.justification.trim().is_empty() {
        DEFAULT_REASON.to_string()
    } else {
        suppression.justification.clone()
    };
    let properties = &suppression.properties;
    let (expiration, expiration_source) = parse_expiration(properties.expiration.as_deref());
    let (ignored_on, ignored_on_source) = parse_date(&properties.ignored_on);
    IgnoreDetails {
        category: properties.category.clone(),
        reason,
        expiration,
        expiration_source,
        ignored_on,
        ignored_on_source,
        ignored_by: properties.ignored_by.name.clone(),
        status,
    }
}

fn parse_expiration(date: Option<&str>) -> (String, Option<DateSource>) {
    match date {
        None => (String::new(), None),
        Some(date) => {
            let (parsed, source) = parse_date(date);
            (parsed.to_rfc3339_opts(SecondsFormat::Secs, true), Some(source))
        }
    }
}

/// `Fri Feb 09 2024` style dates: three-letter weekday and month, two-digit
/// day, four-digit year. The weekday is not checked against the date.
fn parse_day_date(date: &str) -> Option<DateTime<FixedOffset>> {
    let fields: Vec<&str> = date.split(' ').collect();
    let [weekday, month, day, year] = fields.as_slice() else {
        return None;
    };
    let widths_match = [(weekday, 3), (month, 3), (day, 2), (year, 4)]
        .iter()
        .all(|(field, width)| field.len() == *width);
    if !widths_match || !day.bytes().chain(year.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    weekday.parse::<Weekday>().ok()?;
    let day = NaiveDate::parse_from_str(&date[4..], "%b %d %Y").ok()?;
    let midnight = day.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight).into())
}

/// Reads a suppression date, trying the day-name layout then RFC 3339. When
/// neither matches the current UTC time is used and the source says so.
pub fn parse_date(date: &str) -> (DateTime<FixedOffset>, DateSource) {
    if let Some(parsed) = parse_day_date(date) {
        return (parsed, DateSource::Parsed);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(date) {
        return (parsed, DateSource::Parsed);
    }
    if !date.is_empty() {
        warn!(date, "unrecognized suppression date, using current time");
    }
    (Utc::now().into(), DateSource::Fallback)
}
