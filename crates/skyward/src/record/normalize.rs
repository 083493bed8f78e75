//! Defaulting rules for optional post metadata.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use tracing::warn;

/// Language assumed when the caller gives none.
pub const DEFAULT_LANG: &str = "en";

/// MIME type assumed for images without an explicit one.
pub const DEFAULT_IMAGE_MIME_TYPE: &str = "image/jpeg";

/// A caller-supplied `createdAt` value.
///
/// Structured date-times are formatted by [`coerce_timestamp`]; raw strings
/// are passed through untouched so pre-formatted server timestamps survive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Timestamp {
    At(DateTime<Utc>),
    Raw(String),
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(value: DateTime<Tz>) -> Self {
        Timestamp::At(value.with_timezone(&Utc))
    }
}

impl From<String> for Timestamp {
    fn from(value: String) -> Self {
        Timestamp::Raw(value)
    }
}

impl From<&str> for Timestamp {
    fn from(value: &str) -> Self {
        Timestamp::Raw(value.to_string())
    }
}

/// Resolve a `createdAt` value.
///
/// Absent means now. Date-times are rendered as UTC with exactly three
/// fractional digits and a `Z` suffix (`2024-04-01T12:30:45.000Z`).
pub fn coerce_timestamp(value: Option<Timestamp>) -> String {
    match value {
        None => format_timestamp(Utc::now()),
        Some(Timestamp::At(at)) => format_timestamp(at),
        Some(Timestamp::Raw(raw)) => raw,
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Resolve the `langs` list: absent becomes `["en"]`, anything given
/// (including an empty list) is kept as-is.
pub fn coerce_langs(value: Option<Vec<String>>) -> Vec<String> {
    value.unwrap_or_else(|| vec![DEFAULT_LANG.to_string()])
}

/// Fit alt texts to `count` images, padding with empty strings.
///
/// Surplus entries are dropped.
pub fn normalize_alts<S: AsRef<str>>(alts: &[S], count: usize) -> Vec<String> {
    fit_to_count(alts, count, "", "alt text")
}

/// Fit MIME types to `count` images, padding with `image/jpeg`.
///
/// Surplus entries are dropped.
pub fn normalize_mime_types<S: AsRef<str>>(mime_types: &[S], count: usize) -> Vec<String> {
    fit_to_count(mime_types, count, DEFAULT_IMAGE_MIME_TYPE, "MIME type")
}

fn fit_to_count<S: AsRef<str>>(values: &[S], count: usize, fill: &str, what: &str) -> Vec<String> {
    if values.len() > count {
        warn!(
            given = values.len(),
            images = count,
            "dropping surplus {} entries",
            what
        );
    }

    values
        .iter()
        .map(|v| v.as_ref().to_string())
        .chain(std::iter::repeat_with(|| fill.to_string()))
        .take(count)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn langs_default_only_when_absent() {
        assert_eq!(coerce_langs(None), vec!["en"]);
        assert_eq!(coerce_langs(Some(vec![])), Vec::<String>::new());
        assert_eq!(
            coerce_langs(Some(vec!["en".into(), "ja".into()])),
            vec!["en", "ja"]
        );
    }

    #[test]
    fn structured_timestamp_is_formatted() {
        let at = Utc.with_ymd_and_hms(2024, 4, 1, 12, 30, 45).unwrap();
        let formatted = coerce_timestamp(Some(at.into()));
        assert!(formatted.starts_with("2024-04-01T12:30:45"));
        assert!(formatted.ends_with('Z'));
        assert_eq!(formatted, "2024-04-01T12:30:45.000Z");
    }

    #[test]
    fn offset_timestamp_is_converted_to_utc() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let at = offset.with_ymd_and_hms(2024, 4, 1, 14, 30, 45).unwrap();
        assert_eq!(coerce_timestamp(Some(at.into())), "2024-04-01T12:30:45.000Z");
    }

    #[test]
    fn raw_timestamp_passes_through() {
        assert_eq!(
            coerce_timestamp(Some("2024-04-01T10:00:00.000Z".into())),
            "2024-04-01T10:00:00.000Z"
        );
        assert_eq!(coerce_timestamp(Some("whenever".into())), "whenever");
    }

    #[test]
    fn absent_timestamp_is_now_with_millis() {
        let formatted = coerce_timestamp(None);
        assert!(formatted.ends_with('Z'));
        // YYYY-MM-DDTHH:MM:SS.sssZ
        assert_eq!(formatted.len(), 24);
        assert_eq!(&formatted[19..20], ".");
        assert!(DateTime::parse_from_rfc3339(&formatted).is_ok());
    }

    #[test]
    fn alts_are_padded_and_truncated() {
        assert_eq!(normalize_alts(&["alt 1"], 2), vec!["alt 1", ""]);
        assert_eq!(normalize_alts(&["a", "b", "c"], 2), vec!["a", "b"]);
        assert_eq!(normalize_alts::<&str>(&[], 1), vec![""]);
    }

    #[test]
    fn mime_types_are_padded_with_jpeg() {
        assert_eq!(
            normalize_mime_types(&["image/png"], 3),
            vec!["image/png", "image/jpeg", "image/jpeg"]
        );
        assert_eq!(
            normalize_mime_types::<&str>(&[], 2),
            vec!["image/jpeg", "image/jpeg"]
        );
        assert_eq!(
            normalize_mime_types(&["image/png", "image/webp"], 1),
            vec!["image/png"]
        );
    }
}
