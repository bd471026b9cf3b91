//! Text, key and timestamp normalization.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use encoding_rs::WINDOWS_1252;

/// Remove characters the front-end cannot embed: `"`, `http://`, `\` and
/// newlines, in that order.
pub fn sanitize(text: &str) -> String {
    text.replace('"', "")
        .replace("http://", "")
        .replace('\\', "")
        .replace('\n', "")
}

/// Decode Windows-1252 bytes (metadata tables).
pub fn decode_windows_1252(bytes: &[u8]) -> String {
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text.into_owned()
}

/// Decode ISO-8859-1 bytes (document bodies). Every byte maps to the code
/// point of the same value, so decoding cannot fail.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Translate `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Normalize a metadata key: trims, and turns float renderings of integers
/// (`12.0`) back into `12`.
pub fn normalize_key(raw: &str) -> String {
    let key = raw.trim();
    if let Some(int_part) = key.strip_suffix(".0") {
        if !int_part.is_empty() && int_part.chars().all(|c| c.is_ascii_digit()) {
            return int_part.to_string();
        }
    }
    key.to_string()
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f %z"];

/// Parse a metadata timestamp, keeping its local wall-clock time.
///
/// Accepts RFC 2822 (mail `Date:` headers), RFC 3339, the common
/// spreadsheet renderings (24-hour and AM/PM) and bare dates. Offsets are
/// parsed but not applied.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.naive_local());
        }
    }
    if let Some(ts) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(ts);
    }
    // Date-only stamps are read as midnight.
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use topicflow_types::format_timestamp;

    #[test]
    fn test_sanitize_strips_all_disallowed() {
        let raw = "say \"hi\" at http://example.com\\path\nnext line";
        assert_eq!(sanitize(raw), "say hi at example.compathnext line");
    }

    #[test]
    fn test_sanitize_order_quote_first() {
        // Removing the quote first exposes a URL scheme, which is then removed.
        assert_eq!(sanitize("htt\"p://host"), "host");
    }

    #[test]
    fn test_sanitize_keeps_https() {
        assert_eq!(sanitize("https://host"), "https://host");
    }

    #[test]
    fn test_decode_windows_1252_smart_quotes() {
        assert_eq!(decode_windows_1252(&[0x93, b'a', 0x94]), "\u{201c}a\u{201d}");
    }

    #[test]
    fn test_decode_latin1() {
        assert_eq!(decode_latin1(&[b'c', b'a', b'f', 0xe9]), "café");
        assert_eq!(decode_latin1(&[0x93]), "\u{93}");
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\rc\nd"), "a\nb\nc\nd");
        assert_eq!(sanitize(&normalize_newlines("one\r\ntwo\r")), "onetwo");
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key(" 12 "), "12");
        assert_eq!(normalize_key("12.0"), "12");
        assert_eq!(normalize_key("12.5"), "12.5");
        assert_eq!(normalize_key(".0"), ".0");
        assert_eq!(normalize_key("abc"), "abc");
    }

    #[test]
    fn test_parse_timestamp_rfc2822_keeps_local_time() {
        let ts = parse_timestamp("Tue, 02 Jan 2007 14:05:09 -0500").unwrap();
        assert_eq!(format_timestamp(&ts), "1/2/2007 14:5");
    }

    #[test]
    fn test_parse_timestamp_spreadsheet_forms() {
        let cases = [
            ("2007-03-04 05:06:07", "3/4/2007 5:6"),
            ("2007-03-04T05:06:07", "3/4/2007 5:6"),
            ("2007-03-04 05:06", "3/4/2007 5:6"),
            ("03/04/2007 05:06", "3/4/2007 5:6"),
            ("3/4/2007 17:45:00", "3/4/2007 17:45"),
            ("2007-03-04 05:06:07+0200", "3/4/2007 5:6"),
            ("2007-03-04T05:06:07Z", "3/4/2007 5:6"),
            ("1/2/2007 2:05 PM", "1/2/2007 14:5"),
            ("1/2/2007 12:30:15 AM", "1/2/2007 0:30"),
        ];
        for (raw, expected) in cases {
            let ts = parse_timestamp(raw).unwrap_or_else(|| panic!("failed to parse {raw}"));
            assert_eq!(format_timestamp(&ts), expected, "input {raw}");
        }
    }

    #[test]
    fn test_parse_timestamp_date_only_is_midnight() {
        let ts = parse_timestamp("2007-01-02").unwrap();
        assert_eq!(format_timestamp(&ts), "1/2/2007 0:0");
        let ts = parse_timestamp("03/04/2007").unwrap();
        assert_eq!(format_timestamp(&ts), "3/4/2007 0:0");
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2007-13-01 00:00:00").is_none());
    }
}
