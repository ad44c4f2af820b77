//! Shared field-formatting helpers used by every theme.
//!
//! One implementation of the date-range contract means the themes cannot
//! drift apart on it.

use chrono::NaiveDate;

/// Formats a `YYYY`, `YYYY-MM` or `YYYY-MM-DD` date as `"Jan 2020"` (year
/// only for `YYYY`). Anything unparseable is passed through verbatim; an
/// empty string stays empty.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    let formatted = match raw.len() {
        4 => raw.parse::<u16>().ok().map(|_| raw.to_string()),
        7 => NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
            .ok()
            .map(|d| d.format("%b %Y").to_string()),
        10 => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .map(|d| d.format("%b %Y").to_string()),
        _ => None,
    };
    formatted.unwrap_or_else(|| raw.to_string())
}

/// Formats a date range per the shared contract: a missing end date means
/// "Present", and a range with neither endpoint renders as nothing at all.
pub fn format_date_range(start: Option<&str>, end: Option<&str>) -> String {
    let start = start.map(format_date).unwrap_or_default();
    let end = end.map(str::trim).filter(|e| !e.is_empty());
    match end {
        Some(end) => {
            let end = format_date(end);
            if start.is_empty() {
                format!("– {end}")
            } else {
                format!("{start} – {end}")
            }
        }
        None if start.is_empty() => String::new(),
        None => format!("{start} – Present"),
    }
}

/// Joins the non-empty parts with a separator, skipping blanks entirely.
pub fn join_present(parts: &[Option<&str>], sep: &str) -> String {
    parts
        .iter()
        .filter_map(|p| p.map(str::trim).filter(|s| !s.is_empty()))
        .collect::<Vec<_>>()
        .join(sep)
}

/// Minimal HTML escaping for text nodes and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_month_year() {
        assert_eq!(format_date("2020-01"), "Jan 2020");
        assert_eq!(format_date("2019-06"), "Jun 2019");
        assert_eq!(format_date("2021-03-15"), "Mar 2021");
    }

    #[test]
    fn test_format_date_year_only() {
        assert_eq!(format_date("2020"), "2020");
    }

    #[test]
    fn test_format_date_passes_garbage_through() {
        assert_eq!(format_date("Summer 2020"), "Summer 2020");
        assert_eq!(format_date("2020-13"), "2020-13");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_range_open_ended_renders_present() {
        assert_eq!(
            format_date_range(Some("2020-01"), None),
            "Jan 2020 – Present"
        );
    }

    #[test]
    fn test_range_both_absent_renders_nothing() {
        assert_eq!(format_date_range(None, None), "");
        assert_eq!(format_date_range(Some(""), Some("")), "");
    }

    #[test]
    fn test_range_closed_contains_both_endpoints_in_order() {
        let range = format_date_range(Some("2019-06"), Some("2021-03"));
        let start = range.find("Jun 2019").expect("start missing");
        let end = range.find("Mar 2021").expect("end missing");
        assert!(start < end);
    }

    #[test]
    fn test_range_empty_end_means_present() {
        assert_eq!(
            format_date_range(Some("2021-01"), Some("  ")),
            "Jan 2021 – Present"
        );
    }

    #[test]
    fn test_join_present_skips_blanks() {
        assert_eq!(
            join_present(&[Some("Berlin"), None, Some(""), Some("DE")], ", "),
            "Berlin, DE"
        );
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }
}
