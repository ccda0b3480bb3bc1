// Month/year labels for CV date ranges.

use chrono::NaiveDate;

pub const PRESENT_LABEL: &str = "Present";

/// `"2020-01"` → `"Jan 2020"`. Also accepts a full `YYYY-MM-DD` date.
/// Empty or unparseable input yields an empty label.
pub fn format_month_year(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .map(|date| date.format("%b %Y").to_string())
        .unwrap_or_default()
}

/// `"<start> - <end>"`, with the end replaced by "Present" for ongoing items.
pub fn period_label(start: &str, end: &str, ongoing: bool) -> String {
    let end = if ongoing {
        PRESENT_LABEL.to_string()
    } else {
        format_month_year(end)
    };
    format!("{} - {}", format_month_year(start), end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_year_short_form() {
        assert_eq!(format_month_year("2020-01"), "Jan 2020");
        assert_eq!(format_month_year("2018-12"), "Dec 2018");
        assert_eq!(format_month_year("2021-06-15"), "Jun 2021");
    }

    #[test]
    fn test_empty_and_garbage_give_empty_label() {
        assert_eq!(format_month_year(""), "");
        assert_eq!(format_month_year("   "), "");
        assert_eq!(format_month_year("someday"), "");
        assert_eq!(format_month_year("2020-13"), "");
    }

    #[test]
    fn test_ongoing_ignores_stored_end() {
        assert_eq!(period_label("2020-01", "2019-01", true), "Jan 2020 - Present");
        assert_eq!(period_label("2020-01", "2021-03", false), "Jan 2020 - Mar 2021");
        assert_eq!(period_label("2020-01", "", false), "Jan 2020 - ");
    }
}
