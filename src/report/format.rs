//! Number and text formatting shared by the reports.

/// Format an integer with thousands separators: `1234567` -> `1,234,567`.
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a non-negative float rounded to an integer, with separators.
pub fn thousands_rounded(value: f64) -> String {
    if !value.is_finite() || value <= 0.0 {
        return "0".to_string();
    }
    thousands(value.round_ties_even() as u64)
}

/// Format an optional count, `N/A` when unknown.
pub fn count_or_na(value: Option<u64>) -> String {
    value.map(thousands).unwrap_or_else(|| "N/A".to_string())
}

/// Render a rate the way spreadsheet tools read it back: whole numbers keep
/// one decimal (`6.0`), everything else uses the shortest exact form.
pub fn decimal(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// First `max` characters of `text`.
pub fn clip(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// First `max` characters of `text`, with `...` appended when cut.
pub fn ellipsize(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", clip(text, max))
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
        assert_eq!(thousands(100_000), "100,000");
    }

    #[test]
    fn test_thousands_rounded() {
        assert_eq!(thousands_rounded(1499.5), "1,500");
        assert_eq!(thousands_rounded(2.5), "2");
        assert_eq!(thousands_rounded(0.0), "0");
        assert_eq!(thousands_rounded(f64::NAN), "0");
    }

    #[test]
    fn test_count_or_na() {
        assert_eq!(count_or_na(Some(12_345)), "12,345");
        assert_eq!(count_or_na(None), "N/A");
    }

    #[test]
    fn test_decimal() {
        assert_eq!(decimal(6.0), "6.0");
        assert_eq!(decimal(0.0), "0.0");
        assert_eq!(decimal(0.6), "0.6");
        assert_eq!(decimal(33.333), "33.333");
    }

    #[test]
    fn test_ellipsize_counts_chars() {
        assert_eq!(ellipsize("short", 10), "short");
        assert_eq!(ellipsize("exactly10!", 10), "exactly10!");
        assert_eq!(ellipsize("a longer title", 8), "a longer...");
        assert_eq!(ellipsize("ñandú ñandú", 5), "ñandú...");
        assert_eq!(clip("ñandú ñandú", 3), "ñan");
    }
}
