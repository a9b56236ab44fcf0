// ============================================================
// PERCENTAGE FIELDS
// ============================================================
// Locale-aware parsing and formatting of progress/baseline values

use std::borrow::Cow;

use crate::domain::csv::{DecimalSeparator, OutOfRangePolicy};

/// Rewrite decimal commas as dots when the locale uses them
pub fn normalize_decimal(raw: &str, separator: DecimalSeparator) -> Cow<'_, str> {
    match separator {
        DecimalSeparator::Comma if raw.contains(',') => Cow::Owned(raw.replace(',', ".")),
        _ => Cow::Borrowed(raw),
    }
}

/// Parse a percentage field.
///
/// Empty, unparseable and non-finite values become 0. Values outside
/// 0..=100 follow `policy`. Never returns NaN.
pub fn parse_percentage(raw: &str, separator: DecimalSeparator, policy: OutOfRangePolicy) -> f64 {
    let trimmed = raw.trim().trim_end_matches('%').trim_end();
    if trimmed.is_empty() {
        return 0.0;
    }

    let value = match normalize_decimal(trimmed, separator).parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => return 0.0,
    };

    let coerced = if (0.0..=100.0).contains(&value) {
        value
    } else {
        match policy {
            OutOfRangePolicy::Zero => 0.0,
            OutOfRangePolicy::Clamp => value.clamp(0.0, 100.0),
        }
    };

    // -0 parses fine but must not leak into output
    if coerced == 0.0 {
        0.0
    } else {
        coerced
    }
}

/// Shortest text that parses back to the same value
pub fn format_percentage(value: f64, separator: DecimalSeparator) -> String {
    let text = if value.is_finite() {
        value.to_string()
    } else {
        "0".to_string()
    };

    match separator {
        DecimalSeparator::Dot => text,
        DecimalSeparator::Comma => text.replace('.', ","),
    }
}
