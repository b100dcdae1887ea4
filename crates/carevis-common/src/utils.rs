//! Small formatting helpers shared by the chart builders.

/// Truncates a label to at most `max_chars` characters, ending with an ellipsis.
///
/// Counts characters rather than bytes so Arabic or accented service names
/// are never split inside a code point.
pub fn truncate_label(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        return input.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut truncated: String = input.chars().take(keep).collect();
    truncated.push_str("...");
    truncated
}

/// Formats a count with thousands separators, e.g. `12,345`.
pub fn format_count(value: usize) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }
    formatted
}

/// Formats a mean value with one decimal place.
pub fn format_mean(value: f64) -> String {
    format!("{value:.1}")
}
