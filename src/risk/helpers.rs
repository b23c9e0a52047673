/// `count / total`, with an empty population reported as 0 rather than NaN.
pub fn fraction(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Format a measurement for factor text: whole values print without a decimal point.
pub fn format_measurement(value: f64) -> String {
    format!("{}", value)
}

/// Capitalize the first letter of each whitespace-separated word, lower-casing the rest.
/// Runs of whitespace collapse to a single space.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
