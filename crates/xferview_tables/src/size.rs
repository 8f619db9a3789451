const THRESHOLD: f64 = 1024.0;
const UNITS: [&str; 5] = ["kB", "MB", "GB", "TB", "PB"];

/// Renders a byte count as `"<n> B"` below 1 kB, otherwise with one decimal
/// and a binary-scaled unit. Negative counts scale by absolute value.
pub fn format_size(bytes: i64) -> String {
    if bytes.unsigned_abs() < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64 / THRESHOLD;
    let mut unit = 0;
    while value.abs() >= THRESHOLD && unit < UNITS.len() - 1 {
        value /= THRESHOLD;
        unit += 1;
    }

    format!("{value:.1} {}", UNITS[unit])
}
