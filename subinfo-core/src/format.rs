//! Human-readable byte sizes.

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Formats a byte count as `"{value:.2} {unit}"` using binary multiples.
///
/// The value is divided by 1024 while it is at least 1024 and the unit has
/// not reached PB, so very large inputs stay in PB.
pub fn format_size(size: f64) -> String {
    let mut size = size;
    let mut level = 0;
    while size >= 1024.0 && level < UNITS.len() - 1 {
        size /= 1024.0;
        level += 1;
    }
    format!("{size:.2} {}", UNITS[level])
}

/// Formats an integer byte count.
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes as f64)
}
