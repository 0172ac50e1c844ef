/// Formats a number of bytes into a human-readable string.
///
/// Converts a byte count into a string with binary units (B, KiB, MiB, ...)
/// using `precision` decimal places.
///
/// # Example
///
/// ```
/// use zrpm_utils::bytes::format_bytes;
///
/// assert_eq!(format_bytes(1024_u64.pow(2), 2), "1.00 MiB");
/// ```
pub fn format_bytes(bytes: u64, precision: usize) -> String {
    const UNIT: f64 = 1024.0;
    const SIZES: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

    if bytes == 0 {
        return format!("{:.*} {}", precision, 0.0, SIZES[0]);
    }

    let idx = ((bytes as f64).log(UNIT).floor() as usize).min(SIZES.len() - 1);

    format!(
        "{:.*} {}",
        precision,
        bytes as f64 / UNIT.powi(idx as i32),
        SIZES[idx]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0, 0), "0 B");
        assert_eq!(format_bytes(512, 0), "512 B");
        assert_eq!(format_bytes(1024, 2), "1.00 KiB");
        assert_eq!(format_bytes(143156, 1), "139.8 KiB");
        assert_eq!(format_bytes(1024_u64.pow(3) * 3, 2), "3.00 GiB");
    }
}
