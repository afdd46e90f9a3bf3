//! Before/after reporting.

/// What `compress` hands back to its caller.
#[derive(Debug, Clone)]
pub struct CompressionOutcome {
    pub data: Vec<u8>,
    /// Suggested download name, e.g. `compressed_photo.jpg`.
    pub file_name: String,
    pub original_size: u64,
    pub compressed_size: u64,
    pub strategy: &'static str,
    /// The input was returned unchanged because every codec path failed.
    pub degraded: bool,
}

impl CompressionOutcome {
    /// Percentage of the original size saved. Negative if the output grew.
    pub fn ratio(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (1.0 - self.compressed_size as f64 / self.original_size as f64) * 100.0
    }

    /// Nothing was gained. Callers may treat this as a soft failure.
    pub fn is_noop(&self) -> bool {
        self.compressed_size >= self.original_size
    }
}

/// Human-readable size with 1024-based units, e.g. `1.50 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(original_size: u64, compressed_size: u64) -> CompressionOutcome {
        CompressionOutcome {
            data: vec![],
            file_name: "compressed_x".to_string(),
            original_size,
            compressed_size,
            strategy: "image",
            degraded: false,
        }
    }

    #[test]
    fn test_ratio() {
        assert!((outcome(1000, 250).ratio() - 75.0).abs() < 1e-9);
        assert_eq!(outcome(0, 0).ratio(), 0.0);
        assert!(outcome(100, 150).ratio() < 0.0);
    }

    #[test]
    fn test_noop() {
        assert!(outcome(100, 100).is_noop());
        assert!(!outcome(100, 99).is_noop());
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512.00 Bytes");
        assert_eq!(format_file_size(1536), "1.50 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3.00 GB");
        assert_eq!(format_file_size(2048 * 1024 * 1024 * 1024), "2048.00 GB");
    }
}
