//! Size evaluation against the flash limit

use std::fmt;

use crate::ihex::Segment;

/// Linearly addressable flash without banking
pub const DEFAULT_LIMIT: u64 = 0x10000;
/// Fraction of the limit above which a warning is given
pub const DEFAULT_WARN_RATIO: f64 = 0.95;

/// Extent of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeReport {
    /// One past the highest address written
    pub max_end: u64,
    /// Sum of all data record lengths
    pub total_bytes: u64,
    /// Number of data records
    pub segments: usize,
}

impl SizeReport {
    /// Summarize a list of segments
    pub fn from_segments(segments: &[Segment]) -> Self {
        Self {
            max_end: segments.iter().map(Segment::end).max().unwrap_or(0),
            total_bytes: segments.iter().map(|s| s.len).sum(),
            segments: segments.len(),
        }
    }

    /// Highest address written
    pub const fn highest_address(&self) -> u64 {
        self.max_end.saturating_sub(1)
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "highest address 0x{:04X}, {} bytes in {} records",
            self.highest_address(),
            self.total_bytes,
            self.segments
        )
    }
}

/// How an image compares with the limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Comfortably within the limit
    Within,
    /// Within the limit but above the warning threshold
    NearLimit,
    /// Extends past the limit
    OverLimit,
}

/// Size limit and warning threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeLimits {
    /// Largest allowed end address
    pub limit: u64,
    /// Fraction of `limit` above which [`Verdict::NearLimit`] is given
    pub warn_ratio: f64,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            warn_ratio: DEFAULT_WARN_RATIO,
        }
    }
}

impl SizeLimits {
    /// Create limits
    pub const fn new(limit: u64, warn_ratio: f64) -> Self {
        Self { limit, warn_ratio }
    }

    /// Compare a report with these limits
    ///
    /// An image ending exactly at the limit still fits.
    pub fn evaluate(&self, report: &SizeReport) -> Verdict {
        if report.max_end > self.limit {
            Verdict::OverLimit
        } else if report.max_end as f64 > self.limit as f64 * self.warn_ratio {
            Verdict::NearLimit
        } else {
            Verdict::Within
        }
    }
}

/// Parse a size given in decimal or `0x`-prefixed hexadecimal
pub fn parse_size(text: &str) -> Result<u64, String> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(digits) => u64::from_str_radix(digits, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("invalid size {text:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(max_end: u64) -> SizeReport {
        SizeReport {
            max_end,
            total_bytes: max_end,
            segments: 1,
        }
    }

    #[test]
    fn test_from_segments() {
        let segments = [
            Segment { address: 0x100, len: 0x10 },
            Segment { address: 0x0, len: 0x20 },
            Segment { address: 0x80, len: 0x08 },
        ];
        let report = SizeReport::from_segments(&segments);
        assert_eq!(report.max_end, 0x110);
        assert_eq!(report.highest_address(), 0x10F);
        assert_eq!(report.total_bytes, 0x38);
        assert_eq!(report.segments, 3);
        assert_eq!(
            report.to_string(),
            "highest address 0x010F, 56 bytes in 3 records"
        );
    }

    #[test]
    fn test_verdicts() {
        let limits = SizeLimits::default();
        assert_eq!(limits.evaluate(&report(0x1000)), Verdict::Within);
        // 0.95 * 0x10000 = 62259.2
        assert_eq!(limits.evaluate(&report(62259)), Verdict::Within);
        assert_eq!(limits.evaluate(&report(62260)), Verdict::NearLimit);
        assert_eq!(limits.evaluate(&report(0x10000)), Verdict::NearLimit);
        assert_eq!(limits.evaluate(&report(0x10001)), Verdict::OverLimit);
    }

    #[test]
    fn test_custom_limits() {
        let limits = SizeLimits::new(0x8000, 0.5);
        assert_eq!(limits.evaluate(&report(0x4000)), Verdict::Within);
        assert_eq!(limits.evaluate(&report(0x4001)), Verdict::NearLimit);
        assert_eq!(limits.evaluate(&report(0x8001)), Verdict::OverLimit);
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("65536"), Ok(0x10000));
        assert_eq!(parse_size("0x10000"), Ok(0x10000));
        assert_eq!(parse_size("0X8000"), Ok(0x8000));
        assert!(parse_size("0xZZ").is_err());
        assert!(parse_size("-1").is_err());
    }
}
