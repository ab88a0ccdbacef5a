//! Intel HEX scanning
//!
//! Only the record header (byte count, address, type) and the two
//! address-extension record types matter for sizing. Data bytes are not
//! decoded and checksums are not verified.

use std::fs;
use std::ops::Range;
use std::path::Path;

use tracing::{debug, trace};

use crate::error::{Error, HexError};

const DATA: u8 = 0x00;
const END_OF_FILE: u8 = 0x01;
const EXTENDED_SEGMENT_ADDRESS: u8 = 0x02;
const EXTENDED_LINEAR_ADDRESS: u8 = 0x04;

/// A run of bytes placed by one data record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Absolute start address
    pub address: u64,
    /// Number of bytes
    pub len: u64,
}

impl Segment {
    /// One past the last address the segment covers
    pub const fn end(&self) -> u64 {
        self.address + self.len
    }
}

fn hex_field(
    record: &str,
    range: Range<usize>,
    line: usize,
    field: &'static str,
) -> Result<u32, HexError> {
    let text = record.get(range).ok_or(HexError::Truncated { line })?;
    // from_str_radix alone would take a leading sign
    if !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(HexError::InvalidHex { line, field });
    }
    u32::from_str_radix(text, 16).map_err(|_| HexError::InvalidHex { line, field })
}

/// Collect the data segments of an Intel HEX image
///
/// Lines are trimmed and blank lines skipped. Scanning stops at the first
/// end-of-file record. An image without data records is an error.
pub fn parse_intel_hex(text: &str) -> Result<Vec<Segment>, HexError> {
    let mut segments = Vec::new();
    let mut offset: u64 = 0;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let record = raw.trim();
        if record.is_empty() {
            continue;
        }
        if !record.starts_with(':') {
            return Err(HexError::MissingStartCode { line });
        }

        let count = hex_field(record, 1..3, line, "byte count")?;
        let address = hex_field(record, 3..7, line, "address")?;
        let record_type = hex_field(record, 7..9, line, "record type")? as u8;

        // Header, data and checksum must all be present
        if record.len() < 11 + 2 * count as usize {
            return Err(HexError::Truncated { line });
        }

        match record_type {
            DATA => {
                let segment = Segment {
                    address: offset + u64::from(address),
                    len: u64::from(count),
                };
                trace!(line, address = segment.address, len = segment.len, "Data record");
                segments.push(segment);
            }
            END_OF_FILE => {
                trace!(line, "End of file record");
                break;
            }
            EXTENDED_SEGMENT_ADDRESS => {
                offset = u64::from(hex_field(record, 9..13, line, "segment address")?) << 4;
                debug!(line, offset, "Extended segment address");
            }
            EXTENDED_LINEAR_ADDRESS => {
                offset = u64::from(hex_field(record, 9..13, line, "linear address")?) << 16;
                debug!(line, offset, "Extended linear address");
            }
            other => trace!(line, record_type = other, "Ignoring record"),
        }
    }

    if segments.is_empty() {
        return Err(HexError::NoData);
    }
    Ok(segments)
}

/// Read and scan an Intel HEX file
pub fn read_intel_hex(path: impl AsRef<Path>) -> Result<Vec<Segment>, Error> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_intel_hex(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_records() {
        let text = "\
:0300300002337A1E
:10000000000102030405060708090A0B0C0D0E0F78
:00000001FF
";
        let segments = parse_intel_hex(text).unwrap();
        assert_eq!(
            segments,
            [
                Segment { address: 0x30, len: 3 },
                Segment { address: 0x00, len: 16 },
            ]
        );
        assert_eq!(segments[0].end(), 0x33);
    }

    #[test]
    fn test_stops_at_end_of_file() {
        let text = ":0100000000FF\n:00000001FF\n:0100100000EF\n";
        let segments = parse_intel_hex(text).unwrap();
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_extended_segment_address() {
        let text = ":020000021000EC\n:0400000001020304F2\n:00000001FF\n";
        let segments = parse_intel_hex(text).unwrap();
        assert_eq!(segments, [Segment { address: 0x10000, len: 4 }]);
    }

    #[test]
    fn test_extended_linear_address() {
        let text = ":020000040001F9\n:02FFF000AABB9A\n:00000001FF\n";
        let segments = parse_intel_hex(text).unwrap();
        assert_eq!(segments, [Segment { address: 0x1FFF0, len: 2 }]);
        assert_eq!(segments[0].end(), 0x1FFF2);
    }

    #[test]
    fn test_blank_lines_and_other_records() {
        let text = "\n  :0400000500000000F7  \n\n:0100000000FF\n";
        let segments = parse_intel_hex(text).unwrap();
        assert_eq!(segments, [Segment { address: 0, len: 1 }]);
    }

    #[test]
    fn test_malformed_records() {
        assert_eq!(
            parse_intel_hex("0100000000FF"),
            Err(HexError::MissingStartCode { line: 1 })
        );
        assert_eq!(
            parse_intel_hex(":0100000000FF\n:01"),
            Err(HexError::Truncated { line: 2 })
        );
        assert_eq!(
            parse_intel_hex(":0Z00000000FF"),
            Err(HexError::InvalidHex {
                line: 1,
                field: "byte count"
            })
        );
        assert_eq!(
            parse_intel_hex(":+100000000FF"),
            Err(HexError::InvalidHex {
                line: 1,
                field: "byte count"
            })
        );
        assert_eq!(
            parse_intel_hex(":01+0000000FF"),
            Err(HexError::InvalidHex {
                line: 1,
                field: "address"
            })
        );
        // Declares 16 bytes but carries one
        assert_eq!(
            parse_intel_hex(":1000000000F0"),
            Err(HexError::Truncated { line: 1 })
        );
    }

    #[test]
    fn test_no_data() {
        assert_eq!(parse_intel_hex(":00000001FF\n"), Err(HexError::NoData));
        assert_eq!(parse_intel_hex(""), Err(HexError::NoData));
    }
}
