//! Size checks over image files on disk

use std::io::Write;

use usim_firmware::{Error, HexError, SizeLimits, SizeReport, Verdict, read_intel_hex};

fn image(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn image_within_limit() {
    let file = image(":10000000000102030405060708090A0B0C0D0E0F78\n:00000001FF\n");

    let segments = read_intel_hex(file.path()).unwrap();
    let report = SizeReport::from_segments(&segments);
    assert_eq!(report.max_end, 16);
    assert_eq!(report.total_bytes, 16);
    assert_eq!(SizeLimits::default().evaluate(&report), Verdict::Within);
}

#[test]
fn image_past_linear_flash() {
    // Two bytes at 0x1FFF0 via an extended linear address record
    let file = image(":020000040001F9\n:02FFF000AABB9A\n:00000001FF\n");

    let report = SizeReport::from_segments(&read_intel_hex(file.path()).unwrap());
    assert_eq!(report.highest_address(), 0x1FFF1);
    assert_eq!(SizeLimits::default().evaluate(&report), Verdict::OverLimit);
}

#[test]
fn missing_file_is_an_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_intel_hex(dir.path().join("firmware.ihx")).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn malformed_file_is_an_input_error() {
    let file = image("not a hex file\n");
    let err = read_intel_hex(file.path()).unwrap_err();
    assert!(matches!(
        err,
        Error::Hex(HexError::MissingStartCode { line: 1 })
    ));
}
