//! Value codec
//!
//! Pure conversions from operator-supplied text to the fixed-width byte
//! encodings the card expects. Nothing here performs I/O; every function
//! rejects malformed input with a [`ValidationError`] instead of guessing.

use crate::constants::{
    IMSI_MAX_DIGITS, IMSI_RECORD_LEN, PAD, PIN_FIELD_LEN, PIN_MIN_DIGITS,
};
use crate::error::ValidationError;

type Result<T> = std::result::Result<T, ValidationError>;

fn check_decimal(text: &str) -> Result<()> {
    match text.chars().enumerate().find(|(_, c)| !c.is_ascii_digit()) {
        Some((position, character)) => Err(ValidationError::InvalidCharacter {
            character,
            position,
        }),
        None => Ok(()),
    }
}

const fn check_range(value: usize, min: usize, max: usize) -> Result<()> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange { value, min, max });
    }
    Ok(())
}

/// Pack an IMSI into its 9-byte BCD record
///
/// Byte 0 holds the digit count. Digits follow two per byte, first digit of
/// each pair in the low nibble. An odd count leaves `F` in the last high
/// nibble and unused bytes are `FF`.
pub fn encode_bcd_imsi(digits: &str) -> Result<[u8; IMSI_RECORD_LEN]> {
    check_decimal(digits)?;
    check_range(digits.len(), 1, IMSI_MAX_DIGITS)?;

    let mut record = [PAD; IMSI_RECORD_LEN];
    record[0] = digits.len() as u8;

    for (slot, pair) in record[1..].iter_mut().zip(digits.as_bytes().chunks(2)) {
        let low = pair[0] - b'0';
        let high = pair.get(1).map_or(0x0F, |digit| digit - b'0');
        *slot = (high << 4) | low;
    }

    Ok(record)
}

/// Unpack a 9-byte BCD IMSI record into its digits
///
/// The inverse of [`encode_bcd_imsi`]; filler and padding must be exactly
/// where the packing rules put them.
pub fn decode_bcd_imsi(record: &[u8]) -> Result<String> {
    if record.len() != IMSI_RECORD_LEN {
        return Err(ValidationError::IncorrectLength {
            expected: IMSI_RECORD_LEN,
            actual: record.len(),
        });
    }

    let count = record[0] as usize;
    check_range(count, 1, IMSI_MAX_DIGITS)?;

    let packed = &record[1..];
    let mut digits = String::with_capacity(count);
    for index in 0..count {
        let byte = packed[index / 2];
        let nibble = if index % 2 == 0 { byte & 0x0F } else { byte >> 4 };
        if nibble > 9 {
            return Err(ValidationError::Malformed("non-decimal digit nibble"));
        }
        digits.push(char::from(b'0' + nibble));
    }

    let used = count.div_ceil(2);
    if count % 2 == 1 && packed[used - 1] >> 4 != 0x0F {
        return Err(ValidationError::Malformed("missing odd-length filler"));
    }
    if packed[used..].iter().any(|&byte| byte != PAD) {
        return Err(ValidationError::Malformed("unexpected data after last digit"));
    }

    Ok(digits)
}

/// Decode hexadecimal text into exactly `expected_len` bytes
///
/// Whitespace is not stripped; lengths in errors count characters.
pub fn decode_hex_fixed(text: &str, expected_len: usize) -> Result<Vec<u8>> {
    let actual = text.chars().count();
    if actual != expected_len * 2 {
        return Err(ValidationError::IncorrectLength {
            expected: expected_len * 2,
            actual,
        });
    }

    if let Some((position, character)) = text
        .chars()
        .enumerate()
        .find(|(_, c)| !c.is_ascii_hexdigit())
    {
        return Err(ValidationError::InvalidCharacter {
            character,
            position,
        });
    }

    hex::decode(text).map_err(|_| ValidationError::Malformed("undecodable hex"))
}

/// Decode hexadecimal text into a fixed-size array
pub fn decode_hex_array<const N: usize>(text: &str) -> Result<[u8; N]> {
    let bytes = decode_hex_fixed(text, N)?;
    let actual = bytes.len();
    bytes.try_into().map_err(|_| ValidationError::IncorrectLength {
        expected: N,
        actual,
    })
}

/// Encode a PIN as ASCII digits right-padded with `FF` to 8 bytes
pub fn encode_pin(digits: &str) -> Result<[u8; PIN_FIELD_LEN]> {
    check_decimal(digits)?;
    check_range(digits.len(), PIN_MIN_DIGITS, PIN_FIELD_LEN)?;

    let mut field = [PAD; PIN_FIELD_LEN];
    field[..digits.len()].copy_from_slice(digits.as_bytes());
    Ok(field)
}
