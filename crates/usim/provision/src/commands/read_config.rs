use bytes::Bytes;
use usim_apdu_core::{ApduCommand, ExpectedLength, Response};

use super::check_status;
use crate::constants::{CLA_CONFIG, DataType, IMSI_RECORD_LEN, STATUS_RESPONSE_LEN, ins};
use crate::Error;

/// Read one configuration field
///
/// Succeeds with the raw response data; interpreting it is left to the
/// caller since its shape depends on the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadConfigCommand {
    data_type: DataType,
    expected_length: ExpectedLength,
}

impl ReadConfigCommand {
    /// Read `expected_length` bytes of the given field
    pub const fn new(data_type: DataType, expected_length: ExpectedLength) -> Self {
        Self {
            data_type,
            expected_length,
        }
    }

    /// Read the card status block
    pub const fn status() -> Self {
        Self::new(DataType::Status, STATUS_RESPONSE_LEN as ExpectedLength)
    }

    /// Read the stored IMSI record
    pub const fn imsi() -> Self {
        Self::new(DataType::Imsi, IMSI_RECORD_LEN as ExpectedLength)
    }
}

impl ApduCommand for ReadConfigCommand {
    type Success = Bytes;
    type Error = Error;

    fn convert_error(error: usim_apdu_core::Error) -> Self::Error {
        Error::from(error)
    }

    fn class(&self) -> u8 {
        CLA_CONFIG
    }

    fn instruction(&self) -> u8 {
        ins::READ_CONFIG
    }

    fn p1(&self) -> u8 {
        self.data_type.tag()
    }

    fn p2(&self) -> u8 {
        0x00
    }

    fn data(&self) -> Option<&[u8]> {
        None
    }

    fn expected_length(&self) -> Option<ExpectedLength> {
        Some(self.expected_length)
    }

    fn parse_response(response: Response) -> Result<Self::Success, Self::Error> {
        check_status(&response)?;
        Ok(response.payload().clone().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_frame() {
        let cmd = ReadConfigCommand::status();
        assert_eq!(cmd.to_bytes().unwrap().as_ref(), &[0x80, 0xD1, 0x05, 0x00, 0x04]);
    }

    #[test]
    fn test_imsi_frame() {
        let cmd = ReadConfigCommand::imsi();
        assert_eq!(cmd.to_bytes().unwrap().as_ref(), &[0x80, 0xD1, 0x01, 0x00, 0x09]);
    }

    #[test]
    fn test_payload_returned() {
        let response = Response::from_bytes(&[0x01, 0x03, 0x02, 0x01, 0x90, 0x00]).unwrap();
        let data = ReadConfigCommand::parse_response(response).unwrap();
        assert_eq!(data.as_ref(), &[0x01, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_empty_success() {
        let response = Response::from_bytes(&[0x90, 0x00]).unwrap();
        let data = ReadConfigCommand::parse_response(response).unwrap();
        assert!(data.is_empty());
    }
}
