use bytes::Bytes;
use usim_apdu_core::{ApduCommand, ExpectedLength, Response};

use super::check_status;
use crate::constants::{CLA_CONFIG, DataType, ins};
use crate::Error;

/// Write one configuration field
///
/// P1 carries the data-type tag; the payload is the field's wire encoding.
#[derive(Clone, PartialEq, Eq)]
pub struct WriteConfigCommand {
    data_type: DataType,
    payload: Bytes,
}

impl std::fmt::Debug for WriteConfigCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteConfigCommand")
            .field("data_type", &self.data_type)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

impl WriteConfigCommand {
    /// Create a write for the given field
    pub fn new(data_type: DataType, payload: impl Into<Bytes>) -> Self {
        Self {
            data_type,
            payload: payload.into(),
        }
    }
}

impl ApduCommand for WriteConfigCommand {
    type Success = ();
    type Error = Error;

    fn convert_error(error: usim_apdu_core::Error) -> Self::Error {
        Error::from(error)
    }

    fn class(&self) -> u8 {
        CLA_CONFIG
    }

    fn instruction(&self) -> u8 {
        ins::WRITE_CONFIG
    }

    fn p1(&self) -> u8 {
        self.data_type.tag()
    }

    fn p2(&self) -> u8 {
        0x00
    }

    fn data(&self) -> Option<&[u8]> {
        Some(&self.payload)
    }

    fn expected_length(&self) -> Option<ExpectedLength> {
        None
    }

    fn parse_response(response: Response) -> Result<Self::Success, Self::Error> {
        check_status(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use usim_apdu_core::StatusWord;

    #[test]
    fn test_imsi_frame() {
        let record = [0x0F, 0x09, 0x21, 0x43, 0x65, 0x87, 0x09, 0x21, 0xF3];
        let cmd = WriteConfigCommand::new(DataType::Imsi, record.to_vec());
        assert_eq!(
            cmd.to_bytes().unwrap().as_ref(),
            &[
                0x80, 0xD0, 0x01, 0x00, 0x09, 0x0F, 0x09, 0x21, 0x43, 0x65, 0x87, 0x09, 0x21,
                0xF3
            ]
        );
        assert_eq!(cmd.command_length(), 14);
    }

    #[test]
    fn test_oversized_payload() {
        let cmd = WriteConfigCommand::new(DataType::Key, vec![0u8; 256]);
        assert!(cmd.to_bytes().is_err());
    }

    #[test]
    fn test_rejection() {
        let response = Response::from_status(StatusWord::new(0x69, 0x82));
        let err = WriteConfigCommand::parse_response(response).unwrap_err();
        assert_eq!(err.status_word(), Some(StatusWord::new(0x69, 0x82)));
    }

    #[test]
    fn test_debug_hides_payload() {
        let cmd = WriteConfigCommand::new(DataType::Key, vec![0xAB; 16]);
        let rendered = format!("{cmd:?}");
        assert!(!rendered.contains("171"));
        assert!(rendered.contains("payload_len: 16"));
    }
}
