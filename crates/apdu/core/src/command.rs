//! APDU command definitions and traits
//!
//! This module provides types and traits for working with short APDU commands
//! according to ISO/IEC 7816-4 (cases 1 to 4, no extended length).

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::{Error, Response};

/// Expected length type for APDU commands
///
/// Values run from 1 to 256, where 256 is encoded on the wire as `0x00`.
pub type ExpectedLength = u16;

/// Largest payload a short APDU can carry in its single Lc byte
pub const MAX_PAYLOAD_LEN: usize = 255;

/// Largest expected response length a single Le byte can encode
pub const MAX_EXPECTED_LEN: ExpectedLength = 256;

/// Errors raised while assembling or parsing a command frame
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// Payload does not fit in a single Lc byte
    #[error("Payload too long: {length} bytes exceeds the {MAX_PAYLOAD_LEN}-byte limit")]
    PayloadTooLong {
        /// Offending payload length
        length: usize,
    },

    /// Expected length cannot be encoded in a single Le byte
    #[error("Invalid expected length {0}: must be between 1 and {MAX_EXPECTED_LEN}")]
    InvalidExpectedLength(ExpectedLength),

    /// Raw bytes do not form a valid command
    #[error("Invalid command length: {0}")]
    InvalidCommandLength(usize),
}

/// Assemble a raw command frame
///
/// Layout is `[CLA, INS, P1, P2]`, then `[Lc] + payload` only when the payload
/// is non-empty, then one Le byte only when an expected length is given.
pub fn build_frame(
    cla: u8,
    ins: u8,
    p1: u8,
    p2: u8,
    payload: Option<&[u8]>,
    expected_length: Option<ExpectedLength>,
) -> Result<Bytes, CommandError> {
    let payload = payload.filter(|data| !data.is_empty());

    if let Some(data) = payload {
        if data.len() > MAX_PAYLOAD_LEN {
            return Err(CommandError::PayloadTooLong { length: data.len() });
        }
    }

    let le = expected_length.map(encode_le).transpose()?;

    let mut buffer = BytesMut::with_capacity(
        4 + payload.map_or(0, |data| data.len() + 1) + usize::from(le.is_some()),
    );

    // Header: CLA, INS, P1, P2
    buffer.put_u8(cla);
    buffer.put_u8(ins);
    buffer.put_u8(p1);
    buffer.put_u8(p2);

    // Add Lc and data if present
    if let Some(data) = payload {
        buffer.put_u8(data.len() as u8);
        buffer.put_slice(data);
    }

    // Add Le if present
    if let Some(le) = le {
        buffer.put_u8(le);
    }

    Ok(buffer.freeze())
}

const fn encode_le(le: ExpectedLength) -> Result<u8, CommandError> {
    match le {
        MAX_EXPECTED_LEN => Ok(0x00),
        1..=255 => Ok(le as u8),
        _ => Err(CommandError::InvalidExpectedLength(le)),
    }
}

/// Core trait for APDU commands
pub trait ApduCommand {
    /// Success response type
    type Success;

    /// Error response type
    type Error: fmt::Debug;

    /// Convert core Error to command-specific error type
    fn convert_error(error: Error) -> Self::Error;

    /// Command class (CLA)
    fn class(&self) -> u8;

    /// Instruction code (INS)
    fn instruction(&self) -> u8;

    /// First parameter (P1)
    fn p1(&self) -> u8;

    /// Second parameter (P2)
    fn p2(&self) -> u8;

    /// Command payload data (optional)
    fn data(&self) -> Option<&[u8]>;

    /// Expected response length (optional)
    fn expected_length(&self) -> Option<ExpectedLength>;

    /// Convert to raw APDU bytes
    fn to_bytes(&self) -> Result<Bytes, CommandError> {
        build_frame(
            self.class(),
            self.instruction(),
            self.p1(),
            self.p2(),
            self.data(),
            self.expected_length(),
        )
    }

    /// Calculate length of serialized command
    fn command_length(&self) -> usize {
        // Header (CLA, INS, P1, P2) is always 4 bytes
        let mut length = 4;

        // Add Lc, data length if present
        if let Some(data) = self.data().filter(|data| !data.is_empty()) {
            length += 1 + data.len();
        }

        // Add Le if present
        if self.expected_length().is_some() {
            length += 1;
        }

        length
    }

    /// Parse response into the command's response type
    fn parse_response(response: Response) -> Result<Self::Success, Self::Error>;
}

/// Generic APDU command structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command class byte
    pub cla: u8,
    /// Instruction byte
    pub ins: u8,
    /// Parameter 1
    pub p1: u8,
    /// Parameter 2
    pub p2: u8,
    /// Command data (optional)
    pub data: Option<Bytes>,
    /// Expected length (optional)
    pub le: Option<ExpectedLength>,
}

impl Command {
    /// Create a new command with just the header bytes
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: None,
        }
    }

    /// Create a new command with expected response length (Le)
    pub const fn new_with_le(cla: u8, ins: u8, p1: u8, p2: u8, le: ExpectedLength) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: Some(le),
        }
    }

    /// Create a new command with data payload
    pub fn new_with_data<T: Into<Bytes>>(cla: u8, ins: u8, p1: u8, p2: u8, data: T) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: Some(data.into()),
            le: None,
        }
    }

    /// Set the data field
    pub fn with_data<T: Into<Bytes>>(mut self, data: T) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set the expected length field
    pub const fn with_le(mut self, le: ExpectedLength) -> Self {
        self.le = Some(le);
        self
    }

    /// Parse a command from raw bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self, CommandError> {
        if data.len() < 4 {
            return Err(CommandError::InvalidCommandLength(data.len()));
        }

        let mut command = Self::new(data[0], data[1], data[2], data[3]);

        if data.len() == 4 {
            return Ok(command);
        }

        if data.len() == 5 {
            // Only Le present, no data
            command.le = Some(decode_le(data[4]));
            return Ok(command);
        }

        let lc = data[4] as usize;
        let body = &data[5..];
        match body.len().checked_sub(lc) {
            Some(0) => {}
            Some(1) => command.le = Some(decode_le(body[lc])),
            _ => return Err(CommandError::InvalidCommandLength(data.len())),
        }
        if lc > 0 {
            command.data = Some(Bytes::copy_from_slice(&body[..lc]));
        }

        Ok(command)
    }
}

fn decode_le(byte: u8) -> ExpectedLength {
    if byte == 0x00 {
        MAX_EXPECTED_LEN
    } else {
        ExpectedLength::from(byte)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CLA={:02X} INS={:02X} P1={:02X} P2={:02X}",
            self.cla, self.ins, self.p1, self.p2
        )?;
        if let Some(data) = &self.data {
            write!(f, " Lc={:02X} DATA={}", data.len(), hex::encode_upper(data))?;
        }
        if let Some(le) = self.le {
            write!(f, " Le={le}")?;
        }
        Ok(())
    }
}

impl ApduCommand for Command {
    type Success = Response;
    type Error = Error;

    fn convert_error(error: Error) -> Self::Error {
        error
    }

    fn class(&self) -> u8 {
        self.cla
    }

    fn instruction(&self) -> u8 {
        self.ins
    }

    fn p1(&self) -> u8 {
        self.p1
    }

    fn p2(&self) -> u8 {
        self.p2
    }

    fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    fn expected_length(&self) -> Option<ExpectedLength> {
        self.le
    }

    fn parse_response(response: Response) -> Result<Self::Success, Self::Error> {
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_frame_with_payload() {
        let frame = build_frame(0x80, 0xD0, 0x01, 0x00, Some(&[0x01, 0x02, 0x03]), None).unwrap();
        assert_eq!(
            frame.as_ref(),
            &[0x80, 0xD0, 0x01, 0x00, 0x03, 0x01, 0x02, 0x03]
        );
    }

    #[test]
    fn test_build_frame_header_only() {
        let frame = build_frame(0x80, 0xE0, 0x00, 0x00, None, None).unwrap();
        assert_eq!(frame.as_ref(), &[0x80, 0xE0, 0x00, 0x00]);

        // An empty payload is treated as absent
        let frame = build_frame(0x80, 0xE0, 0x00, 0x00, Some(&[]), None).unwrap();
        assert_eq!(frame.as_ref(), &[0x80, 0xE0, 0x00, 0x00]);
    }

    #[test]
    fn test_build_frame_expected_length() {
        let frame = build_frame(0x80, 0xD1, 0x05, 0x00, None, Some(4)).unwrap();
        assert_eq!(frame.as_ref(), &[0x80, 0xD1, 0x05, 0x00, 0x04]);

        let frame = build_frame(0x80, 0xD1, 0x05, 0x00, None, Some(256)).unwrap();
        assert_eq!(frame.as_ref(), &[0x80, 0xD1, 0x05, 0x00, 0x00]);

        let rand = [0xAA; 16];
        let frame = build_frame(0x80, 0xA0, 0x00, 0x00, Some(&rand), Some(0x36)).unwrap();
        assert_eq!(frame.len(), 4 + 1 + 16 + 1);
        assert_eq!(frame[4], 0x10);
        assert_eq!(frame[21], 0x36);
    }

    #[test]
    fn test_build_frame_payload_ceiling() {
        let max = vec![0u8; 255];
        let frame = build_frame(0x80, 0xD0, 0x01, 0x00, Some(&max), None).unwrap();
        assert_eq!(frame.len(), 4 + 1 + 255);
        assert_eq!(frame[4], 0xFF);

        let too_long = vec![0u8; 256];
        assert_eq!(
            build_frame(0x80, 0xD0, 0x01, 0x00, Some(&too_long), None),
            Err(CommandError::PayloadTooLong { length: 256 })
        );
    }

    #[test]
    fn test_build_frame_rejects_unencodable_le() {
        assert_eq!(
            build_frame(0x80, 0xD1, 0x05, 0x00, None, Some(0)),
            Err(CommandError::InvalidExpectedLength(0))
        );
        assert_eq!(
            build_frame(0x80, 0xD1, 0x05, 0x00, None, Some(257)),
            Err(CommandError::InvalidExpectedLength(257))
        );
    }

    #[test]
    fn test_command_length() {
        let cmd1 = Command::new(0x80, 0xE0, 0x00, 0x00);
        assert_eq!(cmd1.command_length(), 4);

        let cmd2 = Command::new_with_le(0x80, 0xD1, 0x05, 0x00, 4);
        assert_eq!(cmd2.command_length(), 5);

        let data = Bytes::from_static(&[0x01, 0x02, 0x03]);
        let cmd3 = Command::new_with_data(0x80, 0xD0, 0x01, 0x00, data.clone());
        assert_eq!(cmd3.command_length(), 8);

        let cmd4 = cmd3.with_le(0x36);
        assert_eq!(cmd4.command_length(), 9);
        assert_eq!(cmd4.to_bytes().unwrap().len(), 9);
    }

    #[test]
    fn test_command_from_bytes() {
        // Header only
        let cmd = Command::from_bytes(&[0x80, 0xE0, 0x00, 0x00]).unwrap();
        assert_eq!(cmd, Command::new(0x80, 0xE0, 0x00, 0x00));

        // Data but no Le
        let cmd = Command::from_bytes(&[0x80, 0xD0, 0x04, 0x00, 0x02, 0x30, 0x30]).unwrap();
        assert_eq!(cmd.data.as_deref(), Some(&[0x30, 0x30][..]));
        assert!(cmd.le.is_none());

        // Data and Le
        let cmd = Command::from_bytes(&[0x80, 0xA0, 0x00, 0x00, 0x01, 0xAA, 0x36]).unwrap();
        assert_eq!(cmd.data.as_deref(), Some(&[0xAA][..]));
        assert_eq!(cmd.le, Some(0x36));

        // Le only, 0x00 meaning 256
        let cmd = Command::from_bytes(&[0x80, 0xD1, 0x05, 0x00, 0x00]).unwrap();
        assert_eq!(cmd.le, Some(256));

        // Truncated data
        assert_eq!(
            Command::from_bytes(&[0x80, 0xD0, 0x01, 0x00, 0x03, 0x01]),
            Err(CommandError::InvalidCommandLength(6))
        );
        assert_eq!(
            Command::from_bytes(&[0x80, 0xD0]),
            Err(CommandError::InvalidCommandLength(2))
        );
    }

    #[test]
    fn test_round_trip_through_parser() {
        let command = Command::new_with_data(0x80, 0xA0, 0x00, 0x00, vec![0x11; 16]).with_le(0x36);
        let parsed = Command::from_bytes(&command.to_bytes().unwrap()).unwrap();
        assert_eq!(parsed, command);
    }
}
