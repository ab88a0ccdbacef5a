//! Status word handling
//!
//! `90 00` is the only success code. Every other value is reported as-is; the
//! catalogue in [`common`] exists for display, not for control flow.

use std::fmt;

/// Two-byte status word terminating every response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusWord {
    /// First status byte
    pub sw1: u8,
    /// Second status byte
    pub sw2: u8,
}

impl StatusWord {
    /// Create a status word from its two bytes
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self { sw1, sw2 }
    }

    /// Create a status word from its big-endian 16-bit value
    pub const fn from_u16(value: u16) -> Self {
        let [sw1, sw2] = value.to_be_bytes();
        Self { sw1, sw2 }
    }

    /// Combined big-endian 16-bit value
    pub const fn to_u16(self) -> u16 {
        u16::from_be_bytes([self.sw1, self.sw2])
    }

    /// Wire representation
    pub const fn to_bytes(self) -> [u8; 2] {
        [self.sw1, self.sw2]
    }

    /// Whether this is `90 00`
    pub const fn is_success(self) -> bool {
        self.sw1 == 0x90 && self.sw2 == 0x00
    }

    /// Human readable name for well-known status words
    pub const fn description(self) -> Option<&'static str> {
        use common::*;

        Some(match self {
            SUCCESS => "success",
            WRONG_LENGTH => "wrong length",
            AUTHENTICATION_FAILED => "authentication failed",
            SECURITY_STATUS_NOT_SATISFIED => "security status not satisfied",
            PIN_BLOCKED => "PIN blocked",
            COMMAND_NOT_ALLOWED => "command not allowed",
            FILE_NOT_FOUND => "file not found",
            WRONG_PARAMETERS => "wrong parameters",
            INS_NOT_SUPPORTED => "instruction not supported",
            CLA_NOT_SUPPORTED => "class not supported",
            NO_CONNECTION => "no connection",
            MEMORY_PROBLEM => "memory problem",
            _ => return None,
        })
    }
}

impl From<u16> for StatusWord {
    fn from(value: u16) -> Self {
        Self::from_u16(value)
    }
}

impl From<StatusWord> for u16 {
    fn from(status: StatusWord) -> Self {
        status.to_u16()
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}", self.sw1, self.sw2)
    }
}

/// Common status words
pub mod common {
    use super::StatusWord;

    /// Normal processing
    pub const SUCCESS: StatusWord = StatusWord::new(0x90, 0x00);
    /// Wrong length; also synthesized locally for an unframeable payload
    pub const WRONG_LENGTH: StatusWord = StatusWord::new(0x67, 0x00);
    /// Authentication failed
    pub const AUTHENTICATION_FAILED: StatusWord = StatusWord::new(0x63, 0x00);
    /// Security status not satisfied
    pub const SECURITY_STATUS_NOT_SATISFIED: StatusWord = StatusWord::new(0x69, 0x82);
    /// Authentication method blocked
    pub const PIN_BLOCKED: StatusWord = StatusWord::new(0x69, 0x83);
    /// Command not allowed
    pub const COMMAND_NOT_ALLOWED: StatusWord = StatusWord::new(0x69, 0x86);
    /// File not found
    pub const FILE_NOT_FOUND: StatusWord = StatusWord::new(0x6A, 0x82);
    /// Wrong parameters P1-P2
    pub const WRONG_PARAMETERS: StatusWord = StatusWord::new(0x6B, 0x00);
    /// Instruction not supported
    pub const INS_NOT_SUPPORTED: StatusWord = StatusWord::new(0x6D, 0x00);
    /// Class not supported
    pub const CLA_NOT_SUPPORTED: StatusWord = StatusWord::new(0x6E, 0x00);
    /// No precise diagnosis; synthesized locally when there is no usable connection
    pub const NO_CONNECTION: StatusWord = StatusWord::new(0x6F, 0x00);
    /// Memory problem
    pub const MEMORY_PROBLEM: StatusWord = StatusWord::new(0x92, 0x40);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_word_conversion() {
        let sw = StatusWord::from_u16(0x6F00);
        assert_eq!(sw, StatusWord::new(0x6F, 0x00));
        assert_eq!(sw.to_u16(), 0x6F00);
        assert_eq!(sw.to_bytes(), [0x6F, 0x00]);
        assert_eq!(sw.to_string(), "6F00");
    }

    #[test]
    fn test_only_9000_is_success() {
        assert!(common::SUCCESS.is_success());
        assert!(!StatusWord::new(0x90, 0x01).is_success());
        assert!(!StatusWord::new(0x61, 0x00).is_success());
        assert!(!common::NO_CONNECTION.is_success());
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(common::WRONG_LENGTH.description(), Some("wrong length"));
        assert_eq!(StatusWord::new(0x12, 0x34).description(), None);
    }
}
