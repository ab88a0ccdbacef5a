//! Wire constants of the provisioning protocol

use std::fmt;

/// Class byte of every provisioning command
pub const CLA_CONFIG: u8 = 0x80;

/// Instruction bytes
pub mod ins {
    /// Write one configuration field
    pub const WRITE_CONFIG: u8 = 0xD0;
    /// Read one configuration field
    pub const READ_CONFIG: u8 = 0xD1;
    /// Run the authentication self-test on a challenge
    pub const AUTHENTICATE: u8 = 0xA0;
    /// Reset the card's session state
    pub const RESET: u8 = 0xE0;
}

/// Encoded IMSI record: length byte plus 8 packed BCD bytes
pub const IMSI_RECORD_LEN: usize = 9;
/// Largest number of IMSI digits the record carries
pub const IMSI_MAX_DIGITS: usize = 15;
/// Smallest number of IMSI digits accepted in a profile
pub const IMSI_MIN_PROFILE_DIGITS: usize = 6;
/// Length of the secret key K and of OPc
pub const KEY_LEN: usize = 16;
/// Length of the authentication challenge RAND
pub const RAND_LEN: usize = 16;
/// Encoded PIN field length
pub const PIN_FIELD_LEN: usize = 8;
/// Shortest accepted PIN
pub const PIN_MIN_DIGITS: usize = 4;
/// Padding byte for unused record space
pub const PAD: u8 = 0xFF;

/// Data returned by a status read: state, PIN retries, version major, version minor
pub const STATUS_RESPONSE_LEN: usize = 4;
/// Data returned by the authentication self-test: RES, CK, IK, AK, KC
pub const AUTH_RESPONSE_LEN: usize = 0x36;

/// Challenge used when none is given
pub const DEFAULT_RAND: [u8; RAND_LEN] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
];

/// Built-in profile values
pub mod defaults {
    /// Test-network IMSI
    pub const IMSI: &str = "901234567890123";
    /// Secret key K
    pub const KEY: &str = "465B5CE8B199B49FAA5F0A2EE238A6BC";
    /// Operator constant OPc
    pub const OPC: &str = "CD63CB71954A9F4E48A5994B865AE955";
    /// PIN1
    pub const PIN: &str = "0000";
}

/// Data-type tag sent as P1 of read/write configuration commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DataType {
    /// Subscriber identity
    Imsi = 0x01,
    /// Secret key K
    Key = 0x02,
    /// Operator constant OPc
    Opc = 0x03,
    /// PIN1
    Pin = 0x04,
    /// Card status block (read only)
    Status = 0x05,
}

impl DataType {
    /// P1 tag value
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Name used in reports and logs
    pub const fn label(self) -> &'static str {
        match self {
            Self::Imsi => "IMSI",
            Self::Key => "Key K",
            Self::Opc => "OPc",
            Self::Pin => "PIN",
            Self::Status => "Status",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
