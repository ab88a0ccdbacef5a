use derive_more::{Display, From, Into};

use crate::constants::STATUS_RESPONSE_LEN;
use crate::Error;

/// Card firmware version (major.minor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, From, Into)]
#[display("{}.{}", major, minor)]
pub struct FirmwareVersion {
    /// Major version
    pub major: u8,
    /// Minor version
    pub minor: u8,
}

/// Session state reported by the card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SimState {
    /// No application selected
    #[display("idle")]
    Idle,
    /// Application selected
    #[display("selected")]
    Selected,
    /// Authentication completed
    #[display("authenticated")]
    Authenticated,
    /// PIN verified
    #[display("PIN verified")]
    PinVerified,
    /// A state byte this tool does not know
    #[display("unknown ({_0:#04x})")]
    Unknown(u8),
}

impl SimState {
    /// Raw state byte
    pub const fn raw(self) -> u8 {
        match self {
            Self::Idle => 0x00,
            Self::Selected => 0x01,
            Self::Authenticated => 0x02,
            Self::PinVerified => 0x04,
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<u8> for SimState {
    fn from(raw: u8) -> Self {
        match raw {
            0x00 => Self::Idle,
            0x01 => Self::Selected,
            0x02 => Self::Authenticated,
            0x04 => Self::PinVerified,
            other => Self::Unknown(other),
        }
    }
}

/// Card status block returned by a status read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("state {state}, {pin_retries} PIN retries, firmware {version}")]
pub struct SimStatus {
    /// Session state
    pub state: SimState,
    /// Remaining PIN attempts
    pub pin_retries: u8,
    /// Firmware version
    pub version: FirmwareVersion,
}

impl TryFrom<&[u8]> for SimStatus {
    type Error = Error;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        let [state, pin_retries, major, minor] = match data {
            [a, b, c, d, ..] => [*a, *b, *c, *d],
            _ => {
                return Err(Error::Protocol {
                    operation: "read status",
                    expected: STATUS_RESPONSE_LEN,
                    actual: data.len(),
                });
            }
        };

        Ok(Self {
            state: SimState::from(state),
            pin_retries,
            version: FirmwareVersion { major, minor },
        })
    }
}
