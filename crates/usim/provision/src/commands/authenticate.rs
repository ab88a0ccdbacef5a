use usim_apdu_core::{ApduCommand, ExpectedLength, Response};

use super::check_status;
use crate::constants::{AUTH_RESPONSE_LEN, CLA_CONFIG, RAND_LEN, ins};
use crate::{AuthVectors, Error};

/// Run the card's authentication self-test on a challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticateCommand {
    rand: [u8; RAND_LEN],
}

impl AuthenticateCommand {
    /// Create a self-test for the given RAND
    pub const fn new(rand: [u8; RAND_LEN]) -> Self {
        Self { rand }
    }
}

impl ApduCommand for AuthenticateCommand {
    type Success = AuthVectors;
    type Error = Error;

    fn convert_error(error: usim_apdu_core::Error) -> Self::Error {
        Error::from(error)
    }

    fn class(&self) -> u8 {
        CLA_CONFIG
    }

    fn instruction(&self) -> u8 {
        ins::AUTHENTICATE
    }

    fn p1(&self) -> u8 {
        0x00
    }

    fn p2(&self) -> u8 {
        0x00
    }

    fn data(&self) -> Option<&[u8]> {
        Some(&self.rand)
    }

    fn expected_length(&self) -> Option<ExpectedLength> {
        Some(AUTH_RESPONSE_LEN as ExpectedLength)
    }

    fn parse_response(response: Response) -> Result<Self::Success, Self::Error> {
        check_status(&response)?;
        AuthVectors::try_from(response.data())
    }
}
