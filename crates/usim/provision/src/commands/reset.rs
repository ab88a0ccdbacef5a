use usim_apdu_core::{ApduCommand, ExpectedLength, Response};

use super::check_status;
use crate::constants::{CLA_CONFIG, ins};
use crate::Error;

/// Reset the card's session state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetCommand;

impl ApduCommand for ResetCommand {
    type Success = ();
    type Error = Error;

    fn convert_error(error: usim_apdu_core::Error) -> Self::Error {
        Error::from(error)
    }

    fn class(&self) -> u8 {
        CLA_CONFIG
    }

    fn instruction(&self) -> u8 {
        ins::RESET
    }

    fn p1(&self) -> u8 {
        0x00
    }

    fn p2(&self) -> u8 {
        0x00
    }

    fn data(&self) -> Option<&[u8]> {
        None
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

    #[test]
    fn test_header_only() {
        assert_eq!(ResetCommand.to_bytes().unwrap().as_ref(), &[0x80, 0xE0, 0x00, 0x00]);
    }
}
