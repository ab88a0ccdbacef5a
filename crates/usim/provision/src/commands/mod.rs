//! Typed provisioning commands
//!
//! Each command knows its header bytes and how to turn a card response into
//! its success type. Status words other than `90 00` become
//! [`Error::Status`](crate::Error::Status).

mod authenticate;
mod read_config;
mod reset;
mod write_config;

pub use authenticate::AuthenticateCommand;
pub use read_config::ReadConfigCommand;
pub use reset::ResetCommand;
pub use write_config::WriteConfigCommand;

use usim_apdu_core::Response;

use crate::Error;

/// Accept a response only when the card reported success
pub(crate) fn check_status(response: &Response) -> Result<(), Error> {
    if response.is_success() {
        Ok(())
    } else {
        Err(Error::Status {
            status: response.status(),
        })
    }
}
