//! Executor for APDU command execution
//!
//! This module provides the trait for APDU command execution.
//! The actual card executor implementation is in the `card` module.

use std::fmt;

use crate::command::ApduCommand;
use crate::error::Error;
use crate::{CardTransport, Response};
use bytes::Bytes;
use tracing::{debug, instrument, trace};

/// Trait for APDU command execution
///
/// Exactly one exchange is in flight at a time: a frame is written, then one
/// response is read back before anything else happens.
pub trait Executor: Send + fmt::Debug {
    /// The transport type used by this executor
    type Transport: CardTransport;

    /// Get a reference to the underlying transport
    fn transport(&self) -> &Self::Transport;

    /// Transmit a raw APDU command
    ///
    /// This is the lowest level public transmission method.
    #[instrument(level = "trace", skip(self), fields(executor = std::any::type_name::<Self>()))]
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Error> {
        trace!(command = %hex::encode_upper(command), "Transmitting raw command");
        let response = self.do_transmit_raw(command);
        match &response {
            Ok(bytes) => {
                trace!(response = %hex::encode_upper(bytes), "Received raw response");
            }
            Err(err) => {
                debug!(error = ?err, "Error during raw transmission");
            }
        }
        response
    }

    /// Internal implementation of transmit_raw
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Error>;

    /// Execute a typed APDU command and return the command's success type
    ///
    /// Framing failures, transport failures and short responses are handed to
    /// the command's own error type through [`ApduCommand::convert_error`].
    fn execute<C>(&mut self, command: &C) -> Result<C::Success, C::Error>
    where
        C: ApduCommand,
    {
        let command_bytes = command
            .to_bytes()
            .map_err(|e| C::convert_error(e.into()))?;
        let response_bytes = self
            .transmit_raw(&command_bytes)
            .map_err(C::convert_error)?;
        let response = Response::from_bytes(&response_bytes)
            .map_err(|e| C::convert_error(e.into()))?;

        C::parse_response(response)
    }
}
