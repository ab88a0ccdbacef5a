//! Card executor implementation
//!
//! This module provides the CardExecutor implementation, which drives a card
//! transport one exchange at a time.

use std::fmt;

use crate::error::{Error, ResultExt};
use crate::executor::Executor;
use crate::transport::CardTransport;
use bytes::Bytes;

/// Card executor implementation over a transport
pub struct CardExecutor<T>
where
    T: CardTransport,
{
    /// The transport used for communication
    transport: T,
    /// The last response received
    last_response: Option<Bytes>,
}

impl<T> fmt::Debug for CardExecutor<T>
where
    T: CardTransport,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardExecutor")
            .field("transport", &self.transport)
            .field("last_response", &self.last_response)
            .finish()
    }
}

impl<T> CardExecutor<T>
where
    T: CardTransport,
{
    /// Create a new card executor with the given transport
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            last_response: None,
        }
    }

    /// Get the last response received
    pub const fn last_response_bytes(&self) -> Option<&Bytes> {
        self.last_response.as_ref()
    }

    /// Give back the transport, e.g. to close it explicitly
    pub fn into_transport(self) -> T {
        self.transport
    }
}

impl<T> Executor for CardExecutor<T>
where
    T: CardTransport,
{
    type Transport = T;

    fn transport(&self) -> &T {
        &self.transport
    }

    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Error> {
        let response = self
            .transport
            .transmit_raw(command)
            .context("Transport error")?;
        self.last_response = Some(response.clone());
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::response::status::common;
    use crate::transport::{MockTransport, TransportError};

    #[test]
    fn test_executor_basic_transmit() {
        let transport = MockTransport::with_response(Bytes::from_static(&[0x90, 0x00]));
        let mut executor = CardExecutor::new(transport);

        let response = executor.transmit_raw(&[0x80, 0xE0, 0x00, 0x00]).unwrap();
        assert_eq!(response.as_ref(), &[0x90, 0x00]);
        assert_eq!(executor.last_response_bytes(), Some(&response));
    }

    #[test]
    fn test_executor_execute_generic_command() {
        let transport =
            MockTransport::with_response(Bytes::from_static(&[0x01, 0x03, 0x02, 0x01, 0x90, 0x00]));
        let mut executor = CardExecutor::new(transport);

        let command = Command::new_with_le(0x80, 0xD1, 0x05, 0x00, 4);
        let response = executor.execute(&command).unwrap();
        assert!(response.is_success());
        assert_eq!(response.data(), &[0x01, 0x03, 0x02, 0x01]);
        assert_eq!(
            executor.transport().sent_commands()[0].as_ref(),
            &[0x80, 0xD1, 0x05, 0x00, 0x04]
        );
    }

    #[test]
    fn test_executor_short_response_is_transport_error() {
        let transport = MockTransport::with_response(Bytes::from_static(&[0x90]));
        let mut executor = CardExecutor::new(transport);

        let err = executor
            .execute(&Command::new(0x80, 0xE0, 0x00, 0x00))
            .unwrap_err();
        assert!(matches!(
            err.root(),
            Error::Transport(TransportError::ShortResponse { length: 1 })
        ));
        assert_eq!(err.local_status(), common::NO_CONNECTION);
    }

    #[test]
    fn test_executor_unframeable_command_never_sent() {
        let transport = MockTransport::with_response(Bytes::from_static(&[0x90, 0x00]));
        let mut executor = CardExecutor::new(transport);

        let command = Command::new_with_data(0x80, 0xD0, 0x01, 0x00, vec![0u8; 256]);
        let err = executor.execute(&command).unwrap_err();
        assert_eq!(err.local_status(), common::WRONG_LENGTH);
        assert!(executor.transport().sent_commands().is_empty());
    }
}
