//! Card transport abstraction
//!
//! A transport moves one raw command frame to the card and returns whatever
//! bytes came back. Framing and status interpretation happen above it.

use std::collections::VecDeque;
use std::fmt;

use bytes::Bytes;

/// Errors raised by a card transport
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No open channel to exchange over
    #[error("Transport not connected")]
    NotConnected,

    /// The channel could not be opened
    #[error("Failed to open {port}: {reason}")]
    Open {
        /// Channel identifier, e.g. a serial device path
        port: String,
        /// Underlying failure
        reason: String,
    },

    /// Writing the command frame failed
    #[error("Write failed: {0}")]
    Write(#[source] std::io::Error),

    /// Reading the response failed
    #[error("Read failed: {0}")]
    Read(#[source] std::io::Error),

    /// Fewer than two bytes came back, so there is no status word
    #[error("Response too short: expected at least 2 bytes, got {length}")]
    ShortResponse {
        /// Number of bytes received
        length: usize,
    },
}

/// Trait for anything that can carry raw APDU frames to a card
pub trait CardTransport: Send + fmt::Debug {
    /// Send a raw command frame and return the raw response bytes
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError>;

    /// Whether the underlying channel is open
    fn is_connected(&self) -> bool;
}

impl<T: CardTransport + ?Sized> CardTransport for Box<T> {
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        (**self).transmit_raw(command)
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
}

/// Scripted in-memory transport for tests
///
/// Queued responses are returned in order; once the queue is empty the
/// repeating default response is used, and without one an empty read is
/// returned, the same as a silent device.
#[derive(Debug, Clone)]
pub struct MockTransport {
    responses: VecDeque<Bytes>,
    default_response: Option<Bytes>,
    sent: Vec<Bytes>,
    connected: bool,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self {
            responses: VecDeque::new(),
            default_response: None,
            sent: Vec::new(),
            connected: true,
        }
    }
}

impl MockTransport {
    /// Create a connected transport with no scripted responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that answers every command with the same bytes
    pub fn with_response(response: impl Into<Bytes>) -> Self {
        Self {
            default_response: Some(response.into()),
            ..Self::default()
        }
    }

    /// Create a transport that answers commands with the given bytes in order
    pub fn with_responses<I, B>(responses: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Create a transport whose channel is closed
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            ..Self::default()
        }
    }

    /// Queue one more response
    pub fn push_response(&mut self, response: impl Into<Bytes>) -> &mut Self {
        self.responses.push_back(response.into());
        self
    }

    /// Frames sent so far, in order
    pub fn sent_commands(&self) -> &[Bytes] {
        &self.sent
    }
}

impl CardTransport for MockTransport {
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        if !self.connected {
            return Err(TransportError::NotConnected);
        }

        self.sent.push(Bytes::copy_from_slice(command));

        Ok(self
            .responses
            .pop_front()
            .or_else(|| self.default_response.clone())
            .unwrap_or_default())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
