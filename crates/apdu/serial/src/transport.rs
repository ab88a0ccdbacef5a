//! Serial transport implementation

use std::thread;

use bytes::Bytes;
use tracing::{debug, info, trace};
use usim_apdu_core::transport::{CardTransport, TransportError};

use crate::{ByteChannel, SerialChannel, SerialConfig};

/// APDU transport over a serial byte channel
///
/// The channel is held as an `Option`: once closed, every exchange fails with
/// [`TransportError::NotConnected`] without touching the device. The channel
/// is also closed on drop.
#[derive(Debug)]
pub struct SerialTransport<C: ByteChannel = SerialChannel> {
    channel: Option<C>,
    config: SerialConfig,
}

impl SerialTransport<SerialChannel> {
    /// Open the configured serial port and wait for the device to settle
    pub fn open(config: SerialConfig) -> Result<Self, TransportError> {
        let channel = SerialChannel::open(&config)?;
        info!(port = %config.port, baud_rate = config.baud_rate, "Serial port opened");
        Ok(Self::with_channel(channel, config))
    }
}

impl<C: ByteChannel> SerialTransport<C> {
    /// Wrap an already open channel
    ///
    /// The settle delay from `config` is applied here.
    pub fn with_channel(channel: C, config: SerialConfig) -> Self {
        if !config.settle_delay.is_zero() {
            debug!(delay = ?config.settle_delay, "Waiting for device to settle");
            thread::sleep(config.settle_delay);
        }

        Self {
            channel: Some(channel),
            config,
        }
    }

    /// The active configuration
    pub const fn config(&self) -> &SerialConfig {
        &self.config
    }

    /// Close the channel; later exchanges fail without I/O
    ///
    /// Returns the channel if it was still open.
    pub fn close(&mut self) -> Option<C> {
        let channel = self.channel.take();
        if channel.is_some() {
            info!(port = %self.config.port, "Serial port closed");
        }
        channel
    }
}

impl<C: ByteChannel> CardTransport for SerialTransport<C> {
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        let channel = self.channel.as_mut().ok_or(TransportError::NotConnected)?;

        channel.write_all(command).map_err(TransportError::Write)?;
        trace!(length = command.len(), "Command written");

        if !self.config.read_wait.is_zero() {
            thread::sleep(self.config.read_wait);
        }

        let response = channel
            .read_available(self.config.max_response_len)
            .map_err(TransportError::Read)?;
        trace!(length = response.len(), "Response read");

        Ok(Bytes::from(response))
    }

    fn is_connected(&self) -> bool {
        self.channel.is_some()
    }
}

impl<C: ByteChannel> Drop for SerialTransport<C> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;

    use super::*;

    /// Channel that records writes and replays canned reads
    #[derive(Debug, Default)]
    struct ScriptedChannel {
        written: Vec<Vec<u8>>,
        reads: VecDeque<Vec<u8>>,
        fail_writes: bool,
    }

    impl ByteChannel for ScriptedChannel {
        fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
            if self.fail_writes {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged"));
            }
            self.written.push(bytes.to_vec());
            Ok(())
        }

        fn read_available(&mut self, max: usize) -> io::Result<Vec<u8>> {
            let mut next = self.reads.pop_front().unwrap_or_default();
            next.truncate(max);
            Ok(next)
        }
    }

    fn transport(channel: ScriptedChannel) -> SerialTransport<ScriptedChannel> {
        SerialTransport::with_channel(channel, SerialConfig::default().without_delays())
    }

    #[test]
    fn test_transmit_writes_then_reads() {
        let channel = ScriptedChannel {
            reads: VecDeque::from([vec![0x90, 0x00]]),
            ..Default::default()
        };
        let mut transport = transport(channel);

        let response = transport.transmit_raw(&[0x80, 0xE0, 0x00, 0x00]).unwrap();
        assert_eq!(response.as_ref(), &[0x90, 0x00]);

        let channel = transport.close().unwrap();
        assert_eq!(channel.written, vec![vec![0x80, 0xE0, 0x00, 0x00]]);
    }

    #[test]
    fn test_silent_device_yields_empty_response() {
        let mut transport = transport(ScriptedChannel::default());
        let response = transport.transmit_raw(&[0x80, 0xE0, 0x00, 0x00]).unwrap();
        assert!(response.is_empty());
    }

    #[test]
    fn test_read_is_capped() {
        let channel = ScriptedChannel {
            reads: VecDeque::from([vec![0xAA; 400]]),
            ..Default::default()
        };
        let mut transport = SerialTransport::with_channel(
            channel,
            SerialConfig::default()
                .without_delays()
                .with_max_response_len(300),
        );
        let response = transport.transmit_raw(&[0x80, 0xE0, 0x00, 0x00]).unwrap();
        assert_eq!(response.len(), 300);
    }

    #[test]
    fn test_closed_transport_short_circuits() {
        let mut transport = transport(ScriptedChannel::default());
        assert!(transport.is_connected());
        assert!(transport.close().is_some());
        assert!(!transport.is_connected());
        assert!(transport.close().is_none());

        assert!(matches!(
            transport.transmit_raw(&[0x80, 0xE0, 0x00, 0x00]),
            Err(TransportError::NotConnected)
        ));
    }

    #[test]
    fn test_write_failure() {
        let channel = ScriptedChannel {
            fail_writes: true,
            ..Default::default()
        };
        let mut transport = transport(channel);
        assert!(matches!(
            transport.transmit_raw(&[0x80, 0xE0, 0x00, 0x00]),
            Err(TransportError::Write(_))
        ));
    }
}
