//! Duplex byte channels

use std::fmt;
use std::io::{self, Read, Write};

use serialport::{ClearBuffer, SerialPort};
use tracing::debug;
use usim_apdu_core::TransportError;

use crate::SerialConfig;

/// A duplex byte channel
pub trait ByteChannel: Send + fmt::Debug {
    /// Write every byte of `bytes`
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Read up to `max` bytes, stopping early when the line goes quiet
    ///
    /// Returning fewer bytes, or none at all, is not an error.
    fn read_available(&mut self, max: usize) -> io::Result<Vec<u8>>;
}

/// An open serial port
pub struct SerialChannel {
    name: String,
    port: Box<dyn SerialPort>,
}

impl fmt::Debug for SerialChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialChannel")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl SerialChannel {
    /// Open the port named in the configuration
    pub fn open(config: &SerialConfig) -> Result<Self, TransportError> {
        let port = serialport::new(&config.port, config.baud_rate)
            .timeout(config.timeout)
            .open()
            .map_err(|err| TransportError::Open {
                port: config.port.clone(),
                reason: err.to_string(),
            })?;

        // Discard anything the programmer printed before we connected
        if let Err(err) = port.clear(ClearBuffer::All) {
            debug!(port = %config.port, error = %err, "Could not clear serial buffers");
        }

        Ok(Self {
            name: config.port.clone(),
            port,
        })
    }
}

impl ByteChannel for SerialChannel {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.port.write_all(bytes)?;
        self.port.flush()
    }

    fn read_available(&mut self, max: usize) -> io::Result<Vec<u8>> {
        read_until_timeout(&mut self.port, max)
    }
}

/// Read until `max` bytes arrive or the reader times out
///
/// A response may arrive in several bursts, so a short read is not taken as
/// the end of it. Only a timeout or end of stream stops the read early.
fn read_until_timeout<R: Read + ?Sized>(reader: &mut R, max: usize) -> io::Result<Vec<u8>> {
    let mut buffer = vec![0u8; max];
    let mut filled = 0;

    while filled < max {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::TimedOut => break,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }

    buffer.truncate(filled);
    Ok(buffer)
}
