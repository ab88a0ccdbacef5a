//! Configuration options for the serial transport

use std::time::Duration;

/// Device used when no port is given
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";

/// Line speed of the programmer
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Read timeout applied to the port
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Pause after opening the port before the first exchange
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Pause between writing a command and reading its response
pub const DEFAULT_READ_WAIT: Duration = Duration::from_millis(500);

/// Upper bound on bytes read for a single response
pub const DEFAULT_MAX_RESPONSE_LEN: usize = 300;

/// Configuration options for the serial transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Serial device identifier
    pub port: String,

    /// Baud rate
    pub baud_rate: u32,

    /// Read timeout
    pub timeout: Duration,

    /// Delay after opening the channel
    pub settle_delay: Duration,

    /// Delay before each read
    pub read_wait: Duration,

    /// Maximum number of bytes read per response
    pub max_response_len: usize,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
            settle_delay: DEFAULT_SETTLE_DELAY,
            read_wait: DEFAULT_READ_WAIT,
            max_response_len: DEFAULT_MAX_RESPONSE_LEN,
        }
    }
}

impl SerialConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the serial device
    pub fn with_port<S: Into<String>>(mut self, port: S) -> Self {
        self.port = port.into();
        self
    }

    /// Set the baud rate
    pub const fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the read timeout
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the settle delay after opening
    pub const fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set the wait before each read
    pub const fn with_read_wait(mut self, wait: Duration) -> Self {
        self.read_wait = wait;
        self
    }

    /// Set the maximum response size
    pub const fn with_max_response_len(mut self, len: usize) -> Self {
        self.max_response_len = len;
        self
    }

    /// Zero both fixed delays, for stubs that answer immediately
    pub const fn without_delays(self) -> Self {
        self.with_settle_delay(Duration::ZERO)
            .with_read_wait(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SerialConfig::default();
        assert_eq!(config.port, "/dev/ttyUSB0");
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.settle_delay, Duration::from_secs(2));
        assert_eq!(config.read_wait, Duration::from_millis(500));
        assert_eq!(config.max_response_len, 300);
    }

    #[test]
    fn test_builder() {
        let config = SerialConfig::new()
            .with_port("/dev/ttyACM1")
            .with_baud_rate(9600)
            .without_delays();
        assert_eq!(config.port, "/dev/ttyACM1");
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.settle_delay, Duration::ZERO);
        assert_eq!(config.read_wait, Duration::ZERO);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }
}
