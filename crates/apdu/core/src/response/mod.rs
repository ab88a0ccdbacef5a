//! APDU response definitions
//!
//! A response is the data returned by the card followed by a two-byte status
//! word. The interpreter here does not look inside the data; callers decode it
//! according to the instruction they sent.

pub mod status;

use std::fmt;

use bytes::Bytes;

use crate::transport::TransportError;
use status::StatusWord;

/// APDU response: optional data plus status word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    payload: Option<Bytes>,
    status: StatusWord,
}

/// Split a raw received byte sequence into data and status word
///
/// The last two bytes are the status word and everything before them is data.
/// Fewer than two bytes is a transport failure, not a protocol one.
pub fn split_response(raw: &[u8]) -> Result<Response, TransportError> {
    if raw.len() < 2 {
        return Err(TransportError::ShortResponse { length: raw.len() });
    }

    let (data, sw) = raw.split_at(raw.len() - 2);
    let payload = (!data.is_empty()).then(|| Bytes::copy_from_slice(data));

    Ok(Response::new(payload, StatusWord::new(sw[0], sw[1])))
}

impl Response {
    /// Create a new response
    pub const fn new(payload: Option<Bytes>, status: StatusWord) -> Self {
        Self { payload, status }
    }

    /// Create a successful (`90 00`) response
    pub const fn success(payload: Option<Bytes>) -> Self {
        Self::new(payload, status::common::SUCCESS)
    }

    /// Create a response carrying only a status word
    pub const fn from_status(status: StatusWord) -> Self {
        Self::new(None, status)
    }

    /// Parse a response from raw bytes
    pub fn from_bytes(raw: &[u8]) -> Result<Self, TransportError> {
        split_response(raw)
    }

    /// Response data, if any
    pub const fn payload(&self) -> &Option<Bytes> {
        &self.payload
    }

    /// Response data as a slice, empty when the card returned none
    pub fn data(&self) -> &[u8] {
        self.payload.as_deref().unwrap_or_default()
    }

    /// Status word
    pub const fn status(&self) -> StatusWord {
        self.status
    }

    /// Whether the status word is `90 00`
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl From<Response> for Bytes {
    fn from(response: Response) -> Self {
        let mut raw = response.payload.map(Vec::from).unwrap_or_default();
        raw.extend_from_slice(&response.status.to_bytes());
        Self::from(raw)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Some(data) => write!(f, "{} SW={}", hex::encode_upper(data), self.status),
            None => write!(f, "SW={}", self.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_success() {
        let response = split_response(&[0x01, 0x02, 0x90, 0x00]).unwrap();
        assert!(response.is_success());
        assert_eq!(response.data(), &[0x01, 0x02]);
        assert_eq!(response.status().to_u16(), 0x9000);
    }

    #[test]
    fn test_split_status_only() {
        let response = split_response(&[0x90, 0x00]).unwrap();
        assert!(response.is_success());
        assert!(response.payload().is_none());
        assert!(response.data().is_empty());
    }

    #[test]
    fn test_split_failure_status() {
        let response = split_response(&[0xAB, 0x6F, 0x00]).unwrap();
        assert!(!response.is_success());
        assert_eq!(response.status().to_u16(), 0x6F00);
        assert_eq!(response.data(), &[0xAB]);
    }

    #[test]
    fn test_split_too_short() {
        assert!(matches!(
            split_response(&[0x90]),
            Err(TransportError::ShortResponse { length: 1 })
        ));
        assert!(matches!(
            split_response(&[]),
            Err(TransportError::ShortResponse { length: 0 })
        ));
    }

    #[test]
    fn test_response_into_bytes() {
        let response = Response::success(Some(Bytes::from_static(&[0x01, 0x03])));
        let raw: Bytes = response.into();
        assert_eq!(raw.as_ref(), &[0x01, 0x03, 0x90, 0x00]);
    }
}
