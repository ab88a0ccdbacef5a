use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::AUTH_RESPONSE_LEN;
use crate::Error;

/// Vectors produced by the authentication self-test
///
/// The response data is sliced in order: RES (8), CK (16), IK (16), AK (6)
/// and KC (8). Bytes beyond the first 54 are ignored.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct AuthVectors {
    /// Authentication response
    pub res: [u8; 8],
    /// Cipher key
    pub ck: [u8; 16],
    /// Integrity key
    pub ik: [u8; 16],
    /// Anonymity key
    pub ak: [u8; 6],
    /// GSM cipher key
    pub kc: [u8; 8],
}

impl TryFrom<&[u8]> for AuthVectors {
    type Error = Error;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        if data.len() < AUTH_RESPONSE_LEN {
            return Err(Error::Protocol {
                operation: "authenticate",
                expected: AUTH_RESPONSE_LEN,
                actual: data.len(),
            });
        }

        let mut vectors = Self {
            res: [0; 8],
            ck: [0; 16],
            ik: [0; 16],
            ak: [0; 6],
            kc: [0; 8],
        };
        vectors.res.copy_from_slice(&data[0..8]);
        vectors.ck.copy_from_slice(&data[8..24]);
        vectors.ik.copy_from_slice(&data[24..40]);
        vectors.ak.copy_from_slice(&data[40..46]);
        vectors.kc.copy_from_slice(&data[46..54]);
        Ok(vectors)
    }
}

// Only RES is shown; the keys stay out of logs.
impl fmt::Debug for AuthVectors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthVectors")
            .field("res", &hex::encode_upper(self.res))
            .finish_non_exhaustive()
    }
}

impl fmt::Display for AuthVectors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RES: {}", hex::encode_upper(self.res))?;
        writeln!(f, "CK:  {}", hex::encode_upper(self.ck))?;
        writeln!(f, "IK:  {}", hex::encode_upper(self.ik))?;
        writeln!(f, "AK:  {}", hex::encode_upper(self.ak))?;
        write!(f, "KC:  {}", hex::encode_upper(self.kc))
    }
}
