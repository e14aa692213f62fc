//! ECDSA signature triples produced by a key custodian.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Length of a raw `r || s || v` signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// Failure to interpret a custodian's raw signature.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureParseError {
    #[error("signature is not valid hex: {0}")]
    InvalidHex(String),

    #[error("signature must be 65 bytes, got {0}")]
    InvalidLength(usize),

    #[error("unsupported recovery id {0}")]
    InvalidRecoveryId(u8),
}

/// An `{r, s, v}` signature with `v` in the `{27, 28}` convention.
///
/// Deserialization applies the same recovery id rules as
/// [`EcdsaSignature::from_rsv_hex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSignature")]
pub struct EcdsaSignature {
    pub r: B256,
    pub s: B256,
    pub v: u8,
}

/// Wire form of a signature before `v` is checked.
#[derive(Deserialize)]
struct RawSignature {
    r: B256,
    s: B256,
    v: u8,
}

impl TryFrom<RawSignature> for EcdsaSignature {
    type Error = SignatureParseError;

    fn try_from(raw: RawSignature) -> Result<Self, Self::Error> {
        Ok(Self {
            r: raw.r,
            s: raw.s,
            v: normalize_recovery_id(raw.v)?,
        })
    }
}

/// Map `v` of 0 or 1 onto 27 or 28; reject anything else.
fn normalize_recovery_id(v: u8) -> Result<u8, SignatureParseError> {
    match v {
        0 | 1 => Ok(v + 27),
        27 | 28 => Ok(v),
        other => Err(SignatureParseError::InvalidRecoveryId(other)),
    }
}

impl EcdsaSignature {
    /// Parse a hex-encoded `r || s || v` signature.
    ///
    /// Custodians disagree on the recovery id convention; `v` of 0 or 1 is
    /// shifted to 27 or 28.
    pub fn from_rsv_hex(raw: &str) -> Result<Self, SignatureParseError> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes =
            hex::decode(digits).map_err(|e| SignatureParseError::InvalidHex(e.to_string()))?;

        if bytes.len() != SIGNATURE_LENGTH {
            return Err(SignatureParseError::InvalidLength(bytes.len()));
        }

        Ok(Self {
            r: B256::from_slice(&bytes[..32]),
            s: B256::from_slice(&bytes[32..64]),
            v: normalize_recovery_id(bytes[64])?,
        })
    }

    /// The 65-byte `r || s || v` encoding.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..32].copy_from_slice(self.r.as_slice());
        bytes[32..64].copy_from_slice(self.s.as_slice());
        bytes[64] = self.v;
        bytes
    }

    /// Hex string with 0x prefix, as accepted by on-chain verifiers.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    /// Recover the address that signed `digest` with the `eth_sign`
    /// personal-message prefix.
    pub fn recover(&self, digest: B256) -> Option<Address> {
        let signature = alloy_primitives::Signature::new(
            U256::from_be_bytes(self.r.0),
            U256::from_be_bytes(self.s.0),
            self.v == 28,
        );
        signature.recover_address_from_msg(digest.as_slice()).ok()
    }

    /// Whether `signer` produced this signature over `digest`.
    pub fn is_valid_for(&self, digest: B256, signer: Address) -> bool {
        self.recover(digest) == Some(signer)
    }
}

impl fmt::Display for EcdsaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with_v(v: u8) -> String {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..32].copy_from_slice(&[0x11; 32]);
        bytes[32..64].copy_from_slice(&[0x22; 32]);
        bytes[64] = v;
        format!("0x{}", hex::encode(bytes))
    }

    #[test]
    fn test_parse_rsv() {
        let sig = EcdsaSignature::from_rsv_hex(&raw_with_v(28)).unwrap();
        assert_eq!(sig.r, B256::repeat_byte(0x11));
        assert_eq!(sig.s, B256::repeat_byte(0x22));
        assert_eq!(sig.v, 28);
    }

    #[test]
    fn test_parse_normalizes_recovery_id() {
        assert_eq!(EcdsaSignature::from_rsv_hex(&raw_with_v(0)).unwrap().v, 27);
        assert_eq!(EcdsaSignature::from_rsv_hex(&raw_with_v(1)).unwrap().v, 28);
        assert_eq!(EcdsaSignature::from_rsv_hex(&raw_with_v(27)).unwrap().v, 27);
    }

    #[test]
    fn test_parse_without_prefix() {
        let raw = raw_with_v(27);
        let sig = EcdsaSignature::from_rsv_hex(raw.trim_start_matches("0x")).unwrap();
        assert_eq!(sig.to_hex(), raw);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            EcdsaSignature::from_rsv_hex("0xzz"),
            Err(SignatureParseError::InvalidHex(_))
        ));
        assert_eq!(
            EcdsaSignature::from_rsv_hex("0x1234"),
            Err(SignatureParseError::InvalidLength(2))
        );
        assert_eq!(
            EcdsaSignature::from_rsv_hex(&raw_with_v(35)),
            Err(SignatureParseError::InvalidRecoveryId(35))
        );
    }

    #[test]
    fn test_signature_json_shape() {
        let sig = EcdsaSignature::from_rsv_hex(&raw_with_v(27)).unwrap();
        let value = serde_json::to_value(sig).unwrap();

        assert_eq!(value["v"], 27);
        assert_eq!(
            value["r"].as_str().unwrap(),
            format!("0x{}", "11".repeat(32))
        );
    }

    #[test]
    fn test_json_normalizes_recovery_id() {
        let json = |v: u8| {
            serde_json::json!({
                "r": format!("0x{}", "11".repeat(32)),
                "s": format!("0x{}", "22".repeat(32)),
                "v": v,
            })
        };

        let sig: EcdsaSignature = serde_json::from_value(json(1)).unwrap();
        assert_eq!(sig.v, 28);
        assert_eq!(sig, EcdsaSignature::from_rsv_hex(&raw_with_v(28)).unwrap());

        let sig: EcdsaSignature = serde_json::from_value(json(27)).unwrap();
        assert_eq!(sig.v, 27);

        let err = serde_json::from_value::<EcdsaSignature>(json(200)).unwrap_err();
        assert!(err.to_string().contains("unsupported recovery id 200"));
    }

    #[test]
    fn test_garbage_signature_does_not_verify() {
        let sig = EcdsaSignature::from_rsv_hex(&raw_with_v(27)).unwrap();
        assert!(!sig.is_valid_for(B256::repeat_byte(0x01), Address::repeat_byte(0x01)));
    }
}
