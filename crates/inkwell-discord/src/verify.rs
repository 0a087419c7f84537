//! Ed25519 request signature verification.
//!
//! Discord signs `timestamp || body` with the application's key and sends the
//! result in `X-Signature-Ed25519`, the timestamp in `X-Signature-Timestamp`.

use ed25519_dalek::{Signature, VerifyingKey};

use crate::error::VerifyError;

pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Holds the parsed application public key. Built once at startup.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    key: VerifyingKey,
}

impl SignatureVerifier {
    /// Parse the hex-encoded public key shown in the developer portal.
    pub fn from_hex(public_key: &str) -> Result<Self, VerifyError> {
        let bytes: [u8; 32] = hex::decode(public_key.trim())
            .map_err(|_| VerifyError::InvalidKey)?
            .try_into()
            .map_err(|_| VerifyError::InvalidKey)?;
        let key = VerifyingKey::from_bytes(&bytes).map_err(|_| VerifyError::InvalidKey)?;
        Ok(Self { key })
    }

    /// Check a request. `timestamp` and `signature_hex` are the raw header
    /// values, `None` when the header was absent.
    pub fn verify(
        &self,
        timestamp: Option<&str>,
        signature_hex: Option<&str>,
        body: &[u8],
    ) -> Result<(), VerifyError> {
        let timestamp = timestamp.ok_or(VerifyError::MissingHeader(TIMESTAMP_HEADER))?;
        let signature_hex = signature_hex.ok_or(VerifyError::MissingHeader(SIGNATURE_HEADER))?;

        let sig_bytes: [u8; 64] = hex::decode(signature_hex)
            .map_err(|_| VerifyError::MalformedSignature)?
            .try_into()
            .map_err(|_| VerifyError::MalformedSignature)?;
        let signature = Signature::from_bytes(&sig_bytes);

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);

        self.key
            .verify_strict(&message, &signature)
            .map_err(|_| VerifyError::Mismatch)
    }
}
