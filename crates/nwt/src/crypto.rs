//! Cryptographic capabilities behind the [`EventVerifier`] seam.
//!
//! Event validation needs exactly two things from the crypto layer:
//! recomputing the canonical event ID and checking the signature. Both sit
//! behind a trait so validation logic can be exercised against fakes without
//! touching real key material.

use k256::schnorr::{Signature, VerifyingKey};
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::errors::NwtError;
use crate::event::Event;
use crate::Result;

/// Cryptographic capabilities consumed by [`Event::validate`].
pub trait EventVerifier {
    /// Recompute the event ID from the canonical event fields.
    fn event_id(&self, event: &Event) -> String;

    /// Check the event signature against the event ID and public key.
    ///
    /// `Ok(false)` means the material was well-formed but the signature does
    /// not verify. Implementations classify their own machinery failures
    /// (malformed keys, signatures, or IDs) as
    /// [`NwtError::InvalidEventSignature`].
    ///
    /// # Errors
    ///
    /// Returns an error when the signature material cannot be processed at
    /// all, as opposed to a clean mismatch.
    fn verify_signature(&self, event: &Event) -> Result<bool>;
}

/// BIP340 schnorr verification over secp256k1, the scheme Nostr events use.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchnorrVerifier;

impl EventVerifier for SchnorrVerifier {
    /// SHA-256 of the canonical `[0, pubkey, created_at, kind, tags, content]`
    /// serialization, hex-encoded.
    fn event_id(&self, event: &Event) -> String {
        let canonical = json!([
            0,
            event.pubkey,
            event.created_at,
            event.kind,
            event.tags,
            event.content,
        ]);

        let mut hasher = Sha256::new();
        hasher.update(canonical.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }

    fn verify_signature(&self, event: &Event) -> Result<bool> {
        let pubkey = decode_exact::<32>(&event.pubkey, "public key")?;
        let sig = decode_exact::<64>(&event.sig, "signature")?;
        let id = decode_exact::<32>(&event.id, "event ID")?;

        let key = VerifyingKey::from_bytes(&pubkey).map_err(|e| {
            NwtError::InvalidEventSignature {
                reason: format!("malformed public key: {e}"),
            }
        })?;
        let sig = Signature::try_from(sig.as_slice()).map_err(|e| {
            NwtError::InvalidEventSignature {
                reason: format!("malformed signature: {e}"),
            }
        })?;

        // Nostr signatures cover the raw 32-byte event ID; verify_raw skips
        // the extra message digest the Verifier trait impl would apply.
        Ok(key.verify_raw(&id, &sig).is_ok())
    }
}

fn decode_exact<const N: usize>(hx: &str, what: &str) -> Result<[u8; N]> {
    let bytes = hex::decode(hx).map_err(|e| NwtError::InvalidEventSignature {
        reason: format!("malformed {what}: {e}"),
    })?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| NwtError::InvalidEventSignature {
            reason: format!("malformed {what}: expected {N} bytes, got {}", bytes.len()),
        })
}
