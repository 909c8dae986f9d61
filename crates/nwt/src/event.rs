//! The signed event envelope: wire shape, `Authorization` header extraction,
//! and event-level validation.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crypto::EventVerifier;
use crate::errors::NwtError;
use crate::{Result, AUTH_SCHEME, MAX_TIMESTAMP, MIN_TIMESTAMP, NWT_KIND};

/// A signed Nostr event, the envelope an NWT travels in.
///
/// Fields mirror the standard event JSON; absent fields decode to their
/// defaults so partially-populated events can still be inspected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    /// Content-derived hash of the canonical event fields, hex-encoded.
    pub id: String,
    /// Author x-only public key, hex-encoded.
    pub pubkey: String,
    /// Creation time, Unix seconds.
    pub created_at: i64,
    pub kind: u16,
    /// Ordered tag list; each tag is an ordered list of strings whose first
    /// element is the tag name.
    pub tags: Vec<Vec<String>>,
    pub content: String,
    /// 64-byte schnorr signature of the ID, hex-encoded.
    pub sig: String,
}

/// Extract the event carried in an `Authorization` header value, without
/// performing any validation.
///
/// The expected shape is `Nostr <base64url-no-padding(event-json)>`.
///
/// # Errors
///
/// [`NwtError::MissingHeader`] when the value is absent or empty,
/// [`NwtError::InvalidHeaderFormat`] when the scheme or encoding is off, and
/// [`NwtError::InvalidEventJson`] when the payload is not an event record.
pub fn extract_event(header: Option<&str>) -> Result<Event> {
    let header = match header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(NwtError::MissingHeader),
    };

    let mut parts = header.split(' ');
    let (scheme, payload) = match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(payload), None) => (scheme, payload),
        _ => return Err(NwtError::InvalidHeaderFormat { source: None }),
    };
    if scheme != AUTH_SCHEME {
        return Err(NwtError::InvalidHeaderFormat { source: None });
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| NwtError::InvalidHeaderFormat { source: Some(e) })?;

    serde_json::from_slice(&bytes).map_err(|e| NwtError::InvalidEventJson { source: e })
}

/// Extract the event from a request's `Authorization` header, without
/// performing any validation.
///
/// # Errors
///
/// Same classification as [`extract_event`]; a header that is not valid
/// UTF-8 is an [`NwtError::InvalidHeaderFormat`].
#[cfg(feature = "http")]
pub fn extract_event_from_request<T>(request: &http::Request<T>) -> Result<Event> {
    let header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| NwtError::InvalidHeaderFormat { source: None })
        })
        .transpose()?;
    extract_event(header)
}

impl Event {
    /// Encode this event as an `Authorization` header value, the inverse of
    /// [`extract_event`].
    ///
    /// # Errors
    ///
    /// Returns [`NwtError::InvalidEventJson`] if the event cannot be
    /// serialized.
    pub fn to_auth_header(&self) -> Result<String> {
        let json = serde_json::to_vec(self).map_err(|e| NwtError::InvalidEventJson { source: e })?;
        Ok(format!("{AUTH_SCHEME} {}", URL_SAFE_NO_PAD.encode(json)))
    }

    /// Check that this event is a valid NWT envelope: kind, timestamp bounds,
    /// ID integrity, and signature integrity, in that order.
    ///
    /// Structural checks run before the verifier is consulted, so malformed
    /// events are rejected without paying the hashing and signature cost.
    /// Token claims are not inspected here; parse them with
    /// [`Token::from_event`](crate::Token::from_event) afterwards.
    ///
    /// # Errors
    ///
    /// The first failing check wins: [`NwtError::InvalidEventKind`],
    /// [`NwtError::InvalidEventCreatedAt`], [`NwtError::InvalidEventId`], or
    /// [`NwtError::InvalidEventSignature`].
    pub fn validate<V: EventVerifier>(&self, verifier: &V) -> Result<()> {
        if self.kind != NWT_KIND {
            return Err(NwtError::InvalidEventKind {
                expected: NWT_KIND,
                got: self.kind,
            });
        }

        if self.created_at < MIN_TIMESTAMP {
            return Err(NwtError::InvalidEventCreatedAt {
                reason: "created_at cannot be negative",
            });
        }
        if self.created_at > MAX_TIMESTAMP {
            return Err(NwtError::InvalidEventCreatedAt {
                reason: "created_at exceeds the maximum time",
            });
        }

        if verifier.event_id(self) != self.id {
            return Err(NwtError::InvalidEventId);
        }

        if !verifier.verify_signature(self)? {
            return Err(NwtError::InvalidEventSignature {
                reason: "signature does not verify".to_owned(),
            });
        }

        debug!(id = %self.id, "event accepted");
        Ok(())
    }
}
