//! NWT error types
//!
//! One enum spans the whole pipeline; the variant is the classification and
//! survives any contextual detail or wrapped cause attached to it.

use std::num::ParseIntError;

use thiserror::Error;

/// Errors produced while extracting, validating, or parsing an NWT.
#[derive(Debug, Error)]
pub enum NwtError {
    /// The request carried no `Authorization` header value.
    #[error("missing Authorization header")]
    MissingHeader,

    /// The header value is not `Nostr <payload>`, or the payload is not
    /// URL-safe base64 without padding.
    #[error("invalid Authorization header format")]
    InvalidHeaderFormat {
        #[source]
        source: Option<base64::DecodeError>,
    },

    /// The decoded payload is not a well-formed event record.
    #[error("invalid event JSON")]
    InvalidEventJson {
        #[source]
        source: serde_json::Error,
    },

    /// The event kind is not the NWT kind.
    #[error("event kind must be {expected}, got {got}")]
    InvalidEventKind { expected: u16, got: u16 },

    /// The event timestamp is outside the representable claim window.
    #[error("invalid event created_at: {reason}")]
    InvalidEventCreatedAt { reason: &'static str },

    /// The stored event ID does not match the canonical event hash.
    #[error("invalid event ID")]
    InvalidEventId,

    /// The signature does not verify, or its material could not be processed.
    #[error("invalid event signature: {reason}")]
    InvalidEventSignature { reason: String },

    /// A registered timestamp tag does not hold a base-10 Unix time.
    #[error("invalid unix time")]
    InvalidUnixTime {
        #[source]
        source: ParseIntError,
    },

    /// The token ID is empty.
    #[error("token ID is empty")]
    EmptyId,

    /// The issued-at claim is unset or out of bounds.
    #[error("issued at claim is invalid")]
    InvalidIssuedAt,

    /// The expiration claim is unset or out of bounds.
    #[error("expiration claim is invalid")]
    InvalidExpiration,

    /// The not-before claim is unset or out of bounds.
    #[error("not before claim is invalid")]
    InvalidNotBefore,

    /// The not-before claim is after the expiration claim.
    #[error("not before is after expiration")]
    InvalidTimeWindow,

    /// The current time is before the token's activity window.
    #[error("token not yet valid (before not_before)")]
    NotYetValid,

    /// The current time is after the token's activity window.
    #[error("token expired (after expiration)")]
    Expired,

    /// The audience claim does not contain the expected identifier.
    #[error("audience claim is invalid: it doesn't contain an exact match of {identifier:?}")]
    InvalidAudience { identifier: String },
}

impl NwtError {
    /// Stable label for this error kind, for metrics and logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingHeader => "missing_header",
            Self::InvalidHeaderFormat { .. } => "invalid_header_format",
            Self::InvalidEventJson { .. } => "invalid_event_json",
            Self::InvalidEventKind { .. } => "invalid_event_kind",
            Self::InvalidEventCreatedAt { .. } => "invalid_event_created_at",
            Self::InvalidEventId => "invalid_event_id",
            Self::InvalidEventSignature { .. } => "invalid_event_signature",
            Self::InvalidUnixTime { .. } => "invalid_unix_time",
            Self::EmptyId => "empty_id",
            Self::InvalidIssuedAt => "invalid_issued_at",
            Self::InvalidExpiration => "invalid_expiration",
            Self::InvalidNotBefore => "invalid_not_before",
            Self::InvalidTimeWindow => "invalid_time_window",
            Self::NotYetValid => "not_yet_valid",
            Self::Expired => "expired",
            Self::InvalidAudience { .. } => "invalid_audience",
        }
    }
}
