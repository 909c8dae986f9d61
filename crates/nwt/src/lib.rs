//! # NWT - Nostr Web Tokens
//!
//! Parsing and validation for Nostr Web Tokens: signed, claims-bearing tokens
//! carried in the tag list of a Nostr event and transported in an
//! `Authorization` header.
//!
//! The pipeline is a strict composition of four independent pieces:
//!
//! 1. [`extract_event`] - pull the signed event out of a header value
//! 2. [`Event::validate`] - structural and cryptographic event checks
//! 3. [`Token::from_event`] - map the event tags into a typed [`Token`]
//! 4. [`TokenValidator`] - claim validation under a pluggable policy
//!
//! Every stage fails fast with a classified [`NwtError`] variant, so callers
//! can branch on the failure kind without string matching.
//!
//! ## Architecture
//!
//! - `errors` - classified error kinds for every pipeline stage
//! - `event` - event shape, header extraction, event validation
//! - `crypto` - the [`EventVerifier`] capability and its schnorr adapter
//! - `token` - the claims model and tag round-tripping
//! - `validator` - validation policies ([`StrictValidator`])
//!
//! ## Feature Flags
//!
//! - `http` - extraction straight from an [`http::Request`](https://docs.rs/http)
//!
//! ## Example
//!
//! ```
//! use nwt::{extract_event, SchnorrVerifier, StrictValidator, Token, TokenValidator};
//!
//! fn authenticate(header: Option<&str>) -> nwt::Result<Token> {
//!     let event = extract_event(header)?;
//!     event.validate(&SchnorrVerifier)?;
//!
//!     let token = Token::from_event(&event)?;
//!     StrictValidator::new("https://api.example.com").validate(&token)?;
//!     Ok(token)
//! }
//! ```

pub mod crypto;
pub mod errors;
pub mod event;
pub mod token;
pub mod validator;

// Re-export core types for convenience
pub use crypto::*;
pub use errors::*;
pub use event::*;
pub use token::*;
pub use validator::*;

/// NWT result type
pub type Result<T> = std::result::Result<T, NwtError>;

/// Scheme label expected in the `Authorization` header.
pub const AUTH_SCHEME: &str = "Nostr";

/// Event kind reserved for NWT events.
pub const NWT_KIND: u16 = 27519;

/// Minimum valid time for NWT claims, the Unix epoch (Unix seconds).
pub const MIN_TIMESTAMP: i64 = 0;

/// Maximum valid time for NWT claims, 9999-12-31T23:59:59Z (Unix seconds).
pub const MAX_TIMESTAMP: i64 = 253_402_300_799;

/// Maximum number of claim tags a caller should accept in one event, as an
/// abuse guard ahead of parsing.
pub const MAX_CLAIMS: usize = 512;

/// Default clock-skew tolerance of the strict policy, in seconds.
pub const DEFAULT_CLOCK_SKEW_SECONDS: u64 = 60;
