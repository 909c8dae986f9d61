//! The NWT claims model: event tags in, typed token out, and back again.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::errors::NwtError;
use crate::event::Event;
use crate::{Result, MAX_TIMESTAMP, MIN_TIMESTAMP};

/// Registered claim names.
pub const CLAIM_ISSUER: &str = "iss";
pub const CLAIM_SUBJECT: &str = "sub";
pub const CLAIM_AUDIENCE: &str = "aud";
pub const CLAIM_ISSUED_AT: &str = "iat";
pub const CLAIM_EXPIRATION: &str = "exp";
pub const CLAIM_NOT_BEFORE: &str = "nbf";

/// A parsed Nostr Web Token.
///
/// Registered claims get dedicated fields; every other tag lands in the open
/// [`claims`](Self::claims) bag. A token is built once from a validated event
/// by [`Token::from_event`] and never mutated afterwards; validate it with a
/// [`TokenValidator`](crate::TokenValidator).
///
/// Time claims are Unix seconds; `None` means the claim was never set, which
/// is distinct from the [`MIN_TIMESTAMP`]/[`MAX_TIMESTAMP`] sentinel defaults
/// the parser fills in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
    /// ID of the source event.
    pub id: String,
    pub issuer: String,
    pub subject: String,
    /// Empty means "no audience restriction".
    pub audience: Vec<String>,
    pub issued_at: Option<i64>,
    pub expiration: Option<i64>,
    pub not_before: Option<i64>,
    /// Custom claims, keyed by tag name.
    pub claims: BTreeMap<String, Vec<String>>,
}

impl Token {
    /// Parse the token carried in an event's tag list, without validating
    /// any claims.
    ///
    /// Issuer and subject default to the event's public key, issued-at to the
    /// event's creation time, and the activity window to the full
    /// `[MIN_TIMESTAMP, MAX_TIMESTAMP]` range. Tags without a value are
    /// skipped. A repeated registered tag overwrites the previous value,
    /// except `aud`, which accumulates; a repeated custom tag overwrites its
    /// map entry.
    ///
    /// # Errors
    ///
    /// Returns [`NwtError::InvalidUnixTime`] when an `iat`, `exp`, or `nbf`
    /// value is not a base-10 Unix time; nothing partial is returned.
    pub fn from_event(event: &Event) -> Result<Self> {
        let mut token = Token {
            id: event.id.clone(),
            issuer: event.pubkey.clone(),
            subject: event.pubkey.clone(),
            issued_at: Some(event.created_at),
            expiration: Some(MAX_TIMESTAMP),
            not_before: Some(MIN_TIMESTAMP),
            ..Token::default()
        };

        for tag in &event.tags {
            let (name, values) = match tag.split_first() {
                Some((name, values)) if !values.is_empty() => (name.as_str(), values),
                _ => continue,
            };

            match name {
                CLAIM_ISSUER => token.issuer = values[0].clone(),
                CLAIM_SUBJECT => token.subject = values[0].clone(),
                CLAIM_AUDIENCE => token.audience.extend(values.iter().cloned()),
                CLAIM_ISSUED_AT => token.issued_at = Some(parse_unix_time(&values[0])?),
                CLAIM_EXPIRATION => token.expiration = Some(parse_unix_time(&values[0])?),
                CLAIM_NOT_BEFORE => token.not_before = Some(parse_unix_time(&values[0])?),
                _ => {
                    token.claims.insert(name.to_owned(), values.to_vec());
                }
            }
        }
        Ok(token)
    }

    /// Convert the claims back into an event tag list.
    ///
    /// Registered claims come first (`iss`, `sub`, `aud`, `iat`, `exp`,
    /// `nbf`), each emitted only when set; the audience becomes one
    /// multi-value tag. Custom claims follow in map iteration order - callers
    /// must not rely on their relative order, only on membership.
    pub fn to_tags(&self) -> Vec<Vec<String>> {
        let mut tags = Vec::with_capacity(6 + self.claims.len());

        if !self.issuer.is_empty() {
            tags.push(vec![CLAIM_ISSUER.to_owned(), self.issuer.clone()]);
        }
        if !self.subject.is_empty() {
            tags.push(vec![CLAIM_SUBJECT.to_owned(), self.subject.clone()]);
        }
        if !self.audience.is_empty() {
            let mut aud = Vec::with_capacity(1 + self.audience.len());
            aud.push(CLAIM_AUDIENCE.to_owned());
            aud.extend(self.audience.iter().cloned());
            tags.push(aud);
        }
        if let Some(iat) = self.issued_at {
            tags.push(vec![CLAIM_ISSUED_AT.to_owned(), iat.to_string()]);
        }
        if let Some(exp) = self.expiration {
            tags.push(vec![CLAIM_EXPIRATION.to_owned(), exp.to_string()]);
        }
        if let Some(nbf) = self.not_before {
            tags.push(vec![CLAIM_NOT_BEFORE.to_owned(), nbf.to_string()]);
        }
        for (name, values) in &self.claims {
            let mut tag = Vec::with_capacity(1 + values.len());
            tag.push(name.clone());
            tag.extend(values.iter().cloned());
            tags.push(tag);
        }
        tags
    }

    /// Whether the token is currently active. Shorthand for
    /// [`is_active_at`](Self::is_active_at) with the current instant.
    pub fn is_active(&self, skew: Duration) -> bool {
        self.is_active_at(unix_now(), skew)
    }

    /// Whether the token is active at `now` (Unix seconds), which holds iff
    ///
    /// ```text
    /// not_before - skew <= now <= expiration + skew
    /// ```
    ///
    /// Both boundaries are inclusive; an unset bound is unrestricted on its
    /// side. Skew absorbs clock drift between issuer and validator and is
    /// typically a small duration like 60s.
    pub fn is_active_at(&self, now: i64, skew: Duration) -> bool {
        let skew = skew_seconds(skew);
        if let Some(nbf) = self.not_before {
            if now < nbf.saturating_sub(skew) {
                return false;
            }
        }
        if let Some(exp) = self.expiration {
            if now > exp.saturating_add(skew) {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token\n\tID: {}\n\tIssuer: {}\n\tSubject: {}\n\tAudience: {:?}\n\t\
             IssuedAt: {:?}\n\tExpiration: {:?}\n\tNotBefore: {:?}\n\tClaims: {:?}",
            self.id,
            self.issuer,
            self.subject,
            self.audience,
            self.issued_at,
            self.expiration,
            self.not_before,
            self.claims,
        )
    }
}

fn parse_unix_time(value: &str) -> Result<i64> {
    value
        .parse::<i64>()
        .map_err(|e| NwtError::InvalidUnixTime { source: e })
}

pub(crate) fn skew_seconds(skew: Duration) -> i64 {
    i64::try_from(skew.as_secs()).unwrap_or(i64::MAX)
}

pub(crate) fn unix_now() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs() as i64,
        // Clock sits before the epoch; pin to the minimum claim time.
        Err(_) => MIN_TIMESTAMP,
    }
}
