//! Token validation policies.

use std::time::Duration;

use tracing::debug;

use crate::errors::NwtError;
use crate::token::{skew_seconds, unix_now, Token};
use crate::{Result, DEFAULT_CLOCK_SKEW_SECONDS, MAX_TIMESTAMP, MIN_TIMESTAMP};

/// A token validation policy. The token is valid iff `validate` returns `Ok`.
///
/// Implementations may enforce different policies for what constitutes a
/// valid token, but are generally expected to at least check the time-based
/// claims with [`validate_time_bounds`]. See [`StrictValidator`] for the
/// reference policy.
pub trait TokenValidator {
    /// Validate the token's claims.
    ///
    /// # Errors
    ///
    /// The first violated policy rule, as a classified [`NwtError`].
    fn validate(&self, token: &Token) -> Result<()>;
}

/// The strict policy: ID presence, time-window consistency, current-time
/// activity with clock-skew tolerance, and exact audience match.
#[derive(Debug, Clone)]
pub struct StrictValidator {
    identifier: String,
    clock_skew: Duration,
}

impl StrictValidator {
    /// Create a validator expecting `identifier` in the audience claim, with
    /// the default clock-skew tolerance of
    /// [`DEFAULT_CLOCK_SKEW_SECONDS`] seconds.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            clock_skew: Duration::from_secs(DEFAULT_CLOCK_SKEW_SECONDS),
        }
    }

    /// Override the clock-skew tolerance.
    #[must_use]
    pub fn with_clock_skew(mut self, skew: Duration) -> Self {
        self.clock_skew = skew;
        self
    }
}

impl TokenValidator for StrictValidator {
    fn validate(&self, token: &Token) -> Result<()> {
        if token.id.is_empty() {
            return Err(NwtError::EmptyId);
        }

        validate_time_bounds(token)?;

        // Same comparisons as Token::is_active_at, split out so the caller
        // can tell a not-yet-valid token from an expired one.
        let now = unix_now();
        let skew = skew_seconds(self.clock_skew);
        if let Some(nbf) = token.not_before {
            if now < nbf.saturating_sub(skew) {
                return Err(NwtError::NotYetValid);
            }
        }
        if let Some(exp) = token.expiration {
            if now > exp.saturating_add(skew) {
                return Err(NwtError::Expired);
            }
        }

        if !token.audience.is_empty() && !token.audience.contains(&self.identifier) {
            debug!(identifier = %self.identifier, "audience mismatch");
            return Err(NwtError::InvalidAudience {
                identifier: self.identifier.clone(),
            });
        }
        Ok(())
    }
}

/// Check that the token's time-based claims are within valid bounds and form
/// a consistent window: `issued_at`, `expiration`, and `not_before` must each
/// be set and lie in `[MIN_TIMESTAMP, MAX_TIMESTAMP]`, and `not_before` must
/// not be after `expiration`.
///
/// Reusable by policies beyond [`StrictValidator`].
///
/// # Errors
///
/// The first violated bound, in claim order: [`NwtError::InvalidIssuedAt`],
/// [`NwtError::InvalidExpiration`], [`NwtError::InvalidNotBefore`], then
/// [`NwtError::InvalidTimeWindow`].
pub fn validate_time_bounds(token: &Token) -> Result<()> {
    if !in_bounds(token.issued_at) {
        return Err(NwtError::InvalidIssuedAt);
    }
    if !in_bounds(token.expiration) {
        return Err(NwtError::InvalidExpiration);
    }
    if !in_bounds(token.not_before) {
        return Err(NwtError::InvalidNotBefore);
    }
    if let (Some(nbf), Some(exp)) = (token.not_before, token.expiration) {
        if nbf > exp {
            return Err(NwtError::InvalidTimeWindow);
        }
    }
    Ok(())
}

// An unset claim is the analogue of the zero time, which sits below the
// minimum bound.
fn in_bounds(claim: Option<i64>) -> bool {
    claim.is_some_and(|t| (MIN_TIMESTAMP..=MAX_TIMESTAMP).contains(&t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_token() -> Token {
        let now = unix_now();
        Token {
            id: "id".into(),
            issued_at: Some(now),
            expiration: Some(now + 3600),
            not_before: Some(now - 3600),
            ..Token::default()
        }
    }

    fn strict() -> StrictValidator {
        StrictValidator::new("identifier").with_clock_skew(Duration::from_secs(60))
    }

    #[test]
    fn rejects_empty_id() {
        assert!(matches!(
            strict().validate(&Token::default()),
            Err(NwtError::EmptyId)
        ));
    }

    #[test]
    fn rejects_unset_time_claims() {
        let token = Token {
            id: "id".into(),
            ..Token::default()
        };
        assert!(matches!(
            strict().validate(&token),
            Err(NwtError::InvalidIssuedAt)
        ));
    }

    #[test]
    fn rejects_inverted_time_window() {
        let token = Token {
            id: "id".into(),
            issued_at: Some(420),
            expiration: Some(69),
            not_before: Some(420),
            ..Token::default()
        };
        assert!(matches!(
            strict().validate(&token),
            Err(NwtError::InvalidTimeWindow)
        ));
    }

    #[test]
    fn rejects_token_not_yet_valid() {
        let token = Token {
            not_before: Some(unix_now() + 3600),
            expiration: Some(MAX_TIMESTAMP),
            ..active_token()
        };
        assert!(matches!(
            strict().validate(&token),
            Err(NwtError::NotYetValid)
        ));
    }

    #[test]
    fn rejects_expired_token() {
        let token = Token {
            expiration: Some(unix_now() - 3600),
            not_before: Some(MIN_TIMESTAMP),
            ..active_token()
        };
        assert!(matches!(strict().validate(&token), Err(NwtError::Expired)));
    }

    #[test]
    fn skew_absorbs_recent_expiry() {
        let token = Token {
            expiration: Some(unix_now() - 30),
            ..active_token()
        };
        assert!(strict().validate(&token).is_ok());
    }

    #[test]
    fn rejects_audience_without_match() {
        let token = Token {
            audience: vec!["other-identifier".into()],
            ..active_token()
        };
        assert!(matches!(
            strict().validate(&token),
            Err(NwtError::InvalidAudience { .. })
        ));
    }

    #[test]
    fn accepts_matching_audience() {
        let token = Token {
            audience: vec!["other-identifier".into(), "identifier".into()],
            ..active_token()
        };
        assert!(strict().validate(&token).is_ok());
    }

    #[test]
    fn accepts_empty_audience_as_unrestricted() {
        assert!(strict().validate(&active_token()).is_ok());
    }

    #[test]
    fn time_bounds_reject_each_claim_in_order() {
        let bad = |issued_at, expiration, not_before| Token {
            issued_at,
            expiration,
            not_before,
            ..Token::default()
        };

        assert!(matches!(
            validate_time_bounds(&bad(Some(-1), Some(0), Some(0))),
            Err(NwtError::InvalidIssuedAt)
        ));
        assert!(matches!(
            validate_time_bounds(&bad(Some(0), None, Some(0))),
            Err(NwtError::InvalidExpiration)
        ));
        assert!(matches!(
            validate_time_bounds(&bad(Some(0), Some(0), Some(MAX_TIMESTAMP + 1))),
            Err(NwtError::InvalidNotBefore)
        ));
        assert!(validate_time_bounds(&bad(Some(0), Some(0), Some(0))).is_ok());
    }
}
