//! Signed `state` values for the social OAuth authorization-code flow.
//!
//! Format: `{user_id}.{platform}.{expires_unix}.{nonce}.{signature}` where the
//! signature is an HMAC-SHA256 over everything before the last dot. Nothing is
//! stored server-side; the signature binds the state to the user, the platform
//! and a short expiry.

use chrono::Duration;
use rats_core::crypto::{random_token, sign, verify};
use rats_core::error::CoreError;
use rats_core::social::SocialPlatform;
use rats_core::types::{DbId, Timestamp};

/// Lifetime of an issued state value.
pub const STATE_TTL_MINS: i64 = 10;

const NONCE_LEN: usize = 16;

/// Issue a state value for `user_id` linking `platform`.
pub fn sign_state(secret: &str, user_id: DbId, platform: SocialPlatform, now: Timestamp) -> String {
    let expires = (now + Duration::minutes(STATE_TTL_MINS)).timestamp();
    let payload = format!(
        "{user_id}.{}.{expires}.{}",
        platform.as_str(),
        random_token(NONCE_LEN)
    );
    let signature = sign(secret, &payload);
    format!("{payload}.{signature}")
}

/// Verify a state value returned by the platform and return the user id it
/// was issued to.
pub fn verify_state(
    secret: &str,
    state: &str,
    platform: SocialPlatform,
    now: Timestamp,
) -> Result<DbId, CoreError> {
    let invalid = || CoreError::Validation("Invalid or expired OAuth state".into());

    let (payload, signature) = state.rsplit_once('.').ok_or_else(invalid)?;
    if !verify(secret, payload, signature) {
        return Err(invalid());
    }

    let mut parts = payload.split('.');
    let (Some(user_id), Some(state_platform), Some(expires), Some(_nonce), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(invalid());
    };

    let user_id: DbId = user_id.parse().map_err(|_| invalid())?;
    let expires: i64 = expires.parse().map_err(|_| invalid())?;

    if state_platform != platform.as_str() {
        return Err(CoreError::Validation(format!(
            "OAuth state was issued for {state_platform}, not {platform}"
        )));
    }
    if now.timestamp() > expires {
        return Err(invalid());
    }
    Ok(user_id)
}

/// Derive the PKCE `code_verifier` for a state value.
///
/// Deterministic in the state, so the callback can recompute it without
/// server-side storage. 43 URL-safe characters, the minimum PKCE allows.
pub fn pkce_verifier(secret: &str, state: &str) -> String {
    sign(secret, &format!("pkce:{state}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    const SECRET: &str = "state-secret";

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn valid_state_returns_user() {
        let state = sign_state(SECRET, 77, SocialPlatform::Twitter, now());
        let user = verify_state(SECRET, &state, SocialPlatform::Twitter, now()).unwrap();
        assert_eq!(user, 77);
    }

    #[test]
    fn states_are_unique() {
        let a = sign_state(SECRET, 1, SocialPlatform::Facebook, now());
        let b = sign_state(SECRET, 1, SocialPlatform::Facebook, now());
        assert_ne!(a, b);
    }

    #[test]
    fn tampered_user_is_rejected() {
        let state = sign_state(SECRET, 7, SocialPlatform::Twitter, now());
        let forged = state.replacen("7.", "8.", 1);
        assert_matches!(
            verify_state(SECRET, &forged, SocialPlatform::Twitter, now()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let state = sign_state(SECRET, 7, SocialPlatform::Twitter, now());
        assert!(verify_state("other", &state, SocialPlatform::Twitter, now()).is_err());
    }

    #[test]
    fn expired_state_is_rejected() {
        let state = sign_state(SECRET, 7, SocialPlatform::Instagram, now());
        let later = now() + Duration::minutes(STATE_TTL_MINS) + Duration::seconds(1);
        assert!(verify_state(SECRET, &state, SocialPlatform::Instagram, later).is_err());
        let just_in_time = now() + Duration::minutes(STATE_TTL_MINS);
        assert!(verify_state(SECRET, &state, SocialPlatform::Instagram, just_in_time).is_ok());
    }

    #[test]
    fn platform_mismatch_is_rejected() {
        let state = sign_state(SECRET, 7, SocialPlatform::Twitter, now());
        let err = verify_state(SECRET, &state, SocialPlatform::Facebook, now()).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("twitter"));
    }

    #[test]
    fn garbage_is_rejected() {
        for state in ["", "no-dots", "a.b.c.d.e", "1.twitter.abc.nonce.sig"] {
            assert!(verify_state(SECRET, state, SocialPlatform::Twitter, now()).is_err());
        }
    }

    #[test]
    fn pkce_verifier_is_deterministic() {
        let v = pkce_verifier(SECRET, "some-state");
        assert_eq!(v, pkce_verifier(SECRET, "some-state"));
        assert_eq!(v.len(), 43);
        assert_ne!(v, pkce_verifier(SECRET, "other-state"));
    }
}
