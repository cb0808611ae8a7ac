//! Persisted session and JWT helpers.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{TokenResponse, User, UserRole};

/// Storage key of the persisted session.
pub const SESSION_STORAGE_KEY: &str = "keikichi_session";

/// Tokens plus the current user, mirrored to local storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    pub fn from_token_response(token: TokenResponse) -> Self {
        Self {
            access_token: Some(token.access_token),
            refresh_token: token.refresh_token,
            user: token.user,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.user.is_some()
    }

    pub fn role(&self) -> Option<UserRole> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn is_staff(&self) -> bool {
        self.role().is_some_and(UserRole::is_staff)
    }

    /// Replace the access token after a refresh. The refresh token is kept
    /// unless a new one is supplied.
    pub fn set_tokens(&mut self, access: String, refresh: Option<String>) {
        self.access_token = Some(access);
        if refresh.is_some() {
            self.refresh_token = refresh;
        }
    }

    pub fn clear(&mut self) {
        *self = Session::default();
    }

    /// Whether the access token has an `exp` claim in the past. Tokens that
    /// cannot be decoded are treated as still valid; the server decides.
    pub fn access_expired(&self, now: DateTime<Utc>) -> bool {
        self.access_token
            .as_deref()
            .and_then(token_expiry)
            .is_some_and(|exp| exp <= now)
    }
}

/// Where an account stands in ID verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationState {
    Unverified,
    PendingReview,
    Verified,
}

impl VerificationState {
    /// Accounts without a status fall back to the `is_verified` flag.
    pub fn of(user: &User) -> Self {
        match user.verification_status.as_deref() {
            Some("verified") => Self::Verified,
            Some("pending_review") => Self::PendingReview,
            Some(_) => Self::Unverified,
            None if user.is_verified => Self::Verified,
            None => Self::Unverified,
        }
    }
}

#[derive(Deserialize)]
struct Claims {
    exp: Option<i64>,
}

/// Read the `exp` claim of a JWT without verifying it.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    DateTime::from_timestamp(claims.exp?, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn jwt(claims: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(claims)
        )
    }

    fn user(role: UserRole) -> User {
        User {
            id: "u1".into(),
            email: "ana@example.com".into(),
            full_name: "Ana".into(),
            role,
            is_active: true,
            is_verified: true,
            phone: None,
            verification_status: None,
        }
    }

    #[test]
    fn reads_exp_claim() {
        let token = jwt(r#"{"sub":"u1","exp":1735689600}"#);
        assert_eq!(
            token_expiry(&token),
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(token_expiry("opaque"), None);
        assert_eq!(token_expiry(&jwt(r#"{"sub":"u1"}"#)), None);
    }

    #[test]
    fn expiry_check_is_lenient() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let mut session = Session {
            access_token: Some(jwt(r#"{"exp":1735689600}"#)),
            refresh_token: Some("r1".into()),
            user: Some(user(UserRole::Client)),
        };
        assert!(session.access_expired(now));

        session.set_tokens("opaque".into(), None);
        assert!(!session.access_expired(now));
        assert_eq!(session.refresh_token.as_deref(), Some("r1"));
    }

    #[test]
    fn roles() {
        let mut session = Session {
            access_token: Some("a".into()),
            refresh_token: None,
            user: Some(user(UserRole::Manager)),
        };
        assert!(session.is_authenticated());
        assert!(session.is_staff());
        session.clear();
        assert!(!session.is_authenticated());
        assert!(!session.is_staff());
    }

    #[rstest]
    #[case(Some("verified"), false, VerificationState::Verified)]
    #[case(Some("pending_review"), false, VerificationState::PendingReview)]
    #[case(Some("rejected"), true, VerificationState::Unverified)]
    #[case(None, true, VerificationState::Verified)]
    #[case(None, false, VerificationState::Unverified)]
    fn verification_states(
        #[case] status: Option<&str>,
        #[case] flag: bool,
        #[case] expected: VerificationState,
    ) {
        let mut client = user(UserRole::Client);
        client.verification_status = status.map(str::to_string);
        client.is_verified = flag;
        assert_eq!(VerificationState::of(&client), expected);
    }
}
