//! State-bound tokens for account activation and password reset.
//!
//! A token is an HMAC-SHA256 over the user's id, current password hash and
//! last-login marker, prefixed with the issue timestamp:
//! `"{timestamp}-{hex mac}"`. Verification recomputes the MAC from the
//! user's current state, so there is no server-side token store and no
//! revocation list: changing the password or logging in invalidates every
//! outstanding token implicitly. Tokens older than the configured window
//! (3 days by default) are rejected.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::Config;
use crate::database::models::User;

type HmacSha256 = Hmac<Sha256>;

pub struct StateTokenGenerator {
    key: Vec<u8>,
    timeout_seconds: u64,
}

impl StateTokenGenerator {
    pub fn new(config: &Config) -> Self {
        Self {
            key: config.jwt_secret.as_bytes().to_vec(),
            timeout_seconds: config.state_token_timeout_seconds,
        }
    }

    /// Issues a token bound to the user's current mutable state.
    pub fn make_token(&self, user: &User) -> String {
        self.token_at(user, Utc::now().timestamp())
    }

    /// Recomputes and compares. Returns false for malformed tokens, state
    /// mismatches, and tokens outside the validity window.
    pub fn check_token(&self, user: &User, token: &str) -> bool {
        let Some((ts_part, mac_part)) = token.split_once('-') else {
            return false;
        };
        let Ok(ts) = ts_part.parse::<i64>() else {
            return false;
        };
        let Ok(mac_bytes) = hex::decode(mac_part) else {
            return false;
        };

        let mac = self.mac_for(user, ts);
        if mac.verify_slice(&mac_bytes).is_err() {
            return false;
        }

        let age = Utc::now().timestamp() - ts;
        age >= 0 && age <= self.timeout_seconds as i64
    }

    fn token_at(&self, user: &User, ts: i64) -> String {
        let mac = self.mac_for(user, ts);
        format!("{}-{}", ts, hex::encode(mac.finalize().into_bytes()))
    }

    fn mac_for(&self, user: &User, ts: i64) -> HmacSha256 {
        // HMAC-SHA256 accepts keys of any length.
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC key");
        mac.update(user.id.as_bytes());
        mac.update(user.password_hash.as_bytes());
        let last_login = user
            .last_login
            .map(|t| t.timestamp().to_string())
            .unwrap_or_default();
        mac.update(last_login.as_bytes());
        mac.update(ts.to_string().as_bytes());
        mac
    }
}
