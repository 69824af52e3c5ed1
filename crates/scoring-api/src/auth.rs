//! # Auth Verifier
//!
//! Verifies the credential digest of a validated method-call envelope.
//!
//! Two digest derivations, both SHA-512 rendered as lowercase hex:
//!
//! - administrator: `sha512(current_hour ++ admin_salt)` where the hour is
//!   UTC formatted `YYYYMMDDHH` — admin tokens are valid for the wall-clock
//!   hour they were minted in;
//! - everyone else: `sha512(account ++ login ++ salt)` with an absent
//!   account treated as the empty string.
//!
//! Verification happens exactly once per request; failure is terminal and
//! carries no reason.

use chrono::Utc;
use scoring_core::MethodCall;
use sha2::{Digest, Sha512};

/// Immutable authentication configuration, threaded into the verifier at
/// construction time. Values are process-wide, never request-configurable.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// The reserved administrator login.
    pub admin_login: String,
    /// Salt mixed into non-admin digests.
    pub salt: String,
    /// Salt mixed into the hourly admin digest.
    pub admin_salt: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_login: "admin".to_owned(),
            salt: "Otus".to_owned(),
            admin_salt: "42".to_owned(),
        }
    }
}

/// Identity derived from a successfully authenticated envelope. Derived
/// per request, never stored.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub login: String,
    pub is_admin: bool,
}

/// Verify the envelope's token against the expected digest.
///
/// Returns the derived [`AuthContext`] on success, `None` on mismatch.
pub fn authenticate(config: &AuthConfig, call: &MethodCall) -> Option<AuthContext> {
    let is_admin = call.login == config.admin_login;
    let expected = if is_admin {
        admin_digest(config)
    } else {
        user_digest(config, call.account.as_deref().unwrap_or(""), &call.login)
    };
    if expected != call.token {
        return None;
    }
    Some(AuthContext {
        login: call.login.clone(),
        is_admin,
    })
}

/// The digest expected from the administrator for the current UTC hour.
pub fn admin_digest(config: &AuthConfig) -> String {
    let hour = Utc::now().format("%Y%m%d%H");
    sha512_hex(&format!("{hour}{}", config.admin_salt))
}

/// The digest expected from a regular account/login pair.
pub fn user_digest(config: &AuthConfig, account: &str, login: &str) -> String {
    sha512_hex(&format!("{account}{login}{}", config.salt))
}

/// SHA-512 of `input`, rendered as lowercase hex.
pub fn sha512_hex(input: &str) -> String {
    let digest = Sha512::digest(input.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn call(account: Option<&str>, login: &str, token: String) -> MethodCall {
        MethodCall {
            account: account.map(str::to_owned),
            login: login.to_owned(),
            token,
            arguments: Map::new(),
            method: "online_score".to_owned(),
        }
    }

    #[test]
    fn sha512_hex_is_lowercase_and_128_chars() {
        let hex = sha512_hex("abc");
        assert_eq!(hex.len(), 128);
        assert_eq!(hex, hex.to_lowercase());
        // Known SHA-512("abc") prefix.
        assert!(hex.starts_with("ddaf35a193617aba"));
    }

    #[test]
    fn valid_user_token_authenticates() {
        let config = AuthConfig::default();
        let token = user_digest(&config, "horns&hoofs", "h&f");
        let ctx = authenticate(&config, &call(Some("horns&hoofs"), "h&f", token)).unwrap();
        assert_eq!(ctx.login, "h&f");
        assert!(!ctx.is_admin);
    }

    #[test]
    fn absent_account_hashes_as_empty_string() {
        let config = AuthConfig::default();
        let token = user_digest(&config, "", "solo");
        assert!(authenticate(&config, &call(None, "solo", token)).is_some());
    }

    #[test]
    fn wrong_token_is_rejected() {
        let config = AuthConfig::default();
        let mut token = user_digest(&config, "acc", "user");
        token.truncate(10);
        assert!(authenticate(&config, &call(Some("acc"), "user", token)).is_none());
    }

    #[test]
    fn token_compare_is_case_sensitive() {
        let config = AuthConfig::default();
        let token = user_digest(&config, "acc", "user").to_uppercase();
        assert!(authenticate(&config, &call(Some("acc"), "user", token)).is_none());
    }

    #[test]
    fn admin_token_ignores_account() {
        let config = AuthConfig::default();
        let token = admin_digest(&config);
        let ctx = authenticate(&config, &call(Some("anything"), "admin", token.clone())).unwrap();
        assert!(ctx.is_admin);
        let ctx = authenticate(&config, &call(None, "admin", token)).unwrap();
        assert!(ctx.is_admin);
    }

    #[test]
    fn admin_with_user_style_token_is_rejected() {
        let config = AuthConfig::default();
        let token = user_digest(&config, "acc", "admin");
        assert!(authenticate(&config, &call(Some("acc"), "admin", token)).is_none());
    }

    #[test]
    fn custom_admin_login_is_honored() {
        let config = AuthConfig {
            admin_login: "root".to_owned(),
            ..AuthConfig::default()
        };
        let token = admin_digest(&config);
        let ctx = authenticate(&config, &call(None, "root", token)).unwrap();
        assert!(ctx.is_admin);
    }
}
