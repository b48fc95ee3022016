use std::fmt;

use chrono::Duration;

use crate::password::{PasswordError, hash_password, verify_password};

pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 168;

/// Process-wide auth settings, built once at startup and shared read-only.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub admin: AdminCredential,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, token_ttl: Duration, admin: AdminCredential) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl,
            admin,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("admin", &self.admin)
            .finish()
    }
}

/// The fixed administrator login. The password is hashed on construction
/// so the plaintext is not kept around.
#[derive(Clone)]
pub struct AdminCredential {
    username: String,
    password_hash: String,
}

impl AdminCredential {
    pub fn new(username: impl Into<String>, password: &str) -> Result<Self, PasswordError> {
        Ok(Self {
            username: username.into(),
            password_hash: hash_password(password)?,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Both halves are always evaluated, so a wrong username and a wrong
    /// password cost the same.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        let username_ok = self.username == username;
        let password_ok = verify_password(password, &self.password_hash);
        username_ok & password_ok
    }
}

impl fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredential")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_credential_requires_both_halves() {
        let admin = AdminCredential::new("root", "hunter22").unwrap();

        assert!(admin.matches("root", "hunter22"));
        assert!(!admin.matches("root", "hunter23"));
        assert!(!admin.matches("toor", "hunter22"));
        assert!(!admin.matches("", ""));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let admin = AdminCredential::new("root", "hunter22").unwrap();
        let config = AuthConfig::new("super-secret-signing-key", Duration::hours(1), admin);

        let printed = format!("{config:?}");
        assert!(!printed.contains("super-secret-signing-key"));
        assert!(!printed.contains("argon2"));
        assert!(printed.contains("root"));
    }
}
