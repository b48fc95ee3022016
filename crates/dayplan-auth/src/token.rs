use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};

use dayplan_types::Identity;
use dayplan_types::api::Claims;

use crate::config::AuthConfig;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token signing key is not configured")]
    MissingKey,
    #[error("token encoding failed: {0}")]
    Encoding(jsonwebtoken::errors::Error),
    #[error("malformed token")]
    Malformed,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
}

impl TokenError {
    /// Whether the presented token was rejected, as opposed to the service
    /// failing to produce one.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            TokenError::Malformed | TokenError::InvalidSignature | TokenError::Expired
        )
    }
}

/// Issues and verifies HS256 bearer tokens with a key fixed at construction.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Result<Self, TokenError> {
        if config.jwt_secret.is_empty() {
            return Err(TokenError::MissingKey);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            ttl: config.token_ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a fresh token for `identity`, valid from now for the configured
    /// lifetime.
    pub fn issue(&self, identity: Identity) -> Result<String, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    fn issue_at(&self, identity: Identity, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: identity.subject(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Encoding)
    }

    /// Verify signature and expiry and return the claims.
    pub fn parse(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })
    }

    /// Verify a token and decode its subject into an [`Identity`].
    pub fn identify(&self, token: &str) -> Result<Identity, TokenError> {
        let claims = self.parse(token)?;
        Identity::from_subject(claims.sub).ok_or(TokenError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminCredential;
    use dayplan_types::UserId;

    const TEST_SECRET: &str = "test-secret-key";

    fn service_with(secret: &str) -> TokenService {
        let admin = AdminCredential::new("admin", "admin-password").unwrap();
        TokenService::new(&AuthConfig::new(secret, Duration::hours(24), admin)).unwrap()
    }

    #[test]
    fn issued_token_carries_subject() {
        let tokens = service_with(TEST_SECRET);

        for id in [1_i64, 2, 99, 4_294_967_296, i64::MAX] {
            let token = tokens.issue(Identity::User(UserId(id))).unwrap();
            let claims = tokens.parse(&token).unwrap();

            assert_eq!(claims.sub, id);
            assert_eq!(claims.exp - claims.iat, Duration::hours(24).num_seconds());
        }
    }

    #[test]
    fn admin_token_decodes_to_admin() {
        let tokens = service_with(TEST_SECRET);
        let token = tokens.issue(Identity::Admin).unwrap();

        assert_eq!(tokens.parse(&token).unwrap().sub, 0);
        assert_eq!(tokens.identify(&token).unwrap(), Identity::Admin);
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let tokens = service_with(TEST_SECRET);
        let cases = [
            "",
            "invalid",
            "a.b",
            "a.b.c",
            "a.b.c.d",
            "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature",
            "\u{1F600}.\u{1F600}.\u{1F600}",
        ];

        for case in cases {
            let err = tokens.parse(case).unwrap_err();
            assert!(err.is_rejection(), "{case:?} gave {err:?}");
        }
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let tokens = service_with(TEST_SECRET);
        let token = tokens.issue(Identity::User(UserId(5))).unwrap();

        let (unsigned, signature) = token.rsplit_once('.').unwrap();
        let flipped = if signature.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{unsigned}.{flipped}{}", &signature[1..]);

        assert!(tokens.parse(&tampered).is_err());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let tokens = service_with(TEST_SECRET);
        let mine = tokens.issue(Identity::User(UserId(5))).unwrap();
        let theirs = tokens.issue(Identity::User(UserId(6))).unwrap();

        // Splice another subject's payload under this token's signature.
        let parts: Vec<&str> = mine.split('.').collect();
        let other: Vec<&str> = theirs.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other[1], parts[2]);

        assert!(matches!(tokens.parse(&forged), Err(TokenError::InvalidSignature)));
    }

    #[test]
    fn foreign_key_is_rejected() {
        let ours = service_with(TEST_SECRET);
        let theirs = service_with("another-secret");

        let token = theirs.issue(Identity::User(UserId(1))).unwrap();
        assert!(matches!(ours.parse(&token), Err(TokenError::InvalidSignature)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = service_with(TEST_SECRET);
        let issued = Utc::now() - Duration::hours(25);

        let token = tokens.issue_at(Identity::User(UserId(3)), issued).unwrap();
        assert!(matches!(tokens.parse(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn negative_subject_does_not_identify() {
        let tokens = service_with(TEST_SECRET);
        let claims = Claims {
            sub: -4,
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(TEST_SECRET.as_bytes())).unwrap();

        assert!(tokens.parse(&token).is_ok());
        assert!(matches!(tokens.identify(&token), Err(TokenError::Malformed)));
    }

    #[test]
    fn empty_secret_is_refused() {
        let admin = AdminCredential::new("admin", "pw").unwrap();
        let result = TokenService::new(&AuthConfig::new("", Duration::hours(1), admin));

        assert!(matches!(result, Err(TokenError::MissingKey)));
    }
}
