/// Dayplan credential and token service.
///
/// Passwords are hashed with Argon2id. Sessions are stateless HS256 JWTs
/// whose claim set is exactly `{sub, iat, exp}`; subject `0` is the
/// administrator, every other subject is a stored account.
///
/// There is no revocation: a token stays valid until it expires.

pub mod config;
pub mod password;
pub mod token;

pub use config::{AdminCredential, AuthConfig};
pub use password::{PasswordError, hash_password, verify_password};
pub use token::{TokenError, TokenService};
