use secrecy::SecretString;
use serde::Deserialize;

/// Secret used to verify HS256 access tokens.
#[derive(Debug, Deserialize)]
pub struct JwtSettings {
    pub secret: SecretString,
}

impl JwtSettings {
    pub fn new(secret: String) -> Self {
        Self {
            secret: SecretString::new(secret.into_boxed_str()),
        }
    }
}
