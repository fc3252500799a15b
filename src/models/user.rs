use serde::{Deserialize, Serialize};
use std::fmt;

/// Role carried in the access token. Tokens are issued by the identity
/// provider; this service only reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Organizer,
    Viewer,
}

impl UserRole {
    /// May create, change and delete tournament data.
    pub fn can_manage(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Organizer)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Organizer => write!(f, "organizer"),
            UserRole::Viewer => write!(f, "viewer"),
        }
    }
}
