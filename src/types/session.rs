use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Profile of the signed-in administrator, as returned by the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminData {
    pub username: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default = "Utc::now")]
    pub login_time: DateTime<Utc>,
}

fn default_role() -> String {
    "admin".to_string()
}

/// Admin token plus profile held in session storage.
///
/// The token is wiped from memory when the value is dropped.
#[derive(Clone, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct AdminSession {
    pub token: String,
    #[zeroize(skip)]
    pub data: AdminData,
}

impl fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSession")
            .field("token", &"[redacted]")
            .field("data", &self.data)
            .finish()
    }
}

/// Login endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(alias = "user")]
    pub admin: AdminData,
    #[serde(default)]
    pub message: Option<String>,
}
