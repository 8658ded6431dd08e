use serde::{Deserialize, Serialize};

/// Bearer token issued for the current user against the mobile web service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserToken {
    pub value: String,
    /// Expiry as a Unix epoch, `0` when the token never expires.
    pub expiration: u64,
}

/// Per-user parameters passed as the single argument of the client `init`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserParameterModel {
    pub id: String,
    /// Absent when the host has no enabled mobile service to issue tokens for.
    #[serde(default)]
    pub token: Option<UserToken>,
    #[serde(default)]
    pub is_teacher: bool,
}

impl UserParameterModel {
    /// Parses the serialized argument handed to the client at initialization.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
