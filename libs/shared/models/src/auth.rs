use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenHeader {
    pub alg: String,
    pub typ: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StaffClaims {
    pub sub: String,
    pub role: String,
    pub iat: u64,
    pub exp: u64,
}

/// Request-scoped proof that the caller passed the PIN gate. Inserted into
/// request extensions by the auth middleware; panel handlers read it instead
/// of any ambient session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffContext {
    pub subject: String,
    pub authenticated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub pin: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenStatus {
    pub valid: bool,
}
