use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use shared_models::auth::{StaffClaims, StaffContext, TokenHeader};

type HmacSha256 = Hmac<Sha256>;

pub const STAFF_ROLE: &str = "staff";
pub const STAFF_SUBJECT: &str = "front-desk";

fn sign(secret: &str, signing_input: &str) -> Result<Vec<u8>, String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(signing_input.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Mint a signed staff token after a successful PIN check. HS256 over
/// base64url parts, same wire shape the validator expects.
pub fn issue_staff_token(
    secret: &str,
    ttl_hours: i64,
) -> Result<(String, DateTime<Utc>), String> {
    if secret.is_empty() {
        return Err("Session secret is not set".to_string());
    }

    let now = Utc::now();
    let expires_at = now + chrono::Duration::hours(ttl_hours);

    let header = TokenHeader {
        alg: "HS256".to_string(),
        typ: "JWT".to_string(),
    };
    let claims = StaffClaims {
        sub: STAFF_SUBJECT.to_string(),
        role: STAFF_ROLE.to_string(),
        iat: now.timestamp() as u64,
        exp: expires_at.timestamp() as u64,
    };

    let header_json =
        serde_json::to_string(&header).map_err(|_| "Failed to encode header".to_string())?;
    let claims_json =
        serde_json::to_string(&claims).map_err(|_| "Failed to encode claims".to_string())?;

    let header_b64 = URL_SAFE_NO_PAD.encode(header_json.as_bytes());
    let claims_b64 = URL_SAFE_NO_PAD.encode(claims_json.as_bytes());

    let signing_input = format!("{}.{}", header_b64, claims_b64);
    let signature = sign(secret, &signing_input)?;
    let signature_b64 = URL_SAFE_NO_PAD.encode(signature);

    Ok((format!("{}.{}", signing_input, signature_b64), expires_at))
}

pub fn validate_token(token: &str, secret: &str) -> Result<StaffContext, String> {
    if secret.is_empty() {
        return Err("Session secret is not set".to_string());
    }

    // Split token into parts
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid token format".to_string());
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = match URL_SAFE_NO_PAD.decode(signature_b64) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode signature: {}", e);
            return Err("Invalid signature encoding".to_string());
        }
    };

    let signing_input = format!("{}.{}", header_b64, claims_b64);

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return Err("Failed to create HMAC".to_string()),
    };
    mac.update(signing_input.as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err("Invalid token signature".to_string());
    }

    let claims_json = match URL_SAFE_NO_PAD.decode(claims_b64) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(json_str) => json_str,
            Err(_) => return Err("Invalid claims encoding".to_string()),
        },
        Err(_) => return Err("Invalid claims encoding".to_string()),
    };

    let claims: StaffClaims = match serde_json::from_str(&claims_json) {
        Ok(c) => c,
        Err(e) => {
            debug!("Failed to parse claims: {}", e);
            return Err("Invalid claims format".to_string());
        }
    };

    let now = Utc::now().timestamp() as u64;
    if claims.exp < now {
        debug!("Token expired at {} (now: {})", claims.exp, now);
        return Err("Token expired".to_string());
    }

    if claims.role != STAFF_ROLE {
        return Err("Token does not carry the staff role".to_string());
    }

    let authenticated_at = Utc.timestamp_opt(claims.iat as i64, 0).single();

    let context = StaffContext {
        subject: claims.sub,
        authenticated_at,
    };

    debug!("Token validated successfully for {}", context.subject);
    Ok(context)
}
