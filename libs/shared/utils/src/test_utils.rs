//! Shared helpers for the cell test suites.

use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;

use crate::jwt;

pub struct TestConfig;

impl TestConfig {
    /// Config pointing the storage layer at a mock server.
    pub fn with_base_url(base_url: &str) -> AppConfig {
        AppConfig {
            supabase_url: base_url.to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            session_secret: "test-session-secret".to_string(),
            admin_pin: "4321".to_string(),
            clinic_name: "Test Clinic".to_string(),
            clinic_address: "Test Street 123".to_string(),
            port: 0,
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn valid_staff_token(config: &AppConfig) -> String {
        let (token, _) = jwt::issue_staff_token(&config.session_secret, 1)
            .expect("test token should mint");
        token
    }
}

pub struct MockStoreResponses;

impl MockStoreResponses {
    /// A single appointment row as PostgREST would return it.
    pub fn appointment_row(
        id: Uuid,
        patient_name: &str,
        date: &str,
        time: &str,
        status: &str,
    ) -> Value {
        json!({
            "id": id.to_string(),
            "patient_name": patient_name,
            "phone": "947236123",
            "service": "Limpieza dental",
            "date": date,
            "time": time,
            "note": null,
            "status": status,
            "created_at": Utc::now().to_rfc3339(),
        })
    }
}
