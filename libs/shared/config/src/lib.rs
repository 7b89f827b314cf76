use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub session_secret: String,
    pub admin_pin: String,
    pub clinic_name: String,
    pub clinic_address: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            session_secret: env::var("SECRET_KEY")
                .unwrap_or_else(|_| {
                    warn!("SECRET_KEY not set, using empty value");
                    String::new()
                }),
            admin_pin: env::var("ADMIN_PIN")
                .unwrap_or_else(|_| {
                    warn!("ADMIN_PIN not set, using empty value");
                    String::new()
                }),
            clinic_name: env::var("CLINIC_NAME")
                .unwrap_or_else(|_| "Clinica Dental".to_string()),
            clinic_address: env::var("CLINIC_ADDRESS")
                .unwrap_or_else(|_| "Av. Salaverry 1234, Lima".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    /// SECRET_KEY, ADMIN_PIN and the database settings have no workable
    /// defaults; the server refuses to start without them.
    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
            && !self.session_secret.is_empty()
            && !self.admin_pin.is_empty()
    }
}
