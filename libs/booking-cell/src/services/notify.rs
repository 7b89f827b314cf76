use tracing::info;
use urlencoding::encode;

use shared_config::AppConfig;
use shared_utils::phone::whatsapp_msisdn;

use crate::models::Appointment;

/// Builds the WhatsApp deep link the desk uses to tell a patient their
/// appointment was confirmed. Pure formatting, nothing is sent.
pub struct WhatsappNotifier {
    clinic_name: String,
    clinic_address: String,
}

impl WhatsappNotifier {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            clinic_name: config.clinic_name.clone(),
            clinic_address: config.clinic_address.clone(),
        }
    }

    /// Deep link for the confirmation message, or None when the
    /// appointment carries no usable phone number.
    pub fn confirmation_link(&self, appointment: &Appointment) -> Option<String> {
        let phone = appointment.phone.as_deref()?;
        let msisdn = whatsapp_msisdn(phone)?;

        let message = format!(
            "Hola {}! Tu cita en {} ha sido confirmada.\n\n\
             Fecha: {}\n\
             Hora: {}\n\
             Servicio: {}\n\n\
             Te esperamos!\n\
             {}",
            appointment.patient_name,
            self.clinic_name,
            appointment.date.format("%d/%m/%Y"),
            appointment.time.format("%H:%M"),
            appointment.service,
            self.clinic_address,
        );

        Some(format!("https://wa.me/{}?text={}", msisdn, encode(&message)))
    }

    /// Best effort: the link lands in the logs for the front desk to use.
    /// A missing or unusable phone never blocks the confirmation itself.
    pub fn notify_confirmed(&self, appointment: &Appointment) -> bool {
        match self.confirmation_link(appointment) {
            Some(url) => {
                info!("WhatsApp link for {}: {}", appointment.patient_name, url);
                true
            }
            None => false,
        }
    }
}
