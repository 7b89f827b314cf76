//! Phone-number helpers for Peruvian mobiles. Local mobiles are 9 digits
//! starting with 9; the country code is 51.

fn digits_of(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normalize to the readable international form `+51 XXX XXX XXX`.
///
/// Accepts the usual front-desk spellings: `947236123`, `947 236 123`,
/// `+51947236123`, `0947236123`, `51947236123`. Input that does not look
/// like a local mobile comes back as its cleaned digits (or trimmed
/// original when no digits survive).
pub fn normalize_peru_phone(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let mut digits = digits_of(raw);

    // Trunk prefix: leading 0 on a 10-digit number
    if digits.starts_with('0') && digits.len() == 10 {
        digits.remove(0);
    }

    // Already carries the country code
    if digits.starts_with("51") && digits.len() == 11 {
        digits.drain(..2);
    }

    if digits.len() == 9 && digits.starts_with('9') {
        return format!("+51 {} {} {}", &digits[..3], &digits[3..6], &digits[6..]);
    }

    if digits.is_empty() {
        raw.trim().to_string()
    } else {
        digits
    }
}

/// Digits-only MSISDN for wa.me deep links. Bare 9-digit local mobiles get
/// the 51 country code prepended; anything without digits yields None.
pub fn whatsapp_msisdn(raw: &str) -> Option<String> {
    let digits = digits_of(raw);
    if digits.is_empty() {
        return None;
    }

    if digits.len() == 9 && digits.starts_with('9') {
        Some(format!("51{}", digits))
    } else {
        Some(digits)
    }
}
