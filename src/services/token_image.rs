use base64::Engine;
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};

use crate::errors::AppError;

/// Foreground color of the scannable token: red while the appointment is
/// awaiting check-in, translucent green once verified.
#[derive(Debug, Clone, Copy)]
pub enum TokenColor {
    Pending,
    Verified,
}

impl TokenColor {
    fn hex(&self) -> &'static str {
        match self {
            TokenColor::Pending => "#FF0000",
            TokenColor::Verified => "#00FF0081",
        }
    }
}

/// Encodes a JSON payload as a QR code (error-correction level H, 300px
/// minimum, quiet zone) and returns an embeddable
/// `data:image/svg+xml;base64,…` string.
pub fn generate(payload: &serde_json::Value, color: TokenColor) -> Result<String, AppError> {
    let data = serde_json::to_string(payload)
        .map_err(|e| AppError::Token(format!("payload serialization failed: {e}")))?;

    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::H)
        .map_err(|e| AppError::Token(format!("QR encoding failed: {e}")))?;

    let svg_image = code
        .render::<svg::Color>()
        .min_dimensions(300, 300)
        .dark_color(svg::Color(color.hex()))
        .light_color(svg::Color("#FFFFFF"))
        .quiet_zone(true)
        .build();

    let encoded = base64::engine::general_purpose::STANDARD.encode(svg_image);
    Ok(format!("data:image/svg+xml;base64,{encoded}"))
}

/// QR payloads cap the free-text subject at 100 characters.
pub fn truncate_subject(subject: &str) -> String {
    subject.chars().take(100).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    #[test]
    fn generates_svg_data_uri() {
        let payload = serde_json::json!({
            "full_name": "Jane Doe",
            "phone": "+15551234567",
            "date": "2025-03-10",
            "time": "09:00",
            "subject": "Budget review",
        });
        let uri = generate(&payload, TokenColor::Pending).unwrap();
        assert!(uri.starts_with("data:image/svg+xml;base64,"));

        let encoded = uri.strip_prefix("data:image/svg+xml;base64,").unwrap();
        let svg_bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        let svg = String::from_utf8(svg_bytes).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("#FF0000"));
    }

    #[test]
    fn verified_token_uses_green_foreground() {
        let payload = serde_json::json!({"id": 1, "status": "VERIFIED"});
        let uri = generate(&payload, TokenColor::Verified).unwrap();

        let encoded = uri.strip_prefix("data:image/svg+xml;base64,").unwrap();
        let svg_bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        let svg = String::from_utf8(svg_bytes).unwrap();
        assert!(svg.contains("#00FF0081"));
        assert!(!svg.contains("#FF0000"));
    }

    #[test]
    fn subject_truncation_is_character_based() {
        let long = "é".repeat(150);
        let truncated = truncate_subject(&long);
        assert_eq!(truncated.chars().count(), 100);

        assert_eq!(truncate_subject("short"), "short");
    }
}
