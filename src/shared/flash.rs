//! One-shot notices carried across redirects in a signed cookie.
//!
//! The cookie value is `base64url(json) + "." + hex(hmac_sha256(json))`, keyed
//! with the application `SECRET_KEY`. Tampered or foreign cookies are ignored.

use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::Response;
use base64::prelude::*;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::core::error::{AppError, Result};
use crate::shared::constants::{FLASH_COOKIE_MAX_AGE_SECS, FLASH_COOKIE_NAME};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

impl FlashMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }
}

/// Signs and verifies flash cookies
pub struct FlashSigner {
    key: Vec<u8>,
}

impl FlashSigner {
    pub fn new(secret_key: &str) -> Self {
        Self {
            key: secret_key.as_bytes().to_vec(),
        }
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(&self.key)
            .map_err(|e| AppError::Internal(format!("Invalid HMAC key: {}", e)))
    }

    pub fn encode(&self, messages: &[FlashMessage]) -> Result<String> {
        let json = serde_json::to_vec(messages)
            .map_err(|e| AppError::Internal(format!("Failed to encode flash: {}", e)))?;

        let mut mac = self.mac()?;
        mac.update(&json);
        let signature = hex::encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", BASE64_URL_SAFE_NO_PAD.encode(&json), signature))
    }

    pub fn decode(&self, value: &str) -> Option<Vec<FlashMessage>> {
        let (payload, signature) = value.split_once('.')?;
        let json = BASE64_URL_SAFE_NO_PAD.decode(payload).ok()?;
        let signature = hex::decode(signature).ok()?;

        let mut mac = self.mac().ok()?;
        mac.update(&json);
        if mac.verify_slice(&signature).is_err() {
            tracing::warn!("Discarding flash cookie with invalid signature");
            return None;
        }

        serde_json::from_slice(&json).ok()
    }

    /// `Set-Cookie` value carrying the given messages
    pub fn set_cookie(&self, messages: &[FlashMessage]) -> Result<HeaderValue> {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            FLASH_COOKIE_NAME,
            self.encode(messages)?,
            FLASH_COOKIE_MAX_AGE_SECS
        );
        HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::Internal(format!("Invalid flash cookie: {}", e)))
    }

    /// `Set-Cookie` value that removes the flash cookie
    pub fn clear_cookie() -> HeaderValue {
        HeaderValue::from_static("spectra_flash=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
    }

    /// Read messages from the request's `Cookie` headers.
    ///
    /// Returns `None` when no flash cookie was sent at all.
    pub fn read(&self, headers: &HeaderMap) -> Option<Vec<FlashMessage>> {
        let raw = find_cookie(headers, FLASH_COOKIE_NAME)?;
        Some(self.decode(&raw).unwrap_or_default())
    }
}

/// Flash messages sent with the current request.
///
/// Extracted in page handlers; [`IncomingFlash::finish`] clears the cookie so each
/// message is shown once.
#[derive(Debug, Default)]
pub struct IncomingFlash {
    messages: Vec<FlashMessage>,
    present: bool,
}

impl IncomingFlash {
    pub fn from_headers(signer: &FlashSigner, headers: &HeaderMap) -> Self {
        match signer.read(headers) {
            Some(messages) => Self {
                messages,
                present: true,
            },
            None => Self::default(),
        }
    }

    pub fn messages(&self) -> &[FlashMessage] {
        &self.messages
    }

    /// Attach the cookie removal to the outgoing response if a cookie was sent
    pub fn finish(self, mut response: Response) -> Response {
        if self.present {
            response
                .headers_mut()
                .append(header::SET_COOKIE, FlashSigner::clear_cookie());
        }
        response
    }
}

fn find_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let signer = FlashSigner::new("test-secret");
        let messages = vec![
            FlashMessage::success("Saved"),
            FlashMessage::error("Payment cancelled"),
        ];

        let value = signer.encode(&messages).unwrap();
        assert_eq!(signer.decode(&value), Some(messages));
    }

    #[test]
    fn test_rejects_tampered_or_foreign_cookie() {
        let signer = FlashSigner::new("test-secret");
        let value = signer.encode(&[FlashMessage::info("hello")]).unwrap();

        let (_, signature) = value.split_once('.').unwrap();
        let forged_payload = BASE64_URL_SAFE_NO_PAD
            .encode(br#"[{"level":"success","message":"You won"}]"#);
        assert_eq!(signer.decode(&format!("{}.{}", forged_payload, signature)), None);

        let other = FlashSigner::new("other-secret");
        assert_eq!(other.decode(&value), None);
        assert_eq!(signer.decode("garbage"), None);
    }

    #[test]
    fn test_read_from_cookie_header() {
        let signer = FlashSigner::new("test-secret");
        let value = signer.encode(&[FlashMessage::info("hi")]).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}", FLASH_COOKIE_NAME, value))
                .unwrap(),
        );

        assert_eq!(signer.read(&headers), Some(vec![FlashMessage::info("hi")]));
        assert_eq!(signer.read(&HeaderMap::new()), None);
    }

    #[test]
    fn test_clear_cookie_matches_name() {
        let cleared = FlashSigner::clear_cookie();
        assert!(cleared
            .to_str()
            .unwrap()
            .starts_with(&format!("{}=;", FLASH_COOKIE_NAME)));
    }
}
