use crate::errors::ConfigError;
use axum::http::{header, HeaderMap};
use hmac::{digest::KeyInit, Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const COOKIE_NAME: &str = "flash";

/// Expires the flash cookie once the message has been shown.
pub const CLEAR_COOKIE: &str = "flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "success" => Some(Self::Success),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// A one-shot message carried across the redirect after a form post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Signs and verifies flash cookies with the configured secret key.
#[derive(Clone)]
pub struct FlashSigner {
    mac: HmacSha256,
}

impl FlashSigner {
    pub fn new(secret_key: &str) -> Result<Self, ConfigError> {
        let mac = <HmacSha256 as KeyInit>::new_from_slice(secret_key.as_bytes())
            .map_err(|_| ConfigError::InvalidSecretKey)?;
        Ok(Self { mac })
    }

    pub fn set_cookie(&self, flash: &Flash) -> String {
        let payload = urlencoding::encode(&format!("{}:{}", flash.kind.as_str(), flash.message))
            .into_owned();
        let tag = hex::encode(self.tag(&payload));
        format!("{COOKIE_NAME}={tag}.{payload}; Path=/; HttpOnly; SameSite=Lax")
    }

    /// Returns the flash carried by the request, if any. Unsigned or
    /// tampered cookies are ignored.
    pub fn read(&self, headers: &HeaderMap) -> Option<Flash> {
        let value = flash_cookie(headers)?;
        let (tag, payload) = value.split_once('.')?;
        let tag = hex::decode(tag).ok()?;
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac.verify_slice(&tag).ok()?;

        let decoded = urlencoding::decode(payload).ok()?;
        let (kind, message) = decoded.split_once(':')?;
        Some(Flash {
            kind: FlashKind::parse(kind)?,
            message: message.to_string(),
        })
    }

    fn tag(&self, payload: &str) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

/// Whether the request carries a `flash` cookie, valid or not.
pub fn has_cookie(headers: &HeaderMap) -> bool {
    flash_cookie(headers).is_some()
}

fn flash_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == COOKIE_NAME)
        .map(|(_, value)| value)
}
