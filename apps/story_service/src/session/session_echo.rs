use axum::http::{header, HeaderMap, HeaderValue};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use story_llm::GenerationOutcome;

use crate::story_idea::story_idea_request::GenerationRequest;

pub const ECHO_COOKIE: &str = "story_echo";

/// Browsers drop cookies whose `Set-Cookie` line exceeds this.
pub const MAX_COOKIE_BYTES: usize = 4096;

/// The last request and its outcome, kept only so the page can show them
/// again. It travels with the browser in a session cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEcho {
    pub request: GenerationRequest,
    pub outcome: GenerationOutcome,
}

impl SessionEcho {
    pub fn new(request: GenerationRequest, outcome: GenerationOutcome) -> Self {
        Self { request, outcome }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_vec(self)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    pub fn decode(value: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(value.trim()).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Finds the echo cookie among the request headers. Anything that fails to
    /// decode is treated as no echo at all.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == ECHO_COOKIE)
            .and_then(|(_, value)| Self::decode(value))
    }

    /// Builds the `Set-Cookie` value. An outcome too long to fit is cut
    /// until the header stays within `MAX_COOKIE_BYTES`.
    pub fn set_cookie(&self) -> Option<HeaderValue> {
        let mut echo = self.clone();
        loop {
            let encoded = match echo.encode() {
                Ok(encoded) => encoded,
                Err(e) => {
                    tracing::error!("Error encoding session echo: {}", e);
                    return None;
                }
            };
            let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", ECHO_COOKIE, encoded);
            if cookie.len() <= MAX_COOKIE_BYTES {
                return HeaderValue::from_str(&cookie).ok();
            }

            let chars = echo.outcome.message().chars().count();
            if chars == 0 {
                tracing::warn!(bytes = cookie.len(), "Session echo too large for a cookie");
                return None;
            }
            tracing::debug!(bytes = cookie.len(), chars, "Shortening outcome to fit the cookie");
            echo.outcome = echo.outcome.truncated(chars / 2);
        }
    }
}
