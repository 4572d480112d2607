//! One adapter per upstream endpoint shape.
//!
//! Adapters only build the outbound [`HttpCall`] and interpret the
//! [`RawResponse`]; validation, prompting and rendering stay shared in the
//! orchestrator.

use serde_json::{Value, json};

use super::transport::{HttpCall, RawResponse};
use crate::core::config::{AppConfig, EndpointKind};
use crate::core::models::{Credential, SummaryRequest};
use crate::errors::SummaryError;

pub const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
pub const CORS_RELAY_PREFIX: &str = "https://corsproxy.io/?url=";
pub const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const OPENAI_MODEL: &str = "gpt-4o";
pub const MAX_OUTPUT_TOKENS: u32 = 4000;
pub const OPENAI_TEMPERATURE: f64 = 0.7;

const ANTHROPIC_TIPS: &[&str] = &[
    "Check that your API key is correct",
    "Make sure you have credits in your Anthropic account",
    "Verify the key has not been revoked in the Anthropic console",
];

const PROXY_TIPS: &[&str] = &[
    "Check that your API key is correct",
    "Make sure you have credits in your Anthropic account",
    "The public CORS relay may be down or rate limited; try again later",
];

const OPENAI_TIPS: &[&str] = &[
    "Check that your OpenAI API key is correct",
    "Make sure your OpenAI account has available credits",
    "Confirm the configured model is enabled for your account",
];

const RELAY_TIPS: &[&str] = &[
    "Check that your API key is correct",
    "Make sure the relay server is running and reachable",
    "Verify the relay URL configuration",
];

/// Outcome of interpreting one vendor response.
#[derive(Debug)]
pub enum VendorReply {
    Text(String),
    Error(SummaryError),
}

pub trait VendorAdapter: Send + Sync {
    fn kind(&self) -> EndpointKind;

    fn build_call(
        &self,
        request: &SummaryRequest,
        prompt: &str,
        credential: &Credential,
    ) -> HttpCall;

    fn parse_reply(&self, response: &RawResponse) -> VendorReply;

    /// Checklist shown underneath inline errors.
    fn troubleshooting(&self) -> &'static [&'static str];
}

/// Picks the adapter for the configured endpoint.
#[must_use]
pub fn adapter_for(config: &AppConfig) -> Box<dyn VendorAdapter> {
    match config.endpoint {
        EndpointKind::Anthropic => Box::new(AnthropicAdapter::direct(config.model.clone())),
        EndpointKind::AnthropicProxy => Box::new(AnthropicAdapter::proxied(config.model.clone())),
        EndpointKind::OpenAi => Box::new(OpenAiAdapter::new(config.model.clone())),
        EndpointKind::Relay => Box::new(RelayAdapter::new(config.relay_url.clone())),
    }
}

/// Message for a non-2xx response: the decoded `error.message` when present,
/// the bare status otherwise, and status plus raw text when the body is not
/// JSON at all.
#[must_use]
pub fn error_message(response: &RawResponse) -> String {
    let status = response.status;
    if response.body.trim().is_empty() {
        return format!("API error: {status}");
    }
    match serde_json::from_str::<Value>(&response.body) {
        Ok(body) => {
            embedded_error(&body).unwrap_or_else(|| format!("API error: {status}"))
        }
        Err(_) => format!("API error: {status} - {}", response.body),
    }
}

/// Finds `error.message`, or a bare string `error`, in a decoded body.
fn embedded_error(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    match error {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(_) => error
            .get("message")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

fn decode_success(response: &RawResponse) -> Result<Value, SummaryError> {
    serde_json::from_str(&response.body).map_err(|_| {
        SummaryError::Transport(format!(
            "API error: {} - {}",
            response.status, response.body
        ))
    })
}

/// Text of `choices[0].message.content`, the chat-completions shape.
fn first_choice_text(body: &Value) -> Option<String> {
    body.get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn reply_from(text: Option<String>) -> VendorReply {
    match text {
        Some(text) => VendorReply::Text(text),
        None => VendorReply::Error(SummaryError::EmptyResult),
    }
}

/// Anthropic messages API, optionally wrapped through the public CORS relay.
pub struct AnthropicAdapter {
    model: String,
    proxied: bool,
}

impl AnthropicAdapter {
    #[must_use]
    pub fn direct(model: Option<String>) -> Self {
        Self {
            model: model.unwrap_or_else(|| ANTHROPIC_MODEL.to_string()),
            proxied: false,
        }
    }

    #[must_use]
    pub fn proxied(model: Option<String>) -> Self {
        Self {
            proxied: true,
            ..Self::direct(model)
        }
    }

    fn url(&self) -> String {
        if self.proxied {
            format!(
                "{CORS_RELAY_PREFIX}{}",
                urlencoding::encode(ANTHROPIC_MESSAGES_URL)
            )
        } else {
            ANTHROPIC_MESSAGES_URL.to_string()
        }
    }
}

impl VendorAdapter for AnthropicAdapter {
    fn kind(&self) -> EndpointKind {
        if self.proxied {
            EndpointKind::AnthropicProxy
        } else {
            EndpointKind::Anthropic
        }
    }

    fn build_call(
        &self,
        _request: &SummaryRequest,
        prompt: &str,
        credential: &Credential,
    ) -> HttpCall {
        let body = json!({
            "model": self.model,
            "max_tokens": MAX_OUTPUT_TOKENS,
            "messages": [{ "role": "user", "content": prompt }]
        });
        HttpCall::post_json(self.url(), body)
            .header("x-api-key", credential.expose())
            .header("anthropic-version", ANTHROPIC_VERSION)
    }

    fn parse_reply(&self, response: &RawResponse) -> VendorReply {
        if !response.is_success() {
            return VendorReply::Error(SummaryError::Transport(error_message(response)));
        }
        let body = match decode_success(response) {
            Ok(body) => body,
            Err(e) => return VendorReply::Error(e),
        };

        let text: String = body
            .get("content")
            .and_then(Value::as_array)
            .map(|segments| {
                segments
                    .iter()
                    .filter(|s| s.get("type").and_then(Value::as_str) == Some("text"))
                    .filter_map(|s| s.get("text").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default();

        reply_from(Some(text).filter(|t| !t.is_empty()))
    }

    fn troubleshooting(&self) -> &'static [&'static str] {
        if self.proxied { PROXY_TIPS } else { ANTHROPIC_TIPS }
    }
}

/// OpenAI chat completions.
pub struct OpenAiAdapter {
    model: String,
}

impl OpenAiAdapter {
    #[must_use]
    pub fn new(model: Option<String>) -> Self {
        Self {
            model: model.unwrap_or_else(|| OPENAI_MODEL.to_string()),
        }
    }
}

impl VendorAdapter for OpenAiAdapter {
    fn kind(&self) -> EndpointKind {
        EndpointKind::OpenAi
    }

    fn build_call(
        &self,
        _request: &SummaryRequest,
        prompt: &str,
        credential: &Credential,
    ) -> HttpCall {
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": MAX_OUTPUT_TOKENS,
            "temperature": OPENAI_TEMPERATURE
        });
        HttpCall::post_json(OPENAI_CHAT_URL, body)
            .header("Authorization", format!("Bearer {}", credential.expose()))
    }

    fn parse_reply(&self, response: &RawResponse) -> VendorReply {
        if !response.is_success() {
            return VendorReply::Error(SummaryError::Transport(error_message(response)));
        }
        match decode_success(response) {
            Ok(body) => reply_from(first_choice_text(&body)),
            Err(e) => VendorReply::Error(e),
        }
    }

    fn troubleshooting(&self) -> &'static [&'static str] {
        OPENAI_TIPS
    }
}

/// Operator-hosted relay. The relay composes its own prompt, so only the
/// raw request fields and the credential are forwarded.
pub struct RelayAdapter {
    url: String,
}

impl RelayAdapter {
    #[must_use]
    pub fn new(url: String) -> Self {
        Self { url }
    }
}

impl VendorAdapter for RelayAdapter {
    fn kind(&self) -> EndpointKind {
        EndpointKind::Relay
    }

    fn build_call(
        &self,
        request: &SummaryRequest,
        _prompt: &str,
        credential: &Credential,
    ) -> HttpCall {
        let body = json!({
            "title": request.title,
            "author": request.author,
            "chapter": request.chapter,
            "apiKey": credential.expose()
        });
        HttpCall::post_json(self.url.clone(), body)
    }

    fn parse_reply(&self, response: &RawResponse) -> VendorReply {
        if !response.is_success() {
            return VendorReply::Error(SummaryError::Transport(error_message(response)));
        }
        let body = match decode_success(response) {
            Ok(body) => body,
            Err(e) => return VendorReply::Error(e),
        };
        // The relay reports upstream failures in-band with a 200.
        if let Some(message) = embedded_error(&body) {
            return VendorReply::Error(SummaryError::Transport(message));
        }
        reply_from(first_choice_text(&body))
    }

    fn troubleshooting(&self) -> &'static [&'static str] {
        RELAY_TIPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn error_message_prefers_decoded_message() {
        let r = response(401, r#"{"error":{"message":"invalid x-api-key"}}"#);
        assert_eq!(error_message(&r), "invalid x-api-key");
    }

    #[test]
    fn error_message_falls_back_to_status() {
        assert_eq!(error_message(&response(500, "")), "API error: 500");
        assert_eq!(error_message(&response(502, r#"{"detail":1}"#)), "API error: 502");
    }

    #[test]
    fn error_message_includes_raw_text_when_not_json() {
        assert_eq!(
            error_message(&response(503, "upstream down")),
            "API error: 503 - upstream down"
        );
    }

    #[test]
    fn proxied_url_wraps_encoded_target() {
        let adapter = AnthropicAdapter::proxied(None);
        assert_eq!(
            adapter.url(),
            "https://corsproxy.io/?url=https%3A%2F%2Fapi.anthropic.com%2Fv1%2Fmessages"
        );
    }
}
