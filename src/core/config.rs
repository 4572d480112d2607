use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Relay endpoint used when `BOOKSUM_RELAY_URL` is not set.
pub const DEFAULT_RELAY_URL: &str = "https://book-summary-relay.vercel.app/api/summary";

/// Which upstream shape summary requests are sent in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    /// Direct call to the Anthropic messages API.
    Anthropic,
    /// Anthropic messages API wrapped through a public CORS relay.
    AnthropicProxy,
    /// OpenAI chat completions.
    OpenAi,
    /// Operator-hosted relay that calls the vendor server-side.
    Relay,
}

impl EndpointKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EndpointKind::Anthropic => "anthropic",
            EndpointKind::AnthropicProxy => "anthropic-proxy",
            EndpointKind::OpenAi => "openai",
            EndpointKind::Relay => "relay",
        }
    }
}

impl FromStr for EndpointKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" => Ok(EndpointKind::Anthropic),
            "anthropic-proxy" | "proxy" => Ok(EndpointKind::AnthropicProxy),
            "openai" => Ok(EndpointKind::OpenAi),
            "relay" => Ok(EndpointKind::Relay),
            other => Err(format!("unknown endpoint '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub endpoint: EndpointKind,
    pub relay_url: String,
    pub model: Option<String>,
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns an error if `BOOKSUM_ENDPOINT` names an unknown endpoint or no
    /// data directory can be determined.
    pub fn from_env() -> Result<Self, String> {
        let endpoint = match env::var("BOOKSUM_ENDPOINT") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| format!("BOOKSUM_ENDPOINT: {e}"))?,
            Err(_) => EndpointKind::Anthropic,
        };

        let data_dir = match env::var("BOOKSUM_DATA_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => dirs::data_dir()
                .map(|d| d.join("booksum"))
                .ok_or_else(|| "BOOKSUM_DATA_DIR: no data directory available".to_string())?,
        };

        Ok(Self {
            endpoint,
            relay_url: env::var("BOOKSUM_RELAY_URL")
                .unwrap_or_else(|_| DEFAULT_RELAY_URL.to_string()),
            model: env::var("BOOKSUM_MODEL").ok(),
            data_dir,
        })
    }
}
