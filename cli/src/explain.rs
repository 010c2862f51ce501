//! Plain-language explanation of a manual page.
//!
//! With `GROQ_API_KEY` set, the cleaned manual text is sent to an
//! OpenAI-compatible chat-completions endpoint. Without a key, or when the
//! request fails, a canned offline summary is returned instead. This never
//! fails outright.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use smartman_source::normalize::{clean_control_chars, truncate_chars};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest manual excerpt sent to the endpoint, in characters.
pub const MAX_MANUAL_CHARS: usize = 12_000;

const TEMPERATURE: f32 = 0.5;
const MAX_TOKENS: u32 = 500;

const SYSTEM_PROMPT: &str = "You are a Linux systems expert. Explain the command described by the \
    manual page below to a beginner. Be concise and practical: cover its core purpose and the two or \
    three most useful flags that appear in the text. Answer in plain text.";

#[derive(Debug, Clone)]
pub struct ExplainConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl ExplainConfig {
    /// Reads `GROQ_API_KEY`, plus the optional `SMARTMAN_AI_ENDPOINT` and
    /// `SMARTMAN_AI_MODEL` overrides.
    pub fn from_env() -> Self {
        let var = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            api_key: var("GROQ_API_KEY"),
            endpoint: var("SMARTMAN_AI_ENDPOINT").unwrap_or(defaults.endpoint),
            model: var("SMARTMAN_AI_MODEL").unwrap_or(defaults.model),
            timeout: defaults.timeout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Explanation {
    /// Text returned by the endpoint.
    Live(String),
    Offline {
        summary: String,
        reason: OfflineReason,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfflineReason {
    NoApiKey,
    Failed(String),
}

#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("invalid response: {0}")]
    Decode(#[from] std::io::Error),

    #[error("response contained no message")]
    EmptyResponse,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Explains `command` from its raw manual text.
pub fn explain(command: &str, raw_text: &str, config: &ExplainConfig) -> Explanation {
    let Some(api_key) = config.api_key.as_deref() else {
        debug!("no API key configured; using offline summary");
        return Explanation::Offline {
            summary: offline_summary(command),
            reason: OfflineReason::NoApiKey,
        };
    };

    match request_explanation(command, raw_text, api_key, config) {
        Ok(text) => Explanation::Live(text),
        Err(err) => {
            warn!(command, error = %err, "live explanation failed");
            Explanation::Offline {
                summary: offline_summary(command),
                reason: OfflineReason::Failed(err.to_string()),
            }
        }
    }
}

/// Manual text as sent to the endpoint: overstrikes and control characters
/// removed, then truncated to [`MAX_MANUAL_CHARS`].
pub fn prepare_manual(raw_text: &str) -> String {
    let cleaned = clean_control_chars(raw_text);
    truncate_chars(&cleaned, MAX_MANUAL_CHARS).to_string()
}

fn request_explanation(
    command: &str,
    raw_text: &str,
    api_key: &str,
    config: &ExplainConfig,
) -> Result<String, ExplainError> {
    let request = ChatRequest {
        model: &config.model,
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: format!(
                    "Command: {command}\n\nManual Page Content:\n{}",
                    prepare_manual(raw_text)
                ),
            },
        ],
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    };

    debug!(endpoint = %config.endpoint, model = %config.model, "requesting explanation");
    let response = ureq::post(&config.endpoint)
        .timeout(config.timeout)
        .set("Authorization", &format!("Bearer {api_key}"))
        .send_json(&request);

    let response = match response {
        Ok(response) => response,
        Err(ureq::Error::Status(status, response)) => {
            let body = response.into_string().unwrap_or_default();
            return Err(ExplainError::Status { status, body });
        }
        Err(ureq::Error::Transport(transport)) => {
            return Err(ExplainError::Transport(transport.to_string()));
        }
    };

    let body: ChatResponse = response.into_json()?;
    body.choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(ExplainError::EmptyResponse)
}

/// Canned summary used when no live explanation is available.
pub fn offline_summary(command: &str) -> String {
    match command {
        "grep" => "Searches text line by line and prints the lines that match a pattern, \
            either a plain word or a regular expression. Handy for digging through logs or \
            finding where something is defined in code."
            .to_string(),
        "ls" => "Lists the contents of a directory. Add `-l` for sizes, owners and dates, or \
            `-a` to include hidden files."
            .to_string(),
        "tar" => "Bundles many files into a single archive, and unpacks them again. It is the \
            usual way software is shipped on Linux, often combined with compression as `.tar.gz`."
            .to_string(),
        "find" => "Walks a directory tree and reports files that match tests on their name, \
            size, age or permissions, optionally running a command on each one."
            .to_string(),
        other => format!(
            "A Linux utility for processing data or managing system tasks related to {other}."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_key_uses_offline_summary() {
        let config = ExplainConfig::default();
        let explanation = explain("tar", "NAME\n  tar\n", &config);
        assert_eq!(
            explanation,
            Explanation::Offline {
                summary: offline_summary("tar"),
                reason: OfflineReason::NoApiKey,
            }
        );
    }

    #[test]
    fn test_offline_summary_known_and_generic() {
        assert!(offline_summary("grep").contains("pattern"));
        assert!(offline_summary("ls").contains("`-l`"));
        assert!(offline_summary("find").contains("directory tree"));
        assert_eq!(
            offline_summary("rsync"),
            "A Linux utility for processing data or managing system tasks related to rsync."
        );
    }

    #[test]
    fn test_prepare_manual_cleans_and_truncates() {
        assert_eq!(prepare_manual("N\x08NA\x08AM\x08ME\x08E\x07\tx"), "NAME\tx");

        let long = "é".repeat(MAX_MANUAL_CHARS + 50);
        assert_eq!(prepare_manual(&long).chars().count(), MAX_MANUAL_CHARS);
    }

    #[test]
    fn test_unreachable_endpoint_falls_back() {
        let config = ExplainConfig {
            api_key: Some("test-key".to_string()),
            endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            timeout: Duration::from_secs(2),
            ..ExplainConfig::default()
        };
        match explain("ls", "NAME\n  ls\n", &config) {
            Explanation::Offline {
                summary,
                reason: OfflineReason::Failed(_),
            } => assert_eq!(summary, offline_summary("ls")),
            other => panic!("expected offline fallback, got {other:?}"),
        }
    }

    #[test]
    fn test_chat_request_shape() {
        let request = ChatRequest {
            model: DEFAULT_MODEL,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], DEFAULT_MODEL);
        assert_eq!(json["max_tokens"], 500);
        assert_eq!(json["temperature"], 0.5);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_chat_response_parse() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"  Lists files. "}}]}"#,
        )
        .unwrap();
        assert_eq!(body.choices[0].message.content.trim(), "Lists files.");
    }
}
