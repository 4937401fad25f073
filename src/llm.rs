//! LLM formatter
//!
//! Sends the recognized text, one fragment per line in reading order, to an
//! OpenAI compatible chat completion endpoint and returns whatever Markdown it
//! produces. The output is not deterministic and is never fed back into the
//! local layout.

use crate::config::LlmConfig;
use crate::error::FormatError;
use crate::models::FormattedResult;
use serde::{Deserialize, Serialize};

const FORMAT_PROMPT: &str = "You are a professional document layout assistant. \
Reformat and proofread the following OCR text and output formatted Markdown.

Requirements:
1. Fix obvious OCR recognition errors (typos, garbled characters)
2. Split the content into sensible paragraphs based on its meaning
3. Mark headings with Markdown heading syntax (#, ##, ###)
4. Keep the content complete, do not add or remove information
5. Use Markdown list syntax for list content
6. Output only the formatted Markdown without any explanation

OCR text:
";

/// Low temperature keeps the output close to the source text
const TEMPERATURE: f32 = 0.3;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Client for the optional LLM formatting step
pub struct LlmFormatter {
    client: reqwest::Client,
    config: LlmConfig,
}

impl LlmFormatter {
    pub fn new(config: LlmConfig) -> Result<Self, FormatError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FormatError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Format text lines given in reading order. Never fails; errors are
    /// reported in the returned result.
    pub async fn format(&self, lines: &[String]) -> FormattedResult {
        if !self.is_configured() {
            return FormattedResult::failed(FormatError::LlmNotConfigured);
        }

        if lines.is_empty() {
            return FormattedResult::ok("");
        }

        match self.complete(&lines.join("\n")).await {
            Ok(markdown) => {
                tracing::info!("LLM formatting finished, output length: {}", markdown.len());
                FormattedResult::ok(markdown)
            }
            Err(e) => {
                tracing::error!("{}", e);
                FormattedResult::failed(e)
            }
        }
    }

    async fn complete(&self, text: &str) -> Result<String, FormatError> {
        let (Some(base_url), Some(api_key)) = (&self.config.base_url, &self.config.api_key) else {
            return Err(FormatError::LlmNotConfigured);
        };

        let url = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: format!("{}{}", FORMAT_PROMPT, text),
            }],
            max_tokens: self.config.max_tokens,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FormatError::LlmStatus {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| self.transport_error(e))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or(FormatError::LlmResponse)
    }

    fn transport_error(&self, e: reqwest::Error) -> FormatError {
        if e.is_timeout() {
            FormatError::LlmTimeout(self.config.timeout)
        } else if e.is_decode() {
            FormatError::LlmResponse
        } else {
            FormatError::LlmRequest(e.to_string())
        }
    }
}
