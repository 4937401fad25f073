use crate::layout::LayoutOptions;
use crate::Args;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
    pub allowed_origins: Vec<String>,
    pub layout: LayoutOptions,
    pub llm: LlmConfig,
}

/// Settings for the optional OpenAI compatible formatter
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
    pub max_tokens: u32,
}

impl LlmConfig {
    /// Both an endpoint and a key are required before any request is made
    pub fn is_configured(&self) -> bool {
        matches!((&self.base_url, &self.api_key), (Some(url), Some(key)) if !url.is_empty() && !key.is_empty())
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let allowed_origins = args
            .allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            host: args.host,
            port: args.port,
            max_body_size: args.max_body_size,
            allowed_origins,
            layout: LayoutOptions {
                line_threshold_ratio: args.line_threshold_ratio,
                paragraph_gap_ratio: args.paragraph_gap_ratio,
                ..LayoutOptions::default()
            },
            llm: LlmConfig {
                base_url: args.llm_base_url,
                api_key: args.llm_api_key,
                model: args.llm_model,
                timeout: Duration::from_secs(args.llm_timeout_secs),
                max_tokens: args.llm_max_tokens,
            },
        }
    }
}
