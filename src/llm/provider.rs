//! Map a `<provider>/<model-name>` string to a generation backend.

use std::fmt;

use crate::config::Secrets;
use crate::error::{GenerationError, ProviderError};

use super::anthropic::AnthropicClient;
use super::gemini::GeminiClient;
use super::generate::TextGenerator;
use super::openai::OpenAiCompatibleClient;

/// Supported providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Anthropic,
    OpenAi,
    Google,
    Xai,
    DeepSeek,
}

/// Wire protocol an adapter speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterFamily {
    Anthropic,
    OpenAiCompatible,
    Gemini,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::Anthropic,
        ProviderKind::OpenAi,
        ProviderKind::Google,
        ProviderKind::Xai,
        ProviderKind::DeepSeek,
    ];

    /// Token used in the model string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Google => "google",
            ProviderKind::Xai => "xai",
            ProviderKind::DeepSeek => "deepseek",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == token)
    }

    /// Environment variable holding this provider's API key.
    pub fn secret_var(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Google => "GOOGLE_GENERATIVE_AI_API_KEY",
            ProviderKind::Xai => "XAI_API_KEY",
            ProviderKind::DeepSeek => "DEEPSEEK_API_KEY",
        }
    }

    pub fn family(&self) -> AdapterFamily {
        match self {
            ProviderKind::Anthropic => AdapterFamily::Anthropic,
            ProviderKind::Google => AdapterFamily::Gemini,
            ProviderKind::OpenAi | ProviderKind::Xai | ProviderKind::DeepSeek => {
                AdapterFamily::OpenAiCompatible
            }
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "https://api.anthropic.com/v1",
            ProviderKind::OpenAi => "https://api.openai.com/v1",
            ProviderKind::Google => "https://generativelanguage.googleapis.com/v1beta",
            ProviderKind::Xai => "https://api.x.ai/v1",
            ProviderKind::DeepSeek => "https://api.deepseek.com/v1",
        }
    }

    /// Every secret name any provider may need.
    pub fn secret_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|p| p.secret_var()).collect()
    }

    /// Comma-separated list of supported tokens.
    pub fn supported() -> String {
        Self::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed model string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSpec {
    pub provider: ProviderKind,
    pub model_name: String,
}

impl ProviderSpec {
    /// Parse `<provider>/<model-name>`, splitting on the first `/`.
    pub fn parse(model: &str) -> Result<Self, ProviderError> {
        let (token, model_name) = model
            .split_once('/')
            .filter(|(token, name)| !token.is_empty() && !name.is_empty())
            .ok_or_else(|| ProviderError::InvalidModelFormat(model.to_string()))?;

        let provider =
            ProviderKind::from_token(token).ok_or_else(|| ProviderError::UnknownProvider {
                provider: token.to_string(),
                supported: ProviderKind::supported(),
            })?;

        Ok(Self {
            provider,
            model_name: model_name.to_string(),
        })
    }

    /// The API key for this provider, or a `MissingSecret` error naming the
    /// variable and the secrets file.
    pub fn require_secret<'s>(&self, secrets: &'s Secrets) -> Result<&'s str, ProviderError> {
        let var = self.provider.secret_var();
        secrets.get(var).ok_or_else(|| ProviderError::MissingSecret {
            var,
            secrets_file: secrets.source().to_path_buf(),
        })
    }

    /// Build the adapter against the provider's public endpoint.
    pub fn build_client(&self, api_key: &str) -> Result<Box<dyn TextGenerator>, GenerationError> {
        self.build_client_at(self.provider.default_base_url(), api_key)
    }

    /// Build the adapter against `base_url`.
    pub fn build_client_at(
        &self,
        base_url: &str,
        api_key: &str,
    ) -> Result<Box<dyn TextGenerator>, GenerationError> {
        let model = self.model_name.as_str();
        Ok(match self.provider.family() {
            AdapterFamily::Anthropic => Box::new(AnthropicClient::new(model, api_key, base_url)?),
            AdapterFamily::Gemini => Box::new(GeminiClient::new(model, api_key, base_url)?),
            AdapterFamily::OpenAiCompatible => Box::new(OpenAiCompatibleClient::new(
                self.provider.as_str(),
                model,
                api_key,
                base_url,
            )?),
        })
    }
}

impl fmt::Display for ProviderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.model_name)
    }
}
