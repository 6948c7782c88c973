//! The generation seam: one network call, prompt in, text out.

use async_trait::async_trait;
use tracing::debug;

use crate::error::GenerationError;

use super::prompt::Prompt;
use super::provider::ProviderSpec;

/// A provider backend able to turn instructions into text.
///
/// This abstraction allows mocking the provider in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send the system and user instructions, return the raw completion.
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, GenerationError>;

    /// Short provider label used in errors and progress lines.
    fn provider_name(&self) -> &'static str;
}

/// Builds a [`TextGenerator`] for a resolved provider.
pub trait GeneratorFactory: Send + Sync {
    fn build(
        &self,
        spec: &ProviderSpec,
        api_key: &str,
    ) -> Result<Box<dyn TextGenerator>, GenerationError>;
}

/// Factory that talks to the real provider endpoints.
pub struct DefaultFactory;

impl GeneratorFactory for DefaultFactory {
    fn build(
        &self,
        spec: &ProviderSpec,
        api_key: &str,
    ) -> Result<Box<dyn TextGenerator>, GenerationError> {
        spec.build_client(api_key)
    }
}

/// Run the generation call and reject unusable output.
///
/// Provider failures pass through unchanged. A blank completion is an
/// error: no partial or empty post is ever accepted.
pub async fn generate_post(
    generator: &dyn TextGenerator,
    prompt: &Prompt,
) -> Result<String, GenerationError> {
    debug!(
        "Sending {} system chars and {} prompt chars to {}",
        prompt.system.len(),
        prompt.user.len(),
        generator.provider_name()
    );

    let raw = generator.generate(&prompt.system, &prompt.user).await?;

    if raw.trim().is_empty() {
        return Err(GenerationError::EmptyResponse {
            provider: generator.provider_name().to_string(),
        });
    }

    debug!("Received {} chars", raw.len());
    Ok(raw)
}
