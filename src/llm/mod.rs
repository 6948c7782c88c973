//! LLM provider resolution, prompt construction, and HTTP adapters.

pub mod anthropic;
pub mod gemini;
pub mod generate;
mod http;
pub mod openai;
pub mod prompt;
pub mod provider;

pub use generate::{DefaultFactory, GeneratorFactory, TextGenerator, generate_post};
pub use prompt::{HOUSE_STYLE, HOUSE_STYLE_VERSION, Prompt, build_prompt};
pub use provider::{AdapterFamily, ProviderKind, ProviderSpec};
