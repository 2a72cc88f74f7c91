pub mod keyword_parser;
pub mod keyword_prompt;
pub mod llm_factory;
pub mod llm_provider;
pub mod openai_provider;

pub use keyword_parser::{parse_candidates, ParseOutcome};
pub use keyword_prompt::{build_keyword_prompt, modifier_examples, SYSTEM_PROMPT};
pub use llm_factory::LlmProviderFactory;
pub use llm_provider::*;
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
