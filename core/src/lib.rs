//! Socratic Core Module
//!
//! Prompt construction and conversation relay for wrong-answer review:
//! builds the tutoring prompt for a missed LSAT, SAT or MCAT question,
//! forwards the conversation to a model provider, and returns the reply with
//! the updated transcript.

pub mod config;
pub mod conversation;
pub mod prompt;
pub mod provider;
pub mod relay;

pub use config::{AppConfig, ConfigManager, ProviderConfig, ProviderKind};
pub use conversation::{Conversation, Message, Role};
pub use prompt::{build_prompt, BuiltPrompt, FormFields, PromptError, TestType, NOT_PROVIDED};
pub use provider::{create_provider, CompletionProvider, ProviderError, StubProvider};
pub use relay::{AnalysisOutcome, ConversationRelay, RelayError};
