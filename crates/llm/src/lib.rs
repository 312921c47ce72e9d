//! Pilot Run LLM
//!
//! Text-completion provider abstraction for the Pilot Run workspace. The
//! simulation engine consumes a single narrow contract: given a
//! system-instructions string and an ordered role-tagged message history,
//! return one text completion. Any rejection is a per-run failure the engine
//! handles by falling back to its deterministic simulator — never a protocol
//! error.
//!
//! ## Module Organization
//!
//! - `types` - Chat messages, provider configuration, and the error taxonomy
//! - `provider` - The `CompletionProvider` trait and shared HTTP error mapping
//! - `openai` - OpenAI-compatible chat-completions implementation

pub mod openai;
pub mod provider;
pub mod types;

pub use openai::OpenAiCompatProvider;
pub use provider::CompletionProvider;
pub use types::{ChatMessage, ChatRole, LlmError, LlmResult, ProviderConfig};
