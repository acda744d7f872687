//! Chat-model implementations over real providers.

pub mod openai;

pub use openai::OpenAiChat;
