//! Core trait abstractions.

pub mod chat;

pub use chat::{ChatMessage, ChatModel, ChatRequest, ChatResponse};
