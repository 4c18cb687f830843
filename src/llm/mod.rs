//! LLM module for medscribe
//!
//! Task prompts and the completion backend they are sent to.

mod client;
mod openai;
mod prompts;

pub use client::{
    build_client, CompletionClient, CompletionFailure, CompletionResult, ErrorKind,
};
pub use openai::OpenAiClient;
pub use prompts::{lookup, Action, PromptTemplate, UnknownAction};
