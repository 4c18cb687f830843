//! medscribe - Consultation transcripts in, SOAP notes and differential diagnoses out
//!
//! A thin gateway between a web form and a text-completion backend. The
//! transcript is paired with a fixed task prompt, sent to the backend, and the
//! Markdown reply is rendered to sanitized HTML.

pub mod cli;
pub mod config;
pub mod gateway;
pub mod llm;
pub mod render;
pub mod web;

#[cfg(test)]
mod test_support;

use thiserror::Error;

/// Main error type for medscribe
#[derive(Error, Debug)]
pub enum MedscribeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, MedscribeError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "medscribe";
