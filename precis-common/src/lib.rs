//! Common types and utilities shared across Precis crates.
//!
//! This crate defines the LLM provider configuration, observability helpers,
//! and the shared error type used throughout the Precis workspace. It is
//! intentionally lightweight so that every crate can depend on it without
//! introducing heavy transitive costs.
//!
//! # Overview
//!
//! - [`LlmConfig`]: Provider‑agnostic LLM configuration
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`PrecisError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use precis_common::LlmConfig;
//!
//! let cfg = LlmConfig::default();
//! assert!(!cfg.is_enabled());
//! ```
use serde::{Deserialize, Serialize};

pub mod observability;

/// Configuration for an LLM provider used by the neural summarizer.
///
/// Feature flags control which variants are compiled in.
/// See the `precis-llm` crate for concrete client implementations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LlmConfig {
    #[cfg(feature = "ollama")]
    Ollama { base_url: String, model: String },
    #[cfg(feature = "openai")]
    OpenAi {
        api_key: String,
        model: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
    None,
}

impl Default for LlmConfig {
    fn default() -> Self {
        // The extractive path needs no provider; the LLM path is opt-in.
        Self::None
    }
}

impl LlmConfig {
    /// Whether a concrete provider is configured.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Error types used across the Precis system.
#[derive(thiserror::Error, Debug)]
pub enum PrecisError {
    /// An LLM provider failed to produce a response.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Fetching or decoding a page failed.
    #[error("Fetch error: {0}")]
    Fetch(#[from] anyhow::Error),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation exceeded the configured timeout.
    #[error("Timeout occurred")]
    Timeout,
}

/// Convenient alias for results that use [`PrecisError`].
pub type Result<T> = std::result::Result<T, PrecisError>;
