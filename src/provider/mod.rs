//! Machine-translation provider seam.
//!
//! The synchronization engine only needs "send a batch, get text back";
//! everything about the transport lives behind [`TranslationProvider`].

mod openai;

use futures::future::BoxFuture;
use thiserror::Error;

pub use openai::OpenAiProvider;

/// One request to the provider: a system prompt and a JSON object of key → text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// Target locale, for logging and routing.
    pub locale: String,
    pub system_prompt: String,
    /// Serialized JSON object holding the batch.
    pub payload: String,
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Request to translation provider failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Translation provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Translation provider returned no content")]
    EmptyResponse,

    #[error("Translation provider failed: {0}")]
    Other(String),
}

/// A machine-translation backend.
///
/// Implementations return the raw text of the reply; parsing it into a
/// key → translation map is the caller's job.
pub trait TranslationProvider: Send + Sync {
    fn translate<'a>(
        &'a self,
        request: &'a TranslationRequest,
    ) -> BoxFuture<'a, Result<String, ProviderError>>;
}
