//! Answer generator trait: the text-generation boundary.

use async_trait::async_trait;

use crate::error::Result;

/// A text-generation capability consumed as a single blocking call.
///
/// The pipeline applies no retry, no timeout, and no local fallback: any
/// failure propagates as a [`RagError::Generation`](crate::RagError)
/// and aborts the request.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Generate the answer text for a fully composed prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
