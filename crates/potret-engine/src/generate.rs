//! Seam to the external image-generation collaborator.

use async_trait::async_trait;

use potret_core::{PhotoRef, PromptParams, Result};

/// A single blocking (from the conversation's point of view) generation
/// call with no partial results. Implementations must impose their own
/// timeout and report it as [`potret_core::Error::GenerationTimeout`];
/// any other failure is [`potret_core::Error::Ai`]. The engine makes at
/// most one attempt per event; retry is the user's job (resend the
/// photo).
#[async_trait]
pub trait ImageGenerator: Send + Sync + 'static {
    async fn generate(&self, photo: &PhotoRef, params: &PromptParams) -> Result<PhotoRef>;
}
