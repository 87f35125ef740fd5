//! OpenRouter-backed image generator.
//!
//! One generation is one image-to-image call: download the source photo,
//! inline it as base64, post the assembled prompt, and pull the first
//! image URL out of whatever response shape the routed model produced.

use std::time::Duration;

use anyhow::{bail, Context};
use async_trait::async_trait;
use base64::Engine as _;
use serde_json::{json, Value};
use tracing::debug;

use potret_core::{Error, PhotoRef, PromptParams, Result};
use potret_engine::prompt::{build_prompt, AiSettings, NEGATIVE_PROMPT};
use potret_engine::ImageGenerator;

const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";

pub struct OpenRouterGenerator {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    settings: AiSettings,
    timeout: Duration,
}

impl OpenRouterGenerator {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key,
            model,
            settings: AiSettings::default(),
            timeout,
        }
    }

    async fn call(&self, photo: &PhotoRef, params: &PromptParams) -> anyhow::Result<PhotoRef> {
        let bytes = self
            .http
            .get(photo.as_str())
            .send()
            .await
            .context("failed to download source photo")?
            .error_for_status()
            .context("source photo fetch returned an error status")?
            .bytes()
            .await
            .context("failed to read source photo body")?;
        let image = base64::engine::general_purpose::STANDARD.encode(&bytes);

        let payload = json!({
            "model": self.model,
            "prompt": build_prompt(params),
            "negative_prompt": NEGATIVE_PROMPT,
            "image": image,
            "temperature": self.settings.temperature,
            "guidance_scale": self.settings.guidance_scale,
            "num_inference_steps": self.settings.num_inference_steps,
            "strength": self.settings.strength,
            "width": self.settings.width,
            "height": self.settings.height,
            "output_format": self.settings.output_format,
            "output_quality": self.settings.output_quality,
        });

        debug!(model = %self.model, "dispatching generation request");
        let response = self
            .http
            .post(format!("{}/generation", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("generation request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("generation API returned {status}: {body}");
        }

        let body: Value = response
            .json()
            .await
            .context("generation response was not JSON")?;
        match extract_image_url(&body) {
            Some(url) => Ok(PhotoRef::from(url)),
            None => bail!("generation response carried no image URL"),
        }
    }
}

/// Routed models answer in several shapes; probe them in order of how
/// often they occur in practice.
fn extract_image_url(body: &Value) -> Option<String> {
    if let Some(url) = body.get("output").and_then(Value::as_str) {
        return Some(url.to_string());
    }
    if let Some(url) = body
        .get("output")
        .and_then(Value::as_array)
        .and_then(|a| a.first())
        .and_then(Value::as_str)
    {
        return Some(url.to_string());
    }
    if let Some(url) = body
        .get("data")
        .and_then(Value::as_array)
        .and_then(|a| a.first())
        .and_then(|item| item.get("url"))
        .and_then(Value::as_str)
    {
        return Some(url.to_string());
    }
    if let Some(url) = body
        .get("images")
        .and_then(Value::as_array)
        .and_then(|a| a.first())
        .and_then(Value::as_str)
    {
        return Some(url.to_string());
    }
    None
}

#[async_trait]
impl ImageGenerator for OpenRouterGenerator {
    async fn generate(&self, photo: &PhotoRef, params: &PromptParams) -> Result<PhotoRef> {
        match tokio::time::timeout(self.timeout, self.call(photo, params)).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => Err(Error::Ai(e.to_string())),
            Err(_) => Err(Error::GenerationTimeout),
        }
    }
}
