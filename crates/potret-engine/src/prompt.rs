//! Prompt assembly for the image-generation collaborator.

use potret_core::PromptParams;

/// Positive prompt template. The three placeholders are the only
/// user-steerable parts; everything else pins the ID-photo style and
/// protects facial identity.
const BASE_PROMPT: &str = "professional ID photo, half-body portrait, \
{clothing_type} {clothing_color}, {background_color} solid background, \
studio lighting, natural skin tone, sharp focus on face, photorealistic, \
high quality, corporate headshot style, exact same face, preserve facial \
features, identical face structure, maintain body proportions, realistic \
body size, natural physique, professional studio lighting, soft shadows, \
even illumination";

/// Fixed negative prompt.
pub const NEGATIVE_PROMPT: &str = "cartoon, illustration, painting, drawing, \
art, sketch, anime, 3d render, distorted face, deformed, ugly, blurry, \
duplicate, multiple people, watermark, text, cropped, low quality, jpeg \
artifacts, mutation, extra limbs, missing limbs, floating limbs, \
disconnected limbs, malformed hands, long neck, cross-eyed, mutated, bad \
anatomy, bad proportions, cloned face, disfigured, gross proportions, \
malformed, pattern background, patterned clothing, logo, stripes, texture, \
gradient background, objects in background";

pub fn build_prompt(params: &PromptParams) -> String {
    BASE_PROMPT
        .replace("{clothing_type}", &params.clothing_type)
        .replace("{clothing_color}", &params.clothing_color)
        .replace("{background_color}", &params.background_color)
}

/// Tuned generation constants for the image-to-image call.
#[derive(Debug, Clone)]
pub struct AiSettings {
    pub temperature: f32,
    pub guidance_scale: f32,
    pub num_inference_steps: u32,
    /// Denoising strength; low values preserve more of the input photo.
    pub strength: f32,
    pub width: u32,
    pub height: u32,
    pub output_format: &'static str,
    pub output_quality: u32,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            temperature: 0.05,
            guidance_scale: 7.5,
            num_inference_steps: 50,
            strength: 0.35,
            width: 768,
            height: 1024,
            output_format: "jpg",
            output_quality: 95,
        }
    }
}
