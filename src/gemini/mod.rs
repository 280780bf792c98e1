//! # Gemini Collaborators
//!
//! HTTP implementations of [`RewardProvider`] and [`ImageEditor`] backed by
//! the Gemini `generateContent` endpoint.
//!
//! [`GeminiClient`] is the fallible layer: one method per request, errors as
//! [`GeminiError`]. [`Gemini`] wraps it into the never-failing collaborator
//! contracts:
//! - no API key: offline reward, no image edits
//! - any request or parse failure: `warn!` log, then the fallback reward or
//!   `None` for image edits

mod error;
mod http;
mod wire;

pub use error::GeminiError;

use crate::clef::Clef;
use crate::config::GeminiConfig;
use crate::image::{ImageData, ImageEditor};
use crate::reward::{RewardData, RewardProvider};

use self::http::check_response;
use self::wire::{Content, GenerateRequest, GenerateResponse, GenerationConfig, Part};

const USER_AGENT: &str = concat!("clef-quest/", env!("CARGO_PKG_VERSION"));

/// Low-level Gemini API client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    image_model: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self, GeminiError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            api_key: config.api_key.trim().to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            image_model: config.image_model.clone(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, GeminiError> {
        let resp = self
            .http
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;
        let resp = check_response(resp).await?;
        Ok(resp.json().await?)
    }

    /// Ask the text model for a nickname and fun fact.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError`] if the request fails or the answer is not a
    /// JSON object with two non-blank fields.
    pub async fn generate_reward(
        &self,
        clef: Clef,
        score: u32,
        level_name: &str,
    ) -> Result<RewardData, GeminiError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part::text(reward_prompt(clef, score, level_name))],
            }],
            generation_config: Some(GenerationConfig::reward_json()),
        };
        let response = self.generate_content(&self.model, &request).await?;
        parse_reward(&response)
    }

    /// Ask the image model to edit `image` according to `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError`] if the request fails or the answer carries no
    /// decodable image.
    pub async fn edit_image(&self, image: &ImageData, prompt: &str) -> Result<ImageData, GeminiError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::inline(image.mime_type.clone(), image.to_base64()),
                    Part::text(prompt),
                ],
            }],
            generation_config: Some(GenerationConfig::image()),
        };
        let response = self.generate_content(&self.image_model, &request).await?;
        parse_image(&response)
    }
}

fn reward_prompt(clef: Clef, score: u32, level_name: &str) -> String {
    format!(
        "The user is a child learning music theory.\n\
         They just passed the level \"{level_name}\" ({clef} Clef) with a score of {score}/100.\n\
         \n\
         Generate a JSON response with:\n\
         1. \"nickname\": A fun, encouraging, music-related nickname for them (in Traditional Chinese). \
         e.g., \"高音王子\", \"節奏大師\", \"小小莫札特\".\n\
         2. \"funFact\": A very short, interesting fact about the {clef} clef or general music theory \
         suitable for a primary school student (in Traditional Chinese).\n"
    )
}

fn parse_reward(response: &GenerateResponse) -> Result<RewardData, GeminiError> {
    let text = response.text().ok_or(GeminiError::Empty("no reward text"))?;
    let json = strip_code_fence(&text);
    let reward: RewardData =
        serde_json::from_str(json).map_err(|e| GeminiError::Parse(e.to_string()))?;
    if !reward.is_complete() {
        return Err(GeminiError::Empty("blank reward field"));
    }
    Ok(reward)
}

fn parse_image(response: &GenerateResponse) -> Result<ImageData, GeminiError> {
    let inline = response
        .inline_data()
        .ok_or(GeminiError::Empty("no image in response"))?;
    ImageData::from_base64(inline.mime_type.clone(), &inline.data)
        .ok_or_else(|| GeminiError::Parse("image data is not valid base64".to_string()))
}

/// Models occasionally wrap JSON in a markdown fence despite the MIME type.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map_or(trimmed, str::trim)
}

/// Reward and image collaborator for the game.
#[derive(Debug, Clone, Default)]
pub struct Gemini {
    client: Option<GeminiClient>,
}

impl Gemini {
    /// Online when an API key is configured and the HTTP client builds.
    pub fn from_config(config: &GeminiConfig) -> Self {
        if !config.is_configured() {
            tracing::debug!("no Gemini API key configured; using offline rewards");
            return Self::offline();
        }
        match GeminiClient::new(config) {
            Ok(client) => Self {
                client: Some(client),
            },
            Err(e) => {
                tracing::warn!(%e, "failed to build Gemini client; using offline rewards");
                Self::offline()
            }
        }
    }

    pub fn offline() -> Self {
        Self { client: None }
    }

    pub fn is_online(&self) -> bool {
        self.client.is_some()
    }
}

impl RewardProvider for Gemini {
    async fn request_reward(&self, clef: Clef, score: u32, level_name: &str) -> RewardData {
        let Some(client) = &self.client else {
            return RewardData::offline();
        };
        match client.generate_reward(clef, score, level_name).await {
            Ok(reward) => reward,
            Err(e) => {
                tracing::warn!(%e, level = level_name, "reward generation failed; using fallback");
                RewardData::fallback()
            }
        }
    }
}

impl ImageEditor for Gemini {
    async fn request_image_edit(&self, image: &ImageData, prompt: &str) -> Option<ImageData> {
        let client = self.client.as_ref()?;
        client
            .edit_image(image, prompt)
            .await
            .inspect_err(|e| tracing::warn!(%e, "image edit failed"))
            .ok()
    }
}
