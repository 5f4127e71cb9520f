//! Gemini `generateContent` client for the Workshop.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::{instrument, warn};

use crate::config::GeminiConfig;

use super::error::{ApiErrorResponse, GeminiError};
use super::types::{
    Concept, Content, DesignIdea, GenerateRequest, GenerateResponse, GenerationConfig,
    ImageConfig, design_idea_schema,
};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Shown when the image model fails or refuses.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://picsum.photos/1024/1024?grayscale&blur=2";

const SYSTEM_INSTRUCTION: &str = "You are a creative artisanal craft expert specializing in \
Macrame and Bleach Painting on clothing. Your goal is to suggest a unique, avant-garde project \
idea based on the user's vague request. The output must be structured JSON.";

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    text_model: String,
    image_model: String,
}

impl GeminiClient {
    /// Create a client with the API key as a default header.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a valid header value or the HTTP
    /// client cannot be built.
    pub fn new(config: &GeminiConfig) -> Result<Self, GeminiError> {
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|e| GeminiError::Unauthorized(format!("API key is not a valid header: {e}")))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-goog-api-key", api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner {
                client,
                text_model: config.text_model.clone(),
                image_model: config.image_model.clone(),
            }),
        })
    }

    /// Generate an idea, then try to render it.
    ///
    /// Image failures fall back to [`PLACEHOLDER_IMAGE_URL`].
    ///
    /// # Errors
    ///
    /// Returns an error only if the idea itself could not be generated.
    pub async fn concept(&self, prompt: &str, style: &str) -> Result<Concept, GeminiError> {
        let idea = self.generate_idea(prompt, style).await?;
        let (image_url, image_fallback) = match self.render_image(&idea.visual_prompt).await {
            Ok(url) => (url, false),
            Err(e) => {
                warn!(error = %e, "Concept image generation failed; using placeholder");
                (PLACEHOLDER_IMAGE_URL.to_string(), true)
            }
        };
        Ok(Concept {
            idea,
            image_url,
            image_fallback,
        })
    }

    /// Ask the text model for a structured project idea.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the answer does not match
    /// the idea schema.
    #[instrument(skip(self, prompt), fields(model = %self.inner.text_model))]
    pub async fn generate_idea(&self, prompt: &str, style: &str) -> Result<DesignIdea, GeminiError> {
        let request = GenerateRequest {
            system_instruction: Some(Content::system(SYSTEM_INSTRUCTION)),
            contents: vec![Content::user(idea_prompt(prompt, style))],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(design_idea_schema()),
                ..GenerationConfig::default()
            }),
        };

        let response = self.generate(&self.inner.text_model, &request).await?;
        let text = response
            .text()
            .ok_or_else(|| empty_response(&response))?;
        serde_json::from_str(&text)
            .map_err(|e| GeminiError::Parse(format!("Failed to parse idea: {e}")))
    }

    /// Render `visual_prompt` as a square image and return it as a `data:` URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or no valid image comes back.
    #[instrument(skip(self, visual_prompt), fields(model = %self.inner.image_model))]
    pub async fn render_image(&self, visual_prompt: &str) -> Result<String, GeminiError> {
        let request = GenerateRequest {
            system_instruction: None,
            contents: vec![Content::user(visual_prompt)],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["IMAGE".to_string()]),
                image_config: Some(ImageConfig {
                    aspect_ratio: "1:1".to_string(),
                    image_size: "1K".to_string(),
                }),
                ..GenerationConfig::default()
            }),
        };

        let response = self.generate(&self.inner.image_model, &request).await?;
        let image = response
            .inline_image()
            .ok_or_else(|| empty_response(&response))?;

        STANDARD
            .decode(&image.data)
            .map_err(|e| GeminiError::Parse(format!("Invalid image data: {e}")))?;
        Ok(format!("data:{};base64,{}", image.mime_type, image.data))
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, GeminiError> {
        let url = format!("{GEMINI_API_URL}/{model}:generateContent");
        let response = self.inner.client.post(url).json(request).send().await?;

        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(handle_error_status(status, response).await)
        }
    }
}

fn idea_prompt(prompt: &str, style: &str) -> String {
    format!(
        "User Request: \"{prompt}\"\nPreferred Style: \"{style}\"\n\n\
         Generate a unique project idea.\n\
         The 'visualPrompt' field should be a highly descriptive image generation prompt to \
         visualize this object, mentioning lighting, texture, and materials."
    )
}

fn empty_response(response: &GenerateResponse) -> GeminiError {
    GeminiError::EmptyResponse(response.finish_reason().unwrap_or("none").to_string())
}

async fn handle_error_status(status: reqwest::StatusCode, response: reqwest::Response) -> GeminiError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return GeminiError::RateLimited(retry_after);
    }

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return GeminiError::Unauthorized("Invalid API key".to_string());
    }

    match response.text().await {
        Ok(body) => parse_error_body(status, body),
        Err(e) => GeminiError::Http(e),
    }
}

fn parse_error_body(status: reqwest::StatusCode, body: String) -> GeminiError {
    match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(api_error) => GeminiError::Api {
            status: api_error.error.status,
            message: api_error.error.message,
        },
        Err(_) => GeminiError::Api {
            status: status.as_str().to_string(),
            message: body,
        },
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn test_idea_prompt_includes_request_and_style() {
        let prompt = idea_prompt("a hanger for my monstera", "Modern Boho");
        assert!(prompt.contains("User Request: \"a hanger for my monstera\""));
        assert!(prompt.contains("Preferred Style: \"Modern Boho\""));
        assert!(prompt.contains("visualPrompt"));
    }

    #[test]
    fn test_parse_error_body_api_envelope() {
        let body = r#"{"error":{"code":400,"message":"bad","status":"INVALID_ARGUMENT"}}"#;
        let err = parse_error_body(reqwest::StatusCode::BAD_REQUEST, body.to_string());
        assert!(matches!(
            err,
            GeminiError::Api { ref status, ref message } if status == "INVALID_ARGUMENT" && message == "bad"
        ));
    }

    #[test]
    fn test_parse_error_body_plain_text() {
        let err = parse_error_body(
            reqwest::StatusCode::BAD_GATEWAY,
            "upstream down".to_string(),
        );
        assert!(matches!(
            err,
            GeminiError::Api { ref status, ref message } if status == "502" && message == "upstream down"
        ));
    }

    #[test]
    fn test_new_rejects_bad_header_key() {
        let config = GeminiConfig {
            api_key: SecretString::from("bad\nkey"),
            text_model: "t".to_string(),
            image_model: "i".to_string(),
        };
        assert!(matches!(
            GeminiClient::new(&config),
            Err(GeminiError::Unauthorized(_))
        ));
    }
}
