use anyhow::{anyhow, Result};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestUserMessage,
        ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
        CreateChatCompletionRequest, ImageDetail, ImageUrl,
    },
    Client as OpenAiClient,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Configuration for the LLM client
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub requests_per_minute: u32,
    pub timeout_seconds: u64,
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4-turbo".to_string(),
            max_tokens: 500,
            temperature: 0.1,
            requests_per_minute: 10,
            timeout_seconds: 30,
            max_retries: 3,
        }
    }
}

/// Response from the LLM with metadata
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub raw_response: String,
    pub model: String,
    pub tokens_used: Option<u32>,
}

/// An image sent to the vision-capable chat model
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    /// MIME type, e.g. "image/webp"
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImageAttachment {
    /// Encode as the data URL the chat API expects for inline images
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, BASE64.encode(&self.data))
    }
}

/// Chat LLM client with rate limiting and retry logic
pub struct LlmClient {
    client: OpenAiClient<OpenAIConfig>,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
    config: LlmConfig,
}

impl LlmClient {
    /// Create a new LLM client from configuration
    ///
    /// # Arguments
    /// * `config` - LLM configuration
    /// * `api_key` - API key for the chat endpoint
    pub fn new(config: LlmConfig, api_key: String) -> Result<Self> {
        tracing::info!(
            "Initializing LLM client: model={}, rate_limit={}/min",
            config.model,
            config.requests_per_minute
        );

        let client = OpenAiClient::with_config(OpenAIConfig::new().with_api_key(api_key));

        // Initialize rate limiter
        let requests_per_minute = NonZeroU32::new(config.requests_per_minute)
            .ok_or_else(|| anyhow!("requests_per_minute must be > 0"))?;

        let quota = Quota::per_minute(requests_per_minute);
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            client,
            rate_limiter,
            config,
        })
    }

    /// Send a text prompt to the chat model.
    ///
    /// Rate limits the request and retries transient failures with
    /// exponential backoff. A reply with no choices comes back as an empty
    /// `raw_response` rather than an error; downstream parsing treats it as
    /// "nothing extracted".
    pub async fn complete(&self, prompt: String) -> Result<LlmResponse> {
        let content = ChatCompletionRequestUserMessageContent::Text(prompt);
        self.complete_content(content).await
    }

    /// Send a text prompt plus an inline image to the vision-capable model.
    pub async fn complete_with_image(
        &self,
        prompt: String,
        image: &ImageAttachment,
    ) -> Result<LlmResponse> {
        let parts = vec![
            ChatCompletionRequestUserMessageContentPart::Text(
                ChatCompletionRequestMessageContentPartText { text: prompt },
            ),
            ChatCompletionRequestUserMessageContentPart::ImageUrl(
                ChatCompletionRequestMessageContentPartImage {
                    image_url: ImageUrl {
                        url: image.to_data_url(),
                        detail: Some(ImageDetail::Auto),
                    },
                },
            ),
        ];

        let content = ChatCompletionRequestUserMessageContent::Array(parts);
        self.complete_content(content).await
    }

    async fn complete_content(
        &self,
        content: ChatCompletionRequestUserMessageContent,
    ) -> Result<LlmResponse> {
        // Wait for rate limiter
        self.rate_limiter.until_ready().await;

        // Call LLM with retries
        let mut last_error = None;

        for attempt in 0..self.config.max_retries {
            match self.call_chat(content.clone()).await {
                Ok(response) => {
                    tracing::info!(
                        "LLM response received: model={}, tokens={:?}, length={} chars",
                        response.model,
                        response.tokens_used,
                        response.raw_response.len()
                    );
                    return Ok(response);
                }
                Err(e) => {
                    last_error = Some(e);

                    if attempt + 1 < self.config.max_retries {
                        let backoff_ms = 2_u64.pow(attempt) * 1000;
                        tracing::warn!(
                            "LLM call failed (attempt {}/{}), retrying in {}ms: {}",
                            attempt + 1,
                            self.config.max_retries,
                            backoff_ms,
                            last_error.as_ref().unwrap()
                        );
                        sleep(Duration::from_millis(backoff_ms)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow!("All retry attempts failed")))
    }

    async fn call_chat(
        &self,
        content: ChatCompletionRequestUserMessageContent,
    ) -> Result<LlmResponse> {
        let request = CreateChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessage {
                    content,
                    name: None,
                },
            )],
            max_tokens: Some(self.config.max_tokens),
            temperature: Some(self.config.temperature),
            ..Default::default()
        };

        // Call API with timeout
        let response = tokio::time::timeout(
            Duration::from_secs(self.config.timeout_seconds),
            self.client.chat().create(request),
        )
        .await
        .map_err(|_| anyhow!("LLM request timed out after {}s", self.config.timeout_seconds))?
        .map_err(|e| anyhow!("Chat API error: {}", e))?;

        // A missing answer is a valid (empty) result, not a failure
        let response_text = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_else(|| {
                tracing::warn!("LLM returned no answer, treating as empty response");
                String::new()
            });

        Ok(LlmResponse {
            raw_response: response_text,
            model: response.model.clone(),
            tokens_used: response.usage.map(|u| u.total_tokens),
        })
    }
}
