use std::time::Duration;

use async_trait::async_trait;
use derive_more::Display;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Debug, Display)]
#[display(fmt = "completion failed: {}", reason)]
pub struct CompletionFailure {
    pub reason: String,
}

impl std::error::Error for CompletionFailure {}

impl CompletionFailure {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Remote text generation.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Returns the generated text. An empty string means the service answered
    /// without content.
    async fn complete(&self, system_prompt: &str, user_query: &str)
    -> Result<String, CompletionFailure>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// OpenAI chat-completions client.
pub struct OpenAiClient {
    client: Client,
    url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(
        url: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_query: &str,
    ) -> Result<String, CompletionFailure> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_query,
                },
            ],
        };

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Exception calling OpenAI");
                CompletionFailure::new(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            error!(%status, "OpenAI API error");
            if let Ok(message) = response.text().await {
                error!("Error message from OpenAI: {}", message);
            }
            return Err(CompletionFailure::new(format!("status {status}")));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Undecodable OpenAI response");
            CompletionFailure::new(e.to_string())
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionFailure::new("response had no choices"))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> OpenAiClient {
        OpenAiClient::new(
            server.url("/v1/chat/completions"),
            "sk-test".to_string(),
            "gpt-4-turbo".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[actix_web::test]
    async fn returns_first_choice_content() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("Authorization", "Bearer sk-test")
                    .json_body_partial(
                        r#"{"model":"gpt-4-turbo","messages":[{"role":"system","content":"be nice"},{"role":"user","content":"When do you open?"}]}"#,
                    );
                then.status(200).json_body(json!({
                    "choices": [{ "message": { "role": "assistant", "content": "We open at 9am." } }]
                }));
            })
            .await;

        let answer = client_for(&server)
            .complete("be nice", "When do you open?")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(answer, "We open at 9am.");
    }

    #[actix_web::test]
    async fn null_content_is_empty_text() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!({
                    "choices": [{ "message": { "role": "assistant", "content": null } }]
                }));
            })
            .await;

        let answer = client_for(&server).complete("sys", "q").await.unwrap();
        assert_eq!(answer, "");
    }

    #[actix_web::test]
    async fn non_success_status_is_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(429).body("rate limited");
            })
            .await;

        let result = client_for(&server).complete("sys", "q").await;
        assert!(result.is_err());
    }

    #[actix_web::test]
    async fn malformed_body_is_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).body("not json");
            })
            .await;

        assert!(client_for(&server).complete("sys", "q").await.is_err());
    }

    #[actix_web::test]
    async fn unreachable_host_is_failure() {
        let client = OpenAiClient::new(
            "http://127.0.0.1:9/v1/chat/completions".to_string(),
            "sk-test".to_string(),
            "gpt-4-turbo".to_string(),
            Duration::from_secs(2),
        )
        .unwrap();

        assert!(client.complete("sys", "q").await.is_err());
    }
}
