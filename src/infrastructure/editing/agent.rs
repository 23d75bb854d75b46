//! Chat-completion agent, one per editing role

use serde::{Deserialize, Serialize};

use crate::application::ports::EditorError;

use super::prompts;

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// A role-specific wrapper around the remote chat-completion call.
///
/// Holds a fixed system prompt and a user-prompt template; processing
/// interpolates the input into the template, posts the chat request, and
/// returns the first choice's message text. Parsing that text into the
/// role's expected shape is the caller's concern.
#[derive(Clone)]
pub struct ChatAgent {
    endpoint: String,
    api_key: String,
    model: String,
    prompt_template: &'static str,
    client: reqwest::Client,
}

impl ChatAgent {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        prompt_template: &'static str,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            prompt_template,
            client: reqwest::Client::new(),
        }
    }

    fn build_request(&self, input: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompts::SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompts::render(self.prompt_template, input),
                },
            ],
        }
    }

    /// Send one chat-completion call. No retry at this layer;
    /// a single failure surfaces immediately.
    pub async fn process(&self, input: &str) -> Result<String, EditorError> {
        let body = self.build_request(input);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EditorError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EditorError::NonOkStatus {
                code: status.as_u16(),
                body,
            });
        }

        let envelope: ChatResponse = response
            .json()
            .await
            .map_err(|e| EditorError::Decode(e.to_string()))?;

        let choice = envelope
            .choices
            .into_iter()
            .next()
            .ok_or(EditorError::EmptyChoices)?;

        Ok(choice.message.content)
    }
}
