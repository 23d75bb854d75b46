//! AI editor composing the editor and headline agents

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{EditedTranscript, EditorError, TranscriptEditor};
use crate::domain::Headline;

use super::agent::ChatAgent;
use super::prompts;

/// Chat model used by both editing roles
const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Deserialize)]
struct EditorPayload {
    cleaned_transcription: String,
    summary: String,
}

#[derive(Debug, Deserialize)]
struct HeadlinePayload {
    headline: String,
}

/// Remote text-editing client.
///
/// The service returns JSON inside the completion envelope: the first
/// choice's message content must itself parse as the role's expected shape.
/// That inner parse is a separate failure mode from the envelope decode.
#[derive(Clone)]
pub struct AiEditor {
    editor_agent: ChatAgent,
    headline_agent: ChatAgent,
}

impl AiEditor {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        let api_key = api_key.into();
        Self {
            editor_agent: ChatAgent::new(
                endpoint.clone(),
                api_key.clone(),
                DEFAULT_MODEL,
                prompts::EDITOR_PROMPT,
            ),
            headline_agent: ChatAgent::new(endpoint, api_key, DEFAULT_MODEL, prompts::HEADLINE_PROMPT),
        }
    }

    fn parse_payload<T: serde::de::DeserializeOwned>(
        role: &'static str,
        content: &str,
    ) -> Result<T, EditorError> {
        serde_json::from_str(strip_code_fences(content)).map_err(|e| {
            EditorError::MalformedPayload {
                role,
                detail: e.to_string(),
            }
        })
    }
}

/// Completion models sometimes wrap the requested JSON in a Markdown code
/// fence despite the prompt; unwrap it before parsing.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = match inner.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &inner[4..],
        _ => inner,
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[async_trait]
impl TranscriptEditor for AiEditor {
    async fn edit_and_summarize(&self, transcript: &str) -> Result<EditedTranscript, EditorError> {
        let content = self.editor_agent.process(transcript).await?;
        let payload: EditorPayload = Self::parse_payload("editor", &content)?;

        Ok(EditedTranscript {
            cleaned_transcription: payload.cleaned_transcription,
            summary: payload.summary,
        })
    }

    async fn create_headline(&self, summary: &str) -> Result<Headline, EditorError> {
        let content = self.headline_agent.process(summary).await?;
        let payload: HeadlinePayload = Self::parse_payload("headline", &content)?;

        Ok(Headline::parse(&payload.headline)?)
    }
}
