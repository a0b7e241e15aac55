use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{AiError, ChatTurn, LlmClient};

/// Ollama HTTP client for local LLM inference.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Create a client pointing at an Ollama instance.
    pub fn new(base_url: &str, timeout: Duration, connect_timeout: Duration) -> Result<Self, AiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| AiError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs: timeout.as_secs(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> AiError {
        if e.is_connect() {
            AiError::OllamaConnection(self.base_url.clone())
        } else if e.is_timeout() {
            AiError::Timeout(self.timeout_secs)
        } else {
            AiError::HttpClient(e.to_string())
        }
    }

    fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, AiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AiError::OllamaError {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .map_err(|e| AiError::ResponseParsing(e.to_string()))
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Request body for Ollama /api/chat
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatRequestMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatRequestMessage<'a> {
    role: &'static str,
    content: &'a str,
    #[serde(skip_serializing_if = "no_images")]
    images: &'a [String],
}

fn no_images(images: &&[String]) -> bool {
    images.is_empty()
}

/// Response body from Ollama /api/chat
#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Response body from Ollama /api/tags
#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<TagsModel>,
}

#[derive(Deserialize)]
struct TagsModel {
    name: String,
}

fn chat_messages<'a>(system: &'a str, turns: &'a [ChatTurn]) -> Vec<ChatRequestMessage<'a>> {
    let mut messages = Vec::with_capacity(turns.len() + 1);
    if !system.is_empty() {
        messages.push(ChatRequestMessage {
            role: "system",
            content: system,
            images: &[],
        });
    }
    messages.extend(turns.iter().map(|turn| ChatRequestMessage {
        role: match turn.role {
            crate::models::enums::ChatRole::User => "user",
            crate::models::enums::ChatRole::Model => "assistant",
        },
        content: &turn.content,
        images: &turn.images,
    }));
    messages
}

impl LlmClient for OllamaClient {
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, AiError> {
        let body = GenerateRequest {
            model,
            prompt,
            system,
            stream: false,
        };
        let parsed: GenerateResponse = self.post_json("/api/generate", &body)?;
        Ok(parsed.response)
    }

    fn chat(&self, model: &str, system: &str, turns: &[ChatTurn]) -> Result<String, AiError> {
        let body = ChatRequest {
            model,
            messages: chat_messages(system, turns),
            stream: false,
        };
        let parsed: ChatResponse = self.post_json("/api/chat", &body)?;
        Ok(parsed.message.content)
    }

    fn list_models(&self) -> Result<Vec<String>, AiError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AiError::OllamaError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TagsResponse = response
            .json()
            .map_err(|e| AiError::ResponseParsing(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }
}

/// Mock LLM client for testing. Replies are served in order; the last one
/// repeats. Prompts are recorded for inspection.
pub struct MockLlmClient {
    replies: Vec<Result<String, u16>>,
    calls: Mutex<Vec<String>>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            replies: vec![Ok(response.to_string())],
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Serve several replies, one per call.
    pub fn sequence(responses: &[&str]) -> Self {
        Self {
            replies: responses.iter().map(|r| Ok(r.to_string())).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with an Ollama error of the given status.
    pub fn failing(status: u16) -> Self {
        Self {
            replies: vec![Err(status)],
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Prompts (or last chat turn) received so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn next_reply(&self, prompt: &str) -> Result<String, AiError> {
        let index = match self.calls.lock() {
            Ok(mut calls) => {
                calls.push(prompt.to_string());
                calls.len() - 1
            }
            Err(_) => 0,
        };
        let reply = self
            .replies
            .get(index)
            .or_else(|| self.replies.last())
            .cloned()
            .unwrap_or(Err(500));
        reply.map_err(|status| AiError::OllamaError {
            status,
            body: "mock failure".into(),
        })
    }
}

impl LlmClient for MockLlmClient {
    fn generate(&self, _model: &str, prompt: &str, _system: &str) -> Result<String, AiError> {
        self.next_reply(prompt)
    }

    fn chat(&self, _model: &str, _system: &str, turns: &[ChatTurn]) -> Result<String, AiError> {
        let last = turns.last().map(|t| t.content.as_str()).unwrap_or_default();
        self.next_reply(last)
    }

    fn list_models(&self) -> Result<Vec<String>, AiError> {
        Ok(vec!["medgemma:latest".to_string()])
    }
}
