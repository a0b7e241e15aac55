//! Chat endpoints.
//!
//! - `GET /api/chat/history`: stored conversation, oldest first
//! - `POST /api/chat/send`: store the user message, answer with the AI
//!   assistant or the symptom predictor, store the reply
//!
//! Both engines always resolve to displayable text, so a failing
//! backend still produces a stored model message.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::api::types::ApiContext;
use crate::models::enums::ChatRole;
use crate::models::ChatMessage;
use crate::symptoms;

/// Maximum message length accepted from the client.
const MAX_MESSAGE_CHARS: usize = 2000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatEngine {
    #[default]
    Ai,
    Symptom,
}

#[derive(Deserialize)]
pub struct ChatSendRequest {
    pub message: String,
    #[serde(default)]
    pub engine: ChatEngine,
}

#[derive(Serialize)]
pub struct ChatSendResponse {
    pub user: ChatMessage,
    pub reply: ChatMessage,
}

/// `GET /api/chat/history`
pub async fn history(State(ctx): State<ApiContext>) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    Ok(Json(ctx.store.chat_history()?))
}

/// `POST /api/chat/send`
pub async fn send(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<ChatSendRequest>,
) -> Result<Json<ChatSendResponse>, ApiError> {
    let message = req.message.trim().to_string();
    if message.is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".into()));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Message too long (max {MAX_MESSAGE_CHARS} chars)"
        )));
    }

    // Context is the conversation before this message.
    let history = ctx.store.chat_history()?;
    let user = ChatMessage::new(ChatRole::User, message.clone());
    ctx.store.add_chat_message(user.clone())?;

    let text = match req.engine {
        ChatEngine::Ai => {
            let assistant = ctx.assistant.clone();
            tokio::task::spawn_blocking(move || assistant.chat_reply(&history, &message)).await?
        }
        ChatEngine::Symptom => {
            let predictor = ctx.symptoms.clone();
            tokio::task::spawn_blocking(move || {
                symptoms::predict_reply(predictor.as_ref(), &message)
            })
            .await?
        }
    };

    let reply = ChatMessage::new(ChatRole::Model, text);
    ctx.store.add_chat_message(reply.clone())?;
    tracing::debug!(engine = ?req.engine, "Chat reply stored");

    Ok(Json(ChatSendResponse { user, reply }))
}
