//! Counselor chat endpoints: session management, messaging, history.

use std::sync::Arc;

use validator::Validate;

use client_core::ApiError;

use crate::dtos::chat::{ChatMessage, ChatReply, ChatSession, RenameSessionRequest, SendMessageRequest};
use crate::dtos::Envelope;
use crate::services::api_client::ApiClient;

#[derive(Clone)]
pub struct ChatService {
    api: Arc<ApiClient>,
}

impl ChatService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn sessions(&self) -> Result<Vec<ChatSession>, ApiError> {
        let reply: Envelope<Vec<ChatSession>> = self.api.get("/chat/sessions/").await?;
        reply.into_data()
    }

    pub async fn create_session(&self) -> Result<ChatSession, ApiError> {
        let reply: Envelope<ChatSession> = self.api.post_empty("/chat/sessions/").await?;
        reply.into_data()
    }

    pub async fn rename_session(&self, id: &str, title: &str) -> Result<ChatSession, ApiError> {
        let request = RenameSessionRequest {
            title: title.to_string(),
        };
        request.validate()?;

        let reply: Envelope<ChatSession> = self
            .api
            .put(&format!("/chat/sessions/{id}/"), &request)
            .await?;
        reply.into_data()
    }

    pub async fn delete_session(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete(&format!("/chat/sessions/{id}/")).await
    }

    /// Send a message and wait for the counselor's reply (response text
    /// plus suggested follow-up actions).
    pub async fn send(&self, session_id: &str, message: &str) -> Result<ChatReply, ApiError> {
        let request = SendMessageRequest {
            message: message.to_string(),
            session_id: session_id.to_string(),
        };
        request.validate()?;

        let reply: Envelope<ChatReply> = self.api.post("/chat/", &request).await?;
        reply.into_data()
    }

    pub async fn history(&self, session_id: &str) -> Result<Vec<ChatMessage>, ApiError> {
        let reply: Envelope<Vec<ChatMessage>> = self
            .api
            .get(&format!("/chat/sessions/{session_id}/messages/"))
            .await?;
        reply.into_data()
    }
}
