use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::conversations::{ConversationMetadata, Message};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unauthorized")]
    Unauthorized,
    #[error("backend returned status {0}")]
    Status(u16),
    #[error("{0}")]
    Api(String),
    #[error("token request failed: {0}")]
    Token(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Response envelope used by every backend endpoint. `ok` also travels on the
/// wire but nothing reads it; a missing `result` means "no payload".
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Envelope<T> {
    #[serde(default)]
    result: Option<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvokeRequest {
    pub user_query: String,
    pub provider: String,
    pub model: String,
    pub temperature: f64,
    // serialized as an explicit null for a fresh thread
    pub thread_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InvokeReply {
    pub response: String,
    #[serde(default)]
    pub thread_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    conversation_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct DeleteAck {
    #[serde(default)]
    deleted: bool,
}

/// Client for the conversation-storage and invocation services. Every call
/// carries a fresh bearer token; on wasm the browser's credentials ride along
/// with the request.
#[derive(Clone)]
pub struct ChatApi {
    client: reqwest::Client,
    base_url: String,
}

impl ChatApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        ChatApi {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub async fn fetch_conversations(
        &self,
        token: &str,
    ) -> Result<Vec<ConversationMetadata>, ApiError> {
        let response = self
            .request(Method::GET, "/conversation/fetch", token)
            .send()
            .await?;
        let listed = parse::<Vec<ConversationMetadata>>(response).await?;
        Ok(listed.unwrap_or_default())
    }

    pub async fn fetch_thread(
        &self,
        token: &str,
        thread_id: &str,
    ) -> Result<Vec<Message>, ApiError> {
        let response = self
            .request(Method::GET, &thread_path(thread_id), token)
            .send()
            .await?;
        let messages = parse::<Vec<Message>>(response).await?;
        Ok(messages.unwrap_or_default())
    }

    pub async fn delete_conversation(&self, token: &str, thread_id: &str) -> Result<(), ApiError> {
        let response = self
            .request(Method::DELETE, "/conversation/delete", token)
            .json(&DeleteRequest {
                conversation_id: thread_id,
            })
            .send()
            .await?;
        confirm_deleted(parse(response).await?)
    }

    pub async fn invoke(&self, token: &str, request: &InvokeRequest) -> Result<InvokeReply, ApiError> {
        let response = self
            .request(Method::POST, "/invoke/", token)
            .json(request)
            .send()
            .await?;
        parse(response)
            .await?
            .ok_or_else(|| ApiError::Api("invoke returned no result".to_string()))
    }

    fn request(&self, method: Method, path: &str, token: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, self.endpoint(path))
            .bearer_auth(token);
        #[cfg(target_arch = "wasm32")]
        let builder = builder.fetch_credentials_include();
        builder
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn thread_path(thread_id: &str) -> String {
    format!("/conversation/fetch/{}", urlencoding::encode(thread_id))
}

async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<Option<T>, ApiError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    if !status.is_success() {
        return Err(ApiError::Status(status.as_u16()));
    }
    let envelope: Envelope<T> = response.json().await?;
    Ok(envelope.result)
}

/// A delete without a truthy `deleted` flag did not delete anything, whatever
/// the status code said.
fn confirm_deleted(ack: Option<DeleteAck>) -> Result<(), ApiError> {
    match ack {
        Some(DeleteAck { deleted: true }) => Ok(()),
        _ => Err(ApiError::Api("conversation was not deleted".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_joins_without_duplicate_slashes() {
        let api = ChatApi::new("http://127.0.0.1:8000/");
        assert_eq!(
            api.endpoint("/conversation/fetch"),
            "http://127.0.0.1:8000/conversation/fetch"
        );

        let api = ChatApi::new("http://127.0.0.1:8000");
        assert_eq!(api.endpoint("/invoke/"), "http://127.0.0.1:8000/invoke/");
    }

    #[test]
    fn thread_path_escapes_the_id() {
        assert_eq!(
            thread_path("user-7--trip planning"),
            "/conversation/fetch/user-7--trip%20planning"
        );
        assert_eq!(
            thread_path("a/b"),
            "/conversation/fetch/a%2Fb"
        );
    }

    #[test]
    fn invoke_request_matches_the_wire_shape() {
        let request = InvokeRequest {
            user_query: "hi".to_string(),
            provider: "gemini".to_string(),
            model: "gemini-2.0-flash".to_string(),
            temperature: 0.3,
            thread_id: None,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "user_query": "hi",
                "provider": "gemini",
                "model": "gemini-2.0-flash",
                "temperature": 0.3,
                "thread_id": null,
            })
        );
    }

    #[test]
    fn envelope_payload_is_optional() {
        let full: Envelope<Vec<ConversationMetadata>> = serde_json::from_str(
            r#"{"ok": true, "result": [{"date": "2025-06-01T12:00:00", "thread_id": "t1", "title": "Trip"}]}"#,
        )
        .unwrap();
        let listed = full.result.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Trip");

        let empty: Envelope<Vec<ConversationMetadata>> =
            serde_json::from_str(r#"{"ok": true}"#).unwrap();
        assert!(empty.result.is_none());
    }

    #[test]
    fn invoke_reply_thread_id_is_optional() {
        let with_thread: Envelope<InvokeReply> = serde_json::from_str(
            r#"{"ok": true, "result": {"response": "hello", "thread_id": "user-1--hi"}}"#,
        )
        .unwrap();
        assert_eq!(
            with_thread.result.unwrap().thread_id.as_deref(),
            Some("user-1--hi")
        );

        let without: Envelope<InvokeReply> =
            serde_json::from_str(r#"{"ok": true, "result": {"response": "hello"}}"#).unwrap();
        assert_eq!(without.result.unwrap().thread_id, None);
    }

    #[test]
    fn deletion_needs_a_truthy_flag() {
        assert!(confirm_deleted(Some(DeleteAck { deleted: true })).is_ok());

        let refused = confirm_deleted(Some(DeleteAck { deleted: false }));
        assert!(matches!(refused, Err(ApiError::Api(_))));

        let missing = confirm_deleted(None);
        assert!(matches!(missing, Err(ApiError::Api(_))));
    }

    #[test]
    fn unauthorized_is_distinguished() {
        assert!(ApiError::Unauthorized.is_unauthorized());
        assert!(!ApiError::Api("nope".to_string()).is_unauthorized());
        assert!(!ApiError::Status(500).is_unauthorized());
    }
}
