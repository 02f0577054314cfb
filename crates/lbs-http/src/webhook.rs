use std::fmt;
use std::time::Duration;

use lbs_board::{MessageBatch, Panel};
use lbs_reconcile::{DeleteOutcome, MessageChannel, MessageId, PublishError, PublishOp};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error_body, USER_AGENT};

pub const DEFAULT_USERNAME: &str = "AoC Leaderboard Bot";
pub const DEFAULT_AVATAR_URL: &str = "https://adventofcode.com/favicon.png";

/// Name and avatar the webhook posts under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookIdentity {
    pub username: String,
    pub avatar_url: Option<String>,
}

impl Default for WebhookIdentity {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            avatar_url: Some(DEFAULT_AVATAR_URL.to_string()),
        }
    }
}

impl WebhookIdentity {
    /// Defaults with any configured override applied.
    pub fn with_overrides(username: Option<String>, avatar_url: Option<String>) -> Self {
        let base = Self::default();
        Self {
            username: username.unwrap_or(base.username),
            avatar_url: avatar_url.or(base.avatar_url),
        }
    }
}

#[derive(Serialize)]
struct WebhookBody<'a> {
    embeds: &'a [Panel],
    username: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar_url: Option<&'a str>,
}

#[derive(Deserialize)]
struct CreatedMessage {
    id: serde_json::Value,
}

/// Webhook-backed [`MessageChannel`].
///
/// `webhook_url` is the full `https://.../webhooks/<id>/<token>` URL; it holds
/// the token and is redacted from `Debug`.
#[derive(Clone)]
pub struct WebhookChannel {
    http: reqwest::Client,
    webhook_url: String,
    identity: WebhookIdentity,
}

impl fmt::Debug for WebhookChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookChannel")
            .field("webhook_url", &"<REDACTED>")
            .field("identity", &self.identity)
            .finish()
    }
}

impl WebhookChannel {
    pub fn new(
        webhook_url: impl Into<String>,
        identity: WebhookIdentity,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        let webhook_url = webhook_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            webhook_url,
            identity,
        })
    }

    pub fn identity(&self) -> &WebhookIdentity {
        &self.identity
    }

    fn message_url(&self, id: &MessageId) -> String {
        format!("{}/messages/{}", self.webhook_url, id)
    }

    fn body<'a>(&'a self, batch: &'a MessageBatch) -> WebhookBody<'a> {
        WebhookBody {
            embeds: batch.panels(),
            username: &self.identity.username,
            avatar_url: self.identity.avatar_url.as_deref(),
        }
    }
}

// reqwest errors carry the request URL, and the URL carries the token.
fn transport(op: PublishOp) -> impl FnOnce(reqwest::Error) -> PublishError {
    move |e| PublishError::Transport {
        op,
        message: e.without_url().to_string(),
    }
}

async fn status_error(op: PublishOp, resp: reqwest::Response) -> PublishError {
    PublishError::Status {
        op,
        status: resp.status().as_u16(),
        body: error_body(resp).await,
    }
}

#[async_trait::async_trait]
impl MessageChannel for WebhookChannel {
    async fn create_message(&self, batch: &MessageBatch) -> Result<MessageId, PublishError> {
        let op = PublishOp::Create;
        let resp = self
            .http
            .post(&self.webhook_url)
            .query(&[("wait", "true")])
            .json(&self.body(batch))
            .send()
            .await
            .map_err(transport(op))?;

        if !resp.status().is_success() {
            return Err(status_error(op, resp).await);
        }

        let created: CreatedMessage = resp.json().await.map_err(|e| PublishError::Decode {
            op,
            message: e.without_url().to_string(),
        })?;
        let id = match created.id {
            serde_json::Value::String(s) if !s.is_empty() => s,
            serde_json::Value::Number(n) => n.to_string(),
            other => {
                return Err(PublishError::Decode {
                    op,
                    message: format!("unusable message id in response: {other}"),
                })
            }
        };
        debug!(message_id = %id, panels = batch.len(), "message created");
        Ok(MessageId::new(id))
    }

    async fn update_message(
        &self,
        id: &MessageId,
        batch: &MessageBatch,
    ) -> Result<(), PublishError> {
        let op = PublishOp::Update;
        let resp = self
            .http
            .patch(self.message_url(id))
            .json(&self.body(batch))
            .send()
            .await
            .map_err(transport(op))?;

        match resp.status() {
            s if s.is_success() => {
                debug!(message_id = %id, panels = batch.len(), "message updated");
                Ok(())
            }
            StatusCode::NOT_FOUND => Err(PublishError::NotFound { op, id: id.clone() }),
            _ => Err(status_error(op, resp).await),
        }
    }

    async fn delete_message(&self, id: &MessageId) -> Result<DeleteOutcome, PublishError> {
        let op = PublishOp::Delete;
        let resp = self
            .http
            .delete(self.message_url(id))
            .send()
            .await
            .map_err(transport(op))?;

        match resp.status() {
            s if s.is_success() => Ok(DeleteOutcome::Deleted),
            StatusCode::NOT_FOUND => Ok(DeleteOutcome::AlreadyGone),
            _ => Err(status_error(op, resp).await),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use httpmock::prelude::*;
    use lbs_board::{render, BatchLimits, LeaderboardPayload, PageLayout, RawMember};
    use serde_json::json;

    const HOOK_PATH: &str = "/api/webhooks/111/tok";

    fn channel(server: &MockServer) -> WebhookChannel {
        WebhookChannel::new(
            server.url(HOOK_PATH),
            WebhookIdentity::default(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn one_batch() -> MessageBatch {
        let payload = LeaderboardPayload::new(vec![RawMember::new(1, Some("ada"), 10, 2)]);
        let at = Utc.with_ymd_and_hms(2024, 12, 1, 5, 0, 0).unwrap();
        let mut batches = render(&payload, &PageLayout::default(), &BatchLimits::default(), at);
        assert_eq!(batches.len(), 1);
        batches.remove(0)
    }

    #[tokio::test]
    async fn create_posts_embeds_with_identity_and_returns_id() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(HOOK_PATH)
                    .query_param("wait", "true")
                    .json_body_partial(
                        r#"{"username": "AoC Leaderboard Bot",
                            "avatar_url": "https://adventofcode.com/favicon.png"}"#,
                    );
                then.status(200).json_body(json!({"id": "998877", "type": 0}));
            })
            .await;

        let id = channel(&server).create_message(&one_batch()).await.unwrap();
        mock.assert_async().await;
        assert_eq!(id, MessageId::new("998877"));
    }

    #[tokio::test]
    async fn create_body_carries_one_embed_per_panel() {
        let batch = one_batch();
        let server = MockServer::start_async().await;
        let expected = serde_json::to_value(batch.panels()).unwrap();
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(HOOK_PATH)
                    .json_body_partial(json!({ "embeds": expected }).to_string());
                then.status(200).json_body(json!({"id": "1"}));
            })
            .await;

        channel(&server).create_message(&batch).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_without_id_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(HOOK_PATH);
                then.status(200).json_body(json!({"id": null}));
            })
            .await;

        let err = channel(&server)
            .create_message(&one_batch())
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::Decode { op: PublishOp::Create, .. }));
    }

    #[tokio::test]
    async fn update_patches_message_and_maps_404_to_not_found() {
        let server = MockServer::start_async().await;
        let ok = server
            .mock_async(|when, then| {
                when.method(httpmock::Method::PATCH).path(format!("{HOOK_PATH}/messages/5"));
                then.status(200).json_body(json!({"id": "5"}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(httpmock::Method::PATCH).path(format!("{HOOK_PATH}/messages/6"));
                then.status(404).json_body(json!({"message": "Unknown Message", "code": 10008}));
            })
            .await;

        let ch = channel(&server);
        let batch = one_batch();
        ch.update_message(&MessageId::new("5"), &batch).await.unwrap();
        ok.assert_async().await;

        let err = ch
            .update_message(&MessageId::new("6"), &batch)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            PublishError::NotFound {
                op: PublishOp::Update,
                id: MessageId::new("6")
            }
        );
    }

    #[tokio::test]
    async fn delete_treats_404_as_already_gone() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path(format!("{HOOK_PATH}/messages/1"));
                then.status(204);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path(format!("{HOOK_PATH}/messages/2"));
                then.status(404);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path(format!("{HOOK_PATH}/messages/3"));
                then.status(429).body("slow down");
            })
            .await;

        let ch = channel(&server);
        assert_eq!(
            ch.delete_message(&MessageId::new("1")).await.unwrap(),
            DeleteOutcome::Deleted
        );
        assert_eq!(
            ch.delete_message(&MessageId::new("2")).await.unwrap(),
            DeleteOutcome::AlreadyGone
        );
        assert_eq!(
            ch.delete_message(&MessageId::new("3")).await.unwrap_err(),
            PublishError::Status {
                op: PublishOp::Delete,
                status: 429,
                body: "slow down".to_string()
            }
        );
    }

    #[tokio::test]
    async fn transport_errors_do_not_carry_the_token() {
        let ch = WebhookChannel::new(
            "http://127.0.0.1:1/api/webhooks/1/very-secret-token",
            WebhookIdentity::default(),
            Duration::from_secs(5),
        )
        .unwrap();

        let errors = [
            ch.create_message(&one_batch()).await.unwrap_err(),
            ch.update_message(&MessageId::new("5"), &one_batch())
                .await
                .unwrap_err(),
            ch.delete_message(&MessageId::new("5")).await.unwrap_err(),
        ];
        for err in errors {
            assert!(matches!(err, PublishError::Transport { .. }), "{err}");
            assert!(!err.to_string().contains("very-secret-token"), "{err}");
            assert!(!format!("{err:?}").contains("very-secret-token"));
        }
    }

    #[tokio::test]
    async fn undecodable_create_response_does_not_carry_the_token() {
        let server = MockServer::start_async().await;
        let path = "/api/webhooks/111/very-secret-token";
        server
            .mock_async(|when, then| {
                when.method(POST).path(path);
                then.status(200).body("<html>not json</html>");
            })
            .await;

        let ch = WebhookChannel::new(
            server.url(path),
            WebhookIdentity::default(),
            Duration::from_secs(5),
        )
        .unwrap();
        let err = ch.create_message(&one_batch()).await.unwrap_err();
        assert!(matches!(err, PublishError::Decode { .. }), "{err}");
        assert!(!err.to_string().contains("very-secret-token"), "{err}");
    }

    #[test]
    fn debug_redacts_webhook_token() {
        let ch = WebhookChannel::new(
            "https://discord.com/api/webhooks/1/secret-token/",
            WebhookIdentity::default(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert!(!format!("{ch:?}").contains("secret-token"));
        assert_eq!(
            ch.message_url(&MessageId::new("9")),
            "https://discord.com/api/webhooks/1/secret-token/messages/9"
        );
    }
}
