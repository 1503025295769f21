//! Telegram Bot API channel.
//!
//! Long polling via `getUpdates`, replies via `sendMessage`, removal via `deleteMessage`.

use crate::domain::model::{InboundEvent, IncomingMessage, OutgoingMessage};
use crate::domain::ports::Channel;
use crate::utils::error::{FlightsError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info};

#[derive(Debug, Deserialize)]
struct TgResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TgUpdate {
    update_id: i64,
    message: Option<TgMessage>,
}

#[derive(Debug, Deserialize)]
struct TgMessage {
    from: Option<TgUser>,
    chat: TgChat,
    text: Option<String>,
    #[serde(default)]
    new_chat_members: Vec<TgUser>,
}

#[derive(Debug, Deserialize)]
struct TgSentMessage {
    message_id: i64,
}

#[derive(Debug, Deserialize)]
struct TgUser {
    first_name: String,
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TgChat {
    id: i64,
}

pub struct TelegramChannel {
    client: reqwest::Client,
    base_url: String,
    poll_timeout: Duration,
    /// 最後處理的 update_id，避免重複處理
    last_update_id: Arc<Mutex<Option<i64>>>,
}

impl TelegramChannel {
    pub fn new(client: reqwest::Client, api_base: &str, token: &str, poll_timeout: Duration) -> Self {
        Self {
            client,
            base_url: format!("{}/bot{}", api_base.trim_end_matches('/'), token),
            poll_timeout,
            last_update_id: Arc::new(Mutex::new(None)),
        }
    }

    /// POST 一個 Bot API 方法，非 2xx 或 `ok: false` 都算通道錯誤
    async fn call<T: DeserializeOwned>(&self, method: &str, body: &serde_json::Value) -> Result<T> {
        let url = format!("{}/{}", self.base_url, method);

        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| FlightsError::Channel {
                message: format!("telegram {method} failed: {}", e.without_url()),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            return Err(FlightsError::Channel {
                message: format!("telegram {method} failed ({status}): {error_text}"),
            });
        }

        let reply: TgResponse<T> = resp.json().await.map_err(|e| FlightsError::Channel {
            message: format!("telegram {method} returned an unreadable body: {}", e.without_url()),
        })?;

        match reply.result {
            Some(result) if reply.ok => Ok(result),
            _ => Err(FlightsError::Channel {
                message: format!(
                    "telegram {method} rejected: {}",
                    reply.description.unwrap_or_default()
                ),
            }),
        }
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>> {
        let (tx, rx) = mpsc::channel(64);
        let client = self.client.clone();
        let base_url = self.base_url.clone();
        let poll_timeout = self.poll_timeout;
        let last_update_id = self.last_update_id.clone();

        info!("Telegram channel starting long polling...");

        tokio::spawn(async move {
            let mut backoff_secs: u64 = 1;

            loop {
                let offset = last_update_id.lock().await.map(|id| id + 1);

                let mut url = format!("{base_url}/getUpdates?timeout={}", poll_timeout.as_secs());
                if let Some(off) = offset {
                    url.push_str(&format!("&offset={off}"));
                }

                let body = async {
                    let resp = client
                        .get(&url)
                        .timeout(poll_timeout + Duration::from_secs(5))
                        .send()
                        .await?;
                    resp.json::<TgResponse<Vec<TgUpdate>>>().await
                }
                .await;

                let updates = match body {
                    Ok(b) if b.ok => b.result.unwrap_or_default(),
                    Ok(b) => {
                        error!(
                            "telegram API error (retry in {backoff_secs}s): {}",
                            b.description.unwrap_or_default()
                        );
                        tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                    Err(e) => {
                        // URL 內含 token，不寫進日誌
                        let e = e.without_url();
                        error!("telegram poll error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                backoff_secs = 1;

                if let Some(last_update) = updates.last() {
                    *last_update_id.lock().await = Some(last_update.update_id);
                }

                for update in updates {
                    let Some(msg) = update.message else { continue };
                    let event = match msg.text {
                        Some(text) => InboundEvent::Text(text),
                        None if !msg.new_chat_members.is_empty() => InboundEvent::UserJoined,
                        None => {
                            debug!("telegram: skipping non-text message in chat {}", msg.chat.id);
                            continue;
                        }
                    };

                    let sender_name = msg.from.map(|user| match user.username {
                        Some(un) => format!("@{un}"),
                        None => user.first_name,
                    });

                    let incoming = IncomingMessage {
                        chat_id: msg.chat.id,
                        sender_name,
                        event,
                    };

                    if tx.send(incoming).await.is_err() {
                        info!("telegram channel receiver dropped, stopping poll");
                        return;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<i64> {
        let body = serde_json::json!({
            "chat_id": message.chat_id,
            "text": message.text,
            "disable_web_page_preview": !message.link_preview,
        });

        let sent: TgSentMessage = self.call("sendMessage", &body).await?;
        Ok(sent.message_id)
    }

    async fn delete(&self, chat_id: i64, message_id: i64) -> Result<()> {
        let body = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
        });

        // deleteMessage 成功時 result 為 true
        let _: bool = self.call("deleteMessage", &body).await?;
        Ok(())
    }
}
