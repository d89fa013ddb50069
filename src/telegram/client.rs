use super::ChatApi;
use super::types::{ApiResponse, InlineKeyboardMarkup};
use crate::errors::{AppError, AppResult};
use serde::Serialize;
use serde_json::{Value, json};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> AppResult<Self> {
        Self::with_api_base(token, DEFAULT_API_BASE)
    }

    /// Point the client at another Bot API server (self-hosted or test double)
    pub fn with_api_base(token: &str, api_base: &str) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("rtimeclock/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    async fn call<B: Serialize + ?Sized>(&self, method: &str, body: &B) -> AppResult<Value> {
        let resp = self
            .http
            .post(self.method_url(method))
            .json(body)
            .send()
            .await?;
        let status = resp.status();
        let parsed: ApiResponse<Value> = resp.json().await.map_err(|e| {
            AppError::Telegram(format!("{method}: unreadable response ({status}): {e}"))
        })?;

        if !parsed.ok {
            let description = parsed
                .description
                .unwrap_or_else(|| format!("http status {status}"));
            return Err(AppError::Telegram(format!("{method}: {description}")));
        }

        tracing::debug!(method, "telegram call ok");
        Ok(parsed.result.unwrap_or(Value::Null))
    }

    pub async fn set_webhook(&self, url: &str) -> AppResult<()> {
        self.call("setWebhook", &json!({ "url": url })).await?;
        tracing::info!(url, "webhook registered");
        Ok(())
    }

    pub async fn delete_webhook(&self) -> AppResult<()> {
        self.call("deleteWebhook", &json!({})).await?;
        tracing::info!("webhook removed");
        Ok(())
    }
}

fn with_markup(mut body: Value, markup: Option<&InlineKeyboardMarkup>) -> AppResult<Value> {
    if let Some(m) = markup {
        body["reply_markup"] = serde_json::to_value(m)?;
    }
    Ok(body)
}

impl ChatApi for TelegramClient {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> AppResult<()> {
        let body = with_markup(json!({ "chat_id": chat_id, "text": text }), markup)?;
        self.call("sendMessage", &body).await?;
        Ok(())
    }

    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> AppResult<()> {
        let body = with_markup(
            json!({ "chat_id": chat_id, "message_id": message_id, "text": text }),
            markup,
        )?;
        self.call("editMessageText", &body).await?;
        Ok(())
    }

    async fn answer_callback_query(&self, callback_id: &str) -> AppResult<()> {
        self.call(
            "answerCallbackQuery",
            &json!({ "callback_query_id": callback_id }),
        )
        .await?;
        Ok(())
    }
}
