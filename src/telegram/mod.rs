//! Telegram Bot API: wire types, the `ChatApi` seam used by the handler,
//! and the HTTP client implementing it.

pub mod client;
pub mod types;

pub use client::TelegramClient;
pub use types::{CallbackQuery, InlineKeyboardMarkup, Message, Update};

use crate::errors::AppResult;
use std::future::Future;

/// Outbound chat operations the bot needs.
pub trait ChatApi: Send + Sync {
    fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> impl Future<Output = AppResult<()>> + Send;

    fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> impl Future<Output = AppResult<()>> + Send;

    fn answer_callback_query(&self, callback_id: &str) -> impl Future<Output = AppResult<()>> + Send;
}
