//! Event handler: turns Telegram updates into clock transitions, sheet
//! writes and chat replies. Owns the session state.

use super::clock::{Clock, ClockState, SystemTime, TimeSource};
use crate::config::Messages;
use crate::errors::{AppResult, ClockError};
use crate::models::action::ClockAction;
use crate::sheets::SheetBackend;
use crate::telegram::{CallbackQuery, ChatApi, InlineKeyboardMarkup, Message, Update};
use crate::utils::time::{date_cell, format_hours, format_minutes, month_sheet_name, time_cell};
use chrono_tz::Tz;

/// Columns of a work record
const COL_DATE: usize = 1;
const COL_END: usize = 3;

/// Text and keyboard to show after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

pub struct EventHandler<S, C, T = SystemTime> {
    clock: Clock,
    sheets: S,
    chat: C,
    time: T,
    tz: Tz,
    messages: Messages,
}

impl<S: SheetBackend, C: ChatApi> EventHandler<S, C, SystemTime> {
    pub fn new(sheets: S, chat: C, tz: Tz, messages: Messages) -> Self {
        Self::with_time_source(sheets, chat, SystemTime, tz, messages)
    }
}

impl<S: SheetBackend, C: ChatApi, T: TimeSource> EventHandler<S, C, T> {
    pub fn with_time_source(sheets: S, chat: C, time: T, tz: Tz, messages: Messages) -> Self {
        Self {
            clock: Clock::new(),
            sheets,
            chat,
            time,
            tz,
            messages,
        }
    }

    pub fn state(&self) -> ClockState {
        self.clock.state()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn sheets(&self) -> &S {
        &self.sheets
    }

    pub fn chat(&self) -> &C {
        &self.chat
    }

    pub fn clock_in_keyboard(&self) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::single(&self.messages.clock_in_button, ClockAction::In)
    }

    pub fn clock_out_keyboard(&self) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::single(&self.messages.clock_out_button, ClockAction::Out)
    }

    pub async fn handle_update(&mut self, update: &Update) -> AppResult<()> {
        if let Some(query) = &update.callback_query {
            return self.handle_callback(query).await;
        }

        match &update.message {
            Some(msg) if msg.is_command("start") => self.handle_start(msg).await,
            Some(_) => {
                tracing::debug!(update_id = update.update_id, "message ignored");
                Ok(())
            }
            None => {
                tracing::debug!(update_id = update.update_id, "update without message or callback");
                Ok(())
            }
        }
    }

    async fn handle_start(&self, msg: &Message) -> AppResult<()> {
        let keyboard = self.clock_in_keyboard();
        self.chat
            .send_message(msg.chat.id, &self.messages.start_prompt, Some(&keyboard))
            .await
    }

    async fn handle_callback(&mut self, query: &CallbackQuery) -> AppResult<()> {
        self.chat.answer_callback_query(&query.id).await?;

        let Some(action) = query.data.as_deref().and_then(ClockAction::from_callback_data) else {
            tracing::debug!(data = ?query.data, "unknown callback data");
            return Ok(());
        };

        let reply = self.apply(action).await?;

        match &query.message {
            Some(m) => {
                self.chat
                    .edit_message_text(m.chat.id, m.message_id, &reply.text, reply.keyboard.as_ref())
                    .await
            }
            None => {
                tracing::warn!(callback = %query.id, "callback without message, reply dropped");
                Ok(())
            }
        }
    }

    pub async fn apply(&mut self, action: ClockAction) -> AppResult<Reply> {
        match action {
            ClockAction::In => self.clock_in().await,
            ClockAction::Out => self.clock_out().await,
        }
    }

    /// IDLE → CLOCKED_IN: append a row with date and start time.
    pub async fn clock_in(&mut self) -> AppResult<Reply> {
        let now = self.time.now(self.tz);
        let start = self.clock.clock_in(now).start_time.clone();
        let sheet = month_sheet_name(&start);

        self.sheets.ensure_worksheet(&sheet).await?;
        let row = self.sheets.row_count(&sheet).await? + 1;
        self.sheets
            .write_cells(&sheet, row, COL_DATE, &[date_cell(&start), time_cell(&start)])
            .await?;

        tracing::info!(worksheet = %sheet, row, start = %start.to_rfc3339(), "clocked in");

        Ok(Reply {
            text: self.messages.render_clock_in(&time_cell(&start)),
            keyboard: Some(self.clock_out_keyboard()),
        })
    }

    /// CLOCKED_IN → IDLE: fill end time and hours on the last row.
    /// Without an open session only the error text is returned.
    pub async fn clock_out(&mut self) -> AppResult<Reply> {
        let now = self.time.now(self.tz);
        let closed = match self.clock.closing(now) {
            Ok(c) => c,
            Err(ClockError::NotClockedIn) => {
                tracing::warn!("clock-out without clock-in");
                return Ok(Reply {
                    text: self.messages.not_clocked_in.clone(),
                    keyboard: None,
                });
            }
        };

        let sheet = month_sheet_name(&closed.start_time);
        self.sheets.ensure_worksheet(&sheet).await?;
        let row = self.sheets.row_count(&sheet).await?.max(1);
        let hours = closed.hours();
        self.sheets
            .write_cells(
                &sheet,
                row,
                COL_END,
                &[time_cell(&closed.end_time), format_hours(hours)],
            )
            .await?;

        self.clock.reset();

        tracing::info!(
            worksheet = %sheet,
            row,
            worked = %format_minutes(closed.minutes()),
            hours,
            "clocked out"
        );

        Ok(Reply {
            text: self.messages.render_clock_out(
                &time_cell(&closed.start_time),
                &time_cell(&closed.end_time),
                hours,
            ),
            keyboard: Some(self.clock_in_keyboard()),
        })
    }
}
