//! Session state holder: the two-state clock-in/clock-out machine.

use crate::errors::ClockError;
use crate::models::session::{ClosedSession, OpenSession};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Idle,
    ClockedIn,
}

#[derive(Debug, Default)]
pub struct Clock {
    open: Option<OpenSession>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ClockState {
        match self.open {
            Some(_) => ClockState::ClockedIn,
            None => ClockState::Idle,
        }
    }

    pub fn open_session(&self) -> Option<&OpenSession> {
        self.open.as_ref()
    }

    /// Start a session at `now`. A session already open is replaced.
    pub fn clock_in(&mut self, now: DateTime<Tz>) -> &OpenSession {
        self.open.insert(OpenSession::new(now))
    }

    /// The session that a clock-out at `now` would close. State is untouched
    /// so a failed write leaves the session open.
    pub fn closing(&self, now: DateTime<Tz>) -> Result<ClosedSession, ClockError> {
        self.open
            .clone()
            .map(|s| s.close(now))
            .ok_or(ClockError::NotClockedIn)
    }

    /// Close the open session and return to idle.
    pub fn clock_out(&mut self, now: DateTime<Tz>) -> Result<ClosedSession, ClockError> {
        let closed = self.closing(now)?;
        self.reset();
        Ok(closed)
    }

    pub fn reset(&mut self) {
        self.open = None;
    }
}

/// Where the handler gets "now" from.
pub trait TimeSource: Send + Sync {
    fn now(&self, tz: Tz) -> DateTime<Tz>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTime;

impl TimeSource for SystemTime {
    fn now(&self, tz: Tz) -> DateTime<Tz> {
        Utc::now().with_timezone(&tz)
    }
}

/// Manually advanced time, for tests and replays.
#[derive(Debug)]
pub struct FixedTime {
    now: Mutex<DateTime<Utc>>,
}

impl FixedTime {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *guard = at;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }
}

impl TimeSource for FixedTime {
    fn now(&self, tz: Tz) -> DateTime<Tz> {
        let guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
        guard.with_timezone(&tz)
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn now(&self, tz: Tz) -> DateTime<Tz> {
        (**self).now(tz)
    }
}
