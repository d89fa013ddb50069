#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
};
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use rtimeclock::config::Messages;
use rtimeclock::core::clock::FixedTime;
use rtimeclock::core::handler::EventHandler;
use rtimeclock::errors::AppResult;
use rtimeclock::sheets::CsvWorkbook;
use rtimeclock::telegram::{ChatApi, InlineKeyboardMarkup};
use serde_json::{Value, json};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub const TZ: Tz = chrono_tz::Asia::Jerusalem;

pub fn rtc() -> Command {
    let mut cmd = cargo_bin_cmd!("rtimeclock");
    for key in [
        "TELEGRAM_TOKEN",
        "WEBHOOK_URL",
        "PORT",
        "GOOGLE_SPREADSHEET_ID",
        "GOOGLE_ACCESS_TOKEN",
    ] {
        cmd.env_remove(key);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Fresh, empty directory under the system temp dir
pub fn temp_dir(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("rtimeclock_{}", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

/// Workbook with the default template already in place
pub fn csv_book(name: &str) -> CsvWorkbook {
    let book = CsvWorkbook::new(temp_dir(name), "Template");
    book.init_template().expect("init template");
    book
}

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatCall {
    Send {
        chat_id: i64,
        text: String,
        markup: Option<InlineKeyboardMarkup>,
    },
    Edit {
        chat_id: i64,
        message_id: i64,
        text: String,
        markup: Option<InlineKeyboardMarkup>,
    },
    Answer(String),
}

/// ChatApi double that records every call
#[derive(Debug, Default)]
pub struct RecordingChat {
    pub calls: Mutex<Vec<ChatCall>>,
}

impl RecordingChat {
    pub fn calls(&self) -> Vec<ChatCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl ChatApi for RecordingChat {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> AppResult<()> {
        self.calls.lock().unwrap().push(ChatCall::Send {
            chat_id,
            text: text.to_string(),
            markup: markup.cloned(),
        });
        Ok(())
    }

    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> AppResult<()> {
        self.calls.lock().unwrap().push(ChatCall::Edit {
            chat_id,
            message_id,
            text: text.to_string(),
            markup: markup.cloned(),
        });
        Ok(())
    }

    async fn answer_callback_query(&self, callback_id: &str) -> AppResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(ChatCall::Answer(callback_id.to_string()));
        Ok(())
    }
}

pub type TestHandler = EventHandler<CsvWorkbook, RecordingChat, Arc<FixedTime>>;

/// Handler over a fresh CSV workbook, with time starting at `start`
pub fn test_handler(name: &str, start: DateTime<Utc>) -> (TestHandler, Arc<FixedTime>) {
    let time = Arc::new(FixedTime::new(start));
    let handler = EventHandler::with_time_source(
        csv_book(name),
        RecordingChat::default(),
        time.clone(),
        TZ,
        Messages::default(),
    );
    (handler, time)
}

pub fn callback_update(update_id: i64, data: &str) -> Value {
    json!({
        "update_id": update_id,
        "callback_query": {
            "id": format!("cb-{update_id}"),
            "from": { "id": 42, "first_name": "Dana" },
            "message": {
                "message_id": 7,
                "chat": { "id": 42 },
                "text": "Press to clock in"
            },
            "data": data
        }
    })
}

pub fn text_update(update_id: i64, text: &str) -> Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": 3,
            "chat": { "id": 42 },
            "from": { "id": 42, "first_name": "Dana" },
            "text": text
        }
    })
}

/// Serve `app` on an ephemeral localhost port
pub async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    addr
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Value,
}

/// Fake Bot API: records each call, answers `{"ok": ok}`
#[derive(Clone)]
pub struct FakeTelegram {
    pub ok: bool,
    pub requests: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeTelegram {
    pub fn new(ok: bool) -> Self {
        Self {
            ok,
            requests: Arc::default(),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .fallback(fake_telegram)
            .with_state(self.clone())
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

async fn fake_telegram(
    State(fake): State<FakeTelegram>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> impl IntoResponse {
    fake.requests.lock().unwrap().push(Recorded {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });
    if fake.ok {
        Json(json!({ "ok": true, "result": true }))
    } else {
        Json(json!({ "ok": false, "error_code": 401, "description": "Unauthorized" }))
    }
}

/// Fake Sheets v4 API over one spreadsheet `SHEET-ID`
#[derive(Clone, Default)]
pub struct FakeSheets {
    /// (sheet id, title, rows)
    pub sheets: Arc<Mutex<Vec<(i64, String, Vec<Vec<String>>)>>>,
    pub requests: Arc<Mutex<Vec<Recorded>>>,
}

pub const SPREADSHEET_ID: &str = "SHEET-ID";

impl FakeSheets {
    pub fn with_template() -> Self {
        let fake = Self::default();
        fake.sheets.lock().unwrap().push((
            0,
            "Template".to_string(),
            vec![vec!["Date".into(), "Start".into(), "End".into(), "Hours".into()]],
        ));
        fake
    }

    pub fn router(&self) -> Router {
        Router::new().fallback(fake_sheets).with_state(self.clone())
    }

    pub fn rows(&self, title: &str) -> Option<Vec<Vec<String>>> {
        self.sheets
            .lock()
            .unwrap()
            .iter()
            .find(|(_, t, _)| t == title)
            .map(|(_, _, rows)| rows.clone())
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

fn unquote(title: &str) -> String {
    title
        .trim_start_matches('\'')
        .trim_end_matches('\'')
        .replace("''", "'")
}

fn col_index(letter: &str) -> usize {
    letter
        .chars()
        .fold(0, |acc, c| acc * 26 + (c as usize - 'A' as usize + 1))
}

/// `C5` → (5, 3)
fn cell_pos(cell: &str) -> (usize, usize) {
    let split = cell.find(|c: char| c.is_ascii_digit()).unwrap();
    (cell[split..].parse().unwrap(), col_index(&cell[..split]))
}

async fn fake_sheets(
    State(fake): State<FakeSheets>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> axum::response::Response {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let path = uri.path().to_string();
    fake.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        body: body.clone(),
    });

    let base = format!("/v4/spreadsheets/{SPREADSHEET_ID}");
    let mut sheets = fake.sheets.lock().unwrap();

    if path == base && method == Method::GET {
        let list: Vec<Value> = sheets
            .iter()
            .map(|(id, title, _)| json!({ "properties": { "sheetId": id, "title": title } }))
            .collect();
        return Json(json!({ "sheets": list })).into_response();
    }

    if path == format!("{base}:batchUpdate") && method == Method::POST {
        let dup = &body["requests"][0]["duplicateSheet"];
        let source = dup["sourceSheetId"].as_i64().unwrap();
        let name = dup["newSheetName"].as_str().unwrap().to_string();
        let rows = sheets
            .iter()
            .find(|(id, _, _)| *id == source)
            .map(|(_, _, r)| r.clone())
            .unwrap_or_default();
        let next_id = sheets.len() as i64 + 100;
        sheets.push((next_id, name, rows));
        return Json(json!({ "replies": [] })).into_response();
    }

    if let Some(range) = path.strip_prefix(&format!("{base}/values/")) {
        let (title, cells) = match range.split_once('!') {
            Some((t, c)) => (unquote(t), Some(c.to_string())),
            None => (unquote(range), None),
        };
        let Some(sheet) = sheets.iter_mut().find(|(_, t, _)| *t == title) else {
            return (StatusCode::BAD_REQUEST, "Unable to parse range").into_response();
        };

        if method == Method::GET {
            return Json(json!({ "range": range, "values": sheet.2 })).into_response();
        }

        if method == Method::PUT {
            let cells = cells.unwrap();
            let first = cells.split(':').next().unwrap();
            let (row, col) = cell_pos(first);
            let values = body["values"][0].as_array().cloned().unwrap_or_default();
            let rows = &mut sheet.2;
            if rows.len() < row {
                rows.resize_with(row, Vec::new);
            }
            let target = &mut rows[row - 1];
            if target.len() < col - 1 + values.len() {
                target.resize(col - 1 + values.len(), String::new());
            }
            for (i, v) in values.iter().enumerate() {
                target[col - 1 + i] = v.as_str().unwrap_or_default().to_string();
            }
            return Json(json!({ "updatedCells": values.len() })).into_response();
        }
    }

    (StatusCode::NOT_FOUND, "not found").into_response()
}
