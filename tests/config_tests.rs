use rtimeclock::config::{Config, Messages, SheetsBackendKind};
use rtimeclock::errors::AppError;
use std::collections::HashMap;
use std::fs;

mod common;
use common::temp_dir;

#[test]
fn missing_file_gives_defaults() {
    let dir = temp_dir("cfg_missing");
    let cfg = Config::load_file(&dir.join("nope.conf")).unwrap();

    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.listen_addr, "0.0.0.0");
    assert_eq!(cfg.timezone, "Asia/Jerusalem");
    assert_eq!(cfg.sheets.backend, SheetsBackendKind::Google);
    assert_eq!(cfg.sheets.template_sheet, "Template");
    assert_eq!(cfg.messages, Messages::default());
}

#[test]
fn partial_file_keeps_other_defaults() {
    let dir = temp_dir("cfg_partial");
    let path = dir.join("rtimeclock.conf");
    fs::write(
        &path,
        "sheets:\n  backend: csv\nmessages:\n  clock_in_button: Entrata\n",
    )
    .unwrap();

    let cfg = Config::load_file(&path).unwrap();
    assert_eq!(cfg.sheets.backend, SheetsBackendKind::Csv);
    assert_eq!(cfg.sheets.template_sheet, "Template");
    assert_eq!(cfg.messages.clock_in_button, "Entrata");
    assert_eq!(cfg.messages.clock_out_button, "Clock out");
}

#[test]
fn environment_overrides_file_values() {
    let mut cfg = Config::default();
    let env: HashMap<&str, &str> = HashMap::from([
        ("TELEGRAM_TOKEN", "1:abc"),
        ("WEBHOOK_URL", "https://bot.example.org/"),
        ("PORT", "9000"),
        ("GOOGLE_SPREADSHEET_ID", "sheet"),
        ("GOOGLE_ACCESS_TOKEN", "   "),
    ]);

    cfg.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));

    assert_eq!(cfg.require_token().unwrap(), "1:abc");
    assert_eq!(cfg.require_webhook_url().unwrap(), "https://bot.example.org/");
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.sheets.spreadsheet_id, "sheet");
    // blank values are ignored
    assert!(cfg.sheets.access_token.is_empty());
}

#[test]
fn invalid_port_in_env_is_ignored() {
    let mut cfg = Config::default();
    cfg.apply_env_overrides(|k| (k == "PORT").then(|| "http".to_string()));
    assert_eq!(cfg.port, 8080);
}

#[test]
fn timezone_is_validated() {
    let mut cfg = Config::default();
    assert_eq!(cfg.tz().unwrap(), chrono_tz::Asia::Jerusalem);

    cfg.timezone = "Mars/Olympus".to_string();
    assert!(matches!(cfg.tz(), Err(AppError::InvalidTimezone(_))));
}

#[test]
fn save_and_reload() {
    let dir = temp_dir("cfg_save");
    let path = dir.join("nested").join("rtimeclock.conf");
    let mut cfg = Config::default();
    cfg.webhook_url = "https://bot.example.org/".to_string();

    cfg.save(&path).unwrap();
    let back = Config::load_file(&path).unwrap();
    assert_eq!(back.webhook_url, cfg.webhook_url);
}

#[test]
fn masked_hides_tokens() {
    let mut cfg = Config::default();
    cfg.telegram_token = "1:abc".to_string();

    let shown = cfg.masked();
    assert_eq!(shown.telegram_token, "********");
    assert!(shown.sheets.access_token.is_empty());
}
