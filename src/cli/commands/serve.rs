use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::handler::EventHandler;
use crate::errors::AppResult;
use crate::server;
use crate::sheets::Workbook;
use crate::telegram::TelegramClient;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Handle the `serve` command: wire config, Telegram, spreadsheet and HTTP.
pub async fn handle(cmd: &Commands, cfg: &Config, path: &Path) -> AppResult<()> {
    let Commands::Serve { port, register } = cmd else {
        return Ok(());
    };

    let token = cfg.require_token()?;
    let tz = cfg.tz()?;
    let workbook = Workbook::from_config(cfg, &Config::base_dir(path))?;
    let chat = TelegramClient::new(token)?;

    if *register {
        chat.set_webhook(cfg.require_webhook_url()?).await?;
    }

    tracing::info!(timezone = %tz, backend = ?cfg.sheets.backend, "starting bot");

    let handler = EventHandler::new(workbook, chat, tz, cfg.messages.clone());
    let app = server::router(Arc::new(Mutex::new(handler)));
    let listener = server::bind(&cfg.listen_addr, port.unwrap_or(cfg.port)).await?;
    server::serve(listener, app).await
}
