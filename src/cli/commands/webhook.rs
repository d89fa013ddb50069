use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::telegram::TelegramClient;
use crate::ui::messages::success;

/// Handle the `webhook` command
pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Webhook { set, delete, url } = cmd else {
        return Ok(());
    };

    if !*set && !*delete {
        return Err(AppError::Config(
            "nothing to do: use `webhook --set` or `webhook --delete`".into(),
        ));
    }

    let client = TelegramClient::new(cfg.require_token()?)?;

    if *set {
        let target = match url {
            Some(u) => u.as_str(),
            None => cfg.require_webhook_url()?,
        };
        client.set_webhook(target).await?;
        success(format!("Webhook registered: {}", target));
    }

    if *delete {
        client.delete_webhook().await?;
        success("Webhook removed");
    }

    Ok(())
}
