use crate::cli::parser::Cli;
use crate::config::{Config, SheetsBackendKind};
use crate::errors::AppResult;
use crate::sheets::CsvWorkbook;
use crate::ui::messages::{info, success};
use crate::utils::path::anchored;

/// Handle the `init` command
///
/// This initializes:
///  - the configuration file (existing values are kept)
///  - the local CSV workbook and its template, when `sheets.backend: csv`
pub fn handle(cli: &Cli) -> AppResult<()> {
    let path = Config::resolve_path(cli.config.as_deref());

    info("Initializing rTimeClock…");
    let cfg = Config::init_all(&path, cli.test)?;
    if !cli.test {
        success(format!("Config file : {}", path.display()));
    }

    if cfg.sheets.backend == SheetsBackendKind::Csv {
        let dir = anchored(&cfg.sheets.csv_dir, &Config::base_dir(&path));
        let book = CsvWorkbook::new(dir, &cfg.sheets.template_sheet);
        let template = book.init_template()?;
        success(format!("Workbook    : {}", book.dir().display()));
        success(format!("Template    : {}", template.display()));
    } else {
        info(format!(
            "Spreadsheet : google ({})",
            if cfg.sheets.spreadsheet_id.is_empty() {
                "spreadsheet_id not set"
            } else {
                cfg.sheets.spreadsheet_id.as_str()
            }
        ));
    }

    success("rTimeClock initialization completed!");
    Ok(())
}
