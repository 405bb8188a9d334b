use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calendar::DateKey;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        since,
        force,
    } = cmd
    {
        let since = since.as_deref().map(DateKey::parse).transpose()?;
        let mut pool = DbPool::new(&cfg.database)?;
        ExportLogic::export(&mut pool, &cfg.owner, *format, file, since, *force)?;
    }
    Ok(())
}
