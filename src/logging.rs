use anyhow::{Context, Result};
use std::path::Path;
use time::OffsetDateTime;
use time::macros::format_description;

/// Routes `log` records to a file; the terminal belongs to the UI.
pub fn setup_logger(path: &Path, verbose: bool) -> Result<()> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            let stamp = OffsetDateTime::now_local()
                .unwrap_or_else(|_| OffsetDateTime::now_utc())
                .format(format_description!(
                    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
                ))
                .unwrap_or_default();
            out.finish(format_args!(
                "[{stamp} {} {}] {message}",
                record.level(),
                record.target()
            ));
        })
        .level(level)
        .level_for("symphonia_bundle_mp3", log::LevelFilter::Error)
        .level_for("symphonia_core", log::LevelFilter::Error)
        .chain(
            fern::log_file(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?,
        )
        .apply()
        .context("logger already installed")?;
    Ok(())
}
