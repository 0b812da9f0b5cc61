use std::{
    fs::File,
    path::Path,
    sync::{Mutex, PoisonError},
};

use anyhow::Context;
use time::{macros::format_description, OffsetDateTime, UtcOffset};
use tracing::{subscriber::set_global_default, Level};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, FmtSubscriber};

/// Set once the file subscriber of this crate is the global default.
static INSTALLED: Mutex<bool> = Mutex::new(false);

/// Installs a global subscriber writing every event to a timestamped file in the current
/// directory. Later calls keep the first subscriber and return `Ok`.
pub fn init_logger() -> anyhow::Result<()> {
    init_logger_in(Path::new("."))
}

pub(crate) fn init_logger_in(dir: &Path) -> anyhow::Result<()> {
    let mut installed = INSTALLED.lock().unwrap_or_else(PoisonError::into_inner);
    if *installed {
        return Ok(());
    }

    let path = dir.join(get_log_file_name()?);
    let file = File::create(&path)
        .with_context(|| format!("could not create log file '{}'", path.display()))?;
    let writer = BoxMakeWriter::new(file);
    let local_offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let timer = tracing_subscriber::fmt::time::OffsetTime::new(
        local_offset,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    );

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .with_timer(timer)
        .with_writer(writer)
        .finish();

    set_global_default(subscriber).context(
        "could not set global default tracing subscriber, consider disabling logs if you are already setting a subscriber",
    )?;
    *installed = true;
    Ok(())
}

fn get_log_file_name() -> anyhow::Result<String> {
    let format =
        format_description!("[year]-[month]-[day]_[hour]:[minute]:[second]_rotation_log.txt");
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    Ok(now.format(format)?)
}
