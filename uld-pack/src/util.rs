//! Shared bits of the ambient stack (§4.8): the solve-level logging
//! dispatcher and the monotonic epoch its timestamps are relative to.

use std::sync::LazyLock;
use std::time::Instant;

use anyhow::Result;
use log::LevelFilter;

/// Process-start reference instant. Log lines report elapsed-since-epoch,
/// not wall-clock time, mirroring the upstream optimizer's logger.
pub static EPOCH: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Installs a `fern` dispatcher: `[LEVEL] [hh:mm:ss] <thread>` prefix, to
/// stdout. Adapters call this once at startup and pick the level filter;
/// the core library itself only emits through the `log` facade.
pub fn init_logger(level: LevelFilter) -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            let handle = std::thread::current();
            let thread_name = handle.name().unwrap_or("-");

            let elapsed = EPOCH.elapsed();
            let secs = elapsed.as_secs() % 60;
            let mins = (elapsed.as_secs() / 60) % 60;
            let hours = (elapsed.as_secs() / 60) / 60;

            let prefix = format!(
                "[{}] [{:0>2}:{:0>2}:{:0>2}] <{}>",
                record.level(),
                hours,
                mins,
                secs,
                thread_name,
            );

            out.finish(format_args!("{prefix:<27}{message}"))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}
