use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing::{Metadata, info};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::{LevelFilter, filter_fn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use slice_core::{Data, Error};

pub const DEFAULT_LOG_DIR: &str = ".";
pub const LOG_FILE: &str = "bot.log";
pub const ERROR_LOG_FILE: &str = "bot_errors.log";

/// Shard chatter that drowns everything else at INFO.
fn is_noisy_target(target: &str) -> bool {
    target.starts_with("serenity::gateway::bridge::shard_manager")
        || target.starts_with("serenity::gateway::bridge::shard_runner")
}

fn keep_event(metadata: &Metadata<'_>) -> bool {
    *metadata.level() <= tracing::Level::INFO && !is_noisy_target(metadata.target())
}

pub fn open_log_file(dir: &Path, name: &str) -> io::Result<Arc<File>> {
    std::fs::create_dir_all(dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(name))
        .map(Arc::new)
}

/// Install the console layer plus the `bot.log` and `bot_errors.log` sinks.
///
/// A log file that can't be opened is skipped and reported once the
/// subscriber is up.
pub fn init(log_dir: Option<&Path>) {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(keep_event));

    let mut failures = Vec::new();
    let mut open = |name: &'static str| {
        let dir = log_dir?;
        match open_log_file(dir, name) {
            Ok(file) => Some(file),
            Err(err) => {
                failures.push((name, err));
                None
            }
        }
    };

    let file_layer = open(LOG_FILE).map(|file| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file)
            .with_filter(filter_fn(keep_event))
    });
    let error_layer = open(ERROR_LOG_FILE).map(|file| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file)
            .with_filter(LevelFilter::ERROR)
    });

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(file_layer)
        .with(error_layer)
        .init();

    for (name, err) in failures {
        tracing::warn!(?err, file = name, "Log file unavailable; logging to console only.");
    }
}

fn outcome_label(success: bool) -> &'static str {
    if success { "SUCCESS" } else { "FAILED" }
}

/// Audit line for every finished invocation, successful or not.
pub fn log_command_usage(ctx: poise::Context<'_, Data, Error>, success: bool) {
    info!(
        target: "command_usage",
        command = %ctx.command().qualified_name,
        user_id = ctx.author().id.get(),
        guild_id = ctx.guild_id().map(|id| id.get()),
        success,
        "command {}",
        outcome_label(success)
    );
}
