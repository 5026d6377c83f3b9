//! Process-wide logging setup on top of `log4rs`.
//!
//! Two rolling files are written under the configured directory: `querylink.log` for
//! everything, and `pipeline.log` for the `querylink::pipeline` target (compiled
//! stages and their developer traces), which does not propagate to the main file.

use log::LevelFilter;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::{
    CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
};
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::{Path, PathBuf};

use crate::config::QueryConfig;
use crate::errors::QueryError;

pub const PIPELINE_TARGET: &str = "querylink::pipeline";

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";
const ROLL_SIZE: u64 = 10 * 1024 * 1024;
const RETENTION: u32 = 7;

/// error|warn|info|debug|trace, anything else is info.
#[must_use]
pub fn level_filter(level: Option<&str>) -> LevelFilter {
    match level.unwrap_or("info").to_ascii_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// Builds the log4rs configuration for `config`, creating the log directory and files.
///
/// # Errors
/// `QueryError::Config` if the directory or an appender cannot be created.
pub fn build_config(config: &QueryConfig) -> Result<Config, QueryError> {
    let base = config
        .log_dir
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    std::fs::create_dir_all(&base).map_err(config_err)?;
    let lvl = level_filter(config.log_level.as_deref());

    let app = rolling(&base, "querylink")?;
    let pipeline = rolling(&base, "pipeline")?;
    Config::builder()
        .appender(Appender::builder().build("app", Box::new(app)))
        .appender(Appender::builder().build("pipeline", Box::new(pipeline)))
        .logger(Logger::builder().appender("pipeline").additive(false).build(PIPELINE_TARGET, lvl))
        .build(Root::builder().appender("app").build(lvl))
        .map_err(config_err)
}

fn rolling(base: &Path, stem: &str) -> Result<RollingFileAppender, QueryError> {
    let roller = FixedWindowRoller::builder()
        .build(&format!("{}", base.join(format!("{stem}.{{}}.log")).display()), RETENTION)
        .map_err(config_err)?;
    let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(ROLL_SIZE)), Box::new(roller));
    RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(base.join(format!("{stem}.log")), Box::new(policy))
        .map_err(config_err)
}

fn config_err(e: impl std::fmt::Display) -> QueryError {
    QueryError::Config(e.to_string())
}

/// Installs the logger for the process. A logger that is already installed is kept.
///
/// # Errors
/// See [`build_config`].
pub fn configure(config: &QueryConfig) -> Result<(), QueryError> {
    let built = build_config(config)?;
    if log4rs::init_config(built).is_err() {
        log::debug!("logger already installed, keeping it");
    }
    Ok(())
}

/// [`configure`] with [`QueryConfig::from_env`].
///
/// # Errors
/// See [`build_config`].
pub fn configure_from_env() -> Result<(), QueryError> {
    configure(&QueryConfig::from_env())
}
