use anyhow::Result;
use chrono::Local;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::{create_dir_all, File};
use std::path::{Path, PathBuf};

/// Log to the terminal and to `<log_dir>/<name>_<timestamp>.log`.
/// Returns the log file path.
pub fn init(log_dir: &Path, name: &str) -> Result<PathBuf> {
    create_dir_all(log_dir)?;
    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let log_path = log_dir.join(format!("{name}_{ts}.log"));

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Debug, Config::default(), File::create(&log_path)?),
    ])?;
    Ok(log_path)
}
