use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

use crate::enhance::DEFAULT_DELAY;
use crate::error::{Error, Result};
use crate::source::DataSource;

const APP_DIR: &str = "grow-and-go";

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "grow-and-go")]
#[command(about = "Journaling flash cards for the terminal")]
pub struct CliArgs {
    #[arg(long, help = "CSV file or http(s) URL to read prompts from (default: bundled cards)")]
    pub source: Option<String>,

    #[arg(long, help = "TOML config file (default: <config dir>/grow-and-go/config.toml)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Seed for reproducible shuffling")]
    pub seed: Option<u64>,

    #[arg(long, help = "Delay of the offline prompt enhancer in milliseconds")]
    pub enhance_delay_ms: Option<u64>,

    #[arg(long, help = "Where to write the log file")]
    pub log_file: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub source: Option<String>,
    pub seed: Option<u64>,
    pub enhance_delay_ms: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_toml(&text).map_err(|e| Error::Config {
            message: format!("{}: {e}", path.display()),
        })
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config {
            message: e.to_string(),
        })
    }
}

// Command line first, then the config file, then built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub source: DataSource,
    pub seed: Option<u64>,
    pub enhance_delay: Duration,
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
}

impl Settings {
    pub fn resolve(args: CliArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => FileConfig::load(&path)?,
                _ => FileConfig::default(),
            },
        };
        Ok(Self::merge(args, file))
    }

    pub fn merge(args: CliArgs, file: FileConfig) -> Self {
        let source = args
            .source
            .or(file.source)
            .map(|s| DataSource::from_arg(&s))
            .unwrap_or(DataSource::Bundled);
        let enhance_delay = args
            .enhance_delay_ms
            .or(file.enhance_delay_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DELAY);

        Self {
            source,
            seed: args.seed.or(file.seed),
            enhance_delay,
            log_file: args.log_file.or(file.log_file).or_else(default_log_path),
            verbose: args.verbose,
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR).join("grow-and-go.log"))
}
