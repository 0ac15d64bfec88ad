use std::path::{Path, PathBuf};
use std::{env, fs};

use chrono::{DateTime, FixedOffset, NaiveDate};
use clap::ValueEnum;
use serde::Deserialize;

use crate::error::{MarkoutError, Result};

pub const CFG_FILE_NAME: &str = "markout.toml";

const DEFAULT_INDEX_FILE: &str = "tags.md";
const DEFAULT_TAGS_DIR: &str = "tags";
const DEFAULT_INDEX_CLASS: &str = "hashtags";

#[derive(Deserialize, ValueEnum, Copy, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Silent,
    Minimal,
    #[default]
    Normal,
    Detailed,
    Diagnostic,
}

#[derive(Deserialize, Default)]
pub struct Paths {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

#[derive(Deserialize, Default)]
pub struct Pages {
    pub index_file: Option<String>,
    pub tags_dir: Option<String>,
    pub index_class: Option<String>,
}

#[derive(Deserialize)]
pub struct Log {
    pub verbosity: Option<Verbosity>,
    #[serde(default = "default_log_to_console")]
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

fn default_log_to_console() -> bool {
    true
}

#[derive(Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub pages: Pages,
    pub log: Option<Log>,
}

/// Where generated pages and their stubs live, relative to the content roots.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub index_file: String,
    pub tags_dir: String,
    pub index_class: String,
}

impl Default for PageLayout {
    fn default() -> Self {
        PageLayout {
            index_file: DEFAULT_INDEX_FILE.to_string(),
            tags_dir: DEFAULT_TAGS_DIR.to_string(),
            index_class: DEFAULT_INDEX_CLASS.to_string(),
        }
    }
}

impl PageLayout {
    pub fn index_path(&self, root: &Path) -> PathBuf {
        root.join(&self.index_file)
    }

    pub fn tag_path(&self, root: &Path, hashtag: &str) -> PathBuf {
        root.join(&self.tags_dir).join(format!("{}.md", hashtag))
    }
}

/// Values given on the command line. They win over the configuration file.
#[derive(Default)]
pub struct Overrides {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub dry_run: bool,
}

/// Everything a run needs, resolved from the configuration file and the command line.
pub struct Settings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub layout: PageLayout,
    pub dry_run: bool,
    pub now: DateTime<FixedOffset>,
}

impl Settings {
    pub fn resolve(config: &Config, overrides: Overrides, now: DateTime<FixedOffset>) -> Result<Settings> {
        let input_dir = overrides.input_dir
            .or_else(|| config.paths.input_dir.clone())
            .ok_or(MarkoutError::MissingInput)?;
        let output_dir = overrides.output_dir
            .or_else(|| config.paths.output_dir.clone())
            .unwrap_or_else(|| input_dir.clone());

        let defaults = PageLayout::default();
        let layout = PageLayout {
            index_file: config.pages.index_file.clone().unwrap_or(defaults.index_file),
            tags_dir: config.pages.tags_dir.clone().unwrap_or(defaults.tags_dir),
            index_class: config.pages.index_class.clone().unwrap_or(defaults.index_class),
        };

        Ok(Settings {
            input_dir,
            output_dir,
            layout,
            dry_run: overrides.dry_run,
            now,
        })
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    /// True when posts are rewritten where they are
    pub fn in_place(&self) -> bool {
        if self.input_dir == self.output_dir {
            return true;
        }
        match (fs::canonicalize(&self.input_dir), fs::canonicalize(&self.output_dir)) {
            (Ok(input), Ok(output)) => input == output,
            _ => false,
        }
    }
}

impl Config {
    pub fn verbosity(&self) -> Verbosity {
        self.log.as_ref().and_then(|log| log.verbosity).unwrap_or_default()
    }
}

pub fn read_config(cfg_path: &Path) -> Result<Config> {
    let cfg_content = fs::read_to_string(cfg_path)
        .map_err(|e| MarkoutError::Config(cfg_path.to_path_buf(), e.to_string()))?;

    toml::from_str::<Config>(&cfg_content)
        .map_err(|e| MarkoutError::Config(cfg_path.to_path_buf(), e.to_string()))
}

/// Looks for `markout.toml` next to the executable, in the current directory
/// and in the user config directory, in that order.
pub fn find_config() -> Option<PathBuf> {
    let exe_dir = env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf));
    let candidates = [
        exe_dir,
        env::current_dir().ok(),
        dirs::config_dir().map(|dir| dir.join("markout")),
    ];

    candidates
        .into_iter()
        .flatten()
        .map(|dir| dir.join(CFG_FILE_NAME))
        .find(|path| path.exists())
}

/// Reads the given configuration file, or the first one found. Running without
/// a configuration file is fine.
pub fn open_config(cfg_path: Option<PathBuf>) -> Result<Config> {
    match cfg_path.or_else(find_config) {
        Some(path) => read_config(&path),
        None => Ok(Config::default()),
    }
}
