//! Configuration management.
//!
//! Configuration is read from the path given with `--config`, or from
//! `~/.config/naver-news-scraper/config.toml`. If that default file doesn't
//! exist, a default configuration with comments is created. Files ending in
//! `.json` are read as JSON so configs from older tooling keep working.

pub mod labels;
pub mod selectors;

pub use labels::LabelConfig;
pub use selectors::{SelectorConfig, SelectorGroup};

use crate::app::logging::LoggingSettings;
use crate::output::OutputSettings;
use crate::scraper::{BrowserSettings, ScrapingSettings};
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
///
/// `scraping`, `browser`, `output`, `selectors` and `labels` are required
/// sections; fields inside them fall back to defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub scraping: ScrapingSettings,
    pub browser: BrowserSettings,
    pub output: OutputSettings,
    pub selectors: SelectorConfig,
    pub labels: LabelConfig,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scraping: ScrapingSettings::default(),
            browser: BrowserSettings::default(),
            output: OutputSettings::default(),
            selectors: SelectorConfig::default(),
            labels: LabelConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default path when `None`.
    ///
    /// Only the default path is created when missing; an explicit path that
    /// doesn't exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let config_path = Self::default_config_path()?;
                if !config_path.exists() {
                    Self::create_default_config(&config_path)?;
                    return Ok(Self::default());
                }
                Self::load_from(&config_path)
            }
        }
    }

    /// Read, parse and validate the configuration file at `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = Self::parse(path, &content)?;
        config.validate()?;
        Ok(config)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            serde_json::from_str(content).map_err(|e| e.to_string())
        } else {
            toml::from_str(content).map_err(|e| e.to_string())
        };

        parsed.map_err(|reason| ConfigError::Parse {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Reject values the scraper cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let delay = self.scraping.delay_between_requests;
        if !delay.is_finite() || delay < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "scraping.delay_between_requests must be 0 or greater (got {})",
                delay
            )));
        }

        if self.scraping.max_workers < 1 {
            return Err(ConfigError::Invalid(
                "scraping.max_workers must be 1 or greater".into(),
            ));
        }

        if self.browser.page_load_timeout_secs == 0 || self.browser.script_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "browser timeouts must be greater than 0".into(),
            ));
        }

        if self.browser.window_width == 0 || self.browser.window_height == 0 {
            return Err(ConfigError::Invalid(
                "browser window size must be greater than 0".into(),
            ));
        }

        let empty = self.selectors.empty_groups();
        if !empty.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "selector groups must not be empty: {}",
                empty.join(", ")
            )));
        }

        Ok(())
    }

    /// Get the default config file path: `~/.config/naver-news-scraper/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("naver-news-scraper").join("config.toml"))
    }

    /// Create a default config file with comments.
    pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    pub fn default_config_content() -> String {
        r##"# naver-news-scraper configuration
#
# Selector groups can be written as a list or as one comma-separated string.
# Selectors in a group are tried in order; the first one that matches wins.

[scraping]
# Seconds to wait before each request after the first
delay_between_requests = 3.0

# Extra passes over failed URLs (the delay doubles on every pass)
retry_count = 1

# Pages are processed one at a time; kept for compatibility
max_workers = 1

[browser]
headless = true
implicit_wait_secs = 10
page_load_timeout_secs = 30
script_timeout_secs = 30
window_width = 1920
window_height = 1080

# Pause after clicks that load more content (milliseconds)
click_settle_ms = 3000

# Pause after toggling a setting in a dialog (milliseconds)
toggle_settle_ms = 1000

chrome_args = [
    "--no-sandbox",
    "--disable-gpu",
    "--disable-dev-shm-usage",
    "--disable-software-rasterizer",
    "--lang=ko-KR",
]

[output]
# csv, json or excel
format = "csv"

# Prepended to every output file name when not empty
filename_prefix = ""

# Append _YYYYmmdd_HHMMSS to output file names
include_timestamp = false

[logging]
level = "info"
# file = "logs/scraper.log"

[selectors.article]
title = ["#title_area span", "h2.media_end_head_headline", "h2.end_tit", ".NewsEndMain_article_title__j5ND9", "h2[class*='article_title']"]
content = ["#dic_area", "#articleBodyContents", "#articeBody", "div._article_content"]
author = [".media_end_head_journalist_name", ".byline_s", ".journalist_name"]
publish_date = [".media_end_head_info_datestamp_time", "._ARTICLE_DATE_TIME", ".article_info .author em"]
category = [".media_end_categorize_item", ".Nitem_link[aria-selected='true'] .Nitem_link_menu"]
like_count = [".media_end_head_info_variety_like .u_likeit_text._count", "._reactionModule .u_likeit_text._count"]
comment_count = [".media_end_head_cmtcount_button", "#comment_count"]

[selectors.comment_stats]
stat_count_info = [".u_cbox_comment_count_wrap .u_cbox_count_info"]
stat_title = [".u_cbox_info_title"]
stat_value = [".u_cbox_info_txt"]
demographic_stats_container = [".u_cbox_chart_wrap"]
male_ratio = [".u_cbox_chart_sex .u_cbox_chart_male .u_cbox_chart_per"]
female_ratio = [".u_cbox_chart_sex .u_cbox_chart_female .u_cbox_chart_per"]
age_item = [".u_cbox_chart_age .u_cbox_chart_progress"]
age_label = [".u_cbox_chart_cnt span"]
age_value = [".u_cbox_chart_per"]

[selectors.comment_navigation]
article_to_comment_button = [".u_cbox_btn_view_comment"]
comment_page_more_button = [".u_cbox_paginate .u_cbox_btn_more"]

[selectors.comments]
comment_list = [".u_cbox_list > li.u_cbox_comment"]
comment_content = [".u_cbox_contents"]
comment_author = [".u_cbox_nick"]
deleted_comment_author = [".u_cbox_nick", ".u_cbox_name"]
comment_like = [".u_cbox_cnt_recomm"]
comment_dislike = [".u_cbox_cnt_unrecomm"]
comment_date = [".u_cbox_date"]

[selectors.cleanbot]
container = [".u_cbox_cleanbot"]
message = [".u_cbox_cleanbot_title", ".u_cbox_cleanbot_msg"]
setting_button = [".u_cbox_cleanbot_setbutton"]
modal = [".u_cbox_layer_wrap", ".u_cbox_layer_cleanbot2_wrap", ".u_cbox_layer_cleanbot2", ".u_cbox_layer_cleanbot2_content"]
checkbox = ["#cleanbot_dialog_checkbox_cbox_module", ".u_cbox_layer_cleanbot2_checkbox", "input[data-action='toggleCleanbot2']"]
checkbox_fallback = [".u_cbox_layer_cleanbot2_checkboxdummy", "label[for='cleanbot_dialog_checkbox_cbox_module']"]
confirm_button = ["button[data-action='updateCleanbotStatus']", ".u_cbox_layer_cleanbot2_extrabtn"]
close_button = ["button[data-action='closeCleanbotLayer']"]

[labels]
current_comment_count = "현재 댓글"
deleted_comment_count = "작성자 삭제"
removed_comment_count = "규정 미준수"
age_10s = "10대"
age_20s = "20대"
age_30s = "30대"
age_40s = "40대"
age_50s = "50대"
age_60s = "60대"
cleanbot_disabled = "착한댓글"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
