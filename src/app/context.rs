use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::app::error::{Result, ScrapeError};
use crate::config::Config;

/// Everything a command needs: loaded configuration, where results go,
/// and the shared shutdown flag.
pub struct AppContext {
    pub config: Config,
    pub output_dir: PathBuf,
    pub shutdown: Arc<AtomicBool>,
}

impl AppContext {
    /// Load configuration (default path when `config_path` is `None`) and
    /// create the output directory.
    pub fn new(config_path: Option<&Path>, output_dir: &Path) -> Result<Self> {
        let config = Config::load(config_path)?;
        Self::with_config(config, output_dir)
    }

    pub fn with_config(config: Config, output_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(output_dir).map_err(|e| ScrapeError::write(output_dir, e))?;

        Ok(Self {
            config,
            output_dir: output_dir.to_path_buf(),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}
